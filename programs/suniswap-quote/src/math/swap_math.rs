//! Swap Math
//!
//! Single swap step computation and fee split helpers.

use crate::constants::{FEE_RATE_DENOMINATOR, MAX_FEE_RATE, PROTOCOL_FEE_RATE_DENOMINATOR};
use crate::errors::QuoteError;
use crate::math::full_math::{mul_div, mul_div_round_up, u128_to_u64, Q64_RESOLUTION};
use crate::math::liquidity_math::{
    get_amount_delta_a, get_amount_delta_b, try_get_amount_delta_a, try_get_amount_delta_b,
    AmountDeltaU64,
};
use crate::math::sqrt_price_math::get_next_sqrt_price;
use anchor_lang::prelude::*;

/// Result of a single swap step computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStepResult {
    /// The new sqrt price after the swap step
    pub next_sqrt_price: u128,
    /// Amount of input token consumed, excluding fee
    pub amount_in: u64,
    /// Amount of output token produced
    pub amount_out: u64,
    /// Fee charged on the input token
    pub fee_amount: u64,
}

/// Compute the result of a single swap step
///
/// # Arguments
/// * `amount_remaining` - Amount still to be swapped (input or output per `amount_specified_is_input`)
/// * `fee_rate` - Fee rate in hundredths of a bip (3000 = 0.3%)
/// * `liquidity` - Active liquidity for the step
/// * `sqrt_price_current` - Current sqrt price (Q64.64)
/// * `sqrt_price_target` - Price of the next tick, already clamped by the limit
/// * `amount_specified_is_input` - true for exact input, false for exact output
/// * `a_to_b` - true if swapping token A for B (price decreasing)
pub fn compute_swap_step(
    amount_remaining: u64,
    fee_rate: u16,
    liquidity: u128,
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<SwapStepResult> {
    require!(fee_rate <= MAX_FEE_RATE, QuoteError::InvalidFeeRate);

    if liquidity == 0 {
        return Ok(SwapStepResult {
            next_sqrt_price: sqrt_price_target,
            amount_in: 0,
            amount_out: 0,
            fee_amount: 0,
        });
    }

    let initial_amount_fixed_delta = try_get_amount_fixed_delta(
        sqrt_price_current,
        sqrt_price_target,
        liquidity,
        amount_specified_is_input,
        a_to_b,
    )?;

    // Exact input: the fee comes out of the remaining amount first
    let amount_calc = if amount_specified_is_input {
        u128_to_u64(mul_div(
            amount_remaining as u128,
            (FEE_RATE_DENOMINATOR - fee_rate as u32) as u128,
            FEE_RATE_DENOMINATOR as u128,
        )?)?
    } else {
        amount_remaining
    };

    let next_sqrt_price = if initial_amount_fixed_delta.lte(amount_calc) {
        sqrt_price_target
    } else {
        get_next_sqrt_price(
            sqrt_price_current,
            liquidity,
            amount_calc,
            amount_specified_is_input,
            a_to_b,
        )?
    };

    let is_max_swap = next_sqrt_price == sqrt_price_target;

    let amount_unfixed_delta = get_amount_unfixed_delta(
        sqrt_price_current,
        next_sqrt_price,
        liquidity,
        amount_specified_is_input,
        a_to_b,
    )?;

    // The delta to the target is only reusable if the step got there
    let amount_fixed_delta = match initial_amount_fixed_delta {
        AmountDeltaU64::Valid(value) if is_max_swap => value,
        _ => get_amount_fixed_delta(
            sqrt_price_current,
            next_sqrt_price,
            liquidity,
            amount_specified_is_input,
            a_to_b,
        )?,
    };

    let (amount_in, mut amount_out) = if amount_specified_is_input {
        (amount_fixed_delta, amount_unfixed_delta)
    } else {
        (amount_unfixed_delta, amount_fixed_delta)
    };

    // Price rounding can overshoot the requested output by a unit
    if !amount_specified_is_input && amount_out > amount_remaining {
        amount_out = amount_remaining;
    }

    let fee_amount = if amount_specified_is_input && !is_max_swap {
        amount_remaining
            .checked_sub(amount_in)
            .ok_or(QuoteError::MathOverflow)?
    } else {
        u128_to_u64(mul_div_round_up(
            amount_in as u128,
            fee_rate as u128,
            (FEE_RATE_DENOMINATOR - fee_rate as u32) as u128,
        )?)?
    };

    Ok(SwapStepResult {
        next_sqrt_price,
        amount_in,
        amount_out,
        fee_amount,
    })
}

/// Delta of the token the caller fixed (input when exact-in, output when exact-out)
pub fn get_amount_fixed_delta(
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<u64> {
    if a_to_b == amount_specified_is_input {
        get_amount_delta_a(
            sqrt_price_current,
            sqrt_price_target,
            liquidity,
            amount_specified_is_input,
        )
    } else {
        get_amount_delta_b(
            sqrt_price_current,
            sqrt_price_target,
            liquidity,
            amount_specified_is_input,
        )
    }
}

pub fn try_get_amount_fixed_delta(
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<AmountDeltaU64> {
    if a_to_b == amount_specified_is_input {
        try_get_amount_delta_a(
            sqrt_price_current,
            sqrt_price_target,
            liquidity,
            amount_specified_is_input,
        )
    } else {
        try_get_amount_delta_b(
            sqrt_price_current,
            sqrt_price_target,
            liquidity,
            amount_specified_is_input,
        )
    }
}

/// Delta of the other token, rounded against the trader
pub fn get_amount_unfixed_delta(
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<u64> {
    if a_to_b == amount_specified_is_input {
        get_amount_delta_b(
            sqrt_price_current,
            sqrt_price_target,
            liquidity,
            !amount_specified_is_input,
        )
    } else {
        get_amount_delta_a(
            sqrt_price_current,
            sqrt_price_target,
            liquidity,
            !amount_specified_is_input,
        )
    }
}

/// Calculate the protocol fee portion of a step fee
/// protocol_fee = fee_amount * protocol_fee_rate / 10_000
pub fn calculate_protocol_fee(fee_amount: u64, protocol_fee_rate: u16) -> Result<u64> {
    if protocol_fee_rate == 0 || fee_amount == 0 {
        return Ok(0);
    }

    let result = (fee_amount as u128)
        .checked_mul(protocol_fee_rate as u128)
        .ok_or(QuoteError::MathOverflow)?
        / PROTOCOL_FEE_RATE_DENOMINATOR as u128;

    u128_to_u64(result)
}

/// Calculate fee growth per unit of liquidity (Q64.64)
/// fee_growth = (fee_amount << 64) / liquidity
pub fn calculate_fee_growth(fee_amount: u64, liquidity: u128) -> Result<u128> {
    if liquidity == 0 || fee_amount == 0 {
        return Ok(0);
    }

    Ok(((fee_amount as u128) << Q64_RESOLUTION) / liquidity)
}
