//! Sqrt Price Math
//!
//! Functions for computing the next sqrt price given token deltas.

use crate::constants::{MAX_SQRT_PRICE_X64, MIN_SQRT_PRICE_X64};
use crate::errors::QuoteError;
use crate::math::full_math::{
    div_round_up_if, div_round_up_if_u256, u256_to_u128, Q64_RESOLUTION, U256,
};
use anchor_lang::prelude::*;

/// Get the next sqrt price after a token A delta, rounding up
///
/// Adding token A (selling A, price goes down):
///   new_sqrt_price = L * sqrt_price / (L + amount * sqrt_price)
///
/// Removing token A (buying A, price goes up):
///   new_sqrt_price = L * sqrt_price / (L - amount * sqrt_price)
pub fn get_next_sqrt_price_from_a_round_up(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount: u64,
    amount_specified_is_input: bool,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price_x64);
    }

    let product = U256::from(sqrt_price_x64) * U256::from(amount);
    let liquidity_x64 = U256::from(liquidity) << Q64_RESOLUTION as usize;
    let numerator = liquidity_x64
        .checked_mul(U256::from(sqrt_price_x64))
        .ok_or(QuoteError::MathOverflow)?;

    let denominator = if amount_specified_is_input {
        liquidity_x64 + product
    } else {
        require!(liquidity_x64 > product, QuoteError::MathOverflow);
        liquidity_x64 - product
    };

    let next_sqrt_price = div_round_up_if_u256(numerator, denominator, true)?;
    require!(
        (MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&next_sqrt_price),
        QuoteError::OutOfBounds
    );

    Ok(next_sqrt_price)
}

/// Get the next sqrt price after a token B delta, rounding down
///
/// Adding token B (selling B, price goes up):
///   new_sqrt_price = sqrt_price + amount / L
///
/// Removing token B (buying B, price goes down):
///   new_sqrt_price = sqrt_price - amount / L
pub fn get_next_sqrt_price_from_b_round_down(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount: u64,
    amount_specified_is_input: bool,
) -> Result<u128> {
    // Rounding the delta up when removing keeps the resulting price rounded down
    let amount_x64 = (amount as u128) << Q64_RESOLUTION;
    let delta = div_round_up_if(amount_x64, liquidity, !amount_specified_is_input)?;

    let next_sqrt_price = if amount_specified_is_input {
        sqrt_price_x64
            .checked_add(delta)
            .ok_or(QuoteError::OutOfBounds)?
    } else {
        sqrt_price_x64
            .checked_sub(delta)
            .ok_or(QuoteError::OutOfBounds)?
    };

    require!(
        (MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&next_sqrt_price),
        QuoteError::OutOfBounds
    );

    Ok(next_sqrt_price)
}

/// Get the next sqrt price for an amount of the swap's fixed token
///
/// The fixed token is token A when `a_to_b == amount_specified_is_input`
/// (exact input of A, or exact output of A), otherwise token B.
pub fn get_next_sqrt_price(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount: u64,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> Result<u128> {
    if amount_specified_is_input == a_to_b {
        get_next_sqrt_price_from_a_round_up(
            sqrt_price_x64,
            liquidity,
            amount,
            amount_specified_is_input,
        )
    } else {
        get_next_sqrt_price_from_b_round_down(
            sqrt_price_x64,
            liquidity,
            amount,
            amount_specified_is_input,
        )
    }
}

/// Square of a Q64.64 sqrt price as a Q64.64 price, truncated
pub fn sqrt_price_squared_x64(sqrt_price_x64: u128) -> Result<u128> {
    let squared = U256::from(sqrt_price_x64) * U256::from(sqrt_price_x64);
    u256_to_u128(squared >> Q64_RESOLUTION as usize)
}
