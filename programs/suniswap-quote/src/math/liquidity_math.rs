//! Liquidity Math
//!
//! Functions for computing token amounts from liquidity and back.

use crate::errors::QuoteError;
use crate::math::full_math::{
    checked_shift_word_left, div_round_up_if, Q64_RESOLUTION, U256, U512,
};
use anchor_lang::prelude::*;

/// A token amount that may not fit in u64
///
/// Swap steps compute the delta to a far target price before knowing whether the
/// step reaches it, so "too large" is a value there rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountDeltaU64 {
    Valid(u64),
    ExceedsMax,
}

impl AmountDeltaU64 {
    pub fn lte(self, other: u64) -> bool {
        match self {
            AmountDeltaU64::Valid(value) => value <= other,
            AmountDeltaU64::ExceedsMax => false,
        }
    }

    pub fn exceeds_max(&self) -> bool {
        matches!(self, AmountDeltaU64::ExceedsMax)
    }

    pub fn value(self) -> Result<u64> {
        match self {
            AmountDeltaU64::Valid(value) => Ok(value),
            AmountDeltaU64::ExceedsMax => Err(QuoteError::AmountExceedsMax.into()),
        }
    }
}

/// Add a signed liquidity delta to existing liquidity
pub fn add_liquidity_delta(liquidity: u128, delta: i128) -> Result<u128> {
    if delta < 0 {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(QuoteError::MathOverflow.into())
    } else {
        liquidity
            .checked_add(delta as u128)
            .ok_or(QuoteError::MathOverflow.into())
    }
}

fn sort_sqrt_prices(sqrt_price_0: u128, sqrt_price_1: u128) -> (u128, u128) {
    if sqrt_price_0 < sqrt_price_1 {
        (sqrt_price_0, sqrt_price_1)
    } else {
        (sqrt_price_1, sqrt_price_0)
    }
}

/// Amount of token A spanned by `liquidity` between two sqrt prices
///
/// amount_a = L * (sp_upper - sp_lower) / (sp_upper * sp_lower)
pub fn try_get_amount_delta_a(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<AmountDeltaU64> {
    let (sqrt_price_lower, sqrt_price_upper) = sort_sqrt_prices(sqrt_price_0, sqrt_price_1);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;

    let numerator = checked_shift_word_left(U256::from(liquidity) * U256::from(sqrt_price_diff))?;
    let denominator = U256::from(sqrt_price_upper) * U256::from(sqrt_price_lower);
    if denominator.is_zero() {
        return Err(QuoteError::DivisionByZero.into());
    }

    let (quotient, remainder) = numerator.div_mod(denominator);
    let result = if round_up && !remainder.is_zero() {
        quotient + U256::one()
    } else {
        quotient
    };

    if result.bits() > 64 {
        return Ok(AmountDeltaU64::ExceedsMax);
    }
    Ok(AmountDeltaU64::Valid(result.low_u64()))
}

/// Amount of token B spanned by `liquidity` between two sqrt prices
///
/// amount_b = L * (sp_upper - sp_lower)
pub fn try_get_amount_delta_b(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<AmountDeltaU64> {
    let (sqrt_price_lower, sqrt_price_upper) = sort_sqrt_prices(sqrt_price_0, sqrt_price_1);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;

    let product = U256::from(liquidity) * U256::from(sqrt_price_diff);
    let quotient = product >> Q64_RESOLUTION as usize;
    let has_remainder = product.low_u64() != 0;

    let result = if round_up && has_remainder {
        quotient + U256::one()
    } else {
        quotient
    };

    if result.bits() > 64 {
        return Ok(AmountDeltaU64::ExceedsMax);
    }
    Ok(AmountDeltaU64::Valid(result.low_u64()))
}

pub fn get_amount_delta_a(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u64> {
    try_get_amount_delta_a(sqrt_price_0, sqrt_price_1, liquidity, round_up)?.value()
}

pub fn get_amount_delta_b(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u64> {
    try_get_amount_delta_b(sqrt_price_0, sqrt_price_1, liquidity, round_up)?.value()
}

/// Liquidity provided by an amount of token A over a price range, rounded down
///
/// L = amount_a * sp_lower * sp_upper / (sp_upper - sp_lower) >> 64
pub fn get_liquidity_from_a(amount_a: u64, sqrt_price_0: u128, sqrt_price_1: u128) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = sort_sqrt_prices(sqrt_price_0, sqrt_price_1);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;
    if sqrt_price_diff == 0 {
        return Err(QuoteError::DivisionByZero.into());
    }

    let product =
        U512::from(amount_a) * U512::from(sqrt_price_lower) * U512::from(sqrt_price_upper);
    let liquidity = (product / U512::from(sqrt_price_diff)) >> Q64_RESOLUTION as usize;

    if liquidity.bits() > 128 {
        return Err(QuoteError::MathOverflow.into());
    }
    Ok(liquidity.low_u128())
}

/// Liquidity provided by an amount of token B over a price range, rounded down
///
/// L = (amount_b << 64) / (sp_upper - sp_lower)
pub fn get_liquidity_from_b(amount_b: u64, sqrt_price_0: u128, sqrt_price_1: u128) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = sort_sqrt_prices(sqrt_price_0, sqrt_price_1);
    let numerator = (amount_b as u128) << Q64_RESOLUTION;
    div_round_up_if(numerator, sqrt_price_upper - sqrt_price_lower, false)
}

/// Token amounts held by `liquidity` in `[sqrt_price_lower, sqrt_price_upper)`
/// with the pool at `sqrt_price_current` and tick `tick_current`
///
/// Which side(s) are populated follows the tick index, so a price sitting
/// exactly on the upper tick counts as above the range.
#[allow(clippy::too_many_arguments)]
pub fn get_amounts_for_liquidity(
    tick_current: i32,
    sqrt_price_current: u128,
    tick_lower: i32,
    tick_upper: i32,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<(u64, u64)> {
    if tick_current < tick_lower {
        let amount_a = get_amount_delta_a(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
        Ok((amount_a, 0))
    } else if tick_current < tick_upper {
        let amount_a =
            get_amount_delta_a(sqrt_price_current, sqrt_price_upper, liquidity, round_up)?;
        let amount_b =
            get_amount_delta_b(sqrt_price_lower, sqrt_price_current, liquidity, round_up)?;
        Ok((amount_a, amount_b))
    } else {
        let amount_b = get_amount_delta_b(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
        Ok((0, amount_b))
    }
}

/// Maximum liquidity that both amounts can back, rounded down
#[allow(clippy::too_many_arguments)]
pub fn get_liquidity_for_amounts(
    tick_current: i32,
    sqrt_price_current: u128,
    tick_lower: i32,
    tick_upper: i32,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    amount_a: u64,
    amount_b: u64,
) -> Result<u128> {
    if tick_current < tick_lower {
        get_liquidity_from_a(amount_a, sqrt_price_lower, sqrt_price_upper)
    } else if tick_current < tick_upper {
        // Sitting exactly on either boundary price, that side spans nothing
        if sqrt_price_current >= sqrt_price_upper {
            return get_liquidity_from_b(amount_b, sqrt_price_lower, sqrt_price_upper);
        }
        let liquidity_a = get_liquidity_from_a(amount_a, sqrt_price_current, sqrt_price_upper)?;
        if sqrt_price_current <= sqrt_price_lower {
            return Ok(liquidity_a);
        }
        let liquidity_b = get_liquidity_from_b(amount_b, sqrt_price_lower, sqrt_price_current)?;
        Ok(liquidity_a.min(liquidity_b))
    } else {
        get_liquidity_from_b(amount_b, sqrt_price_lower, sqrt_price_upper)
    }
}
