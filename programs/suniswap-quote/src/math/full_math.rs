//! Full precision math operations
//!
//! 256-bit and 512-bit intermediates for the Q64.64 liquidity, price and fee
//! calculations. Nothing in the quoting path touches floating point.

use crate::errors::QuoteError;
use anchor_lang::prelude::*;

// Kept out of this module's scope so anchor's prelude `Result` alias does
// not shadow the std `Result` the macro expansion relies on.
mod uints {
    use uint::construct_uint;

    construct_uint! {
        /// 256-bit unsigned integer (4 x 64-bit limbs)
        pub struct U256(4);
    }

    construct_uint! {
        /// 512-bit unsigned integer (8 x 64-bit limbs), used for human price conversions
        pub struct U512(8);
    }
}

pub use uints::{U256, U512};

/// Q64 constant (2^64)
pub const Q64: u128 = 1u128 << 64;

/// Number of fractional bits in a Q64.64 value
pub const Q64_RESOLUTION: u32 = 64;

/// Full 256-bit product of two u128 values
pub fn mul_u256(a: u128, b: u128) -> U256 {
    U256::from(a) * U256::from(b)
}

/// Narrow a U256 to u128, failing if any high bit is set
pub fn u256_to_u128(value: U256) -> Result<u128> {
    if value.bits() > 128 {
        return Err(QuoteError::MathOverflow.into());
    }
    Ok(value.low_u128())
}

/// Narrow a U256 to u64, failing if it does not fit
pub fn u256_to_u64(value: U256) -> Result<u64> {
    if value.bits() > 64 {
        return Err(QuoteError::AmountExceedsMax.into());
    }
    Ok(value.low_u64())
}

/// Narrow a u128 token amount to u64
pub fn u128_to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| QuoteError::AmountExceedsMax.into())
}

/// Shift a U256 left by 64 bits, failing instead of discarding high bits
pub fn checked_shift_word_left(value: U256) -> Result<U256> {
    if value.leading_zeros() < Q64_RESOLUTION {
        return Err(QuoteError::MathOverflow.into());
    }
    Ok(value << Q64_RESOLUTION as usize)
}

/// Divide two U256 values, rounding the quotient up when `round_up` is set and
/// the division leaves a remainder
pub fn div_round_up_if_u256(numerator: U256, denominator: U256, round_up: bool) -> Result<u128> {
    if denominator.is_zero() {
        return Err(QuoteError::DivisionByZero.into());
    }
    let (quotient, remainder) = numerator.div_mod(denominator);
    let quotient = if round_up && !remainder.is_zero() {
        quotient + U256::one()
    } else {
        quotient
    };
    u256_to_u128(quotient)
}

/// Divide two u128 values, optionally rounding up
pub fn div_round_up_if(numerator: u128, denominator: u128, round_up: bool) -> Result<u128> {
    if denominator == 0 {
        return Err(QuoteError::DivisionByZero.into());
    }
    let quotient = numerator / denominator;
    if round_up && numerator % denominator > 0 {
        quotient.checked_add(1).ok_or(QuoteError::MathOverflow.into())
    } else {
        Ok(quotient)
    }
}

/// Multiply two u128 numbers and divide by a third, with full precision
///
/// # Formula
/// result = floor(a * b / denominator)
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    mul_div_round_up_if(a, b, denominator, false)
}

/// Multiply two u128 numbers and divide by a third, rounding up
pub fn mul_div_round_up(a: u128, b: u128, denominator: u128) -> Result<u128> {
    mul_div_round_up_if(a, b, denominator, true)
}

/// Multiply two u128 numbers and divide by a third, rounding up only when asked
pub fn mul_div_round_up_if(a: u128, b: u128, denominator: u128, round_up: bool) -> Result<u128> {
    div_round_up_if_u256(mul_u256(a, b), U256::from(denominator), round_up)
}

/// Calculate (a * b) >> 64, truncating
///
/// Used to turn a Q64.64 growth delta times liquidity into a token amount.
pub fn mul_shift_right_64(a: u128, b: u128) -> Result<u128> {
    u256_to_u128(mul_u256(a, b) >> Q64_RESOLUTION as usize)
}

/// Calculate (a * b) >> 96, the step used by the positive-tick price table
pub fn mul_shift_96(a: u128, b: u128) -> Result<u128> {
    u256_to_u128(mul_u256(a, b) >> 96)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_simple() {
        // 10 * 20 / 5 = 40
        assert_eq!(mul_div(10, 20, 5).unwrap(), 40);
    }

    #[test]
    fn test_mul_div_large() {
        let a = 1_000_000_000_000u128;
        let b = 2_000_000_000_000u128;
        let d = 1_000_000u128;
        assert_eq!(mul_div(a, b, d).unwrap(), 2_000_000_000_000_000_000u128);
    }

    #[test]
    fn test_mul_div_intermediate_overflow() {
        // u128::MAX * 4 / 8 needs a 130-bit intermediate
        assert_eq!(mul_div(u128::MAX, 4, 8).unwrap(), u128::MAX / 2);
    }

    #[test]
    fn test_mul_div_result_overflow() {
        assert_eq!(
            mul_div(u128::MAX, 2, 1).unwrap_err(),
            QuoteError::MathOverflow.into()
        );
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        assert_eq!(
            mul_div(10, 20, 0).unwrap_err(),
            QuoteError::DivisionByZero.into()
        );
    }

    #[test]
    fn test_mul_div_rounding() {
        assert_eq!(mul_div(7, 3, 2).unwrap(), 10);
        assert_eq!(mul_div_round_up(7, 3, 2).unwrap(), 11);
        assert_eq!(mul_div_round_up(8, 3, 2).unwrap(), 12);
    }

    #[test]
    fn test_div_round_up_if() {
        assert_eq!(div_round_up_if(10, 3, false).unwrap(), 3);
        assert_eq!(div_round_up_if(10, 3, true).unwrap(), 4);
        assert_eq!(div_round_up_if(9, 3, true).unwrap(), 3);
    }

    #[test]
    fn test_checked_shift_word_left() {
        let small = U256::from(u128::MAX);
        assert!(checked_shift_word_left(small).is_ok());

        let big = U256::MAX >> 63;
        assert!(checked_shift_word_left(big).is_err());
    }

    #[test]
    fn test_mul_shift_right_64() {
        // 1.5 (Q64.64) * 10 = 15
        let one_and_half = Q64 + Q64 / 2;
        assert_eq!(mul_shift_right_64(one_and_half, 10).unwrap(), 15);
    }

    #[test]
    fn test_narrowing() {
        assert_eq!(u128_to_u64(u64::MAX as u128).unwrap(), u64::MAX);
        assert_eq!(
            u128_to_u64(u64::MAX as u128 + 1).unwrap_err(),
            QuoteError::AmountExceedsMax.into()
        );
        assert!(u256_to_u64(U256::from(u64::MAX) + U256::one()).is_err());
    }
}
