//! Human price conversion
//!
//! Human prices are `rust_decimal::Decimal`. Their mantissa and scale feed
//! the U512 integer math directly, so converting to and from Q64.64 never
//! goes through floats.

use crate::constants::{MAX_SQRT_PRICE_X64, MIN_SQRT_PRICE_X64};
use crate::errors::QuoteError;
use crate::math::full_math::U512;
use anchor_lang::prelude::*;
use rust_decimal::Decimal;

/// 10^exp as a U512, failing once it no longer fits
pub fn pow10_u512(exp: u32) -> Result<U512> {
    let ten = U512::from(10u8);
    let mut result = U512::one();
    for _ in 0..exp {
        result = result.checked_mul(ten).ok_or(QuoteError::MathOverflow)?;
    }
    Ok(result)
}

/// Unsigned mantissa of a non-negative decimal, `error` otherwise
pub(crate) fn unsigned_mantissa(value: &Decimal, error: QuoteError) -> Result<u128> {
    require!(!value.is_sign_negative() || value.is_zero(), QuoteError::from(error));
    Ok(value.mantissa().unsigned_abs())
}

/// Build a decimal from `mantissa * 10^-scale`, failing past 96 bits or 28 digits
pub(crate) fn decimal_from_parts(mantissa: U512, scale: u32) -> Result<Decimal> {
    require!(mantissa.bits() < 128, QuoteError::MathOverflow);
    Decimal::try_from_i128_with_scale(mantissa.low_u128() as i128, scale)
        .map_err(|_| QuoteError::MathOverflow.into())
}

/// Convert a human price (token B per token A) to a Q64.64 sqrt price
///
/// sqrt_price = floor(sqrt(price * 10^(decimals_b - decimals_a) * 2^128))
pub fn price_to_sqrt_price(price: Decimal, decimals_a: u8, decimals_b: u8) -> Result<u128> {
    require!(!price.is_zero(), QuoteError::InvalidPrice);
    let mantissa = unsigned_mantissa(&price, QuoteError::InvalidPrice)?;

    let numerator = (U512::from(mantissa) << 128) * pow10_u512(decimals_b as u32)?;
    let denominator = pow10_u512(price.scale() + decimals_a as u32)?;
    let sqrt_price = (numerator / denominator).integer_sqrt();

    require!(sqrt_price.bits() <= 128, QuoteError::OutOfBounds);
    let sqrt_price = sqrt_price.low_u128();
    require!(
        (MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&sqrt_price),
        QuoteError::OutOfBounds
    );

    Ok(sqrt_price)
}

/// Convert a Q64.64 sqrt price to a human price with `scale` fractional digits, truncated
///
/// price = sqrt_price^2 * 10^(decimals_a - decimals_b) / 2^128
pub fn sqrt_price_to_price(
    sqrt_price: u128,
    decimals_a: u8,
    decimals_b: u8,
    scale: u32,
) -> Result<Decimal> {
    let squared = U512::from(sqrt_price) * U512::from(sqrt_price);
    let numerator = squared * pow10_u512(decimals_a as u32 + scale)?;
    let denominator = pow10_u512(decimals_b as u32)? << 128;

    decimal_from_parts(numerator / denominator, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::full_math::Q64;
    use crate::math::tick_math::tick_index_to_sqrt_price;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_one_is_q64() {
        assert_eq!(price_to_sqrt_price(Decimal::ONE, 6, 6).unwrap(), Q64);
        // 1 A (9 decimals) = 1 B (6 decimals) means 10^-3 raw B per raw A
        let sqrt_price = price_to_sqrt_price(Decimal::ONE, 9, 6).unwrap();
        let price = sqrt_price_to_price(sqrt_price, 9, 6, 6).unwrap();
        assert_eq!(price, dec!(0.999999));
    }

    #[test]
    fn test_price_four() {
        assert_eq!(price_to_sqrt_price(dec!(4), 0, 0).unwrap(), 2 * Q64);
        assert_eq!(price_to_sqrt_price(dec!(4.000), 0, 0).unwrap(), 2 * Q64);

        let price = sqrt_price_to_price(2 * Q64, 0, 0, 3).unwrap();
        assert_eq!(price, dec!(4));
        assert_eq!(price.scale(), 3);
    }

    #[test]
    fn test_price_from_tick() {
        // 1.0001^100 = 1.010049662...
        let sqrt_price = tick_index_to_sqrt_price(100).unwrap();
        let price = sqrt_price_to_price(sqrt_price, 0, 0, 6).unwrap();
        assert_eq!(price, dec!(1.010049));
    }

    #[test]
    fn test_price_rejected() {
        assert_eq!(
            price_to_sqrt_price(Decimal::ZERO, 6, 6).unwrap_err(),
            QuoteError::InvalidPrice.into()
        );
        assert_eq!(
            price_to_sqrt_price(dec!(-1.5), 6, 6).unwrap_err(),
            QuoteError::InvalidPrice.into()
        );
        assert_eq!(
            price_to_sqrt_price(Decimal::MAX, 0, 0).unwrap_err(),
            QuoteError::OutOfBounds.into()
        );
    }

    #[test]
    fn test_price_beyond_decimal_range() {
        assert_eq!(
            sqrt_price_to_price(MAX_SQRT_PRICE_X64, 0, 0, 10).unwrap_err(),
            QuoteError::MathOverflow.into()
        );
        assert_eq!(
            sqrt_price_to_price(Q64, 0, 0, 29).unwrap_err(),
            QuoteError::MathOverflow.into()
        );
    }
}
