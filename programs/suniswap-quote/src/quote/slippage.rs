use crate::constants::BPS_DENOMINATOR;
use crate::errors::QuoteError;
use crate::math::full_math::{mul_div, mul_div_round_up, u128_to_u64};
use anchor_lang::prelude::*;

pub fn validate_slippage_tolerance(slippage_bps: u16) -> Result<()> {
    require!(slippage_bps <= BPS_DENOMINATOR, QuoteError::InvalidSlippage);
    Ok(())
}

/// Upper bound for an amount the caller pays
/// max = ceil(amount * (10_000 + bps) / 10_000)
pub fn get_max_amount_with_slippage_tolerance(amount: u64, slippage_bps: u16) -> Result<u64> {
    validate_slippage_tolerance(slippage_bps)?;
    let max = mul_div_round_up(
        amount as u128,
        (BPS_DENOMINATOR as u128) + slippage_bps as u128,
        BPS_DENOMINATOR as u128,
    )?;
    u128_to_u64(max)
}

/// Lower bound for an amount the caller receives
/// min = floor(amount * (10_000 - bps) / 10_000)
pub fn get_min_amount_with_slippage_tolerance(amount: u64, slippage_bps: u16) -> Result<u64> {
    validate_slippage_tolerance(slippage_bps)?;
    let min = mul_div(
        amount as u128,
        (BPS_DENOMINATOR - slippage_bps) as u128,
        BPS_DENOMINATOR as u128,
    )?;
    u128_to_u64(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_rounds_up() {
        assert_eq!(get_max_amount_with_slippage_tolerance(1_000, 100).unwrap(), 1_010);
        assert_eq!(get_max_amount_with_slippage_tolerance(999, 100).unwrap(), 1_009);
        assert_eq!(get_max_amount_with_slippage_tolerance(1_000, 0).unwrap(), 1_000);
    }

    #[test]
    fn test_min_rounds_down() {
        assert_eq!(get_min_amount_with_slippage_tolerance(1_000, 100).unwrap(), 990);
        assert_eq!(get_min_amount_with_slippage_tolerance(999, 100).unwrap(), 989);
        assert_eq!(get_min_amount_with_slippage_tolerance(1_000, 10_000).unwrap(), 0);
    }

    #[test]
    fn test_max_overflow() {
        assert_eq!(
            get_max_amount_with_slippage_tolerance(u64::MAX, 1).unwrap_err(),
            QuoteError::AmountExceedsMax.into()
        );
    }

    #[test]
    fn test_invalid_tolerance() {
        assert_eq!(
            get_min_amount_with_slippage_tolerance(1, 10_001).unwrap_err(),
            QuoteError::InvalidSlippage.into()
        );
    }
}
