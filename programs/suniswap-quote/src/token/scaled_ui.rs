//! Raw / UI amount conversion
//!
//! Engine math runs on raw ledger units only. UI amounts, including the
//! display multiplier of scaled-UI-amount mints, exist only at this boundary.

use crate::errors::QuoteError;
use crate::math::decimal::{pow10_u512, unsigned_mantissa};
use crate::math::full_math::U512;
use crate::token::mint::MintMeta;
use anchor_lang::prelude::*;
use rust_decimal::Decimal;

fn ui_multiplier(meta: &MintMeta) -> Result<Decimal> {
    let multiplier = meta.scaled_ui_multiplier.unwrap_or(Decimal::ONE);
    require!(
        multiplier.is_sign_positive() && !multiplier.is_zero(),
        QuoteError::InvalidUiMultiplier
    );
    Ok(multiplier)
}

/// ui = raw * multiplier / 10^decimals
pub fn raw_to_ui_amount(raw_amount: u64, meta: &MintMeta) -> Result<Decimal> {
    let multiplier = ui_multiplier(meta)?;
    let raw = Decimal::try_from_i128_with_scale(raw_amount as i128, meta.decimals as u32)
        .map_err(|_| QuoteError::MathOverflow)?;
    let ui = raw.checked_mul(multiplier).ok_or(QuoteError::MathOverflow)?;
    Ok(ui.normalize())
}

/// raw = floor(ui * 10^decimals / multiplier)
pub fn ui_amount_to_raw(ui_amount: Decimal, meta: &MintMeta) -> Result<u64> {
    let multiplier = ui_multiplier(meta)?;
    let ui_mantissa = unsigned_mantissa(&ui_amount, QuoteError::InvalidUiAmount)?;

    let numerator =
        U512::from(ui_mantissa) * pow10_u512(meta.decimals as u32 + multiplier.scale())?;
    let denominator =
        U512::from(multiplier.mantissa().unsigned_abs()) * pow10_u512(ui_amount.scale())?;
    let raw = numerator / denominator;

    require!(raw.bits() <= 64, QuoteError::AmountExceedsMax);
    Ok(raw.low_u64())
}
