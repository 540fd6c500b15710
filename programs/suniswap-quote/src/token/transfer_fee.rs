//! Transfer fee adjustment
//!
//! A mint with a transfer fee delivers less than the nominal amount sent.
//! Deposits gross the amount up so the pool receives what the math needs;
//! withdrawals report what actually reaches the owner.

use crate::errors::QuoteError;
use crate::token::mint::{ensure_settleable, MintMeta, TransferFee};
use anchor_lang::prelude::*;

/// Direction of a transfer relative to the pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferImpact {
    /// Owner to pool: the sender covers the fee
    Inbound,
    /// Pool to owner: the receiver absorbs the fee
    Outbound,
}

/// Gross amount to send so that `amount - transfer_fee` arrives
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferFeeIncludedAmount {
    pub amount: u64,
    pub transfer_fee: u64,
}

/// Net amount arriving after the fee is withheld
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferFeeExcludedAmount {
    pub amount: u64,
    pub transfer_fee: u64,
}

/// Fee withheld when `amount` is sent
///
/// fee = min(ceil(amount * fee_bps / 10_000), max_fee)
pub fn calculate_transfer_fee(amount: u64, transfer_fee: &TransferFee) -> Result<u64> {
    transfer_fee.validate()?;
    let fee = transfer_fee
        .as_extension()
        .calculate_fee(amount)
        .ok_or(QuoteError::MathOverflow)?;
    Ok(fee)
}

/// Amount that arrives when `amount` is sent
pub fn apply_transfer_fee(
    amount: u64,
    transfer_fee: Option<TransferFee>,
) -> Result<TransferFeeExcludedAmount> {
    let Some(transfer_fee) = transfer_fee else {
        return Ok(TransferFeeExcludedAmount {
            amount,
            transfer_fee: 0,
        });
    };

    let fee = calculate_transfer_fee(amount, &transfer_fee)?;
    Ok(TransferFeeExcludedAmount {
        amount: amount - fee,
        transfer_fee: fee,
    })
}

/// Amount to send so that at least `amount` arrives
///
/// A 100% fee always hits the cap, so the gross amount is `amount + max_fee`.
pub fn reverse_apply_transfer_fee(
    amount: u64,
    transfer_fee: Option<TransferFee>,
) -> Result<TransferFeeIncludedAmount> {
    let Some(transfer_fee) = transfer_fee else {
        return Ok(TransferFeeIncludedAmount {
            amount,
            transfer_fee: 0,
        });
    };
    transfer_fee.validate()?;

    let gross = transfer_fee
        .as_extension()
        .calculate_pre_fee_amount(amount)
        .ok_or(QuoteError::AmountExceedsMax)?;

    Ok(TransferFeeIncludedAmount {
        amount: gross,
        transfer_fee: gross - amount,
    })
}

/// Amount that actually moves for a nominal transfer of `meta`'s token
///
/// Inbound returns the gross amount the owner must send, Outbound the net
/// amount the owner receives.
pub fn adjust_for_transfer_impact(
    nominal_amount: u64,
    meta: &MintMeta,
    impact: TransferImpact,
) -> Result<u64> {
    ensure_settleable(meta)?;
    match impact {
        TransferImpact::Inbound => {
            Ok(reverse_apply_transfer_fee(nominal_amount, meta.transfer_fee)?.amount)
        }
        TransferImpact::Outbound => Ok(apply_transfer_fee(nominal_amount, meta.transfer_fee)?.amount),
    }
}
