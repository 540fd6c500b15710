//! Reposition quoting
//!
//! Moving a position withdraws its liquidity from the old range and deposits
//! into the new one in a single settlement. Tokens that stay inside the pool
//! never pay a transfer fee, so both legs are quoted in nominal units and only
//! the per-token difference is adjusted for what actually moves.

use crate::constants::NUM_REWARDS;
use crate::errors::QuoteError;
use crate::math::liquidity_math::get_liquidity_for_amounts;
use crate::math::tick_math::{tick_index_to_sqrt_price, validate_tick_range};
use crate::quote::liquidity::{
    decrease_quote, increase_quote, position_status, DecreaseLiquidityQuote,
    IncreaseLiquidityQuote, PositionStatus,
};
use crate::state::{PoolSnapshot, Position, PositionRewardInfo};
use crate::token::{
    apply_transfer_fee, pool_transfer_fees, reverse_apply_transfer_fee, MintPair, TransferFee,
};
use anchor_lang::prelude::*;

/// How much liquidity the new range should receive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositionTarget {
    /// Exactly this much liquidity
    Liquidity(u128),
    /// As much as the withdrawn tokens plus the owner's extra deposit can back
    FromWithdrawn { extra_a: u64, extra_b: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositionParams {
    pub new_tick_lower_index: i32,
    pub new_tick_upper_index: i32,
    pub target: RepositionTarget,
    pub slippage_bps: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransferDirection {
    OwnerToPool,
    PoolToOwner,
    #[default]
    None,
}

/// Net movement of one token after withdrawal and deposit are offset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetTransfer {
    pub direction: TransferDirection,
    /// Sent by the owner (fee included) or received by the owner (fee excluded)
    pub amount: u64,
    /// Most the owner may send, or least the owner may receive, under slippage
    pub threshold: u64,
    pub transfer_fee: u64,
}

/// Accrual state the new position inherits as is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarriedAccruals {
    pub fee_owed_a: u64,
    pub fee_owed_b: u64,
    pub fee_growth_checkpoint_a: u128,
    pub fee_growth_checkpoint_b: u128,
    pub reward_infos: [PositionRewardInfo; NUM_REWARDS],
}

impl CarriedAccruals {
    fn from_position(position: &Position) -> Self {
        Self {
            fee_owed_a: position.fee_owed_a,
            fee_owed_b: position.fee_owed_b,
            fee_growth_checkpoint_a: position.fee_growth_checkpoint_a,
            fee_growth_checkpoint_b: position.fee_growth_checkpoint_b,
            reward_infos: position.reward_infos,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositionQuote {
    /// Old range at full position liquidity, in nominal units
    pub decrease: DecreaseLiquidityQuote,
    /// New range, in nominal units
    pub increase: IncreaseLiquidityQuote,
    pub new_status: PositionStatus,
    pub transfer_a: NetTransfer,
    pub transfer_b: NetTransfer,
    pub carried: CarriedAccruals,
}

fn net_transfer(
    deposit_est: u64,
    deposit_max: u64,
    withdraw_est: u64,
    withdraw_min: u64,
    transfer_fee: Option<TransferFee>,
) -> Result<NetTransfer> {
    if deposit_est > withdraw_est {
        let sent = reverse_apply_transfer_fee(deposit_est - withdraw_est, transfer_fee)?;
        let worst = reverse_apply_transfer_fee(deposit_max.saturating_sub(withdraw_min), transfer_fee)?;
        Ok(NetTransfer {
            direction: TransferDirection::OwnerToPool,
            amount: sent.amount,
            threshold: worst.amount,
            transfer_fee: sent.transfer_fee,
        })
    } else if withdraw_est > deposit_est {
        let received = apply_transfer_fee(withdraw_est - deposit_est, transfer_fee)?;
        let worst = apply_transfer_fee(withdraw_min.saturating_sub(deposit_max), transfer_fee)?;
        Ok(NetTransfer {
            direction: TransferDirection::PoolToOwner,
            amount: received.amount,
            threshold: worst.amount,
            transfer_fee: received.transfer_fee,
        })
    } else {
        Ok(NetTransfer::default())
    }
}

/// Quote moving `position` to a new range
///
/// Fees and rewards owed, and their checkpoints, carry over unchanged; the
/// caller collects or settles them separately.
pub fn quote_reposition(
    pool: &PoolSnapshot,
    position: &Position,
    params: &RepositionParams,
    mints: Option<&MintPair>,
) -> Result<RepositionQuote> {
    pool.validate()?;
    position.validate(pool)?;
    validate_tick_range(
        params.new_tick_lower_index,
        params.new_tick_upper_index,
        pool.tick_spacing,
    )?;
    require!(
        params.new_tick_lower_index != position.tick_lower_index
            || params.new_tick_upper_index != position.tick_upper_index,
        QuoteError::SameRange
    );
    let (transfer_fee_a, transfer_fee_b) = pool_transfer_fees(pool, mints)?;

    let decrease = decrease_quote(
        pool,
        position.tick_lower_index,
        position.tick_upper_index,
        position.liquidity,
        params.slippage_bps,
        None,
        None,
    )?;

    let new_liquidity = match params.target {
        RepositionTarget::Liquidity(liquidity) => liquidity,
        RepositionTarget::FromWithdrawn { extra_a, extra_b } => {
            let available_a = decrease
                .token_est_a
                .checked_add(apply_transfer_fee(extra_a, transfer_fee_a)?.amount)
                .ok_or(QuoteError::AmountExceedsMax)?;
            let available_b = decrease
                .token_est_b
                .checked_add(apply_transfer_fee(extra_b, transfer_fee_b)?.amount)
                .ok_or(QuoteError::AmountExceedsMax)?;
            get_liquidity_for_amounts(
                pool.tick_current_index,
                pool.sqrt_price,
                params.new_tick_lower_index,
                params.new_tick_upper_index,
                tick_index_to_sqrt_price(params.new_tick_lower_index)?,
                tick_index_to_sqrt_price(params.new_tick_upper_index)?,
                available_a,
                available_b,
            )?
        }
    };

    let increase = increase_quote(
        pool,
        params.new_tick_lower_index,
        params.new_tick_upper_index,
        new_liquidity,
        params.slippage_bps,
        None,
        None,
    )?;

    let transfer_a = net_transfer(
        increase.token_est_a,
        increase.token_max_a,
        decrease.token_est_a,
        decrease.token_min_a,
        transfer_fee_a,
    )?;
    let transfer_b = net_transfer(
        increase.token_est_b,
        increase.token_max_b,
        decrease.token_est_b,
        decrease.token_min_b,
        transfer_fee_b,
    )?;

    #[cfg(feature = "quote-logs")]
    {
        msg!("Reposition quote: position {}", position.address);
        msg!(
            "Range: [{}, {}) -> [{}, {})",
            position.tick_lower_index,
            position.tick_upper_index,
            params.new_tick_lower_index,
            params.new_tick_upper_index
        );
        msg!("Liquidity: {} -> {}", position.liquidity, new_liquidity);
    }

    Ok(RepositionQuote {
        decrease,
        increase,
        new_status: position_status(
            pool.tick_current_index,
            params.new_tick_lower_index,
            params.new_tick_upper_index,
        ),
        transfer_a,
        transfer_b,
        carried: CarriedAccruals::from_position(position),
    })
}
