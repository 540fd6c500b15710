use crate::errors::QuoteError;
use crate::math::full_math::{mul_shift_right_64, u128_to_u64};
use crate::state::{PoolSnapshot, Position, Tick};
use crate::token::{apply_transfer_fee, pool_transfer_fees, MintPair};
use anchor_lang::prelude::*;

/// Fees a position could collect right now, without mutating it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeesQuote {
    pub fee_owed_a: u64,
    pub fee_owed_b: u64,
}

/// Fees as they arrive in the owner's accounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectFeesQuote {
    pub fee_owed_a: u64,
    pub fee_owed_b: u64,
    pub transfer_fee_a: u64,
    pub transfer_fee_b: u64,
}

/// Accrual of `liquidity` over a growth delta, Q64.64 growth truncated to tokens
///
/// The growth delta is taken mod 2^128 since both growth values wrap.
pub(crate) fn accrued_amount(
    growth_inside: u128,
    growth_checkpoint: u128,
    liquidity: u128,
) -> Result<u64> {
    let growth_delta = growth_inside.wrapping_sub(growth_checkpoint);
    u128_to_u64(mul_shift_right_64(growth_delta, liquidity)?)
}

fn check_position_ticks(position: &Position, tick_lower: &Tick, tick_upper: &Tick) -> Result<()> {
    // A position always references both of its ticks
    if position.has_liquidity() {
        require!(
            tick_lower.initialized && tick_upper.initialized,
            QuoteError::TickArrayNotSupplied
        );
    }
    Ok(())
}

/// Fees owed to `position` at the pool's current growth
pub fn quote_fees(
    pool: &PoolSnapshot,
    position: &Position,
    tick_lower: &Tick,
    tick_upper: &Tick,
) -> Result<FeesQuote> {
    pool.validate()?;
    position.validate(pool)?;
    check_position_ticks(position, tick_lower, tick_upper)?;

    let (fee_growth_inside_a, fee_growth_inside_b) = Tick::fee_growths_inside(
        pool.tick_current_index,
        position.tick_lower_index,
        tick_lower,
        position.tick_upper_index,
        tick_upper,
        pool.fee_growth_global_a,
        pool.fee_growth_global_b,
    );

    let delta_a = accrued_amount(
        fee_growth_inside_a,
        position.fee_growth_checkpoint_a,
        position.liquidity,
    )?;
    let delta_b = accrued_amount(
        fee_growth_inside_b,
        position.fee_growth_checkpoint_b,
        position.liquidity,
    )?;

    Ok(FeesQuote {
        // Overflow past u64 wraps, as the settlement program does
        fee_owed_a: position.fee_owed_a.wrapping_add(delta_a),
        fee_owed_b: position.fee_owed_b.wrapping_add(delta_b),
    })
}

/// [`quote_fees`] net of the transfer fees withheld on the way to the owner
pub fn quote_collect_fees(
    pool: &PoolSnapshot,
    position: &Position,
    tick_lower: &Tick,
    tick_upper: &Tick,
    mints: Option<&MintPair>,
) -> Result<CollectFeesQuote> {
    let (transfer_fee_a, transfer_fee_b) = pool_transfer_fees(pool, mints)?;
    let fees = quote_fees(pool, position, tick_lower, tick_upper)?;

    let received_a = apply_transfer_fee(fees.fee_owed_a, transfer_fee_a)?;
    let received_b = apply_transfer_fee(fees.fee_owed_b, transfer_fee_b)?;

    #[cfg(feature = "quote-logs")]
    msg!(
        "Collect fees quote: position {} a={} b={}",
        position.address,
        received_a.amount,
        received_b.amount
    );

    Ok(CollectFeesQuote {
        fee_owed_a: received_a.amount,
        fee_owed_b: received_b.amount,
        transfer_fee_a: received_a.transfer_fee,
        transfer_fee_b: received_b.transfer_fee,
    })
}
