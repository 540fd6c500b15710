use crate::errors::QuoteError;
use crate::math::liquidity_math::{get_amounts_for_liquidity, get_liquidity_from_a, get_liquidity_from_b};
use crate::math::tick_math::{tick_index_to_sqrt_price, validate_tick_range};
use crate::quote::slippage::{
    get_max_amount_with_slippage_tolerance, get_min_amount_with_slippage_tolerance,
};
use crate::state::{PoolSnapshot, Position};
use crate::token::{
    apply_transfer_fee, pool_transfer_fees, reverse_apply_transfer_fee, MintPair, TransferFee,
};
use anchor_lang::prelude::*;

/// Where the pool price sits relative to a range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionStatus {
    /// Range is above the price, held entirely in token A
    PriceBelowRange,
    PriceInRange,
    /// Range is below the price, held entirely in token B
    PriceAboveRange,
}

pub fn position_status(tick_current_index: i32, tick_lower_index: i32, tick_upper_index: i32) -> PositionStatus {
    if tick_current_index < tick_lower_index {
        PositionStatus::PriceBelowRange
    } else if tick_current_index < tick_upper_index {
        PositionStatus::PriceInRange
    } else {
        PositionStatus::PriceAboveRange
    }
}

/// Deposit needed to add `liquidity_amount` to a range
///
/// `token_est_*` and `token_max_*` include any inbound transfer fee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncreaseLiquidityQuote {
    pub liquidity_amount: u128,
    pub token_est_a: u64,
    pub token_est_b: u64,
    pub token_max_a: u64,
    pub token_max_b: u64,
}

/// Tokens released by removing `liquidity_amount` from a position
///
/// `token_est_*` and `token_min_*` are net of any outbound transfer fee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecreaseLiquidityQuote {
    pub liquidity_amount: u128,
    pub token_est_a: u64,
    pub token_est_b: u64,
    pub token_min_a: u64,
    pub token_min_b: u64,
}

/// Nominal token amounts `liquidity` represents in a range at the pool price
pub(crate) fn range_amounts(
    pool: &PoolSnapshot,
    tick_lower_index: i32,
    tick_upper_index: i32,
    liquidity: u128,
    round_up: bool,
) -> Result<(u64, u64)> {
    get_amounts_for_liquidity(
        pool.tick_current_index,
        pool.sqrt_price,
        tick_lower_index,
        tick_upper_index,
        tick_index_to_sqrt_price(tick_lower_index)?,
        tick_index_to_sqrt_price(tick_upper_index)?,
        liquidity,
        round_up,
    )
}

pub(crate) fn increase_quote(
    pool: &PoolSnapshot,
    tick_lower_index: i32,
    tick_upper_index: i32,
    liquidity: u128,
    slippage_bps: u16,
    transfer_fee_a: Option<TransferFee>,
    transfer_fee_b: Option<TransferFee>,
) -> Result<IncreaseLiquidityQuote> {
    let (est_a, est_b) = range_amounts(pool, tick_lower_index, tick_upper_index, liquidity, true)?;
    let max_a = get_max_amount_with_slippage_tolerance(est_a, slippage_bps)?;
    let max_b = get_max_amount_with_slippage_tolerance(est_b, slippage_bps)?;

    Ok(IncreaseLiquidityQuote {
        liquidity_amount: liquidity,
        token_est_a: reverse_apply_transfer_fee(est_a, transfer_fee_a)?.amount,
        token_est_b: reverse_apply_transfer_fee(est_b, transfer_fee_b)?.amount,
        token_max_a: reverse_apply_transfer_fee(max_a, transfer_fee_a)?.amount,
        token_max_b: reverse_apply_transfer_fee(max_b, transfer_fee_b)?.amount,
    })
}

pub(crate) fn decrease_quote(
    pool: &PoolSnapshot,
    tick_lower_index: i32,
    tick_upper_index: i32,
    liquidity: u128,
    slippage_bps: u16,
    transfer_fee_a: Option<TransferFee>,
    transfer_fee_b: Option<TransferFee>,
) -> Result<DecreaseLiquidityQuote> {
    let (est_a, est_b) = range_amounts(pool, tick_lower_index, tick_upper_index, liquidity, false)?;
    let min_a = get_min_amount_with_slippage_tolerance(est_a, slippage_bps)?;
    let min_b = get_min_amount_with_slippage_tolerance(est_b, slippage_bps)?;

    Ok(DecreaseLiquidityQuote {
        liquidity_amount: liquidity,
        token_est_a: apply_transfer_fee(est_a, transfer_fee_a)?.amount,
        token_est_b: apply_transfer_fee(est_b, transfer_fee_b)?.amount,
        token_min_a: apply_transfer_fee(min_a, transfer_fee_a)?.amount,
        token_min_b: apply_transfer_fee(min_b, transfer_fee_b)?.amount,
    })
}

/// Deposit for a given liquidity amount, rounded up
pub fn quote_increase_liquidity_by_liquidity(
    pool: &PoolSnapshot,
    tick_lower_index: i32,
    tick_upper_index: i32,
    liquidity: u128,
    slippage_bps: u16,
    mints: Option<&MintPair>,
) -> Result<IncreaseLiquidityQuote> {
    pool.validate()?;
    validate_tick_range(tick_lower_index, tick_upper_index, pool.tick_spacing)?;
    let (transfer_fee_a, transfer_fee_b) = pool_transfer_fees(pool, mints)?;

    increase_quote(
        pool,
        tick_lower_index,
        tick_upper_index,
        liquidity,
        slippage_bps,
        transfer_fee_a,
        transfer_fee_b,
    )
}

/// Largest liquidity one side's deposit can back, with the other side derived
///
/// `amount` is what the owner sends; the transfer fee is taken off before the
/// liquidity is solved. A token the range cannot use at the current price
/// yields an empty quote.
pub fn quote_increase_liquidity_by_input_token(
    pool: &PoolSnapshot,
    tick_lower_index: i32,
    tick_upper_index: i32,
    input_mint: &Pubkey,
    amount: u64,
    slippage_bps: u16,
    mints: Option<&MintPair>,
) -> Result<IncreaseLiquidityQuote> {
    pool.validate()?;
    validate_tick_range(tick_lower_index, tick_upper_index, pool.tick_spacing)?;
    let (transfer_fee_a, transfer_fee_b) = pool_transfer_fees(pool, mints)?;
    let is_token_a = pool.is_token_a(input_mint)?;

    let input_fee = if is_token_a { transfer_fee_a } else { transfer_fee_b };
    let deposited = apply_transfer_fee(amount, input_fee)?.amount;

    let sqrt_price_lower = tick_index_to_sqrt_price(tick_lower_index)?;
    let sqrt_price_upper = tick_index_to_sqrt_price(tick_upper_index)?;
    let status = position_status(pool.tick_current_index, tick_lower_index, tick_upper_index);

    let liquidity = match (status, is_token_a) {
        (PositionStatus::PriceBelowRange, true) => {
            get_liquidity_from_a(deposited, sqrt_price_lower, sqrt_price_upper)?
        }
        (PositionStatus::PriceInRange, true) if pool.sqrt_price < sqrt_price_upper => {
            get_liquidity_from_a(deposited, pool.sqrt_price, sqrt_price_upper)?
        }
        (PositionStatus::PriceInRange, false) if pool.sqrt_price > sqrt_price_lower => {
            get_liquidity_from_b(deposited, sqrt_price_lower, pool.sqrt_price)?
        }
        (PositionStatus::PriceAboveRange, false) => {
            get_liquidity_from_b(deposited, sqrt_price_lower, sqrt_price_upper)?
        }
        _ => 0,
    };

    let quote = increase_quote(
        pool,
        tick_lower_index,
        tick_upper_index,
        liquidity,
        slippage_bps,
        transfer_fee_a,
        transfer_fee_b,
    )?;

    #[cfg(feature = "quote-logs")]
    msg!(
        "Increase liquidity quote: [{}, {}) liquidity {} est a={} b={}",
        tick_lower_index,
        tick_upper_index,
        quote.liquidity_amount,
        quote.token_est_a,
        quote.token_est_b
    );

    Ok(quote)
}

/// Withdrawal for removing `liquidity` from `position`, rounded down
pub fn quote_decrease_liquidity_by_liquidity(
    pool: &PoolSnapshot,
    position: &Position,
    liquidity: u128,
    slippage_bps: u16,
    mints: Option<&MintPair>,
) -> Result<DecreaseLiquidityQuote> {
    pool.validate()?;
    position.validate(pool)?;
    require!(liquidity <= position.liquidity, QuoteError::MathOverflow);
    let (transfer_fee_a, transfer_fee_b) = pool_transfer_fees(pool, mints)?;

    decrease_quote(
        pool,
        position.tick_lower_index,
        position.tick_upper_index,
        liquidity,
        slippage_bps,
        transfer_fee_a,
        transfer_fee_b,
    )
}

/// Liquidity to remove so that about `amount` of `output_mint` reaches the owner
///
/// Capped at the position's liquidity. A token the range does not hold at the
/// current price yields an empty quote.
pub fn quote_decrease_liquidity_by_token(
    pool: &PoolSnapshot,
    position: &Position,
    output_mint: &Pubkey,
    amount: u64,
    slippage_bps: u16,
    mints: Option<&MintPair>,
) -> Result<DecreaseLiquidityQuote> {
    pool.validate()?;
    position.validate(pool)?;
    let (transfer_fee_a, transfer_fee_b) = pool_transfer_fees(pool, mints)?;
    let is_token_a = pool.is_token_a(output_mint)?;

    let output_fee = if is_token_a { transfer_fee_a } else { transfer_fee_b };
    let withdrawn = reverse_apply_transfer_fee(amount, output_fee)?.amount;

    let sqrt_price_lower = tick_index_to_sqrt_price(position.tick_lower_index)?;
    let sqrt_price_upper = tick_index_to_sqrt_price(position.tick_upper_index)?;
    let status = position_status(
        pool.tick_current_index,
        position.tick_lower_index,
        position.tick_upper_index,
    );

    let liquidity = match (status, is_token_a) {
        (PositionStatus::PriceBelowRange, true) => {
            get_liquidity_from_a(withdrawn, sqrt_price_lower, sqrt_price_upper)?
        }
        (PositionStatus::PriceInRange, true) if pool.sqrt_price < sqrt_price_upper => {
            get_liquidity_from_a(withdrawn, pool.sqrt_price, sqrt_price_upper)?
        }
        (PositionStatus::PriceInRange, false) if pool.sqrt_price > sqrt_price_lower => {
            get_liquidity_from_b(withdrawn, sqrt_price_lower, pool.sqrt_price)?
        }
        (PositionStatus::PriceAboveRange, false) => {
            get_liquidity_from_b(withdrawn, sqrt_price_lower, sqrt_price_upper)?
        }
        _ => 0,
    };

    decrease_quote(
        pool,
        position.tick_lower_index,
        position.tick_upper_index,
        liquidity.min(position.liquidity),
        slippage_bps,
        transfer_fee_a,
        transfer_fee_b,
    )
}
