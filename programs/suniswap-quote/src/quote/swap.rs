//! Swap simulation
//!
//! Walks the same step loop the settlement program runs, over a pool snapshot
//! and the tick arrays the caller supplied, and reports the state the pool
//! would end in. Nothing is mutated.

use crate::config::QuoteConfig;
use crate::constants::{
    MAX_FEE_RATE, MAX_SQRT_PRICE_X64, MIN_SQRT_PRICE_X64, NO_EXPLICIT_SQRT_PRICE_LIMIT,
    NUM_REWARDS,
};
use crate::errors::QuoteError;
use crate::math::liquidity_math::add_liquidity_delta;
use crate::math::swap_math::{calculate_fee_growth, calculate_protocol_fee, compute_swap_step};
use crate::math::tick_math::{sqrt_price_to_tick_index, tick_index_to_sqrt_price};
use crate::quote::rewards::next_reward_infos;
use crate::quote::slippage::{
    get_max_amount_with_slippage_tolerance, get_min_amount_with_slippage_tolerance,
};
use crate::state::{PoolSnapshot, RewardInfo, Tick, TickArray, TickArraySequence};
use crate::token::{
    apply_transfer_fee, pool_transfer_fees, reverse_apply_transfer_fee, MintPair,
};
use anchor_lang::prelude::*;

/// Swap request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapParams {
    pub amount: u64,
    /// true: `amount` is the exact input, false: the exact output
    pub amount_specified_is_input: bool,
    /// true: sell token A for token B, the price falls
    pub a_to_b: bool,
    /// `NO_EXPLICIT_SQRT_PRICE_LIMIT` means the global price bound
    pub sqrt_price_limit: u128,
    /// Overrides the pool's fee rate when set
    pub fee_rate: Option<u16>,
    /// Project reward growth to this time before crossing ticks
    pub timestamp: Option<u64>,
}

impl SwapParams {
    pub fn exact_input(amount: u64, a_to_b: bool) -> Self {
        Self {
            amount,
            amount_specified_is_input: true,
            a_to_b,
            sqrt_price_limit: NO_EXPLICIT_SQRT_PRICE_LIMIT,
            fee_rate: None,
            timestamp: None,
        }
    }

    pub fn exact_output(amount: u64, a_to_b: bool) -> Self {
        Self {
            amount_specified_is_input: false,
            ..Self::exact_input(amount, a_to_b)
        }
    }

    pub fn with_sqrt_price_limit(mut self, sqrt_price_limit: u128) -> Self {
        self.sqrt_price_limit = sqrt_price_limit;
        self
    }

    pub fn with_fee_rate(mut self, fee_rate: u16) -> Self {
        self.fee_rate = Some(fee_rate);
        self
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// An initialized tick the swap crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickCrossing {
    pub tick_index: i32,
    /// The tick's stored liquidity_net, before applying the swap direction
    pub liquidity_net: i128,
    /// Active liquidity once the tick is crossed
    pub liquidity_after: u128,
    /// The tick with its outside values flipped
    pub tick: Tick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapResult {
    /// Input consumed, fee included
    pub amount_in: u64,
    pub amount_out: u64,
    pub total_fee: u64,
    pub protocol_fee: u64,
    pub end_sqrt_price: u128,
    pub end_tick_index: i32,
    pub end_liquidity: u128,
    pub crossed_tick_count: u32,
    pub ticks_crossed: Vec<TickCrossing>,
    pub next_fee_growth_global_a: u128,
    pub next_fee_growth_global_b: u128,
    pub next_reward_infos: [RewardInfo; NUM_REWARDS],
    /// An explicit price limit stopped the swap before the amount was used up
    pub is_partial_fill: bool,
    /// Slot of the pool snapshot the simulation started from
    pub slot: u64,
}

fn resolve_sqrt_price_limit(pool: &PoolSnapshot, sqrt_price_limit: u128, a_to_b: bool) -> Result<u128> {
    let sqrt_price_limit = if sqrt_price_limit == NO_EXPLICIT_SQRT_PRICE_LIMIT {
        if a_to_b {
            MIN_SQRT_PRICE_X64
        } else {
            MAX_SQRT_PRICE_X64
        }
    } else {
        sqrt_price_limit
    };

    require!(
        (MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&sqrt_price_limit),
        QuoteError::OutOfBounds
    );
    if a_to_b {
        require!(
            sqrt_price_limit <= pool.sqrt_price,
            QuoteError::InvalidSqrtPriceLimitDirection
        );
    } else {
        require!(
            sqrt_price_limit >= pool.sqrt_price,
            QuoteError::InvalidSqrtPriceLimitDirection
        );
    }

    Ok(sqrt_price_limit)
}

/// Simulate a swap against `pool` using the supplied tick arrays
pub fn simulate_swap(
    pool: &PoolSnapshot,
    tick_arrays: &[TickArray],
    params: &SwapParams,
    config: &QuoteConfig,
) -> Result<SwapResult> {
    config.validate()?;
    pool.validate()?;
    require!(params.amount > 0, QuoteError::ZeroTradableAmount);

    let fee_rate = params.fee_rate.unwrap_or(pool.fee_rate);
    require!(fee_rate <= MAX_FEE_RATE, QuoteError::InvalidFeeRate);

    let a_to_b = params.a_to_b;
    let amount_specified_is_input = params.amount_specified_is_input;
    let explicit_limit = params.sqrt_price_limit != NO_EXPLICIT_SQRT_PRICE_LIMIT;
    let sqrt_price_limit = resolve_sqrt_price_limit(pool, params.sqrt_price_limit, a_to_b)?;

    let sequence = TickArraySequence::new(pool, tick_arrays, config)?;
    let step_budget = config.max_swap_steps.min(sequence.max_swap_steps());

    let reward_infos = match params.timestamp {
        Some(timestamp) => next_reward_infos(pool, timestamp)?,
        None => pool.reward_infos,
    };

    let mut amount_remaining = params.amount;
    let mut amount_calculated: u64 = 0;
    let mut curr_sqrt_price = pool.sqrt_price;
    let mut curr_tick_index = pool.tick_current_index;
    let mut curr_liquidity = pool.liquidity;
    let mut fee_growth_global_a = pool.fee_growth_global_a;
    let mut fee_growth_global_b = pool.fee_growth_global_b;
    let mut total_fee: u64 = 0;
    let mut protocol_fee: u64 = 0;
    let mut ticks_crossed = Vec::new();
    let mut steps: u32 = 0;

    while amount_remaining > 0 && curr_sqrt_price != sqrt_price_limit {
        require!(steps < step_budget, QuoteError::IterationLimitExceeded);
        steps += 1;

        let (next_tick_index, next_tick_initialized) =
            sequence.next_swap_target_tick(curr_tick_index, a_to_b)?;
        let next_tick_sqrt_price = tick_index_to_sqrt_price(next_tick_index)?;
        let sqrt_price_target = if a_to_b {
            next_tick_sqrt_price.max(sqrt_price_limit)
        } else {
            next_tick_sqrt_price.min(sqrt_price_limit)
        };

        let step = compute_swap_step(
            amount_remaining,
            fee_rate,
            curr_liquidity,
            curr_sqrt_price,
            sqrt_price_target,
            amount_specified_is_input,
            a_to_b,
        )?;

        if amount_specified_is_input {
            amount_remaining = amount_remaining
                .checked_sub(step.amount_in)
                .and_then(|remaining| remaining.checked_sub(step.fee_amount))
                .ok_or(QuoteError::MathOverflow)?;
            amount_calculated = amount_calculated
                .checked_add(step.amount_out)
                .ok_or(QuoteError::AmountExceedsMax)?;
        } else {
            amount_remaining = amount_remaining
                .checked_sub(step.amount_out)
                .ok_or(QuoteError::MathOverflow)?;
            amount_calculated = amount_calculated
                .checked_add(step.amount_in)
                .and_then(|calculated| calculated.checked_add(step.fee_amount))
                .ok_or(QuoteError::AmountExceedsMax)?;
        }

        // Fees accrue in the input token
        let step_protocol_fee = calculate_protocol_fee(step.fee_amount, pool.protocol_fee_rate)?;
        let fee_growth = calculate_fee_growth(step.fee_amount - step_protocol_fee, curr_liquidity)?;
        if a_to_b {
            fee_growth_global_a = fee_growth_global_a.wrapping_add(fee_growth);
        } else {
            fee_growth_global_b = fee_growth_global_b.wrapping_add(fee_growth);
        }
        total_fee = total_fee
            .checked_add(step.fee_amount)
            .ok_or(QuoteError::AmountExceedsMax)?;
        protocol_fee = protocol_fee
            .checked_add(step_protocol_fee)
            .ok_or(QuoteError::AmountExceedsMax)?;

        if step.next_sqrt_price == next_tick_sqrt_price {
            if next_tick_initialized {
                let tick = sequence.get_tick(next_tick_index)?;
                let crossed = tick.cross_update(fee_growth_global_a, fee_growth_global_b, &reward_infos);

                let liquidity_delta = if a_to_b {
                    tick.liquidity_net
                        .checked_neg()
                        .ok_or(QuoteError::MathOverflow)?
                } else {
                    tick.liquidity_net
                };
                curr_liquidity = add_liquidity_delta(curr_liquidity, liquidity_delta)?;

                ticks_crossed.push(TickCrossing {
                    tick_index: next_tick_index,
                    liquidity_net: tick.liquidity_net,
                    liquidity_after: curr_liquidity,
                    tick: crossed,
                });
            }

            curr_tick_index = if a_to_b {
                next_tick_index - 1
            } else {
                next_tick_index
            };
        } else if step.next_sqrt_price != curr_sqrt_price {
            curr_tick_index = sqrt_price_to_tick_index(step.next_sqrt_price)?;
        }

        curr_sqrt_price = step.next_sqrt_price;
    }

    // Running into the global price bound is not a fill the caller asked for
    require!(
        amount_remaining == 0 || explicit_limit,
        QuoteError::InsufficientLiquidity
    );

    let amount_specified_used = params.amount - amount_remaining;
    let (amount_in, amount_out) = if amount_specified_is_input {
        (amount_specified_used, amount_calculated)
    } else {
        (amount_calculated, amount_specified_used)
    };

    #[cfg(feature = "quote-logs")]
    {
        msg!("Swap simulated: pool {}", pool.address);
        msg!("Amount in: {}, amount out: {}, fee: {}", amount_in, amount_out, total_fee);
        msg!("Ticks crossed: {}, steps: {}", ticks_crossed.len(), steps);
    }

    Ok(SwapResult {
        amount_in,
        amount_out,
        total_fee,
        protocol_fee,
        end_sqrt_price: curr_sqrt_price,
        end_tick_index: curr_tick_index,
        end_liquidity: curr_liquidity,
        crossed_tick_count: ticks_crossed.len() as u32,
        ticks_crossed,
        next_fee_growth_global_a: fee_growth_global_a,
        next_fee_growth_global_b: fee_growth_global_b,
        next_reward_infos: reward_infos,
        is_partial_fill: amount_remaining > 0,
        slot: pool.slot,
    })
}

/// Exact-input quote as the owner sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactInSwapQuote {
    /// Sent by the owner, transfer fee included
    pub token_in: u64,
    /// Received by the owner, transfer fee excluded
    pub token_est_out: u64,
    /// Least the owner accepts under the slippage tolerance
    pub token_min_out: u64,
    pub trade_fee: u64,
    pub swap: SwapResult,
}

/// Exact-output quote as the owner sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactOutSwapQuote {
    /// Received by the owner, transfer fee excluded
    pub token_out: u64,
    /// Sent by the owner, transfer fee included
    pub token_est_in: u64,
    /// Most the owner pays under the slippage tolerance
    pub token_max_in: u64,
    pub trade_fee: u64,
    pub swap: SwapResult,
}

/// Quote selling exactly `token_in` of `input_mint`
#[allow(clippy::too_many_arguments)]
pub fn swap_quote_by_input_token(
    pool: &PoolSnapshot,
    tick_arrays: &[TickArray],
    input_mint: &Pubkey,
    token_in: u64,
    slippage_bps: u16,
    mints: Option<&MintPair>,
    timestamp: Option<u64>,
    config: &QuoteConfig,
) -> Result<ExactInSwapQuote> {
    let (transfer_fee_a, transfer_fee_b) = pool_transfer_fees(pool, mints)?;
    let a_to_b = pool.is_token_a(input_mint)?;
    let (fee_in, fee_out) = if a_to_b {
        (transfer_fee_a, transfer_fee_b)
    } else {
        (transfer_fee_b, transfer_fee_a)
    };

    let token_in_after_fee = apply_transfer_fee(token_in, fee_in)?.amount;
    let mut params = SwapParams::exact_input(token_in_after_fee, a_to_b);
    params.timestamp = timestamp;
    let swap = simulate_swap(pool, tick_arrays, &params, config)?;

    let token_in = reverse_apply_transfer_fee(swap.amount_in, fee_in)?.amount;
    let token_est_out = apply_transfer_fee(swap.amount_out, fee_out)?.amount;
    let token_min_out = get_min_amount_with_slippage_tolerance(token_est_out, slippage_bps)?;

    Ok(ExactInSwapQuote {
        token_in,
        token_est_out,
        token_min_out,
        trade_fee: swap.total_fee,
        swap,
    })
}

/// Quote buying exactly `token_out` of `output_mint`
#[allow(clippy::too_many_arguments)]
pub fn swap_quote_by_output_token(
    pool: &PoolSnapshot,
    tick_arrays: &[TickArray],
    output_mint: &Pubkey,
    token_out: u64,
    slippage_bps: u16,
    mints: Option<&MintPair>,
    timestamp: Option<u64>,
    config: &QuoteConfig,
) -> Result<ExactOutSwapQuote> {
    let (transfer_fee_a, transfer_fee_b) = pool_transfer_fees(pool, mints)?;
    // Buying B means selling A
    let a_to_b = !pool.is_token_a(output_mint)?;
    let (fee_in, fee_out) = if a_to_b {
        (transfer_fee_a, transfer_fee_b)
    } else {
        (transfer_fee_b, transfer_fee_a)
    };

    let token_out_before_fee = reverse_apply_transfer_fee(token_out, fee_out)?.amount;
    let mut params = SwapParams::exact_output(token_out_before_fee, a_to_b);
    params.timestamp = timestamp;
    let swap = simulate_swap(pool, tick_arrays, &params, config)?;

    let token_est_in = reverse_apply_transfer_fee(swap.amount_in, fee_in)?.amount;
    let token_max_in = get_max_amount_with_slippage_tolerance(token_est_in, slippage_bps)?;

    Ok(ExactOutSwapQuote {
        token_out: apply_transfer_fee(swap.amount_out, fee_out)?.amount,
        token_est_in,
        token_max_in,
        trade_fee: swap.total_fee,
        swap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAX_TICK, MIN_TICK};
    use crate::math::full_math::Q64;
    use crate::state::get_tick_array_start_tick_index;
    use crate::token::MintMeta;

    const SPACING: u16 = 64;

    fn pool(liquidity: u128) -> PoolSnapshot {
        PoolSnapshot {
            address: Pubkey::new_from_array([3; 32]),
            token_mint_a: Pubkey::new_from_array([1; 32]),
            token_mint_b: Pubkey::new_from_array([2; 32]),
            tick_spacing: SPACING,
            sqrt_price: tick_index_to_sqrt_price(0).unwrap(),
            tick_current_index: 0,
            liquidity,
            fee_rate: 3000,
            ..Default::default()
        }
    }

    fn set_tick(arrays: &mut [TickArray], tick_index: i32, liquidity_net: i128, spacing: u16) {
        let start = get_tick_array_start_tick_index(tick_index, spacing).unwrap();
        let tick_array = arrays
            .iter_mut()
            .find(|tick_array| tick_array.start_tick_index == start)
            .unwrap();
        let offset = ((tick_index - start) / spacing as i32) as usize;
        let tick = &mut tick_array.ticks[offset];
        tick.initialized = true;
        tick.liquidity_net += liquidity_net;
        tick.liquidity_gross += liquidity_net.unsigned_abs();
    }

    /// Positions [-640, 640) with 10M and [-1280, 1280) with 5M
    fn two_position_arrays(pool: &PoolSnapshot) -> Vec<TickArray> {
        let mut arrays = vec![
            TickArray::uninitialized(pool.address, -5632, 0),
            TickArray::uninitialized(pool.address, 0, 0),
        ];
        set_tick(&mut arrays, -640, 10_000_000, SPACING);
        set_tick(&mut arrays, 640, -10_000_000, SPACING);
        set_tick(&mut arrays, -1280, 5_000_000, SPACING);
        set_tick(&mut arrays, 1280, -5_000_000, SPACING);
        arrays
    }

    #[test]
    fn test_exact_input_crosses_tick() {
        let mut pool = pool(15_000_000);
        pool.protocol_fee_rate = 300;
        let arrays = two_position_arrays(&pool);
        let result = simulate_swap(
            &pool,
            &arrays,
            &SwapParams::exact_input(500_000, true),
            &QuoteConfig::default(),
        )
        .unwrap();

        assert_eq!(result.amount_in, 500_000);
        assert_eq!(result.amount_out, 482_450);
        assert_eq!(result.total_fee, 1_501);
        assert_eq!(result.protocol_fee, 44);
        assert_eq!(result.end_tick_index, -682);
        assert_eq!(result.end_liquidity, 5_000_000);
        assert_eq!(result.crossed_tick_count, 1);
        assert_eq!(result.ticks_crossed[0].tick_index, -640);
        assert_eq!(result.ticks_crossed[0].liquidity_after, 5_000_000);
        assert!(!result.is_partial_fill);

        assert!(result.next_fee_growth_global_a > 0);
        assert_eq!(result.next_fee_growth_global_b, 0);
        // Crossed tick's outside growth flipped to the global growth at crossing time
        let crossed = result.ticks_crossed[0].tick;
        assert!(crossed.fee_growth_outside_a > 0);
        assert!(crossed.fee_growth_outside_a < result.next_fee_growth_global_a);
    }

    #[test]
    fn test_b_to_a_mirrors_a_to_b() {
        let pool = pool(15_000_000);
        let arrays = two_position_arrays(&pool);
        let result = simulate_swap(
            &pool,
            &arrays,
            &SwapParams::exact_input(500_000, false),
            &QuoteConfig::default(),
        )
        .unwrap();

        assert_eq!(result.amount_out, 482_450);
        assert_eq!(result.end_tick_index, 681);
        assert_eq!(result.ticks_crossed[0].tick_index, 640);
        assert!(result.next_fee_growth_global_b > 0);
        assert_eq!(result.next_fee_growth_global_a, 0);
    }

    #[test]
    fn test_exact_output() {
        let pool = pool(15_000_000);
        let arrays = two_position_arrays(&pool);
        let result = simulate_swap(
            &pool,
            &arrays,
            &SwapParams::exact_output(600_000, true),
            &QuoteConfig::default(),
        )
        .unwrap();

        assert_eq!(result.amount_out, 600_000);
        assert_eq!(result.amount_in, 629_367);
        assert_eq!(result.total_fee, 1_889);
        assert_eq!(result.end_tick_index, -1175);
    }

    #[test]
    fn test_partial_fill_at_explicit_limit() {
        let pool = pool(15_000_000);
        let arrays = two_position_arrays(&pool);
        let limit = tick_index_to_sqrt_price(-100).unwrap();
        let result = simulate_swap(
            &pool,
            &arrays,
            &SwapParams::exact_input(1_000_000_000, true).with_sqrt_price_limit(limit),
            &QuoteConfig::default(),
        )
        .unwrap();

        assert!(result.is_partial_fill);
        assert_eq!(result.end_sqrt_price, limit);
        assert_eq!(result.end_tick_index, -100);
        assert_eq!(result.amount_in, 75_412);
        assert_eq!(result.amount_out, 74_809);
    }

    #[test]
    fn test_insufficient_liquidity_at_price_bound() {
        // Two arrays cover every tick at this spacing
        let spacing = 16_384;
        let mut pool = pool(1_000);
        pool.tick_spacing = spacing;
        let mut arrays = vec![
            TickArray::uninitialized(pool.address, get_tick_array_start_tick_index(MIN_TICK, spacing).unwrap(), 0),
            TickArray::uninitialized(pool.address, 0, 0),
        ];
        set_tick(&mut arrays, -16_384, 1_000, spacing);
        set_tick(&mut arrays, 16_384, -1_000, spacing);
        assert!(arrays[1].is_max_tick_array(spacing));
        assert_eq!(get_tick_array_start_tick_index(MAX_TICK, spacing).unwrap(), 0);

        assert_eq!(
            simulate_swap(
                &pool,
                &arrays,
                &SwapParams::exact_input(u64::MAX / 2, true),
                &QuoteConfig::default(),
            )
            .unwrap_err(),
            QuoteError::InsufficientLiquidity.into()
        );
    }

    #[test]
    fn test_missing_tick_array() {
        let pool = pool(15_000_000);
        let arrays = vec![TickArray::uninitialized(pool.address, 0, 0)];
        // a_to_b from tick 0 immediately needs the array below
        assert_eq!(
            simulate_swap(
                &pool,
                &arrays,
                &SwapParams::exact_input(10_000_000, true),
                &QuoteConfig::default(),
            )
            .unwrap_err(),
            QuoteError::TickArrayNotSupplied.into()
        );
    }

    #[test]
    fn test_step_budget() {
        let pool = pool(15_000_000);
        let arrays = two_position_arrays(&pool);
        assert_eq!(
            simulate_swap(
                &pool,
                &arrays,
                &SwapParams::exact_input(500_000, true),
                &QuoteConfig::default().with_max_swap_steps(1),
            )
            .unwrap_err(),
            QuoteError::IterationLimitExceeded.into()
        );
    }

    #[test]
    fn test_input_validation() {
        let pool = pool(15_000_000);
        let arrays = two_position_arrays(&pool);
        let config = QuoteConfig::default();

        assert_eq!(
            simulate_swap(&pool, &arrays, &SwapParams::exact_input(0, true), &config).unwrap_err(),
            QuoteError::ZeroTradableAmount.into()
        );
        let above = tick_index_to_sqrt_price(64).unwrap();
        assert_eq!(
            simulate_swap(
                &pool,
                &arrays,
                &SwapParams::exact_input(1, true).with_sqrt_price_limit(above),
                &config
            )
            .unwrap_err(),
            QuoteError::InvalidSqrtPriceLimitDirection.into()
        );
        assert_eq!(
            simulate_swap(
                &pool,
                &arrays,
                &SwapParams::exact_input(1, true).with_sqrt_price_limit(MIN_SQRT_PRICE_X64 - 1),
                &config
            )
            .unwrap_err(),
            QuoteError::OutOfBounds.into()
        );
        assert_eq!(
            simulate_swap(
                &pool,
                &arrays,
                &SwapParams::exact_input(1, true).with_fee_rate(MAX_FEE_RATE + 1),
                &config
            )
            .unwrap_err(),
            QuoteError::InvalidFeeRate.into()
        );
    }

    #[test]
    fn test_rewards_projected_before_crossing() {
        let mut pool = pool(15_000_000);
        pool.reward_last_updated_timestamp = 1_000;
        pool.reward_infos[0].mint = Pubkey::new_unique();
        pool.reward_infos[0].emissions_per_second_x64 = 100 * Q64;
        let arrays = two_position_arrays(&pool);

        let result = simulate_swap(
            &pool,
            &arrays,
            &SwapParams::exact_input(500_000, true).with_timestamp(1_010),
            &QuoteConfig::default(),
        )
        .unwrap();

        let growth = result.next_reward_infos[0].growth_global_x64;
        assert_eq!(growth, 1_000 * Q64 / 15_000_000);
        assert_eq!(result.ticks_crossed[0].tick.reward_growths_outside[0], growth);
        assert_eq!(result.ticks_crossed[0].tick.reward_growths_outside[1], 0);
    }

    #[test]
    fn test_snapshot_untouched() {
        let pool = pool(15_000_000);
        let arrays = two_position_arrays(&pool);
        let before = (pool.clone(), arrays.clone());
        let first = simulate_swap(&pool, &arrays, &SwapParams::exact_input(500_000, true), &QuoteConfig::default()).unwrap();
        let second = simulate_swap(&pool, &arrays, &SwapParams::exact_input(500_000, true), &QuoteConfig::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!((pool, arrays), before);
    }

    #[test]
    fn test_quote_by_input_with_transfer_fees() {
        let pool = pool(15_000_000);
        let arrays = two_position_arrays(&pool);
        let mints = MintPair::new(
            MintMeta::new(pool.token_mint_a, 6).with_transfer_fee(100, u64::MAX),
            MintMeta::new(pool.token_mint_b, 6).with_transfer_fee(200, u64::MAX),
        );

        let quote = swap_quote_by_input_token(
            &pool,
            &arrays,
            &pool.token_mint_a,
            100_000,
            100,
            Some(&mints),
            None,
            &QuoteConfig::default(),
        )
        .unwrap();

        // 1% of the input never reaches the pool
        assert_eq!(quote.swap.amount_in, 99_000);
        assert_eq!(quote.token_in, 100_000);
        assert_eq!(
            quote.token_est_out,
            apply_transfer_fee(quote.swap.amount_out, mints.transfer_fee_b()).unwrap().amount
        );
        assert_eq!(
            quote.token_min_out,
            get_min_amount_with_slippage_tolerance(quote.token_est_out, 100).unwrap()
        );
    }

    #[test]
    fn test_quote_by_output_delivers_requested() {
        let pool = pool(15_000_000);
        let arrays = two_position_arrays(&pool);
        let mints = MintPair::new(
            MintMeta::new(pool.token_mint_a, 6),
            MintMeta::new(pool.token_mint_b, 6).with_transfer_fee(100, u64::MAX),
        );

        let quote = swap_quote_by_output_token(
            &pool,
            &arrays,
            &pool.token_mint_b,
            50_000,
            100,
            Some(&mints),
            None,
            &QuoteConfig::default(),
        )
        .unwrap();

        assert!(quote.swap.amount_out >= 50_506);
        assert!(quote.token_out >= 50_000);
        assert_eq!(quote.token_est_in, quote.swap.amount_in);
        assert!(quote.token_max_in > quote.token_est_in);
    }
}
