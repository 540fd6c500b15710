//! Snapshot sources and the quoting façade
//!
//! The engine never reads chain state itself. A [`SnapshotSource`] hands it
//! pool, tick array and position snapshots, a [`MintMetaResolver`] describes
//! mints, and [`Quoter`] wires the two into the quote functions.

use crate::config::QuoteConfig;
use crate::constants::{MAX_TICK, MIN_TICK, NUM_REWARDS};
use crate::errors::QuoteError;
use crate::quote::{
    quote_collect_fees, quote_collect_rewards, quote_decrease_liquidity_by_liquidity,
    quote_increase_liquidity_by_input_token, quote_reposition, swap_quote_by_input_token,
    swap_quote_by_output_token, CollectFeesQuote, DecreaseLiquidityQuote, ExactInSwapQuote,
    ExactOutSwapQuote, IncreaseLiquidityQuote, RepositionParams, RepositionQuote, RewardsQuote,
};
use crate::state::{
    get_tick_array_start_tick_index, ticks_in_array, PoolSnapshot, Position, Tick, TickArray,
    TickArraySequence,
};
use crate::token::{MintMeta, MintPair};
use anchor_lang::prelude::*;

/// Tick arrays fetched for a swap
pub const SWAP_TICK_ARRAY_COUNT: usize = 3;

/// Whether a source may answer from its cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Freshness {
    #[default]
    Cached,
    BypassCache,
}

/// Supplies account snapshots
///
/// A tick array that does not exist on chain should come back as
/// [`TickArray::uninitialized`] rather than be left out.
pub trait SnapshotSource {
    fn pool(&self, address: &Pubkey, freshness: Freshness) -> Result<PoolSnapshot>;

    fn tick_arrays(
        &self,
        pool: &Pubkey,
        start_tick_indexes: &[i32],
        freshness: Freshness,
    ) -> Result<Vec<TickArray>>;

    fn position(&self, address: &Pubkey, freshness: Freshness) -> Result<Position>;
}

pub trait MintMetaResolver {
    fn mint_meta(&self, mint: &Pubkey) -> Result<MintMeta>;
}

/// Start indexes of the arrays a swap from `tick_current_index` walks through
///
/// b_to_a shifts by one tick spacing first: a pool sitting on the last tick of
/// an array searches strictly above it. Arrays past the global tick bounds are
/// left out.
pub fn swap_tick_array_start_indexes(
    tick_current_index: i32,
    tick_spacing: u16,
    a_to_b: bool,
    count: usize,
) -> Result<Vec<i32>> {
    let ticks_per_array = ticks_in_array(tick_spacing);
    let shift = if a_to_b { 0 } else { tick_spacing as i32 };
    let mut start = get_tick_array_start_tick_index(tick_current_index + shift, tick_spacing)?;

    let mut starts = Vec::with_capacity(count);
    for _ in 0..count {
        if start > MAX_TICK || start + ticks_per_array <= MIN_TICK {
            break;
        }
        starts.push(start);
        start = if a_to_b {
            start - ticks_per_array
        } else {
            start + ticks_per_array
        };
    }
    Ok(starts)
}

/// Start indexes of the arrays holding a position's two ticks, deduplicated
pub fn position_tick_array_start_indexes(position: &Position, tick_spacing: u16) -> Result<Vec<i32>> {
    let lower = get_tick_array_start_tick_index(position.tick_lower_index, tick_spacing)?;
    let upper = get_tick_array_start_tick_index(position.tick_upper_index, tick_spacing)?;
    if lower == upper {
        Ok(vec![lower])
    } else {
        Ok(vec![lower, upper])
    }
}

/// Quotes backed by a snapshot source and a mint resolver
pub struct Quoter<S, M> {
    source: S,
    mints: M,
    config: QuoteConfig,
    freshness: Freshness,
}

impl<S: SnapshotSource, M: MintMetaResolver> Quoter<S, M> {
    pub fn new(source: S, mints: M, config: QuoteConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            mints,
            config,
            freshness: Freshness::Cached,
        })
    }

    pub fn with_freshness(mut self, freshness: Freshness) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    fn slippage(&self, slippage_bps: Option<u16>) -> u16 {
        slippage_bps.unwrap_or(self.config.default_slippage_bps)
    }

    fn mint_pair(&self, pool: &PoolSnapshot) -> Result<MintPair> {
        Ok(MintPair::new(
            self.mints.mint_meta(&pool.token_mint_a)?,
            self.mints.mint_meta(&pool.token_mint_b)?,
        ))
    }

    fn swap_tick_arrays(&self, pool: &PoolSnapshot, a_to_b: bool) -> Result<Vec<TickArray>> {
        let starts = swap_tick_array_start_indexes(
            pool.tick_current_index,
            pool.tick_spacing,
            a_to_b,
            SWAP_TICK_ARRAY_COUNT,
        )?;
        self.source.tick_arrays(&pool.address, &starts, self.freshness)
    }

    /// Pool, position and the position's two ticks, checked for freshness
    fn position_context(&self, position_address: &Pubkey) -> Result<(PoolSnapshot, Position, Tick, Tick)> {
        let position = self.source.position(position_address, self.freshness)?;
        let pool = self.source.pool(&position.pool, self.freshness)?;
        pool.validate()?;
        position.validate(&pool)?;
        self.config.check_freshness(pool.slot, position.slot)?;

        let starts = position_tick_array_start_indexes(&position, pool.tick_spacing)?;
        let tick_arrays = self.source.tick_arrays(&pool.address, &starts, self.freshness)?;
        let sequence = TickArraySequence::new(&pool, &tick_arrays, &self.config)?;
        let tick_lower = sequence.tick_or_default(position.tick_lower_index)?;
        let tick_upper = sequence.tick_or_default(position.tick_upper_index)?;

        Ok((pool, position, tick_lower, tick_upper))
    }

    pub fn quote_swap_exact_in(
        &self,
        pool_address: &Pubkey,
        input_mint: &Pubkey,
        amount: u64,
        slippage_bps: Option<u16>,
        timestamp: Option<u64>,
    ) -> Result<ExactInSwapQuote> {
        let pool = self.source.pool(pool_address, self.freshness)?;
        pool.validate()?;
        let tick_arrays = self.swap_tick_arrays(&pool, pool.is_token_a(input_mint)?)?;
        let mints = self.mint_pair(&pool)?;

        swap_quote_by_input_token(
            &pool,
            &tick_arrays,
            input_mint,
            amount,
            self.slippage(slippage_bps),
            Some(&mints),
            timestamp,
            &self.config,
        )
    }

    pub fn quote_swap_exact_out(
        &self,
        pool_address: &Pubkey,
        output_mint: &Pubkey,
        amount: u64,
        slippage_bps: Option<u16>,
        timestamp: Option<u64>,
    ) -> Result<ExactOutSwapQuote> {
        let pool = self.source.pool(pool_address, self.freshness)?;
        pool.validate()?;
        let a_to_b = !pool.is_token_a(output_mint)?;
        let tick_arrays = self.swap_tick_arrays(&pool, a_to_b)?;
        let mints = self.mint_pair(&pool)?;

        swap_quote_by_output_token(
            &pool,
            &tick_arrays,
            output_mint,
            amount,
            self.slippage(slippage_bps),
            Some(&mints),
            timestamp,
            &self.config,
        )
    }

    pub fn quote_increase_liquidity(
        &self,
        pool_address: &Pubkey,
        tick_lower_index: i32,
        tick_upper_index: i32,
        input_mint: &Pubkey,
        amount: u64,
        slippage_bps: Option<u16>,
    ) -> Result<IncreaseLiquidityQuote> {
        let pool = self.source.pool(pool_address, self.freshness)?;
        let mints = self.mint_pair(&pool)?;

        quote_increase_liquidity_by_input_token(
            &pool,
            tick_lower_index,
            tick_upper_index,
            input_mint,
            amount,
            self.slippage(slippage_bps),
            Some(&mints),
        )
    }

    pub fn quote_decrease_liquidity(
        &self,
        position_address: &Pubkey,
        liquidity: u128,
        slippage_bps: Option<u16>,
    ) -> Result<DecreaseLiquidityQuote> {
        let position = self.source.position(position_address, self.freshness)?;
        let pool = self.source.pool(&position.pool, self.freshness)?;
        self.config.check_freshness(pool.slot, position.slot)?;
        let mints = self.mint_pair(&pool)?;

        quote_decrease_liquidity_by_liquidity(
            &pool,
            &position,
            liquidity,
            self.slippage(slippage_bps),
            Some(&mints),
        )
    }

    pub fn quote_reposition(
        &self,
        position_address: &Pubkey,
        params: &RepositionParams,
    ) -> Result<RepositionQuote> {
        let position = self.source.position(position_address, self.freshness)?;
        let pool = self.source.pool(&position.pool, self.freshness)?;
        self.config.check_freshness(pool.slot, position.slot)?;
        let mints = self.mint_pair(&pool)?;

        quote_reposition(&pool, &position, params, Some(&mints))
    }

    /// Fees the owner would receive on collection
    pub fn quote_fees(&self, position_address: &Pubkey) -> Result<CollectFeesQuote> {
        let (pool, position, tick_lower, tick_upper) = self.position_context(position_address)?;
        let mints = self.mint_pair(&pool)?;
        quote_collect_fees(&pool, &position, &tick_lower, &tick_upper, Some(&mints))
    }

    /// Rewards the owner would receive on collection at `timestamp`
    pub fn quote_rewards(&self, position_address: &Pubkey, timestamp: u64) -> Result<RewardsQuote> {
        let (pool, position, tick_lower, tick_upper) = self.position_context(position_address)?;

        let mut reward_mints: [Option<MintMeta>; NUM_REWARDS] = Default::default();
        for (meta, reward_info) in reward_mints.iter_mut().zip(pool.reward_infos.iter()) {
            if reward_info.initialized() {
                *meta = Some(self.mints.mint_meta(&reward_info.mint)?);
            }
        }

        quote_collect_rewards(
            &pool,
            &position,
            &tick_lower,
            &tick_upper,
            timestamp,
            &reward_mints,
        )
    }
}

impl<S, M> std::fmt::Debug for Quoter<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Quoter")
            .field("config", &self.config)
            .field("freshness", &self.freshness)
            .finish_non_exhaustive()
    }
}

/// A resolver that treats every mint as a plain SPL Token mint
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainMints {
    pub decimals: u8,
}

impl MintMetaResolver for PlainMints {
    fn mint_meta(&self, mint: &Pubkey) -> Result<MintMeta> {
        require_keys_neq!(*mint, Pubkey::default(), QuoteError::MintMismatch);
        Ok(MintMeta::new(*mint, self.decimals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::tick_index_to_sqrt_price;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[test]
    fn test_swap_start_indexes_a_to_b() {
        assert_eq!(
            swap_tick_array_start_indexes(100, 64, true, 3).unwrap(),
            vec![0, -5632, -11264]
        );
    }

    #[test]
    fn test_swap_start_indexes_b_to_a_shifts() {
        assert_eq!(
            swap_tick_array_start_indexes(5631, 64, false, 2).unwrap(),
            vec![5632, 11264]
        );
        assert_eq!(swap_tick_array_start_indexes(5567, 64, false, 1).unwrap(), vec![0]);
    }

    #[test]
    fn test_swap_start_indexes_stop_at_bounds() {
        let starts = swap_tick_array_start_indexes(MAX_TICK - 1, 64, false, 3).unwrap();
        assert_eq!(starts.len(), 1);
        let starts = swap_tick_array_start_indexes(MIN_TICK, 64, true, 3).unwrap();
        assert_eq!(starts.len(), 1);
    }

    #[test]
    fn test_start_indexes_reject_zero_spacing() {
        assert_eq!(
            swap_tick_array_start_indexes(0, 0, true, 3).unwrap_err(),
            QuoteError::InvalidTickSpacing.into()
        );
        assert_eq!(
            position_tick_array_start_indexes(&Position::default(), 0).unwrap_err(),
            QuoteError::InvalidTickSpacing.into()
        );
    }

    #[test]
    fn test_position_start_indexes() {
        let position = Position {
            tick_lower_index: -640,
            tick_upper_index: 640,
            ..Default::default()
        };
        assert_eq!(position_tick_array_start_indexes(&position, 64).unwrap(), vec![-5632, 0]);

        let position = Position {
            tick_lower_index: 64,
            tick_upper_index: 640,
            ..Default::default()
        };
        assert_eq!(position_tick_array_start_indexes(&position, 64).unwrap(), vec![0]);
    }

    #[derive(Default)]
    struct MemorySource {
        pools: HashMap<Pubkey, PoolSnapshot>,
        positions: HashMap<Pubkey, Position>,
        arrays: Vec<TickArray>,
        requests: RefCell<Vec<Freshness>>,
    }

    impl SnapshotSource for MemorySource {
        fn pool(&self, address: &Pubkey, freshness: Freshness) -> Result<PoolSnapshot> {
            self.requests.borrow_mut().push(freshness);
            self.pools
                .get(address)
                .cloned()
                .ok_or(QuoteError::PositionPoolMismatch.into())
        }

        fn tick_arrays(
            &self,
            pool: &Pubkey,
            start_tick_indexes: &[i32],
            _freshness: Freshness,
        ) -> Result<Vec<TickArray>> {
            Ok(start_tick_indexes
                .iter()
                .map(|start| {
                    self.arrays
                        .iter()
                        .find(|tick_array| tick_array.start_tick_index == *start)
                        .cloned()
                        .unwrap_or_else(|| TickArray::uninitialized(*pool, *start, 0))
                })
                .collect())
        }

        fn position(&self, address: &Pubkey, _freshness: Freshness) -> Result<Position> {
            self.positions
                .get(address)
                .cloned()
                .ok_or(QuoteError::PositionPoolMismatch.into())
        }
    }

    fn source() -> (MemorySource, Pubkey, Pubkey) {
        let pool = PoolSnapshot {
            address: Pubkey::new_unique(),
            token_mint_a: Pubkey::new_unique(),
            token_mint_b: Pubkey::new_unique(),
            tick_spacing: 64,
            sqrt_price: tick_index_to_sqrt_price(0).unwrap(),
            tick_current_index: 0,
            liquidity: 10_000_000,
            fee_rate: 3000,
            slot: 50,
            ..Default::default()
        };

        let mut arrays = vec![
            TickArray::uninitialized(pool.address, -5632, 50),
            TickArray::uninitialized(pool.address, 0, 50),
        ];
        arrays[0].ticks[78] = Tick {
            initialized: true,
            liquidity_net: 10_000_000,
            liquidity_gross: 10_000_000,
            ..Default::default()
        };
        arrays[1].ticks[10] = Tick {
            initialized: true,
            liquidity_net: -10_000_000,
            liquidity_gross: 10_000_000,
            ..Default::default()
        };

        let position = Position {
            address: Pubkey::new_unique(),
            pool: pool.address,
            tick_lower_index: -640,
            tick_upper_index: 640,
            liquidity: 10_000_000,
            fee_owed_a: 5,
            slot: 50,
            ..Default::default()
        };

        let pool_address = pool.address;
        let position_address = position.address;
        let source = MemorySource {
            pools: HashMap::from([(pool.address, pool)]),
            positions: HashMap::from([(position.address, position)]),
            arrays,
            requests: RefCell::new(Vec::new()),
        };
        (source, pool_address, position_address)
    }

    #[test]
    fn test_quoter_swap_uses_default_slippage() {
        let (source, pool_address, _) = source();
        let mint_a = source.pools[&pool_address].token_mint_a;
        let quoter = Quoter::new(source, PlainMints { decimals: 6 }, QuoteConfig::default()).unwrap();

        let quote = quoter
            .quote_swap_exact_in(&pool_address, &mint_a, 100_000, None, None)
            .unwrap();
        assert_eq!(quote.token_in, 100_000);
        assert_eq!(quote.token_est_out, 98_715);
        assert_eq!(quote.token_min_out, 97_727);
    }

    #[test]
    fn test_quoter_fees_reads_position_ticks() {
        let (source, _, position_address) = source();
        let quoter = Quoter::new(source, PlainMints { decimals: 6 }, QuoteConfig::default())
            .unwrap()
            .with_freshness(Freshness::BypassCache);

        let fees = quoter.quote_fees(&position_address).unwrap();
        assert_eq!(fees.fee_owed_a, 5);
        assert_eq!(fees.fee_owed_b, 0);
        assert!(quoter
            .source
            .requests
            .borrow()
            .iter()
            .all(|freshness| *freshness == Freshness::BypassCache));
    }

    #[test]
    fn test_quoter_rejects_invalid_config() {
        let (source, _, _) = source();
        assert!(Quoter::new(
            source,
            PlainMints::default(),
            QuoteConfig::default().with_default_slippage_bps(20_000)
        )
        .is_err());
    }

    #[test]
    fn test_quoter_rejects_zero_spacing_pool() {
        let (mut source, pool_address, position_address) = source();
        let mint_a = source.pools[&pool_address].token_mint_a;
        if let Some(pool) = source.pools.get_mut(&pool_address) {
            pool.tick_spacing = 0;
        }
        let quoter = Quoter::new(source, PlainMints { decimals: 6 }, QuoteConfig::default()).unwrap();

        assert_eq!(
            quoter
                .quote_swap_exact_in(&pool_address, &mint_a, 100_000, None, None)
                .unwrap_err(),
            QuoteError::InvalidTickSpacing.into()
        );
        assert_eq!(
            quoter
                .quote_swap_exact_out(&pool_address, &mint_a, 100_000, None, None)
                .unwrap_err(),
            QuoteError::InvalidTickSpacing.into()
        );
        assert_eq!(
            quoter.quote_fees(&position_address).unwrap_err(),
            QuoteError::InvalidTickSpacing.into()
        );
    }
}
