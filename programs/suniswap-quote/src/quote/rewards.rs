use crate::constants::NUM_REWARDS;
use crate::errors::QuoteError;
use crate::math::full_math::{u256_to_u128, U256};
use crate::quote::fees::accrued_amount;
use crate::state::{PoolSnapshot, Position, RewardInfo, Tick};
use crate::token::{apply_transfer_fee, ensure_settleable, MintMeta};
use anchor_lang::prelude::*;

/// Reward owed for one emission slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardOwed {
    /// Reward mint, `Pubkey::default()` for an unused slot
    pub mint: Pubkey,
    pub rewards_owed: u64,
    /// Withheld by the reward mint's transfer fee on collection
    pub transfer_fee: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardsQuote {
    pub rewards: [RewardOwed; NUM_REWARDS],
}

impl RewardsQuote {
    pub fn total_for_mint(&self, mint: &Pubkey) -> u64 {
        self.rewards
            .iter()
            .filter(|reward| reward.mint == *mint)
            .fold(0u64, |total, reward| total.saturating_add(reward.rewards_owed))
    }
}

/// Pool reward growth projected forward to `timestamp`
///
/// growth_global += min(dt * emissions, vault << 64) / liquidity. Nothing moves
/// while the pool has no active liquidity or no time has passed. A delta that
/// does not fit in u128 stops growth for the period, matching the settlement
/// program.
pub fn next_reward_infos(pool: &PoolSnapshot, timestamp: u64) -> Result<[RewardInfo; NUM_REWARDS]> {
    require!(
        timestamp >= pool.reward_last_updated_timestamp,
        QuoteError::InvalidTimestamp
    );

    let mut reward_infos = pool.reward_infos;
    let time_delta = timestamp - pool.reward_last_updated_timestamp;
    if pool.liquidity == 0 || time_delta == 0 {
        return Ok(reward_infos);
    }

    for reward_info in reward_infos.iter_mut() {
        if !reward_info.initialized() {
            continue;
        }

        let mut emitted_x64 = U256::from(time_delta) * U256::from(reward_info.emissions_per_second_x64);
        if let Some(vault_amount) = reward_info.vault_amount {
            emitted_x64 = emitted_x64.min(U256::from(vault_amount) << 64);
        }

        let growth_delta = u256_to_u128(emitted_x64 / U256::from(pool.liquidity)).unwrap_or(0);
        reward_info.growth_global_x64 = reward_info.growth_global_x64.wrapping_add(growth_delta);
    }

    Ok(reward_infos)
}

/// Rewards owed to `position` if it were updated at `timestamp`
///
/// Unused slots report zero. The position and pool are left untouched.
pub fn quote_rewards(
    pool: &PoolSnapshot,
    position: &Position,
    tick_lower: &Tick,
    tick_upper: &Tick,
    timestamp: u64,
) -> Result<RewardsQuote> {
    pool.validate()?;
    position.validate(pool)?;
    if position.has_liquidity() {
        require!(
            tick_lower.initialized && tick_upper.initialized,
            QuoteError::TickArrayNotSupplied
        );
    }

    let reward_infos = next_reward_infos(pool, timestamp)?;
    let growths_inside = Tick::reward_growths_inside(
        pool.tick_current_index,
        position.tick_lower_index,
        tick_lower,
        position.tick_upper_index,
        tick_upper,
        &reward_infos,
    );

    let mut quote = RewardsQuote::default();
    for (i, reward_info) in reward_infos.iter().enumerate() {
        if !reward_info.initialized() {
            continue;
        }
        let position_reward = &position.reward_infos[i];
        let delta = accrued_amount(
            growths_inside[i],
            position_reward.growth_inside_checkpoint,
            position.liquidity,
        )?;
        quote.rewards[i] = RewardOwed {
            mint: reward_info.mint,
            rewards_owed: position_reward.amount_owed.wrapping_add(delta),
            transfer_fee: 0,
        };
    }

    Ok(quote)
}

/// [`quote_rewards`] net of each reward mint's transfer fee
///
/// `reward_mints[i]` describes the mint of slot `i`; `None` treats it as a
/// plain mint.
pub fn quote_collect_rewards(
    pool: &PoolSnapshot,
    position: &Position,
    tick_lower: &Tick,
    tick_upper: &Tick,
    timestamp: u64,
    reward_mints: &[Option<MintMeta>; NUM_REWARDS],
) -> Result<RewardsQuote> {
    let mut quote = quote_rewards(pool, position, tick_lower, tick_upper, timestamp)?;

    for (reward, meta) in quote.rewards.iter_mut().zip(reward_mints.iter()) {
        let Some(meta) = meta else {
            continue;
        };
        if reward.mint == Pubkey::default() {
            continue;
        }
        require_keys_eq!(meta.mint, reward.mint, QuoteError::MintMismatch);
        meta.validate()?;
        ensure_settleable(meta)?;

        let received = apply_transfer_fee(reward.rewards_owed, meta.transfer_fee)?;
        reward.rewards_owed = received.amount;
        reward.transfer_fee = received.transfer_fee;
    }

    #[cfg(feature = "quote-logs")]
    msg!(
        "Collect rewards quote: position {} owed {:?}",
        position.address,
        quote.rewards.map(|reward| reward.rewards_owed)
    );

    Ok(quote)
}
