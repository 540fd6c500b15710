use crate::constants::{
    MAX_FEE_RATE, MAX_PROTOCOL_FEE_RATE, MAX_SQRT_PRICE_X64, MIN_SQRT_PRICE_X64, NUM_REWARDS,
};
use crate::errors::QuoteError;
use crate::math::tick_math::sqrt_price_to_tick_index;
use anchor_lang::prelude::*;

/// Reward emission slot of a pool
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardInfo {
    /// Reward token mint, `Pubkey::default()` when the slot is unused
    pub mint: Pubkey,

    /// Reward vault
    pub vault: Pubkey,

    /// Tokens emitted per second (Q64.64)
    pub emissions_per_second_x64: u128,

    /// Cumulative reward per unit of liquidity (Q64.64, wrapping)
    pub growth_global_x64: u128,

    /// Vault balance when known; projected emissions never exceed it
    pub vault_amount: Option<u64>,
}

impl RewardInfo {
    pub fn initialized(&self) -> bool {
        self.mint != Pubkey::default()
    }

    pub fn to_reward_growths(reward_infos: &[RewardInfo; NUM_REWARDS]) -> [u128; NUM_REWARDS] {
        let mut growths = [0u128; NUM_REWARDS];
        for (growth, info) in growths.iter_mut().zip(reward_infos.iter()) {
            *growth = info.growth_global_x64;
        }
        growths
    }
}

/// Pool state as read from the chain at `slot`
///
/// Quotes never mutate a snapshot; simulated state comes back in the quote result.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub address: Pubkey,

    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub token_vault_a: Pubkey,
    pub token_vault_b: Pubkey,

    pub tick_spacing: u16,

    /// Current sqrt price as Q64.64 fixed point
    pub sqrt_price: u128,

    pub tick_current_index: i32,

    /// Total liquidity currently in range
    pub liquidity: u128,

    /// Swap fee in hundredths of a bip (3000 = 0.3%)
    pub fee_rate: u16,

    /// Share of the swap fee kept by the protocol, in basis points
    pub protocol_fee_rate: u16,

    /// Global fee growth for token A (Q64.64, wrapping)
    pub fee_growth_global_a: u128,

    /// Global fee growth for token B (Q64.64, wrapping)
    pub fee_growth_global_b: u128,

    pub reward_infos: [RewardInfo; NUM_REWARDS],
    pub reward_last_updated_timestamp: u64,

    /// Slot the snapshot was read at
    pub slot: u64,
}

impl PoolSnapshot {
    /// Check the fields a quote relies on
    ///
    /// The tick must be consistent with the price: either derived from it, or
    /// one below it when a downward swap stopped exactly on an initialized tick.
    pub fn validate(&self) -> Result<()> {
        require!(self.tick_spacing > 0, QuoteError::InvalidTickSpacing);
        require!(
            (MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&self.sqrt_price),
            QuoteError::OutOfBounds
        );
        require!(self.fee_rate <= MAX_FEE_RATE, QuoteError::InvalidFeeRate);
        require!(
            self.protocol_fee_rate <= MAX_PROTOCOL_FEE_RATE,
            QuoteError::InvalidFeeRate
        );

        let derived_tick = sqrt_price_to_tick_index(self.sqrt_price)?;
        require!(
            self.tick_current_index == derived_tick
                || self.tick_current_index == derived_tick - 1,
            QuoteError::OutOfBounds
        );

        Ok(())
    }

    /// The mint on the other side of the pair
    pub fn other_mint(&self, mint: &Pubkey) -> Result<Pubkey> {
        if *mint == self.token_mint_a {
            Ok(self.token_mint_b)
        } else if *mint == self.token_mint_b {
            Ok(self.token_mint_a)
        } else {
            Err(QuoteError::MintMismatch.into())
        }
    }

    /// true when `mint` is token A, false when token B
    pub fn is_token_a(&self, mint: &Pubkey) -> Result<bool> {
        if *mint == self.token_mint_a {
            Ok(true)
        } else if *mint == self.token_mint_b {
            Ok(false)
        } else {
            Err(QuoteError::MintMismatch.into())
        }
    }

    pub fn reward_growths(&self) -> [u128; NUM_REWARDS] {
        RewardInfo::to_reward_growths(&self.reward_infos)
    }
}
