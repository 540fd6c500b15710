use crate::constants::NUM_REWARDS;
use crate::errors::QuoteError;
use crate::math::tick_math::validate_tick_range;
use crate::state::pool::PoolSnapshot;
use anchor_lang::prelude::*;

/// Per-reward accrual state of a position
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionRewardInfo {
    /// Reward growth inside the range at the last checkpoint (Q64.64)
    pub growth_inside_checkpoint: u128,

    /// Rewards accrued up to the checkpoint
    pub amount_owed: u64,
}

/// Liquidity position as read from the chain at `slot`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub address: Pubkey,

    /// The pool this position belongs to
    pub pool: Pubkey,

    pub position_mint: Pubkey,

    /// Lower tick of the position range
    pub tick_lower_index: i32,

    /// Upper tick of the position range
    pub tick_upper_index: i32,

    /// Amount of liquidity in this position
    pub liquidity: u128,

    /// Fee growth inside the position's range at last update (token A)
    pub fee_growth_checkpoint_a: u128,

    /// Uncollected fees owed to the position (token A)
    pub fee_owed_a: u64,

    /// Fee growth inside the position's range at last update (token B)
    pub fee_growth_checkpoint_b: u128,

    /// Uncollected fees owed to the position (token B)
    pub fee_owed_b: u64,

    pub reward_infos: [PositionRewardInfo; NUM_REWARDS],

    pub slot: u64,
}

impl Position {
    /// Check the position is well formed and belongs to `pool`
    pub fn validate(&self, pool: &PoolSnapshot) -> Result<()> {
        require_keys_eq!(self.pool, pool.address, QuoteError::PositionPoolMismatch);
        validate_tick_range(self.tick_lower_index, self.tick_upper_index, pool.tick_spacing)
    }

    /// Active iff `tick_lower <= tick_current < tick_upper`
    pub fn is_in_range(&self, tick_current_index: i32) -> bool {
        self.tick_lower_index <= tick_current_index && tick_current_index < self.tick_upper_index
    }

    /// Check if position has liquidity
    pub fn has_liquidity(&self) -> bool {
        self.liquidity > 0
    }

    /// Check if position is empty (no liquidity and nothing owed)
    pub fn is_empty(&self) -> bool {
        self.liquidity == 0
            && self.fee_owed_a == 0
            && self.fee_owed_b == 0
            && self.reward_infos.iter().all(|info| info.amount_owed == 0)
    }
}
