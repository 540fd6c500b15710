use crate::constants::NUM_REWARDS;
use crate::state::pool::RewardInfo;
use anchor_lang::prelude::*;

/// Tick data - stored within tick arrays
/// Each tick represents a price point where liquidity can change
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tick {
    pub initialized: bool,

    /// Net liquidity change when crossing this tick (positive = liquidity added)
    /// When price moves up through tick: add liquidity_net
    /// When price moves down through tick: subtract liquidity_net
    pub liquidity_net: i128,

    /// Total liquidity referencing this tick
    pub liquidity_gross: u128,

    /// Fee growth on the other side of this tick (token A, Q64.64)
    pub fee_growth_outside_a: u128,

    /// Fee growth on the other side of this tick (token B, Q64.64)
    pub fee_growth_outside_b: u128,

    /// Reward growth on the other side of this tick, per reward slot
    pub reward_growths_outside: [u128; NUM_REWARDS],
}

impl Tick {
    /// Outside values after the price crosses this tick
    ///
    /// Each outside accumulator becomes `global - outside` (wrapping). Reward
    /// slots that are not initialized keep their stored value.
    pub fn cross_update(
        &self,
        fee_growth_global_a: u128,
        fee_growth_global_b: u128,
        reward_infos: &[RewardInfo; NUM_REWARDS],
    ) -> Tick {
        let mut crossed = *self;
        crossed.fee_growth_outside_a = fee_growth_global_a.wrapping_sub(self.fee_growth_outside_a);
        crossed.fee_growth_outside_b = fee_growth_global_b.wrapping_sub(self.fee_growth_outside_b);

        for (i, reward_info) in reward_infos.iter().enumerate() {
            if reward_info.initialized() {
                crossed.reward_growths_outside[i] = reward_info
                    .growth_global_x64
                    .wrapping_sub(self.reward_growths_outside[i]);
            }
        }

        crossed
    }

    /// Calculate fee growth inside a tick range
    ///
    /// An uninitialized lower tick counts all global growth as below the range,
    /// an uninitialized upper tick counts nothing as above it.
    pub fn fee_growths_inside(
        tick_current_index: i32,
        tick_lower_index: i32,
        tick_lower: &Tick,
        tick_upper_index: i32,
        tick_upper: &Tick,
        fee_growth_global_a: u128,
        fee_growth_global_b: u128,
    ) -> (u128, u128) {
        let (fee_growth_below_a, fee_growth_below_b) = if !tick_lower.initialized {
            (fee_growth_global_a, fee_growth_global_b)
        } else if tick_current_index >= tick_lower_index {
            (tick_lower.fee_growth_outside_a, tick_lower.fee_growth_outside_b)
        } else {
            (
                fee_growth_global_a.wrapping_sub(tick_lower.fee_growth_outside_a),
                fee_growth_global_b.wrapping_sub(tick_lower.fee_growth_outside_b),
            )
        };

        let (fee_growth_above_a, fee_growth_above_b) = if !tick_upper.initialized {
            (0, 0)
        } else if tick_current_index < tick_upper_index {
            (tick_upper.fee_growth_outside_a, tick_upper.fee_growth_outside_b)
        } else {
            (
                fee_growth_global_a.wrapping_sub(tick_upper.fee_growth_outside_a),
                fee_growth_global_b.wrapping_sub(tick_upper.fee_growth_outside_b),
            )
        };

        (
            fee_growth_global_a
                .wrapping_sub(fee_growth_below_a)
                .wrapping_sub(fee_growth_above_a),
            fee_growth_global_b
                .wrapping_sub(fee_growth_below_b)
                .wrapping_sub(fee_growth_above_b),
        )
    }

    /// Reward growth inside a tick range, per slot; zero for unused slots
    pub fn reward_growths_inside(
        tick_current_index: i32,
        tick_lower_index: i32,
        tick_lower: &Tick,
        tick_upper_index: i32,
        tick_upper: &Tick,
        reward_infos: &[RewardInfo; NUM_REWARDS],
    ) -> [u128; NUM_REWARDS] {
        let mut growths_inside = [0u128; NUM_REWARDS];

        for (i, reward_info) in reward_infos.iter().enumerate() {
            if !reward_info.initialized() {
                continue;
            }
            let global = reward_info.growth_global_x64;

            let below = if !tick_lower.initialized {
                global
            } else if tick_current_index >= tick_lower_index {
                tick_lower.reward_growths_outside[i]
            } else {
                global.wrapping_sub(tick_lower.reward_growths_outside[i])
            };

            let above = if !tick_upper.initialized {
                0
            } else if tick_current_index < tick_upper_index {
                tick_upper.reward_growths_outside[i]
            } else {
                global.wrapping_sub(tick_upper.reward_growths_outside[i])
            };

            growths_inside[i] = global.wrapping_sub(below).wrapping_sub(above);
        }

        growths_inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized_tick(fee_outside_a: u128, fee_outside_b: u128) -> Tick {
        Tick {
            initialized: true,
            liquidity_gross: 1,
            fee_growth_outside_a: fee_outside_a,
            fee_growth_outside_b: fee_outside_b,
            ..Default::default()
        }
    }

    fn active_reward_infos(growths: [u128; NUM_REWARDS]) -> [RewardInfo; NUM_REWARDS] {
        let mut infos = [RewardInfo::default(); NUM_REWARDS];
        for (info, growth) in infos.iter_mut().zip(growths) {
            info.mint = Pubkey::new_unique();
            info.growth_global_x64 = growth;
        }
        infos
    }

    #[test]
    fn test_fee_growth_inside_in_range() {
        let lower = initialized_tick(100, 10);
        let upper = initialized_tick(50, 5);
        let (a, b) = Tick::fee_growths_inside(0, -64, &lower, 64, &upper, 1_000, 100);
        assert_eq!(a, 1_000 - 100 - 50);
        assert_eq!(b, 100 - 10 - 5);
    }

    #[test]
    fn test_fee_growth_inside_below_range() {
        let lower = initialized_tick(300, 0);
        let upper = initialized_tick(100, 0);
        // below = global - 300 = 700, above = 100
        let (a, _) = Tick::fee_growths_inside(-128, -64, &lower, 64, &upper, 1_000, 0);
        assert_eq!(a, 1_000u128.wrapping_sub(700).wrapping_sub(100));
    }

    #[test]
    fn test_fee_growth_inside_above_range() {
        let lower = initialized_tick(300, 0);
        let upper = initialized_tick(100, 0);
        // below = 300, above = global - 100 = 900
        let (a, _) = Tick::fee_growths_inside(64, -64, &lower, 64, &upper, 1_000, 0);
        assert_eq!(a, 1_000u128.wrapping_sub(300).wrapping_sub(900));
    }

    #[test]
    fn test_fee_growth_inside_uninitialized_ticks() {
        let blank = Tick::default();
        // Both ends unknown: below = global, above = 0
        let (a, b) = Tick::fee_growths_inside(0, -64, &blank, 64, &blank, 1_000, 7);
        assert_eq!((a, b), (0, 0));
    }

    #[test]
    fn test_fee_growth_inside_wraps() {
        let lower = initialized_tick(u128::MAX, 0);
        let upper = initialized_tick(0, 0);
        let (a, _) = Tick::fee_growths_inside(0, -64, &lower, 64, &upper, 5, 0);
        assert_eq!(a, 6);
    }

    #[test]
    fn test_cross_update_flips_outside() {
        let mut tick = initialized_tick(100, 40);
        tick.reward_growths_outside = [10, 20, 30];
        let mut infos = active_reward_infos([1_000, 2_000, 3_000]);
        infos[2].mint = Pubkey::default();

        let crossed = tick.cross_update(1_000, 50, &infos);
        assert_eq!(crossed.fee_growth_outside_a, 900);
        assert_eq!(crossed.fee_growth_outside_b, 10);
        assert_eq!(crossed.reward_growths_outside, [990, 1_980, 30]);

        // Crossing back with unchanged globals restores the tick
        let back = crossed.cross_update(1_000, 50, &infos);
        assert_eq!(back, tick);
    }

    #[test]
    fn test_reward_growth_inside() {
        let mut lower = initialized_tick(0, 0);
        lower.reward_growths_outside = [100, 0, 0];
        let mut upper = initialized_tick(0, 0);
        upper.reward_growths_outside = [50, 0, 0];
        let mut infos = active_reward_infos([1_000, 500, 0]);
        infos[1].mint = Pubkey::default();

        let inside = Tick::reward_growths_inside(0, -64, &lower, 64, &upper, &infos);
        assert_eq!(inside, [850, 0, 0]);
    }
}
