//! Quote configuration
//!
//! Tunables that bound quote cost and freshness. Protocol constants that must
//! match the settlement program live in [`crate::constants`] instead.

use crate::constants::BPS_DENOMINATOR;
use crate::errors::QuoteError;
use anchor_lang::prelude::*;

/// Default cap on swap loop iterations
pub const DEFAULT_MAX_SWAP_STEPS: u32 = 1_024;

/// Default slippage tolerance (1%)
pub const DEFAULT_SLIPPAGE_BPS: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteConfig {
    /// Upper bound on swap steps; the effective budget is also bounded by the
    /// number of supplied tick arrays
    pub max_swap_steps: u32,

    /// Maximum number of slots a tick array or position snapshot may trail the
    /// pool snapshot. `None` disables the check.
    pub max_slot_lag: Option<u64>,

    /// Slippage applied by [`crate::interfaces::Quoter`] when the caller gives none
    pub default_slippage_bps: u16,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            max_swap_steps: DEFAULT_MAX_SWAP_STEPS,
            max_slot_lag: None,
            default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
        }
    }
}

impl QuoteConfig {
    pub fn with_max_swap_steps(mut self, max_swap_steps: u32) -> Self {
        self.max_swap_steps = max_swap_steps;
        self
    }

    pub fn with_max_slot_lag(mut self, max_slot_lag: u64) -> Self {
        self.max_slot_lag = Some(max_slot_lag);
        self
    }

    pub fn with_default_slippage_bps(mut self, slippage_bps: u16) -> Self {
        self.default_slippage_bps = slippage_bps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        require!(self.max_swap_steps > 0, QuoteError::IterationLimitExceeded);
        require!(
            self.default_slippage_bps <= BPS_DENOMINATOR,
            QuoteError::InvalidSlippage
        );
        Ok(())
    }

    /// Reject a snapshot taken more than `max_slot_lag` slots before `reference_slot`
    pub fn check_freshness(&self, reference_slot: u64, snapshot_slot: u64) -> Result<()> {
        if let Some(max_lag) = self.max_slot_lag {
            let lag = reference_slot.saturating_sub(snapshot_slot);
            require!(lag <= max_lag, QuoteError::StaleSnapshot);
        }
        Ok(())
    }
}
