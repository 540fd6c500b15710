//! SuniSwap Quote - Off-chain quoting engine for concentrated liquidity pools
//!
//! Reproduces, bit for bit, the arithmetic the settlement program runs for
//! swaps, liquidity changes and fee/reward accrual, so that a quote computed
//! from account snapshots is exactly what the chain will do.
//!
//! ## Architecture
//!
//! - **Math**: Q64.64 fixed point with 256/512-bit intermediates, no floats
//! - **State**: Immutable pool, tick array and position snapshots tagged with their slot
//! - **Quotes**: Swap simulation, liquidity increase/decrease, reposition, fees, rewards
//! - **Token**: Transfer-fee and scaled-UI adjustment at the owner boundary
//! - **Interfaces**: Snapshot source and mint resolver traits behind a `Quoter` façade
//!
//! ## Guarantees
//!
//! - Quotes never mutate their inputs; simulated state comes back in the result
//! - Every failure surfaces as a `QuoteError`, never a best-effort fallback
//! - Tick traversal only uses tick arrays the caller supplied
//!
//! Enable the `quote-logs` feature to emit `msg!` summaries from quote entry points.

pub mod config;
pub mod constants;
pub mod errors;
pub mod interfaces;
pub mod math;
pub mod quote;
pub mod state;
pub mod token;

pub use config::QuoteConfig;
pub use errors::QuoteError;
pub use interfaces::{Freshness, MintMetaResolver, Quoter, SnapshotSource};
pub use quote::{
    quote_collect_fees, quote_collect_rewards, quote_decrease_liquidity_by_liquidity,
    quote_decrease_liquidity_by_token, quote_fees, quote_increase_liquidity_by_input_token,
    quote_increase_liquidity_by_liquidity, quote_reposition, quote_rewards, simulate_swap,
    swap_quote_by_input_token, swap_quote_by_output_token, SwapParams, SwapResult,
};
pub use state::{PoolSnapshot, Position, Tick, TickArray};
pub use token::{MintMeta, MintPair};
