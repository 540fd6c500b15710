// SuniSwap Quote Constants
// Mirrors the settlement program's numeric domain; any drift here breaks parity.

/// Number of ticks per tick array
pub const TICK_ARRAY_SIZE: usize = 88;

/// Minimum tick index (p(i) = 1.0001^i)
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index
pub const MAX_TICK: i32 = 443636;

/// Minimum sqrt price (Q64.64 format), equal to the sqrt price at MIN_TICK
pub const MIN_SQRT_PRICE_X64: u128 = 4295048016;

/// Maximum sqrt price (Q64.64 format), equal to the sqrt price at MAX_TICK
pub const MAX_SQRT_PRICE_X64: u128 = 79226673515401279992447579055;

/// Number of reward slots per pool
pub const NUM_REWARDS: usize = 3;

/// Swap fee rate denominator, fee rates are in hundredths of a bip (3000 = 0.3%)
pub const FEE_RATE_DENOMINATOR: u32 = 1_000_000;

/// Maximum swap fee rate (6%)
pub const MAX_FEE_RATE: u16 = 60_000;

/// Protocol fee rate denominator, protocol fee rates are in basis points of the swap fee
pub const PROTOCOL_FEE_RATE_DENOMINATOR: u16 = 10_000;

/// Maximum protocol fee rate (25% of the swap fee)
pub const MAX_PROTOCOL_FEE_RATE: u16 = 2_500;

/// Basis point denominator (10000 = 100%), used by slippage and transfer fees
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Sqrt price limit value meaning "no explicit limit"
pub const NO_EXPLICIT_SQRT_PRICE_LIMIT: u128 = 0;
