use anchor_lang::prelude::*;

/// SuniSwap Quote Error Codes
/// Every failure path of a quote surfaces one of these; no best-effort fallbacks.
#[error_code]
pub enum QuoteError {
    // ═══════════════════════════════════════════════════════════════════════
    // MATH ERRORS (6000-6099)
    // ═══════════════════════════════════════════════════════════════════════

    /// Arithmetic overflow in checked operation
    #[msg("Math overflow")]
    MathOverflow, // 6000

    /// Division by zero attempted
    #[msg("Division by zero")]
    DivisionByZero, // 6001

    /// Token amount does not fit in u64
    #[msg("Amount exceeds u64 maximum")]
    AmountExceedsMax, // 6002

    /// Tick or sqrt price outside the global bounds
    #[msg("Tick or sqrt price out of bounds")]
    OutOfBounds, // 6003

    /// Human price could not be parsed or converted
    #[msg("Invalid price")]
    InvalidPrice, // 6004

    // ═══════════════════════════════════════════════════════════════════════
    // TICK / RANGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Tick spacing must be positive
    #[msg("Invalid tick spacing")]
    InvalidTickSpacing, // 6005

    /// Tick is not a multiple of the tick spacing
    #[msg("Tick not aligned to spacing")]
    TickNotAligned, // 6006

    /// Lower tick must be less than upper tick
    #[msg("Lower tick must be less than upper tick")]
    InvalidTickRange, // 6007

    /// Reposition target is the position's current range
    #[msg("Reposition to the same range")]
    SameRange, // 6008

    // ═══════════════════════════════════════════════════════════════════════
    // TICK ARRAY ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Traversal needs a tick array the caller did not supply
    #[msg("Tick array not supplied")]
    TickArrayNotSupplied, // 6009

    /// Tick array start index is not aligned to 88 * tick spacing
    #[msg("Invalid tick array start index")]
    InvalidTickArrayStartIndex, // 6010

    /// Tick array belongs to a different pool
    #[msg("Tick array does not belong to pool")]
    TickArrayPoolMismatch, // 6011

    /// Two supplied tick arrays share a start index
    #[msg("Duplicate tick array")]
    DuplicateTickArray, // 6012

    /// Snapshot slot is older than the configured lag allows
    #[msg("Stale snapshot")]
    StaleSnapshot, // 6013

    // ═══════════════════════════════════════════════════════════════════════
    // SWAP ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Swap amount is zero
    #[msg("Zero tradable amount")]
    ZeroTradableAmount, // 6014

    /// Swap cannot be filled at the requested size
    #[msg("Insufficient liquidity")]
    InsufficientLiquidity, // 6015

    /// Swap loop exceeded its step budget
    #[msg("Iteration limit exceeded")]
    IterationLimitExceeded, // 6016

    /// Sqrt price limit is on the wrong side of the current price
    #[msg("Invalid sqrt price limit direction")]
    InvalidSqrtPriceLimitDirection, // 6017

    /// Fee rate exceeds maximum
    #[msg("Invalid fee rate")]
    InvalidFeeRate, // 6018

    // ═══════════════════════════════════════════════════════════════════════
    // QUOTE INPUT ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Slippage tolerance above 100%
    #[msg("Invalid slippage tolerance")]
    InvalidSlippage, // 6019

    /// Reward timestamp precedes the pool's last update
    #[msg("Invalid timestamp")]
    InvalidTimestamp, // 6020

    /// Position belongs to a different pool
    #[msg("Position does not belong to pool")]
    PositionPoolMismatch, // 6021

    /// Mint is not one of the pool's tokens
    #[msg("Mint mismatch")]
    MintMismatch, // 6022

    // ═══════════════════════════════════════════════════════════════════════
    // TOKEN ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Transfer fee basis points above 100%
    #[msg("Invalid transfer fee")]
    InvalidTransferFee, // 6023

    /// Mint is non-transferable
    #[msg("Mint is non-transferable")]
    NonTransferableMint, // 6024

    /// Scaled UI multiplier must be positive
    #[msg("Invalid UI amount multiplier")]
    InvalidUiMultiplier, // 6025

    /// UI amounts are never negative
    #[msg("Invalid UI amount")]
    InvalidUiAmount, // 6026

    /// A transfer hook program runs on every transfer of this mint
    #[msg("Mint has a transfer hook")]
    TransferHookMint, // 6027
}
