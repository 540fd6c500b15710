//! Tick Math
//!
//! Converts between tick indices and sqrt prices.
//!
//! tick = log_{1.0001}(price)
//! sqrt_price = sqrt(1.0001^tick) = 1.0001^(tick/2), stored as Q64.64
//!
//! Both directions are table-driven so the results match the settlement
//! program bit-for-bit.

use crate::constants::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};
use crate::errors::QuoteError;
use crate::math::full_math::mul_shift_96;
use anchor_lang::prelude::*;

/// log_{1.0001}(2) in Q32.32
const LOG_B_2_X32: i128 = 59543866431248;

/// Fractional bits of log2 computed before switching to the error margin
const BIT_PRECISION: u32 = 14;

/// 0.01 in Q64.64
const LOG_B_P_ERR_MARGIN_LOWER_X64: i128 = 184467440737095516;

/// 2^-BIT_PRECISION / log_2(b) + 0.01 in Q64.64
const LOG_B_P_ERR_MARGIN_UPPER_X64: i128 = 15793534762490258745;

/// Inclusive range of ticks a pool may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRange {
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
}

/// Get sqrt price at a given tick
/// sqrt_price_x64 = sqrt(1.0001^tick) * 2^64
pub fn tick_index_to_sqrt_price(tick: i32) -> Result<u128> {
    require!(is_tick_index_in_bounds(tick), QuoteError::OutOfBounds);

    if tick >= 0 {
        get_sqrt_price_positive_tick(tick)
    } else {
        Ok(get_sqrt_price_negative_tick(tick))
    }
}

/// Get tick at a given sqrt price
///
/// Returns the tick `t` such that
/// `tick_index_to_sqrt_price(t) <= sqrt_price < tick_index_to_sqrt_price(t + 1)`.
pub fn sqrt_price_to_tick_index(sqrt_price_x64: u128) -> Result<i32> {
    require!(
        (MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&sqrt_price_x64),
        QuoteError::OutOfBounds
    );

    // Integer part of log2, msb is always >= 32 inside the bounds
    let msb: u32 = 128 - sqrt_price_x64.leading_zeros() - 1;
    let log2p_integer_x32 = (msb as i128 - 64) << 32;

    // Fractional part: square r (normalised to [1, 2) as Q1.63) and take one
    // bit of log2 each round
    let mut bit: i128 = 0x8000_0000_0000_0000;
    let mut precision = 0;
    let mut log2p_fraction_x64: i128 = 0;

    let mut r = if msb >= 64 {
        sqrt_price_x64 >> (msb - 63)
    } else {
        sqrt_price_x64 << (63 - msb)
    };

    while bit > 0 && precision < BIT_PRECISION {
        r *= r;
        let is_r_more_than_two = r >> 127_u32;
        r >>= 63 + is_r_more_than_two;
        log2p_fraction_x64 += bit * is_r_more_than_two as i128;
        bit >>= 1;
        precision += 1;
    }

    let log2p_fraction_x32 = log2p_fraction_x64 >> 32;
    let log2p_x32 = log2p_integer_x32 + log2p_fraction_x32;

    // Change of base: log_b(p) = log_2(p) * log_b(2)
    let logbp_x64 = log2p_x32 * LOG_B_2_X32;

    let tick_low = ((logbp_x64 - LOG_B_P_ERR_MARGIN_LOWER_X64) >> 64) as i32;
    let tick_high = ((logbp_x64 + LOG_B_P_ERR_MARGIN_UPPER_X64) >> 64) as i32;

    if tick_low == tick_high {
        return Ok(tick_low);
    }

    // The estimate straddles a tick boundary, settle it with the exact price
    let tick_high_sqrt_price_x64 = tick_index_to_sqrt_price(tick_high)?;
    if tick_high_sqrt_price_x64 <= sqrt_price_x64 {
        Ok(tick_high)
    } else {
        Ok(tick_low)
    }
}

/// Check if a tick is within the global bounds
pub fn is_tick_index_in_bounds(tick: i32) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick)
}

/// Check if a tick is a multiple of the tick spacing
pub fn is_tick_initializable(tick: i32, tick_spacing: u16) -> bool {
    tick_spacing != 0 && tick % tick_spacing as i32 == 0
}

/// Round a tick to a multiple of the tick spacing
///
/// Rounds toward negative infinity, or toward positive infinity when
/// `round_up` is set. Already-aligned ticks are returned unchanged.
pub fn get_initializable_tick_index(tick: i32, tick_spacing: u16, round_up: bool) -> Result<i32> {
    require!(tick_spacing > 0, QuoteError::InvalidTickSpacing);
    let spacing = tick_spacing as i32;
    let floor = tick.div_euclid(spacing) * spacing;
    if round_up && floor != tick {
        Ok(floor + spacing)
    } else {
        Ok(floor)
    }
}

/// Largest initializable tick strictly below `tick`
pub fn get_prev_initializable_tick_index(tick: i32, tick_spacing: u16) -> Result<i32> {
    let initializable = get_initializable_tick_index(tick, tick_spacing, false)?;
    if initializable == tick {
        Ok(initializable - tick_spacing as i32)
    } else {
        Ok(initializable)
    }
}

/// Smallest initializable tick strictly above `tick`
pub fn get_next_initializable_tick_index(tick: i32, tick_spacing: u16) -> Result<i32> {
    let initializable = get_initializable_tick_index(tick, tick_spacing, true)?;
    if initializable == tick {
        Ok(initializable + tick_spacing as i32)
    } else {
        Ok(initializable)
    }
}

/// The widest range a position may span for a given spacing
pub fn get_full_range_tick_indexes(tick_spacing: u16) -> Result<TickRange> {
    require!(tick_spacing > 0, QuoteError::InvalidTickSpacing);
    let spacing = tick_spacing as i32;
    Ok(TickRange {
        tick_lower_index: (MIN_TICK / spacing) * spacing,
        tick_upper_index: (MAX_TICK / spacing) * spacing,
    })
}

/// Order two ticks ascending
pub fn order_tick_indexes(tick_a: i32, tick_b: i32) -> TickRange {
    TickRange {
        tick_lower_index: tick_a.min(tick_b),
        tick_upper_index: tick_a.max(tick_b),
    }
}

/// Tick of the inverse price (1.0001^-tick)
pub fn invert_tick_index(tick: i32) -> i32 {
    -tick
}

/// Sqrt price of the inverse price, at tick granularity
pub fn invert_sqrt_price(sqrt_price_x64: u128) -> Result<u128> {
    let tick = sqrt_price_to_tick_index(sqrt_price_x64)?;
    tick_index_to_sqrt_price(invert_tick_index(tick))
}

/// Validate a position range against spacing and bounds
pub fn validate_tick_range(tick_lower: i32, tick_upper: i32, tick_spacing: u16) -> Result<()> {
    require!(tick_spacing > 0, QuoteError::InvalidTickSpacing);
    require!(tick_lower < tick_upper, QuoteError::InvalidTickRange);
    require!(
        is_tick_index_in_bounds(tick_lower) && is_tick_index_in_bounds(tick_upper),
        QuoteError::OutOfBounds
    );
    require!(
        is_tick_initializable(tick_lower, tick_spacing)
            && is_tick_initializable(tick_upper, tick_spacing),
        QuoteError::TickNotAligned
    );
    Ok(())
}

// Precomputed 1.0001^(2^i / 2) in Q32.96
fn get_sqrt_price_positive_tick(tick: i32) -> Result<u128> {
    let mut ratio: u128 = if tick & 1 != 0 {
        79232123823359799118286999567
    } else {
        79228162514264337593543950336
    };

    const MULTIPLIERS: [(i32, u128); 18] = [
        (0x2, 79236085330515764027303304731),
        (0x4, 79244008939048815603706035061),
        (0x8, 79259858533276714757314932305),
        (0x10, 79291567232598584799939703904),
        (0x20, 79355022692464371645785046466),
        (0x40, 79482085999252804386437311141),
        (0x80, 79736823300114093921829183326),
        (0x100, 80248749790819932309965073892),
        (0x200, 81282483887344747381513967011),
        (0x400, 83390072131320151908154831281),
        (0x800, 87770609709833776024991924138),
        (0x1000, 97234110755111693312479820773),
        (0x2000, 119332217159966728226237229890),
        (0x4000, 179736315981702064433883588727),
        (0x8000, 407748233172238350107850275304),
        (0x10000, 2098478828474011932436660412517),
        (0x20000, 55581415166113811149459800483533),
        (0x40000, 38992368544603139932233054999993551),
    ];

    for (mask, multiplier) in MULTIPLIERS {
        if tick & mask != 0 {
            ratio = mul_shift_96(ratio, multiplier)?;
        }
    }

    // Q32.96 -> Q64.64
    Ok(ratio >> 32)
}

// Precomputed 1.0001^(-2^i / 2) in Q64.64; products stay below 2^128
fn get_sqrt_price_negative_tick(tick: i32) -> u128 {
    let abs_tick = tick.unsigned_abs();

    let mut ratio: u128 = if abs_tick & 1 != 0 {
        18445821805675392311
    } else {
        18446744073709551616
    };

    const MULTIPLIERS: [(u32, u128); 18] = [
        (0x2, 18444899583751176498),
        (0x4, 18443055278223354162),
        (0x8, 18439367220385604838),
        (0x10, 18431993317065449817),
        (0x20, 18417254355718160513),
        (0x40, 18387811781193591352),
        (0x80, 18329067761203520168),
        (0x100, 18212142134806087854),
        (0x200, 17980523815641551639),
        (0x400, 17526086738831147013),
        (0x800, 16651378430235024244),
        (0x1000, 15030750278693429944),
        (0x2000, 12247334978882834399),
        (0x4000, 8131365268884726200),
        (0x8000, 3584323654723342297),
        (0x10000, 696457651847595233),
        (0x20000, 26294789957452057),
        (0x40000, 37481735321082),
    ];

    for (mask, multiplier) in MULTIPLIERS {
        if abs_tick & mask != 0 {
            ratio = (ratio * multiplier) >> 64;
        }
    }

    ratio
}
