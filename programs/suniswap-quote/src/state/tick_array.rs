use crate::config::QuoteConfig;
use crate::constants::{MAX_TICK, MIN_TICK, TICK_ARRAY_SIZE};
use crate::errors::QuoteError;
use crate::math::tick_math::is_tick_initializable;
use crate::state::pool::PoolSnapshot;
use crate::state::tick::Tick;
use anchor_lang::prelude::*;

/// Number of tick indices a single array spans
pub fn ticks_in_array(tick_spacing: u16) -> i32 {
    TICK_ARRAY_SIZE as i32 * tick_spacing as i32
}

/// Calculate the start index for a tick array containing a given tick
pub fn get_tick_array_start_tick_index(tick_index: i32, tick_spacing: u16) -> Result<i32> {
    require!(tick_spacing > 0, QuoteError::InvalidTickSpacing);
    let ticks_per_array = ticks_in_array(tick_spacing);
    Ok(tick_index.div_euclid(ticks_per_array) * ticks_per_array)
}

/// Tick Array - a contiguous run of `TICK_ARRAY_SIZE` ticks
/// Must start at a multiple of (TICK_ARRAY_SIZE * tick_spacing)
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct TickArray {
    /// The pool this tick array belongs to
    pub pool: Pubkey,

    pub start_tick_index: i32,

    pub ticks: [Tick; TICK_ARRAY_SIZE],

    /// Slot the array was read at
    pub slot: u64,
}

impl TickArray {
    /// An array with every tick uninitialized, standing in for an array that
    /// has never been created on chain
    pub fn uninitialized(pool: Pubkey, start_tick_index: i32, slot: u64) -> Self {
        Self {
            pool,
            start_tick_index,
            ticks: [Tick::default(); TICK_ARRAY_SIZE],
            slot,
        }
    }

    /// One past the last tick index covered by this array
    pub fn end_tick_index(&self, tick_spacing: u16) -> i32 {
        self.start_tick_index + ticks_in_array(tick_spacing)
    }

    /// Check if a tick index falls within this array
    pub fn is_tick_in_array(&self, tick_index: i32, tick_spacing: u16) -> bool {
        tick_index >= self.start_tick_index && tick_index < self.end_tick_index(tick_spacing)
    }

    /// The array holding MIN_TICK
    pub fn is_min_tick_array(&self) -> bool {
        self.start_tick_index <= MIN_TICK
    }

    /// The array holding MAX_TICK
    pub fn is_max_tick_array(&self, tick_spacing: u16) -> bool {
        self.end_tick_index(tick_spacing) > MAX_TICK
    }

    fn tick_offset(&self, tick_index: i32, tick_spacing: u16) -> Result<usize> {
        require!(
            self.is_tick_in_array(tick_index, tick_spacing),
            QuoteError::TickArrayNotSupplied
        );
        require!(
            is_tick_initializable(tick_index, tick_spacing),
            QuoteError::TickNotAligned
        );
        Ok(((tick_index - self.start_tick_index) / tick_spacing as i32) as usize)
    }

    /// Get the tick at a specific index
    pub fn get_tick(&self, tick_index: i32, tick_spacing: u16) -> Result<&Tick> {
        let offset = self.tick_offset(tick_index, tick_spacing)?;
        Ok(&self.ticks[offset])
    }

    /// Find the next initialized tick within this array
    ///
    /// a_to_b searches ticks `<= tick_index`, b_to_a searches ticks `> tick_index`.
    /// `tick_index` need not be aligned and may lie outside the array, in which
    /// case the search covers the whole array from the near end.
    pub fn next_initialized_tick_in_array(
        &self,
        tick_index: i32,
        tick_spacing: u16,
        a_to_b: bool,
    ) -> Option<i32> {
        let spacing = tick_spacing as i32;
        let tick_at = |offset: usize| self.start_tick_index + offset as i32 * spacing;

        if a_to_b {
            if tick_index < self.start_tick_index {
                return None;
            }
            let offset = ((tick_index - self.start_tick_index) / spacing)
                .min(TICK_ARRAY_SIZE as i32 - 1) as usize;
            (0..=offset)
                .rev()
                .find(|&i| self.ticks[i].initialized)
                .map(tick_at)
        } else {
            if tick_index >= self.end_tick_index(tick_spacing) - 1 {
                return None;
            }
            // First aligned tick strictly above tick_index
            let first = if tick_index < self.start_tick_index {
                0
            } else {
                ((tick_index - self.start_tick_index).div_euclid(spacing) + 1) as usize
            };
            (first..TICK_ARRAY_SIZE)
                .find(|&i| self.ticks[i].initialized)
                .map(tick_at)
        }
    }
}

/// Caller-supplied tick arrays for one pool, sorted by start index
///
/// Traversal never guesses: a step into a region no supplied array covers
/// fails with `TickArrayNotSupplied`.
#[derive(Debug, Clone)]
pub struct TickArraySequence<'a> {
    arrays: Vec<&'a TickArray>,
    tick_spacing: u16,
}

impl<'a> TickArraySequence<'a> {
    pub fn new(
        pool: &PoolSnapshot,
        tick_arrays: &'a [TickArray],
        config: &QuoteConfig,
    ) -> Result<Self> {
        require!(pool.tick_spacing > 0, QuoteError::InvalidTickSpacing);
        let ticks_per_array = ticks_in_array(pool.tick_spacing);

        let mut arrays: Vec<&'a TickArray> = Vec::with_capacity(tick_arrays.len());
        for tick_array in tick_arrays {
            require_keys_eq!(tick_array.pool, pool.address, QuoteError::TickArrayPoolMismatch);
            require!(
                tick_array.start_tick_index % ticks_per_array == 0,
                QuoteError::InvalidTickArrayStartIndex
            );
            config.check_freshness(pool.slot, tick_array.slot)?;
            arrays.push(tick_array);
        }

        arrays.sort_by_key(|tick_array| tick_array.start_tick_index);
        for pair in arrays.windows(2) {
            require!(
                pair[0].start_tick_index != pair[1].start_tick_index,
                QuoteError::DuplicateTickArray
            );
        }

        Ok(Self {
            arrays,
            tick_spacing: pool.tick_spacing,
        })
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn tick_spacing(&self) -> u16 {
        self.tick_spacing
    }

    /// Supplied array with the given start index
    pub fn get_array(&self, start_tick_index: i32) -> Option<&'a TickArray> {
        self.arrays
            .binary_search_by_key(&start_tick_index, |tick_array| tick_array.start_tick_index)
            .ok()
            .map(|i| self.arrays[i])
    }

    /// Supplied array covering `tick_index`
    pub fn array_for_tick(&self, tick_index: i32) -> Result<&'a TickArray> {
        let start = get_tick_array_start_tick_index(tick_index, self.tick_spacing)?;
        self.get_array(start)
            .ok_or(QuoteError::TickArrayNotSupplied.into())
    }

    pub fn get_tick(&self, tick_index: i32) -> Result<&'a Tick> {
        self.array_for_tick(tick_index)?
            .get_tick(tick_index, self.tick_spacing)
    }

    /// Tick at `tick_index`, or an uninitialized tick when no supplied array covers it
    pub fn tick_or_default(&self, tick_index: i32) -> Result<Tick> {
        match self.array_for_tick(tick_index) {
            Ok(tick_array) => Ok(*tick_array.get_tick(tick_index, self.tick_spacing)?),
            Err(_) => {
                require!(
                    is_tick_initializable(tick_index, self.tick_spacing),
                    QuoteError::TickNotAligned
                );
                Ok(Tick::default())
            }
        }
    }

    /// Next initialized tick strictly in the swap direction
    ///
    /// a_to_b searches `<= from`, b_to_a searches `> from`. Returns `None` only
    /// when the global tick bound is reached; needing an array that was not
    /// supplied is an error.
    pub fn find_next_initialized_tick(&self, from: i32, a_to_b: bool) -> Result<Option<i32>> {
        let mut cursor = from;
        loop {
            if a_to_b {
                if cursor < MIN_TICK {
                    return Ok(None);
                }
                let tick_array = self.array_for_tick(cursor)?;
                if let Some(tick) =
                    tick_array.next_initialized_tick_in_array(cursor, self.tick_spacing, true)
                {
                    return Ok(Some(tick));
                }
                cursor = tick_array.start_tick_index - 1;
            } else {
                if cursor >= MAX_TICK {
                    return Ok(None);
                }
                let tick_array = self.array_for_tick(cursor + 1)?;
                if let Some(tick) =
                    tick_array.next_initialized_tick_in_array(cursor, self.tick_spacing, false)
                {
                    return Ok(Some(tick));
                }
                cursor = tick_array.end_tick_index(self.tick_spacing) - 1;
            }
        }
    }

    /// Next tick a swap step should stop at, and whether it is initialized
    ///
    /// Continues through contiguous supplied arrays. When the next array is
    /// missing it stops at the edge of the last one (MIN_TICK / MAX_TICK at the
    /// global edge), so a swap fails only if it must go further.
    pub fn next_swap_target_tick(&self, from: i32, a_to_b: bool) -> Result<(i32, bool)> {
        let ticks_per_array = ticks_in_array(self.tick_spacing);
        let mut cursor = from;

        if a_to_b {
            if cursor < MIN_TICK {
                return Ok((MIN_TICK, false));
            }
            let mut tick_array = self.array_for_tick(cursor)?;
            loop {
                if let Some(tick) =
                    tick_array.next_initialized_tick_in_array(cursor, self.tick_spacing, true)
                {
                    return Ok((tick, true));
                }
                if tick_array.is_min_tick_array() {
                    return Ok((MIN_TICK, false));
                }
                match self.get_array(tick_array.start_tick_index - ticks_per_array) {
                    Some(next_array) => {
                        cursor = tick_array.start_tick_index - 1;
                        tick_array = next_array;
                    }
                    None => return Ok((tick_array.start_tick_index, false)),
                }
            }
        } else {
            if cursor >= MAX_TICK {
                return Ok((MAX_TICK, false));
            }
            let mut tick_array = self.array_for_tick(cursor + 1)?;
            loop {
                if let Some(tick) =
                    tick_array.next_initialized_tick_in_array(cursor, self.tick_spacing, false)
                {
                    return Ok((tick, true));
                }
                if tick_array.is_max_tick_array(self.tick_spacing) {
                    return Ok((MAX_TICK, false));
                }
                let edge = tick_array.end_tick_index(self.tick_spacing) - 1;
                match self.get_array(tick_array.start_tick_index + ticks_per_array) {
                    Some(next_array) => {
                        cursor = edge;
                        tick_array = next_array;
                    }
                    None => return Ok((edge, false)),
                }
            }
        }
    }

    /// Upper bound on swap loop iterations these arrays can justify
    pub fn max_swap_steps(&self) -> u32 {
        (self.arrays.len() as u32)
            .saturating_mul(TICK_ARRAY_SIZE as u32 + 1)
            .saturating_add(2)
    }
}
