//! Combinatorial ranking of low-stone positions.
//!
//! A position is reduced to the stone counts of its twelve pits, read from
//! the mover's point of view (own pits 1–6, then opponent pits 8–13). The
//! last pit is implied by the total, leaving a composition of `n` stones
//! into 11 bins, which is ranked with the combinatorial number system.
//!
//! Positions in which the mover has no stones are terminal and never stored.
//! For `n` stones they occupy exactly the ranks `0..C(n+5, 5)`, so the
//! stored ranks for `n` are `C(n+5, 5)..C(n+11, 11)`. The tables below line
//! those ranges up back to back, smallest `n` first.

use crate::core::GameState;

/// Largest stone count the offset tables cover.
pub const MAX_TABLE_STONES: u32 = 40;

/// Relative ids encoded by the rank, in order. Id 13 is implied.
const RANK_ORDER: [usize; 11] = [1, 2, 3, 4, 5, 6, 8, 9, 10, 11, 12];

/// `0! ..= 10!`, enough for every rank term (at most 10 dividers).
pub const FACTORIALS: [u64; 11] = factorials();

/// `EMPTY_SIDE[n] = C(n + 5, 5)`: compositions of `n` stones that leave the
/// mover's six pits empty.
pub const EMPTY_SIDE: [u64; MAX_TABLE_STONES as usize + 2] = empty_side_table();

/// `PARTITION_OFFSET[n]`: first table index holding an `n`-stone position.
pub const PARTITION_OFFSET: [u64; MAX_TABLE_STONES as usize + 2] = partition_offsets();

const fn factorials() -> [u64; 11] {
    let mut table = [1u64; 11];
    let mut i = 1;
    while i < 11 {
        table[i] = table[i - 1] * i as u64;
        i += 1;
    }
    table
}

/// `C(n, k)` by the multiplicative formula; exact at every step.
const fn choose(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = if k > n - k { n - k } else { k };
    let mut result = 1u64;
    let mut i = 0;
    while i < k {
        result = result * (n - i) / (i + 1);
        i += 1;
    }
    result
}

const fn empty_side_table() -> [u64; MAX_TABLE_STONES as usize + 2] {
    let mut table = [0u64; MAX_TABLE_STONES as usize + 2];
    let mut n = 0;
    while n < table.len() {
        table[n] = choose(n as u64 + 5, 5);
        n += 1;
    }
    table
}

const fn partition_offsets() -> [u64; MAX_TABLE_STONES as usize + 2] {
    let mut table = [0u64; MAX_TABLE_STONES as usize + 2];
    let mut n = 1;
    while n < table.len() {
        let k = (n - 1) as u64;
        table[n] = table[n - 1] + choose(k + 11, 11) - choose(k + 5, 5);
        n += 1;
    }
    table
}

/// Compositions of `stones` into `slots` bins that are smaller than the
/// current one at this bin: `C(stones + slots - 1, slots - 1)`.
///
/// Computed as a falling product over the larger factor divided by the
/// factorial of the smaller one.
#[inline]
fn rank_term(stones: u64, slots: u64) -> u64 {
    let dividers = slots - 1;
    let (high, low) = if stones > dividers {
        (stones, dividers)
    } else {
        (dividers, stones)
    };
    let mut product = 1u64;
    let mut factor = stones + dividers;
    while factor > high {
        product *= factor;
        factor -= 1;
    }
    product / FACTORIALS[low as usize]
}

/// Combinatorial rank of the pit layout of `game` among all layouts with
/// the same number of stones in play.
#[must_use]
pub fn rank(game: &GameState) -> u64 {
    let mut stones = u64::from(game.board().pit_stones());
    let mut slots = RANK_ORDER.len() as u64;
    let mut rank = 0;
    for id in RANK_ORDER {
        for _ in 0..game.stones(id) {
            rank += rank_term(stones, slots);
            stones -= 1;
        }
        slots -= 1;
    }
    rank
}

/// Table index of a non-terminal position with at most
/// [`MAX_TABLE_STONES`] stones in play.
#[must_use]
pub fn index(game: &GameState) -> usize {
    let stones = game.board().pit_stones() as usize;
    debug_assert!(stones <= MAX_TABLE_STONES as usize, "{stones} stones exceed the offset table");
    debug_assert!(game.board().side_stones(game.current_player()) > 0, "mover has no stones");
    (rank(game) - EMPTY_SIDE[stones] + PARTITION_OFFSET[stones]) as usize
}

/// Number of table entries covering every position with up to `max_stones`
/// stones in play.
#[must_use]
pub fn table_len(max_stones: u32) -> u64 {
    PARTITION_OFFSET[max_stones as usize + 1]
}

/// Largest stone count fully covered by a table of `len` entries.
#[must_use]
pub fn threshold_for_len(len: u64) -> u32 {
    let mut threshold = 0;
    while threshold < MAX_TABLE_STONES && PARTITION_OFFSET[threshold as usize + 2] <= len {
        threshold += 1;
    }
    threshold
}
