//! Fixed-size Kalah board.
//!
//! Slot layout (sowing runs towards lower indices, 0 wraps to 13):
//!
//! ```text
//!       (  8 )|(  9 )|( 10 )|( 11 )|( 12 )|( 13 )
//!  ( 7 )                                         ( 0 )
//!       (  6 )|(  5 )|(  4 )|(  3 )|(  2 )|(  1 )
//! ```
//!
//! Slot 0 is player A's store, slot 7 is player B's store.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::player::Player;

/// Number of slots on the board (12 pits + 2 stores).
pub const SLOT_COUNT: usize = 14;

/// Pits owned by each player.
pub const PITS_PER_SIDE: usize = 6;

/// Slots visited by one full lap of sowing (the opponent store is skipped).
pub const SOW_CYCLE: usize = SLOT_COUNT - 1;

/// Absolute slot of player A's store.
pub const STORE_A: usize = 0;

/// Absolute slot of player B's store.
pub const STORE_B: usize = 7;

/// Map a relative move id (1–6) of `player` to an absolute slot.
///
/// Values above 13 wrap around by 14, so relative ids 7–13 address the
/// opponent's half the same way for both players.
#[inline]
#[must_use]
pub const fn absolute_slot(player: Player, id: usize) -> usize {
    let slot = id + player.offset();
    if slot >= SLOT_COUNT {
        slot - SLOT_COUNT
    } else {
        slot
    }
}

/// Slot diametrically opposite to `slot` (1 ↔ 13, 6 ↔ 8).
#[inline]
#[must_use]
pub const fn opposite_slot(slot: usize) -> usize {
    (SLOT_COUNT - slot) % SLOT_COUNT
}

/// Owner of a slot. Stores belong to the player they score for.
#[inline]
#[must_use]
pub const fn owner(slot: usize) -> Player {
    if slot > 6 {
        Player::B
    } else {
        Player::A
    }
}

/// Check whether a slot is one of the two stores.
#[inline]
#[must_use]
pub const fn is_store(slot: usize) -> bool {
    slot == STORE_A || slot == STORE_B
}

/// Slot following `slot` in sowing order.
#[inline]
#[must_use]
pub const fn next_slot(slot: usize) -> usize {
    if slot == 0 {
        SLOT_COUNT - 1
    } else {
        slot - 1
    }
}

/// The 14 stone counters of a Kalah board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    slots: [u8; SLOT_COUNT],
}

impl BoardState {
    /// Create an empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [0; SLOT_COUNT],
        }
    }

    /// Create a board from raw slot counts.
    #[must_use]
    pub const fn from_slots(slots: [u8; SLOT_COUNT]) -> Self {
        Self { slots }
    }

    /// Standard opening position with `stones` in every pit and empty stores.
    #[must_use]
    pub fn with_stones_per_pit(stones: u8) -> Self {
        let mut board = Self::new();
        for slot in 0..SLOT_COUNT {
            if !is_store(slot) {
                board.slots[slot] = stones;
            }
        }
        board
    }

    /// Random board holding exactly `stones` stones.
    ///
    /// Every stone is dropped into a uniformly chosen slot; stores are left
    /// empty when `exclude_stores` is set.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, stones: u32, exclude_stores: bool) -> Self {
        let mut board = Self::new();
        for _ in 0..stones {
            let slot = if exclude_stores {
                // 12 pits: skip over the two stores
                let pit = rng.gen_range(0..2 * PITS_PER_SIDE);
                if pit < PITS_PER_SIDE {
                    pit + 1
                } else {
                    pit + 2
                }
            } else {
                rng.gen_range(0..SLOT_COUNT)
            };
            board.slots[slot] += 1;
        }
        board
    }

    /// Raw slot counts.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[u8; SLOT_COUNT] {
        &self.slots
    }

    /// Mutable raw slot counts.
    #[inline]
    pub fn slots_mut(&mut self) -> &mut [u8; SLOT_COUNT] {
        &mut self.slots
    }

    /// Stones in an absolute slot.
    #[inline]
    #[must_use]
    pub fn get(&self, slot: usize) -> u8 {
        self.slots[slot]
    }

    /// Empty a slot, returning how many stones it held.
    #[inline]
    pub fn clear_slot(&mut self, slot: usize) -> u8 {
        std::mem::take(&mut self.slots[slot])
    }

    /// Stones in a player's store.
    #[inline]
    #[must_use]
    pub fn store(&self, player: Player) -> u8 {
        self.slots[player.store()]
    }

    /// Stones in a player's six pits.
    #[must_use]
    pub fn side_stones(&self, player: Player) -> u32 {
        let first = player.offset() + 1;
        self.slots[first..first + PITS_PER_SIDE]
            .iter()
            .map(|&s| u32::from(s))
            .sum()
    }

    /// Stones still in play (all pits, stores excluded).
    #[must_use]
    pub fn pit_stones(&self) -> u32 {
        self.side_stones(Player::A) + self.side_stones(Player::B)
    }

    /// All stones on the board, stores included.
    #[must_use]
    pub fn total_stones(&self) -> u32 {
        self.slots.iter().map(|&s| u32::from(s)).sum()
    }

    /// Copy the slot values of another board into this one.
    pub fn copy_from(&mut self, other: &BoardState) {
        self.slots = other.slots;
    }
}

impl std::fmt::Display for BoardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "      ")?;
        for slot in 8..SLOT_COUNT {
            write!(f, "({:>3})", self.slots[slot])?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "({:>3}){:>31}({:>3})",
            self.slots[STORE_B], "", self.slots[STORE_A]
        )?;
        write!(f, "      ")?;
        for slot in (1..=PITS_PER_SIDE).rev() {
            write!(f, "({:>3})", self.slots[slot])?;
        }
        Ok(())
    }
}
