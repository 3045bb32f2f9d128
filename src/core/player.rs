//! Player identification and game outcome.
//!
//! ## Player
//!
//! Kalah is strictly two-player. `Player::A` owns pits 1–6 and the store in
//! slot 0, `Player::B` owns pits 8–13 and the store in slot 7.
//!
//! ## Winner
//!
//! Outcome flag carried by every `GameState`; `Winner::None` while the game
//! is still running.

use serde::{Deserialize, Serialize};

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// First player (store in slot 0).
    A,
    /// Second player (store in slot 7).
    B,
}

impl Player {
    /// Both players, in index order.
    pub const ALL: [Player; 2] = [Player::A, Player::B];

    /// Get the raw player index (0 for A, 1 for B).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Player::A => 0,
            Player::B => 1,
        }
    }

    /// The other player.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// Offset added to a relative move id to get an absolute slot.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> usize {
        self.index() * 7
    }

    /// Absolute slot of this player's store.
    #[inline]
    #[must_use]
    pub const fn store(self) -> usize {
        self.offset()
    }

    /// Translate an absolute slot into this player's relative numbering.
    ///
    /// Inverse of [`crate::core::board::absolute_slot`]: the own store is 0,
    /// own pits are 1–6, the opponent store is 7.
    #[inline]
    #[must_use]
    pub const fn relative(self, slot: usize) -> usize {
        (slot + 14 - self.offset()) % 14
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::A => write!(f, "Player A"),
            Player::B => write!(f, "Player B"),
        }
    }
}

/// Result flag of a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    /// Game still running.
    #[default]
    None,
    /// Player A has the larger store.
    PlayerA,
    /// Player B has the larger store.
    PlayerB,
    /// Both stores are equal.
    Draw,
}

impl Winner {
    /// The winning-side flag for a player.
    #[must_use]
    pub const fn of(player: Player) -> Self {
        match player {
            Player::A => Winner::PlayerA,
            Player::B => Winner::PlayerB,
        }
    }

    /// Check whether the game has been decided.
    #[inline]
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Winner::None)
    }

    /// Check if a player won.
    #[must_use]
    pub fn is_winner(self, player: Player) -> bool {
        self == Winner::of(player)
    }
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::None => write!(f, "NOBODY"),
            Winner::PlayerA => write!(f, "{}", Player::A),
            Winner::PlayerB => write!(f, "{}", Player::B),
            Winner::Draw => write!(f, "DRAW"),
        }
    }
}
