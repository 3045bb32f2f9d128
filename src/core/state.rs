//! Game state and the Kalah rules.
//!
//! ## GameState
//!
//! One `BoardState` plus the player to move and the winner flag. All rules
//! live here:
//! - closed-form sowing with full laps and the opponent-store skip
//! - capture on an empty own pit
//! - extra turn when the last stone lands in the own store
//! - terminal sweep when either side runs out of stones
//!
//! Move ids are *relative* to the player to move (1–6, own pits).

use serde::{Deserialize, Serialize};

use super::board::{
    absolute_slot, next_slot, opposite_slot, owner, BoardState, PITS_PER_SIDE, SLOT_COUNT,
    SOW_CYCLE, STORE_A, STORE_B,
};
use super::player::{Player, Winner};

/// Legal-move flags indexed by move id (index 0 is unused).
pub type MoveMask = [bool; PITS_PER_SIDE + 1];

/// Complete Kalah position.
///
/// Equality and hashing cover the slots and the player to move; the winner
/// flag is derived from the slots once the terminal sweep has run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    board: BoardState,
    current_player: Player,
    winner: Winner,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(BoardState::with_stones_per_pit(6), Player::A)
    }
}

impl GameState {
    /// Create a state for `current_player` to move on `board`.
    ///
    /// The winner flag starts undecided; call [`update_terminal_state`]
    /// when the board may already be finished.
    ///
    /// [`update_terminal_state`]: GameState::update_terminal_state
    #[must_use]
    pub fn new(board: BoardState, current_player: Player) -> Self {
        Self {
            board,
            current_player,
            winner: Winner::None,
        }
    }

    /// Create a state from raw slot counts.
    #[must_use]
    pub fn from_slots(current_player: Player, slots: [u8; SLOT_COUNT]) -> Self {
        Self::new(BoardState::from_slots(slots), current_player)
    }

    /// Overwrite this state with another one, reusing the storage.
    pub fn copy_from(&mut self, other: &GameState) -> &mut Self {
        self.board.copy_from(&other.board);
        self.current_player = other.current_player;
        self.winner = other.winner;
        self
    }

    /// The board.
    #[inline]
    #[must_use]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Player to move.
    #[inline]
    #[must_use]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Winner flag (`Winner::None` while running).
    #[inline]
    #[must_use]
    pub fn winner(&self) -> Winner {
        self.winner
    }

    /// Check whether the game is over.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.winner.is_decided()
    }

    /// Play relative move `id` for the player to move.
    ///
    /// Preconditions: `1 <= id <= 6` and `stones(id) > 0`.
    ///
    /// Returns `true` if the move ended the game.
    pub fn perform_move(&mut self, id: usize) -> bool {
        debug_assert!((1..=PITS_PER_SIDE).contains(&id), "move id out of range: {id}");
        debug_assert!(self.is_selectable(id), "move {id} selects an empty pit");

        let mover = self.current_player;
        let enemy_store = mover.opponent().store();
        let mut slot = absolute_slot(mover, id);
        let mut stones = usize::from(self.board.clear_slot(slot));
        let slots = self.board.slots_mut();

        // Full laps touch every slot once except the opponent store
        let rounds = stones / SOW_CYCLE;
        if rounds > 0 {
            let rounds = rounds as u8;
            for count in slots.iter_mut() {
                *count += rounds;
            }
            slots[enemy_store] -= rounds;
        }
        stones -= rounds * SOW_CYCLE;

        // The opponent store sits `id + 7` steps away; walking past it costs
        // one extra step, which is taken back after sowing.
        let passes_enemy_store = stones >= id + 7;
        if passes_enemy_store {
            stones += 1;
        }
        for _ in 0..stones {
            slot = next_slot(slot);
            slots[slot] += 1;
        }
        if passes_enemy_store {
            slots[enemy_store] -= 1;
        }

        if slot != mover.store() {
            if owner(slot) == mover && slots[slot] == 1 {
                let captured = self.board.clear_slot(opposite_slot(slot)) + self.board.clear_slot(slot);
                self.board.slots_mut()[mover.store()] += captured;
            }
            self.current_player = mover.opponent();
        }

        self.update_terminal_state()
    }

    /// Sweep the board if either side is empty and decide the winner.
    ///
    /// Returns `true` if the sweep happened (the game is over).
    pub fn update_terminal_state(&mut self) -> bool {
        let side_a = self.board.side_stones(Player::A);
        let side_b = self.board.side_stones(Player::B);
        if side_a != 0 && side_b != 0 {
            return false;
        }

        for player in Player::ALL {
            let first = player.offset() + 1;
            let mut swept = 0;
            for slot in first..first + PITS_PER_SIDE {
                swept += self.board.clear_slot(slot);
            }
            self.board.slots_mut()[player.store()] += swept;
        }

        let store_a = self.board.get(STORE_A);
        let store_b = self.board.get(STORE_B);
        self.winner = match store_a.cmp(&store_b) {
            std::cmp::Ordering::Greater => Winner::PlayerA,
            std::cmp::Ordering::Less => Winner::PlayerB,
            std::cmp::Ordering::Equal => Winner::Draw,
        };
        true
    }

    /// Stones in relative slot `id` of the player to move.
    ///
    /// Ids 0–13 are accepted: 0 is the own store, 7 the opponent store.
    #[inline]
    #[must_use]
    pub fn stones(&self, id: usize) -> u8 {
        self.board.get(absolute_slot(self.current_player, id))
    }

    /// Stones opposite to relative slot `id` of the player to move.
    #[inline]
    #[must_use]
    pub fn opposite_stones(&self, id: usize) -> u8 {
        self.board
            .get(opposite_slot(absolute_slot(self.current_player, id)))
    }

    /// Check whether move `id` is legal (its pit holds stones).
    #[inline]
    #[must_use]
    pub fn is_selectable(&self, id: usize) -> bool {
        self.stones(id) > 0
    }

    /// Number of legal moves (0–6).
    #[must_use]
    pub fn selectable_count(&self) -> usize {
        (1..=PITS_PER_SIDE).filter(|&id| self.is_selectable(id)).count()
    }

    /// Legal-move flags for the player to move.
    #[must_use]
    pub fn legal_moves(&self) -> MoveMask {
        let mut mask = [false; PITS_PER_SIDE + 1];
        for (id, legal) in mask.iter_mut().enumerate().skip(1) {
            *legal = self.is_selectable(id);
        }
        mask
    }

    /// Absolute slot receiving the last stone of move `id`, ignoring laps.
    ///
    /// Only exact for moves of 13 stones or fewer; the move is not played.
    #[must_use]
    pub fn last_landing_slot(&self, id: usize) -> usize {
        let mut steps = usize::from(self.stones(id));
        if steps >= id + 7 {
            steps += 1;
        }
        let relative = (id + 2 * SLOT_COUNT - steps % SLOT_COUNT) % SLOT_COUNT;
        absolute_slot(self.current_player, relative)
    }

    /// Store differential (current player minus opponent).
    #[must_use]
    pub fn store_difference(&self) -> i32 {
        let me = self.current_player;
        i32::from(self.board.store(me)) - i32::from(self.board.store(me.opponent()))
    }
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.current_player == other.current_player && self.board == other.board
    }
}

impl Eq for GameState {}

impl std::hash::Hash for GameState {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.board.hash(state);
        self.current_player.hash(state);
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Current Player: {:<12} Winner: {}",
            self.current_player.to_string(),
            self.winner
        )?;
        write!(f, "{}", self.board)
    }
}
