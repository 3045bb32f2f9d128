//! Decision API for callers with their own board representation.
//!
//! A caller implements [`ExternalPosition`] for its board type. On the first
//! call the agent walks the caller's sowing order once, starting at
//! player A's store, and caches which external slot backs each internal
//! slot. Every later call only reads stone counts through that mapping.

use crate::core::{absolute_slot, GameState, Player, PITS_PER_SIDE, SLOT_COUNT};
use crate::endgame::EndgameDb;
use crate::error::{Error, Result};
use crate::mcts::{MCTSConfig, MCTSSearch, SearchBudget, SearchStats};

/// Board position in a caller's own representation.
pub trait ExternalPosition {
    /// Caller's slot identifier.
    type SlotId: Clone + Eq + std::fmt::Debug;

    /// Store slot scoring for `player`.
    fn store_of(&self, player: Player) -> Self::SlotId;

    /// Slot receiving the next stone after `slot` while sowing.
    fn next_slot(&self, slot: &Self::SlotId) -> Self::SlotId;

    /// Stones currently in `slot`.
    fn stones_in(&self, slot: &Self::SlotId) -> u32;
}

/// MCTS player answering one move request at a time.
///
/// `S` is the caller's slot identifier type.
pub struct Agent<S = String> {
    search: MCTSSearch,
    mapping: Option<Vec<S>>,
}

impl<S: Clone + Eq + std::fmt::Debug> Agent<S> {
    /// Create an agent from a validated configuration.
    pub fn new(config: MCTSConfig) -> Result<Self> {
        Ok(Self {
            search: MCTSSearch::new(config)?,
            mapping: None,
        })
    }

    /// Create an agent from a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(MCTSConfig::from_json(json)?)
    }

    /// Serialize the agent's configuration.
    pub fn to_json(&self) -> Result<String> {
        self.search.config().to_json()
    }

    /// Use an already opened endgame table.
    #[must_use]
    pub fn with_endgame_db(mut self, db: EndgameDb) -> Self {
        self.search = self.search.with_endgame_db(db);
        self
    }

    /// Choose a move for `player` within `seconds` of thinking time.
    pub fn choose_move<P>(&mut self, position: &P, player: Player, seconds: u32) -> Result<u8>
    where
        P: ExternalPosition<SlotId = S>,
    {
        self.choose_move_with_budget(position, player, SearchBudget::from_seconds(seconds))
    }

    /// Choose a move for `player` within an explicit search budget.
    pub fn choose_move_with_budget<P>(
        &mut self,
        position: &P,
        player: Player,
        budget: SearchBudget,
    ) -> Result<u8>
    where
        P: ExternalPosition<SlotId = S>,
    {
        let game = self.game_state(position, player)?;
        self.search.search(&game, player, budget).ok_or(Error::GameOver)
    }

    /// Convert `position` into an internal state with `player` to move.
    ///
    /// Slots hold at most 255 stones. A slot above that is rejected with
    /// [`Error::BoardMapping`]; standard 72-stone Kalah never gets close.
    pub fn game_state<P>(&mut self, position: &P, player: Player) -> Result<GameState>
    where
        P: ExternalPosition<SlotId = S>,
    {
        let mapping = match self.mapping.take() {
            Some(mapping) => mapping,
            None => build_mapping(position)?,
        };

        let mut slots = [0u8; SLOT_COUNT];
        let filled: Result<()> = slots.iter_mut().zip(&mapping).try_for_each(|(stones, slot)| {
            let count = position.stones_in(slot);
            *stones = u8::try_from(count).map_err(|_| {
                Error::BoardMapping(format!("{count} stones in slot {slot:?}, at most {} fit", u8::MAX))
            })?;
            Ok(())
        });
        self.mapping = Some(mapping);
        filled?;

        let mut game = GameState::from_slots(player, slots);
        game.update_terminal_state();
        Ok(game)
    }

    /// Caller's slot for move `id` (1–6) of `player`.
    ///
    /// `None` before the first move request or for ids outside 1–6.
    #[must_use]
    pub fn external_slot(&self, player: Player, id: u8) -> Option<&S> {
        let id = usize::from(id);
        if !(1..=PITS_PER_SIDE).contains(&id) {
            return None;
        }
        self.mapping.as_ref()?.get(absolute_slot(player, id))
    }

    /// Statistics of the last decision.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        self.search.stats()
    }

    /// Underlying search engine.
    #[must_use]
    pub fn search(&self) -> &MCTSSearch {
        &self.search
    }

    /// Forget the kept search tree, e.g. when a new game starts.
    pub fn new_game(&mut self) {
        self.search.discard_tree();
    }
}

/// External slot for each internal slot, in internal order.
fn build_mapping<P: ExternalPosition>(position: &P) -> Result<Vec<P::SlotId>> {
    let start = position.store_of(Player::A);
    let mut walk = Vec::with_capacity(SLOT_COUNT);
    let mut slot = start.clone();
    for _ in 0..SLOT_COUNT {
        if walk.contains(&slot) {
            return Err(Error::BoardMapping(format!(
                "sowing order revisits {slot:?} before covering {SLOT_COUNT} slots"
            )));
        }
        let next = position.next_slot(&slot);
        walk.push(slot);
        slot = next;
    }
    if slot != start {
        return Err(Error::BoardMapping(format!(
            "sowing order does not return to {start:?} after {SLOT_COUNT} slots"
        )));
    }

    // Internal sowing runs downwards from slot 0, so the k-th step of the
    // walk is internal slot (14 - k) % 14
    let mapping: Vec<_> = (0..SLOT_COUNT)
        .map(|index| walk[(SLOT_COUNT - index) % SLOT_COUNT].clone())
        .collect();

    let store_b = position.store_of(Player::B);
    if mapping[Player::B.store()] != store_b {
        return Err(Error::BoardMapping(format!(
            "store of player B is {store_b:?}, expected it {} slots after the store of A",
            SLOT_COUNT / 2
        )));
    }
    log::debug!("board mapping established: {mapping:?}");
    Ok(mapping)
}
