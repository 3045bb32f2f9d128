//! Move-scoring heuristics.
//!
//! Every heuristic reads a `GameState` and the legal-move mask and writes a
//! weight in `[-1, 1]` for each legal move id 1–6. Index 0 and illegal ids
//! are left untouched unless noted otherwise.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{opposite_slot, GameState, MoveMask, PITS_PER_SIDE};
use crate::error::Error;

/// Per-move weights, index 0 unused.
pub type Weights = [f32; PITS_PER_SIDE + 1];

/// The known heuristics, numbered as in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeuristicKind {
    /// Last stone lands in the own store.
    ExtraTurn = 0,
    /// Share of the stones a capturing move would take.
    StealStones = 1,
    /// Sowing reaches past the own store.
    MoveOverDepot = 2,
    /// Lowest extra-turn move only.
    ExtraTurnChaining = 3,
    /// Share of the stones sitting opposite the pit.
    StealOpportunity = 4,
    /// Filling or escaping the holes the opponent could capture through.
    PreventStealLight = 5,
}

impl HeuristicKind {
    /// All heuristics in id order.
    pub const ALL: [HeuristicKind; 6] = [
        HeuristicKind::ExtraTurn,
        HeuristicKind::StealStones,
        HeuristicKind::MoveOverDepot,
        HeuristicKind::ExtraTurnChaining,
        HeuristicKind::StealOpportunity,
        HeuristicKind::PreventStealLight,
    ];

    /// Numeric id used in configuration documents.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Score every legal move of `game` into `weights`.
    pub fn evaluate(self, game: &GameState, legal: &MoveMask, weights: &mut Weights) {
        match self {
            HeuristicKind::ExtraTurn => extra_turn(game, legal, weights),
            HeuristicKind::StealStones => steal_stones(game, legal, weights),
            HeuristicKind::MoveOverDepot => move_over_depot(game, legal, weights),
            HeuristicKind::ExtraTurnChaining => extra_turn_chaining(game, legal, weights),
            HeuristicKind::StealOpportunity => steal_opportunity(game, legal, weights),
            HeuristicKind::PreventStealLight => prevent_steal_light(game, legal, weights),
        }
    }
}

impl TryFrom<u8> for HeuristicKind {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        HeuristicKind::ALL
            .get(usize::from(id))
            .copied()
            .ok_or(Error::UnknownHeuristic(id))
    }
}

impl From<HeuristicKind> for u8 {
    fn from(kind: HeuristicKind) -> u8 {
        kind.id()
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeuristicKind::ExtraTurn => "extra-turn",
            HeuristicKind::StealStones => "steal-stones",
            HeuristicKind::MoveOverDepot => "move-over-depot",
            HeuristicKind::ExtraTurnChaining => "extra-turn-chaining",
            HeuristicKind::StealOpportunity => "steal-opportunity",
            HeuristicKind::PreventStealLight => "prevent-steal-light",
        };
        f.write_str(name)
    }
}

#[inline]
fn legal_ids(legal: &MoveMask) -> impl Iterator<Item = usize> + '_ {
    (1..=PITS_PER_SIDE).filter(move |&id| legal[id])
}

/// Relative id of the slot receiving the last stone (laps ignored).
#[inline]
fn last_field(game: &GameState, id: usize) -> usize {
    game.current_player().relative(game.last_landing_slot(id))
}

/// Relative id a capturing move `id` would land on, if it captures.
///
/// Moves of more than 13 stones always lap and can never land in an empty
/// pit. Exactly 13 stones land back on the emptied source pit.
fn capture_field(game: &GameState, id: usize) -> Option<usize> {
    if game.stones(id) > 13 {
        return None;
    }
    let field = last_field(game, id);
    let own_pit = field != 0 && field <= PITS_PER_SIDE;
    (own_pit && (game.stones(field) == 0 || field == id)).then_some(field)
}

/// 1 if the move ends in the own store, else 0.
pub fn extra_turn(game: &GameState, legal: &MoveMask, weights: &mut Weights) {
    for id in legal_ids(legal) {
        weights[id] = if usize::from(game.stones(id)) % 13 == id {
            1.0
        } else {
            0.0
        };
    }
}

/// Captured stones of each move as a share of all capturable stones.
pub fn steal_stones(game: &GameState, legal: &MoveMask, weights: &mut Weights) {
    let sum: u32 = legal_ids(legal)
        .filter_map(|id| capture_field(game, id))
        .map(|field| u32::from(game.opposite_stones(field)))
        .sum();

    if sum == 0 {
        weights[1..].fill(0.0);
        return;
    }

    for id in legal_ids(legal) {
        weights[id] = match capture_field(game, id) {
            Some(field) => f32::from(game.opposite_stones(field)) / sum as f32,
            None => 0.0,
        };
    }
}

/// 1 if the move sows past the own store, else 0.
pub fn move_over_depot(game: &GameState, legal: &MoveMask, weights: &mut Weights) {
    for id in legal_ids(legal) {
        weights[id] = if usize::from(game.stones(id)) > id {
            1.0
        } else {
            0.0
        };
    }
}

/// 1 for the lowest-numbered extra-turn move, 0 for everything else.
///
/// Taking the extra turn closest to the store first keeps the other
/// extra-turn moves intact for the follow-up turn.
pub fn extra_turn_chaining(game: &GameState, legal: &MoveMask, weights: &mut Weights) {
    weights[1..].fill(0.0);
    if let Some(id) = legal_ids(legal).find(|&id| usize::from(game.stones(id)) % 13 == id) {
        weights[id] = 1.0;
    }
}

/// Stones opposite each move as a share of all stones opposite legal moves.
pub fn steal_opportunity(game: &GameState, legal: &MoveMask, weights: &mut Weights) {
    let sum: u32 = legal_ids(legal)
        .map(|id| u32::from(game.opposite_stones(id)))
        .sum();

    if sum == 0 {
        weights[1..].fill(0.0);
        return;
    }

    for id in legal_ids(legal) {
        weights[id] = f32::from(game.opposite_stones(id)) / sum as f32;
    }
}

/// Credit for filling the opponent's holes that face own stones.
///
/// A hole is an empty opponent pit opposite a non-empty own pit. Every
/// filled hole, and moving the stones of the pit itself out of reach, is
/// worth `1 / holes`. Moves of 12+ stones reach every opponent pit.
pub fn prevent_steal_light(game: &GameState, legal: &MoveMask, weights: &mut Weights) {
    let holes = (1..=PITS_PER_SIDE)
        .filter(|&id| game.opposite_stones(id) == 0 && game.stones(id) > 0)
        .count();

    if holes == 0 {
        weights[1..].fill(0.0);
        return;
    }

    let fraction = 1.0 / holes as f32;
    for id in legal_ids(legal) {
        if game.stones(id) > 11 {
            weights[id] = 1.0;
            continue;
        }

        let mut weight = 0.0;
        let last = last_field(game, id);
        let opposite = opposite_slot(id);
        if last > id {
            if last <= PITS_PER_SIDE {
                weight = 1.0;
            } else {
                for enemy in last..14 {
                    if game.stones(enemy) == 0 && game.opposite_stones(enemy) > 0 {
                        weight += fraction;
                    }
                }
                if opposite < last && game.stones(opposite) == 0 {
                    weight += fraction;
                }
            }
        } else if game.stones(opposite) == 0 {
            weight += fraction;
        }
        weights[id] = weight;
    }
}
