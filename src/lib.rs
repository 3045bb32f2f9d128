//! # kalah-mcts
//!
//! A decision engine for Kalah (six pits per side, two stores).
//!
//! ## Design Principles
//!
//! 1. **Allocation-Cheap Rules**: a position is a 14-byte board plus two
//!    flags. Sowing is closed-form, so a move costs the same no matter how
//!    many stones it carries.
//!
//! 2. **Proven Outcomes**: the search keeps a minimax bound next to its
//!    win statistics. Won and lost lines are recognized exactly, either at
//!    the end of the game or through the endgame table.
//!
//! 3. **Configuration Over Convention**: heuristics, selection policy and
//!    search constants come from one JSON document loaded at construction.
//!
//! ## Modules
//!
//! - `core`: board, players, rules, RNG and object pooling
//! - `heuristics`: move-scoring functions and selection policies
//! - `endgame`: combinatorial position index and the perfect-play table
//! - `mcts`: Monte Carlo Tree Search with a minimax blend and tree reuse
//! - `agent`: decision API over a caller's own board representation
//! - `error`: crate error type

pub mod agent;
pub mod core;
pub mod endgame;
pub mod error;
pub mod heuristics;
pub mod mcts;

// Re-export commonly used types
pub use crate::core::{
    BoardState, GameRng, GameState, MoveMask, Player, Pool, Pooled, Winner,
    PITS_PER_SIDE, SLOT_COUNT,
};

pub use crate::heuristics::{
    HeuristicKind, HeuristicSet, HeuristicWeight, HeuristicWeights, SelectionPolicy, Weights,
};

pub use crate::endgame::{EndgameDb, VALUE_BIAS};

pub use crate::mcts::{
    ActionStats, MCTSConfig, MCTSNode, MCTSSearch, MCTSTree, NodeId, SearchBudget, SearchStats,
    TreeStats,
};

pub use crate::agent::{Agent, ExternalPosition};

pub use crate::error::{Error, Result};
