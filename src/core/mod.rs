//! Core game types: players, board, rules, RNG and pooling.
//!
//! Everything here is independent of the search; the MCTS, heuristics and
//! endgame table are all built on `GameState`.

pub mod board;
pub mod player;
pub mod pool;
pub mod rng;
pub mod state;

pub use board::{absolute_slot, opposite_slot, BoardState, PITS_PER_SIDE, SLOT_COUNT};
pub use player::{Player, Winner};
pub use pool::{Pool, Pooled};
pub use rng::GameRng;
pub use state::{GameState, MoveMask};
