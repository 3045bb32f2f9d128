//! Monte Carlo Tree Search with a minimax blend.
//!
//! ## Overview
//!
//! Each iteration walks down the tree by a blended UCT score, expands one
//! new child chosen by the expansion heuristics, plays a heuristic rollout
//! to the end of the game, and propagates the result back up. Alongside the
//! win counts every node keeps a minimax bound, so won and lost lines are
//! recognized exactly and cut off from further exploration.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kalah_mcts::core::{GameState, Player};
//! use kalah_mcts::mcts::{MCTSConfig, MCTSSearch, SearchBudget};
//!
//! # fn main() -> kalah_mcts::Result<()> {
//! let config = MCTSConfig::default().with_minmax_influence(0.2).with_seed(7);
//! let mut search = MCTSSearch::new(config)?;
//!
//! let game = GameState::default();
//! if let Some(id) = search.search(&game, Player::A, SearchBudget::Iterations(10_000)) {
//!     println!("play pit {id}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Tree reuse
//!
//! After a search the tree is re-rooted onto the chosen move. The next call
//! looks for the new position among the kept nodes and continues from there;
//! `SearchStats::reused_visits` reports how much work was carried over.

pub mod config;
pub mod node;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::{MCTSConfig, SearchBudget, DEFAULT_ENDGAME_DB_PATH, TIME_SAFETY_MARGIN};
pub use node::{MCTSNode, NodeId, DRAW, LOSS, WIN};
pub use search::{rollout, ActionStats, MCTSSearch};
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
