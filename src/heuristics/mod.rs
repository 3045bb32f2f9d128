//! Heuristic move scoring and selection policies.
//!
//! A [`HeuristicSet`] scores the legal moves of a position, and a
//! [`SelectionPolicy`] turns the scores into one move id. The search uses
//! one set for expansion and one for rollouts.

pub mod functions;
pub mod selector;
pub mod set;

pub use functions::{HeuristicKind, Weights};
pub use selector::SelectionPolicy;
pub use set::{HeuristicSet, HeuristicWeight, HeuristicWeights};
