//! Weighted combinations of heuristics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::functions::{HeuristicKind, Weights};
use crate::core::{GameState, MoveMask, PITS_PER_SIDE};

/// Weight of one heuristic inside a set, as written in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeuristicWeight {
    /// Multiplier applied to the heuristic's output.
    pub weight: f32,
}

impl HeuristicWeight {
    /// Create a weight entry.
    #[must_use]
    pub const fn new(weight: f32) -> Self {
        Self { weight }
    }
}

/// Heuristic id → weight, the serialized form of a set.
pub type HeuristicWeights = BTreeMap<HeuristicKind, HeuristicWeight>;

/// A list of heuristics with their weights.
///
/// An empty set produces all-zero weights with a scale of 0, which selection
/// policies treat as "pick uniformly".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeuristicSet {
    entries: SmallVec<[(HeuristicKind, f32); 6]>,
}

impl HeuristicSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a heuristic with the given weight.
    #[must_use]
    pub fn with(mut self, kind: HeuristicKind, weight: f32) -> Self {
        self.entries.push((kind, weight));
        self
    }

    /// Build a set from its configuration map (sorted by heuristic id).
    #[must_use]
    pub fn from_weights(weights: &HeuristicWeights) -> Self {
        Self {
            entries: weights.iter().map(|(&kind, w)| (kind, w.weight)).collect(),
        }
    }

    /// Configuration form of this set.
    #[must_use]
    pub fn to_weights(&self) -> HeuristicWeights {
        self.entries
            .iter()
            .map(|&(kind, weight)| (kind, HeuristicWeight::new(weight)))
            .collect()
    }

    /// Check if the set holds no heuristic.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the absolute weights; the largest magnitude an aggregate can reach.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w.abs()).sum()
    }

    /// Weighted sum of all heuristics for the legal moves of `game`.
    ///
    /// Illegal ids and index 0 are always 0.
    pub fn aggregate(&self, game: &GameState, legal: &MoveMask, out: &mut Weights) {
        *out = [0.0; PITS_PER_SIDE + 1];
        let mut scratch: Weights = [0.0; PITS_PER_SIDE + 1];
        for &(kind, weight) in &self.entries {
            scratch.fill(0.0);
            kind.evaluate(game, legal, &mut scratch);
            for id in 1..=PITS_PER_SIDE {
                if legal[id] {
                    out[id] += weight * scratch[id];
                }
            }
        }
    }
}
