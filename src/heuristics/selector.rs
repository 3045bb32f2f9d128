//! Turning weight vectors into a move.
//!
//! Three policies, all generic over the random source so tests can pin the
//! draws with a mock RNG:
//! - `Uniform`: every legal move is equally likely
//! - `Roulette`: probability proportional to the min-shifted weight
//! - `Tournament`: best of `size` legal moves sampled without replacement

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::functions::Weights;
use crate::core::{MoveMask, PITS_PER_SIDE};
use crate::error::{Error, Result};

/// Policy choosing a move id from heuristic weights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Ignore the weights.
    Uniform,
    /// Roulette-wheel selection.
    #[default]
    Roulette,
    /// Tournament selection over `size` sampled moves.
    Tournament {
        /// Number of moves drawn per tournament.
        size: usize,
    },
}

impl SelectionPolicy {
    /// Check policy parameters.
    pub fn validate(&self) -> Result<()> {
        match *self {
            SelectionPolicy::Tournament { size } if size == 0 || size > PITS_PER_SIDE => {
                Err(Error::InvalidSelector(format!(
                    "tournament size must be in 1..={PITS_PER_SIDE}, got {size}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Pick a legal move id.
    ///
    /// `scale` is the weight scale of the heuristic set that produced
    /// `weights`; a scale of 0 means no heuristic is active and the pick is
    /// uniform regardless of the policy.
    ///
    /// At least one move must be legal.
    pub fn select<R: Rng + ?Sized>(
        &self,
        legal: &MoveMask,
        weights: &Weights,
        scale: f32,
        rng: &mut R,
    ) -> u8 {
        let ids: SmallVec<[u8; PITS_PER_SIDE]> = (1..=PITS_PER_SIDE as u8)
            .filter(|&id| legal[usize::from(id)])
            .collect();
        debug_assert!(!ids.is_empty(), "selection without legal moves");

        if scale == 0.0 {
            return uniform(&ids, rng);
        }

        match *self {
            SelectionPolicy::Uniform => uniform(&ids, rng),
            SelectionPolicy::Roulette => roulette(&ids, weights, rng),
            SelectionPolicy::Tournament { size } => tournament(ids, weights, size, rng),
        }
    }
}

impl std::fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionPolicy::Uniform => write!(f, "uniform"),
            SelectionPolicy::Roulette => write!(f, "roulette"),
            SelectionPolicy::Tournament { size } => write!(f, "tournament({size})"),
        }
    }
}

fn uniform<R: Rng + ?Sized>(ids: &[u8], rng: &mut R) -> u8 {
    ids[rng.gen_range(0..ids.len())]
}

fn roulette<R: Rng + ?Sized>(ids: &[u8], weights: &Weights, rng: &mut R) -> u8 {
    let weight = |id: u8| weights[usize::from(id)];
    let min = ids.iter().map(|&id| weight(id)).fold(f32::INFINITY, f32::min);
    let sum: f32 = ids.iter().map(|&id| weight(id) - min).sum();
    if sum == 0.0 {
        return uniform(ids, rng);
    }

    let draw = rng.gen::<f32>() * sum;
    let mut cumulative = 0.0;
    for &id in ids {
        cumulative += weight(id) - min;
        if cumulative > draw {
            return id;
        }
    }
    // Rounding left the draw at the very top of the wheel
    ids[ids.len() - 1]
}

fn tournament<R: Rng + ?Sized>(
    mut ids: SmallVec<[u8; PITS_PER_SIDE]>,
    weights: &Weights,
    size: usize,
    rng: &mut R,
) -> u8 {
    let rounds = size.min(ids.len());
    let mut best = 0u8;
    let mut best_weight = f32::NEG_INFINITY;
    for round in 0..rounds {
        let pick = rng.gen_range(round..ids.len());
        ids.swap(round, pick);
        let id = ids[round];
        let weight = weights[usize::from(id)];
        if best == 0 || weight > best_weight {
            best = id;
            best_weight = weight;
        }
    }
    best
}
