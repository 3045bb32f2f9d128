//! MCTS configuration parameters.
//!
//! The serialized form is the agent's JSON configuration document:
//!
//! ```json
//! {
//!   "C": 0.7071067811865475,
//!   "minmaxInfluence": 0.2,
//!   "selector": {"type": "tournament", "size": 3},
//!   "expand": {"0": {"weight": 0.5}, "5": {"weight": 0.75}},
//!   "simulation": {"0": {"weight": 1}},
//!   "useEndgameDB": true
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::heuristics::{HeuristicKind, HeuristicWeight, HeuristicWeights, SelectionPolicy};

/// Endgame table file used when the configuration names none.
pub const DEFAULT_ENDGAME_DB_PATH: &str = "endgame.db";

/// Time held back from every thinking budget.
pub const TIME_SAFETY_MARGIN: Duration = Duration::from_millis(100);

fn default_exploration() -> f64 {
    std::f64::consts::FRAC_1_SQRT_2
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MCTSConfig {
    /// UCT exploration constant (default: 1/sqrt(2)).
    #[serde(rename = "C", default = "default_exploration")]
    pub exploration_constant: f64,

    /// Share of the minimax bound in the node score, in `[0, 1]`.
    pub minmax_influence: f64,

    /// Policy picking moves from heuristic weights.
    pub selector: SelectionPolicy,

    /// Heuristics steering which child gets expanded.
    pub expand: HeuristicWeights,

    /// Heuristics steering rollout moves.
    pub simulation: HeuristicWeights,

    /// Consult the endgame table for positions with few stones left.
    ///
    /// An absent key means `false`, and `false` is written by omitting the
    /// key, so `"useEndgameDB": false` reads back as a document without it.
    #[serde(rename = "useEndgameDB", default, skip_serializing_if = "is_false")]
    pub use_endgame_db: bool,

    /// Endgame table file (default: `endgame.db`).
    #[serde(
        rename = "endgameDBPath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub endgame_db_path: Option<PathBuf>,

    /// RNG seed; searches are reproducible when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Stop growing the tree at this many live nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<usize>,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        let single = |kind| HeuristicWeights::from([(kind, HeuristicWeight::new(1.0))]);
        Self {
            exploration_constant: default_exploration(),
            minmax_influence: 0.0,
            selector: SelectionPolicy::Roulette,
            expand: single(HeuristicKind::ExtraTurn),
            simulation: single(HeuristicKind::ExtraTurn),
            use_endgame_db: false,
            endgame_db_path: None,
            seed: None,
            max_nodes: None,
        }
    }
}

impl MCTSConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a JSON configuration document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "C must be a non-negative number, got {}",
                self.exploration_constant
            )));
        }
        if !(0.0..=1.0).contains(&self.minmax_influence) {
            return Err(Error::InvalidParameter(format!(
                "minmaxInfluence must be in [0, 1], got {}",
                self.minmax_influence
            )));
        }
        if self.max_nodes == Some(0) {
            return Err(Error::InvalidParameter("maxNodes must be positive".into()));
        }
        self.selector.validate()
    }

    /// Endgame table path in effect.
    #[must_use]
    pub fn endgame_db_path(&self) -> PathBuf {
        self.endgame_db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENDGAME_DB_PATH))
    }

    /// Create a new config with custom exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom minimax influence.
    #[must_use]
    pub fn with_minmax_influence(mut self, influence: f64) -> Self {
        self.minmax_influence = influence;
        self
    }

    /// Create a new config with a custom selection policy.
    #[must_use]
    pub fn with_selector(mut self, selector: SelectionPolicy) -> Self {
        self.selector = selector;
        self
    }

    /// Create a new config with custom expansion heuristics.
    #[must_use]
    pub fn with_expand(mut self, expand: HeuristicWeights) -> Self {
        self.expand = expand;
        self
    }

    /// Create a new config with custom rollout heuristics.
    #[must_use]
    pub fn with_simulation(mut self, simulation: HeuristicWeights) -> Self {
        self.simulation = simulation;
        self
    }

    /// Create a new config using the endgame table at `path`.
    #[must_use]
    pub fn with_endgame_db(mut self, path: impl Into<PathBuf>) -> Self {
        self.use_endgame_db = true;
        self.endgame_db_path = Some(path.into());
        self
    }

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Create a new config with a node limit.
    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }
}

/// How long a search may run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchBudget {
    /// Wall-clock limit, checked between iterations.
    Time(Duration),
    /// Fixed number of iterations.
    Iterations(u32),
}

impl SearchBudget {
    /// Thinking time of `seconds` minus the safety margin.
    #[must_use]
    pub fn from_seconds(seconds: u32) -> Self {
        SearchBudget::Time(
            Duration::from_secs(u64::from(seconds)).saturating_sub(TIME_SAFETY_MARGIN),
        )
    }
}
