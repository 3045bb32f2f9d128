//! Core MCTS search algorithm.
//!
//! Each iteration runs selection, expansion, simulation and backpropagation
//! over an arena tree. Every node carries a minimax bound next to its
//! win statistics:
//! - terminal nodes and endgame-table hits get a proven win or loss
//! - other new nodes get a store-differential estimate in `[0, 1]`
//! - inner nodes take the max (own move) or min (opponent move) over their
//!   children, with the node's own estimate standing in for moves that are
//!   not expanded yet
//!
//! Proven children are never explored again and a proven root ends the
//! search early. After the search the tree is re-rooted onto the chosen
//! child and kept for the next call.

use std::time::Instant;

use rand::Rng;

use crate::core::{GameRng, GameState, Player, Pool, Winner, PITS_PER_SIDE};
use crate::endgame::EndgameDb;
use crate::error::Result;
use crate::heuristics::{HeuristicSet, SelectionPolicy};

use super::config::{MCTSConfig, SearchBudget};
use super::node::{estimate, outcome_value, MCTSNode, NodeId, DRAW, LOSS, WIN};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Initial arena capacity of a fresh tree.
const INITIAL_TREE_CAPACITY: usize = 4096;

/// Statistics of one root move after a search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionStats {
    /// Move id (1–6).
    pub action: u8,
    /// Visits of the child.
    pub visits: u32,
    /// Rollouts won through the child.
    pub wins: u32,
    /// Minimax bound of the child.
    pub minimax: f64,
}

/// Main MCTS search context.
///
/// Owns the configuration, the (reusable) tree, the RNG, the scratch-state
/// pool and the optional endgame table. One instance serves one player in
/// one game at a time.
pub struct MCTSSearch {
    /// Search configuration.
    config: MCTSConfig,

    /// Heuristics for choosing which child to expand.
    expand: HeuristicSet,

    /// Heuristics for rollout moves.
    simulation: HeuristicSet,

    /// Perfect-play table, if enabled and available.
    endgame: Option<EndgameDb>,

    /// Tree kept from the previous search.
    tree: Option<MCTSTree>,

    /// Player the kept tree was built for.
    player: Option<Player>,

    /// RNG for expansion and rollouts.
    rng: GameRng,

    /// Scratch states for expansion and rollouts.
    pool: Pool<GameState>,

    /// Search statistics.
    stats: SearchStats,

    /// Root children of the last search.
    last_actions: Vec<ActionStats>,
}

impl MCTSSearch {
    /// Create a new MCTS search context.
    ///
    /// Opens the endgame table when the configuration asks for it; a missing
    /// table is logged and the search runs without it.
    pub fn new(config: MCTSConfig) -> Result<Self> {
        config.validate()?;
        let endgame = if config.use_endgame_db {
            EndgameDb::open_optional(config.endgame_db_path())
        } else {
            None
        };
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);

        Ok(Self {
            expand: HeuristicSet::from_weights(&config.expand),
            simulation: HeuristicSet::from_weights(&config.simulation),
            config,
            endgame,
            tree: None,
            player: None,
            rng,
            pool: Pool::with_capacity(2),
            stats: SearchStats::default(),
            last_actions: Vec::new(),
        })
    }

    /// Use an already opened endgame table.
    #[must_use]
    pub fn with_endgame_db(mut self, db: EndgameDb) -> Self {
        self.endgame = Some(db);
        self
    }

    /// Run a search from `game` for `player`, who must be the player to move.
    ///
    /// Returns the chosen move id, or `None` if the game is already over.
    pub fn search(&mut self, game: &GameState, player: Player, budget: SearchBudget) -> Option<u8> {
        let start = Instant::now();
        self.stats.reset();
        self.last_actions.clear();

        let mut root_game = game.clone();
        root_game.update_terminal_state();
        if root_game.is_terminal() {
            self.discard_tree();
            return None;
        }
        debug_assert_eq!(root_game.current_player(), player, "searching for the player not to move");

        // Only one legal move: nothing to search
        if root_game.selectable_count() == 1 {
            self.discard_tree();
            let action = (1..=PITS_PER_SIDE).find(|&id| root_game.is_selectable(id))? as u8;
            self.stats.time_us = start.elapsed().as_micros() as u64;
            log::info!("{player}: only move {action}");
            return Some(action);
        }

        let mut tree = self.take_tree(&root_game, player);
        loop {
            self.iteration(&mut tree, player);
            self.stats.iterations += 1;

            if tree.root_node().is_proven() {
                break;
            }
            if self.config.max_nodes.is_some_and(|max| tree.len() >= max) {
                break;
            }
            let exhausted = match budget {
                SearchBudget::Time(limit) => start.elapsed() >= limit,
                SearchBudget::Iterations(count) => self.stats.iterations >= count,
            };
            if exhausted {
                break;
            }
        }

        let root = tree.root();
        self.last_actions = tree
            .root_node()
            .children
            .iter()
            .map(|&id| {
                let child = tree.get(id);
                ActionStats {
                    action: child.action,
                    visits: child.visits,
                    wins: child.wins,
                    minimax: child.minimax,
                }
            })
            .collect();
        let best = self.best_child(&tree, root, player, false)?;
        let chosen = tree.get(best);
        let action = chosen.action;
        self.stats.time_us = start.elapsed().as_micros() as u64;
        log::info!(
            "{player}: move {action} ({}/{} wins, minimax {:.3}, {} iterations at {:.0}/s, {} reused visits)",
            chosen.wins,
            chosen.visits,
            chosen.minimax,
            self.stats.iterations,
            self.stats.iterations_per_second(),
            self.stats.reused_visits
        );
        if log::log_enabled!(log::Level::Debug) {
            let shape = tree.stats();
            log::debug!(
                "tree: {} nodes, depth {}, {} proven, {} terminal, branching {:.2}",
                shape.node_count,
                shape.max_depth,
                shape.proven_count,
                shape.terminal_count,
                shape.branching_factor()
            );
        }

        tree.promote(best);
        self.tree = Some(tree);
        self.player = Some(player);
        Some(action)
    }

    /// Reuse the kept tree if it contains `game`, else start a fresh one.
    fn take_tree(&mut self, game: &GameState, player: Player) -> MCTSTree {
        let root_value = estimate(game, player);
        let same_player = self.player == Some(player);
        match self.tree.take() {
            Some(mut tree) if same_player => {
                if let Some(id) = tree.find(game, player) {
                    tree.promote(id);
                    self.stats.reused_visits = tree.root_node().visits;
                    log::debug!(
                        "reusing subtree with {} nodes and {} visits",
                        tree.len(),
                        self.stats.reused_visits
                    );
                } else {
                    log::debug!("position not in kept tree, starting fresh");
                    tree.reset(game, root_value);
                }
                tree
            }
            Some(mut tree) => {
                tree.reset(game, root_value);
                tree
            }
            None => MCTSTree::with_capacity(game, root_value, INITIAL_TREE_CAPACITY),
        }
    }

    /// Drop the kept tree; the next search starts fresh.
    pub fn discard_tree(&mut self) {
        self.tree = None;
        self.player = None;
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    fn iteration(&mut self, tree: &mut MCTSTree, player: Player) {
        let (leaf, depth) = self.select_and_expand(tree, player);
        self.stats.max_depth = self.stats.max_depth.max(depth);
        let winner = self.simulate(tree, leaf, player);
        backpropagate(tree, leaf, winner, player);
    }

    /// Descend to a node that is terminal or can still be expanded.
    ///
    /// Returns the expanded child (or the terminal node) and its depth.
    fn select_and_expand(&mut self, tree: &mut MCTSTree, player: Player) -> (NodeId, u16) {
        let mut current = tree.root();
        let mut depth = 0u16;
        loop {
            let node = tree.get(current);
            if node.is_terminal() {
                return (current, depth);
            }
            if !node.is_fully_expanded() {
                return (self.expand_child(tree, current, player), depth + 1);
            }
            match self.best_child(tree, current, player, true) {
                Some(child) => {
                    current = child;
                    depth += 1;
                }
                None => return (current, depth),
            }
        }
    }

    /// Add one child for a move not expanded yet.
    fn expand_child(&mut self, tree: &mut MCTSTree, parent: NodeId, player: Player) -> NodeId {
        let parent_node = tree.get(parent);
        let mut legal = parent_node.game.legal_moves();
        for &child in &parent_node.children {
            legal[usize::from(tree.get(child).action)] = false;
        }

        let mut weights = [0.0; PITS_PER_SIDE + 1];
        let scale = self.expand.scale();
        if scale != 0.0 {
            self.expand.aggregate(&parent_node.game, &legal, &mut weights);
        }
        let action = self.config.selector.select(&legal, &weights, scale, &mut self.rng);

        let mut scratch = self.pool.checkout();
        scratch.copy_from(&parent_node.game);
        scratch.perform_move(usize::from(action));
        let value = evaluate(self.endgame.as_ref(), &scratch, player);

        self.stats.nodes_expanded += 1;
        tree.alloc(parent, action, &scratch, value)
    }

    /// Best child of `parent` by the blended score.
    ///
    /// With `explore` set the UCT term is added and proven children are
    /// skipped; otherwise proven children score their proven value. Ties go
    /// to the first child.
    ///
    /// Win counts and minimax bounds are always stored from `player`'s point
    /// of view. Where the opponent moves at `parent`, both terms are flipped
    /// to `1 - win_rate` and `1 - minimax` (and proven values are negated),
    /// so each side picks the child best for itself.
    fn best_child(&self, tree: &MCTSTree, parent: NodeId, player: Player, explore: bool) -> Option<NodeId> {
        let node = tree.get(parent);
        let own_move = node.game.current_player() == player;
        let alpha = self.config.minmax_influence;
        let log_visits = f64::from(node.visits.max(1)).ln();

        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for &id in &node.children {
            let child = tree.get(id);
            let score = if child.is_proven() {
                if explore {
                    continue;
                }
                if own_move {
                    child.minimax
                } else {
                    -child.minimax
                }
            } else {
                let (win_rate, minimax) = if own_move {
                    (child.win_rate(), child.minimax)
                } else {
                    (1.0 - child.win_rate(), 1.0 - child.minimax)
                };
                let mut score = (1.0 - alpha) * win_rate + alpha * minimax;
                if explore {
                    let visits = f64::from(child.visits.max(1));
                    score += self.config.exploration_constant * (2.0 * log_visits / visits).sqrt();
                }
                score
            };
            if best.is_none() || score > best_score {
                best = Some(id);
                best_score = score;
            }
        }
        best
    }

    /// Outcome of a random playout from `leaf`.
    fn simulate(&mut self, tree: &MCTSTree, leaf: NodeId, player: Player) -> Winner {
        let node = tree.get(leaf);
        if node.is_terminal() {
            return node.game.winner();
        }
        if node.is_proven() {
            self.stats.proven_shortcuts += 1;
            return if node.minimax > DRAW {
                Winner::of(player)
            } else {
                Winner::of(player.opponent())
            };
        }

        let mut scratch = self.pool.checkout();
        scratch.copy_from(&node.game);
        rollout(&mut scratch, &self.simulation, &self.config.selector, &mut self.rng);
        self.stats.simulations += 1;
        scratch.winner()
    }

    /// Get search statistics.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Root children of the last search, in expansion order.
    #[must_use]
    pub fn action_stats(&self) -> &[ActionStats] {
        &self.last_actions
    }

    /// Tree kept for the next search, rooted at the last chosen move.
    #[must_use]
    pub fn tree(&self) -> Option<&MCTSTree> {
        self.tree.as_ref()
    }

    /// Endgame table in use, if any.
    #[must_use]
    pub fn endgame_db(&self) -> Option<&EndgameDb> {
        self.endgame.as_ref()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}

/// Minimax value of a freshly expanded position for `player`.
fn evaluate(endgame: Option<&EndgameDb>, game: &GameState, player: Player) -> f64 {
    if game.is_terminal() {
        return outcome_value(game.winner(), player);
    }
    if let Some(db) = endgame.filter(|db| db.has_value_stored(game)) {
        let difference = db.final_difference(game);
        let difference = if game.current_player() == player {
            difference
        } else {
            -difference
        };
        return match difference.signum() {
            1 => WIN,
            -1 => LOSS,
            _ => DRAW,
        };
    }
    estimate(game, player)
}

/// Update statistics and minimax bounds from `leaf` up to the root.
fn backpropagate(tree: &mut MCTSTree, leaf: NodeId, winner: Winner, player: Player) {
    let won = winner.is_winner(player);
    let mut current = leaf;
    while !current.is_none() {
        let view: &MCTSTree = tree;
        let bound = minimax_bound(view, view.get(current), player);
        let node = tree.get_mut(current);
        node.visits += 1;
        if won {
            node.wins += 1;
        }
        if let Some(bound) = bound {
            node.minimax = bound;
        }
        current = node.parent;
    }
}

/// Bound of an inner node over its children; `None` for leaves.
fn minimax_bound(tree: &MCTSTree, node: &MCTSNode, player: Player) -> Option<f64> {
    if node.children.is_empty() {
        return None;
    }
    let maximize = node.game.current_player() == player;
    let values = node.children.iter().map(|&id| tree.get(id).minimax);
    let mut bound = if maximize {
        values.fold(f64::NEG_INFINITY, f64::max)
    } else {
        values.fold(f64::INFINITY, f64::min)
    };
    if !node.is_fully_expanded() {
        let stand_in = estimate(&node.game, player).clamp(0.0, 1.0);
        bound = if maximize {
            bound.max(stand_in)
        } else {
            bound.min(stand_in)
        };
    }
    Some(bound)
}

/// Play `game` to the end with moves picked by `policy` from `set`.
pub fn rollout<R: Rng + ?Sized>(
    game: &mut GameState,
    set: &HeuristicSet,
    policy: &SelectionPolicy,
    rng: &mut R,
) {
    let scale = set.scale();
    let mut weights = [0.0; PITS_PER_SIDE + 1];
    while !game.is_terminal() {
        let legal = game.legal_moves();
        if scale != 0.0 {
            set.aggregate(game, &legal, &mut weights);
        }
        let id = policy.select(&legal, &weights, scale, rng);
        game.perform_move(usize::from(id));
    }
}
