//! MCTS node structures.
//!
//! Nodes live in the arena of an `MCTSTree` and refer to each other through
//! `NodeId` indices. The parent link is only used to walk back up during
//! backpropagation.

use smallvec::SmallVec;

use crate::core::{GameState, Player, Winner, PITS_PER_SIDE};

/// Minimax value of a position the searching player has won.
///
/// Finite so that blending with the other score terms stays well defined.
pub const WIN: f64 = 1.0e9;

/// Minimax value of a position the searching player has lost.
pub const LOSS: f64 = -WIN;

/// Minimax value of a drawn position.
pub const DRAW: f64 = 0.5;

/// Check whether a minimax value is a proven win or loss.
#[inline]
#[must_use]
pub fn is_proven(value: f64) -> bool {
    !(0.0..=1.0).contains(&value)
}

/// Minimax value of a finished game for `player`.
#[must_use]
pub fn outcome_value(winner: Winner, player: Player) -> f64 {
    match winner {
        Winner::Draw | Winner::None => DRAW,
        w if w.is_winner(player) => WIN,
        _ => LOSS,
    }
}

/// Store-differential estimate of a running game for `player`, in `[0, 1]`.
#[must_use]
pub fn estimate(game: &GameState, player: Player) -> f64 {
    let board = game.board();
    let total = board.total_stones();
    if total == 0 {
        return DRAW;
    }
    let diff = f64::from(board.store(player)) - f64::from(board.store(player.opponent()));
    0.5 + diff / (2.0 * f64::from(total))
}

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Arena slot of this node.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::NONE
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node in the MCTS tree: the position reached by `action`.
#[derive(Clone, Debug, Default)]
pub struct MCTSNode {
    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Move id (1–6) played from the parent to reach this node.
    pub action: u8,

    /// Position after the move.
    pub game: GameState,

    /// Total visits to this node.
    pub visits: u32,

    /// Visits whose rollout the searching player won.
    pub wins: u32,

    /// Minimax bound from the searching player's view; outside `[0, 1]`
    /// once the outcome is proven.
    pub minimax: f64,

    /// Expanded children, at most one per move.
    pub children: SmallVec<[NodeId; PITS_PER_SIDE]>,
}

impl MCTSNode {
    /// Check if the game at this node is over.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.game.is_terminal()
    }

    /// Check if the outcome of this node is known.
    #[inline]
    #[must_use]
    pub fn is_proven(&self) -> bool {
        is_proven(self.minimax)
    }

    /// Check if every legal move has a child.
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.children.len() == self.game.selectable_count()
    }

    /// Fraction of visits won by the searching player.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.visits)
        }
    }

    /// Reset this node for reuse in the arena.
    pub fn reset(&mut self, parent: NodeId, action: u8, game: &GameState, minimax: f64) {
        self.parent = parent;
        self.action = action;
        self.game.copy_from(game);
        self.visits = 0;
        self.wins = 0;
        self.minimax = minimax;
        self.children.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.index(), 42);
        assert!(!id.is_none());
        assert!(NodeId::NONE.is_none());
        assert_eq!(NodeId::default(), NodeId::NONE);
        assert_eq!(format!("{}", NodeId::NONE), "NodeId(NONE)");
    }

    #[test]
    fn test_proven_values() {
        assert!(is_proven(WIN));
        assert!(is_proven(LOSS));
        assert!(!is_proven(DRAW));
        assert!(!is_proven(0.0));
        assert!(!is_proven(1.0));
    }

    #[test]
    fn test_outcome_value() {
        assert_eq!(outcome_value(Winner::PlayerA, Player::A), WIN);
        assert_eq!(outcome_value(Winner::PlayerA, Player::B), LOSS);
        assert_eq!(outcome_value(Winner::Draw, Player::B), DRAW);
    }

    #[test]
    fn test_estimate() {
        let game = GameState::from_slots(Player::A, [8, 5, 5, 5, 5, 5, 5, 0, 4, 4, 4, 4, 5, 5]);
        assert!((estimate(&game, Player::A) - 0.5625).abs() < 1e-9);
        assert!((estimate(&game, Player::B) - 0.4375).abs() < 1e-9);
        assert_eq!(estimate(&GameState::default(), Player::A), 0.5);
    }

    #[test]
    fn test_node_reset() {
        let mut node = MCTSNode::default();
        node.visits = 10;
        node.children.push(NodeId::new(3));

        let game = GameState::from_slots(Player::B, [0, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1]);
        node.reset(NodeId::new(0), 4, &game, 0.5);

        assert_eq!(node.visits, 0);
        assert!(node.children.is_empty());
        assert_eq!(node.action, 4);
        assert_eq!(node.game, game);
        assert!(!node.is_fully_expanded());
        assert_eq!(node.win_rate(), 0.0);
    }
}
