//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references. Released slots
//! go onto a free list and are handed out again by `alloc`, so a tree that
//! is re-rooted turn after turn keeps reusing the same memory, including the
//! `GameState` each node carries.

use super::node::{MCTSNode, NodeId};
use crate::core::{GameState, Player};

/// Arena-based MCTS tree.
#[derive(Clone, Debug)]
pub struct MCTSTree {
    /// All node slots, live or free.
    nodes: Vec<MCTSNode>,

    /// Liveness of each slot.
    live: Vec<bool>,

    /// Released slots, reused first.
    free: Vec<NodeId>,

    /// The root node ID.
    root: NodeId,
}

impl MCTSTree {
    /// Create a tree whose root holds `game`.
    #[must_use]
    pub fn new(game: &GameState, minimax: f64) -> Self {
        Self::with_capacity(game, minimax, 1024)
    }

    /// Create a tree with custom initial capacity.
    #[must_use]
    pub fn with_capacity(game: &GameState, minimax: f64, capacity: usize) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(capacity),
            live: Vec::with_capacity(capacity),
            free: Vec::new(),
            root: NodeId::NONE,
        };
        tree.root = tree.alloc(NodeId::NONE, 0, game, minimax);
        tree
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.index()]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.index()]
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &MCTSNode {
        self.get(self.root)
    }

    /// Allocate a node for `game` and link it under `parent`.
    pub fn alloc(&mut self, parent: NodeId, action: u8, game: &GameState, minimax: f64) -> NodeId {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                self.nodes.push(MCTSNode::default());
                self.live.push(false);
                NodeId::new((self.nodes.len() - 1) as u32)
            }
        };
        self.live[id.index()] = true;
        self.nodes[id.index()].reset(parent, action, game, minimax);
        if !parent.is_none() {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Check if the tree holds no live node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release every node and start over from a new root.
    pub fn reset(&mut self, game: &GameState, minimax: f64) {
        self.free.clear();
        for index in (0..self.nodes.len()).rev() {
            self.live[index] = false;
            self.nodes[index].children.clear();
            self.free.push(NodeId::new(index as u32));
        }
        self.root = self.alloc(NodeId::NONE, 0, game, minimax);
    }

    /// Make `id` the root, releasing every node outside its subtree.
    pub fn promote(&mut self, id: NodeId) {
        let mut keep = vec![false; self.nodes.len()];
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            keep[current.index()] = true;
            stack.extend(self.nodes[current.index()].children.iter().copied());
        }

        for (index, kept) in keep.into_iter().enumerate() {
            if self.live[index] && !kept {
                self.live[index] = false;
                self.nodes[index].children.clear();
                self.free.push(NodeId::new(index as u32));
            }
        }

        self.nodes[id.index()].parent = NodeId::NONE;
        self.root = id;
    }

    /// Find a node holding `game` that `player` can continue from.
    ///
    /// Depth-first from the root. Apart from the root itself, a match only
    /// counts if the opponent made the move leading to it, so positions
    /// reached through one of `player`'s own extra turns are skipped.
    #[must_use]
    pub fn find(&self, game: &GameState, player: Player) -> Option<NodeId> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.get(id);
            if node.game == *game {
                let parent = node.parent;
                if parent.is_none() || self.get(parent).game.current_player() != player {
                    return Some(id);
                }
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            free_slots: self.free.len(),
            ..TreeStats::default()
        };
        let mut stack = vec![(self.root, 0u16)];
        while let Some((id, depth)) = stack.pop() {
            let node = self.get(id);
            stats.node_count += 1;
            stats.max_depth = stats.max_depth.max(depth);
            stats.terminal_count += usize::from(node.is_terminal());
            stats.proven_count += usize::from(node.is_proven());
            if !node.children.is_empty() {
                stats.inner_count += 1;
                stats.child_count += node.children.len();
            }
            stack.extend(node.children.iter().map(|&child| (child, depth + 1)));
        }
        stats
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    /// Nodes reachable from the root.
    pub node_count: usize,

    /// Released slots waiting for reuse.
    pub free_slots: usize,

    /// Maximum depth below the root.
    pub max_depth: u16,

    /// Number of terminal nodes.
    pub terminal_count: usize,

    /// Number of nodes with a proven outcome.
    pub proven_count: usize,

    /// Nodes with at least one child.
    pub inner_count: usize,

    /// Children summed over all nodes.
    pub child_count: usize,
}

impl TreeStats {
    /// Get the branching factor (average children per inner node).
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.inner_count == 0 {
            0.0
        } else {
            self.child_count as f64 / self.inner_count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opening() -> GameState {
        GameState::default()
    }

    fn after(game: &GameState, id: usize) -> GameState {
        let mut next = game.clone();
        next.perform_move(id);
        next
    }

    #[test]
    fn test_tree_new() {
        let tree = MCTSTree::new(&opening(), 0.5);

        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId::new(0));
        assert!(tree.root_node().parent.is_none());
    }

    #[test]
    fn test_tree_alloc_links_parent() {
        let game = opening();
        let mut tree = MCTSTree::new(&game, 0.5);
        let root = tree.root();

        let child = tree.alloc(root, 3, &after(&game, 3), 0.5);

        assert_eq!(child, NodeId::new(1));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(child).parent, root);
        assert_eq!(tree.get(child).action, 3);
        assert_eq!(tree.root_node().children.as_slice(), &[child]);
    }

    #[test]
    fn test_promote_frees_siblings() {
        let game = opening();
        let mut tree = MCTSTree::new(&game, 0.5);
        let root = tree.root();
        let a = tree.alloc(root, 1, &after(&game, 1), 0.5);
        let b = tree.alloc(root, 2, &after(&game, 2), 0.5);
        let grandchild = tree.alloc(b, 1, &after(&after(&game, 2), 1), 0.5);
        assert_eq!(tree.len(), 4);

        tree.promote(b);

        assert_eq!(tree.root(), b);
        assert!(tree.root_node().parent.is_none());
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.stats().node_count, 2);
        assert_eq!(tree.stats().free_slots, 2);
        assert!(tree.get(b).children.contains(&grandchild));

        // Released slots are handed out again
        let reused = tree.alloc(b, 2, &game, 0.5);
        assert!(reused == root || reused == a);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_reset() {
        let game = opening();
        let mut tree = MCTSTree::new(&game, 0.5);
        let root = tree.root();
        tree.alloc(root, 1, &after(&game, 1), 0.5);
        tree.get_mut(root).visits = 100;

        let other = after(&game, 6);
        tree.reset(&other, 0.5);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root_node().visits, 0);
        assert_eq!(tree.root_node().game, other);
    }

    #[test]
    fn test_find_requires_opponent_move() {
        let game = opening();
        let mut tree = MCTSTree::new(&game, 0.5);
        let root = tree.root();

        // A plays 1 (no extra turn), then B plays 1
        let mid = after(&game, 1);
        assert_eq!(mid.current_player(), Player::B);
        let child = tree.alloc(root, 1, &mid, 0.5);
        let target = after(&mid, 1);
        let grandchild = tree.alloc(child, 1, &target, 0.5);

        assert_eq!(tree.find(&target, Player::A), Some(grandchild));
        // From B's point of view the last move was its own
        assert_eq!(tree.find(&target, Player::B), None);
        assert_eq!(tree.find(&game, Player::A), Some(root));
        assert_eq!(tree.find(&after(&game, 5), Player::A), None);
    }

    #[test]
    fn test_tree_stats() {
        let game = opening();
        let mut tree = MCTSTree::new(&game, 0.5);
        let root = tree.root();
        tree.alloc(root, 1, &after(&game, 1), 0.5);
        let proven = tree.alloc(root, 2, &after(&game, 2), crate::mcts::node::WIN);
        tree.alloc(proven, 1, &after(&after(&game, 2), 1), 0.5);

        let stats = tree.stats();
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.proven_count, 1);
        assert_eq!(stats.inner_count, 2);
        assert_eq!(stats.branching_factor(), 1.5);
    }
}
