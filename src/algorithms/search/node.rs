//! Search tree nodes with parent links for plan reconstruction.

use crate::algorithms::report::Plan;
use crate::grid::{Action, GridState};

/// Index of a node in its [`SearchTree`].
pub type NodeId = usize;

/// A state reached during search, with the move that produced it.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub(crate) state: GridState,
    pub(crate) parent: Option<NodeId>,
    pub(crate) action: Option<Action>,
    pub(crate) cost: u32,
    pub(crate) depth: u32,
}

impl SearchNode {
    /// Creates the root node for `state`.
    pub fn root(state: GridState) -> Self {
        Self {
            state,
            parent: None,
            action: None,
            cost: 0,
            depth: 0,
        }
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The move that led here from the parent, `None` for the root.
    pub fn action(&self) -> Option<Action> {
        self.action
    }

    /// Accumulated path cost from the root.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// Append-only arena of search nodes.
///
/// Nodes refer to their parents by index, so reconstructing a plan is a walk
/// up the parent chain without any shared ownership.
#[derive(Debug, Default)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Panics if `id` was not returned by [`SearchTree::push`] on this tree.
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Rebuilds the action sequence from the root to `id`.
    pub fn plan_to(&self, id: NodeId) -> Plan {
        let cost = self.nodes[id].cost;
        let mut actions = Vec::with_capacity(self.nodes[id].depth as usize);
        let mut current = Some(id);
        while let Some(index) = current {
            let node = &self.nodes[index];
            if let Some(action) = node.action {
                actions.push(action);
            }
            current = node.parent;
        }
        actions.reverse();
        Plan::new(actions, cost)
    }
}
