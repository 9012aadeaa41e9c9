//! Frontier disciplines. The choice of frontier is the only thing that
//! distinguishes one search strategy from another.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use super::heuristic::Heuristic;
use super::node::{NodeId, SearchNode};

/// A collection of generated but not yet expanded nodes.
pub trait Frontier {
    fn push(&mut self, id: NodeId, node: &SearchNode);

    fn pop(&mut self) -> Option<NodeId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First in, first out. Breadth-first search.
#[derive(Debug, Default)]
pub struct Fifo {
    queue: VecDeque<NodeId>,
}

impl Frontier for Fifo {
    fn push(&mut self, id: NodeId, _node: &SearchNode) {
        self.queue.push_back(id);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Last in, first out. Depth-first search.
#[derive(Debug, Default)]
pub struct Lifo {
    stack: Vec<NodeId>,
}

impl Frontier for Lifo {
    fn push(&mut self, id: NodeId, _node: &SearchNode) {
        self.stack.push(id);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.stack.pop()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }
}

/// Assigns a score to a node; lower scores are expanded first.
pub trait Priority {
    fn score(&self, node: &SearchNode) -> u32;
}

/// Path cost so far. Uniform-cost search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByCost;

impl Priority for ByCost {
    fn score(&self, node: &SearchNode) -> u32 {
        node.cost
    }
}

/// Path cost plus heuristic estimate. A* search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByCostAndEstimate<H>(pub H);

impl<H: Heuristic> Priority for ByCostAndEstimate<H> {
    fn score(&self, node: &SearchNode) -> u32 {
        node.cost.saturating_add(self.0.estimate(&node.state))
    }
}

/// Heuristic estimate only. Greedy best-first search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByEstimate<H>(pub H);

impl<H: Heuristic> Priority for ByEstimate<H> {
    fn score(&self, node: &SearchNode) -> u32 {
        self.0.estimate(&node.state)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Entry {
    score: u32,
    seq: u64,
    id: NodeId,
}

impl Ord for Entry {
    // BinaryHeap is a max-heap: reverse both keys so the lowest score, then
    // the earliest insertion, comes out first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue with insertion-order tie-breaking.
#[derive(Debug)]
pub struct PriorityFrontier<P> {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
    priority: P,
}

impl<P: Priority> PriorityFrontier<P> {
    pub fn new(priority: P) -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
            priority,
        }
    }
}

impl<P: Priority> Frontier for PriorityFrontier<P> {
    fn push(&mut self, id: NodeId, node: &SearchNode) {
        let score = self.priority.score(node);
        self.heap.push(Entry {
            score,
            seq: self.next_seq,
            id,
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|entry| entry.id)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridState, LevelSpec};

    fn node_with_cost(cost: u32) -> SearchNode {
        let state = GridState::new(&LevelSpec::from_rows(&["PE"]).unwrap()).unwrap();
        let mut node = SearchNode::root(state);
        node.cost = cost;
        node
    }

    fn drain(frontier: &mut impl Frontier) -> Vec<NodeId> {
        std::iter::from_fn(|| frontier.pop()).collect()
    }

    #[test]
    fn fifo_and_lifo_order() {
        let node = node_with_cost(0);
        let mut fifo = Fifo::default();
        let mut lifo = Lifo::default();
        for id in 0..3 {
            fifo.push(id, &node);
            lifo.push(id, &node);
        }
        assert_eq!(fifo.len(), 3);
        assert_eq!(drain(&mut fifo), vec![0, 1, 2]);
        assert_eq!(drain(&mut lifo), vec![2, 1, 0]);
        assert!(fifo.is_empty());
    }

    #[test]
    fn lowest_cost_first_with_stable_ties() {
        let mut frontier = PriorityFrontier::new(ByCost);
        frontier.push(0, &node_with_cost(5));
        frontier.push(1, &node_with_cost(2));
        frontier.push(2, &node_with_cost(5));
        frontier.push(3, &node_with_cost(2));
        assert_eq!(drain(&mut frontier), vec![1, 3, 0, 2]);
    }
}
