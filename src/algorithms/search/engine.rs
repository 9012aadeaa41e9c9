//! The shared graph-search loop.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, trace};

use crate::algorithms::report::{Interrupt, Outcome, SearchStats};
use crate::grid::{GridState, Snapshot};

use super::frontier::Frontier;
use super::node::{SearchNode, SearchTree};
use super::SearchConfig;

/// What one run of [`run`] produced.
#[derive(Debug)]
pub struct SearchRun {
    pub outcome: Outcome,
    pub stats: SearchStats,
    pub trace: Option<Vec<GridState>>,
}

/// Graph search from `initial`, expanding nodes in the order `frontier` yields them.
///
/// 1. Pop a node; skip it if its state was already explored.
/// 2. Goal-test on pop, so priority frontiers return optimal plans.
/// 3. Expand live, non-explored successors into the frontier.
///
/// Dead states are never expanded. Nodes at the depth limit are not expanded
/// either, and if that pruning leaves the frontier empty the run reports
/// [`Interrupt::DepthLimit`] rather than claiming the level is unsolvable.
pub fn run<F: Frontier>(
    initial: &GridState,
    mut frontier: F,
    config: &SearchConfig,
    cancel: &AtomicBool,
) -> SearchRun {
    let started = Instant::now();
    let mut tree = SearchTree::new();
    let mut explored: HashSet<Snapshot> = HashSet::new();
    let mut stats = SearchStats::default();
    let mut expanded = config.record_trace.then(Vec::new);
    let mut pruned_by_depth = false;

    let root = tree.push(SearchNode::root(initial.clone()));
    frontier.push(root, tree.get(root));
    stats.nodes_generated = 1;
    stats.max_frontier = 1;

    let outcome = loop {
        if cancel.load(Ordering::Relaxed) {
            break Outcome::Interrupted(Interrupt::Cancelled);
        }

        let Some(id) = frontier.pop() else {
            break if pruned_by_depth {
                Outcome::Interrupted(Interrupt::DepthLimit)
            } else {
                Outcome::Unsolvable
            };
        };

        let node = tree.get(id);
        if !explored.insert(node.state.snapshot().clone()) {
            stats.duplicates_skipped += 1;
            continue;
        }
        stats.nodes_explored += 1;
        stats.max_depth = stats.max_depth.max(node.depth);
        if let Some(states) = expanded.as_mut() {
            states.push(node.state.clone());
        }
        trace!(node = id, depth = node.depth, cost = node.cost, "expanding");

        if node.state.is_won() {
            break Outcome::Solved(tree.plan_to(id));
        }
        if node.state.is_dead() {
            continue;
        }
        if config.max_depth.is_some_and(|limit| node.depth >= limit) {
            pruned_by_depth = true;
            continue;
        }
        if config
            .max_expansions
            .is_some_and(|limit| stats.nodes_explored >= limit)
        {
            break Outcome::Interrupted(Interrupt::ExpansionLimit);
        }

        let (cost, depth) = (node.cost, node.depth);
        let children: Vec<SearchNode> = node
            .state
            .successors()
            .filter(|(_, t)| !t.state.is_dead() && !explored.contains(t.state.snapshot()))
            .map(|(action, t)| SearchNode {
                state: t.state,
                parent: Some(id),
                action: Some(action),
                cost: cost + t.cost,
                depth: depth + 1,
            })
            .collect();

        for child in children {
            let child_id = tree.push(child);
            frontier.push(child_id, tree.get(child_id));
            stats.nodes_generated += 1;
        }
        stats.max_frontier = stats.max_frontier.max(frontier.len());
    };

    stats.elapsed = started.elapsed();
    if let Outcome::Solved(plan) = &outcome {
        stats.solution_length = plan.len();
    }
    debug!(
        explored = stats.nodes_explored,
        generated = stats.nodes_generated,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "search finished: {}",
        outcome
    );

    SearchRun {
        outcome,
        stats,
        trace: expanded,
    }
}
