//! Reachability queries and the final-annotation solver.
//!
//! A node is *forced nullable* iff [`crate::NULLABLE`] has a directed path
//! to it, and *forced non-null* iff it has a directed path to
//! [`crate::NON_NULL`]. Both forced is a contradiction; neither forced
//! defaults to non-null.

use crate::graph::Graph;
use crate::node::NodeId;
use fixedbitset::FixedBitSet;
use std::collections::VecDeque;
use tracing::{debug, debug_span};

/// The final verdict assigned to one nullability node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verdict {
    Nullable,
    NonNull,
    Oblivious,
}

/// A single reachability query against a [`Graph`], implemented as a
/// bidirectional BFS bounded by a maximum number of edges explored. This
/// matches the test harness's `has_path_from_parameter_to_return_type` and
/// `check_paths` APIs, which ask the same "is A reachable from B" question
/// directly against the graph.
pub struct PathQuery<'g> {
    graph: &'g Graph,
    max_edges: usize,
}

impl<'g> PathQuery<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        PathQuery {
            graph,
            max_edges: 1_000_000,
        }
    }

    pub fn with_max_edges(graph: &'g Graph, max_edges: usize) -> Self {
        PathQuery { graph, max_edges }
    }

    /// Is there a directed path from `from` to `to`?
    pub fn has_path(&self, from: NodeId, to: NodeId) -> bool {
        if from == to {
            return true;
        }
        let n = self.graph.node_count();
        let mut visited_fwd = FixedBitSet::with_capacity(n);
        let mut visited_bwd = FixedBitSet::with_capacity(n);
        let mut fwd: VecDeque<NodeId> = VecDeque::new();
        let mut bwd: VecDeque<NodeId> = VecDeque::new();
        visited_fwd.insert(from.index());
        visited_bwd.insert(to.index());
        fwd.push_back(from);
        bwd.push_back(to);

        let mut edges_explored = 0usize;
        while !fwd.is_empty() || !bwd.is_empty() {
            if let Some(next) = fwd.pop_front() {
                for &edge_id in self.graph.out_edges(next) {
                    edges_explored += 1;
                    if edges_explored > self.max_edges {
                        return false;
                    }
                    let edge = self.graph.edge(edge_id);
                    if visited_bwd.contains(edge.target.index()) {
                        return true;
                    }
                    if !visited_fwd.contains(edge.target.index()) {
                        visited_fwd.insert(edge.target.index());
                        fwd.push_back(edge.target);
                    }
                }
            }
            if let Some(next) = bwd.pop_front() {
                for &edge_id in self.graph.in_edges(next) {
                    edges_explored += 1;
                    if edges_explored > self.max_edges {
                        return false;
                    }
                    let edge = self.graph.edge(edge_id);
                    if visited_fwd.contains(edge.source.index()) {
                        return true;
                    }
                    if !visited_bwd.contains(edge.source.index()) {
                        visited_bwd.insert(edge.source.index());
                        bwd.push_back(edge.source);
                    }
                }
            }
        }
        false
    }
}

/// The result of solving an entire graph: for every node, whether it is
/// forced nullable and/or forced non-null.
pub struct SolveResult {
    forced_nullable: FixedBitSet,
    forced_non_null: FixedBitSet,
    /// Nodes for which both are true -- a contradiction.
    pub contradictions: Vec<NodeId>,
}

impl SolveResult {
    pub fn is_forced_nullable(&self, node: NodeId) -> bool {
        self.forced_nullable.contains(node.index())
    }

    pub fn is_forced_non_null(&self, node: NodeId) -> bool {
        self.forced_non_null.contains(node.index())
    }

    /// The final verdict for `node`: both forced is a contradiction that
    /// defaults to `Nullable` (the safe direction); neither forced
    /// defaults to `NonNull`, preserving the behavior of unannotated
    /// source.
    pub fn verdict(&self, node: NodeId) -> Verdict {
        match (self.is_forced_nullable(node), self.is_forced_non_null(node)) {
            (true, true) => Verdict::Nullable,
            (true, false) => Verdict::Nullable,
            (false, true) => Verdict::NonNull,
            (false, false) => Verdict::NonNull,
        }
    }
}

/// Solve the whole graph: compute, for every node, reachability from
/// [`crate::NULLABLE`] and to [`crate::NON_NULL`].
pub fn solve(graph: &Graph) -> SolveResult {
    let _span = debug_span!("solve", nodes = graph.node_count(), edges = graph.edge_count())
        .entered();
    let n = graph.node_count();
    let query = PathQuery::new(graph);

    let mut forced_nullable = FixedBitSet::with_capacity(n);
    let mut forced_non_null = FixedBitSet::with_capacity(n);
    let mut contradictions = Vec::new();

    for node in graph.node_ids() {
        let nullable = query.has_path(crate::NULLABLE, node);
        let non_null = query.has_path(node, crate::NON_NULL);
        if nullable {
            forced_nullable.insert(node.index());
        }
        if non_null {
            forced_non_null.insert(node.index());
        }
        if nullable && non_null {
            contradictions.push(node);
        }
    }

    debug!(contradictions = contradictions.len(), "solve complete");
    SolveResult {
        forced_nullable,
        forced_non_null,
        contradictions,
    }
}
