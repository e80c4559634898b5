//! The graph arena: node storage plus adjacency lists.

use crate::edge::Edge;
use crate::node::{NodeId, NullType, NullabilityNode, NON_NULL, NULLABLE, OBLIVIOUS};
use nullflow_common::Location;
use smallvec::SmallVec;
use tracing::trace;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EdgeId(pub u32);

/// An arena of [`NullabilityNode`]s and [`Edge`]s.
///
/// Nodes and edges are append-only: nothing is ever removed or mutated in
/// place, so a shared `&Graph` reference stays valid for readers (the
/// solver) while a builder continues to append to it. The three singleton
/// nodes ([`NULLABLE`], [`NON_NULL`], [`OBLIVIOUS`]) are allocated by `new`
/// and are always present at indices 0, 1, 2.
pub struct Graph {
    nodes: Vec<NullabilityNode>,
    edges: Vec<Edge>,
    out_edges: Vec<SmallVec<[EdgeId; 4]>>,
    in_edges: Vec<SmallVec<[EdgeId; 4]>>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        let mut graph = Graph {
            nodes: Vec::new(),
            edges: Vec::new(),
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        };
        let nullable = graph.push_node(NullType::Nullable, Some("Nullable".into()));
        let non_null = graph.push_node(NullType::NonNull, Some("NonNull".into()));
        let oblivious = graph.push_node(NullType::Oblivious, Some("Oblivious".into()));
        debug_assert_eq!(nullable, NULLABLE);
        debug_assert_eq!(non_null, NON_NULL);
        debug_assert_eq!(oblivious, OBLIVIOUS);
        graph
    }

    fn push_node(&mut self, null_type: NullType, debug_name: Option<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NullabilityNode {
            null_type,
            debug_name,
        });
        self.out_edges.push(SmallVec::new());
        self.in_edges.push(SmallVec::new());
        id
    }

    /// Allocate a fresh node. Only `NullType::Inferred` is meaningful here --
    /// the three terminal classifications already exist as singletons and
    /// are never re-created.
    pub fn alloc_node(&mut self, debug_name: Option<String>) -> NodeId {
        self.push_node(NullType::Inferred, debug_name)
    }

    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        label: impl Into<String>,
        location: Location,
    ) -> EdgeId {
        let label = label.into();
        trace!(?source, ?target, %label, "add_edge");
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge {
            source,
            target,
            label,
            location,
        });
        self.out_edges[source.index()].push(id);
        self.in_edges[target.index()].push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &NullabilityNode {
        &self.nodes[id.index()]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0 as usize]
    }

    pub fn out_edges(&self, id: NodeId) -> &[EdgeId] {
        &self.out_edges[id.index()]
    }

    pub fn in_edges(&self, id: NodeId) -> &[EdgeId] {
        &self.in_edges[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }
}
