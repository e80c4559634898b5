//! The nullability flow graph: an arena of [`NullabilityNode`]s connected by
//! directed, labeled [`Edge`]s, plus a bidirectional-BFS [`solver`] that
//! answers reachability queries over it.
//!
//! Nodes are never destroyed and edges are only ever appended (see
//! `Graph::add_edge`), so the graph is cheap to reason about: once a builder
//! has flushed, earlier query results remain valid.

pub mod edge;
pub mod graph;
pub mod node;
pub mod solver;

pub use edge::Edge;
pub use graph::{EdgeId, Graph};
pub use node::{NodeId, NullType, NullabilityNode, NON_NULL, NULLABLE, OBLIVIOUS};
pub use solver::{PathQuery, SolveResult, Verdict};
