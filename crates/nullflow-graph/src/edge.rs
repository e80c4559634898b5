//! Directed, labeled edges between nullability nodes.

use crate::node::NodeId;
use nullflow_common::Location;

/// `source -> target` means "if source is nullable, target must tolerate
/// nullable", i.e. an assignability constraint. A dereference constraint is
/// modeled as an edge into [`crate::NON_NULL`].
#[derive(Clone, Debug)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Short provenance string, e.g. `"assignment"`, `"argument 0"`,
    /// `"dereference"`, `"coalesce-rhs"` -- used only for diagnostics.
    pub label: String,
    pub location: Location,
}
