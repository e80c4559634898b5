//! Nullability nodes: the vertices of the flow graph.

/// Identifies a node within a single [`crate::Graph`]. Indices are stable for
/// the lifetime of the graph; nodes are never removed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The classification a [`NullabilityNode`] carries.
///
/// `Nullable`, `NonNull`, and `Oblivious` are the three terminal singletons
/// (see [`crate::NULLABLE`], [`crate::NON_NULL`], [`crate::OBLIVIOUS`]);
/// every other node starts out `Inferred` and is resolved by the solver.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NullType {
    Nullable,
    NonNull,
    Oblivious,
    Inferred,
}

impl NullType {
    /// The three special node kinds never change classification once created.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, NullType::Inferred)
    }
}

#[derive(Clone, Debug)]
pub struct NullabilityNode {
    pub null_type: NullType,
    pub debug_name: Option<String>,
}

/// Singleton node identifiers. A fresh [`crate::Graph`] always allocates
/// these three first, in this order, so the constants are valid immediately.
pub const NULLABLE: NodeId = NodeId(0);
pub const NON_NULL: NodeId = NodeId(1);
pub const OBLIVIOUS: NodeId = NodeId(2);
