//! `TypeWithNode`: a declared type paired with the tree of nullability nodes
//! mirroring its generic structure.

use crate::types::Type;
use nullflow_graph::NodeId;

#[derive(Clone, Debug)]
pub struct TypeWithNode {
    pub ty: Type,
    /// The node at this position's outer level.
    pub node: NodeId,
    /// One child per type argument / array element / tuple element /
    /// function parameter (+ trailing return), in declaration order.
    pub children: Vec<TypeWithNode>,
}

impl TypeWithNode {
    pub fn leaf(ty: Type, node: NodeId) -> Self {
        TypeWithNode {
            ty,
            node,
            children: Vec::new(),
        }
    }

    pub fn with_children(ty: Type, node: NodeId, children: Vec<TypeWithNode>) -> Self {
        TypeWithNode { ty, node, children }
    }

    /// The child at `index`, if the type has one (e.g. the sole type
    /// argument of `Sequence<T>`/`TaskLike<T>`, or array element type).
    pub fn child(&self, index: usize) -> Option<&TypeWithNode> {
        self.children.get(index)
    }

    /// For `Function` types: the return child is always last.
    pub fn function_return(&self) -> Option<&TypeWithNode> {
        self.children.last()
    }

    /// For `Function` types: the parameter children, excluding the trailing
    /// return child.
    pub fn function_params(&self) -> &[TypeWithNode] {
        if self.children.is_empty() {
            &[]
        } else {
            &self.children[..self.children.len() - 1]
        }
    }
}
