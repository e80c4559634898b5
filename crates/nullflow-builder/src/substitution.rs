//! Generic substitution.
//!
//! A `Substitution` is two parallel ordered lists: nodes bound to the
//! receiver's class type parameters, and nodes bound to the current call's
//! method type parameters (explicit or freshly inferred). Looked up by
//! `(owner, ordinal)`; an outer-enclosing generic with no entry falls
//! through to the declared node untouched.

use nullflow_graph::NodeId;
use nullflow_model::{Type, TypeParamOwner, TypeWithNode};

#[derive(Clone, Debug, Default)]
pub struct Substitution {
    class_args: Vec<NodeId>,
    method_args: Vec<NodeId>,
}

impl Substitution {
    pub fn new() -> Self {
        Substitution::default()
    }

    pub fn with_class_args(class_args: Vec<NodeId>) -> Self {
        Substitution {
            class_args,
            method_args: Vec::new(),
        }
    }

    pub fn set_method_args(&mut self, method_args: Vec<NodeId>) {
        self.method_args = method_args;
    }

    fn lookup(&self, owner: TypeParamOwner, ordinal: u32) -> Option<NodeId> {
        let ordinal = ordinal as usize;
        match owner {
            TypeParamOwner::Class => self.class_args.get(ordinal).copied(),
            TypeParamOwner::Method => self.method_args.get(ordinal).copied(),
        }
    }

    /// Resolve `target`'s outer node, substituting it if it is a
    /// type-parameter slot with an entry in this substitution.
    pub fn resolve(&self, target: &TypeWithNode) -> NodeId {
        match &target.ty {
            Type::TypeParameter { owner, ordinal, .. } => {
                self.lookup(*owner, *ordinal).unwrap_or(target.node)
            }
            _ => target.node,
        }
    }

    /// Project an entire `TypeWithNode` tree through this substitution,
    /// producing the tree a call's result type actually carries (e.g. a
    /// method returning `T` resolves to the type argument bound at the call
    /// site, not the declaration's own type-parameter node).
    pub fn substitute_tree(&self, target: &TypeWithNode) -> TypeWithNode {
        let node = self.resolve(target);
        let children = target
            .children
            .iter()
            .map(|child| self.substitute_tree(child))
            .collect();
        TypeWithNode::with_children(target.ty.clone(), node, children)
    }
}
