//! The syntax visitor: maps a type-syntax occurrence to a `TypeWithNode`,
//! registering the syntax node's outer node so repeat visits of the same
//! source position are idempotent.
//!
//! `var` locals and implicitly-typed `foreach` variables are *not* routed
//! through this visitor -- they adopt the initializer's type wholesale,
//! which the operation visitor (`visitors::statements`) handles directly.

use nullflow_model::{Annotation, Registry, TypeWithNode};
use nullflow_model::registry::PendingCommit;
use nullflow_model::Type;

/// A stable key identifying one syntactic type occurrence within a tree
/// (e.g. a parameter's declared-type syntax, a cast's target-type syntax).
/// In a real front end this would be the syntax node's index; our harness
/// mints small sequential integers.
pub type SyntaxKey = u32;

pub fn visit_type_syntax(
    registry: &mut Registry,
    pending: &mut PendingCommit,
    key: SyntaxKey,
    ty: &Type,
    annotation: Annotation,
) -> TypeWithNode {
    if let Some(node) = registry.get_mapping(&pending.tree_path, key) {
        return TypeWithNode::leaf(ty.clone(), node);
    }
    let type_with_node = registry.from_type(ty, annotation);
    pending.register_node(key, type_with_node.node);
    type_with_node
}
