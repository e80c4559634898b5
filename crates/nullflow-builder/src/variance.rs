//! Edge creation with variance.

use crate::substitution::Substitution;
use nullflow_common::Location;
use nullflow_model::registry::PendingCommit;
use nullflow_model::TypeWithNode;
use nullflow_model::Type;

/// `Out` = covariant / assignment position, `In` = contravariant / parameter
/// position, `Invariant` = both directions. Named this way rather than
/// `Co`/`Contra` to match how the call sites read.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Variance {
    Out,
    In,
    Invariant,
}

impl Variance {
    /// Flip covariant/contravariant; invariant stays invariant. Used when
    /// recursing into a contravariant slot (e.g. a function parameter).
    pub fn flip(self) -> Variance {
        match self {
            Variance::Out => Variance::In,
            Variance::In => Variance::Out,
            Variance::Invariant => Variance::Invariant,
        }
    }
}

/// `CreateTypeEdge`: recursively walk `source` and `target` in lockstep,
/// substituting type-parameter slots in `target` via `substitution`, and
/// emitting edges per `variance` at every level.
///
/// We don't model declared in/out variance annotations on generic type
/// parameters, so non-function, non-array generic type arguments recurse
/// with `Variance::Invariant` regardless of the caller's variance -- the
/// same conservative default C#'s own unannotated generics use. Array
/// elements are always invariant; function parameters flip, returns
/// preserve.
pub fn create_type_edge(
    pending: &mut PendingCommit,
    source: &TypeWithNode,
    target: &TypeWithNode,
    substitution: &Substitution,
    variance: Variance,
    label: &str,
    location: &Location,
) {
    let target_node = substitution.resolve(target);

    match variance {
        Variance::Out => {
            pending.add_edge(source.node, target_node, label, location.clone());
        }
        Variance::In => {
            pending.add_edge(target_node, source.node, label, location.clone());
        }
        Variance::Invariant => {
            pending.add_edge(source.node, target_node, label, location.clone());
            pending.add_edge(target_node, source.node, label, location.clone());
        }
    }

    match &target.ty {
        Type::Array(_) => {
            if let (Some(s), Some(t)) = (source.child(0), target.child(0)) {
                create_type_edge(pending, s, t, substitution, Variance::Invariant, label, location);
            }
        }
        Type::Function { .. } => {
            let source_params = source.function_params();
            let target_params = target.function_params();
            for (s, t) in source_params.iter().zip(target_params.iter()) {
                create_type_edge(pending, s, t, substitution, variance.flip(), label, location);
            }
            if let (Some(s), Some(t)) = (source.function_return(), target.function_return()) {
                create_type_edge(pending, s, t, substitution, variance, label, location);
            }
        }
        _ => {
            for (s, t) in source.children.iter().zip(target.children.iter()) {
                create_type_edge(pending, s, t, substitution, Variance::Invariant, label, location);
            }
        }
    }
}
