//! Calls, indexer access, and object creation: the forms that bind
//! arguments to declared parameters and need generic substitution.

use crate::bound_tree::{Argument, BoundNode};
use crate::substitution::Substitution;
use crate::variance::{create_type_edge, Variance};
use crate::visitors::OperationVisitor;
use nullflow_common::Location;
use nullflow_graph::NON_NULL;
use nullflow_model::{Annotation, RefKind, SymbolId, Type, TypeWithNode};

/// Build the substitution a call/indexer-access site binds: the receiver's
/// own type arguments (if any) become the class-level substitution, and
/// explicit type arguments (if supplied) become the method-level one.
/// Inferred (non-explicit) method type arguments fall through to the
/// declared type-parameter node unresolved -- we don't implement type
/// inference, so an unconstrained call site is simply less precise, never
/// unsound.
fn build_substitution(
    v: &mut OperationVisitor,
    receiver: Option<&TypeWithNode>,
    explicit_type_args: &[Type],
) -> Substitution {
    let class_args = receiver
        .map(|r| r.children.iter().map(|c| c.node).collect())
        .unwrap_or_default();
    let mut substitution = Substitution::with_class_args(class_args);
    if !explicit_type_args.is_empty() {
        let method_args = explicit_type_args
            .iter()
            .map(|ty| v.registry.from_type(ty, Annotation::None).node)
            .collect();
        substitution.set_method_args(method_args);
    }
    substitution
}

/// Bind each call argument to its parameter per the parameter's ref-kind:
/// ordinary/`in`/`params` parameters take data in (argument flows to
/// parameter), `out` parameters hand data back (parameter flows to
/// argument), `ref` is both directions at once.
pub(crate) fn bind_arguments(
    v: &mut OperationVisitor,
    arguments: &[Argument],
    params: &[SymbolId],
    substitution: &Substitution,
    location: &Location,
) {
    let identity = Substitution::new();
    for (index, argument) in arguments.iter().enumerate() {
        let argument_twn = v.visit(&argument.value);
        let Some(&param_id) = params.get(index) else {
            continue;
        };
        let declared_param = v.registry.get_symbol_type(param_id);
        let param_twn = substitution.substitute_tree(&declared_param);
        match argument.ref_kind {
            RefKind::Out => create_type_edge(
                v.pending,
                &param_twn,
                &argument_twn,
                &identity,
                Variance::Out,
                "out-argument",
                location,
            ),
            RefKind::Ref => create_type_edge(
                v.pending,
                &argument_twn,
                &param_twn,
                &identity,
                Variance::Invariant,
                "ref-argument",
                location,
            ),
            RefKind::None | RefKind::In | RefKind::Params => create_type_edge(
                v.pending,
                &argument_twn,
                &param_twn,
                &identity,
                Variance::Out,
                "argument",
                location,
            ),
        }
    }
}

pub fn visit_call(
    v: &mut OperationVisitor,
    receiver: &Option<Box<BoundNode>>,
    method: SymbolId,
    explicit_type_args: &[Type],
    arguments: &[Argument],
    location: &Location,
) -> TypeWithNode {
    let receiver_twn = receiver.as_ref().map(|r| {
        let twn = v.visit(r);
        v.dereference(&twn, location);
        twn
    });
    let substitution = build_substitution(v, receiver_twn.as_ref(), explicit_type_args);

    let info = v
        .registry
        .symbols()
        .get(method)
        .cloned()
        .unwrap_or_else(|| panic!("call to unregistered method symbol {method:?}"));
    bind_arguments(v, arguments, &info.parameters, &substitution, location);

    let return_type = info.return_type.clone().unwrap_or_else(|| Type::named("void"));
    let declared_return = v.registry.from_type(&return_type, info.annotation);
    substitution.substitute_tree(&declared_return)
}

pub fn visit_indexer_access(
    v: &mut OperationVisitor,
    receiver: &BoundNode,
    indexer: SymbolId,
    arguments: &[Argument],
    location: &Location,
) -> TypeWithNode {
    let receiver_twn = v.visit(receiver);
    v.dereference(&receiver_twn, location);
    let substitution = build_substitution(v, Some(&receiver_twn), &[]);

    let info = v
        .registry
        .symbols()
        .get(indexer)
        .cloned()
        .unwrap_or_else(|| panic!("indexer access on unregistered symbol {indexer:?}"));
    bind_arguments(v, arguments, &info.parameters, &substitution, location);

    let declared = v.registry.get_symbol_type(indexer);
    substitution.substitute_tree(&declared)
}

pub fn visit_object_creation(
    v: &mut OperationVisitor,
    ty: &Type,
    constructor: Option<SymbolId>,
    arguments: &[Argument],
    initializer: &[(SymbolId, BoundNode)],
    location: &Location,
) -> TypeWithNode {
    // `new T(...)` is never itself null, regardless of what T's own type
    // arguments resolve to.
    let mut created = v.registry.from_type(ty, Annotation::None);
    created.node = NON_NULL;

    if let Some(ctor) = constructor {
        let params = v
            .registry
            .symbols()
            .get(ctor)
            .map(|info| info.parameters.clone())
            .unwrap_or_default();
        let substitution =
            Substitution::with_class_args(created.children.iter().map(|c| c.node).collect());
        bind_arguments(v, arguments, &params, &substitution, location);
    }

    let previous = v.enclosing_creation.replace(created.clone());
    for (member, value_node) in initializer {
        let value_twn = v.visit(value_node);
        let member_declared = v.registry.get_symbol_type(*member);
        v.assignment_edge(&value_twn, &member_declared, location);
    }
    v.enclosing_creation = previous;

    created
}
