//! `??`, `?:`, null comparisons, and pattern matching.
//!
//! The conditional expression is resolved here by construction: both
//! branches are visited exactly once, each to its own `TypeWithNode`, with
//! no re-evaluation of either side.

use crate::bound_tree::{BoundNode, SwitchArm};
use crate::substitution::Substitution;
use crate::variance::{create_type_edge, Variance};
use crate::visitors::OperationVisitor;
use nullflow_common::Location;
use nullflow_graph::OBLIVIOUS;
use nullflow_model::{Annotation, SymbolId, Type, TypeWithNode};

pub fn visit_coalesce(
    v: &mut OperationVisitor,
    left: &BoundNode,
    right: &BoundNode,
    _location: &Location,
) -> TypeWithNode {
    // `a ?? b` discards left's null case entirely: the expression's result
    // is exactly as nullable as `b`, never influenced by `a`'s own
    // nullability. `a` is still visited for its side-effecting edges
    // (nested dereferences, etc.), just not wired into the result.
    let _left_twn = v.visit(left);
    v.visit(right)
}

pub fn visit_conditional(
    v: &mut OperationVisitor,
    condition: &BoundNode,
    when_true: &BoundNode,
    when_false: &BoundNode,
    location: &Location,
) -> TypeWithNode {
    v.visit(condition);
    let true_twn = v.visit(when_true);
    let false_twn = v.visit(when_false);
    let result = v.registry.from_type(&true_twn.ty, Annotation::None);
    let identity = Substitution::new();
    create_type_edge(
        v.pending,
        &true_twn,
        &result,
        &identity,
        Variance::Out,
        "conditional-true",
        location,
    );
    create_type_edge(
        v.pending,
        &false_twn,
        &result,
        &identity,
        Variance::Out,
        "conditional-false",
        location,
    );
    result
}

pub fn visit_null_comparison(v: &mut OperationVisitor, operand: &BoundNode) -> TypeWithNode {
    // Comparing against null must not itself force the operand non-null --
    // that would make every narrowing check its own contradiction.
    v.visit(operand);
    TypeWithNode::leaf(Type::named("bool"), OBLIVIOUS)
}

pub fn visit_type_pattern(
    v: &mut OperationVisitor,
    operand: &BoundNode,
    pattern_type: &Type,
) -> TypeWithNode {
    v.visit(operand);
    v.registry.from_type(pattern_type, Annotation::None)
}

pub fn visit_property_pattern(
    v: &mut OperationVisitor,
    operand: &BoundNode,
    bindings: &[(SymbolId, SymbolId)],
    location: &Location,
) -> TypeWithNode {
    let _ = location;
    v.visit(operand);
    for (property, binding) in bindings {
        let property_twn = v.registry.get_symbol_type(*property);
        v.bind_local(*binding, property_twn);
    }
    TypeWithNode::leaf(Type::named("bool"), OBLIVIOUS)
}

pub fn visit_switch_expression(
    v: &mut OperationVisitor,
    scrutinee: &BoundNode,
    arms: &[SwitchArm],
    location: &Location,
) -> TypeWithNode {
    v.visit(scrutinee);
    let mut arm_results = Vec::with_capacity(arms.len());
    for arm in arms {
        if let Some(pattern) = &arm.pattern {
            v.visit(pattern);
        }
        arm_results.push(v.visit(&arm.result));
    }
    let first = arm_results
        .first()
        .expect("switch expression must have at least one arm");
    let result = v.registry.from_type(&first.ty, Annotation::None);
    let identity = Substitution::new();
    for arm_twn in &arm_results {
        create_type_edge(
            v.pending,
            arm_twn,
            &result,
            &identity,
            Variance::Out,
            "switch-arm",
            location,
        );
    }
    result
}
