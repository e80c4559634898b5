//! Literals, references, member access, assignment, and conversions.

use crate::bound_tree::{BoundNode, ConversionKind};
use crate::substitution::Substitution;
use crate::variance::{create_type_edge, Variance};
use crate::visitors::OperationVisitor;
use nullflow_common::Location;
use nullflow_graph::{NON_NULL, NULLABLE, OBLIVIOUS};
use nullflow_model::{Annotation, SymbolId, Type, TypeWithNode};

pub fn visit_null_literal() -> TypeWithNode {
    TypeWithNode::leaf(Type::named("object"), NULLABLE)
}

pub fn visit_non_null_reference_literal(ty: &Type) -> TypeWithNode {
    TypeWithNode::leaf(ty.clone(), NON_NULL)
}

pub fn visit_value_literal(ty: &Type) -> TypeWithNode {
    TypeWithNode::leaf(ty.clone(), OBLIVIOUS)
}

pub fn visit_symbol_reference(
    v: &mut OperationVisitor,
    symbol: SymbolId,
    location: &Location,
) -> TypeWithNode {
    let declared = v
        .lookup_local(symbol)
        .unwrap_or_else(|| v.registry.get_symbol_type(symbol));
    v.narrow_if_proven(declared, location)
}

pub fn visit_this_reference(ty: &Type) -> TypeWithNode {
    TypeWithNode::leaf(ty.clone(), NON_NULL)
}

pub fn visit_implicit_receiver(v: &OperationVisitor) -> TypeWithNode {
    v.enclosing_creation
        .clone()
        .unwrap_or_else(|| panic!("implicit receiver referenced outside an initializer"))
}

pub fn visit_member_access(
    v: &mut OperationVisitor,
    receiver: &Option<Box<BoundNode>>,
    member: SymbolId,
    location: &Location,
) -> TypeWithNode {
    if let Some(receiver) = receiver {
        let receiver_twn = v.visit(receiver);
        v.dereference(&receiver_twn, location);
    }
    let declared = v.registry.get_symbol_type(member);
    v.narrow_if_proven(declared, location)
}

pub fn visit_assignment(
    v: &mut OperationVisitor,
    target: &BoundNode,
    value: &BoundNode,
    location: &Location,
) -> TypeWithNode {
    let target_twn = v.visit(target);
    let value_twn = v.visit(value);
    v.assignment_edge(&value_twn, &target_twn, location);
    value_twn
}

pub fn visit_conversion(
    v: &mut OperationVisitor,
    operand: &BoundNode,
    kind: &ConversionKind,
    target_type: &Type,
    location: &Location,
) -> TypeWithNode {
    match kind {
        ConversionKind::Reference => {
            let operand_twn = v.visit(operand);
            let target_twn = v.registry.from_type(target_type, Annotation::None);
            create_type_edge(
                v.pending,
                &operand_twn,
                &target_twn,
                &Substitution::new(),
                Variance::Out,
                "reference-conversion",
                location,
            );
            target_twn
        }
        ConversionKind::Unboxing => {
            let operand_twn = v.visit(operand);
            v.dereference(&operand_twn, location);
            v.registry.from_type(target_type, Annotation::None)
        }
        ConversionKind::Throw => {
            v.visit(operand);
            v.registry.from_type(target_type, Annotation::NotAnnotated)
        }
        ConversionKind::UserDefined { operator } => {
            let operand_twn = v.visit(operand);
            let info = v.registry.symbols().get(*operator).cloned();
            match info {
                Some(info) => {
                    if let Some(&param) = info.parameters.first() {
                        let declared_param = v.registry.get_symbol_type(param);
                        create_type_edge(
                            v.pending,
                            &operand_twn,
                            &declared_param,
                            &Substitution::new(),
                            Variance::Out,
                            "user-conversion-argument",
                            location,
                        );
                    }
                    let return_type = info.return_type.clone().unwrap_or_else(|| target_type.clone());
                    v.registry.from_type(&return_type, info.annotation)
                }
                None => v.registry.from_type(target_type, Annotation::None),
            }
        }
    }
}

pub fn visit_null_forgiving(v: &mut OperationVisitor, operand: &BoundNode) -> TypeWithNode {
    let operand_twn = v.visit(operand);
    TypeWithNode {
        node: NON_NULL,
        ..operand_twn
    }
}

pub fn visit_throw_expression(v: &mut OperationVisitor, operand: &BoundNode) -> TypeWithNode {
    v.visit(operand);
    TypeWithNode::leaf(Type::named("Never"), NON_NULL)
}
