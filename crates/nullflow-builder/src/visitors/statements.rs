//! Lambdas, iterators, `await`, loops, local declarations, and the
//! statement forms.

use crate::bound_tree::BoundNode;
use crate::substitution::Substitution;
use crate::variance::{create_type_edge, Variance};
use crate::visitors::OperationVisitor;
use nullflow_common::Location;
use nullflow_graph::NON_NULL;
use nullflow_model::{Annotation, SymbolId, Type, TypeWithNode};

pub fn visit_lambda(
    v: &mut OperationVisitor,
    parameters: &[SymbolId],
    return_type: &Type,
    body: &BoundNode,
    location: &Location,
) -> TypeWithNode {
    let return_twn = v.registry.from_type(return_type, Annotation::None);
    let previous = v.current_return_type.replace(return_twn.clone());
    let body_twn = v.visit(body);
    v.current_return_type = previous;
    create_type_edge(
        v.pending,
        &body_twn,
        &return_twn,
        &Substitution::new(),
        Variance::Out,
        "lambda-body",
        location,
    );

    let param_children: Vec<TypeWithNode> = parameters
        .iter()
        .map(|p| v.registry.get_symbol_type(*p))
        .collect();
    let param_types: Vec<Type> = param_children.iter().map(|c| c.ty.clone()).collect();
    let mut children = param_children;
    children.push(return_twn);

    TypeWithNode::with_children(
        Type::Function {
            params: param_types,
            ret: Box::new(return_type.clone()),
        },
        NON_NULL,
        children,
    )
}

pub fn visit_yield_return(
    v: &mut OperationVisitor,
    value: &BoundNode,
    location: &Location,
) -> TypeWithNode {
    let value_twn = v.visit(value);
    if let Some(return_type) = v.current_return_type.clone() {
        create_type_edge(
            v.pending,
            &value_twn,
            &return_type,
            &Substitution::new(),
            Variance::Out,
            "yield-return",
            location,
        );
    }
    OperationVisitor::void_leaf()
}

pub fn visit_await(v: &mut OperationVisitor, operand: &BoundNode, location: &Location) -> TypeWithNode {
    let operand_twn = v.visit(operand);
    v.dereference(&operand_twn, location);
    operand_twn.child(0).cloned().unwrap_or(operand_twn)
}

pub fn visit_foreach(
    v: &mut OperationVisitor,
    collection: &BoundNode,
    explicit_element_type: &Option<Type>,
    loop_variable: SymbolId,
    body: &BoundNode,
) -> TypeWithNode {
    let collection_twn = v.visit(collection);
    let element_twn = match explicit_element_type {
        Some(ty) => v.registry.from_type(ty, Annotation::None),
        None => collection_twn
            .child(0)
            .cloned()
            .unwrap_or_else(|| v.registry.from_type(&Type::named("object"), Annotation::None)),
    };
    v.bind_local(loop_variable, element_twn);
    v.visit(body);
    OperationVisitor::void_leaf()
}

pub fn visit_var_local_declaration(
    v: &mut OperationVisitor,
    local: SymbolId,
    initializer: &BoundNode,
) -> TypeWithNode {
    // `var` adopts the initializer's type wholesale: the local shares the
    // initializer's node, not a fresh one wired by an edge.
    let initializer_twn = v.visit(initializer);
    v.bind_local(local, initializer_twn);
    OperationVisitor::void_leaf()
}

pub fn visit_typed_local_declaration(
    v: &mut OperationVisitor,
    local: SymbolId,
    declared_type: &Type,
    initializer: &BoundNode,
    location: &Location,
) -> TypeWithNode {
    let initializer_twn = v.visit(initializer);
    let declared_twn = v.registry.from_type(declared_type, Annotation::None);
    create_type_edge(
        v.pending,
        &initializer_twn,
        &declared_twn,
        &Substitution::new(),
        Variance::Out,
        "local-declaration",
        location,
    );
    v.bind_local(local, declared_twn);
    OperationVisitor::void_leaf()
}

pub fn visit_return(
    v: &mut OperationVisitor,
    value: &Option<Box<BoundNode>>,
    location: &Location,
) -> TypeWithNode {
    if let Some(value) = value {
        let value_twn = v.visit(value);
        if let Some(return_type) = v.current_return_type.clone() {
            create_type_edge(
                v.pending,
                &value_twn,
                &return_type,
                &Substitution::new(),
                Variance::Out,
                "return",
                location,
            );
        }
    }
    OperationVisitor::void_leaf()
}

pub fn visit_block(v: &mut OperationVisitor, statements: &[BoundNode]) -> TypeWithNode {
    for statement in statements {
        v.visit(statement);
    }
    OperationVisitor::void_leaf()
}

pub fn visit_if(
    v: &mut OperationVisitor,
    condition: &BoundNode,
    then_branch: &BoundNode,
    else_branch: &Option<Box<BoundNode>>,
) -> TypeWithNode {
    v.visit(condition);
    v.visit(then_branch);
    if let Some(else_branch) = else_branch {
        v.visit(else_branch);
    }
    OperationVisitor::void_leaf()
}
