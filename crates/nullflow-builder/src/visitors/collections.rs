//! Arrays, collection initializers, tuples, deconstruction, and anonymous
//! objects.

use crate::bound_tree::{Argument, BoundNode};
use crate::substitution::Substitution;
use crate::variance::{create_type_edge, Variance};
use crate::visitors::calls::bind_arguments;
use crate::visitors::OperationVisitor;
use nullflow_common::Location;
use nullflow_graph::{NON_NULL, OBLIVIOUS};
use nullflow_model::{Annotation, SymbolId, Type, TupleElement, TypeWithNode};

pub fn visit_array_creation(
    v: &mut OperationVisitor,
    element_type: &Type,
    initializer: &[BoundNode],
    location: &Location,
) -> TypeWithNode {
    let element_twn = v.registry.from_type(element_type, Annotation::None);
    let identity = Substitution::new();
    for element in initializer {
        let element_value = v.visit(element);
        create_type_edge(
            v.pending,
            &element_value,
            &element_twn,
            &identity,
            Variance::Out,
            "array-element",
            location,
        );
    }
    // A freshly created array is never itself null.
    TypeWithNode::with_children(
        Type::Array(Box::new(element_type.clone())),
        NON_NULL,
        vec![element_twn],
    )
}

/// `arr[i]`: unlike `IndexerAccess`, there's no user-defined indexer symbol
/// to bind against -- the element's `TypeWithNode` is just the receiver
/// array's own element child, so a write through one occurrence and a read
/// through another see the same node.
pub fn visit_array_element_access(
    v: &mut OperationVisitor,
    receiver: &BoundNode,
    index: &BoundNode,
    location: &Location,
) -> TypeWithNode {
    let receiver_twn = v.visit(receiver);
    v.dereference(&receiver_twn, location);
    v.visit(index);
    receiver_twn
        .children
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("array element access on a receiver with no element child"))
}

pub fn visit_collection_initializer_add(
    v: &mut OperationVisitor,
    add_method: SymbolId,
    arguments: &[Argument],
    location: &Location,
) -> TypeWithNode {
    let params = v
        .registry
        .symbols()
        .get(add_method)
        .map(|info| info.parameters.clone())
        .unwrap_or_default();
    bind_arguments(v, arguments, &params, &Substitution::new(), location);
    TypeWithNode::leaf(Type::named("void"), OBLIVIOUS)
}

pub fn visit_tuple_literal(
    v: &mut OperationVisitor,
    elements: &[(Option<String>, BoundNode)],
) -> TypeWithNode {
    let mut children = Vec::with_capacity(elements.len());
    let mut tuple_elements = Vec::with_capacity(elements.len());
    for (name, value) in elements {
        let value_twn = v.visit(value);
        tuple_elements.push(TupleElement {
            name: name.clone(),
            ty: value_twn.ty.clone(),
        });
        children.push(value_twn);
    }
    TypeWithNode::with_children(Type::Tuple(tuple_elements), OBLIVIOUS, children)
}

pub fn visit_deconstruction(
    v: &mut OperationVisitor,
    targets: &[BoundNode],
    value: &BoundNode,
    location: &Location,
) -> TypeWithNode {
    let value_twn = v.visit(value);
    let identity = Substitution::new();
    for (index, target) in targets.iter().enumerate() {
        let target_twn = v.visit(target);
        if let Some(source) = value_twn.child(index) {
            create_type_edge(
                v.pending,
                source,
                &target_twn,
                &identity,
                Variance::Out,
                "deconstruction",
                location,
            );
        }
    }
    TypeWithNode::leaf(Type::named("void"), OBLIVIOUS)
}

pub fn visit_anonymous_object(
    v: &mut OperationVisitor,
    members: &[(SymbolId, BoundNode)],
) -> TypeWithNode {
    let mut children = Vec::with_capacity(members.len());
    let mut tuple_elements = Vec::with_capacity(members.len());
    for (member, value) in members {
        let value_twn = v.visit(value);
        let name = v
            .registry
            .symbols()
            .get(*member)
            .map(|info| info.name.clone());
        tuple_elements.push(TupleElement {
            name,
            ty: value_twn.ty.clone(),
        });
        children.push(value_twn);
    }
    TypeWithNode::with_children(Type::Tuple(tuple_elements), OBLIVIOUS, children)
}
