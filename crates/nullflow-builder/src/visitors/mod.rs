//! The operation visitor: walks a [`BoundNode`] tree, producing the
//! [`TypeWithNode`] of every expression and threading the edges that
//! constraint propagation needs through `pending`.
//!
//! Split by operation family the way the teacher's binder state machine is
//! split across several files (literals/references, calls, control flow,
//! collections, statements) rather than one monolithic `match`.

mod calls;
mod collections;
mod control_flow;
mod expressions;
mod statements;

use crate::bound_tree::{BoundNode, NonNullFlowOracle};
use crate::substitution::Substitution;
use crate::variance::{create_type_edge, Variance};
use nullflow_common::Location;
use nullflow_graph::{NON_NULL, OBLIVIOUS};
use nullflow_model::registry::PendingCommit;
use nullflow_model::{Registry, SymbolId, Type, TypeWithNode};
use rustc_hash::FxHashMap;

/// Per-tree visitor state: the registry/pending-commit pair it writes into,
/// the oracle it reads non-null-flow facts from, and the two bits of
/// context that only make sense mid-traversal (the enclosing method's
/// return type, for `return`/`yield return`; the enclosing object/collection
/// initializer's own type, for `ImplicitReceiver`).
///
/// `locals` holds every symbol this tree has bound so far (parameters,
/// `var`/typed locals, pattern bindings, `foreach` loop variables):
/// `Registry::get_symbol_type` only becomes aware of them once the whole
/// tree's `PendingCommit` is flushed, but later statements in the *same*
/// tree need to see them immediately, so the visitor consults its own
/// scope first and only falls through to the registry for symbols owned by
/// already-flushed trees (externals, or previously built methods/fields).
pub struct OperationVisitor<'a> {
    pub registry: &'a mut Registry,
    pub pending: &'a mut PendingCommit,
    pub oracle: &'a dyn NonNullFlowOracle,
    pub current_return_type: Option<TypeWithNode>,
    pub enclosing_creation: Option<TypeWithNode>,
    locals: FxHashMap<SymbolId, TypeWithNode>,
}

impl<'a> OperationVisitor<'a> {
    pub fn new(
        registry: &'a mut Registry,
        pending: &'a mut PendingCommit,
        oracle: &'a dyn NonNullFlowOracle,
    ) -> Self {
        OperationVisitor {
            registry,
            pending,
            oracle,
            current_return_type: None,
            enclosing_creation: None,
            locals: FxHashMap::default(),
        }
    }

    /// Seed the visitor's local scope before walking the body, e.g. with
    /// the method's own parameters.
    pub fn with_locals(mut self, locals: FxHashMap<SymbolId, TypeWithNode>) -> Self {
        self.locals = locals;
        self
    }

    /// Bind `id` to `twn` for the rest of this tree's traversal, and queue
    /// it for cross-tree visibility once the tree's commit is flushed.
    pub(crate) fn bind_local(&mut self, id: SymbolId, twn: TypeWithNode) {
        self.pending.add_symbol_type(id, twn.clone());
        self.locals.insert(id, twn);
    }

    /// The `TypeWithNode` for `id` as bound so far in this tree, if any.
    pub(crate) fn lookup_local(&self, id: SymbolId) -> Option<TypeWithNode> {
        self.locals.get(&id).cloned()
    }

    pub fn visit(&mut self, node: &BoundNode) -> TypeWithNode {
        match node {
            BoundNode::NullLiteral { .. } => expressions::visit_null_literal(),
            BoundNode::NonNullReferenceLiteral { ty, .. } => {
                expressions::visit_non_null_reference_literal(ty)
            }
            BoundNode::ValueLiteral { ty, .. } => expressions::visit_value_literal(ty),
            BoundNode::SymbolReference { symbol, location } => {
                expressions::visit_symbol_reference(self, *symbol, location)
            }
            BoundNode::ThisReference { ty, .. } => expressions::visit_this_reference(ty),
            BoundNode::ImplicitReceiver { .. } => expressions::visit_implicit_receiver(self),
            BoundNode::MemberAccess {
                receiver,
                member,
                location,
            } => expressions::visit_member_access(self, receiver, *member, location),
            BoundNode::Assignment {
                target,
                value,
                location,
            } => expressions::visit_assignment(self, target, value, location),
            BoundNode::Call {
                receiver,
                method,
                explicit_type_args,
                arguments,
                location,
            } => calls::visit_call(self, receiver, *method, explicit_type_args, arguments, location),
            BoundNode::IndexerAccess {
                receiver,
                indexer,
                arguments,
                location,
            } => calls::visit_indexer_access(self, receiver, *indexer, arguments, location),
            BoundNode::ArrayElementAccess {
                receiver,
                index,
                location,
            } => collections::visit_array_element_access(self, receiver, index, location),
            BoundNode::ObjectCreation {
                ty,
                constructor,
                arguments,
                initializer,
                location,
            } => calls::visit_object_creation(self, ty, *constructor, arguments, initializer, location),
            BoundNode::Conversion {
                operand,
                kind,
                target_type,
                location,
            } => expressions::visit_conversion(self, operand, kind, target_type, location),
            BoundNode::NullForgiving { operand, .. } => {
                expressions::visit_null_forgiving(self, operand)
            }
            BoundNode::Coalesce {
                left,
                right,
                location,
            } => control_flow::visit_coalesce(self, left, right, location),
            BoundNode::Conditional {
                condition,
                when_true,
                when_false,
                location,
            } => control_flow::visit_conditional(self, condition, when_true, when_false, location),
            BoundNode::NullComparison { operand, .. } => {
                control_flow::visit_null_comparison(self, operand)
            }
            BoundNode::ThrowExpression { operand, .. } => {
                expressions::visit_throw_expression(self, operand)
            }
            BoundNode::ArrayCreation {
                element_type,
                initializer,
                location,
            } => collections::visit_array_creation(self, element_type, initializer, location),
            BoundNode::CollectionInitializerAdd {
                add_method,
                arguments,
                location,
            } => collections::visit_collection_initializer_add(self, *add_method, arguments, location),
            BoundNode::TupleLiteral { elements, .. } => {
                collections::visit_tuple_literal(self, elements)
            }
            BoundNode::Deconstruction {
                targets,
                value,
                location,
            } => collections::visit_deconstruction(self, targets, value, location),
            BoundNode::Lambda {
                parameters,
                return_type,
                body,
                location,
            } => statements::visit_lambda(self, parameters, return_type, body, location),
            BoundNode::YieldReturn { value, location } => {
                statements::visit_yield_return(self, value, location)
            }
            BoundNode::Await { operand, location } => statements::visit_await(self, operand, location),
            BoundNode::TypePattern {
                operand,
                pattern_type,
                ..
            } => control_flow::visit_type_pattern(self, operand, pattern_type),
            BoundNode::PropertyPattern {
                operand,
                bindings,
                location,
            } => control_flow::visit_property_pattern(self, operand, bindings, location),
            BoundNode::SwitchExpression {
                scrutinee,
                arms,
                location,
            } => control_flow::visit_switch_expression(self, scrutinee, arms, location),
            BoundNode::AnonymousObject { members, .. } => {
                collections::visit_anonymous_object(self, members)
            }
            BoundNode::Foreach {
                collection,
                explicit_element_type,
                loop_variable,
                body,
                ..
            } => statements::visit_foreach(
                self,
                collection,
                explicit_element_type,
                *loop_variable,
                body,
            ),
            BoundNode::VarLocalDeclaration {
                local, initializer, ..
            } => statements::visit_var_local_declaration(self, *local, initializer),
            BoundNode::TypedLocalDeclaration {
                local,
                declared_type,
                initializer,
                location,
            } => statements::visit_typed_local_declaration(
                self,
                *local,
                declared_type,
                initializer,
                location,
            ),
            BoundNode::Return { value, location } => statements::visit_return(self, value, location),
            BoundNode::Block { statements, .. } => statements::visit_block(self, statements),
            BoundNode::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => statements::visit_if(self, condition, then_branch, else_branch),
            BoundNode::Unsupported { kind, location } => {
                panic!("unsupported bound-tree construct `{kind}` at {location}")
            }
        }
    }

    /// A member/indexer/call receiver must be non-null at the point of
    /// dereference; emit the constraint rather than asserting it outright
    /// since that's what the graph/solver are for.
    pub(crate) fn dereference(&mut self, operand: &TypeWithNode, location: &Location) {
        self.pending
            .add_edge(operand.node, NON_NULL, "dereference", location.clone());
    }

    pub(crate) fn assignment_edge(
        &mut self,
        value: &TypeWithNode,
        target: &TypeWithNode,
        location: &Location,
    ) {
        create_type_edge(
            self.pending,
            value,
            target,
            &Substitution::new(),
            Variance::Out,
            "assignment",
            location,
        );
    }

    /// Widen a reference occurrence to non-null when the caller-supplied
    /// flow oracle has proven it dominated by a non-null check. This
    /// narrows only this occurrence's outer node -- it never mutates the
    /// symbol's own declared node, so an unrelated occurrence of the same
    /// symbol outside the narrowed region is unaffected.
    pub(crate) fn narrow_if_proven(&self, twn: TypeWithNode, location: &Location) -> TypeWithNode {
        if self.oracle.is_non_null_at(location) {
            TypeWithNode {
                node: NON_NULL,
                ..twn
            }
        } else {
            twn
        }
    }

    pub(crate) fn void_leaf() -> TypeWithNode {
        TypeWithNode::leaf(Type::named("void"), OBLIVIOUS)
    }
}
