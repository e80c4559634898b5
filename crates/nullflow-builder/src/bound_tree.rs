//! The bound-tree input contract.
//!
//! `BoundNode` is this repository's concrete stand-in for "the bound tree
//! the binder collaborator provides": a typed, symbol-resolved expression
//! and statement tree. The real front end (parser + binder) that would
//! produce this from source text is an external collaborator and out of
//! scope for this crate; [`nullflow_harness`] provides a small synthetic
//! one for tests.

use nullflow_common::Location;
use nullflow_model::{SymbolId, Type};
use serde::{Deserialize, Serialize};

/// How an argument is passed, reusing the parameter's own ref-kind vocabulary.
pub use nullflow_model::RefKind;

/// Classification of a conversion node, supplied by the binder.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ConversionKind {
    /// A reference conversion (upcast, identity, interface implementation).
    Reference,
    /// Unboxing a value out of `object`/`dynamic`.
    Unboxing,
    /// The operand is a `throw` expression.
    Throw,
    /// A user-defined implicit/explicit conversion operator.
    UserDefined { operator: SymbolId },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Argument {
    pub value: BoundNode,
    pub ref_kind: RefKind,
}

impl Argument {
    pub fn by_value(value: BoundNode) -> Self {
        Argument {
            value,
            ref_kind: RefKind::None,
        }
    }
}

/// One arm of a switch expression: an optional pattern (`None` = the
/// discard/default arm) and the arm's result expression.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwitchArm {
    pub pattern: Option<BoundNode>,
    pub result: BoundNode,
}

/// The bound tree's expression/statement node.
///
/// Every case maps directly to one expression or statement form the
/// operation visitor knows how to handle. The catch-all `Unsupported`
/// variant is the "unsupported construct" error kind: the builder fails
/// the whole tree when it encounters one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum BoundNode {
    NullLiteral {
        location: Location,
    },
    /// A non-null reference literal: a string, a `typeof`/`nameof`-shaped
    /// constant, etc.
    NonNullReferenceLiteral {
        ty: Type,
        location: Location,
    },
    /// Any value-type literal (numbers, bools, chars, enum members).
    ValueLiteral {
        ty: Type,
        location: Location,
    },

    /// A reference to a parameter, local, field, property, or event symbol.
    SymbolReference {
        symbol: SymbolId,
        location: Location,
    },
    /// `this` inside an instance member.
    ThisReference {
        ty: Type,
        location: Location,
    },
    /// The implicit receiver inside an object/collection initializer;
    /// resolved against the enclosing `ObjectCreation`'s type.
    ImplicitReceiver {
        location: Location,
    },

    /// A field/property/event access with an explicit receiver.
    MemberAccess {
        receiver: Option<Box<BoundNode>>,
        member: SymbolId,
        location: Location,
    },

    Assignment {
        target: Box<BoundNode>,
        value: Box<BoundNode>,
        location: Location,
    },

    Call {
        receiver: Option<Box<BoundNode>>,
        method: SymbolId,
        explicit_type_args: Vec<Type>,
        arguments: Vec<Argument>,
        location: Location,
    },
    IndexerAccess {
        receiver: Box<BoundNode>,
        indexer: SymbolId,
        arguments: Vec<Argument>,
        location: Location,
    },
    /// A built-in array element access (`arr[i]`), as opposed to a
    /// user-defined indexer property: there is no indexer symbol to look
    /// up, so the element's `TypeWithNode` is the receiver array's own
    /// element child, extracted structurally.
    ArrayElementAccess {
        receiver: Box<BoundNode>,
        index: Box<BoundNode>,
        location: Location,
    },
    ObjectCreation {
        ty: Type,
        constructor: Option<SymbolId>,
        arguments: Vec<Argument>,
        initializer: Vec<(SymbolId, BoundNode)>,
        location: Location,
    },

    Conversion {
        operand: Box<BoundNode>,
        kind: ConversionKind,
        target_type: Type,
        location: Location,
    },
    /// A null-forgiving postfix (`expr!`).
    NullForgiving {
        operand: Box<BoundNode>,
        location: Location,
    },

    Coalesce {
        left: Box<BoundNode>,
        right: Box<BoundNode>,
        location: Location,
    },
    Conditional {
        condition: Box<BoundNode>,
        when_true: Box<BoundNode>,
        when_false: Box<BoundNode>,
        location: Location,
    },
    /// `x == null` / `x != null` / `x is null` / `x is not null`.
    NullComparison {
        operand: Box<BoundNode>,
        location: Location,
    },
    /// An explicit `throw e;` used as an expression.
    ThrowExpression {
        operand: Box<BoundNode>,
        location: Location,
    },

    ArrayCreation {
        element_type: Type,
        initializer: Vec<BoundNode>,
        location: Location,
    },
    /// A collection-initializer entry, modeled as an `Add` call.
    CollectionInitializerAdd {
        add_method: SymbolId,
        arguments: Vec<Argument>,
        location: Location,
    },

    TupleLiteral {
        elements: Vec<(Option<String>, BoundNode)>,
        location: Location,
    },
    Deconstruction {
        targets: Vec<BoundNode>,
        value: Box<BoundNode>,
        location: Location,
    },

    Lambda {
        parameters: Vec<SymbolId>,
        return_type: Type,
        body: Box<BoundNode>,
        location: Location,
    },

    YieldReturn {
        value: Box<BoundNode>,
        location: Location,
    },
    Await {
        operand: Box<BoundNode>,
        location: Location,
    },

    /// `obj is Box` / `obj is Box b`: restricts `obj` to non-null within the
    /// caller-tracked true branch (via the non-null-flow oracle); the
    /// matched value's own type comes from `pattern_type`.
    TypePattern {
        operand: Box<BoundNode>,
        pattern_type: Type,
        location: Location,
    },
    /// `obj is { P: var x }`: binds each local to the corresponding
    /// property's `TypeWithNode`.
    PropertyPattern {
        operand: Box<BoundNode>,
        bindings: Vec<(SymbolId, SymbolId)>,
        location: Location,
    },
    SwitchExpression {
        scrutinee: Box<BoundNode>,
        arms: Vec<SwitchArm>,
        location: Location,
    },

    AnonymousObject {
        members: Vec<(SymbolId, BoundNode)>,
        location: Location,
    },

    Foreach {
        collection: Box<BoundNode>,
        /// `None` when the element type must be inferred structurally from
        /// the collection (array element type / `Current` property).
        explicit_element_type: Option<Type>,
        loop_variable: SymbolId,
        body: Box<BoundNode>,
        location: Location,
    },

    /// A local declared with `var`; the local's type is adopted wholesale
    /// from the initializer.
    VarLocalDeclaration {
        local: SymbolId,
        initializer: Box<BoundNode>,
        location: Location,
    },
    /// A local declared with an explicit syntactic type.
    TypedLocalDeclaration {
        local: SymbolId,
        declared_type: Type,
        initializer: Box<BoundNode>,
        location: Location,
    },

    Return {
        value: Option<Box<BoundNode>>,
        location: Location,
    },
    Block {
        statements: Vec<BoundNode>,
        location: Location,
    },
    If {
        condition: Box<BoundNode>,
        then_branch: Box<BoundNode>,
        else_branch: Option<Box<BoundNode>>,
        location: Location,
    },

    /// A bound-tree operation kind the builder has no handler for. A
    /// conforming binder should never need to emit this for a form the
    /// builder otherwise understands; it exists so the builder can fail
    /// loudly rather than silently under-constrain the graph.
    Unsupported {
        kind: &'static str,
        location: Location,
    },
}

impl BoundNode {
    pub fn location(&self) -> &Location {
        match self {
            BoundNode::NullLiteral { location }
            | BoundNode::NonNullReferenceLiteral { location, .. }
            | BoundNode::ValueLiteral { location, .. }
            | BoundNode::SymbolReference { location, .. }
            | BoundNode::ThisReference { location, .. }
            | BoundNode::ImplicitReceiver { location }
            | BoundNode::MemberAccess { location, .. }
            | BoundNode::Assignment { location, .. }
            | BoundNode::Call { location, .. }
            | BoundNode::IndexerAccess { location, .. }
            | BoundNode::ArrayElementAccess { location, .. }
            | BoundNode::ObjectCreation { location, .. }
            | BoundNode::Conversion { location, .. }
            | BoundNode::NullForgiving { location, .. }
            | BoundNode::Coalesce { location, .. }
            | BoundNode::Conditional { location, .. }
            | BoundNode::NullComparison { location, .. }
            | BoundNode::ThrowExpression { location, .. }
            | BoundNode::ArrayCreation { location, .. }
            | BoundNode::CollectionInitializerAdd { location, .. }
            | BoundNode::TupleLiteral { location, .. }
            | BoundNode::Deconstruction { location, .. }
            | BoundNode::Lambda { location, .. }
            | BoundNode::YieldReturn { location, .. }
            | BoundNode::Await { location, .. }
            | BoundNode::TypePattern { location, .. }
            | BoundNode::PropertyPattern { location, .. }
            | BoundNode::SwitchExpression { location, .. }
            | BoundNode::AnonymousObject { location, .. }
            | BoundNode::Foreach { location, .. }
            | BoundNode::VarLocalDeclaration { location, .. }
            | BoundNode::TypedLocalDeclaration { location, .. }
            | BoundNode::Return { location, .. }
            | BoundNode::Block { location, .. }
            | BoundNode::If { location, .. }
            | BoundNode::Unsupported { location, .. } => location,
        }
    }
}

/// The "dominator-based non-null flow predicate" the binder supplies: an
/// opaque oracle the operation visitor queries but never computes itself.
pub trait NonNullFlowOracle {
    /// Is the reference at `location` dominated by a proven non-null check?
    fn is_non_null_at(&self, location: &Location) -> bool;
}

/// An oracle that never reports a non-null-flow refinement; useful for
/// inputs that don't perform flow analysis upstream.
pub struct NoNonNullFlow;

impl NonNullFlowOracle for NoNonNullFlow {
    fn is_non_null_at(&self, _location: &Location) -> bool {
        false
    }
}
