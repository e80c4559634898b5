//! The node/edge builder: walks a bound tree and produces the
//! [`nullflow_model::registry::PendingCommit`] that, once flushed, carries
//! its contribution to the flow graph.

pub mod bound_tree;
pub mod builder;
pub mod substitution;
pub mod syntax_visitor;
pub mod variance;
mod visitors;

pub use bound_tree::{Argument, BoundNode, ConversionKind, NoNonNullFlow, NonNullFlowOracle, SwitchArm};
pub use builder::{BuilderError, CancellationToken, MethodDeclaration, NullabilityBuilder};
pub use substitution::Substitution;
pub use syntax_visitor::{visit_type_syntax, SyntaxKey};
pub use variance::{create_type_edge, Variance};
pub use visitors::OperationVisitor;
