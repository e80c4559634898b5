//! The top-level two-pass builder: for one method body, first binds the
//! declared syntax (parameters, return type) into the registry's pending
//! queue, then walks the bound tree to produce the rest of the edges,
//! handing back a single [`PendingCommit`] the caller flushes.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::bound_tree::{BoundNode, NonNullFlowOracle};
use crate::syntax_visitor;
use crate::visitors::OperationVisitor;
use nullflow_model::registry::PendingCommit;
use nullflow_model::{Annotation, Registry, SymbolId, Type};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug_span;

/// A cooperative cancellation flag: the builder checks it between the
/// syntax pass and the operation pass, and a caller driving many methods
/// across threads can set it once to stop further work from starting.
/// Mid-traversal cancellation isn't checked -- a single method body is
/// assumed small enough that cancelling mid-walk buys nothing.
#[derive(Default)]
pub struct CancellationToken {
    cancelled: AtomicBool,
}

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub enum BuilderError {
    Cancelled,
    UnresolvedSymbol(SymbolId),
}

impl fmt::Display for BuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderError::Cancelled => write!(f, "build cancelled"),
            BuilderError::UnresolvedSymbol(id) => {
                write!(f, "parameter symbol {id:?} was never registered in the symbol table")
            }
        }
    }
}

impl std::error::Error for BuilderError {}

/// One method body's declared shape: the symbol-table facts a binder would
/// have already produced, plus the bound tree for its body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub parameters: Vec<SymbolId>,
    pub return_type: Type,
    pub return_annotation: Annotation,
    pub body: BoundNode,
}

pub struct NullabilityBuilder<'a> {
    oracle: &'a dyn NonNullFlowOracle,
}

impl<'a> NullabilityBuilder<'a> {
    pub fn new(oracle: &'a dyn NonNullFlowOracle) -> Self {
        NullabilityBuilder { oracle }
    }

    /// Build one method's `PendingCommit`. Node allocation happens eagerly
    /// against `registry`'s graph (append-only, so safe for a caller
    /// building several methods before flushing any of them); the edges and
    /// symbol-type entries this method produces stay invisible until the
    /// caller flushes the returned commit.
    pub fn build_method(
        &self,
        registry: &mut Registry,
        tree_path: &str,
        method: &MethodDeclaration,
        cancellation: &CancellationToken,
    ) -> Result<PendingCommit, BuilderError> {
        let _span = debug_span!("build_method", tree = %tree_path).entered();

        if cancellation.is_cancelled() {
            return Err(BuilderError::Cancelled);
        }

        let mut pending = PendingCommit::new(tree_path);
        let mut locals = FxHashMap::default();

        for (ordinal, &param) in method.parameters.iter().enumerate() {
            let info = registry
                .symbols()
                .get(param)
                .cloned()
                .ok_or(BuilderError::UnresolvedSymbol(param))?;
            let twn = syntax_visitor::visit_type_syntax(
                registry,
                &mut pending,
                ordinal as u32,
                &info.declared_type,
                info.annotation,
            );
            pending.add_symbol_type(param, twn.clone());
            locals.insert(param, twn);
        }

        let return_key = method.parameters.len() as u32;
        let return_twn = syntax_visitor::visit_type_syntax(
            registry,
            &mut pending,
            return_key,
            &method.return_type,
            method.return_annotation,
        );

        if cancellation.is_cancelled() {
            return Err(BuilderError::Cancelled);
        }

        let mut visitor = OperationVisitor::new(registry, &mut pending, self.oracle).with_locals(locals);
        visitor.current_return_type = Some(return_twn);
        visitor.visit(&method.body);

        Ok(pending)
    }
}
