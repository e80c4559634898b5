//! The test-harness API: compiles a snippet through [`crate::mini_lang`]
//! and answers reachability queries against the resulting graph, on top
//! of [`nullflow_graph::solver::PathQuery`].

use crate::mini_lang::{self, ParseError};
use nullflow_graph::solver::PathQuery;
use nullflow_graph::{NON_NULL, NULLABLE};

/// Compiles `code` (one method declaration) and asks whether any node of
/// its sole parameter has a directed path to the method's return-type node.
pub fn has_path_from_parameter_to_return_type(code: &str) -> bool {
    let compiled = mini_lang::compile(code).expect("snippet failed to parse");
    let (registry, param_node, return_node) = mini_lang::build(&compiled);
    PathQuery::new(registry.graph()).has_path(param_node, return_node)
}

/// The three reachability facts [`check_paths`] can assert about one
/// compiled snippet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathFacts {
    /// Is *Nullable* reachable to the method's return-type node?
    pub return_nullable: bool,
    /// Is the sole parameter reachable to the return-type node?
    pub return_depends_on_input: bool,
    /// Is the sole parameter reachable to *NonNull*?
    pub input_must_be_non_null: bool,
}

/// Compiles `code` and computes all three [`PathFacts`], without asserting
/// anything; callers that just want the raw facts (rather than the
/// assert-style `check_paths`) can use this directly.
pub fn path_facts(code: &str) -> PathFacts {
    let compiled = mini_lang::compile(code).expect("snippet failed to parse");
    let (registry, param_node, return_node) = mini_lang::build(&compiled);
    let query = PathQuery::new(registry.graph());
    PathFacts {
        return_nullable: query.has_path(NULLABLE, return_node),
        return_depends_on_input: query.has_path(param_node, return_node),
        input_must_be_non_null: query.has_path(param_node, NON_NULL),
    }
}

/// Compiles `code` and asserts each `Some` expectation against the
/// resulting [`PathFacts`]; a `None` expectation is not checked. Panics
/// with the mismatching fact named on failure.
pub fn check_paths(
    code: &str,
    return_nullable: Option<bool>,
    return_depends_on_input: Option<bool>,
    input_must_be_non_null: Option<bool>,
) -> PathFacts {
    let facts = path_facts(code);
    if let Some(expected) = return_nullable {
        assert_eq!(
            facts.return_nullable, expected,
            "return_nullable mismatch for {code:?}"
        );
    }
    if let Some(expected) = return_depends_on_input {
        assert_eq!(
            facts.return_depends_on_input, expected,
            "return_depends_on_input mismatch for {code:?}"
        );
    }
    if let Some(expected) = input_must_be_non_null {
        assert_eq!(
            facts.input_must_be_non_null, expected,
            "input_must_be_non_null mismatch for {code:?}"
        );
    }
    facts
}

/// Re-exported so callers that only need to detect a malformed snippet
/// don't have to reach into [`mini_lang`] directly.
pub type CompileError = ParseError;
