//! The universally-quantified properties, each checked against one
//! representative snippet through the synthetic harness.

use nullflow_harness::{check_paths, has_path_from_parameter_to_return_type};

#[test]
fn chained_var_locals_propagate_the_parameter_transitively() {
    assert!(has_path_from_parameter_to_return_type(
        "string Test(string input) { var a = input; var b = a; return b; }"
    ));
}

#[test]
fn coalesce_result_is_never_nullable_when_the_fallback_is_a_literal() {
    check_paths(
        "string Test(string input) => input ?? \"abc\";",
        Some(false),
        Some(false),
        None,
    );
}

#[test]
fn a_method_returning_only_null_is_forced_nullable_at_the_return() {
    check_paths(
        "string Test(string input) { return null; }",
        Some(true),
        Some(false),
        None,
    );
}

#[test]
fn the_ternary_operator_unions_both_branches() {
    check_paths(
        "string Test(string input) => input == null ? null : input;",
        Some(true),
        Some(true),
        None,
    );
}
