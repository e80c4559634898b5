//! The concrete scenarios from the core test corpus, reproduced
//! verbatim against the synthetic harness.

use nullflow_harness::{check_paths, has_path_from_parameter_to_return_type};

#[test]
fn returning_the_parameter_verbatim_has_a_path() {
    assert!(has_path_from_parameter_to_return_type(
        "string Test(string input) => input;"
    ));
}

#[test]
fn returning_a_constant_literal_has_no_path() {
    assert!(!has_path_from_parameter_to_return_type(
        "string Test(string input) { return \"abc\"; }"
    ));
}

#[test]
fn early_return_on_null_narrows_the_later_reference() {
    assert!(!has_path_from_parameter_to_return_type(
        "string Test(string input) { if (input == null) return \"null\"; return input; }"
    ));
}

#[test]
fn coalesce_with_a_non_null_fallback_has_no_path() {
    assert!(!has_path_from_parameter_to_return_type(
        "string Test(string input) => input ?? \"abc\";"
    ));
}

#[test]
fn array_element_assignment_then_read_has_a_path() {
    assert!(has_path_from_parameter_to_return_type(
        "string Test(string input) { var arr = new string[1]; arr[0] = input; return arr[0]; }"
    ));
}

#[test]
fn unboxing_to_a_non_nullable_value_type_forces_non_null() {
    check_paths(
        "int Test(object input) => (int)input;",
        None,
        None,
        Some(true),
    );
}

#[test]
fn unboxing_to_a_nullable_value_type_does_not_force_non_null() {
    check_paths(
        "int? Test(object input) => (int?)input;",
        None,
        None,
        Some(false),
    );
}

#[test]
fn switch_expression_with_a_null_arm_reaches_both_nullable_and_the_parameter() {
    check_paths(
        "string Test(string input) => input switch { 0 => input, 1 => \"\", _ => null };",
        Some(true),
        Some(true),
        None,
    );
}
