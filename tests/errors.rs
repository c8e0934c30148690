//! Parser and runtime error scenarios (spec §8, scenarios 7-8) and the
//! arity-mismatch law.

#[test]
fn bang_equal_alone_is_a_missing_left_hand_operand_parse_error() {
    let diagnostics = ember::run("!=");
    assert_eq!(diagnostics.parse_errors.len(), 1);
    assert!(diagnostics.parse_errors[0]
        .message
        .contains("Missing left-hand operand"));
}

#[test]
fn calling_a_non_function_value_is_a_runtime_error() {
    let diagnostics = ember::run("var a = 1; a();");
    let err = diagnostics
        .runtime_error
        .expect("expected a runtime error");
    assert!(err.message.contains("Can only call functions and classes"));
}

#[test]
fn arity_mismatch_is_a_runtime_error_for_any_wrong_count() {
    let too_few = ember::run("fun f(a, b) { return a + b; } f(1);");
    assert!(too_few.runtime_error.unwrap().message.contains("Expected 2 arguments"));

    let too_many = ember::run("fun f(a, b) { return a + b; } f(1, 2, 3);");
    assert!(too_many.runtime_error.unwrap().message.contains("Expected 2 arguments"));
}

#[test]
fn divide_by_zero_is_a_runtime_error() {
    let diagnostics = ember::run("print 1 / 0;");
    assert!(diagnostics
        .runtime_error
        .unwrap()
        .message
        .contains("Divide by zero"));
}
