//! String coercion, short-circuit laws, ternary, and compound-assignment
//! desugaring (spec §8 "Laws" and scenario 6).

use ember::value::Value;

#[test]
fn mixed_string_and_number_addition_stringifies_the_number() {
    let (diagnostics, interp) = ember::run_with_interpreter(r#"var result = "foo" + 4;"#);
    assert!(!diagnostics.has_errors(), "{diagnostics:?}");
    assert_eq!(interp.global("result"), Some(Value::Str("foo4".to_owned())));
}

#[test]
fn or_short_circuits_and_yields_the_deciding_operand() {
    let (diagnostics, interp) = ember::run_with_interpreter(
        "fun boom() { return 1 / 0; } var r = true or boom();",
    );
    assert!(!diagnostics.has_errors(), "{diagnostics:?}");
    assert_eq!(interp.global("r"), Some(Value::Bool(true)));
}

#[test]
fn and_short_circuits_and_yields_the_deciding_operand() {
    let (diagnostics, interp) = ember::run_with_interpreter(
        "fun boom() { return 1 / 0; } var r = false and boom();",
    );
    assert!(!diagnostics.has_errors(), "{diagnostics:?}");
    assert_eq!(interp.global("r"), Some(Value::Bool(false)));
}

#[test]
fn ternary_nests_right_associatively() {
    let (diagnostics, interp) = ember::run_with_interpreter("var r = false ? 1 : false ? 2 : 3;");
    assert!(!diagnostics.has_errors(), "{diagnostics:?}");
    assert_eq!(interp.global("r"), Some(Value::Integer(3)));
}

#[test]
fn compound_assignment_and_increment_desugar_correctly() {
    let (diagnostics, interp) = ember::run_with_interpreter("var x = 5; x += 3; x *= 2; x--;");
    assert!(!diagnostics.has_errors(), "{diagnostics:?}");
    assert_eq!(interp.global("x"), Some(Value::Integer(15)));
}
