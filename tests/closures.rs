//! Closure-capture scenario (spec §8, scenario 3, and the closures invariant).

use ember::value::Value;

#[test]
fn counter_closure_shares_captured_state_across_calls() {
    let (diagnostics, interp) = ember::run_with_interpreter(
        "fun counter() { var i = 0; fun inc() { i = i + 1; return i; } return inc; } \
         var c = counter(); c(); c(); var third = c();",
    );
    assert!(!diagnostics.has_errors(), "{diagnostics:?}");
    assert_eq!(interp.global("third"), Some(Value::Integer(3)));
}

#[test]
fn two_independent_counters_do_not_share_state() {
    let (diagnostics, interp) = ember::run_with_interpreter(
        "fun counter() { var i = 0; fun inc() { i = i + 1; return i; } return inc; } \
         var c1 = counter(); var c2 = counter(); c1(); c1(); var r1 = c1(); var r2 = c2();",
    );
    assert!(!diagnostics.has_errors(), "{diagnostics:?}");
    assert_eq!(interp.global("r1"), Some(Value::Integer(3)));
    assert_eq!(interp.global("r2"), Some(Value::Integer(1)));
}
