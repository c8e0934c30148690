//! `break`/`continue` loop-control scenarios (spec §8, scenarios 4-5).

use ember::value::Value;

#[test]
fn break_stops_the_loop_at_a_equals_two() {
    let (diagnostics, interp) = ember::run_with_interpreter(
        "var a = 0; while (a < 10) { a = a + 1; if (a == 2) { break; } }",
    );
    assert!(!diagnostics.has_errors(), "{diagnostics:?}");
    assert_eq!(interp.global("a"), Some(Value::Integer(2)));
}

#[test]
fn continue_still_runs_the_for_increment() {
    let (diagnostics, interp) = ember::run_with_interpreter(
        "var b = 0; for (var a = 0; a < 3; a = a + 1) { if (a == 2) { continue; } b = b + a; }",
    );
    assert!(!diagnostics.has_errors(), "{diagnostics:?}");
    assert_eq!(interp.global("b"), Some(Value::Integer(1)));
}
