//! Recursive and iterative Fibonacci scenarios (spec §8, scenarios 1-2).

use ember::value::Value;

#[test]
fn ten_thousand_capped_iterative_fibonacci() {
    let (diagnostics, interp) = ember::run_with_interpreter(
        "var a = 0; for (var i = 1; i <= 10000; i = i + 1) { var t = a; a = i; i = t + i; }",
    );
    assert!(!diagnostics.has_errors(), "{diagnostics:?}");
    assert_eq!(interp.global("a"), Some(Value::Integer(6765)));
}

#[test]
fn recursive_fib_of_ten_is_fifty_five() {
    let (diagnostics, interp) = ember::run_with_interpreter(
        "fun fib(n) { if (n <= 1) return n; return fib(n - 2) + fib(n - 1); } var f = fib(10);",
    );
    assert!(!diagnostics.has_errors(), "{diagnostics:?}");
    assert_eq!(interp.global("f"), Some(Value::Integer(55)));
}
