//! Tree-walking evaluator (spec §4.5). Grounded in the teacher's legacy
//! `interpreter/mod.rs` (`run_statement`/`run_expression`/
//! `run_binary_operation` match-based dispatch over a scope stack) and in
//! `examples/Brahmastra-Labs-logicaffeine/src/interpreter.rs`'s
//! `ControlFlow`-as-return-value technique for `break`/`continue`/`return`,
//! rebuilt over the reference-counted `Environment` chain and the resolver's
//! depth side table.

use std::rc::Rc;

use log::{debug, error};

use crate::ast::{Expr, ExprKind, FunctionDecl, LiteralValue, Stmt};
use crate::builtins;
use crate::environment::{Environment, RuntimeError};
use crate::resolver::Locals;
use crate::token::TokenKind;
use crate::value::{Callable, ControlFlow, Value};

pub struct Interpreter {
    globals: Environment,
    locals: Locals,
}

type EvalResult = Result<Value, RuntimeError>;
/// `Ok(Some(cf))` carries a non-local exit up through nested statements;
/// `Ok(None)` is ordinary fall-through completion (spec §4.5, §9).
type ExecResult = Result<Option<ControlFlow>, RuntimeError>;

impl Interpreter {
    pub fn new(locals: Locals) -> Self {
        let globals = Environment::new_global();
        builtins::install(&globals);
        Self { globals, locals }
    }

    /// Runs a top-level program. Per spec §5, at most one runtime error is
    /// reported: execution stops at the first statement that raises one.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in statements {
            match self.execute(stmt, &self.globals.clone()) {
                Ok(Some(ControlFlow::Return(_))) => {
                    debug!("top-level return ignored outside a function call");
                }
                Ok(_) => {}
                Err(err) => {
                    error!("{err}");
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Reads a top-level binding back out of the global environment. Useful
    /// for embedders that run a script then inspect its resulting state
    /// instead of relying solely on `print` output.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.get(name, 0).ok()
    }

    fn execute(&mut self, stmt: &Stmt, env: &Environment) -> ExecResult {
        log::trace!("executing {stmt:?}");
        match stmt {
            Stmt::Expression(expr) | Stmt::ForIncrement(expr) => {
                self.evaluate(expr, env)?;
                Ok(None)
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr, env)?;
                println!("{value}");
                Ok(None)
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(init) => self.evaluate(init, env)?,
                    None => Value::Nil,
                };
                env.define(name.lexeme.clone(), value);
                Ok(None)
            }
            Stmt::Block(statements) => {
                let inner = Environment::new_enclosed(env);
                self.execute_block(statements, &inner)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition, env)?.is_truthy() {
                    self.execute(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, env)
                } else {
                    Ok(None)
                }
            }
            Stmt::While { condition, body } => self.execute_while(condition, body, env),
            Stmt::FunctionDecl(decl) => {
                let callable = Value::Callable(Rc::new(Callable::UserFunction {
                    declaration: Rc::clone(decl),
                    closure: env.clone(),
                }));
                env.define(decl.name.lexeme.clone(), callable);
                Ok(None)
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };
                Ok(Some(ControlFlow::Return(value)))
            }
            Stmt::Break => Ok(Some(ControlFlow::Break)),
            Stmt::Continue => Ok(Some(ControlFlow::Continue)),
        }
    }

    /// Executes a block's statements in `env`, stopping early and
    /// propagating the first non-local signal or error (spec §4.5 "Block").
    ///
    /// Per spec §4.5 "Control flow": if a `continue` unwinds out of one of
    /// this block's own statements and this block's *own* last statement is
    /// a `ForIncrementStmt` (the shape the parser's `for`-desugaring
    /// produces), that increment runs here — in this block's environment,
    /// the same scope the resolver resolved it against — before the signal
    /// keeps propagating to the enclosing `while`.
    fn execute_block(&mut self, statements: &[Stmt], env: &Environment) -> ExecResult {
        for (i, stmt) in statements.iter().enumerate() {
            match self.execute(stmt, env)? {
                None => {}
                Some(ControlFlow::Continue) => {
                    if i + 1 < statements.len() {
                        if let Some(Stmt::ForIncrement(expr)) = statements.last() {
                            self.evaluate(expr, env)?;
                        }
                    }
                    return Ok(Some(ControlFlow::Continue));
                }
                Some(cf) => return Ok(Some(cf)),
            }
        }
        Ok(None)
    }

    /// Drives the {PreCond, RunBody, Advance} loop state machine (spec §4.5
    /// "State machine for loops"): the increment (when present) has already
    /// run by the time `continue` reaches here (see `execute_block`), so a
    /// `Continue` signal just means "go back to PreCond"; `break` exits
    /// immediately.
    fn execute_while(
        &mut self,
        condition: &Expr,
        body: &Stmt,
        env: &Environment,
    ) -> ExecResult {
        while self.evaluate(condition, env)?.is_truthy() {
            match self.execute(body, env)? {
                None | Some(ControlFlow::Continue) => {}
                Some(ControlFlow::Break) => break,
                Some(cf @ ControlFlow::Return(_)) => return Ok(Some(cf)),
            }
        }
        Ok(None)
    }

    fn evaluate(&mut self, expr: &Expr, env: &Environment) -> EvalResult {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(value_of_literal(lit)),
            ExprKind::Grouping(inner) => self.evaluate(inner, env),
            ExprKind::Unary { op, operand } => self.evaluate_unary(op, operand, env),
            ExprKind::Binary { left, op, right } => self.evaluate_binary(left, op, right, env),
            ExprKind::Logical { left, op, right } => self.evaluate_logical(left, op, right, env),
            ExprKind::Conditional {
                test,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(test, env)?.is_truthy() {
                    self.evaluate(then_branch, env)
                } else {
                    self.evaluate(else_branch, env)
                }
            }
            ExprKind::Variable { name } => self.lookup_variable(expr.id, &name.lexeme, name.line, env),
            ExprKind::Assign { name, value } => {
                let value = self.evaluate(value, env)?;
                match self.locals.get(&expr.id) {
                    Some(&depth) => env.assign_at(depth, &name.lexeme, value.clone(), name.line)?,
                    None => self.globals.assign(&name.lexeme, value.clone(), name.line)?,
                }
                Ok(value)
            }
            ExprKind::Call {
                callee,
                paren,
                arguments,
            } => self.evaluate_call(callee, paren.line, arguments, env),
        }
    }

    fn lookup_variable(&self, id: u32, name: &str, line: usize, env: &Environment) -> EvalResult {
        match self.locals.get(&id) {
            Some(&depth) => env.get_at(depth, name, line),
            None => self.globals.get(name, line),
        }
    }

    fn evaluate_unary(
        &mut self,
        op: &crate::token::Token,
        operand: &Expr,
        env: &Environment,
    ) -> EvalResult {
        let value = self.evaluate(operand, env)?;
        match op.kind {
            TokenKind::Minus => match value.as_f64() {
                Some(n) if value.is_integer() => Ok(Value::Integer(-(n as i64))),
                Some(n) => Ok(Value::Number(-n)),
                None => Err(RuntimeError {
                    message: "Operand must be a number.".to_owned(),
                    line: op.line,
                }),
            },
            TokenKind::Bang => Ok(Value::Bool(!value.is_truthy())),
            _ => unreachable!("parser only produces Minus/Bang unary operators"),
        }
    }

    fn evaluate_logical(
        &mut self,
        left: &Expr,
        op: &crate::token::Token,
        right: &Expr,
        env: &Environment,
    ) -> EvalResult {
        let left_val = self.evaluate(left, env)?;
        match op.kind {
            TokenKind::Or if left_val.is_truthy() => Ok(left_val),
            TokenKind::Or => self.evaluate(right, env),
            TokenKind::And if !left_val.is_truthy() => Ok(left_val),
            TokenKind::And => self.evaluate(right, env),
            _ => unreachable!("parser only produces And/Or logical operators"),
        }
    }

    fn evaluate_binary(
        &mut self,
        left: &Expr,
        op: &crate::token::Token,
        right: &Expr,
        env: &Environment,
    ) -> EvalResult {
        let left_val = self.evaluate(left, env)?;
        let right_val = self.evaluate(right, env)?;
        let line = op.line;

        use TokenKind::*;
        match op.kind {
            Plus | PlusEqual | PlusPlus => add(&left_val, &right_val, line),
            Minus | MinusEqual | MinusMinus => {
                numeric_op(&left_val, &right_val, line, |a, b| a - b, |a, b| a - b)
            }
            Star | StarEqual => numeric_op(&left_val, &right_val, line, |a, b| a * b, |a, b| a * b),
            Slash | SlashEqual => divide(&left_val, &right_val, line),
            Greater => compare(&left_val, &right_val, line, |a, b| a > b),
            GreaterEqual => compare(&left_val, &right_val, line, |a, b| a >= b),
            Less => compare(&left_val, &right_val, line, |a, b| a < b),
            LessEqual => compare(&left_val, &right_val, line, |a, b| a <= b),
            EqualEqual => numeric_equals(&left_val, &right_val, line).map(Value::Bool),
            BangEqual => numeric_equals(&left_val, &right_val, line).map(|eq| Value::Bool(!eq)),
            _ => unreachable!("parser only produces arithmetic/comparison/equality binary ops"),
        }
    }

    fn evaluate_call(
        &mut self,
        callee: &Expr,
        line: usize,
        arguments: &[Expr],
        env: &Environment,
    ) -> EvalResult {
        let callee_val = self.evaluate(callee, env)?;

        let Value::Callable(callable) = callee_val else {
            return Err(RuntimeError {
                message: "Can only call functions and classes.".to_owned(),
                line,
            });
        };

        let mut args = Vec::with_capacity(arguments.len());
        for arg in arguments {
            args.push(self.evaluate(arg, env)?);
        }

        if args.len() != callable.arity() {
            return Err(RuntimeError {
                message: format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    args.len()
                ),
                line,
            });
        }

        match callable.as_ref() {
            Callable::Builtin { func, .. } => Ok(func(&args)),
            Callable::UserFunction {
                declaration,
                closure,
            } => self.call_user_function(declaration, closure, &args),
        }
    }

    fn call_user_function(
        &mut self,
        declaration: &Rc<FunctionDecl>,
        closure: &Environment,
        args: &[Value],
    ) -> EvalResult {
        let call_env = Environment::new_enclosed(closure);
        for (param, arg) in declaration.params.iter().zip(args) {
            call_env.define(param.lexeme.clone(), arg.clone());
        }

        match self.execute_block(&declaration.body, &call_env)? {
            Some(ControlFlow::Return(value)) => Ok(value),
            _ => Ok(Value::Nil),
        }
    }
}

fn value_of_literal(lit: &LiteralValue) -> Value {
    match lit {
        LiteralValue::Number(n) => Value::Number(*n),
        LiteralValue::Integer(n) => Value::Integer(*n),
        LiteralValue::Str(s) => Value::Str(s.clone()),
        LiteralValue::Bool(b) => Value::Bool(*b),
        LiteralValue::Nil => Value::Nil,
    }
}

/// `+`: numeric addition, or string concatenation when either side is a
/// string (the other side is rendered via its default `Display`) (spec §4.5).
fn add(left: &Value, right: &Value, line: usize) -> EvalResult {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
        (a, b) if a.is_numeric() && b.is_numeric() => {
            Ok(Value::Number(a.as_f64().unwrap() + b.as_f64().unwrap()))
        }
        (Value::Str(_), b) if matches!(b, Value::Str(_) | Value::Number(_) | Value::Integer(_)) => {
            Ok(Value::Str(format!("{left}{right}")))
        }
        (a, Value::Str(_)) if matches!(a, Value::Number(_) | Value::Integer(_)) => {
            Ok(Value::Str(format!("{left}{right}")))
        }
        _ => Err(RuntimeError {
            message: "Operands must be two numbers or a string and a string-or-number.".to_owned(),
            line,
        }),
    }
}

fn numeric_op(
    left: &Value,
    right: &Value,
    line: usize,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> EvalResult {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(int_op(*a, *b))),
        (a, b) if a.is_numeric() && b.is_numeric() => {
            Ok(Value::Number(float_op(a.as_f64().unwrap(), b.as_f64().unwrap())))
        }
        _ => Err(RuntimeError {
            message: "Operands must be numbers.".to_owned(),
            line,
        }),
    }
}

/// `/`: floor division when both operands are integers, float division
/// otherwise; divide-by-zero is a runtime error regardless (spec §4.5).
fn divide(left: &Value, right: &Value, line: usize) -> EvalResult {
    if !left.is_numeric() || !right.is_numeric() {
        return Err(RuntimeError {
            message: "Operands must be numbers.".to_owned(),
            line,
        });
    }
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            if *b == 0 {
                return Err(RuntimeError {
                    message: "Divide by zero.".to_owned(),
                    line,
                });
            }
            Ok(Value::Integer(floor_div(*a, *b)))
        }
        (a, b) => {
            let bf = b.as_f64().unwrap();
            if bf == 0.0 {
                return Err(RuntimeError {
                    message: "Divide by zero.".to_owned(),
                    line,
                });
            }
            Ok(Value::Number(a.as_f64().unwrap() / bf))
        }
    }
}

/// Rounds toward negative infinity, matching Python's `//` (the operator
/// `original_source/lox.py` uses), unlike `i64::div_euclid`'s remainder-sign
/// convention, which only agrees with floor division when the divisor is
/// positive.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn compare(left: &Value, right: &Value, line: usize, cmp: fn(f64, f64) -> bool) -> EvalResult {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => Ok(Value::Bool(cmp(a, b))),
        _ => Err(RuntimeError {
            message: "Operands must be numbers.".to_owned(),
            line,
        }),
    }
}

/// `==`/`!=` are numeric-only (spec §4.5, confirmed by `original_source/`'s
/// `check_numbers` gate on these operators): a mismatched or non-numeric pair
/// is a runtime error rather than silently comparing `false`.
fn numeric_equals(left: &Value, right: &Value, line: usize) -> Result<bool, RuntimeError> {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => Ok(a == b),
        _ => Err(RuntimeError {
            message: "Operands must be numbers.".to_owned(),
            line,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;
    use crate::resolver::resolve;

    fn run(src: &str) -> Result<(), RuntimeError> {
        let out = lex(src);
        let (stmts, parse_errors) = parse(out.tokens);
        assert!(parse_errors.is_empty(), "parse errors: {parse_errors:?}");
        let (locals, resolve_errors) = resolve(&stmts);
        assert!(resolve_errors.is_empty(), "resolve errors: {resolve_errors:?}");
        Interpreter::new(locals).interpret(&stmts)
    }

    #[test]
    fn integer_division_floors() {
        assert!(run("print 7 / 2;").is_ok());
    }

    #[test]
    fn integer_division_floors_toward_negative_infinity() {
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(7, -2), -4);
        assert_eq!(floor_div(-7, -2), 3);
    }

    #[test]
    fn divide_by_zero_is_a_runtime_error() {
        let err = run("print 1 / 0;").unwrap_err();
        assert!(err.message.contains("Divide by zero"));
    }

    #[test]
    fn string_concatenation_coerces_numbers() {
        assert!(run(r#"print "n=" + 1;"#).is_ok());
    }

    #[test]
    fn mixed_type_equality_is_a_runtime_error() {
        let err = run(r#"print 1 == "1";"#).unwrap_err();
        assert!(err.message.contains("Operands must be numbers"));
    }

    #[test]
    fn recursive_fibonacci() {
        assert!(run(
            "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } print fib(10);"
        )
        .is_ok());
    }

    #[test]
    fn closure_counter_increments_across_calls() {
        assert!(run(
            "fun make_counter() { var i = 0; fun inc() { i = i + 1; return i; } return inc; } \
             var c = make_counter(); print c(); print c();"
        )
        .is_ok());
    }

    #[test]
    fn break_exits_loop_immediately() {
        assert!(run("var a = 0; while (true) { a = a + 1; if (a == 2) break; } print a;").is_ok());
    }

    #[test]
    fn continue_still_runs_for_increment() {
        assert!(run(
            "var sum = 0; for (var i = 0; i < 5; i = i + 1) { if (i == 2) continue; sum = sum + i; } print sum;"
        )
        .is_ok());
    }

    #[test]
    fn calling_a_non_callable_is_a_runtime_error() {
        let err = run("var a = 1; a();").unwrap_err();
        assert!(err.message.contains("Can only call functions and classes"));
    }

    #[test]
    fn callee_check_precedes_argument_evaluation() {
        let err = run("var a = 1; a(1 / 0);").unwrap_err();
        assert!(err.message.contains("Can only call functions and classes"));
    }

    #[test]
    fn arity_mismatch_is_a_runtime_error() {
        let err = run("fun f(a) { return a; } f();").unwrap_err();
        assert!(err.message.contains("Expected 1 arguments"));
    }
}
