//! Static resolver pre-pass: computes lexical scope depth for every variable
//! reference before evaluation (spec §5). Grounded in the classic visitor
//! resolver at
//! `examples/other_examples/3085745f_martonmoro-lox-interpreter-rs__src-resolver.rs.rs`
//! (declare-then-define two-step, "own initializer" and "top-level return"
//! diagnostics), rebuilt here as a plain recursive walk over the tagged-sum
//! AST per spec's Design Notes, with depths keyed by `ExprId` rather than by
//! the AST node itself.

use std::collections::HashMap;
use std::fmt::{self, Display};

use log::warn;

use crate::ast::{Expr, ExprId, ExprKind, FunctionDecl, Stmt};
use crate::token::Token;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveError {
    pub message: String,
    pub line: usize,
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resolver error on line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ResolveError {}

/// Whether a local binding has been declared, defined, or read — tracked so
/// `var a = a;` can be rejected (spec §5 "own initializer" edge case).
#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Declared,
    Defined,
    Used,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FunctionKind {
    None,
    Function,
}

/// Side table mapping each variable-use `ExprId` to its lexical distance from
/// the innermost scope (spec §5, §9). Consumed by the evaluator's environment
/// walk instead of re-deriving scope depth at run time.
pub type Locals = HashMap<ExprId, usize>;

pub struct Resolver {
    scopes: Vec<HashMap<String, Status>>,
    locals: Locals,
    errors: Vec<ResolveError>,
    current_function: FunctionKind,
    loop_depth: usize,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            locals: HashMap::new(),
            errors: Vec::new(),
            current_function: FunctionKind::None,
            loop_depth: 0,
        }
    }

    pub fn resolve(mut self, statements: &[Stmt]) -> (Locals, Vec<ResolveError>) {
        self.resolve_stmts(statements);
        (self.locals, self.errors)
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            for (name, status) in scope {
                if status != Status::Used && name != "_" {
                    warn!("unused local variable '{name}'");
                }
            }
        }
    }

    fn declare(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(&name.lexeme) {
                self.errors.push(ResolveError {
                    message: format!(
                        "Already a variable named '{}' in this scope.",
                        name.lexeme
                    ),
                    line: name.line,
                });
            }
            scope.insert(name.lexeme.clone(), Status::Declared);
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), Status::Defined);
        }
    }

    fn resolve_stmts(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) | Stmt::ForIncrement(expr) | Stmt::Print(expr) => {
                self.resolve_expr(expr);
            }
            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(init) = initializer {
                    self.resolve_expr(init);
                }
                self.define(name);
            }
            Stmt::Block(stmts) => {
                self.begin_scope();
                self.resolve_stmts(stmts);
                self.end_scope();
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.loop_depth += 1;
                self.resolve_stmt(body);
                self.loop_depth -= 1;
            }
            Stmt::FunctionDecl(decl) => {
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionKind::Function);
            }
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionKind::None {
                    self.errors.push(ResolveError {
                        message: "Can't return from top-level code.".to_owned(),
                        line: keyword.line,
                    });
                }
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }
            Stmt::Break | Stmt::Continue => {
                // Parser already rejects loop-less break/continue (spec
                // §4.2/§4.3); nothing to resolve.
            }
        }
    }

    fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionKind) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &decl.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_stmts(&decl.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Literal(_) => {}
            ExprKind::Grouping(inner) => self.resolve_expr(inner),
            ExprKind::Unary { operand, .. } => self.resolve_expr(operand),
            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            ExprKind::Conditional {
                test,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(test);
                self.resolve_expr(then_branch);
                self.resolve_expr(else_branch);
            }
            ExprKind::Variable { name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme) == Some(&Status::Declared) {
                        self.errors.push(ResolveError {
                            message: "Can't read local variable in its own initializer."
                                .to_owned(),
                            line: name.line,
                        });
                    }
                }
                self.resolve_local(expr.id, &name.lexeme, true);
            }
            ExprKind::Assign { name, value } => {
                self.resolve_expr(value);
                self.resolve_local(expr.id, &name.lexeme, false);
            }
            ExprKind::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);
                for arg in arguments {
                    self.resolve_expr(arg);
                }
            }
        }
    }

    /// Walk outward from the innermost scope, recording the distance the
    /// first time `name` is found; an unfound name is left unresolved so the
    /// evaluator falls back to globals. `mark_used` is false for assignment
    /// targets, which resolve like a read but must not suppress an "unused
    /// local variable" warning for a name that is only ever written.
    fn resolve_local(&mut self, expr_id: ExprId, name: &str, mark_used: bool) {
        for (depth, scope) in self.scopes.iter_mut().rev().enumerate() {
            if let Some(status) = scope.get_mut(name) {
                if mark_used {
                    *status = Status::Used;
                }
                self.locals.insert(expr_id, depth);
                return;
            }
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

pub fn resolve(statements: &[Stmt]) -> (Locals, Vec<ResolveError>) {
    Resolver::new().resolve(statements)
}
