//! Abstract tree produced by the parser and consumed by the resolver and
//! evaluator (spec §3). One file per node family, following the teacher's
//! `ast/` directory-of-small-files convention.

pub mod expr;
pub mod stmt;

pub use expr::{Expr, ExprId, ExprKind, LiteralValue};
pub use stmt::{FunctionDecl, Stmt};
