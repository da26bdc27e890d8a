//! file: core/src/ast/kind.rs
//! description: kind tags for AST nodes.
//!
//! Every node reports an `AstKind`. Narrowing helpers on `Expr` and `Stmt`
//! return `Option`, so asking for the wrong kind is visible at the call site
//! instead of being an unchecked cast.
//!
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AstKind {
    NumberExpr,
    VariableExpr,
    BinaryExpr,
    CallExpr,

    PrototypeStmt,
    FunctionStmt,
    BlockStmt,
    ReturnStmt,
    ExpressionStmt,
    IfStmt,
}

impl std::fmt::Display for AstKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AstKind::NumberExpr => "number expression",
            AstKind::VariableExpr => "variable expression",
            AstKind::BinaryExpr => "binary expression",
            AstKind::CallExpr => "call expression",
            AstKind::PrototypeStmt => "prototype",
            AstKind::FunctionStmt => "function definition",
            AstKind::BlockStmt => "block",
            AstKind::ReturnStmt => "return statement",
            AstKind::ExpressionStmt => "expression statement",
            AstKind::IfStmt => "if statement",
        };
        write!(f, "{}", s)
    }
}
