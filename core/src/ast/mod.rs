//! file: core/src/ast/mod.rs
//! description: abstract syntax tree for poly source.
//!
//! Expressions and statements are owned trees: every child is held by
//! exactly one parent through `Box` or `Vec`, and names borrow from the
//! source text the tree was parsed from.
//!
pub mod expr;
pub mod kind;
pub mod stmt;

pub use expr::{Expr, ExprKind};
pub use kind::AstKind;
pub use stmt::{
    ANON_EXPR_NAME, Block, ExpressionStmt, Function, IfStmt, Prototype, Return, Stmt,
};

use crate::error::{PolyErrorExt, boxed};
use crate::lexer;
use crate::parser::Parser;
use crate::script::Script;

/// Scans and parses a whole script. Lexical errors come first: when any are
/// present the first one is returned and the tokens are not parsed.
pub fn generate_ast_from_source(script: &Script) -> Result<Vec<Stmt<'_>>, Box<dyn PolyErrorExt>> {
    let scanned = lexer::scan(&script.content);
    if let Some(err) = scanned.errors.into_iter().next() {
        return Err(boxed(err));
    }
    Parser::new(scanned.tokens)
        .parse()
        .map_err(boxed)
}
