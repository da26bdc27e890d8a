//! file: core/src/ir/lower/mod.rs
//! description: AST -> IR lowering.
//!
//! One free function per AST family, with the module and the name
//! environment threaded through explicitly. `lower_stmt` is the entry point
//! for top-level statements; everything below it writes into a
//! `FunctionBuilder`.
//!
pub mod err;
pub mod function_builder;
pub mod lower_expr;
pub mod lower_stmt;
pub mod lowering_context;

pub use err::{LoweringError, LoweringErrorKind};
pub use function_builder::FunctionBuilder;
pub use lower_expr::lower_expr;
pub use lower_stmt::{lower_block, lower_body_stmt, lower_prototype, lower_stmt};
pub use lowering_context::LoweringContext;

use crate::ast::{ANON_EXPR_NAME, Stmt};
use super::module::IrModule;

/// Lowers every statement into a fresh module named `name`, stopping at the
/// first failure. Top-level expressions are checked like any other function
/// and then dropped, so the module only keeps named functions.
pub fn lower_program(name: &str, stmts: &[Stmt<'_>]) -> Result<IrModule, LoweringError> {
    let mut ir_mod = IrModule::new(name);
    let mut ctx = LoweringContext::new();
    for stmt in stmts {
        let lowered = lower_stmt(stmt, &mut ir_mod, &mut ctx)?;
        if lowered == ANON_EXPR_NAME {
            ir_mod.erase_function(&lowered);
        }
    }
    Ok(ir_mod)
}
