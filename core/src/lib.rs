pub mod ast;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod location;
pub mod parser;
pub mod reports;
pub mod script;
pub mod session;
pub mod vm;

pub use ast::generate_ast_from_source;
pub use error::{Level, PolyErrorExt};
pub use ir::{IrModule, lower_program};
pub use location::{LineLocation, Location};
pub use reports::Report;
pub use script::Script;
pub use session::{Execution, Outcome, Session, SessionOptions};
pub use vm::VM;

/// Scans, parses and lowers a whole script into a fresh module named after
/// it, without evaluating anything.
pub fn compile_source_to_ir(script: &Script) -> Result<IrModule, Box<dyn PolyErrorExt>> {
    let stmts = ast::generate_ast_from_source(script)?;
    lower_program(&script.name, &stmts).map_err(error::boxed)
}
