//! file: core/src/session.rs
//! description: the driver core shared by file mode and the REPL.
//!
//! A `Session` owns one `IrModule` for its whole lifetime and feeds it one
//! chunk of source at a time. Each chunk is scanned, parsed as a whole and
//! then lowered statement by statement.
//!
use serde::Serialize;

use crate::ast::{ANON_EXPR_NAME, Stmt};
use crate::error::{PolyErrorExt, boxed};
use crate::ir::lower::{LoweringContext, lower_stmt};
use crate::ir::module::IrModule;
use crate::lexer;
use crate::parser::Parser;
use crate::script::Script;
use crate::vm::VM;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Continue with the next statement after a lowering or evaluation
    /// error instead of abandoning the rest of the chunk.
    pub keep_going: bool,
    /// Run top-level expressions through the VM.
    pub evaluate: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            keep_going: false,
            evaluate: true,
        }
    }
}

/// What a successfully lowered top-level statement produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    Declared { name: String, ir: String },
    Defined { name: String, ir: String },
    /// A top-level expression. `value` is `None` when evaluation is off.
    Evaluated { ir: String, value: Option<f64> },
}

impl Outcome {
    pub fn ir(&self) -> &str {
        match self {
            Outcome::Declared { ir, .. } | Outcome::Defined { ir, .. } | Outcome::Evaluated { ir, .. } => ir,
        }
    }
}

/// Result of running one chunk: the statements that went through and every
/// diagnostic raised along the way.
#[derive(Debug, Default)]
pub struct Execution {
    pub outcomes: Vec<Outcome>,
    pub errors: Vec<Box<dyn PolyErrorExt>>,
}

impl Execution {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Evaluated values in statement order.
    pub fn values(&self) -> Vec<f64> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                Outcome::Evaluated { value, .. } => *value,
                _ => None,
            })
            .collect()
    }
}

pub struct Session {
    module: IrModule,
    ctx: LoweringContext,
    options: SessionOptions,
}

impl Session {
    pub fn new(module_name: &str, options: SessionOptions) -> Self {
        Session {
            module: IrModule::new(module_name),
            ctx: LoweringContext::new(),
            options,
        }
    }

    pub fn module(&self) -> &IrModule {
        &self.module
    }

    /// Runs one chunk of source. Lexical errors are all reported and stop
    /// the chunk before parsing; a parse error stops it before anything is
    /// lowered.
    pub fn execute(&mut self, script: &Script) -> Execution {
        let mut execution = Execution::default();

        let scanned = lexer::scan(&script.content);
        if scanned.has_errors() {
            log::debug!("[session] {} lexical error(s) in {}", scanned.errors.len(), script.name);
            execution.errors.extend(scanned.errors.into_iter().map(boxed));
            return execution;
        }

        let stmts = match Parser::new(scanned.tokens).parse() {
            Ok(stmts) => stmts,
            Err(err) => {
                execution.errors.push(boxed(err));
                return execution;
            }
        };

        for stmt in &stmts {
            match self.run_stmt(stmt) {
                Ok(outcome) => execution.outcomes.push(outcome),
                Err(err) => {
                    execution.errors.push(err);
                    if !self.options.keep_going {
                        break;
                    }
                }
            }
        }
        execution
    }

    fn run_stmt(&mut self, stmt: &Stmt<'_>) -> Result<Outcome, Box<dyn PolyErrorExt>> {
        let name = lower_stmt(stmt, &mut self.module, &mut self.ctx).map_err(boxed)?;
        let ir = self
            .module
            .get_function(&name)
            .map(|f| f.to_string())
            .unwrap_or_default();

        match stmt {
            Stmt::Prototype(_) => {
                log::debug!("[session] declared @{}", name);
                Ok(Outcome::Declared { name, ir })
            }
            Stmt::Expression(_) if name == ANON_EXPR_NAME => {
                let value = if self.options.evaluate {
                    let result = VM::new(&self.module).call(&name, &[]);
                    self.module.erase_function(&name);
                    Some(result.map_err(boxed)?)
                } else {
                    self.module.erase_function(&name);
                    None
                };
                log::debug!("[session] evaluated top-level expression: {:?}", value);
                Ok(Outcome::Evaluated { ir, value })
            }
            _ => {
                log::debug!("[session] defined @{}", name);
                Ok(Outcome::Defined { name, ir })
            }
        }
    }
}
