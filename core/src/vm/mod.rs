//! file: core/src/vm/mod.rs
//! description: a small interpreter for lowered IR modules.
//!
//! The VM borrows a module and evaluates its functions directly, one frame
//! per call. Top-level expressions are run through it before their
//! anonymous function is erased.
//!
pub mod err;
mod exec;
mod host;
pub mod value;

pub use err::{VmError, VmErrorKind};
pub use value::Value;

use crate::ir::module::IrModule;

pub const DEFAULT_MAX_DEPTH: usize = 512;

pub struct VM<'m> {
    module: &'m IrModule,
    max_depth: usize,
}

impl<'m> VM<'m> {
    pub fn new(module: &'m IrModule) -> Self {
        VM {
            module,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn module(&self) -> &'m IrModule {
        self.module
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Calls `name` with `args` and returns its result. An empty `ret`
    /// yields 0.0.
    pub fn call(&self, name: &str, args: &[f64]) -> Result<f64, VmError> {
        log::debug!("[vm] call @{}({:?})", name, args);
        exec::call_function(self, name, args, 0)
    }
}
