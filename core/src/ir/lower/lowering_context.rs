//! file: core/src/ir/lower/lowering_context.rs
//! description: name environment shared by the lowering functions.
//!
//! The context lives as long as the module it lowers into, but its name
//! map only ever describes the function currently being built: it is reset
//! at the start of every body and seeded from that function's parameters.

use std::collections::HashMap;

use crate::ir::value::Operand;

#[derive(Debug, Clone, Default)]
pub struct LoweringContext {
    named_values: HashMap<String, Operand>,
    current_function: Option<String>,
}

impl LoweringContext {
    pub fn new() -> Self {
        LoweringContext::default()
    }

    /// Starts a new function scope, forgetting every previous binding.
    pub fn reset(&mut self, function: &str) {
        self.named_values.clear();
        self.current_function = Some(function.to_string());
    }

    pub fn bind(&mut self, name: &str, value: Operand) {
        self.named_values.insert(name.to_string(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<Operand> {
        self.named_values.get(name).copied()
    }

    pub fn current_function(&self) -> Option<&str> {
        self.current_function.as_deref()
    }

    /// Leaves the current function scope.
    pub fn clear(&mut self) {
        self.named_values.clear();
        self.current_function = None;
    }
}
