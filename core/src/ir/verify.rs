//! file: core/src/ir/verify.rs
//! description: structural checks for finished function bodies.
//!
//! A body is well formed when every block ends in exactly one terminator,
//! every branch targets an existing block, every register is written once
//! and read with the type its op expects, and every call names a declared
//! function with a matching argument count.
//!
use std::collections::HashSet;

use super::module::{IrFunction, IrModule, operand_type};
use super::op::IROp;
use super::value::{Operand, ValueType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyError {
    pub function: String,
    pub message: String,
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid function @{}: {}", self.function, self.message)
    }
}

impl std::error::Error for VerifyError {}

pub fn verify_function(module: &IrModule, func: &IrFunction) -> Result<(), VerifyError> {
    let fail = |message: String| VerifyError {
        function: func.name.clone(),
        message,
    };

    let body = match &func.body {
        Some(body) => body,
        // declarations carry nothing to check
        None => return Ok(()),
    };

    if body.blocks.is_empty() {
        return Err(fail("function body has no blocks".to_string()));
    }

    let expect = |operand: &Operand, ty: ValueType, what: &str| -> Result<(), VerifyError> {
        match operand_type(func, operand) {
            Some(found) if found == ty => Ok(()),
            Some(found) => Err(fail(format!("{} expects {} operand, found {}", what, ty, found))),
            None => Err(fail(format!("{} reads undefined operand {:?}", what, operand))),
        }
    };

    let mut written = HashSet::new();
    for block in &body.blocks {
        let Some(last) = block.ops.last() else {
            return Err(fail(format!("block '{}' is empty", block.label)));
        };
        if !last.is_terminator() {
            return Err(fail(format!("block '{}' does not end in a terminator", block.label)));
        }
        if block.ops[..block.ops.len() - 1].iter().any(|op| op.is_terminator()) {
            return Err(fail(format!("block '{}' has a terminator before its end", block.label)));
        }

        for op in &block.ops {
            if let Some(dest) = op.dest() {
                if dest >= body.registers.len() {
                    return Err(fail(format!("op writes unknown register r{}", dest)));
                }
                if !written.insert(dest) {
                    return Err(fail(format!("register %{} is written twice", body.registers[dest].name)));
                }
            }

            for target in op.successors() {
                if target >= body.blocks.len() {
                    return Err(fail(format!("branch to unknown block {}", target)));
                }
            }

            match op {
                IROp::FAdd { lhs, rhs, .. }
                | IROp::FSub { lhs, rhs, .. }
                | IROp::FMul { lhs, rhs, .. }
                | IROp::FDiv { lhs, rhs, .. }
                | IROp::FCmp { lhs, rhs, .. } => {
                    expect(lhs, ValueType::F64, "arithmetic")?;
                    expect(rhs, ValueType::F64, "arithmetic")?;
                }
                IROp::UiToFp { src, .. } => expect(src, ValueType::Bool, "uitofp")?,
                IROp::CondBr { cond, .. } => expect(cond, ValueType::Bool, "conditional branch")?,
                IROp::Ret { value: Some(v) } => expect(v, ValueType::F64, "ret")?,
                IROp::Ret { value: None } | IROp::Br { .. } => {}
                IROp::Call { callee, args, .. } => {
                    let target = module
                        .get_function(callee)
                        .ok_or_else(|| fail(format!("call to undeclared function @{}", callee)))?;
                    if target.arity() != args.len() {
                        return Err(fail(format!(
                            "call to @{} passes {} arguments, expected {}",
                            callee,
                            args.len(),
                            target.arity()
                        )));
                    }
                    for arg in args {
                        expect(arg, ValueType::F64, "call argument")?;
                    }
                }
            }
        }
    }

    // every register read must be written somewhere in the body
    for block in &body.blocks {
        for op in &block.ops {
            for operand in op.operands() {
                if let Operand::Reg(r) = operand {
                    if !written.contains(&r) {
                        return Err(fail(format!("register r{} is read but never written", r)));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Verifies every defined function of the module.
pub fn verify_module(module: &IrModule) -> Result<(), VerifyError> {
    for func in module.functions() {
        verify_function(module, func)?;
    }
    Ok(())
}
