//! file: core/src/vm/exec.rs
//! description: IR interpreter loop.
//!
//! Each call gets a fresh `Frame` holding one slot per register of the
//! callee body. Execution walks the blocks from `entry`, following branch
//! terminators until a `ret` is reached. Calls recurse on the host stack,
//! bounded by the VM's maximum depth.
//!
use super::VM;
use super::err::{VmError, VmErrorKind};
use super::host;
use super::value::Value;
use crate::ir::module::{FunctionBody, IrFunction};
use crate::ir::op::IROp;
use crate::ir::value::Operand;

pub struct Frame<'a> {
    pub function: &'a IrFunction,
    pub args: &'a [f64],
    pub regs: Vec<Option<Value>>,
}

impl<'a> Frame<'a> {
    fn new(function: &'a IrFunction, body: &FunctionBody, args: &'a [f64]) -> Self {
        Frame {
            function,
            args,
            regs: vec![None; body.registers.len()],
        }
    }

    fn read(&self, operand: &Operand) -> Result<Value, VmError> {
        match operand {
            Operand::Const(v) => Ok(Value::F64(*v)),
            Operand::Arg(idx) => self.args.get(*idx).map(|v| Value::F64(*v)).ok_or_else(|| {
                invalid(self.function, format!("argument {} out of range", idx))
            }),
            Operand::Reg(r) => self
                .regs
                .get(*r)
                .copied()
                .flatten()
                .ok_or_else(|| invalid(self.function, format!("register r{} read before write", r))),
        }
    }

    fn read_f64(&self, operand: &Operand) -> Result<f64, VmError> {
        self.read(operand)?
            .as_f64()
            .ok_or_else(|| invalid(self.function, "expected a double operand".to_string()))
    }

    fn read_bool(&self, operand: &Operand) -> Result<bool, VmError> {
        self.read(operand)?
            .as_bool()
            .ok_or_else(|| invalid(self.function, "expected an i1 operand".to_string()))
    }

    fn write(&mut self, dest: usize, value: Value) -> Result<(), VmError> {
        match self.regs.get_mut(dest) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(invalid(self.function, format!("write to unknown register r{}", dest))),
        }
    }
}

fn invalid(function: &IrFunction, message: String) -> VmError {
    VmError::new(
        VmErrorKind::InvalidBody,
        format!("invalid body in @{}: {}", function.name, message),
    )
}

pub(crate) fn call_function(vm: &VM<'_>, name: &str, args: &[f64], depth: usize) -> Result<f64, VmError> {
    let function = vm.module().get_function(name).ok_or_else(|| {
        VmError::new(VmErrorKind::UnknownFunction, format!("Unknown function '{}'", name))
    })?;

    if function.arity() != args.len() {
        return Err(VmError::new(
            VmErrorKind::ArityMismatch,
            format!(
                "'{}' takes {} arguments, {} given",
                name,
                function.arity(),
                args.len()
            ),
        ));
    }

    let body = match &function.body {
        Some(body) => body,
        None => {
            return host::run_host_fn(name, args).ok_or_else(|| {
                VmError::new(VmErrorKind::NoBody, format!("'{}' is declared but has no body", name))
            });
        }
    };

    if depth >= vm.max_depth() {
        return Err(VmError::new(
            VmErrorKind::StackOverflow,
            format!("call depth exceeded {} while calling '{}'", vm.max_depth(), name),
        ));
    }

    let mut frame = Frame::new(function, body, args);
    let mut block = body
        .entry()
        .ok_or_else(|| invalid(function, "body has no entry block".to_string()))?;

    loop {
        let current = body
            .blocks
            .get(block)
            .ok_or_else(|| invalid(function, format!("branch to unknown block {}", block)))?;
        log::trace!("[vm] @{} {}:", name, current.label);

        let mut next = None;
        for op in &current.ops {
            match op {
                IROp::FAdd { dest, lhs, rhs } => {
                    let v = frame.read_f64(lhs)? + frame.read_f64(rhs)?;
                    frame.write(*dest, Value::F64(v))?;
                }
                IROp::FSub { dest, lhs, rhs } => {
                    let v = frame.read_f64(lhs)? - frame.read_f64(rhs)?;
                    frame.write(*dest, Value::F64(v))?;
                }
                IROp::FMul { dest, lhs, rhs } => {
                    let v = frame.read_f64(lhs)? * frame.read_f64(rhs)?;
                    frame.write(*dest, Value::F64(v))?;
                }
                IROp::FDiv { dest, lhs, rhs } => {
                    let v = frame.read_f64(lhs)? / frame.read_f64(rhs)?;
                    frame.write(*dest, Value::F64(v))?;
                }
                IROp::FCmp { dest, pred, lhs, rhs } => {
                    let v = pred.evaluate(frame.read_f64(lhs)?, frame.read_f64(rhs)?);
                    frame.write(*dest, Value::Bool(v))?;
                }
                IROp::UiToFp { dest, src } => {
                    let v = if frame.read_bool(src)? { 1.0 } else { 0.0 };
                    frame.write(*dest, Value::F64(v))?;
                }
                IROp::Call { dest, callee, args } => {
                    let mut values = Vec::with_capacity(args.len());
                    for arg in args {
                        values.push(frame.read_f64(arg)?);
                    }
                    let v = call_function(vm, callee, &values, depth + 1)?;
                    frame.write(*dest, Value::F64(v))?;
                }
                IROp::Br { target } => {
                    next = Some(*target);
                    break;
                }
                IROp::CondBr { cond, then_block, else_block } => {
                    next = Some(if frame.read_bool(cond)? { *then_block } else { *else_block });
                    break;
                }
                IROp::Ret { value } => {
                    return match value {
                        Some(v) => frame.read_f64(v),
                        None => Ok(0.0),
                    };
                }
            }
        }

        block = next.ok_or_else(|| invalid(function, format!("block '{}' has no terminator", current.label)))?;
    }
}
