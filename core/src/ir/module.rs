//! file: core/src/ir/module.rs
//! description: IR module, functions and basic blocks.
//!
//! The module doubles as the function table of a compilation unit: a name
//! is either absent, declared (signature only) or defined (signature and
//! body). Functions keep their declaration order for printing.
//!
use serde::Serialize;

use super::op::{BlockId, IROp};
use super::value::{Operand, RegisterInfo, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FunctionState {
    Declared,
    Defined,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicBlock {
    pub label: String,
    pub ops: Vec<IROp>,
}

impl BasicBlock {
    pub fn terminator(&self) -> Option<&IROp> {
        self.ops.last().filter(|op| op.is_terminator())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FunctionBody {
    pub blocks: Vec<BasicBlock>,
    pub registers: Vec<RegisterInfo>,
}

impl FunctionBody {
    pub fn entry(&self) -> Option<BlockId> {
        if self.blocks.is_empty() { None } else { Some(0) }
    }
}

/// A function signature plus, once defined, its body. Every parameter and
/// the return value are `F64`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: Option<FunctionBody>,
}

impl IrFunction {
    pub fn new(name: &str, params: Vec<String>) -> Self {
        IrFunction {
            name: name.to_string(),
            params,
            body: None,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn state(&self) -> FunctionState {
        if self.body.is_some() {
            FunctionState::Defined
        } else {
            FunctionState::Declared
        }
    }

    pub fn is_defined(&self) -> bool {
        self.body.is_some()
    }

    fn fmt_operand(&self, operand: &Operand) -> String {
        match operand {
            Operand::Const(v) => format!("{:?}", v),
            Operand::Arg(idx) => match self.params.get(*idx) {
                Some(name) => format!("%{}", name),
                None => format!("%arg{}", idx),
            },
            Operand::Reg(r) => match self.body.as_ref().and_then(|b| b.registers.get(*r)) {
                Some(info) => format!("%{}", info.name),
                None => format!("%r{}", r),
            },
        }
    }

    fn fmt_block_ref(&self, id: BlockId) -> String {
        match self.body.as_ref().and_then(|b| b.blocks.get(id)) {
            Some(block) => format!("%{}", block.label),
            None => format!("%bb{}", id),
        }
    }

    fn fmt_op(&self, op: &IROp) -> String {
        let reg = |r: &usize| self.fmt_operand(&Operand::Reg(*r));
        match op {
            IROp::FAdd { dest, lhs, rhs } => format!("{} = fadd double {}, {}", reg(dest), self.fmt_operand(lhs), self.fmt_operand(rhs)),
            IROp::FSub { dest, lhs, rhs } => format!("{} = fsub double {}, {}", reg(dest), self.fmt_operand(lhs), self.fmt_operand(rhs)),
            IROp::FMul { dest, lhs, rhs } => format!("{} = fmul double {}, {}", reg(dest), self.fmt_operand(lhs), self.fmt_operand(rhs)),
            IROp::FDiv { dest, lhs, rhs } => format!("{} = fdiv double {}, {}", reg(dest), self.fmt_operand(lhs), self.fmt_operand(rhs)),
            IROp::FCmp { dest, pred, lhs, rhs } => format!(
                "{} = fcmp {} double {}, {}",
                reg(dest),
                pred.as_str(),
                self.fmt_operand(lhs),
                self.fmt_operand(rhs)
            ),
            IROp::UiToFp { dest, src } => format!("{} = uitofp i1 {} to double", reg(dest), self.fmt_operand(src)),
            IROp::Call { dest, callee, args } => {
                let args = args
                    .iter()
                    .map(|a| format!("double {}", self.fmt_operand(a)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} = call double @{}({})", reg(dest), callee, args)
            }
            IROp::Br { target } => format!("br label {}", self.fmt_block_ref(*target)),
            IROp::CondBr { cond, then_block, else_block } => format!(
                "br i1 {}, label {}, label {}",
                self.fmt_operand(cond),
                self.fmt_block_ref(*then_block),
                self.fmt_block_ref(*else_block)
            ),
            IROp::Ret { value: Some(v) } => format!("ret double {}", self.fmt_operand(v)),
            IROp::Ret { value: None } => "ret void".to_string(),
        }
    }
}

impl std::fmt::Display for IrFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self
            .params
            .iter()
            .map(|p| format!("double %{}", p))
            .collect::<Vec<_>>()
            .join(", ");

        match &self.body {
            None => writeln!(f, "declare double @{}({})", self.name, params),
            Some(body) => {
                writeln!(f, "define double @{}({}) {{", self.name, params)?;
                for (i, block) in body.blocks.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    writeln!(f, "{}:", block.label)?;
                    for op in &block.ops {
                        writeln!(f, "  {}", self.fmt_op(op))?;
                    }
                }
                writeln!(f, "}}")
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IrModule {
    pub name: String,
    functions: Vec<IrFunction>,
}

impl IrModule {
    pub fn new(name: &str) -> Self {
        IrModule {
            name: name.to_string(),
            functions: Vec::new(),
        }
    }

    pub fn functions(&self) -> &[IrFunction] {
        &self.functions
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn get_function(&self, name: &str) -> Option<&IrFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn get_function_mut(&mut self, name: &str) -> Option<&mut IrFunction> {
        self.functions.iter_mut().find(|f| f.name == name)
    }

    pub fn state_of(&self, name: &str) -> Option<FunctionState> {
        self.get_function(name).map(|f| f.state())
    }

    /// Adds a declaration for `name`. An existing function of that name is
    /// returned untouched, so declaring twice never creates two functions.
    pub fn declare_function(&mut self, name: &str, params: Vec<String>) -> &mut IrFunction {
        match self.functions.iter().position(|f| f.name == name) {
            Some(idx) => &mut self.functions[idx],
            None => {
                log::debug!("[ir] declare @{}({})", name, params.join(", "));
                self.functions.push(IrFunction::new(name, params));
                let last = self.functions.len() - 1;
                &mut self.functions[last]
            }
        }
    }

    /// Attaches a finished body. Returns `false` when the name is unknown or
    /// already has a body.
    pub fn define_function(&mut self, name: &str, body: FunctionBody) -> bool {
        match self.get_function_mut(name) {
            Some(func) if func.body.is_none() => {
                log::debug!("[ir] define @{} ({} blocks)", name, body.blocks.len());
                func.body = Some(body);
                true
            }
            _ => false,
        }
    }

    /// Drops the body of `name`, returning it to the declared state.
    pub fn discard_body(&mut self, name: &str) -> Option<FunctionBody> {
        let body = self.get_function_mut(name)?.body.take();
        if body.is_some() {
            log::debug!("[ir] discard body of @{}", name);
        }
        body
    }

    /// Removes `name` from the module entirely.
    pub fn erase_function(&mut self, name: &str) -> Option<IrFunction> {
        let idx = self.functions.iter().position(|f| f.name == name)?;
        log::debug!("[ir] erase @{}", name);
        Some(self.functions.remove(idx))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for IrModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        for func in &self.functions {
            writeln!(f)?;
            write!(f, "{}", func)?;
        }
        Ok(())
    }
}

/// Type a value operand has inside `func`, if it refers to something real.
pub fn operand_type(func: &IrFunction, operand: &Operand) -> Option<ValueType> {
    match operand {
        Operand::Const(_) => Some(ValueType::F64),
        Operand::Arg(idx) => (*idx < func.params.len()).then_some(ValueType::F64),
        Operand::Reg(r) => func.body.as_ref()?.registers.get(*r).map(|info| info.ty),
    }
}
