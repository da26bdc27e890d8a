use std::collections::HashMap;

use crate::ir::module::{BasicBlock, FunctionBody};
use crate::ir::op::{BlockId, FCmpPredicate, IROp};
use crate::ir::value::{Operand, Register, RegisterInfo, ValueType};

/// A per-function lowering helper: owns the blocks and registers of the
/// body being built and an insertion point. The finished body is handed to
/// the module only once lowering succeeded.
pub struct FunctionBuilder {
    blocks: Vec<BasicBlock>,
    registers: Vec<RegisterInfo>,
    insert_block: Option<BlockId>,
    /// name hint -> times used, for unique register / block names
    names: HashMap<String, usize>,
}

impl FunctionBuilder {
    pub fn new() -> Self {
        FunctionBuilder {
            blocks: Vec::new(),
            registers: Vec::new(),
            insert_block: None,
            names: HashMap::new(),
        }
    }

    fn unique_name(&mut self, hint: &str) -> String {
        let count = self.names.entry(hint.to_string()).or_insert(0);
        let name = if *count == 0 {
            hint.to_string()
        } else {
            format!("{}{}", hint, count)
        };
        *count += 1;
        name
    }

    pub fn alloc_reg(&mut self, hint: &str, ty: ValueType) -> Register {
        let name = self.unique_name(hint);
        self.registers.push(RegisterInfo { name, ty });
        self.registers.len() - 1
    }

    /// Appends a new empty block; the insertion point does not move.
    pub fn create_block(&mut self, hint: &str) -> BlockId {
        let label = self.unique_name(hint);
        self.blocks.push(BasicBlock { label, ops: Vec::new() });
        self.blocks.len() - 1
    }

    pub fn position_at_end(&mut self, block: BlockId) {
        self.insert_block = Some(block);
    }

    /// Whether the insertion block already ends in a terminator.
    pub fn is_terminated(&self) -> bool {
        self.insert_block
            .and_then(|b| self.blocks.get(b))
            .and_then(|b| b.terminator())
            .is_some()
    }

    pub fn emit_op(&mut self, op: IROp) {
        let block = match self.insert_block {
            Some(b) => b,
            None => {
                let b = self.create_block("entry");
                self.insert_block = Some(b);
                b
            }
        };
        log::trace!("[ir] {} <- {:?}", self.blocks[block].label, op);
        self.blocks[block].ops.push(op);
    }

    pub fn build_fadd(&mut self, lhs: Operand, rhs: Operand) -> Operand {
        let dest = self.alloc_reg("addtmp", ValueType::F64);
        self.emit_op(IROp::FAdd { dest, lhs, rhs });
        Operand::Reg(dest)
    }

    pub fn build_fsub(&mut self, lhs: Operand, rhs: Operand) -> Operand {
        let dest = self.alloc_reg("subtmp", ValueType::F64);
        self.emit_op(IROp::FSub { dest, lhs, rhs });
        Operand::Reg(dest)
    }

    pub fn build_fmul(&mut self, lhs: Operand, rhs: Operand) -> Operand {
        let dest = self.alloc_reg("multmp", ValueType::F64);
        self.emit_op(IROp::FMul { dest, lhs, rhs });
        Operand::Reg(dest)
    }

    pub fn build_fdiv(&mut self, lhs: Operand, rhs: Operand) -> Operand {
        let dest = self.alloc_reg("divtmp", ValueType::F64);
        self.emit_op(IROp::FDiv { dest, lhs, rhs });
        Operand::Reg(dest)
    }

    pub fn build_fcmp(&mut self, pred: FCmpPredicate, lhs: Operand, rhs: Operand, hint: &str) -> Operand {
        let dest = self.alloc_reg(hint, ValueType::Bool);
        self.emit_op(IROp::FCmp { dest, pred, lhs, rhs });
        Operand::Reg(dest)
    }

    pub fn build_ui_to_fp(&mut self, src: Operand) -> Operand {
        let dest = self.alloc_reg("booltmp", ValueType::F64);
        self.emit_op(IROp::UiToFp { dest, src });
        Operand::Reg(dest)
    }

    pub fn build_call(&mut self, callee: &str, args: Vec<Operand>) -> Operand {
        let dest = self.alloc_reg("calltmp", ValueType::F64);
        self.emit_op(IROp::Call {
            dest,
            callee: callee.to_string(),
            args,
        });
        Operand::Reg(dest)
    }

    pub fn build_br(&mut self, target: BlockId) {
        self.emit_op(IROp::Br { target });
    }

    pub fn build_cond_br(&mut self, cond: Operand, then_block: BlockId, else_block: BlockId) {
        self.emit_op(IROp::CondBr {
            cond,
            then_block,
            else_block,
        });
    }

    pub fn build_ret(&mut self, value: Option<Operand>) {
        self.emit_op(IROp::Ret { value });
    }

    pub fn finish(self) -> FunctionBody {
        FunctionBody {
            blocks: self.blocks,
            registers: self.registers,
        }
    }
}

impl Default for FunctionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
