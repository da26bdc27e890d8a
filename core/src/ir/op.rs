use serde::Serialize;

use super::value::{Operand, Register};

/// Index of a basic block inside one function body.
pub type BlockId = usize;

/// Float comparison predicates. The `U*` forms are unordered: they also
/// hold when either side is NaN. `One` is ordered-not-equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FCmpPredicate {
    Ueq,
    Une,
    Ult,
    Ule,
    Ugt,
    Uge,
    One,
}

impl FCmpPredicate {
    pub fn evaluate(&self, lhs: f64, rhs: f64) -> bool {
        let unordered = lhs.is_nan() || rhs.is_nan();
        match self {
            FCmpPredicate::Ueq => unordered || lhs == rhs,
            FCmpPredicate::Une => unordered || lhs != rhs,
            FCmpPredicate::Ult => unordered || lhs < rhs,
            FCmpPredicate::Ule => unordered || lhs <= rhs,
            FCmpPredicate::Ugt => unordered || lhs > rhs,
            FCmpPredicate::Uge => unordered || lhs >= rhs,
            FCmpPredicate::One => !unordered && lhs != rhs,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FCmpPredicate::Ueq => "ueq",
            FCmpPredicate::Une => "une",
            FCmpPredicate::Ult => "ult",
            FCmpPredicate::Ule => "ule",
            FCmpPredicate::Ugt => "ugt",
            FCmpPredicate::Uge => "uge",
            FCmpPredicate::One => "one",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IROp {
    FAdd { dest: Register, lhs: Operand, rhs: Operand },
    FSub { dest: Register, lhs: Operand, rhs: Operand },
    FMul { dest: Register, lhs: Operand, rhs: Operand },
    FDiv { dest: Register, lhs: Operand, rhs: Operand },

    FCmp { dest: Register, pred: FCmpPredicate, lhs: Operand, rhs: Operand },
    /// Widens a `Bool` to `F64` (1.0 / 0.0).
    UiToFp { dest: Register, src: Operand },

    Call { dest: Register, callee: String, args: Vec<Operand> },

    Br { target: BlockId },
    CondBr { cond: Operand, then_block: BlockId, else_block: BlockId },
    /// `None` is an empty return; callers observe 0.0.
    Ret { value: Option<Operand> },
}

impl IROp {
    pub fn is_terminator(&self) -> bool {
        matches!(self, IROp::Br { .. } | IROp::CondBr { .. } | IROp::Ret { .. })
    }

    pub fn dest(&self) -> Option<Register> {
        match self {
            IROp::FAdd { dest, .. }
            | IROp::FSub { dest, .. }
            | IROp::FMul { dest, .. }
            | IROp::FDiv { dest, .. }
            | IROp::FCmp { dest, .. }
            | IROp::UiToFp { dest, .. }
            | IROp::Call { dest, .. } => Some(*dest),
            IROp::Br { .. } | IROp::CondBr { .. } | IROp::Ret { .. } => None,
        }
    }

    /// Every operand read by this op, in order.
    pub fn operands(&self) -> Vec<Operand> {
        match self {
            IROp::FAdd { lhs, rhs, .. }
            | IROp::FSub { lhs, rhs, .. }
            | IROp::FMul { lhs, rhs, .. }
            | IROp::FDiv { lhs, rhs, .. }
            | IROp::FCmp { lhs, rhs, .. } => vec![*lhs, *rhs],
            IROp::UiToFp { src, .. } => vec![*src],
            IROp::Call { args, .. } => args.clone(),
            IROp::Br { .. } => Vec::new(),
            IROp::CondBr { cond, .. } => vec![*cond],
            IROp::Ret { value } => value.iter().copied().collect(),
        }
    }

    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            IROp::Br { target } => vec![*target],
            IROp::CondBr { then_block, else_block, .. } => vec![*then_block, *else_block],
            _ => Vec::new(),
        }
    }
}
