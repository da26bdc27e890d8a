use serde::Serialize;

/// Index of a virtual register inside one function body.
pub type Register = usize;

/// The two value types the IR distinguishes. Source-level values are
/// always `F64`; `Bool` only exists between a comparison and its widening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueType {
    F64,
    Bool,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::F64 => write!(f, "double"),
            ValueType::Bool => write!(f, "i1"),
        }
    }
}

/// A value handle produced by lowering: a constant, a function argument or
/// the result register of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Operand {
    Const(f64),
    Arg(usize),
    Reg(Register),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterInfo {
    /// Unique printable name, e.g. `addtmp1`.
    pub name: String,
    pub ty: ValueType,
}
