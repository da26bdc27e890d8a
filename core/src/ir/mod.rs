pub mod lower;
pub mod module;
pub mod op;
pub mod value;
pub mod verify;

pub use self::lower::{LoweringContext, LoweringError, LoweringErrorKind, lower_program, lower_stmt};
pub use self::module::{BasicBlock, FunctionBody, FunctionState, IrFunction, IrModule};
pub use self::op::{BlockId, FCmpPredicate, IROp};
pub use self::value::{Operand, Register, ValueType};
pub use self::verify::{VerifyError, verify_function, verify_module};
