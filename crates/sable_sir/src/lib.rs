pub mod builder;
pub mod display;
pub mod instr;
pub mod program;
pub mod verify;

use sable_type::Id;

pub use builder::FunctionBuilder;
pub use instr::{Instr, Terminator};
pub use program::{FunctionSir, SirModule, ValueData};
pub use verify::{VerifyError, verify_sir};

/// Unique identifier for an SSA value within a function.
pub type ValueId = Id<ValueData>;
