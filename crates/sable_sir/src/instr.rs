use sable_hir::operation::BinaryOperation;
use sable_type::{definition::DefinitionId, types::TypeId, value::LiteralValue};

use crate::ValueId;

/// A single SIR instruction. Every value is defined exactly once.
///
/// Ownership: `apply` consumes its callee and its arguments, `store` and
/// `assign` consume the written value. `retain` produces a new owned copy of a
/// value in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
  /// Reserve stack storage for a value of type `ty`.
  /// `dest = alloc_stack ty`
  AllocStack { dest: ValueId, ty: TypeId },

  /// Address of a field at a fixed offset inside the value at `base`.
  /// `dest = &base.#index`
  ElementAddr { dest: ValueId, base: ValueId, index: u32 },

  /// Read the value stored at an address.
  /// `dest = *address`
  Load { dest: ValueId, address: ValueId },

  /// Initialize uninitialized memory at an address.
  /// `*address = value`
  Store { value: ValueId, address: ValueId },

  /// Replace the value at an initialized address, destroying the old one.
  Assign { value: ValueId, address: ValueId },

  /// Destroy the value stored at an address, leaving the storage uninitialized.
  DestroyAddr { address: ValueId },

  /// Reference to a function, unowned.
  FunctionRef { dest: ValueId, function: DefinitionId },

  Retain { value: ValueId },
  Release { value: ValueId },

  /// Apply one argument list: `dest = callee(args...)`.
  /// `dest` is `None` when the result is the unit type.
  Apply {
    dest: Option<ValueId>,
    callee: ValueId,
    args: Vec<ValueId>,
  },

  Literal { dest: ValueId, value: LiteralValue },

  /// `dest = left op right`
  BinOp {
    dest: ValueId,
    op: BinaryOperation,
    left: ValueId,
    right: ValueId,
  },
}

impl Instr {
  /// The value this instruction defines, if any.
  pub fn dest(&self) -> Option<ValueId> {
    match self {
      Instr::AllocStack { dest, .. }
      | Instr::ElementAddr { dest, .. }
      | Instr::Load { dest, .. }
      | Instr::FunctionRef { dest, .. }
      | Instr::Literal { dest, .. }
      | Instr::BinOp { dest, .. } => Some(*dest),
      Instr::Apply { dest, .. } => *dest,
      Instr::Store { .. }
      | Instr::Assign { .. }
      | Instr::DestroyAddr { .. }
      | Instr::Retain { .. }
      | Instr::Release { .. } => None,
    }
  }

  /// Values read by this instruction, in operand order.
  pub fn operands(&self) -> Vec<ValueId> {
    match self {
      Instr::AllocStack { .. } | Instr::FunctionRef { .. } | Instr::Literal { .. } => Vec::new(),
      Instr::ElementAddr { base, .. } => vec![*base],
      Instr::Load { address, .. } | Instr::DestroyAddr { address } => vec![*address],
      Instr::Store { value, address } | Instr::Assign { value, address } => vec![*value, *address],
      Instr::Retain { value } | Instr::Release { value } => vec![*value],
      Instr::Apply { callee, args, .. } => {
        let mut operands = vec![*callee];
        operands.extend(args.iter().copied());
        operands
      },
      Instr::BinOp { left, right, .. } => vec![*left, *right],
    }
  }

  pub fn mnemonic(&self) -> &'static str {
    match self {
      Instr::AllocStack { .. } => "alloc_stack",
      Instr::ElementAddr { .. } => "element_addr",
      Instr::Load { .. } => "load",
      Instr::Store { .. } => "store",
      Instr::Assign { .. } => "assign",
      Instr::DestroyAddr { .. } => "destroy_addr",
      Instr::FunctionRef { .. } => "function_ref",
      Instr::Retain { .. } => "retain",
      Instr::Release { .. } => "release",
      Instr::Apply { .. } => "apply",
      Instr::Literal { .. } => "literal",
      Instr::BinOp { op, .. } => op.mnemonic(),
    }
  }
}

/// How control leaves a function body.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminator {
  Return(Option<ValueId>),
  /// Not yet terminated, or diverging.
  Unreachable,
}
