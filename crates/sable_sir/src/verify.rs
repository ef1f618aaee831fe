use std::collections::HashSet;

use sable_type::{
  definition::{DefinitionKind, DefinitionStore},
  types::{Type, TypeId, TypeStore},
};

use crate::{FunctionSir, Instr, SirModule, Terminator, ValueId};

/// Errors found during SIR verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
  /// A non-extern function never set its terminator.
  MissingTerminator { function: String },

  /// Value used before it was defined, or never defined at all.
  ValueUsedBeforeDef { function: String, value: ValueId },

  /// An operand that must be an address is not address-typed.
  NotAnAddress {
    function: String,
    instruction: &'static str,
    value: ValueId,
    actual_type: TypeId,
  },

  /// `apply` callee is not a function.
  NotAFunction {
    function: String,
    value: ValueId,
    actual_type: TypeId,
  },

  /// `apply` argument list does not match the callee's parameter list.
  ArgumentCountMismatch {
    function: String,
    callee: ValueId,
    expected: usize,
    actual: usize,
  },

  /// `element_addr` index past the end of the aggregate.
  ElementOutOfRange {
    function: String,
    base: ValueId,
    index: u32,
  },

  /// Stored or assigned value type differs from the pointee type.
  StoreTypeMismatch {
    function: String,
    expected: TypeId,
    actual: TypeId,
  },

  /// Return value type doesn't match function signature.
  ReturnTypeMismatch {
    function: String,
    expected: TypeId,
    actual: TypeId,
  },
}

/// SIR verification result.
pub type VerifyResult = Result<(), Vec<VerifyError>>;

/// Verifier for SIR modules.
pub struct SirVerifier<'a> {
  module: &'a SirModule,
  types: &'a TypeStore,
  defs: &'a DefinitionStore,
  errors: Vec<VerifyError>,
}

impl<'a> SirVerifier<'a> {
  pub fn new(
    module: &'a SirModule,
    types: &'a TypeStore,
    defs: &'a DefinitionStore,
  ) -> Self {
    Self {
      module,
      types,
      defs,
      errors: Vec::new(),
    }
  }

  /// Verify the entire module.
  pub fn verify(mut self) -> VerifyResult {
    for (_, func) in self.module.sorted_functions() {
      if !func.is_extern {
        self.verify_function(func);
      }
    }

    if self.errors.is_empty() {
      Ok(())
    } else {
      Err(self.errors)
    }
  }

  fn verify_function(
    &mut self,
    func: &FunctionSir,
  ) {
    let mut defined: HashSet<ValueId> = func.params.iter().copied().collect();

    for instr in &func.instructions {
      for operand in instr.operands() {
        if !defined.contains(&operand) {
          self.errors.push(VerifyError::ValueUsedBeforeDef {
            function: func.name.clone(),
            value: operand,
          });
        }
      }

      self.verify_instr(func, instr);

      if let Some(dest) = instr.dest() {
        defined.insert(dest);
      }
    }

    match &func.terminator {
      Terminator::Unreachable => {
        self.errors.push(VerifyError::MissingTerminator {
          function: func.name.clone(),
        });
      },
      Terminator::Return(value) => {
        let actual = match value {
          Some(v) => {
            if !defined.contains(v) {
              self.errors.push(VerifyError::ValueUsedBeforeDef {
                function: func.name.clone(),
                value: *v,
              });
            }
            func.value_type(*v)
          },
          None => self.types.unit(),
        };

        if actual != func.return_type {
          self.errors.push(VerifyError::ReturnTypeMismatch {
            function: func.name.clone(),
            expected: func.return_type,
            actual,
          });
        }
      },
    }
  }

  fn verify_instr(
    &mut self,
    func: &FunctionSir,
    instr: &Instr,
  ) {
    match instr {
      Instr::ElementAddr { base, index, .. } => {
        if let Some(pointee) = self.check_address(func, instr, *base) {
          let count = self.element_count(pointee);
          if count.is_some_and(|count| *index as usize >= count) {
            self.errors.push(VerifyError::ElementOutOfRange {
              function: func.name.clone(),
              base: *base,
              index: *index,
            });
          }
        }
      },
      Instr::Load { address, .. } | Instr::DestroyAddr { address } => {
        self.check_address(func, instr, *address);
      },
      Instr::Store { value, address } | Instr::Assign { value, address } => {
        if let Some(pointee) = self.check_address(func, instr, *address) {
          let actual = func.value_type(*value);
          if actual != pointee {
            self.errors.push(VerifyError::StoreTypeMismatch {
              function: func.name.clone(),
              expected: pointee,
              actual,
            });
          }
        }
      },
      Instr::Apply { callee, args, .. } => {
        let callee_ty = func.value_type(*callee);
        match self.types.function_parts(&callee_ty) {
          Some((params, _)) => {
            if params.len() != args.len() {
              self.errors.push(VerifyError::ArgumentCountMismatch {
                function: func.name.clone(),
                callee: *callee,
                expected: params.len(),
                actual: args.len(),
              });
            }
          },
          None => {
            self.errors.push(VerifyError::NotAFunction {
              function: func.name.clone(),
              value: *callee,
              actual_type: callee_ty,
            });
          },
        }
      },
      Instr::AllocStack { .. }
      | Instr::FunctionRef { .. }
      | Instr::Retain { .. }
      | Instr::Release { .. }
      | Instr::Literal { .. }
      | Instr::BinOp { .. } => {},
    }
  }

  /// Returns the pointee type when `value` is an address, records an error otherwise.
  fn check_address(
    &mut self,
    func: &FunctionSir,
    instr: &Instr,
    value: ValueId,
  ) -> Option<TypeId> {
    let ty = func.value_type(value);
    match self.types.address_parts(&ty) {
      Some((pointee, _)) => Some(pointee),
      None => {
        self.errors.push(VerifyError::NotAnAddress {
          function: func.name.clone(),
          instruction: instr.mnemonic(),
          value,
          actual_type: ty,
        });
        None
      },
    }
  }

  fn element_count(
    &self,
    aggregate: TypeId,
  ) -> Option<usize> {
    match self.types.get(&aggregate) {
      Type::Tuple(elements) => Some(elements.len()),
      Type::Record(def_id) => match &self.defs.get(def_id).kind {
        DefinitionKind::Record(_) => Some(self.defs.stored_fields(def_id).len()),
        _ => None,
      },
      _ => None,
    }
  }
}

/// Verify a SIR module.
pub fn verify_sir(
  module: &SirModule,
  types: &TypeStore,
  defs: &DefinitionStore,
) -> VerifyResult {
  SirVerifier::new(module, types, defs).verify()
}
