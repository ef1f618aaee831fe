use std::collections::HashMap;

use sable_type::{Store, definition::DefinitionId, span::Span, types::TypeId};

use crate::{Instr, Terminator, ValueId};

/// Top-level SIR module containing all functions.
#[derive(Debug, Clone, Default)]
pub struct SirModule {
  pub functions: HashMap<DefinitionId, FunctionSir>,
}

impl SirModule {
  pub fn new() -> Self {
    Self {
      functions: HashMap::new(),
    }
  }

  pub fn function(
    &self,
    def_id: &DefinitionId,
  ) -> Option<&FunctionSir> {
    self.functions.get(def_id)
  }

  /// Functions sorted by definition ID, for stable iteration.
  pub fn sorted_functions(&self) -> Vec<(&DefinitionId, &FunctionSir)> {
    let mut funcs: Vec<_> = self.functions.iter().collect();
    funcs.sort_by_key(|(def_id, _)| def_id.index());
    funcs
  }
}

/// A single function in SIR form: one straight-line body.
#[derive(Debug, Clone)]
pub struct FunctionSir {
  pub def_id: DefinitionId,
  pub name: String,
  /// Parameter values, defined on entry.
  pub params: Vec<ValueId>,
  pub return_type: TypeId,
  pub values: Store<ValueData>,
  pub instructions: Vec<Instr>,
  pub terminator: Terminator,
  /// Declared only; accessors implemented elsewhere.
  pub is_extern: bool,
  pub span: Span,
}

/// Metadata for a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueData {
  pub ty: TypeId,
  pub span: Span,
}

impl FunctionSir {
  pub fn value_type(
    &self,
    value: ValueId,
  ) -> TypeId {
    self.values.get(&value).ty
  }

  /// The instruction defining `value`, if it is not a parameter.
  pub fn definition_of(
    &self,
    value: ValueId,
  ) -> Option<&Instr> {
    self.instructions.iter().find(|instr| instr.dest() == Some(value))
  }

  pub fn count(
    &self,
    pred: impl Fn(&Instr) -> bool,
  ) -> usize {
    self.instructions.iter().filter(|instr| pred(instr)).count()
  }
}
