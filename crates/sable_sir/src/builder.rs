use sable_hir::operation::BinaryOperation;
use sable_type::{Store, definition::DefinitionId, span::Span, types::TypeId, value::LiteralValue};

use crate::{FunctionSir, Instr, Terminator, ValueData, ValueId};

/// Builder for constructing a single function's SIR.
pub struct FunctionBuilder {
  def_id: DefinitionId,
  name: String,
  params: Vec<ValueId>,
  return_type: TypeId,
  is_extern: bool,
  span: Span,

  values: Store<ValueData>,
  instructions: Vec<Instr>,
  terminator: Terminator,
}

impl FunctionBuilder {
  pub fn new(
    def_id: DefinitionId,
    name: String,
    param_types: &[TypeId],
    return_type: TypeId,
    is_extern: bool,
    span: Span,
  ) -> Self {
    let mut builder = Self {
      def_id,
      name,
      params: Vec::new(),
      return_type,
      is_extern,
      span,
      values: Store::new(),
      instructions: Vec::new(),
      terminator: Terminator::Unreachable,
    };

    // Parameters take the first value IDs: %0, %1, ...
    for &ty in param_types {
      let value = builder.alloc_value(ty, span);
      builder.params.push(value);
    }

    builder
  }

  pub fn def_id(&self) -> DefinitionId {
    self.def_id
  }

  pub fn params(&self) -> &[ValueId] {
    &self.params
  }

  /// Allocate a new value.
  pub fn alloc_value(
    &mut self,
    ty: TypeId,
    span: Span,
  ) -> ValueId {
    self.values.alloc(ValueData { ty, span })
  }

  /// Get the type of a value.
  pub fn value_type(
    &self,
    value: ValueId,
  ) -> TypeId {
    self.values.get(&value).ty
  }

  /// Get the return type.
  pub fn return_type(&self) -> TypeId {
    self.return_type
  }

  /// Instructions emitted so far.
  pub fn instructions(&self) -> &[Instr] {
    &self.instructions
  }

  /// Emit an instruction at the end of the body.
  pub fn emit(
    &mut self,
    instr: Instr,
  ) {
    debug_assert!(!self.is_terminated(), "emitting into terminated function {}", self.name);
    self.instructions.push(instr);
  }

  pub fn create_alloc_stack(
    &mut self,
    ty: TypeId,
    address_ty: TypeId,
    span: Span,
  ) -> ValueId {
    let dest = self.alloc_value(address_ty, span);
    self.emit(Instr::AllocStack { dest, ty });
    dest
  }

  pub fn create_element_addr(
    &mut self,
    base: ValueId,
    index: u32,
    result_ty: TypeId,
    span: Span,
  ) -> ValueId {
    let dest = self.alloc_value(result_ty, span);
    self.emit(Instr::ElementAddr { dest, base, index });
    dest
  }

  pub fn create_load(
    &mut self,
    address: ValueId,
    ty: TypeId,
    span: Span,
  ) -> ValueId {
    let dest = self.alloc_value(ty, span);
    self.emit(Instr::Load { dest, address });
    dest
  }

  pub fn create_store(
    &mut self,
    value: ValueId,
    address: ValueId,
  ) {
    self.emit(Instr::Store { value, address });
  }

  pub fn create_assign(
    &mut self,
    value: ValueId,
    address: ValueId,
  ) {
    self.emit(Instr::Assign { value, address });
  }

  pub fn create_destroy_addr(
    &mut self,
    address: ValueId,
  ) {
    self.emit(Instr::DestroyAddr { address });
  }

  pub fn create_function_ref(
    &mut self,
    function: DefinitionId,
    fn_ty: TypeId,
    span: Span,
  ) -> ValueId {
    let dest = self.alloc_value(fn_ty, span);
    self.emit(Instr::FunctionRef { dest, function });
    dest
  }

  pub fn create_retain(
    &mut self,
    value: ValueId,
  ) {
    self.emit(Instr::Retain { value });
  }

  pub fn create_release(
    &mut self,
    value: ValueId,
  ) {
    self.emit(Instr::Release { value });
  }

  /// Apply `callee` to one argument list, producing a value of `result_ty`.
  pub fn create_apply(
    &mut self,
    callee: ValueId,
    args: Vec<ValueId>,
    result_ty: TypeId,
    span: Span,
  ) -> ValueId {
    let dest = self.alloc_value(result_ty, span);
    self.emit(Instr::Apply {
      dest: Some(dest),
      callee,
      args,
    });
    dest
  }

  /// Apply `callee` to one argument list, discarding a unit result.
  pub fn create_apply_void(
    &mut self,
    callee: ValueId,
    args: Vec<ValueId>,
  ) {
    self.emit(Instr::Apply { dest: None, callee, args });
  }

  pub fn create_literal(
    &mut self,
    value: LiteralValue,
    ty: TypeId,
    span: Span,
  ) -> ValueId {
    let dest = self.alloc_value(ty, span);
    self.emit(Instr::Literal { dest, value });
    dest
  }

  pub fn create_binary(
    &mut self,
    op: BinaryOperation,
    left: ValueId,
    right: ValueId,
    ty: TypeId,
    span: Span,
  ) -> ValueId {
    let dest = self.alloc_value(ty, span);
    self.emit(Instr::BinOp { dest, op, left, right });
    dest
  }

  /// Set the terminator of the body.
  pub fn terminate(
    &mut self,
    term: Terminator,
  ) {
    self.terminator = term;
  }

  pub fn is_terminated(&self) -> bool {
    !matches!(self.terminator, Terminator::Unreachable)
  }

  /// Finish building and return the completed function.
  pub fn finish(self) -> FunctionSir {
    FunctionSir {
      def_id: self.def_id,
      name: self.name,
      params: self.params,
      return_type: self.return_type,
      values: self.values,
      instructions: self.instructions,
      terminator: self.terminator,
      is_extern: self.is_extern,
      span: self.span,
    }
  }
}
