use sable_config::DebugTrace;
use sable_log::trace_dbg;
use sable_sir::ValueId;
use sable_type::{span::Span, types::TypeId};

use crate::{LoweringContext, managed::ManagedValue};

impl<'a> LoweringContext<'a> {
  /// Apply an accessor to its receiver and index, leaving a thunk that
  /// takes the final argument list.
  ///
  /// The accessor is retained first. Each application consumes the previous
  /// callee and produces a new owned function value, so every step is one
  /// acquire followed by one release (by forwarding or at scope exit).
  pub(crate) fn partial_apply_accessor(
    &mut self,
    accessor: ValueId,
    base: Option<ValueId>,
    index: Option<ValueId>,
    span: Span,
  ) -> ManagedValue {
    if let Some(base) = base {
      assert!(
        self.types.is_address(&self.value_type(base)),
        "base of getter/setter component must be invalid or lvalue"
      );
    }

    self.fn_builder().create_retain(accessor);
    let mut thunk = self.emit_managed_rvalue_with_cleanup(accessor);

    if let Some(base) = base {
      thunk = self.apply_partial(thunk, base, span);
    }

    if let Some(index) = index {
      let index = self.emit_copy(index);
      thunk = self.apply_partial(thunk, index, span);
    }

    trace_dbg!(
      &self.config,
      DebugTrace::LValue,
      "accessor %{} applied to {} argument list(s)",
      accessor.index(),
      usize::from(base.is_some()) + usize::from(index.is_some())
    );

    thunk
  }

  fn apply_partial(
    &mut self,
    callee: ManagedValue,
    arg: ValueId,
    span: Span,
  ) -> ManagedValue {
    let callee = callee.forward(self);
    let result_ty = self.applied_result_type(callee);
    let applied = self.fn_builder().create_apply(callee, vec![arg], result_ty, span);
    self.emit_managed_rvalue_with_cleanup(applied)
  }

  /// Result type of applying `callee` to one argument list.
  pub(crate) fn applied_result_type(
    &self,
    callee: ValueId,
  ) -> TypeId {
    let callee_ty = self.value_type(callee);
    match self.types.function_parts(&callee_ty) {
      Some((_, ret)) => ret,
      None => panic!("accessor %{} is not a function", callee.index()),
    }
  }
}
