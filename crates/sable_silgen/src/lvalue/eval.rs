use sable_config::DebugTrace;
use sable_log::trace_dbg;
use sable_sir::ValueId;
use sable_type::{span::Span, types::Qualifiers};

use super::{LValue, PathComponent, PhysicalComponent};
use crate::{LoweringContext, cleanup::CleanupKind, managed::ManagedValue};

impl<'a> LoweringContext<'a> {
  /// Read the current value at `lvalue`. The result is owned by the caller.
  pub fn load_lvalue(
    &mut self,
    lvalue: &LValue,
    span: Span,
  ) -> ManagedValue {
    let (last, prefix) = match lvalue.components().split_last() {
      Some(split) => split,
      None => panic!("load from empty lvalue path"),
    };

    trace_dbg!(&self.config, DebugTrace::LValue, "load through {} component(s)", lvalue.len());

    let value = self.scoped(|ctx| {
      let base = ctx.resolve_prefix(prefix, span);

      match last {
        PathComponent::Physical(physical) => {
          let address = physical.offset(ctx, base, span);
          let ty = ctx.types.rvalue_type(&ctx.value_type(address));
          let value = ctx.fn_builder().create_load(address, ty, span);
          ctx.emit_copy(value)
        },
        PathComponent::Logical(logical) => logical.get(ctx, base, span),
      }
    });

    self.emit_managed_rvalue_with_cleanup(value)
  }

  /// Write `value` to `lvalue`, consuming it.
  pub fn store_lvalue(
    &mut self,
    lvalue: &LValue,
    value: ManagedValue,
    span: Span,
  ) {
    let (last, prefix) = match lvalue.components().split_last() {
      Some(split) => split,
      None => panic!("store to empty lvalue path"),
    };

    trace_dbg!(&self.config, DebugTrace::LValue, "store through {} component(s)", lvalue.len());

    if let Some(PathComponent::Physical(PhysicalComponent::Root { address })) = lvalue.components().first() {
      assert!(
        lvalue.len() == 1 || !self.uninitialized.contains_key(address),
        "write into a member of uninitialized storage %{}",
        address.index()
      );
    }

    self.scoped(|ctx| {
      let base = ctx.resolve_prefix(prefix, span);

      match last {
        PathComponent::Physical(physical) => {
          let address = physical.offset(ctx, base, span);
          let value = value.forward(ctx);
          ctx.write_to_address(value, address);
        },
        PathComponent::Logical(logical) => logical.set(ctx, base, value, span),
      }
    });
  }

  /// The final write of a physical path. The first write into a variable
  /// declared without a value initializes it and arms its cleanup; any other
  /// non-trivial write replaces the live contents.
  fn write_to_address(
    &mut self,
    value: ValueId,
    address: ValueId,
  ) {
    if let Some(handle) = self.uninitialized.remove(&address) {
      trace_dbg!(&self.config, DebugTrace::Ownership, "initialize %{}", address.index());
      self.fn_builder().create_store(value, address);
      self.cleanups.activate(handle);
      return;
    }

    let ty = self.types.rvalue_type(&self.value_type(address));
    if self.is_trivial(ty) {
      self.fn_builder().create_store(value, address);
    } else {
      self.fn_builder().create_assign(value, address);
    }
  }

  /// Resolve every step before the last, returning the address the last step
  /// is applied to.
  fn resolve_prefix(
    &mut self,
    prefix: &[PathComponent],
    span: Span,
  ) -> Option<ValueId> {
    let mut base = None;

    for component in prefix {
      let next = match component {
        PathComponent::Physical(physical) => physical.offset(self, base, span),
        PathComponent::Logical(logical) => {
          let value = logical.get(self, base, span);
          self.materialize(value, span)
        },
      };
      base = Some(next);
    }

    base
  }

  /// Store an owned value into a fresh stack temporary and return its address.
  /// The temporary lives until the enclosing scope ends.
  fn materialize(
    &mut self,
    value: ValueId,
    span: Span,
  ) -> ValueId {
    let ty = self.value_type(value);
    let temp = self.alloc_slot(ty, Qualifiers::mutable(), span);
    self.fn_builder().create_store(value, temp);

    if !self.is_trivial(ty) {
      self.register_cleanup(CleanupKind::DestroyAddr, temp);
    }

    trace_dbg!(&self.config, DebugTrace::LValue, "materialized %{} into %{}", value.index(), temp.index());
    temp
  }
}
