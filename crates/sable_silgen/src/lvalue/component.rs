use sable_config::DebugTrace;
use sable_log::trace_dbg;
use sable_sir::ValueId;
use sable_type::span::Span;

use crate::{LoweringContext, managed::ManagedValue, type_info::FragileElement};

/// One step of an lvalue path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathComponent {
  Physical(PhysicalComponent),
  Logical(LogicalComponent),
}

impl PathComponent {
  /// Whether this step can head a path.
  pub fn accepts_absent_base(&self) -> bool {
    match self {
      PathComponent::Physical(PhysicalComponent::Root { .. }) => true,
      PathComponent::Physical(PhysicalComponent::FragileField(_)) => false,
      PathComponent::Logical(_) => true,
    }
  }
}

/// A step resolved by address arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalComponent {
  /// Storage of a variable, already an address.
  Root { address: ValueId },
  /// A field at a fixed offset from the base address.
  FragileField(FragileElement),
}

impl PhysicalComponent {
  /// The address this step denotes, given the previous step's address.
  pub fn offset(
    &self,
    ctx: &mut LoweringContext<'_>,
    base: Option<ValueId>,
    span: Span,
  ) -> ValueId {
    match self {
      PhysicalComponent::Root { address } => {
        assert!(base.is_none(), "var component must be root of lvalue path");
        *address
      },
      PhysicalComponent::FragileField(element) => {
        let base = match base {
          Some(base) => base,
          None => panic!("invalid value for element base"),
        };

        let base_ty = ctx.value_type(base);
        let qualifiers = match ctx.types.address_parts(&base_ty) {
          Some((_, qualifiers)) => qualifiers,
          None => panic!("base of element component must be an address, found %{}", base.index()),
        };

        let result_ty = ctx.types.address(element.type_id, qualifiers);
        let address = ctx.fn_builder().create_element_addr(base, element.index, result_ty, span);

        trace_dbg!(
          &ctx.config,
          DebugTrace::LValue,
          "element_addr %{} = %{}, #{}",
          address.index(),
          base.index(),
          element.index
        );

        address
      },
    }
  }
}

/// A step resolved by calling accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalComponent {
  getter: ValueId,
  setter: ValueId,
  index: Option<ValueId>,
}

impl LogicalComponent {
  pub fn new(
    getter: Option<ValueId>,
    setter: Option<ValueId>,
    index: Option<ValueId>,
  ) -> Self {
    match (getter, setter) {
      (Some(getter), Some(setter)) => Self { getter, setter, index },
      _ => panic!("settable lvalue must have both getter and setter"),
    }
  }

  pub fn getter(&self) -> ValueId {
    self.getter
  }

  pub fn setter(&self) -> ValueId {
    self.setter
  }

  pub fn index(&self) -> Option<ValueId> {
    self.index
  }

  /// Call the getter on `base`. The result is returned at +1 without a cleanup.
  pub fn get(
    &self,
    ctx: &mut LoweringContext<'_>,
    base: Option<ValueId>,
    span: Span,
  ) -> ValueId {
    ctx.scoped(|ctx| {
      let thunk = ctx.partial_apply_accessor(self.getter, base, self.index, span);
      let callee = thunk.forward(ctx);
      let result_ty = ctx.applied_result_type(callee);
      let value = ctx.fn_builder().create_apply(callee, Vec::new(), result_ty, span);

      trace_dbg!(&ctx.config, DebugTrace::LValue, "get %{} via %{}", value.index(), self.getter.index());
      value
    })
  }

  /// Call the setter on `base` with `value`, consuming it.
  pub fn set(
    &self,
    ctx: &mut LoweringContext<'_>,
    base: Option<ValueId>,
    value: ManagedValue,
    span: Span,
  ) {
    ctx.scoped(|ctx| {
      let thunk = ctx.partial_apply_accessor(self.setter, base, self.index, span);
      let callee = thunk.forward(ctx);
      let value = value.forward(ctx);
      ctx.fn_builder().create_apply_void(callee, vec![value]);

      trace_dbg!(&ctx.config, DebugTrace::LValue, "set via %{}", self.setter.index());
    })
  }
}
