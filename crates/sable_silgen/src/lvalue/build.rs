use sable_config::DebugTrace;
use sable_hir::{HIRId, HIRKind};
use sable_log::trace_dbg;
use sable_sir::ValueId;
use sable_type::{
  definition::{Accessors, DefinitionId, DefinitionKind},
  span::Span,
};

use super::{LValue, LogicalComponent, PathComponent, PhysicalComponent};
use crate::{
  LoweringContext,
  context::DeclStorage,
  type_info::{FragileElement, MemberAccess},
};

impl<'a> LoweringContext<'a> {
  /// Build the access path of an lvalue expression.
  ///
  /// Panics if `hir_id` is not an lvalue form; the type checker only lets
  /// lvalue forms reach here.
  pub fn build_lvalue(
    &mut self,
    hir_id: HIRId,
  ) -> LValue {
    let hir = self.hir;
    let node = hir.get(hir_id);

    match &node.kind {
      HIRKind::DeclRef(def_id) => self.build_decl_ref(*def_id, node.span),
      HIRKind::MemberRef { base, member } => self.build_member_ref(*base, *member, node.span),
      HIRKind::TupleElement { base, index } => {
        let mut lv = self.build_lvalue(*base);
        let element = FragileElement {
          index: *index,
          type_id: self.types.rvalue_type(&node.type_id),
        };
        lv.push(PathComponent::Physical(PhysicalComponent::FragileField(element)));
        lv
      },
      HIRKind::Subscript { base, index, decl } => self.build_subscript(*base, *index, *decl, node.span),
      HIRKind::AddressOf(sub) | HIRKind::Paren(sub) => self.build_lvalue(*sub),
      HIRKind::Requalify(sub) => {
        assert!(
          self.types.is_address(&node.type_id),
          "non-lvalue requalify in lvalue expression"
        );
        self.build_lvalue(*sub)
      },
      other => panic!("unimplemented lvalue expression: {:?}", other),
    }
  }

  fn build_decl_ref(
    &mut self,
    def_id: DefinitionId,
    span: Span,
  ) -> LValue {
    let mut lv = LValue::new();

    match self.decl_storage(def_id) {
      DeclStorage::Stored => {
        let address = self.emit_reference_to_decl(def_id);
        assert!(
          self.types.is_address(&self.value_type(address)),
          "physical lvalue decl ref must evaluate to an address"
        );

        trace_dbg!(&self.config, DebugTrace::LValue, "root %{}", address.index());
        lv.push(PathComponent::Physical(PhysicalComponent::Root { address }));
      },
      DeclStorage::Computed(accessors) => {
        let component = self.logical_component(accessors, None, span);
        lv.push(PathComponent::Logical(component));
      },
    }

    lv
  }

  fn build_member_ref(
    &mut self,
    base: HIRId,
    member: DefinitionId,
    span: Span,
  ) -> LValue {
    let mut lv = self.build_lvalue(base);
    let base_ty = self.types.rvalue_type(&self.hir.get(base).type_id);

    match self.type_info().member_access(base_ty, member) {
      MemberAccess::Fragile(element) => {
        trace_dbg!(&self.config, DebugTrace::LValue, "fragile member #{}", element.index);
        lv.push(PathComponent::Physical(PhysicalComponent::FragileField(element)));
      },
      MemberAccess::Computed(accessors) => {
        let component = self.logical_component(accessors, None, span);
        lv.push(PathComponent::Logical(component));
      },
    }

    lv
  }

  fn build_subscript(
    &mut self,
    base: Option<HIRId>,
    index: HIRId,
    decl: DefinitionId,
    span: Span,
  ) -> LValue {
    let mut lv = match base {
      Some(base) => self.build_lvalue(base),
      None => LValue::new(),
    };

    let accessors = match &self.defs.get(&decl).kind {
      DefinitionKind::Property(pd) if pd.index_type.is_some() => pd.accessors,
      other => panic!("subscript through non-indexed declaration {:?}", other),
    };

    // Evaluated once, here. The path borrows it; the enclosing scope releases it.
    let index_value = self.lower_expression(index).value();

    let component = self.logical_component(accessors, Some(index_value), span);
    lv.push(PathComponent::Logical(component));
    lv
  }

  fn logical_component(
    &mut self,
    accessors: Accessors,
    index: Option<ValueId>,
    span: Span,
  ) -> LogicalComponent {
    let getter = accessors.getter.map(|def| self.emit_constant_ref(def, span).value());
    let setter = accessors.setter.map(|def| self.emit_constant_ref(def, span).value());

    trace_dbg!(&self.config, DebugTrace::LValue, "logical component, indexed: {}", index.is_some());
    LogicalComponent::new(getter, setter, index)
  }
}
