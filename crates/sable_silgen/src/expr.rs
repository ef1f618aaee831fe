use sable_hir::{HIRId, HIRKind, operation::BinaryOperation};
use sable_type::{span::Span, types::TypeId, value::LiteralValue};

use crate::{LoweringContext, managed::ManagedValue};

impl<'a> LoweringContext<'a> {
  /// Lower an rvalue expression. The result is owned by the caller.
  pub fn lower_expression(
    &mut self,
    hir_id: HIRId,
  ) -> ManagedValue {
    let hir = self.hir;
    let node = hir.get(hir_id);

    match &node.kind {
      HIRKind::Literal(lit) => self.lower_literal(lit, node.type_id, node.span),
      HIRKind::Load(sub) => {
        let lv = self.build_lvalue(*sub);
        self.load_lvalue(&lv, node.span)
      },
      HIRKind::Binary { operation, left, right } => {
        self.lower_binary(*operation, *left, *right, node.type_id, node.span)
      },
      HIRKind::Paren(sub) if !self.types.is_address(&node.type_id) => self.lower_expression(*sub),
      kind if kind.is_lvalue_form() => panic!("lvalue expression used as an rvalue without a load: {:?}", kind),
      other => panic!("expected expression, found {:?}", other),
    }
  }

  fn lower_literal(
    &mut self,
    lit: &LiteralValue,
    ty: TypeId,
    span: Span,
  ) -> ManagedValue {
    let value = self.fn_builder().create_literal(lit.clone(), ty, span);
    self.emit_managed_rvalue_with_cleanup(value)
  }

  fn lower_binary(
    &mut self,
    op: BinaryOperation,
    left: HIRId,
    right: HIRId,
    result_ty: TypeId,
    span: Span,
  ) -> ManagedValue {
    let left = self.lower_expression(left);
    let right = self.lower_expression(right);

    let value = self
      .fn_builder()
      .create_binary(op, left.value(), right.value(), result_ty, span);

    ManagedValue::unmanaged(value)
  }
}
