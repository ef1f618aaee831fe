use sable_config::DebugTrace;
use sable_hir::{HIRId, HIRKind};
use sable_log::{log_trc, trace_dbg};
use sable_sir::Terminator;
use sable_type::{definition::DefinitionId, span::Span, types::Qualifiers};

use crate::{LoweringContext, cleanup::CleanupKind};

impl<'a> LoweringContext<'a> {
  pub fn lower_statement(
    &mut self,
    hir_id: HIRId,
  ) {
    let hir = self.hir;
    let node = hir.get(hir_id);
    log_trc!(&self.config, "statement {:?}", node.kind);

    match &node.kind {
      HIRKind::Let { name, value } => self.lower_let(*name, *value, node.span),
      HIRKind::Assign { target, value } => {
        // Source first, then the destination path.
        let value = self.lower_expression(*value);
        let lv = self.build_lvalue(*target);
        self.store_lvalue(&lv, value, node.span);
      },
      HIRKind::Block { statements } => self.lower_block(statements),
      HIRKind::Return(value) => self.lower_return(*value),
      HIRKind::ExpressionStatement(expr) => {
        // Released when the enclosing scope ends.
        let _ = self.lower_expression(*expr);
      },
      other => panic!("expected statement, found {:?}", other),
    }
  }

  fn lower_let(
    &mut self,
    name: DefinitionId,
    value: Option<HIRId>,
    span: Span,
  ) {
    let ty = *self.defs.type_of(&name);
    let qualifiers = Qualifiers {
      mutable: self.defs.is_mutable(&name),
      aliased: false,
    };

    let slot = self.alloc_slot(ty, qualifiers, span);

    match value {
      Some(value) => {
        let value = self.lower_expression(value);
        let value = value.forward(self);
        self.fn_builder().create_store(value, slot);

        if !self.is_trivial(ty) {
          self.register_cleanup(CleanupKind::DestroyAddr, slot);
        }
      },
      None if !self.is_trivial(ty) => {
        let handle = self.cleanups.push_dormant(CleanupKind::DestroyAddr, slot);
        self.uninitialized.insert(slot, handle);
      },
      None => {},
    }

    self.bind_storage(name, slot);
  }

  fn lower_block(
    &mut self,
    statements: &[HIRId],
  ) {
    self.scoped(|ctx| {
      for &stmt in statements {
        if ctx.current_function().is_terminated() {
          trace_dbg!(&ctx.config, DebugTrace::Lowering, "skipping unreachable statements after return");
          break;
        }
        ctx.lower_statement(stmt);
      }
    });
  }

  fn lower_return(
    &mut self,
    value: Option<HIRId>,
  ) {
    let value = value.map(|v| {
      let managed = self.lower_expression(v);
      managed.forward(self)
    });

    self.emit_all_cleanups();
    self.fn_builder().terminate(Terminator::Return(value));
  }
}
