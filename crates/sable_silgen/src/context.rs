use std::collections::HashMap;

use sable_config::{DebugTrace, SableConfig};
use sable_hir::{HIR, HIRId};
use sable_log::{log_dbg, trace_dbg};
use sable_sir::{FunctionBuilder, FunctionSir, SirModule, Terminator, ValueId};
use sable_type::{
  definition::{Accessors, DefinitionId, DefinitionKind, DefinitionStore},
  span::Span,
  symbol::SymbolTable,
  types::{Qualifiers, TypeId, TypeStore},
};

use crate::{
  cleanup::{CleanupHandle, CleanupKind, CleanupStack},
  managed::ManagedValue,
  type_info::TypeInfo,
};

/// How a declaration's storage is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclStorage {
  /// Bound to an address in the current function.
  Stored,
  /// Reached through getter and setter calls.
  Computed(Accessors),
}

/// Context for lowering HIR to SIR.
pub struct LoweringContext<'a> {
  /// The HIR being lowered.
  pub(crate) hir: &'a HIR,
  /// Type store from analysis (mutable for derived address types).
  pub(crate) types: &'a mut TypeStore,
  /// Definition store from analysis.
  pub(crate) defs: &'a DefinitionStore,
  /// Symbol table for function names.
  pub(crate) symbols: &'a SymbolTable,
  pub(crate) config: SableConfig,

  /// The SIR module being built.
  module: SirModule,

  /// Current function being lowered.
  current_fn: Option<FunctionBuilder>,

  /// Stack slots of variables and parameters in the current function.
  pub(crate) def_to_address: HashMap<DefinitionId, ValueId>,

  pub(crate) cleanups: CleanupStack,

  /// Slots of non-trivial variables declared without a value, with the
  /// dormant cleanup armed by their first write.
  pub(crate) uninitialized: HashMap<ValueId, CleanupHandle>,
}

impl<'a> LoweringContext<'a> {
  pub fn new(
    hir: &'a HIR,
    types: &'a mut TypeStore,
    defs: &'a DefinitionStore,
    symbols: &'a SymbolTable,
    config: SableConfig,
  ) -> Self {
    Self {
      hir,
      types,
      defs,
      symbols,
      config,
      module: SirModule::new(),
      current_fn: None,
      def_to_address: HashMap::new(),
      cleanups: CleanupStack::new(),
      uninitialized: HashMap::new(),
    }
  }

  /// Lower every item of the HIR.
  pub fn lower(mut self) -> SirModule {
    for &def_id in &self.hir.items {
      let is_extern = match &self.defs.get(&def_id).kind {
        DefinitionKind::Function(fd) => fd.is_extern,
        _ => continue,
      };

      if let Some(&body_id) = self.hir.function_bodies.get(&def_id) {
        self.lower_function(def_id, body_id);
      } else if is_extern {
        self.create_extern_function(def_id);
      }
    }

    self.module
  }

  fn lower_function(
    &mut self,
    def_id: DefinitionId,
    body_id: HIRId,
  ) {
    log_dbg!(&self.config, "lowering function {}", self.function_name(def_id));

    self.begin_function(def_id);

    let params = match &self.defs.get(&def_id).kind {
      DefinitionKind::Function(fd) => fd.params.clone(),
      _ => Vec::new(),
    };

    self.scoped(|ctx| {
      ctx.spill_params(&params);
      ctx.lower_statement(body_id);
    });

    self.ensure_return();

    let func = self.finish_function();
    self.module.functions.insert(def_id, func);
  }

  fn create_extern_function(
    &mut self,
    def_id: DefinitionId,
  ) {
    let (param_types, return_type) = self.signature(def_id);
    let span = self.defs.get(&def_id).span;
    let func = FunctionBuilder::new(def_id, self.function_name(def_id), &param_types, return_type, true, span).finish();
    self.module.functions.insert(def_id, func);
  }

  /// Start lowering into a fresh body for `def_id`.
  pub fn begin_function(
    &mut self,
    def_id: DefinitionId,
  ) {
    assert!(self.current_fn.is_none(), "function lowering already in progress");

    let (param_types, return_type) = self.signature(def_id);
    let span = self.defs.get(&def_id).span;

    trace_dbg!(&self.config, DebugTrace::Lowering, "begin {}", self.function_name(def_id));

    self.current_fn = Some(FunctionBuilder::new(
      def_id,
      self.function_name(def_id),
      &param_types,
      return_type,
      false,
      span,
    ));
    self.def_to_address.clear();
    self.cleanups = CleanupStack::new();
    self.uninitialized.clear();
  }

  /// Close every open scope and return the finished body.
  pub fn finish_function(&mut self) -> FunctionSir {
    self.pop_cleanups_to(0);

    let builder = self.current_fn.take().expect("no current function");
    trace_dbg!(
      &self.config,
      DebugTrace::Lowering,
      "finish {} ({} instructions)",
      self.function_name(builder.def_id()),
      builder.instructions().len()
    );
    builder.finish()
  }

  fn spill_params(
    &mut self,
    params: &[DefinitionId],
  ) {
    let values: Vec<ValueId> = self.current_function().params().to_vec();

    for (&param_id, &value) in params.iter().zip(values.iter()) {
      let ty = *self.defs.type_of(&param_id);
      let qualifiers = Qualifiers {
        mutable: self.defs.is_mutable(&param_id),
        aliased: false,
      };
      let span = self.defs.get(&param_id).span;

      let slot = self.alloc_slot(ty, qualifiers, span);
      self.fn_builder().create_store(value, slot);
      self.def_to_address.insert(param_id, slot);

      if !self.is_trivial(ty) {
        self.register_cleanup(CleanupKind::DestroyAddr, slot);
      }
    }
  }

  fn ensure_return(&mut self) {
    if self.current_function().is_terminated() {
      return;
    }

    let ret_ty = self.current_function().return_type();
    if self.types.is_unit(&ret_ty) {
      self.fn_builder().terminate(Terminator::Return(None));
    }
  }

  pub(crate) fn fn_builder(&mut self) -> &mut FunctionBuilder {
    self.current_fn.as_mut().expect("no current function")
  }

  /// The body being built.
  pub fn current_function(&self) -> &FunctionBuilder {
    self.current_fn.as_ref().expect("no current function")
  }

  pub fn types(&self) -> &TypeStore {
    &*self.types
  }

  pub fn cleanups(&self) -> &CleanupStack {
    &self.cleanups
  }

  pub fn type_info(&self) -> TypeInfo<'_> {
    TypeInfo::new(&*self.types, self.defs)
  }

  pub fn is_trivial(
    &self,
    ty: TypeId,
  ) -> bool {
    self.type_info().is_trivial(ty)
  }

  pub(crate) fn value_type(
    &self,
    value: ValueId,
  ) -> TypeId {
    self.current_function().value_type(value)
  }

  pub(crate) fn alloc_slot(
    &mut self,
    ty: TypeId,
    qualifiers: Qualifiers,
    span: Span,
  ) -> ValueId {
    let address_ty = self.types.address(ty, qualifiers);
    self.fn_builder().create_alloc_stack(ty, address_ty, span)
  }

  // === Cleanup scopes ===

  /// Run `f` in a cleanup scope: every cleanup it registers and does not
  /// forward is emitted, innermost first, when it returns.
  pub fn scoped<R>(
    &mut self,
    f: impl FnOnce(&mut Self) -> R,
  ) -> R {
    let depth = self.cleanups.depth();
    let result = f(self);
    self.pop_cleanups_to(depth);
    result
  }

  fn pop_cleanups_to(
    &mut self,
    depth: usize,
  ) {
    let pending = self.cleanups.pop_to(depth);

    if self.current_function().is_terminated() {
      assert!(
        pending.is_empty(),
        "{} cleanups left active after return",
        pending.len()
      );
      return;
    }

    for (kind, value) in pending {
      self.emit_cleanup(kind, value);
    }
  }

  /// Emit every active cleanup of the function, for a return.
  pub(crate) fn emit_all_cleanups(&mut self) {
    for (kind, value) in self.cleanups.take_all_active() {
      self.emit_cleanup(kind, value);
    }
  }

  fn emit_cleanup(
    &mut self,
    kind: CleanupKind,
    value: ValueId,
  ) {
    trace_dbg!(&self.config, DebugTrace::Ownership, "{:?} %{}", kind, value.index());

    match kind {
      CleanupKind::Release => self.fn_builder().create_release(value),
      CleanupKind::DestroyAddr => self.fn_builder().create_destroy_addr(value),
    }
  }

  pub(crate) fn register_cleanup(
    &mut self,
    kind: CleanupKind,
    value: ValueId,
  ) -> CleanupHandle {
    trace_dbg!(&self.config, DebugTrace::Ownership, "acquire %{} ({:?})", value.index(), kind);
    self.cleanups.push(kind, value)
  }

  /// Take ownership of a +1 value: non-trivial values get a release cleanup.
  pub fn emit_managed_rvalue_with_cleanup(
    &mut self,
    value: ValueId,
  ) -> ManagedValue {
    let ty = self.value_type(value);
    if self.is_trivial(ty) {
      return ManagedValue::unmanaged(value);
    }

    let handle = self.register_cleanup(CleanupKind::Release, value);
    ManagedValue::with_cleanup(value, handle)
  }

  /// Produce an extra reference to a borrowed value.
  pub(crate) fn emit_copy(
    &mut self,
    value: ValueId,
  ) -> ValueId {
    let ty = self.value_type(value);
    if !self.is_trivial(ty) {
      self.fn_builder().create_retain(value);
    }
    value
  }

  // === Declarations ===

  /// Whether `def` names storage bound to an address or a computed binding.
  pub fn decl_storage(
    &self,
    def: DefinitionId,
  ) -> DeclStorage {
    match &self.defs.get(&def).kind {
      DefinitionKind::Variable(_) => DeclStorage::Stored,
      DefinitionKind::Property(pd) => DeclStorage::Computed(pd.accessors),
      other => panic!(
        "declaration `{}` is not a storage binding: {:?}",
        self.symbols.get(&self.defs.get(&def).name),
        other
      ),
    }
  }

  /// The address bound to a stored declaration.
  pub fn emit_reference_to_decl(
    &self,
    def: DefinitionId,
  ) -> ValueId {
    match self.def_to_address.get(&def) {
      Some(&address) => address,
      None => panic!(
        "no storage bound for `{}` in the current function",
        self.symbols.get(&self.defs.get(&def).name)
      ),
    }
  }

  /// Reference a function by name. The reference is not owned.
  pub fn emit_constant_ref(
    &mut self,
    def: DefinitionId,
    span: Span,
  ) -> ManagedValue {
    let fn_ty = match &self.defs.get(&def).kind {
      DefinitionKind::Function(fd) => fd.type_id,
      other => panic!("constant reference to non-function declaration {:?}", other),
    };

    let value = self.fn_builder().create_function_ref(def, fn_ty, span);
    ManagedValue::unmanaged(value)
  }

  /// Bind a stored declaration to an address in the current function.
  pub fn bind_storage(
    &mut self,
    def: DefinitionId,
    address: ValueId,
  ) {
    assert!(
      self.types.is_address(&self.value_type(address)),
      "storage for `{}` must be an address",
      self.symbols.get(&self.defs.get(&def).name)
    );
    self.def_to_address.insert(def, address);
  }

  fn signature(
    &self,
    def_id: DefinitionId,
  ) -> (Vec<TypeId>, TypeId) {
    match &self.defs.get(&def_id).kind {
      DefinitionKind::Function(fd) => {
        let params = fd.params.iter().map(|p| *self.defs.type_of(p)).collect();
        (params, fd.return_type)
      },
      other => panic!("expected function definition, found {:?}", other),
    }
  }

  fn function_name(
    &self,
    def_id: DefinitionId,
  ) -> String {
    self.symbols.get(&self.defs.get(&def_id).name).to_string()
  }
}

/// Lower HIR to SIR.
pub fn lower_hir(
  hir: &HIR,
  types: &mut TypeStore,
  defs: &DefinitionStore,
  symbols: &SymbolTable,
  config: Option<&SableConfig>,
) -> SirModule {
  let config = config.cloned().unwrap_or_default();
  LoweringContext::new(hir, types, defs, symbols, config).lower()
}
