#![allow(dead_code)]

use sable_config::SableConfig;
use sable_hir::{HIR, HIRId, HIRKind, HIRNode, operation::BinaryOperation};
use sable_silgen::{LValue, LoweringContext, PathComponent, PhysicalComponent, lower_and_verify};
use sable_sir::{FunctionSir, Instr, SirModule, display::print_sir, verify::VerifyResult};
use sable_type::{
  definition::{
    Accessors, Definition, DefinitionId, DefinitionKind, DefinitionStore, FieldDefinition, FieldStorage,
    FunctionDefinition, PropertyDefinition, RecordDefinition, VariableDefinition,
  },
  span::Span,
  symbol::SymbolTable,
  types::{Qualifiers, TypeId, TypeStore},
  value::LiteralValue,
};

/// Getter and setter of a computed binding.
#[derive(Debug, Clone, Copy)]
pub struct Computed {
  pub decl: DefinitionId,
  pub getter: DefinitionId,
  pub setter: DefinitionId,
}

/// Hand-built type-checked program: definitions, types and HIR.
pub struct Fixture {
  pub types: TypeStore,
  pub defs: DefinitionStore,
  pub symbols: SymbolTable,
  pub hir: HIR,
}

impl Fixture {
  pub fn new() -> Self {
    Self {
      types: TypeStore::new(),
      defs: DefinitionStore::new(),
      symbols: SymbolTable::new(),
      hir: HIR::new(),
    }
  }

  pub fn context(&mut self) -> LoweringContext<'_> {
    LoweringContext::new(&self.hir, &mut self.types, &self.defs, &self.symbols, SableConfig::quiet())
  }

  pub fn lower(&mut self) -> (SirModule, VerifyResult) {
    lower_and_verify(&self.hir, &mut self.types, &self.defs, &self.symbols, Some(&SableConfig::quiet()))
  }

  pub fn print(
    &self,
    module: &SirModule,
  ) -> String {
    print_sir(module, &self.types, &self.defs, &self.symbols)
  }

  fn define(
    &mut self,
    name: &str,
    kind: DefinitionKind,
  ) -> DefinitionId {
    let name = self.symbols.intern(name);
    self.defs.alloc(Definition {
      kind,
      name,
      span: Span::default(),
    })
  }

  // === Definitions ===

  pub fn variable(
    &mut self,
    name: &str,
    type_id: TypeId,
    mutable: bool,
  ) -> DefinitionId {
    self.define(name, DefinitionKind::Variable(VariableDefinition { type_id, mutable }))
  }

  /// A function with a body, registered as an item.
  pub fn function(
    &mut self,
    name: &str,
    params: Vec<DefinitionId>,
    return_type: TypeId,
    body: HIRId,
  ) -> DefinitionId {
    let param_types = params.iter().map(|p| *self.defs.type_of(p)).collect();
    let type_id = self.types.function(param_types, return_type);
    let id = self.define(
      name,
      DefinitionKind::Function(FunctionDefinition {
        params,
        return_type,
        type_id,
        is_extern: false,
      }),
    );
    self.hir.add_item(id, Some(body));
    id
  }

  /// An accessor implemented elsewhere, with its full curried type.
  pub fn extern_function(
    &mut self,
    name: &str,
    type_id: TypeId,
  ) -> DefinitionId {
    let return_type = match self.types.function_parts(&type_id) {
      Some((_, ret)) => ret,
      None => panic!("extern `{}` needs a function type", name),
    };
    let id = self.define(
      name,
      DefinitionKind::Function(FunctionDefinition {
        params: Vec::new(),
        return_type,
        type_id,
        is_extern: true,
      }),
    );
    self.hir.add_item(id, None);
    id
  }

  pub fn record(
    &mut self,
    name: &str,
    fixed_layout: bool,
  ) -> (DefinitionId, TypeId) {
    let placeholder = self.types.error();
    let id = self.define(
      name,
      DefinitionKind::Record(RecordDefinition {
        type_id: placeholder,
        fields: Vec::new(),
        fixed_layout,
      }),
    );
    let ty = self.types.record(id);
    if let DefinitionKind::Record(rd) = &mut self.defs.get_mut(&id).kind {
      rd.type_id = ty;
    }
    (id, ty)
  }

  fn add_field(
    &mut self,
    record: DefinitionId,
    name: &str,
    type_id: TypeId,
    storage: FieldStorage,
    synthesized: Option<Accessors>,
  ) -> DefinitionId {
    let id = self.define(
      name,
      DefinitionKind::Field(FieldDefinition {
        owner: record,
        type_id,
        storage,
        synthesized,
      }),
    );
    if let DefinitionKind::Record(rd) = &mut self.defs.get_mut(&record).kind {
      rd.fields.push(id);
    }
    id
  }

  pub fn stored_field(
    &mut self,
    record: DefinitionId,
    name: &str,
    type_id: TypeId,
  ) -> DefinitionId {
    self.add_field(record, name, type_id, FieldStorage::Stored, None)
  }

  /// A stored field of a record without fixed layout, reached through
  /// synthesized accessors.
  pub fn resilient_field(
    &mut self,
    record: DefinitionId,
    name: &str,
    type_id: TypeId,
  ) -> Computed {
    let (getter, setter) = self.member_accessors(record, name, None, type_id);
    let decl = self.add_field(
      record,
      name,
      type_id,
      FieldStorage::Stored,
      Some(Accessors::new(getter, setter)),
    );
    Computed { decl, getter, setter }
  }

  /// A computed field: `get`/`set` of type `(&R) -> () -> T` and `(&R) -> (T) -> ()`.
  pub fn computed_field(
    &mut self,
    record: DefinitionId,
    name: &str,
    type_id: TypeId,
  ) -> Computed {
    let (getter, setter) = self.member_accessors(record, name, None, type_id);
    let decl = self.add_field(
      record,
      name,
      type_id,
      FieldStorage::Computed(Accessors::new(getter, setter)),
      None,
    );
    Computed { decl, getter, setter }
  }

  /// A computed field with only a getter.
  pub fn read_only_field(
    &mut self,
    record: DefinitionId,
    name: &str,
    type_id: TypeId,
  ) -> DefinitionId {
    let (getter, _) = self.member_accessors(record, name, None, type_id);
    self.add_field(
      record,
      name,
      type_id,
      FieldStorage::Computed(Accessors::read_only(getter)),
      None,
    )
  }

  /// A global computed property: `() -> T` and `(T) -> ()`.
  pub fn global_property(
    &mut self,
    name: &str,
    type_id: TypeId,
  ) -> Computed {
    let unit = self.types.unit();
    let getter_ty = self.types.function(Vec::new(), type_id);
    let setter_ty = self.types.function(vec![type_id], unit);
    let getter = self.extern_function(&format!("{}.get", name), getter_ty);
    let setter = self.extern_function(&format!("{}.set", name), setter_ty);

    let decl = self.define(
      name,
      DefinitionKind::Property(PropertyDefinition {
        type_id,
        owner: None,
        index_type: None,
        accessors: Accessors::new(getter, setter),
      }),
    );
    Computed { decl, getter, setter }
  }

  /// An indexed property. With an owner the accessors take the receiver
  /// first, then the index.
  pub fn subscript(
    &mut self,
    owner: Option<DefinitionId>,
    name: &str,
    index_type: TypeId,
    type_id: TypeId,
  ) -> Computed {
    let (getter, setter) = match owner {
      Some(record) => self.member_accessors(record, name, Some(index_type), type_id),
      None => {
        let unit = self.types.unit();
        let get_inner = self.types.function(Vec::new(), type_id);
        let set_inner = self.types.function(vec![type_id], unit);
        let getter_ty = self.types.function(vec![index_type], get_inner);
        let setter_ty = self.types.function(vec![index_type], set_inner);
        (
          self.extern_function(&format!("{}.get", name), getter_ty),
          self.extern_function(&format!("{}.set", name), setter_ty),
        )
      },
    };

    let decl = self.define(
      name,
      DefinitionKind::Property(PropertyDefinition {
        type_id,
        owner,
        index_type: Some(index_type),
        accessors: Accessors::new(getter, setter),
      }),
    );
    Computed { decl, getter, setter }
  }

  fn member_accessors(
    &mut self,
    record: DefinitionId,
    name: &str,
    index_type: Option<TypeId>,
    type_id: TypeId,
  ) -> (DefinitionId, DefinitionId) {
    let unit = self.types.unit();
    let record_ty = self.types.record(record);
    let receiver = self.types.address(record_ty, Qualifiers::mutable());

    let mut getter_ty = self.types.function(Vec::new(), type_id);
    let mut setter_ty = self.types.function(vec![type_id], unit);
    if let Some(index_type) = index_type {
      getter_ty = self.types.function(vec![index_type], getter_ty);
      setter_ty = self.types.function(vec![index_type], setter_ty);
    }
    getter_ty = self.types.function(vec![receiver], getter_ty);
    setter_ty = self.types.function(vec![receiver], setter_ty);

    let record_name = self.symbols.get(&self.defs.get(&record).name).to_string();
    (
      self.extern_function(&format!("{}.{}.get", record_name, name), getter_ty),
      self.extern_function(&format!("{}.{}.set", record_name, name), setter_ty),
    )
  }

  // === HIR ===

  pub fn node(
    &mut self,
    kind: HIRKind,
    type_id: TypeId,
  ) -> HIRId {
    self.hir.alloc(HIRNode {
      kind,
      span: Span::default(),
      type_id,
    })
  }

  fn type_of_node(
    &self,
    id: HIRId,
  ) -> TypeId {
    self.hir.get(id).type_id
  }

  fn qualifiers_of(
    &self,
    id: HIRId,
  ) -> Qualifiers {
    self
      .types
      .address_parts(&self.type_of_node(id))
      .map(|(_, q)| q)
      .unwrap_or(Qualifiers::mutable())
  }

  pub fn decl_ref(
    &mut self,
    def: DefinitionId,
  ) -> HIRId {
    let inner = *self.defs.type_of(&def);
    let qualifiers = match &self.defs.get(&def).kind {
      DefinitionKind::Variable(v) => Qualifiers {
        mutable: v.mutable,
        aliased: false,
      },
      _ => Qualifiers::mutable(),
    };
    let ty = self.types.address(inner, qualifiers);
    self.node(HIRKind::DeclRef(def), ty)
  }

  pub fn member(
    &mut self,
    base: HIRId,
    member: DefinitionId,
  ) -> HIRId {
    let inner = *self.defs.type_of(&member);
    let qualifiers = self.qualifiers_of(base);
    let ty = self.types.address(inner, qualifiers);
    self.node(HIRKind::MemberRef { base, member }, ty)
  }

  pub fn tuple_element(
    &mut self,
    base: HIRId,
    index: u32,
  ) -> HIRId {
    let tuple_ty = self.types.rvalue_type(&self.type_of_node(base));
    let inner = match self.types.get(&tuple_ty) {
      sable_type::types::Type::Tuple(elements) => elements[index as usize],
      other => panic!("tuple element of non-tuple {:?}", other),
    };
    let qualifiers = self.qualifiers_of(base);
    let ty = self.types.address(inner, qualifiers);
    self.node(HIRKind::TupleElement { base, index }, ty)
  }

  pub fn subscript_ref(
    &mut self,
    base: Option<HIRId>,
    index: HIRId,
    decl: DefinitionId,
  ) -> HIRId {
    let inner = *self.defs.type_of(&decl);
    let ty = self.types.address(inner, Qualifiers::mutable());
    self.node(HIRKind::Subscript { base, index, decl }, ty)
  }

  pub fn paren(
    &mut self,
    sub: HIRId,
  ) -> HIRId {
    let ty = self.type_of_node(sub);
    self.node(HIRKind::Paren(sub), ty)
  }

  pub fn address_of(
    &mut self,
    sub: HIRId,
  ) -> HIRId {
    let ty = self.type_of_node(sub);
    self.node(HIRKind::AddressOf(sub), ty)
  }

  pub fn requalify(
    &mut self,
    sub: HIRId,
    qualifiers: Qualifiers,
  ) -> HIRId {
    let inner = self.types.rvalue_type(&self.type_of_node(sub));
    let ty = self.types.address(inner, qualifiers);
    self.node(HIRKind::Requalify(sub), ty)
  }

  pub fn int(
    &mut self,
    value: i64,
  ) -> HIRId {
    let ty = self.types.i32();
    self.node(HIRKind::Literal(LiteralValue::Int(value)), ty)
  }

  pub fn string(
    &mut self,
    value: &str,
  ) -> HIRId {
    let ty = self.types.string();
    self.node(HIRKind::Literal(LiteralValue::String(value.to_string())), ty)
  }

  pub fn load(
    &mut self,
    lvalue: HIRId,
  ) -> HIRId {
    let ty = self.types.rvalue_type(&self.type_of_node(lvalue));
    self.node(HIRKind::Load(lvalue), ty)
  }

  pub fn binary(
    &mut self,
    operation: BinaryOperation,
    left: HIRId,
    right: HIRId,
  ) -> HIRId {
    let ty = if operation.is_comparison() {
      self.types.boolean()
    } else {
      self.type_of_node(left)
    };
    self.node(HIRKind::Binary { operation, left, right }, ty)
  }

  pub fn let_(
    &mut self,
    name: DefinitionId,
    value: Option<HIRId>,
  ) -> HIRId {
    let unit = self.types.unit();
    self.node(HIRKind::Let { name, value }, unit)
  }

  pub fn assign(
    &mut self,
    target: HIRId,
    value: HIRId,
  ) -> HIRId {
    let unit = self.types.unit();
    self.node(HIRKind::Assign { target, value }, unit)
  }

  pub fn block(
    &mut self,
    statements: Vec<HIRId>,
  ) -> HIRId {
    let unit = self.types.unit();
    self.node(HIRKind::Block { statements }, unit)
  }

  pub fn ret(
    &mut self,
    value: Option<HIRId>,
  ) -> HIRId {
    let unit = self.types.unit();
    self.node(HIRKind::Return(value), unit)
  }

  pub fn expr_stmt(
    &mut self,
    expr: HIRId,
  ) -> HIRId {
    let unit = self.types.unit();
    self.node(HIRKind::ExpressionStatement(expr), unit)
  }

  /// An empty `fn name() -> ()` to lower statements into by hand.
  pub fn scratch_function(
    &mut self,
    name: &str,
  ) -> DefinitionId {
    let body = self.block(Vec::new());
    let unit = self.types.unit();
    self.function(name, Vec::new(), unit, body)
  }
}

/// A path with accessor references and roots replaced by what they name,
/// so two builds of the same expression compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
  Root(u32),
  Field(u32),
  Logical {
    getter: DefinitionId,
    setter: DefinitionId,
    indexed: bool,
  },
}

pub fn shape(
  func: &FunctionSir,
  lv: &LValue,
) -> Vec<Step> {
  lv.components()
    .iter()
    .map(|component| match component {
      PathComponent::Physical(PhysicalComponent::Root { address }) => Step::Root(address.index()),
      PathComponent::Physical(PhysicalComponent::FragileField(element)) => Step::Field(element.index),
      PathComponent::Logical(logical) => Step::Logical {
        getter: referenced_function(func, logical.getter()),
        setter: referenced_function(func, logical.setter()),
        indexed: logical.index().is_some(),
      },
    })
    .collect()
}

/// The function a `function_ref` value names.
pub fn referenced_function(
  func: &FunctionSir,
  value: sable_sir::ValueId,
) -> DefinitionId {
  match func.definition_of(value) {
    Some(Instr::FunctionRef { function, .. }) => *function,
    other => panic!("%{} is not a function_ref: {:?}", value.index(), other),
  }
}

/// Applies in order, as (callee, args).
pub fn applies(func: &FunctionSir) -> Vec<(sable_sir::ValueId, Vec<sable_sir::ValueId>)> {
  func
    .instructions
    .iter()
    .filter_map(|instr| match instr {
      Instr::Apply { callee, args, .. } => Some((*callee, args.clone())),
      _ => None,
    })
    .collect()
}

pub fn count(
  func: &FunctionSir,
  pred: impl Fn(&Instr) -> bool,
) -> usize {
  func.count(pred)
}
