use crate::{Id, Store, span::Span, symbol::SymbolId, types::TypeId};

pub type DefinitionId = Id<Definition>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
  pub kind: DefinitionKind,
  pub name: SymbolId,
  pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionKind {
  Function(FunctionDefinition),
  Variable(VariableDefinition),
  /// A computed binding outside any record layout: a global computed
  /// property or a subscript.
  Property(PropertyDefinition),
  Record(RecordDefinition),
  Field(FieldDefinition),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionDefinition {
  pub params: Vec<DefinitionId>,
  pub return_type: TypeId,
  /// Full procedure type; curried for accessors.
  pub type_id: TypeId,
  pub is_extern: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableDefinition {
  pub type_id: TypeId,
  pub mutable: bool,
}

/// Getter/setter function definitions of a computed binding. A read-only
/// binding has no setter; the type checker keeps those out of lvalue positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Accessors {
  pub getter: Option<DefinitionId>,
  pub setter: Option<DefinitionId>,
}

impl Accessors {
  pub fn new(
    getter: DefinitionId,
    setter: DefinitionId,
  ) -> Self {
    Self {
      getter: Some(getter),
      setter: Some(setter),
    }
  }

  pub fn read_only(getter: DefinitionId) -> Self {
    Self {
      getter: Some(getter),
      setter: None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyDefinition {
  pub type_id: TypeId,
  /// Record the property is declared on; `None` for globals.
  pub owner: Option<DefinitionId>,
  /// Index parameter type for subscripts.
  pub index_type: Option<TypeId>,
  pub accessors: Accessors,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordDefinition {
  pub type_id: TypeId,
  /// Field definitions in declaration order.
  pub fields: Vec<DefinitionId>,
  /// Stored fields sit at statically known offsets. When false every field
  /// goes through accessors.
  pub fixed_layout: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldStorage {
  Stored,
  Computed(Accessors),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDefinition {
  pub owner: DefinitionId,
  pub type_id: TypeId,
  pub storage: FieldStorage,
  /// Accessors synthesized for a stored field, used when the owner's layout is not fixed.
  pub synthesized: Option<Accessors>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionStore {
  definitions: Store<Definition>,
}

impl DefinitionStore {
  pub fn new() -> Self {
    Self {
      definitions: Store::new(),
    }
  }

  pub fn alloc(
    &mut self,
    def: Definition,
  ) -> DefinitionId {
    self.definitions.alloc(def)
  }

  pub fn get(
    &self,
    id: &DefinitionId,
  ) -> &Definition {
    self.definitions.get(id)
  }

  pub fn get_mut(
    &mut self,
    id: &DefinitionId,
  ) -> &mut Definition {
    self.definitions.get_mut(id)
  }

  pub fn type_of(
    &self,
    id: &DefinitionId,
  ) -> &TypeId {
    match &self.get(id).kind {
      DefinitionKind::Function(f) => &f.type_id,
      DefinitionKind::Variable(v) => &v.type_id,
      DefinitionKind::Property(p) => &p.type_id,
      DefinitionKind::Record(r) => &r.type_id,
      DefinitionKind::Field(f) => &f.type_id,
    }
  }

  pub fn is_mutable(
    &self,
    id: &DefinitionId,
  ) -> bool {
    match &self.get(id).kind {
      DefinitionKind::Variable(v) => v.mutable,
      _ => false,
    }
  }

  /// Stored fields of a record in layout order.
  pub fn stored_fields(
    &self,
    record: &DefinitionId,
  ) -> Vec<DefinitionId> {
    match &self.get(record).kind {
      DefinitionKind::Record(rd) => rd
        .fields
        .iter()
        .copied()
        .filter(|f| matches!(&self.get(f).kind, DefinitionKind::Field(fd) if fd.storage == FieldStorage::Stored))
        .collect(),
      _ => Vec::new(),
    }
  }

  pub fn get_all(&self) -> &[Definition] {
    self.definitions.get_all()
  }

  pub fn iter(&self) -> impl Iterator<Item = (DefinitionId, &Definition)> {
    self.definitions.iter()
  }
}

impl Default for DefinitionStore {
  fn default() -> Self {
    Self::new()
  }
}
