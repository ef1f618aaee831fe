use std::collections::HashMap;

use crate::{Id, Store, definition::DefinitionId};

pub type TypeId = Id<Type>;

/// Annotations carried by an address type. Derived addresses keep the
/// qualifiers of the address they were computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Qualifiers {
  pub mutable: bool,
  /// The address may be reached through another name.
  pub aliased: bool,
}

impl Qualifiers {
  pub const fn mutable() -> Self {
    Self {
      mutable: true,
      aliased: false,
    }
  }

  pub const fn immutable() -> Self {
    Self {
      mutable: false,
      aliased: false,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
  I32,
  I64,
  F64,
  Boolean,
  String,

  /// The type of an lvalue: the address of a value of type `inner`.
  Address {
    inner: TypeId,
    qualifiers: Qualifiers,
  },
  /// `Tuple(vec![])` is the unit type.
  Tuple(Vec<TypeId>),
  Record(DefinitionId),

  /// A procedure taking one argument list. Accessors are curried chains of these.
  Function {
    params: Vec<TypeId>,
    ret: TypeId,
  },

  Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AddressKey {
  inner: TypeId,
  qualifiers: Qualifiers,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FunctionKey {
  params: Vec<TypeId>,
  ret: TypeId,
}

#[derive(Debug, Clone)]
pub struct TypeStore {
  types: Store<Type>,
  primitives: HashMap<Type, TypeId>,
  addresses: HashMap<AddressKey, TypeId>,
  tuples: HashMap<Vec<TypeId>, TypeId>,
  records: HashMap<DefinitionId, TypeId>,
  functions: HashMap<FunctionKey, TypeId>,
}

impl TypeStore {
  pub fn new() -> Self {
    let mut store = Self {
      types: Store::new(),
      primitives: HashMap::new(),
      addresses: HashMap::new(),
      tuples: HashMap::new(),
      records: HashMap::new(),
      functions: HashMap::new(),
    };
    store.init_primitives();
    store
  }

  fn init_primitives(&mut self) {
    let primitives = [Type::I32, Type::I64, Type::F64, Type::Boolean, Type::String, Type::Error];

    for ty in primitives {
      let id = self.types.alloc(ty.clone());
      self.primitives.insert(ty, id);
    }

    self.tuple(Vec::new());
  }

  pub fn address(
    &mut self,
    inner: TypeId,
    qualifiers: Qualifiers,
  ) -> TypeId {
    let key = AddressKey { inner, qualifiers };
    if let Some(&id) = self.addresses.get(&key) {
      return id;
    }
    let id = self.types.alloc(Type::Address { inner, qualifiers });
    self.addresses.insert(key, id);
    id
  }

  pub fn tuple(
    &mut self,
    elements: Vec<TypeId>,
  ) -> TypeId {
    if let Some(&id) = self.tuples.get(&elements) {
      return id;
    }
    let id = self.types.alloc(Type::Tuple(elements.clone()));
    self.tuples.insert(elements, id);
    id
  }

  pub fn record(
    &mut self,
    def: DefinitionId,
  ) -> TypeId {
    if let Some(&id) = self.records.get(&def) {
      return id;
    }
    let id = self.types.alloc(Type::Record(def));
    self.records.insert(def, id);
    id
  }

  pub fn function(
    &mut self,
    params: Vec<TypeId>,
    ret: TypeId,
  ) -> TypeId {
    let key = FunctionKey {
      params: params.clone(),
      ret,
    };
    if let Some(&id) = self.functions.get(&key) {
      return id;
    }
    let id = self.types.alloc(Type::Function { params, ret });
    self.functions.insert(key, id);
    id
  }

  #[inline]
  pub fn get(
    &self,
    id: &TypeId,
  ) -> &Type {
    self.types.get(id)
  }

  #[inline]
  pub fn i32(&self) -> TypeId {
    self.primitives[&Type::I32]
  }
  #[inline]
  pub fn i64(&self) -> TypeId {
    self.primitives[&Type::I64]
  }
  #[inline]
  pub fn f64(&self) -> TypeId {
    self.primitives[&Type::F64]
  }
  #[inline]
  pub fn boolean(&self) -> TypeId {
    self.primitives[&Type::Boolean]
  }
  #[inline]
  pub fn string(&self) -> TypeId {
    self.primitives[&Type::String]
  }
  #[inline]
  pub fn error(&self) -> TypeId {
    self.primitives[&Type::Error]
  }

  #[inline]
  pub fn unit(&self) -> TypeId {
    self.tuples[&Vec::new()]
  }

  #[inline]
  pub fn is_address(
    &self,
    ty: &TypeId,
  ) -> bool {
    matches!(self.get(ty), Type::Address { .. })
  }

  /// Splits an address type into its pointee and qualifiers.
  pub fn address_parts(
    &self,
    ty: &TypeId,
  ) -> Option<(TypeId, Qualifiers)> {
    match self.get(ty) {
      Type::Address { inner, qualifiers } => Some((*inner, *qualifiers)),
      _ => None,
    }
  }

  /// The type of the value stored at an address; non-address types are returned unchanged.
  pub fn rvalue_type(
    &self,
    ty: &TypeId,
  ) -> TypeId {
    match self.get(ty) {
      Type::Address { inner, .. } => *inner,
      _ => *ty,
    }
  }

  pub fn function_parts(
    &self,
    ty: &TypeId,
  ) -> Option<(&[TypeId], TypeId)> {
    match self.get(ty) {
      Type::Function { params, ret } => Some((params.as_slice(), *ret)),
      _ => None,
    }
  }

  pub fn is_unit(
    &self,
    ty: &TypeId,
  ) -> bool {
    matches!(self.get(ty), Type::Tuple(elements) if elements.is_empty())
  }
}

impl Default for TypeStore {
  fn default() -> Self {
    Self::new()
  }
}
