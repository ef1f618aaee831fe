use sable_type::{
  definition::{Accessors, DefinitionId, DefinitionKind, DefinitionStore, FieldStorage},
  types::{Type, TypeId, TypeStore},
};

/// A field at a statically known position within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragileElement {
  pub index: u32,
  pub type_id: TypeId,
}

/// How a member of a record is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberAccess {
  Fragile(FragileElement),
  Computed(Accessors),
}

/// Layout and ownership queries over the type and definition stores.
pub struct TypeInfo<'a> {
  types: &'a TypeStore,
  defs: &'a DefinitionStore,
}

impl<'a> TypeInfo<'a> {
  pub fn new(
    types: &'a TypeStore,
    defs: &'a DefinitionStore,
  ) -> Self {
    Self { types, defs }
  }

  /// Resolve `member` on a value of type `rvalue_ty`.
  pub fn member_access(
    &self,
    rvalue_ty: TypeId,
    member: DefinitionId,
  ) -> MemberAccess {
    if let Some(element) = self.fragile_element(rvalue_ty, member) {
      return MemberAccess::Fragile(element);
    }

    match &self.defs.get(&member).kind {
      DefinitionKind::Field(fd) => match fd.storage {
        FieldStorage::Computed(accessors) => MemberAccess::Computed(accessors),
        FieldStorage::Stored => MemberAccess::Computed(fd.synthesized.unwrap_or_default()),
      },
      DefinitionKind::Property(pd) => MemberAccess::Computed(pd.accessors),
      other => panic!("member reference to non-member declaration {:?}", other),
    }
  }

  /// The fixed position of `member` if it is a stored field of a record
  /// with fixed layout.
  pub fn fragile_element(
    &self,
    rvalue_ty: TypeId,
    member: DefinitionId,
  ) -> Option<FragileElement> {
    let record = match self.types.get(&rvalue_ty) {
      Type::Record(record) => *record,
      _ => return None,
    };

    let field = match &self.defs.get(&member).kind {
      DefinitionKind::Field(fd) => fd,
      _ => return None,
    };

    assert!(
      field.owner == record,
      "field {:?} is not a member of record {:?}",
      member,
      record
    );

    let fixed = matches!(&self.defs.get(&record).kind, DefinitionKind::Record(rd) if rd.fixed_layout);
    if !fixed || field.storage != FieldStorage::Stored {
      return None;
    }

    let index = self.defs.stored_fields(&record).iter().position(|f| *f == member)?;

    Some(FragileElement {
      index: index as u32,
      type_id: field.type_id,
    })
  }

  /// Whether copies of a `ty` value need no retain and no release.
  pub fn is_trivial(
    &self,
    ty: TypeId,
  ) -> bool {
    match self.types.get(&ty) {
      Type::I32 | Type::I64 | Type::F64 | Type::Boolean | Type::Error => true,
      Type::Address { .. } => true,
      Type::String | Type::Function { .. } => false,
      Type::Tuple(elements) => elements.iter().all(|e| self.is_trivial(*e)),
      Type::Record(record) => {
        let fixed = matches!(&self.defs.get(record).kind, DefinitionKind::Record(rd) if rd.fixed_layout);
        fixed
          && self
            .defs
            .stored_fields(record)
            .iter()
            .all(|f| self.is_trivial(*self.defs.type_of(f)))
      },
    }
  }
}
