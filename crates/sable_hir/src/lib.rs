pub mod operation;

use std::collections::HashMap;

use sable_type::{Id, Store, definition::DefinitionId, span::Span, types::TypeId, value::LiteralValue};

pub type HIRId = Id<HIRNode>;

/// Typed expression and statement forms. Nodes that denote a location carry
/// an address type; `Load` turns such a node into the value stored there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HIRKind {
  // Lvalue forms
  /// Reference to a variable or to a global computed property.
  DeclRef(DefinitionId),
  /// `base.member` where `member` is a field of the base's record.
  MemberRef {
    base: HIRId,
    member: DefinitionId,
  },
  TupleElement {
    base: HIRId,
    index: u32,
  },
  /// `base[index]` through a subscript declaration; `base` is `None` for a global subscript.
  Subscript {
    base: Option<HIRId>,
    index: HIRId,
    decl: DefinitionId,
  },
  /// Explicit `&e` marking an lvalue passed by address.
  AddressOf(HIRId),
  Paren(HIRId),
  /// Changes the qualifiers of an address without changing the location.
  Requalify(HIRId),

  // Rvalue forms
  Literal(LiteralValue),
  Load(HIRId),
  Binary {
    operation: operation::BinaryOperation,
    left: HIRId,
    right: HIRId,
  },

  // Statement
  Let {
    name: DefinitionId,
    value: Option<HIRId>,
  },
  Assign {
    target: HIRId,
    value: HIRId,
  },
  Block {
    statements: Vec<HIRId>,
  },
  Return(Option<HIRId>),
  ExpressionStatement(HIRId),
}

impl HIRKind {
  /// Whether this form can head an lvalue path or wrap one.
  pub fn is_lvalue_form(&self) -> bool {
    matches!(
      self,
      HIRKind::DeclRef(_)
        | HIRKind::MemberRef { .. }
        | HIRKind::TupleElement { .. }
        | HIRKind::Subscript { .. }
        | HIRKind::AddressOf(_)
        | HIRKind::Paren(_)
        | HIRKind::Requalify(_)
    )
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HIRNode {
  pub kind: HIRKind,
  pub span: Span,
  pub type_id: TypeId,
}

#[derive(Debug, Clone)]
pub struct HIR {
  pub nodes: Store<HIRNode>,
  pub function_bodies: HashMap<DefinitionId, HIRId>,
  /// Functions in declaration order.
  pub items: Vec<DefinitionId>,
}

impl Default for HIR {
  fn default() -> Self {
    Self::new()
  }
}

impl HIR {
  pub fn new() -> Self {
    Self {
      nodes: Store::new(),
      function_bodies: HashMap::new(),
      items: Vec::new(),
    }
  }

  pub fn alloc(
    &mut self,
    node: HIRNode,
  ) -> HIRId {
    self.nodes.alloc(node)
  }

  pub fn get(
    &self,
    id: HIRId,
  ) -> &HIRNode {
    self.nodes.get(&id)
  }

  pub fn get_mut(
    &mut self,
    id: HIRId,
  ) -> &mut HIRNode {
    self.nodes.get_mut(&id)
  }

  /// Register a function and, when it has one, its body.
  pub fn add_item(
    &mut self,
    def_id: DefinitionId,
    body: Option<HIRId>,
  ) {
    if !self.items.contains(&def_id) {
      self.items.push(def_id);
    }

    if let Some(body) = body {
      self.function_bodies.insert(def_id, body);
    }
  }
}
