//! Lvalue paths.
//!
//! An lvalue expression is lowered to an [`LValue`]: the sequence of steps
//! that reach its storage, root first. Physical steps compute addresses.
//! Logical steps go through a getter/setter pair. A path is built once per
//! occurrence of the expression and consumed by a single load or store.

mod accessor;
mod build;
mod component;
mod eval;

pub use component::{LogicalComponent, PathComponent, PhysicalComponent};

/// An ordered access path, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LValue {
  components: Vec<PathComponent>,
}

impl LValue {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append the next step. Only the first step may be a root.
  pub fn push(
    &mut self,
    component: PathComponent,
  ) {
    if self.components.is_empty() {
      assert!(
        component.accepts_absent_base(),
        "lvalue path must start at a root, found {:?}",
        component
      );
    } else {
      assert!(
        !matches!(component, PathComponent::Physical(PhysicalComponent::Root { .. })),
        "var component must be root of lvalue path"
      );
    }

    self.components.push(component);
  }

  pub fn components(&self) -> &[PathComponent] {
    &self.components
  }

  pub fn len(&self) -> usize {
    self.components.len()
  }

  pub fn is_empty(&self) -> bool {
    self.components.is_empty()
  }

  pub fn last(&self) -> Option<&PathComponent> {
    self.components.last()
  }
}
