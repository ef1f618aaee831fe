use sable_sir::ValueId;

use crate::{LoweringContext, cleanup::CleanupHandle};

/// A value paired with the cleanup that releases it.
///
/// Move-only: either [`ManagedValue::forward`] hands ownership to an
/// instruction, or the cleanup fires when the enclosing scope ends.
/// Trivial and borrowed values carry no cleanup.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub struct ManagedValue {
  value: ValueId,
  cleanup: Option<CleanupHandle>,
}

impl ManagedValue {
  pub fn unmanaged(value: ValueId) -> Self {
    Self { value, cleanup: None }
  }

  pub(crate) fn with_cleanup(
    value: ValueId,
    cleanup: CleanupHandle,
  ) -> Self {
    Self {
      value,
      cleanup: Some(cleanup),
    }
  }

  /// The underlying value, without transferring ownership.
  pub fn value(&self) -> ValueId {
    self.value
  }

  pub fn has_cleanup(&self) -> bool {
    self.cleanup.is_some()
  }

  /// Give up ownership: the cleanup is deactivated and the caller becomes
  /// responsible for consuming the value.
  pub fn forward(
    self,
    ctx: &mut LoweringContext<'_>,
  ) -> ValueId {
    if let Some(handle) = self.cleanup {
      ctx.cleanups.forward(handle);
    }
    self.value
  }
}
