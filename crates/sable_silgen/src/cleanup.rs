use sable_sir::ValueId;

/// What to emit when a cleanup fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanupKind {
  /// Drop one reference to an owned value.
  Release,
  /// Destroy the contents of a stack temporary.
  DestroyAddr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CleanupState {
  /// Registered for storage that is not yet initialized.
  Dormant,
  Active,
  /// Ownership moved into an instruction; nothing to emit.
  Forwarded,
  Emitted,
}

#[derive(Debug, Clone, Copy)]
struct Cleanup {
  kind: CleanupKind,
  value: ValueId,
  state: CleanupState,
}

/// Handle to a registered cleanup, held by the `ManagedValue` that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CleanupHandle(usize);

/// Counters over the lifetime of a stack. Every acquired cleanup ends up
/// either forwarded or emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupStats {
  pub acquired: usize,
  pub forwarded: usize,
  pub emitted: usize,
}

impl CleanupStats {
  pub fn resolved(&self) -> usize {
    self.forwarded + self.emitted
  }

  /// Counts accumulated since `earlier` was taken.
  pub fn since(
    &self,
    earlier: &CleanupStats,
  ) -> CleanupStats {
    CleanupStats {
      acquired: self.acquired - earlier.acquired,
      forwarded: self.forwarded - earlier.forwarded,
      emitted: self.emitted - earlier.emitted,
    }
  }
}

/// Pending cleanups of the function being lowered, innermost last.
#[derive(Debug, Default)]
pub struct CleanupStack {
  entries: Vec<Cleanup>,
  stats: CleanupStats,
}

impl CleanupStack {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn depth(&self) -> usize {
    self.entries.len()
  }

  pub fn stats(&self) -> CleanupStats {
    self.stats
  }

  pub fn active_count(&self) -> usize {
    self.entries.iter().filter(|c| c.state == CleanupState::Active).count()
  }

  pub fn push(
    &mut self,
    kind: CleanupKind,
    value: ValueId,
  ) -> CleanupHandle {
    self.entries.push(Cleanup {
      kind,
      value,
      state: CleanupState::Active,
    });
    self.stats.acquired += 1;
    CleanupHandle(self.entries.len() - 1)
  }

  /// Register a cleanup that stays silent until [`CleanupStack::activate`].
  /// A dormant entry is dropped without emission when its scope ends.
  pub fn push_dormant(
    &mut self,
    kind: CleanupKind,
    value: ValueId,
  ) -> CleanupHandle {
    self.entries.push(Cleanup {
      kind,
      value,
      state: CleanupState::Dormant,
    });
    CleanupHandle(self.entries.len() - 1)
  }

  /// Arm a dormant cleanup once its storage has been initialized. It stays in
  /// the scope it was registered in.
  pub fn activate(
    &mut self,
    handle: CleanupHandle,
  ) {
    let entry = match self.entries.get_mut(handle.0) {
      Some(entry) => entry,
      None => panic!("cleanup {} activated after its scope ended", handle.0),
    };

    assert!(
      entry.state == CleanupState::Dormant,
      "cleanup for %{} is not dormant",
      entry.value.index()
    );

    entry.state = CleanupState::Active;
    self.stats.acquired += 1;
  }

  pub fn is_active(
    &self,
    handle: CleanupHandle,
  ) -> bool {
    self.entries.get(handle.0).is_some_and(|c| c.state == CleanupState::Active)
  }

  /// Deactivate a cleanup whose value was consumed.
  pub fn forward(
    &mut self,
    handle: CleanupHandle,
  ) {
    let entry = match self.entries.get_mut(handle.0) {
      Some(entry) => entry,
      None => panic!("cleanup {} forwarded after its scope ended", handle.0),
    };

    assert!(
      entry.state == CleanupState::Active,
      "cleanup for %{} resolved twice",
      entry.value.index()
    );

    entry.state = CleanupState::Forwarded;
    self.stats.forwarded += 1;
  }

  /// Pop every entry above `depth`, returning the still-active ones in the
  /// order they must be emitted.
  pub fn pop_to(
    &mut self,
    depth: usize,
  ) -> Vec<(CleanupKind, ValueId)> {
    assert!(depth <= self.entries.len(), "cleanup scope depth {} out of range", depth);

    let popped: Vec<Cleanup> = self.entries.drain(depth..).collect();
    let pending: Vec<(CleanupKind, ValueId)> = popped
      .iter()
      .rev()
      .filter(|c| c.state == CleanupState::Active)
      .map(|c| (c.kind, c.value))
      .collect();

    self.stats.emitted += pending.len();
    pending
  }

  /// Resolve every active cleanup without popping, for an early exit out of
  /// all enclosing scopes.
  pub fn take_all_active(&mut self) -> Vec<(CleanupKind, ValueId)> {
    let mut pending = Vec::new();

    for entry in self.entries.iter_mut().rev() {
      if entry.state == CleanupState::Active {
        entry.state = CleanupState::Emitted;
        pending.push((entry.kind, entry.value));
      }
    }

    self.stats.emitted += pending.len();
    pending
  }
}
