use serde::{Deserialize, Serialize};

/// Components that can emit debug traces independently of the verbosity level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugTrace {
  Lowering,
  LValue,
  Ownership,
  Verify,
}

/// Configuration of a SIR generation run.
///
/// Expected format:
/// ```toml
/// verbose = 2
/// debug_trace = ["lvalue", "ownership"]
/// verify = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SableConfig {
  /// Suppress everything but errors.
  pub quiet: bool,
  /// 0 = phases only, 1 = info, 2 = debug, 3 = trace.
  pub verbose: u8,
  /// Enables every debug trace and at least debug verbosity.
  pub debug: bool,
  pub debug_trace: Vec<DebugTrace>,
  /// Run the SIR verifier after lowering.
  pub verify: bool,
}

impl Default for SableConfig {
  fn default() -> Self {
    Self {
      quiet: false,
      verbose: 0,
      debug: false,
      debug_trace: Vec::new(),
      verify: true,
    }
  }
}

impl SableConfig {
  pub fn new(
    quiet: bool,
    verbose: u8,
    debug: bool,
    debug_trace: Vec<DebugTrace>,
    verify: bool,
  ) -> Self {
    Self {
      quiet,
      verbose,
      debug,
      debug_trace,
      verify,
    }
  }

  /// A configuration that prints nothing, for embedding and tests.
  pub fn quiet() -> Self {
    Self {
      quiet: true,
      ..Self::default()
    }
  }

  pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(source)
  }
}
