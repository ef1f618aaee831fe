//! SIR generation: lowers type-checked HIR into SIR.
//!
//! The interesting part is [`lvalue`]: every assignable expression becomes a
//! path of physical (address arithmetic) and logical (getter/setter) steps
//! that is then loaded from or stored to. Ownership of intermediate values
//! is tracked with [`ManagedValue`] and released by cleanup scopes.

pub mod cleanup;
mod context;
mod expr;
pub mod lvalue;
pub mod managed;
mod stmt;
pub mod type_info;

use sable_config::{DebugTrace, SableConfig};
use sable_hir::HIR;
use sable_log::{phase_log, phase_ok, phase_warn, trace_dbg};
use sable_sir::{SirModule, verify::VerifyResult, verify_sir};
use sable_type::{definition::DefinitionStore, symbol::SymbolTable, types::TypeStore};

pub use context::{DeclStorage, LoweringContext, lower_hir};
pub use lvalue::{LValue, LogicalComponent, PathComponent, PhysicalComponent};
pub use managed::ManagedValue;
pub use type_info::{FragileElement, MemberAccess, TypeInfo};

/// Lower HIR to SIR and verify the result.
/// Returns the module and any verification errors.
pub fn lower_and_verify(
  hir: &HIR,
  types: &mut TypeStore,
  defs: &DefinitionStore,
  symbols: &SymbolTable,
  config: Option<&SableConfig>,
) -> (SirModule, VerifyResult) {
  let default_config = SableConfig::default();
  let config = config.unwrap_or(&default_config);

  phase_log!(config, "Lowering {} item(s) to SIR", hir.items.len());
  let module = lower_hir(hir, types, defs, symbols, Some(config));

  if !config.verify {
    return (module, Ok(()));
  }

  let verify_result = verify_sir(&module, types, defs);

  match &verify_result {
    Ok(()) => phase_ok!(config, "SIR verified ({} function(s))", module.functions.len()),
    Err(errors) => {
      phase_warn!(config, "SIR verification found {} error(s)", errors.len());
      for error in errors {
        trace_dbg!(config, DebugTrace::Verify, "{:?}", error);
      }
    },
  }

  (module, verify_result)
}
