//! Stderr logging for SIR generation, gated by [`SableConfig`].
//!
//! - `phase_log!`, `phase_ok!`, `phase_warn!` mark the lowering and
//!   verification phases.
//! - `trace_dbg!` follows one [`DebugTrace`] category (lvalue paths,
//!   ownership, ...).
//! - `log_dbg!` and `log_trc!` report per-function and per-statement progress.
//!
//! Printed SIR goes to stdout, so every line here goes to stderr.

use std::fmt;

use colored::Colorize;
use sable_config::{DebugTrace, SableConfig};

/// How much output a configuration lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
  Quiet,
  Phase,
  Info,
  Debug,
  Trace,
}

impl Level {
  pub fn of(config: &SableConfig) -> Self {
    if config.quiet {
      return Level::Quiet;
    }

    match config.verbose {
      _ if config.debug && config.verbose < 2 => Level::Debug,
      0 => Level::Phase,
      1 => Level::Info,
      2 => Level::Debug,
      _ => Level::Trace,
    }
  }
}

pub fn enabled(
  config: &SableConfig,
  level: Level,
) -> bool {
  Level::of(config) >= level
}

/// `debug` turns on every category.
pub fn tracing(
  config: &SableConfig,
  trace: DebugTrace,
) -> bool {
  !config.quiet && (config.debug || config.debug_trace.contains(&trace))
}

pub fn category(trace: DebugTrace) -> &'static str {
  match trace {
    DebugTrace::Lowering => "lowering",
    DebugTrace::LValue => "lvalue",
    DebugTrace::Ownership => "ownership",
    DebugTrace::Verify => "verify",
  }
}

#[doc(hidden)]
#[derive(Debug, Clone, Copy)]
pub enum Mark {
  Step,
  Done,
  Warn,
}

#[doc(hidden)]
pub fn emit_phase(
  mark: Mark,
  message: fmt::Arguments<'_>,
) {
  match mark {
    Mark::Step => eprintln!("    {} {}", "-->".bright_green().bold(), message),
    Mark::Done => eprintln!("{} {}", "-->".bright_green().bold(), message),
    Mark::Warn => eprintln!("{} {}", "-->".bright_yellow().bold(), message),
  }
}

/// A step inside a phase, indented under it.
///
/// ```ignore
/// phase_log!(config, "Lowering {} item(s) to SIR", hir.items.len());
/// ```
#[macro_export]
macro_rules! phase_log {
  ($config:expr, $($arg:tt)+) => {{
    if $crate::enabled($config, $crate::Level::Phase) {
      $crate::emit_phase($crate::Mark::Step, format_args!($($arg)+));
    }
  }};
}

/// A finished phase.
///
/// ```ignore
/// phase_ok!(config, "SIR verified ({} function(s))", module.functions.len());
/// ```
#[macro_export]
macro_rules! phase_ok {
  ($config:expr, $($arg:tt)+) => {{
    if $crate::enabled($config, $crate::Level::Phase) {
      $crate::emit_phase($crate::Mark::Done, format_args!($($arg)+));
    }
  }};
}

#[macro_export]
macro_rules! phase_warn {
  ($config:expr, $($arg:tt)+) => {{
    if $crate::enabled($config, $crate::Level::Phase) {
      $crate::emit_phase($crate::Mark::Warn, format_args!($($arg)+));
    }
  }};
}

/// One line of a debug category, as `debug[lvalue]: ...`.
///
/// ```ignore
/// trace_dbg!(&ctx.config, DebugTrace::Ownership, "acquire %{} ({:?})", value.index(), kind);
/// // debug[ownership]: acquire %3 (Release)
/// ```
#[macro_export]
macro_rules! trace_dbg {
  ($config:expr, $trace:expr, $($arg:tt)+) => {{
    if $crate::tracing($config, $trace) {
      eprintln!("debug[{}]: {}", $crate::category($trace), format_args!($($arg)+));
    }
  }};
}

#[macro_export]
macro_rules! log_dbg {
  ($config:expr, $($arg:tt)+) => {{
    if $crate::enabled($config, $crate::Level::Debug) {
      eprintln!("debug: {}", format_args!($($arg)+));
    }
  }};
}

#[macro_export]
macro_rules! log_trc {
  ($config:expr, $($arg:tt)+) => {{
    if $crate::enabled($config, $crate::Level::Trace) {
      eprintln!("trace: {}", format_args!($($arg)+));
    }
  }};
}
