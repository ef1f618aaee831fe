use std::fmt::Display;

use ordered_float::OrderedFloat;

fn escape_special_characters(value: &str) -> String {
  value
    .replace("\\", "\\\\")
    .replace("\"", "\\\"")
    .replace("\n", "\\n")
    .replace("\t", "\\t")
}

#[derive(Debug, PartialEq, Clone, Hash, Eq)]
pub enum LiteralValue {
  Int(i64),
  Float(OrderedFloat<f64>),
  Boolean(bool),
  String(String),
}

impl Display for LiteralValue {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>,
  ) -> std::fmt::Result {
    match self {
      LiteralValue::Int(i) => write!(f, "{}", i),
      LiteralValue::Float(x) => write!(f, "{}", x),
      LiteralValue::Boolean(x) => write!(f, "{}", x),
      LiteralValue::String(x) => write!(f, "\"{}\"", escape_special_characters(x)),
    }
  }
}
