#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperation {
  Add,
  Sub,
  Mul,
  Div,

  Equal,
  NotEqual,
  LessThan,
  GreaterThan,
}

impl BinaryOperation {
  pub fn is_comparison(&self) -> bool {
    matches!(
      self,
      BinaryOperation::Equal | BinaryOperation::NotEqual | BinaryOperation::LessThan | BinaryOperation::GreaterThan
    )
  }

  pub fn mnemonic(&self) -> &'static str {
    match self {
      BinaryOperation::Add => "add",
      BinaryOperation::Sub => "sub",
      BinaryOperation::Mul => "mul",
      BinaryOperation::Div => "div",
      BinaryOperation::Equal => "eq",
      BinaryOperation::NotEqual => "ne",
      BinaryOperation::LessThan => "lt",
      BinaryOperation::GreaterThan => "gt",
    }
  }
}
