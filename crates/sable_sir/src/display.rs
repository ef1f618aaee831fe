use std::fmt::Write;

use sable_type::{
  definition::{DefinitionId, DefinitionStore},
  symbol::SymbolTable,
  types::{Type, TypeId, TypeStore},
};

use crate::{FunctionSir, Instr, SirModule, Terminator, ValueId};

/// Pretty printer for SIR modules.
pub struct SirPrinter<'a> {
  module: &'a SirModule,
  types: &'a TypeStore,
  defs: &'a DefinitionStore,
  symbols: &'a SymbolTable,
  output: String,
}

impl<'a> SirPrinter<'a> {
  pub fn new(
    module: &'a SirModule,
    types: &'a TypeStore,
    defs: &'a DefinitionStore,
    symbols: &'a SymbolTable,
  ) -> Self {
    Self {
      module,
      types,
      defs,
      symbols,
      output: String::new(),
    }
  }

  pub fn print(mut self) -> String {
    for (_, func) in self.module.sorted_functions() {
      self.print_function(func);
    }

    self.output
  }

  fn print_function(
    &mut self,
    func: &FunctionSir,
  ) {
    if func.is_extern {
      let ty = self.format_type(*self.defs.type_of(&func.def_id));
      writeln!(self.output, "fn @{} : {} [extern]", func.name, ty).unwrap();
      return;
    }

    let params: Vec<_> = func
      .params
      .iter()
      .map(|&p| format!("%{}: {}", p.index(), self.format_type(func.value_type(p))))
      .collect();
    let ret_ty = self.format_type(func.return_type);

    writeln!(self.output, "fn @{}({}) -> {} {{", func.name, params.join(", "), ret_ty).unwrap();

    for instr in &func.instructions {
      write!(self.output, "  ").unwrap();
      self.print_instr(func, instr);
    }

    write!(self.output, "  ").unwrap();
    match &func.terminator {
      Terminator::Return(Some(value)) => writeln!(self.output, "return {}", value_name(*value)).unwrap(),
      Terminator::Return(None) => writeln!(self.output, "return").unwrap(),
      Terminator::Unreachable => writeln!(self.output, "unreachable").unwrap(),
    }

    writeln!(self.output, "}}").unwrap();
  }

  fn print_instr(
    &mut self,
    func: &FunctionSir,
    instr: &Instr,
  ) {
    match instr {
      Instr::AllocStack { dest, ty } => {
        let ty = self.format_type(*ty);
        writeln!(self.output, "{} = alloc_stack {}", value_name(*dest), ty).unwrap();
      },
      Instr::ElementAddr { dest, base, index } => {
        let ty = self.format_type(func.value_type(*dest));
        writeln!(
          self.output,
          "{} = element_addr {}, #{} : {}",
          value_name(*dest),
          value_name(*base),
          index,
          ty
        )
        .unwrap();
      },
      Instr::Load { dest, address } => {
        let ty = self.format_type(func.value_type(*dest));
        writeln!(self.output, "{} = load {} : {}", value_name(*dest), value_name(*address), ty).unwrap();
      },
      Instr::Store { value, address } => {
        writeln!(self.output, "store {} to {}", value_name(*value), value_name(*address)).unwrap();
      },
      Instr::Assign { value, address } => {
        writeln!(self.output, "assign {} to {}", value_name(*value), value_name(*address)).unwrap();
      },
      Instr::DestroyAddr { address } => {
        writeln!(self.output, "destroy_addr {}", value_name(*address)).unwrap();
      },
      Instr::FunctionRef { dest, function } => {
        let name = self.def_name(*function);
        let ty = self.format_type(func.value_type(*dest));
        writeln!(self.output, "{} = function_ref @{} : {}", value_name(*dest), name, ty).unwrap();
      },
      Instr::Retain { value } => {
        writeln!(self.output, "retain {}", value_name(*value)).unwrap();
      },
      Instr::Release { value } => {
        writeln!(self.output, "release {}", value_name(*value)).unwrap();
      },
      Instr::Apply { dest, callee, args } => {
        let args: Vec<_> = args.iter().map(|&a| value_name(a)).collect();
        match dest {
          Some(d) => {
            let ty = self.format_type(func.value_type(*d));
            writeln!(
              self.output,
              "{} = apply {}({}) : {}",
              value_name(*d),
              value_name(*callee),
              args.join(", "),
              ty
            )
            .unwrap();
          },
          None => {
            writeln!(self.output, "apply {}({})", value_name(*callee), args.join(", ")).unwrap();
          },
        }
      },
      Instr::Literal { dest, value } => {
        let ty = self.format_type(func.value_type(*dest));
        writeln!(self.output, "{} = literal {} : {}", value_name(*dest), value, ty).unwrap();
      },
      Instr::BinOp { dest, op, left, right } => {
        let ty = self.format_type(func.value_type(*dest));
        writeln!(
          self.output,
          "{} = {} {}, {} : {}",
          value_name(*dest),
          op.mnemonic(),
          value_name(*left),
          value_name(*right),
          ty
        )
        .unwrap();
      },
    }
  }

  fn def_name(
    &self,
    def_id: DefinitionId,
  ) -> String {
    self.symbols.get(&self.defs.get(&def_id).name).to_string()
  }

  pub fn format_type(
    &self,
    ty: TypeId,
  ) -> String {
    format_type(self.types, self.defs, self.symbols, ty)
  }
}

fn value_name(value: ValueId) -> String {
  format!("%{}", value.index())
}

/// Render a type the way the printer does.
pub fn format_type(
  types: &TypeStore,
  defs: &DefinitionStore,
  symbols: &SymbolTable,
  ty: TypeId,
) -> String {
  match types.get(&ty) {
    Type::I32 => "i32".to_string(),
    Type::I64 => "i64".to_string(),
    Type::F64 => "f64".to_string(),
    Type::Boolean => "bool".to_string(),
    Type::String => "string".to_string(),
    Type::Address { inner, qualifiers } => {
      let aliased = if qualifiers.aliased { "aliased " } else { "" };
      let mutable = if qualifiers.mutable { "mut " } else { "" };
      format!("&{}{}{}", aliased, mutable, format_type(types, defs, symbols, *inner))
    },
    Type::Tuple(elements) => {
      let elements: Vec<_> = elements
        .iter()
        .map(|&e| format_type(types, defs, symbols, e))
        .collect();
      format!("({})", elements.join(", "))
    },
    Type::Record(def_id) => symbols.get(&defs.get(def_id).name).to_string(),
    Type::Function { params, ret } => {
      let params: Vec<_> = params.iter().map(|&p| format_type(types, defs, symbols, p)).collect();
      format!("({}) -> {}", params.join(", "), format_type(types, defs, symbols, *ret))
    },
    Type::Error => "{error}".to_string(),
  }
}

/// Render an entire module.
pub fn print_sir(
  module: &SirModule,
  types: &TypeStore,
  defs: &DefinitionStore,
  symbols: &SymbolTable,
) -> String {
  SirPrinter::new(module, types, defs, symbols).print()
}
