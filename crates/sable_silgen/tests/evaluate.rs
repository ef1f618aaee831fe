mod common;

use common::{Fixture, applies, count, referenced_function};
use insta::assert_snapshot;
use sable_config::SableConfig;
use sable_silgen::lower_and_verify;
use sable_sir::Instr;
use sable_type::span::Span;

#[test]
fn store_then_load_variable() {
  let mut fx = Fixture::new();
  let i32_ty = fx.types.i32();
  let x = fx.variable("x", i32_ty, true);
  let decl_x = fx.let_(x, None);
  let x_dst = fx.decl_ref(x);
  let five = fx.int(5);
  let assign = fx.assign(x_dst, five);
  let x_src = fx.decl_ref(x);
  let read = fx.load(x_src);
  let ret = fx.ret(Some(read));
  let body = fx.block(vec![decl_x, assign, ret]);
  fx.function("main", Vec::new(), i32_ty, body);

  let (module, verified) = fx.lower();
  assert_eq!(verified, Ok(()));

  assert_snapshot!(fx.print(&module), @r"
  fn @main() -> i32 {
    %0 = alloc_stack i32
    %1 = literal 5 : i32
    store %1 to %0
    %2 = load %0 : i32
    return %2
  }
  ");
}

#[test]
fn returning_an_owned_parameter_destroys_its_slot() {
  let mut fx = Fixture::new();
  let string_ty = fx.types.string();
  let s = fx.variable("s", string_ty, false);
  let s_ref = fx.decl_ref(s);
  let read = fx.load(s_ref);
  let ret = fx.ret(Some(read));
  let body = fx.block(vec![ret]);
  fx.function("echo", vec![s], string_ty, body);

  let (module, verified) = fx.lower();
  assert_eq!(verified, Ok(()));

  assert_snapshot!(fx.print(&module), @r"
  fn @echo(%0: string) -> string {
    %1 = alloc_stack string
    store %0 to %1
    %2 = load %1 : string
    retain %2
    destroy_addr %1
    return %2
  }
  ");
}

#[test]
fn reassigning_a_string_destroys_the_old_value() {
  let mut fx = Fixture::new();
  let string_ty = fx.types.string();
  let unit = fx.types.unit();
  let s = fx.variable("s", string_ty, true);
  let a = fx.string("a");
  let decl_s = fx.let_(s, Some(a));
  let s_dst = fx.decl_ref(s);
  let b = fx.string("b");
  let assign = fx.assign(s_dst, b);
  let body = fx.block(vec![decl_s, assign]);
  fx.function("main", Vec::new(), unit, body);

  let (module, verified) = fx.lower();
  assert_eq!(verified, Ok(()));

  assert_snapshot!(fx.print(&module), @r#"
  fn @main() -> () {
    %0 = alloc_stack string
    %1 = literal "a" : string
    store %1 to %0
    %2 = literal "b" : string
    assign %2 to %0
    destroy_addr %0
    return
  }
  "#);
}

#[test]
fn first_write_initializes_a_declared_string() {
  let mut fx = Fixture::new();
  let string_ty = fx.types.string();
  let unit = fx.types.unit();
  let s = fx.variable("s", string_ty, true);
  let decl_s = fx.let_(s, None);

  // The first write sits in a nested block; the slot still lives to the end.
  let s_first = fx.decl_ref(s);
  let a = fx.string("a");
  let first = fx.assign(s_first, a);
  let inner = fx.block(vec![first]);
  let s_second = fx.decl_ref(s);
  let b = fx.string("b");
  let second = fx.assign(s_second, b);
  let body = fx.block(vec![decl_s, inner, second]);
  fx.function("main", Vec::new(), unit, body);

  let (module, verified) = fx.lower();
  assert_eq!(verified, Ok(()));

  assert_snapshot!(fx.print(&module), @r#"
  fn @main() -> () {
    %0 = alloc_stack string
    %1 = literal "a" : string
    store %1 to %0
    %2 = literal "b" : string
    assign %2 to %0
    destroy_addr %0
    return
  }
  "#);
}

#[test]
fn declared_string_never_written_is_not_destroyed() {
  let mut fx = Fixture::new();
  let string_ty = fx.types.string();
  let unit = fx.types.unit();
  let s = fx.variable("s", string_ty, true);
  let decl_s = fx.let_(s, None);
  let body = fx.block(vec![decl_s]);
  let main = fx.function("main", Vec::new(), unit, body);

  let (module, verified) = fx.lower();
  assert_eq!(verified, Ok(()));

  let func = module.function(&main).expect("main lowered");
  assert_eq!(count(func, |i| matches!(i, Instr::DestroyAddr { .. })), 0);
}

#[test]
fn logical_base_is_materialized_without_writeback() {
  let mut fx = Fixture::new();
  let i32_ty = fx.types.i32();
  let (point, point_ty) = fx.record("Point", true);
  let x = fx.stored_field(point, "x", i32_ty);
  let origin = fx.global_property("origin", point_ty);

  let origin_ref = fx.decl_ref(origin.decl);
  let origin_x = fx.member(origin_ref, x);
  let five = fx.int(5);
  let main = fx.scratch_function("main");

  let mut ctx = fx.context();
  ctx.begin_function(main);
  let lv = ctx.build_lvalue(origin_x);
  assert_eq!(lv.len(), 2);

  let value = ctx.lower_expression(five);
  let literal = value.value();
  ctx.store_lvalue(&lv, value, Span::default());
  let func = ctx.finish_function();

  // Only the getter runs; the setter of `origin` is never called.
  let applies = applies(&func);
  assert_eq!(applies.len(), 1);
  assert_eq!(referenced_function(&func, applies[0].0), origin.getter);

  let fetched = match func.instructions.iter().find(|i| matches!(i, Instr::Apply { .. })) {
    Some(Instr::Apply { dest: Some(dest), .. }) => *dest,
    other => panic!("expected getter apply, found {:?}", other),
  };

  let temp = func
    .instructions
    .iter()
    .find_map(|i| match i {
      Instr::AllocStack { dest, ty } if *ty == point_ty => Some(*dest),
      _ => None,
    })
    .expect("temporary for origin");

  let tail: Vec<Instr> = func.instructions.iter().rev().take(3).rev().cloned().collect();
  let field = match tail[1] {
    Instr::ElementAddr { dest, base, index } => {
      assert_eq!(base, temp);
      assert_eq!(index, 0);
      dest
    },
    ref other => panic!("expected element_addr, found {:?}", other),
  };
  assert_eq!(
    tail,
    vec![
      Instr::Store {
        value: fetched,
        address: temp
      },
      Instr::ElementAddr {
        dest: field,
        base: temp,
        index: 0
      },
      Instr::Store {
        value: literal,
        address: field
      },
    ]
  );
}

#[test]
fn non_trivial_temporary_is_destroyed_at_end_of_load() {
  let mut fx = Fixture::new();
  let string_ty = fx.types.string();
  let (person, person_ty) = fx.record("Person", true);
  let name = fx.stored_field(person, "name", string_ty);
  let current = fx.global_property("current", person_ty);

  let current_ref = fx.decl_ref(current.decl);
  let current_name = fx.member(current_ref, name);
  let main = fx.scratch_function("main");

  let mut ctx = fx.context();
  ctx.begin_function(main);
  let lv = ctx.build_lvalue(current_name);
  let loaded = ctx.load_lvalue(&lv, Span::default());
  assert!(loaded.has_cleanup());
  let loaded = loaded.value();

  let in_flight = ctx.current_function().instructions().to_vec();
  let func = ctx.finish_function();

  let temp = in_flight
    .iter()
    .find_map(|i| match i {
      Instr::AllocStack { dest, .. } => Some(*dest),
      _ => None,
    })
    .expect("temporary");

  // Copy out, then destroy the temporary before the load returns.
  let n = in_flight.len();
  assert_eq!(in_flight[n - 2], Instr::Retain { value: loaded });
  assert_eq!(in_flight[n - 1], Instr::DestroyAddr { address: temp });

  // The copy is released when the function scope closes.
  assert_eq!(func.instructions.last(), Some(&Instr::Release { value: loaded }));
}

#[test]
fn expression_statement_result_is_released() {
  let mut fx = Fixture::new();
  let unit = fx.types.unit();
  let hello = fx.string("hello");
  let stmt = fx.expr_stmt(hello);
  let body = fx.block(vec![stmt]);
  fx.function("main", Vec::new(), unit, body);

  let (module, verified) = fx.lower();
  assert_eq!(verified, Ok(()));

  assert_snapshot!(fx.print(&module), @r#"
  fn @main() -> () {
    %0 = literal "hello" : string
    release %0
    return
  }
  "#);
}

#[test]
fn statements_after_return_are_skipped() {
  let mut fx = Fixture::new();
  let i32_ty = fx.types.i32();
  let one = fx.int(1);
  let first = fx.ret(Some(one));
  let two = fx.int(2);
  let second = fx.ret(Some(two));
  let body = fx.block(vec![first, second]);
  let main = fx.function("main", Vec::new(), i32_ty, body);

  let (module, verified) = fx.lower();
  assert_eq!(verified, Ok(()));

  let func = module.function(&main).expect("main lowered");
  assert_eq!(count(func, |i| matches!(i, Instr::Literal { .. })), 1);
}

#[test]
fn missing_return_is_reported_by_the_verifier() {
  let mut fx = Fixture::new();
  let i32_ty = fx.types.i32();
  let body = fx.block(Vec::new());
  fx.function("main", Vec::new(), i32_ty, body);

  let (_, verified) = fx.lower();
  let errors = verified.expect_err("no return in an i32 function");
  assert!(matches!(errors[0], sable_sir::VerifyError::MissingTerminator { .. }));
}

#[test]
fn verification_can_be_disabled() {
  let mut fx = Fixture::new();
  let i32_ty = fx.types.i32();
  let body = fx.block(Vec::new());
  fx.function("main", Vec::new(), i32_ty, body);

  let config = SableConfig {
    verify: false,
    ..SableConfig::quiet()
  };
  let (_, verified) = lower_and_verify(&fx.hir, &mut fx.types, &fx.defs, &fx.symbols, Some(&config));
  assert_eq!(verified, Ok(()));
}

#[test]
fn accessor_declarations_are_extern() {
  let mut fx = Fixture::new();
  let i32_ty = fx.types.i32();
  let g = fx.global_property("g", i32_ty);

  let (module, verified) = fx.lower();
  assert_eq!(verified, Ok(()));

  let getter = module.function(&g.getter).expect("getter declared");
  assert!(getter.is_extern);
  assert!(getter.instructions.is_empty());

  assert_snapshot!(fx.print(&module), @r"
  fn @g.get : () -> i32 [extern]
  fn @g.set : (i32) -> () [extern]
  ");
}
