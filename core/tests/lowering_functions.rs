use poly_core::ast::{Expr, ExpressionStmt, Prototype, Stmt};
use poly_core::ir::lower::{LoweringContext, LoweringErrorKind, lower_stmt};
use poly_core::ir::{FunctionState, IROp, IrModule};
use poly_core::lexer::{self, TokenKind};
use poly_core::location::LineLocation;
use poly_core::parser::Parser;

fn parse(src: &str) -> Vec<Stmt<'_>> {
    let scanned = lexer::scan(src);
    assert!(!scanned.has_errors(), "lexical errors: {:?}", scanned.errors);
    Parser::new(scanned.tokens).parse().expect("parse")
}

/// Lowers every statement, returning the first error kind, if any.
fn lower_all(src: &str, module: &mut IrModule, ctx: &mut LoweringContext) -> Result<Vec<String>, LoweringErrorKind> {
    let mut names = Vec::new();
    for stmt in &parse(src) {
        names.push(lower_stmt(stmt, module, ctx).map_err(|e| e.kind())?);
    }
    Ok(names)
}

#[test]
fn arithmetic_function_lowers_to_named_registers() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    lower_all("def f(x, y) return x * y + x / 2 - 1 end", &mut module, &mut ctx).expect("lowering");

    let func = module.get_function("f").expect("f defined");
    assert_eq!(func.state(), FunctionState::Defined);
    let text = func.to_string();
    assert!(text.contains("define double @f(double %x, double %y)"), "{}", text);
    assert!(text.contains("%multmp = fmul double %x, %y"), "{}", text);
    assert!(text.contains("%divtmp = fdiv double %x, 2.0"), "{}", text);
    assert!(text.contains("%addtmp = fadd double %multmp, %divtmp"), "{}", text);
    assert!(text.contains("%subtmp = fsub double %addtmp, 1.0"), "{}", text);
    assert!(text.contains("ret double %subtmp"), "{}", text);
}

#[test]
fn comparison_is_widened_to_double() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    lower_all("def lt(a, b) return a < b end", &mut module, &mut ctx).expect("lowering");

    let text = module.get_function("lt").expect("lt").to_string();
    assert!(text.contains("%cmptmp = fcmp ult double %a, %b"), "{}", text);
    assert!(text.contains("%booltmp = uitofp i1 %cmptmp to double"), "{}", text);
    assert!(text.contains("ret double %booltmp"), "{}", text);
}

#[test]
fn body_without_return_ends_in_empty_ret() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    lower_all("def id(x) x end", &mut module, &mut ctx).expect("lowering");
    let body = module.get_function("id").and_then(|f| f.body.as_ref()).expect("body");
    assert_eq!(body.blocks.len(), 1);
    assert_eq!(body.blocks[0].ops, vec![IROp::Ret { value: None }]);
}

#[test]
fn unknown_variable_is_reported() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    let err = lower_all("def f(x) return y end", &mut module, &mut ctx).expect_err("y is unbound");
    assert_eq!(err, LoweringErrorKind::UnknownVariable);
    assert!(module.get_function("f").is_none(), "failed definition must be erased");
}

#[test]
fn names_do_not_leak_between_functions() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    let err = lower_all("def f(x) return x end def g(y) return x end", &mut module, &mut ctx)
        .expect_err("x is not visible in g");
    assert_eq!(err, LoweringErrorKind::UnknownVariable);
    assert!(module.get_function("f").is_some());
    assert!(module.get_function("g").is_none());
}

#[test]
fn unknown_function_and_arity_mismatch_share_a_kind() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    let err = lower_all("nope(1)", &mut module, &mut ctx).expect_err("undeclared");
    assert_eq!(err, LoweringErrorKind::UnknownFunction);

    lower_all("def two(a, b) return a + b end", &mut module, &mut ctx).expect("two");
    let err = lower_all("two(1)", &mut module, &mut ctx).expect_err("arity");
    assert_eq!(err, LoweringErrorKind::UnknownFunction);
    let err = lower_all("two(1, 2, 3)", &mut module, &mut ctx).expect_err("arity");
    assert_eq!(err, LoweringErrorKind::UnknownFunction);
}

#[test]
fn call_lowers_arguments_in_order() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    lower_all("extern pow(a, b) def sq(x) return pow(x + 1, 2) end", &mut module, &mut ctx)
        .expect("lowering");
    let text = module.get_function("sq").expect("sq").to_string();
    assert!(
        text.contains("%calltmp = call double @pow(double %addtmp, double 2.0)"),
        "{}",
        text
    );
}

#[test]
fn prototype_lowering_is_idempotent() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    let names = lower_all("extern cos(x) extern cos(x)", &mut module, &mut ctx).expect("lowering");
    assert_eq!(names, vec!["cos".to_string(), "cos".to_string()]);
    assert_eq!(module.len(), 1);
    assert_eq!(module.state_of("cos"), Some(FunctionState::Declared));

    let err = lower_all("extern cos(x, y)", &mut module, &mut ctx).expect_err("arity change");
    assert_eq!(err, LoweringErrorKind::SignatureMismatch);
    assert_eq!(module.get_function("cos").map(|f| f.arity()), Some(1));
}

#[test]
fn definition_reuses_declaration_and_its_parameter_names() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    lower_all("extern f(a) def f(x) return x + 1 end", &mut module, &mut ctx).expect("lowering");

    assert_eq!(module.len(), 1);
    let func = module.get_function("f").expect("f");
    assert_eq!(func.params, vec!["x".to_string()]);
    assert!(func.is_defined());
}

#[test]
fn redefinition_is_rejected_and_keeps_original() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    lower_all("def f(x) return x end", &mut module, &mut ctx).expect("first");
    let before = module.get_function("f").cloned();

    let err = lower_all("def f(x) return x * 2 end", &mut module, &mut ctx).expect_err("second");
    assert_eq!(err, LoweringErrorKind::FunctionRedefinition);
    assert_eq!(module.get_function("f").cloned(), before);
}

#[test]
fn failed_definition_after_extern_returns_to_declared() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    lower_all("extern f(a)", &mut module, &mut ctx).expect("extern");

    let err = lower_all("def f(x) return missing(x) end", &mut module, &mut ctx).expect_err("bad body");
    assert_eq!(err, LoweringErrorKind::UnknownFunction);

    let func = module.get_function("f").expect("declaration survives");
    assert_eq!(func.state(), FunctionState::Declared);
    assert_eq!(func.params, vec!["a".to_string()]);

    // the name can still be defined afterwards
    lower_all("def f(x) return x end", &mut module, &mut ctx).expect("redefine after failure");
    assert_eq!(module.state_of("f"), Some(FunctionState::Defined));
}

#[test]
fn recursive_calls_resolve_to_the_function_being_defined() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    lower_all(
        "def fib(n) if n < 2 then return n end return fib(n - 1) + fib(n - 2) end",
        &mut module,
        &mut ctx,
    )
    .expect("lowering");
    let text = module.get_function("fib").expect("fib").to_string();
    assert!(text.contains("call double @fib(double %subtmp)"), "{}", text);
}

#[test]
fn if_lowering_creates_then_else_and_merge_blocks() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    lower_all(
        "def pick(c) if c then return 1 else return 2 end end",
        &mut module,
        &mut ctx,
    )
    .expect("lowering");

    let func = module.get_function("pick").expect("pick");
    let body = func.body.as_ref().expect("body");
    let labels: Vec<&str> = body.blocks.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["entry", "then", "else", "ifcont"]);

    let text = func.to_string();
    assert!(text.contains("%ifcond = fcmp one double %c, 0.0"), "{}", text);
    assert!(text.contains("br i1 %ifcond, label %then, label %else"), "{}", text);
    // both arms return, so the merge block only holds the implicit return
    assert_eq!(body.blocks[3].ops, vec![IROp::Ret { value: None }]);
}

#[test]
fn if_without_else_branches_to_merge() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    lower_all("def f(c) if c then c + 1 end return c end", &mut module, &mut ctx).expect("lowering");
    let text = module.get_function("f").expect("f").to_string();
    assert!(text.contains("br i1 %ifcond, label %then, label %ifcont"), "{}", text);
    assert!(text.contains("br label %ifcont"), "{}", text);
    assert!(text.contains("ret double %c"), "{}", text);
}

#[test]
fn invalid_binary_operator_is_reported() {
    let loc = LineLocation::new(0, 1, 1);
    let expr = Expr::binary(TokenKind::Equal, Expr::number(1.0, loc), Expr::number(2.0, loc), loc);
    let stmt = Stmt::Expression(ExpressionStmt::new(expr));

    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    let err = lower_stmt(&stmt, &mut module, &mut ctx).expect_err("'=' is not an operator");
    assert_eq!(err.kind(), LoweringErrorKind::InvalidBinaryOperator);
    assert_eq!(err.to_string(), "Invalid binary operator '=' (at line 1 [0..1))");
    assert!(module.is_empty());
}

#[test]
fn nested_definitions_are_misplaced() {
    let loc = LineLocation::new(0, 1, 1);
    let proto = Prototype::try_new("g", vec![], loc).expect("prototype");
    let stmt = Stmt::Return(poly_core::ast::Return { value: None, location: loc });

    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    let err = lower_stmt(&stmt, &mut module, &mut ctx).expect_err("bare return");
    assert_eq!(err.kind(), LoweringErrorKind::MisplacedStatement);

    let name = lower_stmt(&Stmt::Prototype(proto), &mut module, &mut ctx).expect("prototype");
    assert_eq!(name, "g");
}

#[test]
fn anonymous_expression_returns_its_value() {
    let mut module = IrModule::new("test");
    let mut ctx = LoweringContext::new();
    let names = lower_all("1 + 2", &mut module, &mut ctx).expect("lowering");
    assert_eq!(names, vec!["__anon_expr".to_string()]);
    let text = module.get_function("__anon_expr").expect("anon").to_string();
    assert!(text.contains("define double @__anon_expr()"), "{}", text);
    assert!(text.contains("ret double %addtmp"), "{}", text);
}
