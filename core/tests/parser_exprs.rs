use poly_core::ast::{AstKind, Expr, Stmt};
use poly_core::lexer::{self, TokenKind};
use poly_core::parser::{ParseError, Parser};
use poly_core::PolyErrorExt;

fn parse(src: &str) -> Result<Vec<Stmt<'_>>, ParseError> {
    let scanned = lexer::scan(src);
    assert!(!scanned.has_errors(), "lexical errors in {:?}: {:?}", src, scanned.errors);
    Parser::new(scanned.tokens).parse()
}

fn single_expr<'a>(stmts: &'a [Stmt<'a>]) -> &'a Expr<'a> {
    assert_eq!(stmts.len(), 1, "expected one statement: {:?}", stmts);
    let stmt = stmts[0].as_expression().expect("expression statement");
    assert_eq!(stmt.proto.name(), "__anon_expr");
    assert_eq!(stmt.proto.arity(), 0);
    &stmt.body
}

fn binary<'a>(expr: &'a Expr<'a>, op: TokenKind) -> (&'a Expr<'a>, &'a Expr<'a>) {
    let (found, left, right) = expr.as_binary().expect("binary expression");
    assert_eq!(found, op);
    (left, right)
}

#[test]
fn addition_of_two_literals() {
    let stmts = parse("42 + 100").expect("parse");
    let (left, right) = binary(single_expr(&stmts), TokenKind::Plus);
    assert_eq!(left.as_number(), Some(42.0));
    assert_eq!(right.as_number(), Some(100.0));
}

#[test]
fn grouping_overrides_precedence() {
    let stmts = parse("2 + (100 * 2)").expect("parse");
    let (left, right) = binary(single_expr(&stmts), TokenKind::Plus);
    assert_eq!(left.as_number(), Some(2.0));
    let (l, r) = binary(right, TokenKind::Star);
    assert_eq!(l.as_number(), Some(100.0));
    assert_eq!(r.as_number(), Some(2.0));
}

#[test]
fn precedence_climbing_nests_tighter_operators() {
    let stmts = parse("42 + 100 * (60 + 2)").expect("parse");
    let (left, right) = binary(single_expr(&stmts), TokenKind::Plus);
    assert_eq!(left.as_number(), Some(42.0));
    let (mul_l, mul_r) = binary(right, TokenKind::Star);
    assert_eq!(mul_l.as_number(), Some(100.0));
    let (inner_l, inner_r) = binary(mul_r, TokenKind::Plus);
    assert_eq!(inner_l.as_number(), Some(60.0));
    assert_eq!(inner_r.as_number(), Some(2.0));
}

#[test]
fn equal_precedence_is_left_associative() {
    let stmts = parse("10 - 4 - 3").expect("parse");
    let (left, right) = binary(single_expr(&stmts), TokenKind::Minus);
    assert_eq!(right.as_number(), Some(3.0));
    let (l, r) = binary(left, TokenKind::Minus);
    assert_eq!(l.as_number(), Some(10.0));
    assert_eq!(r.as_number(), Some(4.0));
}

#[test]
fn division_binds_like_multiplication() {
    let stmts = parse("1 + 6 / 3").expect("parse");
    let (left, right) = binary(single_expr(&stmts), TokenKind::Plus);
    assert_eq!(left.as_number(), Some(1.0));
    binary(right, TokenKind::Slash);

    let stmts = parse("8 / 2 * 2").expect("parse");
    let (left, _) = binary(single_expr(&stmts), TokenKind::Star);
    binary(left, TokenKind::Slash);
}

#[test]
fn comparisons_bind_loosest() {
    let stmts = parse("a + 1 != b * 2").expect("parse");
    let (left, right) = binary(single_expr(&stmts), TokenKind::BangEqual);
    binary(left, TokenKind::Plus);
    binary(right, TokenKind::Star);
}

#[test]
fn function_definition_with_return() {
    let stmts = parse("def add(x,y) return x + y end").expect("parse");
    assert_eq!(stmts.len(), 1);
    let func = stmts[0].as_function().expect("function");
    assert_eq!(func.proto.name(), "add");
    assert_eq!(func.proto.params(), &["x", "y"]);
    assert!(func.body.statements.is_empty());

    let ret = func.body.tail_return.as_ref().expect("tail return");
    let (left, right) = binary(ret.value.as_ref().expect("return value"), TokenKind::Plus);
    assert_eq!(left.as_variable(), Some("x"));
    assert_eq!(right.as_variable(), Some("y"));
}

#[test]
fn function_without_return_is_allowed() {
    let stmts = parse("def noisy(x) show(x) show(x + 1) end").expect("parse");
    let func = stmts[0].as_function().expect("function");
    assert_eq!(func.body.statements.len(), 2);
    assert!(func.body.tail_return.is_none());
    assert_eq!(func.body.statements[0].ast_kind(), AstKind::ExpressionStmt);
}

#[test]
fn call_with_arguments() {
    let stmts = parse("foo(1, x + 2, bar())").expect("parse");
    let (callee, args) = single_expr(&stmts).as_call().expect("call");
    assert_eq!(callee, "foo");
    assert_eq!(args.len(), 3);
    assert_eq!(args[2].as_call().map(|(name, a)| (name, a.len())), Some(("bar", 0)));
}

#[test]
fn extern_declares_prototype() {
    let stmts = parse("extern sin(x) sin(1)").expect("parse");
    assert_eq!(stmts.len(), 2);
    let proto = stmts[0].as_prototype().expect("prototype");
    assert_eq!(proto.name(), "sin");
    assert_eq!(proto.arity(), 1);
    assert_eq!(stmts[1].ast_kind(), AstKind::ExpressionStmt);
}

#[test]
fn duplicate_parameter_is_rejected() {
    let err = parse("def f(x, y, x) return x end").expect_err("duplicate parameter");
    assert_eq!(err.message(), "duplicate parameter 'x' in prototype 'f'");
    assert_eq!(err.location().map(|l| l.start), Some(12));
}

#[test]
fn anonymous_function_name_is_reserved() {
    let err = parse("def __anon_expr() return 1 end").expect_err("reserved name");
    assert_eq!(err.message(), "'__anon_expr' is reserved for top-level expressions");
    assert_eq!(err.location().map(|l| l.start), Some(4));

    assert!(parse("extern __anon_expr()").is_err());
}

#[test]
fn if_elif_else_chain() {
    let src = "def sign(x) if x < 0 then return 0 - 1 elif x > 0 then return 1 else return 0 end end";
    let stmts = parse(src).expect("parse");
    let func = stmts[0].as_function().expect("function");
    assert_eq!(func.body.statements.len(), 1);

    let outer = func.body.statements[0].as_if().expect("if");
    binary(&outer.condition, TokenKind::Lesser);
    assert!(outer.then_block.tail_return.is_some());
    assert!(outer.else_block.is_none());

    let inner = outer.else_if.as_ref().and_then(|s| s.as_if()).expect("elif arm");
    binary(&inner.condition, TokenKind::Greater);
    assert!(inner.else_block.as_ref().and_then(|b| b.tail_return.as_ref()).is_some());
}

#[test]
fn errors_name_expected_and_found() {
    let cases = [
        ("def (x) x end", "expected function name in prototype, got '('"),
        ("def f x end", "expected '(' in prototype, got identifier 'x'"),
        ("def f(x y) x end", "expected ')' or ',' in prototype, got identifier 'y'"),
        ("def f(x) x", "expected 'end', got end of input"),
        ("(1 + 2", "expected ')', got end of input"),
        ("foo(1 2)", "expected ')' or ',' in argument list, got number 2"),
        ("1 + )", "expected expression, got ')'"),
    ];
    for (src, message) in cases {
        let err = parse(src).expect_err(src);
        assert_eq!(err.message(), message, "source {:?}", src);
    }
}

#[test]
fn failing_statement_discards_whole_chunk() {
    let result = parse("def ok(x) return x end def bad( end");
    assert!(result.is_err());
}

#[test]
fn if_is_not_a_top_level_statement() {
    let err = parse("if 1 then 2 end").expect_err("top-level if");
    assert_eq!(err.message(), "expected expression, got 'if'");
}
