//! Lowering helpers for expression nodes.
//!
//! Expressions lower into the body held by a `FunctionBuilder`; the module
//! is only consulted to resolve call targets, so it is borrowed immutably.

use super::err::{LoweringError, LoweringErrorKind};
use super::function_builder::FunctionBuilder;
use super::lowering_context::LoweringContext;
use crate::ast::{Expr, ExprKind};
use crate::ir::module::IrModule;
use crate::ir::op::FCmpPredicate;
use crate::ir::value::Operand;
use crate::lexer::TokenKind;

pub fn lower_expr(
    expr: &Expr<'_>,
    ir_mod: &IrModule,
    ctx: &LoweringContext,
    builder: &mut FunctionBuilder,
) -> Result<Operand, LoweringError> {
    match &expr.kind {
        ExprKind::Number(value) => Ok(Operand::Const(*value)),
        ExprKind::Variable(name) => ctx
            .lookup(name)
            .ok_or_else(|| LoweringError::unknown_variable(name, expr.location)),
        ExprKind::Binary { op, left, right } => {
            let lhs = lower_expr(left, ir_mod, ctx, builder)?;
            let rhs = lower_expr(right, ir_mod, ctx, builder)?;
            lower_binary(*op, lhs, rhs, expr, builder)
        }
        ExprKind::Call { callee, args } => {
            let target = ir_mod
                .get_function(callee)
                .ok_or_else(|| LoweringError::unknown_function(callee, expr.location))?;
            if target.arity() != args.len() {
                return Err(LoweringError::argument_count(
                    callee,
                    target.arity(),
                    args.len(),
                    expr.location,
                ));
            }

            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(lower_expr(arg, ir_mod, ctx, builder)?);
            }
            Ok(builder.build_call(callee, values))
        }
    }
}

fn comparison_predicate(op: TokenKind) -> Option<FCmpPredicate> {
    match op {
        TokenKind::Lesser => Some(FCmpPredicate::Ult),
        TokenKind::Greater => Some(FCmpPredicate::Ugt),
        TokenKind::LesserEqual => Some(FCmpPredicate::Ule),
        TokenKind::GreaterEqual => Some(FCmpPredicate::Uge),
        TokenKind::EqualEqual => Some(FCmpPredicate::Ueq),
        TokenKind::BangEqual => Some(FCmpPredicate::Une),
        _ => None,
    }
}

fn lower_binary(
    op: TokenKind,
    lhs: Operand,
    rhs: Operand,
    expr: &Expr<'_>,
    builder: &mut FunctionBuilder,
) -> Result<Operand, LoweringError> {
    match op {
        TokenKind::Plus => Ok(builder.build_fadd(lhs, rhs)),
        TokenKind::Minus => Ok(builder.build_fsub(lhs, rhs)),
        TokenKind::Star => Ok(builder.build_fmul(lhs, rhs)),
        TokenKind::Slash => Ok(builder.build_fdiv(lhs, rhs)),
        _ => match comparison_predicate(op) {
            // comparisons produce an i1 which is widened back to a double
            Some(pred) => {
                let flag = builder.build_fcmp(pred, lhs, rhs, "cmptmp");
                Ok(builder.build_ui_to_fp(flag))
            }
            None => Err(LoweringError::new(
                LoweringErrorKind::InvalidBinaryOperator,
                format!("Invalid binary operator {}", op),
                Some(expr.location),
            )),
        },
    }
}
