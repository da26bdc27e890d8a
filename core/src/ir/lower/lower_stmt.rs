//! Lowering helpers for statement nodes.
//!
//! Module-level statements (prototypes, function definitions and
//! top-level expressions) each produce one function of the `IrModule`.
//! A function body is built off to the side in a `FunctionBuilder` and only
//! attached to the module once every statement in it lowered; if anything
//! fails, including verification, the module is put back the way it was.

use super::err::{LoweringError, LoweringErrorKind};
use super::function_builder::FunctionBuilder;
use super::lower_expr::lower_expr;
use super::lowering_context::LoweringContext;
use crate::ast::{Block, Expr, IfStmt, Prototype, Return, Stmt};
use crate::ir::module::IrModule;
use crate::ir::op::FCmpPredicate;
use crate::ir::value::Operand;
use crate::ir::verify::verify_function;

/// Lowers one top-level statement and returns the name of the function it
/// declared or defined.
pub fn lower_stmt(
    stmt: &Stmt<'_>,
    ir_mod: &mut IrModule,
    ctx: &mut LoweringContext,
) -> Result<String, LoweringError> {
    match stmt {
        Stmt::Prototype(proto) => lower_prototype(proto, ir_mod),
        Stmt::Function(func) => lower_function(&func.proto, FunctionSource::Block(&func.body), ir_mod, ctx),
        Stmt::Expression(expr) => lower_function(&expr.proto, FunctionSource::Expr(&expr.body), ir_mod, ctx),
        Stmt::Block(_) | Stmt::Return(_) | Stmt::If(_) => Err(LoweringError::new(
            LoweringErrorKind::MisplacedStatement,
            format!("{} is only allowed inside a function body", stmt.ast_kind()),
            None,
        )),
    }
}

/// Declares the prototype, or reuses an existing function of the same name
/// and arity.
pub fn lower_prototype(proto: &Prototype<'_>, ir_mod: &mut IrModule) -> Result<String, LoweringError> {
    let name = proto.name();
    if let Some(existing) = ir_mod.get_function(name) {
        if existing.arity() != proto.arity() {
            return Err(signature_mismatch(proto, existing.arity()));
        }
        return Ok(name.to_string());
    }

    let params = proto.params().iter().map(|p| p.to_string()).collect();
    ir_mod.declare_function(name, params);
    Ok(name.to_string())
}

fn signature_mismatch(proto: &Prototype<'_>, expected: usize) -> LoweringError {
    LoweringError::new(
        LoweringErrorKind::SignatureMismatch,
        format!(
            "'{}' was declared with {} parameters, got {}",
            proto.name(),
            expected,
            proto.arity()
        ),
        Some(proto.location),
    )
}

enum FunctionSource<'a, 'src> {
    Block(&'a Block<'src>),
    Expr(&'a Expr<'src>),
}

fn lower_function(
    proto: &Prototype<'_>,
    source: FunctionSource<'_, '_>,
    ir_mod: &mut IrModule,
    ctx: &mut LoweringContext,
) -> Result<String, LoweringError> {
    let name = proto.name();

    // parameter names the function had before this definition, when it was
    // already declared
    let previous_params = match ir_mod.get_function(name) {
        Some(existing) if existing.is_defined() => {
            return Err(LoweringError::new(
                LoweringErrorKind::FunctionRedefinition,
                format!("Function '{}' cannot be redefined", name),
                Some(proto.location),
            ));
        }
        Some(existing) if existing.arity() != proto.arity() => {
            return Err(signature_mismatch(proto, existing.arity()));
        }
        Some(existing) => Some(existing.params.clone()),
        None => None,
    };

    let params: Vec<String> = proto.params().iter().map(|p| p.to_string()).collect();
    ir_mod.declare_function(name, params.clone()).params = params.clone();

    ctx.reset(name);
    for (idx, param) in params.iter().enumerate() {
        ctx.bind(param, Operand::Arg(idx));
    }

    let result = build_body(&source, ir_mod, ctx).and_then(|builder| {
        ir_mod.define_function(name, builder.finish());
        verify_defined(ir_mod, proto)
    });
    ctx.clear();

    match result {
        Ok(()) => Ok(name.to_string()),
        Err(err) => {
            match previous_params {
                Some(params) => {
                    ir_mod.discard_body(name);
                    if let Some(func) = ir_mod.get_function_mut(name) {
                        func.params = params;
                    }
                }
                None => {
                    ir_mod.erase_function(name);
                }
            }
            log::debug!("[lower] @{} rolled back: {}", name, err);
            Err(err)
        }
    }
}

fn verify_defined(ir_mod: &IrModule, proto: &Prototype<'_>) -> Result<(), LoweringError> {
    match ir_mod.get_function(proto.name()) {
        Some(func) => verify_function(ir_mod, func).map_err(|err| {
            LoweringError::new(LoweringErrorKind::Verification, err.to_string(), Some(proto.location))
        }),
        None => Ok(()),
    }
}

fn build_body(
    source: &FunctionSource<'_, '_>,
    ir_mod: &IrModule,
    ctx: &LoweringContext,
) -> Result<FunctionBuilder, LoweringError> {
    let mut builder = FunctionBuilder::new();
    let entry = builder.create_block("entry");
    builder.position_at_end(entry);

    match source {
        FunctionSource::Block(block) => {
            lower_block(block, ir_mod, ctx, &mut builder)?;
            if !builder.is_terminated() {
                builder.build_ret(None);
            }
        }
        FunctionSource::Expr(expr) => {
            let value = lower_expr(expr, ir_mod, ctx, &mut builder)?;
            builder.build_ret(Some(value));
        }
    }
    Ok(builder)
}

/// Lowers every statement of the block for effect, then its tail return.
pub fn lower_block(
    block: &Block<'_>,
    ir_mod: &IrModule,
    ctx: &LoweringContext,
    builder: &mut FunctionBuilder,
) -> Result<(), LoweringError> {
    for stmt in &block.statements {
        lower_body_stmt(stmt, ir_mod, ctx, builder)?;
    }
    if let Some(ret) = &block.tail_return {
        lower_return(ret, ir_mod, ctx, builder)?;
    }
    Ok(())
}

/// Lowers a statement that appears inside a function body.
pub fn lower_body_stmt(
    stmt: &Stmt<'_>,
    ir_mod: &IrModule,
    ctx: &LoweringContext,
    builder: &mut FunctionBuilder,
) -> Result<(), LoweringError> {
    match stmt {
        Stmt::Expression(expr) => lower_expr(&expr.body, ir_mod, ctx, builder).map(|_| ()),
        Stmt::Block(block) => lower_block(block, ir_mod, ctx, builder),
        Stmt::Return(ret) => lower_return(ret, ir_mod, ctx, builder),
        Stmt::If(if_stmt) => lower_if(if_stmt, ir_mod, ctx, builder),
        Stmt::Prototype(_) | Stmt::Function(_) => Err(LoweringError::new(
            LoweringErrorKind::MisplacedStatement,
            format!("{} cannot be nested inside a function body", stmt.ast_kind()),
            None,
        )),
    }
}

fn lower_return(
    ret: &Return<'_>,
    ir_mod: &IrModule,
    ctx: &LoweringContext,
    builder: &mut FunctionBuilder,
) -> Result<(), LoweringError> {
    let value = match &ret.value {
        Some(expr) => Some(lower_expr(expr, ir_mod, ctx, builder)?),
        None => None,
    };
    builder.build_ret(value);
    Ok(())
}

/// `if` lowers to a conditional branch on `cond != 0.0` into a `then` block
/// and either an `else` block or straight to the merge block. Arms that did
/// not return fall through to the merge block, where lowering continues.
fn lower_if(
    stmt: &IfStmt<'_>,
    ir_mod: &IrModule,
    ctx: &LoweringContext,
    builder: &mut FunctionBuilder,
) -> Result<(), LoweringError> {
    let cond = lower_expr(&stmt.condition, ir_mod, ctx, builder)?;
    let flag = builder.build_fcmp(FCmpPredicate::One, cond, Operand::Const(0.0), "ifcond");

    let then_bb = builder.create_block("then");
    let has_else = stmt.else_if.is_some() || stmt.else_block.is_some();
    let else_bb = if has_else { Some(builder.create_block("else")) } else { None };
    let merge_bb = builder.create_block("ifcont");

    builder.build_cond_br(flag, then_bb, else_bb.unwrap_or(merge_bb));

    builder.position_at_end(then_bb);
    lower_block(&stmt.then_block, ir_mod, ctx, builder)?;
    if !builder.is_terminated() {
        builder.build_br(merge_bb);
    }

    if let Some(else_bb) = else_bb {
        builder.position_at_end(else_bb);
        if let Some(elif) = &stmt.else_if {
            lower_body_stmt(elif, ir_mod, ctx, builder)?;
        } else if let Some(block) = &stmt.else_block {
            lower_block(block, ir_mod, ctx, builder)?;
        }
        if !builder.is_terminated() {
            builder.build_br(merge_bb);
        }
    }

    builder.position_at_end(merge_bb);
    Ok(())
}
