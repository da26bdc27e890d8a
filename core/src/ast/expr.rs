use serde::Serialize;

use super::kind::AstKind;
use crate::lexer::TokenKind;
use crate::location::LineLocation;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind<'src> {
    Number(f64),
    Variable(&'src str),
    /// `op` is any token the parser gave a precedence; the lowering pass
    /// decides which of them are real operators.
    Binary {
        op: TokenKind,
        left: Box<Expr<'src>>,
        right: Box<Expr<'src>>,
    },
    Call {
        callee: &'src str,
        args: Vec<Expr<'src>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr<'src> {
    pub kind: ExprKind<'src>,
    pub location: LineLocation,
}

impl<'src> Expr<'src> {
    pub fn new(kind: ExprKind<'src>, location: LineLocation) -> Self {
        Expr { kind, location }
    }

    pub fn number(value: f64, location: LineLocation) -> Self {
        Expr::new(ExprKind::Number(value), location)
    }

    pub fn variable(name: &'src str, location: LineLocation) -> Self {
        Expr::new(ExprKind::Variable(name), location)
    }

    pub fn binary(op: TokenKind, left: Expr<'src>, right: Expr<'src>, location: LineLocation) -> Self {
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            location,
        )
    }

    pub fn call(callee: &'src str, args: Vec<Expr<'src>>, location: LineLocation) -> Self {
        Expr::new(ExprKind::Call { callee, args }, location)
    }

    pub fn ast_kind(&self) -> AstKind {
        match &self.kind {
            ExprKind::Number(_) => AstKind::NumberExpr,
            ExprKind::Variable(_) => AstKind::VariableExpr,
            ExprKind::Binary { .. } => AstKind::BinaryExpr,
            ExprKind::Call { .. } => AstKind::CallExpr,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            ExprKind::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&'src str> {
        match self.kind {
            ExprKind::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// Returns `(op, left, right)` for a binary expression.
    pub fn as_binary(&self) -> Option<(TokenKind, &Expr<'src>, &Expr<'src>)> {
        match &self.kind {
            ExprKind::Binary { op, left, right } => Some((*op, left.as_ref(), right.as_ref())),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<(&'src str, &[Expr<'src>])> {
        match &self.kind {
            ExprKind::Call { callee, args } => Some((*callee, args.as_slice())),
            _ => None,
        }
    }
}
