use serde::Serialize;

use super::expr::Expr;
use super::kind::AstKind;
use crate::location::LineLocation;

/// Name given to the synthetic function wrapping a top-level expression.
pub const ANON_EXPR_NAME: &str = "__anon_expr";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prototype<'src> {
    name: &'src str,
    params: Vec<&'src str>,
    pub location: LineLocation,
}

impl<'src> Prototype<'src> {
    /// Builds a prototype, rejecting repeated parameter names. The error
    /// carries the first repeated name.
    pub fn try_new(
        name: &'src str,
        params: Vec<&'src str>,
        location: LineLocation,
    ) -> Result<Self, &'src str> {
        for (i, param) in params.iter().enumerate() {
            if params[..i].contains(param) {
                return Err(*param);
            }
        }
        Ok(Prototype {
            name,
            params,
            location,
        })
    }

    /// The zero-parameter prototype used for top-level expressions.
    pub fn anonymous(location: LineLocation) -> Self {
        Prototype {
            name: ANON_EXPR_NAME,
            params: Vec::new(),
            location,
        }
    }

    pub fn name(&self) -> &'src str {
        self.name
    }

    pub fn params(&self) -> &[&'src str] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function<'src> {
    pub proto: Prototype<'src>,
    pub body: Block<'src>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Block<'src> {
    pub statements: Vec<Stmt<'src>>,
    pub tail_return: Option<Return<'src>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Return<'src> {
    pub value: Option<Expr<'src>>,
    pub location: LineLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionStmt<'src> {
    pub proto: Prototype<'src>,
    pub body: Expr<'src>,
}

impl<'src> ExpressionStmt<'src> {
    pub fn new(body: Expr<'src>) -> Self {
        ExpressionStmt {
            proto: Prototype::anonymous(body.location),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStmt<'src> {
    pub condition: Expr<'src>,
    pub then_block: Block<'src>,
    /// An `elif` arm, always an `Stmt::If`.
    pub else_if: Option<Box<Stmt<'src>>>,
    pub else_block: Option<Block<'src>>,
    pub location: LineLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt<'src> {
    Prototype(Prototype<'src>),
    Function(Function<'src>),
    Block(Block<'src>),
    Return(Return<'src>),
    Expression(ExpressionStmt<'src>),
    If(IfStmt<'src>),
}

impl<'src> Stmt<'src> {
    pub fn ast_kind(&self) -> AstKind {
        match self {
            Stmt::Prototype(_) => AstKind::PrototypeStmt,
            Stmt::Function(_) => AstKind::FunctionStmt,
            Stmt::Block(_) => AstKind::BlockStmt,
            Stmt::Return(_) => AstKind::ReturnStmt,
            Stmt::Expression(_) => AstKind::ExpressionStmt,
            Stmt::If(_) => AstKind::IfStmt,
        }
    }

    pub fn as_prototype(&self) -> Option<&Prototype<'src>> {
        match self {
            Stmt::Prototype(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function<'src>> {
        match self {
            Stmt::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&ExpressionStmt<'src>> {
        match self {
            Stmt::Expression(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_if(&self) -> Option<&IfStmt<'src>> {
        match self {
            Stmt::If(i) => Some(i),
            _ => None,
        }
    }
}
