//! file: core/src/parser/mod.rs
//! description: recursive descent parser over the token stream.
//!
//! Statements and primaries are parsed by recursive descent, binary
//! expressions by precedence climbing (see `expr.rs`). There is no error
//! recovery: the first statement that fails aborts the whole parse.
//!
pub mod err;
mod expr;
mod stmt;

pub use err::ParseError;

use crate::ast::Stmt;
use crate::lexer::{Token, TokenKind};
use crate::location::LineLocation;

/// Binding strength of a binary operator token, or `None` when the token
/// cannot continue a binary expression. Higher binds tighter.
pub fn precedence(kind: TokenKind) -> Option<i32> {
    match kind {
        TokenKind::Lesser
        | TokenKind::Greater
        | TokenKind::LesserEqual
        | TokenKind::GreaterEqual
        | TokenKind::EqualEqual
        | TokenKind::BangEqual => Some(10),
        TokenKind::Plus | TokenKind::Minus => Some(20),
        TokenKind::Star | TokenKind::Slash => Some(40),
        _ => None,
    }
}

pub struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    current: usize,
}

impl<'src> Parser<'src> {
    /// `tokens` should end with `Eof`; one is appended when missing.
    pub fn new(mut tokens: Vec<Token<'src>>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let end = tokens.last().map(|t| t.location).unwrap_or_default();
            tokens.push(Token::new(
                TokenKind::Eof,
                None,
                LineLocation::new(end.end, end.end, end.line.max(1)),
            ));
        }
        Parser { tokens, current: 0 }
    }

    pub fn parse(&mut self) -> Result<Vec<Stmt<'src>>, ParseError> {
        let mut statements = Vec::new();
        while !self.is_finished() {
            let statement = self.parse_statement()?;
            log::trace!("[parser] parsed {}", statement.ast_kind());
            statements.push(statement);
        }
        Ok(statements)
    }

    fn token_precedence(&self) -> i32 {
        precedence(self.peek().kind).unwrap_or(-1)
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.peek().kind)
    }

    /// Consumes a token of `kind` or fails with `expected <what>, got ...`.
    fn consume(&mut self, kind: TokenKind, what: &str, issuer: &str) -> Result<Token<'src>, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(ParseError::expected(what, self.peek(), issuer))
    }

    fn consume_identifier(&mut self, what: &str, issuer: &str) -> Result<(&'src str, LineLocation), ParseError> {
        let token = *self.peek();
        match (token.kind, token.text()) {
            (TokenKind::Identifier, Some(name)) => {
                self.advance();
                Ok((name, token.location))
            }
            _ => Err(ParseError::expected(what, &token, issuer)),
        }
    }

    fn advance(&mut self) -> Token<'src> {
        let token = *self.peek();
        if !self.is_finished() {
            self.current += 1;
        }
        token
    }

    fn peek(&self) -> &Token<'src> {
        let idx = self.current.min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn is_finished(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }
}
