//! file: core/src/lexer/token.rs
//! description: token kinds, token values and the keyword table.
//!
use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::Serialize;

use crate::location::LineLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Eof,

    // single character tokens
    Equal,
    Plus,
    Minus,
    Star,
    Slash,
    Greater,
    Lesser,
    Bang,
    LeftParen,
    RightParen,
    Comma,

    // two character tokens
    BangEqual,
    EqualEqual,
    GreaterEqual,
    LesserEqual,

    // keywords
    And,
    Or,
    If,
    Elif,
    Else,
    Then,
    Let,
    Def,
    End,
    Extern,
    Return,

    Identifier,
    Number,
    String,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = {
        let mut m = HashMap::new();
        m.insert("and", TokenKind::And);
        m.insert("or", TokenKind::Or);
        m.insert("if", TokenKind::If);
        m.insert("elif", TokenKind::Elif);
        m.insert("else", TokenKind::Else);
        m.insert("then", TokenKind::Then);
        m.insert("let", TokenKind::Let);
        m.insert("def", TokenKind::Def);
        m.insert("end", TokenKind::End);
        m.insert("extern", TokenKind::Extern);
        m.insert("return", TokenKind::Return);
        m
    };
}

impl TokenKind {
    /// Looks up a lexeme in the keyword table. Only word-shaped lexemes
    /// (leading letter or `_`, then alphanumerics or `_`) are considered.
    pub fn keyword(lexeme: &str) -> Option<TokenKind> {
        let mut chars = lexeme.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return None,
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        KEYWORDS.get(lexeme).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Equal => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Greater => ">",
            TokenKind::Lesser => "<",
            TokenKind::Bang => "!",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Comma => ",",
            TokenKind::BangEqual => "!=",
            TokenKind::EqualEqual => "==",
            TokenKind::GreaterEqual => ">=",
            TokenKind::LesserEqual => "<=",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::If => "if",
            TokenKind::Elif => "elif",
            TokenKind::Else => "else",
            TokenKind::Then => "then",
            TokenKind::Let => "let",
            TokenKind::Def => "def",
            TokenKind::End => "end",
            TokenKind::Extern => "extern",
            TokenKind::Return => "return",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Identifier | TokenKind::Number | TokenKind::String => {
                write!(f, "{}", self.as_str())
            }
            _ => write!(f, "'{}'", self.as_str()),
        }
    }
}

/// Literal payload carried by identifier, number and string tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TokenValue<'src> {
    Number(f64),
    Text(&'src str),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub value: Option<TokenValue<'src>>,
    pub location: LineLocation,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, value: Option<TokenValue<'src>>, location: LineLocation) -> Self {
        Token {
            kind,
            value,
            location,
        }
    }

    pub fn number(&self) -> Option<f64> {
        match self.value {
            Some(TokenValue::Number(n)) => Some(n),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&'src str> {
        match self.value {
            Some(TokenValue::Text(s)) => Some(s),
            _ => None,
        }
    }
}

/// The printable form used in diagnostics, e.g. `identifier 'foo'`.
impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.value) {
            (TokenKind::Identifier, Some(TokenValue::Text(s))) => write!(f, "identifier '{}'", s),
            (TokenKind::String, Some(TokenValue::Text(s))) => write!(f, "string \"{}\"", s),
            (TokenKind::Number, Some(TokenValue::Number(n))) => write!(f, "number {}", n),
            (kind, _) => write!(f, "{}", kind),
        }
    }
}
