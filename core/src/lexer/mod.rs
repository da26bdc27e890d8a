//! file: core/src/lexer/mod.rs
//! description: hand written scanner turning source text into tokens.
//!
//! The scanner makes one left-to-right pass with three cursors: the start of
//! the current token, the scan position and the current line. Lexical
//! errors are collected and scanning resumes with the next character, so a
//! single pass reports every bad character in the input.
//!
pub mod err;
pub mod token;

pub use err::LexError;
pub use token::{Token, TokenKind, TokenValue};

use crate::location::LineLocation;

/// Everything produced by one scan. `tokens` always ends with one `Eof`.
#[derive(Debug, Clone)]
pub struct ScanOutput<'src> {
    pub tokens: Vec<Token<'src>>,
    pub errors: Vec<LexError>,
}

impl<'src> ScanOutput<'src> {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}

/// Convenience wrapper around `Lexer::new(source).scan_tokens()`.
pub fn scan(source: &str) -> ScanOutput<'_> {
    Lexer::new(source).scan_tokens()
}

pub struct Lexer<'src> {
    source: &'src str,
    start: usize,
    current: usize,
    line: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            start: 0,
            current: 0,
            line: 1,
        }
    }

    pub fn scan_tokens(mut self) -> ScanOutput<'src> {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        while !self.is_finished() {
            self.start = self.current;
            match self.scan_single_token() {
                Ok(Some(token)) => {
                    log::trace!("[lexer] {:?} at {}", token.kind, token.location);
                    tokens.push(token);
                }
                Ok(None) => {}
                Err(err) => {
                    log::debug!("[lexer] {}", err);
                    errors.push(err);
                }
            }
        }

        tokens.push(Token::new(
            TokenKind::Eof,
            None,
            LineLocation::new(self.current, self.current, self.line),
        ));

        ScanOutput { tokens, errors }
    }

    fn scan_single_token(&mut self) -> Result<Option<Token<'src>>, LexError> {
        let c = self.advance();

        let kind = match c {
            b'\n' => {
                self.line += 1;
                return Ok(None);
            }
            b' ' | b'\r' | b'\t' => return Ok(None),
            b'(' => TokenKind::LeftParen,
            b')' => TokenKind::RightParen,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b',' => TokenKind::Comma,
            b'*' => TokenKind::Star,
            b'/' => {
                if self.match_byte(b'/') {
                    while self.peek() != b'\n' && !self.is_finished() {
                        self.advance();
                    }
                    return Ok(None);
                }
                TokenKind::Slash
            }
            b'!' => self.either(b'=', TokenKind::BangEqual, TokenKind::Bang),
            b'>' => self.either(b'=', TokenKind::GreaterEqual, TokenKind::Greater),
            b'<' => self.either(b'=', TokenKind::LesserEqual, TokenKind::Lesser),
            b'=' => self.either(b'=', TokenKind::EqualEqual, TokenKind::Equal),
            b'"' => return self.scan_string().map(Some),
            c if c.is_ascii_alphabetic() || c == b'_' => return Ok(Some(self.scan_identifier())),
            c if c.is_ascii_digit() => return Ok(Some(self.scan_number())),
            _ => {
                // Step over the whole character so later slices stay on
                // char boundaries.
                let ch = self.source[self.start..].chars().next().unwrap_or('\u{fffd}');
                self.current = self.start + ch.len_utf8();
                return Err(LexError::new(
                    format!("Unexpected character '{}'", ch),
                    self.computed_location(),
                ));
            }
        };

        Ok(Some(Token::new(kind, None, self.computed_location())))
    }

    fn scan_string(&mut self) -> Result<Token<'src>, LexError> {
        while self.peek() != b'"' && !self.is_finished() {
            match self.advance() {
                b'\n' => self.line += 1,
                b'\\' if !self.is_finished() => {
                    if self.advance() == b'\n' {
                        self.line += 1;
                    }
                }
                _ => {}
            }
        }

        if self.is_finished() {
            return Err(
                LexError::new("Unterminated string".to_string(), self.computed_location())
                    .with_tip("Consider placing an enclosing \""),
            );
        }

        // closing quote
        self.advance();

        let text = &self.source[self.start + 1..self.current - 1];
        Ok(Token::new(
            TokenKind::String,
            Some(TokenValue::Text(text)),
            LineLocation::new(self.start + 1, self.current - 1, self.line),
        ))
    }

    fn scan_identifier(&mut self) -> Token<'src> {
        while self.peek().is_ascii_alphanumeric() || self.peek() == b'_' {
            self.advance();
        }

        let lexeme = &self.source[self.start..self.current];
        match TokenKind::keyword(lexeme) {
            Some(kind) => Token::new(kind, None, self.computed_location()),
            None => Token::new(
                TokenKind::Identifier,
                Some(TokenValue::Text(lexeme)),
                self.computed_location(),
            ),
        }
    }

    fn scan_number(&mut self) -> Token<'src> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        // forward span: [start, current)
        let lexeme = &self.source[self.start..self.current];
        let value = lexeme.parse::<f64>().unwrap_or_default();

        Token::new(
            TokenKind::Number,
            Some(TokenValue::Number(value)),
            self.computed_location(),
        )
    }

    fn either(&mut self, expected: u8, matched: TokenKind, otherwise: TokenKind) -> TokenKind {
        if self.match_byte(expected) {
            matched
        } else {
            otherwise
        }
    }

    fn computed_location(&self) -> LineLocation {
        LineLocation::new(self.start, self.current, self.line)
    }

    fn is_finished(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> u8 {
        if self.is_finished() {
            return b'\0';
        }
        self.current += 1;
        self.source.as_bytes()[self.current - 1]
    }

    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_finished() && self.peek() == expected {
            self.current += 1;
            return true;
        }
        false
    }

    fn peek(&self) -> u8 {
        self.source.as_bytes().get(self.current).copied().unwrap_or(b'\0')
    }

    fn peek_next(&self) -> u8 {
        self.source
            .as_bytes()
            .get(self.current + 1)
            .copied()
            .unwrap_or(b'\0')
    }
}
