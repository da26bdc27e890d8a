use super::{ParseError, Parser};
use crate::ast::{ANON_EXPR_NAME, Block, ExpressionStmt, Function, IfStmt, Prototype, Return, Stmt};
use crate::lexer::TokenKind;

const FUNCTION_TERMINATORS: &[TokenKind] = &[TokenKind::End];
const IF_ARM_TERMINATORS: &[TokenKind] = &[TokenKind::Elif, TokenKind::Else, TokenKind::End];

fn describe_terminators(terminators: &[TokenKind]) -> String {
    let names: Vec<String> = terminators.iter().map(|t| t.to_string()).collect();
    match names.split_last() {
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
        None => "statement".to_string(),
    }
}

impl<'src> Parser<'src> {
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt<'src>, ParseError> {
        match self.peek().kind {
            TokenKind::Def => self.parse_function_definition(),
            TokenKind::Extern => self.parse_extern(),
            _ => self.parse_expression_stmt(),
        }
    }

    /// A top-level expression, wrapped in the anonymous prototype.
    fn parse_expression_stmt(&mut self) -> Result<Stmt<'src>, ParseError> {
        let expr = self.parse_expression()?;
        Ok(Stmt::Expression(ExpressionStmt::new(expr)))
    }

    fn parse_function_definition(&mut self) -> Result<Stmt<'src>, ParseError> {
        self.consume(TokenKind::Def, "'def'", "poly.parser.parse_function_definition")?;
        let proto = self.parse_prototype()?;
        let body = self.parse_block(FUNCTION_TERMINATORS)?;
        self.consume(
            TokenKind::End,
            "'end' after function body",
            "poly.parser.parse_function_definition",
        )?;
        Ok(Stmt::Function(Function { proto, body }))
    }

    /// `extern name(params)` declares a function without a body.
    fn parse_extern(&mut self) -> Result<Stmt<'src>, ParseError> {
        self.consume(TokenKind::Extern, "'extern'", "poly.parser.parse_extern")?;
        Ok(Stmt::Prototype(self.parse_prototype()?))
    }

    fn parse_prototype(&mut self) -> Result<Prototype<'src>, ParseError> {
        const ISSUER: &str = "poly.parser.parse_prototype";

        let (name, location) = self.consume_identifier("function name in prototype", ISSUER)?;
        if name == ANON_EXPR_NAME {
            return Err(ParseError::with(
                format!("'{}' is reserved for top-level expressions", name),
                ISSUER,
                location,
            ));
        }
        self.consume(TokenKind::LeftParen, "'(' in prototype", ISSUER)?;

        let mut params = Vec::new();
        let mut param_locations = Vec::new();
        if !self.match_kind(TokenKind::RightParen) {
            loop {
                let (param, param_location) = self.consume_identifier("parameter name", ISSUER)?;
                params.push(param);
                param_locations.push(param_location);

                if self.match_kind(TokenKind::RightParen) {
                    break;
                }
                self.consume(TokenKind::Comma, "')' or ',' in prototype", ISSUER)?;
            }
        }

        Prototype::try_new(name, params.clone(), location).map_err(|duplicate| {
            let at = params
                .iter()
                .rposition(|p| *p == duplicate)
                .map(|idx| param_locations[idx])
                .unwrap_or(location);
            ParseError::with(
                format!("duplicate parameter '{}' in prototype '{}'", duplicate, name),
                ISSUER,
                at,
            )
        })
    }

    /// Statements up to (not including) one of `terminators`, with an
    /// optional trailing `return`.
    fn parse_block(&mut self, terminators: &[TokenKind]) -> Result<Block<'src>, ParseError> {
        let mut block = Block::default();

        loop {
            if self.check(TokenKind::Return) {
                block.tail_return = Some(self.parse_return(terminators)?);
                break;
            }
            if self.check_any(terminators) {
                break;
            }
            if self.is_finished() {
                return Err(ParseError::expected(
                    &describe_terminators(terminators),
                    self.peek(),
                    "poly.parser.parse_block",
                ));
            }

            let statement = if self.check(TokenKind::If) {
                self.parse_if_stmt()?
            } else {
                self.parse_expression_stmt()?
            };
            block.statements.push(statement);
        }

        Ok(block)
    }

    fn parse_return(&mut self, terminators: &[TokenKind]) -> Result<Return<'src>, ParseError> {
        let keyword = self.consume(TokenKind::Return, "'return'", "poly.parser.parse_return")?;
        let value = if self.check_any(terminators) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        Ok(Return {
            value,
            location: keyword.location,
        })
    }

    /// `if cond then ... (elif cond then ...)* (else ...)? end`. An `elif`
    /// arm is parsed as a nested `if` that owns the closing `end`.
    fn parse_if_stmt(&mut self) -> Result<Stmt<'src>, ParseError> {
        const ISSUER: &str = "poly.parser.parse_if_stmt";

        if !self.check_any(&[TokenKind::If, TokenKind::Elif]) {
            return Err(ParseError::expected("'if'", self.peek(), ISSUER));
        }
        let keyword = self.advance();

        let condition = self.parse_expression()?;
        self.consume(TokenKind::Then, "'then' after condition", ISSUER)?;
        let then_block = self.parse_block(IF_ARM_TERMINATORS)?;

        let mut else_if = None;
        let mut else_block = None;
        if self.check(TokenKind::Elif) {
            else_if = Some(Box::new(self.parse_if_stmt()?));
        } else if self.match_kind(TokenKind::Else) {
            else_block = Some(self.parse_block(FUNCTION_TERMINATORS)?);
            self.consume(TokenKind::End, "'end' after else block", ISSUER)?;
        } else {
            self.consume(TokenKind::End, "'end' after if block", ISSUER)?;
        }

        Ok(Stmt::If(IfStmt {
            condition,
            then_block,
            else_if,
            else_block,
            location: keyword.location,
        }))
    }
}
