use super::{ParseError, Parser};
use crate::ast::Expr;
use crate::lexer::TokenKind;

impl<'src> Parser<'src> {
    pub(crate) fn parse_expression(&mut self) -> Result<Expr<'src>, ParseError> {
        let lhs = self.parse_primary()?;
        self.parse_bin_op_rhs(0, lhs)
    }

    /// Precedence climbing. Consumes operators binding at least as tightly
    /// as `min_prec`; a following operator that binds tighter than the one
    /// just consumed is folded into the right-hand side first, so equal
    /// precedence associates to the left.
    fn parse_bin_op_rhs(&mut self, min_prec: i32, mut lhs: Expr<'src>) -> Result<Expr<'src>, ParseError> {
        loop {
            let tok_prec = self.token_precedence();
            if tok_prec < min_prec {
                return Ok(lhs);
            }

            let op = self.advance();
            let mut rhs = self.parse_primary()?;

            let next_prec = self.token_precedence();
            if tok_prec < next_prec {
                rhs = self.parse_bin_op_rhs(tok_prec + 1, rhs)?;
            }

            lhs = Expr::binary(op.kind, lhs, rhs, op.location);
        }
    }

    fn parse_primary(&mut self) -> Result<Expr<'src>, ParseError> {
        let token = *self.peek();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                Ok(Expr::number(token.number().unwrap_or_default(), token.location))
            }
            TokenKind::Identifier => self.parse_identifier_expr(),
            TokenKind::LeftParen => self.parse_grouping_expr(),
            _ => Err(ParseError::expected(
                "expression",
                &token,
                "poly.parser.parse_primary",
            )),
        }
    }

    fn parse_grouping_expr(&mut self) -> Result<Expr<'src>, ParseError> {
        self.consume(TokenKind::LeftParen, "'('", "poly.parser.parse_grouping_expr")?;
        let expr = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "')'", "poly.parser.parse_grouping_expr")?;
        Ok(expr)
    }

    /// A bare variable reference, or a call when `(` follows immediately.
    fn parse_identifier_expr(&mut self) -> Result<Expr<'src>, ParseError> {
        let (name, location) = self.consume_identifier("identifier", "poly.parser.parse_identifier_expr")?;

        if !self.match_kind(TokenKind::LeftParen) {
            return Ok(Expr::variable(name, location));
        }

        let mut args = Vec::new();
        if !self.match_kind(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression()?);

                if self.match_kind(TokenKind::RightParen) {
                    break;
                }
                if !self.match_kind(TokenKind::Comma) {
                    return Err(ParseError::expected(
                        "')' or ',' in argument list",
                        self.peek(),
                        "poly.parser.parse_identifier_expr",
                    ));
                }
            }
        }

        Ok(Expr::call(name, args, location))
    }
}
