use crate::expr::ast::*;
use crate::expr::error::{EvalFailure, EvalResult};
use crate::expr::token::{Token, TokenKind};

/// Deepest nesting of parentheses, bars, calls and operators accepted.
pub const MAX_DEPTH: usize = 256;

/// Pratt parser for the restricted arithmetic grammar.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    variable: String,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, variable: impl Into<String>) -> Self {
        Self {
            tokens,
            pos: 0,
            variable: variable.into(),
            depth: 0,
        }
    }

    /// Parse a complete expression; trailing tokens are an error.
    pub fn parse(&mut self) -> EvalResult<Expr> {
        if self.is_at_end() {
            return Err(EvalFailure::syntax("empty expression"));
        }
        let expr = self.parse_expr(0)?;
        if !self.is_at_end() {
            let tok = self.peek();
            return Err(
                EvalFailure::syntax(format!("unexpected {:?} after expression", tok.kind))
                    .with_span(tok.span),
            );
        }
        Ok(expr)
    }

    /// Every recursive descent passes through here, so this bounds the
    /// stack used by the parser and by evaluation of the resulting tree.
    fn parse_expr(&mut self, min_bp: u8) -> EvalResult<Expr> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalFailure::syntax("expression nested too deeply").with_span(self.peek().span));
        }
        self.depth += 1;
        let result = self.parse_binary(min_bp);
        self.depth -= 1;
        result
    }

    /// Pratt parser: parse expression with given minimum binding power.
    fn parse_binary(&mut self, min_bp: u8) -> EvalResult<Expr> {
        let mut lhs = self.parse_prefix()?;
        // left-associative chains deepen the tree without recursing here
        let mut folds = 0;

        loop {
            let (op, left_bp, right_bp) = match self.peek_kind() {
                TokenKind::Plus => (BinOpKind::Add, 9, 10),
                TokenKind::Minus => (BinOpKind::Sub, 9, 10),
                TokenKind::Star => (BinOpKind::Mul, 11, 12),
                TokenKind::Slash => (BinOpKind::Div, 11, 12),
                TokenKind::Caret => (BinOpKind::Pow, 16, 15), // right-associative
                _ => break,
            };

            if left_bp < min_bp {
                break;
            }

            folds += 1;
            if self.depth + folds > MAX_DEPTH {
                return Err(EvalFailure::syntax("expression nested too deeply").with_span(self.peek().span));
            }
            self.advance();
            let rhs = self.parse_expr(right_bp)?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::BinOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> EvalResult<Expr> {
        match self.peek_kind() {
            TokenKind::Number(_) => {
                let tok = self.advance();
                match tok.kind {
                    TokenKind::Number(n) => Ok(Expr::Number(n, tok.span)),
                    _ => unreachable!(),
                }
            }
            TokenKind::Ident(_) => self.parse_ident(),
            TokenKind::LParen => {
                self.expect(TokenKind::LParen)?;
                let expr = self.parse_expr(0)?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Pipe => self.parse_abs(),
            TokenKind::Minus => {
                let op_span = self.advance().span;
                let operand = self.parse_expr(13)?; // unary - binds tighter than + -
                let span = op_span.merge(operand.span());
                Ok(Expr::Neg {
                    operand: Box::new(operand),
                    span,
                })
            }
            TokenKind::Plus => {
                self.advance();
                self.parse_expr(13)
            }
            _ => {
                let tok = self.peek();
                Err(
                    EvalFailure::syntax(format!("expected expression, found {:?}", tok.kind))
                        .with_span(tok.span),
                )
            }
        }
    }

    /// Resolve an identifier against the variable, the constants and the
    /// function allow-list.
    fn parse_ident(&mut self) -> EvalResult<Expr> {
        let tok = self.advance();
        let name = match tok.kind {
            TokenKind::Ident(name) => name,
            _ => unreachable!(),
        };

        if name == self.variable {
            return Ok(Expr::Var(tok.span));
        }
        if let Some(func) = MathFn::from_name(&name) {
            if self.peek_kind() != TokenKind::LParen {
                return Err(
                    EvalFailure::syntax(format!("function '{}' must be called", name))
                        .with_span(tok.span),
                );
            }
            self.expect(TokenKind::LParen)?;
            let arg = self.parse_expr(0)?;
            let end = self.expect(TokenKind::RParen).map_err(|e| {
                EvalFailure::syntax(format!("'{}' takes exactly one argument", func.name()))
                    .with_span(e.span.unwrap_or(tok.span))
            })?;
            return Ok(Expr::Call {
                func,
                arg: Box::new(arg),
                span: tok.span.merge(end.span),
            });
        }
        if let Some(constant) = MathConst::from_name(&name) {
            return Ok(Expr::Const(constant, tok.span));
        }
        Err(EvalFailure::syntax(format!("unknown identifier '{}'", name)).with_span(tok.span))
    }

    fn parse_abs(&mut self) -> EvalResult<Expr> {
        let start = self.expect(TokenKind::Pipe)?.span;
        let inner = self.parse_expr(0)?;
        let end = self.expect(TokenKind::Pipe)?.span;
        // Desugar |x| to abs(x)
        Ok(Expr::Call {
            func: MathFn::Abs,
            arg: Box::new(inner),
            span: start.merge(end),
        })
    }

    // --- Token helpers ---

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind.clone()
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind) -> EvalResult<Token> {
        let tok = self.peek().clone();
        if std::mem::discriminant(&tok.kind) == std::mem::discriminant(&kind) {
            Ok(self.advance())
        } else {
            Err(
                EvalFailure::syntax(format!("expected {:?}, found {:?}", kind, tok.kind))
                    .with_span(tok.span),
            )
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.tokens[self.pos].kind, TokenKind::Eof)
    }
}
