use crate::expr::ast::MathFn;
use crate::expr::error::{EvalFailure, EvalResult};
use crate::expr::token::{Span, Token, TokenKind};

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> EvalResult<Vec<Token>> {
        while !self.is_at_end() {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            let token = self.next_token()?;
            // Insert implicit multiplication if applicable
            if let Some(prev) = self.tokens.last() {
                if prev.kind.can_end_implicit_mul() && token.kind.can_start_implicit_mul() {
                    // `sin(` is a call; `x(` and `2(` are products
                    let is_func_call = matches!(&prev.kind, TokenKind::Ident(name) if MathFn::from_name(name).is_some())
                        && matches!(&token.kind, TokenKind::LParen);
                    if !is_func_call {
                        let span = Span::new(prev.span.end, token.span.start);
                        self.tokens.push(Token::new(TokenKind::Star, span));
                    }
                }
            }
            self.tokens.push(token);
        }
        self.tokens
            .push(Token::new(TokenKind::Eof, Span::new(self.pos, self.pos)));
        Ok(self.tokens)
    }

    fn next_token(&mut self) -> EvalResult<Token> {
        let start = self.pos;
        let ch = self.advance();

        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' | '\u{2212}' => TokenKind::Minus, // − (minus sign)
            '*' | '\u{00D7}' | '\u{22C5}' => TokenKind::Star, // × ⋅
            '/' | '\u{00F7}' => TokenKind::Slash, // ÷
            '^' => TokenKind::Caret,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '|' => TokenKind::Pipe,
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                return self.read_number(start);
            }
            c if c.is_ascii_digit() => return self.read_number(start),
            c if is_ident_char(c) => return Ok(self.read_identifier(start)),
            _ => {
                return Err(
                    EvalFailure::syntax(format!("unexpected character: '{}'", ch))
                        .with_span(Span::new(start, self.pos)),
                )
            }
        };
        Ok(Token::new(kind, Span::new(start, self.pos)))
    }

    fn read_number(&mut self, start: usize) -> EvalResult<Token> {
        self.skip_digits();

        if self.peek() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        // Scientific notation only when digits follow; `2e^x` keeps `e` as a constant
        if matches!(self.peek(), Some('e') | Some('E')) {
            let exponent_follows = match self.peek_at(1) {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => self.peek_at(2).is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if exponent_follows {
                self.advance();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.advance();
                }
                self.skip_digits();
            }
        }

        let text: String = self.source[start..self.pos].iter().collect();
        let value: f64 = text.parse().map_err(|_| {
            EvalFailure::syntax(format!("invalid number: {}", text))
                .with_span(Span::new(start, self.pos))
        })?;
        Ok(Token::new(TokenKind::Number(value), Span::new(start, self.pos)))
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self.peek().is_some_and(is_ident_char) {
            self.advance();
        }
        let text: String = self.source[start..self.pos].iter().collect();
        Token::new(TokenKind::Ident(text), Span::new(start, self.pos))
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn advance(&mut self) -> char {
        let ch = self.source[self.pos];
        self.pos += 1;
        ch
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source.get(self.pos + offset).copied()
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }
}

/// Identifiers are letters only, so `x2` reads as `x * 2`.
fn is_ident_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}
