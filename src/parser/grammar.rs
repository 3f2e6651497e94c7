// # ========================= START OF THE GRAMMAR =========================
//
// # Rules are listed from the lowest binding to the highest. Every rule is a
// # method on `Parser`; the parser keeps a single token of lookahead.
// #
// # Note that '^' shares its level with '+' and '-': `2 + 3 ^ 2` is
// # `(2 + 3) ^ 2`. All three fold strictly from left to right.
// #
// # Parentheses and sqrt may nest at most MAX_DEPTH levels deep.
//
// line: expression ENDMARKER
// expression: term (('+' | '-' | '^') term)*
// term: factor (('*' | '/') factor)*
// factor:
//     | NUMBER
//     | '(' expression ')'
//     | 'sqrt' '(' expression ')'

use super::ast::{Expression, Operator};
use super::error::Error;
use super::locations::Locatable;
use super::tokenizer::{Lexer, Token, TokenType as TT};

pub const MAX_DEPTH: usize = 256;

/// How a `NUMBER` lexeme that does not convert to `f64` (such as a lone `.`)
/// is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberMode {
    /// Report a numeric-format error.
    #[default]
    Strict,
    /// Substitute `0.0` and carry on.
    Lenient,
}

pub type ParseResult<T> = Result<T, Error>;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    number_mode: NumberMode,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>, number_mode: NumberMode) -> Self {
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            number_mode,
            depth: 0,
        }
    }

    fn eat(&mut self, expected: TT) -> ParseResult<Token> {
        if self.current.typ == expected {
            let next = self.lexer.next_token();
            return Ok(std::mem::replace(&mut self.current, next));
        }
        if self.current.typ == TT::ERRORTOKEN {
            return Err(Error::invalid_character(&self.current));
        }
        Err(Error::UnexpectedToken {
            expected,
            found: self.current.clone(),
        })
    }

    // line: expression ENDMARKER
    pub fn line(&mut self) -> ParseResult<Expression> {
        let expr = self.expression()?;
        self.eat(TT::ENDMARKER)?;
        Ok(expr)
    }

    // expression: term (('+' | '-' | '^') term)*
    pub fn expression(&mut self) -> ParseResult<Expression> {
        let first = self.term()?;
        self.fold(first, Operator::additive, Self::term)
    }

    // term: factor (('*' | '/') factor)*
    fn term(&mut self) -> ParseResult<Expression> {
        let first = self.factor()?;
        self.fold(first, Operator::multiplicative, Self::factor)
    }

    // factor: NUMBER | '(' expression ')' | 'sqrt' '(' expression ')'
    fn factor(&mut self) -> ParseResult<Expression> {
        match self.current.typ {
            TT::NUMBER => {
                let token = self.eat(TT::NUMBER)?;
                Ok(Expression::Number(self.number(&token)?, token.span))
            }
            TT::LPAR => {
                let open = self.eat(TT::LPAR)?;
                self.enter(&open)?;
                let result = self.expression()?;
                self.eat(TT::RPAR)?;
                self.depth -= 1;
                Ok(result)
            }
            TT::SQRT => {
                let start = self.eat(TT::SQRT)?;
                self.enter(&start)?;
                self.eat(TT::LPAR)?;
                let arg = self.expression()?;
                let end = self.eat(TT::RPAR)?;
                self.depth -= 1;
                Ok(Expression::Sqrt(Box::new(arg), start.span.till(&end)))
            }
            TT::ERRORTOKEN => Err(Error::invalid_character(&self.current)),
            _ => Err(Error::UnexpectedFactor {
                found: self.current.clone(),
            }),
        }
    }

    fn enter(&mut self, token: &Token) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::NestingTooDeep {
                limit: MAX_DEPTH,
                span: token.span,
            });
        }
        Ok(())
    }

    /// Collects `(operator operand)*` after `first` for as long as `operator`
    /// recognises the lookahead. The chain stays flat, so long inputs like
    /// `1 + 1 + ... + 1` do not deepen the tree.
    fn fold<F>(
        &mut self,
        first: Expression,
        operator: fn(TT) -> Option<Operator>,
        operand: F,
    ) -> ParseResult<Expression>
    where
        F: Fn(&mut Self) -> ParseResult<Expression>,
    {
        let mut rest = Vec::new();
        while let Some(op) = operator(self.current.typ) {
            self.eat(self.current.typ)?;
            rest.push((op, operand(self)?));
        }
        let Some((_, last)) = rest.last() else {
            return Ok(first);
        };
        let span = first.span().till(last);
        Ok(Expression::Fold(Box::new(first), rest, span))
    }

    fn number(&self, token: &Token) -> ParseResult<f64> {
        match token.lexeme.parse::<f64>() {
            Ok(value) => Ok(value),
            Err(_) if self.number_mode == NumberMode::Lenient => {
                log::warn!(
                    "malformed number '{}' at {}, using 0",
                    token.lexeme,
                    token.span
                );
                Ok(0.0)
            }
            Err(_) => Err(Error::NumericFormat {
                lexeme: token.lexeme.clone(),
                span: token.span,
            }),
        }
    }
}

/// Parses a single line into an expression tree.
pub fn parse(input: &str, number_mode: NumberMode) -> ParseResult<Expression> {
    let mut parser = Parser::new(Lexer::new(input), number_mode);
    let tree = parser.line()?;
    log::debug!("parsed '{}' as {}", input.trim(), tree);
    Ok(tree)
}
