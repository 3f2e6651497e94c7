use super::locations::Span;
use super::tokenizer::{Token, TokenType};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid character '{lexeme}' at {span}")]
    InvalidCharacter { lexeme: String, span: Span },

    #[error("expected {}, found {} at {}", .expected.describe(), describe(.found), .found.span)]
    UnexpectedToken { expected: TokenType, found: Token },

    #[error("expected a number, '(' or 'sqrt', found {} at {}", describe(.found), .found.span)]
    UnexpectedFactor { found: Token },

    #[error("malformed number '{lexeme}' at {span}")]
    NumericFormat { lexeme: String, span: Span },

    #[error("expression nested deeper than {limit} levels at {span}")]
    NestingTooDeep { limit: usize, span: Span },
}

impl Error {
    pub fn span(&self) -> Span {
        match self {
            Self::InvalidCharacter { span, .. } => *span,
            Self::UnexpectedToken { found, .. } => found.span,
            Self::UnexpectedFactor { found } => found.span,
            Self::NumericFormat { span, .. } => *span,
            Self::NestingTooDeep { span, .. } => *span,
        }
    }

    pub(super) fn invalid_character(token: &Token) -> Self {
        Self::InvalidCharacter {
            lexeme: token.lexeme.clone(),
            span: token.span,
        }
    }
}

fn describe(token: &Token) -> String {
    match token.typ {
        TokenType::ENDMARKER => "end of input".to_string(),
        _ => format!("'{}'", token.lexeme),
    }
}
