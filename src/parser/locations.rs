use super::ast::Expression;
use super::tokenizer::Token;

/// Half-open range of character columns within the evaluated line.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl Span {
    pub(crate) fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub(crate) fn till<R: Locatable>(&self, other: &R) -> Self {
        let other = other.span();
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.end <= self.start + 1 {
            write!(f, "column {}", self.start + 1)
        } else {
            write!(f, "columns {}-{}", self.start + 1, self.end)
        }
    }
}

pub trait Locatable {
    fn span(&self) -> Span;
}

impl Locatable for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl Locatable for Token {
    fn span(&self) -> Span {
        self.span
    }
}

impl<R> Locatable for Box<R>
where
    R: Locatable,
{
    fn span(&self) -> Span {
        (**self).span()
    }
}

impl Locatable for Expression {
    fn span(&self) -> Span {
        match self {
            Self::Number(_, s) => *s,
            Self::Fold(_, _, s) => *s,
            Self::Sqrt(_, s) => *s,
        }
    }
}
