use super::locations::Span;
use super::tokenizer::TokenType as TT;
use derivative::Derivative;

#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub enum Expression {
    Number(f64, #[derivative(PartialEq = "ignore")] Span),
    /// `first op rhs op rhs ...`, applied strictly from left to right.
    Fold(
        Box<Expression>,             // first
        Vec<(Operator, Expression)>, // rest
        #[derivative(PartialEq = "ignore")] Span,
    ),
    Sqrt(Box<Expression>, #[derivative(PartialEq = "ignore")] Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "^",
        }
    }

    /// Operators of the `expression` level, `^` included.
    pub(super) fn additive(typ: TT) -> Option<Self> {
        match typ {
            TT::PLUS => Some(Self::Add),
            TT::MINUS => Some(Self::Subtract),
            TT::CIRCUMFLEX => Some(Self::Power),
            _ => None,
        }
    }

    pub(super) fn multiplicative(typ: TT) -> Option<Self> {
        match typ {
            TT::STAR => Some(Self::Multiply),
            TT::SLASH => Some(Self::Divide),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// Fully parenthesised, so the evaluation order is visible.
impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value, _) => write!(f, "{value}"),
            Self::Fold(first, rest, _) => {
                write!(f, "{}{first}", "(".repeat(rest.len()))?;
                for (op, rhs) in rest {
                    write!(f, " {op} {rhs})")?;
                }
                Ok(())
            }
            Self::Sqrt(arg, _) => write!(f, "sqrt({arg})"),
        }
    }
}
