use super::locations::Span;
use const_format::concatcp;
use derivative::Derivative;
use once_cell::sync::Lazy;
use regex::Regex;
use std::iter::FusedIterator;

#[derive(Clone, Default, Debug, Derivative)]
#[derivative(PartialEq)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    #[derivative(PartialEq = "ignore")]
    pub(crate) span: Span,
}

impl Token {
    pub(crate) fn new(typ: TokenType, lexeme: &str, span: Span) -> Self {
        Self {
            typ,
            lexeme: lexeme.to_string(),
            span,
        }
    }

    pub fn typ(&self) -> TokenType {
        self.typ
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TokenType {
    NUMBER,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    LPAR,
    RPAR,
    CIRCUMFLEX,
    SQRT,
    #[default]
    ERRORTOKEN,
    ENDMARKER,
}

impl TokenType {
    /// Human readable name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::NUMBER => "a number",
            Self::PLUS => "'+'",
            Self::MINUS => "'-'",
            Self::STAR => "'*'",
            Self::SLASH => "'/'",
            Self::LPAR => "'('",
            Self::RPAR => "')'",
            Self::CIRCUMFLEX => "'^'",
            Self::SQRT => "'sqrt'",
            Self::ERRORTOKEN => "an invalid character",
            Self::ENDMARKER => "end of input",
        }
    }
}

const LPAR: (&str, TokenType) = ("(", TokenType::LPAR);
const RPAR: (&str, TokenType) = (")", TokenType::RPAR);
const PLUS: (&str, TokenType) = ("+", TokenType::PLUS);
const MINUS: (&str, TokenType) = ("-", TokenType::MINUS);
const STAR: (&str, TokenType) = ("*", TokenType::STAR);
const SLASH: (&str, TokenType) = ("/", TokenType::SLASH);
const CIRCUMFLEX: (&str, TokenType) = ("^", TokenType::CIRCUMFLEX);

const SIMPLE_TOKENS: [(&str, TokenType); 7] = [LPAR, RPAR, PLUS, MINUS, STAR, SLASH, CIRCUMFLEX];

macro_rules! alternative {
    ($t:expr) => {{
        $t
    }};
    ($t:expr, $($ts:expr),+) => {{
        concatcp!($t, "|", alternative!($($ts),+))
    }}
}

macro_rules! group {
    ($($ts:expr),+) => {{
        concatcp!(r"(?:", alternative!($($ts),+), ")")
    }}
}

macro_rules! maybe {
    ($($ts:expr),+) => {
        concatcp!(group!($($ts),+), r"?")
    }
}

pub(crate) const KEYWORD_SQRT: &str = "sqrt";

const S_WHITESPACE: &str = r"^\s+";
const S_DIGITS: &str = r"[0-9]+";
// At most one decimal point; a second one starts the next token.
const S_NUMBER: &str = concatcp!(
    "^",
    group!(
        concatcp!(S_DIGITS, maybe!(concatcp!(r"\.", "[0-9]*"))),
        r"\.[0-9]*"
    )
);
// Only `sqrt` is consumed, the parenthesis is left for the next token.
const S_SQRT: &str = concatcp!("^", KEYWORD_SQRT, r"\(");

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_WHITESPACE).expect("Error compiling regex."));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(S_NUMBER).expect("Error compiling regex."));
static SQRT: Lazy<Regex> = Lazy::new(|| Regex::new(S_SQRT).expect("Error compiling regex."));

/// Pull-based tokenizer over a single line of input.
///
/// Once the input is exhausted every further call to [`Lexer::next_token`]
/// returns an `ENDMARKER` token with an empty lexeme.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    text: &'a str,
    position: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            position: 0,
            column: 0,
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let rest = self.rest();
        let Some(chr) = rest.chars().next() else {
            return Token::new(
                TokenType::ENDMARKER,
                "",
                Span::new(self.column, self.column),
            );
        };

        if let Some(m) = NUMBER.find(rest) {
            return self.emit(TokenType::NUMBER, m.end());
        }
        if SQRT.is_match(rest) {
            return self.emit(TokenType::SQRT, KEYWORD_SQRT.len());
        }
        for (lexeme, tok_type) in SIMPLE_TOKENS {
            if rest.starts_with(lexeme) {
                return self.emit(tok_type, lexeme.len());
            }
        }
        self.emit(TokenType::ERRORTOKEN, chr.len_utf8())
    }

    fn rest(&self) -> &'a str {
        &self.text[self.position..]
    }

    fn skip_whitespace(&mut self) {
        if let Some(m) = WHITESPACE.find(self.rest()) {
            self.advance(m.end());
        }
    }

    fn advance(&mut self, len: usize) -> &'a str {
        let consumed = &self.text[self.position..self.position + len];
        self.position += len;
        self.column += consumed.chars().count();
        consumed
    }

    fn emit(&mut self, typ: TokenType, len: usize) -> Token {
        let start = self.column;
        let lexeme = self.advance(len);
        let token = Token::new(typ, lexeme, Span::new(start, self.column));
        log::trace!("token {} at {}", token, token.span);
        token
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        match token.typ {
            TokenType::ENDMARKER => None,
            _ => Some(token),
        }
    }
}

impl FusedIterator for Lexer<'_> {}

/// Tokenizes a whole line, including the trailing `ENDMARKER`.
pub fn tokenize_string(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens: Vec<Token> = lexer.by_ref().collect();
    tokens.push(lexer.next_token());
    tokens
}
