mod parser;
pub use parser::tokenizer::{Lexer, Token, TokenType};
pub use parser::{
    parse, tokenize_string, Error, Expression, Locatable, NumberMode, Operator, ParseResult,
    Parser, Span, MAX_DEPTH,
};

mod interpreter;
pub use interpreter::{evaluate, evaluate_line, evaluate_str, format_result, Evaluation, Options};

pub mod config;
pub mod logging;
