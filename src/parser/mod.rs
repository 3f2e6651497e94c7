mod ast;
mod error;
mod grammar;
mod locations;
pub mod tokenizer;

pub use ast::*;
pub use error::Error;
pub use grammar::{parse, NumberMode, ParseResult, Parser, MAX_DEPTH};
pub use locations::{Locatable, Span};
pub use tokenizer::tokenize_string;
