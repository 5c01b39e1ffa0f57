//! jscope_parser: Recursive descent parser for ES5 JavaScript.
//!
//! Turns source text into an arena [`jscope_ast::Ast`] plus syntax error
//! markers. Parsing never fails outright; malformed input yields a tree with
//! `Missing` nodes where something was expected.

mod parser;
mod precedence;
mod utilities;

pub use parser::{parse, parse_with_interner, ParseResult, Parser};
