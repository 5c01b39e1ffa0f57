//! jscope_scanner: Lexer for ES5 source text.
//!
//! Produces tokens from source text with support for:
//! - All ES5 punctuation, keywords and literals
//! - Regular expression literals (rescanned on request from the parser)
//! - Unicode identifiers
//! - Line-break tracking for automatic semicolon insertion

mod char_codes;
mod scanner;
mod token;

pub use scanner::{Scanner, ScannerState};
pub use token::{ScanError, TokenInfo};

use jscope_ast::syntax_kind::SyntaxKind;

/// Scan `text` to the end, without regex context.
///
/// Every slash is scanned as an operator; use the parser for source that
/// contains regular expression literals.
pub fn tokenize(text: &str) -> (Vec<TokenInfo>, Vec<ScanError>) {
    let mut scanner = Scanner::new(text);
    scanner.skip_shebang();
    let mut tokens = Vec::new();
    while scanner.scan() != SyntaxKind::EndOfFileToken {
        tokens.push(scanner.token_info());
    }
    let errors = scanner.take_errors();
    (tokens, errors)
}
