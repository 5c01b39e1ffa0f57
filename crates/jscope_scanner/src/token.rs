//! Token information produced by the scanner.

use jscope_ast::syntax_kind::SyntaxKind;
use jscope_core::text::TextRange;
use jscope_diagnostics::MarkerMessage;

/// Information about a scanned token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    /// The kind of token.
    pub kind: SyntaxKind,
    /// Byte range of the token in the source text.
    pub range: TextRange,
    /// The decoded text of the token (identifiers, literals).
    pub text: String,
    /// Whether there was a line break before this token.
    pub preceding_line_break: bool,
}

impl TokenInfo {
    /// The length of this token in bytes.
    pub fn len(&self) -> u32 {
        self.range.len()
    }

    /// Whether this token has zero length.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// A lexical error, positioned by byte range.
///
/// The parser turns these into markers once the line map is known.
#[derive(Debug, Clone)]
pub struct ScanError {
    pub range: TextRange,
    pub message: &'static MarkerMessage,
}
