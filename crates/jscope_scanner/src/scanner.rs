//! The scanner/lexer.
//!
//! Converts source text into a stream of tokens that the parser pulls one at
//! a time with [`Scanner::scan`]. Positions are byte offsets into the text.
//! Lexical problems are collected as [`ScanError`]s; scanning never stops.

use crate::char_codes::*;
use crate::token::{ScanError, TokenInfo};
use jscope_ast::syntax_kind::SyntaxKind;
use jscope_core::text::TextRange;
use jscope_diagnostics::{messages, MarkerMessage};

/// UTF-8 encodings of U+2028 and U+2029.
const LS_BYTES: &[u8] = "\u{2028}".as_bytes();
const PS_BYTES: &[u8] = "\u{2029}".as_bytes();

/// Saved scanner state for lookahead.
pub struct ScannerState {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    preceding_line_break: bool,
    error_count: usize,
}

/// The scanner converts source text into tokens.
pub struct Scanner<'a> {
    /// The source text being scanned.
    text: &'a str,
    /// Current byte position in the text.
    pos: usize,
    /// Start of the current token (after leading trivia).
    token_start: usize,
    /// The current token kind.
    token: SyntaxKind,
    /// The decoded text of the current token.
    token_value: String,
    /// Whether a line terminator appeared in the trivia before this token.
    preceding_line_break: bool,
    /// Accumulated lexical errors.
    errors: Vec<ScanError>,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source text.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            preceding_line_break: false,
            errors: Vec::new(),
        }
    }

    /// Skip a shebang line at the very beginning of the file (e.g., `#!/usr/bin/env node`).
    /// Call this before the first `scan()` call.
    pub fn skip_shebang(&mut self) {
        if self.pos == 0 && self.text.starts_with("#!") {
            self.pos = line_end(self.text.as_bytes(), 2);
        }
    }

    /// The full source text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Look ahead: save state, call f, restore state and return result.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    /// Get the current token kind.
    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Get the current token's decoded text value.
    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Get the start position of the current token (after trivia).
    #[inline]
    pub fn token_start(&self) -> u32 {
        self.token_start as u32
    }

    /// Get the current position (end of current token).
    #[inline]
    pub fn token_end(&self) -> u32 {
        self.pos as u32
    }

    #[inline]
    pub fn token_range(&self) -> TextRange {
        TextRange::new(self.token_start as u32, self.pos as u32)
    }

    /// Whether the current token was preceded by a line break.
    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    /// Get the accumulated lexical errors.
    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }

    /// Take the accumulated errors, leaving an empty list.
    pub fn take_errors(&mut self) -> Vec<ScanError> {
        std::mem::take(&mut self.errors)
    }

    /// Get a TokenInfo for the current token.
    pub fn token_info(&self) -> TokenInfo {
        TokenInfo {
            kind: self.token,
            range: self.token_range(),
            text: self.token_value.clone(),
            preceding_line_break: self.preceding_line_break,
        }
    }

    /// Save the full scanner state for lookahead.
    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            preceding_line_break: self.preceding_line_break,
            error_count: self.errors.len(),
        }
    }

    /// Restore the full scanner state from a saved state. Errors reported
    /// since the state was saved are discarded.
    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.preceding_line_break = state.preceding_line_break;
        self.errors.truncate(state.error_count);
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes().get(self.pos + offset).copied()
    }

    /// Decode the character at the current position without advancing.
    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[inline]
    fn starts_with(&self, s: &str) -> bool {
        self.text[self.pos..].starts_with(s)
    }

    /// Consume `len` bytes and produce `kind`.
    #[inline]
    fn op(&mut self, len: usize, kind: SyntaxKind) -> SyntaxKind {
        self.pos += len;
        kind
    }

    fn error(&mut self, start: usize, end: usize, message: &'static MarkerMessage) {
        self.errors.push(ScanError {
            range: TextRange::new(start as u32, end as u32),
            message,
        });
    }

    /// Skip whitespace and comments, recording whether a line break was seen.
    fn skip_trivia(&mut self) {
        let bytes = self.bytes();
        loop {
            let Some(&b) = bytes.get(self.pos) else {
                return;
            };
            match b {
                b'\n' | b'\r' => {
                    self.preceding_line_break = true;
                    self.pos += 1;
                }
                b' ' | b'\t' | 0x0B | 0x0C => {
                    self.pos += 1;
                }
                b'/' if self.byte_at(1) == Some(b'/') => {
                    self.pos = line_end(bytes, self.pos + 2);
                }
                b'/' if self.byte_at(1) == Some(b'*') => {
                    let body_start = self.pos + 2;
                    match memchr::memmem::find(&bytes[body_start..], b"*/") {
                        Some(len) => {
                            if contains_line_break(&bytes[body_start..body_start + len]) {
                                self.preceding_line_break = true;
                            }
                            self.pos = body_start + len + 2;
                        }
                        None => {
                            if contains_line_break(&bytes[body_start..]) {
                                self.preceding_line_break = true;
                            }
                            self.error(self.pos, bytes.len(), &messages::ASTERISK_SLASH_EXPECTED);
                            self.pos = bytes.len();
                        }
                    }
                }
                b if b < 0x80 => return,
                _ => match self.current_char() {
                    Some(ch) if is_line_break(ch) => {
                        self.preceding_line_break = true;
                        self.pos += ch.len_utf8();
                    }
                    Some(ch) if is_white_space_single_line(ch) => {
                        self.pos += ch.len_utf8();
                    }
                    _ => return,
                },
            }
        }
    }

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.preceding_line_break = false;
        self.token_value.clear();

        self.skip_trivia();
        self.token_start = self.pos;

        let Some(b) = self.byte_at(0) else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };

        self.token = match b {
            b'(' => self.op(1, SyntaxKind::OpenParenToken),
            b')' => self.op(1, SyntaxKind::CloseParenToken),
            b'{' => self.op(1, SyntaxKind::OpenBraceToken),
            b'}' => self.op(1, SyntaxKind::CloseBraceToken),
            b'[' => self.op(1, SyntaxKind::OpenBracketToken),
            b']' => self.op(1, SyntaxKind::CloseBracketToken),
            b';' => self.op(1, SyntaxKind::SemicolonToken),
            b',' => self.op(1, SyntaxKind::CommaToken),
            b'~' => self.op(1, SyntaxKind::TildeToken),
            b':' => self.op(1, SyntaxKind::ColonToken),
            b'?' => self.op(1, SyntaxKind::QuestionToken),

            b'.' => {
                if self.byte_at(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number()
                } else {
                    self.op(1, SyntaxKind::DotToken)
                }
            }
            b'<' => {
                if self.starts_with("<<=") {
                    self.op(3, SyntaxKind::LessThanLessThanEqualsToken)
                } else if self.starts_with("<<") {
                    self.op(2, SyntaxKind::LessThanLessThanToken)
                } else if self.starts_with("<=") {
                    self.op(2, SyntaxKind::LessThanEqualsToken)
                } else {
                    self.op(1, SyntaxKind::LessThanToken)
                }
            }
            b'>' => {
                if self.starts_with(">>>=") {
                    self.op(4, SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken)
                } else if self.starts_with(">>>") {
                    self.op(3, SyntaxKind::GreaterThanGreaterThanGreaterThanToken)
                } else if self.starts_with(">>=") {
                    self.op(3, SyntaxKind::GreaterThanGreaterThanEqualsToken)
                } else if self.starts_with(">>") {
                    self.op(2, SyntaxKind::GreaterThanGreaterThanToken)
                } else if self.starts_with(">=") {
                    self.op(2, SyntaxKind::GreaterThanEqualsToken)
                } else {
                    self.op(1, SyntaxKind::GreaterThanToken)
                }
            }
            b'=' => {
                if self.starts_with("===") {
                    self.op(3, SyntaxKind::EqualsEqualsEqualsToken)
                } else if self.starts_with("==") {
                    self.op(2, SyntaxKind::EqualsEqualsToken)
                } else {
                    self.op(1, SyntaxKind::EqualsToken)
                }
            }
            b'!' => {
                if self.starts_with("!==") {
                    self.op(3, SyntaxKind::ExclamationEqualsEqualsToken)
                } else if self.starts_with("!=") {
                    self.op(2, SyntaxKind::ExclamationEqualsToken)
                } else {
                    self.op(1, SyntaxKind::ExclamationToken)
                }
            }
            b'+' => match self.byte_at(1) {
                Some(b'+') => self.op(2, SyntaxKind::PlusPlusToken),
                Some(b'=') => self.op(2, SyntaxKind::PlusEqualsToken),
                _ => self.op(1, SyntaxKind::PlusToken),
            },
            b'-' => match self.byte_at(1) {
                Some(b'-') => self.op(2, SyntaxKind::MinusMinusToken),
                Some(b'=') => self.op(2, SyntaxKind::MinusEqualsToken),
                _ => self.op(1, SyntaxKind::MinusToken),
            },
            b'&' => match self.byte_at(1) {
                Some(b'&') => self.op(2, SyntaxKind::AmpersandAmpersandToken),
                Some(b'=') => self.op(2, SyntaxKind::AmpersandEqualsToken),
                _ => self.op(1, SyntaxKind::AmpersandToken),
            },
            b'|' => match self.byte_at(1) {
                Some(b'|') => self.op(2, SyntaxKind::BarBarToken),
                Some(b'=') => self.op(2, SyntaxKind::BarEqualsToken),
                _ => self.op(1, SyntaxKind::BarToken),
            },
            // Comments are handled in skip_trivia, so a slash here is
            // division until the parser asks for a regex rescan.
            b'*' | b'/' | b'%' | b'^' => {
                let (plain, assign) = match b {
                    b'*' => (SyntaxKind::AsteriskToken, SyntaxKind::AsteriskEqualsToken),
                    b'/' => (SyntaxKind::SlashToken, SyntaxKind::SlashEqualsToken),
                    b'%' => (SyntaxKind::PercentToken, SyntaxKind::PercentEqualsToken),
                    _ => (SyntaxKind::CaretToken, SyntaxKind::CaretEqualsToken),
                };
                if self.byte_at(1) == Some(b'=') {
                    self.op(2, assign)
                } else {
                    self.op(1, plain)
                }
            }

            b'\'' | b'"' => self.scan_string_literal(b as char),
            b'0'..=b'9' => self.scan_number(),

            _ => match self.current_char() {
                Some(ch) if is_identifier_start(ch) => self.scan_identifier(),
                Some(ch) => {
                    self.pos += ch.len_utf8();
                    self.error(self.token_start, self.pos, &messages::INVALID_CHARACTER);
                    SyntaxKind::Unknown
                }
                None => SyntaxKind::EndOfFileToken,
            },
        };

        self.token
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn scan_string_literal(&mut self, quote: char) -> SyntaxKind {
        self.pos += 1; // skip opening quote
        let mut result = String::new();
        loop {
            let Some(ch) = self.current_char() else {
                self.error(self.token_start, self.pos, &messages::UNTERMINATED_STRING_LITERAL);
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == '\\' {
                self.pos += 1;
                self.scan_escape_sequence(&mut result);
                continue;
            }
            if is_line_break(ch) {
                self.error(self.token_start, self.pos, &messages::UNTERMINATED_STRING_LITERAL);
                break;
            }
            result.push(ch);
            self.pos += ch.len_utf8();
        }
        self.token_value = result;
        SyntaxKind::StringLiteral
    }

    /// Decode one escape sequence; the backslash is already consumed.
    fn scan_escape_sequence(&mut self, out: &mut String) {
        let Some(ch) = self.current_char() else {
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' if !self.byte_at(0).is_some_and(|c| c.is_ascii_digit()) => out.push('\0'),
            'x' => self.scan_hex_escape(2, 'x', out),
            'u' => self.scan_hex_escape(4, 'u', out),
            // Line continuation.
            '\r' => {
                if self.byte_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
            }
            '\n' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR => {}
            other => out.push(other),
        }
    }

    fn scan_hex_escape(&mut self, digits: usize, letter: char, out: &mut String) {
        let decoded = self
            .text
            .get(self.pos..self.pos + digits)
            .filter(|hex| hex.chars().all(is_hex_digit))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match decoded {
            Some(ch) => {
                out.push(ch);
                self.pos += digits;
            }
            None => out.push(letter),
        }
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;

        if self.byte_at(0) == Some(b'0')
            && matches!(self.byte_at(1), Some(b'x') | Some(b'X'))
            && self.byte_at(2).is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.pos += 2;
            self.skip_while_byte(|c| c.is_ascii_hexdigit());
        } else {
            self.skip_while_byte(|c| c.is_ascii_digit());
            if self.byte_at(0) == Some(b'.') {
                self.pos += 1;
                self.skip_while_byte(|c| c.is_ascii_digit());
            }
            if matches!(self.byte_at(0), Some(b'e') | Some(b'E')) {
                let sign = usize::from(matches!(self.byte_at(1), Some(b'+') | Some(b'-')));
                if self.byte_at(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1 + sign;
                    self.skip_while_byte(|c| c.is_ascii_digit());
                }
            }
        }

        self.token_value = self.text[start..self.pos].to_string();
        SyntaxKind::NumericLiteral
    }

    fn skip_while_byte(&mut self, pred: impl Fn(u8) -> bool) {
        while self.byte_at(0).is_some_and(&pred) {
            self.pos += 1;
        }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        let text = &self.text[start..self.pos];
        self.token_value = text.to_string();
        SyntaxKind::from_keyword(text).unwrap_or(SyntaxKind::Identifier)
    }

    /// Rescan a `/` or `/=` token as a regular expression literal.
    ///
    /// The parser calls this when a slash appears where an expression is
    /// expected.
    pub fn rescan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(self.token, SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken) {
            return self.token;
        }
        self.pos = self.token_start + 1; // after the /
        let mut in_character_class = false;

        loop {
            let Some(ch) = self.current_char() else {
                self.error(
                    self.token_start,
                    self.pos,
                    &messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
                );
                break;
            };
            if is_line_break(ch) {
                self.error(
                    self.token_start,
                    self.pos,
                    &messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
                );
                break;
            }
            self.pos += ch.len_utf8();
            match ch {
                '\\' => {
                    if let Some(escaped) = self.current_char().filter(|c| !is_line_break(*c)) {
                        self.pos += escaped.len_utf8();
                    }
                }
                '[' => in_character_class = true,
                ']' => in_character_class = false,
                '/' if !in_character_class => {
                    // Flags
                    while let Some(flag) = self.current_char().filter(|c| is_identifier_part(*c)) {
                        self.pos += flag.len_utf8();
                    }
                    break;
                }
                _ => {}
            }
        }

        self.token_value = self.text[self.token_start..self.pos].to_string();
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }
}

/// Offset of the first line terminator at or after `from`, or the end of the
/// text.
fn line_end(bytes: &[u8], from: usize) -> usize {
    let mut at = from;
    while let Some(offset) = memchr::memchr3(b'\n', b'\r', 0xE2, &bytes[at..]) {
        let hit = at + offset;
        if bytes[hit] != 0xE2 || bytes[hit..].starts_with(LS_BYTES) || bytes[hit..].starts_with(PS_BYTES)
        {
            return hit;
        }
        at = hit + 1;
    }
    bytes.len()
}

fn contains_line_break(bytes: &[u8]) -> bool {
    memchr::memchr2(b'\n', b'\r', bytes).is_some()
        || memchr::memmem::find(bytes, LS_BYTES).is_some()
        || memchr::memmem::find(bytes, PS_BYTES).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_simple_tokens() {
        let mut scanner = Scanner::new("( ) { } [ ] ; , :");
        assert_eq!(scanner.scan(), SyntaxKind::OpenParenToken);
        assert_eq!(scanner.scan(), SyntaxKind::CloseParenToken);
        assert_eq!(scanner.scan(), SyntaxKind::OpenBraceToken);
        assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
        assert_eq!(scanner.scan(), SyntaxKind::OpenBracketToken);
        assert_eq!(scanner.scan(), SyntaxKind::CloseBracketToken);
        assert_eq!(scanner.scan(), SyntaxKind::SemicolonToken);
        assert_eq!(scanner.scan(), SyntaxKind::CommaToken);
        assert_eq!(scanner.scan(), SyntaxKind::ColonToken);
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    }

    #[test]
    fn test_scan_identifier_and_keyword() {
        let mut scanner = Scanner::new("var x = 42;");
        assert_eq!(scanner.scan(), SyntaxKind::VarKeyword);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "x");
        assert_eq!(scanner.token_range(), TextRange::new(4, 5));
        assert_eq!(scanner.scan(), SyntaxKind::EqualsToken);
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert_eq!(scanner.token_value(), "42");
        assert_eq!(scanner.scan(), SyntaxKind::SemicolonToken);
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    }

    #[test]
    fn test_byte_offsets_after_multibyte() {
        let mut scanner = Scanner::new("'é' x");
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_end(), 4);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_range(), TextRange::new(5, 6));
    }

    #[test]
    fn test_look_ahead_restores() {
        let mut scanner = Scanner::new("a b c");
        scanner.scan();
        let next = scanner.look_ahead(|s| {
            s.scan();
            s.token_value().to_string()
        });
        assert_eq!(next, "b");
        assert_eq!(scanner.token_value(), "a");
        scanner.scan();
        assert_eq!(scanner.token_value(), "b");
    }

    #[test]
    fn test_restore_discards_errors() {
        let mut scanner = Scanner::new("a #");
        scanner.scan();
        let state = scanner.save_state();
        assert_eq!(scanner.scan(), SyntaxKind::Unknown);
        assert_eq!(scanner.errors().len(), 1);
        scanner.restore_state(state);
        assert!(scanner.errors().is_empty());
    }
}
