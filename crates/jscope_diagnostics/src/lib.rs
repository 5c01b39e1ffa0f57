//! jscope_diagnostics: Markers and the message catalogue.
//!
//! Every problem the scanner, parser, or analyzer detects is reported as a
//! [`Marker`]: a positioned, immutable datum. Nothing in the analysis
//! pipeline signals problems by failing.

use jscope_core::text::SourcePosition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a marker describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// A syntax error reported by the scanner or parser.
    Error,
    /// A suspicious but legal pattern.
    Warning,
    /// A local variable that is never used.
    Unused,
    /// A declaration site of the symbol under the cursor.
    OccurrenceMain,
    /// A use site of the symbol under the cursor.
    OccurrenceOther,
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerKind::Error => write!(f, "error"),
            MarkerKind::Warning => write!(f, "warning"),
            MarkerKind::Unused => write!(f, "unused"),
            MarkerKind::OccurrenceMain => write!(f, "occurrence_main"),
            MarkerKind::OccurrenceOther => write!(f, "occurrence_other"),
        }
    }
}

/// A message template with a code and kind.
#[derive(Debug, Clone)]
pub struct MarkerMessage {
    /// The marker code (e.g., 1002, 2001).
    pub code: u32,
    /// The kind of marker this message produces.
    pub kind: MarkerKind,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized marker with position and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub pos: SourcePosition,
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub code: Option<u32>,
}

impl Marker {
    /// Create a marker from a catalogue message.
    pub fn new(pos: SourcePosition, message: &MarkerMessage, args: &[&str]) -> Self {
        Self {
            pos,
            kind: message.kind,
            message: Some(format_message(message.message, args)),
            code: Some(message.code),
        }
    }

    /// Create a message-less highlight marker.
    pub fn highlight(pos: SourcePosition, kind: MarkerKind) -> Self {
        Self {
            pos,
            kind,
            message: None,
            code: None,
        }
    }

    /// Whether this is an error marker.
    pub fn is_error(&self) -> bool {
        self.kind == MarkerKind::Error
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}): {}", self.pos, self.kind)?;
        if let Some(code) = self.code {
            write!(f, " JS{}", code)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Markers accumulated during a scan, parse, or analysis, in emission order.
#[derive(Debug, Clone, Default)]
pub struct MarkerCollection {
    markers: Vec<Marker>,
}

impl MarkerCollection {
    pub fn new() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    pub fn add(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn into_markers(self) -> Vec<Marker> {
        self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Sort markers by position. Stable, so markers at the same position keep
    /// their emission order.
    pub fn sort(&mut self) {
        self.markers
            .sort_by_key(|m| (m.pos.start_line, m.pos.start_column));
    }
}

// ============================================================================
// Marker Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! msg {
        ($code:expr, Error, $msg:expr) => {
            MarkerMessage { code: $code, kind: MarkerKind::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            MarkerMessage { code: $code, kind: MarkerKind::Warning, message: $msg }
        };
        ($code:expr, Unused, $msg:expr) => {
            MarkerMessage { code: $code, kind: MarkerKind::Unused, message: $msg }
        };
    }

    // ========================================================================
    // Syntax errors (1000-1199)
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: MarkerMessage = msg!(1002, Error, "Unterminated string literal.");
    pub const IDENTIFIER_EXPECTED: MarkerMessage = msg!(1003, Error, "Identifier expected.");
    pub const _0_EXPECTED: MarkerMessage = msg!(1005, Error, "'{0}' expected.");
    pub const ASTERISK_SLASH_EXPECTED: MarkerMessage = msg!(1010, Error, "'*/' expected.");
    pub const EXPRESSION_EXPECTED: MarkerMessage = msg!(1109, Error, "Expression expected.");
    pub const INVALID_CHARACTER: MarkerMessage = msg!(1127, Error, "Invalid character.");
    pub const DECLARATION_OR_STATEMENT_EXPECTED: MarkerMessage = msg!(1128, Error, "Declaration or statement expected.");
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: MarkerMessage = msg!(1161, Error, "Unterminated regular expression literal.");
    pub const INVALID_LEFT_HAND_SIDE_IN_FOR_IN: MarkerMessage = msg!(1163, Error, "Invalid left-hand side in 'for...in' statement.");
    pub const NESTING_TOO_DEEP: MarkerMessage = msg!(1199, Error, "Expression nesting is too deep.");

    // ========================================================================
    // Scope warnings (2000-2099)
    // ========================================================================
    pub const ASSIGNING_TO_UNDECLARED_VARIABLE: MarkerMessage = msg!(2001, Warning, "Assigning to undeclared variable.");
    pub const UNDECLARED_ITERATOR_VARIABLE: MarkerMessage = msg!(2002, Warning, "Using undeclared variable as iterator variable.");
    pub const UNUSED_VARIABLE: MarkerMessage = msg!(2010, Unused, "Unused variable.");

    // ========================================================================
    // Lint warnings (2100-2199)
    // ========================================================================
    pub const DID_YOU_MEAN_0: MarkerMessage = msg!(2101, Warning, "Did you mean '{0}'?");
    pub const MISSING_RADIX_ARGUMENT: MarkerMessage = msg!(2102, Warning, "Missing radix argument.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use jscope_core::text::LineAndColumn;

    fn pos(line: u32, start: u32, end: u32) -> SourcePosition {
        SourcePosition::new(LineAndColumn::new(line, start), LineAndColumn::new(line, end))
    }

    #[test]
    fn test_format_message() {
        let msg = format_message("Did you mean '{0}'?", &["length"]);
        assert_eq!(msg, "Did you mean 'length'?");
    }

    #[test]
    fn test_format_message_no_args() {
        let msg = format_message("Unused variable.", &[]);
        assert_eq!(msg, "Unused variable.");
    }

    #[test]
    fn test_marker_display() {
        let marker = Marker::new(pos(0, 4, 5), &messages::UNUSED_VARIABLE, &[]);
        assert_eq!(marker.to_string(), "(1,5): unused JS2010: Unused variable.");
    }

    #[test]
    fn test_highlight_serializes_without_message() {
        let marker = Marker::highlight(pos(2, 0, 3), MarkerKind::OccurrenceMain);
        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(json["type"], "occurrence_main");
        assert_eq!(json["pos"]["startLine"], 2);
        assert_eq!(json["pos"]["endColumn"], 3);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_sort_is_stable() {
        let mut markers = MarkerCollection::new();
        markers.add(Marker::new(pos(3, 0, 1), &messages::UNUSED_VARIABLE, &[]));
        markers.add(Marker::new(pos(1, 2, 3), &messages::MISSING_RADIX_ARGUMENT, &[]));
        markers.add(Marker::new(pos(1, 2, 3), &messages::ASSIGNING_TO_UNDECLARED_VARIABLE, &[]));
        markers.sort();
        let codes: Vec<_> = markers.markers().iter().map(|m| m.code.unwrap()).collect();
        assert_eq!(codes, vec![2102, 2001, 2010]);
    }
}
