//! SyntaxKind enum - the token kinds produced by the scanner.
//!
//! Tree shapes live in [`crate::node::NodeKind`]; this enum only covers what
//! the scanner can hand to the parser.

/// The kind of a syntax token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown = 0,
    EndOfFileToken = 1,

    // Literals
    NumericLiteral = 2,
    StringLiteral = 3,
    RegularExpressionLiteral = 4,

    // Punctuation
    OpenBraceToken = 10,
    CloseBraceToken = 11,
    OpenParenToken = 12,
    CloseParenToken = 13,
    OpenBracketToken = 14,
    CloseBracketToken = 15,
    DotToken = 16,
    SemicolonToken = 17,
    CommaToken = 18,
    LessThanToken = 19,
    GreaterThanToken = 20,
    LessThanEqualsToken = 21,
    GreaterThanEqualsToken = 22,
    EqualsEqualsToken = 23,
    ExclamationEqualsToken = 24,
    EqualsEqualsEqualsToken = 25,
    ExclamationEqualsEqualsToken = 26,
    PlusToken = 27,
    MinusToken = 28,
    AsteriskToken = 29,
    SlashToken = 30,
    PercentToken = 31,
    PlusPlusToken = 32,
    MinusMinusToken = 33,
    LessThanLessThanToken = 34,
    GreaterThanGreaterThanToken = 35,
    GreaterThanGreaterThanGreaterThanToken = 36,
    AmpersandToken = 37,
    BarToken = 38,
    CaretToken = 39,
    ExclamationToken = 40,
    TildeToken = 41,
    AmpersandAmpersandToken = 42,
    BarBarToken = 43,
    QuestionToken = 44,
    ColonToken = 45,

    // Assignments
    EqualsToken = 50,
    PlusEqualsToken = 51,
    MinusEqualsToken = 52,
    AsteriskEqualsToken = 53,
    SlashEqualsToken = 54,
    PercentEqualsToken = 55,
    LessThanLessThanEqualsToken = 56,
    GreaterThanGreaterThanEqualsToken = 57,
    GreaterThanGreaterThanGreaterThanEqualsToken = 58,
    AmpersandEqualsToken = 59,
    BarEqualsToken = 60,
    CaretEqualsToken = 61,

    // Identifiers and keywords
    Identifier = 70,

    // Reserved words
    BreakKeyword = 80,
    CaseKeyword = 81,
    CatchKeyword = 82,
    ContinueKeyword = 83,
    DebuggerKeyword = 84,
    DefaultKeyword = 85,
    DeleteKeyword = 86,
    DoKeyword = 87,
    ElseKeyword = 88,
    FalseKeyword = 89,
    FinallyKeyword = 90,
    ForKeyword = 91,
    FunctionKeyword = 92,
    IfKeyword = 93,
    InKeyword = 94,
    InstanceOfKeyword = 95,
    NewKeyword = 96,
    NullKeyword = 97,
    ReturnKeyword = 98,
    SwitchKeyword = 99,
    ThisKeyword = 100,
    ThrowKeyword = 101,
    TrueKeyword = 102,
    TryKeyword = 103,
    TypeOfKeyword = 104,
    VarKeyword = 105,
    VoidKeyword = 106,
    WhileKeyword = 107,
    WithKeyword = 108,

    // Declaration keywords accepted with var semantics
    ConstKeyword = 109,
    LetKeyword = 110,
}

impl SyntaxKind {
    pub const FIRST_PUNCTUATION: SyntaxKind = SyntaxKind::OpenBraceToken;
    pub const LAST_PUNCTUATION: SyntaxKind = SyntaxKind::CaretEqualsToken;
    pub const FIRST_ASSIGNMENT: SyntaxKind = SyntaxKind::EqualsToken;
    pub const LAST_ASSIGNMENT: SyntaxKind = SyntaxKind::CaretEqualsToken;
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::BreakKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::LetKeyword;
}

impl SyntaxKind {
    /// Whether this kind represents a keyword.
    #[inline]
    pub fn is_keyword(self) -> bool {
        let v = self as u16;
        v >= Self::FIRST_KEYWORD as u16 && v <= Self::LAST_KEYWORD as u16
    }

    /// Whether this kind represents a punctuation token.
    #[inline]
    pub fn is_punctuation(self) -> bool {
        let v = self as u16;
        v >= Self::FIRST_PUNCTUATION as u16 && v <= Self::LAST_PUNCTUATION as u16
    }

    /// Whether this kind represents a literal token.
    #[inline]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::NumericLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::RegularExpressionLiteral
        )
    }

    /// Whether this kind represents an assignment operator.
    #[inline]
    pub fn is_assignment_operator(self) -> bool {
        let v = self as u16;
        v >= Self::FIRST_ASSIGNMENT as u16 && v <= Self::LAST_ASSIGNMENT as u16
    }

    /// Whether this kind represents a compound assignment operator.
    #[inline]
    pub fn is_compound_assignment(self) -> bool {
        self.is_assignment_operator() && self != SyntaxKind::EqualsToken
    }

    /// Whether this keyword starts a variable declaration.
    #[inline]
    pub fn is_declaration_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword
        )
    }

    /// Whether an identifier-like token may be used as a property name after
    /// `.` or as an object literal key.
    #[inline]
    pub fn is_identifier_or_keyword(self) -> bool {
        self == SyntaxKind::Identifier || self.is_keyword()
    }

    /// Get the keyword text for a keyword kind, or None if not a keyword.
    pub fn keyword_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::BreakKeyword => Some("break"),
            SyntaxKind::CaseKeyword => Some("case"),
            SyntaxKind::CatchKeyword => Some("catch"),
            SyntaxKind::ContinueKeyword => Some("continue"),
            SyntaxKind::DebuggerKeyword => Some("debugger"),
            SyntaxKind::DefaultKeyword => Some("default"),
            SyntaxKind::DeleteKeyword => Some("delete"),
            SyntaxKind::DoKeyword => Some("do"),
            SyntaxKind::ElseKeyword => Some("else"),
            SyntaxKind::FalseKeyword => Some("false"),
            SyntaxKind::FinallyKeyword => Some("finally"),
            SyntaxKind::ForKeyword => Some("for"),
            SyntaxKind::FunctionKeyword => Some("function"),
            SyntaxKind::IfKeyword => Some("if"),
            SyntaxKind::InKeyword => Some("in"),
            SyntaxKind::InstanceOfKeyword => Some("instanceof"),
            SyntaxKind::NewKeyword => Some("new"),
            SyntaxKind::NullKeyword => Some("null"),
            SyntaxKind::ReturnKeyword => Some("return"),
            SyntaxKind::SwitchKeyword => Some("switch"),
            SyntaxKind::ThisKeyword => Some("this"),
            SyntaxKind::ThrowKeyword => Some("throw"),
            SyntaxKind::TrueKeyword => Some("true"),
            SyntaxKind::TryKeyword => Some("try"),
            SyntaxKind::TypeOfKeyword => Some("typeof"),
            SyntaxKind::VarKeyword => Some("var"),
            SyntaxKind::VoidKeyword => Some("void"),
            SyntaxKind::WhileKeyword => Some("while"),
            SyntaxKind::WithKeyword => Some("with"),
            SyntaxKind::ConstKeyword => Some("const"),
            SyntaxKind::LetKeyword => Some("let"),
            _ => None,
        }
    }

    /// Look up a keyword SyntaxKind from text.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        match text {
            "break" => Some(SyntaxKind::BreakKeyword),
            "case" => Some(SyntaxKind::CaseKeyword),
            "catch" => Some(SyntaxKind::CatchKeyword),
            "continue" => Some(SyntaxKind::ContinueKeyword),
            "debugger" => Some(SyntaxKind::DebuggerKeyword),
            "default" => Some(SyntaxKind::DefaultKeyword),
            "delete" => Some(SyntaxKind::DeleteKeyword),
            "do" => Some(SyntaxKind::DoKeyword),
            "else" => Some(SyntaxKind::ElseKeyword),
            "false" => Some(SyntaxKind::FalseKeyword),
            "finally" => Some(SyntaxKind::FinallyKeyword),
            "for" => Some(SyntaxKind::ForKeyword),
            "function" => Some(SyntaxKind::FunctionKeyword),
            "if" => Some(SyntaxKind::IfKeyword),
            "in" => Some(SyntaxKind::InKeyword),
            "instanceof" => Some(SyntaxKind::InstanceOfKeyword),
            "new" => Some(SyntaxKind::NewKeyword),
            "null" => Some(SyntaxKind::NullKeyword),
            "return" => Some(SyntaxKind::ReturnKeyword),
            "switch" => Some(SyntaxKind::SwitchKeyword),
            "this" => Some(SyntaxKind::ThisKeyword),
            "throw" => Some(SyntaxKind::ThrowKeyword),
            "true" => Some(SyntaxKind::TrueKeyword),
            "try" => Some(SyntaxKind::TryKeyword),
            "typeof" => Some(SyntaxKind::TypeOfKeyword),
            "var" => Some(SyntaxKind::VarKeyword),
            "void" => Some(SyntaxKind::VoidKeyword),
            "while" => Some(SyntaxKind::WhileKeyword),
            "with" => Some(SyntaxKind::WithKeyword),
            "const" => Some(SyntaxKind::ConstKeyword),
            "let" => Some(SyntaxKind::LetKeyword),
            _ => None,
        }
    }

    /// Get the punctuation text for a punctuation kind, or None.
    pub fn punctuation_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::OpenBraceToken => Some("{"),
            SyntaxKind::CloseBraceToken => Some("}"),
            SyntaxKind::OpenParenToken => Some("("),
            SyntaxKind::CloseParenToken => Some(")"),
            SyntaxKind::OpenBracketToken => Some("["),
            SyntaxKind::CloseBracketToken => Some("]"),
            SyntaxKind::DotToken => Some("."),
            SyntaxKind::SemicolonToken => Some(";"),
            SyntaxKind::CommaToken => Some(","),
            SyntaxKind::LessThanToken => Some("<"),
            SyntaxKind::GreaterThanToken => Some(">"),
            SyntaxKind::LessThanEqualsToken => Some("<="),
            SyntaxKind::GreaterThanEqualsToken => Some(">="),
            SyntaxKind::EqualsEqualsToken => Some("=="),
            SyntaxKind::ExclamationEqualsToken => Some("!="),
            SyntaxKind::EqualsEqualsEqualsToken => Some("==="),
            SyntaxKind::ExclamationEqualsEqualsToken => Some("!=="),
            SyntaxKind::PlusToken => Some("+"),
            SyntaxKind::MinusToken => Some("-"),
            SyntaxKind::AsteriskToken => Some("*"),
            SyntaxKind::SlashToken => Some("/"),
            SyntaxKind::PercentToken => Some("%"),
            SyntaxKind::PlusPlusToken => Some("++"),
            SyntaxKind::MinusMinusToken => Some("--"),
            SyntaxKind::LessThanLessThanToken => Some("<<"),
            SyntaxKind::GreaterThanGreaterThanToken => Some(">>"),
            SyntaxKind::GreaterThanGreaterThanGreaterThanToken => Some(">>>"),
            SyntaxKind::AmpersandToken => Some("&"),
            SyntaxKind::BarToken => Some("|"),
            SyntaxKind::CaretToken => Some("^"),
            SyntaxKind::ExclamationToken => Some("!"),
            SyntaxKind::TildeToken => Some("~"),
            SyntaxKind::AmpersandAmpersandToken => Some("&&"),
            SyntaxKind::BarBarToken => Some("||"),
            SyntaxKind::QuestionToken => Some("?"),
            SyntaxKind::ColonToken => Some(":"),
            SyntaxKind::EqualsToken => Some("="),
            SyntaxKind::PlusEqualsToken => Some("+="),
            SyntaxKind::MinusEqualsToken => Some("-="),
            SyntaxKind::AsteriskEqualsToken => Some("*="),
            SyntaxKind::SlashEqualsToken => Some("/="),
            SyntaxKind::PercentEqualsToken => Some("%="),
            SyntaxKind::LessThanLessThanEqualsToken => Some("<<="),
            SyntaxKind::GreaterThanGreaterThanEqualsToken => Some(">>="),
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken => Some(">>>="),
            SyntaxKind::AmpersandEqualsToken => Some("&="),
            SyntaxKind::BarEqualsToken => Some("|="),
            SyntaxKind::CaretEqualsToken => Some("^="),
            _ => None,
        }
    }

    /// The source text of a fixed-text token, used in "'{0}' expected." markers.
    pub fn text(self) -> &'static str {
        self.punctuation_text()
            .or_else(|| self.keyword_text())
            .unwrap_or(match self {
                SyntaxKind::Identifier => "identifier",
                SyntaxKind::EndOfFileToken => "end of file",
                _ => "token",
            })
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for kind in [
            SyntaxKind::BreakKeyword,
            SyntaxKind::InstanceOfKeyword,
            SyntaxKind::TypeOfKeyword,
            SyntaxKind::LetKeyword,
        ] {
            let text = kind.keyword_text().unwrap();
            assert_eq!(SyntaxKind::from_keyword(text), Some(kind));
            assert!(kind.is_keyword());
        }
        assert_eq!(SyntaxKind::from_keyword("class"), None);
    }

    #[test]
    fn test_assignment_ranges() {
        assert!(SyntaxKind::EqualsToken.is_assignment_operator());
        assert!(!SyntaxKind::EqualsToken.is_compound_assignment());
        assert!(SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken.is_compound_assignment());
        assert!(!SyntaxKind::EqualsEqualsToken.is_assignment_operator());
        assert!(SyntaxKind::CaretEqualsToken.is_punctuation());
    }

    #[test]
    fn test_text() {
        assert_eq!(SyntaxKind::CloseParenToken.text(), ")");
        assert_eq!(SyntaxKind::WhileKeyword.text(), "while");
        assert_eq!(SyntaxKind::Identifier.text(), "identifier");
    }
}
