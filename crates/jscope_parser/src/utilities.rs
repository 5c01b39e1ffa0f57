//! Parser utility functions.

use jscope_ast::syntax_kind::SyntaxKind;
use jscope_ast::{AstBuilder, NodeId, NodeKind};

/// Check if a token kind starts a statement that error recovery can resume at.
pub fn is_statement_keyword(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::VarKeyword
            | SyntaxKind::LetKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::IfKeyword
            | SyntaxKind::DoKeyword
            | SyntaxKind::WhileKeyword
            | SyntaxKind::ForKeyword
            | SyntaxKind::ContinueKeyword
            | SyntaxKind::BreakKeyword
            | SyntaxKind::ReturnKeyword
            | SyntaxKind::WithKeyword
            | SyntaxKind::SwitchKeyword
            | SyntaxKind::ThrowKeyword
            | SyntaxKind::TryKeyword
            | SyntaxKind::DebuggerKeyword
    )
}

/// Keywords that can never begin a statement or an expression.
pub fn is_misplaced_keyword(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::CaseKeyword
            | SyntaxKind::DefaultKeyword
            | SyntaxKind::CatchKeyword
            | SyntaxKind::FinallyKeyword
            | SyntaxKind::ElseKeyword
            | SyntaxKind::InKeyword
            | SyntaxKind::InstanceOfKeyword
    )
}

/// Whether an expression may appear on the left of `=` or `in`.
pub fn is_left_hand_side_target(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Var { .. }
            | NodeKind::Member { .. }
            | NodeKind::Index { .. }
            | NodeKind::Call { .. }
            | NodeKind::Missing
    )
}

/// Whether a node, after skipping parentheses, is an assignable target.
pub fn is_assignable(builder: &AstBuilder, mut node: NodeId) -> bool {
    while let NodeKind::Paren { expr } = builder.kind(node) {
        node = *expr;
    }
    is_left_hand_side_target(builder.kind(node))
}
