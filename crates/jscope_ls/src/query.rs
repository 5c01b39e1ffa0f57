//! Occurrence, rename and reference queries.
//!
//! These are pure reads of an [`Analysis`]: they resolve the selected node
//! through the scope annotations left by binding and never re-run
//! resolution.

use jscope_ast::{Ast, NodeId};
use jscope_binder::{Analysis, Symbol};
use jscope_core::text::SourcePosition;
use jscope_diagnostics::{Marker, MarkerKind};
use jscope_options::Features;
use serde::{Deserialize, Serialize};

/// The refactoring offered when the cursor is on a renameable name.
pub const RENAME_VARIABLE: &str = "renameVariable";

/// What the editor may show and offer at the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorContext {
    /// Occurrence highlights. Omitted when instance highlighting is off or
    /// nothing resolved.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub markers: Option<Vec<Marker>>,
    pub enabled_refactorings: Vec<String>,
}

/// A 0-based line and byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowColumn {
    pub row: u32,
    pub column: u32,
}

impl RowColumn {
    fn start_of(pos: SourcePosition) -> Self {
        Self {
            row: pos.start_line,
            column: pos.start_column,
        }
    }
}

/// The spans a rename of the selected name would touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePositions {
    /// Length of the selected name on its line.
    pub length: u32,
    /// Start of the selected name.
    pub pos: RowColumn,
    /// Every other declaration and use.
    pub others: Vec<RowColumn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Declaration,
    Use,
}

/// One occurrence of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub pos: SourcePosition,
    pub kind: ReferenceKind,
}

fn selected_symbol<'s>(ast: &Ast, analysis: &'s Analysis, selected: NodeId) -> Option<&'s Symbol> {
    analysis
        .symbol_at(ast, selected)
        .map(|id| analysis.symbol(id))
}

/// Occurrence highlights and available refactorings for the selected node.
pub fn cursor_context(
    ast: &Ast,
    analysis: &Analysis,
    selected: NodeId,
    features: &Features,
) -> CursorContext {
    let Some(symbol) = selected_symbol(ast, analysis, selected) else {
        return CursorContext::default();
    };

    let markers: Option<Vec<Marker>> = features.instance_highlight.then(|| {
        let main = symbol
            .declarations
            .iter()
            .map(|&node| Marker::highlight(ast.position(node), MarkerKind::OccurrenceMain));
        let other = symbol
            .uses
            .iter()
            .map(|&node| Marker::highlight(ast.position(node), MarkerKind::OccurrenceOther));
        main.chain(other).collect()
    });

    let mut enabled_refactorings = Vec::new();
    if !symbol.is_this() {
        enabled_refactorings.push(RENAME_VARIABLE.to_string());
    }

    CursorContext {
        markers,
        enabled_refactorings,
    }
}

/// Rename spans anchored at the selected name. `None` when nothing resolves
/// or the selection is `this`.
pub fn rename_positions(ast: &Ast, analysis: &Analysis, selected: NodeId) -> Option<RenamePositions> {
    let symbol = selected_symbol(ast, analysis, selected)?;
    if symbol.is_this() {
        return None;
    }
    let selected = analysis.selected_name(ast, selected);
    let anchor = ast.position(selected);
    let others = symbol
        .occurrences()
        .filter(|&node| node != selected)
        .map(|node| RowColumn::start_of(ast.position(node)))
        .collect();
    Some(RenamePositions {
        length: anchor.end_column.saturating_sub(anchor.start_column),
        pos: RowColumn::start_of(anchor),
        others,
    })
}

/// Every declaration and use of the selected symbol, declarations first.
pub fn references(ast: &Ast, analysis: &Analysis, selected: NodeId) -> Vec<Reference> {
    let Some(symbol) = selected_symbol(ast, analysis, selected) else {
        return Vec::new();
    };
    let declarations = symbol.declarations.iter().map(|&node| Reference {
        pos: ast.position(node),
        kind: ReferenceKind::Declaration,
    });
    let uses = symbol.uses.iter().map(|&node| Reference {
        pos: ast.position(node),
        kind: ReferenceKind::Use,
    });
    declarations.chain(uses).collect()
}
