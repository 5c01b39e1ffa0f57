//! Symbol definitions.

use indexmap::IndexSet;
use jscope_ast::NodeId;
use jscope_core::intern::InternedString;

/// Index of a [`Symbol`] in an analysis' symbol arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a symbol came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// `var`, `let` or `const`.
    Variable,
    /// A named function declaration or function expression name.
    Function,
    Parameter,
    /// A `catch` clause binding.
    CatchParameter,
    /// The implicit `this` of a function.
    This,
    /// A global created by assigning to an undeclared name.
    Implicit,
}

/// A symbol represents one declared (or implicitly declared) name.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: InternedString,
    pub kind: SymbolKind,
    /// Nodes that declare the name, in source order. More than one for a
    /// re-declared `var`.
    pub declarations: Vec<NodeId>,
    /// Nodes where the name is read or assigned.
    pub uses: Vec<NodeId>,
    /// Expressions that may have initialised the name.
    pub values: IndexSet<NodeId>,
}

impl Symbol {
    pub fn new(id: SymbolId, name: InternedString, kind: SymbolKind) -> Self {
        Self {
            id,
            name,
            kind,
            declarations: Vec::new(),
            uses: Vec::new(),
            values: IndexSet::new(),
        }
    }

    pub fn is_this(&self) -> bool {
        self.kind == SymbolKind::This
    }

    pub fn is_used(&self) -> bool {
        !self.uses.is_empty()
    }

    /// Record a value hint. Hints are deduplicated by node.
    pub fn add_value(&mut self, value: NodeId) {
        self.values.insert(value);
    }

    /// Every declaration and use, declarations first.
    pub fn occurrences(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.declarations.iter().chain(self.uses.iter()).copied()
    }
}
