//! The result of binding one document.

use jscope_ast::{Ast, NodeId, NodeKind};
use jscope_core::collections::FxMap;
use jscope_core::intern::InternedString;
use jscope_diagnostics::Marker;

use crate::scope::{Scope, ScopeId, ScopeTable};
use crate::symbol::{Symbol, SymbolId};

/// Scopes, symbols and markers produced by [`crate::analyze`].
///
/// An analysis is a snapshot: it is never mutated after binding, and all
/// queries against it are pure reads.
#[derive(Debug, Clone)]
pub struct Analysis {
    table: ScopeTable,
    global: ScopeId,
    scope_of: FxMap<NodeId, ScopeId>,
    resolved: FxMap<NodeId, SymbolId>,
    markers: Vec<Marker>,
    this_name: InternedString,
}

impl Analysis {
    pub(crate) fn new(
        table: ScopeTable,
        global: ScopeId,
        scope_of: FxMap<NodeId, ScopeId>,
        resolved: FxMap<NodeId, SymbolId>,
        markers: Vec<Marker>,
        this_name: InternedString,
    ) -> Self {
        Self {
            table,
            global,
            scope_of,
            resolved,
            markers,
            this_name,
        }
    }

    /// Markers in the order they were emitted.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn global_scope(&self) -> ScopeId {
        self.global
    }

    pub fn table(&self) -> &ScopeTable {
        &self.table
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        self.table.scope(id)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        self.table.symbol(id)
    }

    pub fn symbols(&self) -> &[Symbol] {
        self.table.symbols()
    }

    /// The scope a node was annotated with during binding.
    pub fn scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.scope_of.get(&node).copied()
    }

    /// The symbol a declaration or reference was bound to when it was
    /// visited.
    pub fn resolved_symbol(&self, node: NodeId) -> Option<SymbolId> {
        self.resolved.get(&node).copied()
    }

    /// The name node a selection stands for. A variable declaration or a
    /// named function selects its name; any other node selects itself.
    pub fn selected_name(&self, ast: &Ast, node: NodeId) -> NodeId {
        match ast.kind(node) {
            NodeKind::VarDecl { name, .. } => *name,
            NodeKind::Function {
                name: Some(name), ..
            } => *name,
            _ => node,
        }
    }

    /// The symbol a name node, or the declaration enclosing one, refers to.
    ///
    /// Nodes without a scope annotation never resolve. The binding-time
    /// resolution wins over a fresh lookup so that catch parameters, whose
    /// scope entry is gone once the handler is bound, still resolve.
    pub fn symbol_at(&self, ast: &Ast, node: NodeId) -> Option<SymbolId> {
        let node = self.selected_name(ast, node);
        let scope = self.scope_of(node)?;
        if let Some(symbol) = self.resolved_symbol(node) {
            return Some(symbol);
        }
        match ast.kind(node) {
            NodeKind::Var { name } => self.table.get(scope, *name),
            NodeKind::This => self.table.get(scope, self.this_name),
            _ => None,
        }
    }

    /// Look `name` up from `scope` as it stands after binding.
    pub fn lookup(&self, ast: &Ast, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let name = ast.interner().get(name)?;
        self.table.get(scope, name)
    }
}
