//! Scope management for the binder.
//!
//! Scopes and symbols live in flat arenas owned by a [`ScopeTable`]. Each
//! scope maps names to symbols declared directly in it and links to its
//! parent; lookup walks that chain outwards.

use crate::symbol::{Symbol, SymbolId, SymbolKind};
use jscope_ast::NodeId;
use jscope_core::collections::FxMap;
use jscope_core::intern::InternedString;

/// Index of a [`Scope`], assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A lexical scope: one per function body plus the global scope.
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    /// The parent scope (None for the global scope).
    pub parent: Option<ScopeId>,
    vars: FxMap<InternedString, SymbolId>,
}

impl Scope {
    fn new(id: ScopeId, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            parent,
            vars: FxMap::default(),
        }
    }

    /// The symbol declared directly in this scope under `name`.
    pub fn get_own(&self, name: InternedString) -> Option<SymbolId> {
        self.vars.get(&name).copied()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InternedString, SymbolId)> + '_ {
        self.vars.iter().map(|(name, id)| (*name, *id))
    }
}

/// The scope tree and symbol arena of one analysis.
#[derive(Debug, Clone, Default)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope. The first scope created is the root.
    pub fn create_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, parent));
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Allocate a symbol without entering it into any scope.
    pub fn new_symbol(&mut self, name: InternedString, kind: SymbolKind, declaration: NodeId) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        let mut symbol = Symbol::new(id, name, kind);
        symbol.declarations.push(declaration);
        self.symbols.push(symbol);
        id
    }

    /// Declare `name` in `scope`. A name already declared directly in this
    /// scope gains another declaration site; otherwise a new symbol is
    /// created. Never fails.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: InternedString,
        kind: SymbolKind,
        declaration: NodeId,
        value: Option<NodeId>,
    ) -> SymbolId {
        let id = match self.scope(scope).get_own(name) {
            Some(existing) => {
                self.symbol_mut(existing).declarations.push(declaration);
                existing
            }
            None => {
                let id = self.new_symbol(name, kind, declaration);
                self.set_entry(scope, name, Some(id));
                id
            }
        };
        if let Some(value) = value {
            self.symbol_mut(id).add_value(value);
        }
        id
    }

    /// The nearest symbol called `name` visible from `scope`.
    pub fn get(&self, scope: ScopeId, name: InternedString) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(symbol) = scope.get_own(name) {
                return Some(symbol);
            }
            current = scope.parent;
        }
        None
    }

    pub fn is_declared(&self, scope: ScopeId, name: InternedString) -> bool {
        self.get(scope, name).is_some()
    }

    /// Record that `value` may flow into `name`. An unresolvable name is
    /// implicitly declared in `scope` with `target` as its declaration.
    pub fn hint(&mut self, scope: ScopeId, name: InternedString, target: NodeId, value: NodeId) -> SymbolId {
        match self.get(scope, name) {
            Some(id) => {
                self.symbol_mut(id).add_value(value);
                id
            }
            None => self.declare(scope, name, SymbolKind::Implicit, target, Some(value)),
        }
    }

    /// Replace the direct entry for `name` in `scope`, returning the old one.
    /// `None` removes the entry.
    pub fn set_entry(&mut self, scope: ScopeId, name: InternedString, symbol: Option<SymbolId>) -> Option<SymbolId> {
        let vars = &mut self.scopes[scope.index()].vars;
        match symbol {
            Some(symbol) => vars.insert(name, symbol),
            None => vars.remove(&name),
        }
    }
}
