//! The binder implementation.
//!
//! Each function body (and the program itself) is processed in two passes:
//!
//! 1. Hoisting declares every `var` and function declaration of the body in
//!    the body's scope, without entering nested functions.
//! 2. Binding walks the body again, resolving references through the scope
//!    chain, creating child scopes for nested functions and emitting
//!    warnings.
//!
//! Locals declared by a body are collected on a worklist and checked for
//! uses once that body is fully bound.

use std::ops::{Deref, DerefMut};

use indexmap::IndexSet;
use jscope_ast::{for_each_descendant, Ast, FunctionKind, NodeId, NodeKind, VisitControl};
use jscope_core::collections::FxMap;
use jscope_core::intern::InternedString;
use jscope_diagnostics::{messages, Marker, MarkerMessage};
use jscope_options::Features;
use tracing::{debug, trace};

use crate::analysis::Analysis;
use crate::lint;
use crate::scope::{ScopeId, ScopeTable};
use crate::symbol::{SymbolId, SymbolKind};

/// Symbols declared by one function body, in declaration order.
type Locals = IndexSet<SymbolId>;

/// Analyze a parsed document.
pub fn analyze(ast: &Ast, features: &Features) -> Analysis {
    Binder::new(ast, *features).bind_program()
}

/// The binder creates scopes and symbols and links references to them.
pub struct Binder<'a> {
    ast: &'a Ast,
    features: Features,
    table: ScopeTable,
    /// The scope each visited node was seen in.
    scope_of: FxMap<NodeId, ScopeId>,
    /// The symbol each declaration or reference was bound to.
    resolved: FxMap<NodeId, SymbolId>,
    markers: Vec<Marker>,
    this_name: InternedString,
}

impl<'a> Binder<'a> {
    pub fn new(ast: &'a Ast, features: Features) -> Self {
        Self {
            ast,
            features,
            table: ScopeTable::new(),
            scope_of: FxMap::default(),
            resolved: FxMap::default(),
            markers: Vec::new(),
            this_name: ast.interner().known().this,
        }
    }

    /// Bind the whole document.
    pub fn bind_program(mut self) -> Analysis {
        let ast = self.ast;
        let root = ast.root();
        let global = self.table.create_scope(None);
        trace!(scope = global.0, "created global scope");
        self.annotate(root, global);

        let body: &[NodeId] = match ast.kind(root) {
            NodeKind::Program { body } => body,
            _ => &[],
        };
        let mut locals = Locals::new();
        self.bind_function_body(global, body, &mut locals);

        debug!(
            scopes = self.table.scopes().len(),
            symbols = self.table.symbols().len(),
            markers = self.markers.len(),
            "analysis finished"
        );
        Analysis::new(
            self.table,
            global,
            self.scope_of,
            self.resolved,
            self.markers,
            self.this_name,
        )
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn annotate(&mut self, node: NodeId, scope: ScopeId) {
        self.scope_of.insert(node, scope);
    }

    fn report(&mut self, node: NodeId, message: &MarkerMessage, args: &[&str]) {
        self.markers
            .push(Marker::new(self.ast.position(node), message, args));
    }

    /// Hoist, bind and check the locals of one function body.
    fn bind_function_body(&mut self, scope: ScopeId, body: &[NodeId], locals: &mut Locals) {
        for &statement in body {
            self.hoist(scope, statement);
        }
        for &statement in body {
            self.bind(scope, statement, locals);
        }
        self.report_unused(locals);
    }

    // ========================================================================
    // Hoisting
    // ========================================================================

    /// Declare the `var`s and function declarations under `node` in `scope`.
    fn hoist(&mut self, scope: ScopeId, node: NodeId) {
        let ast = self.ast;
        for_each_descendant(ast, node, |id| {
            self.annotate(id, scope);
            match ast.kind(id) {
                NodeKind::Function { kind, name, .. } => {
                    if let Some(name_node) = *name {
                        self.annotate(name_node, scope);
                        if *kind == FunctionKind::Declaration {
                            self.hoist_declaration(scope, name_node, SymbolKind::Function, Some(id));
                        }
                    }
                    // Nested bodies are hoisted when the function itself is bound.
                    VisitControl::SkipChildren
                }
                NodeKind::VarDecl { name, init } => {
                    self.hoist_declaration(scope, *name, SymbolKind::Variable, *init);
                    VisitControl::Continue
                }
                _ => VisitControl::Continue,
            }
        });
    }

    fn hoist_declaration(&mut self, scope: ScopeId, name_node: NodeId, kind: SymbolKind, value: Option<NodeId>) {
        if let Some(name) = self.ast.kind(name_node).name() {
            let symbol = self.table.declare(scope, name, kind, name_node, value);
            self.resolved.insert(name_node, symbol);
        }
    }

    // ========================================================================
    // Binding
    // ========================================================================

    fn bind(&mut self, scope: ScopeId, node: NodeId, locals: &mut Locals) {
        let ast = self.ast;
        self.annotate(node, scope);
        match ast.kind(node) {
            NodeKind::VarDecl { name, init } => {
                self.annotate(*name, scope);
                if let Some(&symbol) = self.resolved.get(name) {
                    locals.insert(symbol);
                }
                if let Some(init) = *init {
                    self.bind(scope, init, locals);
                }
            }
            NodeKind::Assign { target, value, .. } => {
                self.bind_assignment(scope, node, *target, *value, locals);
            }
            NodeKind::ForIn {
                target,
                object,
                body,
            } => {
                self.bind_for_in_target(scope, *target, locals);
                self.bind(scope, *object, locals);
                self.bind(scope, *body, locals);
            }
            NodeKind::Var { name } => self.bind_reference(scope, node, *name),
            NodeKind::This => self.bind_reference(scope, node, self.this_name),
            NodeKind::Function { .. } => self.bind_function(scope, node),
            NodeKind::Catch { param, body } => self.bind_catch(scope, *param, *body, locals),
            NodeKind::Binary { .. }
            | NodeKind::Member { .. }
            | NodeKind::Call { .. }
            | NodeKind::Index { .. } => self.bind_chain(scope, node, locals),
            kind @ (NodeKind::Program { .. }
            | NodeKind::Ident { .. }
            | NodeKind::Param { .. }
            | NodeKind::VarStatement { .. }
            | NodeKind::Block { .. }
            | NodeKind::Empty
            | NodeKind::ExprStatement { .. }
            | NodeKind::If { .. }
            | NodeKind::While { .. }
            | NodeKind::DoWhile { .. }
            | NodeKind::For { .. }
            | NodeKind::Return { .. }
            | NodeKind::Break { .. }
            | NodeKind::Continue { .. }
            | NodeKind::Throw { .. }
            | NodeKind::Try { .. }
            | NodeKind::Switch { .. }
            | NodeKind::Case { .. }
            | NodeKind::Labeled { .. }
            | NodeKind::With { .. }
            | NodeKind::Debugger
            | NodeKind::Literal { .. }
            | NodeKind::Array { .. }
            | NodeKind::Object { .. }
            | NodeKind::Property { .. }
            | NodeKind::Unary { .. }
            | NodeKind::Update { .. }
            | NodeKind::Conditional { .. }
            | NodeKind::New { .. }
            | NodeKind::Sequence { .. }
            | NodeKind::Paren { .. }
            | NodeKind::Missing) => {
                kind.for_each_child(|child| self.bind(scope, child, locals));
            }
        }
    }

    /// Bind a left-nested run of binary operators and member, call and index
    /// suffixes. Generated code can chain these thousands deep, so the spine
    /// is walked with an explicit stack and only the operands recurse.
    fn bind_chain(&mut self, scope: ScopeId, node: NodeId, locals: &mut Locals) {
        let ast = self.ast;
        let mut spine = vec![node];
        let mut head = node;
        while let Some(next) = chain_head(ast.kind(head)) {
            if chain_head(ast.kind(next)).is_none() {
                break;
            }
            spine.push(next);
            head = next;
        }

        for &link in spine.iter().rev() {
            self.annotate(link, scope);
            match ast.kind(link) {
                NodeKind::Binary { left, right, .. } => {
                    if link == head {
                        self.bind(scope, *left, locals);
                    }
                    self.bind(scope, *right, locals);
                }
                NodeKind::Member { object, property } => {
                    if link == head {
                        self.bind(scope, *object, locals);
                    }
                    self.annotate(*property, scope);
                    if let Some(fix) = ast.name_text(*property).and_then(lint::misspelled_property) {
                        self.report(link, &messages::DID_YOU_MEAN_0, &[fix]);
                    }
                }
                NodeKind::Call { callee, args } => {
                    let known = ast.interner().known();
                    let missing_radix = match ast.kind(*callee) {
                        NodeKind::Var { name } => lint::is_parse_int_without_radix(known, *name, args.len()),
                        _ => false,
                    };
                    if missing_radix {
                        self.report(link, &messages::MISSING_RADIX_ARGUMENT, &[]);
                    }
                    if link == head {
                        self.bind(scope, *callee, locals);
                    }
                    for &arg in args {
                        self.bind(scope, arg, locals);
                    }
                }
                NodeKind::Index { object, index } => {
                    if link == head {
                        self.bind(scope, *object, locals);
                    }
                    self.bind(scope, *index, locals);
                }
                _ => {}
            }
        }
    }

    /// A read of `name` at `node`. Unresolved reads record nothing.
    fn bind_reference(&mut self, scope: ScopeId, node: NodeId, name: InternedString) {
        self.annotate(node, scope);
        if let Some(symbol) = self.table.get(scope, name) {
            self.table.symbol_mut(symbol).uses.push(node);
            self.resolved.insert(node, symbol);
        }
    }

    fn bind_assignment(
        &mut self,
        scope: ScopeId,
        assignment: NodeId,
        target: NodeId,
        value: NodeId,
        locals: &mut Locals,
    ) {
        let ast = self.ast;
        let bare = ast.skip_parens(target);
        match ast.kind(bare) {
            NodeKind::Var { name } => {
                self.annotate(target, scope);
                self.annotate(bare, scope);
                let symbol = match self.table.get(scope, *name) {
                    Some(symbol) => {
                        self.table.symbol_mut(symbol).uses.push(bare);
                        self.table.hint(scope, *name, bare, value)
                    }
                    None => {
                        self.report(assignment, &messages::ASSIGNING_TO_UNDECLARED_VARIABLE, &[]);
                        trace!(
                            name = ast.interner().resolve(*name),
                            scope = scope.0,
                            "implicitly declaring assignment target"
                        );
                        self.table.hint(scope, *name, bare, value)
                    }
                };
                self.resolved.insert(bare, symbol);
            }
            _ => self.bind(scope, target, locals),
        }
        self.bind(scope, value, locals);
    }

    fn bind_for_in_target(&mut self, scope: ScopeId, target: NodeId, locals: &mut Locals) {
        let ast = self.ast;
        let bare = ast.skip_parens(target);
        let NodeKind::Var { name } = ast.kind(bare) else {
            self.bind(scope, target, locals);
            return;
        };
        self.annotate(target, scope);
        self.annotate(bare, scope);
        match self.table.get(scope, *name) {
            Some(symbol) => {
                self.table.symbol_mut(symbol).uses.push(bare);
                self.resolved.insert(bare, symbol);
            }
            None => self.report(target, &messages::UNDECLARED_ITERATOR_VARIABLE, &[]),
        }
    }

    fn bind_function(&mut self, scope: ScopeId, function: NodeId) {
        let ast = self.ast;
        let NodeKind::Function {
            kind,
            name,
            params,
            body,
        } = ast.kind(function)
        else {
            return;
        };

        let child = self.table.create_scope(Some(scope));
        trace!(scope = child.0, parent = scope.0, "created function scope");
        self.table
            .declare(child, self.this_name, SymbolKind::This, function, None);

        if let Some(name_node) = *name {
            match kind {
                // Declared in the enclosing scope during hoisting.
                FunctionKind::Declaration => self.annotate(name_node, scope),
                FunctionKind::Expression => {
                    self.annotate(name_node, child);
                    if let Some(text) = ast.kind(name_node).name() {
                        let symbol = self.table.declare(
                            child,
                            text,
                            SymbolKind::Function,
                            name_node,
                            Some(function),
                        );
                        self.resolved.insert(name_node, symbol);
                    }
                }
            }
        }

        let mut locals = Locals::new();
        for &param in params {
            self.annotate(param, child);
            let Some(text) = ast.kind(param).name() else {
                continue;
            };
            let symbol = self
                .table
                .declare(child, text, SymbolKind::Parameter, param, None);
            self.resolved.insert(param, symbol);
            if self.features.unused_function_args {
                locals.insert(symbol);
            }
        }

        self.bind_function_body(child, body, &mut locals);
    }

    /// Bind a catch clause. The parameter shadows the enclosing scope's entry
    /// for its name only while the handler body is bound.
    fn bind_catch(&mut self, scope: ScopeId, param: NodeId, body: NodeId, locals: &mut Locals) {
        let ast = self.ast;
        self.annotate(param, scope);
        let Some(name) = ast.kind(param).name() else {
            self.bind(scope, body, locals);
            return;
        };
        let symbol = self
            .table
            .new_symbol(name, SymbolKind::CatchParameter, param);
        self.resolved.insert(param, symbol);

        let mut shadow = CatchShadow::install(self, scope, name, symbol);
        shadow.bind(scope, body, locals);
    }

    // ========================================================================
    // Unused variables
    // ========================================================================

    fn report_unused(&mut self, locals: &Locals) {
        let unused: Vec<NodeId> = locals
            .iter()
            .map(|&id| self.table.symbol(id))
            .filter(|symbol| !symbol.is_used())
            .flat_map(|symbol| symbol.declarations.iter().copied())
            .collect();
        for declaration in unused {
            self.report(declaration, &messages::UNUSED_VARIABLE, &[]);
        }
    }
}

/// The operand a chain link nests to the left through.
fn chain_head(kind: &NodeKind) -> Option<NodeId> {
    match kind {
        NodeKind::Binary { left, .. } => Some(*left),
        NodeKind::Member { object, .. } | NodeKind::Index { object, .. } => Some(*object),
        NodeKind::Call { callee, .. } => Some(*callee),
        _ => None,
    }
}

/// Installs a catch binding in a scope and restores the previous entry when
/// dropped.
struct CatchShadow<'b, 'a> {
    binder: &'b mut Binder<'a>,
    scope: ScopeId,
    name: InternedString,
    saved: Option<SymbolId>,
}

impl<'b, 'a> CatchShadow<'b, 'a> {
    fn install(binder: &'b mut Binder<'a>, scope: ScopeId, name: InternedString, symbol: SymbolId) -> Self {
        let saved = binder.table.set_entry(scope, name, Some(symbol));
        Self {
            binder,
            scope,
            name,
            saved,
        }
    }
}

impl<'a> Deref for CatchShadow<'_, 'a> {
    type Target = Binder<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.binder
    }
}

impl DerefMut for CatchShadow<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.binder
    }
}

impl Drop for CatchShadow<'_, '_> {
    fn drop(&mut self) {
        self.binder
            .table
            .set_entry(self.scope, self.name, self.saved);
    }
}
