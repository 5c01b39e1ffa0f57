//! jscope_binder: Scope resolution and symbol tables.
//!
//! The binder walks a parsed tree, builds one scope per function body,
//! hoists declarations, binds every reference to the declaration that
//! governs it and reports warnings along the way. The result is an
//! [`Analysis`]: the scope tree, the symbols, side tables keyed by node and
//! the emitted markers.

mod analysis;
mod binder;
mod lint;
mod scope;
mod symbol;

pub use analysis::Analysis;
pub use binder::{analyze, Binder};
pub use scope::{Scope, ScopeId, ScopeTable};
pub use symbol::{Symbol, SymbolId, SymbolKind};
