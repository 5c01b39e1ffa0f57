//! jscope_ast: Syntax tree definitions for the jscope analyzer.
//!
//! This crate defines the token kinds produced by the scanner, the arena
//! syntax tree built by the parser, and generic traversal helpers.

pub mod ast;
pub mod node;
pub mod syntax_kind;
pub mod visitor;

// Re-export key types
pub use ast::{Ast, AstBuilder};
pub use node::*;
pub use syntax_kind::SyntaxKind;
pub use visitor::{find_all, find_first, for_each_descendant, VisitControl};
