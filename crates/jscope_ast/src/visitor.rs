//! Generic tree traversal.
//!
//! The analysis passes dispatch on [`NodeKind`](crate::NodeKind) themselves;
//! these helpers cover the shape-agnostic walks (hoisting, searches,
//! tests). Walks keep their own stack, so tree depth never grows the call
//! stack.

use crate::ast::Ast;
use crate::node::NodeId;

/// Returned by a traversal callback to steer the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    /// Visit this node's children.
    Continue,
    /// Do not descend into this node's children.
    SkipChildren,
    /// Stop the whole traversal.
    Stop,
}

/// Pre-order walk over `start` and its descendants, in source order.
///
/// Returns `false` if the walk was stopped early.
pub fn for_each_descendant(
    ast: &Ast,
    start: NodeId,
    mut f: impl FnMut(NodeId) -> VisitControl,
) -> bool {
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        match f(id) {
            VisitControl::Stop => return false,
            VisitControl::SkipChildren => continue,
            VisitControl::Continue => {}
        }
        let first = stack.len();
        ast.kind(id).for_each_child(|child| stack.push(child));
        stack[first..].reverse();
    }
    true
}

/// Collect every node under `start` (inclusive) for which `pred` holds.
pub fn find_all(ast: &Ast, start: NodeId, mut pred: impl FnMut(NodeId) -> bool) -> Vec<NodeId> {
    let mut out = Vec::new();
    for_each_descendant(ast, start, |id| {
        if pred(id) {
            out.push(id);
        }
        VisitControl::Continue
    });
    out
}

/// The first node under `start` (inclusive), in source order, for which
/// `pred` holds.
pub fn find_first(ast: &Ast, start: NodeId, mut pred: impl FnMut(NodeId) -> bool) -> Option<NodeId> {
    let mut found = None;
    for_each_descendant(ast, start, |id| {
        if pred(id) {
            found = Some(id);
            VisitControl::Stop
        } else {
            VisitControl::Continue
        }
    });
    found
}
