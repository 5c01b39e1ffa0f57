//! The syntax tree arena and its builder.

use crate::node::{Node, NodeId, NodeKind};
use jscope_core::intern::StringInterner;
use jscope_core::text::{LineMap, SourcePosition, TextPos, TextRange};

/// An immutable syntax tree for one document.
///
/// Nodes are stored in a flat arena; [`NodeId`]s index into it. Parent links
/// are filled in by [`AstBuilder::finish`].
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
    line_map: LineMap,
    interner: StringInterner,
}

impl Ast {
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    #[inline]
    pub fn range(&self, id: NodeId) -> TextRange {
        self.nodes[id.index()].range
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in allocation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// The 0-based line/column span of a node.
    pub fn position(&self, id: NodeId) -> SourcePosition {
        self.line_map.position_of(self.range(id))
    }

    /// The name text of an `Ident`, `Param` or `Var` node.
    pub fn name_text(&self, id: NodeId) -> Option<&str> {
        self.kind(id).name().map(|name| self.interner.resolve(name))
    }

    /// Skip any parentheses wrapping an expression.
    pub fn skip_parens(&self, mut id: NodeId) -> NodeId {
        while let NodeKind::Paren { expr } = self.kind(id) {
            id = *expr;
        }
        id
    }

    /// The innermost node whose range covers `offset`.
    ///
    /// A node that ends exactly at `offset` still matches when no sibling
    /// strictly contains it, so a cursor placed right after an identifier
    /// selects that identifier.
    pub fn node_at(&self, offset: TextPos) -> Option<NodeId> {
        if !self.range(self.root).contains_inclusive(offset) {
            return None;
        }
        let mut current = self.root;
        loop {
            let mut strict = None;
            let mut touching = None;
            self.kind(current).for_each_child(|child| {
                let range = self.range(child);
                if strict.is_none() && range.contains(offset) {
                    strict = Some(child);
                } else if touching.is_none() && range.contains_inclusive(offset) {
                    touching = Some(child);
                }
            });
            match strict.or(touching) {
                Some(child) => current = child,
                None => return Some(current),
            }
        }
    }

    /// The nearest enclosing function node, if any.
    pub fn enclosing_function(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if self.kind(node).is_function() {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }
}

/// Allocates nodes bottom-up while parsing.
pub struct AstBuilder {
    nodes: Vec<Node>,
    interner: StringInterner,
}

impl AstBuilder {
    pub fn new(interner: StringInterner) -> Self {
        Self {
            nodes: Vec::new(),
            interner,
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Add a node and return its id. Children must already be allocated.
    pub fn alloc(&mut self, kind: NodeKind, range: TextRange) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            range,
            parent: None,
        });
        id
    }

    pub fn range(&self, id: NodeId) -> TextRange {
        self.nodes[id.index()].range
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    /// Seal the tree: link every child to its parent.
    pub fn finish(mut self, root: NodeId, text: &str) -> Ast {
        for index in 0..self.nodes.len() {
            let parent = NodeId(index as u32);
            for child in self.nodes[index].kind.children() {
                self.nodes[child.index()].parent = Some(parent);
            }
        }
        Ast {
            nodes: self.nodes,
            root,
            line_map: LineMap::new(text),
            interner: self.interner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::LiteralKind;

    // var x = 1;
    fn small_tree() -> (Ast, NodeId, NodeId) {
        let text = "var x = 1;";
        let mut b = AstBuilder::new(StringInterner::new());
        let x = b.interner().intern("x");
        let name = b.alloc(NodeKind::Ident { name: x }, TextRange::new(4, 5));
        let one = b.alloc(
            NodeKind::Literal {
                kind: LiteralKind::Number,
            },
            TextRange::new(8, 9),
        );
        let decl = b.alloc(
            NodeKind::VarDecl {
                name,
                init: Some(one),
            },
            TextRange::new(4, 9),
        );
        let stmt = b.alloc(
            NodeKind::VarStatement {
                keyword: crate::node::DeclarationKeyword::Var,
                declarations: vec![decl],
            },
            TextRange::new(0, 10),
        );
        let root = b.alloc(NodeKind::Program { body: vec![stmt] }, TextRange::new(0, 10));
        (b.finish(root, text), name, one)
    }

    #[test]
    fn test_parent_links() {
        let (ast, name, one) = small_tree();
        let decl = ast.parent(name).unwrap();
        assert_eq!(ast.parent(one), Some(decl));
        assert!(matches!(ast.kind(decl), NodeKind::VarDecl { .. }));
        assert_eq!(ast.parent(ast.root()), None);
    }

    #[test]
    fn test_node_at() {
        let (ast, name, one) = small_tree();
        assert_eq!(ast.node_at(4), Some(name));
        // Right after the identifier.
        assert_eq!(ast.node_at(5), Some(name));
        assert_eq!(ast.node_at(8), Some(one));
        assert_eq!(ast.node_at(0), ast.parent(ast.parent(name).unwrap()));
        assert_eq!(ast.node_at(40), None);
    }

    #[test]
    fn test_name_and_position() {
        let (ast, name, _) = small_tree();
        assert_eq!(ast.name_text(name), Some("x"));
        let pos = ast.position(name);
        assert_eq!((pos.start_line, pos.start_column, pos.end_column), (0, 4, 5));
    }
}
