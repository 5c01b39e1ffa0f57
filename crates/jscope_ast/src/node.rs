//! Syntax tree node definitions.
//!
//! Every node lives in the [`Ast`](crate::Ast) arena and refers to its
//! children by [`NodeId`]. Names that introduce or reference a binding get
//! their own node so that every declaration and use has an exact span:
//!
//! - [`NodeKind::Ident`] for declared names (variables, functions, catch
//!   parameters), property names after `.`, object literal keys and labels.
//! - [`NodeKind::Param`] for function parameters.
//! - [`NodeKind::Var`] for a bare variable reference in expression position.

use crate::syntax_kind::SyntaxKind;
use jscope_core::intern::InternedString;
use jscope_core::text::TextRange;

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the arena: its shape, source range, and parent link.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub range: TextRange,
    /// `None` only for the program root.
    pub parent: Option<NodeId>,
}

/// The keyword that introduced a variable statement.
///
/// All three are bound with function scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKeyword {
    Var,
    Let,
    Const,
}

/// Whether a function node is a statement-level declaration or an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Declaration,
    Expression,
}

/// Object literal member kinds (ES5 accessors included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    String,
    RegExp,
    True,
    False,
    Null,
}

// ============================================================================
// Operators
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
}

impl AssignOp {
    pub fn from_token(kind: SyntaxKind) -> Option<AssignOp> {
        Some(match kind {
            SyntaxKind::EqualsToken => AssignOp::Assign,
            SyntaxKind::PlusEqualsToken => AssignOp::Add,
            SyntaxKind::MinusEqualsToken => AssignOp::Sub,
            SyntaxKind::AsteriskEqualsToken => AssignOp::Mul,
            SyntaxKind::SlashEqualsToken => AssignOp::Div,
            SyntaxKind::PercentEqualsToken => AssignOp::Mod,
            SyntaxKind::LessThanLessThanEqualsToken => AssignOp::Shl,
            SyntaxKind::GreaterThanGreaterThanEqualsToken => AssignOp::Shr,
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken => AssignOp::UShr,
            SyntaxKind::AmpersandEqualsToken => AssignOp::BitAnd,
            SyntaxKind::BarEqualsToken => AssignOp::BitOr,
            SyntaxKind::CaretEqualsToken => AssignOp::BitXor,
            _ => return None,
        })
    }

    pub fn is_compound(self) -> bool {
        self != AssignOp::Assign
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    InstanceOf,
    In,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn from_token(kind: SyntaxKind) -> Option<BinaryOp> {
        Some(match kind {
            SyntaxKind::BarBarToken => BinaryOp::Or,
            SyntaxKind::AmpersandAmpersandToken => BinaryOp::And,
            SyntaxKind::BarToken => BinaryOp::BitOr,
            SyntaxKind::CaretToken => BinaryOp::BitXor,
            SyntaxKind::AmpersandToken => BinaryOp::BitAnd,
            SyntaxKind::EqualsEqualsToken => BinaryOp::Eq,
            SyntaxKind::ExclamationEqualsToken => BinaryOp::NotEq,
            SyntaxKind::EqualsEqualsEqualsToken => BinaryOp::StrictEq,
            SyntaxKind::ExclamationEqualsEqualsToken => BinaryOp::StrictNotEq,
            SyntaxKind::LessThanToken => BinaryOp::Lt,
            SyntaxKind::GreaterThanToken => BinaryOp::Gt,
            SyntaxKind::LessThanEqualsToken => BinaryOp::LtEq,
            SyntaxKind::GreaterThanEqualsToken => BinaryOp::GtEq,
            SyntaxKind::InstanceOfKeyword => BinaryOp::InstanceOf,
            SyntaxKind::InKeyword => BinaryOp::In,
            SyntaxKind::LessThanLessThanToken => BinaryOp::Shl,
            SyntaxKind::GreaterThanGreaterThanToken => BinaryOp::Shr,
            SyntaxKind::GreaterThanGreaterThanGreaterThanToken => BinaryOp::UShr,
            SyntaxKind::PlusToken => BinaryOp::Add,
            SyntaxKind::MinusToken => BinaryOp::Sub,
            SyntaxKind::AsteriskToken => BinaryOp::Mul,
            SyntaxKind::SlashToken => BinaryOp::Div,
            SyntaxKind::PercentToken => BinaryOp::Mod,
            _ => return None,
        })
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::Or | BinaryOp::And)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    TypeOf,
    Void,
    Delete,
}

impl UnaryOp {
    pub fn from_token(kind: SyntaxKind) -> Option<UnaryOp> {
        Some(match kind {
            SyntaxKind::PlusToken => UnaryOp::Plus,
            SyntaxKind::MinusToken => UnaryOp::Minus,
            SyntaxKind::ExclamationToken => UnaryOp::Not,
            SyntaxKind::TildeToken => UnaryOp::BitNot,
            SyntaxKind::TypeOfKeyword => UnaryOp::TypeOf,
            SyntaxKind::VoidKeyword => UnaryOp::Void,
            SyntaxKind::DeleteKeyword => UnaryOp::Delete,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

// ============================================================================
// Node kinds
// ============================================================================

/// The shape of a node. Closed: every pass matches on it exhaustively.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Program {
        body: Vec<NodeId>,
    },

    // -- Names --
    /// A name that is not an expression: declared names, member property
    /// names, object keys and labels.
    Ident {
        name: InternedString,
    },
    /// A function parameter.
    Param {
        name: InternedString,
    },

    // -- Statements --
    VarStatement {
        keyword: DeclarationKeyword,
        declarations: Vec<NodeId>,
    },
    /// One `name` or `name = init` entry of a variable statement.
    VarDecl {
        name: NodeId,
        init: Option<NodeId>,
    },
    /// Function declaration or expression. `body` holds the statements
    /// between the braces.
    Function {
        kind: FunctionKind,
        name: Option<NodeId>,
        params: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    Block {
        body: Vec<NodeId>,
    },
    Empty,
    ExprStatement {
        expr: NodeId,
    },
    If {
        test: NodeId,
        consequent: NodeId,
        alternate: Option<NodeId>,
    },
    While {
        test: NodeId,
        body: NodeId,
    },
    DoWhile {
        body: NodeId,
        test: NodeId,
    },
    For {
        init: Option<NodeId>,
        test: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    },
    /// `for (target in object) body`. `target` is either a `VarStatement`
    /// with one declaration or an expression.
    ForIn {
        target: NodeId,
        object: NodeId,
        body: NodeId,
    },
    Return {
        argument: Option<NodeId>,
    },
    Break {
        label: Option<NodeId>,
    },
    Continue {
        label: Option<NodeId>,
    },
    Throw {
        argument: NodeId,
    },
    Try {
        block: NodeId,
        handler: Option<NodeId>,
        finalizer: Option<NodeId>,
    },
    /// `catch (param) body`; `param` is an `Ident`, `body` a `Block`.
    Catch {
        param: NodeId,
        body: NodeId,
    },
    Switch {
        discriminant: NodeId,
        cases: Vec<NodeId>,
    },
    /// A `case test:` clause, or `default:` when `test` is `None`.
    Case {
        test: Option<NodeId>,
        body: Vec<NodeId>,
    },
    Labeled {
        label: NodeId,
        body: NodeId,
    },
    With {
        object: NodeId,
        body: NodeId,
    },
    Debugger,

    // -- Expressions --
    /// A bare variable reference.
    Var {
        name: InternedString,
    },
    This,
    Literal {
        kind: LiteralKind,
    },
    /// Elements are `None` for holes (`[1, , 2]`).
    Array {
        elements: Vec<Option<NodeId>>,
    },
    Object {
        properties: Vec<NodeId>,
    },
    /// `key: value`, or an accessor whose value is a function expression.
    Property {
        kind: PropertyKind,
        key: NodeId,
        value: NodeId,
    },
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        operand: NodeId,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Assign {
        op: AssignOp,
        target: NodeId,
        value: NodeId,
    },
    Conditional {
        test: NodeId,
        consequent: NodeId,
        alternate: NodeId,
    },
    Call {
        callee: NodeId,
        args: Vec<NodeId>,
    },
    New {
        callee: NodeId,
        args: Vec<NodeId>,
    },
    /// `object.property`; `property` is an `Ident`.
    Member {
        object: NodeId,
        property: NodeId,
    },
    /// `object[index]`.
    Index {
        object: NodeId,
        index: NodeId,
    },
    Sequence {
        exprs: Vec<NodeId>,
    },
    Paren {
        expr: NodeId,
    },

    /// Placeholder produced by error recovery.
    Missing,
}

impl NodeKind {
    /// Call `f` on each direct child, in source order.
    pub fn for_each_child(&self, mut f: impl FnMut(NodeId)) {
        match self {
            NodeKind::Program { body }
            | NodeKind::Block { body }
            | NodeKind::VarStatement {
                declarations: body, ..
            }
            | NodeKind::Object { properties: body }
            | NodeKind::Sequence { exprs: body } => body.iter().copied().for_each(f),
            NodeKind::VarDecl { name, init } => {
                f(*name);
                if let Some(child) = init {
                    f(*child);
                }
            }
            NodeKind::Function {
                name, params, body, ..
            } => {
                if let Some(name) = name {
                    f(*name);
                }
                params.iter().copied().for_each(&mut f);
                body.iter().copied().for_each(f);
            }
            NodeKind::ExprStatement { expr } | NodeKind::Paren { expr } => f(*expr),
            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                f(*test);
                f(*consequent);
                if let Some(child) = alternate {
                    f(*child);
                }
            }
            NodeKind::While { test, body } => {
                f(*test);
                f(*body);
            }
            NodeKind::DoWhile { body, test } => {
                f(*body);
                f(*test);
            }
            NodeKind::For {
                init,
                test,
                update,
                body,
            } => {
                for child in [init, test, update].into_iter().flatten() {
                    f(*child);
                }
                f(*body);
            }
            NodeKind::ForIn {
                target,
                object,
                body,
            } => {
                f(*target);
                f(*object);
                f(*body);
            }
            NodeKind::Return { argument } => {
                if let Some(child) = argument {
                    f(*child);
                }
            }
            NodeKind::Break { label } | NodeKind::Continue { label } => {
                if let Some(child) = label {
                    f(*child);
                }
            }
            NodeKind::Throw { argument } => f(*argument),
            NodeKind::Try {
                block,
                handler,
                finalizer,
            } => {
                f(*block);
                if let Some(handler) = handler {
                    f(*handler);
                }
                if let Some(child) = finalizer {
                    f(*child);
                }
            }
            NodeKind::Catch { param, body } => {
                f(*param);
                f(*body);
            }
            NodeKind::Switch {
                discriminant,
                cases,
            } => {
                f(*discriminant);
                cases.iter().copied().for_each(f);
            }
            NodeKind::Case { test, body } => {
                if let Some(test) = test {
                    f(*test);
                }
                body.iter().copied().for_each(f);
            }
            NodeKind::Labeled { label, body } => {
                f(*label);
                f(*body);
            }
            NodeKind::With { object, body } => {
                f(*object);
                f(*body);
            }
            NodeKind::Array { elements } => elements.iter().flatten().copied().for_each(f),
            NodeKind::Property { key, value, .. } => {
                f(*key);
                f(*value);
            }
            NodeKind::Unary { operand, .. } | NodeKind::Update { operand, .. } => f(*operand),
            NodeKind::Binary { left, right, .. } => {
                f(*left);
                f(*right);
            }
            NodeKind::Assign { target, value, .. } => {
                f(*target);
                f(*value);
            }
            NodeKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                f(*test);
                f(*consequent);
                f(*alternate);
            }
            NodeKind::Call { callee, args } | NodeKind::New { callee, args } => {
                f(*callee);
                args.iter().copied().for_each(f);
            }
            NodeKind::Member { object, property } => {
                f(*object);
                f(*property);
            }
            NodeKind::Index { object, index } => {
                f(*object);
                f(*index);
            }
            NodeKind::Ident { .. }
            | NodeKind::Param { .. }
            | NodeKind::Empty
            | NodeKind::Debugger
            | NodeKind::Var { .. }
            | NodeKind::This
            | NodeKind::Literal { .. }
            | NodeKind::Missing => {}
        }
    }

    /// Collect the direct children into a vector.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.for_each_child(|child| out.push(child));
        out
    }

    /// The name carried by a name-bearing node.
    pub fn name(&self) -> Option<InternedString> {
        match self {
            NodeKind::Ident { name } | NodeKind::Param { name } | NodeKind::Var { name } => {
                Some(*name)
            }
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, NodeKind::Function { .. })
    }

    /// A short name for the shape, used in debug output and tree dumps.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "Program",
            NodeKind::Ident { .. } => "Ident",
            NodeKind::Param { .. } => "Param",
            NodeKind::VarStatement { .. } => "VarStatement",
            NodeKind::VarDecl { .. } => "VarDecl",
            NodeKind::Function { .. } => "Function",
            NodeKind::Block { .. } => "Block",
            NodeKind::Empty => "Empty",
            NodeKind::ExprStatement { .. } => "ExprStatement",
            NodeKind::If { .. } => "If",
            NodeKind::While { .. } => "While",
            NodeKind::DoWhile { .. } => "DoWhile",
            NodeKind::For { .. } => "For",
            NodeKind::ForIn { .. } => "ForIn",
            NodeKind::Return { .. } => "Return",
            NodeKind::Break { .. } => "Break",
            NodeKind::Continue { .. } => "Continue",
            NodeKind::Throw { .. } => "Throw",
            NodeKind::Try { .. } => "Try",
            NodeKind::Catch { .. } => "Catch",
            NodeKind::Switch { .. } => "Switch",
            NodeKind::Case { .. } => "Case",
            NodeKind::Labeled { .. } => "Labeled",
            NodeKind::With { .. } => "With",
            NodeKind::Debugger => "Debugger",
            NodeKind::Var { .. } => "Var",
            NodeKind::This => "This",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::Array { .. } => "Array",
            NodeKind::Object { .. } => "Object",
            NodeKind::Property { .. } => "Property",
            NodeKind::Unary { .. } => "Unary",
            NodeKind::Update { .. } => "Update",
            NodeKind::Binary { .. } => "Binary",
            NodeKind::Assign { .. } => "Assign",
            NodeKind::Conditional { .. } => "Conditional",
            NodeKind::Call { .. } => "Call",
            NodeKind::New { .. } => "New",
            NodeKind::Member { .. } => "Member",
            NodeKind::Index { .. } => "Index",
            NodeKind::Sequence { .. } => "Sequence",
            NodeKind::Paren { .. } => "Paren",
            NodeKind::Missing => "Missing",
        }
    }
}
