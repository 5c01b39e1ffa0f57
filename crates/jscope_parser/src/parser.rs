//! The parser implementation.
//!
//! A recursive descent parser over the ES5 grammar. It pulls tokens from the
//! scanner and allocates nodes bottom-up into an [`AstBuilder`]. Syntax
//! errors are recorded and parsing continues, so a tree is always produced.

use jscope_ast::node::*;
use jscope_ast::syntax_kind::SyntaxKind;
use jscope_ast::{Ast, AstBuilder};
use jscope_core::intern::StringInterner;
use jscope_core::text::{TextPos, TextRange};
use jscope_diagnostics::{messages, Marker, MarkerCollection, MarkerMessage};
use jscope_scanner::Scanner;

use crate::precedence::{get_binary_operator_precedence, OperatorPrecedence};
use crate::utilities::{is_assignable, is_misplaced_keyword, is_statement_keyword};

/// Maximum recursion depth to prevent stack overflow on deeply nested input.
const MAX_RECURSION_DEPTH: u32 = 200;

/// The output of a parse: the tree and any syntax error markers, sorted by
/// position.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub ast: Ast,
    pub markers: Vec<Marker>,
}

/// Parse `text` with a fresh string interner.
pub fn parse(text: &str) -> ParseResult {
    parse_with_interner(text, StringInterner::new())
}

/// Parse `text`, interning names into `interner`.
pub fn parse_with_interner(text: &str, interner: StringInterner) -> ParseResult {
    Parser::new(text, interner).parse_program()
}

/// A syntax error waiting for the line map to become a [`Marker`].
struct ParseError {
    range: TextRange,
    message: &'static MarkerMessage,
    arg: Option<&'static str>,
}

/// The parser produces an [`Ast`] from source text.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    builder: AstBuilder,
    errors: Vec<ParseError>,
    /// End of the most recently consumed token; closes node ranges.
    last_token_end: TextPos,
    /// Set while parsing a `for` head, where `in` ends the initializer.
    disallow_in: bool,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    recursion_depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str, interner: StringInterner) -> Self {
        Self {
            scanner: Scanner::new(text),
            builder: AstBuilder::new(interner),
            errors: Vec::new(),
            last_token_end: 0,
            disallow_in: false,
            recursion_depth: 0,
        }
    }

    pub fn parse_program(mut self) -> ParseResult {
        self.scanner.skip_shebang();
        self.next_token();

        let mut body = Vec::new();
        while self.current_token() != SyntaxKind::EndOfFileToken {
            self.parse_statement_into(&mut body);
        }
        let text = self.scanner.text();
        let root = self.builder.alloc(
            NodeKind::Program { body },
            TextRange::new(0, text.len() as u32),
        );
        let ast = self.builder.finish(root, text);

        let line_map = ast.line_map();
        let mut markers = MarkerCollection::new();
        for e in self.scanner.take_errors() {
            markers.add(Marker::new(line_map.position_of(e.range), e.message, &[]));
        }
        for e in &self.errors {
            let args: Vec<&str> = e.arg.into_iter().collect();
            markers.add(Marker::new(line_map.position_of(e.range), e.message, &args));
        }
        markers.sort();

        ParseResult {
            ast,
            markers: markers.into_markers(),
        }
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn current_token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    /// Advance to the next meaningful token. Invalid characters were already
    /// reported by the scanner and are skipped.
    fn next_token(&mut self) -> SyntaxKind {
        self.last_token_end = self.scanner.token_end();
        loop {
            let kind = self.scanner.scan();
            if kind != SyntaxKind::Unknown {
                return kind;
            }
        }
    }

    #[inline]
    fn token_pos(&self) -> TextPos {
        self.scanner.token_start()
    }

    #[inline]
    fn token_value(&self) -> &str {
        self.scanner.token_value()
    }

    fn expect_token(&mut self, kind: SyntaxKind) -> bool {
        if self.current_token() == kind {
            self.next_token();
            true
        } else {
            self.error_with(&messages::_0_EXPECTED, Some(kind.text()));
            false
        }
    }

    fn optional_token(&mut self, kind: SyntaxKind) -> bool {
        if self.current_token() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Whether a statement may end here without an explicit `;`.
    fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.current_token(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.scanner.has_preceding_line_break()
    }

    fn parse_expected_semicolon(&mut self) {
        if self.optional_token(SyntaxKind::SemicolonToken) {
            return;
        }
        // ASI: a line break, close brace, or EOF terminates the statement.
        if !self.can_parse_semicolon() {
            self.error_with(&messages::_0_EXPECTED, Some(";"));
        }
    }

    fn error(&mut self, message: &'static MarkerMessage) {
        self.error_with(message, None);
    }

    /// Report an error at the current token. Only the first error at a given
    /// position is kept.
    fn error_with(&mut self, message: &'static MarkerMessage, arg: Option<&'static str>) {
        let range = self.scanner.token_range();
        if self.errors.last().is_some_and(|e| e.range.pos == range.pos) {
            return;
        }
        self.errors.push(ParseError {
            range,
            message,
            arg,
        });
    }

    /// Allocate a node spanning from `pos` to the end of the last consumed
    /// token.
    fn finish_node(&mut self, kind: NodeKind, pos: TextPos) -> NodeId {
        let end = self.last_token_end.max(pos);
        self.builder.alloc(kind, TextRange::new(pos, end))
    }

    fn missing_node(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.builder.alloc(NodeKind::Missing, TextRange::empty(pos))
    }

    fn node_pos(&self, node: NodeId) -> TextPos {
        self.builder.range(node).pos
    }

    /// Run `f` with `in` treated as an operator again (inside parentheses,
    /// brackets and function bodies).
    fn allow_in<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.disallow_in, false);
        let result = f(self);
        self.disallow_in = saved;
        result
    }

    fn disallow_in<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.disallow_in, true);
        let result = f(self);
        self.disallow_in = saved;
        result
    }

    fn enter_recursion(&mut self) -> bool {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            self.recursion_depth -= 1;
            self.error(&messages::NESTING_TOO_DEEP);
            return false;
        }
        true
    }

    fn leave_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    fn intern_token(&self) -> jscope_core::InternedString {
        self.builder.interner().intern(self.scanner.token_value())
    }

    // ========================================================================
    // Statement parsing
    // ========================================================================

    /// Parse statements until `}` or EOF.
    fn parse_statement_list(&mut self) -> Vec<NodeId> {
        let mut statements = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::EndOfFileToken | SyntaxKind::CloseBraceToken
        ) {
            self.parse_statement_into(&mut statements);
        }
        statements
    }

    /// Parse one statement into `out`, recovering when no progress is made.
    fn parse_statement_into(&mut self, out: &mut Vec<NodeId>) {
        let saved_pos = self.token_pos();
        let stmt = self.parse_statement();
        out.push(stmt);

        // Error recovery: if the parser hasn't advanced past the same position,
        // skip forward to the next statement-starting token to avoid infinite loops.
        if self.token_pos() == saved_pos && self.current_token() != SyntaxKind::EndOfFileToken {
            self.skip_to_next_statement();
        }
    }

    /// Error recovery: skip the offending token, then skip until a token that
    /// can start a new statement.
    fn skip_to_next_statement(&mut self) {
        self.next_token();
        loop {
            match self.current_token() {
                SyntaxKind::EndOfFileToken | SyntaxKind::CloseBraceToken => return,
                SyntaxKind::SemicolonToken => {
                    self.next_token();
                    return;
                }
                kind if is_statement_keyword(kind) => return,
                _ if self.scanner.has_preceding_line_break() => return,
                _ => {
                    self.next_token();
                }
            }
        }
    }

    fn parse_statement(&mut self) -> NodeId {
        if !self.enter_recursion() {
            return self.missing_node();
        }
        let stmt = self.parse_statement_worker();
        self.leave_recursion();
        stmt
    }

    fn parse_statement_worker(&mut self) -> NodeId {
        match self.current_token() {
            SyntaxKind::SemicolonToken => {
                let pos = self.token_pos();
                self.next_token();
                self.finish_node(NodeKind::Empty, pos)
            }
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_statement()
            }
            SyntaxKind::FunctionKeyword => self.parse_function(FunctionKind::Declaration),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::DebuggerKeyword => {
                let pos = self.token_pos();
                self.next_token();
                self.parse_expected_semicolon();
                self.finish_node(NodeKind::Debugger, pos)
            }
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => {
                self.parse_break_or_continue_statement()
            }
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::WithKeyword => self.parse_with_statement(),
            SyntaxKind::Identifier if self.is_labeled_statement() => self.parse_labeled_statement(),
            SyntaxKind::CloseBraceToken => {
                // A stray `}` at the top level.
                let pos = self.token_pos();
                self.error(&messages::DECLARATION_OR_STATEMENT_EXPECTED);
                self.next_token();
                self.finish_node(NodeKind::Missing, pos)
            }
            kind if is_misplaced_keyword(kind) => {
                let pos = self.token_pos();
                self.error(&messages::DECLARATION_OR_STATEMENT_EXPECTED);
                self.next_token();
                self.finish_node(NodeKind::Missing, pos)
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn is_labeled_statement(&mut self) -> bool {
        // Look ahead: identifier followed by colon
        self.scanner
            .look_ahead(|s| s.scan() == SyntaxKind::ColonToken)
    }

    fn parse_labeled_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        let label = self.parse_identifier();
        self.expect_token(SyntaxKind::ColonToken);
        let body = self.parse_statement();
        self.finish_node(NodeKind::Labeled { label, body }, pos)
    }

    fn parse_block(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.expect_token(SyntaxKind::OpenBraceToken);
        let body = self.parse_statement_list();
        self.expect_token(SyntaxKind::CloseBraceToken);
        self.finish_node(NodeKind::Block { body }, pos)
    }

    fn parse_expression_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        let expr = self.allow_in(|p| p.parse_expression());
        self.parse_expected_semicolon();
        self.finish_node(NodeKind::ExprStatement { expr }, pos)
    }

    // -- Variable statements --

    fn declaration_keyword(kind: SyntaxKind) -> DeclarationKeyword {
        match kind {
            SyntaxKind::LetKeyword => DeclarationKeyword::Let,
            SyntaxKind::ConstKeyword => DeclarationKeyword::Const,
            _ => DeclarationKeyword::Var,
        }
    }

    fn parse_variable_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        let keyword = Self::declaration_keyword(self.current_token());
        self.next_token();
        let declarations = self.parse_variable_declaration_list();
        self.parse_expected_semicolon();
        self.finish_node(
            NodeKind::VarStatement {
                keyword,
                declarations,
            },
            pos,
        )
    }

    fn parse_variable_declaration_list(&mut self) -> Vec<NodeId> {
        let mut declarations = Vec::new();
        loop {
            declarations.push(self.parse_variable_declaration());
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }
        declarations
    }

    fn parse_variable_declaration(&mut self) -> NodeId {
        let pos = self.token_pos();
        let name = self.parse_binding_identifier();
        let init = if self.optional_token(SyntaxKind::EqualsToken) {
            Some(self.parse_assignment_expression())
        } else {
            None
        };
        self.finish_node(NodeKind::VarDecl { name, init }, pos)
    }

    /// Parse a declared name into an `Ident` node, or a `Missing` node with
    /// an error.
    fn parse_binding_identifier(&mut self) -> NodeId {
        if self.current_token() == SyntaxKind::Identifier {
            self.parse_identifier()
        } else {
            self.error(&messages::IDENTIFIER_EXPECTED);
            self.missing_node()
        }
    }

    /// Parse the current identifier token into an `Ident` node.
    fn parse_identifier(&mut self) -> NodeId {
        let pos = self.token_pos();
        let name = self.intern_token();
        self.next_token();
        self.finish_node(NodeKind::Ident { name }, pos)
    }

    // -- Functions --

    fn parse_function(&mut self, kind: FunctionKind) -> NodeId {
        let pos = self.token_pos();
        self.expect_token(SyntaxKind::FunctionKeyword);
        let name = if self.current_token() == SyntaxKind::Identifier {
            Some(self.parse_identifier())
        } else {
            if kind == FunctionKind::Declaration {
                self.error(&messages::IDENTIFIER_EXPECTED);
            }
            None
        };
        self.parse_function_rest(pos, kind, name)
    }

    /// Parse `(params) { body }` of a function whose head starts at `pos`.
    fn parse_function_rest(&mut self, pos: TextPos, kind: FunctionKind, name: Option<NodeId>) -> NodeId {
        let params = self.parse_parameter_list();
        let body = self.allow_in(|p| {
            if p.expect_token(SyntaxKind::OpenBraceToken) {
                let body = p.parse_statement_list();
                p.expect_token(SyntaxKind::CloseBraceToken);
                body
            } else {
                Vec::new()
            }
        });
        self.finish_node(
            NodeKind::Function {
                kind,
                name,
                params,
                body,
            },
            pos,
        )
    }

    fn parse_parameter_list(&mut self) -> Vec<NodeId> {
        let mut params = Vec::new();
        if !self.expect_token(SyntaxKind::OpenParenToken) {
            return params;
        }
        while self.current_token() != SyntaxKind::CloseParenToken {
            if self.current_token() != SyntaxKind::Identifier {
                self.error(&messages::IDENTIFIER_EXPECTED);
                break;
            }
            let pos = self.token_pos();
            let name = self.intern_token();
            self.next_token();
            params.push(self.finish_node(NodeKind::Param { name }, pos));
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseParenToken);
        params
    }

    // -- Control flow --

    /// Parse `( expression )` as used by `if`, `while`, `switch` and `with`.
    fn parse_parenthesized_condition(&mut self) -> NodeId {
        self.expect_token(SyntaxKind::OpenParenToken);
        let expr = self.allow_in(|p| p.parse_expression());
        self.expect_token(SyntaxKind::CloseParenToken);
        expr
    }

    fn parse_if_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let test = self.parse_parenthesized_condition();
        let consequent = self.parse_statement();
        let alternate = if self.optional_token(SyntaxKind::ElseKeyword) {
            Some(self.parse_statement())
        } else {
            None
        };
        self.finish_node(
            NodeKind::If {
                test,
                consequent,
                alternate,
            },
            pos,
        )
    }

    fn parse_while_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let test = self.parse_parenthesized_condition();
        let body = self.parse_statement();
        self.finish_node(NodeKind::While { test, body }, pos)
    }

    fn parse_do_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let body = self.parse_statement();
        self.expect_token(SyntaxKind::WhileKeyword);
        let test = self.parse_parenthesized_condition();
        // The semicolon after do-while is always optional.
        self.optional_token(SyntaxKind::SemicolonToken);
        self.finish_node(NodeKind::DoWhile { body, test }, pos)
    }

    fn parse_for_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        self.expect_token(SyntaxKind::OpenParenToken);

        let init = match self.current_token() {
            SyntaxKind::SemicolonToken => None,
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                let decl_pos = self.token_pos();
                let keyword = Self::declaration_keyword(self.current_token());
                self.next_token();
                let declarations = self.disallow_in(|p| p.parse_variable_declaration_list());
                Some(self.finish_node(
                    NodeKind::VarStatement {
                        keyword,
                        declarations,
                    },
                    decl_pos,
                ))
            }
            _ => Some(self.disallow_in(|p| p.parse_expression())),
        };

        if let Some(target) = init {
            if self.current_token() == SyntaxKind::InKeyword {
                return self.parse_for_in_rest(pos, target);
            }
        }

        self.expect_token(SyntaxKind::SemicolonToken);
        let test = if self.current_token() != SyntaxKind::SemicolonToken {
            Some(self.allow_in(|p| p.parse_expression()))
        } else {
            None
        };
        self.expect_token(SyntaxKind::SemicolonToken);
        let update = if self.current_token() != SyntaxKind::CloseParenToken {
            Some(self.allow_in(|p| p.parse_expression()))
        } else {
            None
        };
        self.expect_token(SyntaxKind::CloseParenToken);
        let body = self.parse_statement();
        self.finish_node(
            NodeKind::For {
                init,
                test,
                update,
                body,
            },
            pos,
        )
    }

    /// Parse `in object) body` after the target of a `for...in` head.
    fn parse_for_in_rest(&mut self, pos: TextPos, target: NodeId) -> NodeId {
        let valid = match self.builder.kind(target) {
            NodeKind::VarStatement { declarations, .. } => declarations.len() == 1,
            _ => is_assignable(&self.builder, target),
        };
        if !valid {
            let range = self.builder.range(target);
            self.errors.push(ParseError {
                range,
                message: &messages::INVALID_LEFT_HAND_SIDE_IN_FOR_IN,
                arg: None,
            });
        }
        self.next_token(); // in
        let object = self.allow_in(|p| p.parse_expression());
        self.expect_token(SyntaxKind::CloseParenToken);
        let body = self.parse_statement();
        self.finish_node(
            NodeKind::ForIn {
                target,
                object,
                body,
            },
            pos,
        )
    }

    fn parse_return_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let argument = if self.can_parse_semicolon() {
            None
        } else {
            Some(self.allow_in(|p| p.parse_expression()))
        };
        self.parse_expected_semicolon();
        self.finish_node(NodeKind::Return { argument }, pos)
    }

    fn parse_break_or_continue_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        let is_break = self.current_token() == SyntaxKind::BreakKeyword;
        self.next_token();
        let label = if self.current_token() == SyntaxKind::Identifier
            && !self.scanner.has_preceding_line_break()
        {
            Some(self.parse_identifier())
        } else {
            None
        };
        self.parse_expected_semicolon();
        let kind = if is_break {
            NodeKind::Break { label }
        } else {
            NodeKind::Continue { label }
        };
        self.finish_node(kind, pos)
    }

    fn parse_throw_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        if self.scanner.has_preceding_line_break() {
            self.error(&messages::EXPRESSION_EXPECTED);
        }
        let argument = self.allow_in(|p| p.parse_expression());
        self.parse_expected_semicolon();
        self.finish_node(NodeKind::Throw { argument }, pos)
    }

    fn parse_try_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let block = self.parse_block();

        let handler = if self.current_token() == SyntaxKind::CatchKeyword {
            let catch_pos = self.token_pos();
            self.next_token();
            self.expect_token(SyntaxKind::OpenParenToken);
            let param = self.parse_binding_identifier();
            self.expect_token(SyntaxKind::CloseParenToken);
            let body = self.parse_block();
            Some(self.finish_node(NodeKind::Catch { param, body }, catch_pos))
        } else {
            None
        };

        let finalizer = if self.optional_token(SyntaxKind::FinallyKeyword) {
            Some(self.parse_block())
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            self.error_with(&messages::_0_EXPECTED, Some("catch"));
        }

        self.finish_node(
            NodeKind::Try {
                block,
                handler,
                finalizer,
            },
            pos,
        )
    }

    fn parse_switch_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let discriminant = self.parse_parenthesized_condition();
        let mut cases = Vec::new();
        if self.expect_token(SyntaxKind::OpenBraceToken) {
            loop {
                match self.current_token() {
                    SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword => {
                        cases.push(self.parse_case_clause());
                    }
                    SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken => break,
                    _ => {
                        self.error_with(&messages::_0_EXPECTED, Some("case"));
                        self.skip_to_next_statement();
                    }
                }
            }
            self.expect_token(SyntaxKind::CloseBraceToken);
        }
        self.finish_node(
            NodeKind::Switch {
                discriminant,
                cases,
            },
            pos,
        )
    }

    fn parse_case_clause(&mut self) -> NodeId {
        let pos = self.token_pos();
        let test = if self.current_token() == SyntaxKind::CaseKeyword {
            self.next_token();
            Some(self.allow_in(|p| p.parse_expression()))
        } else {
            self.next_token(); // default
            None
        };
        self.expect_token(SyntaxKind::ColonToken);
        let mut body = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CaseKeyword
                | SyntaxKind::DefaultKeyword
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::EndOfFileToken
        ) {
            self.parse_statement_into(&mut body);
        }
        self.finish_node(NodeKind::Case { test, body }, pos)
    }

    fn parse_with_statement(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        let object = self.parse_parenthesized_condition();
        let body = self.parse_statement();
        self.finish_node(NodeKind::With { object, body }, pos)
    }

    // ========================================================================
    // Expression parsing
    // ========================================================================

    fn parse_expression(&mut self) -> NodeId {
        let first = self.parse_assignment_expression();
        if self.current_token() != SyntaxKind::CommaToken {
            return first;
        }
        let pos = self.node_pos(first);
        let mut exprs = vec![first];
        while self.optional_token(SyntaxKind::CommaToken) {
            exprs.push(self.parse_assignment_expression());
        }
        self.finish_node(NodeKind::Sequence { exprs }, pos)
    }

    fn parse_assignment_expression(&mut self) -> NodeId {
        if !self.enter_recursion() {
            return self.missing_node();
        }
        let expr = self.parse_assignment_expression_worker();
        self.leave_recursion();
        expr
    }

    fn parse_assignment_expression_worker(&mut self) -> NodeId {
        let expr = self.parse_conditional_expression();

        let Some(op) = AssignOp::from_token(self.current_token()) else {
            return expr;
        };
        let pos = self.node_pos(expr);
        self.next_token();
        let value = self.parse_assignment_expression();
        self.finish_node(
            NodeKind::Assign {
                op,
                target: expr,
                value,
            },
            pos,
        )
    }

    fn parse_conditional_expression(&mut self) -> NodeId {
        let test = self.parse_binary_expression(OperatorPrecedence::Lowest);

        // Ternary: cond ? true : false
        if !self.optional_token(SyntaxKind::QuestionToken) {
            return test;
        }
        let pos = self.node_pos(test);
        let consequent = self.allow_in(|p| p.parse_assignment_expression());
        self.expect_token(SyntaxKind::ColonToken);
        let alternate = self.parse_assignment_expression();
        self.finish_node(
            NodeKind::Conditional {
                test,
                consequent,
                alternate,
            },
            pos,
        )
    }

    fn parse_binary_expression(&mut self, min_precedence: OperatorPrecedence) -> NodeId {
        let mut left = self.parse_unary_expression();

        loop {
            let token = self.current_token();
            let precedence = get_binary_operator_precedence(token);
            if precedence == OperatorPrecedence::Invalid
                || precedence <= min_precedence
                || (token == SyntaxKind::InKeyword && self.disallow_in)
            {
                break;
            }
            let Some(op) = BinaryOp::from_token(token) else {
                break;
            };

            let pos = self.node_pos(left);
            self.next_token();
            let right = self.parse_binary_expression(precedence);
            left = self.finish_node(NodeKind::Binary { op, left, right }, pos);
        }

        left
    }

    fn parse_unary_expression(&mut self) -> NodeId {
        let pos = self.token_pos();
        match self.current_token() {
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                let op = if self.current_token() == SyntaxKind::PlusPlusToken {
                    UpdateOp::Increment
                } else {
                    UpdateOp::Decrement
                };
                self.next_token();
                let operand = self.parse_nested_unary();
                self.finish_node(
                    NodeKind::Update {
                        op,
                        prefix: true,
                        operand,
                    },
                    pos,
                )
            }
            token => match UnaryOp::from_token(token) {
                Some(op) => {
                    self.next_token();
                    let operand = self.parse_nested_unary();
                    self.finish_node(NodeKind::Unary { op, operand }, pos)
                }
                None => self.parse_postfix_expression(),
            },
        }
    }

    fn parse_nested_unary(&mut self) -> NodeId {
        if !self.enter_recursion() {
            return self.missing_node();
        }
        let operand = self.parse_unary_expression();
        self.leave_recursion();
        operand
    }

    fn parse_postfix_expression(&mut self) -> NodeId {
        let expr = self.parse_left_hand_side_expression();
        if self.scanner.has_preceding_line_break() {
            return expr;
        }
        let op = match self.current_token() {
            SyntaxKind::PlusPlusToken => UpdateOp::Increment,
            SyntaxKind::MinusMinusToken => UpdateOp::Decrement,
            _ => return expr,
        };
        let pos = self.node_pos(expr);
        self.next_token();
        self.finish_node(
            NodeKind::Update {
                op,
                prefix: false,
                operand: expr,
            },
            pos,
        )
    }

    fn parse_left_hand_side_expression(&mut self) -> NodeId {
        let expr = if self.current_token() == SyntaxKind::NewKeyword {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        self.parse_member_expression_rest(expr, true)
    }

    /// Parse `.name`, `[index]` and (when `allow_call`) `(args)` suffixes.
    fn parse_member_expression_rest(&mut self, mut expr: NodeId, allow_call: bool) -> NodeId {
        loop {
            let pos = self.node_pos(expr);
            match self.current_token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    let property = if self.current_token().is_identifier_or_keyword() {
                        self.parse_identifier()
                    } else {
                        self.error(&messages::IDENTIFIER_EXPECTED);
                        self.missing_node()
                    };
                    expr = self.finish_node(
                        NodeKind::Member {
                            object: expr,
                            property,
                        },
                        pos,
                    );
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    let index = self.allow_in(|p| p.parse_expression());
                    self.expect_token(SyntaxKind::CloseBracketToken);
                    expr = self.finish_node(NodeKind::Index { object: expr, index }, pos);
                }
                SyntaxKind::OpenParenToken if allow_call => {
                    let args = self.parse_arguments();
                    expr = self.finish_node(NodeKind::Call { callee: expr, args }, pos);
                }
                _ => return expr,
            }
        }
    }

    fn parse_new_expression(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token(); // new
        let callee = if self.current_token() == SyntaxKind::NewKeyword {
            self.parse_nested_new()
        } else {
            self.parse_primary_expression()
        };
        let callee = self.parse_member_expression_rest(callee, false);
        let args = if self.current_token() == SyntaxKind::OpenParenToken {
            self.parse_arguments()
        } else {
            Vec::new()
        };
        self.finish_node(NodeKind::New { callee, args }, pos)
    }

    fn parse_nested_new(&mut self) -> NodeId {
        if !self.enter_recursion() {
            return self.missing_node();
        }
        let callee = self.parse_new_expression();
        self.leave_recursion();
        callee
    }

    fn parse_arguments(&mut self) -> Vec<NodeId> {
        self.next_token(); // (
        let args = self.allow_in(|p| {
            let mut args = Vec::new();
            while p.current_token() != SyntaxKind::CloseParenToken
                && p.current_token() != SyntaxKind::EndOfFileToken
            {
                args.push(p.parse_assignment_expression());
                if !p.optional_token(SyntaxKind::CommaToken) {
                    break;
                }
            }
            args
        });
        self.expect_token(SyntaxKind::CloseParenToken);
        args
    }

    fn parse_primary_expression(&mut self) -> NodeId {
        let pos = self.token_pos();
        match self.current_token() {
            SyntaxKind::Identifier => {
                let name = self.intern_token();
                self.next_token();
                self.finish_node(NodeKind::Var { name }, pos)
            }
            SyntaxKind::ThisKeyword => {
                self.next_token();
                self.finish_node(NodeKind::This, pos)
            }
            SyntaxKind::NumericLiteral => self.parse_literal(LiteralKind::Number),
            SyntaxKind::StringLiteral => self.parse_literal(LiteralKind::String),
            SyntaxKind::TrueKeyword => self.parse_literal(LiteralKind::True),
            SyntaxKind::FalseKeyword => self.parse_literal(LiteralKind::False),
            SyntaxKind::NullKeyword => self.parse_literal(LiteralKind::Null),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                self.scanner.rescan_slash_token();
                self.parse_literal(LiteralKind::RegExp)
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let expr = self.allow_in(|p| p.parse_expression());
                self.expect_token(SyntaxKind::CloseParenToken);
                self.finish_node(NodeKind::Paren { expr }, pos)
            }
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function(FunctionKind::Expression),
            _ => {
                self.error(&messages::EXPRESSION_EXPECTED);
                self.missing_node()
            }
        }
    }

    fn parse_literal(&mut self, kind: LiteralKind) -> NodeId {
        let pos = self.token_pos();
        self.next_token();
        self.finish_node(NodeKind::Literal { kind }, pos)
    }

    fn parse_array_literal(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token(); // [
        let elements = self.allow_in(|p| {
            let mut elements = Vec::new();
            loop {
                match p.current_token() {
                    SyntaxKind::CloseBracketToken | SyntaxKind::EndOfFileToken => break,
                    SyntaxKind::CommaToken => {
                        p.next_token();
                        elements.push(None);
                    }
                    _ => {
                        elements.push(Some(p.parse_assignment_expression()));
                        if p.current_token() != SyntaxKind::CloseBracketToken
                            && !p.expect_token(SyntaxKind::CommaToken)
                        {
                            break;
                        }
                    }
                }
            }
            elements
        });
        self.expect_token(SyntaxKind::CloseBracketToken);
        self.finish_node(NodeKind::Array { elements }, pos)
    }

    fn parse_object_literal(&mut self) -> NodeId {
        let pos = self.token_pos();
        self.next_token(); // {
        let properties = self.allow_in(|p| {
            let mut properties = Vec::new();
            while !matches!(
                p.current_token(),
                SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
            ) {
                match p.parse_property() {
                    Some(property) => properties.push(property),
                    None => break,
                }
                if !p.optional_token(SyntaxKind::CommaToken) {
                    break;
                }
            }
            properties
        });
        self.expect_token(SyntaxKind::CloseBraceToken);
        self.finish_node(NodeKind::Object { properties }, pos)
    }

    /// Parse `key: value` or an ES5 `get`/`set` accessor.
    fn parse_property(&mut self) -> Option<NodeId> {
        let pos = self.token_pos();
        let accessor = match self.token_value() {
            _ if self.current_token() != SyntaxKind::Identifier => None,
            "get" => Some(PropertyKind::Get),
            "set" => Some(PropertyKind::Set),
            _ => None,
        };
        if let Some(kind) = accessor {
            if self.is_accessor_head() {
                self.next_token(); // get / set
                let key = self.parse_property_name()?;
                let value = self.parse_function_rest(pos, FunctionKind::Expression, None);
                return Some(self.finish_node(NodeKind::Property { kind, key, value }, pos));
            }
        }

        let key = self.parse_property_name()?;
        self.expect_token(SyntaxKind::ColonToken);
        let value = self.parse_assignment_expression();
        Some(self.finish_node(
            NodeKind::Property {
                kind: PropertyKind::Init,
                key,
                value,
            },
            pos,
        ))
    }

    /// `get`/`set` start an accessor when a property name follows them.
    fn is_accessor_head(&mut self) -> bool {
        self.scanner.look_ahead(|s| {
            let next = s.scan();
            next.is_identifier_or_keyword()
                || matches!(next, SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral)
        })
    }

    fn parse_property_name(&mut self) -> Option<NodeId> {
        let token = self.current_token();
        if token.is_identifier_or_keyword() {
            Some(self.parse_identifier())
        } else if token == SyntaxKind::StringLiteral {
            Some(self.parse_literal(LiteralKind::String))
        } else if token == SyntaxKind::NumericLiteral {
            Some(self.parse_literal(LiteralKind::Number))
        } else {
            self.error(&messages::IDENTIFIER_EXPECTED);
            None
        }
    }
}
