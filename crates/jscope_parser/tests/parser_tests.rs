//! Parser integration tests.
//!
//! Verifies that the parser builds the expected tree shapes from ES5 source
//! and recovers from malformed input.

use jscope_ast::{Ast, NodeId, NodeKind};
use jscope_ast::node::{
    AssignOp, BinaryOp, DeclarationKeyword, FunctionKind, LiteralKind, PropertyKind, UpdateOp,
};
use jscope_parser::parse;
use pretty_assertions::assert_eq;

/// Helper: the top-level statements of a program.
fn statements(ast: &Ast) -> Vec<NodeId> {
    match ast.kind(ast.root()) {
        NodeKind::Program { body } => body.clone(),
        other => panic!("root is not a program: {:?}", other),
    }
}

/// Helper: parse source text and return the number of top-level statements.
fn statement_count(source: &str) -> usize {
    statements(&parse(source).ast).len()
}

/// Helper: parse `source` that must be free of syntax errors.
fn parse_clean(source: &str) -> Ast {
    let result = parse(source);
    assert!(
        result.markers.is_empty(),
        "unexpected errors in {:?}: {:?}",
        source,
        result.markers
    );
    result.ast
}

/// Helper: the expression of the first (expression) statement.
fn first_expression(ast: &Ast) -> NodeId {
    match ast.kind(statements(ast)[0]) {
        NodeKind::ExprStatement { expr } => *expr,
        other => panic!("not an expression statement: {:?}", other),
    }
}

/// Helper: the messages of all syntax errors in `source`.
fn error_messages(source: &str) -> Vec<String> {
    parse(source)
        .markers
        .into_iter()
        .filter_map(|m| m.message)
        .collect()
}

// ============================================================================
// Variable Declarations
// ============================================================================

#[test]
fn test_parse_var_declaration() {
    let ast = parse_clean("var x = 42;");
    let stmts = statements(&ast);
    assert_eq!(stmts.len(), 1);
    let NodeKind::VarStatement {
        keyword,
        declarations,
    } = ast.kind(stmts[0])
    else {
        panic!("expected a var statement");
    };
    assert_eq!(*keyword, DeclarationKeyword::Var);
    assert_eq!(declarations.len(), 1);
    let NodeKind::VarDecl { name, init } = ast.kind(declarations[0]) else {
        panic!("expected a declarator");
    };
    assert_eq!(ast.name_text(*name), Some("x"));
    assert!(matches!(
        ast.kind(init.unwrap()),
        NodeKind::Literal {
            kind: LiteralKind::Number
        }
    ));
}

#[test]
fn test_parse_let_and_const() {
    let ast = parse_clean("let a = 1; const b = 2;");
    let keywords: Vec<_> = statements(&ast)
        .into_iter()
        .map(|s| match ast.kind(s) {
            NodeKind::VarStatement { keyword, .. } => *keyword,
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(
        keywords,
        vec![DeclarationKeyword::Let, DeclarationKeyword::Const]
    );
}

#[test]
fn test_parse_multiple_declarators() {
    let ast = parse_clean("var a, b = 2, c;");
    let NodeKind::VarStatement { declarations, .. } = ast.kind(statements(&ast)[0]) else {
        panic!("expected a var statement");
    };
    let names: Vec<_> = declarations
        .iter()
        .map(|d| match ast.kind(*d) {
            NodeKind::VarDecl { name, .. } => ast.name_text(*name).unwrap().to_string(),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_missing_declaration_name() {
    let result = parse("var = 1;");
    assert_eq!(result.markers.len(), 1);
    assert_eq!(result.markers[0].message.as_deref(), Some("Identifier expected."));
    let ast = &result.ast;
    let NodeKind::VarStatement { declarations, .. } = ast.kind(statements(ast)[0]) else {
        panic!("expected a var statement");
    };
    let NodeKind::VarDecl { name, init } = ast.kind(declarations[0]) else {
        panic!("expected a declarator");
    };
    assert!(matches!(ast.kind(*name), NodeKind::Missing));
    assert!(init.is_some());
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_parse_function_declaration() {
    let ast = parse_clean("function add(a, b) { return a + b; }");
    let NodeKind::Function {
        kind,
        name,
        params,
        body,
    } = ast.kind(statements(&ast)[0])
    else {
        panic!("expected a function");
    };
    assert_eq!(*kind, FunctionKind::Declaration);
    assert_eq!(ast.name_text(name.unwrap()), Some("add"));
    let param_names: Vec<_> = params.iter().map(|p| ast.name_text(*p).unwrap()).collect();
    assert_eq!(param_names, vec!["a", "b"]);
    assert_eq!(body.len(), 1);
    assert!(matches!(ast.kind(body[0]), NodeKind::Return { argument: Some(_) }));
}

#[test]
fn test_parse_function_expression() {
    let ast = parse_clean("var f = function named() {};\nvar g = function () {};");
    let funcs = jscope_ast::find_all(&ast, ast.root(), |id| ast.kind(id).is_function());
    assert_eq!(funcs.len(), 2);
    for func in &funcs {
        assert!(matches!(
            ast.kind(*func),
            NodeKind::Function {
                kind: FunctionKind::Expression,
                ..
            }
        ));
    }
    assert!(matches!(ast.kind(funcs[1]), NodeKind::Function { name: None, .. }));
}

#[test]
fn test_function_declaration_requires_name() {
    assert_eq!(error_messages("function () {}"), vec!["Identifier expected."]);
}

#[test]
fn test_parse_iife() {
    let ast = parse_clean("(function () { var x = 1; })();");
    assert!(matches!(
        ast.kind(first_expression(&ast)),
        NodeKind::Call { .. }
    ));
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_statement_counts() {
    let cases = [
        ("", 0),
        (";", 1),
        ("if (a) b(); else c();", 1),
        ("while (x) { x--; }", 1),
        ("do { x++; } while (x < 10)", 1),
        ("do x++; while (x < 10) y();", 2),
        ("switch (x) { case 1: a(); break; default: b(); }", 1),
        ("label: for (;;) { break label; }", 1),
        ("with (obj) { a = b; }", 1),
        ("debugger;", 1),
        ("throw new Error('x');", 1),
        ("try { a(); } catch (e) { b(e); } finally { c(); }", 1),
    ];
    for (source, expected) in cases {
        assert_eq!(statement_count(source), expected, "source: {}", source);
        assert!(parse(source).markers.is_empty(), "source: {}", source);
    }
}

#[test]
fn test_automatic_semicolon_insertion() {
    let ast = parse_clean("var a = 1\nvar b = 2\na = b\n");
    assert_eq!(statements(&ast).len(), 3);
}

#[test]
fn test_missing_semicolon_on_same_line() {
    assert_eq!(error_messages("var a = 1 var b = 2"), vec!["';' expected."]);
}

#[test]
fn test_return_without_argument_before_line_break() {
    let ast = parse_clean("function f() {\n  return\n  1;\n}");
    let NodeKind::Function { body, .. } = ast.kind(statements(&ast)[0]) else {
        panic!("expected a function");
    };
    assert_eq!(body.len(), 2);
    assert!(matches!(ast.kind(body[0]), NodeKind::Return { argument: None }));
}

#[test]
fn test_postfix_update_does_not_cross_line_break() {
    let ast = parse_clean("a\n++b");
    let stmts = statements(&ast);
    assert_eq!(stmts.len(), 2);
    let NodeKind::ExprStatement { expr } = ast.kind(stmts[1]) else {
        panic!("expected an expression statement");
    };
    assert!(matches!(
        ast.kind(*expr),
        NodeKind::Update {
            op: UpdateOp::Increment,
            prefix: true,
            ..
        }
    ));
}

#[test]
fn test_break_label_only_on_same_line() {
    let ast = parse_clean("outer: while (a) { break\nouter; }");
    let breaks = jscope_ast::find_all(&ast, ast.root(), |id| {
        matches!(ast.kind(id), NodeKind::Break { .. })
    });
    assert_eq!(breaks.len(), 1);
    assert!(matches!(ast.kind(breaks[0]), NodeKind::Break { label: None }));
}

#[test]
fn test_try_without_catch_or_finally() {
    assert_eq!(error_messages("try { a(); }"), vec!["'catch' expected."]);
}

#[test]
fn test_catch_parameter() {
    let ast = parse_clean("try {} catch (err) {}");
    let NodeKind::Try { handler, .. } = ast.kind(statements(&ast)[0]) else {
        panic!("expected a try statement");
    };
    let NodeKind::Catch { param, .. } = ast.kind(handler.unwrap()) else {
        panic!("expected a catch clause");
    };
    assert_eq!(ast.name_text(*param), Some("err"));
}

// ============================================================================
// For loops
// ============================================================================

#[test]
fn test_parse_for_statement() {
    let ast = parse_clean("for (var i = 0; i < n; i++) {}");
    let NodeKind::For {
        init, test, update, ..
    } = ast.kind(statements(&ast)[0])
    else {
        panic!("expected a for statement");
    };
    assert!(matches!(
        ast.kind(init.unwrap()),
        NodeKind::VarStatement { .. }
    ));
    assert!(test.is_some());
    assert!(update.is_some());
}

#[test]
fn test_parse_empty_for_head() {
    let ast = parse_clean("for (;;) break;");
    assert!(matches!(
        ast.kind(statements(&ast)[0]),
        NodeKind::For {
            init: None,
            test: None,
            update: None,
            ..
        }
    ));
}

#[test]
fn test_parse_for_in_with_var() {
    let ast = parse_clean("for (var key in obj) {}");
    let NodeKind::ForIn { target, object, .. } = ast.kind(statements(&ast)[0]) else {
        panic!("expected a for-in statement");
    };
    assert!(matches!(ast.kind(*target), NodeKind::VarStatement { .. }));
    assert_eq!(ast.name_text(*object), Some("obj"));
}

#[test]
fn test_parse_for_in_with_expression_target() {
    let ast = parse_clean("for (key in obj) {}\nfor (a.b in obj) {}");
    for stmt in statements(&ast) {
        assert!(matches!(ast.kind(stmt), NodeKind::ForIn { .. }));
    }
}

#[test]
fn test_in_operator_inside_for_test() {
    let ast = parse_clean("for (var i = 0; 'x' in o; i++) {}");
    assert!(matches!(ast.kind(statements(&ast)[0]), NodeKind::For { .. }));
}

#[test]
fn test_in_operator_inside_parens_in_for_init() {
    let ast = parse_clean("for (var b = ('x' in o); b;) {}");
    assert!(matches!(ast.kind(statements(&ast)[0]), NodeKind::For { .. }));
}

#[test]
fn test_invalid_for_in_target() {
    assert_eq!(
        error_messages("for (1 in obj) {}"),
        vec!["Invalid left-hand side in 'for...in' statement."]
    );
    assert_eq!(
        error_messages("for (var a, b in obj) {}"),
        vec!["Invalid left-hand side in 'for...in' statement."]
    );
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_binary_precedence() {
    let ast = parse_clean("1 + 2 * 3;");
    let NodeKind::Binary { op, right, .. } = ast.kind(first_expression(&ast)) else {
        panic!("expected a binary expression");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert!(matches!(
        ast.kind(*right),
        NodeKind::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn test_binary_left_associativity() {
    let ast = parse_clean("a - b - c;");
    let NodeKind::Binary { left, right, .. } = ast.kind(first_expression(&ast)) else {
        panic!("expected a binary expression");
    };
    assert!(matches!(ast.kind(*left), NodeKind::Binary { .. }));
    assert_eq!(ast.name_text(*right), Some("c"));
}

#[test]
fn test_assignment_is_right_associative() {
    let ast = parse_clean("a = b += c;");
    let NodeKind::Assign { op, target, value } = ast.kind(first_expression(&ast)) else {
        panic!("expected an assignment");
    };
    assert_eq!(*op, AssignOp::Assign);
    assert_eq!(ast.name_text(*target), Some("a"));
    assert!(matches!(
        ast.kind(*value),
        NodeKind::Assign {
            op: AssignOp::Add,
            ..
        }
    ));
}

#[test]
fn test_conditional_expression() {
    let ast = parse_clean("var x = a ? b : c;");
    assert!(jscope_ast::find_first(&ast, ast.root(), |id| {
        matches!(ast.kind(id), NodeKind::Conditional { .. })
    })
    .is_some());
}

#[test]
fn test_sequence_expression() {
    let ast = parse_clean("a, b, c;");
    let NodeKind::Sequence { exprs } = ast.kind(first_expression(&ast)) else {
        panic!("expected a sequence");
    };
    assert_eq!(exprs.len(), 3);
}

#[test]
fn test_member_call_and_index() {
    let ast = parse_clean("a.b[c](d).length;");
    let NodeKind::Member { object, property } = ast.kind(first_expression(&ast)) else {
        panic!("expected a member expression");
    };
    assert!(matches!(ast.kind(*property), NodeKind::Ident { .. }));
    assert_eq!(ast.name_text(*property), Some("length"));
    let NodeKind::Call { callee, args } = ast.kind(*object) else {
        panic!("expected a call");
    };
    assert_eq!(args.len(), 1);
    assert!(matches!(ast.kind(*callee), NodeKind::Index { .. }));
}

#[test]
fn test_keyword_as_property_name() {
    let ast = parse_clean("a.default = b.new;");
    let idents = jscope_ast::find_all(&ast, ast.root(), |id| {
        matches!(ast.kind(id), NodeKind::Ident { .. })
    });
    assert_eq!(idents.len(), 2);
}

#[test]
fn test_new_expression() {
    let ast = parse_clean("new Foo.Bar(1, 2).baz;\nnew Date;");
    let news = jscope_ast::find_all(&ast, ast.root(), |id| {
        matches!(ast.kind(id), NodeKind::New { .. })
    });
    assert_eq!(news.len(), 2);
    let NodeKind::New { callee, args } = ast.kind(news[0]) else {
        unreachable!()
    };
    assert!(matches!(ast.kind(*callee), NodeKind::Member { .. }));
    assert_eq!(args.len(), 2);
    assert!(matches!(ast.kind(news[1]), NodeKind::New { args, .. } if args.is_empty()));
}

#[test]
fn test_unary_operators() {
    let ast = parse_clean("typeof a; void 0; delete o.p; !x; -y; ~z;");
    let unaries = jscope_ast::find_all(&ast, ast.root(), |id| {
        matches!(ast.kind(id), NodeKind::Unary { .. })
    });
    assert_eq!(unaries.len(), 6);
}

#[test]
fn test_regex_literal() {
    let ast = parse_clean("var r = /ab+c/gi; var q = a / b / c;");
    let regexes = jscope_ast::find_all(&ast, ast.root(), |id| {
        matches!(
            ast.kind(id),
            NodeKind::Literal {
                kind: LiteralKind::RegExp
            }
        )
    });
    assert_eq!(regexes.len(), 1);
}

#[test]
fn test_array_literal_with_holes() {
    let ast = parse_clean("[1, , 3,];");
    let NodeKind::Array { elements } = ast.kind(first_expression(&ast)) else {
        panic!("expected an array");
    };
    assert_eq!(elements.len(), 3);
    assert!(elements[1].is_none());
}

#[test]
fn test_object_literal() {
    let ast = parse_clean(
        "var o = { a: 1, 'b': 2, 3: c, get x() { return 1; }, set x(v) {}, get: 4, };",
    );
    let NodeKind::Object { properties } = jscope_ast::find_first(&ast, ast.root(), |id| {
        matches!(ast.kind(id), NodeKind::Object { .. })
    })
    .map(|id| ast.kind(id))
    .unwrap() else {
        unreachable!()
    };
    let kinds: Vec<_> = properties
        .iter()
        .map(|p| match ast.kind(*p) {
            NodeKind::Property { kind, .. } => *kind,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            PropertyKind::Init,
            PropertyKind::Init,
            PropertyKind::Init,
            PropertyKind::Get,
            PropertyKind::Set,
            PropertyKind::Init,
        ]
    );
}

#[test]
fn test_object_literal_statement_is_a_block() {
    // At statement level `{` opens a block, so `a: 1` is a labeled statement.
    let ast = parse_clean("{ a: 1 }");
    assert!(matches!(ast.kind(statements(&ast)[0]), NodeKind::Block { .. }));
}

#[test]
fn test_parenthesized_expression() {
    let ast = parse_clean("(a);");
    let expr = first_expression(&ast);
    assert!(matches!(ast.kind(expr), NodeKind::Paren { .. }));
    assert_eq!(ast.name_text(ast.skip_parens(expr)), Some("a"));
}

// ============================================================================
// Ranges and parents
// ============================================================================

#[test]
fn test_node_ranges() {
    let source = "var answer = 40 + 2;";
    let ast = parse_clean(source);
    let stmt = statements(&ast)[0];
    assert_eq!(&source[ast.range(stmt).to_range()], source);
    let binary = jscope_ast::find_first(&ast, ast.root(), |id| {
        matches!(ast.kind(id), NodeKind::Binary { .. })
    })
    .unwrap();
    assert_eq!(&source[ast.range(binary).to_range()], "40 + 2");
}

#[test]
fn test_parent_links() {
    let ast = parse_clean("function f(a) { return a; }");
    let var = jscope_ast::find_first(&ast, ast.root(), |id| {
        matches!(ast.kind(id), NodeKind::Var { .. })
    })
    .unwrap();
    let ret = ast.parent(var).unwrap();
    assert!(matches!(ast.kind(ret), NodeKind::Return { .. }));
    let func = ast.enclosing_function(var).unwrap();
    assert_eq!(ast.parent(func), Some(ast.root()));
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn test_stray_close_brace() {
    let result = parse("a();\n}\nb();");
    assert_eq!(
        result
            .markers
            .iter()
            .map(|m| m.message.as_deref().unwrap())
            .collect::<Vec<_>>(),
        vec!["Declaration or statement expected."]
    );
    assert_eq!(result.markers[0].pos.start_line, 1);
    assert_eq!(statements(&result.ast).len(), 3);
}

#[test]
fn test_misplaced_keyword() {
    assert_eq!(
        error_messages("else { a(); }"),
        vec!["Declaration or statement expected."]
    );
}

#[test]
fn test_missing_expression() {
    let result = parse("var x = ;");
    assert_eq!(result.markers.len(), 1);
    assert_eq!(result.markers[0].message.as_deref(), Some("Expression expected."));
    assert_eq!(result.markers[0].pos.start_column, 8);
}

#[test]
fn test_missing_close_paren() {
    let messages = error_messages("if (a { b(); }");
    assert_eq!(messages[0], "')' expected.");
}

#[test]
fn test_missing_property_name_after_dot() {
    assert_eq!(error_messages("a.;"), vec!["Identifier expected."]);
}

#[test]
fn test_unclosed_function_body() {
    let result = parse("function f() {\n  var a = 1;\n");
    assert_eq!(
        result.markers.last().and_then(|m| m.message.as_deref()),
        Some("'}' expected.")
    );
    assert_eq!(statements(&result.ast).len(), 1);
}

#[test]
fn test_recovery_continues_after_garbage() {
    let result = parse("var a = 1;\n) ) )\nvar b = 2;");
    assert!(!result.markers.is_empty());
    let ast = &result.ast;
    let var_statements = statements(ast)
        .into_iter()
        .filter(|s| matches!(ast.kind(*s), NodeKind::VarStatement { .. }))
        .count();
    assert_eq!(var_statements, 2);
}

#[test]
fn test_scanner_errors_become_markers() {
    let result = parse("var s = 'open\nvar t = 1;");
    assert_eq!(
        result.markers[0].message.as_deref(),
        Some("Unterminated string literal.")
    );
    assert_eq!(result.markers[0].code, Some(1002));
}

#[test]
fn test_invalid_character_is_skipped() {
    let result = parse("var a = 1; @ var b = 2;");
    assert_eq!(
        result
            .markers
            .iter()
            .map(|m| m.message.as_deref().unwrap())
            .collect::<Vec<_>>(),
        vec!["Invalid character."]
    );
    assert_eq!(statements(&result.ast).len(), 2);
}

#[test]
fn test_markers_sorted_by_position() {
    let result = parse("var = 1;\nvar s = 'x\nfoo(;");
    let positions: Vec<_> = result
        .markers
        .iter()
        .map(|m| (m.pos.start_line, m.pos.start_column))
        .collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
    assert!(positions.len() >= 3);
}

#[test]
fn test_nesting_too_deep() {
    // Parse on a thread with a generous stack so the depth guard, not the
    // host stack, is what stops the recursion.
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let source = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
            error_messages(&source)
        })
        .unwrap();
    let messages = handle.join().unwrap();
    assert!(messages.iter().any(|m| m == "Expression nesting is too deep."));
}

#[test]
fn test_nested_new_is_depth_limited() {
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let source = format!("{}Foo;", "new ".repeat(5000));
            error_messages(&source)
        })
        .unwrap();
    let messages = handle.join().unwrap();
    assert!(messages.iter().any(|m| m == "Expression nesting is too deep."));
}

#[test]
fn test_shebang_is_ignored() {
    let ast = parse_clean("#!/usr/bin/env node\nvar a = 1;");
    assert_eq!(statements(&ast).len(), 1);
}
