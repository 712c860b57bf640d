//! Parser tests: operator precedence, assignments and updates, arrow
//! functions, declarations, classes, type annotations, modules, loops,
//! error recovery, the syntax view, and determinism.

use std::sync::Arc;

use safescript_parser::{parse_source, ParseResult};
use safescript_types::ast::*;
use safescript_types::syntax::SyntaxKind;
use safescript_types::{ErrorCode, SourceFile};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn parse(source: &str) -> ParseResult {
    let sf = SourceFile::new("test.ts", source);
    parse_source(&sf)
}

/// Parse source and return the program, panicking if there are errors.
fn parse_ok(source: &str) -> Program {
    let result = parse(source);
    if result.errors.has_errors() {
        for e in &result.errors.errors {
            eprintln!("  ERROR: {} ({})", e.message, e.code);
        }
        panic!("unexpected parse errors (see above)");
    }
    result.program.expect("no program returned")
}

fn error_codes(source: &str) -> Vec<ErrorCode> {
    parse(source).errors.errors.iter().map(|e| e.code).collect()
}

/// The expression of the only statement, which must be an expression statement.
fn single_expr(source: &str) -> Expr {
    let prog = parse_ok(source);
    assert_eq!(prog.body.len(), 1, "expected one statement");
    match prog.body.into_iter().next().map(|s| s.kind) {
        Some(StmtKind::Expr(expr)) => expr,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

/// Initializer of the first declarator of the first statement.
fn first_init(source: &str) -> Expr {
    let prog = parse_ok(source);
    match prog.body.into_iter().next().map(|s| s.kind) {
        Some(StmtKind::Var(decl)) => decl
            .declarators
            .into_iter()
            .next()
            .and_then(|d| d.init)
            .expect("declarator has no initializer"),
        other => panic!("expected variable statement, got {other:?}"),
    }
}

fn declared_type(stmt: &Stmt) -> String {
    match &stmt.kind {
        StmtKind::Var(decl) => decl.declarators[0]
            .type_ann
            .as_ref()
            .map(|t| t.to_string())
            .unwrap_or_default(),
        other => panic!("expected variable statement, got {other:?}"),
    }
}

fn ident_name(expr: &Expr) -> &str {
    match &expr.kind {
        ExprKind::Identifier(name) => name,
        other => panic!("expected identifier, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Precedence & associativity
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_multiplication_binds_tighter() {
    let expr = single_expr("a + b * c;");
    let ExprKind::Binary { op, left, right } = expr.kind else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(ident_name(&left), "a");
    assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
}

#[test]
fn test_subtraction_is_left_associative() {
    let expr = single_expr("a - b - c;");
    let ExprKind::Binary { left, right, .. } = expr.kind else {
        panic!("expected binary");
    };
    assert!(matches!(left.kind, ExprKind::Binary { op: BinaryOp::Sub, .. }));
    assert_eq!(ident_name(&right), "c");
}

#[test]
fn test_exponent_is_right_associative() {
    let expr = single_expr("a ** b ** c;");
    let ExprKind::Binary { op, left, right } = expr.kind else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Exp);
    assert_eq!(ident_name(&left), "a");
    assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Exp, .. }));
}

#[test]
fn test_logical_below_comparison() {
    let expr = single_expr("a < b && c >= d;");
    let ExprKind::Binary { op, left, right } = expr.kind else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::LogicalAnd);
    assert!(matches!(left.kind, ExprKind::Binary { op: BinaryOp::Lt, .. }));
    assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::GtEq, .. }));
}

#[test]
fn test_unary_binds_tighter_than_binary() {
    let expr = single_expr("-a * typeof b;");
    let ExprKind::Binary { left, right, .. } = expr.kind else {
        panic!("expected binary");
    };
    assert!(matches!(left.kind, ExprKind::Unary { op: UnaryOp::Minus, .. }));
    assert!(matches!(right.kind, ExprKind::Unary { op: UnaryOp::Typeof, .. }));
}

#[test]
fn test_parenthesized_expression_kept() {
    let expr = single_expr("(a + b) * c;");
    let ExprKind::Binary { left, .. } = expr.kind else {
        panic!("expected binary");
    };
    assert!(matches!(left.kind, ExprKind::Paren(_)));
    assert!(matches!(
        left.unparenthesized().kind,
        ExprKind::Binary { op: BinaryOp::Add, .. }
    ));
}

#[test]
fn test_number_raw_text_preserved() {
    let expr = single_expr("0x1F + 1e3;");
    let ExprKind::Binary { left, right, .. } = expr.kind else {
        panic!("expected binary");
    };
    assert!(matches!(&left.kind, ExprKind::Number { value, raw } if *value == 31.0 && raw == "0x1F"));
    assert!(matches!(&right.kind, ExprKind::Number { raw, .. } if raw == "1e3"));
}

// ─────────────────────────────────────────────────────────────────────
// Assignment & update
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_compound_assignment() {
    let expr = single_expr("x += 1;");
    let ExprKind::Assign { op, target, .. } = expr.kind else {
        panic!("expected assignment");
    };
    assert_eq!(op, AssignOp::AddAssign);
    assert!(op.is_compound());
    assert_eq!(ident_name(&target), "x");
}

#[test]
fn test_assignment_is_right_associative() {
    let expr = single_expr("a = b = 1;");
    let ExprKind::Assign { value, .. } = expr.kind else {
        panic!("expected assignment");
    };
    assert!(matches!(value.kind, ExprKind::Assign { op: AssignOp::Assign, .. }));
}

#[test]
fn test_member_assignment_target() {
    let expr = single_expr("this.x *= 2;");
    let ExprKind::Assign { target, .. } = expr.kind else {
        panic!("expected assignment");
    };
    assert!(matches!(&target.kind, ExprKind::Member { property, .. } if property.name == "x"));
}

#[test]
fn test_prefix_and_postfix_updates() {
    let prog = parse_ok("++x;\ny--;");
    let kinds: Vec<(UpdateOp, bool)> = prog
        .body
        .iter()
        .map(|s| match &s.kind {
            StmtKind::Expr(Expr {
                kind: ExprKind::Update { op, prefix, .. },
                ..
            }) => (*op, *prefix),
            other => panic!("expected update, got {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![(UpdateOp::Increment, true), (UpdateOp::Decrement, false)]
    );
}

#[test]
fn test_newline_before_increment_starts_new_statement() {
    let prog = parse_ok("a\n++b");
    assert_eq!(prog.body.len(), 2);
    assert!(matches!(
        &prog.body[1].kind,
        StmtKind::Expr(Expr {
            kind: ExprKind::Update { prefix: true, .. },
            ..
        })
    ));
}

#[test]
fn test_invalid_assignment_target() {
    assert_eq!(error_codes("1 = 2;"), vec![ErrorCode::INVALID_ASSIGNMENT_TARGET]);
    assert_eq!(error_codes("(a + b)++;"), vec![ErrorCode::INVALID_ASSIGNMENT_TARGET]);
}

// ─────────────────────────────────────────────────────────────────────
// Arrow functions & conditionals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_single_parameter_arrow() {
    let init = first_init("const f = x => x + 1;");
    let ExprKind::Arrow(function) = init.kind else {
        panic!("expected arrow");
    };
    assert_eq!(function.kind, FunctionKind::Arrow);
    assert_eq!(function.params.len(), 1);
    assert_eq!(function.params[0].name.name, "x");
    assert!(matches!(function.body, FunctionBody::Expr(_)));
}

#[test]
fn test_typed_arrow_with_block_body() {
    let init = first_init("const g = (a: number, b: number): number => { return a * b; };");
    let ExprKind::Arrow(function) = init.kind else {
        panic!("expected arrow");
    };
    assert_eq!(function.params.len(), 2);
    assert_eq!(
        function.params[1].type_ann.as_ref().map(|t| t.to_string()),
        Some("number".to_string())
    );
    assert_eq!(
        function.return_type.as_ref().map(|t| t.to_string()),
        Some("number".to_string())
    );
    assert_eq!(function.body.statements().len(), 1);
}

#[test]
fn test_parenthesized_consequent_is_not_an_arrow() {
    let expr = single_expr("c ? (a) : b;");
    let ExprKind::Conditional { consequent, alternate, .. } = expr.kind else {
        panic!("expected conditional");
    };
    assert!(matches!(consequent.kind, ExprKind::Paren(_)));
    assert_eq!(ident_name(&alternate), "b");
}

#[test]
fn test_empty_parameter_arrow() {
    let init = first_init("let h = () => 42;");
    assert!(matches!(&init.kind, ExprKind::Arrow(f) if f.params.is_empty()));
}

// ─────────────────────────────────────────────────────────────────────
// Functions & classes
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_function_declaration_with_types() {
    let prog = parse_ok("function add(a: number, b: string): boolean { return true; }");
    let StmtKind::Function(function) = &prog.body[0].kind else {
        panic!("expected function");
    };
    assert_eq!(function.kind, FunctionKind::Declaration);
    assert_eq!(function.name.as_ref().map(|n| n.name.as_str()), Some("add"));
    let types: Vec<String> = function
        .params
        .iter()
        .filter_map(|p| p.type_ann.as_ref().map(|t| t.to_string()))
        .collect();
    assert_eq!(types, vec!["number", "string"]);
    assert_eq!(
        function.return_type.as_ref().map(|t| t.to_string()),
        Some("boolean".to_string())
    );
}

#[test]
fn test_function_expression_is_unguarded_kind() {
    let init = first_init("var f = function (x) { return x; };");
    let ExprKind::Function(function) = init.kind else {
        panic!("expected function expression");
    };
    assert_eq!(function.kind, FunctionKind::Expression);
    assert!(!function.kind.is_guarded());
}

#[test]
fn test_class_members() {
    let prog = parse_ok(
        r#"class Point extends Base {
  private x: number = 0;
  static origin = 1;
  constructor(x: number) {
    super();
    this.x = x;
  }
  move(dx: number) {
    this.x += dx;
  }
}"#,
    );
    let StmtKind::Class(class) = &prog.body[0].kind else {
        panic!("expected class");
    };
    assert_eq!(class.name.name, "Point");
    assert!(class.extends.is_some());
    assert_eq!(class.members.len(), 4);
    assert!(matches!(&class.members[0], ClassMember::Property(p) if p.name.name == "x" && !p.is_static));
    assert!(matches!(&class.members[1], ClassMember::Property(p) if p.is_static));
    assert!(matches!(
        &class.members[2],
        ClassMember::Method(f) if f.kind == FunctionKind::Constructor && f.name.is_none()
    ));
    assert!(matches!(
        &class.members[3],
        ClassMember::Method(f) if f.kind == FunctionKind::Method && f.params.len() == 1
    ));
}

#[test]
fn test_object_literal_properties() {
    let init = first_init(r#"const o = { a: 1, b, m(x) { return x; }, "k": 2 };"#);
    let ExprKind::Object(props) = init.kind else {
        panic!("expected object literal");
    };
    assert_eq!(props.len(), 4);
    assert!(props[1].shorthand);
    assert!(props[2].method);
    assert!(matches!(
        &props[2].value.kind,
        ExprKind::Function(f) if f.kind == FunctionKind::Method
    ));
    assert!(matches!(&props[3].key, PropertyKey::String(s) if s.value == "k"));
}

#[test]
fn test_new_and_calls() {
    let expr = single_expr("new Foo(1).bar(2)[0];");
    let ExprKind::Index { object, .. } = expr.kind else {
        panic!("expected index access");
    };
    let ExprKind::Call { callee, args } = object.kind else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 1);
    let ExprKind::Member { object, .. } = callee.kind else {
        panic!("expected member access");
    };
    assert!(matches!(&object.kind, ExprKind::New { args, .. } if args.len() == 1));
}

// ─────────────────────────────────────────────────────────────────────
// Type annotations
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_type_annotations() {
    let prog = parse_ok(
        "let a: number[] = [];\nlet b: (string | number)[];\nlet c: Map<string, Array<number>>;\nlet d: \"on\" | 1 | null;",
    );
    let types: Vec<String> = prog.body.iter().map(declared_type).collect();
    assert_eq!(
        types,
        vec![
            "number[]",
            "(string | number)[]",
            "Map<string, Array<number>>",
            "\"on\" | 1 | null"
        ]
    );
}

#[test]
fn test_nested_generic_close_does_not_break_shift() {
    let prog = parse_ok("let m: Array<Array<number>> = x >> 1;");
    assert_eq!(declared_type(&prog.body[0]), "Array<Array<number>>");
    let StmtKind::Var(decl) = &prog.body[0].kind else {
        panic!("expected variable statement");
    };
    assert!(matches!(
        decl.declarators[0].init.as_ref().map(|e| &e.kind),
        Some(ExprKind::Binary { op: BinaryOp::Shr, .. })
    ));
}

// ─────────────────────────────────────────────────────────────────────
// Statements & modules
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_loops() {
    let prog = parse_ok(
        "for (let i = 0; i < n; i++) {}\nfor (const k in obj) {}\nfor (x of xs) {}\nwhile (a) b--;\ndo { a++; } while (a < 3);",
    );
    assert!(matches!(&prog.body[0].kind, StmtKind::For(f) if f.init.is_some() && f.update.is_some()));
    assert!(matches!(&prog.body[1].kind, StmtKind::ForEach(f) if !f.is_of));
    assert!(matches!(&prog.body[2].kind, StmtKind::ForEach(f) if f.is_of));
    assert!(matches!(&prog.body[3].kind, StmtKind::While(_)));
    assert!(matches!(&prog.body[4].kind, StmtKind::DoWhile(_)));
}

#[test]
fn test_switch_and_try() {
    let prog = parse_ok(
        "switch (x) { case 1: y(); break; default: z(); }\ntry { f(); } catch (e) { g(e); } finally { h(); }",
    );
    assert!(matches!(&prog.body[0].kind, StmtKind::Switch(s) if s.cases.len() == 2 && s.cases[1].test.is_none()));
    assert!(matches!(
        &prog.body[1].kind,
        StmtKind::Try(t) if t.param.is_some() && t.handler.is_some() && t.finalizer.is_some()
    ));
}

#[test]
fn test_if_else_chain() {
    let prog = parse_ok("if (a) { b(); } else if (c) d(); else e();");
    assert!(prog.body[0].is_if());
    let StmtKind::If(stmt) = &prog.body[0].kind else {
        panic!("expected if");
    };
    assert!(matches!(stmt.else_branch.as_deref(), Some(s) if s.is_if()));
}

#[test]
fn test_imports() {
    let prog = parse_ok("import { a as b, c } from \"mod\";\nimport * as ns from 'x';\nimport \"side\";");
    let imports: Vec<&ImportDecl> = prog
        .body
        .iter()
        .filter_map(|s| match &s.kind {
            StmtKind::Import(decl) => Some(decl),
            _ => None,
        })
        .collect();
    assert_eq!(imports.len(), 3);
    assert_eq!(imports[0].named.len(), 2);
    assert_eq!(
        imports[0].named[0].local.as_ref().map(|l| l.name.as_str()),
        Some("b")
    );
    assert_eq!(imports[1].namespace.as_ref().map(|n| n.name.as_str()), Some("ns"));
    assert_eq!(imports[1].source.raw, "'x'");
    assert!(imports[2].is_side_effect());
}

#[test]
fn test_exports() {
    let prog = parse_ok("export function f() {}\nexport default 1;");
    assert!(matches!(&prog.body[0].kind, StmtKind::Export { is_default: false, .. }));
    assert!(matches!(&prog.body[1].kind, StmtKind::Export { is_default: true, .. }));
}

// ─────────────────────────────────────────────────────────────────────
// Errors & recovery
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unsupported_syntax() {
    assert_eq!(error_codes("let { a } = o;"), vec![ErrorCode::UNSUPPORTED_SYNTAX]);
    assert_eq!(error_codes("interface A {}"), vec![ErrorCode::UNSUPPORTED_SYNTAX]);
    assert_eq!(error_codes("f(...xs);"), vec![ErrorCode::UNSUPPORTED_SYNTAX]);
}

#[test]
fn test_unclosed_block() {
    assert!(error_codes("function f() {\n  return 1;\n").contains(&ErrorCode::UNCLOSED_BRACE));
}

#[test]
fn test_recovery_continues_after_error() {
    let result = parse("let = ;\nlet ok = 1;");
    assert_eq!(result.errors.total_errors, 1);
    let prog = result.program.expect("program");
    assert_eq!(prog.body.len(), 1);
    assert!(matches!(
        &prog.body[0].kind,
        StmtKind::Var(d) if d.declarators[0].name.name == "ok"
    ));
}

#[test]
fn test_lexer_errors_come_first() {
    let codes = error_codes("let s = 'open\n1 = 2;");
    assert_eq!(codes.first(), Some(&ErrorCode::UNTERMINATED_STRING));
}

// ─────────────────────────────────────────────────────────────────────
// Syntax view
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_syntax_tree_from_parse() {
    let sf = Arc::new(SourceFile::new("test.js", "total = x + 1;"));
    let result = parse_source(&sf);
    let tree = result.syntax_tree(sf.clone()).expect("syntax tree");
    assert_eq!(tree.root.kind, SyntaxKind::Program);
    let binary = tree
        .root
        .descendants()
        .find(|n| n.kind == SyntaxKind::BinaryExpression)
        .expect("binary node");
    assert_eq!(tree.text(binary), "x + 1");
    assert!(tree
        .root
        .descendants()
        .any(|n| n.kind == SyntaxKind::NumericLiteral));
}

#[test]
fn test_syntax_tree_function_label() {
    let sf = Arc::new(SourceFile::new("test.ts", "function add(a: number,   b) { return a; }"));
    let result = parse_source(&sf);
    let tree = result.syntax_tree(sf.clone()).expect("syntax tree");
    let function = tree
        .root
        .descendants()
        .find(|n| n.kind == SyntaxKind::FunctionDeclaration)
        .expect("function node");
    assert_eq!(tree.text(function), "add(a,b)");
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_determinism_100_iterations() {
    let source = r#"class A {
  m(x: number, y) {
    const f = (z: string): string => z + x;
    return f(y) ** 2;
  }
}
"#;
    let first = parse_ok(source);
    for _ in 0..100 {
        assert_eq!(parse_ok(source), first);
    }
}
