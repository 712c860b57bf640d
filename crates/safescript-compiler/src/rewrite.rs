//! Rewrite engine: one bottom-up pass over a program that replaces unsafe
//! operator sites with runtime calls and prepends parameter guards.
//!
//! The pass never mutates its input. Children are rewritten first; the
//! classifier then looks at the *original* node so that operand types come
//! from the checker's view of the source, not from the rewritten children.
//!
//! Output shapes:
//!
//! ```text
//! a + b      →  SafeScript.add(a, b)
//! a += b     →  a = SafeScript.add(a, b)
//! ++x        →  (x = SafeScript.inc(x))
//! x++        →  (x = SafeScript.inc(x), SafeScript.suffix())
//! ```

use safescript_types::ast::*;
use safescript_types::{RuntimeOp, Span, RUNTIME_NAMESPACE};

use crate::classifier::{classify, Decision, OperatorSite};
use crate::guards::missing_guards;
use crate::ty::TypeTable;

/// Result of one rewrite pass.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    pub program: Program,
    /// `true` if any operator site or guard was rewritten.
    pub changed: bool,
    /// Operator sites replaced by runtime calls.
    pub sites: usize,
    /// Guard statements inserted.
    pub guards: usize,
}

/// Rewrite `program` once, using `types` for every classification.
pub fn rewrite(program: &Program, types: &TypeTable) -> RewriteOutcome {
    let mut rewriter = Rewriter::new(types);
    let program = rewriter.program(program);
    RewriteOutcome {
        program,
        changed: rewriter.sites > 0 || rewriter.guards > 0,
        sites: rewriter.sites,
        guards: rewriter.guards,
    }
}

/// `SafeScript.<op>(args...)` carrying `span`.
pub fn runtime_call(op: RuntimeOp, args: Vec<Expr>, span: Span) -> Expr {
    let namespace = Expr::synthetic(ExprKind::Identifier(RUNTIME_NAMESPACE.to_string()));
    let callee = Expr::synthetic(ExprKind::Member {
        object: Box::new(namespace),
        property: Ident::synthetic(op.name()),
    });
    Expr::new(
        NodeId::SYNTHETIC,
        ExprKind::Call {
            callee: Box::new(callee),
            args,
        },
        span,
    )
}

// ══════════════════════════════════════════════════════════════════════════════
// Rewriter
// ══════════════════════════════════════════════════════════════════════════════

struct Rewriter<'t> {
    types: &'t TypeTable,
    sites: usize,
    guards: usize,
}

impl<'t> Rewriter<'t> {
    fn new(types: &'t TypeTable) -> Self {
        Self {
            types,
            sites: 0,
            guards: 0,
        }
    }

    fn program(&mut self, program: &Program) -> Program {
        Program {
            body: self.stmts(&program.body),
            span: program.span,
        }
    }

    // ── Statements ────────────────────────────────────────────────────────────

    fn stmts(&mut self, stmts: &[Stmt]) -> Vec<Stmt> {
        stmts.iter().map(|s| self.stmt(s)).collect()
    }

    fn boxed_stmt(&mut self, stmt: &Stmt) -> Box<Stmt> {
        Box::new(self.stmt(stmt))
    }

    fn block(&mut self, block: &Block) -> Block {
        Block {
            stmts: self.stmts(&block.stmts),
            span: block.span,
        }
    }

    fn stmt(&mut self, stmt: &Stmt) -> Stmt {
        let kind = match &stmt.kind {
            StmtKind::Var(decl) => StmtKind::Var(self.var_decl(decl)),
            StmtKind::Function(function) => StmtKind::Function(self.function(function)),
            StmtKind::Class(class) => StmtKind::Class(self.class(class)),
            StmtKind::If(if_stmt) => StmtKind::If(IfStmt {
                condition: self.expr(&if_stmt.condition),
                then_branch: self.boxed_stmt(&if_stmt.then_branch),
                else_branch: if_stmt.else_branch.as_ref().map(|s| self.boxed_stmt(s)),
            }),
            StmtKind::While(w) => StmtKind::While(self.while_stmt(w)),
            StmtKind::DoWhile(w) => StmtKind::DoWhile(self.while_stmt(w)),
            StmtKind::For(for_stmt) => StmtKind::For(ForStmt {
                init: for_stmt.init.as_ref().map(|init| self.for_init(init)),
                test: for_stmt.test.as_ref().map(|e| self.expr(e)),
                update: for_stmt.update.as_ref().map(|e| self.expr(e)),
                body: self.boxed_stmt(&for_stmt.body),
            }),
            StmtKind::ForEach(each) => StmtKind::ForEach(ForEachStmt {
                left: self.for_init(&each.left),
                is_of: each.is_of,
                iterable: self.expr(&each.iterable),
                body: self.boxed_stmt(&each.body),
            }),
            StmtKind::Switch(switch) => StmtKind::Switch(SwitchStmt {
                discriminant: self.expr(&switch.discriminant),
                cases: switch
                    .cases
                    .iter()
                    .map(|case| SwitchCase {
                        test: case.test.as_ref().map(|e| self.expr(e)),
                        body: self.stmts(&case.body),
                        span: case.span,
                    })
                    .collect(),
            }),
            StmtKind::Try(try_stmt) => StmtKind::Try(TryStmt {
                block: self.block(&try_stmt.block),
                param: try_stmt.param.clone(),
                handler: try_stmt.handler.as_ref().map(|b| self.block(b)),
                finalizer: try_stmt.finalizer.as_ref().map(|b| self.block(b)),
            }),
            StmtKind::Return(value) => StmtKind::Return(value.as_ref().map(|e| self.expr(e))),
            StmtKind::Throw(value) => StmtKind::Throw(self.expr(value)),
            StmtKind::Block(block) => StmtKind::Block(self.block(block)),
            StmtKind::Export { is_default, stmt } => StmtKind::Export {
                is_default: *is_default,
                stmt: self.boxed_stmt(stmt),
            },
            StmtKind::Expr(e) => StmtKind::Expr(self.expr(e)),
            StmtKind::Break
            | StmtKind::Continue
            | StmtKind::Import(_)
            | StmtKind::Empty => stmt.kind.clone(),
        };
        Stmt::new(kind, stmt.span)
    }

    fn while_stmt(&mut self, w: &WhileStmt) -> WhileStmt {
        WhileStmt {
            condition: self.expr(&w.condition),
            body: self.boxed_stmt(&w.body),
        }
    }

    fn for_init(&mut self, init: &ForInit) -> ForInit {
        match init {
            ForInit::Var(decl) => ForInit::Var(self.var_decl(decl)),
            ForInit::Expr(e) => ForInit::Expr(self.expr(e)),
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) -> VarDecl {
        VarDecl {
            kind: decl.kind,
            declarators: decl
                .declarators
                .iter()
                .map(|d| VarDeclarator {
                    init: d.init.as_ref().map(|e| self.expr(e)),
                    ..d.clone()
                })
                .collect(),
            span: decl.span,
        }
    }

    fn class(&mut self, class: &ClassDecl) -> ClassDecl {
        ClassDecl {
            name: class.name.clone(),
            extends: class.extends.as_ref().map(|e| self.expr(e)),
            members: class
                .members
                .iter()
                .map(|member| match member {
                    ClassMember::Method(f) => ClassMember::Method(self.function(f)),
                    ClassMember::Property(p) => ClassMember::Property(PropertyDecl {
                        value: p.value.as_ref().map(|e| self.expr(e)),
                        ..p.clone()
                    }),
                })
                .collect(),
            span: class.span,
        }
    }

    // ── Functions ─────────────────────────────────────────────────────────────

    /// Rewrite a function body and prepend whatever guards it is missing.
    fn function(&mut self, function: &Function) -> Function {
        let params = function
            .params
            .iter()
            .map(|p| Param {
                default: p.default.as_ref().map(|e| self.expr(e)),
                ..p.clone()
            })
            .collect();

        let guards: Vec<Stmt> = missing_guards(function, self.types)
            .iter()
            .map(|guard| guard.to_stmt())
            .collect();
        self.guards += guards.len();

        let body = match &function.body {
            FunctionBody::Block(block) => {
                let mut stmts = guards;
                stmts.extend(self.stmts(&block.stmts));
                FunctionBody::Block(Block {
                    stmts,
                    span: block.span,
                })
            }
            FunctionBody::Expr(e) if guards.is_empty() => FunctionBody::Expr(Box::new(self.expr(e))),
            FunctionBody::Expr(e) => {
                let value = self.expr(e);
                let mut stmts = guards;
                stmts.push(Stmt::new(StmtKind::Return(Some(value)), e.span));
                FunctionBody::Block(Block {
                    stmts,
                    span: e.span,
                })
            }
        };

        tracing::trace!(
            function = function.name.as_ref().map_or("<anonymous>", |n| n.name.as_str()),
            "rewrote function body"
        );

        Function {
            id: function.id,
            kind: function.kind,
            name: function.name.clone(),
            is_static: function.is_static,
            params,
            return_type: function.return_type.clone(),
            body,
            span: function.span,
        }
    }

    // ── Expressions ───────────────────────────────────────────────────────────

    fn boxed(&mut self, expr: &Expr) -> Box<Expr> {
        Box::new(self.expr(expr))
    }

    fn exprs(&mut self, exprs: &[Expr]) -> Vec<Expr> {
        exprs.iter().map(|e| self.expr(e)).collect()
    }

    fn expr(&mut self, expr: &Expr) -> Expr {
        let kind = match &expr.kind {
            ExprKind::Binary { op, left, right } => {
                let (left, right) = (self.expr(left), self.expr(right));
                if let Some(rop) = self.decide(expr) {
                    return runtime_call(rop, vec![left, right], expr.span);
                }
                ExprKind::Binary {
                    op: *op,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
            ExprKind::Assign { op, target, value } => {
                let (target, value) = (self.expr(target), self.expr(value));
                if let Some(rop) = self.decide(expr) {
                    let call = runtime_call(rop, vec![target.clone(), value], expr.span);
                    return assign(target, call, expr.span);
                }
                ExprKind::Assign {
                    op: *op,
                    target: Box::new(target),
                    value: Box::new(value),
                }
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.expr(operand);
                if let Some(rop) = self.decide(expr) {
                    return runtime_call(rop, vec![operand], expr.span);
                }
                ExprKind::Unary {
                    op: *op,
                    operand: Box::new(operand),
                }
            }
            ExprKind::Update {
                op,
                prefix,
                operand,
            } => {
                let operand = self.expr(operand);
                if let Some(rop) = self.decide(expr) {
                    let call = runtime_call(rop, vec![operand.clone()], expr.span);
                    let update = assign(operand, call, expr.span);
                    let inner = if *prefix {
                        update
                    } else {
                        let suffix = runtime_call(RuntimeOp::Suffix, Vec::new(), expr.span);
                        Expr::new(
                            NodeId::SYNTHETIC,
                            ExprKind::Sequence(vec![update, suffix]),
                            expr.span,
                        )
                    };
                    return Expr::new(
                        NodeId::SYNTHETIC,
                        ExprKind::Paren(Box::new(inner)),
                        expr.span,
                    );
                }
                ExprKind::Update {
                    op: *op,
                    prefix: *prefix,
                    operand: Box::new(operand),
                }
            }
            ExprKind::Array(items) => ExprKind::Array(self.exprs(items)),
            ExprKind::Object(props) => ExprKind::Object(
                props
                    .iter()
                    .map(|p| Property {
                        key: p.key.clone(),
                        value: self.expr(&p.value),
                        shorthand: p.shorthand,
                        method: p.method,
                        span: p.span,
                    })
                    .collect(),
            ),
            ExprKind::Member { object, property } => ExprKind::Member {
                object: self.boxed(object),
                property: property.clone(),
            },
            ExprKind::Index { object, index } => ExprKind::Index {
                object: self.boxed(object),
                index: self.boxed(index),
            },
            ExprKind::Call { callee, args } => ExprKind::Call {
                callee: self.boxed(callee),
                args: self.exprs(args),
            },
            ExprKind::New { callee, args } => ExprKind::New {
                callee: self.boxed(callee),
                args: self.exprs(args),
            },
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => ExprKind::Conditional {
                test: self.boxed(test),
                consequent: self.boxed(consequent),
                alternate: self.boxed(alternate),
            },
            ExprKind::Sequence(items) => ExprKind::Sequence(self.exprs(items)),
            ExprKind::Paren(inner) => ExprKind::Paren(self.boxed(inner)),
            ExprKind::Arrow(f) => ExprKind::Arrow(Box::new(self.function(f))),
            ExprKind::Function(f) => ExprKind::Function(Box::new(self.function(f))),
            ExprKind::Number { .. }
            | ExprKind::BigInt(_)
            | ExprKind::String(_)
            | ExprKind::Bool(_)
            | ExprKind::Null
            | ExprKind::This
            | ExprKind::Identifier(_) => expr.kind.clone(),
        };
        Expr::new(expr.id, kind, expr.span)
    }

    /// Classify an original operator node; `Some` means it must be replaced.
    fn decide(&mut self, original: &Expr) -> Option<RuntimeOp> {
        let site = OperatorSite::of_expr(original, self.types)?;
        match classify(&site) {
            Decision::Unchanged => None,
            Decision::RewriteTo(op) => {
                tracing::trace!(
                    operator = site.operator(),
                    runtime = op.name(),
                    line = original.span.start_line,
                    "rewriting operator site"
                );
                self.sites += 1;
                Some(op)
            }
        }
    }
}

/// `target = value`
fn assign(target: Expr, value: Expr, span: Span) -> Expr {
    Expr::new(
        NodeId::SYNTHETIC,
        ExprKind::Assign {
            op: AssignOp::Assign,
            target: Box::new(target),
            value: Box::new(value),
        },
        span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(id: u32, name: &str) -> Expr {
        Expr::new(NodeId(id), ExprKind::Identifier(name.into()), Span::DUMMY)
    }

    fn expr_stmt(expr: Expr) -> Program {
        Program {
            body: vec![Stmt::new(StmtKind::Expr(expr), Span::DUMMY)],
            span: Span::DUMMY,
        }
    }

    fn only_expr(program: &Program) -> &Expr {
        match &program.body[0].kind {
            StmtKind::Expr(e) => e,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    fn callee_name(expr: &Expr) -> Option<&str> {
        let ExprKind::Call { callee, .. } = &expr.kind else {
            return None;
        };
        match &callee.kind {
            ExprKind::Member { object, property }
                if matches!(&object.kind, ExprKind::Identifier(ns) if ns == RUNTIME_NAMESPACE) =>
            {
                Some(property.name.as_str())
            }
            _ => None,
        }
    }

    fn table(entries: &[(u32, &str)]) -> TypeTable {
        let mut table = TypeTable::new();
        for (id, text) in entries {
            table.insert(NodeId(*id), *text);
        }
        table
    }

    // ── Operators ─────────────────────────────────────────────────────────────

    #[test]
    fn unsafe_binary_becomes_call() {
        let sum = Expr::new(
            NodeId(3),
            ExprKind::Binary {
                op: BinaryOp::Add,
                left: Box::new(ident(1, "a")),
                right: Box::new(ident(2, "b")),
            },
            Span::DUMMY,
        );
        let outcome = rewrite(&expr_stmt(sum), &table(&[(1, "any"), (2, "number")]));
        assert!(outcome.changed);
        assert_eq!(outcome.sites, 1);
        let call = only_expr(&outcome.program);
        assert_eq!(callee_name(call), Some("add"));
    }

    #[test]
    fn safe_binary_is_kept() {
        let sum = Expr::new(
            NodeId(3),
            ExprKind::Binary {
                op: BinaryOp::Mul,
                left: Box::new(ident(1, "a")),
                right: Box::new(ident(2, "b")),
            },
            Span::DUMMY,
        );
        let program = expr_stmt(sum);
        let outcome = rewrite(&program, &table(&[(1, "number"), (2, "bigint")]));
        assert!(!outcome.changed);
        assert_eq!(outcome.program, program);
    }

    #[test]
    fn compound_assignment_assigns_call_result() {
        let add_assign = Expr::new(
            NodeId(3),
            ExprKind::Assign {
                op: AssignOp::AddAssign,
                target: Box::new(ident(1, "s")),
                value: Box::new(ident(2, "n")),
            },
            Span::DUMMY,
        );
        let outcome = rewrite(&expr_stmt(add_assign), &table(&[(1, "string"), (2, "number")]));
        let ExprKind::Assign { op, target, value } = &only_expr(&outcome.program).kind else {
            panic!("expected assignment");
        };
        assert_eq!(*op, AssignOp::Assign);
        assert_eq!(target.kind, ExprKind::Identifier("s".into()));
        assert_eq!(callee_name(value), Some("add"));
    }

    #[test]
    fn postfix_update_reads_suffix() {
        let update = Expr::new(
            NodeId(2),
            ExprKind::Update {
                op: UpdateOp::Increment,
                prefix: false,
                operand: Box::new(ident(1, "x")),
            },
            Span::DUMMY,
        );
        let outcome = rewrite(&expr_stmt(update), &table(&[(1, "any")]));
        let ExprKind::Paren(inner) = &only_expr(&outcome.program).kind else {
            panic!("expected parenthesized rewrite");
        };
        let ExprKind::Sequence(items) = &inner.kind else {
            panic!("expected sequence");
        };
        assert_eq!(items.len(), 2);
        assert!(matches!(&items[0].kind, ExprKind::Assign { value, .. } if callee_name(value) == Some("inc")));
        assert_eq!(callee_name(&items[1]), Some("suffix"));
    }

    #[test]
    fn prefix_update_is_parenthesized_assignment() {
        let update = Expr::new(
            NodeId(2),
            ExprKind::Update {
                op: UpdateOp::Decrement,
                prefix: true,
                operand: Box::new(ident(1, "x")),
            },
            Span::DUMMY,
        );
        let outcome = rewrite(&expr_stmt(update), &table(&[(1, "string")]));
        let ExprKind::Paren(inner) = &only_expr(&outcome.program).kind else {
            panic!("expected parenthesized rewrite");
        };
        assert!(matches!(&inner.kind, ExprKind::Assign { value, .. } if callee_name(value) == Some("dec")));
    }

    #[test]
    fn nested_sites_rewrite_bottom_up() {
        let inner = Expr::new(
            NodeId(3),
            ExprKind::Binary {
                op: BinaryOp::Sub,
                left: Box::new(ident(1, "a")),
                right: Box::new(ident(2, "b")),
            },
            Span::DUMMY,
        );
        let outer = Expr::new(
            NodeId(4),
            ExprKind::Unary {
                op: UnaryOp::Minus,
                operand: Box::new(inner),
            },
            Span::DUMMY,
        );
        let types = table(&[(1, "any"), (2, "any"), (3, "any")]);
        let outcome = rewrite(&expr_stmt(outer), &types);
        assert_eq!(outcome.sites, 2);
        let call = only_expr(&outcome.program);
        assert_eq!(callee_name(call), Some("minus"));
        let ExprKind::Call { args, .. } = &call.kind else {
            unreachable!()
        };
        assert_eq!(callee_name(&args[0]), Some("sub"));
    }

    // ── Functions ─────────────────────────────────────────────────────────────

    fn arrow(body: FunctionBody) -> Function {
        Function {
            id: NodeId(10),
            kind: FunctionKind::Arrow,
            name: None,
            is_static: false,
            params: vec![Param {
                id: NodeId(1),
                name: Ident::synthetic("x"),
                type_ann: None,
                default: None,
                span: Span::DUMMY,
            }],
            return_type: None,
            body,
            span: Span::DUMMY,
        }
    }

    #[test]
    fn guarded_concise_arrow_gets_block_body() {
        let f = arrow(FunctionBody::Expr(Box::new(ident(2, "x"))));
        let program = expr_stmt(Expr::new(NodeId(11), ExprKind::Arrow(Box::new(f)), Span::DUMMY));
        let outcome = rewrite(&program, &table(&[(1, "number"), (2, "number")]));
        assert_eq!(outcome.guards, 1);
        let ExprKind::Arrow(f) = &only_expr(&outcome.program).kind else {
            panic!("expected arrow");
        };
        let FunctionBody::Block(block) = &f.body else {
            panic!("expected block body");
        };
        assert_eq!(block.stmts.len(), 2);
        assert!(block.stmts[0].is_if());
        assert!(matches!(block.stmts[1].kind, StmtKind::Return(Some(_))));
    }

    #[test]
    fn unguarded_concise_arrow_stays_concise() {
        let f = arrow(FunctionBody::Expr(Box::new(ident(2, "x"))));
        let program = expr_stmt(Expr::new(NodeId(11), ExprKind::Arrow(Box::new(f)), Span::DUMMY));
        let outcome = rewrite(&program, &table(&[(1, "Point")]));
        assert!(!outcome.changed);
        assert_eq!(outcome.program, program);
    }
}
