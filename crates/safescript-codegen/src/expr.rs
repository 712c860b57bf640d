//! Expression emission with precedence-driven parenthesization.

use safescript_types::ast::*;

use crate::printer::Printer;

/// Binding levels used to decide where parentheses are required. Binary
/// operators sit between [`CONDITIONAL`](prec::CONDITIONAL) and
/// [`UNARY`](prec::UNARY) at their own [`BinaryOp::precedence`].
pub(crate) mod prec {
    pub const SEQUENCE: u8 = 0;
    pub const ASSIGNMENT: u8 = 1;
    pub const CONDITIONAL: u8 = 2;
    pub const UNARY: u8 = 15;
    pub const POSTFIX: u8 = 16;
    pub const CALL: u8 = 17;
    pub const PRIMARY: u8 = 19;
}

/// Binding level of an expression as printed.
pub(crate) fn precedence(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Sequence(_) => prec::SEQUENCE,
        ExprKind::Assign { .. } | ExprKind::Arrow(_) => prec::ASSIGNMENT,
        ExprKind::Conditional { .. } => prec::CONDITIONAL,
        ExprKind::Binary { op, .. } => op.precedence(),
        ExprKind::Unary { .. } | ExprKind::Update { prefix: true, .. } => prec::UNARY,
        ExprKind::Update { prefix: false, .. } => prec::POSTFIX,
        ExprKind::Call { .. }
        | ExprKind::New { .. }
        | ExprKind::Member { .. }
        | ExprKind::Index { .. } => prec::CALL,
        _ => prec::PRIMARY,
    }
}

/// `true` if the printed expression would begin with `{` or `function`,
/// which a statement or concise arrow body cannot start with.
pub(crate) fn starts_ambiguously(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Object(_) | ExprKind::Function(_) => true,
        ExprKind::Binary { op, left, .. } => {
            !needs_parens(left, op.precedence()) && starts_ambiguously(left)
        }
        ExprKind::Assign { target, .. } => starts_ambiguously(target),
        ExprKind::Conditional { test, .. } => {
            precedence(test) > prec::CONDITIONAL && starts_ambiguously(test)
        }
        ExprKind::Sequence(items) => items.first().is_some_and(starts_ambiguously),
        ExprKind::Update {
            prefix: false,
            operand,
            ..
        } => starts_ambiguously(operand),
        ExprKind::Call { callee: object, .. }
        | ExprKind::Member { object, .. }
        | ExprKind::Index { object, .. } => {
            precedence(object) >= prec::CALL && starts_ambiguously(object)
        }
        _ => false,
    }
}

fn needs_parens(expr: &Expr, min: u8) -> bool {
    precedence(expr) < min
}

/// `??` cannot be mixed with `&&` or `||` without parentheses.
fn mixes_nullish(parent: BinaryOp, child: &Expr) -> bool {
    let ExprKind::Binary { op, .. } = &child.kind else {
        return false;
    };
    let logical = |op: BinaryOp| matches!(op, BinaryOp::LogicalAnd | BinaryOp::LogicalOr);
    (parent == BinaryOp::Nullish && logical(*op)) || (logical(parent) && *op == BinaryOp::Nullish)
}

/// A `new` callee containing a call must be parenthesized, or the call's
/// arguments would bind to `new`.
fn new_callee_needs_parens(callee: &Expr) -> bool {
    match &callee.kind {
        ExprKind::Call { .. } => true,
        ExprKind::Member { object, .. } | ExprKind::Index { object, .. } => {
            new_callee_needs_parens(object)
        }
        _ => needs_parens(callee, prec::CALL),
    }
}

/// `1.toString()` reads as a malformed number; `1..toString()` or
/// `(1).toString()` do not.
fn is_bare_integer(expr: &Expr) -> bool {
    matches!(&expr.kind, ExprKind::Number { raw, .. } if raw.bytes().all(|b| b.is_ascii_digit()))
}

impl Printer<'_> {
    /// Print `expr`, parenthesized if it binds looser than `min`.
    pub(crate) fn expr(&mut self, expr: &Expr, min: u8) {
        self.expr_wrapped(expr, needs_parens(expr, min));
    }

    fn expr_wrapped(&mut self, expr: &Expr, parens: bool) {
        if parens {
            self.write("(");
        }
        self.mark(expr.span);
        self.expr_kind(expr);
        if parens {
            self.write(")");
        }
    }

    fn expr_kind(&mut self, expr: &Expr) {
        match &expr.kind {
            // ── Literals ─────────────────────────────────────────────────
            ExprKind::Number { raw, .. } => self.write(raw),
            ExprKind::BigInt(raw) => self.write(raw),
            ExprKind::String(lit) => self.write(&lit.raw),
            ExprKind::Bool(true) => self.write("true"),
            ExprKind::Bool(false) => self.write("false"),
            ExprKind::Null => self.write("null"),
            ExprKind::This => self.write("this"),
            ExprKind::Identifier(name) => self.write(name),
            ExprKind::Array(items) => {
                self.write("[");
                self.list(items);
                self.write("]");
            }
            ExprKind::Object(props) => self.object(props),

            // ── References & calls ───────────────────────────────────────
            ExprKind::Member { object, property } => {
                self.expr_wrapped(
                    object,
                    needs_parens(object, prec::CALL) || is_bare_integer(object),
                );
                self.write(".");
                self.mark(property.span);
                self.write(&property.name);
            }
            ExprKind::Index { object, index } => {
                self.expr(object, prec::CALL);
                self.write("[");
                self.expr(index, prec::SEQUENCE);
                self.write("]");
            }
            ExprKind::Call { callee, args } => {
                self.expr(callee, prec::CALL);
                self.write("(");
                self.list(args);
                self.write(")");
            }
            ExprKind::New { callee, args } => {
                self.write("new ");
                self.expr_wrapped(callee, new_callee_needs_parens(callee));
                self.write("(");
                self.list(args);
                self.write(")");
            }

            // ── Operators ────────────────────────────────────────────────
            ExprKind::Binary { op, left, right } => {
                let p = op.precedence();
                let (left_min, right_min) = if op.is_right_associative() {
                    (prec::POSTFIX, p)
                } else {
                    (p, p + 1)
                };
                self.expr_wrapped(
                    left,
                    needs_parens(left, left_min) || mixes_nullish(*op, left),
                );
                self.write(" ");
                self.write(op.as_str());
                self.write(" ");
                self.expr_wrapped(
                    right,
                    needs_parens(right, right_min) || mixes_nullish(*op, right),
                );
            }
            ExprKind::Assign { op, target, value } => {
                self.expr(target, prec::CALL);
                self.write(" ");
                self.write(op.as_str());
                self.write(" ");
                self.expr(value, prec::ASSIGNMENT);
            }
            ExprKind::Unary { op, operand } => {
                self.write(op.as_str());
                if op.is_keyword() || repeats_sign(*op, operand) {
                    self.write(" ");
                }
                self.expr(operand, prec::UNARY);
            }
            ExprKind::Update {
                op,
                prefix: true,
                operand,
            } => {
                self.write(op.as_str());
                self.expr(operand, prec::CALL);
            }
            ExprKind::Update {
                op,
                prefix: false,
                operand,
            } => {
                self.expr(operand, prec::CALL);
                self.write(op.as_str());
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test, prec::CONDITIONAL + 1);
                self.write(" ? ");
                self.expr(consequent, prec::ASSIGNMENT);
                self.write(" : ");
                self.expr(alternate, prec::ASSIGNMENT);
            }
            ExprKind::Sequence(items) => self.list(items),
            ExprKind::Paren(inner) => {
                self.write("(");
                self.expr(inner, prec::SEQUENCE);
                self.write(")");
            }

            // ── Functions ────────────────────────────────────────────────
            ExprKind::Arrow(function) => self.function_tail(function),
            ExprKind::Function(function) => self.function(function),
        }
    }

    /// Comma-separated expressions at assignment level.
    fn list(&mut self, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.expr(item, prec::ASSIGNMENT);
        }
    }

    fn object(&mut self, props: &[Property]) {
        if props.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{ ");
        for (i, prop) in props.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.mark(prop.span);
            match &prop.key {
                PropertyKey::Ident(ident) => self.write(&ident.name),
                PropertyKey::String(lit) => self.write(&lit.raw),
                PropertyKey::Number { raw, .. } => self.write(raw),
            }
            if prop.shorthand {
                continue;
            }
            match &prop.value.kind {
                ExprKind::Function(function) if prop.method => self.function_tail(function),
                _ => {
                    self.write(": ");
                    self.expr(&prop.value, prec::ASSIGNMENT);
                }
            }
        }
        self.write(" }");
    }
}

/// `- -x` and `+ +x` need a space so they do not print as `--x` / `++x`.
fn repeats_sign(op: UnaryOp, operand: &Expr) -> bool {
    match (op, &operand.kind) {
        (UnaryOp::Minus, ExprKind::Unary { op: UnaryOp::Minus, .. })
        | (UnaryOp::Plus, ExprKind::Unary { op: UnaryOp::Plus, .. }) => true,
        (
            UnaryOp::Minus,
            ExprKind::Update {
                op: UpdateOp::Decrement,
                prefix: true,
                ..
            },
        )
        | (
            UnaryOp::Plus,
            ExprKind::Update {
                op: UpdateOp::Increment,
                prefix: true,
                ..
            },
        ) => true,
        _ => false,
    }
}
