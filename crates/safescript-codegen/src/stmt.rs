//! Statement emission.

use safescript_types::ast::*;

use crate::expr::{prec, starts_ambiguously};
use crate::printer::Printer;

impl Printer<'_> {
    /// Print a statement on its own line(s).
    pub(crate) fn stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        self.stmt_inline(stmt);
        self.newline();
    }

    /// Print a statement at the current position, without the leading
    /// indentation or trailing newline.
    pub(crate) fn stmt_inline(&mut self, stmt: &Stmt) {
        self.mark(stmt.span);
        match &stmt.kind {
            StmtKind::Var(decl) => {
                self.var_decl(decl);
                self.write(";");
            }
            StmtKind::Function(function) => self.function(function),
            StmtKind::Class(class) => self.class(class),
            StmtKind::If(if_stmt) => self.if_stmt(if_stmt),
            StmtKind::While(w) => {
                self.write("while (");
                self.expr(&w.condition, prec::SEQUENCE);
                self.write(") ");
                self.stmt_inline(&w.body);
            }
            StmtKind::DoWhile(w) => {
                self.write("do ");
                self.stmt_inline(&w.body);
                self.branch_separator(&w.body);
                self.write("while (");
                self.expr(&w.condition, prec::SEQUENCE);
                self.write(");");
            }
            StmtKind::For(for_stmt) => {
                self.write("for (");
                match &for_stmt.init {
                    Some(ForInit::Var(decl)) => self.var_decl(decl),
                    Some(ForInit::Expr(e)) => self.expr(e, prec::SEQUENCE),
                    None => {}
                }
                self.write(";");
                if let Some(test) = &for_stmt.test {
                    self.write(" ");
                    self.expr(test, prec::SEQUENCE);
                }
                self.write(";");
                if let Some(update) = &for_stmt.update {
                    self.write(" ");
                    self.expr(update, prec::SEQUENCE);
                }
                self.write(") ");
                self.stmt_inline(&for_stmt.body);
            }
            StmtKind::ForEach(each) => {
                self.write("for (");
                match &each.left {
                    ForInit::Var(decl) => self.var_decl(decl),
                    ForInit::Expr(e) => self.expr(e, prec::CALL),
                }
                self.write(if each.is_of { " of " } else { " in " });
                self.expr(&each.iterable, prec::ASSIGNMENT);
                self.write(") ");
                self.stmt_inline(&each.body);
            }
            StmtKind::Switch(switch) => self.switch(switch),
            StmtKind::Try(try_stmt) => {
                self.write("try ");
                self.block(&try_stmt.block);
                if let Some(handler) = &try_stmt.handler {
                    self.write(" catch ");
                    if let Some(param) = &try_stmt.param {
                        self.write("(");
                        self.mark(param.span);
                        self.write(&param.name);
                        self.write(") ");
                    }
                    self.block(handler);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.write(" finally ");
                    self.block(finalizer);
                }
            }
            StmtKind::Return(value) => {
                self.write("return");
                if let Some(value) = value {
                    self.write(" ");
                    self.expr(value, prec::SEQUENCE);
                }
                self.write(";");
            }
            StmtKind::Throw(value) => {
                self.write("throw ");
                self.expr(value, prec::SEQUENCE);
                self.write(";");
            }
            StmtKind::Block(block) => self.block(block),
            StmtKind::Break => self.write("break;"),
            StmtKind::Continue => self.write("continue;"),
            StmtKind::Import(import) => self.import(import),
            StmtKind::Export { is_default, stmt } => {
                self.write(if *is_default { "export default " } else { "export " });
                self.stmt_inline(stmt);
            }
            StmtKind::Expr(e) => {
                if starts_ambiguously(e) {
                    self.write("(");
                    self.expr(e, prec::SEQUENCE);
                    self.write(")");
                } else {
                    self.expr(e, prec::SEQUENCE);
                }
                self.write(";");
            }
            StmtKind::Empty => self.write(";"),
        }
    }

    /// `{`, the statements one level deeper, `}`.
    pub(crate) fn block(&mut self, block: &Block) {
        self.mark(block.span);
        self.write("{");
        if block.stmts.is_empty() {
            self.write("}");
            return;
        }
        self.newline();
        self.indent();
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    /// What follows a nested statement before a trailing keyword: a space
    /// after a block, a fresh line otherwise.
    fn branch_separator(&mut self, body: &Stmt) {
        if matches!(body.kind, StmtKind::Block(_)) {
            self.write(" ");
        } else {
            self.newline();
            self.write_indent();
        }
    }

    fn if_stmt(&mut self, if_stmt: &IfStmt) {
        self.write("if (");
        self.expr(&if_stmt.condition, prec::SEQUENCE);
        self.write(") ");
        self.stmt_inline(&if_stmt.then_branch);
        if let Some(else_branch) = &if_stmt.else_branch {
            self.branch_separator(&if_stmt.then_branch);
            self.write("else ");
            self.stmt_inline(else_branch);
        }
    }

    fn switch(&mut self, switch: &SwitchStmt) {
        self.write("switch (");
        self.expr(&switch.discriminant, prec::SEQUENCE);
        self.write(") {");
        self.newline();
        self.indent();
        for case in &switch.cases {
            self.write_indent();
            self.mark(case.span);
            match &case.test {
                Some(test) => {
                    self.write("case ");
                    self.expr(test, prec::SEQUENCE);
                    self.write(":");
                }
                None => self.write("default:"),
            }
            self.newline();
            self.indent();
            for stmt in &case.body {
                self.stmt(stmt);
            }
            self.dedent();
        }
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    fn import(&mut self, import: &ImportDecl) {
        self.write("import ");
        if !import.is_side_effect() {
            let mut wrote = false;
            if let Some(default) = &import.default {
                self.mark(default.span);
                self.write(&default.name);
                wrote = true;
            }
            if let Some(namespace) = &import.namespace {
                if wrote {
                    self.write(", ");
                }
                self.write("* as ");
                self.mark(namespace.span);
                self.write(&namespace.name);
                wrote = true;
            }
            if !import.named.is_empty() {
                if wrote {
                    self.write(", ");
                }
                self.write("{ ");
                for (i, spec) in import.named.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.mark(spec.imported.span);
                    self.write(&spec.imported.name);
                    if let Some(local) = &spec.local {
                        self.write(" as ");
                        self.mark(local.span);
                        self.write(&local.name);
                    }
                }
                self.write(" }");
            }
            self.write(" from ");
        }
        self.mark(import.source.span);
        self.write(&import.source.raw);
        self.write(";");
    }

    // ── Declarations ──────────────────────────────────────────────────────────

    /// `let a: T = 1, b` without the semicolon.
    pub(crate) fn var_decl(&mut self, decl: &VarDecl) {
        self.write(decl.kind.as_str());
        self.write(" ");
        for (i, d) in decl.declarators.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.mark(d.name.span);
            self.write(&d.name.name);
            self.type_annotation(d.type_ann.as_ref());
            if let Some(init) = &d.init {
                self.write(" = ");
                self.expr(init, prec::ASSIGNMENT);
            }
        }
    }

    /// Declarations, methods and constructors.
    pub(crate) fn function(&mut self, function: &Function) {
        match function.kind {
            FunctionKind::Declaration | FunctionKind::Expression => self.write("function "),
            FunctionKind::Method | FunctionKind::Constructor | FunctionKind::Arrow => {
                if function.is_static {
                    self.write("static ");
                }
            }
        }
        match (&function.name, function.kind) {
            (Some(name), _) => {
                self.mark(name.span);
                self.write(&name.name);
            }
            (None, FunctionKind::Constructor) => self.write("constructor"),
            (None, _) => {}
        }
        self.function_tail(function);
    }

    /// `(params): R body`, shared by every function form.
    pub(crate) fn function_tail(&mut self, function: &Function) {
        self.params(&function.params);
        self.type_annotation(function.return_type.as_ref());
        if function.kind == FunctionKind::Arrow {
            self.write(" =>");
        }
        self.write(" ");
        match &function.body {
            FunctionBody::Block(block) => self.block(block),
            FunctionBody::Expr(e) => {
                if starts_ambiguously(e) {
                    self.write("(");
                    self.expr(e, prec::SEQUENCE);
                    self.write(")");
                } else {
                    self.expr(e, prec::ASSIGNMENT);
                }
            }
        }
    }

    fn params(&mut self, params: &[Param]) {
        self.write("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.mark(param.span);
            self.write(&param.name.name);
            self.type_annotation(param.type_ann.as_ref());
            if let Some(default) = &param.default {
                self.write(" = ");
                self.expr(default, prec::ASSIGNMENT);
            }
        }
        self.write(")");
    }

    fn class(&mut self, class: &ClassDecl) {
        self.write("class ");
        self.mark(class.name.span);
        self.write(&class.name.name);
        if let Some(extends) = &class.extends {
            self.write(" extends ");
            self.expr(extends, prec::CALL);
        }
        self.write(" {");
        if class.members.is_empty() {
            self.write("}");
            return;
        }
        self.newline();
        self.indent();
        for member in &class.members {
            self.write_indent();
            match member {
                ClassMember::Method(function) => {
                    self.mark(function.span);
                    self.function(function);
                }
                ClassMember::Property(property) => {
                    self.mark(property.span);
                    if property.is_static {
                        self.write("static ");
                    }
                    self.write(&property.name.name);
                    self.type_annotation(property.type_ann.as_ref());
                    if let Some(value) = &property.value {
                        self.write(" = ");
                        self.expr(value, prec::ASSIGNMENT);
                    }
                    self.write(";");
                }
            }
            self.newline();
        }
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    /// `: T` when types are kept.
    pub(crate) fn type_annotation(&mut self, annotation: Option<&TypeAnnotation>) {
        if !self.options.emit_types {
            return;
        }
        if let Some(annotation) = annotation {
            self.write(": ");
            self.mark(annotation.span);
            self.write(&annotation.to_string());
        }
    }
}
