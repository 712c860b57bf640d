//! SafeScript type checker: walks a parsed AST and reports the type of every
//! expression, parameter and declarator as checker text.
//!
//! Entry point: [`TypeChecker::check`], then [`TypeChecker::into_table`].
//!
//! The checker never rejects a program. Annotations are trusted, literals
//! keep their literal type text on `const` bindings, and anything it cannot
//! work out is `any`, which the classifier treats as unsafe.
//!
//! Diagnostics emitted (informational only):
//! - E200: annotation names a type that is neither declared nor built in
//! - E201: operand of a checked operator is not declared anywhere

use std::collections::{HashMap, HashSet};

use safescript_types::ast::*;
use safescript_types::{
    CompileErrors, ErrorCode, RuntimeOp, SafeScriptError, Severity, SourceFile, Span,
    RUNTIME_NAMESPACE,
};

use crate::env::{ScopeKind, TypeEnv};
use crate::ty::{TypeDescriptor, TypeTable, ANY};

/// Generic and object types every script can name without declaring them.
const BUILTIN_TYPES: &[&str] = &[
    "Array",
    "ReadonlyArray",
    "Map",
    "Set",
    "WeakMap",
    "WeakSet",
    "Promise",
    "Record",
    "Partial",
    "Readonly",
    "Date",
    "Error",
    "TypeError",
    "RegExp",
    "Function",
    "Object",
    "String",
    "Number",
    "Boolean",
    "Symbol",
    "BigInt",
    "Iterable",
    "Iterator",
];

/// Global values that are never reported as unresolved.
const KNOWN_GLOBALS: &[&str] = &[
    "undefined",
    "NaN",
    "Infinity",
    "globalThis",
    "window",
    "document",
    "console",
    "Math",
    "JSON",
    "Object",
    "Array",
    "String",
    "Number",
    "Boolean",
    "Symbol",
    "BigInt",
    "Date",
    "Error",
    "TypeError",
    "RegExp",
    "Map",
    "Set",
    "Promise",
    "parseInt",
    "parseFloat",
    "isNaN",
    "require",
    "module",
    "exports",
    "process",
    "arguments",
    "super",
    RUNTIME_NAMESPACE,
];

// ══════════════════════════════════════════════════════════════════════════════
// Class Info
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct ClassInfo {
    /// Property name → declared type text.
    properties: HashMap<String, String>,
    /// Method name → return type text.
    methods: HashMap<String, String>,
}

// ══════════════════════════════════════════════════════════════════════════════
// TypeChecker
// ══════════════════════════════════════════════════════════════════════════════

/// Walks a parsed [`Program`] and records types into a [`TypeTable`].
pub struct TypeChecker<'a> {
    env: TypeEnv,
    errors: &'a mut CompileErrors,
    source: &'a SourceFile,
    table: TypeTable,
    /// Function name → return type text.
    functions: HashMap<String, String>,
    /// Declared classes by name.
    classes: HashMap<String, ClassInfo>,
    /// Imported names, usable as type names.
    imported: HashSet<String>,
    /// Names of the classes whose bodies are being checked.
    class_stack: Vec<String>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(errors: &'a mut CompileErrors, source: &'a SourceFile) -> Self {
        Self {
            env: TypeEnv::new(),
            errors,
            source,
            table: TypeTable::new(),
            functions: HashMap::new(),
            classes: HashMap::new(),
            imported: HashSet::new(),
            class_stack: Vec::new(),
        }
    }

    /// Type-check a complete program.
    pub fn check(&mut self, program: &Program) {
        self.hoist(&program.body);
        for stmt in &program.body {
            self.check_stmt(stmt);
        }
    }

    /// The collected types.
    pub fn into_table(self) -> TypeTable {
        self.table
    }

    // ══════════════════════════════════════════════════════════════════════
    // Declarations
    // ══════════════════════════════════════════════════════════════════════

    /// Register function and class declarations before their scope runs.
    fn hoist(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            let stmt = match &stmt.kind {
                StmtKind::Export { stmt, .. } => stmt.as_ref(),
                _ => stmt,
            };
            match &stmt.kind {
                StmtKind::Function(function) => {
                    if let Some(name) = &function.name {
                        let ret = self.return_text(function);
                        self.functions.insert(name.name.clone(), ret);
                        self.env.define_hoisted(&name.name, "function");
                    }
                }
                StmtKind::Class(class) => self.register_class(class),
                StmtKind::Import(import) => self.register_import(import),
                _ => {}
            }
        }
    }

    fn register_class(&mut self, class: &ClassDecl) {
        let mut info = ClassInfo::default();
        for member in &class.members {
            match member {
                ClassMember::Property(prop) => {
                    let ty = match (&prop.type_ann, &prop.value) {
                        (Some(ann), _) => ann.to_string(),
                        (None, Some(value)) => literal_text(value)
                            .map(|t| widen(&t))
                            .unwrap_or_else(|| ANY.to_string()),
                        (None, None) => ANY.to_string(),
                    };
                    info.properties.insert(prop.name.name.clone(), ty);
                }
                ClassMember::Method(method) => {
                    if let Some(name) = &method.name {
                        info.methods
                            .insert(name.name.clone(), self.return_text(method));
                    }
                }
            }
        }
        self.classes.insert(class.name.name.clone(), info);
        self.env
            .define(&class.name.name, format!("typeof {}", class.name.name));
    }

    fn register_import(&mut self, import: &ImportDecl) {
        let locals = import
            .default
            .iter()
            .chain(import.namespace.iter())
            .chain(
                import
                    .named
                    .iter()
                    .map(|spec| spec.local.as_ref().unwrap_or(&spec.imported)),
            );
        for local in locals {
            self.imported.insert(local.name.clone());
            self.env.define(&local.name, ANY);
        }
    }

    fn return_text(&self, function: &Function) -> String {
        function
            .return_type
            .as_ref()
            .map_or_else(|| ANY.to_string(), |ann| ann.to_string())
    }

    /// Render an annotation, warning about type names nobody declared.
    fn check_annotation(&mut self, ann: &TypeAnnotation) -> String {
        self.check_type_names(ann);
        ann.to_string()
    }

    fn check_type_names(&mut self, ann: &TypeAnnotation) {
        match &ann.kind {
            TypeKind::Named { name, args } => {
                let known = name.contains('.')
                    || BUILTIN_TYPES.contains(&name.as_str())
                    || self.classes.contains_key(name)
                    || self.imported.contains(name);
                if !known {
                    self.diagnostic(
                        ErrorCode::UNKNOWN_TYPE,
                        Severity::Warning,
                        format!("unknown type '{name}'; its operands are checked at run time"),
                        ann.span,
                    );
                }
                for arg in args {
                    self.check_type_names(arg);
                }
            }
            TypeKind::Array(elem) => self.check_type_names(elem),
            TypeKind::Union(members) => {
                for member in members {
                    self.check_type_names(member);
                }
            }
            TypeKind::Keyword(_) | TypeKind::Literal(_) => {}
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    fn check_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Var(decl) => self.check_var_decl(decl),
            StmtKind::Function(function) => self.check_function(function),
            StmtKind::Class(class) => self.check_class(class),
            StmtKind::If(if_stmt) => {
                self.check_expr(&if_stmt.condition);
                self.check_stmt(&if_stmt.then_branch);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.check_stmt(else_branch);
                }
            }
            StmtKind::While(loop_stmt) | StmtKind::DoWhile(loop_stmt) => {
                self.check_expr(&loop_stmt.condition);
                self.check_stmt(&loop_stmt.body);
            }
            StmtKind::For(for_stmt) => {
                self.env.push_scope(ScopeKind::Block);
                match &for_stmt.init {
                    Some(ForInit::Var(decl)) => self.check_var_decl(decl),
                    Some(ForInit::Expr(expr)) => {
                        self.check_expr(expr);
                    }
                    None => {}
                }
                if let Some(test) = &for_stmt.test {
                    self.check_expr(test);
                }
                if let Some(update) = &for_stmt.update {
                    self.check_expr(update);
                }
                self.check_stmt(&for_stmt.body);
                self.env.pop_scope();
            }
            StmtKind::ForEach(each) => {
                let iterable = self.check_expr(&each.iterable);
                let item = if each.is_of {
                    element_type(&iterable)
                } else {
                    "string".to_string()
                };
                self.env.push_scope(ScopeKind::Block);
                match &each.left {
                    ForInit::Var(decl) => {
                        for declarator in &decl.declarators {
                            self.table.insert(declarator.id, item.clone());
                            self.bind(decl.kind, &declarator.name.name, item.clone());
                        }
                    }
                    ForInit::Expr(expr) => {
                        self.check_expr(expr);
                    }
                }
                self.check_stmt(&each.body);
                self.env.pop_scope();
            }
            StmtKind::Switch(switch) => {
                self.check_expr(&switch.discriminant);
                self.env.push_scope(ScopeKind::Block);
                for case in &switch.cases {
                    if let Some(test) = &case.test {
                        self.check_expr(test);
                    }
                    self.hoist(&case.body);
                    for stmt in &case.body {
                        self.check_stmt(stmt);
                    }
                }
                self.env.pop_scope();
            }
            StmtKind::Try(try_stmt) => {
                self.check_block(&try_stmt.block);
                if let Some(handler) = &try_stmt.handler {
                    self.env.push_scope(ScopeKind::Block);
                    if let Some(param) = &try_stmt.param {
                        self.env.define(&param.name, ANY);
                    }
                    self.check_block(handler);
                    self.env.pop_scope();
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.check_block(finalizer);
                }
            }
            StmtKind::Return(Some(expr)) | StmtKind::Throw(expr) | StmtKind::Expr(expr) => {
                self.check_expr(expr);
            }
            StmtKind::Block(block) => self.check_block(block),
            StmtKind::Export { stmt, .. } => self.check_stmt(stmt),
            StmtKind::Return(None)
            | StmtKind::Break
            | StmtKind::Continue
            | StmtKind::Import(_)
            | StmtKind::Empty => {}
        }
    }

    fn check_block(&mut self, block: &Block) {
        self.env.push_scope(ScopeKind::Block);
        self.hoist(&block.stmts);
        for stmt in &block.stmts {
            self.check_stmt(stmt);
        }
        self.env.pop_scope();
    }

    fn check_var_decl(&mut self, decl: &VarDecl) {
        for declarator in &decl.declarators {
            let init = declarator.init.as_ref().map(|init| self.check_expr(init));
            let ty = match (&declarator.type_ann, init) {
                (Some(ann), _) => self.check_annotation(ann),
                (None, Some(init)) if decl.kind == VarKind::Const => init,
                (None, Some(init)) => widen(&init),
                (None, None) => ANY.to_string(),
            };
            if let Some(Expr {
                kind: ExprKind::Arrow(function) | ExprKind::Function(function),
                ..
            }) = &declarator.init
            {
                if function.return_type.is_some() {
                    let ret = self.return_text(function);
                    self.functions.insert(declarator.name.name.clone(), ret);
                }
            }
            self.table.insert(declarator.id, ty.clone());
            self.bind(decl.kind, &declarator.name.name, ty);
        }
    }

    fn bind(&mut self, kind: VarKind, name: &str, ty: String) {
        match kind {
            VarKind::Var => self.env.define_hoisted(name, ty),
            VarKind::Let | VarKind::Const => self.env.define(name, ty),
        };
    }

    fn check_function(&mut self, function: &Function) {
        if let Some(ann) = &function.return_type {
            self.check_annotation(ann);
        }
        self.env.push_scope(ScopeKind::Function);
        for param in &function.params {
            let default = param.default.as_ref().map(|d| self.check_expr(d));
            let ty = match (&param.type_ann, default) {
                (Some(ann), _) => self.check_annotation(ann),
                (None, Some(default)) => widen(&default),
                (None, None) => ANY.to_string(),
            };
            self.table.insert(param.id, ty.clone());
            self.env.define(&param.name.name, ty);
        }
        match &function.body {
            FunctionBody::Block(block) => {
                self.hoist(&block.stmts);
                for stmt in &block.stmts {
                    self.check_stmt(stmt);
                }
            }
            FunctionBody::Expr(expr) => {
                self.check_expr(expr);
            }
        }
        self.env.pop_scope();
    }

    fn check_class(&mut self, class: &ClassDecl) {
        if let Some(extends) = &class.extends {
            self.check_expr(extends);
        }
        self.class_stack.push(class.name.name.clone());
        for member in &class.members {
            match member {
                ClassMember::Property(prop) => {
                    if let Some(ann) = &prop.type_ann {
                        self.check_annotation(ann);
                    }
                    if let Some(value) = &prop.value {
                        self.check_expr(value);
                    }
                    let ty = self
                        .classes
                        .get(&class.name.name)
                        .and_then(|info| info.properties.get(&prop.name.name))
                        .cloned()
                        .unwrap_or_else(|| ANY.to_string());
                    self.table.insert(prop.id, ty);
                }
                ClassMember::Method(method) => self.check_function(method),
            }
        }
        self.class_stack.pop();
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    /// Check an expression and record its type.
    pub fn check_expr(&mut self, expr: &Expr) -> String {
        let ty = self.infer_expr(expr);
        self.table.insert(expr.id, ty.clone());
        ty
    }

    fn infer_expr(&mut self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Number { value, .. } => format!("{value}"),
            ExprKind::BigInt(_) => "bigint".to_string(),
            ExprKind::String(lit) => quote(&lit.value),
            ExprKind::Bool(_) => "boolean".to_string(),
            ExprKind::Null => "null".to_string(),
            ExprKind::This => self
                .class_stack
                .last()
                .cloned()
                .unwrap_or_else(|| ANY.to_string()),
            ExprKind::Array(items) => {
                let types: Vec<String> = items
                    .iter()
                    .map(|item| widen(&self.check_expr(item)))
                    .collect();
                match types.first() {
                    Some(first) if types.iter().all(|t| t == first) => array_of(first),
                    _ => "any[]".to_string(),
                }
            }
            ExprKind::Object(props) => {
                for prop in props {
                    self.check_expr(&prop.value);
                }
                "object".to_string()
            }
            ExprKind::Identifier(name) => self.resolve_name(name),
            ExprKind::Member { object, property } => {
                let object_ty = self.check_expr(object);
                self.member_type(&object_ty, &property.name)
            }
            ExprKind::Index { object, index } => {
                let object_ty = self.check_expr(object);
                self.check_expr(index);
                if object_ty.ends_with("[]") {
                    element_type(&object_ty)
                } else if widen(&object_ty) == "string" {
                    "string".to_string()
                } else {
                    ANY.to_string()
                }
            }
            ExprKind::Call { callee, args } => {
                self.check_expr(callee);
                let arg_types: Vec<String> = args.iter().map(|a| self.check_expr(a)).collect();
                self.call_type(callee, &arg_types)
            }
            ExprKind::New { callee, args } => {
                self.check_expr(callee);
                for arg in args {
                    self.check_expr(arg);
                }
                match &callee.kind {
                    ExprKind::Identifier(name) => name.clone(),
                    _ => ANY.to_string(),
                }
            }
            ExprKind::Binary { op, left, right } => {
                let l = self.check_expr(left);
                let r = self.check_expr(right);
                if RuntimeOp::for_binary(op.as_str()).is_some() {
                    self.note_unresolved(left);
                    self.note_unresolved(right);
                }
                binary_result(*op, &l, &r)
            }
            ExprKind::Assign { op, target, value } => {
                let t = self.check_expr(target);
                let v = self.check_expr(value);
                if RuntimeOp::for_compound(op.as_str()).is_some() {
                    self.note_unresolved(target);
                    self.note_unresolved(value);
                }
                assign_result(*op, &t, &v)
            }
            ExprKind::Unary { op, operand } => {
                let o = self.check_expr(operand);
                if RuntimeOp::for_unary(op.as_str()).is_some() {
                    self.note_unresolved(operand);
                }
                unary_result(*op, &o)
            }
            ExprKind::Update { operand, .. } => {
                let o = self.check_expr(operand);
                self.note_unresolved(operand);
                numeric_result(&o)
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.check_expr(test);
                let c = self.check_expr(consequent);
                let a = self.check_expr(alternate);
                union(&c, &a)
            }
            ExprKind::Sequence(items) => {
                let mut last = ANY.to_string();
                for item in items {
                    last = self.check_expr(item);
                }
                last
            }
            ExprKind::Paren(inner) => self.check_expr(inner),
            ExprKind::Arrow(function) | ExprKind::Function(function) => {
                self.check_function(function);
                "function".to_string()
            }
        }
    }

    fn resolve_name(&self, name: &str) -> String {
        if let Some(ty) = self.env.lookup(name) {
            return ty.to_string();
        }
        match name {
            "undefined" => "undefined".to_string(),
            "NaN" | "Infinity" => "number".to_string(),
            _ => ANY.to_string(),
        }
    }

    fn member_type(&self, object_ty: &str, property: &str) -> String {
        if property == "length" && (object_ty.ends_with("[]") || widen(object_ty) == "string") {
            return "number".to_string();
        }
        if let Some(info) = self.classes.get(object_ty) {
            if let Some(ty) = info.properties.get(property) {
                return ty.clone();
            }
            if info.methods.contains_key(property) {
                return "function".to_string();
            }
        }
        ANY.to_string()
    }

    fn call_type(&self, callee: &Expr, args: &[String]) -> String {
        match &callee.kind {
            ExprKind::Identifier(name) => self
                .functions
                .get(name)
                .cloned()
                .unwrap_or_else(|| ANY.to_string()),
            ExprKind::Member { object, property } => {
                if matches!(&object.kind, ExprKind::Identifier(ns) if ns == RUNTIME_NAMESPACE) {
                    if let Some(op) = RuntimeOp::from_name(&property.name) {
                        return runtime_result(op, args);
                    }
                }
                let object_ty = self.table.type_text(object.id);
                self.classes
                    .get(object_ty)
                    .and_then(|info| info.methods.get(&property.name))
                    .cloned()
                    .unwrap_or_else(|| ANY.to_string())
            }
            _ => ANY.to_string(),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Diagnostics
    // ══════════════════════════════════════════════════════════════════════

    /// Suggest declaring an operand nobody declared.
    fn note_unresolved(&mut self, operand: &Expr) {
        let ExprKind::Identifier(name) = &operand.unparenthesized().kind else {
            return;
        };
        if self.env.lookup(name).is_some() || KNOWN_GLOBALS.contains(&name.as_str()) {
            return;
        }
        self.diagnostic(
            ErrorCode::UNRESOLVED_NAME,
            Severity::Suggestion,
            format!("'{name}' is not declared; operators on it are checked at run time"),
            operand.span,
        );
    }

    fn diagnostic(&mut self, code: ErrorCode, severity: Severity, message: String, span: Span) {
        if span.is_dummy() {
            return;
        }
        let source_line = self.source.line(span.start_line).unwrap_or("").to_string();
        let diagnostic = SafeScriptError::new(&self.source.name, code, message, span, source_line)
            .with_severity(severity);
        self.errors.push(diagnostic);
    }
}

/// Check a program and return its type table.
pub fn check_program(program: &Program, source: &SourceFile, errors: &mut CompileErrors) -> TypeTable {
    let mut checker = TypeChecker::new(errors, source);
    checker.check(program);
    checker.into_table()
}

// ══════════════════════════════════════════════════════════════════════════════
// Result Types
// ══════════════════════════════════════════════════════════════════════════════

/// Literal type text of an un-annotated initializer, if it is a literal.
fn literal_text(expr: &Expr) -> Option<String> {
    match &expr.unparenthesized().kind {
        ExprKind::Number { value, .. } => Some(format!("{value}")),
        ExprKind::String(lit) => Some(quote(&lit.value)),
        ExprKind::Bool(_) => Some("boolean".to_string()),
        ExprKind::BigInt(_) => Some("bigint".to_string()),
        _ => None,
    }
}

/// Widen a literal type to its primitive: `1` → `number`, `"a"` → `string`.
pub(crate) fn widen(text: &str) -> String {
    match TypeDescriptor::canonicalize(None, text) {
        TypeDescriptor::Number => "number".to_string(),
        TypeDescriptor::String => "string".to_string(),
        _ => text.to_string(),
    }
}

fn array_of(elem: &str) -> String {
    if elem.contains(' ') {
        format!("({elem})[]")
    } else {
        format!("{elem}[]")
    }
}

/// `T[]` → `T`; anything else → `any`.
fn element_type(text: &str) -> String {
    match text.strip_suffix("[]") {
        Some(elem) => elem
            .strip_prefix('(')
            .and_then(|e| e.strip_suffix(')'))
            .unwrap_or(elem)
            .to_string(),
        None if widen(text) == "string" => "string".to_string(),
        None => ANY.to_string(),
    }
}

fn union(a: &str, b: &str) -> String {
    let (a, b) = (widen(a), widen(b));
    if a == b {
        a
    } else {
        format!("{a} | {b}")
    }
}

fn numeric_result(operand: &str) -> String {
    if TypeDescriptor::canonicalize(None, operand) == TypeDescriptor::BigInt {
        "bigint".to_string()
    } else {
        "number".to_string()
    }
}

fn binary_result(op: BinaryOp, l: &str, r: &str) -> String {
    let lt = TypeDescriptor::canonicalize(None, l);
    let rt = TypeDescriptor::canonicalize(None, r);
    let both_bigint = lt == TypeDescriptor::BigInt && rt == TypeDescriptor::BigInt;
    match op {
        BinaryOp::Add => {
            let numeric = |t: &TypeDescriptor| {
                matches!(t, TypeDescriptor::Number | TypeDescriptor::Boolean)
            };
            if lt == TypeDescriptor::String || rt == TypeDescriptor::String {
                "string".to_string()
            } else if both_bigint {
                "bigint".to_string()
            } else if numeric(&lt) && numeric(&rt) {
                "number".to_string()
            } else {
                ANY.to_string()
            }
        }
        BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::Mod
        | BinaryOp::Exp
        | BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor
        | BinaryOp::Shl
        | BinaryOp::Shr => {
            if both_bigint {
                "bigint".to_string()
            } else {
                "number".to_string()
            }
        }
        BinaryOp::UShr => "number".to_string(),
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::StrictEq
        | BinaryOp::StrictNotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::InstanceOf
        | BinaryOp::In => "boolean".to_string(),
        BinaryOp::LogicalAnd | BinaryOp::LogicalOr | BinaryOp::Nullish => union(l, r),
    }
}

fn assign_result(op: AssignOp, target: &str, value: &str) -> String {
    let binary = match op {
        AssignOp::Assign => return value.to_string(),
        AssignOp::AddAssign => BinaryOp::Add,
        AssignOp::SubAssign => BinaryOp::Sub,
        AssignOp::MulAssign => BinaryOp::Mul,
        AssignOp::DivAssign => BinaryOp::Div,
        AssignOp::ModAssign => BinaryOp::Mod,
        AssignOp::ExpAssign => BinaryOp::Exp,
        AssignOp::ShlAssign => BinaryOp::Shl,
        AssignOp::ShrAssign => BinaryOp::Shr,
        AssignOp::UShrAssign => BinaryOp::UShr,
        AssignOp::BitAndAssign => BinaryOp::BitAnd,
        AssignOp::BitOrAssign => BinaryOp::BitOr,
        AssignOp::BitXorAssign => BinaryOp::BitXor,
        AssignOp::AndAssign | AssignOp::OrAssign | AssignOp::NullishAssign => {
            return union(target, value)
        }
    };
    binary_result(binary, target, value)
}

fn unary_result(op: UnaryOp, operand: &str) -> String {
    match op {
        UnaryOp::Plus => "number".to_string(),
        UnaryOp::Minus | UnaryOp::BitNot => numeric_result(operand),
        UnaryOp::Not | UnaryOp::Delete => "boolean".to_string(),
        UnaryOp::Typeof => "string".to_string(),
        UnaryOp::Void => "undefined".to_string(),
    }
}

/// A runtime call has the type of the operator it stands for.
fn runtime_result(op: RuntimeOp, args: &[String]) -> String {
    let arg = |i: usize| args.get(i).map(String::as_str).unwrap_or(ANY);
    let binary = match op {
        RuntimeOp::Add => BinaryOp::Add,
        RuntimeOp::Sub => BinaryOp::Sub,
        RuntimeOp::Mul => BinaryOp::Mul,
        RuntimeOp::Div => BinaryOp::Div,
        RuntimeOp::Mod => BinaryOp::Mod,
        RuntimeOp::Exp => BinaryOp::Exp,
        RuntimeOp::Eq => BinaryOp::Eq,
        RuntimeOp::Ne => BinaryOp::NotEq,
        RuntimeOp::Gt => BinaryOp::Gt,
        RuntimeOp::Ge => BinaryOp::GtEq,
        RuntimeOp::Lt => BinaryOp::Lt,
        RuntimeOp::Le => BinaryOp::LtEq,
        RuntimeOp::And => BinaryOp::BitAnd,
        RuntimeOp::Or => BinaryOp::BitOr,
        RuntimeOp::Xor => BinaryOp::BitXor,
        RuntimeOp::Rshift => BinaryOp::Shr,
        RuntimeOp::Arshift => BinaryOp::UShr,
        RuntimeOp::Lshift => BinaryOp::Shl,
        RuntimeOp::Plus => return "number".to_string(),
        RuntimeOp::Minus | RuntimeOp::BitNot | RuntimeOp::Inc | RuntimeOp::Dec => {
            return numeric_result(arg(0))
        }
        RuntimeOp::Suffix => return "number".to_string(),
    };
    binary_result(binary, arg(0), arg(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_result_types() {
        assert_eq!(binary_result(BinaryOp::Add, "number", "\"a\""), "string");
        assert_eq!(binary_result(BinaryOp::Add, "1", "2"), "number");
        assert_eq!(binary_result(BinaryOp::Add, "bigint", "bigint"), "bigint");
        assert_eq!(binary_result(BinaryOp::Add, "any", "number"), "any");
    }

    #[test]
    fn arithmetic_is_numeric() {
        assert_eq!(binary_result(BinaryOp::Sub, "any", "string"), "number");
        assert_eq!(binary_result(BinaryOp::Shl, "bigint", "bigint"), "bigint");
        assert_eq!(binary_result(BinaryOp::UShr, "bigint", "bigint"), "number");
        assert_eq!(binary_result(BinaryOp::Lt, "any", "any"), "boolean");
    }

    #[test]
    fn runtime_calls_type_like_their_operator() {
        let args = vec!["number".to_string(), "\"x\"".to_string()];
        assert_eq!(runtime_result(RuntimeOp::Add, &args), "string");
        assert_eq!(runtime_result(RuntimeOp::Ge, &args), "boolean");
        assert_eq!(runtime_result(RuntimeOp::Inc, &["bigint".to_string()]), "bigint");
        assert_eq!(runtime_result(RuntimeOp::Suffix, &[]), "number");
    }

    #[test]
    fn widening_and_unions() {
        assert_eq!(widen("1"), "number");
        assert_eq!(widen("'a'"), "string");
        assert_eq!(widen("Point"), "Point");
        assert_eq!(union("1", "2"), "number");
        assert_eq!(union("1", "\"a\""), "number | string");
    }

    #[test]
    fn element_types() {
        assert_eq!(element_type("number[]"), "number");
        assert_eq!(element_type("(number | string)[]"), "number | string");
        assert_eq!(element_type("string"), "string");
        assert_eq!(element_type("Map<string, number>"), "any");
        assert_eq!(array_of("number | string"), "(number | string)[]");
    }
}
