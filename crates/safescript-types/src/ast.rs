//! AST node types for the JavaScript/TypeScript subset SafeScript rewrites.
//!
//! Every node carries a [`Span`]. Expressions, functions, parameters and
//! variable declarators also carry a [`NodeId`] so the type checker can
//! attach a type to them; nodes synthesized by the rewrite engine use
//! [`NodeId::SYNTHETIC`].

use crate::Span;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Identity
// ══════════════════════════════════════════════════════════════════════════════

/// Parser-assigned node identity, unique within one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Id of nodes that were not produced by the parser.
    pub const SYNTHETIC: NodeId = NodeId(u32::MAX);

    pub fn is_synthetic(self) -> bool {
        self == Self::SYNTHETIC
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// An identifier that has no source position.
    pub fn synthetic(name: impl Into<String>) -> Self {
        Self::new(name, Span::DUMMY)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// `true` for `if` statements; guard detection and guard skipping both
    /// count these.
    pub fn is_if(&self) -> bool {
        matches!(self.kind, StmtKind::If(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `let a: number = 1, b;`
    Var(VarDecl),
    /// `function f(a: number) { ... }`
    Function(Function),
    /// `class C extends B { ... }`
    Class(ClassDecl),
    /// `if (cond) stmt [else stmt]`
    If(IfStmt),
    /// `while (cond) stmt`
    While(WhileStmt),
    /// `do stmt while (cond);`
    DoWhile(WhileStmt),
    /// `for (init; test; update) stmt`
    For(ForStmt),
    /// `for (x of xs) stmt` / `for (k in obj) stmt`
    ForEach(ForEachStmt),
    /// `switch (value) { case ...: ... }`
    Switch(SwitchStmt),
    /// `try { } catch (e) { } finally { }`
    Try(TryStmt),
    /// `return [expr];`
    Return(Option<Expr>),
    /// `throw expr;`
    Throw(Expr),
    /// `{ stmts... }`
    Block(Block),
    /// `break;`
    Break,
    /// `continue;`
    Continue,
    /// `import "mod";` or `import name from "mod";`
    Import(ImportDecl),
    /// `export <declaration>` or `export default <expr>;`
    Export {
        is_default: bool,
        stmt: Box<Stmt>,
    },
    /// `expr;`
    Expr(Expr),
    /// `;`
    Empty,
}

/// Declaration keyword of a variable statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: VarKind,
    pub declarators: Vec<VarDeclarator>,
    pub span: Span,
}

/// One `name[: Type] [= init]` entry of a variable statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub id: NodeId,
    pub name: Ident,
    pub type_ann: Option<TypeAnnotation>,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<ForInit>,
    pub test: Option<Expr>,
    pub update: Option<Expr>,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Var(VarDecl),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForEachStmt {
    /// A declaration without initializer, or an assignment target.
    pub left: ForInit,
    /// `true` for `of`, `false` for `in`.
    pub is_of: bool,
    pub iterable: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub discriminant: Expr,
    pub cases: Vec<SwitchCase>,
}

/// `case test:` or `default:` followed by its statements.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub block: Block,
    pub param: Option<Ident>,
    pub handler: Option<Block>,
    pub finalizer: Option<Block>,
}

/// `import "source";` or `import default_name from "source";`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub default: Option<Ident>,
    /// `* as ns`
    pub namespace: Option<Ident>,
    /// `{ a, b as c }`
    pub named: Vec<ImportSpecifier>,
    pub source: StrLit,
}

impl ImportDecl {
    /// `import "source";`
    pub fn side_effect(source: StrLit) -> Self {
        Self {
            default: None,
            namespace: None,
            named: Vec::new(),
            source,
        }
    }

    pub fn is_side_effect(&self) -> bool {
        self.default.is_none() && self.namespace.is_none() && self.named.is_empty()
    }
}

/// `imported [as local]`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpecifier {
    pub imported: Ident,
    pub local: Option<Ident>,
}

/// A string literal kept with its source spelling.
#[derive(Debug, Clone, PartialEq)]
pub struct StrLit {
    pub value: String,
    pub raw: String,
    pub span: Span,
}

impl StrLit {
    /// A double-quoted literal with no source position.
    pub fn synthetic(value: impl Into<String>) -> Self {
        let value = value.into();
        let raw = quote(&value);
        Self {
            value,
            raw,
            span: Span::DUMMY,
        }
    }
}

/// Double-quote a string value, escaping what JavaScript requires.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

// ══════════════════════════════════════════════════════════════════════════════
// Functions & Classes
// ══════════════════════════════════════════════════════════════════════════════

/// The four function-like node kinds that receive parameter guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Declaration,
    Method,
    Constructor,
    Arrow,
    /// `function (...) { }` in expression position; never guarded.
    Expression,
}

impl FunctionKind {
    /// Declarations, methods, constructors and arrows receive parameter
    /// guards.
    pub fn is_guarded(self) -> bool {
        self != FunctionKind::Expression
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub id: NodeId,
    pub kind: FunctionKind,
    /// Declaration and method name; `None` for arrows and constructors.
    pub name: Option<Ident>,
    pub is_static: bool,
    pub params: Vec<Param>,
    pub return_type: Option<TypeAnnotation>,
    pub body: FunctionBody,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Block(Block),
    /// Concise arrow body: `x => x * 2`
    Expr(Box<Expr>),
}

impl FunctionBody {
    pub fn span(&self) -> Span {
        match self {
            FunctionBody::Block(block) => block.span,
            FunctionBody::Expr(expr) => expr.span,
        }
    }

    /// Statements of a block body; empty for concise bodies.
    pub fn statements(&self) -> &[Stmt] {
        match self {
            FunctionBody::Block(block) => &block.stmts,
            FunctionBody::Expr(_) => &[],
        }
    }
}

/// A parameter: `name[: Type] [= default]`
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub id: NodeId,
    pub name: Ident,
    pub type_ann: Option<TypeAnnotation>,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Ident,
    pub extends: Option<Expr>,
    pub members: Vec<ClassMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// Methods and the constructor.
    Method(Function),
    /// `name[: Type] [= value];`
    Property(PropertyDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub id: NodeId,
    pub name: Ident,
    pub is_static: bool,
    pub type_ann: Option<TypeAnnotation>,
    pub value: Option<Expr>,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(id: NodeId, kind: ExprKind, span: Span) -> Self {
        Self { id, kind, span }
    }

    /// A node created outside the parser.
    pub fn synthetic(kind: ExprKind) -> Self {
        Self::new(NodeId::SYNTHETIC, kind, Span::DUMMY)
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expr {
        let mut expr = self;
        while let ExprKind::Paren(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals ──
    /// `42`, `0x2a`, `1e3`, kept with source spelling.
    Number { value: f64, raw: String },
    /// `10n`
    BigInt(String),
    /// `"hello"`, `'hello'`
    String(StrLit),
    /// `true` / `false`
    Bool(bool),
    /// `null`
    Null,
    /// `this`
    This,
    /// `[a, b]`
    Array(Vec<Expr>),
    /// `{ key: value, short }`
    Object(Vec<Property>),

    // ── References & calls ──
    Identifier(String),
    /// `object.property`
    Member {
        object: Box<Expr>,
        property: Ident,
    },
    /// `object[index]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    /// `callee(args...)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `new callee(args...)`
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },

    // ── Operators ──
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `target = value` and every compound form.
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `++x`, `x--`
    Update {
        op: UpdateOp,
        prefix: bool,
        operand: Box<Expr>,
    },
    /// `test ? consequent : alternate`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// `a, b, c`
    Sequence(Vec<Expr>),
    /// `(expr)`
    Paren(Box<Expr>),
    /// `(params) => body`
    Arrow(Box<Function>),
    /// `function [name](params) { ... }`
    Function(Box<Function>),
}

/// An entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropertyKey,
    pub value: Expr,
    /// `{ a }` rather than `{ a: a }`.
    pub shorthand: bool,
    /// `{ m() { } }`; the value is an [`ExprKind::Function`] of kind
    /// [`FunctionKind::Method`].
    pub method: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Ident(Ident),
    String(StrLit),
    Number { raw: String, span: Span },
}

// ── Operators ────────────────────────────────────────────────────────────────

/// Binary operators, including the logical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
    LogicalAnd,
    LogicalOr,
    Nullish,
    InstanceOf,
    In,
}

impl BinaryOp {
    /// The operator token.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Exp => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
            BinaryOp::Nullish => "??",
            BinaryOp::InstanceOf => "instanceof",
            BinaryOp::In => "in",
        }
    }

    /// Binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Nullish => 3,
            BinaryOp::LogicalOr => 4,
            BinaryOp::LogicalAnd => 5,
            BinaryOp::BitOr => 6,
            BinaryOp::BitXor => 7,
            BinaryOp::BitAnd => 8,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => 9,
            BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq
            | BinaryOp::InstanceOf
            | BinaryOp::In => 10,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 11,
            BinaryOp::Add | BinaryOp::Sub => 12,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 13,
            BinaryOp::Exp => 14,
        }
    }

    /// `**` is the only right-associative binary operator.
    pub fn is_right_associative(self) -> bool {
        self == BinaryOp::Exp
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    ExpAssign,
    ShlAssign,
    ShrAssign,
    UShrAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    AndAssign,
    OrAssign,
    NullishAssign,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::ModAssign => "%=",
            AssignOp::ExpAssign => "**=",
            AssignOp::ShlAssign => "<<=",
            AssignOp::ShrAssign => ">>=",
            AssignOp::UShrAssign => ">>>=",
            AssignOp::BitAndAssign => "&=",
            AssignOp::BitOrAssign => "|=",
            AssignOp::BitXorAssign => "^=",
            AssignOp::AndAssign => "&&=",
            AssignOp::OrAssign => "||=",
            AssignOp::NullishAssign => "??=",
        }
    }

    /// `true` for every operator other than plain `=`.
    pub fn is_compound(self) -> bool {
        self != AssignOp::Assign
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNot,
    Not,
    Typeof,
    Void,
    Delete,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::BitNot => "~",
            UnaryOp::Not => "!",
            UnaryOp::Typeof => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
        }
    }

    /// Keyword operators need a space before their operand.
    pub fn is_keyword(self) -> bool {
        matches!(self, UnaryOp::Typeof | UnaryOp::Void | UnaryOp::Delete)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Type Annotations
// ══════════════════════════════════════════════════════════════════════════════

/// A TypeScript type annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub kind: TypeKind,
    pub span: Span,
}

impl TypeAnnotation {
    pub fn new(kind: TypeKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// `number`, `string`, `boolean`, `bigint`, `symbol`, `any`, `unknown`,
    /// `object`, `void`, `null`, `undefined`, `never`
    Keyword(String),
    /// `Foo`, `Array<number>`
    Named {
        name: String,
        args: Vec<TypeAnnotation>,
    },
    /// `1`, `"on"`, `true`, kept with source spelling.
    Literal(String),
    /// `T[]`
    Array(Box<TypeAnnotation>),
    /// `A | B`
    Union(Vec<TypeAnnotation>),
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Keyword(name) => write!(f, "{name}"),
            TypeKind::Named { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeKind::Literal(raw) => write!(f, "{raw}"),
            TypeKind::Array(elem) => match elem.kind {
                TypeKind::Union(_) => write!(f, "({elem})[]"),
                _ => write!(f, "{elem}[]"),
            },
            TypeKind::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
        }
    }
}
