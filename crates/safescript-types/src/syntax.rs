//! Generic syntax view over a parsed [`Program`].
//!
//! The typed AST is what the checker and the rewrite engine work on. Position
//! correspondence needs something flatter: an ordered tree where every token
//! of the source is a leaf, so that punctuation and keywords can serve as
//! anchors too. [`SyntaxTree::build`] produces that view by walking the AST
//! and interleaving the token stream between child nodes.

use crate::ast::*;
use crate::{SourceFile, Span};
use std::sync::Arc;

/// Coarse node category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    BinaryOp,
    UnaryOp,
    UpdateOp { prefix: bool },
    CompoundAssign,
    Call,
    FunctionLike,
    Identifier,
    Literal,
    Other,
}

/// Fine-grained node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    // ── Statements & declarations ──
    Program,
    VariableStatement,
    VariableDeclarationList,
    VariableDeclarator,
    FunctionDeclaration,
    MethodDeclaration,
    Constructor,
    Parameter,
    ClassDeclaration,
    PropertyDeclaration,
    Block,
    IfStatement,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    SwitchStatement,
    CaseClause,
    TryStatement,
    ReturnStatement,
    ThrowStatement,
    BreakStatement,
    ContinueStatement,
    ImportDeclaration,
    ImportSpecifier,
    ExportDeclaration,
    ExpressionStatement,
    EmptyStatement,
    TypeAnnotation,

    // ── Expressions ──
    ArrowFunction,
    FunctionExpression,
    ArrayLiteral,
    ObjectLiteral,
    PropertyAssignment,
    PropertyAccess,
    ElementAccess,
    CallExpression,
    NewExpression,
    BinaryExpression,
    AssignmentExpression,
    CompoundAssignment,
    PrefixUnary,
    PrefixUpdate,
    PostfixUpdate,
    ConditionalExpression,
    SequenceExpression,
    ParenthesizedExpression,

    // ── Leaves ──
    Identifier,
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    TrueKeyword,
    FalseKeyword,
    NullKeyword,
    ThisKeyword,
    Keyword,
    Punctuation,
}

impl SyntaxKind {
    /// Declarations, methods, constructors and arrows.
    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::FunctionDeclaration
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::Constructor
                | SyntaxKind::ArrowFunction
        )
    }

    pub fn category(self) -> NodeCategory {
        match self {
            SyntaxKind::BinaryExpression => NodeCategory::BinaryOp,
            SyntaxKind::CompoundAssignment => NodeCategory::CompoundAssign,
            SyntaxKind::PrefixUnary => NodeCategory::UnaryOp,
            SyntaxKind::PrefixUpdate => NodeCategory::UpdateOp { prefix: true },
            SyntaxKind::PostfixUpdate => NodeCategory::UpdateOp { prefix: false },
            SyntaxKind::CallExpression => NodeCategory::Call,
            SyntaxKind::Identifier => NodeCategory::Identifier,
            SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword => NodeCategory::Literal,
            kind if kind.is_function_like() => NodeCategory::FunctionLike,
            _ => NodeCategory::Other,
        }
    }
}

/// One token of the source, as the syntax view sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLeaf {
    pub kind: SyntaxKind,
    pub span: Span,
}

/// A node of the syntax view. Leaves have no children.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub span: Span,
    pub children: Vec<SyntaxNode>,
    /// Formatting-independent header of function-like nodes, e.g. `f(a,b)`.
    pub label: Option<String>,
}

impl SyntaxNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn category(&self) -> NodeCategory {
        self.kind.category()
    }

    /// Pre-order iterator over this node and all of its descendants.
    pub fn descendants(&self) -> impl Iterator<Item = &SyntaxNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// The body block of a function-like node.
    pub fn body_block(&self) -> Option<&SyntaxNode> {
        if !self.kind.is_function_like() {
            return None;
        }
        self.children.iter().rev().find(|c| c.kind == SyntaxKind::Block)
    }
}

/// A syntax view together with the text it was built from.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub source: Arc<SourceFile>,
    pub root: SyntaxNode,
}

impl SyntaxTree {
    /// Build the view of `program`, whose tokens are `tokens` in source order.
    pub fn build(source: Arc<SourceFile>, program: &Program, tokens: &[TokenLeaf]) -> Self {
        let mut builder = Builder { tokens, cursor: 0 };
        let root = builder.node(Node::Program(program));
        Self { source, root }
    }

    /// Text a node is compared by: its label for function-like nodes, its
    /// source slice otherwise.
    pub fn text<'a>(&'a self, node: &'a SyntaxNode) -> &'a str {
        match &node.label {
            Some(label) => label,
            None => self.source.slice(node.span),
        }
    }

    /// 0-based `(line, column)` of a node's first character.
    pub fn position(&self, node: &SyntaxNode) -> (u32, u32) {
        self.source.position(node.span.start)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Builder
// ══════════════════════════════════════════════════════════════════════════════

struct Builder<'t> {
    tokens: &'t [TokenLeaf],
    cursor: usize,
}

impl Builder<'_> {
    fn node(&mut self, node: Node<'_>) -> SyntaxNode {
        let span = node.span();
        let kind = node.kind();
        let label = node.label();

        if node.is_leaf() {
            self.skip_until(span.end);
            return SyntaxNode {
                kind,
                span,
                children: Vec::new(),
                label,
            };
        }

        let mut children = Vec::new();
        for child in node.children() {
            if child.span().is_dummy() {
                continue;
            }
            self.tokens_until(child.span().start, &mut children);
            children.push(self.node(child));
        }
        self.tokens_until(span.end, &mut children);

        SyntaxNode {
            kind,
            span,
            children,
            label,
        }
    }

    fn tokens_until(&mut self, limit: usize, out: &mut Vec<SyntaxNode>) {
        while let Some(token) = self.tokens.get(self.cursor) {
            if token.span.end > limit {
                break;
            }
            out.push(SyntaxNode {
                kind: token.kind,
                span: token.span,
                children: Vec::new(),
                label: None,
            });
            self.cursor += 1;
        }
    }

    fn skip_until(&mut self, limit: usize) {
        while let Some(token) = self.tokens.get(self.cursor) {
            if token.span.start >= limit {
                break;
            }
            self.cursor += 1;
        }
    }
}

/// Borrowed view of any AST node the syntax view cares about.
#[derive(Clone, Copy)]
enum Node<'a> {
    Program(&'a Program),
    Stmt(&'a Stmt),
    VarDecl(&'a VarDecl, bool),
    Declarator(&'a VarDeclarator),
    Function(&'a Function),
    Param(&'a Param),
    Class(&'a ClassDecl),
    PropertyDecl(&'a PropertyDecl),
    Block(&'a Block),
    Expr(&'a Expr),
    Property(&'a Property),
    Key(&'a PropertyKey),
    Ident(&'a Ident),
    Str(&'a StrLit),
    Type(&'a TypeAnnotation),
    Case(&'a SwitchCase),
    ImportSpec(&'a ImportSpecifier),
}

impl<'a> Node<'a> {
    fn span(self) -> Span {
        match self {
            Node::Program(p) => p.span,
            Node::Stmt(s) => s.span,
            Node::VarDecl(d, _) => d.span,
            Node::Declarator(d) => d.span,
            Node::Function(f) => f.span,
            Node::Param(p) => p.span,
            Node::Class(c) => c.span,
            Node::PropertyDecl(p) => p.span,
            Node::Block(b) => b.span,
            Node::Expr(e) => e.span,
            Node::Property(p) => p.span,
            Node::Key(PropertyKey::Ident(i)) => i.span,
            Node::Key(PropertyKey::String(s)) => s.span,
            Node::Key(PropertyKey::Number { span, .. }) => *span,
            Node::Ident(i) => i.span,
            Node::Str(s) => s.span,
            Node::Type(t) => t.span,
            Node::Case(c) => c.span,
            Node::ImportSpec(spec) => match &spec.local {
                Some(local) => spec.imported.span.merge(local.span),
                None => spec.imported.span,
            },
        }
    }

    fn kind(self) -> SyntaxKind {
        match self {
            Node::Program(_) => SyntaxKind::Program,
            Node::Stmt(s) => match &s.kind {
                StmtKind::Var(_) => SyntaxKind::VariableStatement,
                StmtKind::Function(f) => Node::Function(f).kind(),
                StmtKind::Class(_) => SyntaxKind::ClassDeclaration,
                StmtKind::If(_) => SyntaxKind::IfStatement,
                StmtKind::While(_) => SyntaxKind::WhileStatement,
                StmtKind::DoWhile(_) => SyntaxKind::DoStatement,
                StmtKind::For(_) => SyntaxKind::ForStatement,
                StmtKind::ForEach(stmt) if stmt.is_of => SyntaxKind::ForOfStatement,
                StmtKind::ForEach(_) => SyntaxKind::ForInStatement,
                StmtKind::Switch(_) => SyntaxKind::SwitchStatement,
                StmtKind::Try(_) => SyntaxKind::TryStatement,
                StmtKind::Return(_) => SyntaxKind::ReturnStatement,
                StmtKind::Throw(_) => SyntaxKind::ThrowStatement,
                StmtKind::Block(_) => SyntaxKind::Block,
                StmtKind::Break => SyntaxKind::BreakStatement,
                StmtKind::Continue => SyntaxKind::ContinueStatement,
                StmtKind::Import(_) => SyntaxKind::ImportDeclaration,
                StmtKind::Export { .. } => SyntaxKind::ExportDeclaration,
                StmtKind::Expr(_) => SyntaxKind::ExpressionStatement,
                StmtKind::Empty => SyntaxKind::EmptyStatement,
            },
            Node::VarDecl(_, true) => SyntaxKind::VariableStatement,
            Node::VarDecl(_, false) => SyntaxKind::VariableDeclarationList,
            Node::Declarator(_) => SyntaxKind::VariableDeclarator,
            Node::Function(f) => match f.kind {
                FunctionKind::Declaration => SyntaxKind::FunctionDeclaration,
                FunctionKind::Method => SyntaxKind::MethodDeclaration,
                FunctionKind::Constructor => SyntaxKind::Constructor,
                FunctionKind::Arrow => SyntaxKind::ArrowFunction,
                FunctionKind::Expression => SyntaxKind::FunctionExpression,
            },
            Node::Param(_) => SyntaxKind::Parameter,
            Node::Class(_) => SyntaxKind::ClassDeclaration,
            Node::PropertyDecl(_) => SyntaxKind::PropertyDeclaration,
            Node::Block(_) => SyntaxKind::Block,
            Node::Expr(e) => match &e.kind {
                ExprKind::Number { .. } => SyntaxKind::NumericLiteral,
                ExprKind::BigInt(_) => SyntaxKind::BigIntLiteral,
                ExprKind::String(_) => SyntaxKind::StringLiteral,
                ExprKind::Bool(true) => SyntaxKind::TrueKeyword,
                ExprKind::Bool(false) => SyntaxKind::FalseKeyword,
                ExprKind::Null => SyntaxKind::NullKeyword,
                ExprKind::This => SyntaxKind::ThisKeyword,
                ExprKind::Identifier(_) => SyntaxKind::Identifier,
                ExprKind::Array(_) => SyntaxKind::ArrayLiteral,
                ExprKind::Object(_) => SyntaxKind::ObjectLiteral,
                ExprKind::Member { .. } => SyntaxKind::PropertyAccess,
                ExprKind::Index { .. } => SyntaxKind::ElementAccess,
                ExprKind::Call { .. } => SyntaxKind::CallExpression,
                ExprKind::New { .. } => SyntaxKind::NewExpression,
                ExprKind::Binary { .. } => SyntaxKind::BinaryExpression,
                ExprKind::Assign { op, .. } if op.is_compound() => SyntaxKind::CompoundAssignment,
                ExprKind::Assign { .. } => SyntaxKind::AssignmentExpression,
                ExprKind::Unary { .. } => SyntaxKind::PrefixUnary,
                ExprKind::Update { prefix: true, .. } => SyntaxKind::PrefixUpdate,
                ExprKind::Update { prefix: false, .. } => SyntaxKind::PostfixUpdate,
                ExprKind::Conditional { .. } => SyntaxKind::ConditionalExpression,
                ExprKind::Sequence(_) => SyntaxKind::SequenceExpression,
                ExprKind::Paren(_) => SyntaxKind::ParenthesizedExpression,
                ExprKind::Arrow(f) | ExprKind::Function(f) => Node::Function(f).kind(),
            },
            Node::Case(_) => SyntaxKind::CaseClause,
            Node::ImportSpec(_) => SyntaxKind::ImportSpecifier,
            Node::Property(_) => SyntaxKind::PropertyAssignment,
            Node::Key(PropertyKey::Ident(_)) | Node::Ident(_) => SyntaxKind::Identifier,
            Node::Key(PropertyKey::String(_)) | Node::Str(_) => SyntaxKind::StringLiteral,
            Node::Key(PropertyKey::Number { .. }) => SyntaxKind::NumericLiteral,
            Node::Type(_) => SyntaxKind::TypeAnnotation,
        }
    }

    fn is_leaf(self) -> bool {
        match self {
            Node::Expr(e) => matches!(
                e.kind,
                ExprKind::Number { .. }
                    | ExprKind::BigInt(_)
                    | ExprKind::String(_)
                    | ExprKind::Bool(_)
                    | ExprKind::Null
                    | ExprKind::This
                    | ExprKind::Identifier(_)
            ),
            Node::Key(_) | Node::Ident(_) | Node::Str(_) => true,
            _ => false,
        }
    }

    fn label(self) -> Option<String> {
        let function = match self {
            Node::Function(f) => f,
            Node::Stmt(Stmt {
                kind: StmtKind::Function(f),
                ..
            }) => f,
            Node::Expr(Expr {
                kind: ExprKind::Arrow(f) | ExprKind::Function(f),
                ..
            }) => f,
            _ => return None,
        };
        function
            .kind
            .is_guarded()
            .then(|| function_label(function))
    }

    fn children(self) -> Vec<Node<'a>> {
        let mut out = Vec::new();
        match self {
            Node::Program(p) => out.extend(p.body.iter().map(Node::Stmt)),
            Node::Stmt(s) => match &s.kind {
                StmtKind::Var(decl) => out.extend(decl.declarators.iter().map(Node::Declarator)),
                StmtKind::Function(f) => return Node::Function(f).children(),
                StmtKind::Class(c) => return Node::Class(c).children(),
                StmtKind::If(stmt) => {
                    out.push(Node::Expr(&stmt.condition));
                    out.push(Node::Stmt(&stmt.then_branch));
                    if let Some(else_branch) = &stmt.else_branch {
                        out.push(Node::Stmt(else_branch));
                    }
                }
                StmtKind::While(stmt) => {
                    out.push(Node::Expr(&stmt.condition));
                    out.push(Node::Stmt(&stmt.body));
                }
                StmtKind::DoWhile(stmt) => {
                    out.push(Node::Stmt(&stmt.body));
                    out.push(Node::Expr(&stmt.condition));
                }
                StmtKind::ForEach(stmt) => {
                    match &stmt.left {
                        ForInit::Var(decl) => out.push(Node::VarDecl(decl, false)),
                        ForInit::Expr(e) => out.push(Node::Expr(e)),
                    }
                    out.push(Node::Expr(&stmt.iterable));
                    out.push(Node::Stmt(&stmt.body));
                }
                StmtKind::Switch(stmt) => {
                    out.push(Node::Expr(&stmt.discriminant));
                    out.extend(stmt.cases.iter().map(Node::Case));
                }
                StmtKind::Try(stmt) => {
                    out.push(Node::Block(&stmt.block));
                    out.extend(stmt.param.iter().map(Node::Ident));
                    out.extend(stmt.handler.iter().map(Node::Block));
                    out.extend(stmt.finalizer.iter().map(Node::Block));
                }
                StmtKind::For(stmt) => {
                    match &stmt.init {
                        Some(ForInit::Var(decl)) => out.push(Node::VarDecl(decl, false)),
                        Some(ForInit::Expr(e)) => out.push(Node::Expr(e)),
                        None => {}
                    }
                    out.extend(stmt.test.iter().map(Node::Expr));
                    out.extend(stmt.update.iter().map(Node::Expr));
                    out.push(Node::Stmt(&stmt.body));
                }
                StmtKind::Return(value) => out.extend(value.iter().map(Node::Expr)),
                StmtKind::Throw(value) | StmtKind::Expr(value) => out.push(Node::Expr(value)),
                StmtKind::Block(block) => return Node::Block(block).children(),
                StmtKind::Import(import) => {
                    out.extend(import.default.iter().map(Node::Ident));
                    out.extend(import.namespace.iter().map(Node::Ident));
                    out.extend(import.named.iter().map(Node::ImportSpec));
                    out.push(Node::Str(&import.source));
                }
                StmtKind::Export { stmt, .. } => out.push(Node::Stmt(stmt)),
                StmtKind::Break | StmtKind::Continue | StmtKind::Empty => {}
            },
            Node::VarDecl(decl, _) => out.extend(decl.declarators.iter().map(Node::Declarator)),
            Node::Declarator(d) => {
                out.push(Node::Ident(&d.name));
                out.extend(d.type_ann.iter().map(Node::Type));
                out.extend(d.init.iter().map(Node::Expr));
            }
            Node::Function(f) => {
                out.extend(f.name.iter().map(Node::Ident));
                out.extend(f.params.iter().map(Node::Param));
                out.extend(f.return_type.iter().map(Node::Type));
                match &f.body {
                    FunctionBody::Block(block) => out.push(Node::Block(block)),
                    FunctionBody::Expr(e) => out.push(Node::Expr(e)),
                }
            }
            Node::Param(p) => {
                out.push(Node::Ident(&p.name));
                out.extend(p.type_ann.iter().map(Node::Type));
                out.extend(p.default.iter().map(Node::Expr));
            }
            Node::Class(c) => {
                out.push(Node::Ident(&c.name));
                out.extend(c.extends.iter().map(Node::Expr));
                for member in &c.members {
                    match member {
                        ClassMember::Method(f) => out.push(Node::Function(f)),
                        ClassMember::Property(p) => out.push(Node::PropertyDecl(p)),
                    }
                }
            }
            Node::PropertyDecl(p) => {
                out.push(Node::Ident(&p.name));
                out.extend(p.type_ann.iter().map(Node::Type));
                out.extend(p.value.iter().map(Node::Expr));
            }
            Node::Block(b) => out.extend(b.stmts.iter().map(Node::Stmt)),
            Node::Expr(e) => match &e.kind {
                ExprKind::Array(items) | ExprKind::Sequence(items) => {
                    out.extend(items.iter().map(Node::Expr))
                }
                ExprKind::Object(props) => out.extend(props.iter().map(|p| {
                    if p.method {
                        Node::Expr(&p.value)
                    } else {
                        Node::Property(p)
                    }
                })),
                ExprKind::Member { object, property } => {
                    out.push(Node::Expr(object));
                    out.push(Node::Ident(property));
                }
                ExprKind::Index { object, index } => {
                    out.push(Node::Expr(object));
                    out.push(Node::Expr(index));
                }
                ExprKind::Call { callee, args } | ExprKind::New { callee, args } => {
                    out.push(Node::Expr(callee));
                    out.extend(args.iter().map(Node::Expr));
                }
                ExprKind::Binary { left, right, .. } => {
                    out.push(Node::Expr(left));
                    out.push(Node::Expr(right));
                }
                ExprKind::Assign { target, value, .. } => {
                    out.push(Node::Expr(target));
                    out.push(Node::Expr(value));
                }
                ExprKind::Unary { operand, .. }
                | ExprKind::Update { operand, .. }
                | ExprKind::Paren(operand) => out.push(Node::Expr(operand)),
                ExprKind::Conditional {
                    test,
                    consequent,
                    alternate,
                } => {
                    out.push(Node::Expr(test));
                    out.push(Node::Expr(consequent));
                    out.push(Node::Expr(alternate));
                }
                ExprKind::Arrow(f) | ExprKind::Function(f) => {
                    return Node::Function(f).children()
                }
                _ => {}
            },
            Node::Property(p) => {
                out.push(Node::Key(&p.key));
                if !p.shorthand {
                    out.push(Node::Expr(&p.value));
                }
            }
            Node::Case(c) => {
                out.extend(c.test.iter().map(Node::Expr));
                out.extend(c.body.iter().map(Node::Stmt));
            }
            Node::ImportSpec(spec) => {
                out.push(Node::Ident(&spec.imported));
                out.extend(spec.local.iter().map(Node::Ident));
            }
            Node::Key(_) | Node::Ident(_) | Node::Str(_) | Node::Type(_) => {}
        }
        out
    }
}

/// `name(p1,p2)`; constructors use `constructor`, arrows an empty name.
pub fn function_label(function: &Function) -> String {
    let name = match (&function.name, function.kind) {
        (Some(name), _) => name.name.as_str(),
        (None, FunctionKind::Constructor) => "constructor",
        (None, _) => "",
    };
    let params: Vec<&str> = function.params.iter().map(|p| p.name.name.as_str()).collect();
    let arrow = if function.kind == FunctionKind::Arrow { "=>" } else { "" };
    format!("{name}({}){arrow}", params.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span::new(start, end, 1, start as u32 + 1, 1, end as u32 + 1)
    }

    /// Hand-built view of `a + 1;`
    fn sample() -> SyntaxTree {
        let source = Arc::new(SourceFile::new("t.js", "a + 1;"));
        let left = Expr::new(NodeId(0), ExprKind::Identifier("a".into()), span(0, 1));
        let right = Expr::new(
            NodeId(1),
            ExprKind::Number {
                value: 1.0,
                raw: "1".into(),
            },
            span(4, 5),
        );
        let binary = Expr::new(
            NodeId(2),
            ExprKind::Binary {
                op: BinaryOp::Add,
                left: Box::new(left),
                right: Box::new(right),
            },
            span(0, 5),
        );
        let program = Program {
            body: vec![Stmt::new(StmtKind::Expr(binary), span(0, 6))],
            span: span(0, 6),
        };
        let tokens = [
            TokenLeaf {
                kind: SyntaxKind::Identifier,
                span: span(0, 1),
            },
            TokenLeaf {
                kind: SyntaxKind::Punctuation,
                span: span(2, 3),
            },
            TokenLeaf {
                kind: SyntaxKind::NumericLiteral,
                span: span(4, 5),
            },
            TokenLeaf {
                kind: SyntaxKind::Punctuation,
                span: span(5, 6),
            },
        ];
        SyntaxTree::build(source, &program, &tokens)
    }

    #[test]
    fn tokens_are_interleaved() {
        let tree = sample();
        let stmt = &tree.root.children[0];
        assert_eq!(stmt.kind, SyntaxKind::ExpressionStatement);
        assert_eq!(stmt.children.len(), 2);
        assert_eq!(tree.text(&stmt.children[1]), ";");

        let binary = &stmt.children[0];
        assert_eq!(binary.category(), NodeCategory::BinaryOp);
        let texts: Vec<&str> = binary.children.iter().map(|c| tree.text(c)).collect();
        assert_eq!(texts, ["a", "+", "1"]);
    }

    #[test]
    fn descendants_are_preorder() {
        let tree = sample();
        let kinds: Vec<SyntaxKind> = tree.root.descendants().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            [
                SyntaxKind::Program,
                SyntaxKind::ExpressionStatement,
                SyntaxKind::BinaryExpression,
                SyntaxKind::Identifier,
                SyntaxKind::Punctuation,
                SyntaxKind::NumericLiteral,
                SyntaxKind::Punctuation,
            ]
        );
    }

    #[test]
    fn categories() {
        assert_eq!(SyntaxKind::ArrowFunction.category(), NodeCategory::FunctionLike);
        assert_eq!(
            SyntaxKind::PostfixUpdate.category(),
            NodeCategory::UpdateOp { prefix: false }
        );
        assert_eq!(SyntaxKind::StringLiteral.category(), NodeCategory::Literal);
        assert_eq!(SyntaxKind::Keyword.category(), NodeCategory::Other);
        assert!(!SyntaxKind::Block.is_function_like());
    }

    #[test]
    fn labels_ignore_formatting() {
        let param = |name: &str| Param {
            id: NodeId(0),
            name: Ident::synthetic(name),
            type_ann: None,
            default: None,
            span: Span::DUMMY,
        };
        let function = Function {
            id: NodeId(1),
            kind: FunctionKind::Declaration,
            name: Some(Ident::synthetic("f")),
            is_static: false,
            params: vec![param("a"), param("b")],
            return_type: None,
            body: FunctionBody::Block(Block {
                stmts: vec![],
                span: Span::DUMMY,
            }),
            span: Span::DUMMY,
        };
        assert_eq!(function_label(&function), "f(a,b)");

        let arrow = Function {
            kind: FunctionKind::Arrow,
            name: None,
            ..function
        };
        assert_eq!(function_label(&arrow), "(a,b)=>");
    }
}
