//! Statement and declaration parsing.

use safescript_lexer::TokenKind;
use safescript_types::ast::*;
use safescript_types::{ErrorCode, Span};

use crate::parser::Parser;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Program & Blocks
    // ══════════════════════════════════════════════════════════════════════════

    pub(crate) fn parse_program(&mut self) -> Program {
        let mut body = Vec::new();
        while !self.at_end() && !self.too_many_errors() {
            let before = self.peek().span.start;
            match self.parse_statement() {
                Some(stmt) => body.push(stmt),
                None => self.synchronize(),
            }
            if self.peek().span.start == before && !self.at_end() {
                self.advance();
            }
        }
        let end = self.current_span();
        let start = Span::new(0, 0, 1, 1, 1, 1);
        Program {
            body,
            span: start.merge(end),
        }
    }

    /// `{ stmts... }`
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() && !self.too_many_errors() {
            let before = self.peek().span.start;
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize(),
            }
            if self.peek().span.start == before && !self.at_end() {
                self.advance();
            }
        }
        if !self.eat(&TokenKind::RBrace) {
            self.error_at(ErrorCode::UNCLOSED_BRACE, "unclosed '{'", start);
            return None;
        }
        Some(Block {
            stmts,
            span: self.span_from(start),
        })
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════════

    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        let kind = match self.peek_kind() {
            TokenKind::LBrace => StmtKind::Block(self.parse_block()?),
            TokenKind::Semicolon => {
                self.advance();
                StmtKind::Empty
            }
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                let decl = self.parse_var_decl()?;
                self.consume_semicolon();
                StmtKind::Var(decl)
            }
            TokenKind::Function => {
                StmtKind::Function(self.parse_function(FunctionKind::Declaration)?)
            }
            TokenKind::Class => StmtKind::Class(self.parse_class()?),
            TokenKind::If => self.parse_if()?,
            TokenKind::While => {
                self.advance();
                let condition = self.parse_paren_condition()?;
                let body = Box::new(self.parse_statement()?);
                StmtKind::While(WhileStmt { condition, body })
            }
            TokenKind::Do => {
                self.advance();
                let body = Box::new(self.parse_statement()?);
                self.expect(&TokenKind::While)?;
                let condition = self.parse_paren_condition()?;
                self.eat(&TokenKind::Semicolon);
                StmtKind::DoWhile(WhileStmt { condition, body })
            }
            TokenKind::For => self.parse_for()?,
            TokenKind::Switch => self.parse_switch()?,
            TokenKind::Try => self.parse_try()?,
            TokenKind::Return => {
                self.advance();
                let value = if self.at_statement_end() {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.consume_semicolon();
                StmtKind::Return(value)
            }
            TokenKind::Throw => {
                self.advance();
                let value = self.parse_expression()?;
                self.consume_semicolon();
                StmtKind::Throw(value)
            }
            TokenKind::Break | TokenKind::Continue => {
                let is_break = self.check(&TokenKind::Break);
                self.advance();
                if matches!(self.peek_kind(), TokenKind::Identifier(_)) && !self.newline_before() {
                    self.unsupported("labelled jump");
                    return None;
                }
                self.consume_semicolon();
                if is_break {
                    StmtKind::Break
                } else {
                    StmtKind::Continue
                }
            }
            TokenKind::Import => self.parse_import()?,
            TokenKind::Export => self.parse_export()?,
            TokenKind::Async | TokenKind::Await | TokenKind::Yield => {
                self.unsupported("asynchronous code");
                return None;
            }
            TokenKind::Identifier(word)
                if matches!(word.as_str(), "interface" | "enum" | "declare" | "namespace")
                    || (word == "type"
                        && matches!(self.look_ahead(1), TokenKind::Identifier(_))) =>
            {
                let what = format!("a TypeScript '{word}' declaration");
                self.unsupported(&what);
                return None;
            }
            _ => {
                let expr = self.parse_expression()?;
                self.consume_semicolon();
                StmtKind::Expr(expr)
            }
        };
        Some(Stmt::new(kind, self.span_from(start)))
    }

    /// `true` where automatic semicolon insertion ends a statement early.
    fn at_statement_end(&self) -> bool {
        self.check(&TokenKind::Semicolon)
            || self.check(&TokenKind::RBrace)
            || self.at_end()
            || self.newline_before()
    }

    /// `( expr )`
    fn parse_paren_condition(&mut self) -> Option<Expr> {
        self.expect(&TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Some(condition)
    }

    fn parse_if(&mut self) -> Option<StmtKind> {
        self.advance();
        let condition = self.parse_paren_condition()?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Some(StmtKind::If(IfStmt {
            condition,
            then_branch,
            else_branch,
        }))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Variables
    // ══════════════════════════════════════════════════════════════════════════

    fn var_kind(&mut self) -> Option<VarKind> {
        let kind = match self.peek_kind() {
            TokenKind::Var => VarKind::Var,
            TokenKind::Let => VarKind::Let,
            TokenKind::Const => VarKind::Const,
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected 'var', 'let' or 'const', got '{}'", self.peek_kind()),
                );
                return None;
            }
        };
        self.advance();
        Some(kind)
    }

    /// `let a: T = init, b`
    pub(crate) fn parse_var_decl(&mut self) -> Option<VarDecl> {
        let start = self.current_span();
        let kind = self.var_kind()?;
        let mut declarators = vec![self.parse_declarator()?];
        while self.eat(&TokenKind::Comma) {
            declarators.push(self.parse_declarator()?);
        }
        Some(VarDecl {
            kind,
            declarators,
            span: self.span_from(start),
        })
    }

    fn parse_declarator(&mut self) -> Option<VarDeclarator> {
        if matches!(self.peek_kind(), TokenKind::LBrace | TokenKind::LBracket) {
            self.unsupported("destructuring");
            return None;
        }
        let name = self.expect_identifier()?;
        let type_ann = self.parse_type_annotation()?;
        let init = if self.eat(&TokenKind::Eq) {
            Some(self.parse_assignment()?)
        } else {
            None
        };
        let id = self.next_id();
        Some(VarDeclarator {
            id,
            span: self.span_from(name.span),
            name,
            type_ann,
            init,
        })
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Loops & Switch & Try
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_for(&mut self) -> Option<StmtKind> {
        self.advance();
        if self.check(&TokenKind::Await) {
            self.unsupported("for await");
            return None;
        }
        self.expect(&TokenKind::LParen)?;

        let init = match self.peek_kind() {
            TokenKind::Semicolon => None,
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                let is_each = matches!(self.look_ahead(1), TokenKind::Identifier(_))
                    && self.is_for_each_keyword(self.look_ahead(2));
                if is_each {
                    let start = self.current_span();
                    let kind = self.var_kind()?;
                    let name = self.expect_identifier()?;
                    let id = self.next_id();
                    let declarator = VarDeclarator {
                        id,
                        span: name.span,
                        name,
                        type_ann: None,
                        init: None,
                    };
                    let decl = VarDecl {
                        kind,
                        declarators: vec![declarator],
                        span: self.span_from(start),
                    };
                    return self.parse_for_each(ForInit::Var(decl));
                }
                Some(ForInit::Var(self.parse_var_decl()?))
            }
            TokenKind::Identifier(_) if self.is_for_each_keyword(self.look_ahead(1)) => {
                let target = self.parse_primary()?;
                return self.parse_for_each(ForInit::Expr(target));
            }
            _ => Some(ForInit::Expr(self.parse_expression()?)),
        };
        self.expect(&TokenKind::Semicolon)?;
        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon)?;
        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Some(StmtKind::For(ForStmt {
            init,
            test,
            update,
            body,
        }))
    }

    fn is_for_each_keyword(&self, kind: &TokenKind) -> bool {
        matches!(kind, TokenKind::In) || matches!(kind, TokenKind::Identifier(w) if w == "of")
    }

    /// After the left side of `for (left of|in iterable) body`.
    fn parse_for_each(&mut self, left: ForInit) -> Option<StmtKind> {
        let is_of = !self.check(&TokenKind::In);
        self.advance();
        let iterable = if is_of {
            self.parse_assignment()?
        } else {
            self.parse_expression()?
        };
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Some(StmtKind::ForEach(ForEachStmt {
            left,
            is_of,
            iterable,
            body,
        }))
    }

    fn parse_switch(&mut self) -> Option<StmtKind> {
        self.advance();
        let discriminant = self.parse_paren_condition()?;
        let open = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        let mut cases = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            let start = self.current_span();
            let test = if self.eat(&TokenKind::Default) {
                None
            } else {
                self.expect(&TokenKind::Case)?;
                Some(self.parse_expression()?)
            };
            self.expect(&TokenKind::Colon)?;
            let mut body = Vec::new();
            while !matches!(
                self.peek_kind(),
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
            ) {
                match self.parse_statement() {
                    Some(stmt) => body.push(stmt),
                    None => return None,
                }
            }
            cases.push(SwitchCase {
                test,
                body,
                span: self.span_from(start),
            });
        }
        if !self.eat(&TokenKind::RBrace) {
            self.error_at(ErrorCode::UNCLOSED_BRACE, "unclosed '{'", open);
            return None;
        }
        Some(StmtKind::Switch(SwitchStmt {
            discriminant,
            cases,
        }))
    }

    fn parse_try(&mut self) -> Option<StmtKind> {
        self.advance();
        let block = self.parse_block()?;
        let mut param = None;
        let mut handler = None;
        if self.eat(&TokenKind::Catch) {
            if self.eat(&TokenKind::LParen) {
                param = Some(self.expect_identifier()?);
                // `catch (e: unknown)`
                self.parse_type_annotation()?;
                self.expect(&TokenKind::RParen)?;
            }
            handler = Some(self.parse_block()?);
        }
        let finalizer = if self.eat(&TokenKind::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                "expected 'catch' or 'finally' after try block",
            );
            return None;
        }
        Some(StmtKind::Try(TryStmt {
            block,
            param,
            handler,
            finalizer,
        }))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Functions & Classes
    // ══════════════════════════════════════════════════════════════════════════

    /// `function [name](params)[: T] { body }`
    ///
    /// The name is required for declarations and optional for expressions.
    pub(crate) fn parse_function(&mut self, kind: FunctionKind) -> Option<Function> {
        let start = self.current_span();
        self.expect(&TokenKind::Function)?;
        if self.check(&TokenKind::Star) {
            self.unsupported("generator function");
            return None;
        }
        let name = match (kind, self.peek_kind()) {
            (FunctionKind::Declaration, _) => Some(self.expect_identifier()?),
            (_, TokenKind::Identifier(_)) => Some(self.expect_identifier()?),
            _ => None,
        };
        self.parse_function_rest(start, kind, name, false)
    }

    /// Parameters, return type and block body of a function or method.
    pub(crate) fn parse_function_rest(
        &mut self,
        start: Span,
        kind: FunctionKind,
        name: Option<Ident>,
        is_static: bool,
    ) -> Option<Function> {
        if self.check(&TokenKind::Less) {
            self.unsupported("generic type parameters");
            return None;
        }
        let params = self.parse_params()?;
        let return_type = self.parse_type_annotation()?;
        let body = FunctionBody::Block(self.parse_block()?);
        let id = self.next_id();
        Some(Function {
            id,
            kind,
            name,
            is_static,
            params,
            return_type,
            body,
            span: self.span_from(start),
        })
    }

    /// `( name[?][: T][= default], ... )`
    pub(crate) fn parse_params(&mut self) -> Option<Vec<Param>> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.at_end() {
            params.push(self.parse_param()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Some(params)
    }

    fn parse_param(&mut self) -> Option<Param> {
        match self.peek_kind() {
            TokenKind::DotDotDot => {
                self.unsupported("rest parameter");
                return None;
            }
            TokenKind::LBrace | TokenKind::LBracket => {
                self.unsupported("destructuring");
                return None;
            }
            TokenKind::Identifier(word)
                if matches!(
                    word.as_str(),
                    "public" | "private" | "protected" | "readonly"
                ) && matches!(self.look_ahead(1), TokenKind::Identifier(_)) =>
            {
                self.unsupported("parameter property");
                return None;
            }
            _ => {}
        }
        let name = self.expect_identifier()?;
        self.eat(&TokenKind::Question);
        let type_ann = self.parse_type_annotation()?;
        let default = if self.eat(&TokenKind::Eq) {
            Some(self.parse_assignment()?)
        } else {
            None
        };
        let id = self.next_id();
        Some(Param {
            id,
            span: self.span_from(name.span),
            name,
            type_ann,
            default,
        })
    }

    /// `class Name [extends Base] { members }`
    pub(crate) fn parse_class(&mut self) -> Option<ClassDecl> {
        let start = self.current_span();
        self.expect(&TokenKind::Class)?;
        let name = self.expect_identifier()?;
        if self.check(&TokenKind::Less) {
            self.unsupported("generic type parameters");
            return None;
        }
        let extends = if self.eat(&TokenKind::Extends) {
            Some(self.parse_call_member(false)?)
        } else {
            None
        };
        if self.check_word("implements") {
            self.unsupported("'implements' clause");
            return None;
        }
        let open = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() && !self.too_many_errors() {
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            match self.parse_class_member() {
                Some(member) => members.push(member),
                None => self.synchronize(),
            }
        }
        if !self.eat(&TokenKind::RBrace) {
            self.error_at(ErrorCode::UNCLOSED_BRACE, "unclosed '{'", open);
            return None;
        }
        Some(ClassDecl {
            name,
            extends,
            members,
            span: self.span_from(start),
        })
    }

    fn parse_class_member(&mut self) -> Option<ClassMember> {
        let start = self.current_span();
        let mut is_static = false;
        loop {
            let is_modifier = match self.peek_kind() {
                TokenKind::Identifier(word) => matches!(
                    word.as_str(),
                    "static" | "public" | "private" | "protected" | "readonly" | "abstract"
                        | "override"
                ),
                _ => false,
            };
            // A modifier word followed by `(`, `=`, `;` or `:` is itself the
            // member name.
            let names_member = matches!(
                self.look_ahead(1),
                TokenKind::LParen
                    | TokenKind::Eq
                    | TokenKind::Semicolon
                    | TokenKind::Colon
                    | TokenKind::Question
            );
            if !is_modifier || names_member {
                break;
            }
            if self.check_word("static") {
                is_static = true;
            }
            self.advance();
        }

        if matches!(self.peek_kind(), TokenKind::Identifier(w) if w == "get" || w == "set")
            && !matches!(self.look_ahead(1), TokenKind::LParen | TokenKind::Eq | TokenKind::Colon)
        {
            self.unsupported("accessor");
            return None;
        }

        let name = self.expect_property_name()?;
        if self.check(&TokenKind::LParen) || self.check(&TokenKind::Less) {
            let (kind, name) = if name.name == "constructor" && !is_static {
                (FunctionKind::Constructor, None)
            } else {
                (FunctionKind::Method, Some(name))
            };
            let function = self.parse_function_rest(start, kind, name, is_static)?;
            return Some(ClassMember::Method(function));
        }

        self.eat(&TokenKind::Question);
        let type_ann = self.parse_type_annotation()?;
        let value = if self.eat(&TokenKind::Eq) {
            Some(self.parse_assignment()?)
        } else {
            None
        };
        self.consume_semicolon();
        let id = self.next_id();
        Some(ClassMember::Property(PropertyDecl {
            id,
            name,
            is_static,
            type_ann,
            value,
            span: self.span_from(start),
        }))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Modules
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_import(&mut self) -> Option<StmtKind> {
        self.advance();
        if self.check(&TokenKind::LParen) || self.check(&TokenKind::Dot) {
            self.unsupported("dynamic import");
            return None;
        }
        if self.check_word("type") && !matches!(self.look_ahead(1), TokenKind::Identifier(w) if w == "from")
        {
            self.unsupported("type-only import");
            return None;
        }

        if let TokenKind::String(_) = self.peek_kind() {
            let source = self.parse_str_lit()?;
            self.consume_semicolon();
            return Some(StmtKind::Import(ImportDecl::side_effect(source)));
        }

        let mut default = None;
        let mut namespace = None;
        let mut named = Vec::new();
        if matches!(self.peek_kind(), TokenKind::Identifier(_)) {
            default = Some(self.expect_identifier()?);
            if !self.eat(&TokenKind::Comma) {
                return self.finish_import(default, namespace, named);
            }
        }
        if self.eat(&TokenKind::Star) {
            if !self.check_word("as") {
                self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, "expected 'as'");
                return None;
            }
            self.advance();
            namespace = Some(self.expect_identifier()?);
        } else {
            self.expect(&TokenKind::LBrace)?;
            while !self.check(&TokenKind::RBrace) && !self.at_end() {
                let imported = self.expect_property_name()?;
                let local = if self.check_word("as") {
                    self.advance();
                    Some(self.expect_identifier()?)
                } else {
                    None
                };
                named.push(ImportSpecifier { imported, local });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RBrace)?;
        }
        self.finish_import(default, namespace, named)
    }

    fn finish_import(
        &mut self,
        default: Option<Ident>,
        namespace: Option<Ident>,
        named: Vec<ImportSpecifier>,
    ) -> Option<StmtKind> {
        if !self.check_word("from") {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected 'from', got '{}'", self.peek_kind()),
            );
            return None;
        }
        self.advance();
        let source = self.parse_str_lit()?;
        self.consume_semicolon();
        Some(StmtKind::Import(ImportDecl {
            default,
            namespace,
            named,
            source,
        }))
    }

    pub(crate) fn parse_str_lit(&mut self) -> Option<StrLit> {
        match self.peek_kind().clone() {
            TokenKind::String(value) => {
                let span = self.advance().span;
                Some(StrLit {
                    value,
                    raw: self.source_text(span).to_string(),
                    span,
                })
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected string literal, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    fn parse_export(&mut self) -> Option<StmtKind> {
        self.advance();
        if self.eat(&TokenKind::Default) {
            let inner_start = self.current_span();
            let kind = match self.peek_kind() {
                TokenKind::Function => {
                    StmtKind::Function(self.parse_function(FunctionKind::Declaration)?)
                }
                TokenKind::Class => StmtKind::Class(self.parse_class()?),
                _ => {
                    let expr = self.parse_assignment()?;
                    self.consume_semicolon();
                    StmtKind::Expr(expr)
                }
            };
            let stmt = Stmt::new(kind, self.span_from(inner_start));
            return Some(StmtKind::Export {
                is_default: true,
                stmt: Box::new(stmt),
            });
        }
        match self.peek_kind() {
            TokenKind::Var
            | TokenKind::Let
            | TokenKind::Const
            | TokenKind::Function
            | TokenKind::Class => {
                let stmt = self.parse_statement()?;
                Some(StmtKind::Export {
                    is_default: false,
                    stmt: Box::new(stmt),
                })
            }
            _ => {
                self.unsupported("this export form");
                None
            }
        }
    }
}
