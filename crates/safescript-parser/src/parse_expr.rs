//! Expression parsing with full JavaScript operator precedence.
//!
//! Precedence (lowest → highest):
//! 1. `,` (sequence)
//! 2. `=` and compound assignment, arrow functions (right-assoc)
//! 3. `? :` (conditional)
//! 4. binary operators, climbing by [`BinaryOp::precedence`]; `**` is
//!    right-associative
//! 5. prefix unary `+ - ~ ! typeof void delete` and prefix `++ --`
//! 6. postfix `++ --` (no line break before the operator)
//! 7. `.`, `[]`, `()`, `new`

use safescript_lexer::TokenKind;
use safescript_types::ast::*;
use safescript_types::{ErrorCode, Span};

use crate::parser::Parser;

/// What the tokens at the cursor say about an arrow function.
enum ArrowStart {
    No,
    /// `x =>` or `(...) =>`: definitely an arrow.
    Yes,
    /// `(...) :`: an arrow with a return type, or a parenthesized
    /// consequent of a conditional.
    Maybe,
}

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Points
    // ══════════════════════════════════════════════════════════════════════════

    /// `Expr = Assignment { "," Assignment }`
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let first = self.parse_assignment()?;
        if !self.check(&TokenKind::Comma) {
            return Some(first);
        }
        let mut items = vec![first];
        while self.eat(&TokenKind::Comma) {
            items.push(self.parse_assignment()?);
        }
        let id = self.next_id();
        Some(Expr::new(id, ExprKind::Sequence(items), self.span_from(start)))
    }

    /// `Assignment = Arrow | Conditional [ AssignOp Assignment ]`
    pub(crate) fn parse_assignment(&mut self) -> Option<Expr> {
        if !self.enter() {
            return None;
        }
        let result = self.parse_assignment_inner();
        self.leave();
        result
    }

    fn parse_assignment_inner(&mut self) -> Option<Expr> {
        match self.arrow_start() {
            ArrowStart::Yes => return self.parse_arrow(),
            ArrowStart::Maybe => {
                let checkpoint = self.checkpoint();
                if let Some(arrow) = self.parse_arrow() {
                    return Some(arrow);
                }
                self.rewind(checkpoint);
            }
            ArrowStart::No => {}
        }
        if self.check(&TokenKind::Async) {
            self.unsupported("asynchronous code");
            return None;
        }

        let start = self.current_span();
        let target = self.parse_conditional()?;
        let Some(op) = assign_op(self.peek_kind()) else {
            return Some(target);
        };
        if !is_assignment_target(&target) {
            self.error_at(
                ErrorCode::INVALID_ASSIGNMENT_TARGET,
                "invalid left-hand side in assignment",
                target.span,
            );
            return None;
        }
        self.advance();
        let value = self.parse_assignment()?;
        let id = self.next_id();
        Some(Expr::new(
            id,
            ExprKind::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            self.span_from(start),
        ))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Arrow Functions
    // ══════════════════════════════════════════════════════════════════════════

    fn arrow_start(&self) -> ArrowStart {
        match self.peek_kind() {
            TokenKind::Identifier(_) => {
                if matches!(self.look_ahead(1), TokenKind::Arrow) {
                    ArrowStart::Yes
                } else {
                    ArrowStart::No
                }
            }
            TokenKind::LParen => {
                let mut depth = 0usize;
                let mut n = 0;
                loop {
                    match self.look_ahead(n) {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        TokenKind::Eof => return ArrowStart::No,
                        _ => {}
                    }
                    n += 1;
                }
                match self.look_ahead(n + 1) {
                    TokenKind::Arrow => ArrowStart::Yes,
                    TokenKind::Colon => ArrowStart::Maybe,
                    _ => ArrowStart::No,
                }
            }
            _ => ArrowStart::No,
        }
    }

    /// `x => body` or `(params)[: T] => body`
    fn parse_arrow(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let params = if self.check(&TokenKind::LParen) {
            self.parse_params()?
        } else {
            let name = self.expect_identifier()?;
            let id = self.next_id();
            vec![Param {
                id,
                span: name.span,
                name,
                type_ann: None,
                default: None,
            }]
        };
        let return_type = self.parse_type_annotation()?;
        if self.newline_before() {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                "line break before '=>' is not allowed",
            );
            return None;
        }
        self.expect(&TokenKind::Arrow)?;
        let body = if self.check(&TokenKind::LBrace) {
            FunctionBody::Block(self.parse_block()?)
        } else {
            FunctionBody::Expr(Box::new(self.parse_assignment()?))
        };
        let span = self.span_from(start);
        let function = Function {
            id: self.next_id(),
            kind: FunctionKind::Arrow,
            name: None,
            is_static: false,
            params,
            return_type,
            body,
            span,
        };
        let id = self.next_id();
        Some(Expr::new(id, ExprKind::Arrow(Box::new(function)), span))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Operators
    // ══════════════════════════════════════════════════════════════════════════

    /// `Conditional = Binary [ "?" Assignment ":" Assignment ]`
    fn parse_conditional(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let test = self.parse_binary(0)?;
        if !self.eat(&TokenKind::Question) {
            return Some(test);
        }
        let consequent = self.parse_assignment()?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_assignment()?;
        let id = self.next_id();
        Some(Expr::new(
            id,
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            self.span_from(start),
        ))
    }

    /// Precedence climbing over every binary operator.
    fn parse_binary(&mut self, min_prec: u8) -> Option<Expr> {
        let start = self.current_span();
        let mut left = self.parse_unary()?;
        loop {
            if self.check_word("as") && !self.newline_before() {
                self.unsupported("type assertion");
                return None;
            }
            let Some(op) = binary_op(self.peek_kind()) else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();
            let next_min = if op.is_right_associative() { prec } else { prec + 1 };
            let right = self.parse_binary(next_min)?;
            let id = self.next_id();
            left = Expr::new(
                id,
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                self.span_from(start),
            );
        }
        Some(left)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        if !self.enter() {
            return None;
        }
        let result = self.parse_unary_inner();
        self.leave();
        result
    }

    fn parse_unary_inner(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let op = match self.peek_kind() {
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::Delete => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            let id = self.next_id();
            return Some(Expr::new(
                id,
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                self.span_from(start),
            ));
        }

        let update = match self.peek_kind() {
            TokenKind::PlusPlus => Some(UpdateOp::Increment),
            TokenKind::MinusMinus => Some(UpdateOp::Decrement),
            _ => None,
        };
        if let Some(op) = update {
            self.advance();
            let operand = self.parse_unary()?;
            return self.finish_update(op, true, operand, start);
        }

        match self.peek_kind() {
            TokenKind::Await => {
                self.unsupported("asynchronous code");
                None
            }
            TokenKind::Less => {
                self.unsupported("type assertion");
                None
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let expr = self.parse_call_member(true)?;
        if self.newline_before() {
            return Some(expr);
        }
        let op = match self.peek_kind() {
            TokenKind::PlusPlus => UpdateOp::Increment,
            TokenKind::MinusMinus => UpdateOp::Decrement,
            TokenKind::Bang if !matches!(self.look_ahead(1), TokenKind::Eq) => {
                // `x!` parses as a non-null assertion only when nothing
                // that could start an operand follows.
                if matches!(
                    self.look_ahead(1),
                    TokenKind::Dot
                        | TokenKind::RParen
                        | TokenKind::Semicolon
                        | TokenKind::Comma
                        | TokenKind::RBracket
                ) {
                    self.unsupported("non-null assertion");
                    return None;
                }
                return Some(expr);
            }
            _ => return Some(expr),
        };
        self.advance();
        self.finish_update(op, false, expr, start)
    }

    fn finish_update(
        &mut self,
        op: UpdateOp,
        prefix: bool,
        operand: Expr,
        start: Span,
    ) -> Option<Expr> {
        if !is_assignment_target(&operand) {
            self.error_at(
                ErrorCode::INVALID_ASSIGNMENT_TARGET,
                format!("invalid operand for '{}'", op.as_str()),
                operand.span,
            );
            return None;
        }
        let id = self.next_id();
        Some(Expr::new(
            id,
            ExprKind::Update {
                op,
                prefix,
                operand: Box::new(operand),
            },
            self.span_from(start),
        ))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Member Access & Calls
    // ══════════════════════════════════════════════════════════════════════════

    /// Member chains; `allow_call` is `false` for `new` callees and `extends`
    /// clauses.
    pub(crate) fn parse_call_member(&mut self, allow_call: bool) -> Option<Expr> {
        let start = self.current_span();
        let mut expr = if self.check(&TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        loop {
            let kind = match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.expect_property_name()?;
                    ExprKind::Member {
                        object: Box::new(expr),
                        property,
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(&TokenKind::RBracket)?;
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                TokenKind::LParen if allow_call => {
                    let args = self.parse_arguments()?;
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    }
                }
                TokenKind::Question if matches!(self.look_ahead(1), TokenKind::Dot) => {
                    self.unsupported("optional chaining");
                    return None;
                }
                _ => break,
            };
            let id = self.next_id();
            expr = Expr::new(id, kind, self.span_from(start));
        }
        Some(expr)
    }

    /// `new Callee[(args)]`
    fn parse_new(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.expect(&TokenKind::New)?;
        if self.check(&TokenKind::Dot) {
            self.unsupported("new.target");
            return None;
        }
        let callee = self.parse_call_member(false)?;
        let args = if self.check(&TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        let id = self.next_id();
        Some(Expr::new(
            id,
            ExprKind::New {
                callee: Box::new(callee),
                args,
            },
            self.span_from(start),
        ))
    }

    fn parse_arguments(&mut self) -> Option<Vec<Expr>> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.at_end() {
            if self.check(&TokenKind::DotDotDot) {
                self.unsupported("spread argument");
                return None;
            }
            args.push(self.parse_assignment()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Some(args)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    pub(crate) fn parse_primary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let kind = match self.peek_kind().clone() {
            TokenKind::Number(value) => {
                let span = self.advance().span;
                ExprKind::Number {
                    value,
                    raw: self.source_text(span).to_string(),
                }
            }
            TokenKind::BigInt(_) => {
                let span = self.advance().span;
                ExprKind::BigInt(self.source_text(span).to_string())
            }
            TokenKind::String(_) => ExprKind::String(self.parse_str_lit()?),
            TokenKind::True => {
                self.advance();
                ExprKind::Bool(true)
            }
            TokenKind::False => {
                self.advance();
                ExprKind::Bool(false)
            }
            TokenKind::Null => {
                self.advance();
                ExprKind::Null
            }
            TokenKind::This => {
                self.advance();
                ExprKind::This
            }
            TokenKind::Super => {
                self.advance();
                ExprKind::Identifier("super".to_string())
            }
            TokenKind::Identifier(name) => {
                self.advance();
                ExprKind::Identifier(name)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                ExprKind::Paren(Box::new(inner))
            }
            TokenKind::LBracket => self.parse_array()?,
            TokenKind::LBrace => self.parse_object()?,
            TokenKind::Function => {
                let function = self.parse_function(FunctionKind::Expression)?;
                ExprKind::Function(Box::new(function))
            }
            TokenKind::Class => {
                self.unsupported("class expression");
                return None;
            }
            TokenKind::Slash | TokenKind::SlashEq => {
                self.unsupported("regular expression literal");
                return None;
            }
            other => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected expression, got '{other}'"),
                );
                return None;
            }
        };
        let id = self.next_id();
        Some(Expr::new(id, kind, self.span_from(start)))
    }

    /// `[a, b, c]`
    fn parse_array(&mut self) -> Option<ExprKind> {
        self.expect(&TokenKind::LBracket)?;
        let mut items = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.at_end() {
            match self.peek_kind() {
                TokenKind::Comma => {
                    self.unsupported("array hole");
                    return None;
                }
                TokenKind::DotDotDot => {
                    self.unsupported("spread element");
                    return None;
                }
                _ => {}
            }
            items.push(self.parse_assignment()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Some(ExprKind::Array(items))
    }

    /// `{ key: value, short, method() { } }`
    fn parse_object(&mut self) -> Option<ExprKind> {
        self.expect(&TokenKind::LBrace)?;
        let mut props = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            props.push(self.parse_property()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Some(ExprKind::Object(props))
    }

    fn parse_property(&mut self) -> Option<Property> {
        let start = self.current_span();
        match self.peek_kind() {
            TokenKind::DotDotDot => {
                self.unsupported("object spread");
                return None;
            }
            TokenKind::LBracket => {
                self.unsupported("computed property name");
                return None;
            }
            TokenKind::Identifier(w)
                if (w == "get" || w == "set")
                    && !matches!(
                        self.look_ahead(1),
                        TokenKind::Colon | TokenKind::Comma | TokenKind::RBrace | TokenKind::LParen
                    ) =>
            {
                self.unsupported("accessor");
                return None;
            }
            _ => {}
        }

        let key = match self.peek_kind().clone() {
            TokenKind::String(_) => PropertyKey::String(self.parse_str_lit()?),
            TokenKind::Number(_) => {
                let span = self.advance().span;
                PropertyKey::Number {
                    raw: self.source_text(span).to_string(),
                    span,
                }
            }
            _ => PropertyKey::Ident(self.expect_property_name()?),
        };

        if self.check(&TokenKind::LParen) {
            let PropertyKey::Ident(name) = &key else {
                self.unsupported("method with a literal name");
                return None;
            };
            let function =
                self.parse_function_rest(start, FunctionKind::Method, Some(name.clone()), false)?;
            let span = function.span;
            let id = self.next_id();
            let value = Expr::new(id, ExprKind::Function(Box::new(function)), span);
            return Some(Property {
                key,
                value,
                shorthand: false,
                method: true,
                span,
            });
        }

        if self.eat(&TokenKind::Colon) {
            let value = self.parse_assignment()?;
            return Some(Property {
                key,
                value,
                shorthand: false,
                method: false,
                span: self.span_from(start),
            });
        }

        match &key {
            PropertyKey::Ident(name) => {
                let id = self.next_id();
                let value = Expr::new(id, ExprKind::Identifier(name.name.clone()), name.span);
                Some(Property {
                    key,
                    value,
                    shorthand: true,
                    method: false,
                    span: self.span_from(start),
                })
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected ':', got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Operator Tables
// ══════════════════════════════════════════════════════════════════════════════

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::StarStar => BinaryOp::Exp,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::BangEq => BinaryOp::NotEq,
        TokenKind::EqEqEq => BinaryOp::StrictEq,
        TokenKind::BangEqEq => BinaryOp::StrictNotEq,
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::LessEq => BinaryOp::LtEq,
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::GreaterEq => BinaryOp::GtEq,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::UShr => BinaryOp::UShr,
        TokenKind::AmpAmp => BinaryOp::LogicalAnd,
        TokenKind::PipePipe => BinaryOp::LogicalOr,
        TokenKind::QuestionQuestion => BinaryOp::Nullish,
        TokenKind::InstanceOf => BinaryOp::InstanceOf,
        TokenKind::In => BinaryOp::In,
        _ => return None,
    })
}

fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::AddAssign,
        TokenKind::MinusEq => AssignOp::SubAssign,
        TokenKind::StarEq => AssignOp::MulAssign,
        TokenKind::SlashEq => AssignOp::DivAssign,
        TokenKind::PercentEq => AssignOp::ModAssign,
        TokenKind::StarStarEq => AssignOp::ExpAssign,
        TokenKind::ShlEq => AssignOp::ShlAssign,
        TokenKind::ShrEq => AssignOp::ShrAssign,
        TokenKind::UShrEq => AssignOp::UShrAssign,
        TokenKind::AmpEq => AssignOp::BitAndAssign,
        TokenKind::PipeEq => AssignOp::BitOrAssign,
        TokenKind::CaretEq => AssignOp::BitXorAssign,
        TokenKind::AmpAmpEq => AssignOp::AndAssign,
        TokenKind::PipePipeEq => AssignOp::OrAssign,
        TokenKind::QuestionQuestionEq => AssignOp::NullishAssign,
        _ => return None,
    })
}

/// Identifiers, member and index accesses, possibly parenthesized.
fn is_assignment_target(expr: &Expr) -> bool {
    matches!(
        expr.unparenthesized().kind,
        ExprKind::Identifier(_) | ExprKind::Member { .. } | ExprKind::Index { .. }
    )
}
