//! Type annotation parsing.

use safescript_lexer::TokenKind;
use safescript_types::ast::{TypeAnnotation, TypeKind};
use safescript_types::ErrorCode;

use crate::parser::Parser;

/// Predefined type names that are not reserved words in the lexer.
const TYPE_KEYWORDS: &[&str] = &[
    "number",
    "string",
    "boolean",
    "bigint",
    "symbol",
    "any",
    "unknown",
    "object",
    "undefined",
    "never",
];

impl<'src> Parser<'src> {
    /// Parse an optional `: Type` suffix.
    ///
    /// Returns `Some(None)` when there is no annotation and `None` on a
    /// malformed one.
    pub(crate) fn parse_type_annotation(&mut self) -> Option<Option<TypeAnnotation>> {
        if !self.eat(&TokenKind::Colon) {
            return Some(None);
        }
        Some(Some(self.parse_type()?))
    }

    /// ```ebnf
    /// Type      = [ "|" ] ArrayType { "|" ArrayType } ;
    /// ArrayType = PrimaryType { "[" "]" } ;
    /// PrimaryType = Keyword | Literal | Name [ "<" Type { "," Type } ">" ]
    ///             | "(" Type ")" ;
    /// ```
    pub(crate) fn parse_type(&mut self) -> Option<TypeAnnotation> {
        let start = self.current_span();
        self.eat(&TokenKind::Pipe);
        let first = self.parse_array_type()?;
        if !self.check(&TokenKind::Pipe) {
            return Some(first);
        }
        let mut members = vec![first];
        while self.eat(&TokenKind::Pipe) {
            members.push(self.parse_array_type()?);
        }
        Some(TypeAnnotation::new(
            TypeKind::Union(members),
            self.span_from(start),
        ))
    }

    fn parse_array_type(&mut self) -> Option<TypeAnnotation> {
        let start = self.current_span();
        let mut ty = self.parse_primary_type()?;
        while self.check(&TokenKind::LBracket)
            && matches!(self.look_ahead(1), TokenKind::RBracket)
            && !self.newline_before()
        {
            self.advance();
            self.advance();
            ty = TypeAnnotation::new(TypeKind::Array(Box::new(ty)), self.span_from(start));
        }
        Some(ty)
    }

    fn parse_primary_type(&mut self) -> Option<TypeAnnotation> {
        let start = self.current_span();
        let kind = match self.peek_kind().clone() {
            TokenKind::Identifier(name) if TYPE_KEYWORDS.contains(&name.as_str()) => {
                self.advance();
                TypeKind::Keyword(name)
            }
            TokenKind::Void => {
                self.advance();
                TypeKind::Keyword("void".into())
            }
            TokenKind::Null => {
                self.advance();
                TypeKind::Keyword("null".into())
            }
            TokenKind::Identifier(_) => self.parse_named_type()?,
            TokenKind::Number(_) | TokenKind::String(_) | TokenKind::True | TokenKind::False => {
                let span = self.advance().span;
                TypeKind::Literal(self.source_text(span).to_string())
            }
            TokenKind::Minus if matches!(self.look_ahead(1), TokenKind::Number(_)) => {
                self.advance();
                let span = self.advance().span;
                TypeKind::Literal(format!("-{}", self.source_text(span)))
            }
            TokenKind::LParen => {
                let is_function_type = matches!(self.look_ahead(1), TokenKind::RParen)
                    || (matches!(self.look_ahead(1), TokenKind::Identifier(_))
                        && matches!(
                            self.look_ahead(2),
                            TokenKind::Colon | TokenKind::Comma | TokenKind::Question
                        ));
                if is_function_type {
                    self.unsupported("function type");
                    return None;
                }
                self.advance();
                let inner = self.parse_type()?;
                self.expect(&TokenKind::RParen)?;
                inner.kind
            }
            TokenKind::LBrace => {
                self.unsupported("object type literal");
                return None;
            }
            TokenKind::LBracket => {
                self.unsupported("tuple type");
                return None;
            }
            TokenKind::Typeof => {
                self.unsupported("type query");
                return None;
            }
            other => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected type, got '{other}'"),
                );
                return None;
            }
        };
        Some(TypeAnnotation::new(kind, self.span_from(start)))
    }

    /// `Name[.Name][<Args>]`
    fn parse_named_type(&mut self) -> Option<TypeKind> {
        let mut name = self.expect_identifier()?.name;
        while self.check(&TokenKind::Dot) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_property_name()?.name);
        }
        let mut args = Vec::new();
        if self.eat(&TokenKind::Less) {
            loop {
                args.push(self.parse_type()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            if !self.eat_type_close() {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected '>', got '{}'", self.peek_kind()),
                );
                return None;
            }
        }
        Some(TypeKind::Named { name, args })
    }
}
