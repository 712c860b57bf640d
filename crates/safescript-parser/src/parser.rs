//! Core parser infrastructure: token cursor, error reporting, helpers.

use std::sync::Arc;

use safescript_lexer::{syntax_leaves, Lexer, Token, TokenKind};
use safescript_types::ast::{Ident, NodeId, Program};
use safescript_types::syntax::SyntaxTree;
use safescript_types::{CompileErrors, ErrorCode, SafeScriptError, SourceFile, Span, MAX_ERRORS};

/// Expression nesting beyond this depth is rejected instead of risking the
/// stack.
const MAX_NESTING: u32 = 256;

/// The SafeScript parser.
///
/// Consumes a token stream produced by the lexer and builds an AST.
/// Collects errors and attempts recovery at statement boundaries.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source_file: &'src SourceFile,
    errors: CompileErrors,
    next_id: u32,
    pub(crate) depth: u32,
}

/// Result of parsing.
pub struct ParseResult {
    pub program: Option<Program>,
    /// The token stream the program was parsed from.
    pub tokens: Vec<Token>,
    /// Lexer and parser errors.
    pub errors: CompileErrors,
}

impl ParseResult {
    /// The generic syntax view of the parsed program.
    pub fn syntax_tree(&self, source: Arc<SourceFile>) -> Option<SyntaxTree> {
        let program = self.program.as_ref()?;
        Some(SyntaxTree::build(source, program, &syntax_leaves(&self.tokens)))
    }
}

/// Lex and parse a whole source file.
pub fn parse_source(source_file: &SourceFile) -> ParseResult {
    let lexed = Lexer::new(source_file).lex();
    let mut result = Parser::new(lexed.tokens, source_file).parse();
    let mut errors = lexed.errors;
    errors.extend(result.errors);
    result.errors = errors;
    result
}

/// Saved cursor state for speculative parsing.
pub(crate) struct Checkpoint {
    pos: usize,
    errors: CompileErrors,
    next_id: u32,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        let mut tokens = tokens;
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let end = source_file.source.len();
            let (line, col) = source_file.position(end);
            tokens.push(Token::new(
                TokenKind::Eof,
                Span::point(end, line + 1, col + 1),
                true,
            ));
        }
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: CompileErrors::empty(),
            next_id: 0,
            depth: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Span of the previously consumed token.
    pub(crate) fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1) {
            Some(idx) => self.tokens[idx].span,
            None => self.current_span(),
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Span from `start` up to the end of the previously consumed token.
    pub(crate) fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous_span())
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Look ahead by `n` tokens from the current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    /// `true` if the current token is the contextual word `word`.
    pub(crate) fn check_word(&self, word: &str) -> bool {
        matches!(self.peek_kind(), TokenKind::Identifier(name) if name == word)
    }

    /// `true` if a line break precedes the current token.
    pub(crate) fn newline_before(&self) -> bool {
        self.peek().newline_before
    }

    /// Fresh node identity.
    pub(crate) fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn source_text(&self, span: Span) -> &'src str {
        self.source_file.slice(span)
    }

    /// Consume one `>` closing a type argument list, splitting `>>`, `>>>`
    /// and `>=` tokens in place.
    pub(crate) fn eat_type_close(&mut self) -> bool {
        let rest = match self.peek_kind() {
            TokenKind::Greater => return self.eat(&TokenKind::Greater),
            TokenKind::Shr => TokenKind::Greater,
            TokenKind::UShr => TokenKind::Shr,
            TokenKind::GreaterEq => TokenKind::Eq,
            TokenKind::ShrEq => TokenKind::GreaterEq,
            _ => return false,
        };
        let span = self.current_span();
        let first = Span::new(
            span.start,
            span.start + 1,
            span.start_line,
            span.start_col,
            span.start_line,
            span.start_col + 1,
        );
        let second = Span::new(
            span.start + 1,
            span.end,
            span.start_line,
            span.start_col + 1,
            span.end_line,
            span.end_col,
        );
        let newline_before = self.newline_before();
        self.tokens[self.pos] = Token::new(TokenKind::Greater, first, newline_before);
        self.tokens.insert(self.pos + 1, Token::new(rest, second, false));
        self.advance();
        true
    }

    // ── Speculation ───────────────────────────────────────────────────────────

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            errors: self.errors.clone(),
            next_id: self.next_id,
        }
    }

    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.errors = checkpoint.errors;
        self.next_id = checkpoint.next_id;
    }

    // ── Automatic Semicolon Insertion ─────────────────────────────────────────

    /// Consume a statement terminator: an explicit `;`, or an implied one
    /// before `}`, at end of file, or after a line break.
    pub(crate) fn consume_semicolon(&mut self) {
        if self.eat(&TokenKind::Semicolon) {
            return;
        }
        if self.check(&TokenKind::RBrace) || self.at_end() || self.newline_before() {
            return;
        }
        self.error_at_current(
            ErrorCode::UNEXPECTED_TOKEN,
            format!("expected ';', got '{}'", self.peek_kind()),
        );
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind. Returns the token if matched, or emits an error.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Option<Token> {
        if self.check(expected) {
            Some(self.advance())
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected '{}', got '{}'", expected, self.peek_kind()),
            );
            None
        }
    }

    /// Expect a binding identifier.
    pub(crate) fn expect_identifier(&mut self) -> Option<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Some(Ident::new(name, span))
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected identifier, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    /// Expect a property name: an identifier or any reserved word, as in
    /// `obj.default` or `{ new: 1 }`.
    pub(crate) fn expect_property_name(&mut self) -> Option<Ident> {
        let kind = self.peek_kind().clone();
        match &kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Some(Ident::new(name, span))
            }
            _ if kind.is_keyword() => {
                let span = self.advance().span;
                Some(Ident::new(kind.to_string(), span))
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected property name, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self
            .source_file
            .line(span.start_line)
            .unwrap_or("")
            .to_string();
        let error = SafeScriptError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push_error(error);
    }

    /// Report syntax this parser deliberately does not handle.
    pub(crate) fn unsupported(&mut self, what: &str) {
        self.error_at_current(
            ErrorCode::UNSUPPORTED_SYNTAX,
            format!("{what} is not supported"),
        );
    }

    /// Returns `true` if we've hit the error limit and should stop.
    pub(crate) fn too_many_errors(&self) -> bool {
        self.errors.total_errors >= MAX_ERRORS
    }

    /// Enter one level of expression nesting; `false` if too deep.
    pub(crate) fn enter(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            self.error_at_current(
                ErrorCode::UNSUPPORTED_SYNTAX,
                format!("expression nesting deeper than {MAX_NESTING} levels"),
            );
            self.depth -= 1;
            return false;
        }
        true
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    // ── Synchronization ───────────────────────────────────────────────────────

    /// Skip tokens until a statement boundary, stepping over balanced
    /// `{ ... }` groups so a closing brace of the enclosing block is kept.
    pub(crate) fn synchronize(&mut self) {
        let start = self.pos;
        let mut depth = 0usize;
        while !self.at_end() {
            match self.peek_kind() {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace if depth == 0 => return,
                TokenKind::RBrace => depth -= 1,
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::Var
                | TokenKind::Let
                | TokenKind::Const
                | TokenKind::Function
                | TokenKind::Class
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::Import
                | TokenKind::Export
                    if depth == 0 && self.pos > start =>
                {
                    return
                }
                _ if depth == 0 && self.pos > start && self.newline_before() => return,
                _ => {}
            }
            self.advance();
        }
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a `Program` AST.
    pub fn parse(mut self) -> ParseResult {
        let program = self.parse_program();
        ParseResult {
            program: Some(program),
            tokens: self.tokens,
            errors: self.errors,
        }
    }
}
