//! Core SafeScript lexer: converts source text to a token stream.
//!
//! Features:
//! - Identifiers, reserved words, and every punctuator up to `>>>=`
//! - Numeric literals: decimal, exponent, hex/octal/binary, `_` separators,
//!   and the bigint `n` suffix
//! - Single- and double-quoted strings with escapes
//! - `//` and `/* */` comments skipped
//! - `newline_before` on every token for automatic semicolon insertion
//! - Error recovery: collects up to 20 errors instead of stopping at the first

use safescript_types::{CompileErrors, ErrorCode, SafeScriptError, SourceFile, Span, MAX_ERRORS};

use crate::token::{Token, TokenKind};

/// The SafeScript lexer.
pub struct Lexer<'src> {
    source: &'src [u8],
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based, in characters).
    col: u32,
    /// A line terminator was skipped since the last token.
    saw_newline: bool,
    errors: CompileErrors,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    pub errors: CompileErrors,
}

/// Position snapshot taken at the start of a token.
#[derive(Clone, Copy)]
struct Mark {
    pos: usize,
    line: u32,
    col: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            saw_newline: false,
            errors: CompileErrors::empty(),
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();
        loop {
            if self.errors.total_errors >= MAX_ERRORS {
                break;
            }
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let mark = self.mark();
            tokens.push(Token::new(TokenKind::Eof, self.span_from(mark), true));
        }

        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else if ch & 0xC0 != 0x80 {
            // UTF-8 continuation bytes don't start a new column.
            self.col += 1;
        }
        Some(ch)
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            col: self.col,
        }
    }

    fn span_from(&self, mark: Mark) -> Span {
        Span::new(mark.pos, self.pos, mark.line, mark.col, self.line, self.col)
    }

    fn text_from(&self, mark: Mark) -> &'src str {
        let bytes: &'src [u8] = self.source;
        std::str::from_utf8(&bytes[mark.pos..self.pos]).unwrap_or("")
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("").to_string();
        let err = SafeScriptError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push_error(err);
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip whitespace and comments, noting any line terminator crossed.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b'\n') => {
                    self.saw_newline = true;
                    self.advance();
                }
                Some(b' ' | b'\t' | b'\r' | 0x0B | 0x0C) => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(ch) = self.peek() {
                        if ch == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => self.skip_block_comment(),
                // Byte order mark.
                Some(0xEF) if self.peek_at(1) == Some(0xBB) && self.peek_at(2) == Some(0xBF) => {
                    self.pos += 3;
                }
                _ => break,
            }
        }
    }

    fn skip_block_comment(&mut self) {
        let mark = self.mark();
        self.advance();
        self.advance();
        loop {
            match self.peek() {
                None => {
                    let span = self.span_from(mark);
                    self.emit_error(
                        ErrorCode::UNEXPECTED_CHARACTER,
                        "Unterminated block comment",
                        span,
                    );
                    return;
                }
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.advance();
                    self.advance();
                    return;
                }
                Some(b'\n') => {
                    self.saw_newline = true;
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Token scanning
    // ─────────────────────────────────────────────────────────────

    fn next_token(&mut self) -> Token {
        loop {
            self.skip_trivia();
            let newline_before = std::mem::take(&mut self.saw_newline);
            let mark = self.mark();
            if let Some(kind) = self.scan(mark) {
                return Token::new(kind, self.span_from(mark), newline_before);
            }
            // An unrecognised character was skipped; keep any newline seen.
            self.saw_newline |= newline_before;
            if self.errors.total_errors >= MAX_ERRORS {
                let mark = self.mark();
                return Token::new(TokenKind::Eof, self.span_from(mark), true);
            }
        }
    }

    /// Scan one token starting at `mark`; `None` after an error was reported
    /// and the offending character skipped.
    fn scan(&mut self, mark: Mark) -> Option<TokenKind> {
        let Some(ch) = self.advance() else {
            return Some(TokenKind::Eof);
        };

        let kind = match ch {
            b'"' | b'\'' => self.scan_string(mark, ch),
            b'0'..=b'9' => self.scan_number(mark, ch),
            b'.' if matches!(self.peek(), Some(b'0'..=b'9')) => self.scan_number(mark, ch),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' | 0x80..=0xFF => self.scan_identifier(mark),
            b'`' => {
                self.skip_template();
                let span = self.span_from(mark);
                self.emit_error(
                    ErrorCode::UNSUPPORTED_SYNTAX,
                    "Template literals are not supported",
                    span,
                );
                return None;
            }

            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b';' => TokenKind::Semicolon,
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            b'~' => TokenKind::Tilde,
            b'.' => {
                if self.peek() == Some(b'.') && self.peek_at(1) == Some(b'.') {
                    self.advance();
                    self.advance();
                    TokenKind::DotDotDot
                } else {
                    TokenKind::Dot
                }
            }
            b'?' => {
                if self.eat(b'?') {
                    if self.eat(b'=') {
                        TokenKind::QuestionQuestionEq
                    } else {
                        TokenKind::QuestionQuestion
                    }
                } else {
                    TokenKind::Question
                }
            }
            b'=' => {
                if self.eat(b'>') {
                    TokenKind::Arrow
                } else if self.eat(b'=') {
                    if self.eat(b'=') {
                        TokenKind::EqEqEq
                    } else {
                        TokenKind::EqEq
                    }
                } else {
                    TokenKind::Eq
                }
            }
            b'!' => {
                if self.eat(b'=') {
                    if self.eat(b'=') {
                        TokenKind::BangEqEq
                    } else {
                        TokenKind::BangEq
                    }
                } else {
                    TokenKind::Bang
                }
            }
            b'+' => {
                if self.eat(b'+') {
                    TokenKind::PlusPlus
                } else if self.eat(b'=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }
            b'-' => {
                if self.eat(b'-') {
                    TokenKind::MinusMinus
                } else if self.eat(b'=') {
                    TokenKind::MinusEq
                } else {
                    TokenKind::Minus
                }
            }
            b'*' => {
                if self.eat(b'*') {
                    if self.eat(b'=') {
                        TokenKind::StarStarEq
                    } else {
                        TokenKind::StarStar
                    }
                } else if self.eat(b'=') {
                    TokenKind::StarEq
                } else {
                    TokenKind::Star
                }
            }
            b'/' => {
                if self.eat(b'=') {
                    TokenKind::SlashEq
                } else {
                    TokenKind::Slash
                }
            }
            b'%' => {
                if self.eat(b'=') {
                    TokenKind::PercentEq
                } else {
                    TokenKind::Percent
                }
            }
            b'&' => {
                if self.eat(b'&') {
                    if self.eat(b'=') {
                        TokenKind::AmpAmpEq
                    } else {
                        TokenKind::AmpAmp
                    }
                } else if self.eat(b'=') {
                    TokenKind::AmpEq
                } else {
                    TokenKind::Amp
                }
            }
            b'|' => {
                if self.eat(b'|') {
                    if self.eat(b'=') {
                        TokenKind::PipePipeEq
                    } else {
                        TokenKind::PipePipe
                    }
                } else if self.eat(b'=') {
                    TokenKind::PipeEq
                } else {
                    TokenKind::Pipe
                }
            }
            b'^' => {
                if self.eat(b'=') {
                    TokenKind::CaretEq
                } else {
                    TokenKind::Caret
                }
            }
            b'<' => {
                if self.eat(b'<') {
                    if self.eat(b'=') {
                        TokenKind::ShlEq
                    } else {
                        TokenKind::Shl
                    }
                } else if self.eat(b'=') {
                    TokenKind::LessEq
                } else {
                    TokenKind::Less
                }
            }
            b'>' => {
                if self.eat(b'>') {
                    if self.eat(b'>') {
                        if self.eat(b'=') {
                            TokenKind::UShrEq
                        } else {
                            TokenKind::UShr
                        }
                    } else if self.eat(b'=') {
                        TokenKind::ShrEq
                    } else {
                        TokenKind::Shr
                    }
                } else if self.eat(b'=') {
                    TokenKind::GreaterEq
                } else {
                    TokenKind::Greater
                }
            }

            _ => {
                let span = self.span_from(mark);
                self.emit_error(
                    ErrorCode::UNEXPECTED_CHARACTER,
                    format!("Unexpected character '{}'", ch as char),
                    span,
                );
                return None;
            }
        };
        Some(kind)
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    fn scan_number(&mut self, mark: Mark, first: u8) -> TokenKind {
        if first == b'0' {
            let radix = match self.peek() {
                Some(b'x' | b'X') => Some(16),
                Some(b'o' | b'O') => Some(8),
                Some(b'b' | b'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.advance();
                let digits_start = self.pos;
                while let Some(ch) = self.peek() {
                    if ch == b'_' || (ch as char).is_digit(radix) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                let digits: String = std::str::from_utf8(&self.source[digits_start..self.pos])
                    .unwrap_or("")
                    .chars()
                    .filter(|c| *c != '_')
                    .collect();
                if self.eat(b'n') {
                    let value = u128::from_str_radix(&digits, radix).unwrap_or(0);
                    return TokenKind::BigInt(value.to_string());
                }
                let value = u128::from_str_radix(&digits, radix).unwrap_or(0) as f64;
                return TokenKind::Number(value);
            }
        }

        let mut is_integer = first != b'.';
        self.digits();
        if first != b'.' && self.peek() == Some(b'.') {
            is_integer = false;
            self.advance();
            self.digits();
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let sign = matches!(self.peek_at(1), Some(b'+' | b'-'));
            let digit_at = if sign { 2 } else { 1 };
            if matches!(self.peek_at(digit_at), Some(b'0'..=b'9')) {
                is_integer = false;
                for _ in 0..digit_at {
                    self.advance();
                }
                self.digits();
            }
        }

        let text: String = self.text_from(mark).chars().filter(|c| *c != '_').collect();
        if is_integer && self.eat(b'n') {
            return TokenKind::BigInt(text);
        }
        TokenKind::Number(text.parse().unwrap_or(f64::NAN))
    }

    fn digits(&mut self) {
        while let Some(b'0'..=b'9' | b'_') = self.peek() {
            self.advance();
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, mark: Mark) -> TokenKind {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'$' || ch >= 0x80 {
                self.advance();
            } else {
                break;
            }
        }
        let text = self.text_from(mark);
        TokenKind::from_keyword(text).unwrap_or_else(|| TokenKind::Identifier(text.to_string()))
    }

    // ─────────────────────────────────────────────────────────────
    // String literals
    // ─────────────────────────────────────────────────────────────

    fn scan_string(&mut self, mark: Mark, quote: u8) -> TokenKind {
        let mut buf: Vec<u8> = Vec::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    let span = self.span_from(mark);
                    self.emit_error(
                        ErrorCode::UNTERMINATED_STRING,
                        "Unterminated string literal",
                        span,
                    );
                    break;
                }
                Some(ch) if ch == quote => {
                    self.advance();
                    break;
                }
                Some(b'\\') => {
                    self.advance();
                    self.scan_escape(&mut buf);
                }
                Some(ch) => {
                    self.advance();
                    buf.push(ch);
                }
            }
        }
        TokenKind::String(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Decode one escape sequence; the backslash is already consumed.
    fn scan_escape(&mut self, buf: &mut Vec<u8>) {
        let Some(ch) = self.advance() else {
            return;
        };
        let decoded = match ch {
            b'n' => '\n',
            b't' => '\t',
            b'r' => '\r',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'v' => '\u{b}',
            b'0' if !matches!(self.peek(), Some(b'0'..=b'9')) => '\0',
            // Line continuation.
            b'\n' => return,
            b'\r' => {
                self.eat(b'\n');
                return;
            }
            b'x' => {
                let code = self.hex_digits(2);
                code.and_then(char::from_u32).unwrap_or('\u{fffd}')
            }
            b'u' => {
                let code = if self.eat(b'{') {
                    let mut value = 0u32;
                    while let Some(digit) = self.peek().and_then(|c| (c as char).to_digit(16)) {
                        self.advance();
                        value = value.saturating_mul(16).saturating_add(digit);
                    }
                    self.eat(b'}');
                    Some(value)
                } else {
                    self.hex_digits(4)
                };
                code.and_then(char::from_u32).unwrap_or('\u{fffd}')
            }
            other => {
                buf.push(other);
                return;
            }
        };
        let mut utf8 = [0u8; 4];
        buf.extend_from_slice(decoded.encode_utf8(&mut utf8).as_bytes());
    }

    fn hex_digits(&mut self, count: usize) -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..count {
            let digit = self.peek().and_then(|c| (c as char).to_digit(16))?;
            self.advance();
            value = value * 16 + digit;
        }
        Some(value)
    }

    fn skip_template(&mut self) {
        while let Some(ch) = self.advance() {
            match ch {
                b'\\' => {
                    self.advance();
                }
                b'`' => return,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> LexResult {
        let sf = SourceFile::new("test.js", src);
        Lexer::new(&sf).lex()
    }

    #[test]
    fn spans_carry_byte_offsets() {
        let result = lex("let  x");
        let x = &result.tokens[1];
        assert_eq!(x.kind, TokenKind::Identifier("x".into()));
        assert_eq!((x.span.start, x.span.end), (5, 6));
        assert_eq!((x.span.start_line, x.span.start_col), (1, 6));
    }

    #[test]
    fn columns_count_characters() {
        let result = lex("'é' + y");
        let y = &result.tokens[2];
        assert_eq!(y.span.start_col, 7);
        assert_eq!(y.span.start, 7);
    }

    #[test]
    fn newline_flag_crosses_comments() {
        let result = lex("a /* one\ntwo */ b\n// c\nd");
        let flags: Vec<bool> = result.tokens.iter().map(|t| t.newline_before).collect();
        assert_eq!(flags, [false, true, true, false]);
    }
}
