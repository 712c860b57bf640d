//! Token types for the SafeScript lexer.
//!
//! Defines [`TokenKind`] covering every lexeme of the supported
//! JavaScript/TypeScript subset and [`Token`], which pairs a kind with a
//! source [`Span`] and the newline flag automatic semicolon insertion needs.

use safescript_types::syntax::{SyntaxKind, TokenLeaf};
use safescript_types::Span;
use std::fmt;

/// Reserved words the lexer turns into keyword tokens.
///
/// Contextual words (`from`, `of`, `static`, `constructor`, `as`, type
/// names) stay identifiers.
pub const ALL_KEYWORDS: &[&str] = &[
    "var", "let", "const", "function", "class", "extends", "return", "if", "else", "while",
    "for", "do", "break", "continue", "throw", "new", "this", "true", "false", "null",
    "typeof", "void", "delete", "instanceof", "in", "import", "export", "default", "switch",
    "case", "try", "catch", "finally", "yield", "await", "async", "super",
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line terminator appears between the previous token and this one.
    pub newline_before: bool,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, newline_before: bool) -> Self {
        Self {
            kind,
            span,
            newline_before,
        }
    }

    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────
    /// `42`, `0xff`, `1.5e3`
    Number(f64),
    /// `10n`; carries the digits without the suffix.
    BigInt(String),
    /// `"text"` / `'text'`; carries the unescaped value.
    String(String),
    Identifier(String),

    // ── Keywords ─────────────────────────────────────────────
    Var,
    Let,
    Const,
    Function,
    Class,
    Extends,
    Return,
    If,
    Else,
    While,
    For,
    Do,
    Break,
    Continue,
    Throw,
    New,
    This,
    True,
    False,
    Null,
    Typeof,
    Void,
    Delete,
    InstanceOf,
    In,
    Import,
    Export,
    Default,
    Switch,
    Case,
    Try,
    Catch,
    Finally,
    Yield,
    Await,
    Async,
    Super,

    // ── Punctuation ──────────────────────────────────────────
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    DotDotDot,
    Question,
    Colon,
    Arrow,

    // ── Assignment ───────────────────────────────────────────
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    StarStarEq,
    ShlEq,
    ShrEq,
    UShrEq,
    AmpEq,
    PipeEq,
    CaretEq,
    AmpAmpEq,
    PipePipeEq,
    QuestionQuestionEq,

    // ── Operators ────────────────────────────────────────────
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    PlusPlus,
    MinusMinus,
    EqEq,
    BangEq,
    EqEqEq,
    BangEqEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    AmpAmp,
    PipePipe,
    QuestionQuestion,
    Shl,
    Shr,
    UShr,

    Eof,
}

impl TokenKind {
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "var" => TokenKind::Var,
            "let" => TokenKind::Let,
            "const" => TokenKind::Const,
            "function" => TokenKind::Function,
            "class" => TokenKind::Class,
            "extends" => TokenKind::Extends,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "do" => TokenKind::Do,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "throw" => TokenKind::Throw,
            "new" => TokenKind::New,
            "this" => TokenKind::This,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "typeof" => TokenKind::Typeof,
            "void" => TokenKind::Void,
            "delete" => TokenKind::Delete,
            "instanceof" => TokenKind::InstanceOf,
            "in" => TokenKind::In,
            "import" => TokenKind::Import,
            "export" => TokenKind::Export,
            "default" => TokenKind::Default,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "try" => TokenKind::Try,
            "catch" => TokenKind::Catch,
            "finally" => TokenKind::Finally,
            "yield" => TokenKind::Yield,
            "await" => TokenKind::Await,
            "async" => TokenKind::Async,
            "super" => TokenKind::Super,
            _ => return None,
        })
    }

    pub fn is_keyword(&self) -> bool {
        self.keyword_str().is_some()
    }

    fn keyword_str(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::Var => "var",
            TokenKind::Let => "let",
            TokenKind::Const => "const",
            TokenKind::Function => "function",
            TokenKind::Class => "class",
            TokenKind::Extends => "extends",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::Do => "do",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Throw => "throw",
            TokenKind::New => "new",
            TokenKind::This => "this",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Typeof => "typeof",
            TokenKind::Void => "void",
            TokenKind::Delete => "delete",
            TokenKind::InstanceOf => "instanceof",
            TokenKind::In => "in",
            TokenKind::Import => "import",
            TokenKind::Export => "export",
            TokenKind::Default => "default",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Finally => "finally",
            TokenKind::Yield => "yield",
            TokenKind::Await => "await",
            TokenKind::Async => "async",
            TokenKind::Super => "super",
            _ => return None,
        })
    }

    /// Source spelling of punctuation and operator tokens.
    pub fn punct_str(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::DotDotDot => "...",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::Arrow => "=>",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::StarStarEq => "**=",
            TokenKind::ShlEq => "<<=",
            TokenKind::ShrEq => ">>=",
            TokenKind::UShrEq => ">>>=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::AmpAmpEq => "&&=",
            TokenKind::PipePipeEq => "||=",
            TokenKind::QuestionQuestionEq => "??=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::StarStar => "**",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::EqEq => "==",
            TokenKind::BangEq => "!=",
            TokenKind::EqEqEq => "===",
            TokenKind::BangEqEq => "!==",
            TokenKind::Less => "<",
            TokenKind::LessEq => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEq => ">=",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::Bang => "!",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::QuestionQuestion => "??",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::UShr => ">>>",
            _ => return None,
        })
    }

    /// Kind of the leaf this token becomes in the syntax view.
    pub fn syntax_kind(&self) -> SyntaxKind {
        match self {
            TokenKind::Number(_) => SyntaxKind::NumericLiteral,
            TokenKind::BigInt(_) => SyntaxKind::BigIntLiteral,
            TokenKind::String(_) => SyntaxKind::StringLiteral,
            TokenKind::Identifier(_) => SyntaxKind::Identifier,
            TokenKind::True => SyntaxKind::TrueKeyword,
            TokenKind::False => SyntaxKind::FalseKeyword,
            TokenKind::Null => SyntaxKind::NullKeyword,
            TokenKind::This => SyntaxKind::ThisKeyword,
            kind if kind.is_keyword() => SyntaxKind::Keyword,
            _ => SyntaxKind::Punctuation,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::BigInt(digits) => write!(f, "{digits}n"),
            TokenKind::String(s) => write!(f, "\"{s}\""),
            TokenKind::Identifier(name) => write!(f, "{name}"),
            TokenKind::Eof => write!(f, "end of file"),
            other => match other.keyword_str().or_else(|| other.punct_str()) {
                Some(text) => write!(f, "{text}"),
                None => write!(f, "{other:?}"),
            },
        }
    }
}

/// Token leaves for the syntax view; the trailing `Eof` is dropped.
pub fn syntax_leaves(tokens: &[Token]) -> Vec<TokenLeaf> {
    tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| TokenLeaf {
            kind: t.kind.syntax_kind(),
            span: t.span,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyword_round_trips() {
        for kw in ALL_KEYWORDS {
            let kind = TokenKind::from_keyword(kw).unwrap();
            assert!(kind.is_keyword());
            assert_eq!(kind.to_string(), *kw);
        }
    }

    #[test]
    fn contextual_words_are_identifiers() {
        for word in ["from", "of", "static", "constructor", "number", "as"] {
            assert_eq!(TokenKind::from_keyword(word), None, "{word}");
        }
    }

    #[test]
    fn syntax_kinds() {
        assert_eq!(TokenKind::True.syntax_kind(), SyntaxKind::TrueKeyword);
        assert_eq!(TokenKind::Return.syntax_kind(), SyntaxKind::Keyword);
        assert_eq!(TokenKind::UShrEq.syntax_kind(), SyntaxKind::Punctuation);
        assert_eq!(
            TokenKind::Identifier("x".into()).syntax_kind(),
            SyntaxKind::Identifier
        );
    }
}
