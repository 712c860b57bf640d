//! SafeScript lexer: converts JavaScript/TypeScript source text into a token
//! stream.

pub mod lexer;
pub mod token;

pub use lexer::{LexResult, Lexer};
pub use token::{syntax_leaves, Token, TokenKind, ALL_KEYWORDS};
