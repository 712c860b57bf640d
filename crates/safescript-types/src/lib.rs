//! Shared types for the SafeScript transformer.
//!
//! This crate defines the AST node types, the generic syntax view used for
//! position correspondence, source spans, error types, and the closed set of
//! runtime operations shared by the rewrite engine and the coercion runtime.

mod error;
mod op;
mod span;
pub mod ast;
pub mod syntax;

pub use error::{CompileErrors, ErrorCategory, ErrorCode, SafeScriptError, Severity, MAX_ERRORS};
pub use op::{RuntimeOp, RUNTIME_NAMESPACE};
pub use span::{SourceFile, Span};

/// Result type used throughout the SafeScript front end.
pub type Result<T> = std::result::Result<T, SafeScriptError>;
