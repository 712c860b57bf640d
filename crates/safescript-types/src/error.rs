use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum number of errors stored before further errors are only counted.
pub const MAX_ERRORS: usize = 20;

/// Diagnostic severity.
///
/// Only `Error` blocks emission of a file. The other three are informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
    Message,
}

impl Severity {
    /// Short prefix used when printing a diagnostic.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Suggestion => "info",
            Self::Message => "msg",
        }
    }
}

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Type,
    Rewrite,
    Mapping,
}

/// Numeric error code (E100–E499).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNEXPECTED_CHARACTER: Self = Self(101);
    pub const UNCLOSED_BRACE: Self = Self(102);
    pub const UNTERMINATED_STRING: Self = Self(103);
    pub const UNSUPPORTED_SYNTAX: Self = Self(104);
    pub const INVALID_ASSIGNMENT_TARGET: Self = Self(105);

    // ── Type errors (E200–E299) ──
    pub const UNKNOWN_TYPE: Self = Self(200);
    pub const UNRESOLVED_NAME: Self = Self(201);

    // ── Rewrite errors (E300–E399) ──
    pub const FIXED_POINT_NOT_REACHED: Self = Self(300);
    pub const REPARSE_FAILED: Self = Self(301);

    // ── Mapping errors (E400–E499) ──
    pub const MALFORMED_MAPPING: Self = Self(400);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Syntax,
            200..=299 => ErrorCategory::Type,
            300..=399 => ErrorCategory::Rewrite,
            400..=499 => ErrorCategory::Mapping,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured SafeScript diagnostic.
///
/// Tools render these; they must not parse free-form strings.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{span}: {code} [{category}] {message}")]
pub struct SafeScriptError {
    /// Source file name.
    pub file: String,
    /// Error code (e.g., E100).
    pub code: ErrorCode,
    /// Diagnostic severity.
    pub severity: Severity,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
    /// Optional fix suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl SafeScriptError {
    /// Create a new error-severity diagnostic.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            severity: Severity::Error,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Override the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// `file:line:col - <prefix> <code>: <message>`
    pub fn render(&self) -> String {
        format!(
            "{}:{}:{} - {} {}: {}",
            self.file,
            self.span.start_line,
            self.span.start_col,
            self.severity.prefix(),
            self.code,
            self.message
        )
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Type => write!(f, "type"),
            Self::Rewrite => write!(f, "rewrite"),
            Self::Mapping => write!(f, "mapping"),
        }
    }
}

/// The structured diagnostics of one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<SafeScriptError>,
    pub warnings: Vec<SafeScriptError>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl CompileErrors {
    /// Create an empty result (no errors).
    pub fn empty() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            total_errors: 0,
            total_warnings: 0,
        }
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add a diagnostic, routing it by severity.
    ///
    /// Errors respect the [`MAX_ERRORS`] limit; everything else is kept as a
    /// warning.
    pub fn push(&mut self, diagnostic: SafeScriptError) {
        match diagnostic.severity {
            Severity::Error => self.push_error(diagnostic),
            _ => self.push_warning(diagnostic),
        }
    }

    /// Add an error, respecting the MAX_ERRORS limit.
    pub fn push_error(&mut self, error: SafeScriptError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Add a warning.
    pub fn push_warning(&mut self, warning: SafeScriptError) {
        self.warnings.push(warning);
        self.total_warnings += 1;
    }

    /// Append every diagnostic of `other`.
    pub fn extend(&mut self, other: CompileErrors) {
        for error in other.errors {
            self.push_error(error);
        }
        // Errors beyond the stored cap still count.
        let dropped = other.total_errors.saturating_sub(other.total_errors.min(MAX_ERRORS));
        self.total_errors += dropped;
        for warning in other.warnings {
            self.push_warning(warning);
        }
    }

    /// Iterate over all stored diagnostics, errors first.
    pub fn iter(&self) -> impl Iterator<Item = &SafeScriptError> {
        self.errors.iter().chain(self.warnings.iter())
    }
}

impl Default for CompileErrors {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(code: ErrorCode) -> SafeScriptError {
        SafeScriptError::new(
            "test.ts",
            code,
            "unexpected token ')'",
            Span::new(12, 13, 2, 5, 2, 6),
            "let x = );",
        )
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::UNEXPECTED_TOKEN.category(), ErrorCategory::Syntax);
        assert_eq!(ErrorCode::UNKNOWN_TYPE.category(), ErrorCategory::Type);
        assert_eq!(
            ErrorCode::FIXED_POINT_NOT_REACHED.category(),
            ErrorCategory::Rewrite
        );
        assert_eq!(ErrorCode::MALFORMED_MAPPING.category(), ErrorCategory::Mapping);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::UNEXPECTED_TOKEN), "E100");
        assert_eq!(format!("{}", ErrorCode::FIXED_POINT_NOT_REACHED), "E300");
    }

    #[test]
    fn test_error_creation() {
        let err = sample(ErrorCode::UNEXPECTED_TOKEN);
        assert_eq!(err.severity, Severity::Error);
        assert_eq!(err.category, ErrorCategory::Syntax);
        assert_eq!(format!("{err}"), "2:5: E100 [syntax] unexpected token ')'");
    }

    #[test]
    fn test_render() {
        let err = sample(ErrorCode::UNEXPECTED_TOKEN);
        assert_eq!(err.render(), "test.ts:2:5 - error E100: unexpected token ')'");
        let warn = err.with_severity(Severity::Warning);
        assert!(warn.render().contains(" - warning E100"));
    }

    #[test]
    fn test_error_json_serialization() {
        let err = sample(ErrorCode::UNEXPECTED_TOKEN).with_suggestion("remove the ')'");
        let json = serde_json::to_string_pretty(&err).unwrap();
        assert!(json.contains("\"code\""));
        assert!(json.contains("\"suggestion\""));
        assert!(json.contains("\"line\""));
        assert!(json.contains("\"column\""));
        assert!(json.contains("\"end_column\""));

        let back: SafeScriptError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code, err.code);
        assert_eq!(back.message, err.message);
    }

    #[test]
    fn test_compile_errors_max_limit() {
        let mut errs = CompileErrors::empty();
        for _ in 0..25 {
            errs.push_error(sample(ErrorCode::UNEXPECTED_TOKEN));
        }
        assert_eq!(errs.errors.len(), 20);
        assert_eq!(errs.total_errors, 25);
        assert!(errs.has_errors());
    }

    #[test]
    fn test_push_routes_by_severity() {
        let mut errs = CompileErrors::empty();
        errs.push(sample(ErrorCode::UNKNOWN_TYPE).with_severity(Severity::Suggestion));
        assert!(!errs.has_errors());
        assert_eq!(errs.total_warnings, 1);
        errs.push(sample(ErrorCode::UNKNOWN_TYPE));
        assert!(errs.has_errors());
    }

    #[test]
    fn test_extend_keeps_counts() {
        let mut a = CompileErrors::empty();
        let mut b = CompileErrors::empty();
        for _ in 0..22 {
            b.push_error(sample(ErrorCode::UNEXPECTED_TOKEN));
        }
        b.push_warning(sample(ErrorCode::UNKNOWN_TYPE).with_severity(Severity::Warning));
        a.extend(b);
        assert_eq!(a.total_errors, 22);
        assert_eq!(a.errors.len(), 20);
        assert_eq!(a.total_warnings, 1);
    }
}
