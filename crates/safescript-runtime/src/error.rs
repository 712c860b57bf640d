//! Runtime error types for the coercion runtime.

use thiserror::Error;

/// Errors raised by runtime operations. All of them propagate to the caller;
/// the runtime never substitutes a default value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A value could not be converted to the primitive an operation needs.
    #[error("can't convert {from} to {to}")]
    Conversion {
        /// Runtime type of the offending value.
        from: &'static str,
        /// `"number"` or `"string"`.
        to: &'static str,
    },
    /// A guarded parameter received a value of the wrong runtime type.
    #[error("{param} is not typeof '{expected}' (got {actual})")]
    GuardViolation {
        param: String,
        expected: String,
        actual: &'static str,
    },
    /// A bigint met a number in an arithmetic operation.
    #[error("cannot mix bigint and other types in '{op}'")]
    MixedBigInt { op: &'static str },
    /// Division by zero, a negative exponent, or overflow of the bigint range.
    #[error("bigint '{op}': {reason}")]
    BigIntRange {
        op: &'static str,
        reason: &'static str,
    },
    #[error("'{op}' expects {expected} argument(s), got {got}")]
    Arity {
        op: &'static str,
        expected: usize,
        got: usize,
    },
    /// `suffix()` was read with no `inc`/`dec` since the last read.
    #[error("suffix() read without a pending inc/dec")]
    SuffixUnavailable,
}

impl RuntimeError {
    pub(crate) fn not_number(from: &'static str) -> Self {
        Self::Conversion { from, to: "number" }
    }

    pub(crate) fn not_string(from: &'static str) -> Self {
        Self::Conversion { from, to: "string" }
    }
}

/// Result alias for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
