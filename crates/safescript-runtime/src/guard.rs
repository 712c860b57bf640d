//! Call-time parameter checks, the runtime half of an injected guard
//! statement `if (typeof x !== "number") throw new TypeError(...)`.

use crate::error::{RuntimeError, RuntimeResult};
use crate::value::Value;

/// Type tags a guard can check.
pub const GUARD_TYPES: [&str; 5] = ["number", "string", "bigint", "boolean", "symbol"];

/// Fail unless `typeof value` is `expected`.
pub fn check_guard(param: &str, expected: &str, value: &Value) -> RuntimeResult<()> {
    let actual = value.type_of();
    if actual == expected {
        return Ok(());
    }
    tracing::debug!(param, expected, actual, "guard violation");
    Err(RuntimeError::GuardViolation {
        param: param.to_string(),
        expected: expected.to_string(),
        actual: value.type_name(),
    })
}

/// Check each `(param, expected)` pair against the positional `args`.
/// Missing arguments are `undefined`.
pub fn check_guards(guards: &[(&str, &str)], args: &[Value]) -> RuntimeResult<()> {
    guards.iter().enumerate().try_for_each(|(i, (param, expected))| {
        check_guard(param, expected, args.get(i).unwrap_or(&Value::Undefined))
    })
}
