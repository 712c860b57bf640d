//! Guarded conversions to number and string.
//!
//! Unlike JavaScript's implicit conversions these fail loudly: `null` and
//! `undefined` never become numbers, a string only becomes a number if it is
//! a numeric literal, and an object must produce the requested primitive from
//! its `Symbol.toPrimitive` hook, or else from `valueOf` / `toString`.

use std::cmp::Ordering;

use crate::error::{RuntimeError, RuntimeResult};
use crate::number::{format_number, parse_number};
use crate::value::{Hint, Value};

/// The result of numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Number(f64),
    BigInt(i128),
}

impl Numeric {
    pub fn into_value(self) -> Value {
        match self {
            Numeric::Number(n) => Value::Number(n),
            Numeric::BigInt(n) => Value::BigInt(n),
        }
    }

    /// Mathematical comparison; `None` when either side is `NaN`.
    pub fn compare(self, other: Numeric) -> Option<Ordering> {
        match (self, other) {
            (Numeric::Number(a), Numeric::Number(b)) => a.partial_cmp(&b),
            (Numeric::BigInt(a), Numeric::BigInt(b)) => Some(a.cmp(&b)),
            (Numeric::BigInt(a), Numeric::Number(b)) => (a as f64).partial_cmp(&b),
            (Numeric::Number(a), Numeric::BigInt(b)) => a.partial_cmp(&(b as f64)),
        }
    }
}

/// Convert to a number (or keep a bigint).
pub fn to_numeric(value: &Value) -> RuntimeResult<Numeric> {
    match value {
        Value::Bool(b) => Ok(Numeric::Number(if *b { 1.0 } else { 0.0 })),
        Value::Number(n) => Ok(Numeric::Number(*n)),
        Value::BigInt(n) => Ok(Numeric::BigInt(*n)),
        Value::String(s) => {
            let n = parse_number(s);
            if n.is_nan() {
                Err(RuntimeError::not_number("string"))
            } else {
                Ok(Numeric::Number(n))
            }
        }
        Value::Object(object) => {
            let primitive = object
                .to_primitive(Hint::Number)
                .or_else(|| object.value_of());
            match primitive {
                Some(Value::Number(n)) => Ok(Numeric::Number(n)),
                _ => Err(RuntimeError::not_number(value.type_name())),
            }
        }
        Value::Undefined | Value::Null | Value::Symbol(_) => {
            Err(RuntimeError::not_number(value.type_name()))
        }
    }
}

/// Convert to a string.
pub fn to_string(value: &Value) -> RuntimeResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Undefined | Value::Null => Err(RuntimeError::not_string(value.type_name())),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(format_number(*n)),
        Value::BigInt(n) => Ok(n.to_string()),
        Value::Symbol(_) => Err(RuntimeError::not_string("symbol")),
        Value::Object(object) => {
            let primitive = object
                .to_primitive(Hint::String)
                .unwrap_or_else(|| object.string_of());
            match primitive {
                Value::String(s) => Ok(s),
                _ => Err(RuntimeError::not_string(value.type_name())),
            }
        }
    }
}
