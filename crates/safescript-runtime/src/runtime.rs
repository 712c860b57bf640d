//! The `SafeScript` runtime object: one method per [`RuntimeOp`] and the
//! dispatch table rewritten call sites go through.
//!
//! Binary operations follow one shape:
//!
//! 1. both operands in the safe primitive set: the native operator;
//! 2. an object operand with an overload for the operation: the overload;
//! 3. otherwise both operands are coerced to numbers, and the native
//!    operator is applied to the results.
//!
//! `add` puts string concatenation in front of all of that, and `eq` accepts
//! same-type and nullish pairs before coercing.

use std::cell::RefCell;
use std::cmp::Ordering;

use safescript_types::RuntimeOp;

use crate::coerce::{to_numeric, to_string, Numeric};
use crate::error::{RuntimeError, RuntimeResult};
use crate::number::{js_pow, parse_number, to_int32, to_uint32};
use crate::value::Value;

/// Handler shapes, by arity.
#[derive(Clone, Copy)]
enum Handler {
    Nullary(fn(&Runtime) -> RuntimeResult<Value>),
    Unary(fn(&Runtime, &Value) -> RuntimeResult<Value>),
    Binary(fn(&Runtime, &Value, &Value) -> RuntimeResult<Value>),
}

fn handler(op: RuntimeOp) -> Handler {
    use Handler::*;
    match op {
        RuntimeOp::Add => Binary(Runtime::add),
        RuntimeOp::Sub => Binary(Runtime::sub),
        RuntimeOp::Mul => Binary(Runtime::mul),
        RuntimeOp::Div => Binary(Runtime::div),
        RuntimeOp::Mod => Binary(Runtime::modulo),
        RuntimeOp::Exp => Binary(Runtime::exp),
        RuntimeOp::Eq => Binary(Runtime::eq),
        RuntimeOp::Ne => Binary(Runtime::ne),
        RuntimeOp::Gt => Binary(Runtime::gt),
        RuntimeOp::Ge => Binary(Runtime::ge),
        RuntimeOp::Lt => Binary(Runtime::lt),
        RuntimeOp::Le => Binary(Runtime::le),
        RuntimeOp::And => Binary(Runtime::and),
        RuntimeOp::Or => Binary(Runtime::or),
        RuntimeOp::Xor => Binary(Runtime::xor),
        RuntimeOp::Rshift => Binary(Runtime::rshift),
        RuntimeOp::Arshift => Binary(Runtime::arshift),
        RuntimeOp::Lshift => Binary(Runtime::lshift),
        RuntimeOp::Plus => Unary(Runtime::plus),
        RuntimeOp::Minus => Unary(Runtime::minus),
        RuntimeOp::BitNot => Unary(Runtime::bit_not),
        RuntimeOp::Inc => Unary(Runtime::inc),
        RuntimeOp::Dec => Unary(Runtime::dec),
        RuntimeOp::Suffix => Nullary(Runtime::suffix),
    }
}

/// One runtime instance, owning the suffix cell.
///
/// The cell holds the pre-update value of the latest `inc`/`dec` and is
/// emptied when `suffix` reads it, so a second read is an error.
#[derive(Debug, Default)]
pub struct Runtime {
    suffix: RefCell<Option<Value>>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke `op` with positional `args`, as a rewritten call site does.
    pub fn call(&self, op: RuntimeOp, args: &[Value]) -> RuntimeResult<Value> {
        if args.len() != op.arity() {
            return Err(RuntimeError::Arity {
                op: op.name(),
                expected: op.arity(),
                got: args.len(),
            });
        }
        match (handler(op), args) {
            (Handler::Nullary(f), []) => f(self),
            (Handler::Unary(f), [value]) => f(self, value),
            (Handler::Binary(f), [left, right]) => f(self, left, right),
            _ => Err(RuntimeError::Arity {
                op: op.name(),
                expected: op.arity(),
                got: args.len(),
            }),
        }
    }

    /// Look up `op` by its runtime function name and invoke it.
    pub fn call_named(&self, name: &str, args: &[Value]) -> Option<RuntimeResult<Value>> {
        RuntimeOp::from_name(name).map(|op| self.call(op, args))
    }

    // ── Arithmetic ────────────────────────────────────────────────────────

    pub fn add(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
            let mut text = to_string(left)?;
            text.push_str(&to_string(right)?);
            return Ok(Value::String(text));
        }
        self.arithmetic(RuntimeOp::Add, left, right)
    }

    pub fn sub(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.arithmetic(RuntimeOp::Sub, left, right)
    }

    pub fn mul(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.arithmetic(RuntimeOp::Mul, left, right)
    }

    pub fn div(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.arithmetic(RuntimeOp::Div, left, right)
    }

    /// `%`.
    pub fn modulo(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.arithmetic(RuntimeOp::Mod, left, right)
    }

    pub fn exp(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.arithmetic(RuntimeOp::Exp, left, right)
    }

    // ── Equality ──────────────────────────────────────────────────────────

    pub fn eq(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.loose_equals(left, right).map(Value::Bool)
    }

    pub fn ne(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        if let Some(result) = overload(RuntimeOp::Ne, left, right)? {
            return Ok(result);
        }
        self.loose_equals(left, right).map(|eq| Value::Bool(!eq))
    }

    // ── Relational ────────────────────────────────────────────────────────

    pub fn gt(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.relational(RuntimeOp::Gt, left, right, |o| o == Ordering::Greater)
    }

    pub fn ge(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.relational(RuntimeOp::Ge, left, right, |o| o != Ordering::Less)
    }

    pub fn lt(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.relational(RuntimeOp::Lt, left, right, |o| o == Ordering::Less)
    }

    pub fn le(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.relational(RuntimeOp::Le, left, right, |o| o != Ordering::Greater)
    }

    // ── Bitwise ───────────────────────────────────────────────────────────

    pub fn and(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.arithmetic(RuntimeOp::And, left, right)
    }

    pub fn or(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.arithmetic(RuntimeOp::Or, left, right)
    }

    pub fn xor(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.arithmetic(RuntimeOp::Xor, left, right)
    }

    /// `>>`.
    pub fn rshift(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.arithmetic(RuntimeOp::Rshift, left, right)
    }

    /// `>>>`.
    pub fn arshift(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.arithmetic(RuntimeOp::Arshift, left, right)
    }

    /// `<<`.
    pub fn lshift(&self, left: &Value, right: &Value) -> RuntimeResult<Value> {
        self.arithmetic(RuntimeOp::Lshift, left, right)
    }

    // ── Unary ─────────────────────────────────────────────────────────────

    /// Unary `+`. Strings go through numeric-string parsing and may yield
    /// `NaN`; everything else must convert.
    pub fn plus(&self, value: &Value) -> RuntimeResult<Value> {
        if let Value::String(s) = value {
            return Ok(Value::Number(parse_number(s)));
        }
        if let Some(result) = overload(RuntimeOp::Plus, value, &Value::Undefined)? {
            return Ok(result);
        }
        match to_numeric(value)? {
            Numeric::Number(n) => Ok(Value::Number(n)),
            Numeric::BigInt(_) => Err(RuntimeError::not_number("bigint")),
        }
    }

    pub fn minus(&self, value: &Value) -> RuntimeResult<Value> {
        if let Some(result) = overload(RuntimeOp::Minus, value, &Value::Undefined)? {
            return Ok(result);
        }
        match to_numeric(value)? {
            Numeric::Number(n) => Ok(Value::Number(-n)),
            Numeric::BigInt(n) => n
                .checked_neg()
                .map(Value::BigInt)
                .ok_or(RuntimeError::BigIntRange {
                    op: "minus",
                    reason: "overflow",
                }),
        }
    }

    /// `~`.
    pub fn bit_not(&self, value: &Value) -> RuntimeResult<Value> {
        if let Some(result) = overload(RuntimeOp::BitNot, value, &Value::Undefined)? {
            return Ok(result);
        }
        match to_numeric(value)? {
            Numeric::Number(n) => Ok(Value::Number(f64::from(!to_int32(n)))),
            Numeric::BigInt(n) => Ok(Value::BigInt(!n)),
        }
    }

    // ── Update ────────────────────────────────────────────────────────────

    pub fn inc(&self, value: &Value) -> RuntimeResult<Value> {
        self.update(RuntimeOp::Inc, value, 1)
    }

    pub fn dec(&self, value: &Value) -> RuntimeResult<Value> {
        self.update(RuntimeOp::Dec, value, -1)
    }

    /// The pre-update value of the latest `inc`/`dec`. Empties the cell.
    pub fn suffix(&self) -> RuntimeResult<Value> {
        self.suffix
            .borrow_mut()
            .take()
            .ok_or(RuntimeError::SuffixUnavailable)
    }

    // ── Shared paths ──────────────────────────────────────────────────────

    fn update(&self, op: RuntimeOp, value: &Value, delta: i8) -> RuntimeResult<Value> {
        let before = match overload(op, value, &Value::Undefined)? {
            Some(result) => to_numeric(&result)?,
            None => to_numeric(value)?,
        };
        let after = match before {
            Numeric::Number(n) => Value::Number(n + f64::from(delta)),
            Numeric::BigInt(n) => n
                .checked_add(i128::from(delta))
                .map(Value::BigInt)
                .ok_or(RuntimeError::BigIntRange {
                    op: op.name(),
                    reason: "overflow",
                })?,
        };
        self.record_suffix(before.into_value());
        Ok(after)
    }

    fn record_suffix(&self, value: Value) {
        if self.suffix.borrow_mut().replace(value).is_some() {
            tracing::trace!("suffix value overwritten before it was read");
        }
    }

    fn arithmetic(&self, op: RuntimeOp, left: &Value, right: &Value) -> RuntimeResult<Value> {
        if !(left.is_safe_primitive() && right.is_safe_primitive()) {
            if let Some(result) = overload(op, left, right)? {
                return Ok(result);
            }
        }
        let l = to_numeric(left)?;
        let r = to_numeric(right)?;
        match (l, r) {
            (Numeric::Number(a), Numeric::Number(b)) => Ok(Value::Number(number_op(op, a, b))),
            (Numeric::BigInt(a), Numeric::BigInt(b)) => bigint_op(op, a, b).map(Value::BigInt),
            _ => Err(RuntimeError::MixedBigInt { op: op.name() }),
        }
    }

    fn relational(
        &self,
        op: RuntimeOp,
        left: &Value,
        right: &Value,
        holds: fn(Ordering) -> bool,
    ) -> RuntimeResult<Value> {
        if !(left.is_safe_primitive() && right.is_safe_primitive()) {
            if let Some(result) = overload(op, left, right)? {
                return Ok(result);
            }
        }
        let l = to_numeric(left)?;
        let r = to_numeric(right)?;
        Ok(Value::Bool(l.compare(r).is_some_and(holds)))
    }

    fn loose_equals(&self, left: &Value, right: &Value) -> RuntimeResult<bool> {
        if left.type_of() == right.type_of() {
            return Ok(same_type_equals(left, right));
        }
        if left.is_nullish() && right.is_nullish() {
            return Ok(true);
        }
        if left.is_safe_primitive() && right.is_safe_primitive() {
            return Ok(match (left, right) {
                (Value::Symbol(_), _) | (_, Value::Symbol(_)) => false,
                _ => to_numeric(left)?.compare(to_numeric(right)?) == Some(Ordering::Equal),
            });
        }
        if let Some(result) = overload(RuntimeOp::Eq, left, right)? {
            return Ok(truthy(&result));
        }
        let l = to_numeric(left)?;
        let r = to_numeric(right)?;
        Ok(l.compare(r) == Some(Ordering::Equal))
    }
}

/// Try the left operand's overload, then the right operand's unless `op` is
/// left-handed only. The other operand is handed over as a number.
fn overload(op: RuntimeOp, left: &Value, right: &Value) -> RuntimeResult<Option<Value>> {
    if let Some(f) = left.as_object().and_then(|o| o.overload(op)) {
        tracing::trace!(op = op.name(), side = "left", "operator overload");
        let other = numeric_operand(op, right)?;
        return f(&other).map(Some);
    }
    if op.is_left_handed_only() {
        return Ok(None);
    }
    if let Some(f) = right.as_object().and_then(|o| o.overload(op)) {
        tracing::trace!(op = op.name(), side = "right", "operator overload");
        let other = numeric_operand(op, left)?;
        return f(&other).map(Some);
    }
    Ok(None)
}

fn numeric_operand(op: RuntimeOp, value: &Value) -> RuntimeResult<Value> {
    if op.arity() < 2 {
        return Ok(Value::Undefined);
    }
    to_numeric(value).map(Numeric::into_value)
}

/// Loose equality of two values with the same `typeof`.
fn same_type_equals(left: &Value, right: &Value) -> bool {
    left.strict_equals(right)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::BigInt(n) => *n != 0,
        Value::String(s) => !s.is_empty(),
        Value::Symbol(_) | Value::Object(_) => true,
    }
}

fn number_op(op: RuntimeOp, a: f64, b: f64) -> f64 {
    match op {
        RuntimeOp::Add => a + b,
        RuntimeOp::Sub => a - b,
        RuntimeOp::Mul => a * b,
        RuntimeOp::Div => a / b,
        RuntimeOp::Mod => a % b,
        RuntimeOp::Exp => js_pow(a, b),
        RuntimeOp::And => f64::from(to_int32(a) & to_int32(b)),
        RuntimeOp::Or => f64::from(to_int32(a) | to_int32(b)),
        RuntimeOp::Xor => f64::from(to_int32(a) ^ to_int32(b)),
        RuntimeOp::Lshift => f64::from(to_int32(a).wrapping_shl(to_uint32(b) & 31)),
        RuntimeOp::Rshift => f64::from(to_int32(a) >> (to_uint32(b) & 31)),
        RuntimeOp::Arshift => f64::from(to_uint32(a) >> (to_uint32(b) & 31)),
        _ => f64::NAN,
    }
}

fn bigint_op(op: RuntimeOp, a: i128, b: i128) -> RuntimeResult<i128> {
    let name = op.name();
    let range = |reason| RuntimeError::BigIntRange { op: name, reason };
    match op {
        RuntimeOp::Add => a.checked_add(b).ok_or(range("overflow")),
        RuntimeOp::Sub => a.checked_sub(b).ok_or(range("overflow")),
        RuntimeOp::Mul => a.checked_mul(b).ok_or(range("overflow")),
        RuntimeOp::Div if b == 0 => Err(range("division by zero")),
        RuntimeOp::Div => a.checked_div(b).ok_or(range("overflow")),
        RuntimeOp::Mod if b == 0 => Err(range("division by zero")),
        RuntimeOp::Mod => a.checked_rem(b).ok_or(range("overflow")),
        RuntimeOp::Exp if b < 0 => Err(range("negative exponent")),
        RuntimeOp::Exp => u32::try_from(b)
            .ok()
            .and_then(|e| a.checked_pow(e))
            .ok_or(range("overflow")),
        RuntimeOp::And => Ok(a & b),
        RuntimeOp::Or => Ok(a | b),
        RuntimeOp::Xor => Ok(a ^ b),
        RuntimeOp::Lshift => shift_left(a, b).ok_or(range("overflow")),
        RuntimeOp::Rshift => Ok(shift_right(a, b)),
        RuntimeOp::Arshift => Err(range("unsigned right shift")),
        _ => Err(range("unsupported")),
    }
}

fn shift_left(a: i128, by: i128) -> Option<i128> {
    if by < 0 {
        return Some(shift_right(a, by.checked_neg()?));
    }
    let by = u32::try_from(by).ok().filter(|&b| b < 127)?;
    let shifted = a << by;
    (shifted >> by == a).then_some(shifted)
}

fn shift_right(a: i128, by: i128) -> i128 {
    if by < 0 {
        return by.checked_neg().and_then(|b| shift_left(a, b)).unwrap_or(0);
    }
    match u32::try_from(by) {
        Ok(b) if b < 128 => a >> b,
        _ if a < 0 => -1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_covers_every_op() {
        let rt = Runtime::new();
        for op in RuntimeOp::ALL {
            let args: Vec<Value> = (0..op.arity()).map(|_| Value::from(1)).collect();
            if op == RuntimeOp::Suffix {
                rt.inc(&Value::from(1)).unwrap();
            }
            assert!(rt.call(op, &args).is_ok(), "{}", op.name());
        }
    }

    #[test]
    fn test_call_checks_arity() {
        let rt = Runtime::new();
        assert_eq!(
            rt.call(RuntimeOp::Add, &[Value::from(1)]).unwrap_err(),
            RuntimeError::Arity {
                op: "add",
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_call_named() {
        let rt = Runtime::new();
        let result = rt.call_named("mul", &[Value::from(3), Value::from(4)]);
        assert_eq!(result.unwrap().unwrap().as_number(), Some(12.0));
        assert!(rt.call_named("concat", &[]).is_none());
    }

    #[test]
    fn test_bigint_shifts() {
        assert_eq!(shift_left(1, 4), Some(16));
        assert_eq!(shift_left(1, 127), None);
        assert_eq!(shift_right(-16, 2), -4);
        assert_eq!(shift_right(-1, 500), -1);
    }
}
