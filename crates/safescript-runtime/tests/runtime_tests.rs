//! Integration tests for the coercion runtime.
//!
//! Covers:
//! - string concatenation and numeric addition in `add`
//! - guarded numeric coercion (nullish, text, object hooks)
//! - loose equality rules
//! - update operations and the suffix cell
//! - bigint arithmetic and its range errors
//! - 32-bit bitwise operators
//! - operator overloads

use safescript_runtime::{
    Hint, Object, Runtime, RuntimeError, RuntimeOp, RuntimeResult, Value,
};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn num(result: RuntimeResult<Value>) -> f64 {
    match result {
        Ok(Value::Number(n)) => n,
        other => panic!("expected a number, got {other:?}"),
    }
}

fn text(result: RuntimeResult<Value>) -> String {
    match result {
        Ok(Value::String(s)) => s,
        other => panic!("expected a string, got {other:?}"),
    }
}

fn boolean(result: RuntimeResult<Value>) -> bool {
    match result {
        Ok(Value::Bool(b)) => b,
        other => panic!("expected a boolean, got {other:?}"),
    }
}

fn bigint(result: RuntimeResult<Value>) -> i128 {
    match result {
        Ok(Value::BigInt(n)) => n,
        other => panic!("expected a bigint, got {other:?}"),
    }
}

fn value_of(n: i32) -> Value {
    Value::object(Object::new().with_value_of(move || Value::from(n)))
}

/// An object whose `op` overload returns ten times the other operand.
fn times_ten(op: RuntimeOp) -> Value {
    Value::object(Object::new().with_overload(op, |other| {
        Ok(Value::Number(other.as_number().unwrap_or(f64::NAN) * 10.0))
    }))
}

// ══════════════════════════════════════════════════════════════════════════════
// add
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_add_number_and_string_concatenates() {
    let rt = Runtime::new();
    assert_eq!(text(rt.add(&Value::from(1), &Value::from("2"))), "12");
    assert_eq!(text(rt.add(&Value::from("1"), &Value::from(2))), "12");
}

#[test]
fn test_add_numbers() {
    let rt = Runtime::new();
    assert_eq!(num(rt.add(&Value::from(1), &Value::from(2))), 3.0);
    assert_eq!(num(rt.add(&Value::from(true), &Value::from(1))), 2.0);
}

#[test]
fn test_add_string_uses_to_primitive_string_hint() {
    let rt = Runtime::new();
    let obj = Value::object(Object::new().with_to_primitive(|hint| match hint {
        Hint::String => Value::from("x"),
        Hint::Number => Value::from(0),
    }));
    assert_eq!(text(rt.add(&obj, &Value::from("y"))), "xy");
    assert_eq!(
        text(rt.add(&Value::object(Object::new()), &Value::from("!"))),
        "[object Object]!"
    );
}

#[test]
fn test_add_nullish_is_an_error() {
    let rt = Runtime::new();
    assert_eq!(
        rt.add(&Value::Null, &Value::from(1)).unwrap_err(),
        RuntimeError::Conversion {
            from: "null",
            to: "number"
        }
    );
    assert!(rt.add(&Value::from(1), &Value::Undefined).is_err());
}

#[test]
fn test_add_nullish_to_string_is_an_error() {
    let rt = Runtime::new();
    assert_eq!(
        rt.add(&Value::Null, &Value::from("a")).unwrap_err(),
        RuntimeError::Conversion {
            from: "null",
            to: "string"
        }
    );
    assert_eq!(
        rt.add(&Value::from("a"), &Value::Undefined).unwrap_err(),
        RuntimeError::Conversion {
            from: "undefined",
            to: "string"
        }
    );
}

#[test]
fn test_add_symbol_to_string_is_an_error() {
    let rt = Runtime::new();
    assert_eq!(
        rt.add(&Value::symbol("s"), &Value::from("a")).unwrap_err(),
        RuntimeError::Conversion {
            from: "symbol",
            to: "string"
        }
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Arithmetic coercion
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_sub_uses_value_of() {
    let rt = Runtime::new();
    assert_eq!(num(rt.sub(&value_of(5), &Value::from(2))), 3.0);
}

#[test]
fn test_numeric_strings_coerce() {
    let rt = Runtime::new();
    assert_eq!(num(rt.mul(&Value::from("6"), &Value::from(7))), 42.0);
    assert!(rt.mul(&Value::from("six"), &Value::from(7)).is_err());
}

#[test]
fn test_to_primitive_must_yield_number() {
    let rt = Runtime::new();
    let obj = Value::object(Object::new().with_to_primitive(|_| Value::from("5")));
    assert_eq!(
        rt.sub(&obj, &Value::from(1)).unwrap_err(),
        RuntimeError::Conversion {
            from: "object",
            to: "number"
        }
    );
}

#[test]
fn test_div_mod_exp() {
    let rt = Runtime::new();
    assert_eq!(num(rt.div(&Value::from(7), &Value::from(2))), 3.5);
    assert!(num(rt.div(&Value::from(1), &Value::from(0))).is_infinite());
    assert_eq!(num(rt.modulo(&Value::from(-7), &Value::from(3))), -1.0);
    assert_eq!(num(rt.exp(&Value::from(2), &Value::from(10))), 1024.0);
}

#[test]
fn test_relational() {
    let rt = Runtime::new();
    assert!(boolean(rt.lt(&Value::from(1), &Value::from(2))));
    assert!(boolean(rt.ge(&value_of(2), &Value::from(2))));
    assert!(!boolean(rt.gt(&Value::from(f64::NAN), &Value::from(0))));
    assert!(!boolean(rt.le(&Value::from(f64::NAN), &Value::from(0))));
    assert!(boolean(rt.lt(&Value::BigInt(1), &Value::from(1.5))));
}

// ══════════════════════════════════════════════════════════════════════════════
// Equality
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_eq_nullish_pair() {
    let rt = Runtime::new();
    assert!(boolean(rt.eq(&Value::Null, &Value::Undefined)));
    assert!(boolean(rt.eq(&Value::Undefined, &Value::Undefined)));
}

#[test]
fn test_eq_number_and_numeric_string() {
    let rt = Runtime::new();
    assert!(boolean(rt.eq(&Value::from(1), &Value::from("1"))));
    assert!(!boolean(rt.ne(&Value::from(1), &Value::from("1"))));
    assert!(boolean(rt.ne(&Value::from(1), &Value::from("2"))));
}

#[test]
fn test_eq_same_type() {
    let rt = Runtime::new();
    let obj = Value::object(Object::new());
    assert!(boolean(rt.eq(&obj, &obj.clone())));
    assert!(!boolean(rt.eq(&obj, &Value::object(Object::new()))));
    assert!(!boolean(rt.eq(&Value::Null, &obj)));
    assert!(!boolean(rt.eq(&Value::from(f64::NAN), &Value::from(f64::NAN))));
    assert!(boolean(rt.eq(&Value::from("a"), &Value::from("a"))));
}

#[test]
fn test_eq_safe_primitives() {
    let rt = Runtime::new();
    assert!(boolean(rt.eq(&Value::from(true), &Value::from(1))));
    assert!(boolean(rt.eq(&Value::BigInt(2), &Value::from(2))));
    assert!(!boolean(rt.eq(&Value::symbol("s"), &Value::from(1))));
}

#[test]
fn test_eq_object_coerces() {
    let rt = Runtime::new();
    assert!(boolean(rt.eq(&value_of(5), &Value::from(5))));
}

#[test]
fn test_eq_nullish_against_number_is_an_error() {
    let rt = Runtime::new();
    assert!(rt.eq(&Value::Undefined, &Value::from(0)).is_err());
}

// ══════════════════════════════════════════════════════════════════════════════
// Unary
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_minus_text_is_an_error() {
    let rt = Runtime::new();
    assert_eq!(
        rt.minus(&Value::from("abc")).unwrap_err(),
        RuntimeError::Conversion {
            from: "string",
            to: "number"
        }
    );
    assert_eq!(num(rt.minus(&Value::from("4"))), -4.0);
}

#[test]
fn test_plus_parses_strings() {
    let rt = Runtime::new();
    assert_eq!(num(rt.plus(&Value::from("  12 "))), 12.0);
    assert!(num(rt.plus(&Value::from("abc"))).is_nan());
    assert_eq!(num(rt.plus(&value_of(3))), 3.0);
    assert!(rt.plus(&Value::Null).is_err());
}

#[test]
fn test_bit_not() {
    let rt = Runtime::new();
    assert_eq!(num(rt.bit_not(&Value::from(5))), -6.0);
    assert_eq!(bigint(rt.bit_not(&Value::BigInt(5))), -6);
}

// ══════════════════════════════════════════════════════════════════════════════
// Update and suffix
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_inc_then_suffix() {
    let rt = Runtime::new();
    assert_eq!(num(rt.inc(&Value::from(5))), 6.0);
    assert_eq!(num(rt.suffix()), 5.0);
}

#[test]
fn test_suffix_is_emptied_by_read() {
    let rt = Runtime::new();
    assert_eq!(rt.suffix().unwrap_err(), RuntimeError::SuffixUnavailable);
    rt.dec(&Value::from(1)).unwrap();
    rt.suffix().unwrap();
    assert_eq!(rt.suffix().unwrap_err(), RuntimeError::SuffixUnavailable);
}

#[test]
fn test_latest_update_wins() {
    let rt = Runtime::new();
    rt.inc(&Value::from(1)).unwrap();
    rt.dec(&Value::from(10)).unwrap();
    assert_eq!(num(rt.suffix()), 10.0);
}

#[test]
fn test_suffix_records_coerced_value() {
    let rt = Runtime::new();
    assert_eq!(num(rt.inc(&Value::from("41"))), 42.0);
    assert_eq!(num(rt.suffix()), 41.0);
    assert_eq!(bigint(rt.dec(&Value::BigInt(0))), -1);
    assert_eq!(bigint(rt.suffix()), 0);
}

#[test]
fn test_inc_nullish_is_an_error() {
    let rt = Runtime::new();
    assert!(rt.inc(&Value::Undefined).is_err());
    assert_eq!(rt.suffix().unwrap_err(), RuntimeError::SuffixUnavailable);
}

// ══════════════════════════════════════════════════════════════════════════════
// BigInt
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_bigint_arithmetic() {
    let rt = Runtime::new();
    assert_eq!(bigint(rt.add(&Value::BigInt(2), &Value::BigInt(3))), 5);
    assert_eq!(bigint(rt.div(&Value::BigInt(7), &Value::BigInt(2))), 3);
    assert_eq!(bigint(rt.exp(&Value::BigInt(2), &Value::BigInt(64))), 1_i128 << 64);
    assert_eq!(bigint(rt.lshift(&Value::BigInt(1), &Value::BigInt(40))), 1_i128 << 40);
}

#[test]
fn test_bigint_mixed_with_number() {
    let rt = Runtime::new();
    assert_eq!(
        rt.add(&Value::BigInt(1), &Value::from(1)).unwrap_err(),
        RuntimeError::MixedBigInt { op: "add" }
    );
}

#[test]
fn test_bigint_range_errors() {
    let rt = Runtime::new();
    assert_eq!(
        rt.div(&Value::BigInt(1), &Value::BigInt(0)).unwrap_err(),
        RuntimeError::BigIntRange {
            op: "div",
            reason: "division by zero"
        }
    );
    assert!(rt.exp(&Value::BigInt(2), &Value::BigInt(-1)).is_err());
    assert!(rt.mul(&Value::BigInt(i128::MAX), &Value::BigInt(2)).is_err());
    assert!(rt.arshift(&Value::BigInt(8), &Value::BigInt(1)).is_err());
}

// ══════════════════════════════════════════════════════════════════════════════
// Bitwise
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_bitwise_numbers() {
    let rt = Runtime::new();
    assert_eq!(num(rt.and(&Value::from(5), &Value::from(3))), 1.0);
    assert_eq!(num(rt.or(&Value::from(5), &Value::from(3))), 7.0);
    assert_eq!(num(rt.xor(&Value::from(5), &Value::from(3))), 6.0);
}

#[test]
fn test_shifts() {
    let rt = Runtime::new();
    assert_eq!(num(rt.lshift(&Value::from(1), &Value::from(33))), 2.0);
    assert_eq!(num(rt.rshift(&Value::from(-8), &Value::from(1))), -4.0);
    assert_eq!(num(rt.arshift(&Value::from(-1), &Value::from(28))), 15.0);
}

// ══════════════════════════════════════════════════════════════════════════════
// Overloads
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_left_overload() {
    let rt = Runtime::new();
    assert_eq!(num(rt.sub(&times_ten(RuntimeOp::Sub), &Value::from(2))), 20.0);
}

#[test]
fn test_right_overload() {
    let rt = Runtime::new();
    assert_eq!(num(rt.mul(&Value::from(3), &times_ten(RuntimeOp::Mul))), 30.0);
}

#[test]
fn test_overload_receives_coerced_operand() {
    let rt = Runtime::new();
    assert_eq!(num(rt.sub(&times_ten(RuntimeOp::Sub), &Value::from("4"))), 40.0);
    assert!(rt
        .sub(&times_ten(RuntimeOp::Sub), &Value::Null)
        .is_err());
}

#[test]
fn test_left_handed_only_ignores_right_overload() {
    let rt = Runtime::new();
    assert_eq!(
        rt.lshift(&Value::from(1), &times_ten(RuntimeOp::Lshift))
            .unwrap_err(),
        RuntimeError::Conversion {
            from: "object",
            to: "number"
        }
    );
    assert_eq!(num(rt.lshift(&times_ten(RuntimeOp::Lshift), &Value::from(1))), 10.0);
}

#[test]
fn test_unary_overload_gets_undefined() {
    let rt = Runtime::new();
    let obj = Value::object(Object::new().with_overload(RuntimeOp::Minus, |other| {
        Ok(Value::from(other.is_nullish()))
    }));
    assert!(boolean(rt.minus(&obj)));
}

#[test]
fn test_update_overload_supplies_value_before_update() {
    let rt = Runtime::new();
    let obj = Value::object(
        Object::new()
            .with_overload(RuntimeOp::Inc, |_| Ok(Value::from(42)))
            .with_overload(RuntimeOp::Dec, |_| Ok(Value::from("10"))),
    );
    assert_eq!(num(rt.inc(&obj)), 43.0);
    assert_eq!(num(rt.suffix()), 42.0);
    assert_eq!(num(rt.dec(&obj)), 9.0);
    assert_eq!(num(rt.suffix()), 10.0);
}

#[test]
fn test_update_overload_result_must_be_numeric() {
    let rt = Runtime::new();
    let obj = Value::object(Object::new().with_overload(RuntimeOp::Inc, |_| Ok(Value::Null)));
    assert_eq!(
        rt.inc(&obj).unwrap_err(),
        RuntimeError::Conversion {
            from: "null",
            to: "number"
        }
    );
    assert_eq!(rt.suffix().unwrap_err(), RuntimeError::SuffixUnavailable);
}

#[test]
fn test_eq_and_ne_overloads() {
    let rt = Runtime::new();
    let always = Value::object(
        Object::new()
            .with_overload(RuntimeOp::Eq, |_| Ok(Value::from(true)))
            .with_overload(RuntimeOp::Ne, |_| Ok(Value::from("no"))),
    );
    assert!(boolean(rt.eq(&always, &Value::from(1))));
    assert_eq!(text(rt.ne(&always, &Value::from(1))), "no");
}

#[test]
fn test_overload_error_propagates() {
    let rt = Runtime::new();
    let obj = Value::object(Object::new().with_overload(RuntimeOp::Add, |_| {
        Err(RuntimeError::Conversion {
            from: "object",
            to: "number",
        })
    }));
    assert!(rt.add(&obj, &Value::from(1)).is_err());
}

// ══════════════════════════════════════════════════════════════════════════════
// Dispatch
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_call_dispatches_by_op() {
    let rt = Runtime::new();
    assert_eq!(
        text(rt.call(RuntimeOp::Add, &[Value::from(1), Value::from("2")])),
        "12"
    );
    rt.call(RuntimeOp::Inc, &[Value::from(5)]).unwrap();
    assert_eq!(num(rt.call(RuntimeOp::Suffix, &[])), 5.0);
}

#[test]
fn test_call_rejects_wrong_arity() {
    let rt = Runtime::new();
    assert_eq!(
        rt.call(RuntimeOp::Suffix, &[Value::from(1)]).unwrap_err(),
        RuntimeError::Arity {
            op: "suffix",
            expected: 0,
            got: 1
        }
    );
}
