//! Runtime values: the JavaScript value kinds the runtime operates on.
//!
//! Objects are opaque apart from the hooks the coercions consult
//! (`Symbol.toPrimitive`, `valueOf`, `toString`) and their operator
//! overloads.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use safescript_types::RuntimeOp;

use crate::error::RuntimeResult;
use crate::number::format_number;

/// A JavaScript value.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Symbol(Rc<Symbol>),
    Object(Rc<Object>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn symbol(description: impl Into<String>) -> Self {
        Value::Symbol(Rc::new(Symbol {
            description: description.into(),
        }))
    }

    pub fn object(object: Object) -> Self {
        Value::Object(Rc::new(object))
    }

    /// What `typeof` reports.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(o) if o.callable => "function",
            Value::Object(_) => "object",
        }
    }

    /// Runtime type name used in error messages; `null` is not an object here.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            other => other.type_of(),
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Member of the safe primitive set {boolean, number, bigint, symbol}.
    pub fn is_safe_primitive(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Number(_) | Value::BigInt(_) | Value::Symbol(_)
        )
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// `===`.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            Value::BigInt(n) => write!(f, "{n}n"),
            Value::Symbol(s) => write!(f, "Symbol({})", s.description),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::BigInt(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Symbol(s) => write!(f, "Symbol({})", s.description),
            Value::Object(o) => write!(f, "{}", o.default_string()),
        }
    }
}

/// A symbol; equal only to itself.
#[derive(Debug)]
pub struct Symbol {
    pub description: String,
}

/// Conversion hint passed to a `Symbol.toPrimitive` hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    Number,
    String,
}

impl Hint {
    pub fn as_str(self) -> &'static str {
        match self {
            Hint::Number => "number",
            Hint::String => "string",
        }
    }
}

type PrimitiveHook = Box<dyn Fn(Hint) -> Value>;
type MethodHook = Box<dyn Fn() -> Value>;

/// An operator overload. Receives the other operand already converted to a
/// number (or `undefined` for operations with a single operand).
pub type Overload = Box<dyn Fn(&Value) -> RuntimeResult<Value>>;

/// An object or function value, described by the hooks it defines.
#[derive(Default)]
pub struct Object {
    callable: bool,
    to_primitive: Option<PrimitiveHook>,
    value_of: Option<MethodHook>,
    to_string: Option<MethodHook>,
    overloads: BTreeMap<RuntimeOp, Overload>,
}

impl Object {
    /// A plain object with no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// A function object (`typeof` is `"function"`).
    pub fn function() -> Self {
        Self {
            callable: true,
            ..Self::default()
        }
    }

    /// Define `[Symbol.toPrimitive](hint)`.
    pub fn with_to_primitive(mut self, hook: impl Fn(Hint) -> Value + 'static) -> Self {
        self.to_primitive = Some(Box::new(hook));
        self
    }

    /// Define `valueOf()`.
    pub fn with_value_of(mut self, hook: impl Fn() -> Value + 'static) -> Self {
        self.value_of = Some(Box::new(hook));
        self
    }

    /// Define `toString()`.
    pub fn with_to_string(mut self, hook: impl Fn() -> Value + 'static) -> Self {
        self.to_string = Some(Box::new(hook));
        self
    }

    /// Register an overload for `op`.
    pub fn with_overload(
        mut self,
        op: RuntimeOp,
        overload: impl Fn(&Value) -> RuntimeResult<Value> + 'static,
    ) -> Self {
        self.overloads.insert(op, Box::new(overload));
        self
    }

    pub fn is_callable(&self) -> bool {
        self.callable
    }

    pub fn overload(&self, op: RuntimeOp) -> Option<&Overload> {
        self.overloads.get(&op)
    }

    pub(crate) fn to_primitive(&self, hint: Hint) -> Option<Value> {
        self.to_primitive.as_ref().map(|hook| hook(hint))
    }

    pub(crate) fn value_of(&self) -> Option<Value> {
        self.value_of.as_ref().map(|hook| hook())
    }

    /// `toString()`, falling back to `Object.prototype.toString`.
    pub(crate) fn string_of(&self) -> Value {
        match &self.to_string {
            Some(hook) => hook(),
            None => Value::String(self.default_string().to_string()),
        }
    }

    fn default_string(&self) -> &'static str {
        if self.callable {
            "function () { [native code] }"
        } else {
            "[object Object]"
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("callable", &self.callable)
            .field("to_primitive", &self.to_primitive.is_some())
            .field("value_of", &self.value_of.is_some())
            .field("to_string", &self.to_string.is_some())
            .field("overloads", &self.overloads.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_of() {
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::object(Object::function()).type_of(), "function");
        assert_eq!(Value::BigInt(1).type_of(), "bigint");
    }

    #[test]
    fn test_symbols_equal_only_themselves() {
        let a = Value::symbol("a");
        let b = Value::symbol("a");
        assert!(a.strict_equals(&a.clone()));
        assert!(!a.strict_equals(&b));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::object(Object::new()).to_string(), "[object Object]");
        assert_eq!(format!("{:?}", Value::BigInt(7)), "7n");
    }
}
