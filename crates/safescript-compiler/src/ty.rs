//! Type descriptors and the table of checker-reported types.
//!
//! [`TypeTable`] holds the free-form type text the checker reports for each
//! node. [`TypeDescriptor`] is the normalized tag the classifier decides on;
//! [`TypeDescriptor::canonicalize`] turns the former into the latter.

use std::collections::HashMap;
use std::fmt;

use safescript_types::ast::{Expr, ExprKind, NodeId};

/// Checker text used for anything the checker cannot resolve.
pub const ANY: &str = "any";

// ══════════════════════════════════════════════════════════════════════════════
// TypeTable
// ══════════════════════════════════════════════════════════════════════════════

/// `NodeId → type text` for every expression, parameter and declarator.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: HashMap<NodeId, String>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the type of a node. Synthesized nodes are never recorded.
    pub fn insert(&mut self, id: NodeId, text: impl Into<String>) {
        if !id.is_synthetic() {
            self.types.insert(id, text.into());
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&str> {
        self.types.get(&id).map(String::as_str)
    }

    /// The recorded type text, or `any` when nothing was recorded.
    pub fn type_text(&self, id: NodeId) -> &str {
        self.get(id).unwrap_or(ANY)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Literal kinds
// ══════════════════════════════════════════════════════════════════════════════

/// Literal node kinds whose type is known without consulting the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    String,
    BigInt,
}

impl LiteralKind {
    pub fn of(expr: &Expr) -> Option<Self> {
        match expr.unparenthesized().kind {
            ExprKind::Number { .. } => Some(Self::Number),
            ExprKind::String(_) => Some(Self::String),
            ExprKind::BigInt(_) => Some(Self::BigInt),
            _ => None,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// TypeDescriptor
// ══════════════════════════════════════════════════════════════════════════════

/// A normalized operand type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Number,
    String,
    Boolean,
    BigInt,
    Symbol,
    Object,
    Function,
    Null,
    Undefined,
    /// Any other checker-reported name, kept verbatim (`any`, `Point`,
    /// `number | string`, ...).
    Named(String),
}

impl TypeDescriptor {
    /// Map checker text onto a descriptor without any narrowing.
    pub fn from_text(text: &str) -> Self {
        match text {
            "number" => Self::Number,
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "bigint" => Self::BigInt,
            "symbol" => Self::Symbol,
            "object" => Self::Object,
            "function" => Self::Function,
            "null" => Self::Null,
            "undefined" => Self::Undefined,
            other => Self::Named(other.to_string()),
        }
    }

    /// Canonicalize a node's type.
    ///
    /// The literal kind of the node wins. Otherwise checker text that reads
    /// as a number narrows to `number`, quoted text narrows to `string`, and
    /// anything else is taken verbatim.
    pub fn canonicalize(literal: Option<LiteralKind>, checker_text: &str) -> Self {
        match literal {
            Some(LiteralKind::Number) => return Self::Number,
            Some(LiteralKind::String) => return Self::String,
            Some(LiteralKind::BigInt) => return Self::BigInt,
            None => {}
        }
        let text = checker_text.trim();
        if is_numeric_text(text) {
            Self::Number
        } else if is_quoted(text) {
            Self::String
        } else {
            Self::from_text(text)
        }
    }

    /// Canonical type of an expression.
    pub fn of_expr(expr: &Expr, types: &TypeTable) -> Self {
        Self::canonicalize(LiteralKind::of(expr), types.type_text(expr.id))
    }

    /// `boolean`, `number`, `bigint` or `symbol`.
    pub fn is_safe_primitive(&self) -> bool {
        matches!(self, Self::Boolean | Self::Number | Self::BigInt | Self::Symbol)
    }

    /// Operand types a unary or update operator can be left alone on.
    pub fn is_unary_safe(&self) -> bool {
        matches!(self, Self::Boolean | Self::Number | Self::BigInt)
    }

    /// The `typeof` tag a parameter guard checks for, if this type gets one.
    pub fn guard_tag(&self) -> Option<&'static str> {
        match self {
            Self::Number => Some("number"),
            Self::String => Some("string"),
            Self::BigInt => Some("bigint"),
            Self::Boolean => Some("boolean"),
            Self::Symbol => Some("symbol"),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::BigInt => "bigint",
            Self::Symbol => "symbol",
            Self::Object => "object",
            Self::Function => "function",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric literal type text: `1`, `-2.5`, `1e3`, `0xff`.
fn is_numeric_text(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let Some(first) = digits.chars().next() else {
        return false;
    };
    if !(first.is_ascii_digit() || first == '.') {
        return false;
    }
    let radix = match digits.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    match radix {
        Some(radix) => u64::from_str_radix(&digits[2..], radix).is_ok(),
        None => digits.parse::<f64>().is_ok(),
    }
}

fn is_quoted(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 2
        && matches!(bytes[0], b'"' | b'\'' | b'`')
        && bytes[bytes.len() - 1] == bytes[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_kind_wins() {
        assert_eq!(
            TypeDescriptor::canonicalize(Some(LiteralKind::Number), "string"),
            TypeDescriptor::Number
        );
        assert_eq!(
            TypeDescriptor::canonicalize(Some(LiteralKind::BigInt), "any"),
            TypeDescriptor::BigInt
        );
    }

    #[test]
    fn numeric_text_narrows_to_number() {
        for text in ["1", "-2.5", "1e3", "0xff", ".5"] {
            assert_eq!(
                TypeDescriptor::canonicalize(None, text),
                TypeDescriptor::Number,
                "{text}"
            );
        }
        assert_eq!(
            TypeDescriptor::canonicalize(None, "inf"),
            TypeDescriptor::Named("inf".into())
        );
    }

    #[test]
    fn quoted_text_narrows_to_string() {
        assert_eq!(TypeDescriptor::canonicalize(None, "\"on\""), TypeDescriptor::String);
        assert_eq!(TypeDescriptor::canonicalize(None, "'x'"), TypeDescriptor::String);
        assert_eq!(
            TypeDescriptor::canonicalize(None, "\"on"),
            TypeDescriptor::Named("\"on".into())
        );
    }

    #[test]
    fn other_text_is_verbatim() {
        assert_eq!(TypeDescriptor::canonicalize(None, "boolean"), TypeDescriptor::Boolean);
        assert_eq!(
            TypeDescriptor::canonicalize(None, "Point"),
            TypeDescriptor::Named("Point".into())
        );
        assert_eq!(
            TypeDescriptor::canonicalize(None, "number | string").to_string(),
            "number | string"
        );
    }

    #[test]
    fn guard_tags() {
        assert_eq!(TypeDescriptor::Symbol.guard_tag(), Some("symbol"));
        assert_eq!(TypeDescriptor::Object.guard_tag(), None);
        assert_eq!(TypeDescriptor::Named("any".into()).guard_tag(), None);
    }

    #[test]
    fn table_defaults_to_any() {
        let mut table = TypeTable::new();
        table.insert(NodeId(3), "number");
        table.insert(NodeId::SYNTHETIC, "string");
        assert_eq!(table.type_text(NodeId(3)), "number");
        assert_eq!(table.type_text(NodeId(4)), ANY);
        assert_eq!(table.len(), 1);
    }
}
