use serde::{Deserialize, Serialize};
use std::fmt;

/// Global object the runtime installs itself under; rewritten call sites
/// are emitted as `SafeScript.<name>(...)`.
pub const RUNTIME_NAMESPACE: &str = "SafeScript";

/// The closed set of coercion-runtime operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    And,
    Or,
    Xor,
    Rshift,
    Arshift,
    Lshift,
    Plus,
    Minus,
    BitNot,
    Inc,
    Dec,
    Suffix,
}

impl RuntimeOp {
    /// Every operation, in declaration order.
    pub const ALL: [RuntimeOp; 24] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Exp,
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Ge,
        Self::Lt,
        Self::Le,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Rshift,
        Self::Arshift,
        Self::Lshift,
        Self::Plus,
        Self::Minus,
        Self::BitNot,
        Self::Inc,
        Self::Dec,
        Self::Suffix,
    ];

    /// Name of the runtime function.
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Exp => "exp",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Rshift => "rshift",
            Self::Arshift => "arshift",
            Self::Lshift => "lshift",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::BitNot => "bit_not",
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::Suffix => "suffix",
        }
    }

    /// Look up an operation by runtime function name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// Number of arguments the runtime function takes.
    pub fn arity(self) -> usize {
        match self {
            Self::Suffix => 0,
            Self::Plus | Self::Minus | Self::BitNot | Self::Inc | Self::Dec => 1,
            _ => 2,
        }
    }

    /// Operations whose overload is only ever looked up on the left operand.
    pub fn is_left_handed_only(self) -> bool {
        matches!(
            self,
            Self::Rshift
                | Self::Arshift
                | Self::Lshift
                | Self::Plus
                | Self::Minus
                | Self::BitNot
                | Self::Inc
                | Self::Dec
                | Self::Suffix
        )
    }

    /// Runtime operation for a binary operator token.
    pub fn for_binary(operator: &str) -> Option<Self> {
        Some(match operator {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Mod,
            "**" => Self::Exp,
            "==" => Self::Eq,
            "!=" => Self::Ne,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            "<" => Self::Lt,
            "<=" => Self::Le,
            "&" => Self::And,
            "|" => Self::Or,
            "^" => Self::Xor,
            ">>" => Self::Rshift,
            ">>>" => Self::Arshift,
            "<<" => Self::Lshift,
            _ => return None,
        })
    }

    /// Runtime operation for a compound assignment token.
    pub fn for_compound(operator: &str) -> Option<Self> {
        Some(match operator {
            "+=" => Self::Add,
            "-=" => Self::Sub,
            "*=" => Self::Mul,
            "/=" => Self::Div,
            "%=" => Self::Mod,
            _ => return None,
        })
    }

    /// Runtime operation for a prefix unary operator token.
    pub fn for_unary(operator: &str) -> Option<Self> {
        Some(match operator {
            "+" => Self::Plus,
            "-" => Self::Minus,
            "~" => Self::BitNot,
            _ => return None,
        })
    }

    /// Runtime operation for an update operator token.
    pub fn for_update(operator: &str) -> Option<Self> {
        Some(match operator {
            "++" => Self::Inc,
            "--" => Self::Dec,
            _ => return None,
        })
    }

    /// `true` for every operator token the rewrite engine may replace.
    ///
    /// Such tokens have no counterpart in the rewritten text, so they are
    /// never used as correspondence anchors.
    pub fn is_rewritable_token(token: &str) -> bool {
        Self::for_binary(token).is_some()
            || Self::for_compound(token).is_some()
            || Self::for_unary(token).is_some()
            || Self::for_update(token).is_some()
    }
}

impl fmt::Display for RuntimeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", RUNTIME_NAMESPACE, self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for op in RuntimeOp::ALL {
            assert_eq!(RuntimeOp::from_name(op.name()), Some(op));
        }
        assert_eq!(RuntimeOp::from_name("rshfit"), None);
    }

    #[test]
    fn compound_forms_reuse_arithmetic() {
        assert_eq!(RuntimeOp::for_compound("+="), Some(RuntimeOp::Add));
        assert_eq!(RuntimeOp::for_compound("%="), Some(RuntimeOp::Mod));
        assert_eq!(RuntimeOp::for_compound("**="), None);
        assert_eq!(RuntimeOp::for_compound("<<="), None);
    }

    #[test]
    fn shift_names() {
        assert_eq!(RuntimeOp::for_binary(">>"), Some(RuntimeOp::Rshift));
        assert_eq!(RuntimeOp::for_binary(">>>"), Some(RuntimeOp::Arshift));
        assert_eq!(RuntimeOp::for_binary("<<"), Some(RuntimeOp::Lshift));
    }

    #[test]
    fn strict_equality_is_not_rewritable() {
        assert!(!RuntimeOp::is_rewritable_token("==="));
        assert!(!RuntimeOp::is_rewritable_token("&&"));
        assert!(RuntimeOp::is_rewritable_token("~"));
        assert!(RuntimeOp::is_rewritable_token("--"));
    }

    #[test]
    fn display_is_qualified() {
        assert_eq!(RuntimeOp::BitNot.to_string(), "SafeScript.bit_not");
        assert_eq!(RuntimeOp::Suffix.arity(), 0);
    }
}
