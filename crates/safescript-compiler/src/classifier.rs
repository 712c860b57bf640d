//! Operator classifier: decides, per operator site, whether the operator can
//! stay as written or must become a runtime call.
//!
//! Classification is total. Anything the checker could not resolve lands
//! outside the safe sets and is rewritten.

use safescript_types::ast::{Expr, ExprKind};
use safescript_types::RuntimeOp;

use crate::ty::{TypeDescriptor, TypeTable};

/// Outcome of classifying one operator site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Unchanged,
    RewriteTo(RuntimeOp),
}

impl Decision {
    pub fn is_rewrite(self) -> bool {
        matches!(self, Self::RewriteTo(_))
    }
}

/// One operator occurrence with the canonical types of its operands.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorSite<'a> {
    Binary {
        operator: &'a str,
        left: TypeDescriptor,
        right: TypeDescriptor,
    },
    CompoundAssign {
        operator: &'a str,
        left: TypeDescriptor,
        right: TypeDescriptor,
    },
    Unary {
        operator: &'a str,
        operand: TypeDescriptor,
    },
    Update {
        operator: &'a str,
        operand: TypeDescriptor,
    },
}

impl<'a> OperatorSite<'a> {
    /// The operator site an expression forms, if any.
    pub fn of_expr(expr: &'a Expr, types: &TypeTable) -> Option<Self> {
        let of = |e: &Expr| TypeDescriptor::of_expr(e, types);
        Some(match &expr.kind {
            ExprKind::Binary { op, left, right } => Self::Binary {
                operator: op.as_str(),
                left: of(left),
                right: of(right),
            },
            ExprKind::Assign { op, target, value } if op.is_compound() => Self::CompoundAssign {
                operator: op.as_str(),
                left: of(target),
                right: of(value),
            },
            ExprKind::Unary { op, operand } => Self::Unary {
                operator: op.as_str(),
                operand: of(operand),
            },
            ExprKind::Update { op, operand, .. } => Self::Update {
                operator: op.as_str(),
                operand: of(operand),
            },
            _ => return None,
        })
    }

    pub fn operator(&self) -> &'a str {
        match self {
            Self::Binary { operator, .. }
            | Self::CompoundAssign { operator, .. }
            | Self::Unary { operator, .. }
            | Self::Update { operator, .. } => operator,
        }
    }
}

/// Classify an operator site.
///
/// Binary and compound operators stay when both operands are strings or both
/// come from the safe primitive set. Unary and update operators stay when
/// their operand is a boolean, number or bigint. Operators outside the
/// runtime's operation set always stay.
pub fn classify(site: &OperatorSite<'_>) -> Decision {
    let (op, safe) = match site {
        OperatorSite::Binary {
            operator,
            left,
            right,
        } => (RuntimeOp::for_binary(operator), binary_safe(left, right)),
        OperatorSite::CompoundAssign {
            operator,
            left,
            right,
        } => (RuntimeOp::for_compound(operator), binary_safe(left, right)),
        OperatorSite::Unary { operator, operand } => {
            (RuntimeOp::for_unary(operator), operand.is_unary_safe())
        }
        OperatorSite::Update { operator, operand } => {
            (RuntimeOp::for_update(operator), operand.is_unary_safe())
        }
    };
    match op {
        Some(op) if !safe => Decision::RewriteTo(op),
        _ => Decision::Unchanged,
    }
}

fn binary_safe(left: &TypeDescriptor, right: &TypeDescriptor) -> bool {
    let both_strings = *left == TypeDescriptor::String && *right == TypeDescriptor::String;
    both_strings || (left.is_safe_primitive() && right.is_safe_primitive())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BINARY: [&str; 18] = [
        "+", "-", "*", "/", "%", "**", "==", "!=", ">", ">=", "<", "<=", "&", "|", "^", ">>",
        ">>>", "<<",
    ];
    const TYPES: [&str; 6] = ["number", "string", "boolean", "bigint", "symbol", "object"];

    fn binary(operator: &str, left: &str, right: &str) -> Decision {
        classify(&OperatorSite::Binary {
            operator,
            left: TypeDescriptor::from_text(left),
            right: TypeDescriptor::from_text(right),
        })
    }

    fn unary(operator: &str, operand: &str) -> Decision {
        classify(&OperatorSite::Unary {
            operator,
            operand: TypeDescriptor::from_text(operand),
        })
    }

    #[test]
    fn binary_matrix() {
        let safe = ["number", "boolean", "bigint", "symbol"];
        for operator in BINARY {
            let expected_op = RuntimeOp::for_binary(operator);
            assert!(expected_op.is_some(), "{operator}");
            for left in TYPES {
                for right in TYPES {
                    let unchanged = (left == "string" && right == "string")
                        || (safe.contains(&left) && safe.contains(&right));
                    let expected = if unchanged {
                        Decision::Unchanged
                    } else {
                        Decision::RewriteTo(expected_op.unwrap())
                    };
                    assert_eq!(
                        binary(operator, left, right),
                        expected,
                        "{left} {operator} {right}"
                    );
                }
            }
        }
    }

    #[test]
    fn unresolved_types_are_rewritten() {
        assert_eq!(binary("+", "any", "number"), Decision::RewriteTo(RuntimeOp::Add));
        assert_eq!(binary("<", "null", "undefined"), Decision::RewriteTo(RuntimeOp::Lt));
        assert_eq!(binary("*", "Point", "number"), Decision::RewriteTo(RuntimeOp::Mul));
    }

    #[test]
    fn non_runtime_operators_stay() {
        assert_eq!(binary("===", "any", "object"), Decision::Unchanged);
        assert_eq!(binary("&&", "any", "any"), Decision::Unchanged);
        assert_eq!(unary("!", "object"), Decision::Unchanged);
        assert_eq!(unary("typeof", "any"), Decision::Unchanged);
    }

    #[test]
    fn compound_forms() {
        let site = |operator, left: &str| OperatorSite::CompoundAssign {
            operator,
            left: TypeDescriptor::from_text(left),
            right: TypeDescriptor::Number,
        };
        assert_eq!(classify(&site("+=", "number")), Decision::Unchanged);
        assert_eq!(classify(&site("+=", "string")), Decision::RewriteTo(RuntimeOp::Add));
        assert_eq!(classify(&site("%=", "any")), Decision::RewriteTo(RuntimeOp::Mod));
        assert_eq!(classify(&site("**=", "any")), Decision::Unchanged);
    }

    #[test]
    fn unary_and_update_safe_set() {
        assert_eq!(unary("-", "number"), Decision::Unchanged);
        assert_eq!(unary("~", "bigint"), Decision::Unchanged);
        assert_eq!(unary("+", "boolean"), Decision::Unchanged);
        assert_eq!(unary("-", "symbol"), Decision::RewriteTo(RuntimeOp::Minus));
        assert_eq!(unary("+", "string"), Decision::RewriteTo(RuntimeOp::Plus));
        assert_eq!(unary("~", "object"), Decision::RewriteTo(RuntimeOp::BitNot));

        let update = |operator, operand: &str| {
            classify(&OperatorSite::Update {
                operator,
                operand: TypeDescriptor::from_text(operand),
            })
        };
        assert_eq!(update("++", "number"), Decision::Unchanged);
        assert_eq!(update("--", "string"), Decision::RewriteTo(RuntimeOp::Dec));
        assert_eq!(update("++", "symbol"), Decision::RewriteTo(RuntimeOp::Inc));
    }

    #[test]
    fn site_exposes_operator() {
        let site = OperatorSite::Unary {
            operator: "~",
            operand: TypeDescriptor::Number,
        };
        assert_eq!(site.operator(), "~");
        assert!(!classify(&site).is_rewrite());
    }
}
