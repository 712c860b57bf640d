//! Parameter guards: `typeof` checks synthesized at function entry.
//!
//! A parameter whose canonical type has a `typeof` tag gets
//!
//! ```text
//! if (typeof p !== "number") throw new TypeError("p is not typeof 'number'");
//! ```
//!
//! unless the function body already opens with that exact check. Only the
//! leading run of `if` statements is searched, in either operand order.

use safescript_types::ast::*;
use safescript_types::Span;

use crate::ty::{TypeDescriptor, TypeTable};

/// A check of one parameter against one `typeof` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    pub param: String,
    pub tag: String,
}

impl Guard {
    pub fn new(param: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            tag: tag.into(),
        }
    }

    /// The guard as a statement.
    pub fn to_stmt(&self) -> Stmt {
        let typeof_param = Expr::synthetic(ExprKind::Unary {
            op: UnaryOp::Typeof,
            operand: Box::new(Expr::synthetic(ExprKind::Identifier(self.param.clone()))),
        });
        let condition = Expr::synthetic(ExprKind::Binary {
            op: BinaryOp::StrictNotEq,
            left: Box::new(typeof_param),
            right: Box::new(Expr::synthetic(ExprKind::String(StrLit::synthetic(
                self.tag.clone(),
            )))),
        });
        let message = format!("{} is not typeof '{}'", self.param, self.tag);
        let error = Expr::synthetic(ExprKind::New {
            callee: Box::new(Expr::synthetic(ExprKind::Identifier("TypeError".into()))),
            args: vec![Expr::synthetic(ExprKind::String(StrLit::synthetic(message)))],
        });
        let throw = Stmt::new(StmtKind::Throw(error), Span::DUMMY);
        Stmt::new(
            StmtKind::If(IfStmt {
                condition,
                then_branch: Box::new(throw),
                else_branch: None,
            }),
            Span::DUMMY,
        )
    }

    /// Read a guard back out of an `if` statement, accepting
    /// `typeof p !== "t"` and `"t" !== typeof p`.
    pub fn recognize(stmt: &Stmt) -> Option<Self> {
        let StmtKind::If(if_stmt) = &stmt.kind else {
            return None;
        };
        let ExprKind::Binary {
            op: BinaryOp::StrictNotEq,
            left,
            right,
        } = &if_stmt.condition.unparenthesized().kind
        else {
            return None;
        };
        let sides = (&left.unparenthesized().kind, &right.unparenthesized().kind);
        let (typeof_side, tag_side) = match sides {
            (ExprKind::Unary { .. }, ExprKind::String(_)) => (left, right),
            (ExprKind::String(_), ExprKind::Unary { .. }) => (right, left),
            _ => return None,
        };
        let ExprKind::Unary {
            op: UnaryOp::Typeof,
            operand,
        } = &typeof_side.unparenthesized().kind
        else {
            return None;
        };
        let ExprKind::Identifier(param) = &operand.unparenthesized().kind else {
            return None;
        };
        let ExprKind::String(tag) = &tag_side.unparenthesized().kind else {
            return None;
        };
        Some(Self::new(param.clone(), tag.value.clone()))
    }
}

/// Guards already present in the leading run of `if` statements.
pub fn existing_guards(body: &[Stmt]) -> Vec<Guard> {
    body.iter()
        .take_while(|stmt| stmt.is_if())
        .filter_map(Guard::recognize)
        .collect()
}

/// The guards `function` still needs, in parameter order.
pub fn missing_guards(function: &Function, types: &TypeTable) -> Vec<Guard> {
    if !function.kind.is_guarded() {
        return Vec::new();
    }
    let existing = existing_guards(function.body.statements());
    function
        .params
        .iter()
        .filter_map(|param| {
            let ty = TypeDescriptor::canonicalize(None, types.type_text(param.id));
            let tag = ty.guard_tag()?;
            Some(Guard::new(param.name.name.clone(), tag))
        })
        .filter(|guard| !existing.contains(guard))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(id: u32, name: &str) -> Param {
        Param {
            id: NodeId(id),
            name: Ident::synthetic(name),
            type_ann: None,
            default: None,
            span: Span::DUMMY,
        }
    }

    fn function(kind: FunctionKind, params: Vec<Param>, stmts: Vec<Stmt>) -> Function {
        Function {
            id: NodeId(100),
            kind,
            name: None,
            is_static: false,
            params,
            return_type: None,
            body: FunctionBody::Block(Block {
                stmts,
                span: Span::DUMMY,
            }),
            span: Span::DUMMY,
        }
    }

    fn table(entries: &[(u32, &str)]) -> TypeTable {
        let mut table = TypeTable::new();
        for (id, text) in entries {
            table.insert(NodeId(*id), *text);
        }
        table
    }

    #[test]
    fn typed_parameter_gets_one_guard() {
        let f = function(FunctionKind::Declaration, vec![param(1, "x")], vec![]);
        let guards = missing_guards(&f, &table(&[(1, "number")]));
        assert_eq!(guards, vec![Guard::new("x", "number")]);
    }

    #[test]
    fn existing_check_is_not_duplicated() {
        let body = vec![Guard::new("x", "number").to_stmt()];
        let f = function(FunctionKind::Declaration, vec![param(1, "x")], body);
        assert!(missing_guards(&f, &table(&[(1, "number")])).is_empty());
    }

    #[test]
    fn reversed_operand_order_is_recognized() {
        let guard = Guard::new("s", "string").to_stmt();
        let StmtKind::If(mut if_stmt) = guard.kind else {
            panic!("guard is an if statement");
        };
        if let ExprKind::Binary { left, right, .. } = &mut if_stmt.condition.kind {
            std::mem::swap(left, right);
        }
        let reversed = Stmt::new(StmtKind::If(if_stmt), Span::DUMMY);
        assert_eq!(Guard::recognize(&reversed), Some(Guard::new("s", "string")));
    }

    #[test]
    fn scan_stops_after_leading_ifs() {
        let other = Stmt::new(StmtKind::Empty, Span::DUMMY);
        let body = vec![other, Guard::new("x", "number").to_stmt()];
        assert!(existing_guards(&body).is_empty());
    }

    #[test]
    fn untagged_and_unguarded_kinds() {
        let types = table(&[(1, "any"), (2, "1"), (3, "Point")]);
        let f = function(
            FunctionKind::Method,
            vec![param(1, "a"), param(2, "b"), param(3, "c")],
            vec![],
        );
        assert_eq!(missing_guards(&f, &types), vec![Guard::new("b", "number")]);

        let expr = function(FunctionKind::Expression, vec![param(2, "b")], vec![]);
        assert!(missing_guards(&expr, &types).is_empty());
    }

    #[test]
    fn guard_for_a_different_type_does_not_count() {
        let body = vec![Guard::new("x", "string").to_stmt()];
        let f = function(FunctionKind::Arrow, vec![param(1, "x")], body);
        assert_eq!(
            missing_guards(&f, &table(&[(1, "number")])),
            vec![Guard::new("x", "number")]
        );
    }
}
