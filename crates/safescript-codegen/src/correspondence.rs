//! Correspondence finder: reconstructs a position mapping between an
//! original program and a rewritten one when no printer mapping exists.
//!
//! Every *atomic* node of the original tree (a function-like node, or a
//! leaf whose text is not a rewritable operator) is looked up in the
//! rewritten tree: the first node in pre-order with the same kind and text
//! that starts at or after a search cursor. Each match emits one segment and
//! moves the cursor past it, so matches are left to right and never overlap.
//!
//! Guard statements injected at function entry have no counterpart in the
//! original. When a matched function gained `n` `if` statements, the first
//! `n` `if` statements of its rewritten body are skipped by later searches.
//!
//! Nodes that cannot be found are left unmapped.

use std::collections::HashMap;

use safescript_types::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};
use safescript_types::RuntimeOp;

use crate::source_map::{Mappings, Segment};

/// Map `original` onto `rewritten`.
pub fn find_mapping(original: &SyntaxTree, rewritten: &SyntaxTree) -> Mappings {
    let mut finder = Finder {
        original,
        rewritten,
        full_start: 0,
        injected_ifs: HashMap::new(),
        mappings: Mappings::new(),
    };
    finder.visit(&original.root);
    tracing::debug!(
        segments = finder.mappings.len(),
        file = %original.source.name,
        "reconstructed correspondence mapping"
    );
    finder.mappings
}

/// Identity of a rewritten function-like node.
type NodeKey = (usize, SyntaxKind);

fn key(node: &SyntaxNode) -> NodeKey {
    (node.span.start, node.kind)
}

struct Finder<'t> {
    original: &'t SyntaxTree,
    rewritten: &'t SyntaxTree,
    /// Matches must start at or after this byte offset of the rewritten text.
    full_start: usize,
    /// Guard statements injected into each rewritten function-like node.
    injected_ifs: HashMap<NodeKey, usize>,
    mappings: Mappings,
}

impl<'t> Finder<'t> {
    fn visit(&mut self, node: &'t SyntaxNode) {
        let text = self.original.text(node);
        if text.is_empty() {
            return;
        }
        let atomic = node.kind.is_function_like()
            || (node.is_leaf() && !RuntimeOp::is_rewritable_token(text));
        if atomic {
            if let Some(found) = self.find(&self.rewritten.root, node.kind, text) {
                self.record(node, found);
            }
        }
        for child in &node.children {
            self.visit(child);
        }
    }

    /// First node under `search`, in pre-order, matching `kind` and `text`
    /// at or after the cursor.
    fn find(&self, search: &'t SyntaxNode, kind: SyntaxKind, text: &str) -> Option<&'t SyntaxNode> {
        if search.span.end <= self.full_start {
            return None;
        }
        if search.kind == kind && search.span.start >= self.full_start {
            let candidate = self.rewritten.text(search);
            if !candidate.is_empty() && candidate == text {
                return Some(search);
            }
        }

        let skip = if search.kind.is_function_like() {
            self.injected_ifs.get(&key(search)).copied().unwrap_or(0)
        } else {
            0
        };
        let body = if skip > 0 { search.body_block() } else { None };

        for child in &search.children {
            if body.is_some_and(|b| std::ptr::eq(b, child)) {
                let mut remaining = skip;
                for stmt in &child.children {
                    if remaining > 0 && stmt.kind == SyntaxKind::IfStatement {
                        remaining -= 1;
                        continue;
                    }
                    if let Some(found) = self.find(stmt, kind, text) {
                        return Some(found);
                    }
                }
                continue;
            }
            if let Some(found) = self.find(child, kind, text) {
                return Some(found);
            }
        }
        None
    }

    fn record(&mut self, original: &SyntaxNode, found: &SyntaxNode) {
        let (original_line, original_column) = self.original.position(original);
        let (generated_line, generated_column) = self.rewritten.position(found);
        self.mappings.push(
            generated_line,
            Segment::new(generated_column, original_line, original_column),
        );

        self.full_start = if found.kind.is_function_like() {
            found.span.start
        } else {
            found.span.start + 1
        };

        if original.kind.is_function_like() && found.kind == original.kind {
            let injected = if_count(found).saturating_sub(if_count(original));
            if injected > 0 {
                self.injected_ifs.insert(key(found), injected);
            }
        }
    }
}

/// `if` statements directly in a function-like node's body block.
fn if_count(function: &SyntaxNode) -> usize {
    function.body_block().map_or(0, |body| {
        body.children
            .iter()
            .filter(|c| c.kind == SyntaxKind::IfStatement)
            .count()
    })
}
