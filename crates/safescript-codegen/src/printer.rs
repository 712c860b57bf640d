//! Text emitter: turns a [`Program`] back into JavaScript or TypeScript.
//!
//! Output is normalized: four-space indentation, one statement per line,
//! explicit semicolons, and parentheses only where precedence needs them
//! (or where the program already had them). Comments are not preserved.
//!
//! When built [`Printer::with_mapping`], every statement, expression and
//! declared name that carries a real span records a segment from its printed
//! position back to its position in the source it was parsed from.

use safescript_types::ast::Program;
use safescript_types::{SourceFile, Span};

use crate::source_map::{Mappings, Segment};

/// One indentation level.
pub const INDENT: &str = "    ";

/// Printer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// Keep TypeScript type annotations; `false` erases them.
    pub emit_types: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self { emit_types: true }
    }
}

/// Printed text and, if requested, its mapping back to the input.
#[derive(Debug, Clone, Default)]
pub struct Printed {
    pub text: String,
    pub mappings: Mappings,
}

/// Emits a program as text.
pub struct Printer<'s> {
    pub(crate) options: PrintOptions,
    /// Source the printed AST was parsed from; enables mapping.
    source: Option<&'s SourceFile>,
    out: String,
    line: u32,
    column: u32,
    indent: usize,
    mappings: Mappings,
}

impl<'s> Printer<'s> {
    pub fn new(options: PrintOptions) -> Self {
        Self {
            options,
            source: None,
            out: String::new(),
            line: 0,
            column: 0,
            indent: 0,
            mappings: Mappings::new(),
        }
    }

    /// Record a mapping against `source`, the text the AST's spans point into.
    pub fn with_mapping(mut self, source: &'s SourceFile) -> Self {
        self.source = Some(source);
        self
    }

    /// Print a whole program.
    pub fn print_program(mut self, program: &Program) -> Printed {
        for stmt in &program.body {
            self.stmt(stmt);
        }
        Printed {
            text: self.out,
            mappings: self.mappings,
        }
    }

    // ── Output ────────────────────────────────────────────────────────────────

    pub(crate) fn write(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += ch.len_utf16() as u32;
            }
        }
        self.out.push_str(text);
    }

    pub(crate) fn newline(&mut self) {
        self.write("\n");
    }

    pub(crate) fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
        self.column += (self.indent * INDENT.len()) as u32;
    }

    pub(crate) fn indent(&mut self) {
        self.indent += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Map the current output position to the start of `span`.
    pub(crate) fn mark(&mut self, span: Span) {
        let Some(source) = self.source else {
            return;
        };
        if span.is_dummy() {
            return;
        }
        let duplicate = self
            .mappings
            .line(self.line)
            .last()
            .is_some_and(|s| s.generated_column == self.column);
        if duplicate {
            return;
        }
        let (line, column) = source.position(span.start);
        self.mappings
            .push(self.line, Segment::new(self.column, line, column));
    }
}

/// Print `program` without recording a mapping.
pub fn print_program(program: &Program, options: PrintOptions) -> String {
    Printer::new(options).print_program(program).text
}
