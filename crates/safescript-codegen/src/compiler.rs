//! Final compile stage: TypeScript to JavaScript by type erasure, with the
//! printer's native mapping as the output source map.

use safescript_types::ast::Program;
use safescript_types::SourceFile;

use crate::printer::{PrintOptions, Printer};
use crate::source_map::SourceMap;

/// Options for [`compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Keep type annotations in the output.
    pub emit_types: bool,
    /// Produce a source map.
    pub source_map: bool,
    /// Name recorded as the map's `file`.
    pub file: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            emit_types: false,
            source_map: true,
            file: String::new(),
        }
    }
}

/// Output of [`compile`].
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub text: String,
    /// Mapping from `text` back to `source`; `None` unless requested.
    pub source_map: Option<SourceMap>,
}

/// Compile `program`, parsed from `source`.
pub fn compile(program: &Program, source: &SourceFile, options: &CompileOptions) -> CompileOutput {
    let print_options = PrintOptions {
        emit_types: options.emit_types,
    };
    let mut printer = Printer::new(print_options);
    if options.source_map {
        printer = printer.with_mapping(source);
    }
    let printed = printer.print_program(program);
    let source_map = options
        .source_map
        .then(|| SourceMap::new(options.file.clone(), source.name.clone(), &printed.mappings));
    tracing::debug!(
        file = %source.name,
        bytes = printed.text.len(),
        segments = printed.mappings.len(),
        "compiled"
    );
    CompileOutput {
        text: printed.text,
        source_map,
    }
}

/// Append the `sourceMappingURL` comment for `map_file`.
pub fn with_source_mapping_url(text: &str, map_file: &str) -> String {
    format!("{text}\r\n//# sourceMappingURL={map_file}")
}
