//! Transform pipeline: parse, check, inject the runtime import, rewrite to a
//! fixed point, and reconstruct the source map of the result.
//!
//! ```text
//! source → parse → check → inject import → rewrite ⟲ (print → reparse → check) → print
//! ```
//!
//! Each pass after the first works on the printed and reparsed output of the
//! previous one, so operator sites nested inside a rewritten site become
//! visible to the classifier with their own types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use safescript_codegen::{
    compile, compose_source_maps, find_mapping, print_program, CompileOptions,
    PrintOptions, SourceMap,
};
use safescript_parser::parse_source;
use safescript_types::ast::Program;
use safescript_types::{CompileErrors, ErrorCode, SafeScriptError, SourceFile, Span};

use crate::checker::check_program;
use crate::rewrite::rewrite;
use crate::runtime_import::{detect_module_kind, inject_runtime_import, ModuleKind};

/// Upper bound on rewrite passes per file.
pub const MAX_REWRITE_PASSES: usize = 64;

/// Options for [`transform`]. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Module style used when the file itself shows none.
    pub module: ModuleKind,
    /// Reconstruct the mapping from the output back to the input.
    pub source_map: bool,
    pub max_passes: usize,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            module: ModuleKind::Es,
            source_map: true,
            max_passes: MAX_REWRITE_PASSES,
        }
    }
}

/// Result of transforming one file.
///
/// Serializable so it can be returned as JSON to tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformResult {
    /// `true` if no error-category diagnostic was reported.
    pub success: bool,
    /// The rewritten text. `None` on failure.
    pub code: Option<String>,
    /// Mapping from `code` back to the input. `None` on failure or when not
    /// requested.
    pub source_map: Option<SourceMap>,
    pub errors: CompileErrors,
    /// `true` if the output differs structurally from the input.
    pub changed: bool,
    /// Rewrite passes run, including the final one that found nothing.
    pub passes: usize,
    /// Module style of the injected runtime import.
    pub module: ModuleKind,
    /// SHA-256 of `code`, hex encoded.
    pub output_hash: Option<String>,
}

impl TransformResult {
    fn failed(errors: CompileErrors, module: ModuleKind, passes: usize) -> Self {
        Self {
            success: false,
            code: None,
            source_map: None,
            errors,
            changed: false,
            passes,
            module,
            output_hash: None,
        }
    }
}

/// Transform `source`, reporting positions against `filename`.
pub fn transform(source: &str, filename: &str, options: &TransformOptions) -> TransformResult {
    let file = Arc::new(SourceFile::new(filename, source));
    let parsed = parse_source(&file);
    let mut errors = parsed.errors.clone();
    let program = match &parsed.program {
        Some(program) if !errors.has_errors() => program,
        _ => return TransformResult::failed(errors, options.module, 0),
    };

    let module = detect_module_kind(program).unwrap_or(options.module);
    let mut current = program.clone();
    let injected = inject_runtime_import(&mut current, module);
    let mut types = check_program(&current, &file, &mut errors);

    let mut changed = injected;
    let mut passes = 0;
    let mut converged = false;
    while passes < options.max_passes {
        let outcome = rewrite(&current, &types);
        passes += 1;
        tracing::debug!(
            file = filename,
            pass = passes,
            sites = outcome.sites,
            guards = outcome.guards,
            changed = outcome.changed,
            "rewrite pass"
        );
        if !outcome.changed {
            converged = true;
            break;
        }
        changed = true;

        let text = print_program(&outcome.program, PrintOptions::default());
        let next_file = SourceFile::new(filename, text);
        let reparsed = parse_source(&next_file);
        match reparsed.program {
            Some(program) if !reparsed.errors.has_errors() => {
                // Diagnostics already came from the input; later passes only need types.
                types = check_program(&program, &next_file, &mut CompileErrors::empty());
                current = program;
            }
            _ => {
                let detail = reparsed
                    .errors
                    .errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_default();
                errors.push_error(pipeline_error(
                    &file,
                    ErrorCode::REPARSE_FAILED,
                    format!("rewrite pass {passes} produced unparsable output: {detail}"),
                ));
                return TransformResult::failed(errors, module, passes);
            }
        }
    }

    if !converged {
        errors.push_error(pipeline_error(
            &file,
            ErrorCode::FIXED_POINT_NOT_REACHED,
            format!("rewriting did not settle within {} passes", options.max_passes),
        ));
        return TransformResult::failed(errors, module, passes);
    }

    let code = print_program(&current, PrintOptions::default());
    let source_map = if options.source_map {
        rewrite_map(&parsed, &file, &code)
    } else {
        None
    };
    let output_hash = hex_digest(&code);
    tracing::debug!(
        file = filename,
        passes,
        changed,
        module = module.as_str(),
        "transformed"
    );

    TransformResult {
        success: !errors.has_errors(),
        code: Some(code),
        source_map,
        errors,
        changed,
        passes,
        module,
        output_hash: Some(output_hash),
    }
}

/// Parse and type-check without rewriting; returns the diagnostics only.
pub fn check(source: &str, filename: &str) -> CompileErrors {
    let file = SourceFile::new(filename, source);
    let parsed = parse_source(&file);
    let mut errors = parsed.errors;
    if let Some(program) = &parsed.program {
        if !errors.has_errors() {
            check_program(program, &file, &mut errors);
        }
    }
    errors
}

/// The correspondence map from `code` back to the parsed input.
fn rewrite_map(
    parsed: &safescript_parser::ParseResult,
    file: &Arc<SourceFile>,
    code: &str,
) -> Option<SourceMap> {
    let original = parsed.syntax_tree(Arc::clone(file))?;
    let output = Arc::new(SourceFile::new(file.name.clone(), code));
    let rewritten = parse_source(&output).syntax_tree(Arc::clone(&output))?;
    let mappings = find_mapping(&original, &rewritten);
    Some(SourceMap::new(file.name.clone(), file.name.clone(), &mappings))
}

fn pipeline_error(file: &SourceFile, code: ErrorCode, message: String) -> SafeScriptError {
    let source_line = file.line(1).unwrap_or_default();
    SafeScriptError::new(&file.name, code, message, Span::point(0, 1, 1), source_line)
}

fn hex_digest(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

// ══════════════════════════════════════════════════════════════════════════════
// TypeScript → JavaScript
// ══════════════════════════════════════════════════════════════════════════════

/// Errors of [`compile_javascript`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{} error(s) while compiling {file}", .errors.total_errors)]
    Diagnostics { file: String, errors: CompileErrors },
}

/// JavaScript compiled from a transformed TypeScript file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JavaScriptOutput {
    pub code: String,
    /// Composed mapping from `code` back to the original TypeScript.
    pub source_map: Option<SourceMap>,
}

/// Compile transformed TypeScript `code` to JavaScript named `output_file`.
///
/// With `rewrite_map` (transformed → original), the compile stage's own
/// mapping (JavaScript → transformed) is composed onto it, so the result
/// maps the JavaScript straight back to the original input.
pub fn compile_javascript(
    code: &str,
    filename: &str,
    output_file: &str,
    rewrite_map: Option<&SourceMap>,
) -> Result<JavaScriptOutput, PipelineError> {
    let file = SourceFile::new(filename, code);
    let parsed = parse_source(&file);
    let program: &Program = match &parsed.program {
        Some(program) if !parsed.errors.has_errors() => program,
        _ => {
            return Err(PipelineError::Diagnostics {
                file: filename.to_string(),
                errors: parsed.errors.clone(),
            })
        }
    };

    let options = CompileOptions {
        emit_types: false,
        source_map: rewrite_map.is_some(),
        file: output_file.to_string(),
    };
    let output = compile(program, &file, &options);
    let source_map = match (rewrite_map, &output.source_map) {
        (Some(first), Some(second)) => match compose_source_maps(first, second) {
            Ok(map) => Some(map),
            Err(e) => {
                let mut errors = CompileErrors::empty();
                errors.push_error(pipeline_error(
                    &file,
                    ErrorCode::MALFORMED_MAPPING,
                    format!("cannot compose the rewrite map: {e}"),
                ));
                return Err(PipelineError::Diagnostics {
                    file: filename.to_string(),
                    errors,
                });
            }
        },
        _ => None,
    };
    Ok(JavaScriptOutput {
        code: output.text,
        source_map,
    })
}
