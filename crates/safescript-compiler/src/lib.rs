//! SafeScript compiler: orchestrates the transform pipeline.
//!
//! ```text
//! Source → Lexer → Parser → Type Checker → Classifier/Rewriter ⟲ → Printer → Source + map
//! ```
//!
//! [`transform`] is the entry point. The stages are public for tools that
//! need only part of the pipeline.

pub mod checker;
pub mod classifier;
pub mod env;
pub mod guards;
pub mod rewrite;
pub mod runtime_import;
pub mod transform;
pub mod ty;

pub use checker::check_program;
pub use classifier::{classify, Decision, OperatorSite};
pub use rewrite::{rewrite, RewriteOutcome};
pub use runtime_import::ModuleKind;
pub use transform::{
    check, compile_javascript, transform, JavaScriptOutput, PipelineError, TransformOptions,
    TransformResult, MAX_REWRITE_PASSES,
};
pub use ty::{TypeDescriptor, TypeTable};
