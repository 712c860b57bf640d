//! SafeScript code generation and position mapping.
//!
//! # Architecture
//!
//! - [`printer`], with its expression and statement emitters, turns a
//!   [`safescript_types::ast::Program`] back into text, optionally recording
//!   a native mapping from printed positions to the spans of the printed AST.
//! - [`compiler`] is the final compile stage (type erasure) built on the
//!   printer.
//! - [`correspondence`] reconstructs a mapping between two structurally
//!   different trees when no native mapping exists.
//! - [`compose`] chains two mappings into one.
//! - [`source_map`] and [`vlq`] are the v3 file model and its encoding.

pub mod compiler;
pub mod compose;
pub mod correspondence;
pub mod error;
mod expr;
pub mod printer;
pub mod source_map;
mod stmt;
pub mod vlq;

pub use compiler::{compile, with_source_mapping_url, CompileOptions, CompileOutput};
pub use compose::{compose, compose_source_maps};
pub use correspondence::find_mapping;
pub use error::{MappingError, MappingResult};
pub use printer::{print_program, PrintOptions, Printed, Printer};
pub use source_map::{Mappings, Segment, SourceMap};
