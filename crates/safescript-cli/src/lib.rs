//! Command-line driver for the SafeScript transformer.
//!
//! - [`args`]: clap argument definitions
//! - [`driver`]: source tree traversal, per-file transform and emission
//! - [`reporter`]: diagnostic formatting
//! - [`tracing_config`]: `SAFESCRIPT_LOG` subscriber setup

pub mod args;
pub mod driver;
pub mod reporter;
pub mod tracing_config;
