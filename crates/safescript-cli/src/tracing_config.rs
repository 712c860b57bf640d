//! Tracing setup for the CLI.
//!
//! The subscriber is only installed when `SAFESCRIPT_LOG` (or `RUST_LOG`) is
//! set. `SAFESCRIPT_LOG_FORMAT=json` switches from plain text lines to one
//! JSON object per event. All output goes to stderr.
//!
//! ```bash
//! SAFESCRIPT_LOG=debug safescript -s src -d dist
//! SAFESCRIPT_LOG="safescript_compiler=trace" SAFESCRIPT_LOG_FORMAT=json safescript -s src
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("SAFESCRIPT_LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// `SAFESCRIPT_LOG` takes precedence over `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var("SAFESCRIPT_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber. Does nothing when neither variable is set.
pub fn init_tracing() {
    if std::env::var("SAFESCRIPT_LOG").is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
