//! Opt-in `tracing` subscriber for the opconv crates.
//!
//! Nothing is installed until `init_tracing` is called, and then only when a
//! filter is configured:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `OPCONV_LOG` | `EnvFilter` directives; `RUST_LOG` is read when unset |
//! | `OPCONV_LOG_FORMAT` | `text` (default), `tree` or `json` |
//!
//! Resolver lookups are recorded on target `opconv::resolution`, lowering
//! decisions under `opconv_lowering`:
//!
//! ```bash
//! OPCONV_LOG="opconv::resolution=trace" OPCONV_LOG_FORMAT=json cargo test
//! OPCONV_LOG="opconv_lowering=debug" OPCONV_LOG_FORMAT=tree cargo test
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};
use tracing_tree::HierarchicalLayer;

const FILTER_VAR: &str = "OPCONV_LOG";
const FORMAT_VAR: &str = "OPCONV_LOG_FORMAT";

/// How records are written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per event.
    Text,
    /// Spans nested by indentation.
    Tree,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Case-insensitive; anything unrecognised is `Text`.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("tree") {
            Self::Tree
        } else if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

fn configured_filter() -> Option<EnvFilter> {
    match std::env::var(FILTER_VAR) {
        Ok(directives) => Some(EnvFilter::builder().parse_lossy(directives)),
        Err(_) => std::env::var_os(EnvFilter::DEFAULT_ENV).map(|_| EnvFilter::from_default_env()),
    }
}

/// Install the global subscriber if a filter is configured.
///
/// Returns `true` only when this call installed it. Without a filter, or
/// when a global subscriber already exists, nothing changes.
pub fn init_tracing() -> bool {
    let Some(filter) = configured_filter() else {
        return false;
    };
    let format = std::env::var(FORMAT_VAR)
        .map_or(LogFormat::Text, |name| LogFormat::parse(&name));
    let registry = Registry::default().with(filter);
    let installed = match format {
        LogFormat::Tree => registry
            .with(
                HierarchicalLayer::new(2)
                    .with_indent_lines(true)
                    .with_targets(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tests;
