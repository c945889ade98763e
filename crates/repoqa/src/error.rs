//! Typed failures that are part of the check-pipeline contract.
//!
//! Per-item failures (a recipe's metadata can't be parsed) are never errors
//! here — they become `MetadataError` results, handled by the runner. What's
//! left are the per-run failures spec.md §7 calls out: bad config, an
//! unopenable reporter destination, and internal invariant violations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QaError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cannot open reporter destination {dest:?}: {source}")]
    ReporterInit {
        dest: String,
        #[source]
        source: std::io::Error,
    },

    #[error("internal invariant violation: {0}")]
    Internal(String),

    #[error("check {check} raised an unexpected error")]
    Check {
        check: String,
        #[source]
        source: anyhow::Error,
    },
}
