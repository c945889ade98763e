//! Pickle-stream reporters: a length-framed object stream, a `StreamHeader`
//! preceding each run, then one frame per result.
//!
//! Grounded in `original_source/src/pkgcheck/reporters.py`'s `PickleStream`
//! and `BinaryPickleStream`. Neither Python pickle nor its "text vs. binary
//! protocol" distinction has a Rust equivalent, so the two variants are
//! realized as two real serialization crates instead: `PickleStreamReporter`
//! frames with `serde_json` (the original's "text protocol"),
//! `BinaryPickleStreamReporter` frames with `bincode` (the original's
//! "binary highest-protocol"). Both share the same 4-byte big-endian
//! length-prefixed framing.

use crate::reporter::{CheckDescriptor, Reporter};
use crate::result::{Finding, ResultKind};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Precedes every run in the stream: the selected checks that may emit at
/// least one result kind (sorted by qualified name), the sorted set of
/// result kinds they may emit, and the search criterion string. Readers
/// must reject a stream whose header doesn't enumerate every kind
/// encountered later in that run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamHeader {
    pub sorted_checks_with_known_results: Vec<CheckHeaderEntry>,
    pub known_results: Vec<ResultKind>,
    pub criterion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckHeaderEntry {
    pub qualified_name: String,
    pub known_results: Vec<ResultKind>,
}

impl StreamHeader {
    pub fn new(checks: &[CheckDescriptor], criterion: &str) -> Self {
        let mut entries: Vec<CheckHeaderEntry> = checks
            .iter()
            .filter(|c| !c.known_results.is_empty())
            .map(|c| CheckHeaderEntry {
                qualified_name: c.qualified_name.clone(),
                known_results: {
                    let mut kinds = c.known_results.to_vec();
                    kinds.sort();
                    kinds
                },
            })
            .collect();
        entries.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));

        let mut known_results: Vec<ResultKind> =
            entries.iter().flat_map(|e| e.known_results.iter().copied()).collect();
        known_results.sort();
        known_results.dedup();

        StreamHeader {
            sorted_checks_with_known_results: entries,
            known_results,
            criterion: criterion.to_string(),
        }
    }
}

fn write_frame(out: &mut dyn Write, bytes: &[u8]) -> std::io::Result<()> {
    out.write_all(&(bytes.len() as u32).to_be_bytes())?;
    out.write_all(bytes)
}

/// The "text protocol" variant, framed with `serde_json`.
pub struct PickleStreamReporter {
    out: Box<dyn Write + Send>,
    verbosity: u32,
}

impl PickleStreamReporter {
    pub fn new(out: Box<dyn Write + Send>, verbosity: u32) -> Self {
        PickleStreamReporter { out, verbosity }
    }
}

impl std::fmt::Debug for PickleStreamReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickleStreamReporter").finish()
    }
}

impl Reporter for PickleStreamReporter {
    fn start_check(&mut self, checks: &[CheckDescriptor], criterion: &str) {
        let header = StreamHeader::new(checks, criterion);
        if let Ok(bytes) = serde_json::to_vec(&header) {
            let _ = write_frame(&mut self.out, &bytes);
        }
    }

    fn process_report(&mut self, finding: &Finding) {
        if let Ok(bytes) = serde_json::to_vec(finding) {
            let _ = write_frame(&mut self.out, &bytes);
        }
    }

    fn verbosity(&self) -> u32 {
        self.verbosity
    }
}

/// The "binary highest-protocol" variant, framed with `bincode`.
pub struct BinaryPickleStreamReporter {
    out: Box<dyn Write + Send>,
    verbosity: u32,
}

impl BinaryPickleStreamReporter {
    pub fn new(out: Box<dyn Write + Send>, verbosity: u32) -> Self {
        BinaryPickleStreamReporter { out, verbosity }
    }
}

impl std::fmt::Debug for BinaryPickleStreamReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryPickleStreamReporter").finish()
    }
}

impl Reporter for BinaryPickleStreamReporter {
    fn start_check(&mut self, checks: &[CheckDescriptor], criterion: &str) {
        let header = StreamHeader::new(checks, criterion);
        if let Ok(bytes) = bincode::serialize(&header) {
            let _ = write_frame(&mut self.out, &bytes);
        }
    }

    fn process_report(&mut self, finding: &Finding) {
        if let Ok(bytes) = bincode::serialize(finding) {
            let _ = write_frame(&mut self.out, &bytes);
        }
    }

    fn verbosity(&self) -> u32 {
        self.verbosity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_header_sorts_checks_and_kinds_deterministically() {
        let checks = vec![
            CheckDescriptor {
                qualified_name: "checks.unstable_only.UnstableOnly".into(),
                documentation: "",
                known_results: &[ResultKind::UnstableOnly],
            },
            CheckDescriptor {
                qualified_name: "checks.redundant_version.RedundantVersion".into(),
                documentation: "",
                known_results: &[ResultKind::RedundantVersion],
            },
        ];
        let header = StreamHeader::new(&checks, "gentoo");
        assert_eq!(
            header.sorted_checks_with_known_results[0].qualified_name,
            "checks.redundant_version.RedundantVersion"
        );
        assert_eq!(
            header.sorted_checks_with_known_results[1].qualified_name,
            "checks.unstable_only.UnstableOnly"
        );
        assert_eq!(header.known_results, vec![ResultKind::RedundantVersion, ResultKind::UnstableOnly]);
    }

    #[test]
    fn checks_with_no_known_results_are_excluded_from_the_header() {
        let checks = vec![
            CheckDescriptor {
                qualified_name: "checks.redundant_version.RedundantVersion".into(),
                documentation: "",
                known_results: &[ResultKind::RedundantVersion],
            },
            CheckDescriptor {
                qualified_name: "checks.metadata_only.NoResultsCheck".into(),
                documentation: "",
                known_results: &[],
            },
        ];
        let header = StreamHeader::new(&checks, "gentoo");
        assert_eq!(header.sorted_checks_with_known_results.len(), 1);
        assert_eq!(
            header.sorted_checks_with_known_results[0].qualified_name,
            "checks.redundant_version.RedundantVersion"
        );
    }
}
