//! The `Reporter` contract: a streaming consumer of findings.
//!
//! `add_report` is the only entry point for emitting a finding (spec.md §5);
//! it stamps verbosity and applies the reporter's optional keyword filter
//! before handing the finding to `process_report`.

use crate::result::{Finding, ResultKind};
use std::collections::HashSet;

pub trait Reporter: std::fmt::Debug {
    fn start(&mut self) {}

    /// Announces the set of checks about to run and the search criterion
    /// (e.g. the repo/restriction string), once per pipeline run.
    fn start_check(&mut self, checks: &[CheckDescriptor], criterion: &str) {
        let _ = (checks, criterion);
    }

    fn process_report(&mut self, finding: &Finding);

    fn end_check(&mut self) {}

    fn finish(&mut self) {}

    /// Result kinds this reporter accepts; `None` means accept everything.
    fn keyword_filter(&self) -> Option<&HashSet<ResultKind>> {
        None
    }

    fn verbosity(&self) -> u32 {
        0
    }
}

/// The only entry point a check is expected to call. Not part of the
/// `Reporter` trait itself so that verbosity-stamping and keyword filtering
/// happen uniformly regardless of which concrete reporter is installed.
pub fn add_report(reporter: &mut dyn Reporter, finding: Finding) {
    if let Some(allowed) = reporter.keyword_filter() {
        if !allowed.contains(&finding.kind) {
            return;
        }
    }
    reporter.process_report(&finding);
}

/// What `start_check` announces about a selected check: enough for the
/// pickle-stream header and `--list-checks` output.
#[derive(Debug, Clone)]
pub struct CheckDescriptor {
    pub qualified_name: String,
    pub documentation: &'static str,
    pub known_results: &'static [ResultKind],
}
