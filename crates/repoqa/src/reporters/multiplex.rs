//! `MultiplexReporter`: fans every event to two or more child reporters, in
//! order.
//!
//! Grounded in `original_source/src/pkgcheck/reporters.py`'s
//! `MultiplexReporter`.

use crate::error::QaError;
use crate::reporter::{CheckDescriptor, Reporter};
use crate::result::{Finding, ResultKind};
use std::collections::HashSet;

pub struct MultiplexReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl MultiplexReporter {
    pub fn new(reporters: Vec<Box<dyn Reporter>>) -> Result<Self, QaError> {
        if reporters.len() < 2 {
            return Err(QaError::Configuration(
                "MultiplexReporter needs at least two reporters".into(),
            ));
        }
        Ok(MultiplexReporter { reporters })
    }
}

impl std::fmt::Debug for MultiplexReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiplexReporter").field("count", &self.reporters.len()).finish()
    }
}

impl Reporter for MultiplexReporter {
    fn start(&mut self) {
        for r in &mut self.reporters {
            r.start();
        }
    }

    fn start_check(&mut self, checks: &[CheckDescriptor], criterion: &str) {
        for r in &mut self.reporters {
            r.start_check(checks, criterion);
        }
    }

    fn process_report(&mut self, finding: &Finding) {
        for r in &mut self.reporters {
            r.process_report(finding);
        }
    }

    fn end_check(&mut self) {
        for r in &mut self.reporters {
            r.end_check();
        }
    }

    fn finish(&mut self) {
        for r in &mut self.reporters {
            r.finish();
        }
    }

    /// Unfiltered at this level; `process_report` forwards to every child
    /// regardless of their individual `keyword_filter`.
    fn keyword_filter(&self) -> Option<&HashSet<ResultKind>> {
        None
    }
}
