//! `NullReporter`: accepts everything, emits nothing. Used for benchmarking
//! the pipeline without I/O in the loop.
//!
//! Grounded in `original_source/src/pkgcheck/reporters.py`'s `NullReporter`.

use crate::reporter::Reporter;
use crate::result::Finding;

#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn process_report(&mut self, _finding: &Finding) {}
}
