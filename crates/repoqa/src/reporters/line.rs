//! `LineReporter`: one line per result, threshold-qualified.
//!
//! Grounded in `original_source/src/pkgcheck/reporters.py`'s `StrReporter`.

use crate::feed::FeedType;
use crate::reporter::Reporter;
use crate::result::Finding;
use std::io::Write;

pub struct LineReporter {
    out: Box<dyn Write + Send>,
    first_report: bool,
    verbosity: u32,
}

impl LineReporter {
    pub fn new(out: Box<dyn Write + Send>, verbosity: u32) -> Self {
        LineReporter { out, first_report: true, verbosity }
    }
}

impl std::fmt::Debug for LineReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReporter").finish()
    }
}

impl Reporter for LineReporter {
    fn process_report(&mut self, finding: &Finding) {
        if self.first_report {
            let _ = writeln!(self.out);
            self.first_report = false;
        }
        let desc = finding.desc(self.verbosity);
        let line = match finding.threshold {
            FeedType::CatPkgVer | FeedType::CatPkgVerText => format!(
                "{}/{}-{}: {desc}",
                finding.category.as_deref().unwrap_or(""),
                finding.package.as_deref().unwrap_or(""),
                finding.version.as_deref().unwrap_or("")
            ),
            FeedType::CatPkg => format!(
                "{}/{}: {desc}",
                finding.category.as_deref().unwrap_or(""),
                finding.package.as_deref().unwrap_or("")
            ),
            FeedType::Cat => format!("{}: {desc}", finding.category.as_deref().unwrap_or("")),
            FeedType::Repo => desc.to_string(),
        };
        let _ = writeln!(self.out, "{line}");
    }

    fn finish(&mut self) {
        if !self.first_report {
            let _ = writeln!(self.out);
        }
    }

    fn verbosity(&self) -> u32 {
        self.verbosity
    }
}
