//! `GroupedReporter`: groups results by `cat/pkg` (or `cat`, or `repo`),
//! printing a header once per key and coloring each line by severity.
//!
//! Grounded in `original_source/src/pkgcheck/reporters.py`'s
//! `FancyReporter`.

use crate::feed::FeedType;
use crate::reporter::Reporter;
use crate::result::Finding;
use std::io::Write;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

pub struct GroupedReporter {
    out: Box<dyn Write + Send>,
    key: Option<String>,
    verbosity: u32,
}

impl GroupedReporter {
    pub fn new(out: Box<dyn Write + Send>, verbosity: u32) -> Self {
        GroupedReporter { out, key: None, verbosity }
    }
}

impl std::fmt::Debug for GroupedReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupedReporter").finish()
    }
}

impl Reporter for GroupedReporter {
    fn process_report(&mut self, finding: &Finding) {
        let key = match finding.threshold {
            FeedType::CatPkgVer | FeedType::CatPkgVerText | FeedType::CatPkg => format!(
                "{}/{}",
                finding.category.as_deref().unwrap_or(""),
                finding.package.as_deref().unwrap_or("")
            ),
            FeedType::Cat => finding.category.clone().unwrap_or_default(),
            FeedType::Repo => "repo".to_string(),
        };

        if self.key.as_deref() != Some(key.as_str()) {
            let _ = writeln!(self.out);
            let _ = writeln!(self.out, "{BOLD}{key}{RESET}");
            self.key = Some(key);
        }

        let version_prefix = match finding.threshold {
            FeedType::CatPkgVer | FeedType::CatPkgVerText => {
                format!("version {}: ", finding.version.as_deref().unwrap_or(""))
            }
            _ => String::new(),
        };

        let color = finding.severity.ansi_color();
        let desc = finding.desc(self.verbosity);
        let _ = writeln!(
            self.out,
            "  {color}{}{RESET}: {version_prefix}{desc}",
            finding.kind
        );
    }

    fn verbosity(&self) -> u32 {
        self.verbosity
    }
}
