//! `JsonReporter`: newline-delimited JSON, one object per result, nesting
//! coordinates and truncating at the result's threshold.
//!
//! Grounded in `original_source/src/pkgcheck/reporters.py`'s `JsonReporter`.

use crate::feed::FeedType;
use crate::reporter::Reporter;
use crate::result::Finding;
use serde_json::json;
use std::io::Write;

pub struct JsonReporter {
    out: Box<dyn Write + Send>,
    verbosity: u32,
}

impl JsonReporter {
    pub fn new(out: Box<dyn Write + Send>, verbosity: u32) -> Self {
        JsonReporter { out, verbosity }
    }
}

impl std::fmt::Debug for JsonReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonReporter").finish()
    }
}

impl Reporter for JsonReporter {
    fn process_report(&mut self, finding: &Finding) {
        let leaf = json!({
            format!("_{}", finding.severity.name()): {
                finding.kind.to_string(): [finding.desc(self.verbosity)],
            }
        });

        let nested = match finding.threshold {
            FeedType::Repo => leaf,
            FeedType::Cat => {
                json!({ finding.category.as_deref().unwrap_or(""): leaf })
            }
            FeedType::CatPkg => {
                json!({
                    finding.category.as_deref().unwrap_or(""): {
                        finding.package.as_deref().unwrap_or(""): leaf,
                    }
                })
            }
            FeedType::CatPkgVer | FeedType::CatPkgVerText => {
                json!({
                    finding.category.as_deref().unwrap_or(""): {
                        finding.package.as_deref().unwrap_or(""): {
                            finding.version.as_deref().unwrap_or(""): leaf,
                        }
                    }
                })
            }
        };

        let _ = writeln!(self.out, "{nested}");
        let _ = self.out.flush();
    }

    fn verbosity(&self) -> u32 {
        self.verbosity
    }
}
