//! `XmlReporter`: a `<checks>` envelope with one `<result>` per finding.
//!
//! Grounded in `original_source/src/pkgcheck/reporters.py`'s `XmlReporter`;
//! escaping mirrors `xml.sax.saxutils.escape` (a five-entity table: `&`,
//! `<`, `>`, `"`, `'`), not a reason to pull in an XML crate for a write-only
//! format this small.

use crate::feed::FeedType;
use crate::reporter::Reporter;
use crate::result::Finding;
use std::io::Write;

pub struct XmlReporter {
    out: Box<dyn Write + Send>,
    verbosity: u32,
}

impl XmlReporter {
    pub fn new(out: Box<dyn Write + Send>, verbosity: u32) -> Self {
        XmlReporter { out, verbosity }
    }
}

impl std::fmt::Debug for XmlReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlReporter").finish()
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

impl Reporter for XmlReporter {
    fn start(&mut self) {
        let _ = writeln!(self.out, "<checks>");
    }

    fn process_report(&mut self, finding: &Finding) {
        let class = escape(&finding.kind.to_string());
        let msg = escape(finding.desc(self.verbosity));

        let mut body = String::new();
        if let Some(category) = &finding.category {
            if !matches!(finding.threshold, FeedType::Repo) {
                body.push_str(&format!("<category>{}</category>", escape(category)));
            }
        }
        if let Some(package) = &finding.package {
            if matches!(
                finding.threshold,
                FeedType::CatPkg | FeedType::CatPkgVer | FeedType::CatPkgVerText
            ) {
                body.push_str(&format!("<package>{}</package>", escape(package)));
            }
        }
        if let Some(version) = &finding.version {
            if matches!(finding.threshold, FeedType::CatPkgVer | FeedType::CatPkgVerText) {
                body.push_str(&format!("<version>{}</version>", escape(version)));
            }
        }
        body.push_str(&format!("<class>{class}</class><msg>{msg}</msg>"));

        let _ = writeln!(self.out, "<result>{body}</result>");
    }

    fn finish(&mut self) {
        let _ = writeln!(self.out, "</checks>");
    }

    fn verbosity(&self) -> u32 {
        self.verbosity
    }
}
