//! The result model: tagged, severity-ranked findings with a
//! threshold-dependent coordinate set and a stable serialization identity.

use crate::error::QaError;
use crate::feed::FeedType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity levels, numbered to match the magnitudes the standard `log`
/// crate (and Python's `logging` module, which this is ported from) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn level(self) -> u32 {
        match self {
            Severity::Info => 20,
            Severity::Warning => 30,
            Severity::Error => 40,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// ANSI SGR color used by the grouped/fancy reporter.
    pub fn ansi_color(self) -> &'static str {
        match self {
            Severity::Error => "\x1b[31m",
            Severity::Warning => "\x1b[33m",
            Severity::Info => "\x1b[32m",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The finite, closed set of result kinds this crate emits. New checks in a
/// larger deployment would grow this enum; kept closed here since only the
/// two example checks plus the runner's synthetic metadata-error sink exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    RedundantVersion,
    UnstableOnly,
    MetadataError,
}

impl ResultKind {
    pub fn name(self) -> &'static str {
        match self {
            ResultKind::RedundantVersion => "RedundantVersion",
            ResultKind::UnstableOnly => "UnstableOnly",
            ResultKind::MetadataError => "MetadataError",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single finding. `threshold` fixes which of `category`/`package`/`version`
/// must be populated; `Finding::new` validates this at construction rather
/// than trusting callers to get it right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: ResultKind,
    pub severity: Severity,
    pub threshold: FeedType,
    pub category: Option<String>,
    pub package: Option<String>,
    pub version: Option<String>,
    pub short_desc: String,
    pub long_desc: Option<String>,
    /// Kind-specific attributes not covered by the coordinate fields (e.g.
    /// `slot`/`later_versions` for `RedundantVersion`, `arches`/`versions`
    /// for `UnstableOnly`, `attr`/`msg` for `MetadataError`).
    pub attrs: IndexMap<String, serde_json::Value>,
}

impl Finding {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ResultKind,
        severity: Severity,
        threshold: FeedType,
        category: Option<String>,
        package: Option<String>,
        version: Option<String>,
        short_desc: String,
        long_desc: Option<String>,
        attrs: IndexMap<String, serde_json::Value>,
    ) -> Result<Self, QaError> {
        let missing = match threshold {
            FeedType::Repo => None,
            FeedType::Cat => category.is_none().then_some("category"),
            FeedType::CatPkg => (category.is_none() || package.is_none())
                .then_some("category and/or package"),
            FeedType::CatPkgVer | FeedType::CatPkgVerText => {
                (category.is_none() || package.is_none() || version.is_none())
                    .then_some("category, package and/or version")
            }
        };
        if let Some(missing) = missing {
            return Err(QaError::Internal(format!(
                "{kind} declares threshold {threshold} but is missing {missing}"
            )));
        }
        Ok(Finding {
            kind,
            severity,
            threshold,
            category,
            package,
            version,
            short_desc,
            long_desc,
            attrs,
        })
    }

    /// Selects `long_desc` when `verbosity` is non-zero, else `short_desc`,
    /// matching `Result.desc` in the original.
    pub fn desc(&self, verbosity: u32) -> &str {
        if verbosity != 0 {
            self.long_desc.as_deref().unwrap_or(&self.short_desc)
        } else {
            &self.short_desc
        }
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(|v| v.as_str())
    }
}
