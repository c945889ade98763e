//! `RedundantVersion`: flags versions whose keyword spread is already fully
//! covered by a later version in the same slot.
//!
//! Grounded in `original_source/src/pkgcheck/checks/cleanup.py`'s
//! `RedundantVersionReport` — the stack-based subset scan is carried over
//! unchanged; only the report/result plumbing is reworked onto this crate's
//! `Finding`/`Reporter` types.

use crate::feed::{FeedType, Item, Recipe, Scope};
use crate::pipeline::node::{NodeError, PipelineNode};
use crate::pipeline::sink::Check;
use crate::reporter::{self, Reporter};
use crate::result::{Finding, ResultKind, Severity};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct RedundantVersion;

impl RedundantVersion {
    pub fn new() -> Self {
        RedundantVersion
    }
}

impl PipelineNode for RedundantVersion {
    fn feed(&mut self, item: &Item, reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        let Item::Pkg(pkgset) = item else {
            return Ok(());
        };
        if pkgset.len() <= 1 {
            return Ok(());
        }

        let mut stack: Vec<(&Recipe, HashSet<String>)> = Vec::new();
        let mut bad: Vec<(&Recipe, Vec<String>)> = Vec::new();

        for pkg in pkgset.as_slice().iter().rev() {
            if pkg.live {
                continue;
            }
            let mut curr_set: HashSet<String> = pkg
                .keywords
                .iter()
                .filter(|k| !k.starts_with('-'))
                .cloned()
                .collect();
            if curr_set.is_empty() {
                continue;
            }

            let matches: Vec<&Recipe> = stack
                .iter()
                .filter(|(ver, keys)| ver.slot == pkg.slot && curr_set.is_subset(keys))
                .map(|(ver, _)| *ver)
                .collect();

            let extra: Vec<String> = curr_set
                .iter()
                .filter(|k| !k.starts_with('~'))
                .map(|k| format!("~{k}"))
                .collect();
            curr_set.extend(extra);

            stack.push((pkg, curr_set));
            if !matches.is_empty() {
                bad.push((pkg, matches.into_iter().map(|r| r.fullver().to_string()).collect()));
            }
        }

        for (pkg, later_versions) in bad.into_iter().rev() {
            let plural = if later_versions.len() > 1 { "s" } else { "" };
            let short_desc = format!(
                "slot({}) keywords are overshadowed by version{}: {}",
                pkg.slot,
                plural,
                later_versions.join(", ")
            );
            let mut attrs = indexmap::IndexMap::new();
            attrs.insert("slot".to_string(), serde_json::Value::String(pkg.slot.clone()));
            attrs.insert(
                "later_versions".to_string(),
                serde_json::Value::Array(later_versions.into_iter().map(serde_json::Value::String).collect()),
            );
            let finding = Finding::new(
                ResultKind::RedundantVersion,
                Severity::Warning,
                FeedType::CatPkgVer,
                Some(pkg.category.clone()),
                Some(pkg.package.clone()),
                Some(pkg.fullver().to_string()),
                short_desc,
                None,
                attrs,
            )
            .map_err(|e| NodeError::Other(anyhow::anyhow!(e)))?;
            reporter::add_report(reporter, finding);
        }

        Ok(())
    }
}

impl Check for RedundantVersion {
    fn qualified_name(&self) -> &'static str {
        "checks.redundant_version.RedundantVersion"
    }

    fn feed_type(&self) -> FeedType {
        FeedType::CatPkg
    }

    fn min_scope(&self) -> Scope {
        Scope::Package
    }

    fn known_results(&self) -> &'static [ResultKind] {
        &[ResultKind::RedundantVersion]
    }

    fn documentation(&self) -> &'static str {
        "Scans for versions overshadowed by a later version's keyword spread within the same slot, ignoring live (VCS) versions."
    }
}
