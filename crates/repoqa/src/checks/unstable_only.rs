//! `UnstableOnly`: flags packages where a configured stable arch never has a
//! stable version, only `~arch`-keyworded ones.
//!
//! Grounded in `original_source/src/pkgcheck/checks/unstable_only.py`'s
//! `UnstableOnlyReport` — same stable-then-unstable scan per arch, same
//! grouping of results by the exact set of unstable versions found.

use crate::feed::{FeedType, Item, Scope};
use crate::pipeline::node::{NodeError, PipelineNode};
use crate::pipeline::sink::Check;
use crate::reporter::{self, Reporter};
use crate::result::{Finding, ResultKind, Severity};
use indexmap::IndexMap;

#[derive(Debug)]
pub struct UnstableOnly {
    arches: Vec<String>,
}

impl UnstableOnly {
    /// `stable_arches` is the configured set of arches considered stable;
    /// a leading `~` is stripped, matching the original's `lstrip("~")`.
    pub fn new(stable_arches: Vec<String>) -> Self {
        let arches = stable_arches
            .into_iter()
            .map(|a| a.trim().trim_start_matches('~').to_string())
            .collect();
        UnstableOnly { arches }
    }
}

impl PipelineNode for UnstableOnly {
    fn feed(&mut self, item: &Item, reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        let Item::Pkg(pkgset) = item else {
            return Ok(());
        };

        let mut unstable_arches: IndexMap<Vec<String>, Vec<String>> = IndexMap::new();
        for arch in &self.arches {
            let has_stable = pkgset
                .as_slice()
                .iter()
                .any(|r| r.keywords.iter().any(|k| k == arch));
            if has_stable {
                continue;
            }
            let marker = format!("~{arch}");
            let unstable_versions: Vec<String> = pkgset
                .as_slice()
                .iter()
                .filter(|r| r.keywords.iter().any(|k| k == &marker))
                .map(|r| r.fullver().to_string())
                .collect();
            if unstable_versions.is_empty() {
                continue;
            }
            unstable_arches.entry(unstable_versions).or_default().push(arch.clone());
        }

        for (versions, arches) in unstable_arches {
            let plural = if arches.len() > 1 { "es" } else { "" };
            let short_desc = format!(
                "for arch{}: [ {} ], all versions are unstable: [ {} ]",
                plural,
                arches.join(", "),
                versions.join(", ")
            );
            let mut attrs = IndexMap::new();
            attrs.insert(
                "versions".to_string(),
                serde_json::Value::Array(versions.into_iter().map(serde_json::Value::String).collect()),
            );
            attrs.insert(
                "arches".to_string(),
                serde_json::Value::Array(arches.into_iter().map(serde_json::Value::String).collect()),
            );
            let finding = Finding::new(
                ResultKind::UnstableOnly,
                Severity::Warning,
                FeedType::CatPkg,
                Some(pkgset.category().to_string()),
                Some(pkgset.package().to_string()),
                None,
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

impl Check for UnstableOnly {
    fn qualified_name(&self) -> &'static str {
        "checks.unstable_only.UnstableOnly"
    }

    fn feed_type(&self) -> FeedType {
        FeedType::CatPkg
    }

    fn min_scope(&self) -> Scope {
        Scope::Package
    }

    fn known_results(&self) -> &'static [ResultKind] {
        &[ResultKind::UnstableOnly]
    }

    fn documentation(&self) -> &'static str {
        "Flags packages where a configured stable arch only ever appears as ~arch, never stably keyworded."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{PkgSet, Recipe, Version};

    struct CollectingReporter(Vec<Finding>);

    impl Reporter for CollectingReporter {
        fn process_report(&mut self, finding: &Finding) {
            self.0.push(finding.clone());
        }
    }

    fn recipe(version: &str, keywords: &[&str]) -> Recipe {
        Recipe {
            category: "dev-libs".into(),
            package: "foo".into(),
            version: Version(version.into()),
            slot: "0".into(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            live: false,
        }
    }

    #[test]
    fn flags_arch_with_only_unstable_keywording() {
        let set = PkgSet::new(vec![recipe("1", &["~amd64"]), recipe("2", &["~amd64"])]).unwrap();
        let mut reporter = CollectingReporter(Vec::new());
        let mut check = UnstableOnly::new(vec!["amd64".into()]);
        check.feed(&Item::Pkg(set), &mut reporter).unwrap();
        assert_eq!(reporter.0.len(), 1);
        assert!(reporter.0[0].short_desc.contains("amd64"));
    }

    #[test]
    fn stable_version_suppresses_the_arch_entirely() {
        let set = PkgSet::new(vec![recipe("1", &["~amd64"]), recipe("2", &["amd64"])]).unwrap();
        let mut reporter = CollectingReporter(Vec::new());
        let mut check = UnstableOnly::new(vec!["amd64".into()]);
        check.feed(&Item::Pkg(set), &mut reporter).unwrap();
        assert!(reporter.0.is_empty());
    }

    #[test]
    fn arches_sharing_the_same_version_set_collapse_into_one_result() {
        let set = PkgSet::new(vec![recipe("1", &["~amd64", "~x86"])]).unwrap();
        let mut reporter = CollectingReporter(Vec::new());
        let mut check = UnstableOnly::new(vec!["amd64".into(), "x86".into()]);
        check.feed(&Item::Pkg(set), &mut reporter).unwrap();
        assert_eq!(reporter.0.len(), 1);
    }

    #[test]
    fn leading_tilde_in_configured_arch_is_stripped() {
        let set = PkgSet::new(vec![recipe("1", &["~amd64"])]).unwrap();
        let mut reporter = CollectingReporter(Vec::new());
        let mut check = UnstableOnly::new(vec!["~amd64".into()]);
        check.feed(&Item::Pkg(set), &mut reporter).unwrap();
        assert_eq!(reporter.0.len(), 1);
    }
}
