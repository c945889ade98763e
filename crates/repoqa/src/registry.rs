//! The plugin registry: where sources, transforms, checks, and reporters are
//! enumerated for a run.
//!
//! Sources and transforms are cheap, stateless descriptors in this crate (no
//! config beyond what's baked into the concrete type), so they're held here
//! as already-constructed `Arc<dyn Source>`/`Arc<dyn Transform>` rather than
//! behind a factory trait. Checks and reporters do need config
//! (`UnstableOnly`'s stable-arch set, a reporter's destination path), so
//! those go through `CheckFactory`/`reporters::ReporterFactory`. Noted as a
//! deliberate simplification in DESIGN.md.

use crate::config::RepoqaConfig;
use crate::error::QaError;
use crate::pipeline::{Check, Source, Transform};
use crate::reporters::{self, ReporterFactory};
use std::sync::Arc;

pub trait CheckFactory {
    fn qualified_name(&self) -> &'static str;
    fn build(&self, config: &RepoqaConfig) -> Result<Box<dyn Check>, QaError>;
}

pub struct RedundantVersionFactory;

impl CheckFactory for RedundantVersionFactory {
    fn qualified_name(&self) -> &'static str {
        "checks.redundant_version.RedundantVersion"
    }

    fn build(&self, _config: &RepoqaConfig) -> Result<Box<dyn Check>, QaError> {
        Ok(Box::new(crate::checks::RedundantVersion::new()))
    }
}

pub struct UnstableOnlyFactory;

impl CheckFactory for UnstableOnlyFactory {
    fn qualified_name(&self) -> &'static str {
        "checks.unstable_only.UnstableOnly"
    }

    fn build(&self, config: &RepoqaConfig) -> Result<Box<dyn Check>, QaError> {
        if config.stable_arches.is_empty() {
            return Err(QaError::Configuration(
                "UnstableOnly requires at least one configured stable arch".into(),
            ));
        }
        Ok(Box::new(crate::checks::UnstableOnly::new(config.stable_arches.clone())))
    }
}

/// Everything a run needs, assembled once at startup.
pub struct Registry {
    pub check_factories: Vec<Box<dyn CheckFactory>>,
    pub reporter_factories: Vec<Box<dyn ReporterFactory>>,
    pub sources: Vec<Arc<dyn Source>>,
    pub transforms: Vec<Arc<dyn Transform>>,
}

impl Registry {
    pub fn builtin(sources: Vec<Arc<dyn Source>>, transforms: Vec<Arc<dyn Transform>>) -> Self {
        Registry {
            check_factories: vec![Box::new(RedundantVersionFactory), Box::new(UnstableOnlyFactory)],
            reporter_factories: reporters::builtin_factories(),
            sources,
            transforms,
        }
    }

    pub fn find_reporter_factory(&self, name: &str) -> Option<&dyn ReporterFactory> {
        self.reporter_factories.iter().map(|f| f.as_ref()).find(|f| f.name() == name)
    }

    /// The highest-priority-number factory is the default when no reporter
    /// is named explicitly (see DESIGN.md for why this is the opposite of
    /// spec.md's literal "lowest wins" wording).
    pub fn default_reporter_factory(&self) -> Option<&dyn ReporterFactory> {
        self.reporter_factories.iter().map(|f| f.as_ref()).max_by_key(|f| f.priority())
    }
}
