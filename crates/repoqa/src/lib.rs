//! repoqa — a QA analysis engine for a package-tree repository.
//!
//! The hard core is the check pipeline: a feed/scope model (`feed`), a
//! result model (`result`), the source/transform/sink contracts
//! (`pipeline`), the minimum-cost planner (`planner`), and the runner that
//! drives items through a constructed tree (`runner`). Everything else —
//! concrete checks (`checks`), reporters (`reporters`), selection filters
//! (`filters`), configuration (`config`), and plugin registration
//! (`registry`) — is a collaborator built on top of that core.

pub mod checks;
pub mod config;
pub mod error;
pub mod feed;
pub mod filters;
pub mod pipeline;
pub mod planner;
pub mod registry;
pub mod reporter;
pub mod reporters;
pub mod result;
pub mod runner;

use crate::config::RepoqaConfig;
use crate::error::QaError;
use crate::feed::Scope;
use crate::filters::{Blacklist, Filterable, PatternFilter, SelectionFilter, Whitelist};
use crate::pipeline::{Check, PipelineNode};
use crate::reporter::{CheckDescriptor, Reporter};
use crate::registry::Registry;
use anyhow::Context;
use std::path::Path;

/// What a completed run produced, for the CLI to turn into an exit code.
pub struct RunSummary {
    pub unreachable_count: usize,
}

struct CheckRef<'a> {
    name: &'a str,
    scope: Scope,
}

impl Filterable for CheckRef<'_> {
    fn qualified_name(&self) -> &str {
        self.name
    }

    fn scope(&self) -> Scope {
        self.scope
    }
}

fn parse_scope(name: &str) -> Option<Scope> {
    match name {
        "version" => Some(Scope::Version),
        "package" => Some(Scope::Package),
        "category" => Some(Scope::Category),
        "repository" | "repo" => Some(Scope::Repository),
        _ => None,
    }
}

/// Builds the filter chain from config: `Whitelist` then `Blacklist`, then
/// an optional scope restriction, the canonical composition per spec.md
/// §4.4.
fn build_filters(config: &RepoqaConfig) -> Result<Vec<Box<dyn SelectionFilter>>, QaError> {
    let mut filters: Vec<Box<dyn SelectionFilter>> = Vec::new();
    if !config.enable.is_empty() {
        let patterns = config
            .enable
            .iter()
            .map(|p| PatternFilter::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        filters.push(Box::new(Whitelist(patterns)));
    }
    if !config.disable.is_empty() {
        let patterns = config
            .disable
            .iter()
            .map(|p| PatternFilter::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        filters.push(Box::new(Blacklist(patterns)));
    }
    if !config.scopes.is_empty() {
        let scopes: std::collections::HashSet<Scope> =
            config.scopes.iter().filter_map(|s| parse_scope(s)).collect();
        filters.push(Box::new(crate::filters::ScopeFilter(scopes)));
    }
    Ok(filters)
}

/// Builds every registered check, applies the selection filter chain, and
/// returns the survivors plus descriptors for the reporter's `start_check`.
pub fn select_checks(
    registry: &Registry,
    config: &RepoqaConfig,
) -> Result<(Vec<Box<dyn Check>>, Vec<CheckDescriptor>), QaError> {
    let filters = build_filters(config)?;
    let mut selected = Vec::new();
    let mut descriptors = Vec::new();

    for factory in &registry.check_factories {
        let check = factory.build(config)?;
        let target = CheckRef { name: check.qualified_name(), scope: check.min_scope() };
        if !filters::apply_all(&filters, &target) {
            continue;
        }
        descriptors.push(CheckDescriptor {
            qualified_name: check.qualified_name().to_string(),
            documentation: check.documentation(),
            known_results: check.known_results(),
        });
        selected.push(check);
    }

    Ok((selected, descriptors))
}

/// Resolves which reporter to use: the name in config if present, else the
/// registry's default, bound to config's destination path.
pub fn build_reporter(registry: &Registry, config: &RepoqaConfig) -> Result<Box<dyn Reporter>, QaError> {
    let name = if config.xml { Some("xml") } else { config.reporter.as_deref() };
    let factory = match name {
        Some(name) => registry
            .find_reporter_factory(name)
            .ok_or_else(|| QaError::Configuration(format!("unknown reporter {name:?}")))?,
        None => registry
            .default_reporter_factory()
            .ok_or_else(|| QaError::Internal("no reporter factories registered".into()))?,
    };
    let dest = config.output.as_deref().map(Path::new);
    factory.build(dest, config.verbosity)
}

/// Drives a planned set of pipelines to completion against one reporter:
/// `start` every pipeline, feed every item its source produces, `finish`
/// every pipeline. Mirrors the teacher's worker run-loop shape (receive →
/// process → forward), collapsed to synchronous per spec.md §5.
pub async fn execute(
    plans: Vec<planner::Plan>,
    reporter: &mut dyn Reporter,
) -> anyhow::Result<()> {
    for mut plan in plans {
        plan.root.start(reporter).context("pipeline start failed")?;
        let items = plan.source.produce().await.context("source failed to produce items")?;
        for item in &items {
            plan.root.feed(item, reporter).context("pipeline feed failed")?;
        }
        plan.root.finish(reporter).context("pipeline finish failed")?;
    }
    Ok(())
}

/// The full run: select checks, plan pipelines, execute them against the
/// chosen reporter. Returns `Ok(None)` when no checks survive filtering
/// (the CLI maps this to exit code 1 per spec.md §6).
pub async fn run(
    registry: &Registry,
    config: &RepoqaConfig,
    reporter: &mut dyn Reporter,
) -> anyhow::Result<Option<RunSummary>> {
    let (checks, descriptors) = select_checks(registry, config)?;
    if checks.is_empty() {
        return Ok(None);
    }

    let output = planner::plan(checks, &registry.transforms, &registry.sources, config.debug_mode)?;

    reporter.start();
    reporter.start_check(&descriptors, &config.restrict.join(" "));
    execute(output.plans, reporter).await?;
    reporter.end_check();
    reporter.finish();

    Ok(Some(RunSummary { unreachable_count: output.unreachable.len() }))
}
