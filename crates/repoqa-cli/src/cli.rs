//! Command-line surface: `clap::Parser`-derived flags, layered over
//! figment-loaded config with CLI flags winning.
//!
//! Grounded in spec.md §6.3's exact flag set; the teacher declares `clap`
//! as a dependency but never calls into it (`kvx-cli::main` hand-parses
//! `std::env::args()`), so this is the dependency actually being used.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "repoqa", about = "QA analysis engine for a package-tree repository")]
pub struct Cli {
    /// Whitelist pattern (repeatable); see the PatternFilter matching rules.
    #[arg(short = 'c', long = "checks", value_name = "PATTERN")]
    pub checks: Vec<String>,

    /// Blacklist pattern (repeatable).
    #[arg(long = "disable", value_name = "PATTERN")]
    pub disable: Vec<String>,

    /// Print selected checks and exit without running the pipeline.
    #[arg(long = "list-checks")]
    pub list_checks: bool,

    /// Select the XML reporter.
    #[arg(short = 'x', long = "xml")]
    pub xml: bool,

    /// Named reporter to use instead of the registry default.
    #[arg(short = 'r', long = "reporter", value_name = "NAME")]
    pub reporter: Option<String>,

    /// Reporter destination path; stdout if absent.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<String>,

    /// Scope restriction (repeatable): version, package, category, repository.
    #[arg(short = 'S', long = "scope", value_name = "SCOPE")]
    pub scope: Vec<String>,

    /// Path to a TOML config file, layered under CLI flags and REPOQA_* env vars.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<std::path::PathBuf>,

    /// Stable arches for the UnstableOnly check (repeatable).
    #[arg(long = "stable-arch", value_name = "ARCH")]
    pub stable_arch: Vec<String>,

    /// Abort the run on the first unexpected (non-metadata) check failure
    /// instead of retiring the offending check.
    #[arg(long = "debug")]
    pub debug: bool,

    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Repository root to scan.
    pub repo: String,

    /// Atom-expression restrictions, passed through opaquely to the source.
    pub restrict: Vec<String>,
}

impl Cli {
    /// Layers parsed flags over a figment-loaded base config; CLI flags win
    /// whenever set.
    pub fn apply(self, mut config: repoqa::config::RepoqaConfig) -> repoqa::config::RepoqaConfig {
        config.repo = self.repo;
        if !self.restrict.is_empty() {
            config.restrict = self.restrict;
        }
        if !self.checks.is_empty() {
            config.enable = self.checks;
        }
        if !self.disable.is_empty() {
            config.disable = self.disable;
        }
        if !self.scope.is_empty() {
            config.scopes = self.scope;
        }
        if self.reporter.is_some() {
            config.reporter = self.reporter;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        config.xml = config.xml || self.xml;
        if !self.stable_arch.is_empty() {
            config.stable_arches = self.stable_arch;
        }
        config.debug_mode = config.debug_mode || self.debug;
        if self.verbosity > 0 {
            config.verbosity = self.verbosity as u32;
        }
        config
    }
}
