//! Runtime configuration: the knobs `repoqa-cli` exposes plus whatever an
//! env var or TOML file supplies underneath them.
//!
//! Grounded in the teacher's `app_config::load_config` — same
//! env-then-file Figment layering, same error-context shape.

use anyhow::Context;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RepoqaConfig {
    /// Target repository path or name, resolved by the source this config
    /// is paired with.
    #[serde(default)]
    pub repo: String,

    /// Atom-expression restriction strings, passed through opaquely to the
    /// source.
    #[serde(default)]
    pub restrict: Vec<String>,

    /// Whitelist patterns (`-c`); empty means "all checks".
    #[serde(default)]
    pub enable: Vec<String>,

    /// Blacklist patterns (`--disable`).
    #[serde(default)]
    pub disable: Vec<String>,

    /// Scope names to restrict planning/selection to; empty means "all
    /// scopes".
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Named reporter to use; `None` falls back to the registry's default.
    #[serde(default)]
    pub reporter: Option<String>,

    /// Reporter destination; `None` means stdout.
    #[serde(default)]
    pub output: Option<String>,

    #[serde(default)]
    pub xml: bool,

    #[serde(default)]
    pub verbosity: u32,

    /// Stable arches for `UnstableOnly`.
    #[serde(default)]
    pub stable_arches: Vec<String>,

    /// When set, a non-metadata pipeline failure aborts the run instead of
    /// retiring the offending child.
    #[serde(default)]
    pub debug_mode: bool,
}

/// Loads configuration from `REPOQA_*` environment variables, optionally
/// merged with a TOML file (file wins on conflicts).
///
/// `config_file_name: None` means env vars only.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<RepoqaConfig> {
    tracing::info!(file = ?config_file_name, "loading configuration");

    let figment = Figment::new().merge(Env::prefixed("REPOQA_"));
    let figment = match config_file_name {
        Some(path) => figment.merge(Toml::file(path)),
        None => figment,
    };

    let context_msg = match config_file_name {
        Some(path) => format!(
            "failed to parse configuration from file '{}' and environment variables (REPOQA_*)",
            path.display()
        ),
        None => "failed to parse configuration from environment variables (REPOQA_*)".to_string(),
    };

    figment.extract().context(context_msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let file = NamedTempFile::new().expect("tempfile creation should not fail");
        std::fs::write(file.path(), contents).expect("writing test config should not fail");
        file
    }

    #[test]
    fn file_values_are_picked_up() {
        let file = write_config(
            r#"
            repo = "gentoo"
            stable_arches = ["amd64", "x86"]
            verbosity = 1
            "#,
        );
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.repo, "gentoo");
        assert_eq!(config.stable_arches, vec!["amd64", "x86"]);
        assert_eq!(config.verbosity, 1);
    }

    #[test]
    fn defaults_apply_when_fields_are_absent() {
        let file = write_config(r#"repo = "gentoo""#);
        let config = load_config(Some(file.path())).unwrap();
        assert!(config.enable.is_empty());
        assert!(!config.debug_mode);
        assert_eq!(config.reporter, None);
    }

    #[test]
    fn env_only_load_succeeds_without_a_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.repo, "");
    }
}
