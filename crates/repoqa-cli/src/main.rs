//! repoqa-cli — the thin binary: argument parsing, tracing setup, config
//! loading, and wiring the registry before handing off to `repoqa::run`.
//!
//! Grounded in the teacher's `kvx-cli::main` shape (init tracing, load
//! config, run, chain-print errors on failure) with actual `clap` parsing
//! instead of hand-rolled `std::env::args()`.

mod cli;
mod fs_source;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use repoqa::registry::Registry;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!("error: {err}");
            for cause in err.chain().skip(1) {
                error!("caused by: {cause}");
            }
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = cli.config.clone();
    let base_config =
        repoqa::config::load_config(config_path.as_deref()).context("failed to load configuration")?;
    let config = cli.apply(base_config);

    let repo_root = std::path::PathBuf::from(&config.repo);
    let source: Arc<dyn repoqa::pipeline::Source> = Arc::new(fs_source::FsPkgSource::new(repo_root));
    let registry = Registry::builtin(vec![source], Vec::new());

    if cli.list_checks {
        let (_, descriptors) = repoqa::select_checks(&registry, &config)?;
        for d in &descriptors {
            println!("{}", d.qualified_name);
            if !d.documentation.is_empty() {
                println!("  {}", d.documentation);
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut reporter = repoqa::build_reporter(&registry, &config)?;
    match repoqa::run(&registry, &config, reporter.as_mut()).await? {
        Some(_summary) => Ok(ExitCode::SUCCESS),
        None => {
            error!("no checks selected after filtering");
            Ok(ExitCode::from(1))
        }
    }
}
