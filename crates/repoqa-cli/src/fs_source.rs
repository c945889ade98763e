//! A filesystem-backed `Source`: walks `root/<category>/<package>/<version>`,
//! reading a `KEYWORDS` and optional `SLOT` file per version, and emits one
//! `Item::Pkg` per package.
//!
//! The package-tree reader is an external collaborator by design (spec.md
//! §1 "Out of scope"); this is the minimal concrete one `repoqa-cli` wires
//! in by default. Grounded in the teacher's `FileSource` (`tokio::fs`,
//! `anyhow::Context`, async-trait) — same "read everything in `produce`,
//! nothing downstream touches I/O" shape.

use anyhow::Context;
use async_trait::async_trait;
use repoqa::feed::{FeedType, Item, PkgSet, Recipe, Scope, Version};
use repoqa::pipeline::Source;
use std::path::PathBuf;

#[derive(Debug)]
pub struct FsPkgSource {
    root: PathBuf,
}

impl FsPkgSource {
    pub fn new(root: PathBuf) -> Self {
        FsPkgSource { root }
    }

    async fn read_keywords(version_dir: &std::path::Path) -> anyhow::Result<Vec<String>> {
        match tokio::fs::read_to_string(version_dir.join("KEYWORDS")).await {
            Ok(contents) => Ok(contents.split_whitespace().map(str::to_string).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e).context("reading KEYWORDS"),
        }
    }

    async fn read_slot(version_dir: &std::path::Path) -> anyhow::Result<String> {
        match tokio::fs::read_to_string(version_dir.join("SLOT")).await {
            Ok(contents) => Ok(contents.trim().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok("0".to_string()),
            Err(e) => Err(e).context("reading SLOT"),
        }
    }

    async fn read_package(category: &str, package: &str, package_dir: &std::path::Path) -> anyhow::Result<Option<PkgSet>> {
        let mut entries = tokio::fs::read_dir(package_dir)
            .await
            .with_context(|| format!("listing versions of {category}/{package}"))?;
        let mut recipes = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let version_str = entry.file_name().to_string_lossy().into_owned();
            let version_dir = entry.path();
            let keywords = Self::read_keywords(&version_dir).await?;
            let slot = Self::read_slot(&version_dir).await?;
            let live = version_str.contains("9999");
            recipes.push(Recipe {
                category: category.to_string(),
                package: package.to_string(),
                version: Version(version_str),
                slot,
                keywords,
                live,
            });
        }
        recipes.sort_by(|a, b| a.version.0.cmp(&b.version.0));
        Ok(PkgSet::new(recipes))
    }
}

#[async_trait]
impl Source for FsPkgSource {
    fn feed_type(&self) -> FeedType {
        FeedType::CatPkg
    }

    fn scope(&self) -> Scope {
        Scope::Repository
    }

    fn cost(&self) -> u32 {
        1
    }

    async fn produce(&self) -> anyhow::Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut categories = tokio::fs::read_dir(&self.root)
            .await
            .with_context(|| format!("opening repository root {}", self.root.display()))?;
        while let Some(cat_entry) = categories.next_entry().await? {
            if !cat_entry.file_type().await?.is_dir() {
                continue;
            }
            let category = cat_entry.file_name().to_string_lossy().into_owned();
            let mut packages = tokio::fs::read_dir(cat_entry.path())
                .await
                .with_context(|| format!("listing packages in category {category}"))?;
            while let Some(pkg_entry) = packages.next_entry().await? {
                if !pkg_entry.file_type().await?.is_dir() {
                    continue;
                }
                let package = pkg_entry.file_name().to_string_lossy().into_owned();
                if let Some(set) = Self::read_package(&category, &package, &pkg_entry.path()).await? {
                    items.push(Item::Pkg(set));
                }
            }
        }
        Ok(items)
    }
}
