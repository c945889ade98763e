//! Feed-type and scope model.
//!
//! Feed types classify the shape of an item flowing along a pipeline edge.
//! They're compared by equality only — no ordering, no subtyping. Scope is
//! the orthogonal axis: how much of the repository an item aggregates over.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A label for the shape of data moving through the pipeline.
///
/// Matches exactly. A transform or sink declares the feed type(s) it cares
/// about and the planner wires edges only where types match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedType {
    Repo,
    Cat,
    CatPkg,
    CatPkgVer,
    CatPkgVerText,
}

impl FeedType {
    pub const ALL: [FeedType; 5] = [
        FeedType::Repo,
        FeedType::Cat,
        FeedType::CatPkg,
        FeedType::CatPkgVer,
        FeedType::CatPkgVerText,
    ];

    /// Dense index 0..5, used by the planner to represent a set of feed
    /// types reached so far as a small bitmask instead of a hash set.
    pub fn index(self) -> usize {
        match self {
            FeedType::Repo => 0,
            FeedType::Cat => 1,
            FeedType::CatPkg => 2,
            FeedType::CatPkgVer => 3,
            FeedType::CatPkgVerText => 4,
        }
    }

    pub fn bit(self) -> u8 {
        1 << self.index()
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeedType::Repo => "repo",
            FeedType::Cat => "cat",
            FeedType::CatPkg => "cat/pkg",
            FeedType::CatPkgVer => "cat/pkg-ver",
            FeedType::CatPkgVerText => "cat/pkg-ver+text",
        };
        f.write_str(s)
    }
}

/// Ordered level of aggregation. `Version < Package < Category < Repository`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Scope {
    Version = 0,
    Package = 1,
    Category = 2,
    Repository = 3,
}

impl Scope {
    pub const MAX: Scope = Scope::Repository;

    pub const ALL: [Scope; 4] = [
        Scope::Version,
        Scope::Package,
        Scope::Category,
        Scope::Repository,
    ];
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Scope::Version => "version",
            Scope::Package => "package",
            Scope::Category => "category",
            Scope::Repository => "repository",
        };
        f.write_str(s)
    }
}

/// An opaque, orderable version token.
///
/// Real version-comparison semantics (revision suffixes, suffix ordering,
/// etc.) belong to the package-tree reader this crate consumes; this newtype
/// only guarantees the `Ord` the planner and checks need.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(pub String);

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The minimal recipe surface the check pipeline consumes. Supplied
/// externally by the package-tree reader; keywords/slot/EAPI modeling beyond
/// this is out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub category: String,
    pub package: String,
    pub version: Version,
    pub slot: String,
    pub keywords: Vec<String>,
    /// Tracks upstream HEAD via a VCS build helper; excluded from
    /// version-redundancy analysis.
    pub live: bool,
}

impl Recipe {
    pub fn fullver(&self) -> &str {
        &self.version.0
    }
}

/// A non-empty, version-ordered set of recipes sharing category and package.
#[derive(Debug, Clone)]
pub struct PkgSet(Vec<Recipe>);

impl PkgSet {
    /// Builds a package set from recipes sharing category+package.
    ///
    /// `recipes` is expected version-ascending; the planner/runner never
    /// reorders it, only individual checks do (e.g. `RedundantVersion`
    /// walks it in reverse).
    pub fn new(recipes: Vec<Recipe>) -> Option<Self> {
        if recipes.is_empty() {
            return None;
        }
        let (cat, pkg) = (&recipes[0].category, &recipes[0].package);
        if recipes
            .iter()
            .any(|r| &r.category != cat || &r.package != pkg)
        {
            return None;
        }
        Some(PkgSet(recipes))
    }

    pub fn category(&self) -> &str {
        &self.0[0].category
    }

    pub fn package(&self) -> &str {
        &self.0[0].package
    }

    pub fn as_slice(&self) -> &[Recipe] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::ops::Deref for PkgSet {
    type Target = [Recipe];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// An untyped payload tagged by feed-type. The tag determines which variant
/// is populated; sources/transforms/sinks only ever construct the variant
/// matching their declared feed type.
#[derive(Debug, Clone)]
pub enum Item {
    Repo(String),
    Cat(String),
    Pkg(PkgSet),
    Ver(Recipe),
    VerText(Recipe, Vec<String>),
}

impl Item {
    pub fn feed_type(&self) -> FeedType {
        match self {
            Item::Repo(_) => FeedType::Repo,
            Item::Cat(_) => FeedType::Cat,
            Item::Pkg(_) => FeedType::CatPkg,
            Item::Ver(_) => FeedType::CatPkgVer,
            Item::VerText(..) => FeedType::CatPkgVerText,
        }
    }
}
