//! The two concrete checks that exercise the pipeline contract end to end.

pub mod redundant_version;
pub mod unstable_only;

pub use redundant_version::RedundantVersion;
pub use unstable_only::UnstableOnly;
