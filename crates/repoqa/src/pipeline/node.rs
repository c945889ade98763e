//! The uniform runtime interface shared by checks, transform-wrapped
//! subtrees, and nested runners.
//!
//! Mirrors the teacher's `Worker` trait (one verb, implemented by every
//! runnable thing) but with three lifecycle verbs instead of one, since a
//! pipeline node's lifetime spans the whole run rather than a single task.

use crate::reporter::Reporter;
use crate::feed::Item;

/// A per-item failure. `Metadata` is the one kind the runner converts into a
/// result rather than treating as fatal; `Other` is an unexpected failure
/// that the runner logs and, outside debug mode, uses to retire the
/// offending child for the rest of the run.
#[derive(Debug)]
pub enum NodeError {
    Metadata {
        category: String,
        package: String,
        version: String,
        attr: String,
        msg: String,
    },
    Other(anyhow::Error),
}

impl std::fmt::Display for NodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeError::Metadata { category, package, version, attr, msg } => {
                write!(f, "metadata error in {category}/{package}-{version} attr({attr}): {msg}")
            }
            NodeError::Other(e) => write!(f, "{e}"),
        }
    }
}

pub trait PipelineNode: std::fmt::Debug {
    fn start(&mut self, reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        let _ = reporter;
        Ok(())
    }

    fn feed(&mut self, item: &Item, reporter: &mut dyn Reporter) -> Result<(), NodeError>;

    fn finish(&mut self, reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        let _ = reporter;
        Ok(())
    }
}
