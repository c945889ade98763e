//! `CheckRunner`: drives items through a list of children (checks and/or
//! nested transform subtrees), converting metadata errors into deduplicated
//! results and, outside debug mode, retiring a child after an unexpected
//! failure instead of taking the whole pipeline down with it.

use crate::feed::Item;
use crate::pipeline::node::{NodeError, PipelineNode};
use crate::reporter::{self, Reporter};
use crate::result::{Finding, ResultKind};
use std::collections::HashSet;

#[derive(Debug)]
pub struct CheckRunner {
    children: Vec<Box<dyn PipelineNode>>,
    disabled: Vec<bool>,
    debug_mode: bool,
    seen_metadata_errors: HashSet<(String, String, String, String, String)>,
}

impl CheckRunner {
    pub fn new(children: Vec<Box<dyn PipelineNode>>, debug_mode: bool) -> Self {
        let disabled = vec![false; children.len()];
        CheckRunner {
            children,
            disabled,
            debug_mode,
            seen_metadata_errors: HashSet::new(),
        }
    }

    /// Structural key for a child: children are trait objects with no
    /// equality of their own, so their required `Debug` impl stands in for
    /// one.
    fn child_keys(&self) -> HashSet<String> {
        self.children.iter().map(|c| format!("{c:?}")).collect()
    }

    fn handle_metadata(&mut self, reporter: &mut dyn Reporter, err: NodeError) -> Result<(), NodeError> {
        match err {
            NodeError::Metadata { category, package, version, attr, msg } => {
                let key = (category.clone(), package.clone(), version.clone(), attr.clone(), msg.clone());
                if self.seen_metadata_errors.insert(key) {
                    let finding = Finding::new(
                        ResultKind::MetadataError,
                        crate::result::Severity::Error,
                        crate::feed::FeedType::CatPkgVer,
                        Some(category),
                        Some(package),
                        Some(version),
                        format!("attr({attr}): {msg}"),
                        None,
                        Default::default(),
                    )
                    .expect("MetadataError always carries full coordinates");
                    reporter::add_report(reporter, finding);
                }
                Ok(())
            }
            other => Err(other),
        }
    }

    /// Applied to a non-metadata failure from `start`/`feed`. Returns `Err`
    /// (to propagate and abort the run) when debug mode is active; otherwise
    /// logs and returns `Ok` so the caller retires the child.
    fn handle_other(&self, index: usize, name: &str, err: anyhow::Error) -> Result<(), NodeError> {
        if self.debug_mode {
            return Err(NodeError::Other(err));
        }
        tracing::error!(child = name, index, error = %err, "check raised an unexpected error; skipping for the rest of this run");
        Ok(())
    }
}

impl PipelineNode for CheckRunner {
    fn start(&mut self, reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        for i in 0..self.children.len() {
            if self.disabled[i] {
                continue;
            }
            let name = format!("{:?}", self.children[i]);
            match self.children[i].start(reporter) {
                Ok(()) => {}
                Err(e @ NodeError::Metadata { .. }) => self.handle_metadata(reporter, e)?,
                Err(NodeError::Other(e)) => {
                    self.handle_other(i, &name, e)?;
                    self.disabled[i] = true;
                }
            }
        }
        Ok(())
    }

    fn feed(&mut self, item: &Item, reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        for i in 0..self.children.len() {
            if self.disabled[i] {
                continue;
            }
            let name = format!("{:?}", self.children[i]);
            match self.children[i].feed(item, reporter) {
                Ok(()) => {}
                Err(e @ NodeError::Metadata { .. }) => self.handle_metadata(reporter, e)?,
                Err(NodeError::Other(e)) => {
                    self.handle_other(i, &name, e)?;
                    self.disabled[i] = true;
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self, reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        let mut first_err = None;
        for i in 0..self.children.len() {
            match self.children[i].finish(reporter) {
                Ok(()) => {}
                Err(e @ NodeError::Metadata { .. }) => {
                    if let Err(e) = self.handle_metadata(reporter, e) {
                        if first_err.is_none() {
                            first_err = Some(e);
                        }
                    }
                }
                Err(NodeError::Other(e)) => {
                    tracing::error!(index = i, error = %e, "check failed during finish");
                    if first_err.is_none() {
                        first_err = Some(NodeError::Other(e));
                    }
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Structural over the set of children, order-independent — mirrors the
/// original's `__eq__` over `frozenset(self.checks)`.
impl PartialEq for CheckRunner {
    fn eq(&self, other: &Self) -> bool {
        self.child_keys() == other.child_keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Noop(&'static str);

    impl PipelineNode for Noop {
        fn feed(&mut self, _item: &Item, _reporter: &mut dyn Reporter) -> Result<(), NodeError> {
            Ok(())
        }
    }

    #[test]
    fn equality_is_structural_over_the_set_of_children_regardless_of_order() {
        let a = CheckRunner::new(vec![Box::new(Noop("x")), Box::new(Noop("y"))], false);
        let b = CheckRunner::new(vec![Box::new(Noop("y")), Box::new(Noop("x"))], false);
        assert_eq!(a, b);
    }

    #[test]
    fn differing_children_are_not_equal() {
        let a = CheckRunner::new(vec![Box::new(Noop("x"))], false);
        let b = CheckRunner::new(vec![Box::new(Noop("z"))], false);
        assert_ne!(a, b);
    }
}
