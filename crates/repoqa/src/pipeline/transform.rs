//! Transform contract: a feed-type converter.
//!
//! A `Transform` is pure with respect to the item stream — no hidden state —
//! so `apply` takes `&self`. `wrap` realizes the spec's "wrap(child_sink) →
//! sink": it produces a `PipelineNode` that converts each incoming item and
//! forwards every output item to `child`, propagating whatever the child
//! returns (the enclosing `CheckRunner` is what actually catches metadata
//! errors — see `runner.rs`).

use crate::feed::{FeedType, Item, Scope};
use crate::pipeline::node::{NodeError, PipelineNode};
use crate::reporter::Reporter;
use std::sync::Arc;

pub trait Transform: std::fmt::Debug + Send + Sync {
    fn source_feed(&self) -> FeedType;
    fn dest_feed(&self) -> FeedType;
    fn min_scope(&self) -> Scope;
    fn cost(&self) -> u32;

    /// Converts one input item into zero or more output items.
    fn apply(&self, item: &Item) -> anyhow::Result<Vec<Item>>;
}

pub fn wrap(transform: Arc<dyn Transform>, child: Box<dyn PipelineNode>) -> Box<dyn PipelineNode> {
    Box::new(TransformNode { transform, child })
}

#[derive(Debug)]
struct TransformNode {
    transform: Arc<dyn Transform>,
    child: Box<dyn PipelineNode>,
}

impl PipelineNode for TransformNode {
    fn start(&mut self, reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        self.child.start(reporter)
    }

    fn feed(&mut self, item: &Item, reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        let outputs = self
            .transform
            .apply(item)
            .map_err(NodeError::Other)?;
        for out in outputs {
            self.child.feed(&out, reporter)?;
        }
        Ok(())
    }

    fn finish(&mut self, reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        self.child.finish(reporter)
    }
}
