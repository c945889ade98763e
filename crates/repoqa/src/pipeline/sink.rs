//! Sink (check) contract: the consumer of items of one feed-type.
//!
//! A `Check` both describes itself to the planner (feed type, minimum
//! scope, priority, the result kinds it may emit) and does the work
//! (`start`/`feed`/`finish`, inherited from `PipelineNode`). Wrapping every
//! check in `CheckLeaf` at tree-construction time enforces the
//! known-results invariant (spec.md §3: "`known_results(sink)` ⊇ {kind of r
//! : r is any result the sink may emit}") without every check author having
//! to remember to check it themselves.

use crate::feed::{FeedType, Item, Scope};
use crate::pipeline::node::{NodeError, PipelineNode};
use crate::reporter::{self, Reporter};
use crate::result::{Finding, ResultKind};
use std::collections::HashSet;

pub trait Check: PipelineNode {
    /// Fully qualified name (`module.ClassName`-shaped) used by the filter
    /// layer and by reporter headers.
    fn qualified_name(&self) -> &'static str;

    fn feed_type(&self) -> FeedType;

    fn min_scope(&self) -> Scope;

    /// Lower runs first; sinks sharing a pipeline are sorted stably by this.
    fn priority(&self) -> i32 {
        0
    }

    fn known_results(&self) -> &'static [ResultKind];

    fn documentation(&self) -> &'static str {
        ""
    }
}

/// Wraps a `Box<dyn Check>` as a `PipelineNode`, validating every finding it
/// emits against `known_results`.
pub fn into_node(check: Box<dyn Check>) -> Box<dyn PipelineNode> {
    Box::new(CheckLeaf { check })
}

#[derive(Debug)]
struct CheckLeaf {
    check: Box<dyn Check>,
}

impl PipelineNode for CheckLeaf {
    fn start(&mut self, reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        let known: HashSet<ResultKind> = self.check.known_results().iter().copied().collect();
        let mut validating = ValidatingReporter { inner: reporter, known: &known };
        self.check.start(&mut validating)
    }

    fn feed(&mut self, item: &Item, reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        let known: HashSet<ResultKind> = self.check.known_results().iter().copied().collect();
        let mut validating = ValidatingReporter { inner: reporter, known: &known };
        self.check.feed(item, &mut validating)
    }

    fn finish(&mut self, reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        let known: HashSet<ResultKind> = self.check.known_results().iter().copied().collect();
        let mut validating = ValidatingReporter { inner: reporter, known: &known };
        self.check.finish(&mut validating)
    }
}

struct ValidatingReporter<'a> {
    inner: &'a mut dyn Reporter,
    known: &'a HashSet<ResultKind>,
}

impl std::fmt::Debug for ValidatingReporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatingReporter").finish()
    }
}

impl Reporter for ValidatingReporter<'_> {
    fn process_report(&mut self, finding: &Finding) {
        assert!(
            self.known.contains(&finding.kind),
            "check emitted {} which is not in its declared known_results",
            finding.kind
        );
        reporter::add_report(&mut *self.inner, finding.clone());
    }

    fn keyword_filter(&self) -> Option<&HashSet<ResultKind>> {
        self.inner.keyword_filter()
    }

    fn verbosity(&self) -> u32 {
        self.inner.verbosity()
    }
}
