//! Source contract: the origin of items at a single feed-type and scope.
//!
//! Grounded in the teacher's `backends::Source` trait — a narrow async trait
//! implemented by concrete backends, dispatched through this crate's registry
//! instead of a closed enum, since the set of sources is config-driven rather
//! than three hardcoded variants.

use crate::feed::{FeedType, Item};
use async_trait::async_trait;

/// Produces items of a single feed-type at a declared scope and cost.
///
/// `produce` is the sole legitimate I/O boundary in the pipeline (spec.md
/// §5): everything downstream of a source is synchronous and CPU-bound.
#[async_trait]
pub trait Source: std::fmt::Debug + Send + Sync {
    fn feed_type(&self) -> FeedType;

    fn scope(&self) -> crate::feed::Scope;

    /// Opaque cost token; only relative ordering matters to the planner.
    fn cost(&self) -> u32;

    /// Produces the full, ordered item sequence. Implementations that wrap a
    /// real repository reader page through their own I/O internally; this
    /// crate never requires the whole sequence to be materialized in memory
    /// at once, but for simplicity (and because the repositories this
    /// targets fit comfortably in memory) the contract returns it eagerly.
    async fn produce(&self) -> anyhow::Result<Vec<Item>>;
}
