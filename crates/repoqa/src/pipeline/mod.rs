//! The three plugin shapes the planner wires together: sources, transforms,
//! and sinks (checks), plus the uniform runtime node interface they share.

pub mod node;
pub mod sink;
pub mod source;
pub mod transform;

pub use node::{NodeError, PipelineNode};
pub use sink::Check;
pub use source::Source;
pub use transform::Transform;
