//! Built-in reporters plus the `ReporterFactory` trait each is built from.
//!
//! Grounded in the teacher's `make_configurable_reporter_factory` pattern
//! (`crates/kvx/src/app_config.rs`): a destination is opened lazily on
//! `build`, and failure becomes a typed error rather than a panic.

pub mod grouped;
pub mod json;
pub mod line;
pub mod multiplex;
pub mod null;
pub mod pickle;
pub mod xml;

pub use grouped::GroupedReporter;
pub use json::JsonReporter;
pub use line::LineReporter;
pub use multiplex::MultiplexReporter;
pub use null::NullReporter;
pub use pickle::{BinaryPickleStreamReporter, PickleStreamReporter, StreamHeader};
pub use xml::XmlReporter;

use crate::error::QaError;
use crate::reporter::Reporter;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Produces a boxed `Reporter` bound to an optional destination path,
/// opened (or defaulted to stdout) on `build`. `priority` orders default
/// selection when the caller doesn't name a reporter explicitly; highest
/// wins (see `Registry::default_reporter_factory` and DESIGN.md), so the
/// interactive `GroupedReporter` is chosen over machine-readable or
/// negative-priority reporters rather than `NullReporter` winning by
/// default.
pub trait ReporterFactory {
    fn name(&self) -> &'static str;
    fn priority(&self) -> i32;
    fn build(&self, dest: Option<&Path>, verbosity: u32) -> Result<Box<dyn Reporter>, QaError>;
}

fn open_sink(dest: Option<&Path>) -> Result<Box<dyn Write + Send>, QaError> {
    match dest {
        Some(path) => {
            let file = File::create(path).map_err(|source| QaError::ReporterInit {
                dest: path.display().to_string(),
                source,
            })?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

macro_rules! simple_factory {
    ($factory:ident, $name:expr, $priority:expr, $reporter:ident) => {
        pub struct $factory;

        impl ReporterFactory for $factory {
            fn name(&self) -> &'static str {
                $name
            }

            fn priority(&self) -> i32 {
                $priority
            }

            fn build(&self, dest: Option<&Path>, verbosity: u32) -> Result<Box<dyn Reporter>, QaError> {
                Ok(Box::new($reporter::new(open_sink(dest)?, verbosity)))
            }
        }
    };
}

simple_factory!(LineReporterFactory, "line", 0, LineReporter);
simple_factory!(GroupedReporterFactory, "grouped", 1, GroupedReporter);
simple_factory!(JsonReporterFactory, "json", -1000, JsonReporter);
simple_factory!(XmlReporterFactory, "xml", -1000, XmlReporter);
simple_factory!(PickleStreamReporterFactory, "pickle", -1001, PickleStreamReporter);
simple_factory!(BinaryPickleStreamReporterFactory, "pickle-binary", -1002, BinaryPickleStreamReporter);

pub struct NullReporterFactory;

impl ReporterFactory for NullReporterFactory {
    fn name(&self) -> &'static str {
        "null"
    }

    fn priority(&self) -> i32 {
        -10_000_000
    }

    fn build(&self, _dest: Option<&Path>, _verbosity: u32) -> Result<Box<dyn Reporter>, QaError> {
        Ok(Box::new(NullReporter))
    }
}

/// Every built-in factory, in declaration order (the order `--list-checks`
/// and default-reporter fallback consult).
pub fn builtin_factories() -> Vec<Box<dyn ReporterFactory>> {
    vec![
        Box::new(LineReporterFactory),
        Box::new(GroupedReporterFactory),
        Box::new(JsonReporterFactory),
        Box::new(XmlReporterFactory),
        Box::new(PickleStreamReporterFactory),
        Box::new(BinaryPickleStreamReporterFactory),
        Box::new(NullReporterFactory),
    ]
}
