//! End-to-end scenarios from spec.md §8: concrete planner shapes, the two
//! example checks against hand-built package sets, filter composition, and
//! the runner's metadata-error dedup/priority-ordering contract.

use async_trait::async_trait;
use repoqa::checks::{RedundantVersion, UnstableOnly};
use repoqa::feed::{FeedType, Item, PkgSet, Recipe, Scope, Version};
use repoqa::filters::{apply_all, Blacklist, Filterable, PatternFilter, SelectionFilter, Whitelist};
use repoqa::pipeline::node::NodeError;
use repoqa::pipeline::sink::into_node;
use repoqa::pipeline::{Check, PipelineNode, Source, Transform};
use repoqa::planner;
use repoqa::reporter::{CheckDescriptor, Reporter};
use repoqa::result::{Finding, ResultKind, Severity};
use repoqa::runner::CheckRunner;
use std::sync::Arc;

fn recipe(version: &str, keywords: &[&str], live: bool) -> Recipe {
    Recipe {
        category: "a".into(),
        package: "b".into(),
        version: Version(version.into()),
        slot: "0".into(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
        live,
    }
}

struct CollectingReporter(Vec<Finding>);

impl Reporter for CollectingReporter {
    fn process_report(&mut self, finding: &Finding) {
        self.0.push(finding.clone());
    }
}

// ---------------------------------------------------------------------
// RedundantVersion-A / RedundantVersion-B
// ---------------------------------------------------------------------

#[test]
fn redundant_version_a_flags_the_overshadowed_lower_version() {
    let set = PkgSet::new(vec![recipe("1", &["amd64"], false), recipe("2", &["amd64"], false)]).unwrap();
    let mut reporter = CollectingReporter(Vec::new());
    let mut check = RedundantVersion::new();
    check.feed(&Item::Pkg(set), &mut reporter).unwrap();

    assert_eq!(reporter.0.len(), 1);
    let finding = &reporter.0[0];
    assert_eq!(finding.version.as_deref(), Some("1"));
    assert_eq!(finding.attrs.get("slot").and_then(|v| v.as_str()), Some("0"));
    assert_eq!(
        finding.attrs.get("later_versions").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(1)
    );
}

#[test]
fn redundant_version_b_live_version_suppresses_the_result() {
    let set = PkgSet::new(vec![recipe("1", &["amd64"], false), recipe("2", &["amd64"], true)]).unwrap();
    let mut reporter = CollectingReporter(Vec::new());
    let mut check = RedundantVersion::new();
    check.feed(&Item::Pkg(set), &mut reporter).unwrap();
    assert!(reporter.0.is_empty());
}

// ---------------------------------------------------------------------
// UnstableOnly-A / UnstableOnly-B
// ---------------------------------------------------------------------

#[test]
fn unstable_only_a_flags_arches_with_no_stable_version() {
    let set = PkgSet::new(vec![
        recipe("1", &["~amd64", "~x86"], false),
        recipe("2", &["~amd64", "~x86"], false),
    ])
    .unwrap();
    let mut reporter = CollectingReporter(Vec::new());
    let mut check = UnstableOnly::new(vec!["amd64".into(), "x86".into()]);
    check.feed(&Item::Pkg(set), &mut reporter).unwrap();

    assert_eq!(reporter.0.len(), 1);
    let versions = reporter.0[0].attrs.get("versions").and_then(|v| v.as_array()).unwrap();
    assert_eq!(versions.len(), 2);
    let arches = reporter.0[0].attrs.get("arches").and_then(|v| v.as_array()).unwrap();
    assert_eq!(arches.len(), 2);
}

#[test]
fn unstable_only_b_a_stable_version_clears_the_result() {
    let set = PkgSet::new(vec![
        recipe("1", &["~amd64", "~x86"], false),
        recipe("2", &["~amd64", "~x86"], false),
        recipe("3", &["amd64", "x86"], false),
    ])
    .unwrap();
    let mut reporter = CollectingReporter(Vec::new());
    let mut check = UnstableOnly::new(vec!["amd64".into(), "x86".into()]);
    check.feed(&Item::Pkg(set), &mut reporter).unwrap();
    assert!(reporter.0.is_empty());
}

// ---------------------------------------------------------------------
// Planner-single / Planner-multi
// ---------------------------------------------------------------------

#[derive(Debug)]
struct TestSource {
    feed_type: FeedType,
    scope: Scope,
    cost: u32,
}

#[async_trait]
impl Source for TestSource {
    fn feed_type(&self) -> FeedType {
        self.feed_type
    }

    fn scope(&self) -> Scope {
        self.scope
    }

    fn cost(&self) -> u32 {
        self.cost
    }

    async fn produce(&self) -> anyhow::Result<Vec<Item>> {
        Ok(Vec::new())
    }
}

#[derive(Debug)]
struct TestTransform {
    source_feed: FeedType,
    dest_feed: FeedType,
    min_scope: Scope,
    cost: u32,
}

impl Transform for TestTransform {
    fn source_feed(&self) -> FeedType {
        self.source_feed
    }

    fn dest_feed(&self) -> FeedType {
        self.dest_feed
    }

    fn min_scope(&self) -> Scope {
        self.min_scope
    }

    fn cost(&self) -> u32 {
        self.cost
    }

    fn apply(&self, item: &Item) -> anyhow::Result<Vec<Item>> {
        Ok(vec![item.clone()])
    }
}

#[derive(Debug)]
struct TestSink {
    name: &'static str,
    feed_type: FeedType,
    min_scope: Scope,
}

impl PipelineNode for TestSink {
    fn feed(&mut self, _item: &Item, _reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        Ok(())
    }
}

impl Check for TestSink {
    fn qualified_name(&self) -> &'static str {
        self.name
    }

    fn feed_type(&self) -> FeedType {
        self.feed_type
    }

    fn min_scope(&self) -> Scope {
        self.min_scope
    }

    fn known_results(&self) -> &'static [ResultKind] {
        &[]
    }
}

#[test]
fn planner_single_prefers_one_pipeline_over_a_cheaper_looking_split() {
    let s_ver: Arc<dyn Source> =
        Arc::new(TestSource { feed_type: FeedType::CatPkgVer, scope: Scope::Version, cost: 5 });
    let s_pkg: Arc<dyn Source> =
        Arc::new(TestSource { feed_type: FeedType::CatPkg, scope: Scope::Package, cost: 3 });
    let t: Arc<dyn Transform> = Arc::new(TestTransform {
        source_feed: FeedType::CatPkgVer,
        dest_feed: FeedType::CatPkg,
        min_scope: Scope::Version,
        cost: 1,
    });

    let sinks: Vec<Box<dyn Check>> = vec![
        Box::new(TestSink { name: "A", feed_type: FeedType::CatPkgVer, min_scope: Scope::Version }),
        Box::new(TestSink { name: "B", feed_type: FeedType::CatPkg, min_scope: Scope::Package }),
    ];

    let output = planner::plan(sinks, &[t], &[s_ver.clone(), s_pkg.clone()], false).unwrap();

    assert!(output.unreachable.is_empty());
    assert_eq!(output.plans.len(), 1, "expected a single pipeline, not a two-source split");
    assert!(Arc::ptr_eq(&output.plans[0].source, &s_ver));
}

#[test]
fn planner_multi_falls_back_to_two_pipelines_when_no_source_covers_both() {
    let s_x: Arc<dyn Source> = Arc::new(TestSource { feed_type: FeedType::Cat, scope: Scope::Category, cost: 1 });
    let s_y: Arc<dyn Source> =
        Arc::new(TestSource { feed_type: FeedType::CatPkg, scope: Scope::Package, cost: 1 });

    let sinks: Vec<Box<dyn Check>> = vec![
        Box::new(TestSink { name: "X", feed_type: FeedType::Cat, min_scope: Scope::Category }),
        Box::new(TestSink { name: "Y", feed_type: FeedType::CatPkg, min_scope: Scope::Package }),
    ];

    let output = planner::plan(sinks, &[], &[s_x, s_y], false).unwrap();

    assert!(output.unreachable.is_empty());
    assert_eq!(output.plans.len(), 2);
}

// ---------------------------------------------------------------------
// Filter composition
// ---------------------------------------------------------------------

struct NamedTarget(&'static str);

impl Filterable for NamedTarget {
    fn qualified_name(&self) -> &str {
        self.0
    }

    fn scope(&self) -> Scope {
        Scope::Package
    }
}

#[test]
fn whitelist_then_blacklist_composition() {
    let filters: Vec<Box<dyn SelectionFilter>> = vec![
        Box::new(Whitelist(vec![PatternFilter::new("cleanup").unwrap()])),
        Box::new(Blacklist(vec![PatternFilter::new("unstable").unwrap()])),
    ];

    let targets = [
        NamedTarget("m.cleanup.A"),
        NamedTarget("m.cleanup.B"),
        NamedTarget("m.unstable.C"),
    ];
    let kept: Vec<&str> = targets.iter().filter(|t| apply_all(&filters, *t)).map(|t| t.0).collect();

    assert_eq!(kept, vec!["m.cleanup.A", "m.cleanup.B"]);
}

// ---------------------------------------------------------------------
// CheckRunner: priority order and metadata-error dedup
// ---------------------------------------------------------------------

#[derive(Debug)]
struct OrderRecordingSink {
    name: &'static str,
    priority: i32,
    order: Arc<std::sync::Mutex<Vec<&'static str>>>,
}

impl PipelineNode for OrderRecordingSink {
    fn feed(&mut self, _item: &Item, _reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        self.order.lock().unwrap().push(self.name);
        Ok(())
    }
}

impl Check for OrderRecordingSink {
    fn qualified_name(&self) -> &'static str {
        self.name
    }

    fn feed_type(&self) -> FeedType {
        FeedType::CatPkg
    }

    fn min_scope(&self) -> Scope {
        Scope::Package
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn known_results(&self) -> &'static [ResultKind] {
        &[]
    }
}

#[test]
fn sinks_run_in_ascending_priority_order() {
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));
    let mut sinks: Vec<Box<dyn Check>> = vec![
        Box::new(OrderRecordingSink { name: "late", priority: 5, order: order.clone() }),
        Box::new(OrderRecordingSink { name: "early", priority: -5, order: order.clone() }),
        Box::new(OrderRecordingSink { name: "mid", priority: 0, order: order.clone() }),
    ];
    sinks.sort_by_key(|s| s.priority());

    let children: Vec<Box<dyn PipelineNode>> = sinks.into_iter().map(into_node).collect();
    let mut runner = CheckRunner::new(children, false);
    let mut reporter = CollectingReporter(Vec::new());
    let item = Item::Pkg(PkgSet::new(vec![recipe("1", &["amd64"], false)]).unwrap());
    runner.feed(&item, &mut reporter).unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["early", "mid", "late"]);
}

#[derive(Debug)]
struct AlwaysMetadataError;

impl PipelineNode for AlwaysMetadataError {
    fn feed(&mut self, _item: &Item, _reporter: &mut dyn Reporter) -> Result<(), NodeError> {
        Err(NodeError::Metadata {
            category: "a".into(),
            package: "b".into(),
            version: "1".into(),
            attr: "depend".into(),
            msg: "unparsable".into(),
        })
    }
}

#[test]
fn identical_metadata_errors_deduplicate_to_one_result() {
    let children: Vec<Box<dyn PipelineNode>> =
        vec![Box::new(AlwaysMetadataError), Box::new(AlwaysMetadataError)];
    let mut runner = CheckRunner::new(children, false);
    let mut reporter = CollectingReporter(Vec::new());
    let item = Item::Pkg(PkgSet::new(vec![recipe("1", &["amd64"], false)]).unwrap());

    runner.feed(&item, &mut reporter).unwrap();
    runner.feed(&item, &mut reporter).unwrap();

    let metadata_findings: Vec<&Finding> =
        reporter.0.iter().filter(|f| f.kind == ResultKind::MetadataError).collect();
    assert_eq!(metadata_findings.len(), 1);
}

// ---------------------------------------------------------------------
// Reporter keyword filter
// ---------------------------------------------------------------------

struct FilteringReporter {
    allowed: std::collections::HashSet<ResultKind>,
    received: Vec<Finding>,
}

impl Reporter for FilteringReporter {
    fn process_report(&mut self, finding: &Finding) {
        self.received.push(finding.clone());
    }

    fn keyword_filter(&self) -> Option<&std::collections::HashSet<ResultKind>> {
        Some(&self.allowed)
    }
}

#[test]
fn reporter_keyword_filter_drops_other_kinds() {
    let mut reporter = FilteringReporter {
        allowed: [ResultKind::UnstableOnly].into_iter().collect(),
        received: Vec::new(),
    };
    let redundant = Finding::new(
        ResultKind::RedundantVersion,
        Severity::Warning,
        FeedType::CatPkgVer,
        Some("a".into()),
        Some("b".into()),
        Some("1".into()),
        "redundant".into(),
        None,
        Default::default(),
    )
    .unwrap();
    let unstable = Finding::new(
        ResultKind::UnstableOnly,
        Severity::Warning,
        FeedType::CatPkg,
        Some("a".into()),
        Some("b".into()),
        None,
        "unstable".into(),
        None,
        Default::default(),
    )
    .unwrap();

    repoqa::reporter::add_report(&mut reporter, redundant);
    repoqa::reporter::add_report(&mut reporter, unstable);

    assert_eq!(reporter.received.len(), 1);
    assert_eq!(reporter.received[0].kind, ResultKind::UnstableOnly);
}

// ---------------------------------------------------------------------
// Pickle-stream round trip
// ---------------------------------------------------------------------

#[test]
fn pickle_stream_header_round_trips_through_bincode() {
    use repoqa::reporters::StreamHeader;

    let descriptors = vec![CheckDescriptor {
        qualified_name: "checks.redundant_version.RedundantVersion".into(),
        documentation: "",
        known_results: &[ResultKind::RedundantVersion],
    }];
    let header = StreamHeader::new(&descriptors, "gentoo");
    let bytes = bincode::serialize(&header).unwrap();
    let decoded: StreamHeader = bincode::deserialize(&bytes).unwrap();
    assert_eq!(decoded.criterion, "gentoo");
    assert_eq!(decoded.known_results, vec![ResultKind::RedundantVersion]);
}

#[test]
fn finding_round_trips_through_json() {
    let finding = Finding::new(
        ResultKind::RedundantVersion,
        Severity::Warning,
        FeedType::CatPkgVer,
        Some("a".into()),
        Some("b".into()),
        Some("1".into()),
        "desc".into(),
        None,
        Default::default(),
    )
    .unwrap();
    let json = serde_json::to_string(&finding).unwrap();
    let decoded: Finding = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, finding);
}
