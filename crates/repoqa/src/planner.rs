//! The pipeline planner ("plug"): given sinks, transforms, and sources,
//! synthesizes a minimum-cost set of concrete pipelines covering every
//! reachable sink.
//!
//! Grounded in `pkgcheck`'s `plug()` (the dynamic-programming plan search
//! over `Transform`/`Addon` graphs), reworked here with feed-types and
//! transforms represented as dense bitmasks instead of Python's hashable
//! frozensets, since `FeedType` is a closed five-variant set and the
//! transform/source lists are supplied once per run with a fixed, stable
//! index. This keeps state dedup and equality exact without depending on
//! hash-set iteration order, which spec.md explicitly forbids the planner
//! from doing.

use crate::feed::{FeedType, Scope};
use crate::pipeline::{sink, transform, Check, PipelineNode, Source, Transform};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// One synthesized pipeline: the source it is rooted at, and the fully
/// constructed tree of transforms/runners/checks ready to receive `start`.
pub struct Plan {
    pub source: Arc<dyn Source>,
    pub root: Box<dyn PipelineNode>,
}

pub struct PlanOutput {
    pub unreachable: Vec<Box<dyn Check>>,
    pub plans: Vec<Plan>,
}

/// A fully-explored search state: which feed-types are visited, which
/// transforms (by index into the input slice) were used to get there, and
/// the accumulated cost. `source_idx`/`trans_mask` alone determine `visited`
/// and `cost`, so they're the dedup key.
#[derive(Clone, Copy)]
struct Explored {
    visited: u8,
    trans_mask: u32,
    cost: u32,
}

pub fn plan(
    sinks: Vec<Box<dyn Check>>,
    transforms: &[Arc<dyn Transform>],
    sources: &[Arc<dyn Source>],
    debug_mode: bool,
) -> Result<PlanOutput, crate::error::QaError> {
    if sinks.is_empty() {
        return Err(crate::error::QaError::Internal(
            "planner invoked with an empty sink set".into(),
        ));
    }
    if transforms.len() > 32 {
        return Err(crate::error::QaError::Internal(
            "planner supports at most 32 transforms per run".into(),
        ));
    }
    if sources.len() > 32 {
        return Err(crate::error::QaError::Internal(
            "planner supports at most 32 sources per run".into(),
        ));
    }

    // Step 1: reachability per source, and best_scope per feed-type.
    let mut best_scope: [Option<Scope>; 5] = [None; 5];
    for source in sources {
        let visited = reachable_from(source.as_ref(), transforms);
        for ft in FeedType::ALL {
            if visited & ft.bit() == 0 {
                continue;
            }
            let slot = &mut best_scope[ft.index()];
            *slot = Some(match slot {
                Some(existing) if *existing >= source.scope() => *existing,
                _ => source.scope(),
            });
        }
    }

    // Step 2: partition sinks.
    let mut reachable: Vec<Box<dyn Check>> = Vec::new();
    let mut unreachable: Vec<Box<dyn Check>> = Vec::new();
    for s in sinks {
        let ok = best_scope[s.feed_type().index()]
            .map(|bs| s.min_scope() <= bs)
            .unwrap_or(false);
        if ok {
            reachable.push(s);
        } else {
            unreachable.push(s);
        }
    }
    if reachable.is_empty() {
        return Ok(PlanOutput { unreachable, plans: Vec::new() });
    }

    // Step 3: source pruning.
    let min_reachable_scope = reachable.iter().map(|s| s.min_scope()).min().unwrap();
    let surviving: Vec<(usize, Arc<dyn Source>)> = sources
        .iter()
        .enumerate()
        .filter(|(_, s)| s.scope() >= min_reachable_scope)
        .map(|(i, s)| (i, s.clone()))
        .collect();
    if surviving.is_empty() {
        unreachable.extend(reachable);
        return Ok(PlanOutput { unreachable, plans: Vec::new() });
    }

    // Step 4: cheapest source per (scope, feed_type), first-seen wins ties.
    let mut cheapest: indexmap::IndexMap<(Scope, FeedType), usize> = indexmap::IndexMap::new();
    for &(idx, ref s) in &surviving {
        let key = (s.scope(), s.feed_type());
        match cheapest.get(&key) {
            Some(&cur) if sources[cur].cost() <= s.cost() => {}
            _ => {
                cheapest.insert(key, idx);
            }
        }
    }
    let candidate_idxs: HashSet<usize> = cheapest.values().copied().collect();
    let candidates: Vec<usize> = surviving
        .iter()
        .map(|(i, _)| *i)
        .filter(|i| candidate_idxs.contains(i))
        .collect();

    let sink_mask: u8 = reachable.iter().fold(0u8, |acc, s| acc | s.feed_type().bit());

    // Step 5: single-pipeline best-first search, tracking every explored
    // state (keyed by (source_idx, trans_mask)) for the multi-pipeline
    // fallback.
    let mut by_source: HashMap<usize, Vec<Explored>> = HashMap::new();
    let mut seen: HashSet<(usize, u32)> = HashSet::new();
    let mut worklist: VecDeque<(usize, u32, u8, u32)> = VecDeque::new();
    for &idx in &candidates {
        worklist.push_back((idx, 0u32, sources[idx].feed_type().bit(), sources[idx].cost()));
    }

    let mut best_single: Option<(usize, u32, u32)> = None; // (source_idx, trans_mask, cost)

    while let Some((src_idx, mask, visited, cost)) = worklist.pop_front() {
        if !seen.insert((src_idx, mask)) {
            continue;
        }
        by_source
            .entry(src_idx)
            .or_default()
            .push(Explored { visited, trans_mask: mask, cost });

        if visited & sink_mask == sink_mask {
            if best_single.map(|(_, _, b)| cost < b).unwrap_or(true) {
                best_single = Some((src_idx, mask, cost));
            }
            continue;
        }
        if let Some((_, _, b)) = best_single {
            if cost >= b {
                continue;
            }
        }
        let source_scope = sources[src_idx].scope();
        for (ti, t) in transforms.iter().enumerate() {
            let tbit = 1u32 << ti;
            if mask & tbit != 0 {
                continue;
            }
            if t.min_scope() > source_scope {
                continue;
            }
            if visited & t.source_feed().bit() == 0 {
                continue;
            }
            if visited & t.dest_feed().bit() != 0 {
                continue;
            }
            worklist.push_back((src_idx, mask | tbit, visited | t.dest_feed().bit(), cost + t.cost()));
        }
    }

    // pipes_to_run: one or more (source_idx, trans_mask) pairs whose
    // combined visited set covers sink_mask.
    let pipes_to_run: Vec<(usize, u32)> = if let Some((src_idx, mask, _)) = best_single {
        vec![(src_idx, mask)]
    } else {
        multi_pipeline_fallback(&by_source, sink_mask).ok_or_else(|| {
            crate::error::QaError::Internal(
                "planner found no covering plan despite reachable sinks".into(),
            )
        })?
    };

    // Step 7: tree construction.
    reachable.sort_by_key(|s| s.priority());
    let mut pool = reachable;
    let mut plans = Vec::with_capacity(pipes_to_run.len());
    for (src_idx, mask) in pipes_to_run {
        let source = sources[src_idx].clone();
        let used: Vec<Arc<dyn Transform>> = transforms
            .iter()
            .enumerate()
            .filter(|(ti, _)| mask & (1u32 << ti) != 0)
            .map(|(_, t)| t.clone())
            .collect();
        let root = build_subtree(source.scope(), source.feed_type(), &used, &mut pool, debug_mode);
        plans.push(Plan { source, root });
    }

    if !pool.is_empty() {
        return Err(crate::error::QaError::Internal(format!(
            "{} sink(s) left unassigned after tree construction",
            pool.len()
        )));
    }

    Ok(PlanOutput { unreachable, plans })
}

fn reachable_from(source: &dyn Source, transforms: &[Arc<dyn Transform>]) -> u8 {
    let mut visited = source.feed_type().bit();
    loop {
        let mut grew = false;
        for t in transforms {
            if t.min_scope() > source.scope() {
                continue;
            }
            if visited & t.source_feed().bit() != 0 && visited & t.dest_feed().bit() == 0 {
                visited |= t.dest_feed().bit();
                grew = true;
            }
        }
        if !grew {
            break;
        }
    }
    visited
}

/// Combination search over per-source explored states: pick one state from
/// each of a subset of sources such that the union of their `visited`
/// bitmasks covers `sink_mask`, minimizing summed cost.
fn multi_pipeline_fallback(
    by_source: &HashMap<usize, Vec<Explored>>,
    sink_mask: u8,
) -> Option<Vec<(usize, u32)>> {
    let mut source_idxs: Vec<usize> = by_source.keys().copied().collect();
    source_idxs.sort_unstable();

    struct State {
        visited: u8,
        sources_mask: u32,
        seq: Vec<(usize, u32)>,
        cost: u32,
    }

    let mut worklist: VecDeque<State> = VecDeque::new();
    for &src_idx in &source_idxs {
        for e in &by_source[&src_idx] {
            worklist.push_back(State {
                visited: e.visited,
                sources_mask: 1u32 << src_idx,
                seq: vec![(src_idx, e.trans_mask)],
                cost: e.cost,
            });
        }
    }

    let mut best: Option<(u32, Vec<(usize, u32)>)> = None;
    let mut seen: HashSet<(u8, u32)> = HashSet::new();

    while let Some(state) = worklist.pop_front() {
        if !seen.insert((state.visited, state.sources_mask)) {
            continue;
        }
        if state.visited & sink_mask == sink_mask {
            if best.as_ref().map(|(b, _)| state.cost < *b).unwrap_or(true) {
                best = Some((state.cost, state.seq.clone()));
            }
            continue;
        }
        if let Some((b, _)) = &best {
            if state.cost >= *b {
                continue;
            }
        }
        for &src_idx in &source_idxs {
            if state.sources_mask & (1u32 << src_idx) != 0 {
                continue;
            }
            for e in &by_source[&src_idx] {
                let new_visited = state.visited | e.visited;
                if new_visited == state.visited {
                    continue;
                }
                let mut seq = state.seq.clone();
                seq.push((src_idx, e.trans_mask));
                worklist.push_back(State {
                    visited: new_visited,
                    sources_mask: state.sources_mask | (1u32 << src_idx),
                    seq,
                    cost: state.cost + e.cost,
                });
            }
        }
    }

    best.map(|(_, seq)| seq)
}

fn build_subtree(
    scope_bound: Scope,
    feed_type: FeedType,
    plan_transforms: &[Arc<dyn Transform>],
    pool: &mut Vec<Box<dyn Check>>,
    debug_mode: bool,
) -> Box<dyn PipelineNode> {
    let mut children: Vec<Box<dyn PipelineNode>> = Vec::new();

    for t in plan_transforms
        .iter()
        .filter(|t| t.source_feed() == feed_type && t.min_scope() <= scope_bound)
    {
        let sub = build_subtree(scope_bound, t.dest_feed(), plan_transforms, pool, debug_mode);
        children.push(transform::wrap(t.clone(), sub));
    }

    let mut i = 0;
    while i < pool.len() {
        if pool[i].feed_type() == feed_type && pool[i].min_scope() <= scope_bound {
            let check = pool.remove(i);
            children.push(sink::into_node(check));
        } else {
            i += 1;
        }
    }

    Box::new(crate::runner::CheckRunner::new(children, debug_mode))
}
