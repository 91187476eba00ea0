//! Worker pool that explores the rewrite graph to a fixed point.
//!
//! Workers share one queue of seed nodes and one of derived nodes, and
//! always prefer derived work. A worker with nothing to do parks on the
//! condition variable; the last worker to go idle while both queues are
//! empty ends the run and wakes the rest.
//!
//! Processing a node happens in three steps so the analyzer and the
//! composing diff run without the lock:
//!
//! 1. analyze the node's text (unlocked);
//! 2. record every returned rewrite as a candidate, point the child at the
//!    node, and snapshot the texts needed for admission (locked);
//! 3. compose each rewrite onto the node's parent (unlocked), then admit or
//!    reject each candidate and enqueue new children (locked).

use merge_engine::Language;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::admission::{compose, Admission, Composition, Rejection};
use crate::analyzer::{Analyzer, RewriteSet, RuleId};
use crate::config::ExploreSettings;
use crate::graph::RewriteGraph;
use crate::resolve::{MergeResolver, Patch};
use crate::store::{ContentStore, NodeId};

/// Called with each seed node as a worker picks it up.
pub type ProgressFn = Arc<dyn Fn(NodeId) + Send + Sync>;

#[derive(Clone, Default)]
pub struct ExploreOptions {
    /// Pool size; 0 uses the available hardware parallelism.
    pub workers: usize,
    pub composition: Composition,
    pub language: Language,
    pub progress: Option<ProgressFn>,
}

impl ExploreOptions {
    pub fn from_settings(settings: &ExploreSettings) -> anyhow::Result<Self> {
        let language = settings
            .language
            .as_deref()
            .map(str::parse::<Language>)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            workers: settings.workers,
            composition: settings.composition,
            language,
            progress: None,
        })
    }

    pub fn with_progress(mut self, progress: impl Fn(NodeId) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    fn pool_size(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }
}

impl fmt::Debug for ExploreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExploreOptions")
            .field("workers", &self.workers)
            .field("composition", &self.composition)
            .field("language", &self.language)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Counters collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub seeds: usize,
    pub nodes_processed: usize,
    pub distinct_texts: usize,
    pub candidates: usize,
    pub admitted: usize,
    pub rejected_self_loop: usize,
    pub rejected_commuting: usize,
    pub rejected_cycle: usize,
    pub analyzer_failures: usize,
    pub analyzer_micros: u64,
    pub wall_micros: u64,
}

impl RunStats {
    fn count(&mut self, admission: Admission) {
        match admission {
            Admission::Admitted { .. } => self.admitted += 1,
            Admission::Rejected(Rejection::SelfLoop) => self.rejected_self_loop += 1,
            Admission::Rejected(Rejection::Commuting) => self.rejected_commuting += 1,
            Admission::Rejected(Rejection::Cycle) => self.rejected_cycle += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    Acquiring,
    Processing,
    Waiting,
    Terminated,
}

struct Job {
    node: NodeId,
    text: Arc<str>,
    seed: bool,
}

/// Texts needed to replay a rewrite on the processed node's parent.
struct Replay {
    parent: NodeId,
    parent_text: Arc<str>,
    current_text: Arc<str>,
    child_text: Arc<str>,
}

struct Candidate {
    rule: RuleId,
    child: NodeId,
    replay: Option<Replay>,
}

struct State {
    store: ContentStore,
    graph: RewriteGraph,
    seeds: VecDeque<NodeId>,
    seed_order: Vec<NodeId>,
    derived: VecDeque<NodeId>,
    seeded: HashSet<NodeId>,
    pool_size: usize,
    idle: usize,
    finished: bool,
    stats: RunStats,
}

impl State {
    fn new() -> Self {
        Self {
            store: ContentStore::new(),
            graph: RewriteGraph::new(),
            seeds: VecDeque::new(),
            seed_order: Vec::new(),
            derived: VecDeque::new(),
            seeded: HashSet::new(),
            pool_size: 0,
            idle: 0,
            finished: false,
            stats: RunStats::default(),
        }
    }

    fn job(&self, node: NodeId, seed: bool) -> Job {
        Job {
            node,
            text: self.store.shared_text(node),
            seed,
        }
    }

    fn record(&mut self, current: NodeId, rewrites: RewriteSet) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(rewrites.len());
        for (rule, text) in rewrites {
            let child = self.store.intern(&text);
            if self.graph.record_candidate(current, &rule, child) {
                self.stats.candidates += 1;
            }
            if child != current {
                self.graph.set_parent(child, &rule, current);
            }
            candidates.push(Candidate {
                rule,
                child,
                replay: None,
            });
        }

        if let Some(parent) = self.graph.parent(current).map(|(_, parent)| parent) {
            let parent_text = self.store.shared_text(parent);
            let current_text = self.store.shared_text(current);
            for candidate in candidates.iter_mut().filter(|c| c.child != current) {
                candidate.replay = Some(Replay {
                    parent,
                    parent_text: parent_text.clone(),
                    current_text: current_text.clone(),
                    child_text: self.store.shared_text(candidate.child),
                });
            }
        }
        candidates
    }

    fn admit(&mut self, current: NodeId, candidate: &Candidate, composed: Option<&str>) -> Admission {
        if candidate.child == current {
            return Admission::Rejected(Rejection::SelfLoop);
        }
        if let (Some(replay), Some(text)) = (&candidate.replay, composed) {
            // A composed text nobody proposed cannot be a candidate of the parent.
            let commuting = self.store.get(text).is_some_and(|replayed| {
                self.graph
                    .has_candidate(replay.parent, &candidate.rule, replayed)
            });
            if commuting {
                return Admission::Rejected(Rejection::Commuting);
            }
        }
        if self.graph.reaches(candidate.child, current) {
            return Admission::Rejected(Rejection::Cycle);
        }

        // A child reached over a new edge is analyzed again under its new
        // parent. Edges are finite and acyclic, so this stops.
        let enqueued = self.graph.take(current, &candidate.rule, candidate.child);
        if enqueued {
            self.derived.push_back(candidate.child);
        }
        Admission::Admitted { enqueued }
    }
}

/// Ends the run if a worker unwinds, so the others stop waiting on it.
struct ReleaseOnPanic<'a> {
    state: &'a Mutex<State>,
    wake: &'a Condvar,
}

impl Drop for ReleaseOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.finished = true;
            self.wake.notify_all();
        }
    }
}

pub struct Explorer<A> {
    analyzer: A,
    options: ExploreOptions,
    state: Mutex<State>,
    wake: Condvar,
}

impl<A: Analyzer> Explorer<A> {
    pub fn new(analyzer: A, options: ExploreOptions) -> Self {
        Self {
            analyzer,
            options,
            state: Mutex::new(State::new()),
            wake: Condvar::new(),
        }
    }

    /// Queue a root text. Seeds are picked up last-added first; adding the
    /// same text twice returns the same node and queues it once.
    pub fn add_seed(&mut self, text: &str) -> NodeId {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        let node = state.store.intern(text);
        if state.seeded.insert(node) {
            state.seeds.push_front(node);
            state.seed_order.push(node);
            state.stats.seeds += 1;
        }
        node
    }

    /// Run the pool until every reachable node has been processed.
    pub fn run(mut self) -> Exploration {
        let started = Instant::now();
        let pool_size = self.options.pool_size();
        let seeds = {
            let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
            state.pool_size = pool_size;
            state.seeds.len()
        };
        tracing::info!(workers = pool_size, seeds, "Starting exploration");

        std::thread::scope(|scope| {
            for index in 0..pool_size {
                let explorer = &self;
                scope.spawn(move || explorer.worker(index));
            }
        });

        let Explorer { state, options, .. } = self;
        let mut state = state.into_inner().unwrap_or_else(PoisonError::into_inner);
        state.stats.distinct_texts = state.store.len();
        state.stats.wall_micros = micros(started);

        tracing::debug!(
            candidate_edges = state.graph.candidate_count(),
            taken_edges = state.graph.taken_edge_count(),
            texts = state.stats.distinct_texts,
            "Rewrite graph complete"
        );
        let stats = state.stats;
        tracing::info!(
            nodes = stats.nodes_processed,
            admitted = stats.admitted,
            commuting = stats.rejected_commuting,
            cycles = stats.rejected_cycle,
            failures = stats.analyzer_failures,
            "Exploration finished in {}ms",
            stats.wall_micros / 1000
        );

        Exploration {
            store: state.store,
            graph: state.graph,
            seeds: state.seed_order,
            language: options.language,
            stats,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock means another worker panicked and already marked
        // the run finished.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn worker(&self, index: usize) {
        let _span = tracing::debug_span!("worker", index).entered();
        let _release = ReleaseOnPanic {
            state: &self.state,
            wake: &self.wake,
        };
        tracing::trace!(state = ?WorkerState::Acquiring);
        while let Some(job) = self.acquire() {
            tracing::trace!(state = ?WorkerState::Processing, node = %job.node);
            self.process(job);
            tracing::trace!(state = ?WorkerState::Acquiring);
        }
        tracing::trace!(state = ?WorkerState::Terminated);
    }

    fn acquire(&self) -> Option<Job> {
        let mut state = self.lock();
        loop {
            if state.finished {
                return None;
            }
            if let Some(node) = state.derived.pop_front() {
                return Some(state.job(node, false));
            }
            if let Some(node) = state.seeds.pop_front() {
                return Some(state.job(node, true));
            }

            state.idle += 1;
            if state.idle == state.pool_size {
                tracing::debug!("All workers idle");
                state.finished = true;
                self.wake.notify_all();
                return None;
            }
            tracing::trace!(state = ?WorkerState::Waiting, idle = state.idle);
            state = self
                .wake
                .wait_while(state, |s| s.derived.is_empty() && !s.finished)
                .unwrap_or_else(PoisonError::into_inner);
            state.idle -= 1;
        }
    }

    fn process(&self, job: Job) {
        if job.seed {
            if let Some(progress) = &self.options.progress {
                progress(job.node);
            }
        }

        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.analyzer.analyze(&job.text)));
        let elapsed = micros(started);
        let (rewrites, failed) = match outcome {
            Ok(Ok(rewrites)) => (rewrites, false),
            Ok(Err(e)) => {
                tracing::warn!("Analyzer failed on {}: {}", job.node, e);
                (RewriteSet::new(), true)
            }
            Err(_) => {
                tracing::warn!("Analyzer panicked on {}", job.node);
                (RewriteSet::new(), true)
            }
        };

        let candidates = {
            let mut state = self.lock();
            state.stats.nodes_processed += 1;
            state.stats.analyzer_micros += elapsed;
            if failed {
                state.stats.analyzer_failures += 1;
            }
            state.record(job.node, rewrites)
        };
        if candidates.is_empty() {
            return;
        }

        let composed: Vec<Option<String>> = candidates
            .iter()
            .map(|candidate| {
                candidate.replay.as_ref().map(|r| {
                    compose(
                        &r.parent_text,
                        &r.current_text,
                        &r.child_text,
                        self.options.language,
                        self.options.composition,
                    )
                })
            })
            .collect();

        {
            let mut state = self.lock();
            for (candidate, composed) in candidates.iter().zip(&composed) {
                let admission = state.admit(job.node, candidate, composed.as_deref());
                tracing::trace!(
                    node = %job.node,
                    rule = %candidate.rule,
                    child = %candidate.child,
                    ?admission
                );
                state.stats.count(admission);
            }
        }
        self.wake.notify_all();
    }
}

fn micros(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX)
}

/// The finished graph of one run.
pub struct Exploration {
    store: ContentStore,
    graph: RewriteGraph,
    seeds: Vec<NodeId>,
    language: Language,
    stats: RunStats,
}

impl Exploration {
    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn graph(&self) -> &RewriteGraph {
        &self.graph
    }

    /// Seed nodes in the order they were added.
    pub fn seeds(&self) -> &[NodeId] {
        &self.seeds
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn resolver(&self) -> MergeResolver<'_> {
        MergeResolver::new(&self.store, &self.graph, self.language)
    }

    pub fn patches_for(&self, seed_text: &str) -> Vec<Patch> {
        self.resolver().patches_for(seed_text)
    }

    /// Accepted edges reachable from a seed, as texts.
    pub fn accepted_edges(&self, seed_text: &str) -> BTreeSet<(String, RuleId, String)> {
        let Some(seed) = self.store.get(seed_text) else {
            return BTreeSet::new();
        };
        self.graph
            .reachable_taken(seed)
            .into_iter()
            .map(|(from, rule, to)| {
                (
                    self.store.text(from).to_owned(),
                    rule,
                    self.store.text(to).to_owned(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{from_fn, AnalyzeError};
    use crate::rules::PatternAnalyzer;
    use std::collections::HashMap;

    fn table(entries: &[(&str, &[(&str, &str)])]) -> impl Analyzer {
        let table: HashMap<String, RewriteSet> = entries
            .iter()
            .map(|(text, rewrites)| {
                let set = rewrites
                    .iter()
                    .map(|(rule, to)| (RuleId::from(*rule), to.to_string()))
                    .collect();
                (text.to_string(), set)
            })
            .collect();
        from_fn(move |source: &str| table.get(source).cloned().unwrap_or_default())
    }

    fn explore(analyzer: impl Analyzer, seeds: &[&str], workers: usize) -> Exploration {
        let options = ExploreOptions {
            workers,
            ..ExploreOptions::default()
        };
        let mut explorer = Explorer::new(analyzer, options);
        for seed in seeds {
            explorer.add_seed(seed);
        }
        explorer.run()
    }

    fn patches(exploration: &Exploration, seed: &str) -> Vec<(String, String)> {
        exploration
            .patches_for(seed)
            .into_iter()
            .map(|p| (p.rule.to_string(), p.text))
            .collect()
    }

    fn pair(rule: &str, text: &str) -> (String, String) {
        (rule.to_string(), text.to_string())
    }

    #[test]
    fn test_independent_rewrites_each_yield_a_patch() {
        let analyzer = table(&[
            ("a+b", &[("R1", "a + b"), ("R2", "(a+b)")]),
            ("a + b", &[("R2", "(a + b)")]),
            ("(a+b)", &[("R1", "(a + b)")]),
        ]);
        let exploration = explore(analyzer, &["a+b"], 4);

        assert_eq!(
            patches(&exploration, "a+b"),
            vec![pair("R1", "a + b"), pair("R2", "(a+b)")]
        );
        // Both second-level rewrites only reorder edits already at the root.
        assert_eq!(exploration.stats().rejected_commuting, 2);
        assert_eq!(exploration.stats().admitted, 2);
        assert!(exploration.store().get("(a + b)").is_some());
    }

    #[test]
    fn test_commuting_rewrite_is_not_explored() {
        let analyzer = table(&[
            ("x", &[("R1", "x1"), ("R2", "x12")]),
            ("x1", &[("R2", "x12")]),
        ]);
        let exploration = explore(analyzer, &["x"], 2);
        let store = exploration.store();
        let (x1, x12) = (store.get("x1").unwrap(), store.get("x12").unwrap());
        let r2 = RuleId::from("R2");

        assert!(exploration.graph().has_candidate(x1, &r2, x12));
        assert!(!exploration.graph().is_taken(x1, &r2, x12));
        assert_eq!(exploration.stats().rejected_commuting, 1);
        assert_eq!(
            patches(&exploration, "x"),
            vec![pair("R1", "x1"), pair("R2", "x12")]
        );
    }

    #[test]
    fn test_self_rewrite_terminates() {
        let exploration = explore(table(&[("s", &[("R", "s")])]), &["s"], 2);
        let s = exploration.store().get("s").unwrap();

        assert!(exploration.patches_for("s").is_empty());
        assert_eq!(exploration.stats().rejected_self_loop, 1);
        assert_eq!(exploration.stats().nodes_processed, 1);
        assert_eq!(exploration.graph().candidates(s, &"R".into()).collect::<Vec<_>>(), vec![s]);
        assert_eq!(exploration.graph().parent(s), None);
    }

    #[test]
    fn test_toggling_rules_stay_acyclic() {
        let analyzer = table(&[("A", &[("flip", "B")]), ("B", &[("flip", "A")])]);
        let exploration = explore(analyzer, &["A"], 3);
        let store = exploration.store();
        let (a, b) = (store.get("A").unwrap(), store.get("B").unwrap());

        assert_eq!(exploration.stats().rejected_cycle, 1);
        assert!(exploration.graph().reaches(a, b));
        assert!(!exploration.graph().reaches(b, a));
        assert_eq!(patches(&exploration, "A"), vec![pair("flip", "B")]);
    }

    struct Flaky;

    impl Analyzer for Flaky {
        fn analyze(&self, source: &str) -> Result<RewriteSet, AnalyzeError> {
            match source {
                "ok" => Ok(RewriteSet::from([
                    ("R".into(), "bad".to_string()),
                    ("S".into(), "boom".to_string()),
                ])),
                "bad" => Err(AnalyzeError::Malformed("unreadable".into())),
                "boom" => panic!("analyzer crashed"),
                _ => Ok(RewriteSet::new()),
            }
        }
    }

    #[test]
    fn test_analyzer_failures_become_leaves() {
        let exploration = explore(Flaky, &["ok"], 2);

        assert_eq!(exploration.stats().analyzer_failures, 2);
        assert_eq!(exploration.stats().nodes_processed, 3);
        assert_eq!(
            patches(&exploration, "ok"),
            vec![pair("R", "bad"), pair("S", "boom")]
        );
    }

    #[test]
    fn test_branching_descendant_is_merged() {
        let analyzer = table(&[
            ("p", &[("R", "q")]),
            ("q", &[("A", "q a"), ("B", "b q")]),
        ]);
        let exploration = explore(analyzer, &["p"], 4);
        assert_eq!(patches(&exploration, "p"), vec![pair("R", "b q a")]);
    }

    #[test]
    fn test_child_reached_again_is_reanalyzed_under_new_parent() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);
        let inner = table(&[
            ("s", &[("A", "m"), ("B", "n1")]),
            ("m", &[("C", "z"), ("E", "w")]),
            ("n1", &[("F", "n")]),
            ("n", &[("D", "z")]),
            ("z", &[("E", "w")]),
        ]);
        let analyzer = from_fn(move |source: &str| {
            seen.lock().unwrap().push(source.to_string());
            inner.analyze(source).unwrap()
        });
        let exploration = explore(analyzer, &["s"], 1);

        // Under parent "m" the E edge out of "z" only reorders m's own E
        // rewrite; under parent "n" it is new.
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["s", "m", "n1", "z", "w", "n", "z", "w"]
        );
        let edges = exploration.accepted_edges("s");
        assert!(edges.contains(&("n".to_string(), RuleId::from("D"), "z".to_string())));
        assert!(edges.contains(&("z".to_string(), RuleId::from("E"), "w".to_string())));
        assert_eq!(edges.len(), 7);
        assert_eq!(
            patches(&exploration, "s"),
            vec![pair("A", "w"), pair("B", "w")]
        );
    }

    #[test]
    fn test_rule_with_several_occurrences_yields_several_patches() {
        let seed = "f();; g();;";
        let exploration = explore(PatternAnalyzer::with_builtin_rules(), &[seed], 4);

        let mut got = patches(&exploration, seed);
        got.sort();
        assert_eq!(
            got,
            vec![
                pair("empty-statement", "f(); g();;"),
                pair("empty-statement", "f();; g();"),
            ]
        );
        // Fixing the second occurrence after the first only reorders the
        // seed's own rewrites.
        assert_eq!(exploration.stats().rejected_commuting, 2);
    }

    #[test]
    fn test_chain_collapses_to_its_end() {
        let analyzer = PatternAnalyzer::with_builtin_rules();
        let exploration = explore(analyzer, &["a;;;"], 2);
        assert_eq!(patches(&exploration, "a;;;"), vec![pair("empty-statement", "a;")]);
    }

    #[test]
    fn test_seeds_run_last_added_first_and_derived_work_first() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);
        let inner = table(&[("s2", &[("R", "t")])]);
        let analyzer = from_fn(move |source: &str| {
            seen.lock().unwrap().push(source.to_string());
            inner.analyze(source).unwrap()
        });

        let mut explorer = Explorer::new(
            analyzer,
            ExploreOptions {
                workers: 1,
                ..ExploreOptions::default()
            },
        );
        let s1 = explorer.add_seed("s1");
        let s2 = explorer.add_seed("s2");
        assert_eq!(explorer.add_seed("s1"), s1);
        let exploration = explorer.run();

        assert_eq!(*calls.lock().unwrap(), vec!["s2", "t", "s1"]);
        assert_eq!(exploration.seeds(), &[s1, s2]);
        assert_eq!(exploration.stats().seeds, 2);
    }

    #[test]
    fn test_progress_reports_each_seed() {
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reported);
        let options = ExploreOptions {
            workers: 2,
            ..ExploreOptions::default()
        }
        .with_progress(move |node| sink.lock().unwrap().push(node));

        let mut explorer = Explorer::new(table(&[("a", &[("R", "b")])]), options);
        let a = explorer.add_seed("a");
        let c = explorer.add_seed("c");
        explorer.run();

        let mut reported = reported.lock().unwrap().clone();
        reported.sort();
        assert_eq!(reported, vec![a, c]);
    }

    #[test]
    fn test_empty_run_terminates() {
        let exploration = explore(table(&[]), &[], 3);
        assert_eq!(exploration.stats().nodes_processed, 0);
        assert!(exploration.patches_for("anything").is_empty());
        assert!(exploration.accepted_edges("anything").is_empty());
    }

    #[test]
    fn test_result_is_independent_of_scheduling() {
        let seed = "if (xs.size() == 0) { f();; }\nif (ok == true) { g(); }\n";
        let runs: Vec<_> = (0..6)
            .map(|run| {
                let workers = [1, 4, 7][run % 3];
                let exploration = explore(PatternAnalyzer::with_builtin_rules(), &[seed], workers);
                (exploration.accepted_edges(seed), exploration.patches_for(seed))
            })
            .collect();

        let (edges, patches) = &runs[0];
        assert_eq!(edges.len(), 3);
        assert_eq!(patches.len(), 3);
        for run in &runs[1..] {
            assert_eq!(&run.0, edges);
            assert_eq!(&run.1, patches);
        }
    }

    #[test]
    fn test_options_from_settings() {
        let settings = ExploreSettings {
            workers: 3,
            composition: Composition::MergeOrPreferChild,
            language: Some("java".into()),
        };
        let options = ExploreOptions::from_settings(&settings).unwrap();
        assert_eq!(options.workers, 3);
        assert_eq!(options.language, Language::Java);
        assert_eq!(options.composition, Composition::MergeOrPreferChild);

        let bad = ExploreSettings {
            language: Some("cobol".into()),
            ..ExploreSettings::default()
        };
        assert!(ExploreOptions::from_settings(&bad).is_err());
    }
}
