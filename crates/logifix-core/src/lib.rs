//! Concurrent exploration of rewrite rules over source files.
//!
//! An [`Analyzer`] proposes rewritten versions of a text. The [`Explorer`]
//! applies it to every seed and, transitively, to every rewrite worth
//! exploring, using a pool of worker threads. Rewrites that only reorder
//! independent edits are pruned on the way. Once the pool stops, a
//! [`MergeResolver`] folds each accepted subtree back into one text per
//! top-level rewrite.
//!
//! ```
//! use logifix_core::{ExploreOptions, Explorer, PatternAnalyzer};
//!
//! let mut explorer = Explorer::new(PatternAnalyzer::with_builtin_rules(), ExploreOptions::default());
//! explorer.add_seed("f();; if (ok == true) {}");
//! let exploration = explorer.run();
//! assert_eq!(exploration.patches_for("f();; if (ok == true) {}").len(), 2);
//! ```

pub mod admission;
pub mod analyzer;
pub mod config;
pub mod graph;
pub mod logging;
pub mod resolve;
pub mod rules;
pub mod scheduler;
pub mod store;

pub use admission::{compose, Admission, Composition, Rejection};
pub use analyzer::{from_fn, AnalyzeError, Analyzer, FnAnalyzer, Rewrite, RewriteSet, RuleId};
pub use config::Settings;
pub use graph::RewriteGraph;
pub use merge_engine::Language;
pub use resolve::{MergeResolver, Patch};
pub use rules::{LiteralRule, PatternAnalyzer, RewriteRule};
pub use scheduler::{Exploration, ExploreOptions, Explorer, RunStats};
pub use store::{ContentStore, NodeId};
