//! Conflict-avoidance admission of candidate edges.
//!
//! Applying independent rules in different orders tends to reconverge on the
//! same texts. Before a rewrite of a non-root node is explored, its edit is
//! replayed directly on the node's parent. If the parent already has that
//! text as a candidate under the same rule, the edge only reproduces a
//! rewrite reachable by another order and is not explored.

use merge_engine::{nway, Language};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the "same rule applied to the parent" text is composed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Composition {
    /// Regions where the node and the child agree come from the parent, the
    /// rest from the child.
    #[default]
    Rebase,
    /// Clean 3-way merge of node and child over the parent; where they
    /// conflict, the child's side wins.
    MergeOrPreferChild,
}

/// Why a candidate edge was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The rewrite returned its own input.
    SelfLoop,
    /// The parent already has the composed text as a candidate.
    Commuting,
    /// The child already reaches the node over accepted edges.
    Cycle,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::SelfLoop => write!(f, "self-loop"),
            Rejection::Commuting => write!(f, "commuting"),
            Rejection::Cycle => write!(f, "cycle"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The edge is taken. `enqueued` is false when the same edge had already
    /// been taken on an earlier visit of the node.
    Admitted { enqueued: bool },
    Rejected(Rejection),
}

/// Compose the text the child's rule would have produced on `parent`.
///
/// `current` is the node being processed and `child` the rewrite of it.
pub fn compose(
    parent: &str,
    current: &str,
    child: &str,
    language: Language,
    composition: Composition,
) -> String {
    let diff = nway::diff_texts(parent, &[current, child], language);
    match composition {
        Composition::Rebase => nway::rebase(&diff),
        Composition::MergeOrPreferChild => {
            nway::merge(&diff).unwrap_or_else(|_| nway::prefer_latest(&diff))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebase_replays_edit_on_parent() {
        let composed = compose("a+b", "a + b", "(a + b)", Language::Plain, Composition::Rebase);
        assert_eq!(composed, "(a+b)");
    }

    #[test]
    fn test_rebase_independent_statements() {
        let composed = compose(
            "f();; g() == true;",
            "f(); g() == true;",
            "f(); g();",
            Language::Plain,
            Composition::Rebase,
        );
        assert_eq!(composed, "f();; g();");
    }

    #[test]
    fn test_rebase_dependent_edit_keeps_child() {
        let composed = compose("x", "x1", "x12", Language::Plain, Composition::Rebase);
        assert_eq!(composed, "x12");
    }

    #[test]
    fn test_merge_or_prefer_child_on_clean_diff() {
        let composed = compose(
            "a = 1; b = 2;",
            "a = 9; b = 2;",
            "a = 9; b = 8;",
            Language::Plain,
            Composition::MergeOrPreferChild,
        );
        assert_eq!(composed, "a = 9; b = 8;");
    }

    #[test]
    fn test_merge_or_prefer_child_on_conflict() {
        let composed = compose(
            "a = 1;",
            "a = 2;",
            "a = 3;",
            Language::Plain,
            Composition::MergeOrPreferChild,
        );
        assert_eq!(composed, "a = 3;");
    }

    #[test]
    fn test_composition_serde_names() {
        let c: Composition = serde_json::from_str("\"merge_or_prefer_child\"").unwrap();
        assert_eq!(c, Composition::MergeOrPreferChild);
        assert_eq!(serde_json::to_string(&Composition::Rebase).unwrap(), "\"rebase\"");
    }
}
