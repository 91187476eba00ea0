//! Rewrite graph over content-store node ids.
//!
//! Three indices are kept:
//! - **parent**: at most one `(rule, node)` per node, the most recently
//!   recorded one wins;
//! - **candidates**: `node -> rule -> children`, every rewrite ever proposed;
//! - **taken**: `node -> (rule, child)`, the candidate edges admitted into
//!   exploration.
//!
//! Edges are only ever added. `taken` is always a subset of the candidates.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::analyzer::RuleId;
use crate::store::NodeId;

#[derive(Debug, Default)]
pub struct RewriteGraph {
    parent: HashMap<NodeId, (RuleId, NodeId)>,
    candidates: HashMap<NodeId, BTreeMap<RuleId, BTreeSet<NodeId>>>,
    taken: HashMap<NodeId, BTreeSet<(RuleId, NodeId)>>,
}

impl RewriteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `rule` rewrites `from` into `to`. Returns false when the
    /// edge was already known.
    pub fn record_candidate(&mut self, from: NodeId, rule: &RuleId, to: NodeId) -> bool {
        self.candidates
            .entry(from)
            .or_default()
            .entry(rule.clone())
            .or_default()
            .insert(to)
    }

    pub fn has_candidate(&self, from: NodeId, rule: &RuleId, to: NodeId) -> bool {
        self.candidates
            .get(&from)
            .and_then(|rules| rules.get(rule))
            .is_some_and(|children| children.contains(&to))
    }

    /// Candidate children of `from` under `rule`.
    pub fn candidates(&self, from: NodeId, rule: &RuleId) -> impl Iterator<Item = NodeId> + '_ {
        self.candidates
            .get(&from)
            .and_then(|rules| rules.get(rule))
            .into_iter()
            .flatten()
            .copied()
    }

    /// All candidate edges out of `from`, ordered by rule then child.
    pub fn candidate_edges(&self, from: NodeId) -> impl Iterator<Item = (&RuleId, NodeId)> + '_ {
        self.candidates
            .get(&from)
            .into_iter()
            .flat_map(|rules| {
                rules
                    .iter()
                    .flat_map(|(rule, children)| children.iter().map(move |&c| (rule, c)))
            })
    }

    /// Point `child` at `parent`, replacing any earlier parent.
    pub fn set_parent(&mut self, child: NodeId, rule: &RuleId, parent: NodeId) {
        self.parent.insert(child, (rule.clone(), parent));
    }

    pub fn parent(&self, node: NodeId) -> Option<(&RuleId, NodeId)> {
        self.parent.get(&node).map(|(rule, parent)| (rule, *parent))
    }

    /// Admit a candidate edge into exploration.
    ///
    /// Panics if the edge was never recorded as a candidate.
    pub fn take(&mut self, from: NodeId, rule: &RuleId, to: NodeId) -> bool {
        assert!(
            self.has_candidate(from, rule, to),
            "taken edge {from} -[{rule}]-> {to} is not a candidate"
        );
        self.taken
            .entry(from)
            .or_default()
            .insert((rule.clone(), to))
    }

    pub fn is_taken(&self, from: NodeId, rule: &RuleId, to: NodeId) -> bool {
        self.taken
            .get(&from)
            .is_some_and(|edges| edges.contains(&(rule.clone(), to)))
    }

    /// Accepted edges out of `from`, ordered by rule then child.
    pub fn taken(&self, from: NodeId) -> impl Iterator<Item = (&RuleId, NodeId)> + '_ {
        self.taken
            .get(&from)
            .into_iter()
            .flatten()
            .map(|(rule, to)| (rule, *to))
    }

    pub fn taken_count(&self, from: NodeId) -> usize {
        self.taken.get(&from).map_or(0, BTreeSet::len)
    }

    /// Whether `target` can be reached from `from` over accepted edges.
    pub fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            if node == target {
                return true;
            }
            if seen.insert(node) {
                stack.extend(self.taken(node).map(|(_, child)| child));
            }
        }
        false
    }

    /// Every accepted edge reachable from `root`.
    pub fn reachable_taken(&self, root: NodeId) -> Vec<(NodeId, RuleId, NodeId)> {
        let mut edges = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }
            for (rule, child) in self.taken(node) {
                edges.push((node, rule.clone(), child));
                stack.push(child);
            }
        }
        edges
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeSet::len)
            .sum()
    }

    pub fn taken_edge_count(&self) -> usize {
        self.taken.values().map(BTreeSet::len).sum()
    }
}
