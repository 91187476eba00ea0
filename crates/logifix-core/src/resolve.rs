//! Bottom-up collapse of accepted rewrite chains into patches.
//!
//! Resolution of a node:
//!
//! 1. no accepted edges: the node's own text;
//! 2. one accepted edge: the resolution of that child;
//! 3. several: resolve every child, drop the ones that failed, and n-way
//!    merge the rest over the node's text. A conflict fails the node, which
//!    its own parent then simply leaves out.
//!
//! The graph must be finished before resolving; [`crate::Exploration`] only
//! hands out resolvers once the worker pool has stopped.

use merge_engine::{nway, tokenize, Language, Token};
use serde::Serialize;
use similar::TextDiff;
use std::collections::HashMap;

use crate::analyzer::RuleId;
use crate::graph::RewriteGraph;
use crate::store::{ContentStore, NodeId};

/// One output rewrite of a seed file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Patch {
    pub rule: RuleId,
    pub text: String,
}

impl Patch {
    /// Render the patch as a unified diff against `original`.
    pub fn unified_diff(&self, original: &str, path: &str) -> String {
        TextDiff::from_lines(original, self.text.as_str())
            .unified_diff()
            .context_radius(3)
            .header(&format!("a/{path}"), &format!("b/{path}"))
            .to_string()
    }
}

pub struct MergeResolver<'a> {
    store: &'a ContentStore,
    graph: &'a RewriteGraph,
    language: Language,
    memo: HashMap<NodeId, Option<String>>,
}

impl<'a> MergeResolver<'a> {
    pub fn new(store: &'a ContentStore, graph: &'a RewriteGraph, language: Language) -> Self {
        Self {
            store,
            graph,
            language,
            memo: HashMap::new(),
        }
    }

    /// Merged text of everything reachable from `node`, or `None` when a
    /// conflict was found on the way.
    pub fn resolve(&mut self, node: NodeId) -> Option<String> {
        let mut node = node;
        // Single-edge chains pass straight through to their end.
        loop {
            match self.graph.taken_count(node) {
                0 => return Some(self.store.text(node).to_owned()),
                1 => match self.graph.taken(node).next() {
                    Some((_, child)) => node = child,
                    None => return Some(self.store.text(node).to_owned()),
                },
                _ => break,
            }
        }

        if let Some(hit) = self.memo.get(&node) {
            return hit.clone();
        }
        let merged = self.merge_children(node);
        self.memo.insert(node, merged.clone());
        merged
    }

    fn merge_children(&mut self, node: NodeId) -> Option<String> {
        let children: Vec<(RuleId, NodeId)> = self
            .graph
            .taken(node)
            .map(|(rule, child)| (rule.clone(), child))
            .collect();

        let mut resolved = Vec::with_capacity(children.len());
        for (rule, child) in children {
            match self.resolve(child) {
                Some(text) => resolved.push(text),
                None => tracing::debug!(%node, %rule, %child, "dropping conflicted branch"),
            }
        }

        let base = tokenize(self.store.text(node), self.language);
        let variants: Vec<Vec<Token>> = resolved
            .iter()
            .map(|text| tokenize(text, self.language))
            .collect();
        let diff = nway::diff(&base, &variants);

        if nway::has_conflict(&diff) {
            tracing::debug!(%node, branches = variants.len(), "merge conflict");
            return None;
        }
        nway::merge(&diff).ok()
    }

    /// Patches for a seed: one per accepted edge out of the seed whose
    /// subtree resolves cleanly. Unknown seeds yield nothing.
    pub fn patches_for(&mut self, seed_text: &str) -> Vec<Patch> {
        let Some(seed) = self.store.get(seed_text) else {
            return Vec::new();
        };
        let edges: Vec<(RuleId, NodeId)> = self
            .graph
            .taken(seed)
            .map(|(rule, child)| (rule.clone(), child))
            .collect();

        edges
            .into_iter()
            .filter_map(|(rule, child)| self.resolve(child).map(|text| Patch { rule, text }))
            .collect()
    }
}
