use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of one distinct source text. Ids are handed out in order of
/// first appearance and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Append-only, content-addressed text arena.
///
/// Byte-equal texts always map to the same [`NodeId`]. Each text is stored
/// once and shared between the forward and reverse index.
#[derive(Debug, Default)]
pub struct ContentStore {
    texts: Vec<Arc<str>>,
    ids: HashMap<Arc<str>, NodeId>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of `text`, allocating one on first sight.
    pub fn intern(&mut self, text: &str) -> NodeId {
        if let Some(&id) = self.ids.get(text) {
            return id;
        }
        let id = NodeId(self.texts.len());
        let shared: Arc<str> = Arc::from(text);
        self.texts.push(shared.clone());
        self.ids.insert(shared, id);
        id
    }

    /// Look up `text` without allocating.
    pub fn get(&self, text: &str) -> Option<NodeId> {
        self.ids.get(text).copied()
    }

    /// Text of a node.
    ///
    /// Panics on an id this store never issued.
    pub fn text(&self, id: NodeId) -> &str {
        &self.texts[id.0]
    }

    /// Shared handle to a node's text, for use outside the state lock.
    pub fn shared_text(&self, id: NodeId) -> Arc<str> {
        self.texts[id.0].clone()
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
