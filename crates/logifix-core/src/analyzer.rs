use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Identifier of one rewrite rule.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(Arc<str>);

impl RuleId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RuleId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl Serialize for RuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Every distinct `(rule, rewritten text)` pair an analyzer proposes for one
/// input text.
pub type RewriteSet = BTreeSet<(RuleId, String)>;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("rewrite span {start}..{end} is outside the {len}-byte source")]
    InvalidSpan { start: usize, end: usize, len: usize },
    #[error("source could not be analyzed: {0}")]
    Malformed(String),
}

/// The rule engine: proposes rewritten versions of a source text.
///
/// Implementations must be deterministic for a given input and must not
/// share mutable state between calls. They are invoked concurrently from
/// every exploration worker.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, source: &str) -> Result<RewriteSet, AnalyzeError>;
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
    fn analyze(&self, source: &str) -> Result<RewriteSet, AnalyzeError> {
        (**self).analyze(source)
    }
}

impl<A: Analyzer + ?Sized> Analyzer for Arc<A> {
    fn analyze(&self, source: &str) -> Result<RewriteSet, AnalyzeError> {
        (**self).analyze(source)
    }
}

/// Adapter turning a closure into an [`Analyzer`].
pub struct FnAnalyzer<F>(F);

pub fn from_fn<F>(f: F) -> FnAnalyzer<F>
where
    F: Fn(&str) -> RewriteSet + Send + Sync,
{
    FnAnalyzer(f)
}

impl<F> Analyzer for FnAnalyzer<F>
where
    F: Fn(&str) -> RewriteSet + Send + Sync,
{
    fn analyze(&self, source: &str) -> Result<RewriteSet, AnalyzeError> {
        Ok((self.0)(source))
    }
}

/// A single replacement of the byte range `start..end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub rule: RuleId,
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Rewrite {
    /// `source[..start] + replacement + source[end..]`.
    pub fn apply(&self, source: &str) -> Result<String, AnalyzeError> {
        let invalid = || AnalyzeError::InvalidSpan {
            start: self.start,
            end: self.end,
            len: source.len(),
        };
        if self.start > self.end {
            return Err(invalid());
        }
        let head = source.get(..self.start).ok_or_else(invalid)?;
        let tail = source.get(self.end..).ok_or_else(invalid)?;

        let mut out = String::with_capacity(head.len() + self.replacement.len() + tail.len());
        out.push_str(head);
        out.push_str(&self.replacement);
        out.push_str(tail);
        Ok(out)
    }
}
