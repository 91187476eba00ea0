//! Core types for the merge engine.
//!
//! Source text is handled as a flat stream of [`Token`]s whose texts
//! concatenate back to the original source. An n-way diff is an ordered list
//! of [`Segment`]s aligning a span of the base with one span per variant.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Coarse lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Number,
    StringLiteral,
    Comment,
    Whitespace,
    Punctuation,
    /// Source bytes between two parser leaves that are not plain whitespace.
    Trivia,
}

/// A single lexical token and its exact source text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Concatenate token texts back into source.
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::with_capacity(tokens.iter().map(|t| t.text.len()).sum());
    push_tokens(&mut out, tokens);
    out
}

pub(crate) fn push_tokens(out: &mut String, tokens: &[Token]) {
    for token in tokens {
        out.push_str(&token.text);
    }
}

/// One aligned region of an n-way diff.
///
/// `variants[i]` is the span of variant `i` aligned with `base`. Either side
/// may be empty (pure insertion or deletion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub base: Vec<Token>,
    pub variants: Vec<Vec<Token>>,
}

impl Segment {
    /// All variants agree with the base.
    pub fn is_stable(&self) -> bool {
        self.variants.iter().all(|v| *v == self.base)
    }

    /// Distinct variant spans that differ from the base, in variant order.
    pub fn changes(&self) -> Vec<&[Token]> {
        let mut changes: Vec<&[Token]> = Vec::new();
        for variant in &self.variants {
            if *variant != self.base && !changes.contains(&variant.as_slice()) {
                changes.push(variant);
            }
        }
        changes
    }

    /// Two or more variants changed this region and disagree.
    pub fn is_conflict(&self) -> bool {
        self.changes().len() > 1
    }
}

/// Result of aligning a base token stream against several variants.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NwayDiff {
    pub segments: Vec<Segment>,
    pub variant_count: usize,
}

impl NwayDiff {
    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl<'a> IntoIterator for &'a NwayDiff {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Languages with a tree-sitter backed tokenizer. `Plain` uses the
/// hand-written lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    Java,
    Rust,
    JavaScript,
    Python,
    #[default]
    Plain,
}

impl Language {
    /// Infer language from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "java" => Some(Language::Java),
            "rs" => Some(Language::Rust),
            "js" | "mjs" | "cjs" => Some(Language::JavaScript),
            "py" => Some(Language::Python),
            "txt" => Some(Language::Plain),
            _ => None,
        }
    }

    /// Infer language from a path, falling back to `Plain`.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Rust => "rust",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Plain => "plain",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language `{0}`")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "java" => Ok(Language::Java),
            "rust" | "rs" => Ok(Language::Rust),
            "javascript" | "js" => Ok(Language::JavaScript),
            "python" | "py" => Ok(Language::Python),
            "plain" | "text" => Ok(Language::Plain),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}
