//! # merge-engine
//!
//! Token-level n-way diff and merge.
//!
//! The engine aligns one base text against any number of variants and either
//! folds them into a single merged text or reports that two variants edited
//! the same region differently.
//!
//! ## Approach
//!
//! 1. **Tokenization**: Source is split into tokens that render back to the
//!    exact input. Java, Rust, JavaScript and Python are tokenized from the
//!    leaves of a tree-sitter concrete syntax tree; anything else goes through
//!    a small hand-written lexer.
//!
//! 2. **Alignment**: Each variant is diffed against the base over tokens
//!    (Myers LCS via `similar`). Base tokens kept by every variant anchor the
//!    alignment; the spans between anchors are the regions that can change.
//!
//! 3. **Merge**: A region takes the base text unless exactly one distinct
//!    changed span exists for it. Two different changed spans are a conflict.
//!
//! ## Example
//!
//! ```rust
//! use merge_engine::{diff_texts, has_conflict, merge, Language};
//!
//! let diff = diff_texts(
//!     "int a = 1; int b = 2;",
//!     &["int a = 10; int b = 2;", "int a = 1; int b = 20;"],
//!     Language::Plain,
//! );
//! assert!(!has_conflict(&diff));
//! assert_eq!(merge(&diff).unwrap(), "int a = 10; int b = 20;");
//! ```

pub mod lexer;
pub mod nway;
pub mod parser;
pub mod types;

// Re-export primary public API
pub use nway::{MergeError, diff, diff_texts, has_conflict, merge, prefer_latest, rebase};
pub use parser::{TokenizeError, tokenize};
pub use types::{Language, NwayDiff, Segment, Token, TokenKind, UnknownLanguage, render};
