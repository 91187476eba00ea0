//! Tree-sitter backed tokenization.
//!
//! The concrete syntax tree is flattened into its leaves. Bytes that fall
//! between two leaves (whitespace, and anything the grammar keeps out of the
//! tree) become their own tokens, so the token stream always renders back to
//! the exact source text.

use crate::lexer;
use crate::types::{Language, Token, TokenKind, render};

#[derive(Debug, thiserror::Error)]
pub enum TokenizeError {
    #[error("no tree-sitter grammar for {0}")]
    NoGrammar(Language),
    #[error("language error: {0}")]
    LanguageError(String),
    #[error("parse failed")]
    ParseFailed,
    #[error("leaf tokens do not cover the source")]
    Incomplete,
}

/// Tokenize source text for the given language.
///
/// Grammar-backed languages fall back to the plain lexer if parsing fails for
/// any reason.
pub fn tokenize(source: &str, lang: Language) -> Vec<Token> {
    if lang == Language::Plain {
        return lexer::lex(source);
    }
    match parse_tokens(source, lang) {
        Ok(tokens) => tokens,
        Err(_) => lexer::lex(source),
    }
}

/// Tokenize through tree-sitter only.
pub fn parse_tokens(source: &str, lang: Language) -> Result<Vec<Token>, TokenizeError> {
    let ts_lang = get_tree_sitter_language(lang)?;
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&ts_lang)
        .map_err(|e| TokenizeError::LanguageError(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or(TokenizeError::ParseFailed)?;

    let mut tokens = Vec::new();
    let mut offset = 0;
    collect_leaves(&tree.root_node(), source, &mut offset, &mut tokens);
    if offset < source.len() {
        push_gap(&source[offset..], &mut tokens);
    }

    if render(&tokens) != source {
        return Err(TokenizeError::Incomplete);
    }
    Ok(tokens)
}

fn collect_leaves(
    node: &tree_sitter::Node,
    source: &str,
    offset: &mut usize,
    out: &mut Vec<Token>,
) {
    if node.child_count() == 0 {
        let (start, end) = (node.start_byte(), node.end_byte());
        // Zero-width (MISSING) leaves and leaves overlapping emitted text
        // carry nothing new.
        if end <= start || start < *offset {
            return;
        }
        let (Some(gap), Some(text)) = (source.get(*offset..start), source.get(start..end)) else {
            return;
        };
        push_gap(gap, out);
        out.push(Token::new(classify(node, text), text));
        *offset = end;
        return;
    }

    for child in (0..node.child_count()).filter_map(|i| node.child(i)) {
        collect_leaves(&child, source, offset, out);
    }
}

fn push_gap(gap: &str, out: &mut Vec<Token>) {
    if gap.is_empty() {
        return;
    }
    let kind = if gap.chars().all(char::is_whitespace) {
        TokenKind::Whitespace
    } else {
        TokenKind::Trivia
    };
    out.push(Token::new(kind, gap));
}

fn classify(node: &tree_sitter::Node, text: &str) -> TokenKind {
    let kind = node.kind();
    if kind.contains("comment") {
        TokenKind::Comment
    } else if kind.contains("string") || kind.contains("char") {
        TokenKind::StringLiteral
    } else if kind.contains("identifier") {
        TokenKind::Identifier
    } else if kind.contains("literal") || kind.contains("integer") || kind.contains("float") {
        TokenKind::Number
    } else if !node.is_named() && text.chars().all(|c| c.is_alphabetic() || c == '_') {
        TokenKind::Keyword
    } else if !node.is_named() {
        TokenKind::Punctuation
    } else {
        TokenKind::Identifier
    }
}

/// Get the tree-sitter Language object for a given language.
fn get_tree_sitter_language(lang: Language) -> Result<tree_sitter::Language, TokenizeError> {
    let lang_ref = match lang {
        Language::Java => tree_sitter_java::LANGUAGE,
        Language::Rust => tree_sitter_rust::LANGUAGE,
        Language::JavaScript => tree_sitter_javascript::LANGUAGE,
        Language::Python => tree_sitter_python::LANGUAGE,
        Language::Plain => return Err(TokenizeError::NoGrammar(lang)),
    };
    Ok(lang_ref.into())
}
