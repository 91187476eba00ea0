//! Plain lexer used when no tree-sitter grammar applies.
//!
//! Splits text into identifiers, numbers, quoted literals, C-style comments,
//! whitespace runs and single punctuation characters. Every byte of the input
//! ends up in exactly one token, so rendering the tokens reproduces the input.

use crate::types::{Token, TokenKind};

pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = source;

    while let Some(c) = rest.chars().next() {
        let (kind, len) = if c.is_whitespace() {
            (TokenKind::Whitespace, take_while(rest, char::is_whitespace))
        } else if is_ident_start(c) {
            (TokenKind::Identifier, take_while(rest, is_ident_continue))
        } else if c.is_ascii_digit() {
            (
                TokenKind::Number,
                take_while(rest, |c| c.is_ascii_alphanumeric() || c == '.' || c == '_'),
            )
        } else if c == '"' || c == '\'' || c == '`' {
            (TokenKind::StringLiteral, quoted_len(rest, c))
        } else if rest.starts_with("//") {
            (TokenKind::Comment, rest.find('\n').unwrap_or(rest.len()))
        } else if rest.starts_with("/*") {
            let len = rest[2..].find("*/").map(|i| i + 4).unwrap_or(rest.len());
            (TokenKind::Comment, len)
        } else {
            (TokenKind::Punctuation, c.len_utf8())
        };

        tokens.push(Token::new(kind, &rest[..len]));
        rest = &rest[len..];
    }

    tokens
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn take_while(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|&(_, c)| !pred(c))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Byte length of a quoted literal starting at `s[0] == quote`. Unterminated
/// literals stop at the end of the line.
fn quoted_len(s: &str, quote: char) -> usize {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '\n' => return i,
            c if c == quote => return i + c.len_utf8(),
            _ => {}
        }
    }
    s.len()
}
