//! N-way token merge.
//!
//! Generalizes diff3 from two sides to any number of variants of one base.
//! Each variant is diffed against the base with the `similar` crate (Myers
//! LCS over tokens). A base token that every variant keeps is an anchor; the
//! runs between consecutive anchors are the unstable regions. Within a
//! region a variant either leaves the base untouched or replaces it with its
//! own span, and the region conflicts when two variants replace it with
//! different spans.
//!
//! References:
//! - Khanna, Kuber, Pierce (2007), "A Formal Investigation of Diff3"

use similar::{Algorithm, DiffOp, capture_diff_slices};

use crate::parser::tokenize;
use crate::types::{Language, NwayDiff, Segment, Token, push_tokens};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("variants disagree in segment {segment}")]
    Conflict { segment: usize },
}

/// Align `base` against every variant.
pub fn diff(base: &[Token], variants: &[Vec<Token>]) -> NwayDiff {
    let matches: Vec<Vec<Option<usize>>> = variants
        .iter()
        .map(|variant| match_positions(base, variant))
        .collect();

    let mut segments: Vec<Segment> = Vec::new();
    let mut base_from = 0;
    let mut variant_from = vec![0; variants.len()];

    for j in 0..=base.len() {
        // The end of the sequences acts as a final anchor.
        let anchor: Option<Vec<usize>> = if j == base.len() {
            Some(variants.iter().map(Vec::len).collect())
        } else {
            matches.iter().map(|m| m[j]).collect()
        };
        let Some(positions) = anchor else {
            continue;
        };

        let region = Segment {
            base: base[base_from..j].to_vec(),
            variants: variants
                .iter()
                .zip(variant_from.iter().zip(&positions))
                .map(|(v, (&from, &to))| v[from..to].to_vec())
                .collect(),
        };
        if !region.base.is_empty() || region.variants.iter().any(|v| !v.is_empty()) {
            push_segment(&mut segments, region);
        }

        if j < base.len() {
            let kept = std::slice::from_ref(&base[j]);
            push_segment(
                &mut segments,
                Segment {
                    base: kept.to_vec(),
                    variants: vec![kept.to_vec(); variants.len()],
                },
            );
        }

        base_from = j + 1;
        variant_from = positions.iter().map(|p| p + 1).collect();
    }

    NwayDiff {
        segments,
        variant_count: variants.len(),
    }
}

/// Tokenize and align in one step.
pub fn diff_texts<S: AsRef<str>>(base: &str, variants: &[S], lang: Language) -> NwayDiff {
    let base = tokenize(base, lang);
    let variants: Vec<Vec<Token>> = variants
        .iter()
        .map(|v| tokenize(v.as_ref(), lang))
        .collect();
    diff(&base, &variants)
}

pub fn has_conflict(diff: &NwayDiff) -> bool {
    diff.iter().any(Segment::is_conflict)
}

/// Merge a conflict-free diff: every region takes the single changed span,
/// or the base when nobody changed it.
pub fn merge(diff: &NwayDiff) -> Result<String, MergeError> {
    let mut merged = String::new();
    for (index, segment) in diff.iter().enumerate() {
        match segment.changes().as_slice() {
            [] => push_tokens(&mut merged, &segment.base),
            [change] => push_tokens(&mut merged, change),
            _ => return Err(MergeError::Conflict { segment: index }),
        }
    }
    Ok(merged)
}

/// Replay the last variant's own edit on top of the base.
///
/// Meant for a 3-way diff `base -> first -> last` where `last` was derived
/// from `first`: regions where the two variants agree come from the base,
/// every other region comes from `last`.
pub fn rebase(diff: &NwayDiff) -> String {
    let mut out = String::new();
    for segment in diff {
        match (segment.variants.first(), segment.variants.last()) {
            (Some(first), Some(last)) if first != last => push_tokens(&mut out, last),
            _ => push_tokens(&mut out, &segment.base),
        }
    }
    out
}

/// Take the last variant's span wherever it differs from the base.
pub fn prefer_latest(diff: &NwayDiff) -> String {
    let mut out = String::new();
    for segment in diff {
        match segment.variants.last() {
            Some(last) if *last != segment.base => push_tokens(&mut out, last),
            _ => push_tokens(&mut out, &segment.base),
        }
    }
    out
}

/// For each base token, the index of the variant token it is matched with.
fn match_positions(base: &[Token], variant: &[Token]) -> Vec<Option<usize>> {
    let mut positions = vec![None; base.len()];
    for op in capture_diff_slices(Algorithm::Myers, base, variant) {
        if let DiffOp::Equal {
            old_index,
            new_index,
            len,
        } = op
        {
            for k in 0..len {
                positions[old_index + k] = Some(new_index + k);
            }
        }
    }
    positions
}

/// Append a segment, coalescing adjacent stable segments.
fn push_segment(segments: &mut Vec<Segment>, segment: Segment) {
    if segment.is_stable() {
        if let Some(last) = segments.last_mut().filter(|s| s.is_stable()) {
            last.base.extend(segment.base);
            for (existing, new) in last.variants.iter_mut().zip(segment.variants) {
                existing.extend(new);
            }
            return;
        }
    }
    segments.push(segment);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::render;

    fn plain(base: &str, variants: &[&str]) -> NwayDiff {
        diff_texts(base, variants, Language::Plain)
    }

    #[test]
    fn test_disjoint_edits_merge() {
        let d = plain(
            "int a = 1; int b = 2;",
            &["int a = 10; int b = 2;", "int a = 1; int b = 20;"],
        );
        assert!(!has_conflict(&d));
        assert_eq!(merge(&d).unwrap(), "int a = 10; int b = 20;");
    }

    #[test]
    fn test_same_region_conflicts() {
        let d = plain("int a = 1;", &["int a = 10;", "int a = 11;"]);
        assert!(has_conflict(&d));
        assert!(matches!(merge(&d), Err(MergeError::Conflict { .. })));
    }

    #[test]
    fn test_identical_changes_merge() {
        let d = plain("x = 1;", &["x = 2;", "x = 2;"]);
        assert!(!has_conflict(&d));
        assert_eq!(merge(&d).unwrap(), "x = 2;");
    }

    #[test]
    fn test_competing_insertions_conflict() {
        let d = plain("f();", &["f();g();", "f();h();"]);
        assert!(has_conflict(&d));
    }

    #[test]
    fn test_deletion_and_insertion_merge() {
        let d = plain("a; b; c;", &["a; c;", "a; b; c; d;"]);
        assert!(!has_conflict(&d));
        assert_eq!(merge(&d).unwrap(), "a; c; d;");
    }

    #[test]
    fn test_three_variants() {
        let d = plain("p q r", &["P q r", "p Q r", "p q R"]);
        assert_eq!(d.variant_count, 3);
        assert_eq!(merge(&d).unwrap(), "P Q R");
    }

    #[test]
    fn test_no_variants_is_base() {
        let d = plain("unchanged", &[] as &[&str]);
        assert!(!has_conflict(&d));
        assert_eq!(merge(&d).unwrap(), "unchanged");
    }

    #[test]
    fn test_segments_cover_base() {
        let base = tokenize("a + b * c", Language::Plain);
        let v = vec![tokenize("a - b * c", Language::Plain)];
        let d = diff(&base, &v);
        let rebuilt: Vec<Token> = d.iter().flat_map(|s| s.base.clone()).collect();
        assert_eq!(render(&rebuilt), "a + b * c");
        let variant: Vec<Token> = d.iter().flat_map(|s| s.variants[0].clone()).collect();
        assert_eq!(render(&variant), "a - b * c");
    }

    #[test]
    fn test_rebase_moves_edit_onto_base() {
        // "(a+b)" is what wrapping would have produced on the base directly.
        let d = plain("a+b", &["a + b", "(a + b)"]);
        assert_eq!(rebase(&d), "(a+b)");
    }

    #[test]
    fn test_rebase_of_dependent_edit() {
        let d = plain("x", &["x1", "x12"]);
        assert_eq!(rebase(&d), "x12");
    }

    #[test]
    fn test_prefer_latest() {
        let d = plain("a = 1;", &["a = 2;", "a = 3;"]);
        assert!(has_conflict(&d));
        assert_eq!(prefer_latest(&d), "a = 3;");
    }
}
