//! PHPDoc handling: docblock lookup and virtual member tags.
//!
//! Classes can declare magic members that have no code declaration:
//!
//!   - `@property Type $name` / `@property-read` / `@property-write`
//!   - `@method ReturnType methodName(…)`
//!   - `@method static ReturnType methodName(…)`
//!
//! This module finds the `/** … */` comment immediately preceding a
//! declaration in the parse trivia and extracts those tags so the symbol
//! builder can emit virtual member symbols for them.

use mago_span::HasSpan;
use mago_syntax::ast::{Trivia, TriviaKind};

use crate::types::DocTag;

/// Find the docblock comment directly above a node, if any.
///
/// Scans backwards through the trivia that precede the node's start
/// offset. Whitespace and ordinary comments between the docblock and the
/// node are allowed; any other source text in the gap breaks the
/// association. Returns the docblock text together with its absolute
/// `(start, end)` byte offsets.
pub(crate) fn docblock_for_node<'a>(
    trivia: &'a [Trivia<'a>],
    content: &str,
    node: &impl HasSpan,
) -> Option<(&'a str, (u32, u32))> {
    let node_start = node.span().start.offset;
    let candidate_idx = trivia.partition_point(|t| t.span.start.offset < node_start);
    if candidate_idx == 0 {
        return None;
    }

    let content_bytes = content.as_bytes();
    let mut covered_from = node_start;

    for i in (0..candidate_idx).rev() {
        let t = &trivia[i];
        let t_end = t.span.end.offset;

        let gap = content_bytes
            .get(t_end as usize..covered_from as usize)
            .unwrap_or(&[]);
        if !gap.iter().all(u8::is_ascii_whitespace) {
            return None;
        }

        match t.kind {
            TriviaKind::DocBlockComment => {
                return Some((t.value, (t.span.start.offset, t.span.end.offset)));
            }
            TriviaKind::WhiteSpace
            | TriviaKind::SingleLineComment
            | TriviaKind::MultiLineComment
            | TriviaKind::HashComment => {
                covered_from = t.span.start.offset;
            }
        }
    }

    None
}

/// Extract `@property` and `@method` tags from a docblock.
///
/// Returned in source order. Tags without a derivable name are skipped.
pub fn extract_virtual_member_tags(docblock: &str) -> Vec<DocTag> {
    let inner = docblock
        .trim()
        .strip_prefix("/**")
        .unwrap_or(docblock)
        .strip_suffix("*/")
        .unwrap_or(docblock);

    let mut tags = Vec::new();

    for line in inner.lines() {
        let trimmed = line.trim().trim_start_matches('*').trim();

        if let Some(rest) = strip_property_tag(trimmed) {
            if let Some(name) = property_name(rest) {
                tags.push(DocTag::Property { name });
            }
        } else if let Some(rest) = trimmed.strip_prefix("@method") {
            if let Some(name) = method_name(rest) {
                tags.push(DocTag::Method { name });
            }
        }
    }

    tags
}

/// Strip one of the `@property` tag spellings, longest first so that
/// `@property-read` is not mistaken for `@property` followed by `-read`.
fn strip_property_tag(line: &str) -> Option<&str> {
    line.strip_prefix("@property-read")
        .or_else(|| line.strip_prefix("@property-write"))
        .or_else(|| line.strip_prefix("@property"))
}

/// `@property [Type] $name` — the name is the first `$`-prefixed token.
fn property_name(rest: &str) -> Option<String> {
    let name = rest
        .split_whitespace()
        .find(|token| token.starts_with('$'))?
        .trim_start_matches('$')
        .trim_end_matches(|c: char| !c.is_alphanumeric() && c != '_');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// `@method [static] [ReturnType] name(…)` — the name is whatever
/// precedes the first `(` in the signature token.
fn method_name(rest: &str) -> Option<String> {
    let signature = rest.trim_start();
    let token = signature
        .split_whitespace()
        .find(|token| token.contains('('))?;
    let name = token.split('(').next().unwrap_or_default();
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some(name.to_string())
}
