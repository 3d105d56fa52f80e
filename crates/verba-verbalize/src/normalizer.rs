//! Token-string normalization.
//!
//! Classifier output occasionally carries irregular spacing between
//! fields. Runs of structural whitespace (outside quoted values) are
//! collapsed to a single space so the grammars see their canonical
//! input; whitespace inside quoted values is untouched.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MULTI_SPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Normalize the structural whitespace of a token string.
pub fn normalize(tokens: &str) -> String {
    let mut out = String::with_capacity(tokens.len());
    let mut segment = String::new();
    let mut in_quotes = false;
    for c in tokens.chars() {
        if c == '"' {
            flush_segment(&mut out, &segment, in_quotes);
            segment.clear();
            out.push('"');
            in_quotes = !in_quotes;
        } else {
            segment.push(c);
        }
    }
    flush_segment(&mut out, &segment, in_quotes);
    if !in_quotes {
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
    }
    // Leading structural whitespace never survives.
    out.trim_start().to_string()
}

fn flush_segment(out: &mut String, segment: &str, in_quotes: bool) {
    if in_quotes {
        out.push_str(segment);
    } else {
        out.push_str(&MULTI_SPACE.replace_all(segment, " "));
    }
}
