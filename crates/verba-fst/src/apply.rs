//! Backtracking applicator over an optimized rule tree.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::rule::{Rule, Transducer};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    /// The input is not in the domain of the transducer. Recoverable:
    /// callers treat this as "normalization not applicable".
    #[error("input not accepted by transducer")]
    NoMatch,
    /// Deterministic rewrite found more than one output path.
    #[error("deterministic rewrite produced {0} distinct outputs")]
    Ambiguous(usize),
}

/// Partial application state: input position reached and output emitted
/// so far. Kept in a set so equivalent paths collapse.
type State = (usize, String);

impl Transducer {
    /// Every output reachable by a path that consumes the whole input.
    pub fn apply(&self, input: &str) -> BTreeSet<String> {
        let chars: Vec<char> = input.chars().collect();
        eval(&self.root, &chars, 0)
            .into_iter()
            .filter(|(pos, _)| *pos == chars.len())
            .map(|(_, out)| out)
            .collect()
    }

    /// Deterministic application: exactly one full-consumption output.
    pub fn rewrite(&self, input: &str) -> Result<String, ApplyError> {
        let mut outputs = self.apply(input).into_iter();
        match (outputs.next(), outputs.len()) {
            (None, _) => Err(ApplyError::NoMatch),
            (Some(out), 0) => Ok(out),
            (Some(_), rest) => Err(ApplyError::Ambiguous(rest + 1)),
        }
    }

    /// Whether the input is in the domain of the transducer.
    pub fn accepts(&self, input: &str) -> bool {
        !self.apply(input).is_empty()
    }
}

fn eval(rule: &Rule, input: &[char], pos: usize) -> BTreeSet<State> {
    let mut states = BTreeSet::new();
    match rule {
        Rule::Delete(literal) => {
            if let Some(next) = match_literal(input, pos, literal) {
                states.insert((next, String::new()));
            }
        }
        Rule::Insert(literal) => {
            states.insert((pos, literal.clone()));
        }
        Rule::Cross(from, to) => {
            if let Some(next) = match_literal(input, pos, from) {
                states.insert((next, to.clone()));
            }
        }
        Rule::Copy(class) => {
            if let Some(&c) = input.get(pos) {
                if class.matches(c) {
                    states.insert((pos + 1, c.to_string()));
                }
            }
        }
        Rule::Seq(rules) => {
            let mut current: BTreeSet<State> = BTreeSet::new();
            current.insert((pos, String::new()));
            for r in rules {
                let mut next = BTreeSet::new();
                for (p, emitted) in &current {
                    for (p2, emitted2) in eval(r, input, *p) {
                        next.insert((p2, format!("{}{}", emitted, emitted2)));
                    }
                }
                current = next;
                if current.is_empty() {
                    break;
                }
            }
            states = current;
        }
        Rule::Union(rules) => {
            for r in rules {
                states.extend(eval(r, input, pos));
            }
        }
        Rule::Closure { rule, min, max } => {
            let mut frontier: BTreeSet<State> = BTreeSet::new();
            frontier.insert((pos, String::new()));
            if *min == 0 {
                states.insert((pos, String::new()));
            }
            let mut count = 0;
            loop {
                if let Some(m) = max {
                    if count >= *m {
                        break;
                    }
                }
                let mut next = BTreeSet::new();
                for (p, emitted) in &frontier {
                    for (p2, emitted2) in eval(rule, input, *p) {
                        // Unbounded repetition must consume input, or the
                        // expansion would never terminate.
                        if max.is_none() && p2 == *p {
                            continue;
                        }
                        next.insert((p2, format!("{}{}", emitted, emitted2)));
                    }
                }
                if next.is_empty() {
                    break;
                }
                count += 1;
                if count >= *min {
                    states.extend(next.iter().cloned());
                }
                frontier = next;
            }
        }
    }
    states
}

fn match_literal(input: &[char], pos: usize, literal: &str) -> Option<usize> {
    let mut cursor = pos;
    for expected in literal.chars() {
        if input.get(cursor) != Some(&expected) {
            return None;
        }
        cursor += 1;
    }
    Some(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{CharClass, Rule};

    fn copy_run() -> Rule {
        Rule::at_least_one(Rule::copy(CharClass::NotQuote))
    }

    #[test]
    fn test_delete_and_insert() {
        let t = Rule::seq(vec![Rule::delete("tag:"), Rule::insert("out")]).optimize();
        assert_eq!(t.rewrite("tag:"), Ok("out".to_string()));
        assert_eq!(t.rewrite("tag"), Err(ApplyError::NoMatch));
    }

    #[test]
    fn test_cross_substitutes_literal() {
        let t = Rule::cross("negative: \"true\" ", "minus ").optimize();
        assert_eq!(t.rewrite("negative: \"true\" "), Ok("minus ".to_string()));
        assert!(!t.accepts("negative: \"false\" "));
    }

    #[test]
    fn test_copy_run_is_identity() {
        let t = copy_run().optimize();
        assert_eq!(t.rewrite("zwei"), Ok("zwei".to_string()));
        assert_eq!(t.rewrite("fünf"), Ok("fünf".to_string()));
        assert_eq!(t.rewrite(""), Err(ApplyError::NoMatch));
        assert!(!t.accepts("zw\"ei"));
    }

    #[test]
    fn test_optional_takes_both_branches() {
        let t = Rule::seq(vec![Rule::optional(Rule::cross("a", "x")), copy_run()]).optimize();
        // "ab" can be read as cross(a)+copy(b) or copy(a)+copy(b).
        let outputs = t.apply("ab");
        assert!(outputs.contains("xb"));
        assert!(outputs.contains("ab"));
        assert_eq!(outputs.len(), 2);
    }

    #[test]
    fn test_union_enumerates_alternatives() {
        let t = Rule::union(vec![Rule::cross("1", "eins"), Rule::cross("1", "ein")]).optimize();
        let outputs = t.apply("1");
        assert_eq!(outputs.len(), 2);
        assert!(outputs.contains("eins"));
        assert!(outputs.contains("ein"));
    }

    #[test]
    fn test_equivalent_paths_collapse() {
        // Two zero-or-more copy runs back to back: many split points, one output.
        let t = Rule::seq(vec![
            Rule::closure(Rule::copy(CharClass::NotQuote)),
            Rule::closure(Rule::copy(CharClass::NotQuote)),
        ])
        .optimize();
        assert_eq!(t.rewrite("abc"), Ok("abc".to_string()));
    }

    #[test]
    fn test_unbounded_closure_over_insert_terminates() {
        let t = Rule::closure(Rule::insert("loop")).optimize();
        // Progress guard: the only surviving path is the zero-repetition one.
        assert_eq!(t.rewrite(""), Ok(String::new()));
    }

    #[test]
    fn test_rewrite_reports_ambiguity() {
        let t = Rule::union(vec![Rule::cross("1", "eins"), Rule::cross("1", "ein")]).optimize();
        assert_eq!(t.rewrite("1"), Err(ApplyError::Ambiguous(2)));
    }

    #[test]
    fn test_trailing_input_rejected() {
        let t = Rule::delete("end").optimize();
        assert!(!t.accepts("end."));
    }

    #[test]
    fn test_closure_minimum_enforced() {
        let t = Rule::Closure {
            rule: Box::new(Rule::copy(CharClass::Space)),
            min: 2,
            max: None,
        }
        .optimize();
        assert!(!t.accepts(" "));
        assert!(t.accepts("  "));
        assert!(t.accepts("   "));
    }
}
