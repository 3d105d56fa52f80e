//! Rule tree and the build-time `optimize` pass.

/// Single-character class on the input side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Any character except `"`.
    NotQuote,
    /// A single ASCII space.
    Space,
}

impl CharClass {
    pub fn matches(&self, c: char) -> bool {
        match self {
            CharClass::NotQuote => c != '"',
            CharClass::Space => c == ' ',
        }
    }
}

/// A rewrite rule over strings.
///
/// Rules are plain data; building one never fails. Only application can
/// reject an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Consume a literal, emit nothing.
    Delete(String),
    /// Consume nothing, emit a literal.
    Insert(String),
    /// Consume one literal, emit another.
    Cross(String, String),
    /// Consume one character of the class and copy it to the output.
    Copy(CharClass),
    /// Concatenation.
    Seq(Vec<Rule>),
    /// Alternation.
    Union(Vec<Rule>),
    /// Repetition between `min` and `max` times (`None` = unbounded).
    Closure {
        rule: Box<Rule>,
        min: usize,
        max: Option<usize>,
    },
}

impl Rule {
    pub fn delete(literal: &str) -> Rule {
        Rule::Delete(literal.to_string())
    }

    pub fn insert(literal: &str) -> Rule {
        Rule::Insert(literal.to_string())
    }

    pub fn cross(from: &str, to: &str) -> Rule {
        Rule::Cross(from.to_string(), to.to_string())
    }

    pub fn copy(class: CharClass) -> Rule {
        Rule::Copy(class)
    }

    pub fn seq(rules: Vec<Rule>) -> Rule {
        Rule::Seq(rules)
    }

    pub fn union(rules: Vec<Rule>) -> Rule {
        Rule::Union(rules)
    }

    /// Zero-or-one repetition.
    pub fn optional(rule: Rule) -> Rule {
        Rule::Closure { rule: Box::new(rule), min: 0, max: Some(1) }
    }

    /// Zero-or-more repetition.
    pub fn closure(rule: Rule) -> Rule {
        Rule::Closure { rule: Box::new(rule), min: 0, max: None }
    }

    /// One-or-more repetition.
    pub fn at_least_one(rule: Rule) -> Rule {
        Rule::Closure { rule: Box::new(rule), min: 1, max: None }
    }

    /// Compile the rule tree into an immutable transducer.
    ///
    /// Flattens nested sequences and unions and merges adjacent literal
    /// deletions/insertions. Pure build step; call once at grammar-build
    /// time, never per input.
    pub fn optimize(self) -> Transducer {
        Transducer { root: normalize(self) }
    }
}

fn normalize(rule: Rule) -> Rule {
    match rule {
        Rule::Seq(rules) => {
            let mut flat = Vec::new();
            for r in rules {
                match normalize(r) {
                    Rule::Seq(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            let merged = merge_adjacent(flat);
            match merged.len() {
                1 => merged.into_iter().next().unwrap(),
                _ => Rule::Seq(merged),
            }
        }
        Rule::Union(rules) => {
            let mut flat = Vec::new();
            for r in rules {
                match normalize(r) {
                    Rule::Union(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            match flat.len() {
                1 => flat.into_iter().next().unwrap(),
                _ => Rule::Union(flat),
            }
        }
        Rule::Closure { rule, min, max } => Rule::Closure {
            rule: Box::new(normalize(*rule)),
            min,
            max,
        },
        leaf => leaf,
    }
}

fn merge_adjacent(rules: Vec<Rule>) -> Vec<Rule> {
    let mut merged: Vec<Rule> = Vec::with_capacity(rules.len());
    for rule in rules {
        match (merged.last_mut(), rule) {
            (Some(Rule::Delete(a)), Rule::Delete(b)) => a.push_str(&b),
            (Some(Rule::Insert(a)), Rule::Insert(b)) => a.push_str(&b),
            (_, other) => merged.push(other),
        }
    }
    merged
}

/// An optimized, immutable transducer.
///
/// Shareable across threads and applicable concurrently; application
/// never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transducer {
    pub(crate) root: Rule,
}
