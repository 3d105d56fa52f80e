//! Shared grammar utilities for verbalizer graphs.

use verba_fst::{CharClass, Rule, Transducer};

/// Which side of the normalization pipeline a grammar belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarKind {
    /// Tagging stage that produces token strings. Lives upstream; this
    /// workspace only consumes its output.
    Classify,
    Verbalize,
}

/// A verbalizer grammar: a named, mode-aware transducer over token strings.
pub trait Verbalizer: Send + Sync {
    /// Token name this grammar handles (e.g. "cardinal").
    fn name(&self) -> &'static str;

    fn kind(&self) -> GrammarKind;

    /// If true the grammar yields a single transduction per input; if
    /// false multiple variants may be generated (audio-based
    /// normalization).
    fn deterministic(&self) -> bool;

    /// The optimized transducer over the full `<name> { ... }` form.
    fn fst(&self) -> &Transducer;
}

/// Copy one character that is anything but a double quote.
pub fn not_quote() -> Rule {
    Rule::copy(CharClass::NotQuote)
}

/// Delete an optional run of spaces.
pub fn delete_space() -> Rule {
    Rule::closure(Rule::delete(" "))
}

/// Wrap an inner rule so the token syntax `<name> { <inner> }` is
/// consumed and deleted, leaving only the inner rewrite on the output.
pub fn delete_tokens(name: &str, inner: Rule) -> Rule {
    Rule::seq(vec![
        Rule::delete(name),
        delete_space(),
        Rule::delete("{"),
        delete_space(),
        inner,
        delete_space(),
        Rule::delete("}"),
    ])
}
