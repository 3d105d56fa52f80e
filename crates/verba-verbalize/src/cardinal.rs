//! Verbalizer grammar for German cardinals.
//!
//! e.g. `cardinal { integer: "zwei" }` -> "zwei"

use std::collections::BTreeSet;

use verba_fst::{ApplyError, Rule, Transducer};

use crate::graph::{delete_tokens, not_quote, GrammarKind, Verbalizer};
use crate::VerbalizeError;

/// The one spoken-number irregularity handled in non-deterministic mode:
/// "hundert " may be read with an "und" contraction.
pub const HUNDERT_CONTRACTION: (&str, &str) = ("hundert ", "hundert und ");

/// Finite-state verbalizer for cardinals.
///
/// With `deterministic` set, each token string has a single transduction.
/// Without it, multiple transductions are generated (used for audio-based
/// normalization, where every valid reading must be enumerable).
pub struct CardinalVerbalizer {
    deterministic: bool,
    /// Transducer over the bare field string, `[negative: "true" ]integer: "..."`.
    numbers: Transducer,
    /// Transducer over the full `cardinal { ... }` token form.
    fst: Transducer,
}

impl CardinalVerbalizer {
    pub fn new(deterministic: bool) -> Self {
        let optional_sign = Rule::optional(Rule::cross("negative: \"true\" ", "minus "));

        let integer_body = if deterministic {
            Rule::at_least_one(not_quote())
        } else {
            Rule::seq(vec![
                Rule::closure(not_quote()),
                Rule::optional(Rule::cross(HUNDERT_CONTRACTION.0, HUNDERT_CONTRACTION.1)),
                Rule::closure(not_quote()),
            ])
        };

        let integer = Rule::seq(vec![
            Rule::delete(" \""),
            integer_body,
            Rule::delete("\""),
        ]);
        let integer = Rule::seq(vec![Rule::delete("integer:"), integer]);

        let numbers = Rule::seq(vec![optional_sign, integer]);
        let fst = delete_tokens("cardinal", numbers.clone()).optimize();
        let numbers = numbers.optimize();

        tracing::debug!(deterministic, "built cardinal verbalizer grammar");
        Self { deterministic, numbers, fst }
    }

    /// Deterministic surface form for a token string.
    ///
    /// Accepts both the wrapped `cardinal { ... }` form produced upstream
    /// and the bare field string. Malformed token strings surface as
    /// [`VerbalizeError::NoMatch`].
    pub fn verbalize(&self, tokens: &str) -> Result<String, VerbalizeError> {
        let result = match self.fst.rewrite(tokens) {
            Err(ApplyError::NoMatch) => self.numbers.rewrite(tokens),
            other => other,
        };
        result.map_err(|e| match e {
            ApplyError::NoMatch => VerbalizeError::NoMatch { grammar: self.name() },
            ApplyError::Ambiguous(count) => {
                VerbalizeError::Ambiguous { grammar: self.name(), count }
            }
        })
    }

    /// Every valid surface form for a token string. Empty when the input
    /// is not accepted.
    pub fn verbalize_all(&self, tokens: &str) -> BTreeSet<String> {
        let outputs = self.fst.apply(tokens);
        if outputs.is_empty() {
            self.numbers.apply(tokens)
        } else {
            outputs
        }
    }
}

impl Verbalizer for CardinalVerbalizer {
    fn name(&self) -> &'static str {
        "cardinal"
    }

    fn kind(&self) -> GrammarKind {
        GrammarKind::Verbalize
    }

    fn deterministic(&self) -> bool {
        self.deterministic
    }

    fn fst(&self) -> &Transducer {
        &self.fst
    }
}
