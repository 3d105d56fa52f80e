//! verba-verbalize: token-string to spoken-form verbalization.
//!
//! This crate turns tagged semantic tokens produced by an upstream
//! classifier (e.g. `cardinal { integer: "zwei" negative: "true" }`) into
//! spoken surface text ("minus zwei"). Grammars are built once as
//! optimized transducers from the verba-fst rule algebra.
//!
//! # Example
//!
//! ```
//! use verba_verbalize::{verbalize, VerbalizeRequest, Verdict};
//!
//! let result = verbalize(VerbalizeRequest {
//!     tokens: "negative: \"true\" integer: \"zwei\"".to_string(),
//!     deterministic: true,
//! });
//! assert_eq!(result.verdict, Verdict::Match);
//! assert_eq!(result.output.as_deref(), Some("minus zwei"));
//! ```

pub mod cardinal;
pub mod graph;
pub mod normalizer;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use verba_fst::Rule;

pub use cardinal::CardinalVerbalizer;
pub use graph::{GrammarKind, Verbalizer};

/// Request to verbalize a token string
#[derive(Debug, Clone, Deserialize)]
pub struct VerbalizeRequest {
    /// The token string to verbalize
    pub tokens: String,
    /// Single canonical output vs. enumerable spoken variants
    #[serde(default = "default_deterministic")]
    pub deterministic: bool,
}

fn default_deterministic() -> bool {
    true
}

/// The verdict of a verbalization attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The token string was accepted and rewritten
    Match,
    /// The token string is not in the grammar's domain
    Reject,
}

/// Result of a verbalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerbalizeResult {
    /// The verdict
    pub verdict: Verdict,
    /// Canonical surface form (if Match)
    pub output: Option<String>,
    /// All valid surface forms (single entry in deterministic mode)
    pub variants: Vec<String>,
    /// Why the input was rejected (if Reject)
    pub reject_reason: Option<String>,
}

/// Errors surfaced by the verbalizer grammars
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerbalizeError {
    /// Recoverable: the caller should treat the token string as
    /// "normalization not applicable".
    #[error("token string not accepted by {grammar} grammar")]
    NoMatch { grammar: &'static str },
    #[error("{grammar} grammar produced {count} outputs in deterministic mode")]
    Ambiguous { grammar: &'static str, count: usize },
}

/// Verbalize a token string with the cardinal grammar.
///
/// Malformed input yields `Verdict::Reject`, never a panic: rejection is
/// the grammar's way of saying the string is not its to normalize.
pub fn verbalize(request: VerbalizeRequest) -> VerbalizeResult {
    let grammar = CardinalVerbalizer::new(request.deterministic);
    let tokens = normalizer::normalize(&request.tokens);

    if request.deterministic {
        match grammar.verbalize(&tokens) {
            Ok(output) => VerbalizeResult {
                verdict: Verdict::Match,
                variants: vec![output.clone()],
                output: Some(output),
                reject_reason: None,
            },
            Err(e) => reject(e.to_string()),
        }
    } else {
        let variants: Vec<String> = grammar.verbalize_all(&tokens).into_iter().collect();
        match variants.first() {
            Some(first) => VerbalizeResult {
                verdict: Verdict::Match,
                output: Some(first.clone()),
                variants,
                reject_reason: None,
            },
            None => reject(format!(
                "token string not accepted by {} grammar",
                grammar.name()
            )),
        }
    }
}

fn reject(reason: String) -> VerbalizeResult {
    VerbalizeResult {
        verdict: Verdict::Reject,
        output: None,
        variants: Vec::new(),
        reject_reason: Some(reason),
    }
}

static ENGINE_PROBE: Lazy<bool> = Lazy::new(|| {
    let probe = Rule::seq(vec![Rule::delete("in"), Rule::insert("out")]).optimize();
    probe.rewrite("in").map(|out| out == "out").unwrap_or(false)
});

/// One-time capability check for the transducer engine, queried by
/// callers before constructing grammars.
pub fn engine_available() -> bool {
    *ENGINE_PROBE
}
