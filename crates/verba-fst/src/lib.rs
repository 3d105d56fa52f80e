//! verba-fst: rule algebra for string-rewrite transducers.
//!
//! A grammar is built by composing small primitives (delete a literal,
//! cross-substitute a literal, copy a character class, closures over any
//! of those), then optimized once into an immutable [`Transducer`] that
//! can be applied to input strings. Application enumerates every output
//! reachable by a path that consumes the whole input; the deterministic
//! wrapper demands exactly one.

pub mod apply;
pub mod rule;

pub use apply::ApplyError;
pub use rule::{CharClass, Rule, Transducer};
