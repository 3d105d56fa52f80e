//! Integration tests for the cardinal verbalizer.
//!
//! These exercise the full path from classifier token string to spoken
//! surface form, in both deterministic and audio-alignment modes.

use verba_verbalize::{
    engine_available, verbalize, CardinalVerbalizer, GrammarKind, VerbalizeRequest, Verbalizer,
    Verdict,
};

/// Route grammar-build debug logs through the test writer.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

// =============================================================================
// Deterministic Mode Tests
// =============================================================================

#[test]
fn test_integer_identity() {
    init_tracing();
    let result = verbalize(VerbalizeRequest {
        tokens: "integer: \"zwei\"".to_string(),
        deterministic: true,
    });
    assert_eq!(result.verdict, Verdict::Match);
    assert_eq!(result.output.as_deref(), Some("zwei"));
    assert_eq!(result.variants, vec!["zwei".to_string()]);
}

#[test]
fn test_integer_identity_variations() {
    let cases = [
        ("integer: \"null\"", "null"),
        ("integer: \"siebzehn\"", "siebzehn"),
        ("integer: \"dreihundertfünfundvierzig\"", "dreihundertfünfundvierzig"),
        ("integer: \"zwei millionen\"", "zwei millionen"),
    ];
    for (tokens, expected) in cases {
        let result = verbalize(VerbalizeRequest {
            tokens: tokens.to_string(),
            deterministic: true,
        });
        assert_eq!(result.verdict, Verdict::Match, "rejected: {}", tokens);
        assert_eq!(result.output.as_deref(), Some(expected), "wrong output for: {}", tokens);
    }
}

#[test]
fn test_negative_sign() {
    let result = verbalize(VerbalizeRequest {
        tokens: "negative: \"true\" integer: \"zwei\"".to_string(),
        deterministic: true,
    });
    assert_eq!(result.verdict, Verdict::Match);
    assert_eq!(result.output.as_deref(), Some("minus zwei"));
}

#[test]
fn test_wrapped_token_syntax() {
    // Full classifier output, wrapper deleted on the way through.
    let result = verbalize(VerbalizeRequest {
        tokens: "cardinal { negative: \"true\" integer: \"zwei\" }".to_string(),
        deterministic: true,
    });
    assert_eq!(result.verdict, Verdict::Match);
    assert_eq!(result.output.as_deref(), Some("minus zwei"));
}

#[test]
fn test_irregular_spacing_normalized() {
    let result = verbalize(VerbalizeRequest {
        tokens: "negative:  \"true\"   integer: \"zwei\"".to_string(),
        deterministic: true,
    });
    assert_eq!(result.verdict, Verdict::Match);
    assert_eq!(result.output.as_deref(), Some("minus zwei"));
}

// =============================================================================
// Non-deterministic Mode Tests
// =============================================================================

#[test]
fn test_hundert_variants_einhundert() {
    init_tracing();
    let result = verbalize(VerbalizeRequest {
        tokens: "integer: \"einhundert \"".to_string(),
        deterministic: false,
    });
    assert_eq!(result.verdict, Verdict::Match);
    assert_eq!(
        result.variants,
        vec!["einhundert ".to_string(), "einhundert und ".to_string()]
    );
}

#[test]
fn test_hundert_variants_fuenfhundert() {
    let result = verbalize(VerbalizeRequest {
        tokens: "integer: \"fünfhundert \"".to_string(),
        deterministic: false,
    });
    assert_eq!(result.verdict, Verdict::Match);
    assert!(result.variants.contains(&"fünfhundert ".to_string()));
    assert!(result.variants.contains(&"fünfhundert und ".to_string()));
    assert_eq!(result.variants.len(), 2);
}

#[test]
fn test_deterministic_mode_suppresses_variants() {
    let result = verbalize(VerbalizeRequest {
        tokens: "integer: \"einhundert \"".to_string(),
        deterministic: true,
    });
    assert_eq!(result.verdict, Verdict::Match);
    assert_eq!(result.variants, vec!["einhundert ".to_string()]);
}

#[test]
fn test_no_contraction_site_single_variant() {
    // "zwei" has no "hundert " to contract, so both modes agree.
    let result = verbalize(VerbalizeRequest {
        tokens: "integer: \"zwei\"".to_string(),
        deterministic: false,
    });
    assert_eq!(result.verdict, Verdict::Match);
    assert_eq!(result.variants, vec!["zwei".to_string()]);
}

#[test]
fn test_sign_combines_with_variants() {
    let result = verbalize(VerbalizeRequest {
        tokens: "negative: \"true\" integer: \"einhundert \"".to_string(),
        deterministic: false,
    });
    assert_eq!(result.verdict, Verdict::Match);
    assert!(result.variants.contains(&"minus einhundert ".to_string()));
    assert!(result.variants.contains(&"minus einhundert und ".to_string()));
}

// =============================================================================
// Rejection Tests
// =============================================================================

#[test]
fn test_unterminated_quote_rejected() {
    init_tracing();
    let result = verbalize(VerbalizeRequest {
        tokens: "integer: \"zwei".to_string(),
        deterministic: true,
    });
    assert_eq!(result.verdict, Verdict::Reject);
    assert!(result.output.is_none());
    assert!(result.variants.is_empty());
    assert!(result.reject_reason.is_some());
}

#[test]
fn test_missing_integer_field_rejected() {
    let result = verbalize(VerbalizeRequest {
        tokens: "negative: \"true\" ".to_string(),
        deterministic: true,
    });
    assert_eq!(result.verdict, Verdict::Reject);
}

#[test]
fn test_plain_text_rejected() {
    // The transducer's own output is not valid input: no round-trip.
    let result = verbalize(VerbalizeRequest {
        tokens: "minus zwei".to_string(),
        deterministic: true,
    });
    assert_eq!(result.verdict, Verdict::Reject);
}

#[test]
fn test_empty_input_rejected() {
    let result = verbalize(VerbalizeRequest {
        tokens: String::new(),
        deterministic: true,
    });
    assert_eq!(result.verdict, Verdict::Reject);
}

#[test]
fn test_rejection_in_non_deterministic_mode() {
    let result = verbalize(VerbalizeRequest {
        tokens: "integer: \"zwei".to_string(),
        deterministic: false,
    });
    assert_eq!(result.verdict, Verdict::Reject);
}

// =============================================================================
// Grammar Component Contract
// =============================================================================

#[test]
fn test_grammar_metadata() {
    init_tracing();
    let cardinal = CardinalVerbalizer::new(true);
    assert_eq!(cardinal.name(), "cardinal");
    assert_eq!(cardinal.kind(), GrammarKind::Verbalize);
    assert_ne!(cardinal.kind(), GrammarKind::Classify);
    assert!(cardinal.deterministic());
    assert!(!CardinalVerbalizer::new(false).deterministic());
}

#[test]
fn test_grammar_is_reusable_and_pure() {
    // One grammar instance, applied repeatedly: same results every time.
    let cardinal = CardinalVerbalizer::new(true);
    for _ in 0..3 {
        assert_eq!(cardinal.verbalize("integer: \"zwei\""), Ok("zwei".to_string()));
        assert!(cardinal.verbalize("integer: \"zwei").is_err());
    }
}

#[test]
fn test_engine_capability_flag() {
    // The one-time probe must hold before grammars are constructed.
    assert!(engine_available());
}
