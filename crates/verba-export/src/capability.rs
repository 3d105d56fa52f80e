//! One-time accelerator probe.
//!
//! Some export paths are validated against an accelerator runtime and
//! are skipped when none is present. The probe runs once per process;
//! `VERBA_ACCELERATOR` overrides detection either way.

use once_cell::sync::Lazy;
use std::path::Path;

static ACCELERATOR: Lazy<bool> = Lazy::new(|| {
    if let Ok(value) = std::env::var("VERBA_ACCELERATOR") {
        return matches!(value.as_str(), "1" | "true" | "on");
    }
    let present = Path::new("/dev/nvidia0").exists() || Path::new("/dev/kfd").exists();
    tracing::debug!(present, "probed accelerator device nodes");
    present
});

/// Whether an accelerator is available to this process.
pub fn accelerator_available() -> bool {
    *ACCELERATOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_is_stable_across_calls() {
        assert_eq!(accelerator_available(), accelerator_available());
    }
}
