//! Environment-driven configuration: the debug-trace switch (spec §6's
//! `G_MESSAGES_DEBUG` analogue) and the cooperative cancellation token used
//! by schema loading (spec §5).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// This crate's name for the spec's environment variable. The spec
/// describes a comma-separated list of trace *domains*, or `all`/`none`;
/// this engine has exactly one domain (its own dispatcher), so any
/// non-empty, non-`none` value enables tracing.
pub const DEBUG_ENV_VAR: &str = "JSON_SCHEMA_DEBUG";

/// Reads [`DEBUG_ENV_VAR`] and reduces it to a single bool.
pub fn debug_enabled_from_env() -> bool {
    match std::env::var(DEBUG_ENV_VAR) {
        Ok(v) => {
            let v = v.trim();
            !v.is_empty() && v != "none"
        }
        Err(_) => false,
    }
}

/// A cooperative cancellation token checked at the (few) suspension
/// points schema loading exposes. Validate/apply/generate never consult
/// this: per spec §5 they run to completion once started.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_uncancelled() {
        let tok = CancellationToken::new();
        assert!(!tok.is_cancelled());
        tok.cancel();
        assert!(tok.is_cancelled());
    }
}
