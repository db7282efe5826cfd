//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use credentials::{OsRandom, RandomSource};

/// Application state shared across all request handlers.
///
/// Cloned per request; the random source is `Arc`-backed.
#[derive(Clone)]
pub struct AppState {
    /// Source for master keys and GCM nonces.
    pub rng: Arc<dyn RandomSource>,
}

impl AppState {
    /// Create a new [`AppState`] drawing randomness from `rng`.
    pub fn new(rng: Arc<dyn RandomSource>) -> Self {
        Self { rng }
    }
}

impl Default for AppState {
    /// State backed by the OS CSPRNG.
    fn default() -> Self {
        Self::new(Arc::new(OsRandom))
    }
}
