//! Structured logging for the provider service.
//!
//! # Telemetry invariants
//!
//! - **No master keys, plaintext credentials or ciphertext** may appear in any
//!   span attribute or log field. Handlers log error kinds and sizes only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   takes precedence when set.

pub mod init;

pub use init::init_telemetry;
