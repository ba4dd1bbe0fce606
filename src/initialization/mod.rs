//! Application initialization.
//!
//! This module provides functions to initialize process-wide resources:
//! - Logger
//! - TLS crypto provider

mod logger;

use rustls::crypto::{ring::default_provider, CryptoProvider};

// Re-export public API
pub use logger::init_logger_with;

/// Initializes the crypto provider for TLS operations.
///
/// Installs `ring` as the process-wide `rustls` provider. The transport also
/// works without this call because `ring` is the only provider compiled in.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}
