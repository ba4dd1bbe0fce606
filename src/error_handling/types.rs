//! Error type definitions.
//!
//! This module defines all error types used throughout the client.

use std::num::ParseIntError;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Malformed caller input. Fatal, never retried.
#[derive(Error, Debug)]
pub enum InputError {
    /// The `host:port` segment carried a port that is not a number in 0-65535.
    #[error("invalid port '{port}' in URL '{url}': {source}")]
    InvalidPort {
        url: String,
        port: String,
        #[source]
        source: ParseIntError,
    },

    /// The explicit port was 0, which is not a connectable destination.
    #[error("port 0 is not a valid destination in URL '{url}'")]
    ZeroPort { url: String },
}

/// Stage of a single request/response cycle, used for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FetchStage {
    /// DNS resolution, TCP connect and the full TLS handshake
    Connect,
    /// Writing the serialized request
    Send,
    /// Draining the response until the peer closes
    Receive,
}

impl std::fmt::Display for FetchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FetchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStage::Connect => "connect",
            FetchStage::Send => "send",
            FetchStage::Receive => "receive",
        }
    }
}

/// Errors that end a fetch.
///
/// A malformed response is not an error: it is reported as an envelope with
/// an absent status code.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL (or a redirect `Location`) could not be decomposed.
    #[error(transparent)]
    Input(#[from] InputError),

    /// DNS, connect, TLS handshake, write, read or timeout failure.
    #[error("{stage} failed for {url}: {source}")]
    Transport {
        url: String,
        stage: FetchStage,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub(crate) fn transport(url: &str, stage: FetchStage, source: std::io::Error) -> Self {
        FetchError::Transport {
            url: url.to_string(),
            stage,
            source,
        }
    }
}

/// Cache store failures. Never fatal to a fetch.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache file could not be read, created or written.
    #[error("cache file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cache file exists but is not a valid cache document.
    #[error("cache file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
