//! Error handling.
//!
//! Errors are categorized into:
//! - **Input errors**: malformed URLs, fatal and never retried
//! - **Transport errors**: connect/TLS/read/write failures, terminal for the fetch
//! - **Cache errors**: logged and treated as an empty cache, never fatal
//!
//! A response without a header/body separator is not an error; it is carried
//! as an envelope with an absent status code.

mod types;

// Re-export public API
pub use types::{CacheError, FetchError, FetchStage, InitializationError, InputError};
