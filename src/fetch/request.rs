//! HTTP/1.1 request serialization.

use std::time::Duration;

use crate::config::{DEFAULT_METHOD, DEFAULT_TIMEOUT};
use crate::fetch::headers::Headers;
use crate::fetch::target::RequestTarget;

/// One request, described as plain data.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: String,
    pub target: RequestTarget,
    /// Caller headers, written after the fixed ones in insertion order
    pub headers: Headers,
    /// Never `Some` of an empty buffer; see [`RequestSpec::with_body`]
    pub body: Option<Vec<u8>>,
    pub accept: Option<String>,
    pub timeout: Duration,
}

impl RequestSpec {
    /// A bodiless `GET` for `target`.
    pub fn get(target: RequestTarget) -> Self {
        Self {
            method: DEFAULT_METHOD.to_string(),
            target,
            headers: Headers::new(),
            body: None,
            accept: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Attaches a body. An empty body is stored as no body, so that
    /// `Content-Length` is emitted exactly when there are bytes to send.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        self.body = if body.is_empty() { None } else { Some(body) };
        self
    }

    pub fn with_accept(mut self, accept: Option<String>) -> Self {
        self.accept = accept;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Renders the exact bytes to write to the socket.
///
/// Order: request line, `Host`, `Connection: close`, optional `Accept`, caller
/// headers, `Content-Length` (only with a body), blank line, body. Names and
/// values are written verbatim.
pub fn serialize(spec: &RequestSpec) -> Vec<u8> {
    let mut head = format!(
        "{} {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n",
        spec.method,
        spec.target.path,
        spec.target.authority()
    );
    if let Some(accept) = &spec.accept {
        head.push_str(&format!("Accept: {accept}\r\n"));
    }
    for (name, value) in spec.headers.iter() {
        head.push_str(&format!("{name}: {value}\r\n"));
    }

    match spec.body.as_deref().filter(|body| !body.is_empty()) {
        Some(body) => {
            head.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));
            let mut bytes = head.into_bytes();
            bytes.extend_from_slice(body);
            bytes
        }
        None => {
            head.push_str("\r\n");
            head.into_bytes()
        }
    }
}
