//! URL decomposition.
//!
//! Splits a URL string into scheme, host, port and path without any URL
//! library: the client only needs the four pieces it puts on the wire.

use std::fmt;

use crate::config::{HTTPS_DEFAULT_PORT, HTTP_DEFAULT_PORT};
use crate::error_handling::InputError;

/// Transport scheme of a request target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Plain TCP (`http`)
    Plain,
    /// TLS over TCP (`https`)
    Secure,
}

impl Scheme {
    /// Parses the text before `://`. Only `https` selects TLS; any other
    /// scheme is treated as plain HTTP.
    pub fn from_scheme_str(scheme: &str) -> Self {
        if scheme.eq_ignore_ascii_case("https") {
            Scheme::Secure
        } else {
            Scheme::Plain
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Plain => "http",
            Scheme::Secure => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Plain => HTTP_DEFAULT_PORT,
            Scheme::Secure => HTTPS_DEFAULT_PORT,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a request goes.
///
/// `path` always starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTarget {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl RequestTarget {
    /// `host` or `host:port`, omitting the port when it is the scheme default.
    pub fn authority(&self) -> String {
        if self.port == self.scheme.default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Resolves a `Location` header value against this target.
    ///
    /// An absolute URL is used as-is, a value starting with `/` keeps the
    /// current scheme, host and port, and anything else is taken as a bare
    /// host and given the current scheme.
    pub fn resolve_location(&self, location: &str) -> String {
        if location.starts_with('/') {
            format!("{}://{}{}", self.scheme, self.authority(), location)
        } else if has_scheme(location) {
            location.to_string()
        } else {
            format!("{}://{}", self.scheme, location)
        }
    }
}

/// True when `location` opens with `scheme://`. A `://` that appears later,
/// e.g. inside a query string, does not count.
fn has_scheme(location: &str) -> bool {
    location.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Fully-qualified form, used as the redirect loop key and in log messages.
impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority(), self.path)
    }
}

/// Decomposes a URL into a [`RequestTarget`].
///
/// - No leading `scheme://` means plain HTTP and the whole string is host + path.
/// - No `/` after the host means the path is `/`.
/// - An explicit `host:port` always overrides the scheme default port.
///
/// # Errors
///
/// Returns [`InputError`] when the port segment is not a number in 1-65535.
pub fn decompose(url: &str) -> Result<RequestTarget, InputError> {
    let (scheme, rest) = match url.split_once("://") {
        Some((scheme, rest)) if has_scheme(url) => (Scheme::from_scheme_str(scheme), rest),
        _ => (Scheme::Plain, url),
    };

    let (host_part, path) = match rest.split_once('/') {
        Some((host_part, path)) => (host_part, format!("/{path}")),
        None => (rest, "/".to_string()),
    };

    let (host, port) = match host_part.split_once(':') {
        Some((host, port_str)) => {
            let port = port_str
                .parse::<u16>()
                .map_err(|source| InputError::InvalidPort {
                    url: url.to_string(),
                    port: port_str.to_string(),
                    source,
                })?;
            if port == 0 {
                return Err(InputError::ZeroPort {
                    url: url.to_string(),
                });
            }
            (host, port)
        }
        None => (host_part, scheme.default_port()),
    };

    Ok(RequestTarget {
        scheme,
        host: host.to_string(),
        port,
        path,
    })
}
