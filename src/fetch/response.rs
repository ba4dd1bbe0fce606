//! Response reading and parsing.
//!
//! The client sends `Connection: close` and reads until the server closes;
//! `Content-Length` and chunked framing are never consulted. The collected
//! bytes are split at the first CRLFCRLF into header block and body.

use std::io::{self, Read};

use crate::config::READ_CHUNK_SIZE;
use crate::fetch::headers::Headers;

const HEADER_BODY_SEPARATOR: &[u8] = b"\r\n\r\n";

/// A parsed response.
///
/// `status_code` and `headers` are both `None` when the byte stream had no
/// header/body separator. Callers must treat that as a malformed response:
/// never followed as a redirect and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseEnvelope {
    pub status_code: Option<u16>,
    pub headers: Option<Headers>,
    pub body: String,
}

impl ResponseEnvelope {
    /// The failure envelope: no status, no headers, no body.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Exact-match header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.as_ref().and_then(|headers| headers.get(name))
    }

    /// Case-insensitive header lookup, for renderers and other boundary code.
    pub fn header_ignore_case(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|headers| headers.get_ignore_case(name))
    }

    pub fn is_malformed(&self) -> bool {
        self.status_code.is_none()
    }
}

/// Reads `stream` to end-of-stream in fixed-size chunks and parses the result.
///
/// A TLS peer that closes the socket without sending `close_notify` shows up
/// as `UnexpectedEof`; that is the normal way many servers end a
/// `Connection: close` response, so it is treated as end-of-stream.
///
/// # Errors
///
/// Any other read error, including a read timeout.
pub fn read_response<R: Read>(stream: &mut R) -> io::Result<ResponseEnvelope> {
    let mut raw = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => raw.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
    }
    log::debug!("Read {} response bytes", raw.len());
    Ok(parse_response(&raw))
}

/// Parses a complete raw response.
pub fn parse_response(raw: &[u8]) -> ResponseEnvelope {
    let Some(split) = raw
        .windows(HEADER_BODY_SEPARATOR.len())
        .position(|window| window == HEADER_BODY_SEPARATOR)
    else {
        log::debug!("No header/body separator in {} bytes", raw.len());
        return ResponseEnvelope {
            status_code: None,
            headers: None,
            body: String::from_utf8_lossy(raw).into_owned(),
        };
    };

    let head = String::from_utf8_lossy(&raw[..split]);
    let body = String::from_utf8_lossy(&raw[split + HEADER_BODY_SEPARATOR.len()..]).into_owned();

    let mut lines = head.split("\r\n");
    let status_code = lines.next().and_then(parse_status_line);
    let headers = lines
        .filter_map(|line| line.split_once(": "))
        .collect::<Headers>();

    ResponseEnvelope {
        status_code,
        headers: Some(headers),
        body,
    }
}

/// `HTTP-version SP status-code [SP reason]`; `None` with fewer than two
/// tokens or a non-numeric code.
fn parse_status_line(line: &str) -> Option<u16> {
    let mut tokens = line.splitn(3, ' ');
    let _version = tokens.next()?;
    tokens.next()?.parse().ok()
}
