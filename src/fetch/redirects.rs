//! HTTP redirect chain resolution.
//!
//! Follows redirects manually, one fresh connection per hop, tracking every
//! URL visited so that cycles end the chain instead of looping. The loop runs
//! at most `max_hops + 1` request cycles.

use std::collections::HashSet;

use log::{debug, warn};

use crate::config::REDIRECT_STATUS_CODES;
use crate::error_handling::FetchError;
use crate::fetch::request::RequestSpec;
use crate::fetch::response::ResponseEnvelope;
use crate::fetch::target::{decompose, RequestTarget};
use crate::fetch::transport::Exchange;

/// How a redirect chain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTerminal {
    /// A non-redirect response, or a redirect without `Location`.
    Done,
    /// The next URL had already been requested in this chain. The envelope is
    /// absent.
    LoopDetected,
    /// Hops ran out; the envelope is the last response, itself a redirect.
    HopLimitExceeded,
}

impl RedirectTerminal {
    /// `true` when the chain stopped early rather than reaching a final response.
    pub fn is_truncated(&self) -> bool {
        !matches!(self, RedirectTerminal::Done)
    }
}

/// Per-call redirect state. Discarded when the call returns.
#[derive(Debug)]
struct RedirectSession {
    visited: HashSet<String>,
    chain: Vec<String>,
    remaining_hops: usize,
    current: RequestTarget,
}

impl RedirectSession {
    fn new(start: RequestTarget, max_hops: usize) -> Self {
        Self {
            visited: HashSet::new(),
            chain: Vec::new(),
            remaining_hops: max_hops,
            current: start,
        }
    }

    fn finish(self, terminal: RedirectTerminal, envelope: ResponseEnvelope) -> RedirectOutcome {
        RedirectOutcome {
            envelope,
            terminal,
            chain: self.chain,
            final_target: self.current,
        }
    }
}

/// Result of [`fetch_with_redirects`].
#[derive(Debug, Clone)]
pub struct RedirectOutcome {
    pub envelope: ResponseEnvelope,
    pub terminal: RedirectTerminal,
    /// Every URL requested, in order
    pub chain: Vec<String>,
    /// The target of the last request issued (or refused, for a loop)
    pub final_target: RequestTarget,
}

/// Sends `spec` and follows redirect responses up to `max_hops` times.
///
/// Each hop reuses the method, headers, body, accept type and timeout of
/// `spec` with a new target. Only 301, 302, 303, 307 and 308 responses that
/// carry a `Location` header are followed; a malformed response (absent
/// status) is never followed.
///
/// # Errors
///
/// A transport failure on any hop ends the chain with that error; a
/// `Location` that cannot be decomposed is an input error. Neither is retried.
pub fn fetch_with_redirects<E: Exchange + ?Sized>(
    exchange: &E,
    spec: &RequestSpec,
    max_hops: usize,
) -> Result<RedirectOutcome, FetchError> {
    let mut session = RedirectSession::new(spec.target.clone(), max_hops);

    loop {
        let url = session.current.to_string();
        if !session.visited.insert(url.clone()) {
            warn!(
                "Redirect loop detected at {url} after {} request(s)",
                session.chain.len()
            );
            return Ok(session.finish(RedirectTerminal::LoopDetected, ResponseEnvelope::absent()));
        }
        session.chain.push(url.clone());

        let request = RequestSpec {
            target: session.current.clone(),
            ..spec.clone()
        };
        let envelope = exchange.exchange(&request)?;

        let status_code = match envelope.status_code {
            Some(code) if REDIRECT_STATUS_CODES.contains(&code) => code,
            _ => return Ok(session.finish(RedirectTerminal::Done, envelope)),
        };
        let Some(location) = envelope.header("Location").map(str::to_string) else {
            warn!("Redirect status {status_code} for {url} but no Location header");
            return Ok(session.finish(RedirectTerminal::Done, envelope));
        };

        if session.remaining_hops == 0 {
            warn!(
                "Redirect hop limit ({max_hops}) reached at {url}; returning the last redirect response"
            );
            return Ok(session.finish(RedirectTerminal::HopLimitExceeded, envelope));
        }

        let next = session.current.resolve_location(&location);
        debug!("{status_code} redirect: {url} -> {next}");
        session.current = decompose(&next)?;
        session.remaining_hops -= 1;
    }
}
