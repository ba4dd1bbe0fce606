//! Transport connector.
//!
//! Opens a blocking TCP connection to a [`RequestTarget`] and, for the secure
//! scheme, runs a TLS handshake over it with `rustls` and the `webpki-roots`
//! trust anchors. The host is used both to connect and as the certificate
//! name; no client certificates, no pinning.
//!
//! A [`Connection`] lives for exactly one request/response cycle: it is
//! created and dropped inside [`SocketExchange::exchange`], so the socket is
//! closed on every exit path, including errors and timeouts.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use log::debug;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};

use crate::error_handling::{FetchError, FetchStage};
use crate::fetch::request::{serialize, RequestSpec};
use crate::fetch::response::{read_response, ResponseEnvelope};
use crate::fetch::target::{RequestTarget, Scheme};

static TLS_CONFIG: LazyLock<Arc<ClientConfig>> = LazyLock::new(|| {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    Arc::new(
        ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth(),
    )
});

/// An open byte stream to the server, plaintext or TLS.
pub enum Connection {
    Plain(TcpStream),
    Secure(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Connection::Plain(stream) => stream.read(buf),
            Connection::Secure(stream) => stream.read(buf),
        }
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Connection::Plain(stream) => stream.write(buf),
            Connection::Secure(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Connection::Plain(stream) => stream.flush(),
            Connection::Secure(stream) => stream.flush(),
        }
    }
}

/// Connects to `target`, applying `timeout` to the connect and to every
/// subsequent read and write on the socket.
///
/// Every resolved address is tried in turn; the last failure is returned.
///
/// # Errors
///
/// Any DNS, connect, timeout or TLS handshake failure.
pub fn connect(target: &RequestTarget, timeout: Duration) -> io::Result<Connection> {
    let mut last_error = None;
    let mut socket = None;
    for addr in (target.host.as_str(), target.port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => {
                socket = Some(stream);
                break;
            }
            Err(e) => {
                debug!("Connect to {addr} for {} failed: {e}", target.host);
                last_error = Some(e);
            }
        }
    }
    let mut socket = match socket {
        Some(socket) => socket,
        None => {
            return Err(last_error.unwrap_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no addresses found for {}", target.host),
                )
            }))
        }
    };
    socket.set_read_timeout(Some(timeout))?;
    socket.set_write_timeout(Some(timeout))?;

    match target.scheme {
        Scheme::Plain => Ok(Connection::Plain(socket)),
        Scheme::Secure => {
            let server_name = ServerName::try_from(target.host.clone())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let mut tls = ClientConnection::new(Arc::clone(&TLS_CONFIG), server_name)
                .map_err(io::Error::other)?;
            // Finish the handshake here so certificate failures surface as connect errors
            while tls.is_handshaking() {
                tls.complete_io(&mut socket)?;
            }
            debug!(
                "TLS established with {} ({:?})",
                target.host,
                tls.protocol_version()
            );
            Ok(Connection::Secure(Box::new(StreamOwned::new(tls, socket))))
        }
    }
}

/// One full request/response cycle.
///
/// The redirect controller drives a cycle through this trait so that tests can
/// substitute scripted responses for real sockets.
pub trait Exchange {
    fn exchange(&self, spec: &RequestSpec) -> Result<ResponseEnvelope, FetchError>;
}

/// Performs cycles over real sockets.
#[derive(Debug, Clone, Copy, Default)]
pub struct SocketExchange;

impl Exchange for SocketExchange {
    fn exchange(&self, spec: &RequestSpec) -> Result<ResponseEnvelope, FetchError> {
        let url = spec.target.to_string();
        debug!("{} {url}", spec.method);

        let mut connection = connect(&spec.target, spec.timeout)
            .map_err(|e| FetchError::transport(&url, FetchStage::Connect, e))?;

        connection
            .write_all(&serialize(spec))
            .and_then(|()| connection.flush())
            .map_err(|e| FetchError::transport(&url, FetchStage::Send, e))?;

        read_response(&mut connection)
            .map_err(|e| FetchError::transport(&url, FetchStage::Receive, e))
    }
}
