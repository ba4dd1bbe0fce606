// Shared test helpers: a canned-response HTTP server on a real socket.
//
// Each scripted response is served on its own connection, then the
// connection is closed, which is how the client knows the response ended.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// What the server does with one accepted connection.
#[allow(dead_code)] // Not every test file uses every behavior
pub enum Reply {
    /// Write these bytes, then close.
    Bytes(Vec<u8>),
    /// Read the request, then hold the connection open without answering.
    Stall(Duration),
}

#[allow(dead_code)]
pub fn reply(raw: &str) -> Reply {
    Reply::Bytes(raw.as_bytes().to_vec())
}

/// Starts a server that answers one connection per reply, in order, and
/// returns the raw requests it received when joined.
#[allow(dead_code)]
pub fn spawn_server(replies: Vec<Reply>) -> (SocketAddr, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read listener address");

    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for reply in replies {
            let (mut stream, _) = listener.accept().expect("Failed to accept connection");
            requests.push(read_request(&mut stream));
            match reply {
                Reply::Bytes(bytes) => {
                    stream.write_all(&bytes).expect("Failed to write reply");
                }
                Reply::Stall(duration) => thread::sleep(duration),
            }
            // Dropping the stream closes the connection
        }
        requests
    });

    (addr, handle)
}

/// Reads one request: the header block plus a `Content-Length` body if any.
fn read_request(stream: &mut TcpStream) -> String {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("Failed to set read timeout");
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = stream.read(&mut buf).unwrap_or(0);
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
        if let Some(end) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&raw[..end]).to_string();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("Content-Length: "))
                .and_then(|len| len.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if raw.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&raw).to_string()
}

/// A local address with nothing listening on it.
#[allow(dead_code)]
pub fn closed_port_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe listener");
    listener.local_addr().expect("Failed to read probe address")
}
