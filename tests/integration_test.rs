//! End-to-end fetches over real sockets against a local canned-response server.

mod helpers;

use std::time::Duration;

use go2web::{
    Client, Config, FetchError, FetchSource, FetchStage, RedirectTerminal,
};
use helpers::{closed_port_addr, reply, spawn_server, Reply};

fn config_in(dir: &tempfile::TempDir) -> Config {
    Config {
        timeout: Duration::from_secs(2),
        cache_file: dir.path().join("cache.json"),
        ..Default::default()
    }
}

fn uncached() -> Config {
    Config {
        timeout: Duration::from_secs(2),
        use_cache: false,
        ..Default::default()
    }
}

#[test]
fn test_plain_get_round_trip() {
    let (addr, server) = spawn_server(vec![reply(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nX-Dup: 1\r\nX-Dup: 2\r\n\r\nhello world",
    )]);
    let client = Client::new(uncached());

    let result = client
        .fetch(&format!("http://{addr}/greet"), Some("text/plain"))
        .expect("fetch should succeed");
    assert_eq!(result.source, FetchSource::Network);
    assert_eq!(result.terminal, RedirectTerminal::Done);
    assert_eq!(result.envelope.status_code, Some(200));
    assert_eq!(result.envelope.header("Content-Type"), Some("text/plain"));
    assert_eq!(result.envelope.header("X-Dup"), Some("2"));
    assert_eq!(result.envelope.body, "hello world");

    let requests = server.join().unwrap();
    let request = &requests[0];
    assert!(
        request.starts_with(&format!(
            "GET /greet HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\nAccept: text/plain\r\nUser-Agent: "
        )),
        "unexpected request: {request:?}"
    );
    assert!(request.ends_with("\r\n\r\n"));
    assert!(!request.contains("Content-Length"));
}

#[test]
fn test_redirect_followed_over_fresh_connections() {
    let (addr, server) = spawn_server(vec![
        reply("HTTP/1.1 301 Moved Permanently\r\nLocation: /new\r\n\r\n"),
        reply("HTTP/1.1 200 OK\r\n\r\nmoved here"),
    ]);
    let client = Client::new(uncached());

    let result = client.fetch(&format!("http://{addr}/old"), None).unwrap();
    assert_eq!(result.envelope.status_code, Some(200));
    assert_eq!(result.envelope.body, "moved here");
    assert_eq!(
        result.chain,
        vec![format!("http://{addr}/old"), format!("http://{addr}/new")]
    );

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].starts_with("GET /new HTTP/1.1\r\n"));
}

#[test]
fn test_redirect_loop_over_sockets() {
    let (addr, _server) = spawn_server(vec![
        reply("HTTP/1.1 302 Found\r\nLocation: /b\r\n\r\n"),
        reply("HTTP/1.1 302 Found\r\nLocation: /a\r\n\r\n"),
    ]);
    let client = Client::new(uncached());

    let result = client.fetch(&format!("http://{addr}/a"), None).unwrap();
    assert_eq!(result.terminal, RedirectTerminal::LoopDetected);
    assert_eq!(result.envelope.status_code, None);
    assert_eq!(result.chain.len(), 2);
}

#[test]
fn test_body_larger_than_read_chunk() {
    let body = "0123456789".repeat(2_000);
    let (addr, _server) = spawn_server(vec![Reply::Bytes(
        format!("HTTP/1.1 200 OK\r\n\r\n{body}").into_bytes(),
    )]);
    let client = Client::new(uncached());

    let result = client.fetch(&format!("{addr}"), None).unwrap();
    assert_eq!(result.envelope.body, body);
}

#[test]
fn test_cache_file_serves_second_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, server) = spawn_server(vec![reply(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{\"ok\":true}",
    )]);
    let url = format!("http://{addr}/data");

    let first = Client::new(config_in(&dir)).fetch(&url, None).unwrap();
    assert_eq!(first.source, FetchSource::Network);
    server.join().unwrap();

    // The server has shut down; only the cache can answer now
    let second = Client::new(config_in(&dir)).fetch(&url, None).unwrap();
    assert_eq!(second.source, FetchSource::Cache);
    assert_eq!(second.envelope.status_code, Some(200));
    assert_eq!(second.envelope.body, "{\"ok\":true}");

    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("cache.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(raw[&url]["status_code"], 200);
    assert_eq!(raw[&url]["headers"]["Content-Type"], "application/json");
}

#[test]
fn test_malformed_response_is_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, server) = spawn_server(vec![reply("HTTP/1.1 200 OK\r\nbroken")]);
    let url = format!("http://{addr}/");

    let result = Client::new(config_in(&dir)).fetch(&url, None).unwrap();
    assert_eq!(result.envelope.status_code, None);
    assert!(result.envelope.headers.is_none());
    server.join().unwrap();

    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("cache.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(raw, serde_json::json!({}));
}

#[test]
fn test_stale_cache_entry_is_refetched() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, server) = spawn_server(vec![
        reply("HTTP/1.1 200 OK\r\n\r\nfirst"),
        reply("HTTP/1.1 200 OK\r\n\r\nsecond"),
    ]);
    let url = format!("http://{addr}/");
    let config = Config {
        cache_max_age_secs: 0.0,
        ..config_in(&dir)
    };

    let client = Client::new(config);
    assert_eq!(client.fetch(&url, None).unwrap().envelope.body, "first");
    let again = client.fetch(&url, None).unwrap();
    assert_eq!(again.source, FetchSource::Network);
    assert_eq!(again.envelope.body, "second");
    assert_eq!(server.join().unwrap().len(), 2);
}

#[test]
fn test_corrupt_cache_file_does_not_block_fetch() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cache.json"), "not json at all").unwrap();
    let (addr, _server) = spawn_server(vec![reply("HTTP/1.1 200 OK\r\n\r\nfresh")]);

    let result = Client::new(config_in(&dir))
        .fetch(&format!("http://{addr}/"), None)
        .unwrap();
    assert_eq!(result.envelope.body, "fresh");
}

#[test]
fn test_connection_refused_is_transport_error() {
    let addr = closed_port_addr();
    let err = Client::new(uncached())
        .fetch(&format!("http://{addr}/"), None)
        .unwrap_err();
    match err {
        FetchError::Transport { stage, url, .. } => {
            assert_eq!(stage, FetchStage::Connect);
            assert_eq!(url, format!("http://{addr}/"));
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[test]
fn test_read_timeout_is_transport_error() {
    let (addr, _server) = spawn_server(vec![Reply::Stall(Duration::from_secs(2))]);
    let config = Config {
        timeout: Duration::from_millis(200),
        ..uncached()
    };

    let err = Client::new(config)
        .fetch(&format!("http://{addr}/slow"), None)
        .unwrap_err();
    assert!(matches!(
        err,
        FetchError::Transport {
            stage: FetchStage::Receive,
            ..
        }
    ));
}

#[test]
fn test_invalid_port_is_input_error() {
    let err = Client::new(uncached())
        .fetch("http://localhost:notaport/", None)
        .unwrap_err();
    assert!(matches!(err, FetchError::Input(_)));
}
