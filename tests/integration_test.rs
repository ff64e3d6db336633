//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero, con un
//! directorio temporal como base de `/files/`, y habla HTTP crudo por
//! `TcpStream`.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use flate2::read::GzDecoder;
use http11_server::config::Config;
use http11_server::server::Server;
use tempfile::TempDir;

struct TestServer {
    addr: SocketAddr,
    dir: TempDir,
}

/// Helper: levanta un servidor en 127.0.0.1:0 en un thread aparte
fn start_server() -> TestServer {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config {
        port: 0,
        directory: dir.path().to_path_buf(),
        read_timeout_ms: 5_000,
        max_body_bytes: 1024 * 1024,
        ..Config::default()
    };

    let server = Server::bind(&config).expect("bind");
    let addr = server.local_addr().expect("local addr");
    thread::spawn(move || server.run());

    TestServer { addr, dir }
}

/// Response parseada de forma mínima para los asserts
struct RawResponse {
    status_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RawResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Helper: envía bytes crudos y lee la response completa
fn send_raw(addr: SocketAddr, raw: &[u8]) -> RawResponse {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
    stream.set_write_timeout(Some(Duration::from_secs(10))).unwrap();

    stream.write_all(raw).expect("write request");

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).expect("read response");
    parse_response(&buf)
}

fn parse_response(buf: &[u8]) -> RawResponse {
    let split = buf
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response without header terminator");

    let head = std::str::from_utf8(&buf[..split]).expect("utf-8 head");
    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default().to_string();
    let headers = lines
        .map(|line| {
            let (name, value) = line.split_once(": ").expect("header separator");
            (name.to_string(), value.to_string())
        })
        .collect();

    RawResponse {
        status_line,
        headers,
        body: buf[split + 4..].to_vec(),
    }
}

#[test]
fn test_root_endpoint() {
    let server = start_server();

    for path in ["/", "/index.html"] {
        let request = format!("GET {} HTTP/1.1\r\nHost: localhost:4221\r\n\r\n", path);
        let response = send_raw(server.addr, request.as_bytes());

        assert_eq!(response.status_line, "HTTP/1.1 200 OK");
        assert!(response.headers.is_empty());
        assert!(response.body.is_empty());
    }
}

#[test]
fn test_not_found() {
    let server = start_server();
    let response = send_raw(server.addr, b"GET /nonexistent HTTP/1.1\r\n\r\n");

    assert_eq!(response.status_line, "HTTP/1.1 404 Not Found");
    assert!(response.body.is_empty());
}

#[test]
fn test_echo_endpoint() {
    let server = start_server();
    let response = send_raw(server.addr, b"GET /echo/raspberry HTTP/1.1\r\nHost: localhost\r\n\r\n");

    assert_eq!(response.status_line, "HTTP/1.1 200 OK");
    assert_eq!(response.header("Content-Type"), Some("text/plain"));
    assert_eq!(response.header("Content-Length"), Some("9"));
    assert_eq!(response.body, b"raspberry");
}

#[test]
fn test_echo_gzip() {
    let server = start_server();
    let response = send_raw(
        server.addr,
        b"GET /echo/mango HTTP/1.1\r\nAccept-Encoding: invalid-1, gzip, invalid-2\r\n\r\n",
    );

    assert_eq!(response.status_line, "HTTP/1.1 200 OK");
    assert_eq!(response.header("Content-Encoding"), Some("gzip"));
    assert_eq!(
        response.header("Content-Length"),
        Some(response.body.len().to_string().as_str())
    );

    let mut decoded = String::new();
    GzDecoder::new(&response.body[..]).read_to_string(&mut decoded).unwrap();
    assert_eq!(decoded, "mango");
}

#[test]
fn test_user_agent_endpoint() {
    let server = start_server();
    let response = send_raw(
        server.addr,
        b"GET /user-agent HTTP/1.1\r\nHost: localhost\r\nUser-Agent: foobar/1.2.3\r\n\r\n",
    );

    assert_eq!(response.status_line, "HTTP/1.1 200 OK");
    assert_eq!(response.header("Content-Type"), Some("text/plain"));
    assert_eq!(response.body, b"foobar/1.2.3");
}

#[test]
fn test_user_agent_missing() {
    let server = start_server();
    let response = send_raw(server.addr, b"GET /user-agent HTTP/1.1\r\n\r\n");

    assert_eq!(response.status_line, "HTTP/1.1 400 Bad Request");
}

#[test]
fn test_files_round_trip_binary() {
    let server = start_server();
    let payload: Vec<u8> = vec![0x00, 0x01, b'\r', b'\n', 0x00, 0xFF, b'x', 0x00];

    let mut request = format!(
        "POST /files/blob.bin HTTP/1.1\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\n\r\n",
        payload.len()
    )
    .into_bytes();
    request.extend_from_slice(&payload);

    let created = send_raw(server.addr, &request);
    assert_eq!(created.status_line, "HTTP/1.1 201 Created");
    assert!(created.body.is_empty());
    assert_eq!(std::fs::read(server.dir.path().join("blob.bin")).unwrap(), payload);

    let fetched = send_raw(server.addr, b"GET /files/blob.bin HTTP/1.1\r\n\r\n");
    assert_eq!(fetched.status_line, "HTTP/1.1 200 OK");
    assert_eq!(fetched.header("Content-Type"), Some("application/octet-stream"));
    assert_eq!(fetched.header("Content-Length"), Some("8"));
    assert_eq!(fetched.body, payload);
}

#[test]
fn test_files_missing() {
    let server = start_server();
    let response = send_raw(server.addr, b"GET /files/non_existent_file HTTP/1.1\r\n\r\n");

    assert_eq!(response.status_line, "HTTP/1.1 404 Not Found");
    assert!(response.body.is_empty());
}

#[test]
fn test_files_traversal_rejected() {
    let server = start_server();
    let response = send_raw(server.addr, b"GET /files/.. HTTP/1.1\r\n\r\n");

    assert_eq!(response.status_line, "HTTP/1.1 400 Bad Request");
}

#[test]
fn test_unsupported_method() {
    let server = start_server();
    let response = send_raw(server.addr, b"PUT /files/x HTTP/1.1\r\n\r\n");

    assert_eq!(response.status_line, "HTTP/1.1 400 Bad Request");
    assert_eq!(response.header("Content-Type"), Some("application/json"));
}

#[test]
fn test_unsupported_version() {
    let server = start_server();
    let response = send_raw(server.addr, b"GET / HTTP/2.0\r\n\r\n");

    assert_eq!(response.status_line, "HTTP/1.1 400 Bad Request");
}

#[test]
fn test_body_too_large() {
    let server = start_server();
    let response = send_raw(
        server.addr,
        b"POST /files/big HTTP/1.1\r\nContent-Length: 99999999\r\n\r\n",
    );

    assert_eq!(response.status_line, "HTTP/1.1 413 Payload Too Large");
    assert!(!server.dir.path().join("big").exists());
}

#[test]
fn test_stalled_client_does_not_block_others() {
    let server = start_server();

    // Cliente que manda media request line y se queda esperando
    let mut stalled = TcpStream::connect(server.addr).unwrap();
    stalled.write_all(b"GET /echo/sl").unwrap();

    let start = Instant::now();
    let response = send_raw(server.addr, b"GET /echo/fast HTTP/1.1\r\n\r\n");

    assert_eq!(response.body, b"fast");
    assert!(
        start.elapsed() < Duration::from_secs(2),
        "second connection waited on the stalled one"
    );

    drop(stalled);
}

#[test]
fn test_multiple_requests_concurrently() {
    let server = start_server();
    let addr = server.addr;

    let clients: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let request = format!("GET /echo/client{} HTTP/1.1\r\n\r\n", i);
                let response = send_raw(addr, request.as_bytes());
                (i, response)
            })
        })
        .collect();

    for client in clients {
        let (i, response) = client.join().unwrap();
        assert_eq!(response.status_line, "HTTP/1.1 200 OK");
        assert_eq!(response.body, format!("client{}", i).into_bytes());
    }
}
