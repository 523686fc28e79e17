//! What `UreqTransport` actually puts on the wire.
//!
//! Each test accepts exactly one connection on a plain std listener, captures
//! the raw request bytes and answers with a canned response.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

use rest_core::{ApiError, HttpMethod, HttpService, RequestDescriptor, ServiceDefaults, UreqTransport};

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| pos + 4)
}

fn content_length(head: &str) -> Option<usize> {
    head.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("content-length")
            .then(|| value.trim().parse().ok())
            .flatten()
    })
}

fn request_complete(buf: &[u8]) -> bool {
    let Some(end) = header_end(buf) else {
        return false;
    };
    let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
    match content_length(&head) {
        Some(len) => buf.len() >= end + len,
        None if head.contains("transfer-encoding: chunked") => buf.ends_with(b"0\r\n\r\n"),
        None => true,
    }
}

/// Serve one request, answering with `response_body`; the handle yields the
/// raw request text.
fn capture_one(response_body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request_complete(&buf) {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            response_body.len(),
            response_body
        );
        // The client may hang up early when it rejects the response.
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
        String::from_utf8_lossy(&buf).into_owned()
    });

    (format!("http://{addr}"), handle)
}

fn service(base_url: &str) -> HttpService<UreqTransport> {
    HttpService::new(UreqTransport::new(base_url), ServiceDefaults::new().collection("Project"))
        .with_request_mutator(|req| req.set_header("x-correlation-id", "wire-42"))
}

#[test]
fn every_method_sends_mutator_headers_and_body() {
    let methods = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    for method in methods {
        let (base_url, server) = capture_one(r#"{"ok":true}"#.to_string());
        let descriptor = RequestDescriptor::new(method)
            .item(1)
            .body(serde_json::json!({"reason": "cleanup"}));

        let answer: serde_json::Value = service(&base_url).send_and_read(&descriptor).unwrap().unwrap();
        assert_eq!(answer["ok"], true, "{method}");

        let raw = server.join().unwrap();
        let lower = raw.to_ascii_lowercase();
        assert!(raw.starts_with(&format!("{} /Project/1 HTTP/1.1\r\n", method.as_str())), "{raw}");
        assert!(lower.contains("x-correlation-id: wire-42"), "{method}: {raw}");
        assert!(lower.contains("content-type: application/json"), "{method}: {raw}");
        assert!(raw.ends_with(r#"{"reason":"cleanup"}"#), "{method}: body missing from {raw}");
    }
}

#[test]
fn get_without_body_sends_no_payload() {
    let (base_url, server) = capture_one("[]".to_string());

    let answer: Vec<serde_json::Value> = service(&base_url)
        .send_and_read(&RequestDescriptor::get())
        .unwrap()
        .unwrap();
    assert!(answer.is_empty());

    let raw = server.join().unwrap();
    assert!(raw.starts_with("GET /Project HTTP/1.1\r\n"), "{raw}");
    assert!(!raw.to_ascii_lowercase().contains("content-type:"), "{raw}");
    assert!(raw.ends_with("\r\n\r\n"), "{raw}");
}

#[test]
fn oversized_response_is_a_transport_error() {
    let (base_url, server) = capture_one(format!("\"{}\"", "x".repeat(4096)));
    let service = HttpService::new(
        UreqTransport::new(&base_url).with_max_response_bytes(1024),
        ServiceDefaults::new().collection("Project"),
    );

    let err = service.send(&RequestDescriptor::get()).unwrap_err();
    let _ = server.join();

    let ApiError::Transport(message) = err else {
        panic!("expected a transport error");
    };
    assert!(message.contains("limit 1024 bytes"), "{message}");
}
