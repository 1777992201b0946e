//! Tests for HttpFetcher against a one-shot local HTTP server

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use serde_json::json;

use rsced::infrastructure::traits::{Fetcher, HttpFetcher};
use rsced::infrastructure::InfraError;

/// Serve a single canned response; returns the base URL and a receiver for
/// the request line the server saw.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("request line");
        loop {
            let mut header = String::new();
            let n = reader.read_line(&mut header).expect("header");
            if n == 0 || header == "\r\n" {
                break;
            }
        }
        tx.send(request_line.trim_end().to_string()).ok();

        let mut stream = stream;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().ok();
    });

    (format!("http://{}", addr), rx)
}

#[test]
fn given_ok_json_when_fetching_then_decodes_document() {
    let (base, _rx) = serve_once("200 OK", r#"{"Magnet": {"Quad": {}}}"#);

    let document = HttpFetcher
        .get_json(&format!("{base}/api/catalog/type-tree"), &[], true)
        .unwrap();

    assert_eq!(document, json!({"Magnet": {"Quad": {}}}));
}

#[test]
fn given_params_when_fetching_then_sends_repeated_keys() {
    let (base, rx) = serve_once("200 OK", r#"{"stat": "ok"}"#);
    let params = vec![
        ("out".to_string(), "json".to_string()),
        ("t".to_string(), "IOC".to_string()),
        ("t".to_string(), "Magnet".to_string()),
    ];

    HttpFetcher
        .get_json(&format!("{base}/inventory"), &params, true)
        .unwrap();

    let request_line = rx.recv().expect("request line");
    assert_eq!(request_line, "GET /inventory?out=json&t=IOC&t=Magnet HTTP/1.1");
}

#[test]
fn given_non_ok_status_when_fetching_then_status_error_with_url() {
    let (base, _rx) = serve_once("500 Internal Server Error", "Internal failure\nsee logs for more");
    let url = format!("{base}/api/catalog/type-tree");

    let err = HttpFetcher.get_json(&url, &[], true).unwrap_err();

    match err {
        InfraError::Status {
            url: failed,
            status,
            snippet,
        } => {
            assert_eq!(failed, url);
            assert_eq!(status, 500);
            assert_eq!(snippet, "Internal failure see");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn given_non_ok_status_with_json_body_when_fetching_then_still_fails() {
    let (base, _rx) = serve_once("404 Not Found", r#"{"stat": "ok"}"#);

    let err = HttpFetcher.get_json(&base, &[], false).unwrap_err();
    assert!(matches!(err, InfraError::Status { status: 404, .. }));
}

#[test]
fn given_invalid_json_when_fetching_then_decode_error_with_url() {
    let (base, _rx) = serve_once("200 OK", "<html>not json</html>");
    let url = format!("{base}/inventory");

    let err = HttpFetcher
        .get_json(&url, &[("out".to_string(), "json".to_string())], true)
        .unwrap_err();

    assert!(matches!(err, InfraError::Decode { .. }));
    assert_eq!(err.url(), format!("{url}?out=json"));
}

#[test]
fn given_closed_port_when_fetching_then_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    let url = format!("http://{addr}/api/catalog/type-tree");

    let err = HttpFetcher.get_json(&url, &[], true).unwrap_err();

    assert!(matches!(err, InfraError::Transport { .. }));
    assert_eq!(err.url(), url);
}
