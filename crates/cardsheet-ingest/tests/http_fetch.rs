//! `HttpFetcher` against a loopback server.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use cardsheet_ingest::{HttpFetcher, IngestError, RawLine, SheetFetcher};

/// Serve one canned response and return the request line that was received.
fn serve_once(content_type: Option<&str>, status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let url = format!(
        "http://{}/spreadsheets/d/doc/export?format=csv",
        listener.local_addr().expect("local addr")
    );
    let mut response = format!("HTTP/1.1 {status}\r\nContent-Length: {}\r\n", body.len());
    if let Some(content_type) = content_type {
        response.push_str(&format!("Content-Type: {content_type}\r\n"));
    }
    response.push_str("Connection: close\r\n\r\n");
    response.push_str(body);

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("read request line");
        loop {
            let mut header = String::new();
            let read = reader.read_line(&mut header).expect("read header");
            if read == 0 || header == "\r\n" {
                break;
            }
        }
        let mut stream = stream;
        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().expect("flush");
        request_line
    });
    (url, handle)
}

#[test]
fn streams_csv_lines() {
    let (url, server) = serve_once(Some("text/csv"), "200 OK", "Name,Level\r\nDragon,3\r\n");
    let fetcher = HttpFetcher::new().expect("client");
    let body = fetcher.fetch(&url).expect("fetch");
    let lines: Vec<RawLine> = body
        .lines()
        .collect::<Result<_, _>>()
        .expect("read lines");
    assert_eq!(
        lines,
        vec![
            RawLine {
                ordinal: 0,
                text: "Name,Level".to_string()
            },
            RawLine {
                ordinal: 1,
                text: "Dragon,3".to_string()
            },
        ]
    );
    let request_line = server.join().expect("server thread");
    assert!(request_line.starts_with("GET /spreadsheets/d/doc/export?format=csv "));
}

#[test]
fn rejects_html_response() {
    let (url, server) = serve_once(
        Some("text/html; charset=utf-8"),
        "200 OK",
        "<html>sign in</html>",
    );
    let fetcher = HttpFetcher::new().expect("client");
    let err = fetcher.fetch(&url).expect_err("html must be rejected");
    match err {
        IngestError::UnexpectedContentType { observed, .. } => {
            assert_eq!(observed.as_deref(), Some("text/html; charset=utf-8"));
        }
        other => panic!("unexpected error: {other}"),
    }
    server.join().expect("server thread");
}

#[test]
fn missing_content_type_is_rejected() {
    let (url, server) = serve_once(None, "200 OK", "a,b");
    let fetcher = HttpFetcher::new().expect("client");
    let err = fetcher.fetch(&url).expect_err("no content type");
    assert!(matches!(
        err,
        IngestError::UnexpectedContentType { observed: None, .. }
    ));
    server.join().expect("server thread");
}

#[test]
fn error_status_is_a_network_error() {
    let (url, server) = serve_once(Some("text/csv"), "404 Not Found", "");
    let fetcher = HttpFetcher::new().expect("client");
    let err = fetcher.fetch(&url).expect_err("404");
    assert!(matches!(err, IngestError::Network { .. }));
    assert!(err.to_string().contains("404"));
    server.join().expect("server thread");
}

#[test]
fn unreachable_host_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    let fetcher = HttpFetcher::new().expect("client");
    let err = fetcher
        .fetch(&format!("http://{addr}/export"))
        .expect_err("connection refused");
    assert!(matches!(err, IngestError::Network { .. }));
}
