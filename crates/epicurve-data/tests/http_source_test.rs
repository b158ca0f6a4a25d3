//! Integration tests for pulling feeds over HTTP from a local server

use epicurve_data::{DEFAULT_DATE_FORMAT, DataError, HttpSource, LoaderConfig, SeriesSource};
use ndarray::array;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

const FEED: &str = "Province/State,Country/Region,Lat,Long,1/22/20\n,Malaysia,4.2,101.9,7\n";

/// Serve one request with `response` after `delay`, returning the feed URL.
fn serve_once(response: String, delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        thread::sleep(delay);
        // The client may already have given up.
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
    });

    format!("http://{addr}/feed.csv")
}

fn response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn source(timeout: Duration) -> HttpSource {
    HttpSource::new(LoaderConfig {
        timeout,
        ..LoaderConfig::default()
    })
    .unwrap()
}

#[test]
fn test_success_parses_feed() {
    let url = serve_once(response("200 OK", FEED), Duration::ZERO);

    let table = source(Duration::from_secs(5))
        .pull(&url, DEFAULT_DATE_FORMAT)
        .unwrap();

    assert_eq!(table.matrix(), &array![[7]]);
    assert_eq!(table.countries(), vec!["malaysia".to_string()]);
}

#[test]
fn test_not_found_is_fetch_error() {
    let url = serve_once(response("404 Not Found", ""), Duration::ZERO);

    let err = source(Duration::from_secs(5))
        .pull(&url, DEFAULT_DATE_FORMAT)
        .unwrap_err();

    match err {
        DataError::Fetch { url: failed, status } => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_slow_reply_is_timeout() {
    let url = serve_once(response("200 OK", FEED), Duration::from_secs(3));
    let timeout = Duration::from_millis(300);

    let err = source(timeout)
        .pull(&url, DEFAULT_DATE_FORMAT)
        .unwrap_err();

    assert!(
        matches!(err, DataError::Timeout { timeout: t, .. } if t == timeout),
        "{err}"
    );
}
