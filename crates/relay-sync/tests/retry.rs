//! Retry behavior of the vendor client against a live local endpoint.
//!
//! Each test serves a scripted response sequence from a loopback socket
//! and counts how many requests the adapter actually made.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use relay_sync::eventbrite::EventbriteAdapter;
use relay_sync::{Credentials, RetryConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn rate_limited() -> String {
    "HTTP/1.1 429 Too Many Requests\r\nretry-after: 0\r\ncontent-length: 0\r\nconnection: close\r\n\r\n".to_string()
}

fn forbidden() -> String {
    "HTTP/1.1 403 Forbidden\r\ncontent-length: 0\r\nconnection: close\r\n\r\n".to_string()
}

fn ok_json(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn quick_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        page_delay: Duration::ZERO,
    }
}

/// Serve the scripted responses, one connection each, counting requests.
async fn serve(responses: Vec<String>) -> (String, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&hits);
    tokio::spawn(async move {
        for response in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            // GET requests carry no body; the head arrives in one read.
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await.unwrap();
            counter.fetch_add(1, Ordering::SeqCst);
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
    });
    (format!("http://{addr}"), hits)
}

fn credentials() -> Credentials {
    Credentials {
        token: "test-token".into(),
    }
}

#[tokio::test]
async fn rate_limited_request_is_retried_after_the_advertised_delay() {
    let (base, hits) = serve(vec![rate_limited(), ok_json(r#"{"id":"user-1"}"#)]).await;
    let adapter = EventbriteAdapter::with_base_url(base, quick_retry(4));

    let check = adapter.test_connection(&credentials()).await;

    assert!(check.success, "got: {}", check.message);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn persistent_rate_limiting_exhausts_the_attempt_cap() {
    let (base, hits) = serve(vec![rate_limited(), rate_limited()]).await;
    let adapter = EventbriteAdapter::with_base_url(base, quick_retry(2));

    let check = adapter.test_connection(&credentials()).await;

    assert!(!check.success);
    assert!(check.message.contains("after 2 attempts"), "got: {}", check.message);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn permanent_error_is_never_retried() {
    let (base, hits) = serve(vec![forbidden()]).await;
    let adapter = EventbriteAdapter::with_base_url(base, quick_retry(4));

    let check = adapter.test_connection(&credentials()).await;

    assert!(!check.success);
    assert!(check.message.contains("403"), "got: {}", check.message);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
