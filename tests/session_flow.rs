//! Session lifecycle integration tests against a canned in-process backend.
//!
//! The stub server speaks just enough HTTP/1.1 to satisfy reqwest and records
//! every request line, so the tests can assert not only on outcomes but on
//! which endpoints were (and were not) contacted.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use quantflow_sdk::prelude::*;

struct StubBackend {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubBackend {
    /// Serve `route` for every incoming request, forever (thread exits with
    /// the process).
    fn start<F>(route: F) -> Self
    where
        F: Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub");
        let base_url = format!("http://{}", listener.local_addr().expect("addr"));
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };

                let mut buf = Vec::new();
                let mut chunk = [0_u8; 1024];
                let (method, path) = loop {
                    let Ok(n) = stream.read(&mut chunk) else { break ("".into(), "".into()) };
                    if n == 0 {
                        break ("".into(), "".into());
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    if let Some(end) = find_headers_end(&buf) {
                        let head = String::from_utf8_lossy(&buf[..end]).to_string();
                        let mut first = head.lines().next().unwrap_or("").split(' ');
                        let method = first.next().unwrap_or("").to_string();
                        let path = first.next().unwrap_or("").to_string();

                        // drain the body so the client sees a clean response
                        let body_len = content_length(&head);
                        let mut have = buf.len() - end;
                        while have < body_len {
                            let Ok(n) = stream.read(&mut chunk) else { break };
                            if n == 0 {
                                break;
                            }
                            have += n;
                        }
                        break (method, path);
                    }
                };
                if method.is_empty() {
                    continue;
                }

                log.lock().expect("log").push(format!("{} {}", method, path));
                let (status, body) = route(&method, &path);
                let reason = match status {
                    200 => "OK",
                    202 => "Accepted",
                    401 => "Unauthorized",
                    _ => "Error",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        Self { base_url, requests }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("log").clone()
    }
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

fn content_length(head: &str) -> usize {
    head.lines()
        .find_map(|l| {
            let (name, value) = l.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().ok())?
        })
        .unwrap_or(0)
}

fn user_json() -> &'static str {
    r#"{"id":"u1","email":"trader@example.com","full_name":"Trader One","provider":"email","email_verified":true,"settings":{"timezone":"UTC","currency":"USD","notifications":true}}"#
}

fn envelope(data: &str) -> (u16, String) {
    (200, format!(r#"{{"success":true,"data":{}}}"#, data))
}

fn client_for(backend: &StubBackend) -> QuantflowClient {
    QuantflowClient::builder()
        .base_url(&backend.base_url)
        .app_origin("https://app.example.com")
        .build()
        .expect("build client")
}

fn fresh_bundle() -> TokenBundle {
    TokenBundle::from_expires_in("stored-acc".into(), "stored-ref".into(), 3600)
}

#[tokio::test]
async fn restore_with_valid_token_fetches_profile_once() {
    let backend = StubBackend::start(|method, path| match (method, path) {
        ("GET", "/v1/users/me") => envelope(user_json()),
        _ => (404, String::new()),
    });
    let store = std::sync::Arc::new(MemoryTokenStore::new());
    store.save(&fresh_bundle());
    let client = QuantflowClient::builder()
        .base_url(&backend.base_url)
        .token_store(store)
        .build()
        .expect("build client");

    let session = client.session().restore().await.expect("restore").expect("session");
    assert_eq!(session.user_id, "u1");
    assert_eq!(session.display_name, "Trader One");
    assert!(client.session().is_authenticated().await);
    // a fresh token goes straight to the profile endpoint, exactly once
    assert_eq!(backend.requests(), vec!["GET /v1/users/me"]);
}

#[tokio::test]
async fn sign_in_persists_bundle_and_sets_welcome_flag() {
    let backend = StubBackend::start(|method, path| match (method, path) {
        ("POST", "/v1/auth/signin") => envelope(&format!(
            r#"{{"access_token":"acc1","refresh_token":"ref1","expires_in":3600,"user":{}}}"#,
            user_json()
        )),
        _ => (404, String::new()),
    });
    let store = std::sync::Arc::new(MemoryTokenStore::new());
    let client = QuantflowClient::builder()
        .base_url(&backend.base_url)
        .token_store(store.clone())
        .build()
        .expect("build client");

    let session = client
        .session()
        .sign_in("trader@example.com", "hunter2")
        .await
        .expect("sign in");
    assert_eq!(session.email, "trader@example.com");
    assert!(client.session().just_signed_in().await);

    let bundle = store.load().expect("bundle persisted");
    assert_eq!(bundle.access_token, "acc1");
    assert_eq!(bundle.refresh_token, "ref1");
    assert!(bundle.is_fresh());
}

#[tokio::test]
async fn stale_token_is_refreshed_then_profile_fetched() {
    let backend = StubBackend::start(|method, path| match (method, path) {
        ("POST", "/v1/auth/refresh") => envelope(
            r#"{"access_token":"acc2","expires_in":3600,"refresh_token":"ref2"}"#,
        ),
        ("GET", "/v1/users/me") => envelope(user_json()),
        _ => (404, String::new()),
    });
    let store = std::sync::Arc::new(MemoryTokenStore::new());
    store.save(&TokenBundle::from_expires_in("old-acc".into(), "old-ref".into(), 30));
    let client = QuantflowClient::builder()
        .base_url(&backend.base_url)
        .token_store(store.clone())
        .build()
        .expect("build client");

    let session = client.session().restore().await.expect("restore").expect("session");
    assert_eq!(session.user_id, "u1");

    // rotated refresh token was persisted along with the new access token
    let bundle = store.load().expect("bundle");
    assert_eq!(bundle.access_token, "acc2");
    assert_eq!(bundle.refresh_token, "ref2");

    assert_eq!(
        backend.requests(),
        vec!["POST /v1/auth/refresh", "GET /v1/users/me"]
    );
}

#[tokio::test]
async fn equity_fetch_polls_through_warmup() {
    static HITS: AtomicUsize = AtomicUsize::new(0);

    let backend = StubBackend::start(|method, path| {
        if method == "GET" && path.starts_with("/v1/tradings/trd_1/equity-curve") {
            if HITS.fetch_add(1, Ordering::SeqCst) < 2 {
                return (202, String::new());
            }
            return envelope(
                r#"{"points":[{"timestamp":1700000000000,"equity":"1050","quote_balance":"500","stock_balance":"0.01","stock_price":"55000"}],"baseline_price":"50000","initial_funds":"1000"}"#,
            );
        }
        (404, String::new())
    });
    let client = client_for(&backend);

    let curve = client
        .equity()
        .fetch(&TradingId::from("trd_1"), Timeframe::Hour1, None, None)
        .await
        .expect("curve after warmup");
    assert_eq!(curve.points.len(), 1);
    // two 202 polls, then the real answer
    assert_eq!(backend.requests().len(), 3);
}

#[tokio::test]
async fn delete_acknowledged_without_payload_is_success() {
    let backend = StubBackend::start(|method, path| match (method, path) {
        ("DELETE", "/v1/tradings/trd_9") => (200, r#"{"success":true}"#.to_string()),
        _ => (404, String::new()),
    });
    let client = client_for(&backend);

    // a bare acknowledgement must not read as a missing-data failure
    client
        .tradings()
        .delete(&TradingId::from("trd_9"))
        .await
        .expect("delete");
    assert_eq!(backend.requests(), vec!["DELETE /v1/tradings/trd_9"]);
}

#[tokio::test]
async fn application_level_failure_surfaces_embedded_code() {
    let backend = StubBackend::start(|method, path| match (method, path) {
        ("POST", "/v1/auth/signin") => (
            200,
            r#"{"success":false,"error":{"code":"invalid_credentials","message":"Wrong email or password"}}"#.to_string(),
        ),
        _ => (404, String::new()),
    });
    let client = client_for(&backend);

    let err = client
        .session()
        .sign_in("trader@example.com", "wrong")
        .await
        .expect_err("sign in must fail");
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(!client.session().is_authenticated().await);
}
