//! End-to-end tests for the full console stack.
//!
//! Each test serves a fake `/rest/monitor` with axum on an ephemeral port
//! and drives the real reqwest client, cookie jar, terminal view and
//! status poller against it.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use palette_adapter_cookie_file::FileCookieJar;
use palette_adapter_http_reqwest::ReqwestClient;
use palette_adapter_terminal::TerminalView;
use palette_app::event_bus::InProcessStateBus;
use palette_app::ports::CookieJar;
use palette_app::services::status_poller::{Monitor, PollerConfig, StatusPoller};
use palette_domain::cookie::{STATUS_COLOR_COOKIE, STATUS_TEXT_COOKIE};

// ---------------------------------------------------------------------------
// Fake server
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct FakeServer {
    queries: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<bool>>,
}

impl FakeServer {
    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn fail(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

async fn monitor(State(server): State<FakeServer>, RawQuery(query): RawQuery) -> Response {
    server
        .queries
        .lock()
        .unwrap()
        .push(query.unwrap_or_default());
    if *server.failing.lock().unwrap() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(serde_json::json!({
        "state": "RUNNING",
        "text": "Running",
        "color": "green",
        "events": [{"eventid": 5, "reference-time": 1000.5, "title": "Server started", "level": "I"}],
        "reference-time": 1000.5,
        "event-count": 1,
        "allowable-actions": ["stop", "backup"],
        "connected": true
    }))
    .into_response()
}

async fn serve(server: FakeServer) -> String {
    let router = Router::new()
        .route("/rest/monitor", get(monitor))
        .with_state(server);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Console stack
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

type ConsoleMonitor =
    Monitor<ReqwestClient, Arc<FileCookieJar>, TerminalView<SharedOutput>, InProcessStateBus>;

fn console(base_url: &str, jar: Arc<FileCookieJar>, output: SharedOutput) -> ConsoleMonitor {
    let client = ReqwestClient::new(base_url, Duration::from_secs(2)).unwrap();
    let config = PollerConfig {
        interval: Duration::from_millis(50),
        ..PollerConfig::default()
    };
    let poller = StatusPoller::new(
        client,
        jar,
        TerminalView::new(output),
        InProcessStateBus::new(16),
        config,
    );
    Monitor::new(poller)
}

async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 2 seconds");
}

fn cookie(jar: &FileCookieJar, name: &str) -> Option<String> {
    jar.get(name).unwrap().map(|c| c.raw_value().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_apply_first_status_and_persist_cookies() {
    let server = FakeServer::default();
    let base = serve(server.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let jar = Arc::new(FileCookieJar::open(dir.path().join("cookies.json")).unwrap());
    let output = SharedOutput::default();

    let mut monitor = console(&base, jar.clone(), output.clone());
    monitor.start_monitor(true).await;
    wait_for(|| cookie(&jar, STATUS_COLOR_COOKIE).is_some()).await;
    monitor.stop().await;

    assert_eq!(server.queries()[0], "seq=0&limit=25&ref=null");
    assert_eq!(cookie(&jar, STATUS_COLOR_COOKIE).as_deref(), Some("green"));
    assert_eq!(cookie(&jar, STATUS_TEXT_COOKIE).as_deref(), Some("Running"));

    let text = output.text();
    assert!(text.contains("[green] Running"));
    assert!(text.contains("Server started"));
    assert!(text.contains("1 events, page 1 of 1"));
    assert!(!text.contains("[n]ext"));
}

#[tokio::test]
async fn should_keep_polling_with_reference_time_of_first_event() {
    let server = FakeServer::default();
    let base = serve(server.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let jar = Arc::new(FileCookieJar::open(dir.path().join("cookies.json")).unwrap());

    let mut monitor = console(&base, jar, SharedOutput::default());
    monitor.start_monitor(true).await;
    wait_for(|| server.queries().len() >= 3).await;
    monitor.stop().await;

    let queries = server.queries();
    assert_eq!(queries[1], "seq=1&limit=25&ref=1000.5");
    assert_eq!(queries[2], "seq=2&limit=25&ref=1000.5");
}

#[tokio::test]
async fn should_show_disconnected_status_while_server_fails() {
    let server = FakeServer::default();
    server.fail(true);
    let base = serve(server.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let jar = Arc::new(FileCookieJar::open(dir.path().join("cookies.json")).unwrap());
    let output = SharedOutput::default();

    let mut monitor = console(&base, jar.clone(), output.clone());
    monitor.start_monitor(true).await;
    wait_for(|| server.queries().len() >= 2).await;
    monitor.stop().await;

    assert_eq!(
        cookie(&jar, STATUS_TEXT_COOKIE).as_deref(),
        Some("Browser_Disconnected")
    );
    assert_eq!(cookie(&jar, STATUS_COLOR_COOKIE).as_deref(), Some("yellow"));
    assert!(output.text().contains("[yellow] Browser Disconnected"));
}

#[tokio::test]
async fn should_restore_last_status_on_restart() {
    let server = FakeServer::default();
    server.fail(true);
    let base = serve(server.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cookies.json");

    {
        let jar = Arc::new(FileCookieJar::open(&path).unwrap());
        let mut monitor = console(&base, jar.clone(), SharedOutput::default());
        monitor.start_monitor(false).await;
        wait_for(|| cookie(&jar, STATUS_COLOR_COOKIE).is_some()).await;
        monitor.stop().await;
    }

    let jar = Arc::new(FileCookieJar::open(&path).unwrap());
    let output = SharedOutput::default();
    let mut monitor = console(&base, jar, output.clone());
    monitor.start_monitor(false).await;
    monitor.stop().await;

    assert!(
        output
            .text()
            .starts_with("[?] Browser Disconnected\n[yellow] Browser Disconnected\n")
    );
}
