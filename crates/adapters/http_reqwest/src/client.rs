//! reqwest-backed implementation of the monitor and action ports.

use std::future::Future;
use std::time::Duration;

use palette_app::ports::{ActionClient, MonitorClient};
use palette_domain::error::{ActionError, ConsoleError};
use palette_domain::filter::MonitorQuery;
use palette_domain::payload::MonitorPayload;

use crate::error::HttpError;

/// Path of the status endpoint.
pub const MONITOR_PATH: &str = "/rest/monitor";

/// HTTP client bound to one palette server.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestClient {
    /// Build a client for `base_url` (e.g. `http://localhost:8080`).
    ///
    /// `timeout` bounds every request; a timed-out poll is reported like
    /// any other transport failure.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] for an empty or non-http URL and
    /// [`HttpError::Build`] if the TLS backend cannot be initialised.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(HttpError::InvalidUrl(base_url.to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HttpError::Build)?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of a monitor request.
    #[must_use]
    pub fn monitor_url(&self, query: &MonitorQuery) -> String {
        format!("{}{MONITOR_PATH}?{query}", self.base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn fetch(client: reqwest::Client, url: String) -> Result<MonitorPayload, HttpError> {
    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(source) => return Err(HttpError::Request { url, source }),
    };
    let status = response.status();
    if !status.is_success() {
        return Err(HttpError::Status {
            url,
            status: status.as_u16(),
        });
    }
    match response.json::<MonitorPayload>().await {
        Ok(payload) => Ok(payload),
        Err(source) => Err(HttpError::Decode { url, source }),
    }
}

impl MonitorClient for ReqwestClient {
    fn fetch_status(
        &self,
        query: &MonitorQuery,
    ) -> impl Future<Output = Result<MonitorPayload, ConsoleError>> + Send {
        let client = self.client.clone();
        let url = self.monitor_url(query);
        async move { fetch(client, url).await.map_err(ConsoleError::from) }
    }
}

async fn post(
    client: reqwest::Client,
    url: String,
    form: Vec<(String, String)>,
) -> Result<serde_json::Value, ActionError> {
    let response = client.post(&url).form(&form).send().await.map_err(|err| {
        let status = err.status().map(|s| s.as_u16());
        ActionError {
            url: url.clone(),
            status,
            message: err.to_string(),
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ActionError {
            url,
            status: Some(status.as_u16()),
            message: status.canonical_reason().unwrap_or("error").to_string(),
        });
    }

    let body = response.text().await.map_err(|err| ActionError {
        url: url.clone(),
        status: Some(status.as_u16()),
        message: err.to_string(),
    })?;
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(&body).map_err(|err| ActionError {
        url,
        status: Some(status.as_u16()),
        message: err.to_string(),
    })
}

impl ActionClient for ReqwestClient {
    fn post_action(
        &self,
        endpoint: &str,
        form: &[(String, String)],
    ) -> impl Future<Output = Result<serde_json::Value, ConsoleError>> + Send {
        let client = self.client.clone();
        let url = self.url(endpoint);
        let form = form.to_vec();
        async move {
            tracing::info!(%url, "posting action");
            post(client, url, form).await.map_err(ConsoleError::from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::extract::{Form, Query};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base_url: &str) -> ReqwestClient {
        ReqwestClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    fn query(include_events: bool) -> MonitorQuery {
        let mut filter = palette_domain::filter::EventFilter::default();
        filter.build_query(include_events, &std::collections::BTreeMap::new())
    }

    #[test]
    fn should_reject_url_without_scheme() {
        let result = ReqwestClient::new("palette.local", Duration::from_secs(1));
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }

    #[test]
    fn should_build_monitor_url_without_double_slash() {
        let client = client("http://palette.local:8080/");
        assert_eq!(
            client.monitor_url(&query(false)),
            "http://palette.local:8080/rest/monitor?seq=0&event=false"
        );
    }

    #[tokio::test]
    async fn should_decode_monitor_payload() {
        let router = Router::new().route(
            MONITOR_PATH,
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(serde_json::json!({
                    "text": "Running",
                    "color": "green",
                    "seq": params.get("seq"),
                }))
            }),
        );
        let base = serve(router).await;

        let payload = client(&base).fetch_status(&query(true)).await.unwrap();

        assert_eq!(payload.text.as_deref(), Some("Running"));
        assert_eq!(payload.extra.get("seq"), Some(&serde_json::json!("0")));
    }

    #[tokio::test]
    async fn should_decode_status_when_event_view_is_malformed() {
        let router = Router::new().route(
            MONITOR_PATH,
            get(|| async {
                Json(serde_json::json!({
                    "text": "Running",
                    "color": "green",
                    "events": [{"title": "no id"}],
                    "config": [{"name": "type", "options": [{"item": "All Types"}]}]
                }))
            }),
        );
        let base = serve(router).await;

        let payload = client(&base).fetch_status(&query(true)).await.unwrap();

        assert_eq!(payload.text.as_deref(), Some("Running"));
        assert!(payload.events.is_none());
        assert_eq!(payload.config.unwrap()[0].options[0].item, "All Types");
    }

    #[tokio::test]
    async fn should_report_server_error_as_transport_error() {
        let router = Router::new().route(
            MONITOR_PATH,
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base = serve(router).await;

        let err = client(&base).fetch_status(&query(true)).await.unwrap_err();

        assert!(matches!(err, ConsoleError::Transport(_)));
    }

    #[tokio::test]
    async fn should_report_invalid_body_as_transport_error() {
        let router = Router::new().route(MONITOR_PATH, get(|| async { "<html>" }));
        let base = serve(router).await;

        let err = client(&base).fetch_status(&query(true)).await.unwrap_err();

        assert!(matches!(err, ConsoleError::Transport(_)));
    }

    #[tokio::test]
    async fn should_post_action_form() {
        let router = Router::new().route(
            "/rest/manage",
            post(|Form(form): Form<HashMap<String, String>>| async move {
                Json(serde_json::json!({ "status": "OK", "action": form.get("action") }))
            }),
        );
        let base = serve(router).await;
        let form = vec![("action".to_string(), "start".to_string())];

        let body = client(&base).post_action("/rest/manage", &form).await.unwrap();

        assert_eq!(body["action"], "start");
    }

    #[tokio::test]
    async fn should_name_url_and_status_on_action_failure() {
        let router = Router::new().route(
            "/rest/backup",
            post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let base = serve(router).await;
        let form = vec![("action".to_string(), "backup".to_string())];

        let err = client(&base)
            .post_action("/rest/backup", &form)
            .await
            .unwrap_err();

        let ConsoleError::Action(err) = err else {
            panic!("expected an action error, got {err:?}");
        };
        assert_eq!(err.status, Some(503));
        assert_eq!(
            err.to_string(),
            format!("{base}/rest/backup: 503 (Service Unavailable)")
        );
    }

    #[tokio::test]
    async fn should_accept_empty_action_response() {
        let router = Router::new().route("/rest/manage", post(|| async { StatusCode::OK }));
        let base = serve(router).await;
        let form = vec![("action".to_string(), "ziplogs".to_string())];

        let body = client(&base).post_action("/rest/manage", &form).await.unwrap();

        assert_eq!(body, serde_json::Value::Null);
    }
}
