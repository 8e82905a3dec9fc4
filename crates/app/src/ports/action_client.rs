//! Action client port: user-initiated POSTs (start, stop, backup, settings, …).

use std::future::Future;

use palette_domain::error::ConsoleError;

/// Posts form data to an action endpoint.
pub trait ActionClient {
    /// POST `form` to `endpoint` (a path such as `/rest/manage`).
    ///
    /// Failures are reported as [`ConsoleError::Action`] naming the URL,
    /// the HTTP status and the error text. They are never retried.
    fn post_action(
        &self,
        endpoint: &str,
        form: &[(String, String)],
    ) -> impl Future<Output = Result<serde_json::Value, ConsoleError>> + Send;
}
