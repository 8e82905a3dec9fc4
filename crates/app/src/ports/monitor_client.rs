//! Monitor client port: one status request against `/rest/monitor`.

use std::future::Future;

use palette_domain::error::ConsoleError;
use palette_domain::filter::MonitorQuery;
use palette_domain::payload::MonitorPayload;

/// Fetches the server status and the requested event window.
pub trait MonitorClient {
    /// Issue `GET /rest/monitor?{query}` and decode the body.
    ///
    /// Any failure (transport, non-2xx status, undecodable body) is an
    /// error; the poller does not distinguish between them.
    fn fetch_status(
        &self,
        query: &MonitorQuery,
    ) -> impl Future<Output = Result<MonitorPayload, ConsoleError>> + Send;
}

impl<T: MonitorClient + Send + Sync> MonitorClient for std::sync::Arc<T> {
    fn fetch_status(
        &self,
        query: &MonitorQuery,
    ) -> impl Future<Output = Result<MonitorPayload, ConsoleError>> + Send {
        (**self).fetch_status(query)
    }
}
