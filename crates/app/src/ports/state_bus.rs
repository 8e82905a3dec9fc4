//! State bus port: publish/subscribe for changed status payloads.

use std::future::Future;

use palette_domain::error::ConsoleError;
use palette_domain::payload::MonitorPayload;

/// Publishes accepted monitor payloads on the `state` channel.
pub trait StatePublisher {
    /// Publish a payload to all current subscribers.
    fn publish(
        &self,
        payload: MonitorPayload,
    ) -> impl Future<Output = Result<(), ConsoleError>> + Send;
}

impl<T: StatePublisher + Send + Sync> StatePublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        payload: MonitorPayload,
    ) -> impl Future<Output = Result<(), ConsoleError>> + Send {
        (**self).publish(payload)
    }
}
