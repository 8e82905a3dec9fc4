//! In-process `state` channel backed by a tokio broadcast channel.
//!
//! Besides fan-out, the bus remembers the last accepted payload. A
//! subscriber that joins late starts from that payload, and one that falls
//! behind skips the overwritten payloads instead of failing: every
//! consumer of the channel only cares about the most recent server state.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::{Stream, StreamExt};

use palette_domain::error::ConsoleError;
use palette_domain::payload::MonitorPayload;

use crate::ports::StatePublisher;

/// In-process state bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers; the
/// payload is still kept as the latest state.
pub struct InProcessStateBus {
    sender: broadcast::Sender<MonitorPayload>,
    latest: Mutex<Option<MonitorPayload>>,
}

impl InProcessStateBus {
    /// Create a new state bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            latest: Mutex::new(None),
        }
    }

    /// Raw receiver of the payloads published *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorPayload> {
        self.sender.subscribe()
    }

    /// Last payload published on the bus.
    #[must_use]
    pub fn latest(&self) -> Option<MonitorPayload> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stream of state payloads, starting with the latest one (if any).
    ///
    /// Payloads overwritten before this subscriber read them are skipped.
    /// The stream ends when the bus is dropped.
    pub fn updates(&self) -> impl Stream<Item = MonitorPayload> + Send + Unpin + 'static {
        // Subscribe first so a payload published in between is not lost.
        let receiver = self.sender.subscribe();
        let current = self.latest();
        tokio_stream::iter(current).chain(BroadcastStream::new(receiver).filter_map(
            |item| match item {
                Ok(payload) => Some(payload),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "state subscriber fell behind, skipping payloads");
                    None
                }
            },
        ))
    }
}

impl StatePublisher for InProcessStateBus {
    fn publish(
        &self,
        payload: MonitorPayload,
    ) -> impl Future<Output = Result<(), ConsoleError>> + Send {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload.clone());
        if self.sender.send(payload).is_err() {
            tracing::trace!("no state subscriber");
        }
        async { Ok(()) }
    }
}
