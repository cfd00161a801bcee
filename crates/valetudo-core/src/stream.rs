// ── Reactive status stream ──
//
// Subscription handle for consumers that want every freshly fetched status
// without polling the cache themselves.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Status;

/// A subscription to the engine's status updates.
///
/// Provides both point-in-time access and change notification via
/// `changed()` or by converting to a `Stream`.
pub struct StatusStream {
    current: Option<Arc<Status>>,
    receiver: watch::Receiver<Option<Arc<Status>>>,
}

impl StatusStream {
    pub(crate) fn new(receiver: watch::Receiver<Option<Arc<Status>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The status captured at subscription time (or at the last `changed()`).
    pub fn current(&self) -> Option<&Arc<Status>> {
        self.current.as_ref()
    }

    /// The most recently published status.
    pub fn latest(&self) -> Option<Arc<Status>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next fetched status.
    /// Returns `None` once the controller has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Status>> {
        loop {
            self.receiver.changed().await.ok()?;
            if let Some(status) = self.receiver.borrow_and_update().clone() {
                self.current = Some(Arc::clone(&status));
                return Some(status);
            }
        }
    }

    /// Convert into a `Stream` of future updates.
    pub fn into_stream(self) -> StatusWatchStream {
        StatusWatchStream {
            inner: WatchStream::from_changes(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct StatusWatchStream {
    inner: WatchStream<Option<Arc<Status>>>,
}

impl Stream for StatusWatchStream {
    type Item = Arc<Status>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Some(status))) => return Poll::Ready(Some(status)),
                Poll::Ready(Some(None)) => {}
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
