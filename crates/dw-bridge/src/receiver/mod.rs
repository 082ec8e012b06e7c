//! Event receiver for host notifications
//!
//! Turns broadcasts from the host service into a typed, ordered stream:
//! decode notifications become [`ScanRecord`]s, every other matching
//! notification is passed through untouched.

mod listener;

pub use listener::EventReceiver;

use std::pin::Pin;
use std::task::{Context, Poll};

use dw_core::{HostMessage, ScanRecord};
use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// An event delivered by the receiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// A successful decode
    Scan(ScanRecord),
    /// Any other matching notification (command results, query replies)
    HostNotification(HostMessage),
}

impl BridgeEvent {
    pub fn as_scan(&self) -> Option<&ScanRecord> {
        match self {
            Self::Scan(scan) => Some(scan),
            Self::HostNotification(_) => None,
        }
    }

    pub fn into_scan(self) -> Option<ScanRecord> {
        match self {
            Self::Scan(scan) => Some(scan),
            Self::HostNotification(_) => None,
        }
    }
}

/// Stream of events for one registration
///
/// Ends when the registration is released by
/// [`EventReceiver::unsubscribe`], replaced by a later subscribe, or the
/// transport closes.
pub struct EventStream {
    registration_id: String,
    inner: UnboundedReceiverStream<BridgeEvent>,
}

impl EventStream {
    pub(crate) fn new(registration_id: String, rx: mpsc::UnboundedReceiver<BridgeEvent>) -> Self {
        Self {
            registration_id,
            inner: UnboundedReceiverStream::new(rx),
        }
    }

    /// Identifier of the registration feeding this stream
    pub fn registration_id(&self) -> &str {
        &self.registration_id
    }
}

impl Stream for EventStream {
    type Item = BridgeEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
