use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;

use crate::errors::LinkError;

/// Lifecycle and data signals produced by a transport after `open`.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportEvent {
    /// The stream is established.
    Opened,
    /// One decoded inbound message (structured JSON, not yet a frame).
    Message(Value),
    /// The transport failed; carries raw error info for `sse.error`.
    Failed(String),
}

/// The transport handle: an owned stream of events. Dropping it releases the
/// underlying resources, so handle release follows scope on every exit path.
pub type TransportStream = Pin<Box<dyn Stream<Item = TransportEvent> + Send>>;

/// External capability providing the actual network stream. Injected into the
/// connection manager so concrete mechanics stay out of the core and tests
/// can replay canned frames.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Acquire a handle scoped to `url`, requesting structured (JSON)
    /// decoding of inbound data.
    async fn open(&self, url: &str) -> Result<TransportStream, LinkError>;
}
