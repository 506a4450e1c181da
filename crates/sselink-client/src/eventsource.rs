use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::{Future, Stream};
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use sselink_core::errors::LinkError;
use sselink_core::transport::{Transport, TransportEvent, TransportStream};

use crate::wire::WireDecoder;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Concrete transport: HTTP GET with `Accept: text/event-stream`, wire-level
/// SSE decoding, and JSON decoding of each data payload.
pub struct EventSourceTransport {
    client: Client,
    idle_timeout: Duration,
}

impl EventSourceTransport {
    pub fn new() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }

    /// Timeouts belong to the transport, not the connection manager: a stream
    /// with no data for `idle_timeout` is reported as failed.
    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            idle_timeout,
        }
    }
}

impl Default for EventSourceTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for EventSourceTransport {
    async fn open(&self, url: &str) -> Result<TransportStream, LinkError> {
        let resp = self
            .client
            .get(url)
            .header("accept", "text/event-stream")
            .send()
            .await
            .map_err(|e| LinkError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LinkError::Transport(format!(
                "unexpected status {}",
                resp.status().as_u16()
            )));
        }

        Ok(Box::pin(EventSourceStream::new(
            resp.bytes_stream(),
            self.idle_timeout,
        )))
    }
}

/// Wraps a byte stream and yields transport events: `Opened` first, then one
/// `Message` per decoded frame payload. If no data arrives within the idle
/// window, a `Failed` event is emitted.
struct EventSourceStream {
    inner: Pin<Box<dyn Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send>>,
    decoder: WireDecoder,
    pending: Vec<TransportEvent>,
    opened: bool,
    idle_deadline: Pin<Box<tokio::time::Sleep>>,
    idle_duration: Duration,
}

impl EventSourceStream {
    fn new(
        byte_stream: impl Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            inner: Box::pin(byte_stream),
            decoder: WireDecoder::new(),
            pending: Vec::new(),
            opened: false,
            idle_deadline: Box::pin(tokio::time::sleep(idle_timeout)),
            idle_duration: idle_timeout,
        }
    }

    fn decode_payloads(&mut self, payloads: Vec<String>) {
        for payload in payloads {
            match serde_json::from_str::<Value>(&payload) {
                Ok(value) => self.pending.push(TransportEvent::Message(value)),
                Err(e) => {
                    // Undecodable payloads are dropped, not fatal.
                    warn!(error = %e, "dropping non-JSON data payload");
                }
            }
        }
    }
}

impl Stream for EventSourceStream {
    type Item = TransportEvent;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        if !self.opened {
            self.opened = true;
            return std::task::Poll::Ready(Some(TransportEvent::Opened));
        }

        if !self.pending.is_empty() {
            return std::task::Poll::Ready(Some(self.pending.remove(0)));
        }

        loop {
            match self.inner.as_mut().poll_next(cx) {
                std::task::Poll::Ready(Some(Ok(bytes))) => {
                    // Data received: reset the idle timer
                    let new_deadline = tokio::time::Instant::now() + self.idle_duration;
                    self.idle_deadline.as_mut().reset(new_deadline);

                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    let payloads = self.decoder.push(&text);
                    self.decode_payloads(payloads);

                    if !self.pending.is_empty() {
                        return std::task::Poll::Ready(Some(self.pending.remove(0)));
                    }
                }
                std::task::Poll::Ready(Some(Err(e))) => {
                    return std::task::Poll::Ready(Some(TransportEvent::Failed(e.to_string())));
                }
                std::task::Poll::Ready(None) => {
                    // Stream ended: flush any trailing event
                    if let Some(payload) = self.decoder.finish() {
                        self.decode_payloads(vec![payload]);
                        if !self.pending.is_empty() {
                            return std::task::Poll::Ready(Some(self.pending.remove(0)));
                        }
                    }
                    return std::task::Poll::Ready(None);
                }
                std::task::Poll::Pending => {
                    if self.idle_deadline.as_mut().poll(cx).is_ready() {
                        return std::task::Poll::Ready(Some(TransportEvent::Failed(format!(
                            "idle timeout after {}s",
                            self.idle_duration.as_secs()
                        ))));
                    }
                    return std::task::Poll::Pending;
                }
            }
        }
    }
}
