use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;
use serde_json::Value;

use sselink_core::errors::LinkError;
use sselink_core::transport::{Transport, TransportEvent, TransportStream};

/// Pre-programmed transport behavior for deterministic testing: each call to
/// `open()` consumes the next script.
pub enum MockScript {
    /// Yield a sequence of transport events, then end the stream.
    Events(Vec<TransportEvent>),
    /// Fail the `open()` call itself (acquisition failure).
    Error(LinkError),
    /// Wait a duration, then apply the inner script.
    Delay(Duration, Box<MockScript>),
}

impl MockScript {
    /// Convenience: an opened stream replaying the given raw messages.
    pub fn open_with_messages(messages: Vec<Value>) -> Self {
        let mut events = vec![TransportEvent::Opened];
        events.extend(messages.into_iter().map(TransportEvent::Message));
        Self::Events(events)
    }

    /// Convenience: an opened stream that fails immediately after.
    pub fn open_then_fail(info: &str) -> Self {
        Self::Events(vec![
            TransportEvent::Opened,
            TransportEvent::Failed(info.to_string()),
        ])
    }
}

/// Transport that replays canned scripts, one per `open()` call in order.
pub struct MockTransport {
    scripts: Mutex<VecDeque<MockScript>>,
    open_count: AtomicUsize,
    last_url: Mutex<Option<String>>,
}

impl MockTransport {
    pub fn new(scripts: Vec<MockScript>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            open_count: AtomicUsize::new(0),
            last_url: Mutex::new(None),
        }
    }

    /// How many times `open()` has been called.
    pub fn open_count(&self) -> usize {
        self.open_count.load(Ordering::Relaxed)
    }

    /// The URL passed to the most recent `open()`.
    pub fn last_url(&self) -> Option<String> {
        self.last_url.lock().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn open(&self, url: &str) -> Result<TransportStream, LinkError> {
        self.open_count.fetch_add(1, Ordering::Relaxed);
        *self.last_url.lock() = Some(url.to_string());

        let script = self
            .scripts
            .lock()
            .pop_front()
            .ok_or_else(|| LinkError::Transport("MockTransport: no script configured".into()))?;

        let mut current = script;
        loop {
            match current {
                MockScript::Events(events) => {
                    return Ok(Box::pin(stream::iter(events)));
                }
                MockScript::Error(e) => return Err(e),
                MockScript::Delay(duration, inner) => {
                    tokio::time::sleep(duration).await;
                    current = *inner;
                }
            }
        }
    }
}
