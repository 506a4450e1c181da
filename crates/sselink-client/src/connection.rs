use std::sync::Arc;

use futures::StreamExt;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use sselink_core::errors::LinkError;
use sselink_core::frame::Frame;
use sselink_core::subscription::Subscription;
use sselink_core::transport::{Transport, TransportEvent, TransportStream};

use crate::dispatch;
use crate::subscriber::Subscriber;

/// Connection lifecycle. `Error` does not transition back on its own: the
/// manager performs no retry, the state holds until `close()` or a new
/// subscription/connection pair replaces this one. `Closed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Open,
    Error,
    Closed,
}

/// Owns the transport handle for one subscription and drives its state
/// transitions. Bound 1:1 to a subscriber; inbound data flows through the
/// frame parser and the dispatcher from a single read loop, so the
/// subscriber observes events in exact transport arrival order.
pub struct Connection {
    transport: Arc<dyn Transport>,
    subscriber: Arc<Subscriber>,
    state: Arc<RwLock<ConnectionState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Connection {
    pub fn new(transport: Arc<dyn Transport>, subscriber: Arc<Subscriber>) -> Self {
        Self {
            transport,
            subscriber,
            state: Arc::new(RwLock::new(ConnectionState::Idle)),
            task: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    pub fn subscriber(&self) -> &Arc<Subscriber> {
        &self.subscriber
    }

    /// Acquire a transport handle for the subscription's resolved URL and
    /// spawn the read loop. Transport-acquisition failure is not a fault:
    /// it transitions to `Error` and dispatches one `sse.error`.
    pub async fn open(&self, subscription: &Subscription) -> Result<(), LinkError> {
        let events = match self.acquire(subscription).await? {
            Some(events) => events,
            None => return Ok(()),
        };

        let state = Arc::clone(&self.state);
        let subscriber = Arc::clone(&self.subscriber);
        let handle = tokio::spawn(async move {
            drive(events, state, subscriber).await;
        });
        *self.task.lock() = Some(handle);
        Ok(())
    }

    /// Like [`open`](Self::open), but drives the read loop inline and returns
    /// the final state. Used by the reconnect supervisor.
    pub async fn run(&self, subscription: &Subscription) -> Result<ConnectionState, LinkError> {
        if let Some(events) = self.acquire(subscription).await? {
            drive(events, Arc::clone(&self.state), Arc::clone(&self.subscriber)).await;
        }
        Ok(self.state())
    }

    async fn acquire(
        &self,
        subscription: &Subscription,
    ) -> Result<Option<TransportStream>, LinkError> {
        {
            let mut state = self.state.write();
            if *state != ConnectionState::Idle {
                return Err(LinkError::AlreadyStarted);
            }
            *state = ConnectionState::Connecting;
        }
        debug!(url = %subscription.resolved_url, "opening transport");

        match self.transport.open(&subscription.resolved_url).await {
            Ok(events) => Ok(Some(events)),
            Err(e) => {
                warn!(error = %e, "transport acquisition failed");
                *self.state.write() = ConnectionState::Error;
                dispatch::dispatch_error(&self.subscriber, &Value::String(e.to_string()));
                Ok(None)
            }
        }
    }

    /// Wait for the spawned read loop to finish (stream end or error).
    pub async fn join(&self) {
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Tear down: release the transport handle and transition to `Closed`.
    /// Reachable from any state; idempotent once closed.
    pub fn close(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
        let mut state = self.state.write();
        if *state != ConnectionState::Closed {
            debug!("connection closed");
            *state = ConnectionState::Closed;
        }
    }
}

/// Read loop: one transport event at a time, to completion, so per-subscriber
/// delivery order equals arrival order. The stream (and with it the transport
/// handle) is dropped on every exit path.
async fn drive(
    mut events: TransportStream,
    state: Arc<RwLock<ConnectionState>>,
    subscriber: Arc<Subscriber>,
) {
    while let Some(event) = events.next().await {
        match event {
            TransportEvent::Opened => {
                debug!(subscriber = %subscriber.id(), "stream open");
                *state.write() = ConnectionState::Open;
                dispatch::dispatch_open(&subscriber);
            }
            TransportEvent::Message(raw) => {
                if *state.read() != ConnectionState::Open {
                    continue;
                }
                if let Some(frame) = Frame::parse(&raw) {
                    dispatch::dispatch_frame(&subscriber, &frame);
                }
            }
            TransportEvent::Failed(info) => {
                warn!(subscriber = %subscriber.id(), error = %info, "transport failed");
                *state.write() = ConnectionState::Error;
                dispatch::dispatch_error(&subscriber, &Value::String(info));
                // No retry here: remaining events are not consumed.
                break;
            }
        }
    }
    debug!(subscriber = %subscriber.id(), "read loop finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockScript, MockTransport};
    use serde_json::json;
    use sselink_core::config::{SseConfig, SubscriberOverrides};

    fn subscription(url: &str) -> Subscription {
        let config = SseConfig {
            server_url: Some(url.into()),
            ..Default::default()
        };
        Subscription::resolve(&config, &SubscriberOverrides::default()).unwrap()
    }

    fn recorded(sub: &Subscriber) -> Arc<Mutex<Vec<(String, Value)>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        sub.on_any(move |name, payload| sink.lock().push((name.to_string(), payload.clone())));
        seen
    }

    #[tokio::test]
    async fn scenario_a_open_dispatches_lifecycle_event() {
        let transport = Arc::new(MockTransport::new(vec![MockScript::Events(vec![
            TransportEvent::Opened,
        ])]));
        let subscriber = Arc::new(Subscriber::new());
        let seen = recorded(&subscriber);

        let conn = Connection::new(transport.clone(), subscriber);
        assert_eq!(conn.state(), ConnectionState::Idle);
        let final_state = conn.run(&subscription("https://h/stream")).await.unwrap();

        assert_eq!(final_state, ConnectionState::Open);
        assert_eq!(*seen.lock(), vec![("sse.open".into(), Value::Null)]);
        assert_eq!(transport.open_count(), 1);
    }

    #[tokio::test]
    async fn frames_dispatch_in_arrival_order() {
        let transport = Arc::new(MockTransport::new(vec![MockScript::Events(vec![
            TransportEvent::Opened,
            TransportEvent::Message(json!(["tick", 1])),
            TransportEvent::Message(json!(["tock", 2])),
            TransportEvent::Message(json!(["tick", 3])),
        ])]));
        let subscriber = Arc::new(Subscriber::new());
        let seen = recorded(&subscriber);

        let conn = Connection::new(transport, subscriber);
        conn.run(&subscription("https://h/s")).await.unwrap();

        assert_eq!(
            *seen.lock(),
            vec![
                ("sse.open".into(), Value::Null),
                ("sse.tick".into(), json!(1)),
                ("sse.tock".into(), json!(2)),
                ("sse.tick".into(), json!(3)),
            ]
        );
    }

    #[tokio::test]
    async fn scenario_c_empty_message_yields_no_event() {
        let transport = Arc::new(MockTransport::new(vec![MockScript::Events(vec![
            TransportEvent::Opened,
            TransportEvent::Message(Value::Null),
            TransportEvent::Message(json!("")),
            TransportEvent::Message(json!(["ping", {"t": 123}])),
        ])]));
        let subscriber = Arc::new(Subscriber::new());
        let seen = recorded(&subscriber);

        let conn = Connection::new(transport, subscriber);
        conn.run(&subscription("https://h/s")).await.unwrap();

        assert_eq!(
            *seen.lock(),
            vec![
                ("sse.open".into(), Value::Null),
                ("sse.ping".into(), json!({"t": 123})),
            ]
        );
    }

    #[tokio::test]
    async fn messages_before_open_are_not_dispatched() {
        let transport = Arc::new(MockTransport::new(vec![MockScript::Events(vec![
            TransportEvent::Message(json!(["early", 0])),
            TransportEvent::Opened,
            TransportEvent::Message(json!(["late", 1])),
        ])]));
        let subscriber = Arc::new(Subscriber::new());
        let seen = recorded(&subscriber);

        let conn = Connection::new(transport, subscriber);
        conn.run(&subscription("https://h/s")).await.unwrap();

        assert_eq!(
            *seen.lock(),
            vec![
                ("sse.open".into(), Value::Null),
                ("sse.late".into(), json!(1)),
            ]
        );
    }

    #[tokio::test]
    async fn scenario_e_error_is_terminal_for_this_connection() {
        let transport = Arc::new(MockTransport::new(vec![MockScript::Events(vec![
            TransportEvent::Opened,
            TransportEvent::Message(json!(["ping", 1])),
            TransportEvent::Failed("connection reset".into()),
            TransportEvent::Message(json!(["never", 2])),
        ])]));
        let subscriber = Arc::new(Subscriber::new());
        let seen = recorded(&subscriber);

        let conn = Connection::new(transport, subscriber);
        let final_state = conn.run(&subscription("https://h/s")).await.unwrap();

        assert_eq!(final_state, ConnectionState::Error);
        assert_eq!(
            *seen.lock(),
            vec![
                ("sse.open".into(), Value::Null),
                ("sse.ping".into(), json!(1)),
                ("sse.error".into(), json!("connection reset")),
            ]
        );
    }

    #[tokio::test]
    async fn acquisition_failure_becomes_error_state_not_fault() {
        let transport = Arc::new(MockTransport::new(vec![MockScript::Error(
            LinkError::Transport("refused".into()),
        )]));
        let subscriber = Arc::new(Subscriber::new());
        let seen = recorded(&subscriber);

        let conn = Connection::new(transport, subscriber);
        let result = conn.open(&subscription("https://h/s")).await;

        assert!(result.is_ok());
        assert_eq!(conn.state(), ConnectionState::Error);
        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "sse.error");
    }

    #[tokio::test]
    async fn spawned_open_delivers_after_join() {
        let transport = Arc::new(MockTransport::new(vec![MockScript::Events(vec![
            TransportEvent::Opened,
            TransportEvent::Message(json!(["ping", true])),
        ])]));
        let subscriber = Arc::new(Subscriber::new());
        let seen = recorded(&subscriber);

        let conn = Connection::new(transport, subscriber);
        conn.open(&subscription("https://h/s")).await.unwrap();
        conn.join().await;

        assert_eq!(seen.lock().len(), 2);
        assert_eq!(conn.state(), ConnectionState::Open);
    }

    #[tokio::test]
    async fn open_twice_is_rejected() {
        let transport = Arc::new(MockTransport::new(vec![
            MockScript::Events(vec![TransportEvent::Opened]),
            MockScript::Events(vec![TransportEvent::Opened]),
        ]));
        let subscriber = Arc::new(Subscriber::new());

        let conn = Connection::new(transport, subscriber);
        let sub = subscription("https://h/s");
        conn.open(&sub).await.unwrap();
        let err = conn.open(&sub).await.unwrap_err();
        assert!(matches!(err, LinkError::AlreadyStarted));
    }

    #[tokio::test]
    async fn close_is_idempotent_and_terminal() {
        let transport = Arc::new(MockTransport::new(vec![MockScript::Events(vec![
            TransportEvent::Opened,
        ])]));
        let subscriber = Arc::new(Subscriber::new());

        let conn = Connection::new(transport, subscriber);
        conn.open(&subscription("https://h/s")).await.unwrap();
        conn.join().await;

        conn.close();
        assert_eq!(conn.state(), ConnectionState::Closed);
        conn.close();
        assert_eq!(conn.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn close_from_idle_is_allowed() {
        let transport = Arc::new(MockTransport::new(vec![]));
        let conn = Connection::new(transport, Arc::new(Subscriber::new()));
        conn.close();
        assert_eq!(conn.state(), ConnectionState::Closed);
    }
}
