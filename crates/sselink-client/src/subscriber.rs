use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

use sselink_core::ids::SubscriberId;

type Handler = Box<dyn Fn(&Value) + Send + Sync>;
type AnyHandler = Box<dyn Fn(&str, &Value) + Send + Sync>;

/// Per-subscriber event surface: the sole recipient of everything dispatched
/// for one subscription/connection pair.
///
/// Handlers run inside the connection's read loop, so for a single subscriber
/// delivery is serialized in transport arrival order. Distinct subscribers
/// share nothing.
pub struct Subscriber {
    id: SubscriberId,
    handlers: RwLock<HashMap<String, Vec<Handler>>>,
    any_handlers: RwLock<Vec<AnyHandler>>,
}

impl Subscriber {
    pub fn new() -> Self {
        Self {
            id: SubscriberId::new(),
            handlers: RwLock::new(HashMap::new()),
            any_handlers: RwLock::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    /// Register a handler for one event name (e.g. `sse.ping`). Multiple
    /// handlers per name are invoked in registration order.
    pub fn on(&self, event: &str, handler: impl Fn(&Value) + Send + Sync + 'static) {
        self.handlers
            .write()
            .entry(event.to_string())
            .or_default()
            .push(Box::new(handler));
    }

    /// Remove every handler registered for `event`.
    pub fn off(&self, event: &str) {
        self.handlers.write().remove(event);
    }

    /// Register a catch-all handler receiving every delivered event.
    pub fn on_any(&self, handler: impl Fn(&str, &Value) + Send + Sync + 'static) {
        self.any_handlers.write().push(Box::new(handler));
    }

    /// Deliver one event. Fire-and-forget: no acknowledgment, no buffering,
    /// unknown names fall through silently.
    pub fn deliver(&self, event: &str, payload: &Value) {
        for handler in self.any_handlers.read().iter() {
            handler(event, payload);
        }
        if let Some(list) = self.handlers.read().get(event) {
            for handler in list {
                handler(payload);
            }
        }
    }
}

impl Default for Subscriber {
    fn default() -> Self {
        Self::new()
    }
}
