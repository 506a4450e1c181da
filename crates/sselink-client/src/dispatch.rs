use serde_json::Value;
use tracing::{debug, trace};

use sselink_core::events::{self, ERROR_EVENT, OPEN_EVENT};
use sselink_core::frame::Frame;

use crate::subscriber::Subscriber;

/// Deliver a parsed frame as `sse.<kind>` with the frame's payload.
/// Fire-and-forget; one event per frame, arrival order preserved because the
/// caller is the single read loop for this subscriber.
pub fn dispatch_frame(subscriber: &Subscriber, frame: &Frame) {
    let name = events::event_name(&frame.kind);
    if events::is_lifecycle(&name) {
        debug!(event = %name, "frame kind shadows a lifecycle event name");
    }
    trace!(subscriber = %subscriber.id(), event = %name, "dispatching frame");
    subscriber.deliver(&name, &frame.payload);
}

/// Lifecycle: transport open callback. No payload.
pub fn dispatch_open(subscriber: &Subscriber) {
    trace!(subscriber = %subscriber.id(), "dispatching open");
    subscriber.deliver(OPEN_EVENT, &Value::Null);
}

/// Lifecycle: transport error callback, carrying the raw error info.
pub fn dispatch_error(subscriber: &Subscriber, info: &Value) {
    trace!(subscriber = %subscriber.id(), "dispatching error");
    subscriber.deliver(ERROR_EVENT, info);
}
