/// Namespace prefix for every event delivered to a subscriber.
pub const EVENT_PREFIX: &str = "sse.";

/// Lifecycle event dispatched when the transport reports the stream open.
pub const OPEN_EVENT: &str = "sse.open";

/// Lifecycle event carrying the raw error info from the transport.
pub const ERROR_EVENT: &str = "sse.error";

/// Local event name for a frame kind: `sse.` + kind.
pub fn event_name(kind: &str) -> String {
    format!("{EVENT_PREFIX}{kind}")
}

/// The two lifecycle names are reserved for transport callbacks; a frame kind
/// can still shadow them, which the dispatcher notes but does not block.
pub fn is_lifecycle(name: &str) -> bool {
    name == OPEN_EVENT || name == ERROR_EVENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_name_is_prefixed() {
        assert_eq!(event_name("ping"), "sse.ping");
        assert_eq!(event_name("price_update"), "sse.price_update");
    }

    #[test]
    fn lifecycle_names_match_constants() {
        assert_eq!(event_name("open"), OPEN_EVENT);
        assert_eq!(event_name("error"), ERROR_EVENT);
    }

    #[test]
    fn lifecycle_classification() {
        assert!(is_lifecycle(OPEN_EVENT));
        assert!(is_lifecycle(ERROR_EVENT));
        assert!(!is_lifecycle("sse.ping"));
        assert!(!is_lifecycle("open"));
    }
}
