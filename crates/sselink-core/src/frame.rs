use serde_json::Value;

/// One decoded inbound message, normalized to a (kind, payload) pair.
/// Transient: parsed on arrival, not retained after dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub kind: String,
    pub payload: Value,
}

impl Frame {
    /// Normalize a decoded transport message into a frame.
    ///
    /// Falsy messages (null, false, empty string) produce no frame and are
    /// dropped silently. Otherwise the message is read as an ordered
    /// two-element array `(kind, payload)`; a missing second element degrades
    /// to a null payload rather than an error. Shapes that carry no usable
    /// kind (non-array, empty array, non-string kind) also produce no frame.
    pub fn parse(raw: &Value) -> Option<Frame> {
        if is_falsy(raw) {
            return None;
        }

        let items = raw.as_array()?;
        let kind = items.first()?.as_str()?;
        if kind.is_empty() {
            return None;
        }

        Some(Frame {
            kind: kind.to_string(),
            payload: items.get(1).cloned().unwrap_or(Value::Null),
        })
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_kind_and_payload() {
        let frame = Frame::parse(&json!(["ping", {"t": 123}])).unwrap();
        assert_eq!(frame.kind, "ping");
        assert_eq!(frame.payload, json!({"t": 123}));
    }

    #[test]
    fn payload_forwarded_unchanged() {
        let payload = json!({"nested": {"a": [1, 2, 3]}, "s": "text"});
        let frame = Frame::parse(&json!(["update", payload.clone()])).unwrap();
        assert_eq!(frame.payload, payload);
    }

    #[test]
    fn short_array_degrades_to_null_payload() {
        let frame = Frame::parse(&json!(["tick"])).unwrap();
        assert_eq!(frame.kind, "tick");
        assert_eq!(frame.payload, Value::Null);
    }

    #[test]
    fn extra_elements_ignored() {
        let frame = Frame::parse(&json!(["k", 1, 2, 3])).unwrap();
        assert_eq!(frame.kind, "k");
        assert_eq!(frame.payload, json!(1));
    }

    #[test]
    fn falsy_messages_produce_no_frame() {
        assert_eq!(Frame::parse(&Value::Null), None);
        assert_eq!(Frame::parse(&json!(false)), None);
        assert_eq!(Frame::parse(&json!("")), None);
    }

    #[test]
    fn kindless_shapes_produce_no_frame() {
        assert_eq!(Frame::parse(&json!([])), None);
        assert_eq!(Frame::parse(&json!({"kind": "ping"})), None);
        assert_eq!(Frame::parse(&json!([42, "payload"])), None);
        assert_eq!(Frame::parse(&json!(["", "payload"])), None);
        assert_eq!(Frame::parse(&json!("just a string")), None);
    }

    #[test]
    fn true_bool_is_not_falsy_but_has_no_kind() {
        assert_eq!(Frame::parse(&json!(true)), None);
    }
}
