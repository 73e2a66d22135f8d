//! Outbound events and the fire-and-forget dispatch callback.
//!
//! The transport collaborator supplies a [`Dispatch`]. Descriptors hold a
//! clone and call it when a bound interaction fires; the call never waits
//! for a reply.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// Interaction kinds a node can bind with a `phx-<kind>` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Click,
    Change,
    Focus,
    Blur,
    Submit,
    KeyUp,
    LongClick,
    DoubleClick,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::Click,
        EventKind::Change,
        EventKind::Focus,
        EventKind::Blur,
        EventKind::Submit,
        EventKind::KeyUp,
        EventKind::LongClick,
        EventKind::DoubleClick,
    ];

    /// The event type string sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Change => "change",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::Submit => "submit",
            EventKind::KeyUp => "keyup",
            EventKind::LongClick => "long-click",
            EventKind::DoubleClick => "double-click",
        }
    }

    /// Map a binding attribute (`phx-click`, `phx-change`, ...) to its kind.
    pub fn from_attribute(name: &str) -> Option<Self> {
        let suffix = name.strip_prefix("phx-")?;
        Self::ALL.into_iter().find(|k| k.as_str() == suffix)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PushEvent
// ---------------------------------------------------------------------------

/// One outbound event: `dispatch(eventType, eventName, payload, extra)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushEvent {
    pub event_type: String,
    pub event_name: String,
    pub payload: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

impl PushEvent {
    pub fn new(kind: EventKind, event_name: impl Into<String>, payload: Value) -> Self {
        Self {
            event_type: kind.as_str().to_string(),
            event_name: event_name.into(),
            payload,
            extra: None,
        }
    }

    /// Attach extra metadata (builder).
    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Shared, non-blocking event sink.
///
/// Two `Dispatch` values compare equal when they are clones of the same sink.
#[derive(Clone)]
pub struct Dispatch(Arc<dyn Fn(PushEvent) + Send + Sync>);

impl Dispatch {
    /// Wrap a callback. The callback must not block.
    pub fn new(f: impl Fn(PushEvent) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// A sink that drops every event.
    pub fn noop() -> Self {
        Self::new(|event| debug!(event = %event.event_name, "dropping event, no transport"))
    }

    /// A sink backed by an unbounded channel, plus its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PushEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatch = Self::new(move |event: PushEvent| {
            if let Err(err) = tx.send(event) {
                debug!(event = %err.0.event_name, "transport closed, event dropped");
            }
        });
        (dispatch, rx)
    }

    /// Send an event.
    pub fn dispatch(&self, event: PushEvent) {
        (self.0)(event)
    }
}

impl PartialEq for Dispatch {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatch(..)")
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::noop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_from_attribute() {
        assert_eq!(EventKind::from_attribute("phx-click"), Some(EventKind::Click));
        assert_eq!(EventKind::from_attribute("phx-keyup"), Some(EventKind::KeyUp));
        assert_eq!(EventKind::from_attribute("phx-long-click"), Some(EventKind::LongClick));
        assert_eq!(EventKind::from_attribute("phx-value"), None);
        assert_eq!(EventKind::from_attribute("click"), None);
    }

    #[test]
    fn channel_delivers_in_order() {
        let (dispatch, mut rx) = Dispatch::channel();
        dispatch.dispatch(PushEvent::new(EventKind::Click, "a", json!(1)));
        dispatch.dispatch(PushEvent::new(EventKind::Change, "b", json!(true)));
        assert_eq!(rx.try_recv().unwrap().event_name, "a");
        let second = rx.try_recv().unwrap();
        assert_eq!(second.event_type, "change");
        assert_eq!(second.payload, json!(true));
    }

    #[test]
    fn closed_channel_does_not_panic() {
        let (dispatch, rx) = Dispatch::channel();
        drop(rx);
        dispatch.dispatch(PushEvent::new(EventKind::Click, "gone", Value::Null));
    }

    #[test]
    fn equality_is_identity() {
        let a = Dispatch::noop();
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Dispatch::noop());
    }

    #[test]
    fn serializes_without_empty_extra() {
        let event = PushEvent::new(EventKind::Click, "tap", json!("x"));
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event_type": "click", "event_name": "tap", "payload": "x"})
        );
        let with = event.with_extra(json!({"k": 1}));
        assert_eq!(with.extra, Some(json!({"k": 1})));
    }
}
