//! Pilot: programmatic interaction with a headless session.
//!
//! The `Pilot` owns a [`Session`] with no terminal driver plus the receiving
//! end of its push-event channel, so tests can feed envelopes, simulate keys
//! and clicks, and inspect both the painted frame and the events the client
//! would send to the server.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::app::Session;
use crate::event::{Dispatch, Input, PushEvent};
use crate::reconcile::{Coordinator, ReconcileError, ReconcileReport};
use crate::registry::Registry;

use super::snapshot::{diff_envelope, render_envelope};

/// A headless session driver for tests.
///
/// ```ignore
/// let mut pilot = Pilot::new(20, 3);
/// pilot.render(&[r#"<Button phx-click="go"><Text>go</Text></Button>"#]).unwrap();
/// pilot.click(1, 0);
/// assert_eq!(pilot.events()[0].event_name, "go");
/// ```
pub struct Pilot {
    session: Session,
    events: mpsc::UnboundedReceiver<PushEvent>,
    version: u64,
}

impl Pilot {
    /// A pilot over the default tag registry.
    pub fn new(width: u16, height: u16) -> Self {
        let (dispatch, events) = Dispatch::channel();
        let coordinator = Coordinator::new(Registry::defaults(), dispatch);
        Self {
            session: Session::headless(coordinator, width, height),
            events,
            version: 0,
        }
    }

    // ── Server side ──────────────────────────────────────────────────

    /// Send a full render at the next version.
    pub fn render(&mut self, fragments: &[&str]) -> Result<ReconcileReport, ReconcileError> {
        self.version += 1;
        self.session.apply_envelope(&render_envelope(self.version, fragments))
    }

    /// Send a diff at the next version.
    pub fn diff(&mut self, patches: Value) -> Result<ReconcileReport, ReconcileError> {
        self.version += 1;
        self.session.apply_envelope(&diff_envelope(self.version, patches))
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Press a key with no modifiers and repaint if needed.
    pub fn press(&mut self, code: KeyCode) {
        self.input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)).into());
    }

    /// Left-click at (x, y).
    pub fn click(&mut self, x: u16, y: u16) {
        self.input(Input::Click { x, y });
    }

    /// Turn the mouse wheel over (x, y); positive `dy` scrolls down.
    pub fn wheel(&mut self, x: u16, y: u16, dy: i16) {
        self.input(Input::Wheel { x, y, dx: 0, dy });
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.input(Input::Resize { width, height });
    }

    fn input(&mut self, input: Input) {
        if self.session.handle_input(input) {
            self.session.redraw();
        }
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Drain the push events dispatched so far.
    pub fn events(&mut self) -> Vec<PushEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }

    /// The current frame as text.
    pub fn text(&self) -> String {
        self.session.frame().text()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn renders_and_quits() {
        let mut pilot = Pilot::new(8, 1);
        pilot.render(&["<Text>hello</Text>"]).unwrap();
        assert_eq!(pilot.text(), "hello");
        pilot.press(KeyCode::Char('q'));
        assert!(!pilot.is_running());
    }

    #[test]
    fn checkbox_toggle_round_trip() {
        let mut pilot = Pilot::new(8, 1);
        pilot
            .render(&[r#"<Checkbox id="c" phx-change="toggle" phx-value="7"/>"#])
            .unwrap();
        pilot.click(1, 0);
        let events = pilot.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "change");
        assert_eq!(events[0].event_name, "toggle");

        pilot
            .diff(json!([{"op": "set_attributes", "target": "c", "attributes": {"checked": "true", "phx-change": "toggle"}}]))
            .unwrap();
        assert_eq!(pilot.text(), "[x]");
    }

    #[test]
    fn keyboard_focus_and_activate() {
        let mut pilot = Pilot::new(10, 1);
        pilot
            .render(&[r#"<Button phx-click="go"><Text>go</Text></Button>"#])
            .unwrap();
        pilot.press(KeyCode::Tab);
        assert!(pilot.session().focused().is_some());
        pilot.press(KeyCode::Enter);
        assert_eq!(pilot.events()[0].event_name, "go");
    }
}
