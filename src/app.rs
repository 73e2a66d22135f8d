//! Session: the client loop tying envelopes, input, rendering, and output.
//!
//! A [`Session`] owns a [`Coordinator`], the last painted [`Frame`],
//! keyboard focus and scroll offsets. [`Session::run`] multiplexes server
//! envelopes, terminal events, and a frame tick with `tokio::select!`.
//! Envelopes are staged as they arrive and published at most once per tick.
//! `Session::headless` skips the terminal so the same paths can be driven
//! from tests.

use std::io;
use std::time::Duration;

use crossterm::event::EventStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::event::{Command, Input};
use crate::reconcile::{Coordinator, ReconcileError, ReconcileReport};
use crate::render::{render_scrolled, Canvas, Driver, Frame, ScrollOffsets, Scrollable};

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for a terminal session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Terminal window title.
    pub title: String,
    /// Target frames per second for the redraw tick.
    pub fps: u32,
    pub mouse_capture: bool,
    /// Fixed viewport; `None` follows the terminal size.
    pub size: Option<(u16, u16)>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "liveview".to_string(),
            fps: 30,
            mouse_capture: true,
            size: None,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_mouse_capture(mut self, enabled: bool) -> Self {
        self.mouse_capture = enabled;
        self
    }

    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.size = Some((width, height));
        self
    }

    fn tick(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session {
    coordinator: Coordinator,
    driver: Option<Driver>,
    config: AppConfig,
    frame: Frame,
    /// Last canvas written to the terminal; `None` forces a full repaint.
    presented: Option<Canvas>,
    focused: Option<String>,
    scroll: ScrollOffsets,
    width: u16,
    height: u16,
    running: bool,
}

impl Session {
    /// A session attached to the real terminal.
    pub fn new(coordinator: Coordinator, config: AppConfig) -> io::Result<Self> {
        let (width, height) = match config.size {
            Some(size) => size,
            None => Driver::terminal_size()?,
        };
        let mut session = Self::headless(coordinator, width, height);
        session.driver = Some(Driver::new()?);
        session.config = config;
        Ok(session)
    }

    /// A session with no terminal driver.
    pub fn headless(coordinator: Coordinator, width: u16, height: u16) -> Self {
        Self {
            coordinator,
            driver: None,
            config: AppConfig::default().with_size(width, height),
            frame: Frame::empty(width, height),
            presented: None,
            focused: None,
            scroll: ScrollOffsets::new(),
            width,
            height,
            running: true,
        }
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut Coordinator {
        &mut self.coordinator
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn scroll_offsets(&self) -> &ScrollOffsets {
        &self.scroll
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_quit(&mut self) {
        self.running = false;
    }

    /// Apply a server envelope and repaint when a new snapshot was published.
    pub fn apply_envelope(&mut self, json: &str) -> Result<ReconcileReport, ReconcileError> {
        let report = self.coordinator.apply_envelope(json)?;
        if report.changed {
            self.redraw();
        }
        Ok(report)
    }

    /// React to one input. Returns whether the frame needs repainting.
    pub fn handle_input(&mut self, input: Input) -> bool {
        match input {
            Input::Command(Command::Quit) => {
                self.running = false;
                false
            }
            Input::Command(Command::FocusNext) => self.move_focus(true),
            Input::Command(Command::FocusPrevious) => self.move_focus(false),
            Input::Command(Command::Activate) => {
                if let Some(key) = &self.focused {
                    self.coordinator.click(key);
                }
                false
            }
            Input::Command(Command::Scroll { dx, dy }) => {
                let target = self.frame.scrollable_around(self.focused.as_deref()).cloned();
                self.scroll_by(target, dx, dy)
            }
            Input::Wheel { x, y, dx, dy } => {
                let target = self.frame.scrollable_at(i32::from(x), i32::from(y)).cloned();
                self.scroll_by(target, dx, dy)
            }
            Input::Click { x, y } => {
                let Some(key) = self.frame.hit_at(i32::from(x), i32::from(y)).map(|h| h.key.clone())
                else {
                    return false;
                };
                self.coordinator.click(&key);
                self.focused = Some(key);
                true
            }
            Input::Resize { width, height } => {
                self.width = width;
                self.height = height;
                self.presented = None;
                true
            }
            Input::Ignored => false,
        }
    }

    fn scroll_by(&mut self, target: Option<Scrollable>, dx: i16, dy: i16) -> bool {
        let Some(target) = target else {
            return false;
        };
        let moved = self.scroll.scroll_by(&target, i32::from(dx), i32::from(dy));
        if moved {
            debug!(key = %target.key, offset = ?self.scroll.get(&target.key), "scrolled");
        }
        moved
    }

    fn move_focus(&mut self, forward: bool) -> bool {
        let order = self.frame.focus_order();
        if order.is_empty() {
            return false;
        }
        let current = self
            .focused
            .as_deref()
            .and_then(|key| order.iter().position(|k| *k == key));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % order.len(),
            (Some(i), false) => (i + order.len() - 1) % order.len(),
            (None, true) => 0,
            (None, false) => order.len() - 1,
        };
        self.focused = Some(order[next].to_string());
        true
    }

    /// Re-render the current snapshot and highlight the focused view.
    pub fn redraw(&mut self) {
        let snapshot = self.coordinator.snapshot();
        self.frame = render_scrolled(&snapshot, self.width, self.height, &self.scroll);
        self.scroll.retain_painted(&self.frame.scrollables);
        let Some(key) = &self.focused else {
            return;
        };
        let regions: Vec<_> = self
            .frame
            .hits
            .iter()
            .filter(|h| &h.key == key)
            .map(|h| h.region)
            .collect();
        if regions.is_empty() && snapshot.find(key).is_none() {
            debug!(%key, "focused view is gone");
            self.focused = None;
        }
        for region in regions {
            self.frame.canvas.restyle(region, |s| s.reverse = true);
        }
    }

    /// Write the changed cells of the current frame to the terminal.
    fn present(&mut self) -> io::Result<()> {
        let Some(driver) = self.driver.as_mut() else {
            return Ok(());
        };
        let blank = Canvas::new(0, 0);
        let updates = self
            .frame
            .canvas
            .diff(self.presented.as_ref().unwrap_or(&blank));
        driver.apply_updates(&updates)?;
        driver.flush()?;
        self.presented = Some(self.frame.canvas.clone());
        Ok(())
    }

    /// Run until quit, reading envelopes from `envelopes`.
    pub async fn run(mut self, envelopes: mpsc::UnboundedReceiver<String>) -> io::Result<()> {
        if let Some(driver) = self.driver.as_mut() {
            driver.enter(&self.config.title, self.config.mouse_capture)?;
        }
        let result = self.event_loop(envelopes).await;
        if let Some(driver) = self.driver.as_mut() {
            driver.leave()?;
        }
        info!("session ended");
        result
    }

    async fn event_loop(&mut self, mut envelopes: mpsc::UnboundedReceiver<String>) -> io::Result<()> {
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(self.config.tick());
        let mut dirty = true;
        while self.running {
            tokio::select! {
                Some(json) = envelopes.recv() => {
                    if let Err(error) = self.coordinator.stage_envelope(&json) {
                        warn!(%error, "rejected envelope");
                    }
                }
                event = events.next() => match event {
                    Some(Ok(event)) => dirty |= self.handle_input(Input::from(event)),
                    Some(Err(error)) => return Err(error),
                    None => self.running = false,
                },
                _ = tick.tick() => {
                    if let Some(report) = self.coordinator.publish() {
                        dirty |= report.changed;
                    }
                    if dirty {
                        self.redraw();
                        self.present()?;
                        dirty = false;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Dispatch, PushEvent};
    use crate::registry::Registry;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const MARKUP: &str = r#"<Row><Button id="a" phx-click="first"><Text>a</Text></Button><Button id="b" phx-click="second"><Text>b</Text></Button></Row>"#;

    fn session() -> (Session, mpsc::UnboundedReceiver<PushEvent>) {
        let (dispatch, rx) = Dispatch::channel();
        let mut s = Session::headless(Coordinator::new(Registry::defaults(), dispatch), 10, 2);
        let envelope = json!({"type": "render", "version": 1, "fragments": [MARKUP]});
        s.apply_envelope(&envelope.to_string()).unwrap();
        (s, rx)
    }

    #[test]
    fn config_builders() {
        let config = AppConfig::new().with_title("demo").with_fps(0).with_size(20, 5);
        assert_eq!(config.title, "demo");
        assert_eq!(config.size, Some((20, 5)));
        assert_eq!(config.tick(), Duration::from_millis(1000));
    }

    #[test]
    fn envelope_repaints() {
        let (s, _rx) = session();
        assert_eq!(s.frame().text(), "[a][b]\n");
        assert_eq!(s.frame().focus_order(), vec!["phx-main/Row[0]/Button#a", "phx-main/Row[0]/Button#b"]);
    }

    #[test]
    fn focus_cycles_and_highlights() {
        let (mut s, _rx) = session();
        assert!(s.handle_input(Input::Command(Command::FocusPrevious)));
        assert_eq!(s.focused(), Some("phx-main/Row[0]/Button#b"));
        s.handle_input(Input::Command(Command::FocusNext));
        assert_eq!(s.focused(), Some("phx-main/Row[0]/Button#a"));
        s.redraw();
        assert!(s.frame().canvas.get_cell(0, 0).unwrap().style.reverse);
        assert!(!s.frame().canvas.get_cell(3, 0).unwrap().style.reverse);
    }

    #[test]
    fn activate_clicks_focused() {
        let (mut s, mut rx) = session();
        s.handle_input(Input::Command(Command::Activate));
        assert!(rx.try_recv().is_err());
        s.handle_input(Input::Command(Command::FocusNext));
        s.handle_input(Input::Command(Command::Activate));
        let event = rx.try_recv().unwrap();
        assert_eq!(event.event_type, "click");
        assert_eq!(event.event_name, "first");
    }

    #[test]
    fn mouse_click_routes_by_hit() {
        let (mut s, mut rx) = session();
        assert!(s.handle_input(Input::Click { x: 4, y: 0 }));
        assert_eq!(rx.try_recv().unwrap().event_name, "second");
        assert!(!s.handle_input(Input::Click { x: 9, y: 1 }));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn quit_and_resize() {
        let (mut s, _rx) = session();
        assert!(s.handle_input(Input::Resize { width: 4, height: 1 }));
        s.redraw();
        assert_eq!(s.frame().canvas.width, 4);
        s.handle_input(Input::Command(Command::Quit));
        assert!(!s.is_running());
    }

    #[test]
    fn focus_dropped_when_view_removed() {
        let (mut s, _rx) = session();
        s.handle_input(Input::Command(Command::FocusPrevious));
        let diff = json!({"type": "diff", "version": 2, "patches": [{"op": "remove", "target": "b"}]});
        s.apply_envelope(&diff.to_string()).unwrap();
        assert_eq!(s.focused(), None);
    }

    const LIST: &str = r#"<Column id="list" scroll="vertical" style="height(2)"><Button id="a" phx-click="a"><Text>a</Text></Button><Button id="b" phx-click="b"><Text>b</Text></Button><Button id="c" phx-click="c"><Text>c</Text></Button></Column>"#;

    fn scrolling_session() -> Session {
        let mut s = Session::headless(Coordinator::new(Registry::defaults(), Dispatch::noop()), 4, 3);
        let envelope = json!({"type": "render", "version": 1, "fragments": [LIST]});
        s.apply_envelope(&envelope.to_string()).unwrap();
        s
    }

    #[test]
    fn wheel_scrolls_container_under_cursor() {
        let mut s = scrolling_session();
        assert_eq!(s.frame().text(), "[a]\n[b]\n");
        assert!(!s.handle_input(Input::Wheel { x: 3, y: 2, dx: 0, dy: 1 }));
        assert!(s.handle_input(Input::Wheel { x: 1, y: 1, dx: 0, dy: 1 }));
        s.redraw();
        assert_eq!(s.frame().text(), "[b]\n[c]\n");
        assert!(!s.handle_input(Input::Wheel { x: 1, y: 1, dx: 0, dy: 1 }));
        assert_eq!(s.scroll_offsets().get("phx-main/Column#list"), (0, 1));
    }

    #[test]
    fn arrow_keys_scroll_around_focus() {
        let mut s = scrolling_session();
        s.handle_input(Input::Command(Command::FocusNext));
        assert!(s.handle_input(Input::Command(Command::Scroll { dx: 0, dy: 1 })));
        assert!(!s.handle_input(Input::Command(Command::Scroll { dx: 1, dy: 0 })));
        s.redraw();
        assert_eq!(s.frame().text(), "[b]\n[c]\n");
        assert_eq!(s.focused(), Some("phx-main/Column#list/Button#a"));
        assert!(s.handle_input(Input::Command(Command::Scroll { dx: 0, dy: -1 })));
        s.redraw();
        assert_eq!(s.frame().text(), "[a]\n[b]\n");
    }

    #[test]
    fn scroll_offset_survives_rerender() {
        let mut s = scrolling_session();
        s.handle_input(Input::Wheel { x: 0, y: 0, dx: 0, dy: 1 });
        let diff = json!({"type": "diff", "version": 2, "patches": [{"op": "set_attributes", "target": "a", "attributes": {"phx-click": "again"}}]});
        s.apply_envelope(&diff.to_string()).unwrap();
        assert_eq!(s.frame().text(), "[b]\n[c]\n");
    }
}
