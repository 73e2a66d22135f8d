//! Snapshot rendering helpers.
//!
//! Convert snapshots, canvases, and raw strips into plain text, and build
//! envelope JSON for feeding a [`Coordinator`](crate::reconcile::Coordinator).

use serde_json::{json, Value};

use crate::reconcile::Snapshot;
use crate::render::{render, Canvas, Strip};

/// Render a snapshot to text at `width` × `height`.
///
/// Each row becomes one line with trailing spaces trimmed. The final line has
/// no trailing newline.
pub fn render_to_string(snapshot: &Snapshot, width: u16, height: u16) -> String {
    render(snapshot, width, height).text()
}

/// Every row of `canvas`, trimmed and joined with `'\n'`.
pub fn canvas_to_string(canvas: &Canvas) -> String {
    (0..canvas.height)
        .map(|y| canvas.row_text(y))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Overlay raw strips on a blank `width` × `height` grid.
pub fn strips_to_string(strips: &[Strip], width: u16, height: u16) -> String {
    let mut canvas = Canvas::new(width, height);
    let bounds = canvas.bounds();
    canvas.place_strips(strips, bounds);
    canvas_to_string(&canvas)
}

/// A full-render envelope.
pub fn render_envelope(version: u64, fragments: &[&str]) -> String {
    json!({"type": "render", "version": version, "fragments": fragments}).to_string()
}

/// A diff envelope carrying `patches` (a JSON array).
pub fn diff_envelope(version: u64, patches: Value) -> String {
    json!({"type": "diff", "version": version, "patches": patches}).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Dispatch;
    use crate::reconcile::Coordinator;
    use crate::registry::Registry;
    use crate::render::CellStyle;

    #[test]
    fn strips_overlay_and_trim() {
        let strips = vec![
            Strip::text(1, 0, "hi", CellStyle::new()),
            Strip::text(0, 1, "toolong", CellStyle::new()),
        ];
        assert_eq!(strips_to_string(&strips, 4, 2), " hi\ntool");
    }

    #[test]
    fn zero_sized_canvas_is_empty() {
        assert_eq!(canvas_to_string(&Canvas::new(0, 0)), "");
    }

    #[test]
    fn envelopes_parse_back() {
        let mut c = Coordinator::new(Registry::defaults(), Dispatch::noop());
        c.apply_envelope(&render_envelope(1, &["<Text>x</Text>"])).unwrap();
        c.apply_envelope(&diff_envelope(2, json!([]))).unwrap();
        assert_eq!(c.version(), Some(2));
        assert_eq!(render_to_string(&c.snapshot(), 3, 1), "x");
    }
}
