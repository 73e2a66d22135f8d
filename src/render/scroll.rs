//! Scroll state for containers with a `scroll` attribute.
//!
//! Offsets live outside the snapshot, keyed by identity key, so they survive
//! re-renders of the same container. The walk clamps whatever it is given to
//! the content that actually overflows and reports the result back as a
//! [`Scrollable`].

use std::collections::HashMap;

use crate::geometry::Region;
use crate::view::ScrollAxes;

/// A scroll container as painted in the last frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scrollable {
    pub key: String,
    /// Visible viewport on screen.
    pub region: Region,
    pub axes: ScrollAxes,
    /// Offset applied to the content, in cells.
    pub offset: (i32, i32),
    /// Smallest offset on each axis. Negative when content overflows
    /// before the start, as reversed lists do.
    pub min: (i32, i32),
    /// Largest offset on each axis.
    pub max: (i32, i32),
}

impl Scrollable {
    /// Whether `key` is this container or one of its descendants.
    pub fn encloses(&self, key: &str) -> bool {
        key.strip_prefix(self.key.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    fn clamp(&self, (x, y): (i32, i32)) -> (i32, i32) {
        (
            x.clamp(self.min.0, self.max.0),
            y.clamp(self.min.1, self.max.1),
        )
    }
}

/// Requested scroll offsets by identity key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollOffsets {
    offsets: HashMap<String, (i32, i32)>,
}

impl ScrollOffsets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> (i32, i32) {
        self.offsets.get(key).copied().unwrap_or((0, 0))
    }

    pub fn set(&mut self, key: impl Into<String>, offset: (i32, i32)) {
        self.offsets.insert(key.into(), offset);
    }

    /// Move `target` by (dx, dy) within its scroll range. Returns whether
    /// the offset changed.
    pub fn scroll_by(&mut self, target: &Scrollable, dx: i32, dy: i32) -> bool {
        let (x, y) = target.offset;
        let next = target.clamp((x.saturating_add(dx), y.saturating_add(dy)));
        if next == target.offset {
            return false;
        }
        self.offsets.insert(target.key.clone(), next);
        true
    }

    /// Drop offsets of containers that were not painted.
    pub fn retain_painted(&mut self, painted: &[Scrollable]) {
        self.offsets
            .retain(|key, _| painted.iter().any(|s| &s.key == key));
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
