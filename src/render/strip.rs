//! Strip: a horizontal run of styled terminal cells.
//!
//! The render walk paints every text run, border edge, and glyph as a
//! [`Strip`] and places it into the [`Canvas`](super::canvas::Canvas).

use crate::style::Color;

// ---------------------------------------------------------------------------
// CellStyle
// ---------------------------------------------------------------------------

/// Visual style for a single terminal cell.
///
/// `None` colors mean "whatever is underneath": placing a cell with no
/// background keeps the background already painted there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
    pub reverse: bool,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Foreground only (builder).
    pub fn fg(color: Option<Color>) -> Self {
        Self {
            fg: color,
            ..Self::default()
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn dim(mut self, dim: bool) -> Self {
        self.dim = dim;
        self
    }
}

// ---------------------------------------------------------------------------
// StyledCell
// ---------------------------------------------------------------------------

/// A single terminal cell: one character with associated style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledCell {
    pub ch: char,
    pub style: CellStyle,
}

impl StyledCell {
    pub fn new(ch: char, style: CellStyle) -> Self {
        Self { ch, style }
    }

    /// A blank (space) cell with default style.
    pub fn blank() -> Self {
        Self::new(' ', CellStyle::default())
    }
}

impl Default for StyledCell {
    fn default() -> Self {
        Self::blank()
    }
}

// ---------------------------------------------------------------------------
// Strip
// ---------------------------------------------------------------------------

/// One row of cells starting at (`x_offset`, `y`) in screen coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    pub y: i32,
    pub x_offset: i32,
    pub cells: Vec<StyledCell>,
}

impl Strip {
    pub fn new(y: i32, x_offset: i32) -> Self {
        Self {
            y,
            x_offset,
            cells: Vec::new(),
        }
    }

    /// A strip holding `text` in one style.
    pub fn text(x: i32, y: i32, text: &str, style: CellStyle) -> Self {
        let mut strip = Self::new(y, x);
        strip.push_str(text, style);
        strip
    }

    /// `ch` repeated `count` times.
    pub fn repeat(x: i32, y: i32, ch: char, count: i32, style: CellStyle) -> Self {
        let mut strip = Self::new(y, x);
        for _ in 0..count.max(0) {
            strip.push(ch, style);
        }
        strip
    }

    pub fn push(&mut self, ch: char, style: CellStyle) {
        self.cells.push(StyledCell::new(ch, style));
    }

    pub fn push_str(&mut self, text: &str, style: CellStyle) {
        self.cells
            .extend(text.chars().map(|ch| StyledCell::new(ch, style)));
    }

    /// The width of this strip in cells.
    pub fn width(&self) -> i32 {
        self.cells.len() as i32
    }

    /// The rightmost x position (exclusive).
    pub fn right(&self) -> i32 {
        self.x_offset + self.width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_style_builders() {
        let s = CellStyle::fg(Some(Color::RED)).bold(true);
        assert_eq!(s.fg, Some(Color::RED));
        assert!(s.bold);
        assert!(!s.dim);
        assert!(s.bg.is_none());
    }

    #[test]
    fn blank_is_default() {
        assert_eq!(StyledCell::default(), StyledCell::blank());
        assert_eq!(StyledCell::blank().ch, ' ');
    }

    #[test]
    fn text_strip() {
        let s = Strip::text(10, 2, "abc", CellStyle::default());
        assert_eq!(s.y, 2);
        assert_eq!(s.width(), 3);
        assert_eq!(s.right(), 13);
        assert_eq!(s.cells[1].ch, 'b');
    }

    #[test]
    fn repeat_strip() {
        let s = Strip::repeat(0, 0, '─', 4, CellStyle::default());
        assert_eq!(s.width(), 4);
        assert!(s.cells.iter().all(|c| c.ch == '─'));
        assert_eq!(Strip::repeat(0, 0, 'x', -2, CellStyle::default()).width(), 0);
    }
}
