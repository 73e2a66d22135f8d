//! Cell buffer the render walk paints into.
//!
//! [`Canvas`] is a 2D grid of [`StyledCell`]s. Strips are placed with a clip
//! region; [`Canvas::diff`] compares two frames and yields only the changed
//! cells for the terminal driver.

use crate::geometry::Region;
use crate::style::Color;

use super::strip::{CellStyle, Strip, StyledCell};

/// A single cell that changed between frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub x: u16,
    pub y: u16,
    pub cell: StyledCell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    /// `cells[y][x]` is the cell at column x, row y.
    cells: Vec<Vec<StyledCell>>,
    pub width: u16,
    pub height: u16,
}

impl Canvas {
    /// A blank canvas of the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![vec![StyledCell::blank(); width as usize]; height as usize],
            width,
            height,
        }
    }

    /// The whole canvas as a region.
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn get_cell(&self, x: u16, y: u16) -> Option<&StyledCell> {
        self.cells.get(y as usize)?.get(x as usize)
    }

    fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut StyledCell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells.get_mut(y as usize)?.get_mut(x as usize)
    }

    /// Place strips, skipping cells outside `clip` or the canvas.
    ///
    /// A cell without a background keeps the background already there.
    pub fn place_strips(&mut self, strips: &[Strip], clip: Region) {
        let clip = clip.intersection(self.bounds());
        if clip.is_empty() {
            return;
        }
        for strip in strips {
            if strip.y < clip.y || strip.y >= clip.bottom() {
                continue;
            }
            for (i, cell) in strip.cells.iter().enumerate() {
                let x = strip.x_offset + i as i32;
                if x < clip.x || x >= clip.right() {
                    continue;
                }
                if let Some(target) = self.cell_mut(x, strip.y) {
                    let bg = cell.style.bg.or(target.style.bg);
                    *target = *cell;
                    target.style.bg = bg;
                }
            }
        }
    }

    /// Paint a background over `region`, clearing characters.
    pub fn fill(&mut self, region: Region, bg: Color) {
        let region = region.intersection(self.bounds());
        for y in region.y..region.bottom() {
            for x in region.x..region.right() {
                if let Some(cell) = self.cell_mut(x, y) {
                    *cell = StyledCell::new(
                        ' ',
                        CellStyle {
                            bg: Some(bg),
                            ..CellStyle::default()
                        },
                    );
                }
            }
        }
    }

    /// Apply `f` to the style of every cell in `region`.
    pub fn restyle(&mut self, region: Region, f: impl Fn(&mut CellStyle)) {
        let region = region.intersection(self.bounds());
        for y in region.y..region.bottom() {
            for x in region.x..region.right() {
                if let Some(cell) = self.cell_mut(x, y) {
                    f(&mut cell.style);
                }
            }
        }
    }

    /// Characters of row `y`, trailing spaces trimmed.
    pub fn row_text(&self, y: u16) -> String {
        self.cells
            .get(y as usize)
            .map(|row| row.iter().map(|c| c.ch).collect::<String>())
            .unwrap_or_default()
            .trim_end()
            .to_string()
    }

    /// Cells that differ from `previous`. Cells outside the previous
    /// frame's bounds always count as changed.
    pub fn diff(&self, previous: &Canvas) -> Vec<CellUpdate> {
        let mut updates = Vec::new();
        for (y, row) in self.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let old = previous.cells.get(y).and_then(|r| r.get(x));
                if old != Some(cell) {
                    updates.push(CellUpdate {
                        x: x as u16,
                        y: y as u16,
                        cell: *cell,
                    });
                }
            }
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_blank() {
        let c = Canvas::new(4, 2);
        assert_eq!(c.get_cell(3, 1), Some(&StyledCell::blank()));
        assert!(c.get_cell(4, 0).is_none());
        assert!(c.get_cell(0, 2).is_none());
    }

    #[test]
    fn place_strips_clips() {
        let mut c = Canvas::new(10, 3);
        let strip = Strip::text(-1, 1, "abcdef", CellStyle::default());
        c.place_strips(&[strip], Region::new(0, 0, 4, 3));
        assert_eq!(c.row_text(1), "bcde");
    }

    #[test]
    fn place_strips_keeps_background() {
        let mut c = Canvas::new(5, 1);
        c.fill(Region::new(0, 0, 5, 1), Color::BLUE);
        c.place_strips(
            &[Strip::text(1, 0, "x", CellStyle::fg(Some(Color::WHITE)))],
            c.bounds(),
        );
        let cell = c.get_cell(1, 0).unwrap();
        assert_eq!(cell.ch, 'x');
        assert_eq!(cell.style.bg, Some(Color::BLUE));
        assert_eq!(cell.style.fg, Some(Color::WHITE));
    }

    #[test]
    fn diff_reports_changes_only() {
        let before = Canvas::new(3, 1);
        let mut after = before.clone();
        after.place_strips(&[Strip::text(1, 0, "z", CellStyle::default())], after.bounds());
        let updates = after.diff(&before);
        assert_eq!(updates.len(), 1);
        assert_eq!((updates[0].x, updates[0].y, updates[0].cell.ch), (1, 0, 'z'));
    }

    #[test]
    fn diff_against_smaller_frame() {
        let before = Canvas::new(1, 1);
        let after = Canvas::new(2, 2);
        assert_eq!(after.diff(&before).len(), 3);
    }

    #[test]
    fn restyle_region() {
        let mut c = Canvas::new(3, 1);
        c.restyle(Region::new(0, 0, 2, 1), |s| s.reverse = true);
        assert!(c.get_cell(0, 0).unwrap().style.reverse);
        assert!(!c.get_cell(2, 0).unwrap().style.reverse);
    }
}
