//! Screen regions in terminal cells.
//!
//! Layout results, paint clipping, and click hit-testing all work in
//! [`Region`]s with the origin at the top-left cell.

/// A rectangular region in terminal cells defined by position and size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    /// An empty region at the origin.
    pub const EMPTY: Region = Region { x: 0, y: 0, width: 0, height: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// The right edge (exclusive): `x + width`.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// The bottom edge (exclusive): `y + height`.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether the point (x, y) lies inside this region.
    #[inline]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// The overlap of two regions, or [`Region::EMPTY`].
    pub const fn intersection(self, other: Region) -> Region {
        let x1 = if self.x > other.x { self.x } else { other.x };
        let y1 = if self.y > other.y { self.y } else { other.y };
        let x2 = if self.right() < other.right() { self.right() } else { other.right() };
        let y2 = if self.bottom() < other.bottom() { self.bottom() } else { other.bottom() };
        if x2 <= x1 || y2 <= y1 {
            Region::EMPTY
        } else {
            Region { x: x1, y: y1, width: x2 - x1, height: y2 - y1 }
        }
    }

    /// Shrink by `n` cells on every side, never below zero size.
    pub fn inset(self, n: i32) -> Region {
        Region {
            x: self.x + n,
            y: self.y + n,
            width: (self.width - 2 * n).max(0),
            height: (self.height - 2 * n).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_and_contains() {
        let r = Region::new(2, 3, 4, 5);
        assert_eq!(r.right(), 6);
        assert_eq!(r.bottom(), 8);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 7));
        assert!(!r.contains(6, 7));
        assert!(!r.contains(1, 3));
    }

    #[test]
    fn intersection_overlapping() {
        let a = Region::new(0, 0, 10, 10);
        let b = Region::new(5, 5, 10, 10);
        assert_eq!(a.intersection(b), Region::new(5, 5, 5, 5));
    }

    #[test]
    fn intersection_disjoint_is_empty() {
        let a = Region::new(0, 0, 2, 2);
        let b = Region::new(5, 5, 2, 2);
        assert_eq!(a.intersection(b), Region::EMPTY);
        assert!(Region::EMPTY.is_empty());
    }

    #[test]
    fn inset_clamps() {
        assert_eq!(Region::new(0, 0, 10, 4).inset(1), Region::new(1, 1, 8, 2));
        assert_eq!(Region::new(0, 0, 1, 1).inset(1).width, 0);
    }
}
