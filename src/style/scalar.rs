//! Scalar values and layout enums: Dp, Sp, Insets, alignment, arrangement, shape.
//!
//! One dp and one sp each map to one terminal cell at render time.

use std::fmt;

fn write_number(f: &mut fmt::Formatter<'_>, value: f32, suffix: &str) -> fmt::Result {
    if value.fract() == 0.0 {
        write!(f, "{}{suffix}", value as i64)
    } else {
        write!(f, "{value}{suffix}")
    }
}

// ---------------------------------------------------------------------------
// Dp / Sp
// ---------------------------------------------------------------------------

/// A device-independent length.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Dp(pub f32);

impl Dp {
    pub const ZERO: Dp = Dp(0.0);

    /// The length in terminal cells.
    pub fn cells(self) -> f32 {
        self.0
    }
}

impl fmt::Display for Dp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_number(f, self.0, "dp")
    }
}

/// A scale-independent text size.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Sp(pub f32);

impl fmt::Display for Sp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_number(f, self.0, "sp")
    }
}

// ---------------------------------------------------------------------------
// Insets
// ---------------------------------------------------------------------------

/// Four-sided insets in layout-direction order (start, top, end, bottom).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub start: Dp,
    pub top: Dp,
    pub end: Dp,
    pub bottom: Dp,
}

impl Insets {
    /// The same inset on every side.
    pub fn all(v: Dp) -> Self {
        Self {
            start: v,
            top: v,
            end: v,
            bottom: v,
        }
    }

    /// Horizontal insets on start/end, vertical on top/bottom.
    pub fn symmetric(horizontal: Dp, vertical: Dp) -> Self {
        Self {
            start: horizontal,
            top: vertical,
            end: horizontal,
            bottom: vertical,
        }
    }

    pub fn new(start: Dp, top: Dp, end: Dp, bottom: Dp) -> Self {
        Self {
            start,
            top,
            end,
            bottom,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Insets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end && self.top == self.bottom {
            if self.start == self.top {
                return write!(f, "{}", self.start);
            }
            return write!(f, "{}, {}", self.start, self.top);
        }
        write!(f, "{}, {}, {}, {}", self.start, self.top, self.end, self.bottom)
    }
}

// ---------------------------------------------------------------------------
// IntrinsicSize
// ---------------------------------------------------------------------------

/// `IntrinsicSize.Min` / `IntrinsicSize.Max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntrinsicSize {
    Min,
    Max,
}

impl IntrinsicSize {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.rsplit('.').next()? {
            "Min" | "min" => Some(Self::Min),
            "Max" | "max" => Some(Self::Max),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Alignment constants. The nine two-dimensional values apply in a Box; the
/// one-dimensional values apply along the cross axis of a Row or Column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    TopStart,
    TopCenter,
    TopEnd,
    CenterStart,
    Center,
    CenterEnd,
    BottomStart,
    BottomCenter,
    BottomEnd,
    Top,
    CenterVertically,
    Bottom,
    Start,
    CenterHorizontally,
    End,
}

impl Alignment {
    /// Resolve `Alignment.TopStart`, `TopStart` or attribute-style `topStart`.
    pub fn from_name(name: &str) -> Option<Self> {
        let bare = name.rsplit('.').next()?;
        ALIGNMENTS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(bare))
            .map(|(_, a)| *a)
    }

    /// Whether this is one of the nine Box alignments.
    pub fn is_two_dimensional(self) -> bool {
        !self.is_vertical() && !self.is_horizontal()
    }

    /// `Top`, `CenterVertically`, `Bottom`.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::CenterVertically | Self::Bottom)
    }

    /// `Start`, `CenterHorizontally`, `End`.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Start | Self::CenterHorizontally | Self::End)
    }

    /// The (horizontal, vertical) components as start/center/end positions.
    pub fn components(self) -> (Align1d, Align1d) {
        use Align1d::*;
        match self {
            Self::TopStart => (Start, Start),
            Self::TopCenter => (Center, Start),
            Self::TopEnd => (End, Start),
            Self::CenterStart => (Start, Center),
            Self::Center => (Center, Center),
            Self::CenterEnd => (End, Center),
            Self::BottomStart => (Start, End),
            Self::BottomCenter => (Center, End),
            Self::BottomEnd => (End, End),
            Self::Top => (Start, Start),
            Self::CenterVertically => (Start, Center),
            Self::Bottom => (Start, End),
            Self::Start => (Start, Start),
            Self::CenterHorizontally => (Center, Start),
            Self::End => (End, Start),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = ALIGNMENTS
            .iter()
            .find(|(_, a)| a == self)
            .map(|(n, _)| *n)
            .unwrap_or("?");
        write!(f, "Alignment.{name}")
    }
}

const ALIGNMENTS: &[(&str, Alignment)] = &[
    ("TopStart", Alignment::TopStart),
    ("TopCenter", Alignment::TopCenter),
    ("TopEnd", Alignment::TopEnd),
    ("CenterStart", Alignment::CenterStart),
    ("Center", Alignment::Center),
    ("CenterEnd", Alignment::CenterEnd),
    ("BottomStart", Alignment::BottomStart),
    ("BottomCenter", Alignment::BottomCenter),
    ("BottomEnd", Alignment::BottomEnd),
    ("Top", Alignment::Top),
    ("CenterVertically", Alignment::CenterVertically),
    ("Bottom", Alignment::Bottom),
    ("Start", Alignment::Start),
    ("CenterHorizontally", Alignment::CenterHorizontally),
    ("End", Alignment::End),
];

/// Position along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align1d {
    #[default]
    Start,
    Center,
    End,
}

impl Align1d {
    /// Row `vertical-alignment`: `top`, `center`, anything else is bottom.
    pub fn from_vertical_attr(value: &str) -> Self {
        match value {
            "top" => Self::Start,
            "center" => Self::Center,
            _ => Self::End,
        }
    }

    /// Column `horizontal-alignment`: `start`, `center`, anything else is end.
    pub fn from_horizontal_attr(value: &str) -> Self {
        match value {
            "start" => Self::Start,
            "center" => Self::Center,
            _ => Self::End,
        }
    }
}

// ---------------------------------------------------------------------------
// Arrangement
// ---------------------------------------------------------------------------

/// Main-axis arrangement of Row/Column children.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Arrangement {
    #[default]
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
    SpacedBy(Dp),
}

impl Arrangement {
    /// Parse an arrangement attribute. Numbers mean `spacedBy(n)`; unknown
    /// keywords fall back to `Center`.
    pub fn from_attr(value: &str) -> Self {
        if let Ok(n) = value.trim().parse::<f32>() {
            return Self::SpacedBy(Dp(n));
        }
        match value.trim() {
            "spaceEvenly" => Self::SpaceEvenly,
            "spaceAround" => Self::SpaceAround,
            "spaceBetween" => Self::SpaceBetween,
            "start" | "top" => Self::Start,
            "end" | "bottom" => Self::End,
            _ => Self::Center,
        }
    }
}

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// Outline shape for clip, background, and Card.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Shape {
    #[default]
    Rectangle,
    Circle,
    Rounded(Dp),
}

impl Shape {
    /// Parse a `shape` attribute: digits give rounded corners, otherwise
    /// `circle` or `rectangle`.
    pub fn from_attr(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(n) = value.parse::<f32>() {
            return Some(Self::Rounded(Dp(n)));
        }
        match value {
            "circle" => Some(Self::Circle),
            "rectangle" => Some(Self::Rectangle),
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Rectangle => write!(f, "RectangleShape"),
            Shape::Circle => write!(f, "CircleShape"),
            Shape::Rounded(r) => write!(f, "RoundedCornerShape({r})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dp_display() {
        assert_eq!(Dp(100.0).to_string(), "100dp");
        assert_eq!(Dp(1.5).to_string(), "1.5dp");
        assert_eq!(Sp(12.0).to_string(), "12sp");
    }

    #[test]
    fn insets_constructors() {
        let i = Insets::symmetric(Dp(2.0), Dp(1.0));
        assert_eq!(i.start, Dp(2.0));
        assert_eq!(i.bottom, Dp(1.0));
        assert!(Insets::default().is_zero());
        assert_eq!(Insets::all(Dp(3.0)).to_string(), "3dp");
        assert_eq!(i.to_string(), "2dp, 1dp");
    }

    #[test]
    fn alignment_names() {
        assert_eq!(Alignment::from_name("Alignment.TopStart"), Some(Alignment::TopStart));
        assert_eq!(Alignment::from_name("bottomEnd"), Some(Alignment::BottomEnd));
        assert_eq!(Alignment::from_name("Alignment.Sideways"), None);
        assert_eq!(Alignment::Center.to_string(), "Alignment.Center");
    }

    #[test]
    fn alignment_classes() {
        assert!(Alignment::Center.is_two_dimensional());
        assert!(Alignment::CenterVertically.is_vertical());
        assert!(Alignment::End.is_horizontal());
        assert!(!Alignment::End.is_two_dimensional());
    }

    #[test]
    fn alignment_components() {
        assert_eq!(Alignment::BottomCenter.components(), (Align1d::Center, Align1d::End));
    }

    #[test]
    fn arrangement_from_attr() {
        assert_eq!(Arrangement::from_attr("spaceBetween"), Arrangement::SpaceBetween);
        assert_eq!(Arrangement::from_attr("8"), Arrangement::SpacedBy(Dp(8.0)));
        assert_eq!(Arrangement::from_attr("wobbly"), Arrangement::Center);
    }

    #[test]
    fn shape_from_attr() {
        assert_eq!(Shape::from_attr("8"), Some(Shape::Rounded(Dp(8.0))));
        assert_eq!(Shape::from_attr("circle"), Some(Shape::Circle));
        assert_eq!(Shape::from_attr("blob"), None);
    }

    #[test]
    fn intrinsic_from_name() {
        assert_eq!(IntrinsicSize::from_name("IntrinsicSize.Min"), Some(IntrinsicSize::Min));
        assert_eq!(IntrinsicSize::from_name("Max"), Some(IntrinsicSize::Max));
        assert_eq!(IntrinsicSize::from_name("Mid"), None);
    }
}
