//! Modifier values, the ordered chain, and layout scopes.
//!
//! A [`ModifierChain`] is applied outer-to-inner in insertion order:
//! `padding(4);background(Red)` paints inside the padding, while
//! `background(Red);padding(4)` paints underneath it.

use std::fmt;

use crate::style::color::Color;
use crate::style::scalar::{Alignment, Dp, Insets, IntrinsicSize, Shape};

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// The kind of parent a node is laid out in. Scope-specific modifiers only
/// take effect in their matching scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    None,
    Box,
    Row,
    Column,
    LazyRow,
    LazyColumn,
}

impl Scope {
    /// Children run horizontally.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Scope::Row | Scope::LazyRow)
    }

    /// Children run vertically.
    pub fn is_vertical(self) -> bool {
        matches!(self, Scope::Column | Scope::LazyColumn)
    }
}

// ---------------------------------------------------------------------------
// Modifier
// ---------------------------------------------------------------------------

/// A width or height constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    Fixed(Dp),
    Intrinsic(IntrinsicSize),
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Fixed(dp) => write!(f, "{dp}"),
            Extent::Intrinsic(IntrinsicSize::Min) => write!(f, "IntrinsicSize.Min"),
            Extent::Intrinsic(IntrinsicSize::Max) => write!(f, "IntrinsicSize.Max"),
        }
    }
}

/// Progress semantics. `None` in [`Modifier::ProgressSemantics`] means
/// indeterminate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub value: f32,
    pub range: (f32, f32),
    pub steps: i64,
}

/// One layout or paint transformation.
#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    Size { width: Dp, height: Dp },
    Width(Extent),
    Height(Extent),
    WidthIn { min: Option<Dp>, max: Option<Dp> },
    HeightIn { min: Option<Dp>, max: Option<Dp> },
    FillMaxWidth(f32),
    FillMaxHeight(f32),
    FillMaxSize(f32),
    AspectRatio { ratio: f32, match_height_constraints_first: bool },
    Padding(Insets),
    Offset { x: Dp, y: Dp },
    Background(Color),
    Border { width: Dp, color: Color },
    Clip(Shape),
    Alpha(f32),
    /// Row/Column scope only.
    Weight { weight: f32, fill: bool },
    /// Box, Row, or Column scope; the alignment class must match the scope.
    Align(Alignment),
    /// Box scope only.
    MatchParentSize,
    LayoutId(String),
    ProgressSemantics(Option<Progress>),
    TestTag(String),
}

fn opt(v: &Option<Dp>) -> String {
    v.map(|d| d.to_string()).unwrap_or_else(|| "Unspecified".into())
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Size { width, height } if width == height => write!(f, "size({width})"),
            Modifier::Size { width, height } => write!(f, "size({width}, {height})"),
            Modifier::Width(e) => write!(f, "width({e})"),
            Modifier::Height(e) => write!(f, "height({e})"),
            Modifier::WidthIn { min, max } => write!(f, "widthIn({}, {})", opt(min), opt(max)),
            Modifier::HeightIn { min, max } => write!(f, "heightIn({}, {})", opt(min), opt(max)),
            Modifier::FillMaxWidth(frac) => write!(f, "fillMaxWidth({frac})"),
            Modifier::FillMaxHeight(frac) => write!(f, "fillMaxHeight({frac})"),
            Modifier::FillMaxSize(frac) => write!(f, "fillMaxSize({frac})"),
            Modifier::AspectRatio { ratio, match_height_constraints_first } => {
                write!(f, "aspectRatio({ratio}, {match_height_constraints_first})")
            }
            Modifier::Padding(insets) => write!(f, "padding({insets})"),
            Modifier::Offset { x, y } => write!(f, "offset({x}, {y})"),
            Modifier::Background(c) => write!(f, "background({c})"),
            Modifier::Border { width, color } => write!(f, "border({width}, {color})"),
            Modifier::Clip(shape) => write!(f, "clip({shape})"),
            Modifier::Alpha(a) => write!(f, "alpha({a})"),
            Modifier::Weight { weight, fill } => write!(f, "weight({weight}, {fill})"),
            Modifier::Align(a) => write!(f, "align({a})"),
            Modifier::MatchParentSize => write!(f, "matchParentSize()"),
            Modifier::LayoutId(id) => write!(f, "layoutId(\"{id}\")"),
            Modifier::ProgressSemantics(None) => write!(f, "progressSemantics()"),
            Modifier::ProgressSemantics(Some(p)) => write!(
                f,
                "progressSemantics({}, {}..{}, {})",
                p.value, p.range.0, p.range.1, p.steps
            ),
            Modifier::TestTag(tag) => write!(f, "testTag(\"{tag}\")"),
        }
    }
}

// ---------------------------------------------------------------------------
// ModifierChain
// ---------------------------------------------------------------------------

/// An ordered, append-only sequence of modifiers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModifierChain(Vec<Modifier>);

impl ModifierChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a modifier (builder).
    pub fn then(mut self, modifier: Modifier) -> Self {
        self.0.push(modifier);
        self
    }

    /// Append every modifier of `other`, keeping its order.
    pub fn then_chain(mut self, other: ModifierChain) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn push(&mut self, modifier: Modifier) {
        self.0.push(modifier);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Modifier> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Modifier] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ModifierChain {
    type Item = &'a Modifier;
    type IntoIter = std::slice::Iter<'a, Modifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Modifier> for ModifierChain {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ModifierChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, m) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{m}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn then_preserves_order() {
        let chain = ModifierChain::new()
            .then(Modifier::Padding(Insets::all(Dp(1.0))))
            .then(Modifier::Background(Color::RED));
        assert_eq!(chain.len(), 2);
        assert!(matches!(chain.as_slice()[0], Modifier::Padding(_)));
        assert_eq!(chain.to_string(), "[padding(1dp), background(Red)]");
    }

    #[test]
    fn then_chain_appends() {
        let a = ModifierChain::new().then(Modifier::Alpha(0.5));
        let b = ModifierChain::new().then(Modifier::MatchParentSize);
        let joined = a.then_chain(b);
        assert_eq!(joined.to_string(), "[alpha(0.5), matchParentSize()]");
    }

    #[test]
    fn display_variants() {
        assert_eq!(
            Modifier::Size { width: Dp(3.0), height: Dp(4.0) }.to_string(),
            "size(3dp, 4dp)"
        );
        assert_eq!(
            Modifier::WidthIn { min: Some(Dp(2.0)), max: None }.to_string(),
            "widthIn(2dp, Unspecified)"
        );
        assert_eq!(
            Modifier::Width(Extent::Intrinsic(IntrinsicSize::Min)).to_string(),
            "width(IntrinsicSize.Min)"
        );
    }

    #[test]
    fn scope_axes() {
        assert!(Scope::LazyRow.is_horizontal());
        assert!(Scope::Column.is_vertical());
        assert!(!Scope::Box.is_horizontal());
        assert_eq!(Scope::default(), Scope::None);
    }
}
