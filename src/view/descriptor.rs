//! View descriptors: the immutable, per-node output of a factory.
//!
//! A descriptor pairs a closed [`ViewKind`] (with the kind's typed props)
//! and the [`CommonProps`] every kind shares. Descriptors hold no layout
//! state; the render walk reads them alongside the node's children.

use serde_json::Value;

use crate::event::{EventKind, PushEvent};
use crate::modifier::Scope;
use crate::style::{Align1d, Alignment, Arrangement, Color, Dp, Insets, Shape, Sp};

use super::common::CommonProps;

// ---------------------------------------------------------------------------
// Per-kind props
// ---------------------------------------------------------------------------

/// Axes along which a container's content may be scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAxes {
    #[default]
    None,
    Vertical,
    Horizontal,
    Both,
}

impl ScrollAxes {
    /// `vertical`, `horizontal` or `both`; anything else disables scrolling.
    pub fn from_attr(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "vertical" => Self::Vertical,
            "horizontal" => Self::Horizontal,
            "both" => Self::Both,
            _ => Self::None,
        }
    }

    pub fn vertical(self) -> bool {
        matches!(self, Self::Vertical | Self::Both)
    }

    pub fn horizontal(self) -> bool {
        matches!(self, Self::Horizontal | Self::Both)
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxProps {
    pub content_alignment: Alignment,
    pub propagate_min_constraints: bool,
    pub scroll: ScrollAxes,
}

impl Default for BoxProps {
    fn default() -> Self {
        Self {
            content_alignment: Alignment::TopStart,
            propagate_min_constraints: false,
            scroll: ScrollAxes::None,
        }
    }
}

/// Props shared by Row and Column: main-axis arrangement and cross-axis
/// alignment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearProps {
    pub arrangement: Arrangement,
    pub alignment: Align1d,
    pub scroll: ScrollAxes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LazyListProps {
    pub orientation: Orientation,
    pub arrangement: Arrangement,
    pub alignment: Align1d,
    pub reverse_layout: bool,
    /// Scrolls along its own axis unless `scroll` says otherwise.
    pub scroll: ScrollAxes,
    pub content_padding: Option<Dp>,
    pub horizontal_padding: Option<Dp>,
    pub vertical_padding: Option<Dp>,
    pub start_padding: Option<Dp>,
    pub top_padding: Option<Dp>,
    pub end_padding: Option<Dp>,
    pub bottom_padding: Option<Dp>,
}

impl LazyListProps {
    pub fn new(orientation: Orientation) -> Self {
        let (arrangement, alignment, scroll) = match orientation {
            Orientation::Vertical => (Arrangement::Start, Align1d::Start, ScrollAxes::Vertical),
            Orientation::Horizontal => {
                (Arrangement::SpaceAround, Align1d::Center, ScrollAxes::Horizontal)
            }
        };
        Self {
            orientation,
            arrangement,
            alignment,
            reverse_layout: false,
            scroll,
            content_padding: None,
            horizontal_padding: None,
            vertical_padding: None,
            start_padding: None,
            top_padding: None,
            end_padding: None,
            bottom_padding: None,
        }
    }

    /// Effective content padding. A side's own value wins, then its axis
    /// value, then `content-padding`.
    pub fn padding(&self) -> Insets {
        let all = self.content_padding.unwrap_or(Dp::ZERO);
        let horizontal = self.horizontal_padding.unwrap_or(all);
        let vertical = self.vertical_padding.unwrap_or(all);
        Insets::new(
            self.start_padding.unwrap_or(horizontal),
            self.top_padding.unwrap_or(vertical),
            self.end_padding.unwrap_or(horizontal),
            self.bottom_padding.unwrap_or(vertical),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardProps {
    pub shape: Shape,
    pub background: Option<Color>,
    pub elevation: Dp,
}

impl Default for CardProps {
    fn default() -> Self {
        Self {
            shape: Shape::default(),
            background: None,
            elevation: Dp(1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextProps {
    pub text: String,
    pub color: Option<Color>,
    pub font_size: Option<Sp>,
    pub font_weight: Option<u16>,
    pub max_lines: Option<usize>,
}

impl TextProps {
    pub fn is_bold(&self) -> bool {
        self.font_weight.is_some_and(|w| w >= 600)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonProps {
    pub enabled: bool,
}

impl Default for ButtonProps {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// IconButton color overrides; unset entries use the theme default.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IconButtonColors {
    pub container: Option<Color>,
    pub content: Option<Color>,
    pub disabled_container: Option<Color>,
    pub disabled_content: Option<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconButtonProps {
    pub enabled: bool,
    pub colors: IconButtonColors,
}

impl Default for IconButtonProps {
    fn default() -> Self {
        Self {
            enabled: true,
            colors: IconButtonColors::default(),
        }
    }
}

impl IconButtonProps {
    /// (container, content) colors for the current enabled state.
    pub fn effective_colors(&self) -> (Option<Color>, Option<Color>) {
        if self.enabled {
            (self.colors.container, self.colors.content)
        } else {
            (self.colors.disabled_container, self.colors.disabled_content)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IconProps {
    pub image_vector: Option<String>,
    pub content_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabRowProps {
    pub selected_tab_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabProps {
    pub selected: bool,
    pub enabled: bool,
    pub selected_content_color: Option<Color>,
    pub unselected_content_color: Option<Color>,
}

impl Default for TabProps {
    fn default() -> Self {
        Self {
            selected: false,
            enabled: true,
            selected_content_color: None,
            unselected_content_color: None,
        }
    }
}

impl TabProps {
    pub fn content_color(&self) -> Option<Color> {
        if self.selected {
            self.selected_content_color
        } else {
            self.unselected_content_color
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DividerProps {
    pub thickness: Dp,
    pub color: Option<Color>,
}

impl Default for DividerProps {
    fn default() -> Self {
        Self {
            thickness: Dp(1.0),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxProps {
    pub checked: bool,
    pub enabled: bool,
}

impl Default for CheckboxProps {
    fn default() -> Self {
        Self {
            checked: false,
            enabled: true,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewKind
// ---------------------------------------------------------------------------

/// The closed set of view kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewKind {
    Box(BoxProps),
    Row(LinearProps),
    Column(LinearProps),
    LazyList(LazyListProps),
    Card(CardProps),
    Text(TextProps),
    Button(ButtonProps),
    IconButton(IconButtonProps),
    Icon(IconProps),
    TabRow(TabRowProps),
    Tab(TabProps),
    Divider(DividerProps),
    Spacer,
    Checkbox(CheckboxProps),
    /// Default leaf for unregistered tags. Applies common props only and
    /// renders no children.
    Fallback,
}

impl ViewKind {
    /// Short name for logs and debug output.
    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::Box(_) => "box",
            ViewKind::Row(_) => "row",
            ViewKind::Column(_) => "column",
            ViewKind::LazyList(p) if p.orientation == Orientation::Horizontal => "lazy-row",
            ViewKind::LazyList(_) => "lazy-column",
            ViewKind::Card(_) => "card",
            ViewKind::Text(_) => "text",
            ViewKind::Button(_) => "button",
            ViewKind::IconButton(_) => "icon-button",
            ViewKind::Icon(_) => "icon",
            ViewKind::TabRow(_) => "tab-row",
            ViewKind::Tab(_) => "tab",
            ViewKind::Divider(_) => "divider",
            ViewKind::Spacer => "spacer",
            ViewKind::Checkbox(_) => "checkbox",
            ViewKind::Fallback => "fallback",
        }
    }

    /// Whether the kind renders its children.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ViewKind::Box(_)
                | ViewKind::Row(_)
                | ViewKind::Column(_)
                | ViewKind::LazyList(_)
                | ViewKind::Card(_)
                | ViewKind::Button(_)
                | ViewKind::IconButton(_)
                | ViewKind::TabRow(_)
                | ViewKind::Tab(_)
        )
    }

    /// Scrollable axes; only layout containers scroll.
    pub fn scroll(&self) -> ScrollAxes {
        match self {
            ViewKind::Box(p) => p.scroll,
            ViewKind::Row(p) | ViewKind::Column(p) => p.scroll,
            ViewKind::LazyList(p) => p.scroll,
            _ => ScrollAxes::None,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewDescriptor
// ---------------------------------------------------------------------------

/// A fully-resolved view for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDescriptor {
    pub tag: String,
    pub kind: ViewKind,
    pub common: CommonProps,
}

impl ViewDescriptor {
    pub fn new(tag: impl Into<String>, kind: ViewKind, common: CommonProps) -> Self {
        Self {
            tag: tag.into(),
            kind,
            common,
        }
    }

    /// Scope children of this view compile their scope-specific modifiers in.
    pub fn child_scope(&self) -> Scope {
        match &self.kind {
            ViewKind::Box(_) => Scope::Box,
            ViewKind::Row(_) | ViewKind::Button(_) => Scope::Row,
            ViewKind::Column(_) | ViewKind::Card(_) | ViewKind::Tab(_) => Scope::Column,
            ViewKind::LazyList(p) => match p.orientation {
                Orientation::Vertical => Scope::LazyColumn,
                Orientation::Horizontal => Scope::LazyRow,
            },
            _ => Scope::None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        match &self.kind {
            ViewKind::Button(p) => p.enabled,
            ViewKind::IconButton(p) => p.enabled,
            ViewKind::Tab(p) => p.enabled,
            ViewKind::Checkbox(p) => p.enabled,
            _ => true,
        }
    }

    /// What a pointer click on this view fires, with its interaction value.
    ///
    /// A checkbox click is a `change` carrying the toggled state.
    pub fn click_event(&self) -> (EventKind, Option<Value>) {
        match &self.kind {
            ViewKind::Checkbox(p) => (EventKind::Change, Some(Value::Bool(!p.checked))),
            _ => (EventKind::Click, None),
        }
    }

    /// Whether a click on this view would dispatch anything.
    pub fn is_clickable(&self) -> bool {
        self.is_enabled() && self.common.binding(self.click_event().0).is_some()
    }

    /// Dispatch the event bound to `kind`, merging `value` into the bound
    /// values as the primary value. Returns `false` when nothing is bound or
    /// the view is disabled.
    pub fn fire(&self, kind: EventKind, value: Option<Value>) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let Some(name) = self.common.binding(kind) else {
            return false;
        };
        let payload = self.common.values.payload_with(value);
        self.common
            .dispatch
            .dispatch(PushEvent::new(kind, name, payload));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Dispatch;
    use crate::view::values::PhxValues;
    use serde_json::json;

    fn with_binding(kind: ViewKind, event: EventKind, dispatch: &Dispatch) -> ViewDescriptor {
        let mut common = CommonProps {
            dispatch: dispatch.clone(),
            values: PhxValues::new().with_named("row", "3"),
            ..CommonProps::default()
        };
        common.bindings.insert(event, "toggle".into());
        ViewDescriptor::new("X", kind, common)
    }

    #[test]
    fn lazy_row_defaults() {
        let p = LazyListProps::new(Orientation::Horizontal);
        assert_eq!(p.arrangement, Arrangement::SpaceAround);
        assert_eq!(p.alignment, Align1d::Center);
    }

    #[test]
    fn lazy_padding_axis_overrides() {
        let mut p = LazyListProps::new(Orientation::Vertical);
        p.content_padding = Some(Dp(2.0));
        p.vertical_padding = Some(Dp(1.0));
        assert_eq!(p.padding(), Insets::symmetric(Dp(2.0), Dp(1.0)));
    }

    #[test]
    fn lazy_padding_side_overrides_axis() {
        let mut p = LazyListProps::new(Orientation::Vertical);
        p.content_padding = Some(Dp(2.0));
        p.horizontal_padding = Some(Dp(1.0));
        p.start_padding = Some(Dp(4.0));
        p.bottom_padding = Some(Dp::ZERO);
        assert_eq!(p.padding(), Insets::new(Dp(4.0), Dp(2.0), Dp(1.0), Dp::ZERO));
    }

    #[test]
    fn scroll_axes_from_attr() {
        assert_eq!(ScrollAxes::from_attr("Vertical"), ScrollAxes::Vertical);
        assert!(ScrollAxes::from_attr("both").horizontal());
        assert!(ScrollAxes::from_attr("sideways").is_none());
        assert_eq!(LazyListProps::new(Orientation::Horizontal).scroll, ScrollAxes::Horizontal);
    }

    #[test]
    fn checkbox_click_is_change_with_toggled_state() {
        let (dispatch, mut rx) = Dispatch::channel();
        let d = with_binding(
            ViewKind::Checkbox(CheckboxProps::default()),
            EventKind::Change,
            &dispatch,
        );
        let (kind, value) = d.click_event();
        assert!(d.fire(kind, value));
        let event = rx.try_recv().expect("event sent");
        assert_eq!(event.event_type, "change");
        assert_eq!(event.payload, json!({"value": true, "row": "3"}));
    }

    #[test]
    fn disabled_view_does_not_fire() {
        let (dispatch, mut rx) = Dispatch::channel();
        let d = with_binding(
            ViewKind::Button(ButtonProps { enabled: false }),
            EventKind::Click,
            &dispatch,
        );
        assert!(!d.is_clickable());
        assert!(!d.fire(EventKind::Click, None));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unbound_event_does_not_fire() {
        let d = with_binding(ViewKind::Spacer, EventKind::Click, &Dispatch::noop());
        assert!(!d.fire(EventKind::Blur, None));
    }

    #[test]
    fn child_scopes() {
        let d = ViewDescriptor::new("Row", ViewKind::Row(LinearProps::default()), CommonProps::default());
        assert_eq!(d.child_scope(), Scope::Row);
        let d = ViewDescriptor::new("Text", ViewKind::Text(TextProps::default()), CommonProps::default());
        assert_eq!(d.child_scope(), Scope::None);
    }
}
