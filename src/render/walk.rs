//! Render walk: published snapshot → taffy layout → painted [`Canvas`].
//!
//! Each [`RenderNode`] becomes a short stack of taffy nodes. The modifier
//! chain is folded outer to inner: `padding` and `border` close the current
//! layer and open a new one inside it, so clauses after them apply to the
//! inner box. Sizes are first-wins per layer. The innermost layer carries
//! the view kind's own container style and content. Placement modifiers
//! (`weight`, `align`, `matchParentSize`) land on the outermost layer, where
//! the parent's layout sees them.
//!
//! Layout runs once at the viewport size, then a single pre-order paint pass
//! fills the canvas and records click targets. Containers with a `scroll`
//! axis clip their content and paint it shifted by the container's offset;
//! their children keep their main-axis size instead of shrinking to fit.

use taffy::prelude::*;
use taffy::style::Overflow;
use taffy::TaffyResult;
use tracing::warn;

use crate::geometry::Region;
use crate::modifier::{Extent, Modifier, Scope};
use crate::reconcile::{RenderNode, Snapshot};
use crate::style::{Align1d, Arrangement, Color, Dp, Insets, Shape};
use crate::view::{Orientation, ScrollAxes, ViewDescriptor, ViewKind};

use super::canvas::Canvas;
use super::scroll::{ScrollOffsets, Scrollable};
use super::strip::{CellStyle, Strip};

const DEFAULT_BORDER: Color = Color::GRAY;
const DEFAULT_DIVIDER: Color = Color::DARK_GRAY;

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// A click target: a screen region routed to a node's identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub region: Region,
    pub key: String,
}

/// A painted frame plus its click targets and scroll containers, both in
/// paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub canvas: Canvas,
    pub hits: Vec<Hit>,
    pub scrollables: Vec<Scrollable>,
}

impl Frame {
    pub fn empty(width: u16, height: u16) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            hits: Vec::new(),
            scrollables: Vec::new(),
        }
    }

    /// The topmost target under (x, y).
    pub fn hit_at(&self, x: i32, y: i32) -> Option<&Hit> {
        self.hits.iter().rev().find(|h| h.region.contains(x, y))
    }

    /// The innermost scroll container under (x, y).
    pub fn scrollable_at(&self, x: i32, y: i32) -> Option<&Scrollable> {
        self.scrollables.iter().rev().find(|s| s.region.contains(x, y))
    }

    /// The innermost scroll container enclosing `key`, falling back to the
    /// first one painted.
    pub fn scrollable_around(&self, key: Option<&str>) -> Option<&Scrollable> {
        key.and_then(|key| self.scrollables.iter().rev().find(|s| s.encloses(key)))
            .or_else(|| self.scrollables.first())
    }

    /// Distinct click-target keys in paint order; the keyboard focus ring.
    pub fn focus_order(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for hit in &self.hits {
            if !keys.contains(&hit.key.as_str()) {
                keys.push(&hit.key);
            }
        }
        keys
    }

    /// The canvas as text, one line per row, trailing spaces trimmed.
    pub fn text(&self) -> String {
        (0..self.canvas.height)
            .map(|y| self.canvas.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Lay out and paint `snapshot` at `width` × `height` cells.
pub fn render(snapshot: &Snapshot, width: u16, height: u16) -> Frame {
    render_scrolled(snapshot, width, height, &ScrollOffsets::default())
}

/// [`render`] with scroll containers shifted by `offsets`.
pub fn render_scrolled(
    snapshot: &Snapshot,
    width: u16,
    height: u16,
    offsets: &ScrollOffsets,
) -> Frame {
    let Some(root) = &snapshot.root else {
        return Frame::empty(width, height);
    };
    match Walk::new(width, height, offsets).run(root) {
        Ok(frame) => frame,
        Err(error) => {
            warn!(%error, "layout failed, rendering blank frame");
            Frame::empty(width, height)
        }
    }
}

// ---------------------------------------------------------------------------
// Layers and visuals
// ---------------------------------------------------------------------------

/// What a taffy node paints, beyond its background.
#[derive(Debug, Clone, PartialEq)]
enum Content {
    None,
    Text { lines: Vec<String>, color: Option<Color>, bold: bool },
    Glyph(char),
    Checkbox { checked: bool },
    Divider { vertical: bool, color: Color },
    ButtonFrame,
    TabIndicator { selected: bool },
}

#[derive(Debug, Clone)]
struct Visual {
    background: Option<Color>,
    border: Option<(Color, bool)>,
    content: Content,
    /// Content color inherited by descendants.
    fg: Option<Color>,
    dim: bool,
    hidden: bool,
    hit: Option<String>,
    /// Identity key and axes of a scroll container.
    scroll: Option<(String, ScrollAxes)>,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            background: None,
            border: None,
            content: Content::None,
            fg: None,
            dim: false,
            hidden: false,
            hit: None,
            scroll: None,
        }
    }
}

/// One box of the outer-to-inner stack built from a modifier chain.
#[derive(Default)]
struct Layer {
    style: Style,
    width: Option<Dimension>,
    height: Option<Dimension>,
    visual: Visual,
    rounded: bool,
}

impl Layer {
    fn inner(&self) -> Layer {
        Layer {
            rounded: self.rounded,
            ..Layer::default()
        }
    }

    fn set_width(&mut self, d: Dimension) {
        self.width.get_or_insert(d);
    }

    fn set_height(&mut self, d: Dimension) {
        self.height.get_or_insert(d);
    }

    fn style(mut self) -> (Style, Visual) {
        if let Some(w) = self.width {
            self.style.size.width = w;
        }
        if let Some(h) = self.height {
            self.style.size.height = h;
        }
        (self.style, self.visual)
    }
}

/// Modifiers that affect how the parent places this node.
#[derive(Default)]
struct Placement {
    grow: Option<f32>,
    basis_zero: bool,
    align_self: Option<AlignItems>,
    justify_self: Option<AlignItems>,
    match_parent: bool,
}

fn cells(d: Dp) -> f32 {
    d.cells().max(0.0)
}

fn insets_rect(insets: Insets) -> taffy::geometry::Rect<LengthPercentage> {
    taffy::geometry::Rect {
        left: LengthPercentage::from_length(cells(insets.start)),
        right: LengthPercentage::from_length(cells(insets.end)),
        top: LengthPercentage::from_length(cells(insets.top)),
        bottom: LengthPercentage::from_length(cells(insets.bottom)),
    }
}

fn align(a: Align1d) -> AlignItems {
    match a {
        Align1d::Start => AlignItems::Start,
        Align1d::Center => AlignItems::Center,
        Align1d::End => AlignItems::End,
    }
}

fn arrangement(a: Arrangement) -> (JustifyContent, f32) {
    match a {
        Arrangement::Start => (JustifyContent::FlexStart, 0.0),
        Arrangement::End => (JustifyContent::FlexEnd, 0.0),
        Arrangement::Center => (JustifyContent::Center, 0.0),
        Arrangement::SpaceBetween => (JustifyContent::SpaceBetween, 0.0),
        Arrangement::SpaceAround => (JustifyContent::SpaceAround, 0.0),
        Arrangement::SpaceEvenly => (JustifyContent::SpaceEvenly, 0.0),
        Arrangement::SpacedBy(d) => (JustifyContent::FlexStart, cells(d)),
    }
}

fn linear(style: &mut Style, direction: FlexDirection, arr: Arrangement, cross: Align1d) {
    let (justify, gap) = arrangement(arr);
    style.display = Display::Flex;
    style.flex_direction = direction;
    style.justify_content = Some(justify);
    style.align_items = Some(align(cross));
    match direction {
        FlexDirection::Row | FlexDirection::RowReverse => {
            style.gap.width = LengthPercentage::from_length(gap)
        }
        _ => style.gap.height = LengthPercentage::from_length(gap),
    }
}

/// Glyph for an `image-vector` name such as `filled:Add` or `Icons.Filled.Add`.
fn icon_glyph(name: &str) -> char {
    let bare = name.rsplit(['.', ':']).next().unwrap_or(name);
    match bare.to_ascii_lowercase().as_str() {
        "add" => '+',
        "remove" => '−',
        "close" | "clear" => '✕',
        "check" | "done" => '✓',
        "delete" => '⌫',
        "favorite" => '♥',
        "favoriteborder" => '♡',
        "home" => '⌂',
        "menu" => '≡',
        "morevert" => '⋮',
        "search" => '⌕',
        "settings" => '⚙',
        "star" => '★',
        "info" => 'ℹ',
        "edit" => '✎',
        "refresh" => '↻',
        "email" => '✉',
        "arrowback" | "keyboardarrowleft" => '←',
        "arrowforward" | "keyboardarrowright" => '→',
        "arrowupward" | "keyboardarrowup" => '↑',
        "arrowdownward" | "keyboardarrowdown" => '↓',
        _ => '•',
    }
}

fn slot_rank(node: &RenderNode) -> u8 {
    match node.node.template.as_deref() {
        Some("icon") => 0,
        Some("text") => 1,
        _ => 2,
    }
}

// ---------------------------------------------------------------------------
// Walk
// ---------------------------------------------------------------------------

/// Per-child facts the parent decides.
#[derive(Clone, Copy)]
struct ChildContext {
    scope: Scope,
    in_tab_row: bool,
    selected: bool,
    /// The parent scrolls along its main axis.
    keep_main_size: bool,
}

struct Walk<'a> {
    tree: TaffyTree<usize>,
    visuals: Vec<Visual>,
    width: u16,
    height: u16,
    offsets: &'a ScrollOffsets,
}

impl<'a> Walk<'a> {
    fn new(width: u16, height: u16, offsets: &'a ScrollOffsets) -> Self {
        Self {
            tree: TaffyTree::new(),
            visuals: Vec::new(),
            width,
            height,
            offsets,
        }
    }

    fn run(mut self, root: &RenderNode) -> TaffyResult<Frame> {
        let ctx = ChildContext {
            scope: Scope::None,
            in_tab_row: false,
            selected: false,
            keep_main_size: false,
        };
        let root_id = self.build(root, ctx, true)?;
        self.tree.compute_layout(
            root_id,
            taffy::geometry::Size {
                width: AvailableSpace::Definite(self.width as f32),
                height: AvailableSpace::Definite(self.height as f32),
            },
        )?;
        let mut frame = Frame::empty(self.width, self.height);
        let bounds = frame.canvas.bounds();
        self.paint(root_id, (0.0, 0.0), bounds, None, false, &mut frame)?;
        Ok(frame)
    }

    fn leaf(&mut self, style: Style, visual: Visual, children: &[NodeId]) -> TaffyResult<NodeId> {
        let index = self.visuals.len();
        self.visuals.push(visual);
        let id = self.tree.new_leaf_with_context(style, index)?;
        if !children.is_empty() {
            self.tree.set_children(id, children)?;
        }
        Ok(id)
    }

    fn build(&mut self, node: &RenderNode, ctx: ChildContext, is_root: bool) -> TaffyResult<NodeId> {
        let d = &node.descriptor;
        let mut layers = vec![Layer::default()];
        let mut placement = Placement::default();
        let mut alpha = 1.0_f32;

        for modifier in d.common.modifiers.iter() {
            let last = layers.len() - 1;
            let layer = &mut layers[last];
            match modifier {
                Modifier::Size { width, height } => {
                    layer.set_width(Dimension::from_length(cells(*width)));
                    layer.set_height(Dimension::from_length(cells(*height)));
                }
                Modifier::Width(Extent::Fixed(w)) => layer.set_width(Dimension::from_length(cells(*w))),
                Modifier::Height(Extent::Fixed(h)) => {
                    layer.set_height(Dimension::from_length(cells(*h)))
                }
                Modifier::Width(Extent::Intrinsic(_)) | Modifier::Height(Extent::Intrinsic(_)) => {}
                Modifier::WidthIn { min, max } => {
                    if let Some(min) = min {
                        layer.style.min_size.width = Dimension::from_length(cells(*min));
                    }
                    if let Some(max) = max {
                        layer.style.max_size.width = Dimension::from_length(cells(*max));
                    }
                }
                Modifier::HeightIn { min, max } => {
                    if let Some(min) = min {
                        layer.style.min_size.height = Dimension::from_length(cells(*min));
                    }
                    if let Some(max) = max {
                        layer.style.max_size.height = Dimension::from_length(cells(*max));
                    }
                }
                Modifier::FillMaxWidth(f) => layer.set_width(Dimension::from_percent(*f)),
                Modifier::FillMaxHeight(f) => layer.set_height(Dimension::from_percent(*f)),
                Modifier::FillMaxSize(f) => {
                    layer.set_width(Dimension::from_percent(*f));
                    layer.set_height(Dimension::from_percent(*f));
                }
                Modifier::AspectRatio { ratio, .. } => {
                    layer.style.aspect_ratio.get_or_insert(*ratio);
                }
                Modifier::Padding(insets) => {
                    layer.style.padding = insets_rect(*insets);
                    let inner = layer.inner();
                    layers.push(inner);
                }
                Modifier::Offset { x, y } => {
                    layer.style.inset = taffy::geometry::Rect {
                        left: LengthPercentageAuto::from_length(x.cells()),
                        top: LengthPercentageAuto::from_length(y.cells()),
                        right: LengthPercentageAuto::AUTO,
                        bottom: LengthPercentageAuto::AUTO,
                    };
                }
                Modifier::Background(color) => layer.visual.background = Some(*color),
                Modifier::Border { width, color } => {
                    layer.style.border = insets_rect(Insets::all(*width));
                    layer.visual.border = Some((*color, layer.rounded));
                    let inner = layer.inner();
                    layers.push(inner);
                }
                Modifier::Clip(shape) => layer.rounded = !matches!(shape, Shape::Rectangle),
                Modifier::Alpha(a) => alpha *= a,
                Modifier::Weight { weight, fill } => {
                    placement.grow = Some(*weight);
                    placement.basis_zero = *fill;
                }
                Modifier::Align(alignment) => {
                    let (h, v) = alignment.components();
                    match ctx.scope {
                        Scope::Box => {
                            placement.justify_self = Some(align(h));
                            placement.align_self = Some(align(v));
                        }
                        Scope::Row | Scope::LazyRow => placement.align_self = Some(align(v)),
                        Scope::Column | Scope::LazyColumn => placement.align_self = Some(align(h)),
                        Scope::None => {}
                    }
                }
                Modifier::MatchParentSize => placement.match_parent = true,
                Modifier::LayoutId(_) | Modifier::ProgressSemantics(_) | Modifier::TestTag(_) => {}
            }
        }

        let last = layers.len() - 1;
        let inner = &mut layers[last];
        let stretch_cross = self.apply_kind(d, ctx, inner);
        if stretch_cross && placement.align_self.is_none() && placement.justify_self.is_none() {
            match ctx.scope {
                Scope::Box => placement.justify_self = Some(AlignItems::Stretch),
                _ => placement.align_self = Some(AlignItems::Stretch),
            }
        }
        if !d.is_enabled() {
            inner.visual.dim = true;
        }
        let scroll = d.kind.scroll();
        if !scroll.is_none() {
            inner.style.overflow = taffy::geometry::Point {
                x: Overflow::Hidden,
                y: Overflow::Hidden,
            };
            inner.visual.scroll = Some((node.key.clone(), scroll));
        }
        let keep_main_size = match &d.kind {
            ViewKind::Row(_) => scroll.horizontal(),
            ViewKind::Column(_) => scroll.vertical(),
            ViewKind::LazyList(p) => match p.orientation {
                Orientation::Vertical => scroll.vertical(),
                Orientation::Horizontal => scroll.horizontal(),
            },
            _ => false,
        };

        // Children, in slot order for tabs.
        let mut children: Vec<&RenderNode> = Vec::new();
        if d.kind.is_container() {
            children.extend(node.children.iter());
            if matches!(d.kind, ViewKind::Tab(_)) {
                children.sort_by_key(|c| slot_rank(c));
            }
        }
        let selected_tab = match &d.kind {
            ViewKind::TabRow(p) => Some(p.selected_tab_index),
            _ => None,
        };
        let child_scope = d.child_scope();
        let mut child_ids = Vec::with_capacity(children.len());
        for (index, child) in children.into_iter().enumerate() {
            let child_ctx = ChildContext {
                scope: child_scope,
                in_tab_row: selected_tab.is_some(),
                selected: selected_tab == Some(index),
                keep_main_size,
            };
            child_ids.push(self.build(child, child_ctx, false)?);
        }

        // Outermost layer: what the parent places.
        let outer = &mut layers[0];
        if is_root {
            outer.set_width(Dimension::from_length(self.width as f32));
            outer.set_height(Dimension::from_length(self.height as f32));
        }
        if let Some(grow) = placement.grow {
            outer.style.flex_grow = grow;
            if placement.basis_zero {
                outer.style.flex_basis = Dimension::from_length(0.0);
            }
        } else if ctx.in_tab_row {
            outer.style.flex_grow = 1.0;
        }
        if ctx.keep_main_size {
            outer.style.flex_shrink = 0.0;
        }
        outer.style.align_self = placement.align_self;
        outer.style.justify_self = placement.justify_self;
        if ctx.scope == Scope::Box {
            outer.style.grid_row = line(1);
            outer.style.grid_column = line(1);
        }
        if placement.match_parent {
            outer.style.position = Position::Absolute;
            outer.style.inset = taffy::geometry::Rect {
                left: LengthPercentageAuto::from_length(0.0),
                right: LengthPercentageAuto::from_length(0.0),
                top: LengthPercentageAuto::from_length(0.0),
                bottom: LengthPercentageAuto::from_length(0.0),
            };
        }
        if alpha <= 0.0 {
            outer.visual.hidden = true;
        } else if alpha < 1.0 {
            outer.visual.dim = true;
        }
        if d.is_clickable() {
            outer.visual.hit = Some(node.key.clone());
        }
        if let ViewKind::Tab(p) = &d.kind {
            let selected = p.selected || ctx.selected;
            if let Some(inner) = layers.last_mut() {
                inner.visual.content = Content::TabIndicator { selected };
                inner.visual.fg = if selected {
                    p.selected_content_color
                } else {
                    p.unselected_content_color
                };
            }
        }

        // Build inner to outer; wrappers stretch their single child.
        let mut current: Option<NodeId> = None;
        let depth = layers.len();
        for (i, layer) in layers.into_iter().enumerate().rev() {
            let is_inner = i + 1 == depth;
            let stretch_w = layer.width.is_none();
            let stretch_h = layer.height.is_none();
            let (mut style, visual) = layer.style();
            if !is_inner {
                style.display = Display::Flex;
                style.flex_direction = FlexDirection::Column;
            }
            if i > 0 {
                if stretch_h {
                    style.flex_grow = 1.0;
                }
                if stretch_w {
                    style.align_self = Some(AlignItems::Stretch);
                }
            }
            let kids = match current {
                Some(child) => vec![child],
                None => child_ids.clone(),
            };
            current = Some(self.leaf(style, visual, &kids)?);
        }
        match current {
            Some(id) => Ok(id),
            None => self.leaf(Style::default(), Visual::default(), &child_ids),
        }
    }

    /// Container style and content for the view kind. Returns whether the
    /// node stretches across its parent's cross axis by default.
    fn apply_kind(&self, d: &ViewDescriptor, ctx: ChildContext, layer: &mut Layer) -> bool {
        let style = &mut layer.style;
        match &d.kind {
            ViewKind::Box(p) => {
                let (h, v) = p.content_alignment.components();
                style.display = Display::Grid;
                style.justify_items = Some(align(h));
                style.align_items = Some(align(v));
            }
            ViewKind::Row(p) => linear(style, FlexDirection::Row, p.arrangement, p.alignment),
            ViewKind::Column(p) => linear(style, FlexDirection::Column, p.arrangement, p.alignment),
            ViewKind::LazyList(p) => {
                let direction = match (p.orientation, p.reverse_layout) {
                    (Orientation::Vertical, false) => FlexDirection::Column,
                    (Orientation::Vertical, true) => FlexDirection::ColumnReverse,
                    (Orientation::Horizontal, false) => FlexDirection::Row,
                    (Orientation::Horizontal, true) => FlexDirection::RowReverse,
                };
                linear(style, direction, p.arrangement, p.alignment);
                style.padding = insets_rect(p.padding());
                style.overflow = taffy::geometry::Point {
                    x: Overflow::Hidden,
                    y: Overflow::Hidden,
                };
            }
            ViewKind::Card(p) => {
                linear(style, FlexDirection::Column, Arrangement::Start, Align1d::Start);
                if p.elevation.cells() > 0.0 {
                    style.border = insets_rect(Insets::all(Dp(1.0)));
                    layer.visual.border =
                        Some((DEFAULT_BORDER, !matches!(p.shape, Shape::Rectangle)));
                }
                layer.visual.background = p.background.or(layer.visual.background);
            }
            ViewKind::Text(p) => {
                let mut lines: Vec<String> = p.text.split('\n').map(str::to_string).collect();
                if let Some(max) = p.max_lines {
                    lines.truncate(max);
                }
                let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
                let height = if p.text.is_empty() { 0 } else { lines.len() };
                layer.set_width(Dimension::from_length(width as f32));
                layer.set_height(Dimension::from_length(height as f32));
                layer.visual.content = Content::Text {
                    lines,
                    color: p.color,
                    bold: p.is_bold(),
                };
            }
            ViewKind::Button(_) => {
                linear(style, FlexDirection::Row, Arrangement::Center, Align1d::Center);
                style.padding = insets_rect(Insets::symmetric(Dp(1.0), Dp::ZERO));
                layer.visual.content = Content::ButtonFrame;
            }
            ViewKind::IconButton(p) => {
                linear(style, FlexDirection::Row, Arrangement::Center, Align1d::Center);
                let (container, content) = p.effective_colors();
                layer.visual.background = container.or(layer.visual.background);
                layer.visual.fg = content;
            }
            ViewKind::Icon(p) => {
                layer.set_width(Dimension::from_length(1.0));
                layer.set_height(Dimension::from_length(1.0));
                let glyph = p.image_vector.as_deref().map_or('•', icon_glyph);
                layer.visual.content = Content::Glyph(glyph);
            }
            ViewKind::TabRow(_) => {
                linear(style, FlexDirection::Row, Arrangement::Start, Align1d::Start);
                return true;
            }
            ViewKind::Tab(_) => {
                linear(style, FlexDirection::Row, Arrangement::Center, Align1d::Center);
                style.padding = insets_rect(Insets::new(Dp(1.0), Dp::ZERO, Dp(1.0), Dp(1.0)));
            }
            ViewKind::Divider(p) => {
                let vertical = matches!(ctx.scope, Scope::Row | Scope::LazyRow);
                let thickness = Dimension::from_length(cells(p.thickness));
                if vertical {
                    layer.set_width(thickness);
                } else {
                    layer.set_height(thickness);
                }
                layer.visual.content = Content::Divider {
                    vertical,
                    color: p.color.unwrap_or(DEFAULT_DIVIDER),
                };
                return true;
            }
            ViewKind::Checkbox(p) => {
                layer.set_width(Dimension::from_length(3.0));
                layer.set_height(Dimension::from_length(1.0));
                layer.visual.content = Content::Checkbox { checked: p.checked };
            }
            ViewKind::Spacer | ViewKind::Fallback => {}
        }
        false
    }

    // -----------------------------------------------------------------------
    // Paint
    // -----------------------------------------------------------------------

    fn paint(
        &self,
        id: NodeId,
        origin: (f32, f32),
        clip: Region,
        fg: Option<Color>,
        dim: bool,
        frame: &mut Frame,
    ) -> TaffyResult<()> {
        let layout = self.tree.layout(id)?;
        let x = origin.0 + layout.location.x;
        let y = origin.1 + layout.location.y;
        let region = Region::new(
            x.round() as i32,
            y.round() as i32,
            layout.size.width.round() as i32,
            layout.size.height.round() as i32,
        );
        let Some(visual) = self
            .tree
            .get_node_context(id)
            .and_then(|&index| self.visuals.get(index))
        else {
            return Ok(());
        };
        if visual.hidden {
            return Ok(());
        }
        let dim = dim || visual.dim;
        let fg = visual.fg.or(fg);
        let visible = region.intersection(clip);

        if let Some(key) = &visual.hit {
            if !visible.is_empty() {
                frame.hits.push(Hit {
                    region: visible,
                    key: key.clone(),
                });
            }
        }
        if let Some(bg) = visual.background.filter(|c| !c.is_transparent()) {
            frame.canvas.fill(visible, bg);
        }
        if let Some((color, rounded)) = visual.border {
            draw_box(&mut frame.canvas, region, visible, color, rounded, dim);
        }
        paint_content(&mut frame.canvas, &visual.content, region, visible, fg, dim);

        let mut child_origin = (x, y);
        if let Some((key, axes)) = &visual.scroll {
            if !visible.is_empty() {
                let mut target = self.scroll_range(id, key, *axes, visible)?;
                let (ox, oy) = self.offsets.get(key);
                target.offset = (
                    ox.clamp(target.min.0, target.max.0),
                    oy.clamp(target.min.1, target.max.1),
                );
                child_origin.0 -= target.offset.0 as f32;
                child_origin.1 -= target.offset.1 as f32;
                frame.scrollables.push(target);
            }
        }
        for child in self.tree.children(id)? {
            self.paint(child, child_origin, visible, fg, dim, frame)?;
        }
        Ok(())
    }

    /// How far the children of `id` overflow its padding box, as an offset
    /// range on each scrollable axis.
    fn scroll_range(
        &self,
        id: NodeId,
        key: &str,
        axes: ScrollAxes,
        region: Region,
    ) -> TaffyResult<Scrollable> {
        let layout = self.tree.layout(id)?;
        let (mut left, mut top) = (0.0_f32, 0.0_f32);
        let (mut right, mut bottom) = (0.0_f32, 0.0_f32);
        for child in self.tree.children(id)? {
            let c = self.tree.layout(child)?;
            left = left.min(c.location.x - layout.padding.left - layout.border.left);
            top = top.min(c.location.y - layout.padding.top - layout.border.top);
            right = right.max(c.location.x + c.size.width + layout.padding.right + layout.border.right);
            bottom = bottom.max(c.location.y + c.size.height + layout.padding.bottom + layout.border.bottom);
        }
        let span = |lo: f32, hi: f32, size: f32, on: bool| {
            if on {
                (lo.floor() as i32, ((hi - size).ceil() as i32).max(0))
            } else {
                (0, 0)
            }
        };
        let (min_x, max_x) = span(left, right, layout.size.width, axes.horizontal());
        let (min_y, max_y) = span(top, bottom, layout.size.height, axes.vertical());
        Ok(Scrollable {
            key: key.to_string(),
            region,
            axes,
            offset: (0, 0),
            min: (min_x, min_y),
            max: (max_x, max_y),
        })
    }
}

fn draw_box(canvas: &mut Canvas, region: Region, clip: Region, color: Color, rounded: bool, dim: bool) {
    if region.width < 2 || region.height < 2 {
        return;
    }
    let (tl, tr, bl, br) = if rounded {
        ('╭', '╮', '╰', '╯')
    } else {
        ('┌', '┐', '└', '┘')
    };
    let style = CellStyle::fg(Some(color)).dim(dim);
    let inner = region.width - 2;
    let mut strips = Vec::with_capacity(region.height as usize);
    for (y, left, right) in [(region.y, tl, tr), (region.bottom() - 1, bl, br)] {
        let mut strip = Strip::new(y, region.x);
        strip.push(left, style);
        strip.cells.extend(Strip::repeat(0, 0, '─', inner, style).cells);
        strip.push(right, style);
        strips.push(strip);
    }
    for y in region.y + 1..region.bottom() - 1 {
        strips.push(Strip::text(region.x, y, "│", style));
        strips.push(Strip::text(region.right() - 1, y, "│", style));
    }
    canvas.place_strips(&strips, clip);
}

fn paint_content(
    canvas: &mut Canvas,
    content: &Content,
    region: Region,
    clip: Region,
    fg: Option<Color>,
    dim: bool,
) {
    let strips = match content {
        Content::None => return,
        Content::Text { lines, color, bold } => {
            let style = CellStyle::fg(color.or(fg)).bold(*bold).dim(dim);
            lines
                .iter()
                .enumerate()
                .map(|(i, line)| Strip::text(region.x, region.y + i as i32, line, style))
                .collect()
        }
        Content::Glyph(ch) => {
            vec![Strip::repeat(region.x, region.y, *ch, 1, CellStyle::fg(fg).dim(dim))]
        }
        Content::Checkbox { checked } => {
            let mark = if *checked { "[x]" } else { "[ ]" };
            vec![Strip::text(region.x, region.y, mark, CellStyle::fg(fg).dim(dim))]
        }
        Content::Divider { vertical, color } => {
            let style = CellStyle::fg(Some(*color)).dim(dim);
            let ch = if *vertical { '│' } else { '─' };
            (region.y..region.bottom())
                .map(|y| Strip::repeat(region.x, y, ch, region.width, style))
                .collect()
        }
        Content::ButtonFrame => {
            if region.width < 2 || region.height < 1 {
                return;
            }
            let style = CellStyle::fg(fg).dim(dim);
            let mid = region.y + region.height / 2;
            vec![
                Strip::text(region.x, mid, "[", style),
                Strip::text(region.right() - 1, mid, "]", style),
            ]
        }
        Content::TabIndicator { selected } => {
            if !*selected || region.height < 1 {
                return;
            }
            let style = CellStyle::fg(fg).bold(true).dim(dim);
            vec![Strip::repeat(region.x, region.bottom() - 1, '━', region.width, style)]
        }
    };
    canvas.place_strips(&strips, clip);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Dispatch;
    use crate::reconcile::Coordinator;
    use crate::registry::Registry;
    use serde_json::json;

    fn frame(markup: &str, width: u16, height: u16) -> Frame {
        let mut c = Coordinator::new(Registry::defaults(), Dispatch::noop());
        let envelope = json!({"type": "render", "version": 1, "fragments": [markup]});
        c.apply_envelope(&envelope.to_string()).unwrap();
        render(&c.snapshot(), width, height)
    }

    #[test]
    fn empty_snapshot_is_blank() {
        let f = render(&Snapshot::default(), 4, 2);
        assert_eq!(f.text(), "\n");
        assert!(f.hits.is_empty());
    }

    #[test]
    fn column_stacks_text() {
        let f = frame("<Column><Text>ab</Text><Text>cd</Text></Column>", 6, 3);
        assert_eq!(f.text(), "ab\ncd\n");
    }

    #[test]
    fn row_places_side_by_side() {
        let f = frame("<Row><Text>ab</Text><Text>cd</Text></Row>", 6, 1);
        assert_eq!(f.text(), "abcd");
    }

    #[test]
    fn spaced_by_arrangement() {
        let f = frame(
            r#"<Row horizontal-arrangement="2"><Text>a</Text><Text>b</Text></Row>"#,
            6,
            1,
        );
        assert_eq!(f.text(), "a  b");
    }

    #[test]
    fn padding_then_background() {
        let f = frame(
            r#"<Text style="padding(1);background(color.Red)">x</Text>"#,
            4,
            3,
        );
        assert_eq!(f.canvas.get_cell(0, 0).unwrap().style.bg, None);
        assert_eq!(f.canvas.get_cell(1, 1).unwrap().style.bg, Some(Color::RED));
        assert_eq!(f.canvas.get_cell(1, 1).unwrap().ch, 'x');
    }

    #[test]
    fn background_then_padding() {
        let f = frame(
            r#"<Text style="background(color.Red);padding(1)">x</Text>"#,
            4,
            3,
        );
        assert_eq!(f.canvas.get_cell(0, 0).unwrap().style.bg, Some(Color::RED));
        assert_eq!(f.canvas.get_cell(2, 2).unwrap().style.bg, Some(Color::RED));
        assert_eq!(f.canvas.get_cell(3, 0).unwrap().style.bg, None);
    }

    #[test]
    fn checkbox_and_hits() {
        let f = frame(
            r#"<Row><Checkbox id="c" checked phx-change="toggle"/><Checkbox id="d"/></Row>"#,
            8,
            1,
        );
        assert_eq!(f.text(), "[x][ ]");
        assert_eq!(f.hits.len(), 1);
        assert_eq!(f.hit_at(1, 0).map(|h| h.key.as_str()), Some("phx-main/Row[0]/Checkbox#c"));
        assert!(f.hit_at(4, 0).is_none());
    }

    #[test]
    fn button_frames_label() {
        let f = frame(
            r#"<Button phx-click="go"><Text>ok</Text></Button>"#,
            6,
            1,
        );
        assert_eq!(f.text(), "[ok]");
        assert_eq!(f.hits[0].region, Region::new(0, 0, 4, 1));
    }

    #[test]
    fn weight_fills_row() {
        let f = frame(
            r#"<Row style="fillMaxWidth()"><Text>a</Text><Spacer style="weight(1)"/><Text>b</Text></Row>"#,
            5,
            1,
        );
        assert_eq!(f.text(), "a   b");
    }

    #[test]
    fn unknown_tag_renders_nothing() {
        let f = frame("<Column><Frobnicate><Text>hidden</Text></Frobnicate><Text>ok</Text></Column>", 6, 2);
        assert_eq!(f.text(), "ok\n");
    }

    #[test]
    fn card_border() {
        let f = frame(r#"<Card shape="rectangle"><Text>hi</Text></Card>"#, 5, 3);
        assert_eq!(f.text(), "┌──┐\n│hi│\n└──┘");
    }

    #[test]
    fn alpha_zero_hides() {
        let f = frame(r#"<Text style="alpha(0)">x</Text>"#, 2, 1);
        assert_eq!(f.text(), "");
    }

    #[test]
    fn icon_glyphs() {
        assert_eq!(icon_glyph("filled:Add"), '+');
        assert_eq!(icon_glyph("Icons.Filled.Favorite"), '♥');
        assert_eq!(icon_glyph("mystery"), '•');
    }

    fn scrolled(markup: &str, width: u16, height: u16, offsets: &ScrollOffsets) -> Frame {
        let mut c = Coordinator::new(Registry::defaults(), Dispatch::noop());
        let envelope = json!({"type": "render", "version": 1, "fragments": [markup]});
        c.apply_envelope(&envelope.to_string()).unwrap();
        render_scrolled(&c.snapshot(), width, height, offsets)
    }

    const LIST: &str = r#"<Column id="list" scroll="vertical" style="height(2)"><Text>a</Text><Text>b</Text><Text>c</Text></Column>"#;

    #[test]
    fn scroll_container_clips_and_reports_range() {
        let f = frame(LIST, 3, 3);
        assert_eq!(f.text(), "a\nb\n");
        assert_eq!(f.scrollables.len(), 1);
        let list = &f.scrollables[0];
        assert_eq!(list.key, "phx-main/Column#list");
        assert_eq!(list.offset, (0, 0));
        assert_eq!((list.min, list.max), ((0, 0), (0, 1)));
        assert_eq!(f.scrollable_at(0, 1).map(|s| s.key.as_str()), Some("phx-main/Column#list"));
        assert!(f.scrollable_at(0, 2).is_none());
    }

    #[test]
    fn scroll_offset_shifts_content_within_range() {
        let mut offsets = ScrollOffsets::new();
        offsets.set("phx-main/Column#list", (0, 1));
        assert_eq!(scrolled(LIST, 3, 3, &offsets).text(), "b\nc\n");

        offsets.set("phx-main/Column#list", (4, 9));
        let f = scrolled(LIST, 3, 3, &offsets);
        assert_eq!(f.text(), "b\nc\n");
        assert_eq!(f.scrollables[0].offset, (0, 1));
    }

    #[test]
    fn scrolled_hits_follow_content() {
        let markup = r#"<Column id="list" scroll="vertical" style="height(1)"><Button id="a" phx-click="a"><Text>a</Text></Button><Button id="b" phx-click="b"><Text>b</Text></Button></Column>"#;
        let mut offsets = ScrollOffsets::new();
        offsets.set("phx-main/Column#list", (0, 1));
        let f = scrolled(markup, 4, 2, &offsets);
        assert_eq!(f.text(), "[b]\n");
        assert_eq!(f.focus_order(), vec!["phx-main/Column#list/Button#b"]);
    }

    #[test]
    fn lazy_column_item_padding_per_side() {
        let f = frame(
            r#"<LazyColumn content-padding="1" item-padding-start="2" item-padding-top="0"><Text>x</Text></LazyColumn>"#,
            4,
            2,
        );
        assert_eq!(f.text(), "  x\n");
        assert_eq!(f.scrollables[0].max, (0, 0));
    }
}
