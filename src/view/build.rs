//! Per-kind build functions.
//!
//! Each function folds a node's attributes left to right into its kind's
//! props. Names the kind does not own fall through to [`CommonBuilder`];
//! names nobody owns are ignored. Values that fail to coerce leave the
//! default in place. Every kind-specific field is written by exactly one
//! attribute name, so attribute order only matters for the style chain.

use serde::Deserialize;
use tracing::{debug, trace};

use crate::event::Dispatch;
use crate::markup::Attribute;
use crate::modifier::Scope;
use crate::style::args::{bool_attr, color_attr, dp_attr, float_attr, int_attr};
use crate::style::{Align1d, Alignment, Arrangement, Shape, Sp};

use super::common::CommonBuilder;
use super::descriptor::{
    BoxProps, ButtonProps, CardProps, CheckboxProps, DividerProps, IconButtonColors,
    IconButtonProps, IconProps, LazyListProps, LinearProps, Orientation, ScrollAxes, TabProps,
    TabRowProps, TextProps, ViewDescriptor, ViewKind,
};

/// What a factory receives besides the attributes.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub tag: &'a str,
    /// Direct text content of the node, if any.
    pub text: Option<&'a str>,
    pub dispatch: &'a Dispatch,
    /// Scope of the enclosing parent.
    pub scope: Scope,
}

impl<'a> BuildContext<'a> {
    pub fn new(tag: &'a str, dispatch: &'a Dispatch, scope: Scope) -> Self {
        Self {
            tag,
            text: None,
            dispatch,
            scope,
        }
    }

    pub fn with_text(mut self, text: Option<&'a str>) -> Self {
        self.text = text;
        self
    }
}

/// Fold attributes into `props`, routing unhandled names to the common
/// builder, and assemble the descriptor.
fn fold<P>(
    attrs: &[Attribute],
    ctx: &BuildContext<'_>,
    mut props: P,
    mut apply: impl FnMut(&mut P, &str, &str) -> bool,
    into_kind: impl FnOnce(P) -> ViewKind,
) -> ViewDescriptor {
    let mut common = CommonBuilder::new();
    for attr in attrs {
        if apply(&mut props, &attr.name, &attr.value) || common.accept(attr) {
            continue;
        }
        trace!(tag = ctx.tag, attribute = %attr.name, "ignoring attribute");
    }
    ViewDescriptor::new(
        ctx.tag,
        into_kind(props),
        common.finish(ctx.scope, ctx.dispatch),
    )
}

/// Set `slot` when `parsed` succeeds. Always claims the attribute name.
fn set<T>(slot: &mut T, parsed: Option<T>) -> bool {
    if let Some(v) = parsed {
        *slot = v;
    }
    true
}

// ── layouts ─────────────────────────────────────────────────────────────

pub fn build_box(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    fold(
        attrs,
        ctx,
        BoxProps::default(),
        |p, name, value| match name {
            "content-alignment" => set(&mut p.content_alignment, Alignment::from_name(value)),
            "propagate-min-constraints" => set(&mut p.propagate_min_constraints, bool_attr(value)),
            "scroll" => set(&mut p.scroll, Some(ScrollAxes::from_attr(value))),
            _ => false,
        },
        ViewKind::Box,
    )
}

pub fn build_row(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    fold(
        attrs,
        ctx,
        LinearProps::default(),
        |p, name, value| match name {
            "horizontal-arrangement" => set(&mut p.arrangement, Some(Arrangement::from_attr(value))),
            "vertical-alignment" => set(&mut p.alignment, Some(Align1d::from_vertical_attr(value))),
            "scroll" => set(&mut p.scroll, Some(ScrollAxes::from_attr(value))),
            _ => false,
        },
        ViewKind::Row,
    )
}

pub fn build_column(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    fold(
        attrs,
        ctx,
        LinearProps::default(),
        |p, name, value| match name {
            "vertical-arrangement" => set(&mut p.arrangement, Some(Arrangement::from_attr(value))),
            "horizontal-alignment" => {
                set(&mut p.alignment, Some(Align1d::from_horizontal_attr(value)))
            }
            "scroll" => set(&mut p.scroll, Some(ScrollAxes::from_attr(value))),
            _ => false,
        },
        ViewKind::Column,
    )
}

fn build_lazy(
    attrs: &[Attribute],
    ctx: &BuildContext<'_>,
    orientation: Orientation,
) -> ViewDescriptor {
    let (arrangement_attr, alignment_attr) = match orientation {
        Orientation::Vertical => ("vertical-arrangement", "horizontal-alignment"),
        Orientation::Horizontal => ("horizontal-arrangement", "vertical-alignment"),
    };
    fold(
        attrs,
        ctx,
        LazyListProps::new(orientation),
        |p, name, value| {
            if name == arrangement_attr {
                return set(&mut p.arrangement, Some(Arrangement::from_attr(value)));
            }
            if name == alignment_attr {
                let align = match orientation {
                    Orientation::Vertical => Align1d::from_horizontal_attr(value),
                    Orientation::Horizontal => Align1d::from_vertical_attr(value),
                };
                return set(&mut p.alignment, Some(align));
            }
            match name {
                "reverse-layout" => set(&mut p.reverse_layout, bool_attr(value)),
                "content-padding" => set(&mut p.content_padding, dp_attr(value).map(Some)),
                "horizontal-padding" => set(&mut p.horizontal_padding, dp_attr(value).map(Some)),
                "vertical-padding" => set(&mut p.vertical_padding, dp_attr(value).map(Some)),
                "item-padding-start" => set(&mut p.start_padding, dp_attr(value).map(Some)),
                "item-padding-top" => set(&mut p.top_padding, dp_attr(value).map(Some)),
                "item-padding-end" => set(&mut p.end_padding, dp_attr(value).map(Some)),
                "item-padding-bottom" => set(&mut p.bottom_padding, dp_attr(value).map(Some)),
                "scroll" => set(&mut p.scroll, Some(ScrollAxes::from_attr(value))),
                _ => false,
            }
        },
        ViewKind::LazyList,
    )
}

pub fn build_lazy_column(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    build_lazy(attrs, ctx, Orientation::Vertical)
}

pub fn build_lazy_row(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    build_lazy(attrs, ctx, Orientation::Horizontal)
}

pub fn build_card(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    fold(
        attrs,
        ctx,
        CardProps::default(),
        |p, name, value| match name {
            "shape" => set(&mut p.shape, Shape::from_attr(value)),
            "background-color" => set(&mut p.background, color_attr(value).map(Some)),
            "elevation" => set(&mut p.elevation, dp_attr(value)),
            _ => false,
        },
        ViewKind::Card,
    )
}

// ── content ─────────────────────────────────────────────────────────────

/// `bold`, `FontWeight.Bold`, or a numeric weight.
fn font_weight_attr(value: &str) -> Option<u16> {
    let bare = value.rsplit('.').next()?.trim();
    if let Ok(n) = bare.parse::<u16>() {
        return Some(n);
    }
    let weight = match bare.to_ascii_lowercase().as_str() {
        "thin" => 100,
        "extralight" => 200,
        "light" => 300,
        "normal" => 400,
        "medium" => 500,
        "semibold" => 600,
        "bold" => 700,
        "extrabold" => 800,
        "black" => 900,
        _ => return None,
    };
    Some(weight)
}

pub fn build_text(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    let mut d = fold(
        attrs,
        ctx,
        TextProps::default(),
        |p, name, value| match name {
            "text" => set(&mut p.text, Some(value.to_string())),
            "color" => set(&mut p.color, color_attr(value).map(Some)),
            "font-size" => set(&mut p.font_size, float_attr(value).map(|v| Some(Sp(v)))),
            "font-weight" => set(&mut p.font_weight, font_weight_attr(value).map(Some)),
            "max-lines" => set(
                &mut p.max_lines,
                int_attr(value)
                    .filter(|n| *n > 0)
                    .map(|n| Some(n as usize)),
            ),
            _ => false,
        },
        ViewKind::Text,
    );
    if let (ViewKind::Text(props), Some(body)) = (&mut d.kind, ctx.text) {
        if !body.is_empty() {
            props.text = body.to_string();
        }
    }
    d
}

pub fn build_button(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    fold(
        attrs,
        ctx,
        ButtonProps::default(),
        |p, name, value| match name {
            "enabled" => set(&mut p.enabled, bool_attr(value)),
            _ => false,
        },
        ViewKind::Button,
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColorsJson {
    container_color: Option<String>,
    content_color: Option<String>,
    disabled_container_color: Option<String>,
    disabled_content_color: Option<String>,
}

/// Parse the IconButton `colors` JSON. Single quotes are accepted in place
/// of double quotes.
fn icon_button_colors_attr(value: &str) -> Option<IconButtonColors> {
    let json = value.replace('\'', "\"");
    match serde_json::from_str::<ColorsJson>(&json) {
        Ok(c) => {
            let parse = |s: &Option<String>| s.as_deref().and_then(color_attr);
            Some(IconButtonColors {
                container: parse(&c.container_color),
                content: parse(&c.content_color),
                disabled_container: parse(&c.disabled_container_color),
                disabled_content: parse(&c.disabled_content_color),
            })
        }
        Err(error) => {
            debug!(%error, "ignoring malformed colors attribute");
            None
        }
    }
}

pub fn build_icon_button(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    fold(
        attrs,
        ctx,
        IconButtonProps::default(),
        |p, name, value| match name {
            "enabled" => set(&mut p.enabled, bool_attr(value)),
            "colors" => set(&mut p.colors, icon_button_colors_attr(value)),
            _ => false,
        },
        ViewKind::IconButton,
    )
}

pub fn build_icon(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    fold(
        attrs,
        ctx,
        IconProps::default(),
        |p, name, value| match name {
            "image-vector" => set(&mut p.image_vector, Some(Some(value.to_string()))),
            "content-description" => {
                set(&mut p.content_description, Some(Some(value.to_string())))
            }
            _ => false,
        },
        ViewKind::Icon,
    )
}

// ── tabs ────────────────────────────────────────────────────────────────

pub fn build_tab_row(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    fold(
        attrs,
        ctx,
        TabRowProps::default(),
        |p, name, value| match name {
            "selected-tab-index" => set(
                &mut p.selected_tab_index,
                int_attr(value).filter(|n| *n >= 0).map(|n| n as usize),
            ),
            _ => false,
        },
        ViewKind::TabRow,
    )
}

pub fn build_tab(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    fold(
        attrs,
        ctx,
        TabProps::default(),
        |p, name, value| match name {
            "selected" => set(&mut p.selected, bool_attr(value)),
            "enabled" => set(&mut p.enabled, bool_attr(value)),
            "selected-content-color" => {
                set(&mut p.selected_content_color, color_attr(value).map(Some))
            }
            "unselected-content-color" => {
                set(&mut p.unselected_content_color, color_attr(value).map(Some))
            }
            _ => false,
        },
        ViewKind::Tab,
    )
}

// ── leaves ──────────────────────────────────────────────────────────────

pub fn build_divider(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    fold(
        attrs,
        ctx,
        DividerProps::default(),
        |p, name, value| match name {
            "thickness" => set(&mut p.thickness, dp_attr(value)),
            "color" => set(&mut p.color, color_attr(value).map(Some)),
            _ => false,
        },
        ViewKind::Divider,
    )
}

pub fn build_spacer(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    fold(attrs, ctx, (), |_, _, _| false, |()| ViewKind::Spacer)
}

pub fn build_checkbox(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    fold(
        attrs,
        ctx,
        CheckboxProps::default(),
        |p, name, value| match name {
            "checked" => set(&mut p.checked, bool_attr(value)),
            "enabled" => set(&mut p.enabled, bool_attr(value)),
            _ => false,
        },
        ViewKind::Checkbox,
    )
}

/// Default leaf for tags nobody registered.
pub fn build_fallback(attrs: &[Attribute], ctx: &BuildContext<'_>) -> ViewDescriptor {
    fold(attrs, ctx, (), |_, _, _| false, |()| ViewKind::Fallback)
}
