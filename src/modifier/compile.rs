//! Compile style clauses into modifiers.
//!
//! Each clause maps to at most one [`Modifier`]. Unknown names, unusable
//! arguments, and scope mismatches all produce `None`; the chain simply
//! continues with the next clause.

use tracing::{debug, trace};

use crate::modifier::chain::{Extent, Modifier, ModifierChain, Progress, Scope};
use crate::style::args::{coerce_dp, Args};
use crate::style::model::StyleClause;
use crate::style::parser::parse_style;
use crate::style::scalar::{Dp, Insets};

/// Parse and compile a style string for a node laid out in `scope`.
pub fn compile_style(style: &str, scope: Scope) -> ModifierChain {
    compile_clauses(&parse_style(style), scope)
}

/// Compile already-parsed clauses, preserving their order.
pub fn compile_clauses(clauses: &[StyleClause], scope: Scope) -> ModifierChain {
    clauses
        .iter()
        .filter_map(|clause| compile_clause(clause, scope))
        .collect()
}

/// Compile one clause.
pub fn compile_clause(clause: &StyleClause, scope: Scope) -> Option<Modifier> {
    let args = Args::new(&clause.args);

    let modifier = match clause.name.as_str() {
        "size" => size(args),
        "width" => extent(args, "width").map(Modifier::Width),
        "height" => extent(args, "height").map(Modifier::Height),
        "widthIn" => Some(Modifier::WidthIn {
            min: args.dp("min", 0),
            max: args.dp("max", 1),
        }),
        "heightIn" => Some(Modifier::HeightIn {
            min: args.dp("min", 0),
            max: args.dp("max", 1),
        }),
        "fillMaxWidth" => Some(Modifier::FillMaxWidth(fraction(args))),
        "fillMaxHeight" => Some(Modifier::FillMaxHeight(fraction(args))),
        "fillMaxSize" => Some(Modifier::FillMaxSize(fraction(args))),
        "aspectRatio" => args.float("ratio", 0).filter(|r| *r > 0.0).map(|ratio| {
            Modifier::AspectRatio {
                ratio,
                match_height_constraints_first: args
                    .bool("matchHeightConstraintsFirst", 1)
                    .unwrap_or(false),
            }
        }),
        "padding" => padding(args).map(Modifier::Padding),
        "offset" => Some(Modifier::Offset {
            x: args.dp("x", 0).unwrap_or(Dp::ZERO),
            y: args.dp("y", 1).unwrap_or(Dp::ZERO),
        }),
        "background" => args.color("color", 0).map(Modifier::Background),
        "border" => {
            let width = args.dp("width", 0)?;
            let color = args.color("color", 1)?;
            Some(Modifier::Border { width, color })
        }
        "clip" => args.shape("shape", 0).map(Modifier::Clip),
        "alpha" => args
            .float("alpha", 0)
            .map(|a| Modifier::Alpha(a.clamp(0.0, 1.0))),
        "layoutId" => args.string("layoutId", 0).map(Modifier::LayoutId),
        "testTag" => args.string("tag", 0).map(Modifier::TestTag),
        "progressSemantics" => Some(progress(args)),
        "weight" => weight(args, scope),
        "align" => align(args, scope),
        "matchParentSize" => (scope == Scope::Box).then_some(Modifier::MatchParentSize),
        other => {
            debug!(name = other, "unknown style function");
            return None;
        }
    };

    if modifier.is_none() {
        trace!(clause = %clause, ?scope, "clause produced no modifier");
    }
    modifier
}

// ── Size ────────────────────────────────────────────────────────────

/// One argument gives a square; two give width and height.
fn size(args: Args<'_>) -> Option<Modifier> {
    match args.len() {
        1 => {
            let side = args.dp("size", 0)?;
            Some(Modifier::Size { width: side, height: side })
        }
        2 => {
            let width = args.dp("width", 0)?;
            let height = args.dp("height", 1)?;
            Some(Modifier::Size { width, height })
        }
        _ => None,
    }
}

fn extent(args: Args<'_>, name: &str) -> Option<Extent> {
    args.dp(name, 0)
        .map(Extent::Fixed)
        .or_else(|| args.intrinsic("intrinsicSize", 0).map(Extent::Intrinsic))
}

fn fraction(args: Args<'_>) -> f32 {
    args.float("fraction", 0)
        .filter(|f| (0.0..=1.0).contains(f))
        .unwrap_or(1.0)
}

// ── Padding ─────────────────────────────────────────────────────────

/// `padding(all)`, `padding(horizontal, vertical)`,
/// `padding(start, top, end, bottom)`, or any named subset.
fn padding(args: Args<'_>) -> Option<Insets> {
    if args.has_named() {
        let named = |name: &str| args.named(name).and_then(coerce_dp);
        let all = named("all");
        let horizontal = named("horizontal").or(all);
        let vertical = named("vertical").or(all);
        let side = |name: &str, fallback: Option<Dp>| named(name).or(fallback).unwrap_or(Dp::ZERO);
        return Some(Insets::new(
            side("start", horizontal),
            side("top", vertical),
            side("end", horizontal),
            side("bottom", vertical),
        ));
    }

    match args.len() {
        1 => args.dp("all", 0).map(Insets::all),
        2 => Some(Insets::symmetric(args.dp("horizontal", 0)?, args.dp("vertical", 1)?)),
        4 => Some(Insets::new(
            args.dp("start", 0)?,
            args.dp("top", 1)?,
            args.dp("end", 2)?,
            args.dp("bottom", 3)?,
        )),
        _ => None,
    }
}

// ── Semantics ───────────────────────────────────────────────────────

fn progress(args: Args<'_>) -> Modifier {
    if args.is_empty() {
        return Modifier::ProgressSemantics(None);
    }
    match args.float("value", 0) {
        Some(value) => Modifier::ProgressSemantics(Some(Progress {
            value,
            range: args.float_range("valueRange", 1).unwrap_or((0.0, 1.0)),
            steps: args.int("steps", 2).unwrap_or(0),
        })),
        None => Modifier::ProgressSemantics(None),
    }
}

// ── Scope-specific ──────────────────────────────────────────────────

fn weight(args: Args<'_>, scope: Scope) -> Option<Modifier> {
    if !matches!(scope, Scope::Row | Scope::Column) {
        return None;
    }
    let weight = args.float("weight", 0).filter(|w| *w > 0.0)?;
    Some(Modifier::Weight {
        weight,
        fill: args.bool("fill", 1).unwrap_or(true),
    })
}

fn align(args: Args<'_>, scope: Scope) -> Option<Modifier> {
    let alignment = args.alignment("alignment", 0)?;
    let fits = match scope {
        Scope::Box => alignment.is_two_dimensional(),
        Scope::Row | Scope::LazyRow => alignment.is_vertical(),
        Scope::Column | Scope::LazyColumn => alignment.is_horizontal(),
        Scope::None => false,
    };
    fits.then_some(Modifier::Align(alignment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::color::Color;
    use crate::style::scalar::Alignment;

    fn chain(style: &str) -> Vec<Modifier> {
        compile_style(style, Scope::None).as_slice().to_vec()
    }

    fn one(style: &str, scope: Scope) -> Option<Modifier> {
        compile_style(style, scope).as_slice().first().cloned()
    }

    // ── Ordering ─────────────────────────────────────────────────────

    #[test]
    fn size_then_background() {
        assert_eq!(
            chain("size(100);background(color.Red)"),
            vec![
                Modifier::Size { width: Dp(100.0), height: Dp(100.0) },
                Modifier::Background(Color::RED),
            ]
        );
    }

    #[test]
    fn order_follows_clauses() {
        let a = chain("padding(2);background(color.Blue)");
        let b = chain("background(color.Blue);padding(2)");
        assert_eq!(a[0], b[1]);
        assert_eq!(a[1], b[0]);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_and_unknown() {
        assert!(chain("").is_empty());
        assert!(chain("frobnicate(1);wiggle()").is_empty());
        assert_eq!(chain("wiggle();alpha(0.5)"), vec![Modifier::Alpha(0.5)]);
    }

    // ── Size family ──────────────────────────────────────────────────

    #[test]
    fn size_two_args_and_named() {
        assert_eq!(
            chain("size(3, 4)"),
            vec![Modifier::Size { width: Dp(3.0), height: Dp(4.0) }]
        );
        assert_eq!(
            chain("size(height: 4, width: 3)"),
            vec![Modifier::Size { width: Dp(3.0), height: Dp(4.0) }]
        );
        assert!(chain("size()").is_empty());
        assert!(chain("size(1, 2, 3)").is_empty());
        assert!(chain("size(\"big\")").is_empty());
    }

    #[test]
    fn width_fixed_or_intrinsic() {
        assert_eq!(chain("width(12)"), vec![Modifier::Width(Extent::Fixed(Dp(12.0)))]);
        assert_eq!(
            chain("height(IntrinsicSize.Min)"),
            vec![Modifier::Height(Extent::Intrinsic(crate::style::scalar::IntrinsicSize::Min))]
        );
        assert!(chain("width(color.Red)").is_empty());
    }

    #[test]
    fn width_in_defaults_unspecified() {
        assert_eq!(
            chain("widthIn(max: 10)"),
            vec![Modifier::WidthIn { min: None, max: Some(Dp(10.0)) }]
        );
        assert_eq!(chain("heightIn()"), vec![Modifier::HeightIn { min: None, max: None }]);
    }

    #[test]
    fn fill_fraction_defaults_to_one() {
        assert_eq!(chain("fillMaxWidth()"), vec![Modifier::FillMaxWidth(1.0)]);
        assert_eq!(chain("fillMaxHeight(0.5)"), vec![Modifier::FillMaxHeight(0.5)]);
        assert_eq!(chain("fillMaxSize(fraction: 7)"), vec![Modifier::FillMaxSize(1.0)]);
    }

    #[test]
    fn aspect_ratio() {
        assert_eq!(
            chain("aspectRatio(2.0, true)"),
            vec![Modifier::AspectRatio { ratio: 2.0, match_height_constraints_first: true }]
        );
        assert!(chain("aspectRatio(0)").is_empty());
    }

    // ── Padding ──────────────────────────────────────────────────────

    #[test]
    fn padding_forms() {
        assert_eq!(chain("padding(2)"), vec![Modifier::Padding(Insets::all(Dp(2.0)))]);
        assert_eq!(
            chain("padding(2, 1)"),
            vec![Modifier::Padding(Insets::symmetric(Dp(2.0), Dp(1.0)))]
        );
        assert_eq!(
            chain("padding(1, 2, 3, 4)"),
            vec![Modifier::Padding(Insets::new(Dp(1.0), Dp(2.0), Dp(3.0), Dp(4.0)))]
        );
        assert!(chain("padding(1, 2, 3)").is_empty());
    }

    #[test]
    fn padding_named() {
        assert_eq!(
            chain("padding(horizontal: 2, top: 1)"),
            vec![Modifier::Padding(Insets::new(Dp(2.0), Dp(1.0), Dp(2.0), Dp::ZERO))]
        );
        assert_eq!(
            chain("padding(all: 3, end: 0)"),
            vec![Modifier::Padding(Insets::new(Dp(3.0), Dp(3.0), Dp::ZERO, Dp(3.0)))]
        );
    }

    // ── Paint ────────────────────────────────────────────────────────

    #[test]
    fn border_requires_both_args() {
        assert_eq!(
            chain("border(1, color.Gray)"),
            vec![Modifier::Border { width: Dp(1.0), color: Color::GRAY }]
        );
        assert!(chain("border(1)").is_empty());
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(chain("alpha(2)"), vec![Modifier::Alpha(1.0)]);
    }

    #[test]
    fn semantics_modifiers() {
        assert_eq!(chain("progressSemantics()"), vec![Modifier::ProgressSemantics(None)]);
        assert_eq!(
            chain("progressSemantics(0.25, steps: 4)"),
            vec![Modifier::ProgressSemantics(Some(Progress {
                value: 0.25,
                range: (0.0, 1.0),
                steps: 4
            }))]
        );
        assert_eq!(chain("layoutId(\"hdr\")"), vec![Modifier::LayoutId("hdr".into())]);
        assert_eq!(chain("testTag(tag: \"t\")"), vec![Modifier::TestTag("t".into())]);
    }

    // ── Scopes ───────────────────────────────────────────────────────

    #[test]
    fn match_parent_size_only_in_box() {
        assert_eq!(one("matchParentSize()", Scope::Box), Some(Modifier::MatchParentSize));
        assert_eq!(one("matchParentSize()", Scope::Row), None);
        assert_eq!(one("matchParentSize()", Scope::None), None);
    }

    #[test]
    fn weight_only_in_row_or_column() {
        assert_eq!(
            one("weight(1)", Scope::Row),
            Some(Modifier::Weight { weight: 1.0, fill: true })
        );
        assert_eq!(
            one("weight(2, false)", Scope::Column),
            Some(Modifier::Weight { weight: 2.0, fill: false })
        );
        assert_eq!(one("weight(1)", Scope::Box), None);
        assert_eq!(one("weight(0)", Scope::Row), None);
    }

    #[test]
    fn align_must_match_scope() {
        assert_eq!(
            one("align(Alignment.Center)", Scope::Box),
            Some(Modifier::Align(Alignment::Center))
        );
        assert_eq!(one("align(Alignment.Center)", Scope::Row), None);
        assert_eq!(
            one("align(Alignment.CenterVertically)", Scope::LazyRow),
            Some(Modifier::Align(Alignment::CenterVertically))
        );
        assert_eq!(one("align(Alignment.Top)", Scope::Column), None);
        assert_eq!(
            one("align(Alignment.End)", Scope::Column),
            Some(Modifier::Align(Alignment::End))
        );
    }

    #[test]
    fn scope_mismatch_keeps_rest_of_chain() {
        let chain = compile_style("matchParentSize();background(color.Red)", Scope::Row);
        assert_eq!(chain.as_slice(), &[Modifier::Background(Color::RED)]);
    }
}
