//! Argument resolution and typed coercion.
//!
//! [`Args`] addresses a clause's argument list either by name or by
//! position. A named argument matching the requested parameter always wins;
//! otherwise the parameter's declared index selects among the positional
//! (unnamed) arguments. Every coercion returns `None` on mismatch, which the
//! caller treats as "parameter absent" and replaces with its default.
//!
//! The `*_attr` functions apply the same rules to raw attribute strings.

use crate::style::color::Color;
use crate::style::model::{ArgValue, ArgumentData};
use crate::style::scalar::{Alignment, Dp, IntrinsicSize, Shape, Sp};

// ---------------------------------------------------------------------------
// Args
// ---------------------------------------------------------------------------

/// Borrowed view over a clause's arguments with dual addressing.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    args: &'a [ArgumentData],
}

impl<'a> Args<'a> {
    pub fn new(args: &'a [ArgumentData]) -> Self {
        Self { args }
    }

    /// Total argument count, named and positional.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Whether any argument is written `name: value`.
    pub fn has_named(&self) -> bool {
        self.args.iter().any(ArgumentData::is_named)
    }

    /// The last argument carrying `name`.
    pub fn named(&self, name: &str) -> Option<&'a ArgValue> {
        self.args
            .iter()
            .rev()
            .find(|a| a.name.as_deref() == Some(name))
            .map(|a| &a.value)
    }

    /// The `index`-th unnamed argument.
    pub fn positional(&self, index: usize) -> Option<&'a ArgValue> {
        self.args
            .iter()
            .filter(|a| !a.is_named())
            .nth(index)
            .map(|a| &a.value)
    }

    /// Named lookup first, then the positional slot.
    pub fn get(&self, name: &str, index: usize) -> Option<&'a ArgValue> {
        self.named(name).or_else(|| self.positional(index))
    }

    pub fn dp(&self, name: &str, index: usize) -> Option<Dp> {
        self.get(name, index).and_then(coerce_dp)
    }

    pub fn sp(&self, name: &str, index: usize) -> Option<Sp> {
        self.get(name, index).and_then(coerce_sp)
    }

    pub fn float(&self, name: &str, index: usize) -> Option<f32> {
        self.get(name, index).and_then(coerce_float)
    }

    pub fn int(&self, name: &str, index: usize) -> Option<i64> {
        self.get(name, index).and_then(coerce_int)
    }

    pub fn bool(&self, name: &str, index: usize) -> Option<bool> {
        self.get(name, index).and_then(coerce_bool)
    }

    pub fn string(&self, name: &str, index: usize) -> Option<String> {
        self.get(name, index).and_then(coerce_string)
    }

    pub fn color(&self, name: &str, index: usize) -> Option<Color> {
        self.get(name, index).and_then(coerce_color)
    }

    pub fn float_range(&self, name: &str, index: usize) -> Option<(f32, f32)> {
        self.get(name, index).and_then(coerce_float_range)
    }

    pub fn alignment(&self, name: &str, index: usize) -> Option<Alignment> {
        self.get(name, index).and_then(coerce_alignment)
    }

    pub fn shape(&self, name: &str, index: usize) -> Option<Shape> {
        self.get(name, index).and_then(coerce_shape)
    }

    pub fn intrinsic(&self, name: &str, index: usize) -> Option<IntrinsicSize> {
        self.get(name, index).and_then(coerce_intrinsic)
    }
}

// ---------------------------------------------------------------------------
// Coercions
// ---------------------------------------------------------------------------

fn finite(v: f64) -> Option<f32> {
    let v = v as f32;
    v.is_finite().then_some(v)
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn single_number(args: &[ArgumentData]) -> Option<f32> {
    match args {
        [only] => only.value.as_f64().and_then(finite),
        _ => None,
    }
}

/// Numbers and integer-only strings are dp; `dp(n)` unwraps; other unit
/// functions do not coerce to dp.
pub fn coerce_dp(value: &ArgValue) -> Option<Dp> {
    match value {
        ArgValue::Int(_) | ArgValue::Float(_) => value.as_f64().and_then(finite).map(Dp),
        ArgValue::Str(s) if is_integer_literal(s.trim()) => {
            s.trim().parse::<f64>().ok().and_then(finite).map(Dp)
        }
        ArgValue::Call { name, args } if name == "dp" || name == "Dp" => {
            single_number(args).map(Dp)
        }
        _ => None,
    }
}

pub fn coerce_sp(value: &ArgValue) -> Option<Sp> {
    match value {
        ArgValue::Int(_) | ArgValue::Float(_) => value.as_f64().and_then(finite).map(Sp),
        ArgValue::Call { name, args } if name == "sp" || name == "Sp" => {
            single_number(args).map(Sp)
        }
        _ => None,
    }
}

pub fn coerce_float(value: &ArgValue) -> Option<f32> {
    match value {
        ArgValue::Int(_) | ArgValue::Float(_) => value.as_f64().and_then(finite),
        ArgValue::Str(s) => s.trim().parse::<f64>().ok().and_then(finite),
        _ => None,
    }
}

pub fn coerce_int(value: &ArgValue) -> Option<i64> {
    match value {
        ArgValue::Int(i) => Some(*i),
        ArgValue::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn coerce_bool(value: &ArgValue) -> Option<bool> {
    match value {
        ArgValue::Bool(b) => Some(*b),
        ArgValue::Str(s) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn coerce_string(value: &ArgValue) -> Option<String> {
    match value {
        ArgValue::Str(s) | ArgValue::Ident(s) => Some(s.clone()),
        _ => None,
    }
}

/// `color.Red`, `"#FF0000"`, `Color("#FF0000")`, `Color(255, 0, 0[, alpha])`.
pub fn coerce_color(value: &ArgValue) -> Option<Color> {
    match value {
        ArgValue::Ident(name) => Color::named(name),
        ArgValue::Str(s) => Color::parse(s),
        ArgValue::Call { name, args } if name == "Color" => {
            let channel = |i: usize| -> Option<u8> {
                match args.get(i)?.value {
                    ArgValue::Int(v) => u8::try_from(v).ok(),
                    _ => None,
                }
            };
            match args.len() {
                1 => coerce_color(&args[0].value),
                3 => Some(Color::rgb(channel(0)?, channel(1)?, channel(2)?)),
                4 => Some(Color::argb(channel(3)?, channel(0)?, channel(1)?, channel(2)?)),
                _ => None,
            }
        }
        _ => None,
    }
}

pub fn coerce_float_range(value: &ArgValue) -> Option<(f32, f32)> {
    match value {
        ArgValue::Range { start, end } => Some((finite(*start)?, finite(*end)?)),
        _ => None,
    }
}

pub fn coerce_alignment(value: &ArgValue) -> Option<Alignment> {
    match value {
        ArgValue::Ident(name) | ArgValue::Str(name) => Alignment::from_name(name),
        _ => None,
    }
}

/// `CircleShape`, `RectangleShape`, `RoundedCornerShape(8)`, or a shape
/// attribute string.
pub fn coerce_shape(value: &ArgValue) -> Option<Shape> {
    match value {
        ArgValue::Ident(name) => match name.rsplit('.').next()? {
            "CircleShape" | "Circle" => Some(Shape::Circle),
            "RectangleShape" | "Rectangle" => Some(Shape::Rectangle),
            _ => None,
        },
        ArgValue::Str(s) => Shape::from_attr(s),
        ArgValue::Call { name, args } if name == "RoundedCornerShape" => {
            let radius = args.first().and_then(|a| coerce_dp(&a.value))?;
            Some(Shape::Rounded(radius))
        }
        _ => None,
    }
}

pub fn coerce_intrinsic(value: &ArgValue) -> Option<IntrinsicSize> {
    match value {
        ArgValue::Ident(name) => IntrinsicSize::from_name(name),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Attribute strings
// ---------------------------------------------------------------------------

/// A valueless attribute (`<Checkbox checked>`) reads as `true`.
pub fn bool_attr(value: &str) -> Option<bool> {
    match value.trim() {
        "" | "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

pub fn dp_attr(value: &str) -> Option<Dp> {
    value.trim().parse::<f64>().ok().and_then(finite).map(Dp)
}

pub fn float_attr(value: &str) -> Option<f32> {
    value.trim().parse::<f64>().ok().and_then(finite)
}

pub fn int_attr(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

pub fn color_attr(value: &str) -> Option<Color> {
    Color::parse(value)
}
