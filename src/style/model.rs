//! Style AST types.
//!
//! A style string such as `size(100);background(color.Red)` parses into an
//! ordered list of [`StyleClause`]s. Each clause carries a function name and
//! its [`ArgumentData`] list, positional or named.

use std::fmt;

// ---------------------------------------------------------------------------
// ArgValue
// ---------------------------------------------------------------------------

/// The typed payload of one parsed argument.
///
/// Exactly one variant is populated per argument. Coercion to a semantic type
/// (dp, color, alignment...) happens later in [`crate::style::args`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// A quoted string or a hex color literal (`#AARRGGBB`).
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A bare or dotted constant: `Red`, `color.Red`, `Alignment.Center`.
    Ident(String),
    /// A nested call: `dp(8)`, `RoundedCornerShape(4)`.
    Call { name: String, args: Vec<ArgumentData> },
    /// A numeric range: `0.0..1.0`.
    Range { start: f64, end: f64 },
}

impl ArgValue {
    /// Numeric view of `Int`/`Float` values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Int(i) => Some(*i as f64),
            ArgValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(s) => write!(f, "\"{s}\""),
            ArgValue::Int(i) => write!(f, "{i}"),
            ArgValue::Float(v) => write!(f, "{v}"),
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::Ident(name) => write!(f, "{name}"),
            ArgValue::Call { name, args } => {
                write!(f, "{name}(")?;
                write_args(f, args)?;
                write!(f, ")")
            }
            ArgValue::Range { start, end } => write!(f, "{start}..{end}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ArgumentData
// ---------------------------------------------------------------------------

/// One argument of a style function call, optionally named (`fraction: 0.5`).
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentData {
    pub name: Option<String>,
    pub value: ArgValue,
}

impl ArgumentData {
    /// A positional argument.
    pub fn positional(value: ArgValue) -> Self {
        Self { name: None, value }
    }

    /// A named (keyword-style) argument.
    pub fn named(name: impl Into<String>, value: ArgValue) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }

    /// Whether this argument was written as `name: value`.
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

impl fmt::Display for ArgumentData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}: {}", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[ArgumentData]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// StyleClause
// ---------------------------------------------------------------------------

/// A single `name(args...)` clause of a style string.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleClause {
    pub name: String,
    pub args: Vec<ArgumentData>,
}

impl StyleClause {
    pub fn new(name: impl Into<String>, args: Vec<ArgumentData>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl fmt::Display for StyleClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_args(f, &self.args)?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_positional_and_named() {
        let clause = StyleClause::new(
            "padding",
            vec![
                ArgumentData::positional(ArgValue::Int(4)),
                ArgumentData::named("vertical", ArgValue::Float(0.5)),
            ],
        );
        assert_eq!(clause.to_string(), "padding(4, vertical: 0.5)");
    }

    #[test]
    fn display_nested_call() {
        let value = ArgValue::Call {
            name: "dp".into(),
            args: vec![ArgumentData::positional(ArgValue::Int(8))],
        };
        assert_eq!(value.to_string(), "dp(8)");
    }

    #[test]
    fn as_f64_only_for_numbers() {
        assert_eq!(ArgValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(ArgValue::Float(0.25).as_f64(), Some(0.25));
        assert_eq!(ArgValue::Str("3".into()).as_f64(), None);
    }
}
