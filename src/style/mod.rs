//! Style mini-language: tokenizer, parser, argument resolution, scalar values.

pub mod args;
pub mod color;
pub mod model;
pub mod parser;
pub mod scalar;
pub mod tokenizer;

pub use args::Args;
pub use color::Color;
pub use model::{ArgValue, ArgumentData, StyleClause};
pub use parser::{parse_style, StyleError};
pub use scalar::{Align1d, Alignment, Arrangement, Dp, Insets, IntrinsicSize, Shape, Sp};
