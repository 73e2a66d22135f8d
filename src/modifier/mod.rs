//! Modifier compilation: style clauses to an ordered chain of layout and paint
//! transformations.

pub mod chain;
pub mod compile;

pub use chain::{Extent, Modifier, ModifierChain, Progress, Scope};
pub use compile::{compile_clause, compile_clauses, compile_style};
