//! Headless testing helpers: Pilot, snapshot rendering, envelope builders.
//!
//! Use the [`Pilot`] to drive a [`Session`](crate::app::Session) without a
//! terminal. Use [`render_to_string`] and the envelope helpers for
//! snapshot-style assertions on rendered markup.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{canvas_to_string, diff_envelope, render_envelope, render_to_string, strips_to_string};
