//! # liveview-tui
//!
//! A terminal client for server-driven LiveView markup.
//!
//! The server sends markup fragments and patches; the client keeps a document
//! tree, builds typed view descriptors for each element through a tag
//! registry, compiles `class`/`style` attributes into ordered modifier chains,
//! and paints the result into a terminal with taffy layout and crossterm.
//! User interactions go back to the server as push events.
//!
//! ## Core Systems
//!
//! - **[`style`]**: style mini-language tokenizer, parser, argument resolution
//! - **[`modifier`]**: compiles style clauses into a scope-checked modifier chain
//! - **[`markup`]**: markup parser, slotmap-backed document tree, envelope patches
//! - **[`view`]**: view descriptors, per-kind attribute binding, `phx-value` merging
//! - **[`registry`]**: tag name → descriptor factory lookup with fallback
//! - **[`reconcile`]**: versioned envelope application and descriptor reuse
//! - **[`render`]**: taffy layout walk, cell canvas, crossterm driver
//! - **[`event`]**: push events out, terminal input in
//! - **[`app`]**: the async session loop
//! - **[`testing`]**: headless pilot and snapshot helpers

// Foundation
pub mod geometry;
pub mod style;

// Document and views
pub mod markup;
pub mod modifier;
pub mod registry;
pub mod view;

// State
pub mod event;
pub mod reconcile;

// Rendering
pub mod render;

// Application
pub mod app;
pub mod testing;

pub use app::{AppConfig, Session};
pub use reconcile::{Coordinator, Snapshot};
pub use registry::Registry;
