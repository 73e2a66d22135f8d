//! Rendering pipeline: layout walk, scroll state, strip assembly, canvas,
//! terminal driver.

pub mod canvas;
pub mod driver;
pub mod scroll;
pub mod strip;
pub mod walk;

pub use canvas::{Canvas, CellUpdate};
pub use driver::Driver;
pub use scroll::{ScrollOffsets, Scrollable};
pub use strip::{CellStyle, Strip, StyledCell};
pub use walk::{render, render_scrolled, Frame, Hit};
