//! Events: outbound dispatch to the transport and inbound terminal input.

pub mod dispatch;
pub mod input;

pub use dispatch::{Dispatch, EventKind, PushEvent};
pub use input::{Command, Input};
