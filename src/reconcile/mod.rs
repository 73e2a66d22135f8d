//! Reconciler and state coordinator.

pub mod coordinator;
pub mod snapshot;

pub use coordinator::{Coordinator, DocumentState, ReconcileError};
pub use snapshot::{ReconcileReport, RenderNode, Snapshot};
