//! Published, read-only render trees.

use std::fmt;
use std::sync::Arc;

use crate::markup::Node;
use crate::view::ViewDescriptor;

/// One node of a published tree: identity, source node, and descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub key: String,
    pub node: Arc<Node>,
    pub descriptor: Arc<ViewDescriptor>,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    /// Pre-order traversal of this subtree.
    pub fn walk(&self) -> Vec<&RenderNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub fn find(&self, key: &str) -> Option<&RenderNode> {
        self.walk().into_iter().find(|n| n.key == key)
    }

    /// First child carrying the given slot template.
    pub fn slot(&self, template: &str) -> Option<&RenderNode> {
        self.children
            .iter()
            .find(|c| c.node.template.as_deref() == Some(template))
    }
}

/// An immutable tree published by the coordinator.
///
/// `revision` increases by one for every published change and is `0` before
/// the first render.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub revision: u64,
    pub root: Option<RenderNode>,
}

impl Snapshot {
    pub fn find(&self, key: &str) -> Option<&RenderNode> {
        self.root.as_ref()?.find(key)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.walk().len())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Keys in pre-order.
    pub fn keys(&self) -> Vec<&str> {
        self.root
            .as_ref()
            .map(|r| r.walk().into_iter().map(|n| n.key.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Descriptor bookkeeping for one applied envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// Nodes with no previous descriptor.
    pub added: usize,
    /// Nodes whose attributes, text, scope, or parent changed.
    pub rebuilt: usize,
    pub reused: usize,
    /// Descriptors released because their node is gone.
    pub removed: usize,
    /// Whether a new snapshot was published.
    pub changed: bool,
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "+{} ~{} ={} -{}{}",
            self.added,
            self.rebuilt,
            self.reused,
            self.removed,
            if self.changed { "" } else { " (unchanged)" }
        )
    }
}
