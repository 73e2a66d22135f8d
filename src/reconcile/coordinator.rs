//! The coordinator: sole owner of the canonical document.
//!
//! Envelopes are applied to a private copy of the document. Only when the
//! whole envelope succeeds is the copy committed (the document is then
//! `Parsed`). Publishing reconciles descriptors and sends a new [`Snapshot`]
//! on a `watch` channel (the document is then `Rendered`). A failed envelope
//! leaves both the document and the published snapshot untouched.
//!
//! Descriptors are cached per identity key. A node keeps its descriptor when
//! its tag, attributes, text, template, enclosing scope and parent tag are
//! unchanged; children are not part of that comparison, so a reorder reuses
//! every descriptor.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::event::{Dispatch, EventKind};
use crate::markup::envelope::parse_fragments;
use crate::markup::{Document, Envelope, EnvelopeError, Node, ROOT_TAG};
use crate::modifier::Scope;
use crate::registry::Registry;
use crate::view::{BuildContext, ViewDescriptor};

use super::snapshot::{ReconcileReport, RenderNode, Snapshot};

// ---------------------------------------------------------------------------
// Errors and state
// ---------------------------------------------------------------------------

/// Envelope-level failures. Nothing is committed when one is returned.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("envelope version {received} is older than current version {current}")]
    VersionRegression { current: u64, received: u64 },
}

/// Document lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Uninitialized,
    /// An envelope has been applied to the document but not yet published.
    Parsed,
    Rendered,
}

struct CacheEntry {
    node: Arc<Node>,
    scope: Scope,
    parent_tag: Option<String>,
    descriptor: Arc<ViewDescriptor>,
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

pub struct Coordinator {
    registry: Arc<Registry>,
    dispatch: Dispatch,
    state: DocumentState,
    version: Option<u64>,
    document: Option<Document>,
    cache: HashMap<String, CacheEntry>,
    tx: watch::Sender<Arc<Snapshot>>,
}

impl Coordinator {
    pub fn new(registry: Arc<Registry>, dispatch: Dispatch) -> Self {
        let (tx, _) = watch::channel(Arc::new(Snapshot::default()));
        Self {
            registry,
            dispatch,
            state: DocumentState::Uninitialized,
            version: None,
            document: None,
            cache: HashMap::new(),
            tx,
        }
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    /// Version of the last applied envelope.
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// The current published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.tx.borrow().clone()
    }

    /// A receiver notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }

    /// Parse and apply one JSON envelope.
    pub fn apply_envelope(&mut self, json: &str) -> Result<ReconcileReport, ReconcileError> {
        let envelope = Envelope::parse(json)?;
        self.apply(envelope)
    }

    /// Apply a parsed envelope and publish the result.
    pub fn apply(&mut self, envelope: Envelope) -> Result<ReconcileReport, ReconcileError> {
        self.stage(envelope)?;
        Ok(self.publish().unwrap_or_default())
    }

    /// Parse and stage one JSON envelope without publishing.
    pub fn stage_envelope(&mut self, json: &str) -> Result<(), ReconcileError> {
        let envelope = Envelope::parse(json)?;
        self.stage(envelope)
    }

    /// Commit an envelope to the document and move to
    /// [`DocumentState::Parsed`]. Several envelopes may be staged before one
    /// [`publish`](Self::publish).
    pub fn stage(&mut self, envelope: Envelope) -> Result<(), ReconcileError> {
        let received = envelope.version();
        if let Some(current) = self.version {
            if received < current {
                return Err(ReconcileError::VersionRegression { current, received });
            }
        }

        let document = match envelope {
            Envelope::Render { fragments, .. } => Document::from_nodes(&parse_fragments(&fragments)),
            Envelope::Diff { patches, .. } => {
                let mut document = self.document.clone().ok_or(EnvelopeError::NoDocument)?;
                document.apply_patches(&patches)?;
                document
            }
        };

        self.document = Some(document);
        self.version = Some(received);
        self.state = DocumentState::Parsed;
        Ok(())
    }

    /// Reconcile the staged document and publish it. Returns `None` when
    /// nothing is staged.
    pub fn publish(&mut self) -> Option<ReconcileReport> {
        if self.state != DocumentState::Parsed {
            return None;
        }
        let root = self.document.as_ref()?.freeze();
        let report = self.reconcile(root);
        self.state = DocumentState::Rendered;
        debug!(
            version = ?self.version,
            added = report.added,
            rebuilt = report.rebuilt,
            reused = report.reused,
            removed = report.removed,
            changed = report.changed,
            "reconciled envelope"
        );
        Some(report)
    }

    /// Fire the event bound to `kind` on the node with identity `key`.
    /// Returns `false` if the node is gone, disabled, or has no binding.
    pub fn fire(&self, key: &str, kind: EventKind, value: Option<Value>) -> bool {
        self.cache
            .get(key)
            .is_some_and(|entry| entry.descriptor.fire(kind, value))
    }

    /// Fire whatever a pointer click on `key` means for its view.
    pub fn click(&self, key: &str) -> bool {
        let Some(entry) = self.cache.get(key) else {
            return false;
        };
        let (kind, value) = entry.descriptor.click_event();
        entry.descriptor.fire(kind, value)
    }

    fn reconcile(&mut self, root: Arc<Node>) -> ReconcileReport {
        let mut pass = Pass {
            registry: &self.registry,
            dispatch: &self.dispatch,
            previous: std::mem::take(&mut self.cache),
            next: HashMap::new(),
            report: ReconcileReport::default(),
        };
        let tree = pass.visit(&root, ROOT_TAG.to_string(), None, Scope::None);
        let Pass {
            previous,
            next,
            mut report,
            ..
        } = pass;
        report.removed = previous.len();
        self.cache = next;

        let current = self.tx.borrow().clone();
        let unchanged = current
            .root
            .as_ref()
            .is_some_and(|r| *r.node == *root);
        if !unchanged {
            self.tx.send_replace(Arc::new(Snapshot {
                revision: current.revision + 1,
                root: Some(tree),
            }));
            report.changed = true;
        }
        report
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("state", &self.state)
            .field("version", &self.version)
            .field("descriptors", &self.cache.len())
            .field("revision", &self.tx.borrow().revision)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Reconcile pass
// ---------------------------------------------------------------------------

struct Pass<'a> {
    registry: &'a Registry,
    dispatch: &'a Dispatch,
    previous: HashMap<String, CacheEntry>,
    next: HashMap<String, CacheEntry>,
    report: ReconcileReport,
}

impl Pass<'_> {
    fn visit(
        &mut self,
        node: &Arc<Node>,
        key: String,
        parent_tag: Option<&str>,
        scope: Scope,
    ) -> RenderNode {
        let descriptor = match self.previous.remove(&key) {
            Some(entry)
                if entry.node.same_shallow(node)
                    && entry.scope == scope
                    && entry.parent_tag.as_deref() == parent_tag =>
            {
                self.report.reused += 1;
                entry.descriptor
            }
            stale => {
                if stale.is_some() {
                    self.report.rebuilt += 1;
                } else {
                    self.report.added += 1;
                }
                let ctx = BuildContext::new(&node.tag, self.dispatch, scope)
                    .with_text(node.text.as_deref());
                Arc::new(self.registry.build(parent_tag, &node.attributes, &ctx))
            }
        };

        let child_scope = descriptor.child_scope();
        let children = child_keys(&key, &node.children)
            .into_iter()
            .zip(&node.children)
            .map(|(child_key, child)| self.visit(child, child_key, Some(node.tag.as_str()), child_scope))
            .collect();

        self.next.insert(
            key.clone(),
            CacheEntry {
                node: node.clone(),
                scope,
                parent_tag: parent_tag.map(str::to_string),
                descriptor: descriptor.clone(),
            },
        );
        RenderNode {
            key,
            node: node.clone(),
            descriptor,
            children,
        }
    }
}

/// Identity keys for a sibling group.
///
/// Keyed nodes are `parent/Tag#id`; unkeyed nodes are `parent/Tag[n]` where
/// `n` counts unkeyed siblings of the same tag. Collisions get a `~n` suffix.
fn child_keys(parent: &str, children: &[Arc<Node>]) -> Vec<String> {
    let mut unkeyed: HashMap<&str, usize> = HashMap::new();
    let mut seen: HashSet<String> = HashSet::new();
    children
        .iter()
        .map(|child| {
            let base = match &child.key {
                Some(id) => format!("{parent}/{}#{id}", child.tag),
                None => {
                    let n = unkeyed.entry(child.tag.as_str()).or_default();
                    let key = format!("{parent}/{}[{n}]", child.tag);
                    *n += 1;
                    key
                }
            };
            let mut key = base.clone();
            let mut suffix = 1;
            while !seen.insert(key.clone()) {
                key = format!("{base}~{suffix}");
                suffix += 1;
            }
            if suffix > 1 {
                warn!(key = %base, "duplicate identity key among siblings");
            }
            key
        })
        .collect()
}
