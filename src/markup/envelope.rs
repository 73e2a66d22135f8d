//! JSON wire envelope and diff patches.
//!
//! ```json
//! {"type": "render", "version": 1, "fragments": ["<Column>...</Column>"]}
//! {"type": "diff", "version": 2, "patches": [{"op": "remove", "target": "a"}]}
//! ```
//!
//! A malformed envelope, or a patch naming a target that does not exist, is a
//! structural error. `remove` and `replace` are the exceptions: their target
//! may already be gone, so replaying a diff lands on the same tree. A fragment
//! whose markup fails to parse is skipped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::markup::node::Node;
use crate::markup::parser::parse_markup;
use crate::markup::tree::Document;

/// Structural errors that abort an envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("malformed envelope: {0}")]
    Json(#[from] serde_json::Error),
    #[error("patch target '{0}' does not exist")]
    UnknownTarget(String),
    #[error("diff received before any render")]
    NoDocument,
}

/// One message from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    /// Full document: replaces whatever was there.
    Render { version: u64, fragments: Vec<String> },
    /// Incremental update against the current document.
    Diff { version: u64, patches: Vec<Patch> },
}

impl Envelope {
    /// Decode an envelope from JSON text.
    pub fn parse(json: &str) -> Result<Self, EnvelopeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn version(&self) -> u64 {
        match self {
            Envelope::Render { version, .. } | Envelope::Diff { version, .. } => *version,
        }
    }
}

/// One structural edit. `target` is a node identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Patch {
    /// Replace the target with the nodes parsed from `markup`.
    Replace { target: String, markup: String },
    /// Set attributes; `null` removes one.
    SetAttributes {
        target: String,
        attributes: BTreeMap<String, Option<String>>,
    },
    /// Remove the target. A missing target is already removed.
    Remove { target: String },
    /// Insert parsed nodes as children of the target at `index` (append when
    /// absent). A node whose key already exists elsewhere is moved.
    Insert {
        target: String,
        #[serde(default)]
        index: Option<usize>,
        markup: String,
    },
    /// Reorder the target's children by key.
    Reorder { target: String, keys: Vec<String> },
}

/// Parse every fragment, skipping the ones that fail.
pub fn parse_fragments(fragments: &[String]) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (index, fragment) in fragments.iter().enumerate() {
        match parse_markup(fragment) {
            Ok(parsed) => nodes.extend(parsed),
            Err(error) => warn!(index, %error, "skipping malformed fragment"),
        }
    }
    nodes
}

impl Document {
    /// Apply one patch in place.
    pub fn apply_patch(&mut self, patch: &Patch) -> Result<(), EnvelopeError> {
        let target_of = |doc: &Document, key: &str| {
            doc.find(key)
                .ok_or_else(|| EnvelopeError::UnknownTarget(key.to_string()))
        };

        match patch {
            Patch::Replace { target, markup } => {
                let Some(id) = self.find(target) else {
                    debug!(%target, "replace target already gone");
                    return Ok(());
                };
                let parent = self.parent(id).unwrap_or_else(|| self.root());
                let index = self.index_in_parent(id).unwrap_or(usize::MAX);
                let nodes = parse_fragments(std::slice::from_ref(markup));
                self.remove(id);
                for (offset, node) in nodes.iter().enumerate() {
                    self.insert_subtree(parent, index.saturating_add(offset), node);
                }
            }
            Patch::SetAttributes { target, attributes } => {
                let id = target_of(self, target)?;
                for (name, value) in attributes {
                    self.set_attribute(id, name, value.as_deref());
                }
            }
            Patch::Remove { target } => {
                if let Some(id) = self.find(target) {
                    self.remove(id);
                }
            }
            Patch::Insert { target, index, markup } => {
                let parent = target_of(self, target)?;
                let nodes = parse_fragments(std::slice::from_ref(markup));
                let mut at = index.unwrap_or(usize::MAX);
                for node in &nodes {
                    if let Some(existing) = node.key.as_deref().and_then(|k| self.find(k)) {
                        if self.is_ancestor_or_self(existing, parent) {
                            warn!(key = ?node.key, "insert would move a node into itself");
                            continue;
                        }
                        self.remove(existing);
                    }
                    let clamped = at.min(self.children(parent).len());
                    self.insert_subtree(parent, clamped, node);
                    at = clamped.saturating_add(1);
                }
            }
            Patch::Reorder { target, keys } => {
                let id = target_of(self, target)?;
                self.reorder(id, keys);
            }
        }
        Ok(())
    }

    /// Apply patches in order. Stops at the first structural error; callers
    /// that need atomicity apply to a clone.
    pub fn apply_patches(&mut self, patches: &[Patch]) -> Result<(), EnvelopeError> {
        patches.iter().try_for_each(|p| self.apply_patch(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::tree::NodeData;

    fn doc(markup: &str) -> Document {
        Document::from_nodes(&parse_markup(markup).unwrap())
    }

    fn keys_under(d: &Document, key: &str) -> Vec<String> {
        let parent = d.find(key).unwrap();
        d.children(parent)
            .iter()
            .filter_map(|&c| d.get(c).and_then(NodeData::key).map(str::to_string))
            .collect()
    }

    // ── Decoding ─────────────────────────────────────────────────────

    #[test]
    fn decode_render() {
        let env = Envelope::parse(r#"{"type":"render","version":3,"fragments":["<Text/>"]}"#).unwrap();
        assert_eq!(
            env,
            Envelope::Render { version: 3, fragments: vec!["<Text/>".into()] }
        );
        assert_eq!(env.version(), 3);
    }

    #[test]
    fn decode_diff_all_ops() {
        let json = r##"{"type":"diff","version":4,"patches":[
            {"op":"replace","target":"a","markup":"<Text/>"},
            {"op":"set_attributes","target":"a","attributes":{"color":"#FFFF0000","style":null}},
            {"op":"remove","target":"b"},
            {"op":"insert","target":"l","markup":"<Text/>"},
            {"op":"insert","target":"l","index":0,"markup":"<Text/>"},
            {"op":"reorder","target":"l","keys":["x","y"]}
        ]}"##;
        let Envelope::Diff { patches, .. } = Envelope::parse(json).unwrap() else {
            panic!("expected diff");
        };
        assert_eq!(patches.len(), 6);
        assert!(matches!(&patches[3], Patch::Insert { index: None, .. }));
        assert!(matches!(&patches[4], Patch::Insert { index: Some(0), .. }));
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(matches!(Envelope::parse("{not json"), Err(EnvelopeError::Json(_))));
        assert!(matches!(
            Envelope::parse(r#"{"type":"explode","version":1}"#),
            Err(EnvelopeError::Json(_))
        ));
    }

    #[test]
    fn bad_fragment_skipped() {
        let nodes = parse_fragments(&["<Text/>".into(), "< broken".into(), "<Row/>".into()]);
        let tags: Vec<_> = nodes.iter().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, vec!["Text", "Row"]);
    }

    // ── Patches ──────────────────────────────────────────────────────

    #[test]
    fn replace_in_place() {
        let mut d = doc(r#"<Column id="c"><Text id="a"/><Text id="b"/></Column>"#);
        d.apply_patch(&Patch::Replace {
            target: "a".into(),
            markup: r#"<Text id="a2"/><Text id="a3"/>"#.into(),
        })
        .unwrap();
        assert_eq!(keys_under(&d, "c"), vec!["a2", "a3", "b"]);
    }

    #[test]
    fn set_attributes_patch() {
        let mut d = doc(r#"<Text id="t" style="size(1)"/>"#);
        let mut attributes = BTreeMap::new();
        attributes.insert("style".to_string(), None);
        attributes.insert("color".to_string(), Some("#FF00FF00".to_string()));
        d.apply_patch(&Patch::SetAttributes { target: "t".into(), attributes }).unwrap();
        let t = d.get(d.find("t").unwrap()).unwrap();
        assert_eq!(t.attributes.len(), 2);
        assert_eq!(t.attributes[1].name, "color");
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut d = doc(r#"<Text id="t"/>"#);
        d.apply_patch(&Patch::Remove { target: "ghost".into() }).unwrap();
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn replaying_patches_is_idempotent() {
        let mut attributes = BTreeMap::new();
        attributes.insert("color".to_string(), Some("#FF00FF00".to_string()));
        let patches = vec![
            Patch::Replace { target: "a".into(), markup: r#"<Text id="a2"/>"#.into() },
            Patch::Insert { target: "c".into(), index: Some(0), markup: r#"<Spacer id="s"/>"#.into() },
            Patch::SetAttributes { target: "b".into(), attributes },
        ];
        let mut d = doc(r#"<Column id="c"><Text id="a"/><Text id="b"/></Column>"#);
        d.apply_patches(&patches).unwrap();
        let once = d.freeze();
        d.apply_patches(&patches).unwrap();
        assert_eq!(d.freeze(), once);
        assert_eq!(keys_under(&d, "c"), vec!["s", "a2", "b"]);
    }

    #[test]
    fn unknown_target_is_error() {
        let mut d = doc(r#"<Text id="t"/>"#);
        let err = d
            .apply_patch(&Patch::Reorder { target: "ghost".into(), keys: vec![] })
            .unwrap_err();
        assert!(matches!(err, EnvelopeError::UnknownTarget(k) if k == "ghost"));
    }

    #[test]
    fn insert_at_index_and_move_existing() {
        let mut d = doc(r#"<Column id="l"><Text id="a"/><Text id="b"/></Column><Text id="z"/>"#);
        d.apply_patch(&Patch::Insert {
            target: "l".into(),
            index: Some(1),
            markup: r#"<Text id="x"/><Text id="z"/>"#.into(),
        })
        .unwrap();
        assert_eq!(keys_under(&d, "l"), vec!["a", "x", "z", "b"]);
        assert_eq!(d.children(d.root()).len(), 1);
    }

    #[test]
    fn apply_patches_stops_at_error() {
        let mut d = doc(r#"<Column id="l"><Text id="a"/></Column>"#);
        let result = d.apply_patches(&[
            Patch::Remove { target: "a".into() },
            Patch::Reorder { target: "ghost".into(), keys: vec![] },
        ]);
        assert!(result.is_err());
        assert!(d.find("a").is_none());
    }
}
