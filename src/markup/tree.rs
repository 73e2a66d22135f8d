//! Mutable document arena that diffs are applied to.
//!
//! All nodes live in a single `SlotMap`. Parent/child relationships are stored
//! in secondary maps so that removal is O(subtree size) and lookup is O(1).
//! Identity keys (`id` attributes) are indexed for patch targeting. The arena
//! is cloned before a diff is applied so a failed diff leaves the original
//! untouched; [`Document::freeze`] produces the immutable [`Node`] tree that
//! is published.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use slotmap::{new_key_type, SecondaryMap, SlotMap};
use tracing::warn;

use crate::markup::node::{Attribute, Node, KEY_ATTRIBUTE, MAX_DEPTH, TEMPLATE_ATTRIBUTE};

/// Tag of the synthetic element that holds a document's top-level nodes.
pub const ROOT_TAG: &str = "phx-main";

/// Levels in `node`'s subtree, counting `node` itself.
fn node_depth(node: &Node) -> usize {
    let mut deepest = 0;
    let mut pending = vec![(node, 1)];
    while let Some((n, level)) = pending.pop() {
        deepest = deepest.max(level);
        pending.extend(n.children.iter().map(|c| (c.as_ref(), level + 1)));
    }
    deepest
}

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

new_key_type! {
    /// Arena handle for a document node.
    pub struct NodeId;
}

/// Data stored per arena node. Children live in the arena's maps.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub text: Option<String>,
    pub template: Option<String>,
}

impl NodeData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            text: None,
            template: None,
        }
    }

    fn from_node(node: &Node) -> Self {
        Self {
            tag: node.tag.clone(),
            attributes: node.attributes.clone(),
            text: node.text.clone(),
            template: node.template.clone(),
        }
    }

    /// The identity key (`id` attribute), if any.
    pub fn key(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == KEY_ATTRIBUTE)
            .map(|a| a.value.as_str())
    }
}

/// The canonical, mutable document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    ids: HashMap<String, NodeId>,
    root: NodeId,
}

impl Document {
    /// A document holding only the synthetic root.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new(ROOT_TAG));
        let mut children = SecondaryMap::new();
        children.insert(root, Vec::new());
        Self {
            nodes,
            children,
            parent: SecondaryMap::new(),
            ids: HashMap::new(),
            root,
        }
    }

    /// A document whose root holds `nodes` in order.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut doc = Self::new();
        let root = doc.root;
        for node in nodes {
            doc.insert_subtree(root, usize::MAX, node);
        }
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root has no children.
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Get the children of a node. Returns an empty slice if the node has no
    /// children or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Number of ancestors between `id` and the root; the root is at 0.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Position of `id` among its siblings.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Whether `ancestor` is `id` or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Find a node by identity key.
    pub fn find(&self, key: &str) -> Option<NodeId> {
        self.ids.get(key).copied()
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Insert `node` and its subtree under `parent` at `index` (clamped to
    /// the child count). Returns the new subtree root, or `None` when the
    /// subtree would start below [`MAX_DEPTH`]; deeper descendants are dropped.
    pub fn insert_subtree(&mut self, parent: NodeId, index: usize, node: &Node) -> Option<NodeId> {
        let depth = self.depth(parent) + 1;
        let inserted = self.insert_at_depth(parent, index, node, depth);
        if inserted.is_none() || node_depth(node) + depth - 1 > MAX_DEPTH {
            warn!(tag = %node.tag, max_depth = MAX_DEPTH, "dropping elements nested too deeply");
        }
        inserted
    }

    fn insert_at_depth(&mut self, parent: NodeId, index: usize, node: &Node, depth: usize) -> Option<NodeId> {
        if depth > MAX_DEPTH {
            return None;
        }
        let id = self.nodes.insert(NodeData::from_node(node));
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            let at = index.min(siblings.len());
            siblings.insert(at, id);
        }
        if let Some(key) = &node.key {
            self.ids.entry(key.clone()).or_insert(id);
        }
        for child in &node.children {
            self.insert_at_depth(id, usize::MAX, child, depth + 1);
        }
        Some(id)
    }

    /// Remove a node and all its descendants. The root cannot be removed.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't
    /// exist.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if id == self.root || !self.nodes.contains_key(id) {
            return None;
        }

        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root_data = None;
        let mut released_keys = Vec::new();

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            if let Some(data) = self.nodes.remove(current) {
                if let Some(key) = data.key() {
                    if self.ids.get(key) == Some(&current) {
                        released_keys.push(key.to_string());
                    }
                }
                if current == id {
                    removed_root_data = Some(data);
                }
            }
        }

        for key in released_keys {
            self.reindex(&key);
        }
        removed_root_data
    }

    /// Set (`Some`) or remove (`None`) one attribute. Setting an existing
    /// attribute keeps its position. Returns `false` if `id` is unknown.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: Option<&str>) -> bool {
        let Some(data) = self.nodes.get_mut(id) else {
            return false;
        };

        if name == TEMPLATE_ATTRIBUTE {
            data.template = value.map(str::to_string);
            return true;
        }

        let old_key = data.key().map(str::to_string);
        match (data.attributes.iter_mut().find(|a| a.name == name), value) {
            (Some(attr), Some(v)) => attr.value = v.to_string(),
            (Some(_), None) => data.attributes.retain(|a| a.name != name),
            (None, Some(v)) => data.attributes.push(Attribute::new(name, v)),
            (None, None) => {}
        }

        if name == KEY_ATTRIBUTE {
            if let Some(old) = old_key {
                if self.ids.get(&old) == Some(&id) {
                    self.ids.remove(&old);
                    self.reindex(&old);
                }
            }
            if let Some(new) = value {
                self.ids.entry(new.to_string()).or_insert(id);
            }
        }
        true
    }

    /// Reorder `parent`'s children: children whose keys appear in `keys` come
    /// first in that order; the rest keep their relative order after them.
    pub fn reorder(&mut self, parent: NodeId, keys: &[String]) {
        let current = self.children(parent).to_vec();
        let key_of = |id: &NodeId| self.nodes.get(*id).and_then(|d| d.key().map(str::to_string));

        let mut ordered: Vec<NodeId> = Vec::with_capacity(current.len());
        for key in keys {
            if let Some(&id) = current
                .iter()
                .find(|id| key_of(id).as_deref() == Some(key.as_str()) && !ordered.contains(id))
            {
                ordered.push(id);
            }
        }
        for id in &current {
            if !ordered.contains(id) {
                ordered.push(*id);
            }
        }

        if let Some(children) = self.children.get_mut(parent) {
            *children = ordered;
        }
    }

    /// Point `key` at the first remaining node carrying it, in document order.
    fn reindex(&mut self, key: &str) {
        self.ids.remove(key);
        let found = self
            .walk_depth_first(self.root)
            .into_iter()
            .find(|&id| self.nodes.get(id).and_then(NodeData::key) == Some(key));
        if let Some(id) = found {
            self.ids.insert(key.to_string(), id);
        }
    }

    // ── Traversal ───────────────────────────────────────────────────

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Build the immutable subtree rooted at `id`.
    pub fn to_node(&self, id: NodeId) -> Option<Node> {
        let data = self.nodes.get(id)?;
        let children = self
            .children(id)
            .iter()
            .filter_map(|&c| self.to_node(c).map(Arc::new))
            .collect();
        Some(Node {
            tag: data.tag.clone(),
            attributes: data.attributes.clone(),
            text: data.text.clone(),
            template: data.template.clone(),
            key: data.key().map(str::to_string),
            children,
        })
    }

    /// The whole document as an immutable tree.
    pub fn freeze(&self) -> Arc<Node> {
        Arc::new(self.to_node(self.root).unwrap_or_else(|| Node::new(ROOT_TAG)))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parser::parse_markup;

    fn doc(markup: &str) -> Document {
        Document::from_nodes(&parse_markup(markup).unwrap())
    }

    fn child_keys(doc: &Document, parent: NodeId) -> Vec<String> {
        doc.children(parent)
            .iter()
            .filter_map(|&c| doc.get(c).and_then(NodeData::key).map(str::to_string))
            .collect()
    }

    #[test]
    fn from_nodes_wraps_in_root() {
        let d = doc("<Text>a</Text><Text>b</Text>");
        assert_eq!(d.get(d.root()).unwrap().tag, ROOT_TAG);
        assert_eq!(d.children(d.root()).len(), 2);
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn find_by_key() {
        let d = doc(r#"<Column id="c"><Text id="t"/></Column>"#);
        let t = d.find("t").unwrap();
        assert_eq!(d.parent(t), d.find("c"));
        assert_eq!(d.index_in_parent(t), Some(0));
        assert!(d.find("nope").is_none());
    }

    #[test]
    fn insert_clamps_index() {
        let mut d = doc(r#"<Column id="c"><Text id="a"/></Column>"#);
        let c = d.find("c").unwrap();
        d.insert_subtree(c, 0, &Node::new("Text").with_attr("id", "first"));
        d.insert_subtree(c, 99, &Node::new("Text").with_attr("id", "last"));
        assert_eq!(child_keys(&d, c), vec!["first", "a", "last"]);
    }

    #[test]
    fn insert_below_max_depth_is_dropped() {
        let mut d = Document::new();
        let mut parent = d.root();
        for _ in 0..MAX_DEPTH - 1 {
            parent = d.insert_subtree(parent, 0, &Node::new("Column")).unwrap();
        }
        assert_eq!(d.depth(parent), MAX_DEPTH - 1);

        let branch = Node::new("Row").with_child(Node::new("Text").with_attr("id", "deep"));
        let row = d.insert_subtree(parent, 0, &branch).unwrap();
        assert_eq!(d.depth(row), MAX_DEPTH);
        assert!(d.children(row).is_empty());
        assert!(d.find("deep").is_none());
        assert_eq!(d.insert_subtree(row, 0, &Node::new("Text")), None);
    }

    #[test]
    fn remove_drops_subtree_and_index() {
        let mut d = doc(r#"<Column id="c"><Text id="a"/><Text id="b"/></Column>"#);
        let c = d.find("c").unwrap();
        let removed = d.remove(c).unwrap();
        assert_eq!(removed.tag, "Column");
        assert_eq!(d.len(), 1);
        assert!(d.find("a").is_none());
        assert!(d.remove(d.root()).is_none());
    }

    #[test]
    fn remove_reindexes_duplicate_keys() {
        let mut d = doc(r#"<Text id="x">one</Text><Text id="x">two</Text>"#);
        let first = d.find("x").unwrap();
        assert_eq!(d.get(first).unwrap().text.as_deref(), Some("one"));
        d.remove(first);
        let second = d.find("x").unwrap();
        assert_eq!(d.get(second).unwrap().text.as_deref(), Some("two"));
    }

    #[test]
    fn set_attribute_set_replace_remove() {
        let mut d = doc(r##"<Text id="t" color="#FF000000"/>"##);
        let t = d.find("t").unwrap();
        assert!(d.set_attribute(t, "color", Some("#FFFFFFFF")));
        assert!(d.set_attribute(t, "max-lines", Some("2")));
        assert!(d.set_attribute(t, "color", None));
        let names: Vec<_> = d.get(t).unwrap().attributes.iter().map(|a| a.name.clone()).collect();
        assert_eq!(names, vec!["id", "max-lines"]);
    }

    #[test]
    fn set_attribute_rekeys() {
        let mut d = doc(r#"<Text id="old"/>"#);
        let t = d.find("old").unwrap();
        d.set_attribute(t, "id", Some("new"));
        assert!(d.find("old").is_none());
        assert_eq!(d.find("new"), Some(t));
    }

    #[test]
    fn reorder_by_keys() {
        let mut d = doc(r#"<LazyColumn id="l"><Text id="a"/><Text id="b"/><Spacer/><Text id="c"/></LazyColumn>"#);
        let l = d.find("l").unwrap();
        d.reorder(l, &["c".into(), "a".into(), "zzz".into()]);
        assert_eq!(child_keys(&d, l), vec!["c", "a", "b"]);
        assert_eq!(d.children(l).len(), 4);
    }

    #[test]
    fn freeze_matches_source() {
        let nodes = parse_markup(r#"<Row id="r"><Text template="label">hi</Text></Row>"#).unwrap();
        let frozen = Document::from_nodes(&nodes).freeze();
        assert_eq!(frozen.tag, ROOT_TAG);
        assert_eq!(*frozen.children[0], nodes[0]);
    }
}
