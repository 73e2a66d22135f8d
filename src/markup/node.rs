//! Generic markup nodes.
//!
//! A [`Node`] is the structural shape of one element: tag, ordered raw
//! attributes, collapsed text content, optional slot template, identity key,
//! and children. Attribute values stay strings; factories coerce them.

use std::fmt::Write as _;
use std::sync::Arc;

/// Attribute that carries a node's identity key.
pub const KEY_ATTRIBUTE: &str = "id";

/// Attribute that designates a node as a named slot of its parent.
pub const TEMPLATE_ATTRIBUTE: &str = "template";

/// Deepest element nesting kept in a document. Top-level fragment nodes sit
/// at depth 1; anything deeper than this is dropped.
pub const MAX_DEPTH: usize = 128;

// ---------------------------------------------------------------------------
// Attribute
// ---------------------------------------------------------------------------

/// A raw `(name, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One parsed markup element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    /// Direct text content, whitespace-collapsed. `None` when empty.
    pub text: Option<String>,
    /// Slot designation from the `template` attribute.
    pub template: Option<String>,
    /// Identity key from the `id` attribute.
    pub key: Option<String>,
    pub children: Vec<Arc<Node>>,
}

impl Node {
    /// Create a bare node with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add an attribute (builder). `template` and `id` also populate their
    /// dedicated fields.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_attr(Attribute::new(name, value));
        self
    }

    /// Add a child (builder).
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Set text content (builder).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = (!text.is_empty()).then_some(text);
        self
    }

    /// Append an attribute, routing `template` into [`Node::template`] and
    /// mirroring `id` into [`Node::key`].
    pub fn push_attr(&mut self, attr: Attribute) {
        if attr.name == TEMPLATE_ATTRIBUTE {
            self.template = Some(attr.value);
            return;
        }
        if attr.name == KEY_ATTRIBUTE {
            self.key = Some(attr.value.clone());
        }
        self.attributes.push(attr);
    }

    /// First value of the named attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Whether tag, attributes, text, and template match, ignoring children.
    pub fn same_shallow(&self, other: &Node) -> bool {
        self.tag == other.tag
            && self.attributes == other.attributes
            && self.text == other.text
            && self.template == other.template
    }

    /// Children carrying the given slot template.
    pub fn slot<'a>(&'a self, template: &'a str) -> impl Iterator<Item = &'a Arc<Node>> + 'a {
        self.children
            .iter()
            .filter(move |c| c.template.as_deref() == Some(template))
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }

    /// Serialize back to markup. Parsing the result yields an equal node.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        for attr in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", attr.name, escape(&attr.value));
        }
        if let Some(template) = &self.template {
            let _ = write!(out, " {TEMPLATE_ATTRIBUTE}=\"{}\"", escape(template));
        }
        if self.text.is_none() && self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_markup(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Escape text for attribute values and text content.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}
