//! Markup documents: node model, parser, mutable arena, wire envelope.

pub mod envelope;
pub mod node;
pub mod parser;
pub mod tree;

pub use envelope::{Envelope, EnvelopeError, Patch};
pub use node::{Attribute, Node, KEY_ATTRIBUTE, MAX_DEPTH, TEMPLATE_ATTRIBUTE};
pub use parser::{parse_markup, MarkupError};
pub use tree::{Document, NodeId, ROOT_TAG};
