//! Markup text to [`Node`] trees.
//!
//! A small, lenient HTML-style reader. Lexical garbage (a `<` that does not
//! start a tag, an unterminated quote or comment, end of input inside a tag)
//! is an error. Structural mistakes are recovered from with a warning: a
//! stray close tag is ignored and unclosed elements are closed implicitly.
//! Elements nested deeper than [`MAX_DEPTH`] are dropped.

use std::sync::Arc;

use tracing::{trace, warn};

use crate::markup::node::{Attribute, Node, MAX_DEPTH};

/// Errors from reading markup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarkupError {
    #[error("unexpected character {found:?} at byte {position}")]
    UnexpectedChar { position: usize, found: char },
    #[error("unterminated string starting at byte {position}")]
    UnterminatedString { position: usize },
    #[error("unterminated comment starting at byte {position}")]
    UnterminatedComment { position: usize },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
}

/// Elements that never have content.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Parse a markup fragment into its top-level nodes.
pub fn parse_markup(input: &str) -> Result<Vec<Node>, MarkupError> {
    let mut parser = MarkupParser {
        src: input,
        pos: 0,
        stack: Vec::new(),
        roots: Vec::new(),
        truncated: false,
    };
    parser.run()?;
    Ok(parser.roots)
}

/// An element whose close tag has not been seen yet.
struct Open {
    node: Node,
    text: Vec<String>,
}

impl Open {
    fn finish(self) -> Node {
        let mut node = self.node;
        let joined = self.text.join(" ");
        let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
        node.text = (!collapsed.is_empty()).then_some(collapsed);
        node
    }
}

struct MarkupParser<'s> {
    src: &'s str,
    pos: usize,
    stack: Vec<Open>,
    roots: Vec<Node>,
    truncated: bool,
}

impl<'s> MarkupParser<'s> {
    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn run(&mut self) -> Result<(), MarkupError> {
        while self.pos < self.src.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.skip_comment()?;
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_declaration()?;
            } else if rest.starts_with("</") {
                self.close_tag()?;
            } else if rest.starts_with('<') {
                self.open_tag()?;
            } else {
                self.text();
            }
        }

        while let Some(open) = self.stack.pop() {
            warn!(tag = %open.node.tag, "closing unclosed element at end of input");
            self.attach(open.finish());
        }
        Ok(())
    }

    // ── Structure ───────────────────────────────────────────────────

    fn attach(&mut self, node: Node) {
        if self.stack.len() >= MAX_DEPTH {
            if !self.truncated {
                warn!(tag = %node.tag, max_depth = MAX_DEPTH, "dropping elements nested too deeply");
                self.truncated = true;
            }
            return;
        }
        match self.stack.last_mut() {
            Some(parent) => parent.node.children.push(Arc::new(node)),
            None => self.roots.push(node),
        }
    }

    fn close(&mut self, tag: &str) {
        let Some(depth) = self.stack.iter().rposition(|o| o.node.tag == tag) else {
            warn!(tag, "ignoring stray close tag");
            return;
        };
        while self.stack.len() > depth + 1 {
            if let Some(open) = self.stack.pop() {
                warn!(tag = %open.node.tag, closed_by = tag, "implicitly closing element");
                self.attach(open.finish());
            }
        }
        if let Some(open) = self.stack.pop() {
            self.attach(open.finish());
        }
    }

    // ── Lexing ──────────────────────────────────────────────────────

    fn skip_comment(&mut self) -> Result<(), MarkupError> {
        let start = self.pos;
        match self.src[start + 4..].find("-->") {
            Some(end) => {
                self.pos = start + 4 + end + 3;
                Ok(())
            }
            None => Err(MarkupError::UnterminatedComment { position: start }),
        }
    }

    fn skip_declaration(&mut self) -> Result<(), MarkupError> {
        match self.rest().find('>') {
            Some(end) => {
                self.pos += end + 1;
                Ok(())
            }
            None => Err(MarkupError::UnexpectedEof("unterminated declaration".into())),
        }
    }

    fn name(&mut self) -> Result<String, MarkupError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {}
            Some(found) => return Err(MarkupError::UnexpectedChar { position: start, found }),
            None => return Err(MarkupError::UnexpectedEof("expected a tag name".into())),
        }
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')) {
            self.advance();
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn close_tag(&mut self) -> Result<(), MarkupError> {
        self.pos += 2;
        let tag = self.name()?;
        self.skip_whitespace();
        match self.advance() {
            Some('>') => {
                self.close(&tag);
                Ok(())
            }
            Some(found) => Err(MarkupError::UnexpectedChar {
                position: self.pos - found.len_utf8(),
                found,
            }),
            None => Err(MarkupError::UnexpectedEof(format!("inside </{tag}"))),
        }
    }

    fn open_tag(&mut self) -> Result<(), MarkupError> {
        self.advance();
        let tag = self.name()?;
        let mut node = Node::new(tag.clone());

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                self.attach(node);
                return Ok(());
            }
            if rest.starts_with('>') {
                self.pos += 1;
                if VOID_TAGS.contains(&tag.as_str()) {
                    self.attach(node);
                } else {
                    self.stack.push(Open { node, text: Vec::new() });
                }
                return Ok(());
            }
            if rest.is_empty() {
                return Err(MarkupError::UnexpectedEof(format!("inside <{tag}")));
            }
            let attr = self.attribute()?;
            node.push_attr(attr);
        }
    }

    fn attribute(&mut self) -> Result<Attribute, MarkupError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<')) {
            self.advance();
        }
        if self.pos == start {
            let found = self.peek().unwrap_or('\0');
            return Err(MarkupError::UnexpectedChar { position: start, found });
        }
        let name = self.src[start..self.pos].to_string();

        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Ok(Attribute::new(name, ""));
        }
        self.advance();
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let open = self.pos;
                self.advance();
                let body_start = self.pos;
                match self.rest().find(quote) {
                    Some(len) => {
                        self.pos += len + 1;
                        decode_entities(&self.src[body_start..body_start + len])
                    }
                    None => return Err(MarkupError::UnterminatedString { position: open }),
                }
            }
            _ => {
                let value_start = self.pos;
                while matches!(self.peek(), Some(c) if !c.is_whitespace() && c != '>') {
                    self.advance();
                }
                decode_entities(&self.src[value_start..self.pos])
            }
        };
        Ok(Attribute::new(name, value))
    }

    fn text(&mut self) {
        let start = self.pos;
        let len = self.rest().find('<').unwrap_or(self.rest().len());
        self.pos += len;
        let raw = &self.src[start..self.pos];
        if raw.trim().is_empty() {
            return;
        }
        match self.stack.last_mut() {
            Some(open) => open.text.push(decode_entities(raw)),
            None => trace!(text = raw.trim(), "dropping top-level text"),
        }
    }
}

/// Decode the named and numeric character references markup commonly uses.
/// Unknown references are kept literally.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            }?;
            Some((ch, semi))
        });
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
