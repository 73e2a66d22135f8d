//! Shared attribute accumulator.
//!
//! Every factory folds its attributes left to right. Names the kind-specific
//! fold does not recognise fall through to [`CommonBuilder::accept`], which
//! handles style, class, identity, event bindings and bound values. Anything
//! still unrecognised is ignored.

use std::collections::BTreeMap;

use crate::event::{Dispatch, EventKind};
use crate::markup::{Attribute, KEY_ATTRIBUTE};
use crate::modifier::{compile_style, ModifierChain, Scope};

use super::values::PhxValues;

const PHX_VALUE: &str = "phx-value";
const PHX_VALUE_PREFIX: &str = "phx-value-";

/// Properties every view descriptor carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommonProps {
    pub id: Option<String>,
    pub modifiers: ModifierChain,
    pub values: PhxValues,
    pub bindings: BTreeMap<EventKind, String>,
    pub dispatch: Dispatch,
}

impl CommonProps {
    /// Event name bound for `kind`, if any.
    pub fn binding(&self, kind: EventKind) -> Option<&str> {
        self.bindings.get(&kind).map(String::as_str)
    }
}

/// Accumulates common attributes during a factory fold.
///
/// `class` and `style` are stored as text and compiled only in
/// [`finish`](Self::finish), so the class chain always precedes the style
/// chain no matter which attribute came first.
#[derive(Debug, Default)]
pub struct CommonBuilder {
    id: Option<String>,
    class: Option<String>,
    style: Option<String>,
    values: PhxValues,
    bindings: BTreeMap<EventKind, String>,
}

impl CommonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one attribute. Returns `false` if the name is not a common one.
    pub fn accept(&mut self, attr: &Attribute) -> bool {
        let name = attr.name.as_str();
        match name {
            "class" => self.class = Some(attr.value.clone()),
            "style" => self.style = Some(attr.value.clone()),
            KEY_ATTRIBUTE => self.id = Some(attr.value.clone()),
            PHX_VALUE => self.values = self.values.with_primary(attr.value.as_str()),
            _ => {
                if let Some(field) = name.strip_prefix(PHX_VALUE_PREFIX) {
                    if field.is_empty() {
                        return false;
                    }
                    self.values = self.values.with_named(field, attr.value.as_str());
                } else if let Some(kind) = EventKind::from_attribute(name) {
                    self.bindings.insert(kind, attr.value.clone());
                } else {
                    return false;
                }
            }
        }
        true
    }

    /// Compile the accumulated state for a node in `scope`.
    pub fn finish(self, scope: Scope, dispatch: &Dispatch) -> CommonProps {
        let mut modifiers = ModifierChain::new();
        if let Some(class) = &self.class {
            modifiers = modifiers.then_chain(compile_style(class, scope));
        }
        if let Some(style) = &self.style {
            modifiers = modifiers.then_chain(compile_style(style, scope));
        }
        CommonProps {
            id: self.id,
            modifiers,
            values: self.values,
            bindings: self.bindings,
            dispatch: dispatch.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::Modifier;
    use crate::style::{Color, Dp};
    use serde_json::json;

    fn fold(attrs: &[(&str, &str)]) -> CommonProps {
        let mut b = CommonBuilder::new();
        for (n, v) in attrs {
            b.accept(&Attribute::new(*n, *v));
        }
        b.finish(Scope::None, &Dispatch::noop())
    }

    #[test]
    fn class_precedes_style_regardless_of_order() {
        let a = fold(&[("style", "alpha(0.5)"), ("class", "background(color.Red)")]);
        let b = fold(&[("class", "background(color.Red)"), ("style", "alpha(0.5)")]);
        assert_eq!(a.modifiers, b.modifiers);
        assert_eq!(a.modifiers.as_slice()[0], Modifier::Background(Color::RED));
    }

    #[test]
    fn bindings_and_values() {
        let p = fold(&[
            ("phx-click", "inc"),
            ("phx-value", "p"),
            ("phx-value-foo", "1"),
            ("id", "counter"),
        ]);
        assert_eq!(p.binding(EventKind::Click), Some("inc"));
        assert_eq!(p.binding(EventKind::Change), None);
        assert_eq!(p.values.payload(), json!({"value": "p", "foo": "1"}));
        assert_eq!(p.id.as_deref(), Some("counter"));
    }

    #[test]
    fn unknown_attributes_are_rejected() {
        let mut b = CommonBuilder::new();
        assert!(!b.accept(&Attribute::new("frob", "x")));
        assert!(!b.accept(&Attribute::new("phx-value-", "x")));
        assert!(!b.accept(&Attribute::new("phx-unknown", "x")));
        assert!(b.accept(&Attribute::new("phx-change", "set")));
    }

    #[test]
    fn style_compiles_in_scope() {
        let mut b = CommonBuilder::new();
        b.accept(&Attribute::new("style", "weight(1);padding(2)"));
        let row = b.finish(Scope::Row, &Dispatch::noop());
        assert_eq!(row.modifiers.len(), 2);

        let mut b = CommonBuilder::new();
        b.accept(&Attribute::new("style", "weight(1);padding(2)"));
        let none = b.finish(Scope::None, &Dispatch::noop());
        assert_eq!(none.modifiers.len(), 1);
        assert!(matches!(
            none.modifiers.as_slice()[0],
            Modifier::Padding(i) if i.top == Dp(2.0)
        ));
    }
}
