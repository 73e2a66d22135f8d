//! Tag registry and factory dispatch.
//!
//! [`RegistryBuilder`] collects tag → factory mappings at startup and freezes
//! them into an immutable [`Registry`]. Lookups are exact and case-sensitive.
//! Tags registered as sub-tags of a parent resolve only under that parent.
//! Anything unmatched resolves to the fallback factory.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::markup::{Attribute, ROOT_TAG};
use crate::view::build::{self, BuildContext};
use crate::view::ViewDescriptor;

/// Builds a descriptor from a node's attributes.
pub type Factory = Arc<dyn Fn(&[Attribute], &BuildContext<'_>) -> ViewDescriptor + Send + Sync>;

/// Wrap a build function as a [`Factory`].
pub fn factory(
    f: impl Fn(&[Attribute], &BuildContext<'_>) -> ViewDescriptor + Send + Sync + 'static,
) -> Factory {
    Arc::new(f)
}

// ---------------------------------------------------------------------------
// RegistryBuilder
// ---------------------------------------------------------------------------

/// Mutable registration phase.
pub struct RegistryBuilder {
    factories: HashMap<String, Factory>,
    sub_tags: HashMap<String, HashMap<String, Factory>>,
    fallback: Factory,
}

impl RegistryBuilder {
    /// An empty builder whose fallback is the default leaf.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            sub_tags: HashMap::new(),
            fallback: factory(build::build_fallback),
        }
    }

    /// Register `tag`. A later registration of the same tag replaces it.
    pub fn register(mut self, tag: impl Into<String>, factory: Factory) -> Self {
        self.factories.insert(tag.into(), factory);
        self
    }

    /// Register tags that only resolve directly under `parent`.
    pub fn register_sub_tags(
        mut self,
        parent: impl Into<String>,
        tags: impl IntoIterator<Item = (String, Factory)>,
    ) -> Self {
        self.sub_tags.entry(parent.into()).or_default().extend(tags);
        self
    }

    /// Replace the factory used for unmatched tags.
    pub fn with_fallback(mut self, factory: Factory) -> Self {
        self.fallback = factory;
        self
    }

    /// The built-in palette on top of whatever is already registered.
    pub fn with_defaults(self) -> Self {
        self.register(ROOT_TAG, factory(build::build_column))
            .register("Box", factory(build::build_box))
            .register("Row", factory(build::build_row))
            .register("Column", factory(build::build_column))
            .register("LazyColumn", factory(build::build_lazy_column))
            .register("LazyRow", factory(build::build_lazy_row))
            .register("Card", factory(build::build_card))
            .register("Text", factory(build::build_text))
            .register("Button", factory(build::build_button))
            .register("IconButton", factory(build::build_icon_button))
            .register("Icon", factory(build::build_icon))
            .register("TabRow", factory(build::build_tab_row))
            .register("Divider", factory(build::build_divider))
            .register("Spacer", factory(build::build_spacer))
            .register("Checkbox", factory(build::build_checkbox))
            .register_sub_tags(
                "TabRow",
                [("Tab".to_string(), factory(build::build_tab))],
            )
    }

    /// Freeze into a shareable registry.
    pub fn build(self) -> Arc<Registry> {
        Arc::new(Registry {
            factories: self.factories,
            sub_tags: self.sub_tags,
            fallback: self.fallback,
        })
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Immutable tag → factory map.
pub struct Registry {
    factories: HashMap<String, Factory>,
    sub_tags: HashMap<String, HashMap<String, Factory>>,
    fallback: Factory,
}

impl Registry {
    /// A registry holding just the built-in palette.
    pub fn defaults() -> Arc<Registry> {
        RegistryBuilder::new().with_defaults().build()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Exact match, else the fallback.
    pub fn resolve(&self, tag: &str) -> &Factory {
        match self.factories.get(tag) {
            Some(f) => f,
            None => {
                debug!(tag, "no factory registered, using fallback");
                &self.fallback
            }
        }
    }

    /// Resolve `tag` as a child of `parent`: the parent's sub-tags first,
    /// then the top-level map, then the fallback.
    pub fn resolve_in(&self, parent: Option<&str>, tag: &str) -> &Factory {
        parent
            .and_then(|p| self.sub_tags.get(p))
            .and_then(|subs| subs.get(tag))
            .unwrap_or_else(|| self.resolve(tag))
    }

    /// Resolve and invoke in one step.
    pub fn build(
        &self,
        parent: Option<&str>,
        attrs: &[Attribute],
        ctx: &BuildContext<'_>,
    ) -> ViewDescriptor {
        (self.resolve_in(parent, ctx.tag))(attrs, ctx)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.factories.keys().collect();
        tags.sort();
        f.debug_struct("Registry")
            .field("tags", &tags)
            .field("sub_tags", &self.sub_tags.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Dispatch;
    use crate::modifier::Scope;
    use crate::view::{ViewKind, CommonProps};

    fn build_in(registry: &Registry, parent: Option<&str>, tag: &str) -> ViewDescriptor {
        let dispatch = Dispatch::noop();
        registry.build(parent, &[], &BuildContext::new(tag, &dispatch, Scope::None))
    }

    #[test]
    fn exact_case_sensitive_match() {
        let r = Registry::defaults();
        assert!(matches!(build_in(&r, None, "Row").kind, ViewKind::Row(_)));
        assert_eq!(build_in(&r, None, "row").kind, ViewKind::Fallback);
    }

    #[test]
    fn unknown_tag_falls_back() {
        let r = Registry::defaults();
        let d = build_in(&r, None, "Frobnicate");
        assert_eq!(d.kind, ViewKind::Fallback);
        assert_eq!(d.tag, "Frobnicate");
    }

    #[test]
    fn sub_tags_resolve_only_under_parent() {
        let r = Registry::defaults();
        assert!(matches!(build_in(&r, Some("TabRow"), "Tab").kind, ViewKind::Tab(_)));
        assert_eq!(build_in(&r, Some("Column"), "Tab").kind, ViewKind::Fallback);
        assert_eq!(build_in(&r, None, "Tab").kind, ViewKind::Fallback);
    }

    #[test]
    fn root_lays_out_as_column() {
        let r = Registry::defaults();
        assert!(matches!(build_in(&r, None, ROOT_TAG).kind, ViewKind::Column(_)));
    }

    #[test]
    fn custom_registration_and_fallback() {
        let r = RegistryBuilder::new()
            .register(
                "Gauge",
                factory(|_, ctx| {
                    ViewDescriptor::new(ctx.tag, ViewKind::Spacer, CommonProps::default())
                }),
            )
            .with_fallback(factory(build::build_divider))
            .build();
        assert_eq!(build_in(&r, None, "Gauge").kind, ViewKind::Spacer);
        assert!(matches!(build_in(&r, None, "Row").kind, ViewKind::Divider(_)));
        assert!(r.contains("Gauge"));
        assert!(!r.contains("Row"));
    }
}
