use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::composing::node::Attrs;
use crate::registry::RegistryError;

/// Rendering contract every block type implements.
///
/// Both callbacks take the node's attributes and the already-rendered
/// fragments of its children, and must be pure: no side effects, and the
/// same inputs always produce the same output. `save` output is persisted,
/// so any non-determinism there corrupts stored content and is treated as a
/// defect (see [`crate::render::save_checked`]).
pub trait Render: Send + Sync {
    /// Produce the editable view fragment for one node.
    fn edit(&self, attrs: &Attrs, children: &[String]) -> String;

    /// Produce the persisted markup fragment for one node.
    fn save(&self, attrs: &Attrs, children: &[String]) -> String;
}

/// Capability flags governing optional per-type behavior.
///
/// The engine stores these and honors `light_wrapper` during save assembly;
/// `reusable` and `html` are advisory metadata for external consumers (the
/// reuse library and content validation respectively).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Supports {
    /// Instances may be extracted into the shared reuse library.
    pub reusable: bool,
    /// Save output may contain raw markup.
    pub html: bool,
    /// Save output carries no container element of its own; the frame wraps
    /// the children's markup directly.
    pub light_wrapper: bool,
}

impl Default for Supports {
    fn default() -> Self {
        Self {
            reusable: true,
            html: true,
            light_wrapper: false,
        }
    }
}

static BLOCK_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*/[a-z][a-z0-9-]*$").expect("valid pattern"));

/// Immutable description of one block type.
///
/// Built once by a block definition, handed to [`crate::registry::Registry::register`],
/// and never mutated afterwards. Tree nodes refer to it by `name` only and
/// resolve it through the registry at validation/render time.
pub struct BlockType {
    name: String,
    title: String,
    description: String,
    icon: Option<String>,
    parent: BTreeSet<String>,
    supports: Supports,
    render: Arc<dyn Render>,
}

impl BlockType {
    pub fn new(name: impl Into<String>, render: impl Render + 'static) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            description: String::new(),
            icon: None,
            parent: BTreeSet::new(),
            supports: Supports::default(),
            render: Arc::new(render),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Restrict which block types may directly contain this one. An empty
    /// set (the default) means unrestricted.
    pub fn with_parent<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent = parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_supports(mut self, supports: Supports) -> Self {
        self.supports = supports;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn parent(&self) -> &BTreeSet<String> {
        &self.parent
    }

    pub fn supports(&self) -> Supports {
        self.supports
    }

    pub fn render(&self) -> &dyn Render {
        self.render.as_ref()
    }

    /// Whether this type admits the given direct container. `None` denotes
    /// the document root.
    pub fn allows_parent(&self, parent: Option<&str>) -> bool {
        if self.parent.is_empty() {
            return true;
        }
        parent.is_some_and(|p| self.parent.contains(p))
    }

    pub(crate) fn validate(&self) -> Result<(), RegistryError> {
        if self.name.is_empty() {
            return Err(RegistryError::InvalidDescriptor {
                name: self.name.clone(),
                reason: "identity must not be empty".into(),
            });
        }
        if !BLOCK_NAME.is_match(&self.name) {
            return Err(RegistryError::InvalidDescriptor {
                name: self.name.clone(),
                reason: "identity must take the lowercase namespace/block form".into(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockType")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("parent", &self.parent)
            .field("supports", &self.supports)
            .finish_non_exhaustive()
    }
}
