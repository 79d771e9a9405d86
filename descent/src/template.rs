//! Piece templates and the sources they are loaded from.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use descent_base::math::{AxisBox, GridCoordinate};

/// Name of a piece template, as used in [`GenerationConfig`](crate::GenerationConfig) pools
/// and by [`TemplateSource`]s.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct TemplateId(Arc<str>);

impl TemplateId {
    /// Constructs a [`TemplateId`] from any string.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A prefabricated block structure that rooms and corridors are instantiated from.
///
/// Templates are authored in their own coordinate space. The `dungeon` region is the
/// footprint the piece claims when placed; each region in `openings` must be one cube
/// thick and lie flush against a face of that footprint.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Template {
    /// Name of this template.
    pub id: TemplateId,
    /// Total footprint of the piece. Templates without one cannot be used.
    #[serde(default)]
    pub dungeon: Option<AxisBox>,
    /// Regions marking where other pieces may attach.
    #[serde(default)]
    pub openings: Vec<AxisBox>,
    /// Block content, copied into the output when the piece is placed.
    #[serde(default)]
    pub blocks: Vec<TemplateBlock>,
}

impl Template {
    /// Constructs a template with no block content.
    pub fn new(id: impl Into<TemplateId>, dungeon: AxisBox, openings: Vec<AxisBox>) -> Self {
        Self {
            id: id.into(),
            dungeon: Some(dungeon),
            openings,
            blocks: Vec::new(),
        }
    }
}

/// One block of a [`Template`]'s content.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TemplateBlock {
    /// Position of the block's cube in template space.
    pub position: [GridCoordinate; 3],
    /// Name of the block.
    pub block: Arc<str>,
}

/// Provides [`Template`]s by name.
///
/// Generation loads every template it needs before any placement happens, and loads
/// each name at most once per run.
pub trait TemplateSource {
    /// Returns the template with the given name.
    fn load(&mut self, id: &TemplateId) -> Result<Template, LoadError>;
}

impl<S: TemplateSource + ?Sized> TemplateSource for &mut S {
    fn load(&mut self, id: &TemplateId) -> Result<Template, LoadError> {
        (**self).load(id)
    }
}

/// Ways that a [`TemplateSource`] can fail.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The source has no template by that name.
    #[error("template {0} does not exist")]
    NotFound(TemplateId),
    /// The template exists but could not be read or decoded.
    #[error("template {id} could not be read")]
    Unreadable {
        /// Name of the template.
        id: TemplateId,
        /// What went wrong.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A [`TemplateSource`] holding its templates in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    templates: BTreeMap<TemplateId, Template>,
}

impl MemorySource {
    /// Constructs an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template, replacing any previous template with the same id.
    pub fn insert(&mut self, template: Template) {
        self.templates.insert(template.id.clone(), template);
    }
}

impl FromIterator<Template> for MemorySource {
    fn from_iter<T: IntoIterator<Item = Template>>(iter: T) -> Self {
        let mut source = Self::new();
        for template in iter {
            source.insert(template);
        }
        source
    }
}

impl TemplateSource for MemorySource {
    fn load(&mut self, id: &TemplateId) -> Result<Template, LoadError> {
        self.templates
            .get(id)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(id.clone()))
    }
}
