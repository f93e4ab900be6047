// Template source boundary.
//
// The preview never decodes template files itself. It consumes a
// `TemplateSource`: something that can report a template's size and its
// ordered block records under any of the four rotations. Re-deriving
// rotated geometry is the source's job; `proxy.rs` simply asks again and
// rebuilds its grid.
//
// Loading by name goes through `TemplateLoader`, which takes the requesting
// world's `WorldContext` so a host can resolve per-world template packs.
//
// This file also provides the in-memory implementations used by hosts that
// already hold decoded templates (and by the tests):
// - `Template`: unrotated size + ordered `BlockInfo` records. Rotated
//   geometry comes from `Rotation::apply_to_size/coord/block` (see
//   `orientation.rs`). Record order is preserved under rotation, so
//   last-write-wins on duplicate positions holds for every rotation.
// - `TemplateRegistry`: name → `Template`, implementing `TemplateLoader`.
//
// See also: `world.rs` for the grid built from `BlockInfo` records,
// `proxy.rs` for the consumer, `orientation.rs` for the rotation math.

use crate::error::{PreviewError, PreviewResult};
use crate::types::{BlockState, GridSize, Rotation, VoxelCoord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One positioned block record of a template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub position: VoxelCoord,
    pub state: BlockState,
}

impl BlockInfo {
    pub fn new(position: VoxelCoord, state: BlockState) -> Self {
        Self { position, state }
    }
}

/// Supplies a template's geometry under a given rotation.
///
/// Implementations must be synchronous and total: every rotation has a size
/// and a (possibly empty) record list.
pub trait TemplateSource {
    fn size_under(&self, rotation: Rotation) -> GridSize;

    /// Block records in application order. Later records for the same
    /// position take precedence.
    fn block_records_under(&self, rotation: Rotation) -> Vec<BlockInfo>;
}

impl<T: TemplateSource + ?Sized> TemplateSource for &T {
    fn size_under(&self, rotation: Rotation) -> GridSize {
        (**self).size_under(rotation)
    }

    fn block_records_under(&self, rotation: Rotation) -> Vec<BlockInfo> {
        (**self).block_records_under(rotation)
    }
}

impl<T: TemplateSource + ?Sized> TemplateSource for Box<T> {
    fn size_under(&self, rotation: Rotation) -> GridSize {
        (**self).size_under(rotation)
    }

    fn block_records_under(&self, rotation: Rotation) -> Vec<BlockInfo> {
        (**self).block_records_under(rotation)
    }
}

/// The world a template is being loaded for. Opaque to the preview core;
/// loaders may use it to pick a template pack.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldContext {
    pub world_name: String,
}

impl WorldContext {
    pub fn new(world_name: impl Into<String>) -> Self {
        Self {
            world_name: world_name.into(),
        }
    }
}

/// Resolves template names to sources.
pub trait TemplateLoader {
    type Source: TemplateSource;

    /// Fails with `TemplateNotFound` for an unknown name.
    fn load_template(&self, name: &str, world: &WorldContext) -> PreviewResult<Self::Source>;
}

// ---------------------------------------------------------------------------
// In-memory template
// ---------------------------------------------------------------------------

/// A decoded template held in memory, stored unrotated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub size: GridSize,
    #[serde(default)]
    pub blocks: Vec<BlockInfo>,
}

impl Template {
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            blocks: Vec::new(),
        }
    }

    /// Append a record. Not validated here; a record outside `size` fails
    /// the grid build that consumes it.
    pub fn push(&mut self, position: VoxelCoord, state: BlockState) {
        self.blocks.push(BlockInfo::new(position, state));
    }

    /// Builder-style `push`.
    pub fn with_block(mut self, position: VoxelCoord, state: BlockState) -> Self {
        self.push(position, state);
        self
    }
}

impl TemplateSource for Template {
    fn size_under(&self, rotation: Rotation) -> GridSize {
        rotation.apply_to_size(self.size)
    }

    fn block_records_under(&self, rotation: Rotation) -> Vec<BlockInfo> {
        self.blocks
            .iter()
            .map(|info| BlockInfo {
                position: rotation.apply_to_coord(info.position, self.size),
                state: rotation.apply_to_block(info.state.clone()),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Named in-memory templates. `BTreeMap` keeps `names()` in a stable order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, returning the one previously under `name`.
    pub fn insert(&mut self, name: impl Into<String>, template: Template) -> Option<Template> {
        self.templates.insert(name.into(), template)
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateLoader for TemplateRegistry {
    type Source = Template;

    fn load_template(&self, name: &str, world: &WorldContext) -> PreviewResult<Template> {
        log::debug!("loading template {name:?} for world {:?}", world.world_name);
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| PreviewError::TemplateNotFound {
                name: name.to_owned(),
            })
    }
}
