// StructureProxy: the addressable view of one template being previewed.
//
// A `StructureProxy` owns a `TemplateSource` and everything derived from or
// layered on it:
// - the current `Rotation`,
// - the `VoxelGrid` materialized from the source under that rotation,
// - the `Overlay` of tile entities and actors,
// - the `AnchorOffset` that classifies the structure as Hut or Decoration.
//
// ## Lifecycle
//
// 1. `new()` (or `load()` by name through a `TemplateLoader`) resolves the
//    configured initial facing, asks the source for size and block records
//    under that rotation, and builds the grid. Oversized or inconsistent
//    geometry fails construction.
// 2. Queries and overlay mutations run against the grid and overlay. The
//    grid's current bounds gate `set_tile_entity()`.
// 3. `rotate(facing)` resolves the facing to a rotation, re-requests the
//    geometry from the source and replaces the grid wholesale. The overlay
//    and the anchor offset are left exactly as they were: overlays do not
//    follow rotation, even if a stored tile entity now lies outside the new
//    bounds. If the rebuild fails, the previous grid and rotation stay.
//
// The proxy is single-owner and not internally synchronized. A host sharing
// it between threads wraps it in its own lock.
//
// See also: `world.rs` (grid), `overlay.rs` (tile entities and actors),
// `orientation.rs` (facing table), `anchor.rs` (classification),
// `template.rs` (source and loader traits), `config.rs` (tunables).

use crate::anchor::{AnchorOffset, StructureKind};
use crate::config::PreviewConfig;
use crate::error::{PreviewError, PreviewResult};
use crate::overlay::{Actor, Overlay, TileEntity};
use crate::template::{TemplateLoader, TemplateSource, WorldContext};
use crate::types::{BlockState, Facing, GridSize, Rotation, VoxelCoord};
use crate::world::VoxelGrid;

pub struct StructureProxy<S: TemplateSource> {
    source: S,
    config: PreviewConfig,
    rotation: Rotation,
    grid: VoxelGrid,
    overlay: Overlay,
    anchor: AnchorOffset,
}

impl<S: TemplateSource> StructureProxy<S> {
    /// Build a proxy over `source`, applying `config.initial_facing`.
    pub fn new(source: S, config: PreviewConfig) -> PreviewResult<Self> {
        let rotation = config
            .initial_facing
            .map_or(Rotation::None, Rotation::from_facing);
        let grid = build_grid(&source, rotation, &config)?;
        Ok(Self {
            source,
            config,
            rotation,
            grid,
            overlay: Overlay::new(),
            anchor: AnchorOffset::default(),
        })
    }

    /// Resolve `name` through `loader` and build a proxy over the result.
    pub fn load<L>(
        loader: &L,
        name: &str,
        world: &WorldContext,
        config: PreviewConfig,
    ) -> PreviewResult<Self>
    where
        L: TemplateLoader<Source = S>,
    {
        let source = loader.load_template(name, world)?;
        Self::new(source, config)
    }

    // -- Grid ---------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.grid.size().width
    }

    pub fn height(&self) -> u32 {
        self.grid.size().height
    }

    pub fn length(&self) -> u32 {
        self.grid.size().length
    }

    /// `(width, height, length)` of the current grid.
    pub fn dimensions(&self) -> (u32, u32, u32) {
        self.grid.dimensions()
    }

    pub fn size(&self) -> GridSize {
        self.grid.size()
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Descriptor at `position`. Fails with `OutOfRange` outside the grid.
    pub fn block_state(&self, position: VoxelCoord) -> PreviewResult<&BlockState> {
        self.grid.block_at(position)
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Re-derive the grid for a structure facing `facing`, returning the
    /// rotation now in effect. Overlay and anchor offset are not touched.
    pub fn rotate(&mut self, facing: Facing) -> PreviewResult<Rotation> {
        let rotation = Rotation::from_facing(facing);
        self.grid = build_grid(&self.source, rotation, &self.config)?;
        log::debug!(
            "rotated structure to face {:?} ({:?}), now {}",
            facing,
            rotation,
            self.grid.size()
        );
        self.rotation = rotation;
        Ok(rotation)
    }

    // -- Tile entities ------------------------------------------------------

    pub fn tile_entity(&self, position: VoxelCoord) -> Option<&TileEntity> {
        self.overlay.tile_entity(position)
    }

    pub fn tile_entities(&self) -> Vec<&TileEntity> {
        self.overlay.tile_entities()
    }

    /// Replace or clear the tile entity at `position`. Silently ignored
    /// outside the current grid bounds.
    pub fn set_tile_entity(&mut self, position: VoxelCoord, tile_entity: Option<TileEntity>) {
        self.overlay.set_tile_entity(self.grid.size(), position, tile_entity);
    }

    pub fn remove_tile_entity(&mut self, position: VoxelCoord) -> Option<TileEntity> {
        self.overlay.remove_tile_entity(position)
    }

    // -- Actors -------------------------------------------------------------

    pub fn actors(&self) -> Vec<&Actor> {
        self.overlay.actors()
    }

    /// Track an actor; see `Overlay::add_actor` for what is ignored.
    pub fn add_actor(&mut self, actor: Actor) {
        self.overlay.add_actor(actor);
    }

    pub fn remove_actor(&mut self, actor: &Actor) {
        self.overlay.remove_actor(actor);
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    // -- Anchor -------------------------------------------------------------

    pub fn offset(&self) -> VoxelCoord {
        self.anchor.get()
    }

    pub fn set_offset(&mut self, offset: VoxelCoord) {
        self.anchor.set(offset);
    }

    pub fn structure_kind(&self) -> StructureKind {
        self.anchor.classify()
    }
}

/// Query `source` under `rotation` and materialize the grid, enforcing the
/// configured volume cap first.
fn build_grid<S: TemplateSource>(
    source: &S,
    rotation: Rotation,
    config: &PreviewConfig,
) -> PreviewResult<VoxelGrid> {
    let size = source.size_under(rotation);
    if size.volume() > config.max_template_volume {
        return Err(PreviewError::TemplateTooLarge {
            size,
            max_volume: config.max_template_volume,
        });
    }
    VoxelGrid::build(
        size,
        source.block_records_under(rotation),
        &config.background_block,
    )
}
