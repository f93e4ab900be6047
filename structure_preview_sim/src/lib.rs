// structure_preview_sim — addressable voxel model of a structure template.
//
// This crate loads a prefabricated structure template into a queryable 3D
// grid so a host simulation can preview it, rotate it to face the player's
// chosen direction, and later place it in the world. It has no rendering,
// file-format or networking dependencies; templates arrive through the
// `TemplateSource` trait already decoded.
//
// Module overview:
// - `proxy.rs`:       StructureProxy — the object hosts hold; ties the pieces below together.
// - `world.rs`:       VoxelGrid — immutable palette-compressed grid built from block records.
// - `overlay.rs`:     Tile entities (by position) and actors (by identity) layered on the grid.
// - `orientation.rs`: Facing → Rotation table and quarter-turn geometry.
// - `anchor.rs`:      Anchor offset and Hut / Decoration classification.
// - `template.rs`:    TemplateSource / TemplateLoader traits, in-memory Template and registry.
// - `config.rs`:      PreviewConfig — background block, volume cap, initial facing.
// - `error.rs`:       PreviewError taxonomy.
// - `types.rs`:       VoxelCoord, GridSize, BlockState, Facing, Rotation, ActorUuid.
//
// Logging goes through the `log` facade; hosts pick the backend.
//
// **Threading.** Everything here is synchronous and single-owner. Nothing is
// internally locked; a host sharing a proxy across threads serializes access
// itself.

pub mod anchor;
pub mod config;
pub mod error;
pub mod orientation;
pub mod overlay;
pub mod proxy;
pub mod template;
pub mod types;
pub mod world;

pub use error::{PreviewError, PreviewResult};
pub use proxy::StructureProxy;
