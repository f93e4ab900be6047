// Error taxonomy for the structure preview crate.
//
// Only hard failures live here: building a grid from geometry that doesn't
// fit its declared size, reading the grid outside its bounds, asking a loader
// for a template it doesn't have, and malformed configuration. Overlay
// bookkeeping (tile entities, actors) never produces these; malformed or
// irrelevant overlay inputs are dropped silently (see `overlay.rs`).

use crate::types::{GridSize, VoxelCoord};

pub type PreviewResult<T> = Result<T, PreviewError>;

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// A block record's position lies outside the template's declared size.
    /// The grid is not constructed.
    #[error("block record at {position} lies outside the declared template size {size}")]
    InvalidGeometry { position: VoxelCoord, size: GridSize },

    /// A direct grid read outside `[0, width) × [0, height) × [0, length)`.
    #[error("position {position} is outside the grid bounds {size}")]
    OutOfRange { position: VoxelCoord, size: GridSize },

    #[error("no template named {name:?}")]
    TemplateNotFound { name: String },

    /// Declared volume exceeds `PreviewConfig::max_template_volume`.
    #[error("template size {size} exceeds the maximum of {max_volume} voxels")]
    TemplateTooLarge { size: GridSize, max_volume: u64 },

    #[error("invalid preview configuration: {0}")]
    Config(#[from] serde_json::Error),
}
