// Dense 3D voxel grid holding a materialized structure template.
//
// The grid is stored as a palette plus a flat `Vec<u32>` of palette indices,
// indexed by `x + width * (y + height * z)`. Every `BlockState` appears in
// the palette once, so a template made of a handful of block types costs
// four bytes per cell regardless of how large its descriptors are. Palette
// index 0 is always the background descriptor, which fills every cell no
// block record covers.
//
// A `VoxelGrid` is built once from an ordered list of `BlockInfo` records
// (`build()`) and is immutable afterwards. Later records for the same
// position overwrite earlier ones, mirroring how a template's block stream
// is replayed onto the grid. A record outside the declared size fails the
// whole build with `InvalidGeometry`; reads outside the bounds fail with
// `OutOfRange`. There is no clamping and no implicit background read for
// out-of-bounds positions.
//
// Rotation never transforms a grid in place. `proxy.rs` discards the grid
// and builds a fresh one from the template source's rotated geometry.
//
// See also: `template.rs` for `BlockInfo` and the `TemplateSource` that feeds
// `build()`, `proxy.rs` which owns the grid, `types.rs` for `GridSize` and
// `BlockState`.

use crate::error::{PreviewError, PreviewResult};
use crate::template::BlockInfo;
use crate::types::{BlockState, GridSize, VoxelCoord};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Palette index of the background descriptor.
const BACKGROUND: u32 = 0;

/// Immutable 3D grid of block descriptors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct VoxelGrid {
    /// Distinct descriptors; index 0 is the background.
    palette: Vec<BlockState>,
    /// Flat storage: index = x + width * (y + height * z).
    cells: Vec<u32>,
    size: GridSize,
}

impl VoxelGrid {
    /// Materialize a grid of exactly `size` from positioned block records.
    ///
    /// Cells without a record hold `background`. Duplicate positions resolve
    /// last-write-wins. Fails with `InvalidGeometry` on the first record
    /// outside `size`.
    pub fn build<I>(size: GridSize, records: I, background: &BlockState) -> PreviewResult<Self>
    where
        I: IntoIterator<Item = BlockInfo>,
    {
        let total = usize::try_from(size.volume()).map_err(|_| PreviewError::TemplateTooLarge {
            size,
            max_volume: usize::MAX as u64,
        })?;

        let mut grid = Self {
            palette: vec![background.clone()],
            cells: vec![BACKGROUND; total],
            size,
        };
        let mut lookup: FxHashMap<BlockState, u32> = FxHashMap::default();
        lookup.insert(background.clone(), BACKGROUND);

        let mut record_count = 0usize;
        for info in records {
            let Some(i) = grid.index(info.position) else {
                return Err(PreviewError::InvalidGeometry {
                    position: info.position,
                    size,
                });
            };
            let palette_index = match lookup.get(&info.state).copied() {
                Some(p) => p,
                None => {
                    let p = grid.palette.len() as u32;
                    grid.palette.push(info.state.clone());
                    lookup.insert(info.state, p);
                    p
                }
            };
            grid.cells[i] = palette_index;
            record_count += 1;
        }

        log::debug!(
            "built {} voxel grid from {} records ({} palette entries)",
            size,
            record_count,
            grid.palette.len()
        );
        Ok(grid)
    }

    /// Check whether a coordinate is within bounds.
    pub fn in_bounds(&self, coord: VoxelCoord) -> bool {
        self.size.contains(coord)
    }

    /// Convert a coordinate to a flat index. Returns `None` if out of bounds.
    fn index(&self, coord: VoxelCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            let x = coord.x as usize;
            let y = coord.y as usize;
            let z = coord.z as usize;
            let w = self.size.width as usize;
            let h = self.size.height as usize;
            Some(x + w * (y + h * z))
        } else {
            None
        }
    }

    /// Read the descriptor at a position. Fails with `OutOfRange` outside
    /// the grid.
    pub fn block_at(&self, coord: VoxelCoord) -> PreviewResult<&BlockState> {
        let i = self.index(coord).ok_or(PreviewError::OutOfRange {
            position: coord,
            size: self.size,
        })?;
        Ok(&self.palette[self.cells[i] as usize])
    }

    /// `(width, height, length)`.
    pub fn dimensions(&self) -> (u32, u32, u32) {
        (self.size.width, self.size.height, self.size.length)
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn background(&self) -> &BlockState {
        &self.palette[BACKGROUND as usize]
    }

    /// Distinct descriptors in first-seen order, background first.
    pub fn palette(&self) -> &[BlockState] {
        &self.palette
    }

    /// Number of cells holding something other than the background.
    pub fn count_non_background(&self) -> usize {
        self.cells.iter().filter(|&&c| c != BACKGROUND).count()
    }
}

/// Unvalidated serde shape of a `VoxelGrid`.
#[derive(Deserialize)]
struct RawGrid {
    palette: Vec<BlockState>,
    cells: Vec<u32>,
    size: GridSize,
}

impl TryFrom<RawGrid> for VoxelGrid {
    type Error = String;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        if raw.palette.is_empty() {
            return Err("voxel grid palette must contain a background entry".into());
        }
        if raw.cells.len() as u64 != raw.size.volume() {
            return Err(format!(
                "voxel grid of size {} needs {} cells, found {}",
                raw.size,
                raw.size.volume(),
                raw.cells.len()
            ));
        }
        if let Some(bad) = raw.cells.iter().find(|&&c| c as usize >= raw.palette.len()) {
            return Err(format!(
                "cell references palette index {bad}, palette has {} entries",
                raw.palette.len()
            ));
        }
        Ok(Self {
            palette: raw.palette,
            cells: raw.cells,
            size: raw.size,
        })
    }
}
