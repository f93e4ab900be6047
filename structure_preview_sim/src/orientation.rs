// Orientation policy: facing → rotation, and quarter-turn geometry.
//
// A structure placed facing some cardinal direction is previewed under one
// of four discrete rotations around the Y axis. `Rotation::from_facing()` is
// the fixed lookup table:
//
//   North → Clockwise180
//   South → None
//   West  → Clockwise90
//   East  → CounterClockwise90
//   Up / Down → None
//
// The remaining methods describe how a template's geometry looks under a
// rotation. They operate on min-corner-normalized positions: a rotated
// template still spans `[0, w) × [0, h) × [0, l)` of its rotated size, so a
// rotated position is always valid in the rotated grid. Rotation is
// clockwise when viewed from above (+Y looking down):
//
//   Clockwise90:         (x, y, z) → (length - 1 - z, y, x)
//   Clockwise180:        (x, y, z) → (width - 1 - x, y, length - 1 - z)
//   CounterClockwise90:  (x, y, z) → (z, y, width - 1 - x)
//
// where `width`/`length` are the *unrotated* extents. Horizontal facings
// turn the same way (North → East → South → West under Clockwise90), and a
// block's `facing` property is rewritten accordingly.
//
// See also: `template.rs` where `Template` uses these to derive rotated
// geometry, `proxy.rs` whose `rotate()` resolves the facing and rebuilds the
// grid, `types.rs` for the `Facing` and `Rotation` enums themselves.

use crate::types::{BlockState, Facing, GridSize, Rotation, VoxelCoord};

/// Block state property carrying a directional block's facing.
const FACING_PROPERTY: &str = "facing";

impl Rotation {
    /// Resolve the rotation a structure facing `facing` is derived under.
    pub fn from_facing(facing: Facing) -> Self {
        match facing {
            Facing::North => Self::Clockwise180,
            Facing::South => Self::None,
            Facing::West => Self::Clockwise90,
            Facing::East => Self::CounterClockwise90,
            Facing::Up | Facing::Down => Self::None,
        }
    }

    /// Number of clockwise quarter turns, 0..4.
    pub fn quarter_turns(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 1,
            Self::Clockwise180 => 2,
            Self::CounterClockwise90 => 3,
        }
    }

    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Self::None,
            1 => Self::Clockwise90,
            2 => Self::Clockwise180,
            _ => Self::CounterClockwise90,
        }
    }

    /// The rotation equivalent to applying `self` and then `other`.
    pub fn compose(self, other: Self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    /// The rotation that undoes `self`.
    pub fn inverse(self) -> Self {
        Self::from_quarter_turns(4 - self.quarter_turns())
    }

    /// Size of a template of unrotated `size` under this rotation.
    pub fn apply_to_size(self, size: GridSize) -> GridSize {
        match self {
            Self::None | Self::Clockwise180 => size,
            Self::Clockwise90 | Self::CounterClockwise90 => size.swapped_xz(),
        }
    }

    /// Where a position of an unrotated template of `size` lands.
    ///
    /// Positions outside `size` are mapped with the same formula, widened to
    /// `i64` and clamped back into `i32`; callers that care validate against
    /// the rotated size afterwards.
    pub fn apply_to_coord(self, coord: VoxelCoord, size: GridSize) -> VoxelCoord {
        let max_x = i64::from(size.width) - 1;
        let max_z = i64::from(size.length) - 1;
        let (x, y, z) = (i64::from(coord.x), coord.y, i64::from(coord.z));
        match self {
            Self::None => coord,
            Self::Clockwise90 => VoxelCoord::new(clamp_i32(max_z - z), y, clamp_i32(x)),
            Self::Clockwise180 => VoxelCoord::new(clamp_i32(max_x - x), y, clamp_i32(max_z - z)),
            Self::CounterClockwise90 => VoxelCoord::new(clamp_i32(z), y, clamp_i32(max_x - x)),
        }
    }

    /// Turn a facing. Vertical facings are unaffected.
    pub fn apply_to_facing(self, facing: Facing) -> Facing {
        if !facing.is_horizontal() {
            return facing;
        }
        let mut f = facing;
        for _ in 0..self.quarter_turns() {
            f = match f {
                Facing::North => Facing::East,
                Facing::East => Facing::South,
                Facing::South => Facing::West,
                Facing::West => Facing::North,
                vertical => vertical,
            };
        }
        f
    }

    /// Rewrite a block's horizontal `facing` property, if it has one.
    /// Blocks without a recognizable horizontal facing are returned as-is.
    pub fn apply_to_block(self, state: BlockState) -> BlockState {
        if self == Self::None {
            return state;
        }
        let Some(facing) = state.property(FACING_PROPERTY).and_then(Facing::from_name) else {
            return state;
        };
        if !facing.is_horizontal() {
            return state;
        }
        let turned = self.apply_to_facing(facing);
        state.with_property(FACING_PROPERTY, turned.as_str())
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
