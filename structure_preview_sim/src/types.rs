// Core types shared across the structure preview crate.
//
// Defines spatial coordinates (`VoxelCoord`), declared template sizes
// (`GridSize`), the block descriptor (`BlockState`), the cardinal `Facing`
// and discrete `Rotation` enums, and the 128-bit actor identity
// (`ActorUuid`). All types derive `Serialize` and `Deserialize` so templates,
// grids and overlays can be snapshotted for save/load or sent to a preview
// client.
//
// See also: `orientation.rs` for the behavior attached to `Rotation`,
// `world.rs` for the grid these coordinates address, `overlay.rs` for the
// tile entity and actor records keyed by `VoxelCoord` and `ActorUuid`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in a structure's local voxel grid. Each component is in voxel
/// units, relative to the template's minimum corner.
///
/// The coordinate system matches the placement world:
/// - X: east  (positive) / west  (negative)
/// - Y: up    (positive) / down  (negative)
/// - Z: south (positive) / north (negative)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn is_origin(self) -> bool {
        self == Self::ORIGIN
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Declared extent of a template: `width` along X, `height` along Y,
/// `length` along Z. Valid positions are `[0, width) × [0, height) × [0, length)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
    pub length: u32,
}

impl GridSize {
    pub const fn new(width: u32, height: u32, length: u32) -> Self {
        Self {
            width,
            height,
            length,
        }
    }

    /// Total cell count. Computed in `u64` so oversized declarations can be
    /// rejected before allocation instead of overflowing.
    pub fn volume(self) -> u64 {
        u64::from(self.width) * u64::from(self.height) * u64::from(self.length)
    }

    /// Check whether a coordinate lies inside the declared extent.
    pub fn contains(self, coord: VoxelCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
            && (coord.z as u32) < self.length
    }

    /// The footprint after a quarter turn around the Y axis.
    pub fn swapped_xz(self) -> Self {
        Self::new(self.length, self.height, self.width)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.length)
    }
}

// ---------------------------------------------------------------------------
// Block descriptors
// ---------------------------------------------------------------------------

/// Namespaced id of the background block used for cells no record covers.
pub const AIR_BLOCK: &str = "minecraft:air";

/// Type and state of the block occupying one voxel.
///
/// Treated as an immutable value: the grid stores, compares and hands out
/// references to these, but never edits one in place. Properties are kept
/// in a `BTreeMap` so equality, hashing and serialized output don't depend
/// on insertion order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl BlockState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property setter, returning a new descriptor.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn air() -> Self {
        Self::new(AIR_BLOCK)
    }

    pub fn is_air(&self) -> bool {
        self.name == AIR_BLOCK
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

impl Default for BlockState {
    fn default() -> Self {
        Self::air()
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.properties.is_empty() {
            f.write_str("[")?;
            for (i, (key, value)) in self.properties.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{key}={value}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Orientation enums
// ---------------------------------------------------------------------------

/// Direction a structure (or a directional block) faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    North,
    South,
    West,
    East,
    Up,
    Down,
}

impl Facing {
    /// Lowercase name as used in block state properties.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::West => "west",
            Self::East => "east",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "north" => Some(Self::North),
            "south" => Some(Self::South),
            "west" => Some(Self::West),
            "east" => Some(Self::East),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }

    pub fn is_horizontal(self) -> bool {
        !matches!(self, Self::Up | Self::Down)
    }
}

/// One of the four discrete turns around the vertical axis a template can be
/// re-derived under. Behavior lives in `orientation.rs`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    CounterClockwise90,
}

// ---------------------------------------------------------------------------
// Actor identity
// ---------------------------------------------------------------------------

/// A 128-bit actor identity, rendered in the 8-4-4-4-12 hex UUID layout.
///
/// The preview never mints identities itself; they come from the world the
/// actors were captured from, so this is a plain value wrapper.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorUuid([u8; 16]);

impl ActorUuid {
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

/// Error returned when a string is not a 32-digit (optionally dashed) hex UUID.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid UUID format: {0:?}")]
pub struct ParseUuidError(pub String);

impl FromStr for ActorUuid {
    type Err = ParseUuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex: String = s.chars().filter(|c| *c != '-').collect();
        if hex.len() != 32 || !hex.is_ascii() {
            return Err(ParseUuidError(s.to_owned()));
        }
        let mut bytes = [0u8; 16];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| ParseUuidError(s.to_owned()))?;
        }
        Ok(Self(bytes))
    }
}

// Serialize as the hex string so ActorUuid can be used as a JSON map key
// (serde_json requires string keys).
impl Serialize for ActorUuid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ActorUuid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for ActorUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorUuid({})", self)
    }
}

impl fmt::Display for ActorUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            b[0], b[1], b[2], b[3],
            b[4], b[5],
            b[6], b[7],
            b[8], b[9],
            b[10], b[11], b[12], b[13], b[14], b[15],
        )
    }
}
