// Anchor offset and structure classification.
//
// A template placed as a colony building carries an anchor: the position of
// its hut block relative to the template's min corner. Pure decorations have
// no anchor, which is recorded as the origin. `classify()` reads nothing but
// the offset: any non-origin offset is a `Hut`, the origin is a `Decoration`.
//
// The offset is stored verbatim. It is not checked against the grid size and
// does not follow `rotate()`; callers set it once per placement.
//
// See also: `proxy.rs` which exposes `offset()` / `set_offset()` /
// `structure_kind()`.

use crate::types::VoxelCoord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a structure plays once placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    /// A functional building with a hut block at its anchor.
    Hut,
    /// Purely cosmetic.
    Decoration,
}

impl StructureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hut => "Hut",
            Self::Decoration => "Decoration",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorOffset(pub VoxelCoord);

impl AnchorOffset {
    pub fn get(self) -> VoxelCoord {
        self.0
    }

    pub fn set(&mut self, offset: VoxelCoord) {
        self.0 = offset;
    }

    pub fn classify(self) -> StructureKind {
        if self.0.is_origin() {
            StructureKind::Decoration
        } else {
            StructureKind::Hut
        }
    }
}
