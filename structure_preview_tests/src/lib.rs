// Test-only fixtures for structure preview integration tests.
//
// Provides a small template pack (decoded from JSON, the way a host would
// hand templates over), a logging initializer, and `WorldCapture`: a
// stand-in for the host world's sync stream that replays captured tile
// entities and actors into a `StructureProxy` through its public mutation
// surface. Nothing here reimplements proxy logic; the captures go through
// the same `set_tile_entity` / `add_actor` calls a live host makes.
//
// See also: `tests/preview_pipeline.rs` for the scenarios.

use structure_preview_sim::overlay::{Actor, TileEntity};
use structure_preview_sim::proxy::StructureProxy;
use structure_preview_sim::template::{TemplateRegistry, TemplateSource};
use structure_preview_sim::types::VoxelCoord;

/// Template pack used across scenarios.
///
/// - `hut/builder1`: 5×3×4 hut with a door facing south and a chest.
/// - `decoration/well`: 3×2×3 well, cobblestone ring around water.
/// - `decoration/broken`: declares 2×2×2 but lists a block at x = 2.
pub const TEMPLATE_PACK_JSON: &str = r#"{
    "hut/builder1": {
        "size": { "width": 5, "height": 3, "length": 4 },
        "blocks": [
            { "position": { "x": 0, "y": 0, "z": 0 }, "state": { "name": "minecraft:cobblestone" } },
            { "position": { "x": 4, "y": 0, "z": 0 }, "state": { "name": "minecraft:cobblestone" } },
            { "position": { "x": 0, "y": 0, "z": 3 }, "state": { "name": "minecraft:cobblestone" } },
            { "position": { "x": 4, "y": 0, "z": 3 }, "state": { "name": "minecraft:cobblestone" } },
            { "position": { "x": 2, "y": 0, "z": 3 },
              "state": { "name": "minecraft:oak_door", "properties": { "facing": "south", "half": "lower" } } },
            { "position": { "x": 2, "y": 1, "z": 3 },
              "state": { "name": "minecraft:oak_door", "properties": { "facing": "south", "half": "upper" } } },
            { "position": { "x": 1, "y": 0, "z": 1 },
              "state": { "name": "minecraft:chest", "properties": { "facing": "east" } } },
            { "position": { "x": 2, "y": 0, "z": 1 }, "state": { "name": "minecolonies:blockhutbuilder" } },
            { "position": { "x": 0, "y": 0, "z": 0 }, "state": { "name": "minecraft:oak_log" } }
        ]
    },
    "decoration/well": {
        "size": { "width": 3, "height": 2, "length": 3 },
        "blocks": [
            { "position": { "x": 0, "y": 0, "z": 0 }, "state": { "name": "minecraft:cobblestone" } },
            { "position": { "x": 1, "y": 0, "z": 0 }, "state": { "name": "minecraft:cobblestone" } },
            { "position": { "x": 2, "y": 0, "z": 0 }, "state": { "name": "minecraft:cobblestone" } },
            { "position": { "x": 0, "y": 0, "z": 1 }, "state": { "name": "minecraft:cobblestone" } },
            { "position": { "x": 1, "y": 0, "z": 1 }, "state": { "name": "minecraft:water" } },
            { "position": { "x": 2, "y": 0, "z": 1 }, "state": { "name": "minecraft:cobblestone" } },
            { "position": { "x": 0, "y": 0, "z": 2 }, "state": { "name": "minecraft:cobblestone" } },
            { "position": { "x": 1, "y": 0, "z": 2 }, "state": { "name": "minecraft:cobblestone" } },
            { "position": { "x": 2, "y": 0, "z": 2 }, "state": { "name": "minecraft:cobblestone" } }
        ]
    },
    "decoration/broken": {
        "size": { "width": 2, "height": 2, "length": 2 },
        "blocks": [
            { "position": { "x": 2, "y": 0, "z": 0 }, "state": { "name": "minecraft:stone" } }
        ]
    }
}"#;

/// Route `log` output through `env_logger` for the test harness. Safe to
/// call from every test; only the first call installs the logger.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Decode the fixture template pack.
pub fn template_pack() -> TemplateRegistry {
    serde_json::from_str(TEMPLATE_PACK_JSON).expect("fixture template pack is valid JSON")
}

/// One batch of world-side changes observed around a previewed structure.
#[derive(Default)]
pub struct WorldCapture {
    pub tile_entities: Vec<TileEntity>,
    pub cleared_positions: Vec<VoxelCoord>,
    pub spawned: Vec<Actor>,
    pub despawned: Vec<Actor>,
}

impl WorldCapture {
    /// Replay the capture into `proxy`: tile entity writes, then clears,
    /// then actor spawns, then despawns.
    pub fn apply<S: TemplateSource>(self, proxy: &mut StructureProxy<S>) {
        for te in self.tile_entities {
            let position = te.position;
            proxy.set_tile_entity(position, Some(te));
        }
        for position in self.cleared_positions {
            proxy.set_tile_entity(position, None);
        }
        for actor in self.spawned {
            proxy.add_actor(actor);
        }
        for actor in &self.despawned {
            proxy.remove_actor(actor);
        }
        log::debug!(
            "applied world capture: {} tile entities, {} actors tracked",
            proxy.tile_entities().len(),
            proxy.actors().len()
        );
    }
}
