// Mutable overlays layered on top of the immutable voxel grid.
//
// Two independent collections:
// - Tile entities: blocks carrying extra state (chests, signs, furnaces),
//   keyed by the grid position they occupy. At most one per position.
// - Actors: mobile objects captured with the structure (item frames,
//   animals, armor stands), keyed by their identity. At most one per UUID.
//
// Both collections are best-effort mirrors of what the world reports while a
// structure is previewed or placed, so malformed or irrelevant inputs are
// dropped without error:
// - `set_tile_entity()` outside the grid bounds does nothing.
// - `add_actor()` ignores actors with no identity and player-controlled
//   actors, and is idempotent for an identity already present.
// - `remove_actor()` ignores actors with no identity.
// Drops are logged at `trace` level only.
//
// Overlays are rotation-agnostic: `proxy.rs` rebuilds the grid on
// `rotate()` but leaves both collections untouched, even when the new
// dimensions no longer contain a stored tile entity's position.
//
// Storage is `FxHashMap` for O(1) lookup and replace. Snapshot accessors
// return records sorted by key so callers see the same order on every run.
//
// See also: `proxy.rs` which owns the `Overlay` and supplies the grid bounds
// for `set_tile_entity()`, `types.rs` for `VoxelCoord` and `ActorUuid`.

use crate::types::{ActorUuid, GridSize, VoxelCoord};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A block with extra mutable state. `data` is opaque to the preview.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileEntity {
    pub position: VoxelCoord,
    /// Namespaced tile entity type, e.g. `minecraft:chest`.
    pub id: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl TileEntity {
    pub fn new(position: VoxelCoord, id: impl Into<String>) -> Self {
        Self {
            position,
            id: id.into(),
            data: serde_json::Value::Null,
        }
    }
}

/// Broad class of an actor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// Controlled by a connected player; never part of a structure.
    Player,
    Creature,
    Item,
    Other(String),
}

/// A mobile object associated with the structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// `None` for actors the world hasn't assigned an identity yet.
    pub uuid: Option<ActorUuid>,
    pub kind: ActorKind,
    /// Position in structure-local coordinates (fractional).
    pub position: [f64; 3],
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Actor {
    pub fn new(uuid: Option<ActorUuid>, kind: ActorKind, position: [f64; 3]) -> Self {
        Self {
            uuid,
            kind,
            position,
            data: serde_json::Value::Null,
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == ActorKind::Player
    }
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(into = "OverlaySnapshot", from = "OverlaySnapshot")]
pub struct Overlay {
    tile_entities: FxHashMap<VoxelCoord, TileEntity>,
    actors: FxHashMap<ActorUuid, Actor>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Tile entities ------------------------------------------------------

    /// The tile entity at `position`, if any.
    pub fn tile_entity(&self, position: VoxelCoord) -> Option<&TileEntity> {
        self.tile_entities.get(&position)
    }

    /// Replace the tile entity at `position`, or clear it when `tile_entity`
    /// is `None`. No-op when `position` lies outside `bounds`.
    ///
    /// The stored record's `position` is rewritten to `position`, so the key
    /// and the record never disagree.
    pub fn set_tile_entity(
        &mut self,
        bounds: GridSize,
        position: VoxelCoord,
        tile_entity: Option<TileEntity>,
    ) {
        if !bounds.contains(position) {
            log::trace!("ignoring tile entity at {position}: outside {bounds}");
            return;
        }

        self.tile_entities.remove(&position);

        if let Some(mut te) = tile_entity {
            te.position = position;
            self.tile_entities.insert(position, te);
        }
    }

    /// Remove the tile entity at `position`. Returns it if one was present.
    pub fn remove_tile_entity(&mut self, position: VoxelCoord) -> Option<TileEntity> {
        self.tile_entities.remove(&position)
    }

    /// Snapshot of all tile entities, sorted by position.
    pub fn tile_entities(&self) -> Vec<&TileEntity> {
        let mut list: Vec<&TileEntity> = self.tile_entities.values().collect();
        list.sort_by_key(|te| te.position);
        list
    }

    pub fn tile_entity_count(&self) -> usize {
        self.tile_entities.len()
    }

    // -- Actors -------------------------------------------------------------

    /// Track an actor. Silently ignored for identity-less and player actors,
    /// and for an identity that is already tracked (the first record stays).
    pub fn add_actor(&mut self, actor: Actor) {
        let Some(uuid) = actor.uuid else {
            log::trace!("ignoring {:?} actor without an identity", actor.kind);
            return;
        };
        if actor.is_player() {
            log::trace!("ignoring player actor {uuid}");
            return;
        }
        self.actors.entry(uuid).or_insert(actor);
    }

    /// Stop tracking every record sharing `actor`'s identity. Silently
    /// ignored for identity-less actors.
    pub fn remove_actor(&mut self, actor: &Actor) {
        match actor.uuid {
            Some(uuid) => {
                self.actors.remove(&uuid);
            }
            None => log::trace!("ignoring removal of {:?} actor without an identity", actor.kind),
        }
    }

    pub fn actor(&self, uuid: ActorUuid) -> Option<&Actor> {
        self.actors.get(&uuid)
    }

    /// Snapshot of all actors, sorted by identity.
    pub fn actors(&self) -> Vec<&Actor> {
        let mut list: Vec<(&ActorUuid, &Actor)> = self.actors.iter().collect();
        list.sort_by_key(|(uuid, _)| **uuid);
        list.into_iter().map(|(_, actor)| actor).collect()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Drop both collections.
    pub fn clear(&mut self) {
        self.tile_entities.clear();
        self.actors.clear();
    }
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// Serde shape of an `Overlay`: both collections as sorted lists.
///
/// Positions are structs, so they can't be JSON map keys; lists also keep
/// the output stable across runs. Loading replays the records through the
/// normal insertion rules, so a hand-edited snapshot can't smuggle in a
/// player or identity-less actor.
#[derive(Serialize, Deserialize)]
struct OverlaySnapshot {
    #[serde(default)]
    tile_entities: Vec<TileEntity>,
    #[serde(default)]
    actors: Vec<Actor>,
}

impl From<Overlay> for OverlaySnapshot {
    fn from(overlay: Overlay) -> Self {
        let mut tile_entities: Vec<TileEntity> = overlay.tile_entities.into_values().collect();
        tile_entities.sort_by_key(|te| te.position);
        let mut actors: Vec<Actor> = overlay.actors.into_values().collect();
        actors.sort_by_key(|a| a.uuid);
        Self {
            tile_entities,
            actors,
        }
    }
}

impl From<OverlaySnapshot> for Overlay {
    fn from(snapshot: OverlaySnapshot) -> Self {
        let mut overlay = Overlay::new();
        for te in snapshot.tile_entities {
            overlay.tile_entities.insert(te.position, te);
        }
        for actor in snapshot.actors {
            overlay.add_actor(actor);
        }
        overlay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: GridSize = GridSize::new(4, 3, 4);

    fn chest(x: i32, y: i32, z: i32) -> TileEntity {
        TileEntity::new(VoxelCoord::new(x, y, z), "minecraft:chest")
    }

    fn creature(id: u128) -> Actor {
        Actor::new(Some(ActorUuid::from_u128(id)), ActorKind::Creature, [0.5, 1.0, 0.5])
    }

    #[test]
    fn set_then_get_tile_entity() {
        let mut overlay = Overlay::new();
        let pos = VoxelCoord::new(1, 0, 2);
        overlay.set_tile_entity(BOUNDS, pos, Some(chest(1, 0, 2)));
        assert_eq!(overlay.tile_entity(pos).unwrap().id, "minecraft:chest");
        assert!(overlay.tile_entity(VoxelCoord::new(2, 0, 2)).is_none());
    }

    #[test]
    fn second_set_replaces_without_duplicating() {
        let mut overlay = Overlay::new();
        let pos = VoxelCoord::new(1, 1, 1);
        overlay.set_tile_entity(BOUNDS, pos, Some(chest(1, 1, 1)));
        overlay.set_tile_entity(BOUNDS, pos, Some(TileEntity::new(pos, "minecraft:furnace")));
        assert_eq!(overlay.tile_entity_count(), 1);
        assert_eq!(overlay.tile_entity(pos).unwrap().id, "minecraft:furnace");
    }

    #[test]
    fn set_none_clears_position() {
        let mut overlay = Overlay::new();
        let pos = VoxelCoord::new(0, 0, 0);
        overlay.set_tile_entity(BOUNDS, pos, Some(chest(0, 0, 0)));
        overlay.set_tile_entity(BOUNDS, pos, None);
        assert!(overlay.tile_entity(pos).is_none());
        assert_eq!(overlay.tile_entity_count(), 0);
    }

    #[test]
    fn out_of_bounds_set_is_noop() {
        let mut overlay = Overlay::new();
        overlay.set_tile_entity(BOUNDS, VoxelCoord::new(0, 0, 0), Some(chest(0, 0, 0)));
        for pos in [
            VoxelCoord::new(4, 0, 0),
            VoxelCoord::new(0, 3, 0),
            VoxelCoord::new(0, 0, 4),
            VoxelCoord::new(-1, 0, 0),
        ] {
            overlay.set_tile_entity(BOUNDS, pos, Some(TileEntity::new(pos, "minecraft:sign")));
            assert!(overlay.tile_entity(pos).is_none());
        }
        // An out-of-bounds clear doesn't touch anything either.
        overlay.set_tile_entity(BOUNDS, VoxelCoord::new(9, 9, 9), None);
        assert_eq!(overlay.tile_entity_count(), 1);
    }

    #[test]
    fn stored_position_follows_key() {
        let mut overlay = Overlay::new();
        let pos = VoxelCoord::new(2, 1, 3);
        overlay.set_tile_entity(BOUNDS, pos, Some(chest(0, 0, 0)));
        assert_eq!(overlay.tile_entity(pos).unwrap().position, pos);
        assert!(overlay.tile_entity(VoxelCoord::ORIGIN).is_none());
    }

    #[test]
    fn remove_tile_entity_is_noop_when_absent() {
        let mut overlay = Overlay::new();
        assert!(overlay.remove_tile_entity(VoxelCoord::new(1, 1, 1)).is_none());
        overlay.set_tile_entity(BOUNDS, VoxelCoord::new(1, 1, 1), Some(chest(1, 1, 1)));
        assert!(overlay.remove_tile_entity(VoxelCoord::new(1, 1, 1)).is_some());
        assert_eq!(overlay.tile_entity_count(), 0);
    }

    #[test]
    fn tile_entity_snapshot_is_sorted() {
        let mut overlay = Overlay::new();
        for (x, z) in [(3, 0), (0, 2), (1, 1)] {
            overlay.set_tile_entity(BOUNDS, VoxelCoord::new(x, 0, z), Some(chest(x, 0, z)));
        }
        let positions: Vec<VoxelCoord> =
            overlay.tile_entities().iter().map(|te| te.position).collect();
        assert_eq!(
            positions,
            [VoxelCoord::new(0, 0, 2), VoxelCoord::new(1, 0, 1), VoxelCoord::new(3, 0, 0)]
        );
    }

    #[test]
    fn duplicate_identity_keeps_first_actor() {
        let mut overlay = Overlay::new();
        overlay.add_actor(creature(7));
        let mut moved = creature(7);
        moved.position = [3.0, 0.0, 3.0];
        overlay.add_actor(moved);
        assert_eq!(overlay.actor_count(), 1);
        assert_eq!(overlay.actor(ActorUuid::from_u128(7)).unwrap().position, [0.5, 1.0, 0.5]);
    }

    #[test]
    fn player_and_anonymous_actors_are_rejected() {
        let mut overlay = Overlay::new();
        overlay.add_actor(Actor::new(Some(ActorUuid::from_u128(1)), ActorKind::Player, [0.0; 3]));
        overlay.add_actor(Actor::new(None, ActorKind::Item, [0.0; 3]));
        assert_eq!(overlay.actor_count(), 0);
        assert!(overlay.actors().is_empty());
    }

    #[test]
    fn remove_actor_by_identity() {
        let mut overlay = Overlay::new();
        overlay.add_actor(creature(1));
        overlay.add_actor(creature(2));

        // A different record with the same identity still removes it.
        let mut lookalike = creature(1);
        lookalike.kind = ActorKind::Other("minecraft:armor_stand".into());
        overlay.remove_actor(&lookalike);

        assert!(overlay.actor(ActorUuid::from_u128(1)).is_none());
        assert!(overlay.actor(ActorUuid::from_u128(2)).is_some());
    }

    #[test]
    fn remove_anonymous_or_unknown_actor_is_noop() {
        let mut overlay = Overlay::new();
        overlay.add_actor(creature(1));
        overlay.remove_actor(&Actor::new(None, ActorKind::Creature, [0.0; 3]));
        overlay.remove_actor(&creature(99));
        assert_eq!(overlay.actor_count(), 1);
    }

    #[test]
    fn actor_snapshot_is_sorted_by_identity() {
        let mut overlay = Overlay::new();
        for id in [30, 10, 20] {
            overlay.add_actor(creature(id));
        }
        let ids: Vec<ActorUuid> = overlay.actors().iter().filter_map(|a| a.uuid).collect();
        assert_eq!(
            ids,
            [ActorUuid::from_u128(10), ActorUuid::from_u128(20), ActorUuid::from_u128(30)]
        );
    }

    #[test]
    fn clear_drops_everything() {
        let mut overlay = Overlay::new();
        overlay.set_tile_entity(BOUNDS, VoxelCoord::ORIGIN, Some(chest(0, 0, 0)));
        overlay.add_actor(creature(1));
        overlay.clear();
        assert_eq!(overlay.tile_entity_count(), 0);
        assert_eq!(overlay.actor_count(), 0);
    }

    #[test]
    fn snapshot_serialization_roundtrip() {
        let mut overlay = Overlay::new();
        let mut sign = TileEntity::new(VoxelCoord::new(1, 2, 1), "minecraft:sign");
        sign.data = serde_json::json!({ "text": ["Town", "Hall"] });
        overlay.set_tile_entity(BOUNDS, sign.position, Some(sign.clone()));
        overlay.add_actor(creature(5));

        let json = serde_json::to_string(&overlay).unwrap();
        let restored: Overlay = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.tile_entity(sign.position), Some(&sign));
        assert_eq!(restored.actor_count(), 1);
    }

    #[test]
    fn snapshot_load_applies_actor_rules() {
        let json = r#"{
            "tile_entities": [],
            "actors": [
                { "uuid": null, "kind": "Item", "position": [0.0, 0.0, 0.0] },
                { "uuid": "00000000-0000-0000-0000-000000000001", "kind": "Player", "position": [1.0, 0.0, 1.0] },
                { "uuid": "00000000-0000-0000-0000-000000000002", "kind": { "Other": "minecraft:item_frame" }, "position": [2.0, 1.0, 0.0] }
            ]
        }"#;
        let overlay: Overlay = serde_json::from_str(json).unwrap();
        assert_eq!(overlay.actor_count(), 1);
        assert_eq!(
            overlay.actor(ActorUuid::from_u128(2)).unwrap().kind,
            ActorKind::Other("minecraft:item_frame".into())
        );
    }
}
