//! Enemy, friendly and vehicle actors sharing one mutable detail block.
//! This module exists so controllers can move any actor kind through the same fields.
//! It does not decide movement; the controllers own every behaviour.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::schedule::Schedule;
use crate::tile::TileDef;
use crate::types::{Direction, Floor, Pos, TileIndex};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AiType {
    Fixed,
    Wander,
    BigWander,
    HorseWander,
    MerchantFixed,
    MerchantWander,
    CustomAi,
    /// Large-map enemies chasing the avatar.
    Hunt,
    Follow,
    ExtortGuard,
    ChildRunAway,
    DrudgeApproach,
    GargoyleTrigger,
}

impl AiType {
    /// How far from its schedule anchor a wandering NPC may stray.
    pub fn wander_radius(self) -> u32 {
        match self {
            AiType::Wander => 2,
            AiType::BigWander | AiType::HorseWander | AiType::MerchantWander => 4,
            _ => 0,
        }
    }

    pub fn is_wander(self) -> bool {
        matches!(
            self,
            AiType::Wander | AiType::BigWander | AiType::HorseWander | AiType::MerchantWander
        )
    }

    /// Behaviours with no movement logic yet; they report themselves and stay put.
    pub fn is_placeholder(self) -> bool {
        matches!(
            self,
            AiType::Follow
                | AiType::ExtortGuard
                | AiType::ChildRunAway
                | AiType::DrudgeApproach
                | AiType::GargoyleTrigger
        )
    }

    /// Per-turn chance that an off-anchor wanderer acts at all.
    pub fn wander_chance_percent(self) -> u32 {
        match self {
            AiType::Wander | AiType::BigWander => 50,
            AiType::HorseWander => 75,
            AiType::MerchantWander => 35,
            _ => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorDetails {
    pub pos: Pos,
    pub floor: Floor,
    pub visible: bool,
    pub ai_type: AiType,
    /// Upcoming steps, front first. Never contains the current cell.
    pub path: VecDeque<Pos>,
}

impl ActorDetails {
    pub fn new(pos: Pos, floor: Floor, ai_type: AiType) -> Self {
        Self { pos, floor, visible: true, ai_type, path: VecDeque::new() }
    }

    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    /// Replaces the queued path with an A* result, dropping its leading current cell.
    pub fn queue_path(&mut self, path: Vec<Pos>) {
        self.path = path.into_iter().skip(1).collect();
    }
}

/// Which tiles a species can stand on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Habitat {
    #[default]
    Land,
    Water,
    Amphibious,
}

/// Relative spawn weight per environment; zero means never spawns there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnWeights {
    #[serde(default)]
    pub land: u32,
    #[serde(default)]
    pub water: u32,
    #[serde(default)]
    pub desert: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpecies {
    pub name: String,
    pub sprite: TileIndex,
    #[serde(default)]
    pub habitat: Habitat,
    pub hit_points: u16,
    #[serde(default)]
    pub attack: u16,
    #[serde(default)]
    pub defense: u16,
    #[serde(default)]
    pub spawn_weights: SpawnWeights,
    #[serde(default)]
    pub abilities: Vec<String>,
}

impl EnemySpecies {
    pub fn can_move_onto(&self, tile: &TileDef) -> bool {
        match self.habitat {
            Habitat::Land => tile.land_enemy_passable,
            Habitat::Water => tile.water_enemy_passable,
            Habitat::Amphibious => tile.land_enemy_passable || tile.water_enemy_passable,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleKind {
    Horse,
    Carpet,
    Frigate,
    Skiff,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleDetails {
    pub kind: VehicleKind,
    pub sprite: TileIndex,
    pub facing: Direction,
    /// Skiffs carried aboard a frigate.
    #[serde(default)]
    pub skiffs: u8,
}

impl VehicleDetails {
    pub fn can_move_onto(&self, tile: &TileDef) -> bool {
        match self.kind {
            VehicleKind::Horse => tile.horse_passable,
            VehicleKind::Carpet => tile.carpet_passable,
            VehicleKind::Frigate => tile.boat_passable,
            VehicleKind::Skiff => tile.skiff_passable,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcReference {
    pub name: String,
    /// Zero marks an unused roster slot.
    pub sprite: TileIndex,
    pub schedule: Schedule,
}

impl NpcReference {
    pub fn is_empty_slot(&self) -> bool {
        self.sprite == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActorKind {
    Enemy,
    Friendly,
    Vehicle,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Actor {
    Enemy { details: ActorDetails, species: Arc<EnemySpecies> },
    Friendly { details: ActorDetails, npc: Arc<NpcReference> },
    Vehicle { details: ActorDetails, vehicle: VehicleDetails },
}

impl Actor {
    pub fn enemy(species: Arc<EnemySpecies>, pos: Pos, floor: Floor) -> Self {
        Actor::Enemy { details: ActorDetails::new(pos, floor, AiType::Hunt), species }
    }

    pub fn friendly(npc: Arc<NpcReference>, pos: Pos, floor: Floor, ai_type: AiType) -> Self {
        Actor::Friendly { details: ActorDetails::new(pos, floor, ai_type), npc }
    }

    pub fn vehicle(vehicle: VehicleDetails, pos: Pos, floor: Floor) -> Self {
        Actor::Vehicle { details: ActorDetails::new(pos, floor, AiType::Fixed), vehicle }
    }

    pub fn kind(&self) -> ActorKind {
        match self {
            Actor::Enemy { .. } => ActorKind::Enemy,
            Actor::Friendly { .. } => ActorKind::Friendly,
            Actor::Vehicle { .. } => ActorKind::Vehicle,
        }
    }

    pub fn details(&self) -> &ActorDetails {
        match self {
            Actor::Enemy { details, .. }
            | Actor::Friendly { details, .. }
            | Actor::Vehicle { details, .. } => details,
        }
    }

    pub fn details_mut(&mut self) -> &mut ActorDetails {
        match self {
            Actor::Enemy { details, .. }
            | Actor::Friendly { details, .. }
            | Actor::Vehicle { details, .. } => details,
        }
    }

    pub fn pos(&self) -> Pos {
        self.details().pos
    }

    pub fn set_pos(&mut self, pos: Pos) {
        self.details_mut().pos = pos;
    }

    pub fn floor(&self) -> Floor {
        self.details().floor
    }

    pub fn is_visible(&self) -> bool {
        self.details().visible
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Actor::Friendly { npc, .. } => npc.is_empty_slot(),
            Actor::Enemy { .. } | Actor::Vehicle { .. } => false,
        }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, Actor::Enemy { .. })
    }

    pub fn sprite(&self) -> TileIndex {
        match self {
            Actor::Enemy { species, .. } => species.sprite,
            Actor::Friendly { npc, .. } => npc.sprite,
            Actor::Vehicle { vehicle, .. } => vehicle.sprite,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Actor::Enemy { species, .. } => &species.name,
            Actor::Friendly { npc, .. } => &npc.name,
            Actor::Vehicle { .. } => "vehicle",
        }
    }

    pub fn npc(&self) -> Option<&Arc<NpcReference>> {
        match self {
            Actor::Friendly { npc, .. } => Some(npc),
            Actor::Enemy { .. } | Actor::Vehicle { .. } => None,
        }
    }

    pub fn species(&self) -> Option<&Arc<EnemySpecies>> {
        match self {
            Actor::Enemy { species, .. } => Some(species),
            Actor::Friendly { .. } | Actor::Vehicle { .. } => None,
        }
    }

    /// Whether this actor could stand on `tile`, ignoring other actors.
    pub fn can_move_onto(&self, tile: &TileDef) -> bool {
        match self {
            Actor::Enemy { species, .. } => species.can_move_onto(tile),
            Actor::Friendly { .. } => tile.walking_passable,
            Actor::Vehicle { vehicle, .. } => vehicle.can_move_onto(tile),
        }
    }

    /// A* cell weight: enemies use their species predicate, everyone else the tile's walk cost.
    pub fn path_weight(&self, tile: &TileDef) -> i32 {
        match self {
            Actor::Enemy { species, .. } => {
                if species.can_move_onto(tile) {
                    1
                } else {
                    -1
                }
            }
            Actor::Friendly { .. } | Actor::Vehicle { .. } => tile.walkable_weight(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn wander_radius_by_ai_type() {
        assert_eq!(AiType::Wander.wander_radius(), 2);
        assert_eq!(AiType::BigWander.wander_radius(), 4);
        assert_eq!(AiType::HorseWander.wander_radius(), 4);
        assert_eq!(AiType::MerchantWander.wander_radius(), 4);
        assert_eq!(AiType::Fixed.wander_radius(), 0);
        assert_eq!(AiType::Follow.wander_radius(), 0);
    }

    #[test]
    fn placeholder_types_are_distinct_from_real_behaviours() {
        assert!(AiType::GargoyleTrigger.is_placeholder());
        assert!(!AiType::GargoyleTrigger.is_wander());
        assert!(!AiType::Fixed.is_placeholder());
        assert!(AiType::MerchantWander.is_wander());
    }

    #[test]
    fn queue_path_drops_current_cell() {
        let mut details = ActorDetails::new(Pos::new(1, 1), 0, AiType::Fixed);
        details.queue_path(vec![Pos::new(1, 1), Pos::new(2, 1), Pos::new(3, 1)]);
        assert_eq!(details.path.front(), Some(&Pos::new(2, 1)));
        assert_eq!(details.path.len(), 2);
    }

    #[test]
    fn enemy_weight_follows_species_habitat() {
        let tiles = fixture_tiles();
        let grass = tiles.get(GRASS).expect("grass");
        let water = tiles.get(WATER).expect("water");

        let orc = Actor::enemy(orc_species(), Pos::new(0, 0), 0);
        assert_eq!(orc.path_weight(grass), 1);
        assert_eq!(orc.path_weight(water), -1);

        let serpent = Actor::enemy(serpent_species(), Pos::new(0, 0), 0);
        assert_eq!(serpent.path_weight(grass), -1);
        assert_eq!(serpent.path_weight(water), 1);
    }

    #[test]
    fn friendly_weight_uses_tile_speed_factor() {
        let tiles = fixture_tiles();
        let villager = villager_actor(Pos::new(0, 0), AiType::Fixed);
        assert_eq!(villager.path_weight(tiles.get(SWAMP).expect("swamp")), 2);
        assert_eq!(villager.path_weight(tiles.get(WALL).expect("wall")), -1);
        assert!(!villager.is_empty());
        assert_eq!(villager.kind(), ActorKind::Friendly);
    }

    #[test]
    fn empty_roster_slot_is_a_placeholder_actor() {
        let npc = Arc::new(NpcReference {
            name: "unused".into(),
            sprite: 0,
            schedule: Schedule::stationary(Pos::new(0, 0), 0, AiType::Fixed),
        });
        assert!(Actor::friendly(npc, Pos::new(0, 0), 0, AiType::Fixed).is_empty());
    }
}
