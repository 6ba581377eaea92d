//! Shared fixtures for the crate's unit test suites.
//! This module exists to avoid repeating tile tables, maps and actors across tests.
//! It does not own production simulation logic.

use std::sync::Arc;

use crate::actor::{Actor, AiType, EnemySpecies, Habitat, NpcReference, SpawnWeights};
use crate::map::LayeredMap;
use crate::schedule::Schedule;
use crate::tile::{Connector, Terrain, TileDef, TileTable};
use crate::types::{Pos, TileIndex};

pub(crate) const GRASS: TileIndex = 1;
pub(crate) const ROAD: TileIndex = 2;
pub(crate) const SWAMP: TileIndex = 3;
pub(crate) const FOREST: TileIndex = 4;
pub(crate) const MOUNTAIN: TileIndex = 5;
pub(crate) const WATER: TileIndex = 6;
pub(crate) const DESERT: TileIndex = 7;
pub(crate) const WALL: TileIndex = 8;
pub(crate) const WINDOW: TileIndex = 9;
pub(crate) const FLOOR: TileIndex = 10;
pub(crate) const LADDER_UP: TileIndex = 11;
pub(crate) const LADDER_DOWN: TileIndex = 12;
pub(crate) const STAIRS_UP: TileIndex = 13;
pub(crate) const STAIRS_DOWN: TileIndex = 14;
pub(crate) const DOOR: TileIndex = 15;

pub(crate) const ORC_SPRITE: TileIndex = 100;
pub(crate) const SERPENT_SPRITE: TileIndex = 101;
pub(crate) const VILLAGER_SPRITE: TileIndex = 102;
pub(crate) const AVATAR_SPRITE: TileIndex = 103;
pub(crate) const HORSE_SPRITE: TileIndex = 104;

fn ground(index: TileIndex, name: &str, terrain: Terrain, speed_factor: i32) -> TileDef {
    let mut def = TileDef::new(index, name);
    def.terrain = terrain;
    def.walking_passable = true;
    def.horse_passable = true;
    def.carpet_passable = true;
    def.land_enemy_passable = true;
    def.speed_factor = speed_factor;
    def
}

fn connector(index: TileIndex, name: &str, connector: Connector) -> TileDef {
    let mut def = ground(index, name, Terrain::Plain, 1);
    def.connector = Some(connector);
    def
}

pub(crate) fn fixture_tile_defs() -> Vec<TileDef> {
    let mut mountain = TileDef::new(MOUNTAIN, "mountains");
    mountain.terrain = Terrain::Mountain;
    mountain.blocks_light = true;

    let mut water = TileDef::new(WATER, "deep water");
    water.terrain = Terrain::Water;
    water.boat_passable = true;
    water.skiff_passable = true;
    water.water_enemy_passable = true;

    let mut wall = TileDef::new(WALL, "brick wall");
    wall.blocks_light = true;

    let mut window = TileDef::new(WINDOW, "window");
    window.blocks_light = true;
    window.is_window = true;

    let mut door = ground(DOOR, "door", Terrain::Plain, 1);
    door.dont_wander_onto = true;

    let mut defs = vec![
        ground(GRASS, "grass", Terrain::Plain, 1),
        ground(ROAD, "road", Terrain::Road, 1),
        ground(SWAMP, "swamp", Terrain::Swamp, 2),
        ground(FOREST, "forest", Terrain::Forest, 2),
        mountain,
        water,
        ground(DESERT, "desert", Terrain::Desert, 1),
        wall,
        window,
        ground(FLOOR, "wooden floor", Terrain::Plain, 1),
        connector(LADDER_UP, "ladder up", Connector::LadderUp),
        connector(LADDER_DOWN, "ladder down", Connector::LadderDown),
        connector(STAIRS_UP, "stairs up", Connector::StairsUp),
        connector(STAIRS_DOWN, "stairs down", Connector::StairsDown),
        door,
    ];
    for (index, name) in [
        (ORC_SPRITE, "orc"),
        (SERPENT_SPRITE, "sea serpent"),
        (VILLAGER_SPRITE, "villager"),
        (AVATAR_SPRITE, "avatar"),
        (HORSE_SPRITE, "horse"),
    ] {
        defs.push(TileDef::new(index, name));
    }
    defs
}

pub(crate) fn fixture_tiles() -> Arc<TileTable> {
    Arc::new(TileTable::from_defs(fixture_tile_defs()))
}

pub(crate) fn grass_map(width: usize, height: usize, wrapping: bool) -> LayeredMap {
    filled_map(width, height, wrapping, GRASS)
}

pub(crate) fn filled_map(
    width: usize,
    height: usize,
    wrapping: bool,
    tile: TileIndex,
) -> LayeredMap {
    LayeredMap::from_terrain(width, height, wrapping, fixture_tiles(), &vec![tile; width * height])
}

pub(crate) fn orc_species() -> Arc<EnemySpecies> {
    Arc::new(EnemySpecies {
        name: "orc".into(),
        sprite: ORC_SPRITE,
        habitat: Habitat::Land,
        hit_points: 30,
        attack: 8,
        defense: 4,
        spawn_weights: SpawnWeights { land: 10, water: 0, desert: 3 },
        abilities: Vec::new(),
    })
}

pub(crate) fn serpent_species() -> Arc<EnemySpecies> {
    Arc::new(EnemySpecies {
        name: "sea serpent".into(),
        sprite: SERPENT_SPRITE,
        habitat: Habitat::Water,
        hit_points: 60,
        attack: 12,
        defense: 6,
        spawn_weights: SpawnWeights { land: 0, water: 10, desert: 0 },
        abilities: vec!["breathes fire".into()],
    })
}

pub(crate) fn fixture_species() -> Vec<Arc<EnemySpecies>> {
    vec![orc_species(), serpent_species()]
}

pub(crate) fn villager_npc(schedule: Schedule) -> Arc<NpcReference> {
    Arc::new(NpcReference { name: "villager".into(), sprite: VILLAGER_SPRITE, schedule })
}

/// Villager whose whole day is spent at `pos` on floor 0 with `ai_type`.
pub(crate) fn villager_actor(pos: Pos, ai_type: AiType) -> Actor {
    let npc = villager_npc(Schedule::stationary(pos, 0, ai_type));
    Actor::friendly(npc, pos, 0, ai_type)
}
