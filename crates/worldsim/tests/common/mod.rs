#![allow(dead_code)]

use std::sync::Arc;

use worldsim::{
    GameDate, LayeredMap, Pos, ReferenceData, RngProvider, ScriptedRng, SimConfig, TileIndex, World,
};

pub const GRASS: TileIndex = 1;
pub const ROAD: TileIndex = 2;
pub const SWAMP: TileIndex = 3;
pub const WATER: TileIndex = 6;
pub const WALL: TileIndex = 8;
pub const FLOOR: TileIndex = 10;
pub const LADDER_UP: TileIndex = 11;
pub const LADDER_DOWN: TileIndex = 12;
pub const ORC: TileIndex = 100;
pub const VILLAGER: TileIndex = 102;
pub const AVATAR: TileIndex = 103;

pub const REFERENCE_JSON: &str = r#"{
    "tiles": [
        { "index": 1, "name": "grass", "walking_passable": true, "land_enemy_passable": true, "horse_passable": true },
        { "index": 2, "name": "road", "terrain": "Road", "walking_passable": true, "land_enemy_passable": true },
        { "index": 3, "name": "swamp", "terrain": "Swamp", "walking_passable": true, "land_enemy_passable": true, "speed_factor": 2 },
        { "index": 6, "name": "water", "terrain": "Water", "boat_passable": true, "water_enemy_passable": true },
        { "index": 8, "name": "wall", "blocks_light": true },
        { "index": 10, "name": "floor", "walking_passable": true },
        { "index": 11, "name": "ladder up", "walking_passable": true, "connector": "LadderUp" },
        { "index": 12, "name": "ladder down", "walking_passable": true, "connector": "LadderDown" },
        { "index": 100, "name": "orc" },
        { "index": 101, "name": "sea serpent" },
        { "index": 102, "name": "villager" },
        { "index": 103, "name": "avatar" }
    ],
    "enemies": [
        { "name": "orc", "sprite": 100, "hit_points": 20, "spawn_weights": { "land": 10 } },
        { "name": "sea serpent", "sprite": 101, "habitat": "Water", "hit_points": 40, "spawn_weights": { "water": 10 } }
    ],
    "npcs": {
        "tower": [
            {
                "name": "keeper",
                "sprite": 102,
                "schedule": [
                    { "time": { "hour": 6, "minute": 0 }, "pos": { "x": 2, "y": 2 }, "floor": 0, "ai_type": "Fixed" },
                    { "time": { "hour": 12, "minute": 0 }, "pos": { "x": 6, "y": 6 }, "floor": 1, "ai_type": "Fixed" }
                ]
            },
            { "name": "unused", "sprite": 0, "schedule": [
                { "time": { "hour": 0, "minute": 0 }, "pos": { "x": 0, "y": 0 }, "floor": 0, "ai_type": "Fixed" }
            ] }
        ]
    },
    "avatar_sprite": 103
}"#;

pub fn reference() -> Arc<ReferenceData> {
    Arc::new(ReferenceData::from_json(REFERENCE_JSON).expect("fixture reference data is valid"))
}

pub fn filled_map(
    reference: &ReferenceData,
    size: usize,
    wrapping: bool,
    tile: TileIndex,
) -> LayeredMap {
    LayeredMap::from_terrain(size, size, wrapping, Arc::clone(&reference.tiles), &vec![tile; size * size])
}

/// Overworld and underworld of plain grass with the avatar at (20, 20).
pub fn grass_world(hour: u8, rng: Box<dyn RngProvider>) -> World {
    let reference = reference();
    let overworld = filled_map(&reference, 64, true, GRASS);
    let underworld = filled_map(&reference, 64, true, GRASS);
    World::new(
        SimConfig::default(),
        reference,
        overworld,
        underworld,
        Pos::new(20, 20),
        GameDate::at(hour, 0),
        rng,
    )
}

/// Rolls that never pass a percentage or 1-in-N check.
pub fn quiet_rng() -> Box<ScriptedRng> {
    Box::new(ScriptedRng::constant(99))
}
