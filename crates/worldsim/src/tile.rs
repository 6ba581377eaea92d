//! Read-only terrain reference records keyed by sprite index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::TileIndex;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Plain,
    Road,
    Swamp,
    Forest,
    Mountain,
    Water,
    Desert,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Locomotion {
    Walking,
    Horse,
    Carpet,
    Boat,
    Skiff,
    LandEnemy,
    WaterEnemy,
}

/// Ladder or stair sprite linking a cell to the same cell one floor up or down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Connector {
    LadderUp,
    LadderDown,
    StairsUp,
    StairsDown,
}

impl Connector {
    pub fn goes_up(self) -> bool {
        matches!(self, Connector::LadderUp | Connector::StairsUp)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDef {
    pub index: TileIndex,
    pub name: String,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub walking_passable: bool,
    #[serde(default)]
    pub horse_passable: bool,
    #[serde(default)]
    pub carpet_passable: bool,
    #[serde(default)]
    pub boat_passable: bool,
    #[serde(default)]
    pub skiff_passable: bool,
    #[serde(default)]
    pub land_enemy_passable: bool,
    #[serde(default)]
    pub water_enemy_passable: bool,
    #[serde(default)]
    pub blocks_light: bool,
    #[serde(default)]
    pub is_window: bool,
    /// Movement cost multiplier; 1 is open ground.
    #[serde(default = "default_speed_factor")]
    pub speed_factor: i32,
    #[serde(default)]
    pub dont_wander_onto: bool,
    #[serde(default)]
    pub connector: Option<Connector>,
}

fn default_speed_factor() -> i32 {
    1
}

impl TileDef {
    pub fn new(index: TileIndex, name: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            terrain: Terrain::Plain,
            walking_passable: false,
            horse_passable: false,
            carpet_passable: false,
            boat_passable: false,
            skiff_passable: false,
            land_enemy_passable: false,
            water_enemy_passable: false,
            blocks_light: false,
            is_window: false,
            speed_factor: 1,
            dont_wander_onto: false,
            connector: None,
        }
    }

    pub fn is_passable(&self, mode: Locomotion) -> bool {
        match mode {
            Locomotion::Walking => self.walking_passable,
            Locomotion::Horse => self.horse_passable,
            Locomotion::Carpet => self.carpet_passable,
            Locomotion::Boat => self.boat_passable,
            Locomotion::Skiff => self.skiff_passable,
            Locomotion::LandEnemy => self.land_enemy_passable,
            Locomotion::WaterEnemy => self.water_enemy_passable,
        }
    }

    /// Generic A* weight: the speed factor when walkable, negative when blocked.
    pub fn walkable_weight(&self) -> i32 {
        if self.walking_passable { self.speed_factor.max(1) } else { -1 }
    }

    pub fn is_walkable_during_wander(&self) -> bool {
        self.walking_passable && !self.dont_wander_onto && self.connector.is_none()
    }

    /// Light passes through open tiles and windows alike.
    pub fn is_see_through(&self) -> bool {
        !self.blocks_light || self.is_window
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileTable {
    tiles: BTreeMap<TileIndex, TileDef>,
}

impl TileTable {
    pub fn from_defs(defs: impl IntoIterator<Item = TileDef>) -> Self {
        Self { tiles: defs.into_iter().map(|def| (def.index, def)).collect() }
    }

    pub fn get(&self, index: TileIndex) -> Option<&TileDef> {
        self.tiles.get(&index)
    }

    pub fn contains(&self, index: TileIndex) -> bool {
        self.tiles.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileDef> {
        self.tiles.values()
    }
}
