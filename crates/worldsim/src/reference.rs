//! Read-only reference tables: tiles, enemy species and per-location NPC rosters.
//! This module exists so malformed data is rejected once, before any turn runs.
//! It does not own any mutable simulation state.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::actor::{EnemySpecies, NpcReference};
use crate::tile::{TileDef, TileTable};
use crate::types::TileIndex;

#[derive(Debug)]
pub enum ReferenceLoadError {
    Io(io::Error),
    InvalidJson(serde_json::Error),
    DuplicateTile(TileIndex),
    UnknownSprite { owner: String, sprite: TileIndex },
    DuplicateSpecies(String),
}

impl fmt::Display for ReferenceLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "reference data I/O error: {e}"),
            Self::InvalidJson(e) => write!(f, "invalid reference data JSON: {e}"),
            Self::DuplicateTile(index) => write!(f, "tile index {index} is defined twice"),
            Self::UnknownSprite { owner, sprite } => {
                write!(f, "{owner} uses sprite {sprite}, which is not in the tile table")
            }
            Self::DuplicateSpecies(name) => write!(f, "enemy species {name:?} is defined twice"),
        }
    }
}

impl std::error::Error for ReferenceLoadError {}

#[derive(Deserialize)]
struct ReferenceFile {
    tiles: Vec<TileDef>,
    #[serde(default)]
    enemies: Vec<EnemySpecies>,
    #[serde(default)]
    npcs: BTreeMap<String, Vec<NpcReference>>,
    avatar_sprite: TileIndex,
}

#[derive(Clone, Debug)]
pub struct ReferenceData {
    pub tiles: Arc<TileTable>,
    pub enemies: Vec<Arc<EnemySpecies>>,
    /// NPC rosters keyed by location name.
    pub npcs: BTreeMap<String, Vec<Arc<NpcReference>>>,
    pub avatar_sprite: TileIndex,
}

impl ReferenceData {
    pub fn load(path: &Path) -> Result<Self, ReferenceLoadError> {
        let content = fs::read_to_string(path).map_err(ReferenceLoadError::Io)?;
        Self::from_json(&content)
    }

    /// Schedules are checked for order and emptiness during deserialization.
    pub fn from_json(json: &str) -> Result<Self, ReferenceLoadError> {
        let file: ReferenceFile =
            serde_json::from_str(json).map_err(ReferenceLoadError::InvalidJson)?;

        let mut seen = BTreeSet::new();
        if let Some(dup) = file.tiles.iter().find(|tile| !seen.insert(tile.index)) {
            return Err(ReferenceLoadError::DuplicateTile(dup.index));
        }
        let tiles = TileTable::from_defs(file.tiles);

        let require_sprite = |owner: &str, sprite: TileIndex| {
            if tiles.contains(sprite) {
                Ok(())
            } else {
                Err(ReferenceLoadError::UnknownSprite { owner: owner.to_string(), sprite })
            }
        };
        require_sprite("avatar", file.avatar_sprite)?;

        let mut species_names = BTreeSet::new();
        for species in &file.enemies {
            if !species_names.insert(species.name.as_str()) {
                return Err(ReferenceLoadError::DuplicateSpecies(species.name.clone()));
            }
            require_sprite(&species.name, species.sprite)?;
        }
        for npc in file.npcs.values().flatten().filter(|npc| !npc.is_empty_slot()) {
            require_sprite(&npc.name, npc.sprite)?;
        }

        Ok(Self {
            tiles: Arc::new(tiles),
            enemies: file.enemies.into_iter().map(Arc::new).collect(),
            npcs: file
                .npcs
                .into_iter()
                .map(|(location, roster)| (location, roster.into_iter().map(Arc::new).collect()))
                .collect(),
            avatar_sprite: file.avatar_sprite,
        })
    }

    /// Roster for `location`; unknown locations have nobody in them.
    pub fn roster(&self, location: &str) -> Vec<Arc<NpcReference>> {
        self.npcs.get(location).cloned().unwrap_or_default()
    }

    pub fn species(&self, name: &str) -> Option<&Arc<EnemySpecies>> {
        self.enemies.iter().find(|species| species.name == name)
    }
}
