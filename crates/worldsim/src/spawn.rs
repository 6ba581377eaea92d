//! Terrain- and time-weighted monster spawning for the large maps.
//! This module exists so spawn odds can be tuned and measured apart from movement.
//! It does not own the actor list or enforce the monster cap.

use std::sync::Arc;

use log::{debug, warn};

use crate::actor::{Actor, EnemySpecies, SpawnWeights};
use crate::config::LargeMapConfig;
use crate::date::GameDate;
use crate::map::LayeredMap;
use crate::occupancy::OccupancyMap;
use crate::rng::RngProvider;
use crate::tile::{Terrain, TileDef};
use crate::types::{Floor, Pos};

const NIGHT_BONUS: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Environment {
    Land,
    Water,
    Desert,
}

impl Environment {
    pub fn of(tile: &TileDef) -> Self {
        match tile.terrain {
            Terrain::Water => Environment::Water,
            Terrain::Desert => Environment::Desert,
            _ => Environment::Land,
        }
    }
}

impl SpawnWeights {
    pub fn for_environment(&self, environment: Environment) -> u32 {
        match environment {
            Environment::Land => self.land,
            Environment::Water => self.water,
            Environment::Desert => self.desert,
        }
    }
}

/// Daytime multiplier for the terrain the avatar stands on.
pub fn terrain_multiplier(terrain: Terrain) -> u32 {
    match terrain {
        Terrain::Road => 0,
        Terrain::Swamp | Terrain::Forest | Terrain::Mountain => 2,
        _ => 1,
    }
}

/// Terrain multiplier plus the flat night bonus. Roads stay at zero around the clock.
pub fn spawn_probability(terrain: Terrain, date: &GameDate) -> u32 {
    let base = terrain_multiplier(terrain);
    if base == 0 {
        return 0;
    }
    if date.is_night() { base + NIGHT_BONUS } else { base }
}

/// The single 1-in-N chance for one turn, or `None` when spawning is impossible.
pub fn combined_odds(base_one_in: u32, probability: u32) -> Option<u32> {
    (probability > 0).then(|| (base_one_in / probability).max(1))
}

pub fn should_generate_tile_based_monster(
    terrain: Terrain,
    date: &GameDate,
    base_one_in: u32,
    rng: &mut dyn RngProvider,
) -> bool {
    combined_odds(base_one_in, spawn_probability(terrain, date)).is_some_and(|odds| rng.one_in(odds))
}

/// Draws `r` in `[0, total)` and returns the first index whose running sum exceeds it.
pub fn weighted_pick(weights: &[u32], rng: &mut dyn RngProvider) -> Option<usize> {
    let total: u32 = weights.iter().sum();
    if total == 0 {
        return None;
    }
    let draw = rng.below(total);
    let mut running = 0;
    weights.iter().position(|weight| {
        running += weight;
        running > draw
    })
}

/// Species that can stand on `tile` and have a nonzero weight for its environment.
pub fn select_species<'a>(
    species: &'a [Arc<EnemySpecies>],
    tile: &TileDef,
    rng: &mut dyn RngProvider,
) -> Option<&'a Arc<EnemySpecies>> {
    let environment = Environment::of(tile);
    let candidates: Vec<&Arc<EnemySpecies>> = species
        .iter()
        .filter(|s| s.can_move_onto(tile) && s.spawn_weights.for_environment(environment) > 0)
        .collect();
    let weights: Vec<u32> =
        candidates.iter().map(|s| s.spawn_weights.for_environment(environment)).collect();
    weighted_pick(&weights, rng).map(|index| candidates[index])
}

/// Offset between `min` and `max` tiles along one random axis, anywhere up to `max` on the other.
pub fn spawn_offset(rng: &mut dyn RngProvider, min: i32, max: i32) -> (i32, i32) {
    let along_x = rng.coin_flip();
    let magnitude = rng.range_inclusive(min, max);
    let along = if rng.coin_flip() { magnitude } else { -magnitude };
    let across = rng.range_inclusive(-max, max);
    if along_x { (along, across) } else { (across, along) }
}

/// Tries up to `spawn_attempts` cells around the avatar and returns the first placeable enemy.
pub fn try_spawn_near(
    map: &LayeredMap,
    occupancy: &OccupancyMap,
    species: &[Arc<EnemySpecies>],
    player: Pos,
    floor: Floor,
    config: &LargeMapConfig,
    rng: &mut dyn RngProvider,
) -> Option<Actor> {
    for attempt in 0..config.spawn_attempts {
        let (dx, dy) = spawn_offset(rng, config.spawn_min_offset, config.spawn_max_offset);
        let Some(pos) = map.normalize(player.offset_by(dx, dy)) else {
            continue;
        };
        if occupancy.is_occupied(floor, pos) {
            continue;
        }
        let Some(tile) = map.top_tile(pos) else {
            continue;
        };
        if let Some(chosen) = select_species(species, tile, rng) {
            debug!("spawn attempt {attempt} placed {} at {pos:?}", chosen.name);
            return Some(Actor::enemy(Arc::clone(chosen), pos, floor));
        }
    }
    warn!(
        "spawn roll succeeded near {player:?} but no species fit after {} attempts",
        config.spawn_attempts
    );
    None
}
