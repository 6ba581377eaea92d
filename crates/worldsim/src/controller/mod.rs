//! Per-turn NPC controllers and the interface the world drives them through.
//! This module exists so the active map type can be swapped without callers caring which runs.
//! It does not own the clock or the avatar; both arrive through `TurnContext`.

mod large_map;
mod small_map;

pub use large_map::LargeMapController;
pub use small_map::{ScheduleOutcome, SmallMapController};

use crate::actor::{Actor, ActorKind, AiType};
use crate::config::SimConfig;
use crate::date::GameDate;
use crate::map::{Layer, LocationMaps};
use crate::rng::RngProvider;
use crate::types::{Floor, MapType, Pos, TileIndex};

/// Everything a controller reads about the world outside its own actors and maps.
pub struct TurnContext<'a> {
    pub player: Pos,
    pub player_floor: Floor,
    pub date: &'a GameDate,
    pub config: &'a SimConfig,
    pub rng: &'a mut dyn RngProvider,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimEvent {
    Moved { kind: ActorKind, sprite: TileIndex, floor: Floor, from: Pos, to: Pos },
    Dropped { kind: ActorKind, sprite: TileIndex, pos: Pos },
    Spawned { sprite: TileIndex, floor: Floor, pos: Pos },
    FloorChanged { sprite: TileIndex, pos: Pos, from_floor: Floor, to_floor: Floor },
    /// A queued step was occupied; the path was discarded.
    PathBlocked { sprite: TileIndex, pos: Pos },
    /// The actor's behaviour has no movement logic and left it in place.
    Placeholder { sprite: TileIndex, ai_type: AiType },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnReport {
    pub events: Vec<SimEvent>,
}

impl TurnReport {
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn moves(&self) -> usize {
        self.events.iter().filter(|event| matches!(event, SimEvent::Moved { .. })).count()
    }

    pub fn spawns(&self) -> usize {
        self.events.iter().filter(|event| matches!(event, SimEvent::Spawned { .. })).count()
    }

    pub fn extend(&mut self, other: TurnReport) {
        self.events.extend(other.events);
    }
}

pub trait NpcController {
    fn map_type(&self) -> MapType;

    /// Moves every actor once. Called exactly once per turn-consuming avatar action.
    fn advance_turn(&mut self, ctx: &mut TurnContext<'_>) -> TurnReport;

    /// Builds the actor list for a freshly entered location.
    fn populate_map_first_load(&mut self, ctx: &TurnContext<'_>);

    fn npcs(&self) -> &[Actor];

    fn npcs_mut(&mut self) -> &mut Vec<Actor>;

    fn maps(&self) -> &LocationMaps;

    fn maps_mut(&mut self) -> &mut LocationMaps;

    /// Re-stamps every visible actor onto the map-unit layer without advancing a turn.
    fn freshen_existing_npcs_on_map(&mut self) {
        let stamps: Vec<(Floor, Pos, TileIndex)> = self
            .npcs()
            .iter()
            .filter(|actor| actor.is_visible() && !actor.is_empty())
            .map(|actor| (actor.floor(), actor.pos(), actor.sprite()))
            .collect();
        let maps = self.maps_mut();
        maps.clear_map_unit_tiles();
        for (floor, pos, sprite) in stamps {
            maps.floor_mut_or_panic(floor).set_tile_by_layer(Layer::MapUnits, pos, sprite);
        }
    }

    fn actor_at(&self, floor: Floor, pos: Pos) -> Option<&Actor> {
        self.npcs().iter().find(|actor| actor.floor() == floor && actor.pos() == pos)
    }

    /// Removes the actor standing at `pos`, e.g. a vehicle the avatar boards.
    fn remove_actor_at(&mut self, floor: Floor, pos: Pos) -> Option<Actor> {
        let index =
            self.npcs().iter().position(|actor| actor.floor() == floor && actor.pos() == pos)?;
        let removed = self.npcs_mut().swap_remove(index);
        if let Some(map) = self.maps_mut().floor_mut(floor) {
            map.unset_tile_by_layer(Layer::MapUnits, pos);
        }
        Some(removed)
    }

    fn remove_all_enemies(&mut self) -> usize {
        let before = self.npcs().len();
        self.npcs_mut().retain(|actor| !actor.is_enemy());
        let removed = before - self.npcs().len();
        self.freshen_existing_npcs_on_map();
        removed
    }
}
