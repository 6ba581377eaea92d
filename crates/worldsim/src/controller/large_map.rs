//! Overworld and underworld turn processing: enemy pursuit, cleanup and spawning.

use std::sync::Arc;

use log::{debug, info};

use super::{NpcController, SimEvent, TurnContext, TurnReport};
use crate::actor::{Actor, ActorKind, EnemySpecies};
use crate::config::MONSTER_CAP;
use crate::error::invariant_violation;
use crate::map::{Layer, LayeredMap, LocationMaps};
use crate::occupancy::OccupancyMap;
use crate::pathfinding::AStarMap;
use crate::spawn::{should_generate_tile_based_monster, try_spawn_near};
use crate::types::{Direction, Floor, MapType, Pos};

/// Actor list and map for one persistent large map.
#[derive(Clone, Debug)]
pub struct LargeMapController {
    map_type: MapType,
    floor: Floor,
    maps: LocationMaps,
    species: Vec<Arc<EnemySpecies>>,
    actors: Vec<Actor>,
}

impl LargeMapController {
    pub fn new(
        map_type: MapType,
        maps: LocationMaps,
        species: Vec<Arc<EnemySpecies>>,
        actors: Vec<Actor>,
    ) -> Self {
        if !map_type.is_large() {
            invariant_violation(format_args!("{map_type:?} is not a large map"));
        }
        let floor = map_type.large_map_floor();
        if !maps.contains_floor(floor) {
            invariant_violation(format_args!("{map_type:?} needs floor {floor}"));
        }
        Self { map_type, floor, maps, species, actors }
    }

    pub fn floor(&self) -> Floor {
        self.floor
    }

    pub fn map(&self) -> &LayeredMap {
        self.maps.floor_or_panic(self.floor)
    }

    pub fn map_mut(&mut self) -> &mut LayeredMap {
        self.maps.floor_mut_or_panic(self.floor)
    }

    pub fn add_actor(&mut self, actor: Actor) {
        if actor.floor() != self.floor {
            invariant_violation(format_args!(
                "actor on floor {} added to {:?}",
                actor.floor(),
                self.map_type
            ));
        }
        self.actors.push(actor);
    }

    /// Stamps every visible actor without clearing the layer first.
    fn stamp_actors(&mut self) {
        let floor = self.floor;
        let map = self.maps.floor_mut_or_panic(floor);
        for actor in self.actors.iter().filter(|actor| actor.is_visible() && !actor.is_empty()) {
            map.set_tile_by_layer(Layer::MapUnits, actor.pos(), actor.sprite());
        }
    }

    fn drop_stale_actors(
        &mut self,
        player: Pos,
        cleanup_distance: u32,
        occupancy: &mut OccupancyMap,
        report: &mut TurnReport,
    ) {
        let map = self.maps.floor_or_panic(self.floor);
        self.actors.retain(|actor| {
            let is_vehicle = actor.kind() == ActorKind::Vehicle;
            let keep = !actor.is_empty()
                && (is_vehicle || map.distance(actor.pos(), player) <= cleanup_distance);
            if !keep {
                debug!("dropping {} at {:?}", actor.name(), actor.pos());
                occupancy.unmark(actor.floor(), actor.pos());
                report.push(SimEvent::Dropped {
                    kind: actor.kind(),
                    sprite: actor.sprite(),
                    pos: actor.pos(),
                });
            }
            keep
        });
    }

    /// A* toward the avatar inside the search window, then the greedy fallback.
    fn next_enemy_step(
        &self,
        index: usize,
        player: Pos,
        window_radius: i32,
        occupancy: &OccupancyMap,
    ) -> Option<Pos> {
        let map = self.map();
        let actor = &self.actors[index];
        let blocked: Vec<Pos> = self
            .actors
            .iter()
            .enumerate()
            .filter(|(other, other_actor)| *other != index && other_actor.is_visible())
            .map(|(_, other_actor)| other_actor.pos())
            .collect();
        let grid = AStarMap::for_window(map, actor, &blocked, player, window_radius);
        let path = grid.astar(actor.pos(), player);
        if let Some(step) = path.get(1) {
            return Some(*step);
        }
        dumb_step(map, actor, player, self.floor, occupancy)
    }

    fn move_enemy(
        &mut self,
        index: usize,
        ctx: &mut TurnContext<'_>,
        occupancy: &mut OccupancyMap,
        report: &mut TurnReport,
    ) {
        let actor = &self.actors[index];
        if !actor.is_enemy() || !actor.is_visible() {
            return;
        }
        if self.map().is_next_to(actor.pos(), ctx.player) {
            debug!("{} is beside the avatar and holds position", actor.name());
            return;
        }
        if !ctx.rng.percent(ctx.config.large_map.enemy_move_chance_percent) {
            return;
        }
        let window_radius = ctx.config.large_map.path_window_radius;
        let Some(next) = self.next_enemy_step(index, ctx.player, window_radius, occupancy) else {
            return;
        };
        if next == ctx.player || occupancy.is_occupied(self.floor, next) {
            return;
        }

        let floor = self.floor;
        let from = self.actors[index].pos();
        self.map_mut().unset_tile_by_layer(Layer::MapUnits, from);
        let actor = &mut self.actors[index];
        actor.set_pos(next);
        occupancy.relocate(floor, from, floor, next);
        debug!("{} moves {from:?} -> {next:?}", actor.name());
        report.push(SimEvent::Moved {
            kind: actor.kind(),
            sprite: actor.sprite(),
            floor,
            from,
            to: next,
        });
    }

    fn maybe_spawn(
        &mut self,
        ctx: &mut TurnContext<'_>,
        occupancy: &mut OccupancyMap,
        report: &mut TurnReport,
    ) {
        if self.actors.len() >= MONSTER_CAP {
            return;
        }
        let map = self.maps.floor_or_panic(self.floor);
        let Some(terrain) = map.terrain_tile(ctx.player).map(|tile| tile.terrain) else {
            return;
        };
        let large = &ctx.config.large_map;
        if !should_generate_tile_based_monster(terrain, ctx.date, large.base_spawn_one_in, ctx.rng) {
            return;
        }
        let Some(actor) =
            try_spawn_near(map, occupancy, &self.species, ctx.player, self.floor, large, ctx.rng)
        else {
            return;
        };
        info!("{} spawned at {:?} on {:?}", actor.name(), actor.pos(), self.map_type);
        occupancy.mark(self.floor, actor.pos());
        report.push(SimEvent::Spawned { sprite: actor.sprite(), floor: self.floor, pos: actor.pos() });
        self.map_mut().set_tile_by_layer(Layer::MapUnits, actor.pos(), actor.sprite());
        self.actors.push(actor);
    }
}

/// Best free orthogonal neighbour that strictly closes the wrapped distance to the avatar.
fn dumb_step(
    map: &LayeredMap,
    actor: &Actor,
    player: Pos,
    floor: Floor,
    occupancy: &OccupancyMap,
) -> Option<Pos> {
    let current = map.distance(actor.pos(), player);
    Direction::ALL
        .iter()
        .filter_map(|dir| map.normalize(actor.pos().offset(*dir)))
        .filter(|candidate| *candidate != player && !occupancy.is_occupied(floor, *candidate))
        .filter(|candidate| {
            map.terrain_tile(*candidate).is_some_and(|tile| actor.can_move_onto(tile))
        })
        .map(|candidate| (map.distance(candidate, player), candidate))
        .filter(|(distance, _)| *distance < current)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

impl NpcController for LargeMapController {
    fn map_type(&self) -> MapType {
        self.map_type
    }

    fn advance_turn(&mut self, ctx: &mut TurnContext<'_>) -> TurnReport {
        let mut report = TurnReport::default();
        let mut occupancy = OccupancyMap::from_actors(&self.actors);
        self.maps.clear_map_unit_tiles();
        self.drop_stale_actors(
            ctx.player,
            ctx.config.large_map.cleanup_distance,
            &mut occupancy,
            &mut report,
        );

        for index in 0..self.actors.len() {
            self.stamp_actors();
            self.move_enemy(index, ctx, &mut occupancy, &mut report);
        }
        self.stamp_actors();

        self.maybe_spawn(ctx, &mut occupancy, &mut report);
        report
    }

    /// Large-map actors persist across visits, so there is nothing to build.
    fn populate_map_first_load(&mut self, _ctx: &TurnContext<'_>) {}

    fn npcs(&self) -> &[Actor] {
        &self.actors
    }

    fn npcs_mut(&mut self) -> &mut Vec<Actor> {
        &mut self.actors
    }

    fn maps(&self) -> &LocationMaps {
        &self.maps
    }

    fn maps_mut(&mut self) -> &mut LocationMaps {
        &mut self.maps
    }
}
