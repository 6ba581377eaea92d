//! Town and building turn processing: schedule-driven NPC behaviour.
//! This module exists so every friendly NPC resolves "where should I be" before "how do I get there".
//! It does not own the roster; NPC reference records arrive read-only.

use std::sync::Arc;

use log::{debug, info};

use super::{NpcController, SimEvent, TurnContext, TurnReport};
use crate::actor::{Actor, AiType, NpcReference};
use crate::error::invariant_violation;
use crate::map::{Layer, LayeredMap, LocationMaps};
use crate::occupancy::OccupancyMap;
use crate::pathfinding::AStarMap;
use crate::rng::shuffled_directions;
use crate::schedule::ScheduleEntry;
use crate::types::{Floor, MapType, Pos};

/// What one actor did during a turn. Placeholder behaviours stay distinguishable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleOutcome {
    FollowedPath,
    PathBlocked,
    Holding,
    Wandered,
    /// Failed the per-type wander roll this turn.
    Idle,
    Routed,
    NoRoute,
    HeadingToConnector,
    ChangedFloor,
    Placeholder(AiType),
    NotScheduled,
}

#[derive(Clone, Debug)]
pub struct SmallMapController {
    maps: LocationMaps,
    roster: Vec<Arc<NpcReference>>,
    actors: Vec<Actor>,
    last_outcomes: Vec<ScheduleOutcome>,
}

impl SmallMapController {
    pub fn new(maps: LocationMaps, roster: Vec<Arc<NpcReference>>) -> Self {
        Self { maps, roster, actors: Vec::new(), last_outcomes: Vec::new() }
    }

    /// Outcome per actor, in actor order, from the most recent turn.
    pub fn last_outcomes(&self) -> &[ScheduleOutcome] {
        &self.last_outcomes
    }

    pub fn add_actor(&mut self, actor: Actor) {
        self.maps.floor_or_panic(actor.floor());
        self.actors.push(actor);
    }

    fn advance_actor(
        &mut self,
        index: usize,
        ctx: &mut TurnContext<'_>,
        occupancy: &mut OccupancyMap,
        report: &mut TurnReport,
    ) -> ScheduleOutcome {
        let actor = &self.actors[index];
        if actor.is_empty() {
            return ScheduleOutcome::NotScheduled;
        }
        let Some(npc) = actor.npc() else {
            return ScheduleOutcome::NotScheduled;
        };
        let entry = *npc.schedule.current(ctx.date);
        let (pos, floor) = (actor.pos(), actor.floor());
        self.actors[index].details_mut().ai_type = entry.ai_type;

        if self.actors[index].details().has_path() {
            return self.follow_path(index, ctx, occupancy, report);
        }

        if pos == entry.pos && floor == entry.floor {
            return self.behave_at_anchor(index, &entry, ctx, occupancy, report);
        }

        if floor != entry.floor {
            return self.change_floor(index, &entry, ctx, occupancy, report);
        }

        self.return_to_schedule(index, &entry, ctx, occupancy, report)
    }

    fn behave_at_anchor(
        &mut self,
        index: usize,
        entry: &ScheduleEntry,
        ctx: &mut TurnContext<'_>,
        occupancy: &mut OccupancyMap,
        report: &mut TurnReport,
    ) -> ScheduleOutcome {
        match entry.ai_type {
            ai_type if ai_type.is_wander() => {
                self.wander(index, entry.pos, ai_type.wander_radius(), ctx, occupancy, report)
            }
            ai_type if ai_type.is_placeholder() => self.placeholder(index, ai_type, report),
            _ => ScheduleOutcome::Holding,
        }
    }

    fn return_to_schedule(
        &mut self,
        index: usize,
        entry: &ScheduleEntry,
        ctx: &mut TurnContext<'_>,
        occupancy: &mut OccupancyMap,
        report: &mut TurnReport,
    ) -> ScheduleOutcome {
        match entry.ai_type {
            ai_type if ai_type.is_placeholder() => self.placeholder(index, ai_type, report),
            ai_type if ai_type.is_wander() => {
                if !ctx.rng.percent(ai_type.wander_chance_percent()) {
                    return ScheduleOutcome::Idle;
                }
                let radius = ai_type.wander_radius();
                if self.actors[index].pos().is_within_n(entry.pos, radius) {
                    self.wander(index, entry.pos, radius, ctx, occupancy, report)
                } else {
                    self.route_and_step(index, entry.pos, ctx, occupancy, report)
                }
            }
            _ => self.route_and_step(index, entry.pos, ctx, occupancy, report),
        }
    }

    fn placeholder(
        &self,
        index: usize,
        ai_type: AiType,
        report: &mut TurnReport,
    ) -> ScheduleOutcome {
        let actor = &self.actors[index];
        debug!("{} has no {ai_type:?} behaviour yet and stays put", actor.name());
        report.push(SimEvent::Placeholder { sprite: actor.sprite(), ai_type });
        ScheduleOutcome::Placeholder(ai_type)
    }

    /// Consumes the next queued step unless someone stands there.
    fn follow_path(
        &mut self,
        index: usize,
        ctx: &TurnContext<'_>,
        occupancy: &mut OccupancyMap,
        report: &mut TurnReport,
    ) -> ScheduleOutcome {
        let actor = &self.actors[index];
        let floor = actor.floor();
        let Some(next) = actor.details().path.front().copied() else {
            return ScheduleOutcome::Holding;
        };
        let on_player = floor == ctx.player_floor && next == ctx.player;
        if on_player || occupancy.is_occupied(floor, next) {
            debug!("{} finds {next:?} blocked and drops its path", actor.name());
            report.push(SimEvent::PathBlocked { sprite: actor.sprite(), pos: actor.pos() });
            self.actors[index].details_mut().clear_path();
            return ScheduleOutcome::PathBlocked;
        }
        self.actors[index].details_mut().path.pop_front();
        self.move_actor(index, next, occupancy, report);
        ScheduleOutcome::FollowedPath
    }

    fn blocked_cells(&self, index: usize, ctx: &TurnContext<'_>) -> Vec<Pos> {
        let floor = self.actors[index].floor();
        let mut blocked: Vec<Pos> = self
            .actors
            .iter()
            .enumerate()
            .filter(|(other, actor)| {
                *other != index && actor.floor() == floor && actor.is_visible() && !actor.is_empty()
            })
            .map(|(_, actor)| actor.pos())
            .collect();
        if ctx.player_floor == floor {
            blocked.push(ctx.player);
        }
        blocked
    }

    /// Queues a fresh A* route to `goal` and takes its first step.
    fn route_and_step(
        &mut self,
        index: usize,
        goal: Pos,
        ctx: &TurnContext<'_>,
        occupancy: &mut OccupancyMap,
        report: &mut TurnReport,
    ) -> ScheduleOutcome {
        let blocked = self.blocked_cells(index, ctx);
        let actor = &self.actors[index];
        let map = self.maps.floor_or_panic(actor.floor());
        let path = AStarMap::for_floor(map, actor, &blocked).astar(actor.pos(), goal);
        if path.len() < 2 {
            debug!("{} has no route from {:?} to {goal:?}", actor.name(), actor.pos());
            return ScheduleOutcome::NoRoute;
        }
        self.actors[index].details_mut().queue_path(path);
        match self.follow_path(index, ctx, occupancy, report) {
            ScheduleOutcome::FollowedPath => ScheduleOutcome::Routed,
            other => other,
        }
    }

    /// One random cardinal step that keeps the actor within `radius` of `anchor`.
    fn wander(
        &mut self,
        index: usize,
        anchor: Pos,
        radius: u32,
        ctx: &mut TurnContext<'_>,
        occupancy: &mut OccupancyMap,
        report: &mut TurnReport,
    ) -> ScheduleOutcome {
        let actor = &self.actors[index];
        let (pos, floor) = (actor.pos(), actor.floor());
        let map = self.maps.floor_or_panic(floor);
        let target = shuffled_directions(ctx.rng).into_iter().find_map(|dir| {
            let candidate = map.normalize(pos.offset(dir))?;
            let on_player = floor == ctx.player_floor && candidate == ctx.player;
            let walkable =
                map.terrain_tile(candidate).is_some_and(|tile| tile.is_walkable_during_wander());
            let acceptable = !on_player
                && walkable
                && candidate.is_within_n(anchor, radius)
                && !occupancy.is_occupied(floor, candidate);
            acceptable.then_some(candidate)
        });
        match target {
            Some(target) => {
                self.move_actor(index, target, occupancy, report);
                ScheduleOutcome::Wandered
            }
            None => ScheduleOutcome::Holding,
        }
    }

    /// Walks to the nearest connector leading toward the scheduled floor, then
    /// crosses once the landing cell on the next floor is free. Actors on floors
    /// the avatar cannot see follow the same route.
    fn change_floor(
        &mut self,
        index: usize,
        entry: &ScheduleEntry,
        ctx: &TurnContext<'_>,
        occupancy: &mut OccupancyMap,
        report: &mut TurnReport,
    ) -> ScheduleOutcome {
        let actor = &self.actors[index];
        let (pos, floor) = (actor.pos(), actor.floor());
        let going_up = entry.floor > floor;
        let next_floor = if going_up { floor + 1 } else { floor - 1 };

        let map = self.maps.floor_or_panic(floor);
        let Some(connector) = nearest_connector(map, pos, going_up) else {
            invariant_violation(format_args!(
                "{} must reach floor {} but floor {floor} has no connector that way",
                actor.name(),
                entry.floor
            ));
        };
        if connector != pos {
            return match self.route_and_step(index, connector, ctx, occupancy, report) {
                ScheduleOutcome::Routed => ScheduleOutcome::HeadingToConnector,
                other => other,
            };
        }

        let landing = self.maps.floor_or_panic(next_floor).terrain_tile(pos);
        if landing.and_then(|tile| tile.connector).is_none() {
            invariant_violation(format_args!(
                "connector at {pos:?} on floor {floor} lands on a non-connector tile on floor {next_floor}"
            ));
        }
        if !is_free(occupancy, ctx, next_floor, pos) {
            return ScheduleOutcome::Holding;
        }
        self.teleport(index, next_floor, pos, occupancy, report);
        ScheduleOutcome::ChangedFloor
    }

    fn move_actor(
        &mut self,
        index: usize,
        to: Pos,
        occupancy: &mut OccupancyMap,
        report: &mut TurnReport,
    ) {
        let actor = &mut self.actors[index];
        let (from, floor) = (actor.pos(), actor.floor());
        actor.set_pos(to);
        occupancy.relocate(floor, from, floor, to);
        debug!("{} moves {from:?} -> {to:?} on floor {floor}", actor.name());
        report.push(SimEvent::Moved { kind: actor.kind(), sprite: actor.sprite(), floor, from, to });
        let (visible, sprite) = (actor.is_visible(), actor.sprite());
        let map = self.maps.floor_mut_or_panic(floor);
        map.unset_tile_by_layer(Layer::MapUnits, from);
        if visible {
            map.set_tile_by_layer(Layer::MapUnits, to, sprite);
        }
    }

    fn teleport(
        &mut self,
        index: usize,
        to_floor: Floor,
        to: Pos,
        occupancy: &mut OccupancyMap,
        report: &mut TurnReport,
    ) {
        let actor = &mut self.actors[index];
        let (from, from_floor) = (actor.pos(), actor.floor());
        let details = actor.details_mut();
        details.pos = to;
        details.floor = to_floor;
        details.clear_path();
        occupancy.relocate(from_floor, from, to_floor, to);
        info!("{} climbs from floor {from_floor} to {to_floor} at {to:?}", actor.name());
        report.push(SimEvent::FloorChanged { sprite: actor.sprite(), pos: to, from_floor, to_floor });
        self.maps.floor_mut_or_panic(from_floor).unset_tile_by_layer(Layer::MapUnits, from);
    }
}

fn is_free(occupancy: &OccupancyMap, ctx: &TurnContext<'_>, floor: Floor, pos: Pos) -> bool {
    let on_player = floor == ctx.player_floor && pos == ctx.player;
    !on_player && !occupancy.is_occupied(floor, pos)
}

/// Closest ladder or stair leading up (or down), ties broken in row-major order.
fn nearest_connector(map: &LayeredMap, from: Pos, up: bool) -> Option<Pos> {
    map.positions()
        .filter(|pos| {
            map.terrain_tile(*pos)
                .and_then(|tile| tile.connector)
                .is_some_and(|connector| connector.goes_up() == up)
        })
        .min_by_key(|pos| map.distance(from, *pos))
}

impl NpcController for SmallMapController {
    fn map_type(&self) -> MapType {
        MapType::Small
    }

    fn advance_turn(&mut self, ctx: &mut TurnContext<'_>) -> TurnReport {
        let mut report = TurnReport::default();
        let mut occupancy = OccupancyMap::from_actors(&self.actors);
        self.maps.clear_map_unit_tiles();
        let mut outcomes = Vec::with_capacity(self.actors.len());
        for index in 0..self.actors.len() {
            self.freshen_existing_npcs_on_map();
            outcomes.push(self.advance_actor(index, ctx, &mut occupancy, &mut report));
        }
        self.freshen_existing_npcs_on_map();
        self.last_outcomes = outcomes;
        report
    }

    /// Places every roster NPC where its schedule says it should be right now.
    fn populate_map_first_load(&mut self, ctx: &TurnContext<'_>) {
        self.actors = self
            .roster
            .iter()
            .filter(|npc| !npc.is_empty_slot())
            .map(|npc| {
                let entry = npc.schedule.current(ctx.date);
                self.maps.floor_or_panic(entry.floor);
                Actor::friendly(Arc::clone(npc), entry.pos, entry.floor, entry.ai_type)
            })
            .collect();
        self.last_outcomes.clear();
        self.freshen_existing_npcs_on_map();
    }

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
