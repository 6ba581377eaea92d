//! The world facade: clock, avatar and the controller that matches the active map.
//! This module exists so callers drive one object per turn and never pick controllers by hand.
//! It does not render, read input or persist anything.

mod hash;

use std::sync::Arc;

use log::info;

use crate::actor::Actor;
use crate::config::SimConfig;
use crate::controller::{
    LargeMapController, NpcController, SmallMapController, TurnContext, TurnReport,
};
use crate::date::GameDate;
use crate::error::invariant_violation;
use crate::map::{Layer, LayeredMap, LocationMaps};
use crate::reference::ReferenceData;
use crate::rng::RngProvider;
use crate::types::{Floor, MapType, Pos};
use crate::visibility::Lighting;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AvatarState {
    pub pos: Pos,
    pub floor: Floor,
    pub map_type: MapType,
    pub lighting: Lighting,
}

pub struct World {
    config: SimConfig,
    reference: Arc<ReferenceData>,
    date: GameDate,
    turn: u64,
    avatar: AvatarState,
    overworld: LargeMapController,
    underworld: LargeMapController,
    small_map: Option<SmallMapController>,
    rng: Box<dyn RngProvider>,
}

impl World {
    /// Starts on the overworld at `avatar_pos`.
    pub fn new(
        config: SimConfig,
        reference: Arc<ReferenceData>,
        overworld_map: LayeredMap,
        underworld_map: LayeredMap,
        avatar_pos: Pos,
        date: GameDate,
        rng: Box<dyn RngProvider>,
    ) -> Self {
        let species = reference.enemies.clone();
        let overworld = LargeMapController::new(
            MapType::Overworld,
            LocationMaps::single(MapType::Overworld.large_map_floor(), overworld_map),
            species.clone(),
            Vec::new(),
        );
        let underworld = LargeMapController::new(
            MapType::Underworld,
            LocationMaps::single(MapType::Underworld.large_map_floor(), underworld_map),
            species,
            Vec::new(),
        );
        let avatar = AvatarState {
            pos: avatar_pos,
            floor: MapType::Overworld.large_map_floor(),
            map_type: MapType::Overworld,
            lighting: Lighting::default(),
        };
        let mut world = Self {
            config,
            reference,
            date,
            turn: 0,
            avatar,
            overworld,
            underworld,
            small_map: None,
            rng,
        };
        world.place_avatar(avatar_pos);
        world
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn reference(&self) -> &Arc<ReferenceData> {
        &self.reference
    }

    pub fn date(&self) -> &GameDate {
        &self.date
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn avatar(&self) -> &AvatarState {
        &self.avatar
    }

    pub fn large_map(&self, map_type: MapType) -> &LargeMapController {
        match map_type {
            MapType::Overworld => &self.overworld,
            MapType::Underworld => &self.underworld,
            MapType::Small => invariant_violation(format_args!("small maps are not large maps")),
        }
    }

    pub fn large_map_mut(&mut self, map_type: MapType) -> &mut LargeMapController {
        match map_type {
            MapType::Overworld => &mut self.overworld,
            MapType::Underworld => &mut self.underworld,
            MapType::Small => invariant_violation(format_args!("small maps are not large maps")),
        }
    }

    pub fn small_map(&self) -> Option<&SmallMapController> {
        self.small_map.as_ref()
    }

    pub fn active(&self) -> &dyn NpcController {
        match self.avatar.map_type {
            MapType::Small => match &self.small_map {
                Some(small) => small,
                None => invariant_violation(format_args!("avatar is on a small map that is not loaded")),
            },
            large => self.large_map(large),
        }
    }

    fn active_mut(&mut self) -> &mut dyn NpcController {
        match self.avatar.map_type {
            MapType::Small => match &mut self.small_map {
                Some(small) => small,
                None => invariant_violation(format_args!("avatar is on a small map that is not loaded")),
            },
            MapType::Overworld => &mut self.overworld,
            MapType::Underworld => &mut self.underworld,
        }
    }

    /// Floor the avatar currently stands on.
    pub fn active_map(&self) -> &LayeredMap {
        self.active().maps().floor_or_panic(self.avatar.floor)
    }

    fn active_map_mut(&mut self) -> &mut LayeredMap {
        let floor = self.avatar.floor;
        self.active_mut().maps_mut().floor_mut_or_panic(floor)
    }

    /// Runs the active controller once, then advances the clock.
    pub fn advance_turn(&mut self) -> TurnReport {
        let mut ctx = TurnContext {
            player: self.avatar.pos,
            player_floor: self.avatar.floor,
            date: &self.date,
            config: &self.config,
            rng: self.rng.as_mut(),
        };
        let controller: &mut dyn NpcController = match self.avatar.map_type {
            MapType::Small => match &mut self.small_map {
                Some(small) => small,
                None => invariant_violation(format_args!("avatar is on a small map that is not loaded")),
            },
            MapType::Overworld => &mut self.overworld,
            MapType::Underworld => &mut self.underworld,
        };
        let report = controller.advance_turn(&mut ctx);
        self.date.advance_minutes(self.config.minutes_per_turn);
        self.turn += 1;
        report
    }

    /// Moves the avatar within the active location and refreshes what it can see.
    pub fn move_avatar(&mut self, pos: Pos, floor: Floor) {
        let old = (self.avatar.pos, self.avatar.floor);
        if let Some(map) = self.active_mut().maps_mut().floor_mut(old.1) {
            map.unset_tile_by_layer(Layer::Avatar, old.0);
        }
        self.avatar.floor = floor;
        self.place_avatar(pos);
    }

    fn place_avatar(&mut self, pos: Pos) {
        let sprite = self.reference.avatar_sprite;
        let visibility = self.config.visibility.clone();
        let map = self.active_map_mut();
        let pos = map.normalize(pos).unwrap_or_else(|| {
            invariant_violation(format_args!("avatar placed outside the map at {pos:?}"))
        });
        map.set_tile_by_layer(Layer::Avatar, pos, sprite);
        map.recompute_visibility(pos, &visibility);
        self.avatar.pos = pos;
    }

    pub fn set_torch(&mut self, lit: bool) {
        self.avatar.lighting.torch_lit = lit;
    }

    pub fn is_position_visible(&self, pos: Pos) -> bool {
        self.active_map().is_position_visible(
            pos,
            &self.date,
            self.avatar.lighting,
            &self.config.visibility,
        )
    }

    /// Builds and populates a small-map controller for `location` and moves the avatar in.
    pub fn enter_small_map(&mut self, location: &str, maps: LocationMaps, pos: Pos, floor: Floor) {
        self.clear_avatar();
        let roster = self.reference.roster(location);
        let mut small = SmallMapController::new(maps, roster);
        let ctx = TurnContext {
            player: pos,
            player_floor: floor,
            date: &self.date,
            config: &self.config,
            rng: self.rng.as_mut(),
        };
        small.populate_map_first_load(&ctx);
        info!("entering {location} with {} NPCs", small.npcs().len());
        self.small_map = Some(small);
        self.avatar.map_type = MapType::Small;
        self.avatar.floor = floor;
        self.place_avatar(pos);
    }

    /// Drops the small map and returns to a large map. Its actors are not kept.
    pub fn leave_small_map(&mut self, map_type: MapType, pos: Pos) {
        self.clear_avatar();
        self.small_map = None;
        self.switch_to(map_type, pos);
    }

    /// Swaps the active large map; the two actor lists stay separate.
    pub fn switch_large_map(&mut self, map_type: MapType, pos: Pos) {
        self.clear_avatar();
        self.switch_to(map_type, pos);
    }

    fn switch_to(&mut self, map_type: MapType, pos: Pos) {
        if !map_type.is_large() {
            invariant_violation(format_args!("cannot switch to {map_type:?} as a large map"));
        }
        info!("switching to {map_type:?}");
        self.avatar.map_type = map_type;
        self.avatar.floor = map_type.large_map_floor();
        self.large_map_mut(map_type).freshen_existing_npcs_on_map();
        self.place_avatar(pos);
    }

    fn clear_avatar(&mut self) {
        let (pos, floor) = (self.avatar.pos, self.avatar.floor);
        if let Some(map) = self.active_mut().maps_mut().floor_mut(floor) {
            map.unset_tile_by_layer(Layer::Avatar, pos);
        }
    }

    /// Every actor across both large maps and the loaded small map.
    pub fn all_actors(&self) -> impl Iterator<Item = (MapType, &Actor)> {
        let small = self.small_map.iter().flat_map(|small| small.npcs().iter());
        self.overworld
            .npcs()
            .iter()
            .map(|actor| (MapType::Overworld, actor))
            .chain(self.underworld.npcs().iter().map(|actor| (MapType::Underworld, actor)))
            .chain(small.map(|actor| (MapType::Small, actor)))
    }
}
