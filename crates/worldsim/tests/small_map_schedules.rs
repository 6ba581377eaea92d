mod common;

use common::{FLOOR, LADDER_DOWN, LADDER_UP, VILLAGER, filled_map, quiet_rng, reference};
use worldsim::{
    GameDate, Layer, LocationMaps, MapType, NpcController, Pos, ScheduleOutcome, SimConfig,
    SimEvent, World,
};

fn tower_maps() -> LocationMaps {
    let reference = reference();
    let mut ground = filled_map(&reference, 8, false, FLOOR);
    ground.set_tile_by_layer(Layer::Terrain, Pos::new(4, 4), LADDER_UP);
    let mut upper = filled_map(&reference, 8, false, FLOOR);
    upper.set_tile_by_layer(Layer::Terrain, Pos::new(4, 4), LADDER_DOWN);
    let mut maps = LocationMaps::single(0, ground);
    maps.insert_floor(1, upper);
    maps
}

fn world_in_tower(hour: u8, minute: u8) -> World {
    let reference = reference();
    let overworld = filled_map(&reference, 32, true, common::GRASS);
    let underworld = filled_map(&reference, 32, true, common::GRASS);
    let mut world = World::new(
        SimConfig::default(),
        reference,
        overworld,
        underworld,
        Pos::new(5, 5),
        GameDate::at(hour, minute),
        quiet_rng(),
    );
    world.enter_small_map("tower", tower_maps(), Pos::new(0, 7), 0);
    world
}

#[test]
fn fixed_npc_stays_put_before_its_next_entry() {
    let mut world = world_in_tower(8, 0);
    assert_eq!(world.active().npcs().len(), 1);
    for _ in 0..5 {
        let report = world.advance_turn();
        assert!(report.events.is_empty());
    }
    let keeper = &world.active().npcs()[0];
    assert_eq!((keeper.pos(), keeper.floor()), (Pos::new(2, 2), 0));
    let small = world.small_map().expect("tower is loaded");
    assert_eq!(small.last_outcomes(), &[ScheduleOutcome::Holding]);
    let map = world.active_map();
    assert_eq!(map.tile_by_layer(Layer::MapUnits, Pos::new(2, 2)), Some(VILLAGER));
}

#[test]
fn noon_entry_sends_keeper_up_the_ladder() {
    let mut world = world_in_tower(11, 58);
    world.advance_turn();
    assert_eq!(world.active().npcs()[0].pos(), Pos::new(2, 2));

    let mut climbed = false;
    for _ in 0..30 {
        let report = world.advance_turn();
        climbed |= report.events.iter().any(|event| {
            matches!(event, SimEvent::FloorChanged { from_floor: 0, to_floor: 1, .. })
        });
    }
    assert!(climbed);
    let keeper = &world.active().npcs()[0];
    assert_eq!((keeper.pos(), keeper.floor()), (Pos::new(6, 6), 1));
    let small = world.small_map().expect("tower is loaded");
    assert_eq!(small.last_outcomes(), &[ScheduleOutcome::Holding]);

    let upper = small.maps().floor_or_panic(1);
    assert_eq!(upper.tile_by_layer(Layer::MapUnits, Pos::new(6, 6)), Some(VILLAGER));
    assert_eq!(world.active_map().tile_by_layer(Layer::MapUnits, Pos::new(2, 2)), None);
}

#[test]
fn leaving_the_tower_forgets_its_npcs() {
    let mut world = world_in_tower(8, 0);
    world.leave_small_map(MapType::Overworld, Pos::new(6, 5));
    assert!(world.small_map().is_none());
    assert!(world.active().npcs().is_empty());
    assert_eq!(world.avatar().map_type, MapType::Overworld);
}
