mod common;

use common::{AVATAR, GRASS, ORC, filled_map, reference};
use worldsim::{
    Actor, GameDate, Layer, MONSTER_CAP, MapType, Pos, ScriptedRng, SeededRng, SimConfig, SimEvent,
    World,
};

fn eager_world(seed: u64) -> World {
    let reference = reference();
    let mut config = SimConfig::default();
    config.large_map.base_spawn_one_in = 1;
    config.large_map.enemy_move_chance_percent = 100;
    let overworld = filled_map(&reference, 64, true, GRASS);
    let underworld = filled_map(&reference, 64, true, GRASS);
    World::new(
        config,
        reference,
        overworld,
        underworld,
        Pos::new(32, 32),
        GameDate::at(23, 0),
        Box::new(SeededRng::new(seed)),
    )
}

#[test]
fn enemy_population_never_exceeds_cap() {
    let mut world = eager_world(99);
    let mut peak = 0;
    for _ in 0..400 {
        world.advance_turn();
        let count = world.active().npcs().len();
        assert!(count <= MONSTER_CAP, "{count} actors on the overworld");
        peak = peak.max(count);
    }
    assert_eq!(peak, MONSTER_CAP);

    let before = world.active().npcs().len();
    let report = world.advance_turn();
    assert_eq!(report.spawns(), 0);
    assert_eq!(world.active().npcs().len(), before);
}

#[test]
fn adjacent_enemy_holds_its_ground() {
    let mut world = common::grass_world(12, Box::new(ScriptedRng::constant(0)));
    let orc = reference().species("orc").cloned().expect("orc species");
    world.large_map_mut(MapType::Overworld).add_actor(Actor::enemy(orc, Pos::new(21, 20), 0));

    let report = world.advance_turn();
    assert_eq!(report.moves(), 0);
    assert_eq!(world.active().npcs()[0].pos(), Pos::new(21, 20));
}

#[test]
fn distant_enemy_closes_in_and_is_stamped() {
    let mut world = common::grass_world(12, common::quiet_rng());
    let orc = reference().species("orc").cloned().expect("orc species");
    world.large_map_mut(MapType::Overworld).add_actor(Actor::enemy(orc, Pos::new(26, 20), 0));

    let mut moves = 0;
    for _ in 0..10 {
        let report = world.advance_turn();
        moves += report.moves();
    }
    // The quiet rng never passes the move roll.
    assert_eq!(moves, 0);

    let mut world = common::grass_world(12, Box::new(ScriptedRng::constant(1)));
    let orc = reference().species("orc").cloned().expect("orc species");
    world.large_map_mut(MapType::Overworld).add_actor(Actor::enemy(orc, Pos::new(26, 20), 0));
    let report = world.advance_turn();
    assert!(report.events.iter().any(|event| matches!(
        event,
        SimEvent::Moved { from, to, .. } if *from == Pos::new(26, 20) && *to == Pos::new(25, 20)
    )));
    let map = world.active_map();
    assert_eq!(map.tile_by_layer(Layer::MapUnits, Pos::new(25, 20)), Some(ORC));
    assert_eq!(map.tile_by_layer(Layer::Avatar, Pos::new(20, 20)), Some(AVATAR));
}

#[test]
fn far_enemies_are_dropped_when_the_avatar_moves_away() {
    let mut world = common::grass_world(12, common::quiet_rng());
    let orc = reference().species("orc").cloned().expect("orc species");
    world.large_map_mut(MapType::Overworld).add_actor(Actor::enemy(orc, Pos::new(22, 22), 0));
    world.move_avatar(Pos::new(52, 52), 0);

    let report = world.advance_turn();
    assert!(report.events.iter().any(|event| matches!(event, SimEvent::Dropped { .. })));
    assert!(world.active().npcs().is_empty());
}
