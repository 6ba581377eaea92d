use anyhow::{Result, bail};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use std::collections::BTreeSet;
use std::sync::Arc;
use worldsim::{
    Direction, GameDate, Layer, LayeredMap, MONSTER_CAP, Pos, ReferenceData, SeededRng, SimConfig,
    World,
};

const REFERENCE: &str = r#"{
    "tiles": [
        { "index": 1, "name": "grass", "walking_passable": true, "land_enemy_passable": true },
        { "index": 2, "name": "road", "terrain": "Road", "walking_passable": true, "land_enemy_passable": true },
        { "index": 3, "name": "swamp", "terrain": "Swamp", "walking_passable": true, "land_enemy_passable": true, "speed_factor": 2 },
        { "index": 5, "name": "mountains", "terrain": "Mountain", "blocks_light": true },
        { "index": 6, "name": "water", "terrain": "Water", "boat_passable": true, "water_enemy_passable": true },
        { "index": 100, "name": "orc" },
        { "index": 101, "name": "sea serpent" },
        { "index": 103, "name": "avatar" }
    ],
    "enemies": [
        { "name": "orc", "sprite": 100, "hit_points": 20, "spawn_weights": { "land": 10 } },
        { "name": "sea serpent", "sprite": 101, "habitat": "Water", "hit_points": 40, "spawn_weights": { "water": 10 } }
    ],
    "avatar_sprite": 103
}"#;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    turns: u32,
    #[arg(long, default_value_t = 64)]
    size: usize,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn random_map(rng: &mut ChaCha8Rng, reference: &ReferenceData, size: usize) -> LayeredMap {
    let terrain: Vec<_> =
        (0..size * size).map(|_| choose(rng, &[1, 1, 1, 1, 2, 3, 5, 6])).collect();
    LayeredMap::from_terrain(size, size, true, Arc::clone(&reference.tiles), &terrain)
}

fn check_invariants(world: &World) -> Result<()> {
    let controller = world.active();
    if controller.npcs().len() > MONSTER_CAP {
        bail!("Invariant failed: {} actors exceed the cap", controller.npcs().len());
    }
    let map = world.active_map();
    let mut seen = BTreeSet::new();
    for actor in controller.npcs().iter().filter(|actor| actor.is_visible()) {
        if !seen.insert((actor.floor(), actor.pos())) {
            bail!("Invariant failed: two actors share {:?}", actor.pos());
        }
        let Some(tile) = map.terrain_tile(actor.pos()) else {
            bail!("Invariant failed: actor outside the map at {:?}", actor.pos());
        };
        if !actor.can_move_onto(tile) {
            bail!("Invariant failed: {} stands on {}", actor.name(), tile.name);
        }
        if map.tile_by_layer(Layer::MapUnits, actor.pos()) != Some(actor.sprite()) {
            bail!("Invariant failed: {} is not stamped at {:?}", actor.name(), actor.pos());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    println!("Starting fuzz harness on seed {} for {} turns...", args.seed, args.turns);

    let reference = Arc::new(ReferenceData::from_json(REFERENCE)?);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let overworld = random_map(&mut rng, &reference, args.size);
    let underworld = random_map(&mut rng, &reference, args.size);
    let start = Pos::new(args.size as i32 / 2, args.size as i32 / 2);
    let hour = choose(&mut rng, &[0u8, 6, 12, 18, 22]);
    let mut world = World::new(
        SimConfig::default(),
        reference,
        overworld,
        underworld,
        start,
        GameDate::at(hour, 0),
        Box::new(SeededRng::new(args.seed)),
    );

    let mut spawned = 0;
    for _ in 0..args.turns {
        let avatar = *world.avatar();
        let dir = choose(&mut rng, &Direction::ALL);
        world.move_avatar(avatar.pos.offset(dir), avatar.floor);
        let report = world.advance_turn();
        spawned += report.spawns();
        check_invariants(&world)?;
    }

    println!(
        "Fuzz complete: {} turns, {} spawned, {} alive, hash {}",
        world.turn(),
        spawned,
        world.active().npcs().len(),
        world.snapshot_hash()
    );
    Ok(())
}
