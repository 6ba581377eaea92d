mod common;

use worldsim::{Pos, SeededRng};

fn run_hash(seed: u64, turns: usize) -> u64 {
    let mut world = common::grass_world(21, Box::new(SeededRng::new(seed)));
    for turn in 0..turns {
        if turn % 10 == 9 {
            let pos = world.avatar().pos;
            world.move_avatar(Pos::new(pos.x + 1, pos.y), 0);
        }
        world.advance_turn();
    }
    world.snapshot_hash()
}

#[test]
fn test_determinism_identical_seeds_produce_same_hash() {
    assert_eq!(run_hash(12345, 300), run_hash(12345, 300), "identical runs must hash identically");
}

#[test]
fn test_determinism_different_seeds_produce_different_hashes() {
    assert_ne!(
        run_hash(123, 300),
        run_hash(456, 300),
        "different seeds should spawn and move enemies differently"
    );
}

#[test]
fn test_determinism_hash_changes_with_world_state() {
    let mut world = common::grass_world(12, common::quiet_rng());
    let before = world.snapshot_hash();
    world.set_torch(true);
    assert_ne!(before, world.snapshot_hash());
}
