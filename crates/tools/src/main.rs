use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use worldsim::{
    Direction, GameDate, Layer, LayeredMap, Pos, ReferenceData, SeededRng, SimConfig, TileIndex,
    TimeOfDay, World,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the scenario JSON file to run
    #[arg(short, long)]
    scenario: PathBuf,
    /// Number of turns to simulate
    #[arg(short, long, default_value_t = 100)]
    turns: u32,
    /// Overrides the scenario's seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct MapSpec {
    width: usize,
    height: usize,
    fill: TileIndex,
    #[serde(default)]
    patches: Vec<Patch>,
}

#[derive(Debug, Deserialize)]
struct Patch {
    pos: Pos,
    tile: TileIndex,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    /// Reference data, relative to the scenario file.
    reference: PathBuf,
    #[serde(default)]
    config: Option<PathBuf>,
    seed: u64,
    start: TimeOfDay,
    overworld: MapSpec,
    underworld: MapSpec,
    avatar: Pos,
    /// Avatar steps, one per turn, repeated for the whole run.
    #[serde(default)]
    walk: Vec<Direction>,
}

impl MapSpec {
    fn build(&self, reference: &ReferenceData) -> Result<LayeredMap> {
        if self.width == 0 || self.height == 0 {
            bail!("map dimensions must be positive, got {}x{}", self.width, self.height);
        }
        if !reference.tiles.contains(self.fill) {
            bail!("fill tile {} is not in the reference tile table", self.fill);
        }
        let mut map = LayeredMap::from_terrain(
            self.width,
            self.height,
            true,
            Arc::clone(&reference.tiles),
            &vec![self.fill; self.width * self.height],
        );
        for patch in &self.patches {
            if !map.in_bounds(patch.pos) || !reference.tiles.contains(patch.tile) {
                bail!("patch {patch:?} is outside the map or uses an unknown tile");
            }
            map.set_tile_by_layer(Layer::Terrain, patch.pos, patch.tile);
        }
        Ok(map)
    }
}

fn load_world(path: &Path, seed_override: Option<u64>) -> Result<(World, Vec<Direction>)> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
    let scenario: Scenario =
        serde_json::from_str(&data).with_context(|| "Failed to deserialize scenario JSON")?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let reference_path = base.join(&scenario.reference);
    let reference = ReferenceData::load(&reference_path)
        .with_context(|| format!("Failed to load reference data: {}", reference_path.display()))?;
    let config = match &scenario.config {
        Some(config) => {
            let config_path = base.join(config);
            SimConfig::load(&config_path)
                .with_context(|| format!("Failed to load config: {}", config_path.display()))?
        }
        None => SimConfig::default(),
    };

    let overworld = scenario.overworld.build(&reference).context("Invalid overworld")?;
    let underworld = scenario.underworld.build(&reference).context("Invalid underworld")?;
    let seed = seed_override.unwrap_or(scenario.seed);
    info!("running scenario {} with seed {seed}", path.display());
    let world = World::new(
        config,
        Arc::new(reference),
        overworld,
        underworld,
        scenario.avatar,
        GameDate::at(scenario.start.hour, scenario.start.minute),
        Box::new(SeededRng::new(seed)),
    );
    Ok((world, scenario.walk))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let (mut world, walk) = load_world(&args.scenario, args.seed)?;

    for turn in 0..args.turns as usize {
        if let Some(dir) = walk.get(turn % walk.len().max(1)) {
            let avatar = *world.avatar();
            world.move_avatar(avatar.pos.offset(*dir), avatar.floor);
        }
        let report = world.advance_turn();
        let date = world.date();
        println!(
            "turn {:>4} {:02}:{:02} avatar {:?} actors {:>2} moves {:>2} spawns {}",
            world.turn(),
            date.hour,
            date.minute,
            world.avatar().pos,
            world.active().npcs().len(),
            report.moves(),
            report.spawns(),
        );
    }

    println!("Run complete.");
    println!("Final Turn: {}", world.turn());
    println!("Snapshot Hash: {}", world.snapshot_hash());

    Ok(())
}
