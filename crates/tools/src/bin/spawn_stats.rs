use anyhow::{Result, bail};
use clap::Parser;
use worldsim::spawn::{combined_odds, should_generate_tile_based_monster, spawn_probability};
use worldsim::tile::Terrain;
use worldsim::{GameDate, LargeMapConfig, SeededRng};

#[derive(Parser)]
#[command(author, version, about = "Prints expected and observed spawn rates per terrain")]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 10_000)]
    trials: u32,
    /// Overrides the base one-in-N spawn chance
    #[arg(short, long)]
    base: Option<u32>,
}

const TERRAINS: [Terrain; 7] = [
    Terrain::Plain,
    Terrain::Road,
    Terrain::Swamp,
    Terrain::Forest,
    Terrain::Mountain,
    Terrain::Water,
    Terrain::Desert,
];

fn main() -> Result<()> {
    let args = Args::parse();
    let base = args.base.unwrap_or(LargeMapConfig::default().base_spawn_one_in);
    if base == 0 {
        bail!("base spawn chance must be positive");
    }
    let mut rng = SeededRng::new(args.seed);

    println!("base 1 in {base}, {} trials, seed {}", args.trials, args.seed);
    println!(
        "{:<10} {:<6} {:>4} {:>8} {:>9} {:>9}",
        "terrain", "time", "prob", "1 in N", "expected", "observed"
    );
    for (label, date) in [("day", GameDate::at(12, 0)), ("night", GameDate::at(23, 0))] {
        for terrain in TERRAINS {
            let probability = spawn_probability(terrain, &date);
            let odds = combined_odds(base, probability);
            let spawns = (0..args.trials)
                .filter(|_| should_generate_tile_based_monster(terrain, &date, base, &mut rng))
                .count();
            let expected = odds.map_or(0.0, |n| 1.0 / f64::from(n));
            let observed = spawns as f64 / f64::from(args.trials.max(1));
            let odds_text = odds.map_or_else(|| "never".to_string(), |n| n.to_string());
            println!(
                "{:<10} {:<6} {:>4} {:>8} {:>9.4} {:>9.4}",
                format!("{terrain:?}"),
                label,
                probability,
                odds_text,
                expected,
                observed
            );
        }
    }
    Ok(())
}
