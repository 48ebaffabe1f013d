use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use verdant::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
    systems::{AgentSystem, BookkeepingSystem, GerminationSystem, GrowthSystem},
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Procedural tile-world and vegetation ecosystem simulator"
)]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/archipelago.yaml")]
    scenario: PathBuf,

    /// Override turn count (uses scenario default when omitted)
    #[arg(long)]
    turns: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in turns (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: cli.seed.unwrap_or(scenario.seed),
        frames_per_turn: scenario.frames_per_turn,
        snapshot_interval_turns: cli
            .snapshot_interval
            .unwrap_or(scenario.snapshot_interval_turns),
        snapshot_dir: cli
            .snapshot_dir
            .unwrap_or_else(|| PathBuf::from("snapshots")),
    };

    let mut engine = EngineBuilder::new(settings)
        .with_system(GerminationSystem::new())
        .with_system(AgentSystem::new())
        .with_system(GrowthSystem::new())
        .with_system(BookkeepingSystem::new())
        .build();

    let mut world = engine.generate_world(&scenario.world)?;
    let turns = scenario.turns(cli.turns);
    let summary = engine.run(&mut world, turns)?;

    println!(
        "Scenario '{}' completed after {} turns: {} of {} species alive, {} tiles vegetated, {} regenerations.",
        scenario.name,
        summary.turns,
        summary.final_species_alive,
        world.species().len(),
        world.vegetated_tiles(),
        summary.regenerations,
    );
    Ok(())
}
