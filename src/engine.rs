use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::{
    rng::{RngManager, SystemRng},
    snapshot::SnapshotWriter,
    world::{ClimateUpdate, World, WorldParams},
};

/// RNG stream used for world generation and regeneration.
const WORLDGEN_STREAM: &str = "worldgen";

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    /// Frames per simulation turn; frames between turn boundaries advance
    /// the clock only.
    pub frames_per_turn: u64,
    /// Snapshot every N turns; 0 disables snapshots.
    pub snapshot_interval_turns: u64,
    pub snapshot_dir: PathBuf,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    pub fn build(mut self) -> Engine {
        self.settings.frames_per_turn = self.settings.frames_per_turn.max(1);
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_turns,
            ),
            settings: self.settings,
            frame: 0,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
    frame: u64,
}

impl Engine {
    pub fn generate_world(&mut self, params: &WorldParams) -> Result<World> {
        let mut rng = self.rng.stream(WORLDGEN_STREAM);
        let world = World::generate(params.clone(), &mut rng)?;
        info!(
            scenario = %self.settings.scenario_name,
            size = world.size(),
            species = world.species().len(),
            "world generated"
        );
        Ok(world)
    }

    /// Advance the clock by one frame. Returns a report only on turn
    /// boundaries; intervening frames run no simulation logic.
    pub fn tick_frame(&mut self, world: &mut World) -> Result<Option<TurnReport>> {
        self.frame += 1;
        if self.frame % self.settings.frames_per_turn != 0 {
            return Ok(None);
        }
        self.run_turn(world).map(Some)
    }

    /// Run frames until the next turn boundary.
    pub fn advance_turn(&mut self, world: &mut World) -> Result<TurnReport> {
        loop {
            if let Some(report) = self.tick_frame(world)? {
                return Ok(report);
            }
        }
    }

    pub fn run(&mut self, world: &mut World, turns: u64) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for _ in 0..turns {
            let report = self.advance_turn(world)?;
            summary.turns += 1;
            if report.regenerated {
                summary.regenerations += 1;
            }
            if report.snapshot_path.is_some() {
                summary.snapshots += 1;
            }
            summary.final_species_alive = report.species_alive;
        }
        Ok(summary)
    }

    /// Live parameter change; mirrors a slider adjustment in the UI host.
    pub fn reclassify(&mut self, world: &mut World, update: ClimateUpdate) -> Result<()> {
        let mut rng = self.rng.stream(WORLDGEN_STREAM);
        world.reclassify(update, &mut rng)?;
        Ok(())
    }

    pub fn current_frame(&self) -> u64 {
        self.frame
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    fn run_turn(&mut self, world: &mut World) -> Result<TurnReport> {
        world.advance_turn();
        let turn = world.turn();
        for system in &mut self.systems {
            let ctx = SystemContext {
                turn,
                frame: self.frame,
                scenario_name: &self.settings.scenario_name,
            };
            let mut rng = self.rng.stream(system.name());
            system.run(&ctx, world, &mut rng)?;
        }
        let regenerated = if world.take_regeneration_request() {
            let mut rng = self.rng.stream(WORLDGEN_STREAM);
            world.regenerate(&mut rng);
            info!(
                turn,
                epoch = world.epoch(),
                "world regenerated after vegetation collapse"
            );
            true
        } else {
            false
        };
        let snapshot_path = self
            .snapshot_writer
            .maybe_write(world, &self.settings.scenario_name)?;
        Ok(TurnReport {
            turn,
            species_alive: world.species_alive(),
            regenerated,
            snapshot_path,
        })
    }
}

pub struct SystemContext<'a> {
    pub turn: u64,
    pub frame: u64,
    pub scenario_name: &'a str,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct TurnReport {
    pub turn: u64,
    pub species_alive: usize,
    /// True when the extinction check replaced the whole world this turn.
    pub regenerated: bool,
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub turns: u64,
    pub regenerations: u64,
    pub snapshots: u64,
    pub final_species_alive: usize,
}
