pub mod biome;
pub mod climate;
pub mod engine;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod systems;
pub mod terrain;
pub mod vegetation;
pub mod world;

pub use biome::Biome;
pub use engine::{Engine, EngineBuilder, EngineSettings, RunSummary, TurnReport};
pub use scenario::{Scenario, ScenarioLoader};
pub use world::{ClimateUpdate, World, WorldParams};
