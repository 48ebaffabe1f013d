use anyhow::Result;
use rand::Rng;

use crate::{
    biome::Biome,
    engine::{System, SystemContext},
    rng::SystemRng,
    world::{Agent, World},
};

/// Random-walking grazers. Each turn an agent steps at most one tile per
/// axis, refuses to enter the ocean, and strips whatever vegetation grows
/// where it lands.
pub struct AgentSystem;

impl AgentSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AgentSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AgentSystem {
    fn name(&self) -> &str {
        "agents"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let size = world.size();
        for slot in 0..world.agents.len() {
            let Agent { x, y } = world.agents[slot];
            let mut nx = x;
            let mut ny = y;
            // Per axis: ~2/3 chance to step, coin flip for direction.
            if rng.gen::<f64>() > 0.33 {
                nx = if rng.gen::<f64>() < 0.5 {
                    (x + 1) % size
                } else {
                    (x + size - 1) % size
                };
            }
            if rng.gen::<f64>() > 0.33 {
                ny = if rng.gen::<f64>() < 0.5 {
                    (y + 1) % size
                } else {
                    (y + size - 1) % size
                };
            }
            // An ocean candidate cancels the whole move.
            if world.tile(nx, ny).biome == Biome::Ocean {
                nx = x;
                ny = y;
            }
            world.agents[slot] = Agent { x: nx, y: ny };
            world.remove_vegetation(nx, ny);
        }
        Ok(())
    }
}
