use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    vegetation::{DISPERSAL_MATURITY, MAX_MATURITY},
    world::World,
};

/// Advances plant maturity and fires the one-shot seed dispersal.
pub struct GrowthSystem;

impl GrowthSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GrowthSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for GrowthSystem {
    fn name(&self) -> &str {
        "growth"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        for idx in 0..world.tiles.len() {
            let Some(mut plant) = world.tiles[idx].vegetation else {
                continue;
            };
            if plant.maturity >= MAX_MATURITY {
                continue;
            }
            let rate = world.species[plant.species].maturity_rate;
            if ctx.turn % rate != 0 {
                continue;
            }
            plant.maturity += 1;
            world.tiles[idx].vegetation = Some(plant);
            // Exactly the maturity == 20 transition disperses; later turns
            // keep growing without re-seeding the neighborhood.
            if plant.maturity == DISPERSAL_MATURITY {
                let (x, y) = world.coords(idx);
                world.disperse_seeds(x, y, plant.species);
            }
        }
        Ok(())
    }
}
