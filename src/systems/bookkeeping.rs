use anyhow::Result;
use tracing::debug;

use crate::{
    biome::Biome,
    engine::{System, SystemContext},
    rng::SystemRng,
    vegetation::MAX_MATURITY,
    world::World,
};

/// End-of-turn clamp pass: maturity stays within its cap and ocean tiles
/// never keep vegetation.
pub struct BookkeepingSystem;

impl BookkeepingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BookkeepingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for BookkeepingSystem {
    fn name(&self) -> &str {
        "bookkeeping"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        for tile in world.tiles.iter_mut() {
            if tile.biome == Biome::Ocean {
                tile.vegetation = None;
                continue;
            }
            if let Some(plant) = tile.vegetation.as_mut() {
                plant.maturity = plant.maturity.min(MAX_MATURITY);
            }
        }
        debug!(
            turn = ctx.turn,
            alive = world.species_alive(),
            vegetated = world.vegetated_tiles(),
            "turn complete"
        );
        Ok(())
    }
}
