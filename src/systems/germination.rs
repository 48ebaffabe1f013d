use anyhow::Result;
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::{
    biome::Biome,
    engine::{System, SystemContext},
    rng::SystemRng,
    vegetation::VegetationInstance,
    world::World,
};

/// Seeds tiles and resolves germination contention.
///
/// The first `seeding_rounds` turns of an epoch push one random species into
/// every empty land tile's bank; once those rounds are spent the survival
/// check either requests a full regeneration or the simulation switches to
/// shuffling whatever dispersal has banked.
pub struct GerminationSystem;

impl GerminationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GerminationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for GerminationSystem {
    fn name(&self) -> &str {
        "germination"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        if world.seeding_rounds_left > 0 {
            seed_and_germinate(world, true, rng);
            world.seeding_rounds_left -= 1;
            if world.seeding_rounds_left == 0 && world.below_survival_threshold() {
                debug!(
                    alive = world.species_alive(),
                    pool = world.species().len(),
                    "too few species took root; requesting regeneration"
                );
                world.request_regeneration();
            } else {
                // Randomized seeds are single-use per round.
                world.clear_seed_banks();
            }
        } else {
            seed_and_germinate(world, false, rng);
        }
        Ok(())
    }
}

fn seed_and_germinate<R: Rng + ?Sized>(world: &mut World, randomize: bool, rng: &mut R) {
    let tolerance = world.params().soil_tolerance;
    for idx in 0..world.tiles.len() {
        if world.tiles[idx].biome == Biome::Ocean || world.tiles[idx].vegetation.is_some() {
            continue;
        }
        if randomize {
            let pick = rng.gen_range(0..world.species.len());
            world.tiles[idx].seeds.push(pick);
        } else {
            world.tiles[idx].seeds.shuffle(rng);
        }
        // First qualifying seed in bank order wins the tile.
        let soil = world.tiles[idx].biome.soil_richness();
        for slot in 0..world.tiles[idx].seeds.len() {
            let candidate = world.tiles[idx].seeds[slot];
            let chance = world.species[candidate].germination_chance(soil, tolerance);
            if chance >= rng.gen::<f64>() {
                world.alive.insert(candidate);
                world.tiles[idx].vegetation = Some(VegetationInstance::sprout(candidate));
                world.stats.germinations += 1;
                break;
            }
        }
    }
}
