use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::world::WorldParams;

pub type SpeciesId = usize;

/// Maturity at which a plant disperses its seeds, exactly once.
pub const DISPERSAL_MATURITY: u32 = 20;
/// Plants stop maturing here.
pub const MAX_MATURITY: u32 = 100;

/// An immutable species template. A pool of these is drawn once per epoch;
/// the array index is the species identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    pub id: SpeciesId,
    pub ideal_soil: f64,
    pub fertility: f64,
    pub color: [u8; 3],
    pub maturity_rate: u64,
    pub spread_radius: usize,
}

impl Species {
    /// Chance that one banked seed of this species takes root on a tile of
    /// the given biome. Works with the biome's raw soil richness, not the
    /// tile's divided-by-8 value.
    pub fn germination_chance(&self, biome_soil: f64, tolerance: f64) -> f64 {
        let affinity = (1.0 - (self.ideal_soil - biome_soil).abs() / tolerance).max(0.0);
        affinity * affinity * self.fertility / 8.0
    }
}

/// A plant occupying a tile: the species it was germinated from plus its
/// own maturity, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VegetationInstance {
    pub species: SpeciesId,
    pub maturity: u32,
}

impl VegetationInstance {
    pub fn sprout(species: SpeciesId) -> Self {
        Self {
            species,
            maturity: 1,
        }
    }
}

/// Draw a fresh species pool, fully replacing any prior one.
pub fn generate_species<R: Rng + ?Sized>(params: &WorldParams, rng: &mut R) -> Vec<Species> {
    (0..params.num_species)
        .map(|id| {
            let color = rng.gen::<[u8; 3]>();
            let ideal_soil = rng.gen::<f64>();
            let fertility = rng.gen::<f64>() / 4.0;
            let spread_radius = ((rng.gen::<f64>() * params.max_spread_radius as f64).ceil()
                as usize)
                .max(1);
            Species {
                id,
                ideal_soil,
                fertility,
                color,
                // Fertile species mature slowly. Floored at 1 so a
                // near-zero fertility draw cannot stall maturation.
                maturity_rate: ((fertility * 100.0).round() as u64).max(1),
                spread_radius,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn species(ideal_soil: f64, fertility: f64) -> Species {
        Species {
            id: 0,
            ideal_soil,
            fertility,
            color: [0, 0, 0],
            maturity_rate: ((fertility * 100.0).round() as u64).max(1),
            spread_radius: 1,
        }
    }

    #[test]
    fn perfect_soil_match_chance() {
        // Exact ideal-soil match under full tolerance: 1^2 * 0.2 / 8.
        let chance = species(0.8, 0.2).germination_chance(0.8, 1.0);
        assert_eq!(chance, 0.025);
    }

    #[test]
    fn chance_is_zero_outside_tolerance() {
        let chance = species(0.9, 0.25).germination_chance(0.1, 0.1);
        assert_eq!(chance, 0.0);
    }

    #[test]
    fn chance_never_exceeds_fertility_over_eight() {
        let sp = species(0.5, 0.25);
        for soil in [0.0, 0.2, 0.5, 0.8] {
            assert!(sp.germination_chance(soil, 0.5) <= 0.25 / 8.0);
        }
    }

    #[test]
    fn pool_traits_stay_in_range() {
        let params = WorldParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let pool = generate_species(&params, &mut rng);
        assert_eq!(pool.len(), params.num_species);
        for (idx, sp) in pool.iter().enumerate() {
            assert_eq!(sp.id, idx);
            assert!((0.0..1.0).contains(&sp.ideal_soil));
            assert!((0.0..0.25).contains(&sp.fertility));
            assert!(sp.maturity_rate >= 1);
            assert!((1..=params.max_spread_radius).contains(&sp.spread_radius));
        }
    }

    #[test]
    fn maturity_rate_floors_at_one() {
        assert_eq!(species(0.5, 0.0).maturity_rate, 1);
        assert_eq!(species(0.5, 0.2).maturity_rate, 20);
    }
}
