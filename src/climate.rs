//! Biome classification.
//!
//! Two deliberately distinct formulas exist: the generation-time pass uses
//! raw temperature/precipitation ratios, while the live pass (epoch start
//! and parameter changes) adjusts temperature for elevation and weights
//! precipitation by the global density. The two are intentionally not
//! unified.

use crate::biome::Biome;
use crate::world::WorldParams;

/// Generation-time classification: ocean override, then raw zone ratios.
pub fn initial_classification(
    elevation: u32,
    temperature: u32,
    precipitation: u32,
    params: &WorldParams,
) -> Biome {
    if elevation as i64 <= params.ocean_level {
        return Biome::Ocean;
    }
    let temp_zone = (temperature as u64 * 6 / params.max_temperature as u64).min(5) as usize;
    let moisture_zone =
        (precipitation as u64 * 6 / params.max_precipitation as u64).min(5) as usize;
    Biome::from_zones(temp_zone, moisture_zone)
}

/// Live classification with elevation-adjusted temperature and
/// density-weighted precipitation. Returns the biome and the tile's soil
/// richness (biome soil richness divided by 8, so always in [0, 0.1]).
pub fn classify(
    elevation: u32,
    temperature: u32,
    precipitation: u32,
    params: &WorldParams,
) -> (Biome, f64) {
    if elevation as i64 <= params.ocean_level {
        return (Biome::Ocean, 0.0);
    }

    let max_temp = params.max_temperature as f64;
    let temp_step = params.max_temp_step as f64;

    // Higher ground runs colder, capped at +/- max_temp_step around the
    // latitude temperature.
    let relief = 2.0 * temp_step * (elevation as i64 - params.ocean_level) as f64
        / params.max_elevation as f64
        - temp_step;
    let adjusted = (temperature as f64 - round_half_up(relief)).clamp(0.0, max_temp);

    let banded = ((adjusted / max_temp) * (params.high_temp as f64 - params.low_temp as f64)
        + params.low_temp as f64)
        .floor();
    let temp_zone = (banded * 6.0 / max_temp).floor().clamp(0.0, 5.0) as usize;

    let ratio = precipitation as f64 / params.max_precipitation as f64;
    let weighted = (params.precipitation_density + ratio) / 2.0 * precipitation as f64;
    let moisture_zone = (weighted * 6.0 / params.max_precipitation as f64)
        .floor()
        .clamp(0.0, 5.0) as usize;

    let biome = Biome::from_zones(temp_zone, moisture_zone);
    (biome, biome.soil_richness() / 8.0)
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> WorldParams {
        WorldParams::default()
    }

    #[test]
    fn submerged_tiles_are_ocean_in_both_passes() {
        let params = params();
        let level = params.ocean_level as u32;
        assert_eq!(
            initial_classification(level, 50, 50, &params),
            Biome::Ocean
        );
        let (biome, soil) = classify(level, 50, 50, &params);
        assert_eq!(biome, Biome::Ocean);
        assert_eq!(soil, 0.0);
        assert_ne!(
            initial_classification(level + 1, 50, 50, &params),
            Biome::Ocean
        );
    }

    #[test]
    fn negative_ocean_level_drains_the_map() {
        let mut params = params();
        params.ocean_level = -1;
        assert_ne!(initial_classification(0, 50, 50, &params), Biome::Ocean);
        let (biome, _) = classify(0, 50, 50, &params);
        assert_ne!(biome, Biome::Ocean);
    }

    #[test]
    fn zone_indices_clamp_at_extremes() {
        let params = params();
        // Max temperature and precipitation would index zone 6 of a 6-wide
        // table; both clamp to 5.
        let biome = initial_classification(
            params.max_elevation,
            params.max_temperature,
            params.max_precipitation,
            &params,
        );
        assert_eq!(biome, Biome::from_zones(5, 5));
    }

    #[test]
    fn elevation_cools_the_live_classification() {
        let mut params = params();
        params.ocean_level = 0;
        let lowland = classify(1, params.max_temperature, 15, &params).0;
        let highland = classify(params.max_elevation, params.max_temperature, 15, &params).0;
        // The lowland sits a full max_temp_step warmer than its latitude,
        // the summit a full step colder.
        assert_ne!(lowland, highland);
    }

    #[test]
    fn live_soil_richness_is_an_eighth_of_the_biome_value() {
        let params = params();
        let (biome, soil) = classify(params.max_elevation, 60, 80, &params);
        assert_eq!(soil, biome.soil_richness() / 8.0);
        assert!((0.0..=0.1).contains(&soil));
    }

    #[test]
    fn passes_disagree_when_density_skews_moisture() {
        let mut params = params();
        params.ocean_level = 0;
        params.precipitation_density = 0.0;
        // Raw ratio puts 90/100 precipitation in zone 5; the density-weighted
        // live formula drags it down.
        let raw = initial_classification(1, 50, 90, &params);
        let (live, _) = classify(1, 50, 90, &params);
        assert_ne!(raw, live);
    }
}
