use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    biome::Biome,
    climate,
    terrain::TerrainField,
    vegetation::{self, Species, SpeciesId, VegetationInstance},
};

fn default_map_size() -> usize {
    64
}

fn default_max_elevation() -> u32 {
    200
}

fn default_elevation_jitter() -> u32 {
    15
}

fn default_random_rounds() -> u32 {
    2
}

fn default_max_temperature() -> u32 {
    100
}

fn default_max_temp_step() -> u32 {
    25
}

fn default_low_temp() -> u32 {
    10
}

fn default_high_temp() -> u32 {
    80
}

fn default_max_precipitation() -> u32 {
    100
}

fn default_precipitation_jitter() -> u32 {
    10
}

fn default_precipitation_density() -> f64 {
    0.5
}

fn default_ocean_level() -> i64 {
    70
}

fn default_num_species() -> usize {
    20
}

fn default_seeding_rounds() -> u32 {
    3
}

fn default_soil_tolerance() -> f64 {
    0.1
}

fn default_max_spread_radius() -> usize {
    4
}

fn default_num_agents() -> usize {
    3
}

/// Everything `World::generate` needs. Defaults match the stock
/// archipelago tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldParams {
    #[serde(default = "default_map_size")]
    pub map_size: usize,
    #[serde(default = "default_max_elevation")]
    pub max_elevation: u32,
    #[serde(default = "default_elevation_jitter")]
    pub elevation_jitter: u32,
    #[serde(default = "default_random_rounds")]
    pub random_rounds: u32,
    #[serde(default = "default_max_temperature")]
    pub max_temperature: u32,
    #[serde(default = "default_max_temp_step")]
    pub max_temp_step: u32,
    #[serde(default = "default_low_temp")]
    pub low_temp: u32,
    #[serde(default = "default_high_temp")]
    pub high_temp: u32,
    /// Row with the warmest latitude band; defaults to the map's middle.
    #[serde(default)]
    pub equator_row: Option<usize>,
    #[serde(default = "default_max_precipitation")]
    pub max_precipitation: u32,
    #[serde(default = "default_precipitation_jitter")]
    pub precipitation_jitter: u32,
    #[serde(default = "default_precipitation_density")]
    pub precipitation_density: f64,
    /// Tiles at or below this elevation are ocean. May be negative to
    /// produce a world without oceans.
    #[serde(default = "default_ocean_level")]
    pub ocean_level: i64,
    #[serde(default = "default_num_species")]
    pub num_species: usize,
    #[serde(default = "default_seeding_rounds")]
    pub seeding_rounds: u32,
    #[serde(default = "default_soil_tolerance")]
    pub soil_tolerance: f64,
    #[serde(default = "default_max_spread_radius")]
    pub max_spread_radius: usize,
    #[serde(default = "default_num_agents")]
    pub num_agents: usize,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            map_size: default_map_size(),
            max_elevation: default_max_elevation(),
            elevation_jitter: default_elevation_jitter(),
            random_rounds: default_random_rounds(),
            max_temperature: default_max_temperature(),
            max_temp_step: default_max_temp_step(),
            low_temp: default_low_temp(),
            high_temp: default_high_temp(),
            equator_row: None,
            max_precipitation: default_max_precipitation(),
            precipitation_jitter: default_precipitation_jitter(),
            precipitation_density: default_precipitation_density(),
            ocean_level: default_ocean_level(),
            num_species: default_num_species(),
            seeding_rounds: default_seeding_rounds(),
            soil_tolerance: default_soil_tolerance(),
            max_spread_radius: default_max_spread_radius(),
            num_agents: default_num_agents(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WorldParamsError {
    #[error("map size {0} must be a power of two no smaller than 4")]
    MapSize(usize),
    #[error("{0} must be greater than zero")]
    ZeroBound(&'static str),
    #[error("temperature range {low}..{high} must be ordered and within 0..={max}")]
    TemperatureRange { low: u32, high: u32, max: u32 },
    #[error("equator row {row} lies outside a map of size {size}")]
    EquatorRow { row: usize, size: usize },
    #[error("at least one vegetation species is required")]
    NoSpecies,
    #[error("max spread radius must be at least 1")]
    SpreadRadius,
    #[error("soil tolerance must be positive, got {0}")]
    SoilTolerance(f64),
}

impl WorldParams {
    pub fn equator(&self) -> usize {
        self.equator_row.unwrap_or(self.map_size / 2)
    }

    pub fn validate(&self) -> Result<(), WorldParamsError> {
        if self.map_size < 4 || !self.map_size.is_power_of_two() {
            return Err(WorldParamsError::MapSize(self.map_size));
        }
        if self.max_elevation == 0 {
            return Err(WorldParamsError::ZeroBound("max_elevation"));
        }
        if self.max_temperature == 0 {
            return Err(WorldParamsError::ZeroBound("max_temperature"));
        }
        if self.max_precipitation == 0 {
            return Err(WorldParamsError::ZeroBound("max_precipitation"));
        }
        if self.low_temp > self.high_temp || self.high_temp > self.max_temperature {
            return Err(WorldParamsError::TemperatureRange {
                low: self.low_temp,
                high: self.high_temp,
                max: self.max_temperature,
            });
        }
        if let Some(row) = self.equator_row {
            if row > self.map_size {
                return Err(WorldParamsError::EquatorRow {
                    row,
                    size: self.map_size,
                });
            }
        }
        if self.num_species == 0 {
            return Err(WorldParamsError::NoSpecies);
        }
        if self.max_spread_radius == 0 {
            return Err(WorldParamsError::SpreadRadius);
        }
        if self.soil_tolerance <= 0.0 {
            return Err(WorldParamsError::SoilTolerance(self.soil_tolerance));
        }
        Ok(())
    }
}

/// One grid cell. Terrain fields are fixed for the epoch; biome and soil
/// richness are re-derived when climate parameters change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub elevation: u32,
    pub precipitation: u32,
    pub temperature: u32,
    pub biome: Biome,
    pub soil_richness: f64,
    pub vegetation: Option<VegetationInstance>,
    pub seeds: Vec<SpeciesId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub x: usize,
    pub y: usize,
}

/// Per-epoch counters, reset whenever a new species pool is drawn.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    pub germinations: u64,
    pub removals: u64,
}

/// A live climate-parameter change. Re-derives biome and soil without
/// regenerating the terrain fields.
#[derive(Debug, Clone, Copy)]
pub enum ClimateUpdate {
    OceanLevel(i64),
    TempRange { low: u32, high: u32 },
    PrecipitationDensity(f64),
}

pub struct World {
    pub(crate) params: WorldParams,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) species: Vec<Species>,
    pub(crate) agents: Vec<Agent>,
    /// Species that germinated at least once this epoch.
    pub(crate) alive: BTreeSet<SpeciesId>,
    /// Remaining randomized seeding rounds before the survival check.
    pub(crate) seeding_rounds_left: u32,
    pub(crate) stats: EpochStats,
    turn: u64,
    epoch: u64,
    regenerate_requested: bool,
}

impl World {
    pub fn generate<R: Rng + ?Sized>(
        params: WorldParams,
        rng: &mut R,
    ) -> Result<Self, WorldParamsError> {
        params.validate()?;
        let mut world = Self {
            seeding_rounds_left: params.seeding_rounds,
            params,
            tiles: Vec::new(),
            species: Vec::new(),
            agents: Vec::new(),
            alive: BTreeSet::new(),
            stats: EpochStats::default(),
            turn: 0,
            epoch: 0,
            regenerate_requested: false,
        };
        world.regenerate(rng);
        Ok(world)
    }

    /// Replace the entire epoch: fresh terrain, classification, species
    /// pool, and agents. The turn counter carries over.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let size = self.params.map_size;
        let field = TerrainField::generate(&self.params, rng);
        self.tiles = (0..size * size)
            .map(|idx| {
                let elevation = field.elevation[idx];
                let precipitation = field.precipitation[idx];
                let temperature = field.temperature[idx];
                let biome = climate::initial_classification(
                    elevation,
                    temperature,
                    precipitation,
                    &self.params,
                );
                Tile {
                    elevation,
                    precipitation,
                    temperature,
                    biome,
                    soil_richness: 0.0,
                    vegetation: None,
                    seeds: Vec::new(),
                }
            })
            .collect();
        self.agents = (0..self.params.num_agents)
            .map(|_| Agent {
                x: rng.gen_range(0..size),
                y: rng.gen_range(0..size),
            })
            .collect();
        self.begin_epoch(rng);
        self.epoch += 1;
        debug!(epoch = self.epoch, size, "terrain generated");
    }

    /// Apply a live parameter change (the slider path): biome and soil are
    /// re-derived from the existing fields and the species epoch restarts.
    /// Agents stay where they are.
    pub fn reclassify<R: Rng + ?Sized>(
        &mut self,
        update: ClimateUpdate,
        rng: &mut R,
    ) -> Result<(), WorldParamsError> {
        let mut params = self.params.clone();
        match update {
            ClimateUpdate::OceanLevel(level) => params.ocean_level = level,
            ClimateUpdate::TempRange { low, high } => {
                params.low_temp = low;
                params.high_temp = high;
            }
            ClimateUpdate::PrecipitationDensity(density) => {
                params.precipitation_density = density;
            }
        }
        params.validate()?;
        self.params = params;
        self.begin_epoch(rng);
        Ok(())
    }

    /// Live classification pass plus a fresh species pool; clears all
    /// vegetation, seed banks, and the alive set, and resets the retry
    /// counter.
    fn begin_epoch<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for tile in &mut self.tiles {
            tile.vegetation = None;
            tile.seeds.clear();
            let (biome, soil) = climate::classify(
                tile.elevation,
                tile.temperature,
                tile.precipitation,
                &self.params,
            );
            tile.biome = biome;
            tile.soil_richness = soil;
        }
        self.species = vegetation::generate_species(&self.params, rng);
        self.alive.clear();
        self.seeding_rounds_left = self.params.seeding_rounds;
        self.regenerate_requested = false;
        self.stats = EpochStats::default();
    }

    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    pub fn size(&self) -> usize {
        self.params.map_size
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn advance_turn(&mut self) {
        self.turn += 1;
    }

    pub fn tile(&self, x: usize, y: usize) -> &Tile {
        &self.tiles[self.index(x, y)]
    }

    pub fn tile_mut(&mut self, x: usize, y: usize) -> &mut Tile {
        let idx = self.index(x, y);
        &mut self.tiles[idx]
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn species_mut(&mut self, id: SpeciesId) -> Option<&mut Species> {
        self.species.get_mut(id)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn species_alive(&self) -> usize {
        self.alive.len()
    }

    pub fn stats(&self) -> &EpochStats {
        &self.stats
    }

    pub fn vegetated_tiles(&self) -> usize {
        self.tiles.iter().filter(|t| t.vegetation.is_some()).count()
    }

    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.params.map_size + x
    }

    pub fn coords(&self, idx: usize) -> (usize, usize) {
        (idx % self.params.map_size, idx / self.params.map_size)
    }

    /// Fewer than 30% of the pool germinated during the randomized rounds.
    pub(crate) fn below_survival_threshold(&self) -> bool {
        (self.alive.len() as f64) < self.params.num_species as f64 * 0.3
    }

    pub(crate) fn request_regeneration(&mut self) {
        self.regenerate_requested = true;
    }

    pub fn regeneration_requested(&self) -> bool {
        self.regenerate_requested
    }

    pub(crate) fn take_regeneration_request(&mut self) -> bool {
        std::mem::take(&mut self.regenerate_requested)
    }

    pub(crate) fn clear_seed_banks(&mut self) {
        for tile in &mut self.tiles {
            tile.seeds.clear();
        }
    }

    /// Tile indices within Chebyshev distance `radius` of `(x, y)`,
    /// inclusive of the center, wrapping toroidally. `(2r+1)^2` entries.
    pub fn chebyshev_neighborhood(&self, x: usize, y: usize, radius: usize) -> Vec<usize> {
        let size = self.params.map_size as isize;
        let r = radius as isize;
        let mut cells = Vec::with_capacity((2 * radius + 1) * (2 * radius + 1));
        for dx in -r..=r {
            for dy in -r..=r {
                let nx = (x as isize + dx).rem_euclid(size) as usize;
                let ny = (y as isize + dy).rem_euclid(size) as usize;
                cells.push(ny * size as usize + nx);
            }
        }
        cells
    }

    /// One seed per neighborhood tile, the mirror image of removal.
    pub(crate) fn disperse_seeds(&mut self, x: usize, y: usize, species: SpeciesId) {
        let radius = self.species[species].spread_radius;
        for idx in self.chebyshev_neighborhood(x, y, radius) {
            self.tiles[idx].seeds.push(species);
        }
    }

    /// Clear the tile's vegetation. A plant that had already dispersed
    /// (maturity >= 20) takes one matching seed back from every tile in its
    /// spread neighborhood, first match only.
    pub fn remove_vegetation(&mut self, x: usize, y: usize) -> Option<VegetationInstance> {
        let idx = self.index(x, y);
        let removed = self.tiles[idx].vegetation.take()?;
        if removed.maturity >= vegetation::DISPERSAL_MATURITY {
            let radius = self.species[removed.species].spread_radius;
            for neighbor in self.chebyshev_neighborhood(x, y, radius) {
                let seeds = &mut self.tiles[neighbor].seeds;
                if let Some(found) = seeds.iter().position(|&s| s == removed.species) {
                    seeds.remove(found);
                }
            }
        }
        self.stats.removals += 1;
        Some(removed)
    }

    pub fn snapshot(&self, scenario: &str) -> WorldSnapshot {
        let size = self.params.map_size;
        let tiles = self
            .tiles
            .iter()
            .enumerate()
            .map(|(idx, tile)| TileSnapshot {
                x: idx % size,
                y: idx / size,
                elevation: tile.elevation,
                precipitation: tile.precipitation,
                temperature: tile.temperature,
                biome: tile.biome,
                soil_richness: tile.soil_richness,
                vegetation: tile.vegetation,
            })
            .collect();
        WorldSnapshot {
            scenario: scenario.to_string(),
            turn: self.turn,
            epoch: self.epoch,
            map_size: size,
            species_alive: self.alive.len(),
            germinations: self.stats.germinations,
            removals: self.stats.removals,
            species: self.species.clone(),
            agents: self.agents.clone(),
            tiles,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub x: usize,
    pub y: usize,
    pub elevation: u32,
    pub precipitation: u32,
    pub temperature: u32,
    pub biome: Biome,
    pub soil_richness: f64,
    pub vegetation: Option<VegetationInstance>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub scenario: String,
    pub turn: u64,
    pub epoch: u64,
    pub map_size: usize,
    pub species_alive: usize,
    pub germinations: u64,
    pub removals: u64,
    pub species: Vec<Species>,
    pub agents: Vec<Agent>,
    pub tiles: Vec<TileSnapshot>,
}
