use rand::Rng;

use crate::world::WorldParams;

/// Generated elevation/precipitation/temperature grids, row-major,
/// `map_size * map_size` entries each. Indices wrap toroidally.
pub struct TerrainField {
    pub elevation: Vec<u32>,
    pub precipitation: Vec<u32>,
    pub temperature: Vec<u32>,
    size: usize,
}

impl TerrainField {
    pub fn generate<R: Rng + ?Sized>(params: &WorldParams, rng: &mut R) -> Self {
        let size = params.map_size;
        let elevation = displace(
            size,
            params.max_elevation,
            params.elevation_jitter,
            params.random_rounds,
            rng,
        );
        let precipitation = displace(
            size,
            params.max_precipitation,
            params.precipitation_jitter,
            params.random_rounds,
            rng,
        );
        let temperature = latitude_bands(size, params.equator(), params.high_temp);
        Self {
            elevation,
            precipitation,
            temperature,
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// Midpoint displacement over a toroidal power-of-two lattice.
///
/// Four seed corners, then rounds of halving `step`: per cell block the four
/// edge midpoints average their two defining corners and the center averages
/// all four, each perturbed by a uniform offset in `[-jitter/2, jitter/2)`.
/// The first `random_rounds` rounds draw edge midpoints fully at random
/// instead, which breaks the large-scale structure up into several masses.
fn displace<R: Rng + ?Sized>(
    size: usize,
    max: u32,
    jitter: u32,
    random_rounds: u32,
    rng: &mut R,
) -> Vec<u32> {
    let max = max as i64;
    let mut grid = vec![0i64; size * size];
    let at = |x: usize, y: usize| y * size + x;

    let half = size / 2;
    for (x, y) in [(0, 0), (half, 0), (0, half), (half, half)] {
        grid[at(x, y)] = rng.gen_range(0..max);
    }

    let mut step = size / 2;
    let mut rounds_left = random_rounds;
    while step > 1 {
        let h = step / 2;
        for x in (0..size).step_by(step) {
            for y in (0..size).step_by(step) {
                let right = (x + step) % size;
                let down = (y + step) % size;
                let nw = grid[at(x, y)];
                let ne = grid[at(right, y)];
                let sw = grid[at(x, down)];
                let se = grid[at(right, down)];

                grid[at(x, y + h)] = edge_midpoint(nw, sw, max, jitter, rounds_left > 0, rng);
                grid[at(x + h, y)] = edge_midpoint(nw, ne, max, jitter, rounds_left > 0, rng);
                grid[at(right, y + h)] = edge_midpoint(ne, se, max, jitter, rounds_left > 0, rng);
                grid[at(x + h, down)] = edge_midpoint(sw, se, max, jitter, rounds_left > 0, rng);

                // Center midpoints are always averaged, even in the
                // fully-random rounds.
                let avg = (nw + ne + sw + se) / 4;
                grid[at(x + h, y + h)] = (avg + jitter_offset(jitter, rng)).clamp(0, max);
            }
        }
        step /= 2;
        rounds_left = rounds_left.saturating_sub(1);
    }

    grid.into_iter().map(|v| v as u32).collect()
}

fn edge_midpoint<R: Rng + ?Sized>(
    a: i64,
    b: i64,
    max: i64,
    jitter: u32,
    fully_random: bool,
    rng: &mut R,
) -> i64 {
    if fully_random {
        rng.gen_range(0..max)
    } else {
        ((a + b) / 2 + jitter_offset(jitter, rng)).clamp(0, max)
    }
}

fn jitter_offset<R: Rng + ?Sized>(jitter: u32, rng: &mut R) -> i64 {
    let jitter = jitter as f64;
    (rng.gen::<f64>() * jitter - jitter / 2.0).floor() as i64
}

/// Latitude model: temperature depends only on the row, peaking at the
/// equator row and falling off linearly toward the poles.
fn latitude_bands(size: usize, equator_row: usize, high_temp: u32) -> Vec<u32> {
    let max_diff = (size - equator_row).max(equator_row).max(1) as f64;
    let per_tile = high_temp as f64 / max_diff;
    let mut grid = vec![0u32; size * size];
    for y in 0..size {
        let falloff = (per_tile * (equator_row as f64 - y as f64).abs()).floor();
        let t = (high_temp as f64 - falloff) as u32;
        for x in 0..size {
            grid[y * size + x] = t;
        }
    }
    grid
}
