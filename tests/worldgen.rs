use std::path::PathBuf;

use verdant::{
    engine::{EngineBuilder, EngineSettings},
    systems::{AgentSystem, BookkeepingSystem, GerminationSystem, GrowthSystem},
    Biome, WorldParams,
};

fn build_engine(seed: u64) -> EngineBuilder {
    let settings = EngineSettings {
        scenario_name: "worldgen_tests".into(),
        seed,
        frames_per_turn: 1,
        snapshot_interval_turns: 0,
        snapshot_dir: PathBuf::from("snapshots_worldgen_tests"),
    };
    EngineBuilder::new(settings)
        .with_system(GerminationSystem::new())
        .with_system(AgentSystem::new())
        .with_system(GrowthSystem::new())
        .with_system(BookkeepingSystem::new())
}

fn params(map_size: usize) -> WorldParams {
    WorldParams {
        map_size,
        ..WorldParams::default()
    }
}

#[test]
fn tiles_are_ocean_iff_submerged() {
    let mut engine = build_engine(11).build();
    let world = engine.generate_world(&params(32)).unwrap();
    let ocean_level = world.params().ocean_level;
    for tile in world.tiles() {
        let submerged = tile.elevation as i64 <= ocean_level;
        assert_eq!(
            tile.biome == Biome::Ocean,
            submerged,
            "elevation {} vs ocean level {}",
            tile.elevation,
            ocean_level
        );
    }
}

#[test]
fn fields_respect_configured_bounds() {
    let mut engine = build_engine(12).build();
    let world = engine.generate_world(&params(64)).unwrap();
    let p = world.params();
    for tile in world.tiles() {
        assert!(tile.elevation <= p.max_elevation);
        assert!(tile.precipitation <= p.max_precipitation);
        assert!(tile.temperature <= p.max_temperature);
    }
}

#[test]
fn soil_richness_is_biome_value_over_eight() {
    let mut engine = build_engine(13).build();
    let world = engine.generate_world(&params(32)).unwrap();
    for tile in world.tiles() {
        assert_eq!(tile.soil_richness, tile.biome.soil_richness() / 8.0);
        assert!(
            (0.0..=0.1).contains(&tile.soil_richness),
            "soil richness {} out of range",
            tile.soil_richness
        );
        if tile.biome == Biome::Ocean {
            assert_eq!(tile.soil_richness, 0.0);
        }
    }
}

#[test]
fn generation_is_deterministic_per_seed() {
    let mut first = build_engine(99).build();
    let mut second = build_engine(99).build();
    let world_a = first.generate_world(&params(32)).unwrap();
    let world_b = second.generate_world(&params(32)).unwrap();
    let json_a = serde_json::to_string(&world_a.snapshot("det")).unwrap();
    let json_b = serde_json::to_string(&world_b.snapshot("det")).unwrap();
    assert_eq!(json_a, json_b);

    let mut third = build_engine(100).build();
    let world_c = third.generate_world(&params(32)).unwrap();
    let json_c = serde_json::to_string(&world_c.snapshot("det")).unwrap();
    assert_ne!(json_a, json_c, "different seeds should differ somewhere");
}

#[test]
fn negative_ocean_level_yields_no_ocean() {
    let mut engine = build_engine(14).build();
    let world = engine
        .generate_world(&WorldParams {
            map_size: 16,
            ocean_level: -1,
            ..WorldParams::default()
        })
        .unwrap();
    assert!(world.tiles().iter().all(|t| t.biome != Biome::Ocean));
}

#[test]
fn invalid_parameters_are_rejected_at_construction() {
    let mut engine = build_engine(15).build();
    for bad in [
        WorldParams {
            map_size: 48,
            ..WorldParams::default()
        },
        WorldParams {
            num_species: 0,
            ..WorldParams::default()
        },
        WorldParams {
            max_spread_radius: 0,
            ..WorldParams::default()
        },
        WorldParams {
            soil_tolerance: 0.0,
            ..WorldParams::default()
        },
        WorldParams {
            low_temp: 90,
            high_temp: 80,
            ..WorldParams::default()
        },
    ] {
        assert!(engine.generate_world(&bad).is_err());
    }
}

#[test]
fn world_epoch_starts_clean() {
    let mut engine = build_engine(16).build();
    let world = engine.generate_world(&params(16)).unwrap();
    assert_eq!(world.turn(), 0);
    assert_eq!(world.epoch(), 1);
    assert_eq!(world.species_alive(), 0);
    assert_eq!(world.species().len(), world.params().num_species);
    assert_eq!(world.agents().len(), world.params().num_agents);
    assert!(world.tiles().iter().all(|t| t.vegetation.is_none()));
    assert!(world.tiles().iter().all(|t| t.seeds.is_empty()));
}
