use rpg_mapgen::denoise::is_settled;
use rpg_mapgen::depth::classify;
use rpg_mapgen::{
    Biome, CellProperty, GenerationError, GeneratorSettings, Grid, MapObjectKind, MapSize, Pos,
    WaterAlgorithm, generate_map,
};

fn medium(seed: u64) -> GeneratorSettings {
    GeneratorSettings {
        seed: Some(seed),
        ..GeneratorSettings::for_size(MapSize::Medium)
    }
}

fn generate(settings: GeneratorSettings) -> Grid {
    generate_map(settings).expect("generation must succeed")
}

#[test]
fn two_biome_map_without_features() {
    let settings = GeneratorSettings {
        width: 32,
        height: 32,
        seed: Some(2024),
        biomes: vec![Biome::Plain, Biome::Water],
        equal_biomes: true,
        water_algorithm: WaterAlgorithm::AsBiome,
        rivers: 0,
        settlements: 0,
        dungeons: 0,
        ..GeneratorSettings::default()
    };
    let grid = generate(settings);

    assert_eq!(grid.count_assigned(CellProperty::Biome), 32 * 32);
    assert_eq!(grid.count_assigned(CellProperty::Relief), 32 * 32);

    let summary = grid.summary();
    let land = summary.biomes.get(&Biome::Plain).copied().unwrap_or(0);
    let water = summary.biomes.get(&Biome::Water).copied().unwrap_or(0);
    assert_eq!(land + water, 32 * 32);
    assert!(land > 32 * 32 / 4 && water > 32 * 32 / 4, "land = {land}, water = {water}");

    assert_eq!(grid.objects().count(), 0);
    assert!(grid.cells().all(|(_, cell)| cell.road().is_none()));
}

#[test]
fn same_seed_same_map() {
    let a = generate(medium(99));
    let b = generate(medium(99));
    assert_eq!(a, b);

    let c = generate(medium(100));
    assert_ne!(a, c);
}

#[test]
fn land_cells_are_not_lonely_after_generation() {
    let grid = generate(medium(7));
    for pos in grid.positions() {
        assert!(is_settled(&grid, pos), "{pos:?} is a lonely {:?}", grid.cell(pos).biome());
    }
}

#[test]
fn objects_keep_their_distance() {
    let settings = GeneratorSettings {
        settlements: 6,
        dungeons: 30,
        ..medium(31)
    };
    let grid = generate(settings);
    let objects: Vec<_> = grid.objects().collect();
    assert!(objects.iter().any(|o| o.kind == MapObjectKind::Settlement));

    for (i, a) in objects.iter().enumerate() {
        assert_eq!(grid.cell(a.position).object(), Some(*a));
        for b in &objects[i + 1..] {
            assert!(a.position.ring_distance(b.position) > 2, "{a:?} vs {b:?}");
        }
    }
    for settlement in objects.iter().filter(|o| o.kind == MapObjectKind::Settlement) {
        assert!(!grid.is_water(settlement.position));
    }
}

#[test]
fn water_depth_matches_neighbourhood() {
    let grid = generate(medium(12));
    for (pos, cell) in grid.cells() {
        if cell.is_water() {
            assert_eq!(cell.depth(), Some(classify(&grid, pos)));
        } else {
            assert_eq!(cell.depth(), None);
        }
    }
}

#[test]
fn roads_connect_to_neighbouring_roads() {
    let settings = GeneratorSettings {
        settlements: 5,
        ..medium(5)
    };
    let grid = generate(settings);
    for (pos, cell) in grid.cells() {
        let Some(road) = cell.road() else { continue };
        for side in &road.sides {
            let neighbour = grid
                .ring(pos, 1)
                .into_iter()
                .find(|&n| pos.side_towards(n) == Some(*side))
                .expect("side points inside the map");
            assert!(grid.cell(neighbour).road().is_some(), "{pos:?} -> {side:?}");
        }
    }
}

#[test]
fn levels_follow_civilisation() {
    let grid = generate(medium(21));
    for (_, cell) in grid.cells() {
        let level = cell.level();
        if cell.has_settlement() || cell.road().is_some() {
            assert!((1..=6).contains(&level));
        } else {
            assert!((5..=56).contains(&level));
        }
    }
}

#[test]
fn equal_biomes_stay_balanced() {
    let catalog = vec![Biome::Plain, Biome::Forest, Biome::Desert, Biome::Tundra];
    let settings = GeneratorSettings {
        biomes: catalog.clone(),
        water_algorithm: WaterAlgorithm::NoWater,
        rivers: 0,
        ..medium(44)
    };
    let grid = generate(settings);
    let fair = grid.len() / catalog.len();
    let summary = grid.summary();
    for biome in catalog {
        let count = summary.biomes.get(&biome).copied().unwrap_or(0);
        assert!(count * 3 >= fair && count <= fair * 3, "{biome:?}: {count} vs {fair}");
    }
}

#[test]
fn single_cell_map_is_complete() {
    let settings = GeneratorSettings {
        width: 1,
        height: 1,
        seed: Some(1),
        settlements: 1,
        dungeons: 1,
        rivers: 1,
        ..GeneratorSettings::default()
    };
    let grid = generate(settings);
    let cell = grid.cell(Pos::new(0, 0));
    assert!(cell.biome().is_some());
    assert!(cell.relief().is_some());
}

#[test]
fn negative_road_weight_is_rejected_before_routing() {
    let mut settings = GeneratorSettings {
        seed: Some(3),
        settlements: 6,
        ..GeneratorSettings::for_size(MapSize::Small)
    };
    settings.road_scorer.road_cost = -1.0;
    assert!(matches!(
        generate_map(settings),
        Err(GenerationError::InvalidWeight { .. })
    ));
}

#[test]
fn exported_map_loads_back() {
    let grid = generate(medium(8));
    let json = grid.to_json().expect("export");
    assert_eq!(Grid::from_json(&json).expect("import"), grid);
}
