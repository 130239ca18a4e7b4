// src/generator.rs
//! Генератор карты: последовательный конвейер фаз
//!
//! Порядок фаз фиксирован, каждая следующая читает результат предыдущих:
//! вода → биомы → реки → сглаживание → рельеф → поселения → подземелья →
//! дороги → глубина воды → уровни.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::{GeneratorSettings, WaterAlgorithm};
use crate::denoise::denoise_biomes;
use crate::depth::classify_water_depth;
use crate::error::Result;
use crate::grid::{Grid, Pos};
use crate::growth::RegionGrower;
use crate::levels::assign_levels;
use crate::objects::MapObject;
use crate::pathfinding::{RiverScorer, RoadScorer, RouteFinder};
use crate::placement::{place_dungeons, place_settlements};
use crate::random::Dice;
use crate::roads::build_roads;
use crate::terrain::Biome;
use crate::water::{flood_walk, scatter_islands};
use crate::zones::ZoneIndex;

/// Выполняет фазу и пишет в лог её длительность
fn timed<T>(phase: &'static str, run: impl FnOnce() -> Result<T>) -> Result<T> {
    let started = Instant::now();
    let result = run()?;
    info!(phase, elapsed_ms = started.elapsed().as_millis() as u64, "фаза завершена");
    Ok(result)
}

/// Одноразовый генератор: создаётся под один запуск и поглощается [`Generator::create`]
pub struct Generator {
    settings: GeneratorSettings,
    grid: Grid,
    zones: ZoneIndex,
    dice: Dice,
    /// Рабочий каталог биомов (вода может быть убрана режимом воды)
    biomes: Vec<Biome>,
    objects: Vec<MapObject>,
}

impl Generator {
    pub fn new(settings: GeneratorSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            grid: Grid::new(settings.width, settings.height),
            zones: ZoneIndex::new(settings.width, settings.height),
            dice: Dice::new(settings.seed),
            biomes: settings.biomes.clone(),
            objects: Vec::new(),
            settings,
        })
    }

    /// Запускает все фазы и отдаёт готовую карту
    pub fn create(mut self) -> Result<Grid> {
        let started = Instant::now();
        info!(
            width = self.settings.width,
            height = self.settings.height,
            cells = self.grid.len(),
            water = ?self.settings.water_algorithm,
            "генерация карты"
        );

        let biomes_ready = timed("water", || self.create_water())?;
        if !biomes_ready {
            timed("biomes", || self.create_biomes())?;
        }

        let finder = RouteFinder::new(&self.grid);
        timed("rivers", || self.create_rivers(&finder))?;
        timed("denoise", || denoise_biomes(&mut self.grid, &mut self.dice))?;
        timed("relief", || self.create_relief())?;
        timed("settlements", || self.create_settlements())?;
        timed("dungeons", || {
            self.create_dungeons();
            Ok(())
        })?;
        timed("roads", || self.create_roads(&finder))?;
        timed("water depth", || {
            classify_water_depth(&mut self.grid);
            Ok(())
        })?;
        timed("levels", || {
            assign_levels(&mut self.grid, &mut self.dice);
            Ok(())
        })?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            objects = self.objects.len(),
            "карта готова"
        );
        Ok(self.grid)
    }

    fn drop_water_from_catalog(&mut self) {
        self.biomes.retain(|b| !b.is_water());
    }

    /// Фаза воды. Возвращает `true`, если биомы уже выращены внутри неё (`Mixed`).
    fn create_water(&mut self) -> Result<bool> {
        let amount = self.settings.water_amount;
        match self.settings.water_algorithm {
            WaterAlgorithm::AsBiome => {}
            WaterAlgorithm::SeparateFromBiome => {
                flood_walk(&mut self.grid, &mut self.dice, amount)?;
                self.drop_water_from_catalog();
            }
            WaterAlgorithm::Mixed => {
                self.create_biomes()?;
                flood_walk(&mut self.grid, &mut self.dice, amount)?;
                return Ok(true);
            }
            WaterAlgorithm::SmallIslands => {
                scatter_islands(&mut self.grid, &mut self.zones, &mut self.dice, amount)?;
                self.drop_water_from_catalog();
            }
            WaterAlgorithm::SuperMixed => {
                scatter_islands(&mut self.grid, &mut self.zones, &mut self.dice, amount)?;
                flood_walk(&mut self.grid, &mut self.dice, amount)?;
            }
            WaterAlgorithm::NoWater => self.drop_water_from_catalog(),
        }
        Ok(false)
    }

    fn create_biomes(&mut self) -> Result<()> {
        let mut grower = RegionGrower::new(self.biomes.clone(), self.settings.new_biome_coefficient)
            .with_equal_distribution(
                self.settings.equal_biomes,
                self.settings.water_algorithm.is_mixed(),
            );
        grower.grow(&mut self.grid, &mut self.zones, &mut self.dice)?;
        debug!(counts = ?grower.counts(), "биомы выращены");
        Ok(())
    }

    fn random_pos(&mut self) -> Pos {
        let x = self.dice.range(0, i64::from(self.grid.width()) - 1);
        let y = self.dice.range(0, i64::from(self.grid.height()) - 1);
        Pos::new(x as u32, y as u32)
    }

    /// Реки: от случайной клетки к случайной воде (или клетке, если воды нет)
    fn create_rivers(&mut self, finder: &RouteFinder) -> Result<()> {
        let scorer = RiverScorer::new(self.settings.river_scorer.clone());
        for _ in 0..self.settings.rivers {
            let from = self.random_pos();
            let water = self.grid.cells_with_biome(Biome::Water);
            let to = if water.is_empty() {
                self.random_pos()
            } else {
                *self.dice.uniform(&water)?
            };

            match finder.find_route(&self.grid, &scorer, from, to) {
                Ok(route) => {
                    for pos in route {
                        self.grid.cell_mut(pos).biome = Some(Biome::Water);
                    }
                }
                Err(err) => debug!(%err, "река пропущена"),
            }
        }
        Ok(())
    }

    fn create_relief(&mut self) -> Result<()> {
        let mut grower = RegionGrower::new(
            self.settings.reliefs.clone(),
            self.settings.new_relief_coefficient,
        );
        grower.grow(&mut self.grid, &mut self.zones, &mut self.dice)
    }

    fn create_settlements(&mut self) -> Result<()> {
        let first_id = self.objects.len() as u32;
        let settlements = place_settlements(
            &mut self.grid,
            &mut self.zones,
            &mut self.dice,
            self.settings.settlements,
            first_id,
        )?;
        if settlements.len() < self.settings.settlements {
            debug!(
                placed = settlements.len(),
                requested = self.settings.settlements,
                "не все поселения поместились"
            );
        }
        self.objects.extend(settlements);
        Ok(())
    }

    fn create_dungeons(&mut self) {
        let first_id = self.objects.len() as u32;
        let dungeons = place_dungeons(&mut self.grid, &mut self.dice, self.settings.dungeons, first_id);
        self.objects.extend(dungeons);
    }

    fn create_roads(&mut self, finder: &RouteFinder) -> Result<()> {
        let scorer = RoadScorer::new(self.settings.road_scorer.clone());
        let built = build_roads(&mut self.grid, finder, &scorer, &mut self.dice, &self.objects)?;
        debug!(built, "дороги проложены");
        Ok(())
    }
}
