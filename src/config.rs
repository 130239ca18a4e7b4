// src/config.rs
//! Конфигурация генерации карты
//!
//! Этот модуль определяет все параметры, управляющие генерацией:
//! - Размер карты и готовые пресеты размеров
//! - Каталоги биомов и рельефов
//! - Коэффициенты выращивания регионов и режим воды
//! - Веса оценщиков маршрутов для рек и дорог
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{GenerationError, Result};
use crate::terrain::{Biome, CellProperty, Relief};

/// Способ создания воды
///
/// Определяет, какие фазы воды запускаются и остаётся ли `Biome::Water` в каталоге биомов.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WaterAlgorithm {
    /// Вода — обычный биом каталога
    AsBiome,
    /// Сначала случайные блуждания воды, затем биомы без воды
    SeparateFromBiome,
    /// Сначала биомы (с водой), затем поверх — блуждания воды
    #[default]
    Mixed,
    /// Россыпь воды с мелкими островами, затем биомы без воды
    SmallIslands,
    /// Острова, затем блуждания воды, затем биомы (с водой)
    SuperMixed,
    /// Воды нет совсем (кроме рек)
    NoWater,
}

impl WaterAlgorithm {
    /// Убирается ли вода из каталога перед выращиванием биомов
    #[must_use]
    pub fn removes_water_from_catalog(self) -> bool {
        matches!(
            self,
            WaterAlgorithm::SeparateFromBiome | WaterAlgorithm::SmallIslands | WaterAlgorithm::NoWater
        )
    }

    /// Режимы, которым нужна вода в каталоге биомов
    #[must_use]
    pub fn requires_water_in_catalog(self) -> bool {
        matches!(
            self,
            WaterAlgorithm::AsBiome | WaterAlgorithm::Mixed | WaterAlgorithm::SuperMixed
        )
    }

    /// Смешанные режимы: для воды не действует правило равного распределения
    #[must_use]
    pub fn is_mixed(self) -> bool {
        matches!(self, WaterAlgorithm::Mixed | WaterAlgorithm::SuperMixed)
    }
}

/// Готовые размеры квадратной карты
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapSize {
    Small,
    Medium,
    Large,
    Huge,
}

impl MapSize {
    /// Сторона карты в клетках
    ///
    /// # Примеры
    /// ```
    /// use rpg_mapgen::config::MapSize;
    /// assert_eq!(MapSize::Medium.side(), 64);
    /// ```
    #[must_use]
    pub fn side(self) -> u32 {
        match self {
            MapSize::Small => 32,
            MapSize::Medium => 64,
            MapSize::Large => 128,
            MapSize::Huge => 256,
        }
    }
}

/// Веса оценщика рек
///
/// Реки дёшево идут по воде и низинам и дорого — через горы и поселения.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverScorerSettings {
    /// Стоимость шага по суше
    #[serde(default = "default_river_step_cost")]
    pub step_cost: f64,

    /// Стоимость шага по уже существующей воде
    #[serde(default = "default_river_water_cost")]
    pub water_cost: f64,

    /// Надбавка за единицу сложности рельефа
    #[serde(default = "default_river_relief_cost")]
    pub relief_cost: f64,

    /// Надбавка за клетку с поселением
    #[serde(default = "default_river_settlement_cost")]
    pub settlement_cost: f64,
}

fn default_river_step_cost() -> f64 {
    1.0
}
fn default_river_water_cost() -> f64 {
    0.2
}
fn default_river_relief_cost() -> f64 {
    4.0
}
fn default_river_settlement_cost() -> f64 {
    50.0
}

impl RiverScorerSettings {
    /// Все веса с именами полей
    #[must_use]
    pub fn weights(&self) -> [(&'static str, f64); 4] {
        [
            ("river_scorer.step_cost", self.step_cost),
            ("river_scorer.water_cost", self.water_cost),
            ("river_scorer.relief_cost", self.relief_cost),
            ("river_scorer.settlement_cost", self.settlement_cost),
        ]
    }
}

impl Default for RiverScorerSettings {
    fn default() -> Self {
        Self {
            step_cost: default_river_step_cost(),
            water_cost: default_river_water_cost(),
            relief_cost: default_river_relief_cost(),
            settlement_cost: default_river_settlement_cost(),
        }
    }
}

/// Веса оценщика дорог
///
/// Дороги переиспользуют уже проложенные участки и обходят воду и горы.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadScorerSettings {
    /// Стоимость шага по существующей дороге
    #[serde(default = "default_road_reuse_cost")]
    pub road_cost: f64,

    /// Множитель к `Biome::travel_cost` для шага без дороги
    #[serde(default = "default_road_step_cost")]
    pub step_cost: f64,

    /// Надбавка за единицу сложности рельефа
    #[serde(default = "default_road_relief_cost")]
    pub relief_cost: f64,

    /// Надбавка за водную клетку
    #[serde(default = "default_road_water_cost")]
    pub water_cost: f64,
}

fn default_road_reuse_cost() -> f64 {
    0.3
}
fn default_road_step_cost() -> f64 {
    1.0
}
fn default_road_relief_cost() -> f64 {
    3.0
}
fn default_road_water_cost() -> f64 {
    25.0
}

impl RoadScorerSettings {
    /// Все веса с именами полей
    #[must_use]
    pub fn weights(&self) -> [(&'static str, f64); 4] {
        [
            ("road_scorer.road_cost", self.road_cost),
            ("road_scorer.step_cost", self.step_cost),
            ("road_scorer.relief_cost", self.relief_cost),
            ("road_scorer.water_cost", self.water_cost),
        ]
    }
}

impl Default for RoadScorerSettings {
    fn default() -> Self {
        Self {
            road_cost: default_road_reuse_cost(),
            step_cost: default_road_step_cost(),
            relief_cost: default_road_relief_cost(),
            water_cost: default_road_water_cost(),
        }
    }
}

/// Основные параметры генерации карты
///
/// Полная конфигурация для одного запуска генератора. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Ширина карты в клетках (по умолчанию 64)
    #[serde(default = "default_side")]
    pub width: u32,

    /// Высота карты в клетках (по умолчанию 64)
    #[serde(default = "default_side")]
    pub height: u32,

    /// Сид генератора; без сида генерация не воспроизводится
    #[serde(default)]
    pub seed: Option<u64>,

    /// Доступные биомы
    #[serde(default = "Biome::default_catalog")]
    pub biomes: Vec<Biome>,

    /// Доступные рельефы
    #[serde(default = "Relief::default_catalog")]
    pub reliefs: Vec<Relief>,

    /// Количество поселений
    #[serde(default = "default_settlements")]
    pub settlements: usize,

    /// Количество подземелий (некоторые могут не поместиться)
    #[serde(default = "default_dungeons")]
    pub dungeons: usize,

    /// Шанс начать новый биом вместо соседних
    #[serde(default = "default_new_biome_coefficient")]
    pub new_biome_coefficient: f64,

    /// Шанс начать новый рельеф вместо соседних
    #[serde(default = "default_new_relief_coefficient")]
    pub new_relief_coefficient: f64,

    /// Стремиться к равным площадям биомов
    #[serde(default = "default_equal_biomes")]
    pub equal_biomes: bool,

    #[serde(default)]
    pub water_algorithm: WaterAlgorithm,

    /// Доля воды для блужданий (режимы с отдельной водой)
    #[serde(default = "default_water_amount")]
    pub water_amount: f64,

    /// Количество рек
    #[serde(default = "default_rivers")]
    pub rivers: usize,

    #[serde(default)]
    pub river_scorer: RiverScorerSettings,

    #[serde(default)]
    pub road_scorer: RoadScorerSettings,
}

fn default_side() -> u32 {
    64
}
fn default_settlements() -> usize {
    2
}
fn default_dungeons() -> usize {
    16
}
fn default_new_biome_coefficient() -> f64 {
    0.004
}
fn default_new_relief_coefficient() -> f64 {
    0.3
}
fn default_equal_biomes() -> bool {
    true
}
fn default_water_amount() -> f64 {
    0.33
}
fn default_rivers() -> usize {
    10
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::for_size(MapSize::Medium)
    }
}

impl GeneratorSettings {
    /// Параметры по умолчанию для пресета размера:
    /// поселений — ширина / 32, подземелий — ширина / 4.
    #[must_use]
    pub fn for_size(size: MapSize) -> Self {
        let side = size.side();
        Self {
            width: side,
            height: side,
            seed: None,
            biomes: Biome::default_catalog(),
            reliefs: Relief::default_catalog(),
            settlements: (side / 32) as usize,
            dungeons: (side / 4) as usize,
            new_biome_coefficient: default_new_biome_coefficient(),
            new_relief_coefficient: default_new_relief_coefficient(),
            equal_biomes: default_equal_biomes(),
            water_algorithm: WaterAlgorithm::default(),
            water_amount: default_water_amount(),
            rivers: default_rivers(),
            river_scorer: RiverScorerSettings::default(),
            road_scorer: RoadScorerSettings::default(),
        }
    }

    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # map.toml
    /// seed = 42
    /// width = 128
    /// height = 96
    /// water_algorithm = "SmallIslands"
    /// biomes = ["Water", "Plain", "Forest"]
    /// ```
    pub fn from_toml_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents)?;
        Ok(settings)
    }

    /// Проверяет параметры до запуска генерации
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GenerationError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.reliefs.is_empty() {
            return Err(GenerationError::EmptyCatalog {
                property: CellProperty::Relief,
            });
        }
        if self.biomes.is_empty() {
            return Err(GenerationError::EmptyCatalog {
                property: CellProperty::Biome,
            });
        }

        let has_water = self.biomes.contains(&Biome::Water);
        if self.water_algorithm.requires_water_in_catalog() && !has_water {
            return Err(GenerationError::WaterMissing {
                algorithm: self.water_algorithm,
            });
        }
        if self.water_algorithm.removes_water_from_catalog()
            && self.biomes.iter().all(|b| b.is_water())
        {
            return Err(GenerationError::EmptyCatalog {
                property: CellProperty::Biome,
            });
        }

        for (name, value) in [
            ("new_biome_coefficient", self.new_biome_coefficient),
            ("new_relief_coefficient", self.new_relief_coefficient),
            ("water_amount", self.water_amount),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GenerationError::InvalidCoefficient { name, value });
            }
        }

        // отрицательный вес даёт цикл отрицательной стоимости, и A* не завершится
        for (name, value) in self.river_scorer.weights().into_iter().chain(self.road_scorer.weights()) {
            if !value.is_finite() || value < 0.0 {
                return Err(GenerationError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_presets_scale_object_counts() {
        let settings = GeneratorSettings::for_size(MapSize::Large);
        assert_eq!(settings.width, 128);
        assert_eq!(settings.settlements, 4);
        assert_eq!(settings.dungeons, 32);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let settings = GeneratorSettings::from_toml_str(
            r#"
            seed = 42
            width = 40
            water_algorithm = "NoWater"
            biomes = ["Plain", "Forest"]

            [road_scorer]
            water_cost = 100.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.width, 40);
        assert_eq!(settings.height, 64);
        assert_eq!(settings.water_algorithm, WaterAlgorithm::NoWater);
        assert_eq!(settings.biomes, vec![Biome::Plain, Biome::Forest]);
        assert_eq!(settings.reliefs, Relief::default_catalog());
        assert!((settings.road_scorer.water_cost - 100.0).abs() < f64::EPSILON);
        assert!((settings.road_scorer.road_cost - 0.3).abs() < f64::EPSILON);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_empty_catalogs() {
        let mut settings = GeneratorSettings::default();
        settings.reliefs.clear();
        assert!(matches!(
            settings.validate(),
            Err(GenerationError::EmptyCatalog {
                property: CellProperty::Relief
            })
        ));

        let mut settings = GeneratorSettings::default();
        settings.water_algorithm = WaterAlgorithm::SeparateFromBiome;
        settings.biomes = vec![Biome::Water];
        assert!(matches!(
            settings.validate(),
            Err(GenerationError::EmptyCatalog {
                property: CellProperty::Biome
            })
        ));
    }

    #[test]
    fn mixed_water_needs_water_biome() {
        let mut settings = GeneratorSettings::default();
        settings.biomes = vec![Biome::Plain, Biome::Forest];
        assert!(matches!(
            settings.validate(),
            Err(GenerationError::WaterMissing {
                algorithm: WaterAlgorithm::Mixed
            })
        ));
        settings.water_algorithm = WaterAlgorithm::NoWater;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_negative_or_non_finite_route_weights() {
        let mut settings = GeneratorSettings::for_size(MapSize::Small);
        settings.road_scorer.road_cost = -1.0;
        assert!(matches!(
            settings.validate(),
            Err(GenerationError::InvalidWeight {
                name: "road_scorer.road_cost",
                ..
            })
        ));

        let mut settings = GeneratorSettings::for_size(MapSize::Small);
        settings.river_scorer.relief_cost = f64::NAN;
        assert!(matches!(
            settings.validate(),
            Err(GenerationError::InvalidWeight {
                name: "river_scorer.relief_cost",
                ..
            })
        ));

        let mut settings = GeneratorSettings::for_size(MapSize::Small);
        settings.road_scorer.water_cost = f64::INFINITY;
        assert!(settings.validate().is_err());

        // нулевой вес допустим
        let mut settings = GeneratorSettings::for_size(MapSize::Small);
        settings.river_scorer.settlement_cost = 0.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_bad_coefficients_and_size() {
        let mut settings = GeneratorSettings::default();
        settings.water_amount = 1.5;
        assert!(matches!(
            settings.validate(),
            Err(GenerationError::InvalidCoefficient {
                name: "water_amount",
                ..
            })
        ));

        let mut settings = GeneratorSettings::default();
        settings.height = 0;
        assert!(matches!(
            settings.validate(),
            Err(GenerationError::InvalidSize { .. })
        ));
    }
}
