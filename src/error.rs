//! Ошибки генерации карты

use thiserror::Error;

use crate::config::WaterAlgorithm;
use crate::grid::Pos;
use crate::terrain::CellProperty;

/// Ошибки генератора.
///
/// Ошибки конструирования (`EmptyCatalog`, `InvalidSize`, ...) возвращаются вызывающему коду.
/// `PlacementExhausted` и `RouteNotFound` возникают внутри конвейера и обрабатываются на месте:
/// подземелье пропускается, маршрут считается пустым.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Случайный выбор из пустого набора
    #[error("random choice over an empty set: {0}")]
    EmptyInput(&'static str),

    /// Пустой каталог биомов или рельефов
    #[error("catalog for {property:?} is empty")]
    EmptyCatalog { property: CellProperty },

    /// Режим воды требует `Biome::Water` в каталоге
    #[error("water algorithm {algorithm:?} requires Water in the biome catalog")]
    WaterMissing { algorithm: WaterAlgorithm },

    #[error("invalid map size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("coefficient {name} = {value} is outside [0, 1]")]
    InvalidCoefficient { name: &'static str, value: f64 },

    /// Вес оценщика маршрута отрицателен или не конечен
    #[error("route weight {name} = {value} must be finite and non-negative")]
    InvalidWeight { name: &'static str, value: f64 },

    /// Исчерпан лимит попыток размещения объекта
    #[error("no free cell for map object {id} after {attempts} attempts")]
    PlacementExhausted { id: u32, attempts: u32 },

    /// Путь между клетками не найден
    #[error("no route from {from:?} to {to:?}")]
    RouteNotFound { from: Pos, to: Pos },

    /// Число клеток карты не совпадает с её размерами
    #[error("map {width}x{height} has {cells} cells")]
    CellCountMismatch { width: u32, height: u32, cells: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
