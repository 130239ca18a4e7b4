pub mod config;
pub mod denoise;
pub mod depth;
pub mod error;
pub mod generator;
pub mod grid;
pub mod growth;
pub mod levels;
pub mod objects;
pub mod pathfinding;
pub mod placement;
pub mod random;
pub mod roads;
pub mod terrain;
pub mod water;
pub mod zones;

pub use config::{GeneratorSettings, MapSize, WaterAlgorithm};
pub use error::{GenerationError, Result};
pub use generator::Generator;
pub use grid::{Cell, CellSide, DeepWater, Grid, GridSummary, Pos, Road};
pub use objects::{MapObject, MapObjectKind, RoadAffinity};
pub use terrain::{Biome, CellProperty, Relief};

/// Генерирует карту по параметрам: проверка, все фазы, готовая сетка
pub fn generate_map(settings: GeneratorSettings) -> Result<Grid> {
    Generator::new(settings)?.create()
}
