//! Каталог типов местности: биомы и рельефы
//!
//! Значения — `Copy`-перечисления, поэтому сравнение всегда идёт по тегу.
//! `Biome::Water` — единственное каноническое значение воды: все ветвления вида
//! «это вода?» сравнивают именно с ним.

use serde::{Deserialize, Serialize};

use crate::grid::Cell;

/// Какой слот клетки интересует индекс зон или поиск «незанятой» клетки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CellProperty {
    Biome,
    Relief,
    Object,
}

impl CellProperty {
    pub const ALL: [CellProperty; 3] = [CellProperty::Biome, CellProperty::Relief, CellProperty::Object];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Biome {
    Water,
    Plain,
    Forest,
    Jungle,
    Desert,
    Swamp,
    Tundra,
    DeadLand,
}

impl Biome {
    /// Каталог биомов по умолчанию (с водой)
    #[must_use]
    pub fn default_catalog() -> Vec<Biome> {
        vec![
            Biome::Water,
            Biome::Plain,
            Biome::Forest,
            Biome::Jungle,
            Biome::Desert,
            Biome::Swamp,
            Biome::Tundra,
            Biome::DeadLand,
        ]
    }

    #[must_use]
    pub fn is_water(self) -> bool {
        self == Biome::Water
    }

    /// Базовая «тяжесть» прохода через биом (для оценщиков маршрутов)
    #[must_use]
    pub fn travel_cost(self) -> f64 {
        match self {
            Biome::Plain => 1.0,
            Biome::Forest | Biome::Tundra => 1.5,
            Biome::Desert | Biome::DeadLand => 2.0,
            Biome::Jungle => 2.5,
            Biome::Swamp => 3.0,
            // вода оценивается отдельно
            Biome::Water => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relief {
    Flat,
    Hills,
    Mountains,
}

impl Relief {
    #[must_use]
    pub fn default_catalog() -> Vec<Relief> {
        vec![Relief::Flat, Relief::Hills, Relief::Mountains]
    }

    /// Сложность рельефа: 0 — равнина, дальше круче
    #[must_use]
    pub fn difficulty(self) -> u32 {
        match self {
            Relief::Flat => 0,
            Relief::Hills => 1,
            Relief::Mountains => 3,
        }
    }
}

/// Слой клетки, который умеет заполнять механизм выращивания регионов.
pub trait TerrainLayer: Copy + Eq + Ord + std::fmt::Debug {
    const PROPERTY: CellProperty;

    fn read(cell: &Cell) -> Option<Self>;

    fn write(cell: &mut Cell, value: Self);

    fn is_water(self) -> bool {
        false
    }
}

impl TerrainLayer for Biome {
    const PROPERTY: CellProperty = CellProperty::Biome;

    fn read(cell: &Cell) -> Option<Self> {
        cell.biome
    }

    fn write(cell: &mut Cell, value: Self) {
        cell.biome = Some(value);
    }

    fn is_water(self) -> bool {
        Biome::is_water(self)
    }
}

impl TerrainLayer for Relief {
    const PROPERTY: CellProperty = CellProperty::Relief;

    fn read(cell: &Cell) -> Option<Self> {
        cell.relief
    }

    fn write(cell: &mut Cell, value: Self) {
        cell.relief = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_is_single_canonical_value() {
        let catalog = Biome::default_catalog();
        let waters: Vec<_> = catalog.iter().filter(|b| b.is_water()).collect();
        assert_eq!(waters.len(), 1);
        assert_eq!(*waters[0], Biome::Water);
        // копия из каталога совпадает с канонической
        let copy = catalog[0];
        assert_eq!(copy, Biome::Water);
        assert!(TerrainLayer::is_water(copy));
    }

    #[test]
    fn relief_is_never_water() {
        for relief in Relief::default_catalog() {
            assert!(!TerrainLayer::is_water(relief));
        }
    }

    #[test]
    fn layers_read_and_write_their_own_slot() {
        let mut cell = Cell::default();
        Biome::write(&mut cell, Biome::Forest);
        Relief::write(&mut cell, Relief::Hills);
        assert_eq!(Biome::read(&cell), Some(Biome::Forest));
        assert_eq!(Relief::read(&cell), Some(Relief::Hills));
    }
}
