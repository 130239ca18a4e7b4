//! Сетка карты: клетки, соседство и обратные запросы
//!
//! Сетка создаётся один раз нужного размера и больше не меняет размеров.
//! Соседство считается по Чебышёву: кольцо 1 — восемь соседей, кольцо 2 — шестнадцать.
//! Края не зацикливаются: у клеток на границе соседей меньше.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};
use crate::objects::{MapObject, MapObjectKind};
use crate::terrain::{Biome, CellProperty, Relief};

/// Координаты клетки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: u32,
    pub y: u32,
}

impl Pos {
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Расстояние Чебышёва (номер кольца)
    #[must_use]
    pub fn ring_distance(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Сторона этой клетки, через которую лежит соседняя `other`.
    ///
    /// Возвращает `None`, если `other` совпадает с `self`.
    #[must_use]
    pub fn side_towards(self, other: Pos) -> Option<CellSide> {
        let dx = i64::from(other.x) - i64::from(self.x);
        let dy = i64::from(other.y) - i64::from(self.y);
        CellSide::from_offset(dx.signum(), dy.signum())
    }
}

/// Сторона клетки (восемь направлений; Y растёт вниз)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CellSide {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CellSide {
    #[must_use]
    pub fn from_offset(dx: i64, dy: i64) -> Option<CellSide> {
        match (dx, dy) {
            (0, -1) => Some(CellSide::North),
            (1, -1) => Some(CellSide::NorthEast),
            (1, 0) => Some(CellSide::East),
            (1, 1) => Some(CellSide::SouthEast),
            (0, 1) => Some(CellSide::South),
            (-1, 1) => Some(CellSide::SouthWest),
            (-1, 0) => Some(CellSide::West),
            (-1, -1) => Some(CellSide::NorthWest),
            _ => None,
        }
    }
}

/// Дорога на клетке: набор сторон, через которые она выходит в соседние клетки.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Road {
    pub sides: BTreeSet<CellSide>,
    /// Дорога заходит в объект, стоящий на этой клетке
    pub touches_object: bool,
}

impl Road {
    pub fn connect(&mut self, side: CellSide) {
        self.sides.insert(side);
    }
}

/// Глубина водной клетки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeepWater {
    Small,
    Normal,
    Deep,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) biome: Option<Biome>,
    pub(crate) relief: Option<Relief>,
    pub(crate) object: Option<MapObject>,
    pub(crate) road: Option<Road>,
    pub(crate) depth: Option<DeepWater>,
    pub(crate) level: u32,
}

impl Cell {
    #[must_use]
    pub fn biome(&self) -> Option<Biome> {
        self.biome
    }

    #[must_use]
    pub fn relief(&self) -> Option<Relief> {
        self.relief
    }

    #[must_use]
    pub fn object(&self) -> Option<&MapObject> {
        self.object.as_ref()
    }

    #[must_use]
    pub fn road(&self) -> Option<&Road> {
        self.road.as_ref()
    }

    /// Классификация глубины; есть только у водных клеток
    #[must_use]
    pub fn depth(&self) -> Option<DeepWater> {
        self.depth
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn is_water(&self) -> bool {
        self.biome == Some(Biome::Water)
    }

    #[must_use]
    pub fn has_settlement(&self) -> bool {
        matches!(
            self.object,
            Some(MapObject {
                kind: MapObjectKind::Settlement,
                ..
            })
        )
    }

    /// Заполнен ли слот `property`
    #[must_use]
    pub fn is_assigned(&self, property: CellProperty) -> bool {
        match property {
            CellProperty::Biome => self.biome.is_some(),
            CellProperty::Relief => self.relief.is_some(),
            CellProperty::Object => self.object.is_some(),
        }
    }
}

/// Готовая (или строящаяся) карта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

/// Сырые данные карты до проверки размеров
#[derive(Deserialize)]
struct GridData {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl TryFrom<GridData> for Grid {
    type Error = GenerationError;

    fn try_from(data: GridData) -> Result<Self> {
        let expected = (data.width as usize) * (data.height as usize);
        if data.cells.len() != expected {
            return Err(GenerationError::CellCountMismatch {
                width: data.width,
                height: data.height,
                cells: data.cells.len(),
            });
        }
        Ok(Self {
            width: data.width,
            height: data.height,
            cells: data.cells,
        })
    }
}

impl Grid {
    /// Загружает карту из JSON; число клеток должно совпадать с `width × height`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * (self.width as usize) + pos.x as usize
    }

    fn pos_of(&self, idx: usize) -> Pos {
        let width = self.width as usize;
        Pos::new((idx % width) as u32, (idx / width) as u32)
    }

    #[must_use]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    #[must_use]
    pub fn cell(&self, pos: Pos) -> &Cell {
        &self.cells[self.index(pos)]
    }

    pub(crate) fn cell_mut(&mut self, pos: Pos) -> &mut Cell {
        let idx = self.index(pos);
        &mut self.cells[idx]
    }

    /// Все клетки построчно
    pub fn cells(&self) -> impl Iterator<Item = (Pos, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (self.pos_of(idx), cell))
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Pos::new(x, y)))
    }

    /// Клетки ровно на расстоянии `k` (кольцо). `k == 0` — сама клетка.
    #[must_use]
    pub fn ring(&self, pos: Pos, k: u32) -> Vec<Pos> {
        self.collect_around(pos, k, |d| d == k)
    }

    /// Клетки в радиусе `k`, включая центр
    #[must_use]
    pub fn area(&self, pos: Pos, k: u32) -> Vec<Pos> {
        self.collect_around(pos, k, |_| true)
    }

    fn collect_around(&self, pos: Pos, k: u32, keep: impl Fn(u32) -> bool) -> Vec<Pos> {
        let k = i64::from(k);
        let (cx, cy) = (i64::from(pos.x), i64::from(pos.y));
        let mut result = Vec::new();
        for dy in -k..=k {
            for dx in -k..=k {
                let (nx, ny) = (cx + dx, cy + dy);
                let distance = dx.unsigned_abs().max(dy.unsigned_abs()) as u32;
                if keep(distance) && self.contains(nx, ny) {
                    result.push(Pos::new(nx as u32, ny as u32));
                }
            }
        }
        result
    }

    /// Обратный запрос: все клетки с данным биомом
    #[must_use]
    pub fn cells_with_biome(&self, biome: Biome) -> Vec<Pos> {
        self.cells()
            .filter(|(_, cell)| cell.biome == Some(biome))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Площадь каждого биома в клетках
    #[must_use]
    pub fn biome_counts(&self) -> BTreeMap<Biome, usize> {
        let mut counts = BTreeMap::new();
        for biome in self.cells.iter().filter_map(|c| c.biome) {
            *counts.entry(biome).or_default() += 1;
        }
        counts
    }

    #[must_use]
    pub fn count_assigned(&self, property: CellProperty) -> usize {
        self.cells.iter().filter(|c| c.is_assigned(property)).count()
    }

    #[must_use]
    pub fn is_water(&self, pos: Pos) -> bool {
        self.cell(pos).is_water()
    }

    /// Размещённые объекты в порядке обхода сетки
    pub fn objects(&self) -> impl Iterator<Item = &MapObject> {
        self.cells.iter().filter_map(|c| c.object.as_ref())
    }

    #[must_use]
    pub fn summary(&self) -> GridSummary {
        let mut summary = GridSummary {
            width: self.width,
            height: self.height,
            biomes: self.biome_counts(),
            ..GridSummary::default()
        };
        for cell in &self.cells {
            if let Some(relief) = cell.relief {
                *summary.reliefs.entry(relief).or_default() += 1;
            }
            match cell.object.as_ref().map(|o| o.kind) {
                Some(MapObjectKind::Settlement) => summary.settlements += 1,
                Some(MapObjectKind::Dungeon) => summary.dungeons += 1,
                None => {}
            }
            if cell.road.is_some() {
                summary.road_cells += 1;
            }
            summary.max_level = summary.max_level.max(cell.level);
        }
        summary
    }
}

/// Сводная статистика по карте
#[derive(Debug, Clone, Default, Serialize)]
pub struct GridSummary {
    pub width: u32,
    pub height: u32,
    pub biomes: BTreeMap<Biome, usize>,
    pub reliefs: BTreeMap<Relief, usize>,
    pub settlements: usize,
    pub dungeons: usize,
    pub road_cells: usize,
    pub max_level: u32,
}
