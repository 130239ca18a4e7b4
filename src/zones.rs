//! Индекс зон: ускоряет поиск «незаполненных» клеток на больших картах
//!
//! Для каждого слота клетки (биом, рельеф, объект) карта делится на прямоугольные зоны
//! примерно `log2(width) × log2(height)`. Зона, в которой слот заполнен полностью,
//! навсегда удаляется из индекса этого слота.
//!
//! Поиск приблизительный: сначала кольца 1 и 2 вокруг клетки, потом зона клетки,
//! потом любые оставшиеся зоны в порядке хранения (не обязательно ближайшие).

use std::collections::BTreeMap;

use crate::grid::{Grid, Pos};
use crate::terrain::CellProperty;

/// Прямоугольник `[start, end]` включительно
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub start: Pos,
    pub end: Pos,
}

impl Zone {
    #[must_use]
    pub fn contains(&self, pos: Pos) -> bool {
        (self.start.x..=self.end.x).contains(&pos.x) && (self.start.y..=self.end.y).contains(&pos.y)
    }

    /// Первая незаполненная клетка зоны построчно
    fn first_unassigned(&self, grid: &Grid, property: CellProperty) -> Option<Pos> {
        (self.start.y..=self.end.y)
            .flat_map(|y| (self.start.x..=self.end.x).map(move |x| Pos::new(x, y)))
            .find(|&pos| !grid.cell(pos).is_assigned(property))
    }
}

pub struct ZoneIndex {
    zones: BTreeMap<CellProperty, Vec<Zone>>,
}

impl ZoneIndex {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let zones = CellProperty::ALL
            .into_iter()
            .map(|property| (property, divide_into_zones(width, height)))
            .collect();
        Self { zones }
    }

    /// Сколько зон ещё живо для слота
    #[must_use]
    pub fn zone_count(&self, property: CellProperty) -> usize {
        self.zones.get(&property).map_or(0, Vec::len)
    }

    /// Кандидаты рядом с `near`, у которых не заполнен слот `property`.
    ///
    /// Пустой результат — во всех зонах слот заполнен.
    pub fn find_unassigned(&mut self, grid: &Grid, property: CellProperty, near: Pos) -> Vec<Pos> {
        for k in 1..=2 {
            let around: Vec<Pos> = grid
                .ring(near, k)
                .into_iter()
                .filter(|&pos| !grid.cell(pos).is_assigned(property))
                .collect();
            if !around.is_empty() {
                return around;
            }
        }

        let Some(zones) = self.zones.get_mut(&property) else {
            return Vec::new();
        };

        if let Some(i) = zones.iter().position(|z| z.contains(near)) {
            if let Some(pos) = zones[i].first_unassigned(grid, property) {
                return vec![pos];
            }
            zones.remove(i);
        }

        while let Some(zone) = zones.first() {
            if let Some(pos) = zone.first_unassigned(grid, property) {
                return vec![pos];
            }
            zones.remove(0);
        }
        Vec::new()
    }
}

fn zones_along(size: u32) -> (u32, u32) {
    let mut count = size.max(1).ilog2().max(1);
    let zone_size = (size / count).max(1);
    if size % zone_size != 0 {
        count += 1;
    }
    (count, zone_size)
}

fn divide_into_zones(width: u32, height: u32) -> Vec<Zone> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let (count_x, zone_w) = zones_along(width);
    let (count_y, zone_h) = zones_along(height);

    let mut zones = Vec::new();
    for zx in 0..count_x {
        for zy in 0..count_y {
            let start = Pos::new(zx * zone_w, zy * zone_h);
            if start.x >= width || start.y >= height {
                continue;
            }
            let end = Pos::new(
                (start.x + zone_w - 1).min(width - 1),
                (start.y + zone_h - 1).min(height - 1),
            );
            zones.push(Zone { start, end });
        }
    }
    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Biome;

    fn fill_biome(grid: &mut Grid, biome: Biome) {
        let positions: Vec<Pos> = grid.positions().collect();
        for pos in positions {
            grid.cell_mut(pos).biome = Some(biome);
        }
    }

    #[test]
    fn zones_cover_every_cell_once() {
        for (w, h) in [(1, 1), (7, 5), (32, 32), (100, 37)] {
            let zones = divide_into_zones(w, h);
            let grid = Grid::new(w, h);
            for pos in grid.positions() {
                let covering = zones.iter().filter(|z| z.contains(pos)).count();
                assert_eq!(covering, 1, "{pos:?} in {w}x{h}");
            }
        }
    }

    #[test]
    fn zone_count_follows_log2() {
        // 64 / 6 = 10 с остатком → 7 зон по каждой оси
        let zones = divide_into_zones(64, 64);
        assert_eq!(zones.len(), 49);
        // 32 / 5 = 6 с остатком → 6 зон; 16 / 4 делится нацело → 4
        assert_eq!(divide_into_zones(32, 32).len(), 36);
        assert_eq!(divide_into_zones(16, 16).len(), 16);
    }

    #[test]
    fn prefers_ring_neighbours() {
        let grid = Grid::new(16, 16);
        let mut index = ZoneIndex::new(16, 16);
        let near = Pos::new(8, 8);
        let found = index.find_unassigned(&grid, CellProperty::Biome, near);
        assert_eq!(found.len(), 8);
        assert!(found.iter().all(|p| p.ring_distance(near) == 1));
    }

    #[test]
    fn falls_back_to_far_zone() {
        let mut grid = Grid::new(16, 16);
        fill_biome(&mut grid, Biome::Plain);
        let hole = Pos::new(15, 15);
        grid.cell_mut(hole).biome = None;

        let mut index = ZoneIndex::new(16, 16);
        let found = index.find_unassigned(&grid, CellProperty::Biome, Pos::new(0, 0));
        assert_eq!(found, vec![hole]);
        // другие слоты не затронуты
        assert_eq!(
            index.zone_count(CellProperty::Relief),
            divide_into_zones(16, 16).len()
        );
    }

    #[test]
    fn exhausted_zones_are_dropped() {
        let mut grid = Grid::new(16, 16);
        fill_biome(&mut grid, Biome::Plain);
        let mut index = ZoneIndex::new(16, 16);
        let found = index.find_unassigned(&grid, CellProperty::Biome, Pos::new(3, 3));
        assert!(found.is_empty());
        assert_eq!(index.zone_count(CellProperty::Biome), 0);
        assert!(index.zone_count(CellProperty::Object) > 0);
    }
}
