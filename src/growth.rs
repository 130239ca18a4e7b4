//! Выращивание регионов (диффузия биомов и рельефа)
//!
//! Четыре «ходока» стартуют в четвертях карты и бродят по незаполненным клеткам,
//! выбирая значение либо по соседям (крупные связные области), либо принудительно новое.
//! Один и тот же механизм заполняет и биомы, и рельеф.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Result;
use crate::grid::{Grid, Pos};
use crate::random::Dice;
use crate::terrain::TerrainLayer;
use crate::zones::ZoneIndex;

/// Вес соседа из кольца 1
const NEAR_WEIGHT: f64 = 7.0;
/// Вес соседа из кольца 2
const FAR_WEIGHT: f64 = 1.0;
/// Бонус предыдущему значению ходока
const LAST_VALUE_BONUS: f64 = 15.0;

/// Четыре стартовые точки, по одной на четверть карты, со сдвигом до ±1/5 размера
pub fn quadrant_points(width: u32, height: u32, dice: &mut Dice) -> Vec<Pos> {
    let (w, h) = (i64::from(width), i64::from(height));
    let jitter = |dice: &mut Dice, size: i64| dice.range(-(size / 5), size / 5);

    [(w / 4, h / 4), (w / 4, h - h / 4), (w - w / 4, h / 4), (w - w / 4, h - h / 4)]
        .into_iter()
        .map(|(x, y)| {
            let y = (y + jitter(dice, h)).clamp(0, h - 1);
            let x = (x + jitter(dice, w)).clamp(0, w - 1);
            Pos::new(x as u32, y as u32)
        })
        .collect()
}

pub struct RegionGrower<T: TerrainLayer> {
    catalog: Vec<T>,
    counts: BTreeMap<T, usize>,
    new_value_coefficient: f64,
    equal_distribution: bool,
    /// Для воды перепредставленность не форсирует смену значения
    water_exempt: bool,
}

impl<T: TerrainLayer> RegionGrower<T> {
    #[must_use]
    pub fn new(catalog: Vec<T>, new_value_coefficient: f64) -> Self {
        let counts = catalog.iter().map(|&v| (v, 0)).collect();
        Self {
            catalog,
            counts,
            new_value_coefficient,
            equal_distribution: false,
            water_exempt: false,
        }
    }

    #[must_use]
    pub fn with_equal_distribution(mut self, enabled: bool, water_exempt: bool) -> Self {
        self.equal_distribution = enabled;
        self.water_exempt = water_exempt;
        self
    }

    /// Сколько клеток получило каждое значение (включая стартовые пятна)
    #[must_use]
    pub fn counts(&self) -> &BTreeMap<T, usize> {
        &self.counts
    }

    fn increase(&mut self, value: T) {
        *self.counts.entry(value).or_default() += 1;
    }

    fn count(&self, value: T) -> usize {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    /// Заполняет слот `T` во всех клетках сетки
    pub fn grow(&mut self, grid: &mut Grid, zones: &mut ZoneIndex, dice: &mut Dice) -> Result<()> {
        let unassigned = grid.len() - grid.count_assigned(T::PROPERTY);
        let mut steps = unassigned as i64;
        let mut walkers = quadrant_points(grid.width(), grid.height(), dice);

        // стартовые пятна: точка и её кольцо 1
        for &point in &walkers {
            let value = *dice.uniform(&self.catalog)?;
            for pos in grid.area(point, 1) {
                let cell = grid.cell_mut(pos);
                // клетка могла быть заполнена раньше (например, водой)
                if T::read(cell).is_none() {
                    steps -= 1;
                }
                T::write(cell, value);
                self.increase(value);
            }
        }

        while steps > 0 {
            for walker in &mut walkers {
                let last = T::read(grid.cell(*walker));
                let candidates = zones.find_unassigned(grid, T::PROPERTY, *walker);
                if candidates.is_empty() {
                    debug!(property = ?T::PROPERTY, steps, "незаполненных клеток не осталось");
                    return Ok(());
                }
                *walker = *dice.uniform(&candidates)?;

                let value = if self.should_force_new(last, unassigned, dice) {
                    self.least_represented().or(last)
                } else {
                    Some(self.from_neighbourhood(grid, *walker, last, dice)?)
                };
                let Some(value) = value else { continue };

                T::write(grid.cell_mut(*walker), value);
                self.increase(value);
                steps -= 1;
            }
        }
        Ok(())
    }

    fn should_force_new(&self, last: Option<T>, unassigned: usize, dice: &mut Dice) -> bool {
        if self.equal_distribution {
            if let Some(last) = last {
                let fair_share = unassigned / self.catalog.len();
                if self.count(last) > fair_share && !(self.water_exempt && last.is_water()) {
                    return true;
                }
            }
        }
        dice.chance(self.new_value_coefficient)
    }

    /// Значение каталога с наименьшим счётчиком; при равенстве — первое по каталогу
    fn least_represented(&self) -> Option<T> {
        self.catalog.iter().copied().min_by_key(|&v| self.count(v))
    }

    fn from_neighbourhood(&self, grid: &Grid, at: Pos, last: Option<T>, dice: &mut Dice) -> Result<T> {
        let mut weights: BTreeMap<T, f64> = BTreeMap::new();
        for (ring, weight) in [(1, NEAR_WEIGHT), (2, FAR_WEIGHT)] {
            for pos in grid.ring(at, ring) {
                if let Some(value) = T::read(grid.cell(pos)) {
                    *weights.entry(value).or_default() += weight;
                }
            }
        }
        if let Some(bonus) = last.and_then(|l| weights.get_mut(&l)) {
            *bonus += LAST_VALUE_BONUS;
        }

        match dice.weighted(&weights) {
            Some(value) => Ok(value),
            None => Ok(*dice.uniform(&self.catalog)?),
        }
    }
}
