//! Фазы воды, работающие отдельно от выращивания биомов

use crate::error::Result;
use crate::growth::quadrant_points;
use crate::grid::Grid;
use crate::random::Dice;
use crate::terrain::{Biome, CellProperty};
use crate::zones::ZoneIndex;

/// Доля посещений, которые не создают воду
const ISLAND_SKIP_CHANCE: f64 = 0.25;
/// Доля посещений, затапливающих только текущую клетку
const ISLAND_SINGLE_CHANCE: f64 = 0.1;

fn water_steps(grid: &Grid, amount: f64) -> i64 {
    (grid.len() as f64 * amount) as i64
}

/// Случайные блуждания: четыре ходока шагают к случайному соседу и затапливают его.
///
/// Ходоки не избегают уже затопленных клеток, поэтому воды обычно меньше, чем `amount`.
pub fn flood_walk(grid: &mut Grid, dice: &mut Dice, amount: f64) -> Result<()> {
    let mut steps = water_steps(grid, amount);
    let mut walkers = quadrant_points(grid.width(), grid.height(), dice);

    while steps > 0 {
        for walker in &mut walkers {
            steps -= 1;
            let around = grid.ring(*walker, 1);
            if around.is_empty() {
                return Ok(());
            }
            *walker = *dice.uniform(&around)?;
            grid.cell_mut(*walker).biome = Some(Biome::Water);
        }
    }
    Ok(())
}

/// Россыпь воды с мелкими островами.
///
/// Ходоки идут по клеткам без биома; часть посещений пропускается, часть затапливает
/// только текущую клетку, остальные — случайное число соседей.
pub fn scatter_islands(
    grid: &mut Grid,
    zones: &mut ZoneIndex,
    dice: &mut Dice,
    amount: f64,
) -> Result<()> {
    let mut steps = water_steps(grid, amount);
    let mut walkers = quadrant_points(grid.width(), grid.height(), dice);

    for &point in &walkers {
        grid.cell_mut(point).biome = Some(Biome::Water);
        steps -= 1;
    }

    while steps > 0 {
        for walker in &mut walkers {
            let candidates = zones.find_unassigned(grid, CellProperty::Biome, *walker);
            if candidates.is_empty() {
                return Ok(());
            }
            *walker = *dice.uniform(&candidates)?;
            steps -= 1;

            if dice.chance(ISLAND_SKIP_CHANCE) {
                continue;
            }
            if dice.chance(ISLAND_SINGLE_CHANCE) {
                grid.cell_mut(*walker).biome = Some(Biome::Water);
                continue;
            }

            let mut around = grid.ring(*walker, 1);
            let mut flooded = dice.range(0, around.len() as i64 - 1);
            while flooded > 0 && !around.is_empty() {
                let idx = dice.index(around.len())?;
                let pos = around.swap_remove(idx);
                grid.cell_mut(pos).biome = Some(Biome::Water);
                flooded -= 1;
            }
        }
    }
    Ok(())
}
