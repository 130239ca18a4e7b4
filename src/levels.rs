//! Уровни сложности клеток
//!
//! Рядом с поселениями и дорогами безопасно; чем дальше от них, тем выше уровень.

use crate::grid::{Cell, Grid, Pos};
use crate::random::Dice;

/// Дальше этого кольца поселения и дороги не ищутся
const SEARCH_RINGS: u32 = 4;

fn is_civilised(cell: &Cell) -> bool {
    cell.has_settlement() || cell.road().is_some()
}

/// Номер ближайшего кольца с поселением или дорогой; `SEARCH_RINGS + 1`, если их нет
fn distance_to_civilisation(grid: &Grid, pos: Pos) -> u32 {
    (1..=SEARCH_RINGS)
        .find(|&k| grid.ring(pos, k).iter().any(|&p| is_civilised(grid.cell(p))))
        .unwrap_or(SEARCH_RINGS + 1)
}

pub fn assign_levels(grid: &mut Grid, dice: &mut Dice) {
    for pos in grid.positions() {
        let level = if is_civilised(grid.cell(pos)) {
            dice.range(1, 6)
        } else {
            let ring = i64::from(distance_to_civilisation(grid, pos));
            dice.range(10 * ring - 5, 10 * ring + 6)
        };
        grid.cell_mut(pos).level = level as u32;
    }
}
