//! Сглаживание одиночных клеток биомов

use tracing::warn;

use crate::error::Result;
use crate::grid::Grid;
use crate::random::Dice;
use crate::terrain::Biome;

/// Одиночная клетка у воды считается островом, если воды вокруг столько или больше
const ISLAND_WATER_NEIGHBOURS: usize = 6;
/// Защита от бесконечных колебаний
const MAX_PASSES: usize = 1000;

/// Клетки суши без соседей своего биома перекрашиваются в биом случайного соседа.
///
/// Проходы повторяются, пока очередной проход что-то меняет. Вода не трогается,
/// как и одиночные острова (6+ соседей — вода). Возвращает число проходов.
pub fn denoise_biomes(grid: &mut Grid, dice: &mut Dice) -> Result<usize> {
    for pass in 1..=MAX_PASSES {
        let mut changed = 0;
        for pos in grid.positions() {
            let Some(biome) = grid.cell(pos).biome() else {
                continue;
            };
            if biome.is_water() {
                continue;
            }

            let around = grid.ring(pos, 1);
            let same = around
                .iter()
                .filter(|&&p| grid.cell(p).biome() == Some(biome))
                .count();
            let water = around.iter().filter(|&&p| grid.is_water(p)).count();
            if same > 0 || water >= ISLAND_WATER_NEIGHBOURS || around.is_empty() {
                continue;
            }

            let donor = *dice.uniform(&around)?;
            if let Some(replacement) = grid.cell(donor).biome() {
                grid.cell_mut(pos).biome = Some(replacement);
                changed += 1;
            }
        }
        if changed == 0 {
            return Ok(pass);
        }
    }
    warn!(passes = MAX_PASSES, "сглаживание биомов не сошлось");
    Ok(MAX_PASSES)
}

/// Выполнено ли условие после сглаживания для клетки суши
#[must_use]
pub fn is_settled(grid: &Grid, pos: crate::grid::Pos) -> bool {
    let Some(biome) = grid.cell(pos).biome() else {
        return false;
    };
    if biome == Biome::Water {
        return true;
    }
    let around = grid.ring(pos, 1);
    around.is_empty()
        || around.iter().any(|&p| grid.cell(p).biome() == Some(biome))
        || around.iter().filter(|&&p| grid.is_water(p)).count() >= ISLAND_WATER_NEIGHBOURS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Pos;

    fn checkerboard(side: u32) -> Grid {
        let mut grid = Grid::new(side, side);
        let positions: Vec<Pos> = grid.positions().collect();
        for pos in positions {
            let biome = match (pos.x % 3, pos.y % 2) {
                (0, _) => Biome::Plain,
                (1, 0) => Biome::Forest,
                (1, _) => Biome::Desert,
                _ => Biome::Swamp,
            };
            grid.cell_mut(pos).biome = Some(biome);
        }
        grid
    }

    #[test]
    fn lonely_cell_takes_neighbour_biome() {
        let mut grid = Grid::new(5, 5);
        let positions: Vec<Pos> = grid.positions().collect();
        for pos in positions {
            grid.cell_mut(pos).biome = Some(Biome::Forest);
        }
        grid.cell_mut(Pos::new(2, 2)).biome = Some(Biome::Desert);

        let mut dice = Dice::new(Some(1));
        denoise_biomes(&mut grid, &mut dice).unwrap();
        assert_eq!(grid.cell(Pos::new(2, 2)).biome(), Some(Biome::Forest));
    }

    #[test]
    fn islands_in_water_are_kept() {
        let mut grid = Grid::new(5, 5);
        let positions: Vec<Pos> = grid.positions().collect();
        for pos in positions {
            grid.cell_mut(pos).biome = Some(Biome::Water);
        }
        grid.cell_mut(Pos::new(2, 2)).biome = Some(Biome::Jungle);

        let mut dice = Dice::new(Some(1));
        let passes = denoise_biomes(&mut grid, &mut dice).unwrap();
        assert_eq!(passes, 1);
        assert_eq!(grid.cell(Pos::new(2, 2)).biome(), Some(Biome::Jungle));
    }

    #[test]
    fn every_land_cell_is_settled_afterwards() {
        let mut grid = checkerboard(24);
        let mut dice = Dice::new(Some(5));
        denoise_biomes(&mut grid, &mut dice).unwrap();
        assert!(grid.positions().all(|p| is_settled(&grid, p)));
    }
}
