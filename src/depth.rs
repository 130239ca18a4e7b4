use crate::grid::{DeepWater, Grid, Pos};

/// Радиус, в котором ищется суша для глубоководья
const DEEP_RADIUS: u32 = 4;
/// Сколько клеток суши в радиусе ещё не мешает глубоководью
const DEEP_LAND_LIMIT: usize = 2;

/// Глубина водной клетки: мелко у берега, глубоко вдали от суши, иначе обычная
#[must_use]
pub fn classify(grid: &Grid, pos: Pos) -> DeepWater {
    let is_land = |p: &Pos| !grid.is_water(*p);
    if grid.ring(pos, 1).iter().any(is_land) {
        DeepWater::Small
    } else if grid.area(pos, DEEP_RADIUS).iter().filter(|&&p| !grid.is_water(p)).count() < DEEP_LAND_LIMIT {
        DeepWater::Deep
    } else {
        DeepWater::Normal
    }
}

/// Размечает глубину у всех водных клеток
pub fn classify_water_depth(grid: &mut Grid) {
    let water = grid.cells_with_biome(crate::terrain::Biome::Water);

    #[cfg(feature = "parallel")]
    let depths: Vec<(Pos, DeepWater)> = {
        use rayon::prelude::*;
        let shared: &Grid = grid;
        water.par_iter().map(|&pos| (pos, classify(shared, pos))).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let depths: Vec<(Pos, DeepWater)> = water.iter().map(|&pos| (pos, classify(grid, pos))).collect();

    for (pos, depth) in depths {
        grid.cell_mut(pos).depth = Some(depth);
    }
}
