//! Дорожная сеть между размещёнными объектами
//!
//! Объекты соединяются парами, а не остовным деревом: связность всей сети не гарантируется.

use tracing::debug;

use crate::error::Result;
use crate::grid::{Grid, Pos, Road};
use crate::objects::{MapObject, RoadAffinity};
use crate::pathfinding::{RoadScorer, RouteFinder};
use crate::random::Dice;

/// Объекты, к которым будут вести дороги: не на воде; `MayConnect` — по броску монеты
fn road_candidates(grid: &Grid, dice: &mut Dice, objects: &[MapObject]) -> Vec<Pos> {
    objects
        .iter()
        .filter(|object| {
            !grid.is_water(object.position)
                && match object.road_affinity() {
                    RoadAffinity::MustConnect => true,
                    RoadAffinity::MayConnect => dice.coin(),
                    RoadAffinity::None => false,
                }
        })
        .map(|object| object.position)
        .collect()
}

/// Прокладывает дороги; возвращает число построенных маршрутов.
///
/// Пока кандидатов больше двух, последний соединяется со случайным другим, и оба
/// выбывают. Ненайденный маршрут просто пропускается.
pub fn build_roads(
    grid: &mut Grid,
    finder: &RouteFinder,
    scorer: &RoadScorer,
    dice: &mut Dice,
    objects: &[MapObject],
) -> Result<usize> {
    let mut candidates = road_candidates(grid, dice, objects);
    let mut built = 0;

    while candidates.len() > 2 {
        let partner = dice.index(candidates.len() - 1)?;
        let Some(from) = candidates.pop() else { break };
        let to = candidates.remove(partner);

        match finder.find_route(grid, scorer, from, to) {
            Ok(route) => {
                lay_road(grid, &route);
                built += 1;
            }
            Err(err) => debug!(%err, "дорога не построена"),
        }
    }
    Ok(built)
}

/// Отмечает маршрут на клетках: стороны к предыдущей и следующей клетке и объект на клетке.
///
/// Дорога ложится на все клетки маршрута, включая обе конечные: клетки объектов
/// получают дорогу с `touches_object`. Стороны хранятся множеством, повторная
/// прокладка того же маршрута ничего не меняет.
pub fn lay_road(grid: &mut Grid, route: &[Pos]) {
    for (i, &pos) in route.iter().enumerate() {
        let previous = i.checked_sub(1).and_then(|p| pos.side_towards(route[p]));
        let next = route.get(i + 1).and_then(|&n| pos.side_towards(n));

        let cell = grid.cell_mut(pos);
        let touches_object = cell.object.is_some();
        let road = cell.road.get_or_insert_with(Road::default);
        road.touches_object |= touches_object;
        for side in previous.into_iter().chain(next) {
            road.connect(side);
        }
    }
}
