//! Размещение поселений и подземелий
//!
//! Вокруг каждого объекта держится свободная зона радиуса 2: в ней не может стоять другой объект.

use tracing::debug;

use crate::error::{GenerationError, Result};
use crate::growth::quadrant_points;
use crate::grid::{Grid, Pos};
use crate::objects::MapObject;
use crate::random::Dice;
use crate::terrain::CellProperty;
use crate::zones::ZoneIndex;

/// Радиус свободной зоны вокруг объекта
pub const OBJECT_CLEARANCE: u32 = 2;
/// Попыток на одно подземелье
pub const DUNGEON_ATTEMPTS: u32 = 100;
/// Сколько подряд пачек стартовых точек может не дать ни одного нового места
const IDLE_BATCH_LIMIT: usize = 100;

fn is_clear(grid: &Grid, pos: Pos) -> bool {
    grid.area(pos, OBJECT_CLEARANCE)
        .iter()
        .all(|&p| grid.cell(p).object().is_none())
}

fn is_free_land(grid: &Grid, pos: Pos) -> bool {
    !grid.is_water(pos) && is_clear(grid, pos)
}

/// Места для поселений: стартовые точки по четвертям, не ближе радиуса 2 друг к другу
fn settlement_candidates(grid: &Grid, dice: &mut Dice, count: usize) -> Vec<Pos> {
    let mut candidates: Vec<Pos> = Vec::with_capacity(count);
    let mut idle = 0;
    while candidates.len() < count && idle < IDLE_BATCH_LIMIT {
        let before = candidates.len();
        for point in quadrant_points(grid.width(), grid.height(), dice) {
            if candidates.len() == count {
                break;
            }
            if candidates
                .iter()
                .all(|c| c.ring_distance(point) > OBJECT_CLEARANCE)
            {
                candidates.push(point);
            }
        }
        idle = if candidates.len() == before { idle + 1 } else { 0 };
    }
    candidates
}

/// Уводит точку с воды блужданием по клеткам без объектов
fn walk_to_land(grid: &Grid, zones: &mut ZoneIndex, dice: &mut Dice, start: Pos) -> Result<Option<Pos>> {
    let mut point = start;
    for _ in 0..grid.len() * 4 {
        if is_free_land(grid, point) {
            return Ok(Some(point));
        }
        let candidates = zones.find_unassigned(grid, CellProperty::Object, point);
        if candidates.is_empty() {
            return Ok(None);
        }
        point = *dice.uniform(&candidates)?;
    }

    // блуждание не нашло сушу — берём любую свободную
    let free: Vec<Pos> = grid.positions().filter(|&p| is_free_land(grid, p)).collect();
    if free.is_empty() {
        return Ok(None);
    }
    Ok(Some(*dice.uniform(&free)?))
}

/// Размещает до `count` поселений; id выдаются подряд начиная с `first_id`
pub fn place_settlements(
    grid: &mut Grid,
    zones: &mut ZoneIndex,
    dice: &mut Dice,
    count: usize,
    first_id: u32,
) -> Result<Vec<MapObject>> {
    let mut placed = Vec::with_capacity(count);
    for point in settlement_candidates(grid, dice, count) {
        let Some(pos) = walk_to_land(grid, zones, dice, point)? else {
            debug!(?point, "нет свободной суши для поселения");
            continue;
        };
        let settlement = MapObject::settlement(first_id + placed.len() as u32, pos);
        grid.cell_mut(pos).object = Some(settlement.clone());
        placed.push(settlement);
    }
    Ok(placed)
}

/// Одна попытка разместить подземелье в случайной свободной клетке
pub fn try_place_dungeon(grid: &mut Grid, dice: &mut Dice, id: u32) -> Result<MapObject> {
    let (max_x, max_y) = (i64::from(grid.width()) - 1, i64::from(grid.height()) - 1);
    for _ in 0..DUNGEON_ATTEMPTS {
        let pos = Pos::new(dice.range(0, max_x) as u32, dice.range(0, max_y) as u32);
        if is_clear(grid, pos) {
            let dungeon = MapObject::dungeon(id, pos);
            grid.cell_mut(pos).object = Some(dungeon.clone());
            return Ok(dungeon);
        }
    }
    Err(GenerationError::PlacementExhausted {
        id,
        attempts: DUNGEON_ATTEMPTS,
    })
}

/// Размещает подземелья; не поместившиеся молча пропускаются
pub fn place_dungeons(grid: &mut Grid, dice: &mut Dice, count: usize, first_id: u32) -> Vec<MapObject> {
    let mut placed = Vec::with_capacity(count);
    for _ in 0..count {
        match try_place_dungeon(grid, dice, first_id + placed.len() as u32) {
            Ok(dungeon) => placed.push(dungeon),
            Err(err) => debug!(%err, "подземелье пропущено"),
        }
    }
    placed
}
