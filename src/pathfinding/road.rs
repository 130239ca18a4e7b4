use crate::config::RoadScorerSettings;
use crate::grid::{Grid, Pos};
use crate::pathfinding::Scorer;

/// Самый лёгкий биом (`Biome::Plain`)
const MIN_TRAVEL_COST: f64 = 1.0;

/// Дороги переиспользуют себя и обходят воду и сложный рельеф
pub struct RoadScorer {
    settings: RoadScorerSettings,
}

impl RoadScorer {
    #[must_use]
    pub fn new(settings: RoadScorerSettings) -> Self {
        Self { settings }
    }
}

impl Scorer for RoadScorer {
    fn cost(&self, grid: &Grid, _from: Pos, to: Pos) -> f64 {
        let cell = grid.cell(to);
        if cell.road().is_some() {
            return self.settings.road_cost;
        }

        let travel = cell.biome().map_or(MIN_TRAVEL_COST, |b| b.travel_cost());
        let mut cost = self.settings.step_cost * travel;
        if let Some(relief) = cell.relief() {
            cost += self.settings.relief_cost * f64::from(relief.difficulty());
        }
        if cell.is_water() {
            cost += self.settings.water_cost;
        }
        cost
    }

    fn estimate(&self, _grid: &Grid, from: Pos, goal: Pos) -> f64 {
        let cheapest = self
            .settings
            .road_cost
            .min(self.settings.step_cost * MIN_TRAVEL_COST);
        f64::from(from.ring_distance(goal)) * cheapest
    }
}
