use crate::config::RiverScorerSettings;
use crate::grid::{Grid, Pos};
use crate::pathfinding::Scorer;

/// Реки тянутся к воде и низинам, обходят горы и поселения
pub struct RiverScorer {
    settings: RiverScorerSettings,
}

impl RiverScorer {
    #[must_use]
    pub fn new(settings: RiverScorerSettings) -> Self {
        Self { settings }
    }
}

impl Scorer for RiverScorer {
    fn cost(&self, grid: &Grid, _from: Pos, to: Pos) -> f64 {
        let cell = grid.cell(to);
        let mut cost = if cell.is_water() {
            self.settings.water_cost
        } else {
            self.settings.step_cost
        };
        if let Some(relief) = cell.relief() {
            cost += self.settings.relief_cost * f64::from(relief.difficulty());
        }
        if cell.has_settlement() {
            cost += self.settings.settlement_cost;
        }
        cost
    }

    fn estimate(&self, _grid: &Grid, from: Pos, goal: Pos) -> f64 {
        let cheapest = self.settings.water_cost.min(self.settings.step_cost);
        f64::from(from.ring_distance(goal)) * cheapest
    }
}
