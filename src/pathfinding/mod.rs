//! Поиск маршрутов по сетке (A*)
//!
//! Граф строится один раз: узел — клетка, рёбра — восемь соседей. Стоимость шага и
//! эвристику задаёт [`Scorer`], поэтому граф переиспользуется и для рек, и для дорог,
//! пока содержимое клеток меняется между маршрутами.

pub mod river;
pub mod road;

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::{GenerationError, Result};
use crate::grid::{Grid, Pos};

pub use river::RiverScorer;
pub use road::RoadScorer;

/// Оценщик маршрута: стоимость шага и допустимая (не завышающая) оценка до цели
pub trait Scorer {
    /// Стоимость шага из `from` в соседнюю клетку `to`
    fn cost(&self, grid: &Grid, from: Pos, to: Pos) -> f64;

    /// Нижняя оценка стоимости пути от `from` до `goal`
    fn estimate(&self, grid: &Grid, from: Pos, goal: Pos) -> f64;
}

pub struct RouteFinder {
    graph: DiGraph<Pos, ()>,
    width: u32,
}

impl RouteFinder {
    /// Граф соседства для сетки данного размера; индексы узлов идут построчно
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        let mut graph = DiGraph::with_capacity(grid.len(), grid.len() * 8);
        for pos in grid.positions() {
            graph.add_node(pos);
        }
        let width = grid.width();
        for pos in grid.positions() {
            for neighbour in grid.ring(pos, 1) {
                graph.add_edge(node_of(width, pos), node_of(width, neighbour), ());
            }
        }
        Self { graph, width }
    }

    /// Самый дешёвый маршрут от `from` до `to` включительно
    pub fn find_route(
        &self,
        grid: &Grid,
        scorer: &impl Scorer,
        from: Pos,
        to: Pos,
    ) -> Result<Vec<Pos>> {
        let goal = node_of(self.width, to);
        let found = astar(
            &self.graph,
            node_of(self.width, from),
            |node| node == goal,
            |edge| scorer.cost(grid, self.graph[edge.source()], self.graph[edge.target()]),
            |node| scorer.estimate(grid, self.graph[node], to),
        );

        match found {
            Some((_, path)) => Ok(path.into_iter().map(|node| self.graph[node]).collect()),
            None => Err(GenerationError::RouteNotFound { from, to }),
        }
    }
}

fn node_of(width: u32, pos: Pos) -> NodeIndex {
    NodeIndex::new((pos.y as usize) * (width as usize) + pos.x as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Каждый шаг стоит 1
    struct Flat;

    impl Scorer for Flat {
        fn cost(&self, _: &Grid, _: Pos, _: Pos) -> f64 {
            1.0
        }

        fn estimate(&self, _: &Grid, from: Pos, goal: Pos) -> f64 {
            f64::from(from.ring_distance(goal))
        }
    }

    #[test]
    fn diagonal_route_is_shortest() {
        let grid = Grid::new(10, 10);
        let finder = RouteFinder::new(&grid);
        let route = finder
            .find_route(&grid, &Flat, Pos::new(0, 0), Pos::new(5, 5))
            .unwrap();
        assert_eq!(route.len(), 6);
        assert_eq!(route.first(), Some(&Pos::new(0, 0)));
        assert_eq!(route.last(), Some(&Pos::new(5, 5)));
        for pair in route.windows(2) {
            assert_eq!(pair[0].ring_distance(pair[1]), 1);
        }
    }

    #[test]
    fn route_to_itself_is_single_cell() {
        let grid = Grid::new(4, 4);
        let finder = RouteFinder::new(&grid);
        let route = finder
            .find_route(&grid, &Flat, Pos::new(2, 1), Pos::new(2, 1))
            .unwrap();
        assert_eq!(route, vec![Pos::new(2, 1)]);
    }

    #[test]
    fn non_square_grid_uses_row_major_nodes() {
        let grid = Grid::new(7, 3);
        let finder = RouteFinder::new(&grid);
        let route = finder
            .find_route(&grid, &Flat, Pos::new(6, 0), Pos::new(0, 2))
            .unwrap();
        assert_eq!(route.len(), 7);
        assert_eq!(route.last(), Some(&Pos::new(0, 2)));
    }
}
