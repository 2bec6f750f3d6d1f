use std::cmp::Reverse;

use hashbrown::HashMap;
use priority_queue::PriorityQueue;

use crate::geometry::Direction;

use super::grid::GridPoint;
use super::masked_grid::MaskedGrid;

/// Direction is part of the state because turning is penalised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GridState {
    index: GridPoint,
    direction: Direction,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct StepCosts {
    pub turn: u32,
    pub cross: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SearchResult {
    pub path: Vec<GridPoint>,
    pub expanded: usize,
}

/// A* over `(cell, entry direction)` states.
///
/// Each step costs 1, plus `turn` on a direction change, plus `cross` when the
/// entered cell is marked in the usage overlay. The Manhattan heuristic ignores
/// both penalties, so the result is not guaranteed cost-optimal. Any arrival
/// direction at `goal` is accepted. `None` means the open set ran dry.
pub(crate) fn route_grid_astar(
    masked_grid: &MaskedGrid,
    start: GridPoint,
    start_direction: Direction,
    goal: GridPoint,
    costs: StepCosts,
) -> Option<SearchResult> {
    if start == goal {
        return Some(SearchResult {
            path: vec![start],
            expanded: 0,
        });
    }

    let goal_coords = masked_grid.grid.grid_point_to_coords(goal);
    let heuristic = |index: GridPoint| -> u32 {
        let (x, y) = masked_grid.grid.grid_point_to_coords(index);
        (x - goal_coords.0).unsigned_abs() + (y - goal_coords.1).unsigned_abs()
    };

    let start_state = GridState {
        index: start,
        direction: start_direction,
    };

    // Ties on f are broken by insertion order, earliest first.
    let mut open_set: PriorityQueue<GridState, Reverse<(u32, u64)>> = PriorityQueue::new();
    let mut came_from: HashMap<GridState, GridState> = HashMap::new();
    let mut g_score: HashMap<GridState, u32> = HashMap::new();
    let mut insert_counter: u64 = 0;
    let mut expanded = 0;

    g_score.insert(start_state, 0);
    open_set.push(start_state, Reverse((heuristic(start), insert_counter)));

    let mut neighbors_buf: Vec<(GridPoint, Direction)> = Vec::with_capacity(3);

    while let Some((current_state, _)) = open_set.pop() {
        if current_state.index == goal {
            let mut path = vec![current_state.index];
            let mut cursor = current_state;
            while let Some(prev) = came_from.get(&cursor).copied() {
                cursor = prev;
                path.push(cursor.index);
            }
            path.reverse();
            return Some(SearchResult { path, expanded });
        }

        expanded += 1;
        let current_g = g_score.get(&current_state).copied().unwrap_or(u32::MAX);

        masked_grid.fill_neighbors(current_state.index, current_state.direction, &mut neighbors_buf);
        for (neighbor_index, neighbor_direction) in neighbors_buf.iter().copied() {
            let neighbor_state = GridState {
                index: neighbor_index,
                direction: neighbor_direction,
            };

            let mut step_cost = 1;
            if neighbor_direction != current_state.direction {
                step_cost += costs.turn;
            }
            if masked_grid.is_used(neighbor_index) {
                step_cost += costs.cross;
            }

            let tentative_g = current_g.saturating_add(step_cost);
            if tentative_g >= g_score.get(&neighbor_state).copied().unwrap_or(u32::MAX) {
                continue;
            }

            came_from.insert(neighbor_state, current_state);
            g_score.insert(neighbor_state, tentative_g);
            insert_counter += 1;
            let f_score = tentative_g.saturating_add(heuristic(neighbor_index));
            open_set.push_increase(neighbor_state, Reverse((f_score, insert_counter)));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::grid::Grid;
    use crate::routing::raw_area::RawArea;
    use crate::routing::usage::UsageGrid;
    use crate::geometry::Point;

    const COSTS: StepCosts = StepCosts { turn: 5, cross: 3 };

    fn coords(grid: &Grid, path: &[GridPoint]) -> Vec<(i32, i32)> {
        path.iter().map(|p| grid.grid_point_to_coords(*p)).collect()
    }

    #[test]
    fn straight_line_when_unobstructed() {
        let grid = Grid::new(10, 5);
        let start = grid.coords_to_grid_point(1, 2).unwrap();
        let goal = grid.coords_to_grid_point(8, 2).unwrap();
        let masked = MaskedGrid::new(&grid, None, [start, goal]);

        let result = route_grid_astar(&masked, start, Direction::Right, goal, COSTS).unwrap();
        let cells = coords(&grid, &result.path);
        assert_eq!(cells.first(), Some(&(1, 2)));
        assert_eq!(cells.last(), Some(&(8, 2)));
        assert!(cells.iter().all(|(_, y)| *y == 2));
        assert_eq!(cells.len(), 8);
    }

    #[test]
    fn walks_around_a_wall() {
        let mut grid = Grid::new(9, 7);
        for y in 0..6 {
            let cell = grid.coords_to_grid_point(4, y).unwrap();
            grid.blocked[cell] = true;
        }
        let start = grid.coords_to_grid_point(1, 1).unwrap();
        let goal = grid.coords_to_grid_point(7, 1).unwrap();
        let masked = MaskedGrid::new(&grid, None, [start, goal]);

        let result = route_grid_astar(&masked, start, Direction::Right, goal, COSTS).unwrap();
        let cells = coords(&grid, &result.path);
        assert!(cells.contains(&(4, 6)));
        for pair in cells.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!((a.0 - b.0).abs() + (a.1 - b.1).abs(), 1);
        }
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let mut grid = Grid::new(7, 7);
        for (x, y) in [(4, 3), (6, 3), (5, 2), (5, 4)] {
            let cell = grid.coords_to_grid_point(x, y).unwrap();
            grid.blocked[cell] = true;
        }
        let start = grid.coords_to_grid_point(0, 0).unwrap();
        let goal = grid.coords_to_grid_point(5, 3).unwrap();
        let masked = MaskedGrid::new(&grid, None, [start, goal]);

        assert_eq!(route_grid_astar(&masked, start, Direction::Right, goal, COSTS), None);
    }

    #[test]
    fn used_cells_are_avoided_when_cheap_to_do_so() {
        let area = RawArea {
            top_left: Point::new(0.0, 0.0),
            bottom_right: Point::new(100.0, 60.0),
            cell_size: 10.0,
        };
        let grid = Grid::new(area.width(), area.height());
        let mut usage = UsageGrid::new(&area);
        // A vertical wall of used cells at x = 5, rows 0..=4, the free row is y = 6.
        usage.mark_route(&area, &[Point::new(50.0, 0.0), Point::new(50.0, 40.0)]);

        let start = grid.coords_to_grid_point(0, 2).unwrap();
        let goal = grid.coords_to_grid_point(10, 2).unwrap();

        let plain = MaskedGrid::new(&grid, None, [start, goal]);
        let crossing = MaskedGrid::new(&grid, Some(&usage), [start, goal]);
        let direct = route_grid_astar(&plain, start, Direction::Right, goal, COSTS).unwrap();
        let penalised = route_grid_astar(&crossing, start, Direction::Right, goal, StepCosts { turn: 1, cross: 50 }).unwrap();

        assert!(coords(&grid, &direct.path).iter().all(|(_, y)| *y == 2));
        assert!(!penalised.path.iter().any(|p| usage.is_used(*p)));
    }
}
