use crate::geometry::Direction;

use super::grid::{Grid, GridPoint};
use super::usage::UsageGrid;

/// Occupancy grid as seen by one search: stub cells forced open, usage overlay attached.
#[derive(Clone)]
pub(crate) struct MaskedGrid<'a> {
    pub(crate) grid: &'a Grid,
    pub(crate) usage: Option<&'a UsageGrid>,
    forced_open: [GridPoint; 2],
}

impl<'a> MaskedGrid<'a> {
    pub fn new(grid: &'a Grid, usage: Option<&'a UsageGrid>, forced_open: [GridPoint; 2]) -> Self {
        MaskedGrid {
            grid,
            usage,
            forced_open,
        }
    }

    pub fn is_passable(&self, point: GridPoint) -> bool {
        self.forced_open.contains(&point) || !self.grid.is_blocked(point)
    }

    pub fn is_used(&self, point: GridPoint) -> bool {
        self.usage.map_or(false, |usage| usage.is_used(point))
    }

    /// Collects passable orthogonal neighbours, never reversing `direction` in place.
    pub(crate) fn fill_neighbors(
        &self,
        grid_point: GridPoint,
        direction: Direction,
        neighbors: &mut Vec<(GridPoint, Direction)>,
    ) {
        neighbors.clear();

        let (x, y) = self.grid.grid_point_to_coords(grid_point);

        for next_direction in Direction::ALL {
            if next_direction == direction.opposite() {
                continue;
            }
            let (dx, dy) = next_direction.delta();
            let Some(neighbor) = self.grid.coords_to_grid_point(x + dx, y + dy) else {
                continue;
            };
            if self.is_passable(neighbor) {
                neighbors.push((neighbor, next_direction));
            }
        }
    }
}
