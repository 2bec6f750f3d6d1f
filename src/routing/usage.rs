use crate::geometry::Point;

use super::grid::GridPoint;
use super::raw_area::RawArea;
use super::types::walk_manhattan_steps;

/// Cells touched by edges already routed in the current call.
#[derive(Clone, Debug)]
pub(crate) struct UsageGrid {
    width: usize,
    used: Vec<bool>,
}

impl UsageGrid {
    pub fn new(area: &RawArea) -> Self {
        UsageGrid {
            width: area.width(),
            used: vec![false; area.size()],
        }
    }

    pub fn is_used(&self, point: GridPoint) -> bool {
        self.used.get(point.0 as usize).copied().unwrap_or(false)
    }

    /// Marks every cell under every segment of `route`.
    pub fn mark_route(&mut self, area: &RawArea, route: &[Point]) {
        let width = self.width;
        let used = &mut self.used;
        for window in route.windows(2) {
            let from = area.point_to_cell(&window[0]);
            let to = area.point_to_cell(&window[1]);
            walk_manhattan_steps(from, to, |(x, y)| {
                if let Some(cell) = used.get_mut(y as usize * width + x as usize) {
                    *cell = true;
                }
            });
        }
    }

    pub fn used_count(&self) -> usize {
        self.used.iter().filter(|used| **used).count()
    }
}
