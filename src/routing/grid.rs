use std::ops::{Index, IndexMut};

use crate::geometry::Rect;

use super::raw_area::RawArea;

/// Row-major index of a cell in a [`Grid`].
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Debug)]
pub(crate) struct GridPoint(pub u32);

impl<T> Index<GridPoint> for Vec<T> {
    type Output = T;

    fn index(&self, index: GridPoint) -> &Self::Output {
        &self[index.0 as usize]
    }
}

impl<T> IndexMut<GridPoint> for Vec<T> {
    fn index_mut(&mut self, index: GridPoint) -> &mut Self::Output {
        &mut self[index.0 as usize]
    }
}

/// Binary occupancy over a [`RawArea`].
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    pub width: usize,
    pub height: usize,
    pub blocked: Vec<bool>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            blocked: vec![false; width * height],
        }
    }

    /// Marks every cell lying inside an obstacle inflated by `padding`, boundary included.
    pub fn from_obstacles<'a>(area: &RawArea, obstacles: impl IntoIterator<Item = &'a Rect>, padding: f64) -> Self {
        let mut grid = Grid::new(area.width(), area.height());
        let cell = area.cell_size;
        let max_column = grid.width as f64 - 1.0;
        let max_row = grid.height as f64 - 1.0;

        for obstacle in obstacles {
            let padded = obstacle.inflate(padding);
            let first_column = ((padded.left() - area.top_left.x) / cell).ceil().max(0.0);
            let last_column = ((padded.right() - area.top_left.x) / cell).floor().min(max_column);
            let first_row = ((padded.top() - area.top_left.y) / cell).ceil().max(0.0);
            let last_row = ((padded.bottom() - area.top_left.y) / cell).floor().min(max_row);

            if !(first_column <= last_column && first_row <= last_row) {
                continue;
            }

            for row in first_row as usize..=last_row as usize {
                for column in first_column as usize..=last_column as usize {
                    grid.blocked[row * grid.width + column] = true;
                }
            }
        }

        grid
    }

    pub fn coords_to_grid_point(&self, x: i32, y: i32) -> Option<GridPoint> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(GridPoint((y as usize * self.width + x as usize) as u32))
    }

    pub fn grid_point_to_coords(&self, point: GridPoint) -> (i32, i32) {
        let index = point.0 as usize;
        ((index % self.width) as i32, (index / self.width) as i32)
    }

    pub fn is_blocked(&self, point: GridPoint) -> bool {
        self.blocked[point]
    }
}
