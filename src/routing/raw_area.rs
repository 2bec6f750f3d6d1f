use crate::geometry::{BoundingBox, Point};
use crate::graph::Node;

/// Margin-padded bounding box of a diagram, quantized into square cells.
///
/// Cell `(0, 0)` sits on `top_left`; cell `(c, r)` is the world point
/// `top_left + (c, r) * cell_size`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RawArea {
    pub top_left: Point,
    pub bottom_right: Point,
    pub cell_size: f64,
}

impl RawArea {
    /// Returns `None` for an empty node list or non-finite extents.
    pub fn around(nodes: &[Node], margin: f64, cell_size: f64) -> Option<Self> {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for node in nodes {
            let tl = node.top_left();
            let br = node.bottom_right();
            min_x = min_x.min(tl.x.min(br.x));
            min_y = min_y.min(tl.y.min(br.y));
            max_x = max_x.max(tl.x.max(br.x));
            max_y = max_y.max(tl.y.max(br.y));
        }

        if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
            return None;
        }

        Some(RawArea {
            top_left: Point::new(min_x - margin, min_y - margin),
            bottom_right: Point::new(max_x + margin, max_y + margin),
            cell_size,
        })
    }

    /// Number of cell columns.
    pub fn width(&self) -> usize {
        ((self.bottom_right.x - self.top_left.x) / self.cell_size).ceil() as usize + 1
    }

    /// Number of cell rows.
    pub fn height(&self) -> usize {
        ((self.bottom_right.y - self.top_left.y) / self.cell_size).ceil() as usize + 1
    }

    pub fn size(&self) -> usize {
        self.width().saturating_mul(self.height())
    }

    /// Nearest cell to `point`, clamped into the area.
    pub fn point_to_cell(&self, point: &Point) -> (i32, i32) {
        let column = ((point.x - self.top_left.x) / self.cell_size).round();
        let row = ((point.y - self.top_left.y) / self.cell_size).round();
        let max_column = self.width().saturating_sub(1) as f64;
        let max_row = self.height().saturating_sub(1) as f64;
        (column.clamp(0.0, max_column) as i32, row.clamp(0.0, max_row) as i32)
    }

    pub fn cell_to_point(&self, cell: (i32, i32)) -> Point {
        Point::new(
            self.top_left.x + cell.0 as f64 * self.cell_size,
            self.top_left.y + cell.1 as f64 * self.cell_size,
        )
    }
}
