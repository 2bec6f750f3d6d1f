use crate::geometry::{Direction, Orientation, Point, Rect};

use super::postprocess::simplify;

/// Direct 1-2 bend route between the two stub ends, used when the search fails.
///
/// Parallel exit axes bend twice through the shared midline (Z shape),
/// perpendicular exit axes bend once (L shape). The result goes through the
/// regular post-processing, which clears any obstacle the bends run into.
pub(crate) fn route_direct(start: Point, start_direction: Direction, end: Point, end_direction: Direction) -> Vec<Point> {
    let points = match (start_direction.orientation(), end_direction.orientation()) {
        (Orientation::Horizontal, Orientation::Horizontal) => {
            let mid_x = (start.x + end.x) / 2.0;
            vec![start, Point::new(mid_x, start.y), Point::new(mid_x, end.y), end]
        }
        (Orientation::Vertical, Orientation::Vertical) => {
            let mid_y = (start.y + end.y) / 2.0;
            vec![start, Point::new(start.x, mid_y), Point::new(end.x, mid_y), end]
        }
        (Orientation::Horizontal, Orientation::Vertical) => vec![start, Point::new(end.x, start.y), end],
        (Orientation::Vertical, Orientation::Horizontal) => vec![start, Point::new(start.x, end.y), end],
    };
    simplify(points)
}

/// Loop from one stub end of a node back to another, running along the
/// boundary of `around` the short way round.
pub(crate) fn route_loop(around: &Rect, start: Point, end: Point) -> Vec<Point> {
    let mut points = vec![start];
    points.extend(around.perimeter_path(&start, &end));
    points.push(end);
    simplify(points)
}
