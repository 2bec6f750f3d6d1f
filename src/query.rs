//! Geometry helpers for interactive editing: endpoint re-pinning, edge
//! hit-testing and label placement. None of them take part in routing.

use serde::Serialize;

use crate::geometry::{Point, Side};
use crate::graph::Node;

/// Lowest and highest offset a re-pinned endpoint may take along a side.
const MIN_PIN_OFFSET: f64 = 0.1;
const MAX_PIN_OFFSET: f64 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PerimeterPoint {
    pub side: Side,
    pub offset: f64,
    pub x: f64,
    pub y: f64,
}

/// Snaps `(x, y)` to the closest point on the node's border.
///
/// Ties between sides resolve in the order top, right, bottom, left. The
/// offset is kept away from the corners and the returned coordinates follow
/// the clamped offset, not the raw projection.
pub fn nearest_perimeter_point(node: &Node, x: f64, y: f64) -> PerimeterPoint {
    let rect = node.rect();
    let target = Point::new(x, y);

    let mut best: Option<(f64, Side, f64)> = None;
    for side in Side::ALL {
        let (start, end) = match side {
            Side::Top | Side::Bottom => (side.point_on(&rect, 0.0).x, side.point_on(&rect, 1.0).x),
            Side::Left | Side::Right => (side.point_on(&rect, 0.0).y, side.point_on(&rect, 1.0).y),
        };
        let along = match side {
            Side::Top | Side::Bottom => x,
            Side::Left | Side::Right => y,
        };
        let length = end - start;
        let offset = if length.abs() < f64::EPSILON {
            0.5
        } else {
            ((along - start) / length).clamp(0.0, 1.0)
        };
        let distance = side.point_on(&rect, offset).distance(&target);

        if best.map_or(true, |(best_distance, _, _)| distance < best_distance) {
            best = Some((distance, side, offset));
        }
    }

    let (side, offset) = match best {
        Some((_, side, offset)) => (side, offset),
        None => (Side::Top, 0.5),
    };
    let offset = offset.clamp(MIN_PIN_OFFSET, MAX_PIN_OFFSET);
    let point = side.point_on(&rect, offset);
    PerimeterPoint {
        side,
        offset,
        x: point.x,
        y: point.y,
    }
}

fn distance_to_segment(point: &Point, a: &Point, b: &Point) -> f64 {
    let ab = *b - *a;
    let length_squared = ab.x * ab.x + ab.y * ab.y;
    if length_squared == 0.0 {
        return point.distance(a);
    }
    let ap = *point - *a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / length_squared).clamp(0.0, 1.0);
    point.distance(&(*a + ab * t))
}

/// Euclidean distance from `(x, y)` to the nearest segment of `points`.
///
/// A single point is measured directly; an empty polyline is infinitely far.
pub fn distance_to_polyline(x: f64, y: f64, points: &[Point]) -> f64 {
    let point = Point::new(x, y);
    match points {
        [] => f64::INFINITY,
        [only] => point.distance(only),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment(&point, &w[0], &w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Point halfway along the polyline by arc length.
pub fn polyline_midpoint(points: &[Point]) -> Point {
    let Some(first) = points.first() else {
        return Point::default();
    };
    let total: f64 = points.windows(2).map(|w| w[0].distance(&w[1])).sum();
    if total == 0.0 {
        return *first;
    }

    let mut remaining = total / 2.0;
    for w in points.windows(2) {
        let length = w[0].distance(&w[1]);
        if length > 0.0 && remaining <= length {
            return w[0] + (w[1] - w[0]) * (remaining / length);
        }
        remaining -= length;
    }
    points[points.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Node {
        Node::new("n", 100.0, 100.0, 100.0, 50.0)
    }

    #[test]
    fn snaps_to_the_closest_side() {
        let snapped = nearest_perimeter_point(&node(), 150.0, 40.0);
        assert_eq!(snapped.side, Side::Top);
        assert_eq!(snapped.offset, 0.5);
        assert_eq!((snapped.x, snapped.y), (150.0, 100.0));

        let snapped = nearest_perimeter_point(&node(), 260.0, 110.0);
        assert_eq!(snapped.side, Side::Right);
        assert!((snapped.offset - 0.2).abs() < 1e-9);
    }

    #[test]
    fn offsets_stay_away_from_corners() {
        let snapped = nearest_perimeter_point(&node(), 90.0, 160.0);
        assert_eq!(snapped.side, Side::Bottom);
        assert_eq!(snapped.offset, 0.1);
        assert_eq!((snapped.x, snapped.y), (110.0, 150.0));
    }

    #[test]
    fn degenerate_node_uses_the_midpoint() {
        let point = Node::new("p", 10.0, 10.0, 0.0, 0.0);
        let snapped = nearest_perimeter_point(&point, 50.0, 50.0);
        assert_eq!(snapped.side, Side::Top);
        assert_eq!(snapped.offset, 0.5);
        assert_eq!((snapped.x, snapped.y), (10.0, 10.0));
    }

    #[test]
    fn polyline_distance() {
        let route = [Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0)];
        assert_eq!(distance_to_polyline(50.0, 10.0, &route), 10.0);
        assert_eq!(distance_to_polyline(130.0, 50.0, &route), 30.0);
        assert_eq!(distance_to_polyline(-3.0, -4.0, &route), 5.0);
        assert_eq!(distance_to_polyline(3.0, 4.0, &route[..1]), 5.0);
        assert_eq!(distance_to_polyline(3.0, 4.0, &[]), f64::INFINITY);
    }

    #[test]
    fn midpoint_by_arc_length() {
        let route = [Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0)];
        assert_eq!(polyline_midpoint(&route), Point::new(100.0, 0.0));

        let route = [Point::new(0.0, 0.0), Point::new(0.0, 40.0), Point::new(20.0, 40.0)];
        assert_eq!(polyline_midpoint(&route), Point::new(0.0, 30.0));
    }

    #[test]
    fn midpoint_of_degenerate_polylines() {
        assert_eq!(polyline_midpoint(&[]), Point::new(0.0, 0.0));
        let point = Point::new(4.0, 2.0);
        assert_eq!(polyline_midpoint(&[point, point]), point);
    }
}
