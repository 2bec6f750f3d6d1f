use crate::geometry::{approx_eq, Direction, Orientation, Point, Rect, EPSILON};

use super::obstacles::ObstacleIndex;
use super::raw_area::RawArea;
use super::types::{Port, RawPath, RoutingConfig};

/// Turns a raw search or fallback path into the final orthogonal polyline.
///
/// Stages, in order: simplify, endpoint alignment, stitching to the ports,
/// kink smoothing, orthogonality, obstacle detours, perpendicular entry.
/// Detours run again if the perpendicular stubs clip a neighbour.
pub(crate) struct PostProcessor<'a> {
    pub config: &'a RoutingConfig,
    pub area: &'a RawArea,
    pub obstacles: &'a ObstacleIndex,
    /// Input positions of the edge's own endpoint nodes.
    pub exclude: [usize; 2],
}

impl<'a> PostProcessor<'a> {
    pub fn finish(&self, raw: &RawPath, from: &Port, to: &Port) -> Vec<Point> {
        let world = raw.to_world(self.area);
        let mut points = simplify(world);
        align_endpoints(&mut points, from, to);
        let mut points = stitch(points, from, to);
        smooth_kinks(&mut points, self.config.kink_length(), self.config.kink_passes);
        let mut points = enforce_orthogonal(&points, from);
        self.route_around_obstacles(&mut points);
        enforce_perpendicular_ends(&mut points, from, to, self.config.stub_length);
        // A forced stub or elbow may clip a neighbour.
        if !self.obstacles.is_clear(&points, &self.exclude) {
            self.route_around_obstacles(&mut points);
            enforce_perpendicular_ends(&mut points, from, to, self.config.stub_length);
        }
        simplify(points)
    }

    /// Wraps the route around every foreign obstacle it crosses.
    fn route_around_obstacles(&self, points: &mut Vec<Point>) {
        for _ in 0..self.config.obstacle_passes {
            let mut hit = false;
            let mut index = 0;
            while index + 1 < points.len() {
                let obstacle = self.obstacles.first_hit(&points[index], &points[index + 1], &self.exclude);
                let outer = obstacle.map(|obstacle| obstacle.rect.inflate(self.config.detour_clearance));
                match outer.and_then(|outer| wrap_around(points, index, &outer)) {
                    Some(resume) => {
                        hit = true;
                        index = resume;
                    }
                    None => index += 1,
                }
            }
            *points = simplify(std::mem::take(points));
            if !hit {
                break;
            }
        }
    }
}

fn is_collinear(a: &Point, b: &Point, c: &Point) -> bool {
    (approx_eq(a.x, b.x) && approx_eq(b.x, c.x)) || (approx_eq(a.y, b.y) && approx_eq(b.y, c.y))
}

fn reverses(a: &Point, b: &Point, c: &Point) -> bool {
    let first = *b - *a;
    let second = *c - *b;
    first.x * second.x + first.y * second.y < 0.0
}

/// Drops repeated points and the middle of collinear triples.
///
/// The two end points are never removed. A reversing triple (spike) is only
/// collapsed away from the ends, so the first and last segments keep their heading.
pub(crate) fn simplify(points: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for point in points {
        if out.last().map_or(true, |last| !last.approx_eq(&point)) {
            out.push(point);
        }
    }

    let mut index = 1;
    while index + 1 < out.len() {
        let (a, b, c) = (out[index - 1], out[index], out[index + 1]);
        let interior = index >= 2 && index + 2 < out.len();
        if is_collinear(&a, &b, &c) && (interior || !reverses(&a, &b, &c)) {
            out.remove(index);
            if out[index - 1].approx_eq(&out[index]) {
                if index + 1 < out.len() {
                    out.remove(index);
                } else if index >= 2 {
                    out.remove(index - 1);
                }
            }
            index = index.saturating_sub(1).max(1);
            continue;
        }
        index += 1;
    }
    out
}

fn port_orientation(port: &Port) -> Orientation {
    port.direction.orientation()
}

/// Snaps the first and last grid segments onto the ports' exact coordinates.
fn align_endpoints(points: &mut [Point], from: &Port, to: &Port) {
    let len = points.len();
    if len < 2 {
        return;
    }
    align_end(points, 0, 1, from);
    align_end(points, len - 1, len - 2, to);
}

fn align_end(points: &mut [Point], end: usize, next: usize, port: &Port) {
    let segment = points[end].orientation_to(&points[next]);
    match (port_orientation(port), segment) {
        // Parallel: move the whole segment onto the port's line.
        (Orientation::Horizontal, Some(Orientation::Horizontal)) => {
            points[end].y = port.y;
            points[next].y = port.y;
        }
        (Orientation::Vertical, Some(Orientation::Vertical)) => {
            points[end].x = port.x;
            points[next].x = port.x;
        }
        // Perpendicular: slide only the end point along the segment.
        (Orientation::Horizontal, Some(Orientation::Vertical)) => points[end].y = port.y,
        (Orientation::Vertical, Some(Orientation::Horizontal)) => points[end].x = port.x,
        (_, None) => {}
    }
}

fn on_port_axis(port: &Port, point: &Point) -> bool {
    match port_orientation(port) {
        Orientation::Horizontal => approx_eq(point.y, port.y),
        Orientation::Vertical => approx_eq(point.x, port.x),
    }
}

/// Elbow that leaves `port` along its exit axis and then turns toward `point`.
fn port_elbow(port: &Port, point: &Point) -> Point {
    match port_orientation(port) {
        Orientation::Horizontal => Point::new(point.x, port.y),
        Orientation::Vertical => Point::new(port.x, point.y),
    }
}

/// Adds the exact port coordinates, with at most one elbow at each end.
fn stitch(points: Vec<Point>, from: &Port, to: &Port) -> Vec<Point> {
    let mut out = Vec::with_capacity(points.len() + 4);
    out.push(from.point());
    if let Some(first) = points.first() {
        if !on_port_axis(from, first) {
            out.push(port_elbow(from, first));
        }
    }
    out.extend(points);
    if let Some(last) = out.last().copied() {
        if !on_port_axis(to, &last) {
            out.push(port_elbow(to, &last));
        }
    }
    out.push(to.point());
    simplify(out)
}

/// Removes short jogs left by grid quantization.
///
/// A short interior segment is absorbed by moving the shorter of its two
/// neighbours onto the line of the longer one. Points on the ports never move.
fn smooth_kinks(points: &mut Vec<Point>, min_length: f64, passes: usize) {
    for _ in 0..passes {
        if !smooth_one_kink(points, min_length) {
            return;
        }
        *points = simplify(std::mem::take(points));
    }
}

fn smooth_one_kink(points: &mut [Point], min_length: f64) -> bool {
    let len = points.len();
    if len < 4 {
        return false;
    }
    for i in 1..len - 2 {
        let (before, a, b, after) = (points[i - 1], points[i], points[i + 1], points[i + 2]);
        let Some(jog) = a.orientation_to(&b) else {
            continue;
        };
        if a.manhattan_distance(&b) >= min_length {
            continue;
        }
        if before.orientation_to(&a) != Some(jog.other()) || b.orientation_to(&after) != Some(jog.other()) {
            continue;
        }

        let can_move_next = i + 2 < len - 1;
        let can_move_previous = i >= 2;
        let previous_longer = before.manhattan_distance(&a) >= b.manhattan_distance(&after);
        let move_next = can_move_next && (previous_longer || !can_move_previous);

        if move_next {
            match jog {
                Orientation::Vertical => {
                    points[i + 1].y = a.y;
                    points[i + 2].y = a.y;
                }
                Orientation::Horizontal => {
                    points[i + 1].x = a.x;
                    points[i + 2].x = a.x;
                }
            }
        } else if can_move_previous {
            match jog {
                Orientation::Vertical => {
                    points[i].y = b.y;
                    points[i - 1].y = b.y;
                }
                Orientation::Horizontal => {
                    points[i].x = b.x;
                    points[i - 1].x = b.x;
                }
            }
        } else {
            continue;
        }
        return true;
    }
    false
}

/// Splits every diagonal pair with one elbow, continuing the incoming axis.
fn enforce_orthogonal(points: &[Point], from: &Port) -> Vec<Point> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let mut out = vec![*first];
    let mut incoming = Some(port_orientation(from));
    for point in &points[1..] {
        let last = out[out.len() - 1];
        if !last.is_axis_aligned_with(point) {
            let elbow = match incoming {
                Some(Orientation::Vertical) => Point::new(last.x, point.y),
                _ => Point::new(point.x, last.y),
            };
            out.push(elbow);
        }
        let previous = out[out.len() - 1];
        incoming = previous.orientation_to(point).or(incoming);
        out.push(*point);
    }
    simplify(out)
}

/// Replaces the part of the route inside `outer`, starting with the segment
/// at `hit`, by a walk along the boundary of `outer`.
///
/// Points inside `outer` on either side of the hit are dropped along with it,
/// so the route rejoins on the segments that enter and leave the rectangle.
/// Returns the index of the rejoin point, or `None` if an end of the route
/// lies inside `outer` and cannot be moved.
fn wrap_around(points: &mut Vec<Point>, hit: usize, outer: &Rect) -> Option<usize> {
    let mut first = hit;
    while outer.contains(&points[first]) {
        first = first.checked_sub(1)?;
    }
    let mut last = hit + 1;
    while last < points.len() && outer.contains(&points[last]) {
        last += 1;
    }
    if last == points.len() {
        return None;
    }

    let entry = boundary_crossing(&points[first], &points[first + 1], outer, true)?;
    let exit = boundary_crossing(&points[last - 1], &points[last], outer, false)?;
    let mut walk = vec![entry];
    walk.extend(outer.perimeter_path(&entry, &exit));
    walk.push(exit);

    let resume = first + walk.len();
    points.splice(first + 1..last, walk);
    Some(resume)
}

/// Where the axis-aligned segment `a`-`b` crosses the boundary of `rect`,
/// on the way in when `entering`, otherwise on the way out.
fn boundary_crossing(a: &Point, b: &Point, rect: &Rect, entering: bool) -> Option<Point> {
    match a.orientation_to(b)? {
        Orientation::Horizontal => {
            let forward = b.x > a.x;
            let x = if forward == entering { rect.left() } else { rect.right() };
            Some(Point::new(x, a.y))
        }
        Orientation::Vertical => {
            let forward = b.y > a.y;
            let y = if forward == entering { rect.top() } else { rect.bottom() };
            Some(Point::new(a.x, y))
        }
    }
}

fn heads_along(from: &Point, to: &Point, direction: Direction) -> bool {
    match direction {
        Direction::Right => approx_eq(from.y, to.y) && to.x > from.x + EPSILON,
        Direction::Left => approx_eq(from.y, to.y) && to.x < from.x - EPSILON,
        Direction::Down => approx_eq(from.x, to.x) && to.y > from.y + EPSILON,
        Direction::Up => approx_eq(from.x, to.x) && to.y < from.y - EPSILON,
    }
}

/// Makes the first segment leave, and the last segment enter, perpendicular to the port sides.
fn enforce_perpendicular_ends(points: &mut Vec<Point>, from: &Port, to: &Port, stub_length: f64) {
    if points.len() < 2 {
        return;
    }

    let (start, next) = (points[0], points[1]);
    if !heads_along(&start, &next, from.direction) {
        let stub = start.step(from.direction, stub_length);
        let elbow = match port_orientation(from) {
            Orientation::Horizontal => Point::new(stub.x, next.y),
            Orientation::Vertical => Point::new(next.x, stub.y),
        };
        points.splice(1..1, [stub, elbow]);
    }

    let len = points.len();
    let (previous, end) = (points[len - 2], points[len - 1]);
    if !heads_along(&end, &previous, to.direction) {
        let stub = end.step(to.direction, stub_length);
        let elbow = match port_orientation(to) {
            Orientation::Horizontal => Point::new(stub.x, previous.y),
            Orientation::Vertical => Point::new(previous.x, stub.y),
        };
        points.splice(len - 1..len - 1, [elbow, stub]);
    }
}
