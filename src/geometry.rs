use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Coordinates closer than this are treated as equal.
pub const EPSILON: f64 = 1e-6;

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

pub trait BoundingBox {
    fn top_left(&self) -> Point;
    fn bottom_right(&self) -> Point;

    fn center(&self) -> Point {
        let top_left = self.top_left();
        let bottom_right = self.bottom_right();
        Point {
            x: (top_left.x + bottom_right.x) / 2.0,
            y: (top_left.y + bottom_right.y) / 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl<Scalar> Mul<Scalar> for Point
where
    Scalar: Into<f64>,
{
    type Output = Point;

    fn mul(self, other: Scalar) -> Point {
        let other = other.into();
        Point {
            x: self.x * other,
            y: self.y * other,
        }
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn approx_eq(&self, other: &Point) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let x_diff = self.x - other.x;
        let y_diff = self.y - other.y;
        (x_diff.powi(2) + y_diff.powi(2)).sqrt()
    }

    pub fn manhattan_distance(&self, other: &Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Moves the point `distance` units in `direction`.
    pub fn step(&self, direction: Direction, distance: f64) -> Point {
        let (dx, dy) = direction.delta();
        Point {
            x: self.x + dx as f64 * distance,
            y: self.y + dy as f64 * distance,
        }
    }

    /// Orientation of the segment from `self` to `other`, `None` if it is diagonal or empty.
    pub fn orientation_to(&self, other: &Point) -> Option<Orientation> {
        let same_x = approx_eq(self.x, other.x);
        let same_y = approx_eq(self.y, other.y);
        match (same_x, same_y) {
            (true, true) | (false, false) => None,
            (false, true) => Some(Orientation::Horizontal),
            (true, false) => Some(Orientation::Vertical),
        }
    }

    pub fn is_axis_aligned_with(&self, other: &Point) -> bool {
        approx_eq(self.x, other.x) || approx_eq(self.y, other.y)
    }
}

/// Axis-aligned rectangle in world coordinates, `y` grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn inflate(&self, padding: f64) -> Rect {
        Rect {
            x: self.x - padding,
            y: self.y - padding,
            width: self.width + 2.0 * padding,
            height: self.height + 2.0 * padding,
        }
    }

    /// True if the axis-aligned segment `a`-`b` passes through the open interior.
    ///
    /// Running along the boundary does not count as an intersection.
    pub fn intersects_segment(&self, a: &Point, b: &Point) -> bool {
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        max_x > self.left() + EPSILON
            && min_x < self.right() - EPSILON
            && max_y > self.top() + EPSILON
            && min_y < self.bottom() - EPSILON
    }

    /// True if `point` lies in the open interior.
    pub fn contains(&self, point: &Point) -> bool {
        point.x > self.left() + EPSILON
            && point.x < self.right() - EPSILON
            && point.y > self.top() + EPSILON
            && point.y < self.bottom() - EPSILON
    }

    /// Clockwise distance along the boundary from the top-left corner to
    /// `point`, which is projected onto the closest side first.
    fn perimeter_position(&self, point: &Point) -> f64 {
        let distances = [
            (point.y - self.top()).abs(),
            (point.x - self.right()).abs(),
            (point.y - self.bottom()).abs(),
            (point.x - self.left()).abs(),
        ];
        let side = (0..4)
            .min_by(|a, b| distances[*a].total_cmp(&distances[*b]))
            .unwrap_or(0);
        let (width, height) = (self.width, self.height);
        match side {
            0 => (point.x - self.left()).clamp(0.0, width),
            1 => width + (point.y - self.top()).clamp(0.0, height),
            2 => width + height + (self.right() - point.x).clamp(0.0, width),
            _ => 2.0 * width + height + (self.bottom() - point.y).clamp(0.0, height),
        }
    }

    /// Corners passed when walking the boundary from `from` to `to` the short
    /// way round. Both points are expected on the boundary; clockwise wins ties.
    pub fn perimeter_path(&self, from: &Point, to: &Point) -> Vec<Point> {
        let perimeter = 2.0 * (self.width + self.height);
        if perimeter <= EPSILON {
            return Vec::new();
        }
        let corners = [
            (0.0, Point::new(self.left(), self.top())),
            (self.width, Point::new(self.right(), self.top())),
            (self.width + self.height, Point::new(self.right(), self.bottom())),
            (2.0 * self.width + self.height, Point::new(self.left(), self.bottom())),
        ];
        let start = self.perimeter_position(from);
        let end = self.perimeter_position(to);
        let clockwise = (end - start).rem_euclid(perimeter);
        let counter = perimeter - clockwise;

        let forward = clockwise <= counter;
        let length = if forward { clockwise } else { counter };
        let mut passed: Vec<(f64, Point)> = corners
            .iter()
            .map(|(at, corner)| {
                let along = if forward { at - start } else { start - at };
                (along.rem_euclid(perimeter), *corner)
            })
            .filter(|(along, _)| *along > EPSILON && *along < length - EPSILON)
            .collect();
        passed.sort_by(|a, b| a.0.total_cmp(&b.0));
        passed.into_iter().map(|(_, corner)| corner).collect()
    }
}

impl BoundingBox for Rect {
    fn top_left(&self) -> Point {
        Point { x: self.left(), y: self.top() }
    }

    fn bottom_right(&self) -> Point {
        Point {
            x: self.right(),
            y: self.bottom(),
        }
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn other(&self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step in grid/world axes.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn orientation(&self) -> Orientation {
        match self {
            Direction::Up | Direction::Down => Orientation::Vertical,
            Direction::Left | Direction::Right => Orientation::Horizontal,
        }
    }
}

/// One of the four sides of a node.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Outward normal of the side, which is also the exit direction of a port on it.
    pub fn direction(&self) -> Direction {
        match self {
            Side::Top => Direction::Up,
            Side::Right => Direction::Right,
            Side::Bottom => Direction::Down,
            Side::Left => Direction::Left,
        }
    }

    /// Picks the side whose outward normal best matches `(dx, dy)`; ties go horizontal.
    pub fn facing(dx: f64, dy: f64) -> Side {
        if dx.abs() >= dy.abs() {
            if dx >= 0.0 {
                Side::Right
            } else {
                Side::Left
            }
        } else if dy > 0.0 {
            Side::Bottom
        } else {
            Side::Top
        }
    }

    /// Point at `offset` (0..=1) along this side of `rect`, measured left-to-right or top-to-bottom.
    pub fn point_on(&self, rect: &Rect, offset: f64) -> Point {
        match self {
            Side::Top => Point::new(rect.left() + rect.width * offset, rect.top()),
            Side::Bottom => Point::new(rect.left() + rect.width * offset, rect.bottom()),
            Side::Left => Point::new(rect.left(), rect.top() + rect.height * offset),
            Side::Right => Point::new(rect.right(), rect.top() + rect.height * offset),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }

    pub fn parse(value: &str) -> Option<Side> {
        match value {
            "top" => Some(Side::Top),
            "right" => Some(Side::Right),
            "bottom" => Some(Side::Bottom),
            "left" => Some(Side::Left),
            _ => None,
        }
    }
}
