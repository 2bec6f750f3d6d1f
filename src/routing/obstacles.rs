use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::{Point, Rect};
use crate::graph::Node;

/// A node's padded rectangle, tagged with the node's input position.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Obstacle {
    pub node: usize,
    pub rect: Rect,
}

impl RTreeObject for Obstacle {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.rect.left(), self.rect.top()],
            [self.rect.right(), self.rect.bottom()],
        )
    }
}

/// Spatial index over every node's padded rectangle, built once per routing call.
pub(crate) struct ObstacleIndex {
    tree: RTree<Obstacle>,
}

impl ObstacleIndex {
    pub fn new(nodes: &[Node], padding: f64) -> Self {
        let obstacles = nodes
            .iter()
            .enumerate()
            .map(|(node, n)| Obstacle {
                node,
                rect: n.rect().inflate(padding),
            })
            .filter(|o| [o.rect.x, o.rect.y, o.rect.width, o.rect.height].iter().all(|v| v.is_finite()))
            .collect();
        ObstacleIndex {
            tree: RTree::bulk_load(obstacles),
        }
    }

    /// The first obstacle, walking from `a` to `b`, whose interior the segment crosses.
    pub fn first_hit(&self, a: &Point, b: &Point, exclude: &[usize]) -> Option<&Obstacle> {
        let envelope = AABB::from_corners([a.x.min(b.x), a.y.min(b.y)], [a.x.max(b.x), a.y.max(b.y)]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|obstacle| !exclude.contains(&obstacle.node))
            .filter(|obstacle| obstacle.rect.intersects_segment(a, b))
            .min_by(|x, y| {
                entry_distance(a, b, &x.rect)
                    .total_cmp(&entry_distance(a, b, &y.rect))
                    .then(x.node.cmp(&y.node))
            })
    }

    pub fn is_clear(&self, route: &[Point], exclude: &[usize]) -> bool {
        route.windows(2).all(|w| self.first_hit(&w[0], &w[1], exclude).is_none())
    }
}

fn entry_distance(a: &Point, b: &Point, rect: &Rect) -> f64 {
    if (a.y - b.y).abs() <= (a.x - b.x).abs() {
        if b.x >= a.x {
            rect.left() - a.x
        } else {
            a.x - rect.right()
        }
    } else if b.y >= a.y {
        rect.top() - a.y
    } else {
        a.y - rect.bottom()
    }
}
