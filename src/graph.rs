use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Point, Rect, Side};

/// A placed rectangular node. Doubles as routing obstacle and connection anchor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Node {
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Node {
            id: id.into(),
            x,
            y,
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl BoundingBox for Node {
    fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn bottom_right(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }
}

/// A user-pinned attachment point: side plus relative offset along it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortPin {
    pub side: Side,
    pub offset: f64,
}

impl PortPin {
    pub fn new(side: Side, offset: f64) -> Self {
        PortPin { side, offset }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_port: Option<PortPin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_port: Option<PortPin>,
}

impl Edge {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Edge {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            from_port: None,
            to_port: None,
        }
    }

    pub fn with_from_port(mut self, pin: PortPin) -> Self {
        self.from_port = Some(pin);
        self
    }

    pub fn with_to_port(mut self, pin: PortPin) -> Self {
        self.to_port = Some(pin);
        self
    }
}
