use std::fs;
use std::path::Path;

use serde_json::json;

use crate::error::{Result, RoutingError};
use crate::geometry::Point;
use crate::graph::{Edge, Node};

use super::raw_area::RawArea;
use super::types::RouteSource;

fn points_json(points: &[Point]) -> Vec<serde_json::Value> {
    points.iter().map(|p| json!({ "x": p.x, "y": p.y })).collect()
}

/// JSON record of one `route_all` call, written when a trace path is configured.
pub(crate) struct RouteTrace {
    layout: serde_json::Value,
    edges: Vec<serde_json::Value>,
    dragging: bool,
}

impl RouteTrace {
    pub fn new(area: &RawArea, nodes: &[Node], dragging: bool) -> Self {
        let layout_nodes: Vec<serde_json::Value> = nodes
            .iter()
            .map(|node| {
                json!({
                    "id": node.id,
                    "x": node.x,
                    "y": node.y,
                    "width": node.width,
                    "height": node.height,
                })
            })
            .collect();
        let area_json = json!({
            "top_left": { "x": area.top_left.x, "y": area.top_left.y },
            "bottom_right": { "x": area.bottom_right.x, "y": area.bottom_right.y },
            "cell_size": area.cell_size,
            "width": area.width(),
            "height": area.height(),
        });

        RouteTrace {
            layout: json!({ "area": area_json, "nodes": layout_nodes }),
            edges: Vec::new(),
            dragging,
        }
    }

    pub fn record_edge(&mut self, edge: &Edge, source: RouteSource, raw: &[Point], route: &[Point]) {
        self.edges.push(json!({
            "id": edge.id,
            "from": edge.from,
            "to": edge.to,
            "source": source,
            "raw": points_json(raw),
            "route": points_json(route),
        }));
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "layout": self.layout,
            "edges": self.edges,
            "dragging": self.dragging,
        })
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.to_json()).map_err(RoutingError::TraceSerialize)?;
        fs::write(path, serialized).map_err(|source| RoutingError::TraceIo {
            path: path.to_path_buf(),
            source,
        })
    }
}
