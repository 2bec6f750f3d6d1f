use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};
use crate::geometry::{Direction, Point, Side};

use super::grid::GridPoint;
use super::raw_area::RawArea;

/// Environment variable that enables the JSON routing trace.
pub const TRACE_ENV_VAR: &str = "ORTHO_ROUTER_TRACE_JSON";

/// Final routes keyed by edge id, in input edge order.
pub type Routes = IndexMap<String, Vec<Point>>;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub cell_size: f64,
    pub margin: f64,
    pub obstacle_padding: f64,
    pub stub_length: f64,
    pub turn_cost: u32,
    pub cross_cost: u32,
    /// Segments shorter than this many cells are smoothed away.
    pub kink_threshold: f64,
    pub kink_passes: usize,
    pub obstacle_passes: usize,
    pub detour_clearance: f64,
    /// Grids above this size skip the search and use the direct route.
    pub max_grid_cells: usize,
    pub trace_path: Option<PathBuf>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        RoutingConfig {
            cell_size: 10.0,
            margin: 40.0,
            obstacle_padding: 10.0,
            stub_length: 20.0,
            turn_cost: 5,
            cross_cost: 3,
            kink_threshold: 1.2,
            kink_passes: 4,
            obstacle_passes: 6,
            detour_clearance: 5.0,
            max_grid_cells: 4_000_000,
            trace_path: None,
        }
    }
}

impl RoutingConfig {
    /// Defaults, with the trace path taken from `ORTHO_ROUTER_TRACE_JSON` when set.
    pub fn from_env() -> Self {
        RoutingConfig {
            trace_path: std::env::var_os(TRACE_ENV_VAR).map(PathBuf::from),
            ..RoutingConfig::default()
        }
    }

    /// Parses a (possibly partial) JSON config; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RoutingConfig = serde_json::from_str(json).map_err(RoutingError::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(RoutingError::InvalidConfig {
                field: "cell_size",
                reason: "must be positive and finite",
            });
        }
        let distances = [
            ("margin", self.margin),
            ("obstacle_padding", self.obstacle_padding),
            ("stub_length", self.stub_length),
            ("kink_threshold", self.kink_threshold),
            ("detour_clearance", self.detour_clearance),
        ];
        for (field, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(RoutingError::InvalidConfig {
                    field,
                    reason: "must be non-negative and finite",
                });
            }
        }
        if self.max_grid_cells == 0 {
            return Err(RoutingError::InvalidConfig {
                field: "max_grid_cells",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    pub(crate) fn kink_length(&self) -> f64 {
        self.kink_threshold * self.cell_size
    }
}

/// Resolved attachment point of one edge endpoint.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct Port {
    pub side: Side,
    pub offset: f64,
    pub direction: Direction,
    pub x: f64,
    pub y: f64,
}

impl Port {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// End of the stub leaving the port along its exit direction.
    pub fn stub_point(&self, stub_length: f64) -> Point {
        self.point().step(self.direction, stub_length)
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct EdgePorts {
    pub from: Port,
    pub to: Port,
}

/// Path as produced by a router, before post-processing.
#[derive(Clone, PartialEq, Debug)]
pub(crate) enum RawPath {
    /// Cells visited by the grid search, stub cell to stub cell.
    Grid(Vec<GridPoint>),
    /// World points, already orthogonal, between the two stub ends.
    Direct(Vec<Point>),
}

impl RawPath {
    /// World coordinates of the path; grid cells map to their top-left corner.
    pub fn to_world(&self, area: &RawArea) -> Vec<Point> {
        match self {
            RawPath::Grid(cells) => {
                let width = area.width().max(1);
                cells
                    .iter()
                    .map(|cell| {
                        let index = cell.0 as usize;
                        area.cell_to_point(((index % width) as i32, (index / width) as i32))
                    })
                    .collect()
            }
            RawPath::Direct(points) => points.clone(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RouteSource {
    Search,
    Fallback,
    Oversized,
    Loop,
}

/// Visits every unit step between two cells sharing a row or column.
pub(crate) fn walk_manhattan_steps(mut from: (i32, i32), to: (i32, i32), mut visit: impl FnMut((i32, i32))) {
    if from.0 != to.0 && from.1 != to.1 {
        return;
    }
    let step_x = (to.0 - from.0).signum();
    let step_y = (to.1 - from.1).signum();
    let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs());

    visit(from);
    for _ in 0..steps {
        from = (from.0 + step_x, from.1 + step_y);
        visit(from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RoutingConfig::from_json_str(r#"{"turn_cost": 9, "cell_size": 8.0}"#).unwrap();
        assert_eq!(config.turn_cost, 9);
        assert_eq!(config.cell_size, 8.0);
        assert_eq!(config.margin, RoutingConfig::default().margin);
    }

    #[test]
    fn rejects_non_positive_cell_size() {
        let err = RoutingConfig::from_json_str(r#"{"cell_size": 0.0}"#).unwrap_err();
        assert!(matches!(err, RoutingError::InvalidConfig { field: "cell_size", .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = RoutingConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, RoutingError::ConfigParse(_)));
    }

    #[test]
    fn walk_visits_both_ends() {
        let mut cells = Vec::new();
        walk_manhattan_steps((2, 5), (2, 2), |cell| cells.push(cell));
        assert_eq!(cells, vec![(2, 5), (2, 4), (2, 3), (2, 2)]);

        cells.clear();
        walk_manhattan_steps((1, 1), (3, 3), |cell| cells.push(cell));
        assert!(cells.is_empty());
    }
}
