use tracing::debug;

use crate::geometry::Rect;

use super::astar::{route_grid_astar, StepCosts};
use super::fallback::{route_direct, route_loop};
use super::grid::Grid;
use super::masked_grid::MaskedGrid;
use super::raw_area::RawArea;
use super::types::{EdgePorts, RawPath, RouteSource, RoutingConfig};
use super::usage::UsageGrid;

pub(crate) struct SingleRoute {
    pub raw: RawPath,
    pub source: RouteSource,
    pub expanded: usize,
}

/// Finds the raw path between the two port stubs of one edge.
///
/// `grid` is `None` when the area is too large to search, in which case the
/// direct route is used straight away. A failed search also falls back to it.
pub(crate) fn route_single_edge(
    edge_id: &str,
    grid: Option<&Grid>,
    area: &RawArea,
    usage: Option<&UsageGrid>,
    ports: &EdgePorts,
    config: &RoutingConfig,
) -> SingleRoute {
    let start = ports.from.stub_point(config.stub_length);
    let end = ports.to.stub_point(config.stub_length);

    let direct = |source| SingleRoute {
        raw: RawPath::Direct(route_direct(start, ports.from.direction, end, ports.to.direction)),
        source,
        expanded: 0,
    };

    let Some(grid) = grid else {
        return direct(RouteSource::Oversized);
    };

    let (start_x, start_y) = area.point_to_cell(&start);
    let (end_x, end_y) = area.point_to_cell(&end);
    let (Some(start_cell), Some(end_cell)) = (
        grid.coords_to_grid_point(start_x, start_y),
        grid.coords_to_grid_point(end_x, end_y),
    ) else {
        return direct(RouteSource::Fallback);
    };

    let masked_grid = MaskedGrid::new(grid, usage, [start_cell, end_cell]);
    let costs = StepCosts {
        turn: config.turn_cost,
        cross: config.cross_cost,
    };

    match route_grid_astar(&masked_grid, start_cell, ports.from.direction, end_cell, costs) {
        Some(result) => SingleRoute {
            raw: RawPath::Grid(result.path),
            source: RouteSource::Search,
            expanded: result.expanded,
        },
        None => {
            debug!(edge = edge_id, "grid search exhausted, using direct route");
            direct(RouteSource::Fallback)
        }
    }
}

/// Rectangular loop for an edge whose endpoints are the same node.
///
/// Both stubs end on the node's rectangle grown by the stub length, and the
/// loop follows that rectangle, so it stays clear of the padded node as long
/// as the stub is longer than the padding.
pub(crate) fn route_self_loop(node: &Rect, ports: &EdgePorts, config: &RoutingConfig) -> SingleRoute {
    let around = node.inflate(config.stub_length);
    let start = ports.from.stub_point(config.stub_length);
    let end = ports.to.stub_point(config.stub_length);
    SingleRoute {
        raw: RawPath::Direct(route_loop(&around, start, end)),
        source: RouteSource::Loop,
        expanded: 0,
    }
}
