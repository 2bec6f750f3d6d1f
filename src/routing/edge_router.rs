use std::borrow::Cow;

use hashbrown::HashMap;
use indexmap::IndexMap;
use tracing::{debug, instrument, trace, warn};

use crate::error::Result;
use crate::geometry::Rect;
use crate::graph::{Edge, Node};

use super::grid::Grid;
use super::obstacles::ObstacleIndex;
use super::ports::{assign_ports, index_nodes};
use super::postprocess::PostProcessor;
use super::raw_area::RawArea;
use super::route_single::{route_self_loop, route_single_edge};
use super::trace::RouteTrace;
use super::types::{EdgePorts, Routes, RoutingConfig};
use super::usage::UsageGrid;

/// Routes all edges of a diagram in one stateless pass.
#[derive(Clone, Debug, Default)]
pub struct EdgeRouter {
    config: RoutingConfig,
}

impl EdgeRouter {
    pub fn new(config: RoutingConfig) -> Result<Self> {
        config.validate()?;
        Ok(EdgeRouter { config })
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Resolved ports for every edge whose endpoints exist, without routing.
    pub fn assign_ports(&self, nodes: &[Node], edges: &[Edge]) -> IndexMap<String, EdgePorts> {
        assign_ports(&index_nodes(nodes), &unique_edges(edges))
    }

    /// Routes every edge and returns the polylines keyed by edge id, in input order.
    ///
    /// Edges are processed shortest-first. Unless `dragging` is set, each
    /// finished route marks the usage grid so later edges pay for crossing it.
    #[instrument(skip_all, fields(nodes = nodes.len(), edges = edges.len(), dragging = dragging))]
    pub fn route_all(&self, nodes: &[Node], edges: &[Edge], dragging: bool) -> Routes {
        if nodes.is_empty() || edges.is_empty() {
            return Routes::new();
        }
        let config = &self.config;

        let edges = unique_edges(edges);
        let node_index = index_nodes(nodes);
        let positions: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.id.as_str(), position))
            .collect();

        let ports = assign_ports(&node_index, &edges);
        for edge in edges.iter().filter(|edge| !ports.contains_key(&edge.id)) {
            warn!(edge = %edge.id, from = %edge.from, to = %edge.to, "dropping edge with unknown endpoint");
        }
        if ports.is_empty() {
            return Routes::new();
        }

        let Some(area) = RawArea::around(nodes, config.margin, config.cell_size) else {
            warn!("node geometry is not finite, nothing routed");
            return Routes::new();
        };
        let oversized = area.size() > config.max_grid_cells;
        trace!(width = area.width(), height = area.height(), oversized, "routing area");

        let rects: Vec<Rect> = nodes.iter().map(Node::rect).collect();
        let obstacles = ObstacleIndex::new(nodes, config.obstacle_padding);
        // Oversized areas are never searched, so they need no usage grid either.
        let mut usage = (!dragging && !oversized).then(|| UsageGrid::new(&area));
        let mut route_trace = config.trace_path.as_ref().map(|_| RouteTrace::new(&area, nodes, dragging));

        let edge_by_id: HashMap<&str, &Edge> = edges.iter().map(|edge| (edge.id.as_str(), edge)).collect();

        let mut order: Vec<(&String, &EdgePorts)> = ports.iter().collect();
        order.sort_by(|(_, a), (_, b)| port_span(a).total_cmp(&port_span(b)));

        let mut routes: Routes = ports.keys().map(|id| (id.clone(), Vec::new())).collect();

        for (id, edge_ports) in order {
            let Some(edge) = edge_by_id.get(id.as_str()) else {
                continue;
            };
            let (Some(&from), Some(&to)) = (positions.get(edge.from.as_str()), positions.get(edge.to.as_str())) else {
                continue;
            };
            let exclude = [from, to];

            let single = if from == to {
                route_self_loop(&rects[from], edge_ports, config)
            } else {
                let grid = (!oversized).then(|| {
                    let foreign = rects
                        .iter()
                        .enumerate()
                        .filter(|(position, _)| !exclude.contains(position))
                        .map(|(_, rect)| rect);
                    Grid::from_obstacles(&area, foreign, config.obstacle_padding)
                });
                route_single_edge(id, grid.as_ref(), &area, usage.as_ref(), edge_ports, config)
            };
            let processor = PostProcessor {
                config,
                area: &area,
                obstacles: &obstacles,
                exclude,
            };
            let route = processor.finish(&single.raw, &edge_ports.from, &edge_ports.to);
            if !obstacles.is_clear(&route, &exclude) {
                debug!(edge = %id, "detour passes exhausted, route still crosses a node");
            }
            debug!(
                edge = %id,
                source = ?single.source,
                points = route.len(),
                expanded = single.expanded,
                "routed edge"
            );

            if let Some(usage) = usage.as_mut() {
                usage.mark_route(&area, &route);
            }
            if let Some(route_trace) = route_trace.as_mut() {
                route_trace.record_edge(edge, single.source, &single.raw.to_world(&area), &route);
            }
            if let Some(slot) = routes.get_mut(id.as_str()) {
                *slot = route;
            }
        }

        if let Some(usage) = usage.as_ref() {
            trace!(used_cells = usage.used_count(), "usage grid after routing");
        }

        if let (Some(route_trace), Some(path)) = (route_trace, config.trace_path.as_ref()) {
            if let Err(err) = route_trace.write_to(path) {
                warn!(error = %err, "failed to write routing trace");
            }
        }

        routes
    }
}

/// Routes with the default config, plus the trace path from the environment.
pub fn route_all(nodes: &[Node], edges: &[Edge], dragging: bool) -> Routes {
    let router = EdgeRouter {
        config: RoutingConfig::from_env(),
    };
    router.route_all(nodes, edges, dragging)
}

/// Keeps the last edge for every id, at the position of the first one.
fn unique_edges(edges: &[Edge]) -> Cow<'_, [Edge]> {
    let mut latest: IndexMap<&str, &Edge> = IndexMap::with_capacity(edges.len());
    for edge in edges {
        latest.insert(edge.id.as_str(), edge);
    }
    if latest.len() == edges.len() {
        return Cow::Borrowed(edges);
    }
    Cow::Owned(latest.into_values().cloned().collect())
}

fn port_span(ports: &EdgePorts) -> f64 {
    ports.from.point().manhattan_distance(&ports.to.point())
}
