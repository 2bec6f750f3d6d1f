use std::str::FromStr;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use tracing::level_filters::LevelFilter;

use crate::geometry::{Point, Side};
use crate::graph::{Edge, Node, PortPin};
use crate::lib_tracing::LibTracer;
use crate::query;
use crate::routing;

type PyNode = (String, f64, f64, f64, f64);
type PyPin = (String, f64);
type PyEdge = (String, String, String, Option<PyPin>, Option<PyPin>);
type PyPoint = (f64, f64);

fn to_node((id, x, y, width, height): PyNode) -> Node {
    Node::new(id, x, y, width, height)
}

fn to_pin(pin: Option<PyPin>) -> PyResult<Option<PortPin>> {
    let Some((side, offset)) = pin else {
        return Ok(None);
    };
    let side = Side::parse(&side).ok_or_else(|| PyValueError::new_err(format!("unknown port side {side:?}")))?;
    Ok(Some(PortPin::new(side, offset)))
}

fn to_edge((id, from, to, from_port, to_port): PyEdge) -> PyResult<Edge> {
    Ok(Edge {
        id,
        from,
        to,
        from_port: to_pin(from_port)?,
        to_port: to_pin(to_port)?,
    })
}

fn to_points(points: Vec<PyPoint>) -> Vec<Point> {
    points.into_iter().map(|(x, y)| Point::new(x, y)).collect()
}

/// Routes all edges; returns `(edge id, [(x, y), ...])` pairs in input order.
#[pyfunction]
#[pyo3(name = "route_all", signature = (nodes, edges, dragging = false))]
fn py_route_all(
    py: Python<'_>,
    nodes: Vec<PyNode>,
    edges: Vec<PyEdge>,
    dragging: bool,
) -> PyResult<Vec<(String, Vec<PyPoint>)>> {
    let nodes: Vec<Node> = nodes.into_iter().map(to_node).collect();
    let edges = edges.into_iter().map(to_edge).collect::<PyResult<Vec<Edge>>>()?;

    let routes = py.allow_threads(|| routing::route_all(&nodes, &edges, dragging));
    Ok(routes
        .into_iter()
        .map(|(id, route)| (id, route.into_iter().map(|p| (p.x, p.y)).collect()))
        .collect())
}

#[pyfunction]
#[pyo3(name = "nearest_perimeter_point")]
fn py_nearest_perimeter_point(node: PyNode, x: f64, y: f64) -> (&'static str, f64, f64, f64) {
    let snapped = query::nearest_perimeter_point(&to_node(node), x, y);
    (snapped.side.as_str(), snapped.offset, snapped.x, snapped.y)
}

#[pyfunction]
#[pyo3(name = "distance_to_polyline")]
fn py_distance_to_polyline(x: f64, y: f64, points: Vec<PyPoint>) -> f64 {
    query::distance_to_polyline(x, y, &to_points(points))
}

#[pyfunction]
#[pyo3(name = "polyline_midpoint")]
fn py_polyline_midpoint(points: Vec<PyPoint>) -> PyPoint {
    let midpoint = query::polyline_midpoint(&to_points(points));
    (midpoint.x, midpoint.y)
}

#[pyfunction]
#[pyo3(signature = (level = "info", log_file = None))]
fn init_tracing(level: &str, log_file: Option<String>) -> PyResult<()> {
    let level = LevelFilter::from_str(level).map_err(|err| PyValueError::new_err(err.to_string()))?;
    let mut tracer = LibTracer::new(level);
    if let Some(path) = log_file {
        tracer = tracer.with_log_file(path);
    }
    tracer.install().map_err(|err| PyRuntimeError::new_err(err.to_string()))
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_route_all, m)?)?;
    m.add_function(wrap_pyfunction!(py_nearest_perimeter_point, m)?)?;
    m.add_function(wrap_pyfunction!(py_distance_to_polyline, m)?)?;
    m.add_function(wrap_pyfunction!(py_polyline_midpoint, m)?)?;
    m.add_function(wrap_pyfunction!(init_tracing, m)?)?;
    Ok(())
}
