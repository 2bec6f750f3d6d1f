//! Orthogonal edge routing for node diagrams.
//!
//! [`route_all`] turns a list of placed rectangular nodes and the edges between
//! them into axis-aligned polylines that leave and enter their nodes
//! perpendicularly, avoid foreign nodes and try not to cross each other.

pub mod error;
pub mod geometry;
pub mod graph;
pub mod lib_tracing;
pub mod query;
pub mod routing;

#[cfg(feature = "python")]
mod python;

pub use error::{Result, RoutingError};
pub use geometry::{Point, Rect, Side};
pub use graph::{Edge, Node, PortPin};
pub use lib_tracing::LibTracer;
pub use query::{distance_to_polyline, nearest_perimeter_point, polyline_midpoint, PerimeterPoint};
pub use routing::{route_all, EdgePorts, EdgeRouter, Port, Routes, RoutingConfig};
