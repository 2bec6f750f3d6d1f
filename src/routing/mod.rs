mod astar;
mod edge_router;
mod fallback;
mod grid;
mod masked_grid;
mod obstacles;
mod ports;
mod postprocess;
mod raw_area;
mod route_single;
mod trace;
mod types;
mod usage;

pub use edge_router::{route_all, EdgeRouter};
pub use types::{EdgePorts, Port, Routes, RoutingConfig, TRACE_ENV_VAR};
