use hashbrown::HashMap;
use indexmap::IndexMap;

use crate::geometry::{BoundingBox, Side};
use crate::graph::{Edge, Node, PortPin};

use super::types::{EdgePorts, Port};

/// Grouping key for every endpoint attached to one side of one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct SideKey<'a> {
    node: &'a str,
    side: Side,
}

#[derive(Clone, Copy, Debug)]
struct Endpoint {
    edge: usize,
    is_target: bool,
    pin: Option<PortPin>,
    /// Position of the opposite node along the axis parallel to the side.
    sort_key: f64,
}

pub(crate) fn index_nodes(nodes: &[Node]) -> HashMap<&str, &Node> {
    nodes.iter().map(|node| (node.id.as_str(), node)).collect()
}

/// Resolves both ports of every edge whose endpoints exist.
///
/// Sides come from pins or from the direction between node centers; a
/// self-loop defaults to the right side out and the top side back in. Each
/// `(node, side)` group gets `n` evenly spaced slots; pinned endpoints keep
/// their offset but claim the nearest slot, unpinned endpoints fill the rest
/// ordered by the position of the node at their other end.
pub(crate) fn assign_ports(nodes: &HashMap<&str, &Node>, edges: &[Edge]) -> IndexMap<String, EdgePorts> {
    let mut groups: IndexMap<SideKey, Vec<Endpoint>> = IndexMap::new();

    for (index, edge) in edges.iter().enumerate() {
        let (Some(source), Some(target)) = (nodes.get(edge.from.as_str()), nodes.get(edge.to.as_str())) else {
            continue;
        };
        let source_center = source.center();
        let target_center = target.center();

        // Self-loops leave on the right and come back on top.
        let self_loop = edge.from == edge.to;
        let source_side = edge.from_port.map(|pin| pin.side).unwrap_or_else(|| {
            if self_loop {
                return Side::Right;
            }
            Side::facing(target_center.x - source_center.x, target_center.y - source_center.y)
        });
        let target_side = edge.to_port.map(|pin| pin.side).unwrap_or_else(|| {
            if self_loop {
                return Side::Top;
            }
            Side::facing(source_center.x - target_center.x, source_center.y - target_center.y)
        });

        groups
            .entry(SideKey {
                node: source.id.as_str(),
                side: source_side,
            })
            .or_default()
            .push(Endpoint {
                edge: index,
                is_target: false,
                pin: edge.from_port,
                sort_key: along_side(source_side, target_center.x, target_center.y),
            });
        groups
            .entry(SideKey {
                node: target.id.as_str(),
                side: target_side,
            })
            .or_default()
            .push(Endpoint {
                edge: index,
                is_target: true,
                pin: edge.to_port,
                sort_key: along_side(target_side, source_center.x, source_center.y),
            });
    }

    let mut resolved: Vec<[Option<Port>; 2]> = vec![[None, None]; edges.len()];

    for (key, endpoints) in &groups {
        let Some(node) = nodes.get(key.node) else {
            continue;
        };
        let rect = node.rect();
        for (endpoint, offset) in endpoints.iter().zip(slot_offsets(endpoints)) {
            let point = key.side.point_on(&rect, offset);
            resolved[endpoint.edge][endpoint.is_target as usize] = Some(Port {
                side: key.side,
                offset,
                direction: key.side.direction(),
                x: point.x,
                y: point.y,
            });
        }
    }

    edges
        .iter()
        .zip(resolved)
        .filter_map(|(edge, ports)| match ports {
            [Some(from), Some(to)] => Some((edge.id.clone(), EdgePorts { from, to })),
            _ => None,
        })
        .collect()
}

fn along_side(side: Side, x: f64, y: f64) -> f64 {
    match side {
        Side::Top | Side::Bottom => x,
        Side::Left | Side::Right => y,
    }
}

/// Offsets for the endpoints of one group, in group order.
fn slot_offsets(endpoints: &[Endpoint]) -> Vec<f64> {
    let count = endpoints.len();
    let slots: Vec<f64> = (1..=count).map(|i| i as f64 / (count + 1) as f64).collect();
    let mut claimed = vec![false; count];
    let mut offsets = vec![0.5; count];

    for (position, endpoint) in endpoints.iter().enumerate() {
        let Some(pin) = endpoint.pin else {
            continue;
        };
        let offset = if pin.offset.is_nan() { 0.5 } else { pin.offset.clamp(0.0, 1.0) };
        offsets[position] = offset;

        let nearest = (0..count)
            .filter(|slot| !claimed[*slot])
            .min_by(|a, b| (slots[*a] - offset).abs().total_cmp(&(slots[*b] - offset).abs()));
        if let Some(slot) = nearest {
            claimed[slot] = true;
        }
    }

    let mut unpinned: Vec<usize> = (0..count).filter(|i| endpoints[*i].pin.is_none()).collect();
    unpinned.sort_by(|a, b| endpoints[*a].sort_key.total_cmp(&endpoints[*b].sort_key));

    let free_slots = (0..count).filter(|slot| !claimed[*slot]);
    for (position, slot) in unpinned.into_iter().zip(free_slots) {
        offsets[position] = slots[slot];
    }

    offsets
}
