use ortho_router::geometry::Direction;
use ortho_router::{route_all, Edge, EdgeRouter, Node, Point, PortPin, Routes, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::{fixture, rstest};

const EPS: f64 = 1e-6;

#[fixture]
fn router() -> EdgeRouter {
    EdgeRouter::default()
}

fn pair() -> Vec<Node> {
    vec![
        Node::new("a", 100.0, 100.0, 140.0, 50.0),
        Node::new("b", 400.0, 100.0, 140.0, 50.0),
    ]
}

fn axis_aligned(route: &[Point]) -> bool {
    route
        .windows(2)
        .all(|w| (w[0].x - w[1].x).abs() < EPS || (w[0].y - w[1].y).abs() < EPS)
}

fn leaves_along(from: &Point, to: &Point, direction: Direction) -> bool {
    let (dx, dy) = direction.delta();
    let step = *to - *from;
    let along = step.x * dx as f64 + step.y * dy as f64;
    let across = step.x * dy as f64 - step.y * dx as f64;
    along > EPS && across.abs() < EPS
}

#[rstest]
#[case::left_to_right(
    pair(),
    Edge::new("e", "a", "b"),
    vec![Point::new(240.0, 125.0), Point::new(400.0, 125.0)]
)]
#[case::right_to_left(
    pair(),
    Edge::new("e", "b", "a"),
    vec![Point::new(400.0, 125.0), Point::new(240.0, 125.0)]
)]
#[case::top_to_bottom(
    vec![
        Node::new("a", 100.0, 100.0, 140.0, 50.0),
        Node::new("b", 100.0, 300.0, 140.0, 50.0),
    ],
    Edge::new("e", "a", "b"),
    vec![Point::new(170.0, 150.0), Point::new(170.0, 300.0)]
)]
fn unobstructed_facing_nodes_get_a_straight_route(
    router: EdgeRouter,
    #[case] nodes: Vec<Node>,
    #[case] edge: Edge,
    #[case] expected: Vec<Point>,
) {
    let routes = router.route_all(&nodes, &[edge], false);
    assert_eq!(routes["e"], expected);
}

#[rstest]
fn node_in_between_forces_a_detour(router: EdgeRouter) {
    let mut nodes = pair();
    nodes.push(Node::new("c", 280.0, 100.0, 80.0, 50.0));
    let padded = nodes[2].rect().inflate(router.config().obstacle_padding);

    let routes = router.route_all(&nodes, &[Edge::new("e", "a", "b")], false);
    let route = &routes["e"];

    assert!(route.len() > 2);
    assert!(axis_aligned(route));
    assert_eq!(route.first(), Some(&Point::new(240.0, 125.0)));
    assert_eq!(route.last(), Some(&Point::new(400.0, 125.0)));
    for w in route.windows(2) {
        assert!(!padded.intersects_segment(&w[0], &w[1]), "{:?} -> {:?} crosses c", w[0], w[1]);
    }
}

#[rstest]
fn top_side_offsets_follow_target_order(router: EdgeRouter) {
    let nodes = vec![
        Node::new("hub", 300.0, 400.0, 140.0, 50.0),
        Node::new("t1", 100.0, 100.0, 140.0, 50.0),
        Node::new("t2", 300.0, 100.0, 140.0, 50.0),
        Node::new("t3", 500.0, 100.0, 140.0, 50.0),
    ];
    let edges = vec![
        Edge::new("e3", "hub", "t3"),
        Edge::new("e1", "hub", "t1"),
        Edge::new("e2", "hub", "t2"),
    ];

    let ports = router.assign_ports(&nodes, &edges);
    let offsets: Vec<f64> = ["e1", "e2", "e3"].iter().map(|id| ports[*id].from.offset).collect();
    assert!(ports.values().all(|p| p.from.side == Side::Top));
    assert_eq!(offsets, vec![0.25, 0.5, 0.75]);

    let routes = router.route_all(&nodes, &edges, false);
    let starts: Vec<f64> = ["e1", "e2", "e3"].iter().map(|id| routes[*id][0].x).collect();
    assert!(starts.windows(2).all(|w| w[0] < w[1]));
}

#[rstest]
fn dragging_routes_do_not_depend_on_edge_order(router: EdgeRouter) {
    let nodes = vec![
        Node::new("a", 0.0, 0.0, 100.0, 50.0),
        Node::new("b", 300.0, 200.0, 100.0, 50.0),
        Node::new("c", 0.0, 200.0, 100.0, 50.0),
        Node::new("d", 300.0, 0.0, 100.0, 50.0),
    ];
    let forward = vec![Edge::new("ab", "a", "b"), Edge::new("cd", "c", "d")];
    let backward = vec![Edge::new("cd", "c", "d"), Edge::new("ab", "a", "b")];

    let first = router.route_all(&nodes, &forward, true);
    let second = router.route_all(&nodes, &backward, true);
    assert_eq!(first["ab"], second["ab"]);
    assert_eq!(first["cd"], second["cd"]);

    // Nothing carries over between calls.
    assert_eq!(router.route_all(&nodes, &forward, true), first);
}

#[rstest]
#[case::no_nodes(vec![], vec![Edge::new("e", "a", "b")])]
#[case::no_edges(pair(), vec![])]
fn empty_input_routes_nothing(#[case] nodes: Vec<Node>, #[case] edges: Vec<Edge>) {
    assert!(route_all(&nodes, &edges, false).is_empty());
}

#[rstest]
fn edges_with_unknown_nodes_are_dropped(router: EdgeRouter) {
    let edges = vec![
        Edge::new("ghost", "a", "nowhere"),
        Edge::new("e", "a", "b"),
    ];
    let routes = router.route_all(&pair(), &edges, false);
    assert_eq!(routes.keys().collect::<Vec<_>>(), vec!["e"]);
}

#[rstest]
fn self_loop_stays_outside_its_node(router: EdgeRouter) {
    let nodes = pair();
    let padded = nodes[0].rect().inflate(router.config().obstacle_padding);
    let routes = router.route_all(&nodes, &[Edge::new("s", "a", "a")], false);
    let route = &routes["s"];

    assert!(axis_aligned(route));
    assert!(leaves_along(&route[0], &route[1], Direction::Right));
    assert!(leaves_along(&route[route.len() - 1], &route[route.len() - 2], Direction::Up));
    for w in route[1..route.len() - 1].windows(2) {
        assert!(!padded.intersects_segment(&w[0], &w[1]), "{:?} -> {:?} cuts through a", w[0], w[1]);
    }
}

#[rstest]
fn far_apart_nodes_do_not_exhaust_memory(router: EdgeRouter) {
    let nodes = vec![
        Node::new("a", 0.0, 0.0, 100.0, 50.0),
        Node::new("b", 1e9, 1e9, 100.0, 50.0),
    ];
    let edges = vec![Edge::new("e", "a", "b")];
    let routes = router.route_all(&nodes, &edges, false);
    check_routes(&router, &nodes, &edges, &routes);
}

#[rstest]
fn pinned_ports_are_honoured(router: EdgeRouter) {
    let edge = Edge::new("e", "a", "b")
        .with_from_port(PortPin::new(Side::Bottom, 0.25))
        .with_to_port(PortPin::new(Side::Top, 0.75));
    let routes = router.route_all(&pair(), &[edge], false);
    let route = &routes["e"];

    assert_eq!(route.first(), Some(&Point::new(135.0, 150.0)));
    assert_eq!(route.last(), Some(&Point::new(505.0, 100.0)));
    assert!(axis_aligned(route));
    assert!(leaves_along(&route[0], &route[1], Direction::Down));
    assert!(leaves_along(&route[route.len() - 1], &route[route.len() - 2], Direction::Up));
}

/// Nodes on a loose 3x3 lattice, at least 50 apart horizontally and 70
/// vertically, so a clear route between any two of them always exists.
fn random_diagram(rng: &mut StdRng) -> (Vec<Node>, Vec<Edge>) {
    let mut nodes = Vec::new();
    for row in 0..3 {
        for column in 0..3 {
            if rng.gen_bool(0.2) {
                continue;
            }
            let x = column as f64 * 250.0 + rng.gen_range(0.0..60.0);
            let y = row as f64 * 200.0 + rng.gen_range(0.0..50.0);
            let width = rng.gen_range(40.0..140.0);
            let height = rng.gen_range(30.0..80.0);
            nodes.push(Node::new(format!("n{row}{column}"), x, y, width, height));
        }
    }

    let mut edges = Vec::new();
    if nodes.len() < 2 {
        return (nodes, edges);
    }
    for index in 0..8 {
        let from = rng.gen_range(0..nodes.len());
        let to = if rng.gen_bool(0.1) {
            from
        } else {
            let to = rng.gen_range(0..nodes.len() - 1);
            if to >= from {
                to + 1
            } else {
                to
            }
        };
        let mut edge = Edge::new(format!("e{index}"), nodes[from].id.clone(), nodes[to].id.clone());
        if rng.gen_bool(0.3) {
            let side = Side::ALL[rng.gen_range(0..4)];
            edge = edge.with_from_port(PortPin::new(side, rng.gen_range(0.1..0.9)));
        }
        edges.push(edge);
    }
    (nodes, edges)
}

fn check_routes(router: &EdgeRouter, nodes: &[Node], edges: &[Edge], routes: &Routes) {
    let ports = router.assign_ports(nodes, edges);
    let padding = router.config().obstacle_padding;
    assert_eq!(routes.len(), edges.len());

    for (id, route) in routes {
        let ports = &ports[id];
        let edge = edges.iter().rev().find(|edge| &edge.id == id).unwrap();
        for node in nodes.iter().filter(|node| node.id != edge.from && node.id != edge.to) {
            let padded = node.rect().inflate(padding);
            for w in route.windows(2) {
                assert!(
                    !padded.intersects_segment(&w[0], &w[1]),
                    "edge {id} crosses {}: {:?} -> {:?}",
                    node.id,
                    w[0],
                    w[1]
                );
            }
        }
        assert!(route.len() >= 2, "edge {id} has a degenerate route {route:?}");
        assert!(axis_aligned(route), "edge {id} has a diagonal step: {route:?}");
        assert_eq!(route[0], ports.from.point(), "edge {id} does not start on its port");
        assert_eq!(route[route.len() - 1], ports.to.point(), "edge {id} does not end on its port");
        assert!(
            leaves_along(&route[0], &route[1], ports.from.direction),
            "edge {id} does not leave perpendicular: {route:?}"
        );
        assert!(
            leaves_along(&route[route.len() - 1], &route[route.len() - 2], ports.to.direction),
            "edge {id} does not arrive perpendicular: {route:?}"
        );
    }
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
#[case(2024)]
fn random_diagrams_keep_route_invariants(router: EdgeRouter, #[case] seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..10 {
        let (nodes, edges) = random_diagram(&mut rng);
        for dragging in [false, true] {
            let routes = router.route_all(&nodes, &edges, dragging);
            check_routes(&router, &nodes, &edges, &routes);
        }
    }
}

#[rstest]
fn routing_is_deterministic(router: EdgeRouter) {
    let mut rng = StdRng::seed_from_u64(99);
    let (nodes, edges) = random_diagram(&mut rng);
    assert_eq!(router.route_all(&nodes, &edges, false), router.route_all(&nodes, &edges, false));
}
