use narwhal::graph::{EdgeKind, NodeKind, Point, PortGraph, PortId, PortKind, PortSide};
use narwhal::util::is_orthogonal;
use narwhal::{Error, LayoutConfig, RankDir, layout};

/// `a` in rank 0 with `upper` bottom ports, `b` in rank 1 with `lower` top ports.
fn pair(upper: usize, lower: usize) -> (PortGraph, Vec<PortId>, Vec<PortId>) {
    let mut g = PortGraph::new();
    let a = g.add_node(0, NodeKind::Normal);
    let b = g.add_node(1, NodeKind::Normal);
    let up = (0..upper).map(|_| g.add_port(a, PortSide::Bottom)).collect();
    let low = (0..lower).map(|_| g.add_port(b, PortSide::Top)).collect();
    (g, up, low)
}

fn x(g: &PortGraph, p: PortId) -> f64 {
    g.port(p).unwrap().x
}

#[test]
fn single_edge_is_drawn_straight() {
    let (mut g, up, low) = pair(1, 1);
    let e = g.add_edge(up[0], low[0]);
    let summary = layout(&mut g, &LayoutConfig::default()).unwrap();

    assert_eq!(summary.tracks(), 0);
    assert_eq!(summary.conflicts(), 0);
    let (pa, pb) = (g.port(up[0]).unwrap(), g.port(low[0]).unwrap());
    assert_eq!(pa.x, pb.x);
    assert_eq!(
        g.edge(e).unwrap().paths,
        vec![vec![
            Point::new(pa.x, pa.rect.bottom()),
            Point::new(pb.x, pb.rect.top()),
        ]]
    );
    for (_, node) in g.nodes() {
        assert!(node.rect.width >= 40.0);
    }
    assert_eq!(g.routes().len(), 1);
    assert_eq!(g.routes()[0].source, up[0]);
    assert_eq!(g.routes()[0].target, low[0]);
}

#[test]
fn crossing_edges_keep_port_order_and_separate_tracks() {
    let (mut g, up, low) = pair(2, 2);
    let e1 = g.add_edge(up[0], low[1]);
    let e2 = g.add_edge(up[1], low[0]);
    layout(&mut g, &LayoutConfig::default()).unwrap();

    assert!(x(&g, up[0]) < x(&g, up[1]));
    assert!(x(&g, low[0]) < x(&g, low[1]));

    let p1 = &g.edge(e1).unwrap().paths[0];
    let p2 = &g.edge(e2).unwrap().paths[0];
    assert!(is_orthogonal(p1));
    assert!(is_orthogonal(p2));
    if p1.len() > 2 && p2.len() > 2 {
        assert_ne!(p1[1].y, p2[1].y);
    }
}

#[test]
fn two_parents_into_one_port_bend_on_separate_tracks() {
    let mut g = PortGraph::new();
    let a = g.add_node(0, NodeKind::Normal);
    let c = g.add_node(0, NodeKind::Normal);
    let b = g.add_node(1, NodeKind::Normal);
    let pa = g.add_port(a, PortSide::Bottom);
    let pc = g.add_port(c, PortSide::Bottom);
    let pb = g.add_port(b, PortSide::Top);
    let e1 = g.add_edge(pa, pb);
    let e2 = g.add_edge(pc, pb);
    let summary = layout(&mut g, &LayoutConfig::default()).unwrap();

    // The drawing is its own mirror image, so the child sits between its parents.
    assert!(x(&g, pa) < x(&g, pb));
    assert!(x(&g, pb) < x(&g, pc));
    assert!((x(&g, pb) - (x(&g, pa) + x(&g, pc)) / 2.0).abs() < 1e-6);

    let p1 = &g.edge(e1).unwrap().paths[0];
    let p2 = &g.edge(e2).unwrap().paths[0];
    assert_eq!(p1.len(), 4);
    assert_eq!(p2.len(), 4);
    assert!(is_orthogonal(p1) && is_orthogonal(p2));
    assert_eq!(summary.tracks(), 2);
    assert_eq!(summary.conflicts(), 0);
    assert_ne!(p1[1].y, p2[1].y);
    assert_eq!(p1.last(), p2.last());
}

#[test]
fn turning_dummy_joins_its_legs_into_one_route() {
    let mut g = PortGraph::new();
    let a = g.add_node(0, NodeKind::Normal);
    let t = g.add_node(1, NodeKind::TurningDummy);
    let a0 = g.add_port(a, PortSide::Bottom);
    let a1 = g.add_port(a, PortSide::Bottom);
    let t0 = g.add_port(t, PortSide::Top);
    let t1 = g.add_port(t, PortSide::Top);
    let down = g.add_edge(a0, t0);
    let up = g.add_edge(t1, a1);
    let summary = layout(&mut g, &LayoutConfig::default()).unwrap();

    assert_eq!(summary.conflicts(), 0);
    assert_eq!(g.routes().len(), 1);
    let route = &g.routes()[0];
    assert_eq!(route.segments, vec![down, up]);
    assert_eq!(route.source, a0);
    assert_eq!(route.target, a1);
    assert!(is_orthogonal(&route.points));
    for e in [down, up] {
        assert!(is_orthogonal(&g.edge(e).unwrap().paths[0]));
    }
}

#[test]
fn wide_labels_widen_the_node_and_spacers_are_gone() {
    let (mut g, up, low) = pair(1, 1);
    let a = g.node_of(up[0]).unwrap();
    g.node_mut(a).unwrap().label_width = 80.0;
    g.add_edge(up[0], low[0]);
    let summary = layout(&mut g, &LayoutConfig::default()).unwrap();

    assert!(g.node(a).unwrap().rect.width >= 82.0);
    assert!(summary.width_spacers > 0);
    assert!(g.ports().all(|(_, p)| p.kind == PortKind::Regular));
    assert!(g.edges().all(|(_, e)| e.kind != EdgeKind::Structural));
    assert_eq!(g.node(a).unwrap().bottom_ports, up);
}

#[test]
fn edges_across_two_ranks_are_rejected() {
    let mut g = PortGraph::new();
    let a = g.add_node(0, NodeKind::Normal);
    g.add_node(1, NodeKind::Normal);
    let c = g.add_node(2, NodeKind::Normal);
    let pa = g.add_port(a, PortSide::Bottom);
    let pc = g.add_port(c, PortSide::Top);
    let e = g.add_edge(pa, pc);
    assert_eq!(
        layout(&mut g, &LayoutConfig::default()),
        Err(Error::EdgeSpansRanks {
            edge: e,
            from: 0,
            to: 2
        })
    );
}

#[test]
fn ports_facing_away_are_rejected() {
    let mut g = PortGraph::new();
    let a = g.add_node(0, NodeKind::Normal);
    let b = g.add_node(1, NodeKind::Normal);
    let pa = g.add_port(a, PortSide::Top);
    let pb = g.add_port(b, PortSide::Top);
    let e = g.add_edge(pa, pb);
    assert_eq!(
        layout(&mut g, &LayoutConfig::default()),
        Err(Error::PortSideMismatch { edge: e, port: pa })
    );
}

#[test]
fn malformed_dummies_are_rejected() {
    let mut g = PortGraph::new();
    let d = g.add_node(0, NodeKind::Dummy);
    g.add_port(d, PortSide::Top);
    assert_eq!(
        layout(&mut g, &LayoutConfig::default()),
        Err(Error::MalformedDummy { node: d })
    );

    let mut g = PortGraph::new();
    let t = g.add_node(0, NodeKind::TurningDummy);
    g.add_port(t, PortSide::Top);
    g.add_port(t, PortSide::Bottom);
    assert_eq!(
        layout(&mut g, &LayoutConfig::default()),
        Err(Error::MalformedTurningDummy { node: t })
    );
}

#[test]
fn invalid_options_are_rejected() {
    let (mut g, _, _) = pair(0, 0);
    let config = LayoutConfig {
        port_width: -1.0,
        ..LayoutConfig::default()
    };
    assert_eq!(
        layout(&mut g, &config),
        Err(Error::InvalidConfig {
            option: "portWidth",
            value: -1.0
        })
    );

    let config = LayoutConfig {
        distance_between_layers: 0.0,
        ..LayoutConfig::default()
    };
    assert!(matches!(
        layout(&mut g, &config),
        Err(Error::InvalidConfig {
            option: "distanceBetweenLayers",
            ..
        })
    ));
}

#[test]
fn invalid_node_widths_are_rejected() {
    let (mut g, up, _) = pair(1, 1);
    let a = g.node_of(up[0]).unwrap();
    g.node_mut(a).unwrap().label_width = f64::INFINITY;
    assert_eq!(
        layout(&mut g, &LayoutConfig::default()),
        Err(Error::InvalidNodeWidth {
            node: a,
            value: f64::INFINITY
        })
    );

    let (mut g, _, low) = pair(1, 1);
    let b = g.node_of(low[0]).unwrap();
    g.node_mut(b).unwrap().requested_width = Some(-5.0);
    assert_eq!(
        layout(&mut g, &LayoutConfig::default()),
        Err(Error::InvalidNodeWidth {
            node: b,
            value: -5.0
        })
    );
}

#[test]
fn rank_mismatch_is_rejected() {
    let (mut g, _, _) = pair(0, 0);
    let a = g.ranks()[0][0];
    g.node_mut(a).unwrap().rank = 5;
    assert_eq!(
        layout(&mut g, &LayoutConfig::default()),
        Err(Error::InvalidOrdering {
            node: a,
            listed: 0,
            recorded: 5
        })
    );
}

#[test]
fn config_reads_camel_case_json_with_defaults() {
    let config: LayoutConfig =
        serde_json::from_str(r#"{"portWidth": 8, "rankDir": "LR"}"#).unwrap();
    assert_eq!(config.port_width, 8.0);
    assert_eq!(config.rank_dir, RankDir::LR);
    assert_eq!(config.vertex_height, LayoutConfig::default().vertex_height);
    assert_eq!(config.delta(), 12.0);
}

#[test]
fn summary_serializes_in_camel_case() {
    let (mut g, up, low) = pair(2, 2);
    g.add_edge(up[0], low[1]);
    g.add_edge(up[1], low[0]);
    let summary = layout(&mut g, &LayoutConfig::default()).unwrap();

    let value = serde_json::to_value(&summary).unwrap();
    assert!(value.get("widthSpacers").is_some());
    assert!(value.get("selfEdges").is_some());
    let gaps = value["gaps"].as_array().unwrap();
    assert_eq!(gaps.len(), 1);
    assert!(gaps[0].get("extraHeight").is_some());
    assert_eq!(gaps[0]["rank"], 0);
}

#[test]
fn self_edges_get_an_orthogonal_loop() {
    let (mut g, up, low) = pair(2, 1);
    let a = g.node_of(up[0]).unwrap();
    let t = g.add_port(a, PortSide::Top);
    g.add_edge(up[0], low[0]);
    let lp = g.add_edge(up[1], t);
    let summary = layout(&mut g, &LayoutConfig::default()).unwrap();

    assert_eq!(summary.self_edges, 1);
    // Both loop ends are idle once the loop is set aside.
    assert_eq!(summary.idle_ports, 2);
    assert!(g.port(up[1]).unwrap().edges.contains(&lp));
    assert!(g.port(t).unwrap().edges.contains(&lp));
    assert_eq!(g.node(a).unwrap().top_ports, vec![t]);

    let paths = &g.edge(lp).unwrap().paths;
    assert_eq!(paths.len(), 1);
    let path = &paths[0];
    assert!(is_orthogonal(path));
    let (source, target) = (g.port(up[1]).unwrap(), g.port(t).unwrap());
    assert_eq!(path[0], Point::new(source.x, source.rect.bottom()));
    assert_eq!(path.last(), Some(&Point::new(target.x, target.rect.top())));
    let right = g.node(a).unwrap().rect.right();
    assert!(path.iter().any(|p| p.x > right));
}

#[test]
fn idle_ports_return_between_their_neighbours() {
    let (mut g, up, low) = pair(3, 2);
    g.add_edge(up[0], low[0]);
    g.add_edge(up[2], low[1]);
    let summary = layout(&mut g, &LayoutConfig::default()).unwrap();

    assert_eq!(summary.idle_ports, 1);
    let a = g.node_of(up[0]).unwrap();
    assert_eq!(g.node(a).unwrap().bottom_ports, up);
    assert!(x(&g, up[0]) < x(&g, up[1]));
    assert!(x(&g, up[1]) < x(&g, up[2]));
    let rect = g.port(up[1]).unwrap().rect;
    assert!((rect.center_x() - x(&g, up[1])).abs() < 1e-9);
}

#[test]
fn dummy_chains_are_relinked_into_one_route() {
    let mut g = PortGraph::new();
    let a = g.add_node(0, NodeKind::Normal);
    let d = g.add_node(1, NodeKind::Dummy);
    let c = g.add_node(2, NodeKind::Normal);
    let pa = g.add_port(a, PortSide::Bottom);
    let dt = g.add_port(d, PortSide::Top);
    let db = g.add_port(d, PortSide::Bottom);
    let pc = g.add_port(c, PortSide::Top);
    let e1 = g.add_edge(pa, dt);
    let e2 = g.add_edge(db, pc);
    layout(&mut g, &LayoutConfig::default()).unwrap();

    assert_eq!(g.routes().len(), 1);
    let route = &g.routes()[0];
    assert_eq!(route.segments, vec![e1, e2]);
    assert_eq!((route.source, route.target), (pa, pc));
    assert!(is_orthogonal(&route.points));
    assert_eq!(route.points.first().map(|p| p.x), Some(x(&g, pa)));
    assert_eq!(route.points.last().map(|p| p.x), Some(x(&g, pc)));
}

#[test]
fn groups_span_their_member_ports() {
    let (mut g, up, low) = pair(3, 3);
    for i in 0..3 {
        g.add_edge(up[i], low[i]);
    }
    let a = g.node_of(up[0]).unwrap();
    let group = g.add_group(a, &[up[0], up[1]]);
    layout(&mut g, &LayoutConfig::default()).unwrap();

    let (r0, r1) = (g.port(up[0]).unwrap().rect, g.port(up[1]).unwrap().rect);
    assert_eq!(g.group(group).unwrap().rect, r0.union(&r1));
}

#[test]
fn left_to_right_swaps_the_axes() {
    let build = || {
        let (mut g, up, low) = pair(2, 2);
        g.add_edge(up[0], low[1]);
        g.add_edge(up[1], low[0]);
        g
    };
    let mut tb = build();
    let mut lr = build();
    let down = layout(&mut tb, &LayoutConfig::default()).unwrap();
    let across = layout(
        &mut lr,
        &LayoutConfig {
            rank_dir: RankDir::LR,
            ..LayoutConfig::default()
        },
    )
    .unwrap();

    assert_eq!((across.width, across.height), (down.height, down.width));
    let (n, m) = (tb.node(tb.ranks()[1][0]).unwrap(), lr.node(lr.ranks()[1][0]).unwrap());
    assert_eq!((m.rect.x, m.rect.y), (n.rect.y, n.rect.x));
    assert_eq!((m.rect.width, m.rect.height), (n.rect.height, n.rect.width));
}
