//! Final geometry.
//!
//! Runs after synthetic ports are gone and every removed entity is back: tightens node
//! rectangles, places port and group rectangles, draws same-node edges and relinks per-gap
//! segments into one route per original edge.

use crate::model::LayoutConfig;
use crate::reserve::required_width;
use crate::util::push_orthogonal;
use narwhal_graph::{
    EdgeId, EdgeKind, NodeId, NodeKind, Point, PortGraph, PortId, PortSide, Rect, Route,
};
use rustc_hash::FxHashSet as HashSet;

pub fn finalize(g: &mut PortGraph, config: &LayoutConfig) {
    tighten_nodes(g, config);
    place_ports(g, config);
    route_self_edges(g, config);
    relink_routes(g);
    place_groups(g);
}

/// Shrinks every normal node to its ports plus side clearance, never below its required width,
/// and keeps it inside the span its frame spacers reserved.
pub fn tighten_nodes(g: &mut PortGraph, config: &LayoutConfig) {
    let clearance = config.side_clearance();
    let mut rects: Vec<(NodeId, Rect)> = Vec::new();
    for (id, node) in g.nodes() {
        if node.kind != NodeKind::Normal {
            continue;
        }
        let frame = node.rect;
        let required = required_width(node, config);
        let xs: Vec<f64> = node
            .all_ports()
            .filter_map(|p| g.port(p))
            .map(|p| p.x)
            .collect();
        let (center, width) = match (
            xs.iter().copied().reduce(f64::min),
            xs.iter().copied().reduce(f64::max),
        ) {
            (Some(lo), Some(hi)) => ((lo + hi) / 2.0, required.max(hi - lo + 2.0 * clearance)),
            _ => (frame.center_x(), required),
        };
        let max_left = (frame.right() - width).max(frame.left());
        let left = (center - width / 2.0).clamp(frame.left(), max_left);
        rects.push((id, Rect::new(left, frame.y, width, frame.height)));
    }
    for (id, rect) in rects {
        if let Some(n) = g.node_mut(id) {
            n.rect = rect;
        }
    }
}

/// Top ports sit on the node's upper edge, bottom ports under its lower edge.
pub fn place_ports(g: &mut PortGraph, config: &LayoutConfig) {
    let node_rects: Vec<Rect> = g.nodes().map(|(_, n)| n.rect).collect();
    let (w, h) = (config.port_width, config.port_height);
    g.for_each_port_mut(|_, p| {
        let body = node_rects[p.node.index()];
        let y = match p.side {
            PortSide::Top => body.top() - h,
            PortSide::Bottom => body.bottom(),
        };
        p.rect = Rect::new(p.x - w / 2.0, y, w, h);
    });
}

/// Outer attachment point of a port and the direction pointing away from its node.
fn port_anchor(g: &PortGraph, port: PortId) -> Option<(Point, f64)> {
    let p = g.port(port)?;
    Some(match p.side {
        PortSide::Top => (Point::new(p.x, p.rect.top()), -1.0),
        PortSide::Bottom => (Point::new(p.x, p.rect.bottom()), 1.0),
    })
}

/// Gives every same-node edge a loop path that leaves and re-enters through its ports and
/// passes the node on its right.
pub fn route_self_edges(g: &mut PortGraph, config: &LayoutConfig) {
    let reach = config.distance_between_layers / 4.0;
    let mut paths: Vec<(EdgeId, Vec<Point>)> = Vec::new();
    for (id, edge) in g.edges() {
        if edge.kind != EdgeKind::Regular {
            continue;
        }
        let (Some(ns), Some(nt)) = (g.node_of(edge.source), g.node_of(edge.target)) else {
            continue;
        };
        if ns != nt {
            continue;
        }
        let (Some((a, da)), Some((b, db)), Some(node)) = (
            port_anchor(g, edge.source),
            port_anchor(g, edge.target),
            g.node(ns),
        ) else {
            continue;
        };
        let side_x = node.rect.right() + config.delta() / 2.0;
        let (ya, yb) = (a.y + da * reach, b.y + db * reach);

        let mut points = vec![a];
        if edge.source == edge.target {
            let x = a.x + config.delta() / 2.0;
            for p in [Point::new(a.x, ya), Point::new(x, ya), Point::new(x, a.y), a] {
                push_orthogonal(&mut points, p);
            }
        } else {
            for p in [
                Point::new(a.x, ya),
                Point::new(side_x, ya),
                Point::new(side_x, yb),
                Point::new(b.x, yb),
                b,
            ] {
                push_orthogonal(&mut points, p);
            }
        }
        paths.push((id, points));
    }
    for (id, points) in paths {
        if let Some(e) = g.edge_mut(id) {
            e.paths = vec![points];
        }
    }
}

/// The port a chain continues from after entering a synthetic node through `port`.
fn pass_through(g: &PortGraph, port: PortId) -> Option<PortId> {
    let p = g.port(port)?;
    let node = g.node(p.node)?;
    match node.kind {
        NodeKind::Normal => None,
        NodeKind::Dummy => node.ports(p.side.opposite()).first().copied(),
        NodeKind::TurningDummy => node.ports(p.side).iter().copied().find(|&q| q != port),
    }
}

fn is_real_port(g: &PortGraph, port: PortId) -> bool {
    g.node_of(port)
        .and_then(|n| g.node(n))
        .is_some_and(|n| !n.kind.is_synthetic())
}

/// Walks a dummy chain starting at `start` along `first`.
fn walk_chain(
    g: &PortGraph,
    first: EdgeId,
    start: PortId,
    visited: &mut HashSet<EdgeId>,
) -> Option<Route> {
    let edge = g.edge(first)?;
    let origin = edge.origin.unwrap_or(first.index());
    let mut route = Route {
        origin,
        source: start,
        target: start,
        segments: Vec::new(),
        points: Vec::new(),
    };

    let mut current = first;
    let mut from = start;
    loop {
        if !visited.insert(current) {
            break;
        }
        let edge = g.edge(current)?;
        route.segments.push(current);
        if let Some(path) = edge.paths.first() {
            if edge.source == from {
                for &p in path {
                    push_orthogonal(&mut route.points, p);
                }
            } else {
                for &p in path.iter().rev() {
                    push_orthogonal(&mut route.points, p);
                }
            }
        }
        let to = edge.other_end(from);
        route.target = to;

        let Some(next_port) = pass_through(g, to) else {
            break;
        };
        let next = g.port(next_port)?.edges.iter().copied().find(|&e| {
            e != current
                && !visited.contains(&e)
                && g.edge(e).is_some_and(|e| e.kind == EdgeKind::Regular)
        });
        let Some(next) = next else {
            break;
        };
        current = next;
        from = next_port;
    }
    Some(route)
}

fn reverse_route(mut route: Route) -> Route {
    std::mem::swap(&mut route.source, &mut route.target);
    route.segments.reverse();
    route.points.reverse();
    route
}

/// Rebuilds one route per original edge from the per-gap segment paths.
pub fn relink_routes(g: &mut PortGraph) {
    let mut visited: HashSet<EdgeId> = HashSet::default();
    let mut routes = Vec::new();

    let regular: Vec<(EdgeId, PortId, PortId)> = g
        .edges()
        .filter(|(_, e)| e.kind == EdgeKind::Regular)
        .map(|(id, e)| (id, e.source, e.target))
        .collect();

    for &(id, source, _) in &regular {
        if !visited.contains(&id) && is_real_port(g, source) {
            routes.extend(walk_chain(g, id, source, &mut visited));
        }
    }
    // Chains whose segment at the real node points back at it are walked from that end and
    // then flipped.
    for &(id, _, target) in &regular {
        if !visited.contains(&id) && is_real_port(g, target) {
            routes.extend(walk_chain(g, id, target, &mut visited).map(reverse_route));
        }
    }

    tracing::debug!(routes = routes.len(), "relinked routes");
    g.set_routes(routes);
}

/// Each group spans the rectangles of its member ports.
pub fn place_groups(g: &mut PortGraph) {
    let port_rects: Vec<Option<Rect>> = (0..g.port_capacity())
        .map(|i| g.port(PortId::new(i)).map(|p| p.rect))
        .collect();
    g.for_each_group_mut(|_, group| {
        let union = group
            .ports
            .iter()
            .filter_map(|p| port_rects.get(p.index()).copied().flatten())
            .reduce(|a, b| a.union(&b));
        if let Some(rect) = union {
            group.rect = rect;
        }
    });
}
