//! Port layering.
//!
//! Rank `r` contributes row `2r` (top ports of its nodes, in node order) and row `2r + 1`
//! (bottom ports). Consecutive rows are joined by links: regular edges between a bottom row and
//! the next top row, and structural links between the two rows of one rank.

use narwhal_graph::{EdgeKind, NodeKind, PortGraph, PortId, PortSide};

/// Link kinds ordered by how strongly coordinate assignment wants to keep them vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LinkKind {
    Regular,
    /// Both ends on dummy nodes (an inner segment of a long edge).
    InnerSegment,
    /// Frame pairs and dummy pass-throughs inside one rank.
    Structural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub upper: PortId,
    pub lower: PortId,
    pub kind: LinkKind,
}

#[derive(Debug, Clone, Default)]
pub struct PortLayering {
    pub rows: Vec<Vec<PortId>>,
    /// `links[i]` joins `rows[i]` (upper) and `rows[i + 1]` (lower).
    pub links: Vec<Vec<Link>>,
}

impl PortLayering {
    pub fn port_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

pub fn row_index(rank: usize, side: PortSide) -> usize {
    match side {
        PortSide::Top => 2 * rank,
        PortSide::Bottom => 2 * rank + 1,
    }
}

pub fn build_port_layering(g: &PortGraph) -> PortLayering {
    let mut rows: Vec<Vec<PortId>> = Vec::with_capacity(g.ranks().len() * 2);
    for nodes in g.ranks() {
        for side in [PortSide::Top, PortSide::Bottom] {
            let row = nodes
                .iter()
                .filter_map(|&n| g.node(n))
                .flat_map(|n| n.ports(side).iter().copied())
                .collect();
            rows.push(row);
        }
    }

    let mut links: Vec<Vec<Link>> = vec![Vec::new(); rows.len().saturating_sub(1)];

    let row_of = |p: PortId| -> Option<usize> {
        let port = g.port(p)?;
        let rank = g.node(port.node)?.rank;
        Some(row_index(rank, port.side))
    };

    for (_, edge) in g.edges() {
        let (Some(rs), Some(rt)) = (row_of(edge.source), row_of(edge.target)) else {
            continue;
        };
        if rs.abs_diff(rt) != 1 {
            continue;
        }
        let (upper, lower, gap) = if rs < rt {
            (edge.source, edge.target, rs)
        } else {
            (edge.target, edge.source, rt)
        };
        let kind = match edge.kind {
            EdgeKind::Structural => LinkKind::Structural,
            EdgeKind::Regular if is_dummy_port(g, upper) && is_dummy_port(g, lower) => {
                LinkKind::InnerSegment
            }
            EdgeKind::Regular => LinkKind::Regular,
        };
        links[gap].push(Link { upper, lower, kind });
    }

    for (_, node) in g.nodes() {
        if node.kind != NodeKind::Dummy {
            continue;
        }
        let (Some(&upper), Some(&lower)) = (node.top_ports.first(), node.bottom_ports.first())
        else {
            continue;
        };
        let gap = row_index(node.rank, PortSide::Top);
        if let Some(gap_links) = links.get_mut(gap) {
            gap_links.push(Link {
                upper,
                lower,
                kind: LinkKind::Structural,
            });
        }
    }

    PortLayering { rows, links }
}

fn is_dummy_port(g: &PortGraph, p: PortId) -> bool {
    g.node_of(p)
        .and_then(|n| g.node(n))
        .is_some_and(|n| n.kind == NodeKind::Dummy)
}
