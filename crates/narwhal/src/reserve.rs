//! Width reservation with synthetic spacer ports.
//!
//! Coordinate assignment only knows about ports, so node extent is expressed through ports:
//!
//! - every normal node is bracketed by a frame spacer at both ends of both rows, and the
//!   left (right) frames of the two rows are paired by a structural edge so they align;
//! - every detached idle port is replaced in place by a placeholder that keeps its slot;
//! - nodes whose label needs more room than their ports provide get width spacers.
//!
//! [`Reservation::release`] removes all of it again.

use crate::model::LayoutConfig;
use crate::restore::EditLog;
use narwhal_graph::{
    EdgeId, EdgeKind, Node, NodeId, NodeKind, PortGraph, PortId, PortKind, PortSide, SpacerRole,
};

#[derive(Debug, Default)]
pub struct Reservation {
    spacers: Vec<PortId>,
    structural: Vec<EdgeId>,
    placeholders: Vec<(PortId, PortId)>,
    width_spacers: usize,
}

impl Reservation {
    pub fn spacers(&self) -> &[PortId] {
        &self.spacers
    }

    pub fn structural_edges(&self) -> &[EdgeId] {
        &self.structural
    }

    pub fn width_spacer_count(&self) -> usize {
        self.width_spacers
    }

    /// Removes every spacer and structural edge. Returns the x each placeholder reached, keyed
    /// by the detached port it stood in for.
    ///
    /// # Panics
    ///
    /// If a spacer or structural edge was already removed from `g`.
    pub fn release(self, g: &mut PortGraph) -> Vec<(PortId, f64)> {
        let positions: Vec<(PortId, f64)> = self
            .placeholders
            .iter()
            .filter_map(|&(real, spacer)| g.port(spacer).map(|p| (real, p.x)))
            .collect();
        for e in self.structural {
            assert!(
                g.detach_edge(e).is_some(),
                "structural edge {e} was removed before release"
            );
        }
        for p in self.spacers {
            assert!(
                g.detach_port(p).is_some(),
                "spacer port {p} was removed before release"
            );
        }
        positions
    }
}

/// Smallest width a node must end up with.
pub fn required_width(node: &Node, config: &LayoutConfig) -> f64 {
    config
        .vertex_minimum_width
        .max(node.label_width + 2.0 * config.border_width)
        .max(node.requested_width.unwrap_or(0.0))
}

/// Frame-to-frame distance of a row holding `ports` non-frame ports after compaction.
pub fn row_width(ports: usize, config: &LayoutConfig) -> f64 {
    if ports == 0 {
        config.delta()
    } else {
        2.0 * config.frame_sep() + (ports - 1) as f64 * config.delta()
    }
}

pub fn reserve(g: &mut PortGraph, log: &EditLog, config: &LayoutConfig) -> Reservation {
    let mut out = Reservation::default();

    for (real, node, side, index) in log.detached_ports() {
        let spacer = g.insert_port(
            node,
            side,
            index,
            PortKind::Spacer(SpacerRole::Placeholder),
        );
        out.spacers.push(spacer);
        out.placeholders.push((real, spacer));
    }

    let normal: Vec<NodeId> = g
        .nodes()
        .filter(|(_, n)| n.kind == NodeKind::Normal)
        .map(|(id, _)| id)
        .collect();
    for node in normal {
        add_width_spacers(g, node, config, &mut out);
        add_frames(g, node, &mut out);
    }

    out
}

fn add_frames(g: &mut PortGraph, node: NodeId, out: &mut Reservation) {
    let frame = PortKind::Spacer(SpacerRole::Frame);
    let top_len = g.node(node).map(|n| n.top_ports.len()).unwrap_or(0);
    let bottom_len = g.node(node).map(|n| n.bottom_ports.len()).unwrap_or(0);

    let top_right = g.insert_port(node, PortSide::Top, top_len, frame);
    let top_left = g.insert_port(node, PortSide::Top, 0, frame);
    let bottom_right = g.insert_port(node, PortSide::Bottom, bottom_len, frame);
    let bottom_left = g.insert_port(node, PortSide::Bottom, 0, frame);
    out.spacers
        .extend([top_left, top_right, bottom_left, bottom_right]);

    out.structural.push(g.add_edge_with(
        top_left,
        bottom_left,
        EdgeKind::Structural,
    ));
    out.structural.push(g.add_edge_with(
        top_right,
        bottom_right,
        EdgeKind::Structural,
    ));
}

fn add_width_spacers(
    g: &mut PortGraph,
    node: NodeId,
    config: &LayoutConfig,
    out: &mut Reservation,
) {
    let Some(n) = g.node(node) else {
        return;
    };
    let required = required_width(n, config);
    let (top, bottom) = (n.top_ports.len(), n.bottom_ports.len());
    let (side, count) = if bottom > top {
        (PortSide::Bottom, bottom)
    } else {
        (PortSide::Top, top)
    };
    // A zero `delta` cannot widen a row no matter how many spacers are added.
    if row_width(count, config) >= required || config.delta() <= 0.0 || !required.is_finite() {
        return;
    }

    let steps = ((required - 2.0 * config.frame_sep()) / config.delta()).ceil();
    let needed = 1 + steps.max(0.0) as usize;
    let mut extra = needed.max(count + 1) - count;
    // Same count at both ends.
    extra += extra % 2;

    let left = extra / 2;
    let width = PortKind::Spacer(SpacerRole::Width);
    for _ in 0..left {
        out.spacers.push(g.insert_port(node, side, 0, width));
    }
    for _ in left..extra {
        let len = g.node(node).map(|n| n.ports(side).len()).unwrap_or(0);
        out.spacers.push(g.insert_port(node, side, len, width));
    }
    out.width_spacers += extra;
}
