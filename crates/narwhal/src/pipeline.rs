//! The layout pipeline.

use crate::coordinate_system;
use crate::error::Result;
use crate::finalize::finalize;
use crate::layering::build_port_layering;
use crate::model::{LayoutConfig, MARGIN};
use crate::position::assign_x;
use crate::reserve::reserve;
use crate::restore::EditLog;
use crate::route::{GapSummary, route};
use crate::validate::validate;
use narwhal_graph::PortGraph;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSummary {
    pub width: f64,
    pub height: f64,
    pub gaps: Vec<GapSummary>,
    pub self_edges: usize,
    pub idle_ports: usize,
    pub width_spacers: usize,
}

impl LayoutSummary {
    pub fn tracks(&self) -> usize {
        self.gaps.iter().map(|g| g.tracks).sum()
    }

    pub fn conflicts(&self) -> usize {
        self.gaps.iter().map(|g| g.conflicts).sum()
    }
}

/// Lays out `g` in place: port x coordinates, node/port/group rectangles, a path on every
/// regular edge and one [`narwhal_graph::Route`] per original edge.
pub fn layout(g: &mut PortGraph, config: &LayoutConfig) -> Result<LayoutSummary> {
    validate(g, config)?;

    let mut log = EditLog::new();
    let self_edges = log.detach_self_edges(g);
    let idle_ports = log.detach_idle_ports(g);
    let reservation = reserve(g, &log, config);
    let width_spacers = reservation.width_spacer_count();
    tracing::debug!(
        self_edges,
        idle_ports,
        spacers = reservation.spacers().len(),
        width_spacers,
        "reserved node extents"
    );

    let layering = build_port_layering(g);
    assign_x(g, &layering, config);
    let gaps = route(g, config);

    let placeholders = reservation.release(g);
    let restored = log.restore_all(g);
    for (port, x) in placeholders {
        if let Some(p) = g.port_mut(port) {
            p.x = x;
        }
    }
    tracing::debug!(restored, "restored removed entities");

    finalize(g, config);

    let (right, bottom) = extent(g);
    let (width, height) =
        coordinate_system::apply(g, config.rank_dir, right + MARGIN, bottom + MARGIN);

    let summary = LayoutSummary {
        width,
        height,
        gaps,
        self_edges,
        idle_ports,
        width_spacers,
    };
    tracing::debug!(
        width,
        height,
        tracks = summary.tracks(),
        conflicts = summary.conflicts(),
        "layout done"
    );
    Ok(summary)
}

/// Rightmost and lowest coordinate of anything drawn.
fn extent(g: &PortGraph) -> (f64, f64) {
    let mut right = MARGIN;
    let mut bottom = MARGIN;
    let rects = g
        .nodes()
        .map(|(_, n)| n.rect)
        .chain(g.ports().map(|(_, p)| p.rect));
    for r in rects {
        right = right.max(r.right());
        bottom = bottom.max(r.bottom());
    }
    for p in g.edges().flat_map(|(_, e)| e.paths.iter().flatten()) {
        right = right.max(p.x);
        bottom = bottom.max(p.y);
    }
    (right, bottom)
}
