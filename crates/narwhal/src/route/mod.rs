//! Channel routing between consecutive ranks.
//!
//! Every gap is planned on its own from port x coordinates alone: segments are leveled into
//! tracks, track counts decide how tall the gap becomes, and the rank tops follow from those
//! heights. Paths are written once every rank has its final y.

pub mod bends;
pub mod contour;
pub mod gap;
pub mod turning;

use crate::model::{LayoutConfig, MARGIN};
use narwhal_graph::{Node, NodeKind, PortGraph, PortKind, Rect, SpacerRole};
use serde::Serialize;

pub use gap::{Detour, GapPlan, Segment, TrackGroup};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapSummary {
    /// Rank above the gap.
    pub rank: usize,
    pub tracks: usize,
    pub conflicts: usize,
    pub extra_height: f64,
}

/// Top edge of every rank's node bodies, given how much each gap grows.
pub fn rank_tops(ranks: usize, extra: &[f64], config: &LayoutConfig) -> Vec<f64> {
    let mut out = Vec::with_capacity(ranks);
    let mut y = MARGIN + config.port_height;
    for r in 0..ranks {
        out.push(y);
        y += config.rank_pitch() + extra.get(r).copied().unwrap_or(0.0);
    }
    out
}

/// Node rectangles before tightening: normal nodes span their frame spacers, dummies hug their
/// ports.
pub fn place_nodes(g: &mut PortGraph, tops: &[f64], config: &LayoutConfig) {
    let half = config.port_width / 2.0;
    let mut rects = Vec::with_capacity(g.node_count());
    for (id, node) in g.nodes() {
        let (mut lo, mut hi) = match node.kind {
            NodeKind::Normal => port_span(g, node, true)
                .or_else(|| port_span(g, node, false))
                .unwrap_or((MARGIN, MARGIN + config.vertex_minimum_width)),
            NodeKind::Dummy | NodeKind::TurningDummy => port_span(g, node, false)
                .map_or((MARGIN - half, MARGIN + half), |(lo, hi)| {
                    (lo - half, hi + half)
                }),
        };
        if hi < lo {
            std::mem::swap(&mut lo, &mut hi);
        }
        let y = tops.get(node.rank).copied().unwrap_or(MARGIN);
        rects.push((id, Rect::from_edges(lo, y, hi, y + config.vertex_height)));
    }
    for (id, rect) in rects {
        if let Some(n) = g.node_mut(id) {
            n.rect = rect;
        }
    }
}

fn port_span(g: &PortGraph, node: &Node, frames_only: bool) -> Option<(f64, f64)> {
    node.all_ports()
        .filter_map(|p| g.port(p))
        .filter(|p| !frames_only || p.kind == PortKind::Spacer(SpacerRole::Frame))
        .map(|p| p.x)
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
}

/// Routes every gap, places nodes vertically and writes one path per regular edge.
pub fn route(g: &mut PortGraph, config: &LayoutConfig) -> Vec<GapSummary> {
    let ranks = g.ranks().len();
    let plans: Vec<GapPlan> = (0..ranks.saturating_sub(1))
        .map(|r| gap::plan_gap(g, r, config))
        .collect();
    let extra: Vec<f64> = plans.iter().map(|p| p.extra_height(config)).collect();
    let tops = rank_tops(ranks, &extra, config);
    place_nodes(g, &tops, config);

    let mut summaries = Vec::with_capacity(plans.len());
    for (plan, &grow) in plans.iter().zip(&extra) {
        let y_top = tops[plan.rank] + config.vertex_height + config.port_height;
        let y_bottom = y_top + config.distance_between_layers + grow;
        for seg in &plan.segments {
            let path = bends::segment_path(seg, y_top, y_bottom, plan.tracks, config);
            if let Some(edge) = g.edge_mut(seg.edge) {
                edge.paths = vec![path];
            }
        }
        tracing::debug!(
            rank = plan.rank,
            segments = plan.segments.len(),
            tracks = plan.tracks,
            conflicts = plan.conflicts.len(),
            conflict_tracks = plan.conflict_tracks,
            extra_height = grow,
            "routed gap"
        );
        summaries.push(GapSummary {
            rank: plan.rank,
            tracks: plan.tracks,
            conflicts: plan.conflicts.len(),
            extra_height: grow,
        });
    }
    summaries
}
