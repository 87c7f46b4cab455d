//! Track assignment inside one rank gap.

use super::contour::{Contour, merge_contour};
use super::turning;
use crate::model::LayoutConfig;
use crate::util::{EPS, approx_eq};
use narwhal_graph::{EdgeId, EdgeKind, NodeKind, PortGraph, PortSide};

/// Which end of the gap a level is counted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackGroup {
    Top,
    Bottom,
}

/// How a conflicted segment steps around the vertical it would otherwise run into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detour {
    /// x of the vertical that drops from the segment's track to its conflict track.
    pub jog: f64,
    /// Conflict track, counted below the ordinary tracks.
    pub level: usize,
}

/// One edge crossing the gap, oriented from the upper rank to the lower rank.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub edge: EdgeId,
    /// x of the end in the upper rank.
    pub top: f64,
    /// x of the end in the lower rank.
    pub bottom: f64,
    /// The edge's source is the lower end.
    pub reversed: bool,
    /// Set for legs of a turning dummy, naming the side the dummy sits on.
    pub turning: Option<TrackGroup>,
    pub group: Option<TrackGroup>,
    pub level: Option<usize>,
    pub track: Option<usize>,
    pub detour: Option<Detour>,
}

impl Segment {
    pub fn is_straight(&self) -> bool {
        approx_eq(self.top, self.bottom)
    }

    pub fn span(&self) -> (f64, f64) {
        (self.top.min(self.bottom), self.top.max(self.bottom))
    }
}

#[derive(Debug, Clone, Default)]
pub struct GapPlan {
    pub rank: usize,
    pub segments: Vec<Segment>,
    pub tracks: usize,
    /// Extra tracks below the ordinary ones, used by detours.
    pub conflict_tracks: usize,
    /// `(detoured, blocking)` pairs.
    pub conflicts: Vec<(EdgeId, EdgeId)>,
}

impl GapPlan {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Height the gap grows by beyond `distanceBetweenLayers`.
    pub fn extra_height(&self, config: &LayoutConfig) -> f64 {
        config.edge_distance_vertical * (self.tracks + self.conflict_tracks) as f64
    }
}

/// Regular edges between rank `rank` and rank `rank + 1`, in node, port and edge order.
pub fn collect_segments(g: &PortGraph, rank: usize) -> Vec<Segment> {
    let Some(nodes) = g.ranks().get(rank) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for &n in nodes {
        let Some(node) = g.node(n) else {
            continue;
        };
        for &p in node.ports(PortSide::Bottom) {
            let Some(port) = g.port(p) else {
                continue;
            };
            for &e in &port.edges {
                let Some(edge) = g.edge(e) else {
                    continue;
                };
                if edge.kind != EdgeKind::Regular {
                    continue;
                }
                let other = edge.other_end(p);
                let Some(lower) = g.port(other) else {
                    continue;
                };
                let Some(lower_node) = g.node(lower.node) else {
                    continue;
                };
                if lower_node.rank != rank + 1 {
                    continue;
                }
                let turning = if node.kind == NodeKind::TurningDummy {
                    Some(TrackGroup::Top)
                } else if lower_node.kind == NodeKind::TurningDummy {
                    Some(TrackGroup::Bottom)
                } else {
                    None
                };
                out.push(Segment {
                    edge: e,
                    top: port.x,
                    bottom: lower.x,
                    reversed: edge.source == other,
                    turning,
                    group: None,
                    level: None,
                    track: None,
                    detour: None,
                });
            }
        }
    }
    out
}

pub fn plan_gap(g: &PortGraph, rank: usize, config: &LayoutConfig) -> GapPlan {
    let mut segments = collect_segments(g, rank);

    let top_turning = turning::level_legs(&mut segments, TrackGroup::Top);
    let bottom_turning = turning::level_legs(&mut segments, TrackGroup::Bottom);
    let lr = level_lr(&mut segments, &top_turning);
    let rl = level_rl(&mut segments, &bottom_turning);

    let n_top = merge_contour(&top_turning, &lr).top().map_or(0, |t| t + 1);
    let n_bottom = merge_contour(&bottom_turning, &rl).top().map_or(0, |t| t + 1);
    place_edges_finally(&mut segments, n_top, n_bottom);
    let pairs = find_conflicts(&segments);
    let mut detoured: Vec<usize> = pairs.iter().map(|&(i, _)| i).collect();
    detoured.sort_unstable();
    detoured.dedup();
    let conflict_tracks =
        place_detours(&mut segments, &detoured, config.edge_distance_vertical / 2.0);
    let conflicts = pairs
        .into_iter()
        .map(|(i, j)| (segments[i].edge, segments[j].edge))
        .collect();

    GapPlan {
        rank,
        segments,
        tracks: n_top + n_bottom,
        conflict_tracks,
        conflicts,
    }
}

/// Levels segments whose lower end lies left of their upper end, counted from the top.
pub fn level_lr(segments: &mut [Segment], turning: &Contour) -> Contour {
    let mut order: Vec<usize> = (0..segments.len())
        .filter(|&i| {
            let s = &segments[i];
            s.turning.is_none() && !s.is_straight() && s.bottom < s.top
        })
        .collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&segments[a], &segments[b]);
        a.top.total_cmp(&b.top).then(a.bottom.total_cmp(&b.bottom))
    });
    level_into(segments, &order, turning, TrackGroup::Top)
}

/// Levels segments whose lower end lies right of their upper end, counted from the bottom.
pub fn level_rl(segments: &mut [Segment], turning: &Contour) -> Contour {
    let mut order: Vec<usize> = (0..segments.len())
        .filter(|&i| {
            let s = &segments[i];
            s.turning.is_none() && !s.is_straight() && s.bottom > s.top
        })
        .collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&segments[a], &segments[b]);
        a.bottom.total_cmp(&b.bottom).then(a.top.total_cmp(&b.top))
    });
    level_into(segments, &order, turning, TrackGroup::Bottom)
}

fn level_into(
    segments: &mut [Segment],
    order: &[usize],
    turning: &Contour,
    group: TrackGroup,
) -> Contour {
    let mut skyline = Contour::new();
    for &i in order {
        let (lo, hi) = segments[i].span();
        let level = turning
            .find_min_level(lo, hi)
            .max(skyline.find_min_level(lo, hi));
        skyline.raise(lo, hi, level);
        segments[i].level = Some(level);
        segments[i].group = Some(group);
    }
    skyline
}

/// Turns group levels into track indices, top to bottom.
pub fn place_edges_finally(segments: &mut [Segment], n_top: usize, n_bottom: usize) {
    for s in segments {
        s.track = match (s.group, s.level) {
            (Some(TrackGroup::Top), Some(level)) => Some(level),
            (Some(TrackGroup::Bottom), Some(level)) => Some(n_top + n_bottom - 1 - level),
            _ => None,
        };
    }
}

/// Pairs `(i, j)` of segment indices where the lower vertical of `i` runs into the upper
/// vertical of `j`.
///
/// Both verticals share an x, and `i` leaves its track above the track where `j` turns, so the
/// two would overlap.
pub fn find_conflicts(segments: &[Segment]) -> Vec<(usize, usize)> {
    let mut tops: Vec<(f64, usize, usize)> = segments
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.track.map(|t| (s.top, t, i)))
        .collect();
    tops.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.2.cmp(&b.2)));

    let mut pairs = Vec::new();
    for i in 0..segments.len() {
        let Some(track) = segments[i].track else {
            continue;
        };
        let x = segments[i].bottom;
        let start = tops.partition_point(|t| t.0 <= x - EPS);
        for &(top, other_track, j) in &tops[start..] {
            if top >= x + EPS {
                break;
            }
            if j != i && track < other_track {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Gives every segment in `detoured` a jog x and a conflict track. Returns the number of
/// conflict tracks used.
///
/// A jog sits at most `max_offset` from the lower end, towards the upper end, and halfway at
/// most to the nearest x already carrying a vertical in the gap, earlier jogs included. The
/// horizontal pieces between jog and lower end are leveled like ordinary segments so that
/// pieces sharing an x range never share a conflict track.
pub fn place_detours(segments: &mut [Segment], detoured: &[usize], max_offset: f64) -> usize {
    let mut occupied: Vec<f64> = segments.iter().flat_map(|s| [s.top, s.bottom]).collect();
    let mut contour = Contour::new();
    for &i in detoured {
        let (t, b) = (segments[i].top, segments[i].bottom);
        let dir = (t - b).signum();
        let room = occupied
            .iter()
            .map(|&x| (x - b) * dir)
            .filter(|&d| d > EPS)
            .fold(f64::INFINITY, f64::min);
        let jog = b + dir * max_offset.min(room / 2.0);
        occupied.push(jog);

        let (lo, hi) = (jog.min(b), jog.max(b));
        let level = contour.find_min_level(lo, hi);
        contour.raise(lo, hi, level);
        segments[i].detour = Some(Detour { jog, level });
    }
    contour.top().map_or(0, |t| t + 1)
}
