//! Bend points of routed segments.

use super::gap::Segment;
use crate::model::LayoutConfig;
use narwhal_graph::Point;

/// y of track `track` in a gap whose upper boundary is `y_top`.
pub fn track_y(y_top: f64, track: usize, config: &LayoutConfig) -> f64 {
    y_top
        + config.distance_between_layers / 2.0
        + config.edge_distance_vertical * (track as f64 + 0.5)
}

/// Path of `seg` from the upper boundary `y_top` to the lower boundary `y_bottom`, in edge
/// direction. Conflict tracks of detours are numbered from `first_conflict_track`.
pub fn segment_path(
    seg: &Segment,
    y_top: f64,
    y_bottom: f64,
    first_conflict_track: usize,
    config: &LayoutConfig,
) -> Vec<Point> {
    let (t, b) = (seg.top, seg.bottom);
    let mut points = match seg.track {
        Some(track) if !seg.is_straight() => {
            let y = track_y(y_top, track, config);
            if let Some(detour) = seg.detour {
                let yx = track_y(y_top, first_conflict_track + detour.level, config);
                vec![
                    Point::new(t, y_top),
                    Point::new(t, y),
                    Point::new(detour.jog, y),
                    Point::new(detour.jog, yx),
                    Point::new(b, yx),
                    Point::new(b, y_bottom),
                ]
            } else {
                vec![
                    Point::new(t, y_top),
                    Point::new(t, y),
                    Point::new(b, y),
                    Point::new(b, y_bottom),
                ]
            }
        }
        _ => vec![Point::new(t, y_top), Point::new(t, y_bottom)],
    };
    if seg.reversed {
        points.reverse();
    }
    points
}
