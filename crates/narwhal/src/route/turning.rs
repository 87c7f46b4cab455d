//! Legs of turning dummies.
//!
//! A turning dummy reverses an edge's vertical direction inside one gap: both of its ports face
//! the same gap, so both legs start and end on the same side of the channel. Legs of a dummy in
//! the upper rank hang from the top of the gap; legs of a dummy in the lower rank rise from the
//! bottom. Each side gets its own contour, which later bounds the ordinary edges of that side.

use super::contour::Contour;
use super::gap::{Segment, TrackGroup};

/// x of the leg end on the dummy.
fn near(s: &Segment, group: TrackGroup) -> f64 {
    match group {
        TrackGroup::Top => s.top,
        TrackGroup::Bottom => s.bottom,
    }
}

fn far(s: &Segment, group: TrackGroup) -> f64 {
    match group {
        TrackGroup::Top => s.bottom,
        TrackGroup::Bottom => s.top,
    }
}

/// Levels every non-straight leg whose dummy sits on `group`'s side and returns the contour.
pub fn level_legs(segments: &mut [Segment], group: TrackGroup) -> Contour {
    let (mut left, mut right): (Vec<usize>, Vec<usize>) = (0..segments.len())
        .filter(|&i| segments[i].turning == Some(group) && !segments[i].is_straight())
        .partition(|&i| far(&segments[i], group) < near(&segments[i], group));

    left.sort_by(|&a, &b| near(&segments[a], group).total_cmp(&near(&segments[b], group)));
    right.sort_by(|&a, &b| near(&segments[b], group).total_cmp(&near(&segments[a], group)));

    let mut contour = Contour::new();
    for i in left.into_iter().chain(right) {
        let (lo, hi) = segments[i].span();
        let level = contour.find_min_level(lo, hi);
        contour.raise(lo, hi, level);
        segments[i].level = Some(level);
        segments[i].group = Some(group);
    }
    contour
}
