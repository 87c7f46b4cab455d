//! Small numeric and polyline helpers.

use narwhal_graph::Point;

/// Coordinates closer than this are treated as equal.
pub const EPS: f64 = 1e-6;

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

/// Appends `p`, dropping duplicates and merging it into a collinear trailing segment.
pub fn push_orthogonal(points: &mut Vec<Point>, p: Point) {
    if let Some(last) = points.last() {
        if approx_eq(last.x, p.x) && approx_eq(last.y, p.y) {
            return;
        }
    }
    if points.len() >= 2 {
        let a = points[points.len() - 2];
        let b = points[points.len() - 1];
        let vertical = approx_eq(a.x, b.x) && approx_eq(b.x, p.x);
        let horizontal = approx_eq(a.y, b.y) && approx_eq(b.y, p.y);
        if vertical || horizontal {
            points.pop();
        }
    }
    points.push(p);
}

/// Whether every pair of consecutive points differs in exactly one coordinate.
pub fn is_orthogonal(points: &[Point]) -> bool {
    points.windows(2).all(|w| {
        let dx = !approx_eq(w[0].x, w[1].x);
        let dy = !approx_eq(w[0].y, w[1].y);
        dx != dy
    })
}
