//! Piecewise-constant level profiles over x.
//!
//! A contour is a sorted list of breakpoints; each breakpoint's level holds until the next one.
//! Left of the first breakpoint the contour is free (`None`).

use crate::util::EPS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourPoint {
    pub x: f64,
    pub level: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    points: Vec<ContourPoint>,
}

impl Contour {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[ContourPoint] {
        &self.points
    }

    pub fn level_at(&self, x: f64) -> Option<usize> {
        let i = self.points.partition_point(|p| p.x <= x);
        if i == 0 { None } else { self.points[i - 1].level }
    }

    /// Highest level anywhere on the closed interval `[lo, hi]`.
    pub fn max_level(&self, lo: f64, hi: f64) -> Option<usize> {
        let inner = self
            .points
            .iter()
            .filter(|p| p.x > lo && p.x <= hi)
            .filter_map(|p| p.level)
            .max();
        self.level_at(lo).max(inner)
    }

    /// Lowest level an interval `[lo, hi]` can take without touching anything already placed.
    pub fn find_min_level(&self, lo: f64, hi: f64) -> usize {
        self.max_level(lo, hi).map_or(0, |l| l + 1)
    }

    /// Lifts the contour to at least `level` on `[lo, hi]`.
    pub fn raise(&mut self, lo: f64, hi: f64, level: usize) {
        let block = Contour {
            points: vec![
                ContourPoint {
                    x: lo,
                    level: Some(level),
                },
                ContourPoint {
                    x: hi + EPS,
                    level: None,
                },
            ],
        };
        *self = merge_contour(self, &block);
    }

    /// Highest level anywhere.
    pub fn top(&self) -> Option<usize> {
        self.points.iter().filter_map(|p| p.level).max()
    }
}

/// Pointwise maximum of two contours.
pub fn merge_contour(a: &Contour, b: &Contour) -> Contour {
    let mut xs: Vec<f64> = a.points.iter().chain(&b.points).map(|p| p.x).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();

    let mut points: Vec<ContourPoint> = Vec::with_capacity(xs.len());
    for x in xs {
        let level = a.level_at(x).max(b.level_at(x));
        let same = points.last().map(|p| p.level);
        if same == Some(level) || (points.is_empty() && level.is_none()) {
            continue;
        }
        points.push(ContourPoint { x, level });
    }
    Contour { points }
}
