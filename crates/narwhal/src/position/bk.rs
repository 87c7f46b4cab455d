//! Four-pass block alignment and compaction over port rows.
//!
//! Each pass aligns ports into vertical blocks along non-crossing links, compacts the blocks
//! leftwards, and records a coordinate for every port. The four passes cover every combination of
//! top-down/bottom-up alignment and left/right compaction by reversing the rank order and the port
//! order of the layering in place. The final coordinate is the mean of the four.

mod blocks;
mod util;

pub use blocks::BlockForest;

use crate::layering::{LinkKind, PortLayering};
use crate::model::{LayoutConfig, MARGIN};
use narwhal_graph::{PortGraph, PortId};
use rustc_hash::FxHashMap as HashMap;

use util::{SlotTable, sep};

/// A link between two slots of consecutive rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLink {
    pub upper: usize,
    pub lower: usize,
    pub kind: LinkKind,
}

impl SlotLink {
    pub fn new(upper: usize, lower: usize, kind: LinkKind) -> Self {
        Self { upper, lower, kind }
    }

    fn crosses(&self, other: &SlotLink, pos: &[usize]) -> bool {
        let (a, b) = (pos[self.upper], pos[self.lower]);
        let (c, d) = (pos[other.upper], pos[other.lower]);
        (a < c && b > d) || (a > c && b < d)
    }

    fn skew(&self, pos: &[usize]) -> usize {
        pos[self.upper].abs_diff(pos[self.lower])
    }

    /// Whether `self` should win over a crossing `other`.
    fn preferred_over(&self, other: &SlotLink, pos: &[usize]) -> bool {
        self.kind > other.kind || (self.kind == other.kind && self.skew(pos) < other.skew(pos))
    }
}

/// Picks a pairwise non-crossing subset of one gap's links.
///
/// Links are scanned by upper then lower position. A link crossing the most recently kept link
/// either evicts it (higher kind, or same kind and smaller skew) or is dropped.
pub fn find_alignable_links(links: &[SlotLink], pos: &[usize]) -> Vec<SlotLink> {
    let mut sorted = links.to_vec();
    sorted.sort_by_key(|l| (pos[l.upper], pos[l.lower]));

    let mut kept: Vec<SlotLink> = Vec::with_capacity(sorted.len());
    for link in sorted {
        let mut keep = true;
        while let Some(top) = kept.last() {
            if !top.crosses(&link, pos) {
                break;
            }
            if link.preferred_over(top, pos) {
                kept.pop();
            } else {
                keep = false;
                break;
            }
        }
        if keep {
            kept.push(link);
        }
    }
    kept
}

/// Aligns slots into blocks, gap by gap from the top.
pub fn vertical_alignment(slots: usize, gaps: &[Vec<SlotLink>], pos: &[usize]) -> BlockForest {
    let mut forest = BlockForest::new(slots);
    for gap in gaps {
        let mut last_lower: Option<usize> = None;
        for link in find_alignable_links(gap, pos) {
            let (u, l) = (link.upper, link.lower);
            if forest.is_block_bottom(u)
                && forest.is_unaligned(l)
                && last_lower.is_none_or(|r| pos[l] > r)
            {
                forest.align(u, l);
                last_lower = Some(pos[l]);
            }
        }
    }
    forest
}

pub fn horizontal_compaction<S>(forest: &mut BlockForest, rows: &[Vec<usize>], sep: S) -> Vec<f64>
where
    S: Fn(usize, usize) -> f64,
{
    forest.compact(rows, sep)
}

/// The layering as one pass sees it.
#[derive(Debug, Clone)]
struct PassLayering {
    rows: Vec<Vec<usize>>,
    gaps: Vec<Vec<SlotLink>>,
    ranks_reversed: bool,
    ports_reversed: bool,
}

impl PassLayering {
    fn new(slots: &SlotTable, layering: &PortLayering) -> Self {
        let gaps = slots
            .links(layering)
            .into_iter()
            .map(|gap| {
                gap.into_iter()
                    .map(|(u, l, kind)| SlotLink::new(u, l, kind))
                    .collect()
            })
            .collect();
        Self {
            rows: slots.rows(layering),
            gaps,
            ranks_reversed: false,
            ports_reversed: false,
        }
    }

    fn reverse_ranks(&mut self) {
        self.rows.reverse();
        self.gaps.reverse();
        for link in self.gaps.iter_mut().flatten() {
            std::mem::swap(&mut link.upper, &mut link.lower);
        }
        self.ranks_reversed = !self.ranks_reversed;
    }

    fn reverse_ports(&mut self) {
        for row in &mut self.rows {
            row.reverse();
        }
        self.ports_reversed = !self.ports_reversed;
    }

    fn positions(&self, slots: usize) -> Vec<usize> {
        let mut pos = vec![0; slots];
        for row in &self.rows {
            for (i, &s) in row.iter().enumerate() {
                pos[s] = i;
            }
        }
        pos
    }
}

fn run_pass(layer: &PassLayering, slots: &SlotTable, config: &LayoutConfig) -> Vec<f64> {
    let n = slots.ports.len();
    let pos = layer.positions(n);
    let mut forest = vertical_alignment(n, &layer.gaps, &pos);
    horizontal_compaction(&mut forest, &layer.rows, |a, b| sep(slots, config, a, b))
}

/// Coordinates of every port of `layering`, leftmost at [`MARGIN`].
pub fn position_x(
    g: &PortGraph,
    layering: &PortLayering,
    config: &LayoutConfig,
) -> HashMap<PortId, f64> {
    let slots = SlotTable::new(g, layering);
    let n = slots.ports.len();
    if n == 0 {
        return HashMap::default();
    }

    let mut layer = PassLayering::new(&slots, layering);
    let mut sums = vec![0.0; n];
    for pass in 0..4 {
        match pass {
            1 | 3 => layer.reverse_ranks(),
            2 => layer.reverse_ports(),
            _ => {}
        }
        let xs = run_pass(&layer, &slots, config);
        tracing::trace!(
            pass,
            ranks_reversed = layer.ranks_reversed,
            ports_reversed = layer.ports_reversed,
            "coordinate pass done"
        );
        let sign = if layer.ports_reversed { -1.0 } else { 1.0 };
        for (sum, x) in sums.iter_mut().zip(xs) {
            *sum += sign * x;
        }
    }
    layer.reverse_ports();
    debug_assert!(!layer.ranks_reversed && !layer.ports_reversed);

    let min = sums.iter().copied().fold(f64::INFINITY, f64::min) / 4.0;
    let shift = MARGIN - min;
    slots
        .ports
        .iter()
        .zip(sums)
        .map(|(&p, sum)| (p, sum / 4.0 + shift))
        .collect()
}
