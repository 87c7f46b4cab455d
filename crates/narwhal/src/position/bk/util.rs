use crate::layering::{LinkKind, PortLayering};
use crate::model::LayoutConfig;
use narwhal_graph::{NodeId, PortGraph, PortId, PortKind, SpacerRole};
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, Copy)]
pub(super) struct SlotInfo {
    pub node: NodeId,
    pub frame: bool,
}

/// Dense slot numbering for the ports of a layering.
#[derive(Debug, Clone, Default)]
pub(super) struct SlotTable {
    pub ports: Vec<PortId>,
    pub info: Vec<SlotInfo>,
    pub index: HashMap<PortId, usize>,
}

impl SlotTable {
    pub fn new(g: &PortGraph, layering: &PortLayering) -> Self {
        let mut out = Self::default();
        for row in &layering.rows {
            for &p in row {
                let Some(port) = g.port(p) else {
                    continue;
                };
                out.index.insert(p, out.ports.len());
                out.ports.push(p);
                out.info.push(SlotInfo {
                    node: port.node,
                    frame: port.kind == PortKind::Spacer(SpacerRole::Frame),
                });
            }
        }
        out
    }

    pub fn rows(&self, layering: &PortLayering) -> Vec<Vec<usize>> {
        layering
            .rows
            .iter()
            .map(|row| row.iter().filter_map(|p| self.index.get(p).copied()).collect())
            .collect()
    }

    pub fn links(&self, layering: &PortLayering) -> Vec<Vec<(usize, usize, LinkKind)>> {
        layering
            .links
            .iter()
            .map(|gap| {
                gap.iter()
                    .filter_map(|l| {
                        let u = *self.index.get(&l.upper)?;
                        let w = *self.index.get(&l.lower)?;
                        Some((u, w, l.kind))
                    })
                    .collect()
            })
            .collect()
    }
}

/// Minimum distance between two neighbouring slots of a row.
pub(super) fn sep(slots: &SlotTable, config: &LayoutConfig, a: usize, b: usize) -> f64 {
    let (a, b) = (slots.info[a], slots.info[b]);
    if a.node == b.node && a.frame != b.frame {
        config.frame_sep()
    } else {
        config.delta()
    }
}
