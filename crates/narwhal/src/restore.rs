//! Reversible structural edits.
//!
//! Same-node edges and ports without incident edges are taken out of the graph before
//! coordinate assignment and put back afterwards. Every removal becomes an [`EditRecord`] in an
//! [`EditLog`]; the log restores records last-in first-out so the list positions captured at
//! removal time are valid again when each record is replayed.

use narwhal_graph::{
    DetachedEdge, DetachedPort, EdgeId, NodeId, PortGraph, PortId, PortKind, PortSide,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    SelfEdge(EdgeId),
    IdlePort(PortId),
}

#[derive(Debug, Clone, PartialEq)]
enum Removed {
    Edge(DetachedEdge),
    Port(DetachedPort),
}

/// One removed entity plus the owning node it was taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct EditRecord {
    target: EditTarget,
    node: NodeId,
    removed: Option<Removed>,
}

impl EditRecord {
    /// Detaches an edge whose endpoints share a node.
    pub fn detach_self_edge(g: &mut PortGraph, id: EdgeId) -> Option<Self> {
        let edge = g.edge(id)?;
        let node = g.node_of(edge.source)?;
        if g.node_of(edge.target)? != node {
            return None;
        }
        let detached = g.detach_edge(id)?;
        Some(Self {
            target: EditTarget::SelfEdge(id),
            node,
            removed: Some(Removed::Edge(detached)),
        })
    }

    /// Detaches a regular port that has no incident edges.
    pub fn detach_idle_port(g: &mut PortGraph, id: PortId) -> Option<Self> {
        let port = g.port(id)?;
        if !port.edges.is_empty() || port.kind != PortKind::Regular {
            return None;
        }
        let node = port.node;
        let detached = g.detach_port(id)?;
        Some(Self {
            target: EditTarget::IdlePort(id),
            node,
            removed: Some(Removed::Port(detached)),
        })
    }

    pub fn target(&self) -> EditTarget {
        self.target
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_restored(&self) -> bool {
        self.removed.is_none()
    }

    /// Side and list index a still-detached port occupied.
    pub fn port_slot(&self) -> Option<(PortSide, usize)> {
        match &self.removed {
            Some(Removed::Port(d)) => Some((d.port.side, d.index)),
            _ => None,
        }
    }

    /// Reinserts the removed entity. Returns `false` if it was already restored.
    pub fn restore(&mut self, g: &mut PortGraph) -> bool {
        let Some(removed) = self.removed.take() else {
            return false;
        };
        let reinserted = match (self.target, removed) {
            (EditTarget::SelfEdge(id), Removed::Edge(d)) => g.reattach_edge(id, d),
            (EditTarget::IdlePort(id), Removed::Port(d)) => g.reattach_port(id, d),
            (target, _) => panic!("edit record for {target:?} holds a mismatched entity"),
        };
        assert!(
            reinserted,
            "slot for {:?} was reoccupied before restore",
            self.target
        );
        true
    }
}

/// Undo log of structural edits.
///
/// Dropping a log that still holds unrestored records is a bug and panics.
#[derive(Debug, Default)]
pub struct EditLog {
    records: Vec<EditRecord>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EditRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[EditRecord] {
        &self.records
    }

    pub fn pending(&self) -> usize {
        self.records.iter().filter(|r| !r.is_restored()).count()
    }

    /// Detaches every edge whose two ends sit on the same node.
    pub fn detach_self_edges(&mut self, g: &mut PortGraph) -> usize {
        let mut count = 0;
        for id in g.edge_ids() {
            if let Some(record) = EditRecord::detach_self_edge(g, id) {
                self.push(record);
                count += 1;
            }
        }
        count
    }

    /// Detaches every regular port without incident edges.
    ///
    /// Ports are visited right to left within each list so that restoring in reverse order
    /// reinserts them at their original indices.
    pub fn detach_idle_ports(&mut self, g: &mut PortGraph) -> usize {
        let mut count = 0;
        let node_ids: Vec<NodeId> = g.nodes().map(|(id, _)| id).collect();
        for node in node_ids {
            for side in [PortSide::Top, PortSide::Bottom] {
                let ports: Vec<PortId> = g
                    .node(node)
                    .map(|n| n.ports(side).to_vec())
                    .unwrap_or_default();
                for port in ports.into_iter().rev() {
                    if let Some(record) = EditRecord::detach_idle_port(g, port) {
                        self.push(record);
                        count += 1;
                    }
                }
            }
        }
        count
    }

    /// Still-detached ports in restore order: `(port, node, side, index)`.
    pub fn detached_ports(&self) -> Vec<(PortId, NodeId, PortSide, usize)> {
        self.records
            .iter()
            .rev()
            .filter_map(|r| match (r.target, r.port_slot()) {
                (EditTarget::IdlePort(id), Some((side, index))) => Some((id, r.node, side, index)),
                _ => None,
            })
            .collect()
    }

    /// Restores every pending record, newest first. Returns how many were restored.
    pub fn restore_all(&mut self, g: &mut PortGraph) -> usize {
        self.records
            .iter_mut()
            .rev()
            .map(|r| r.restore(g))
            .filter(|restored| *restored)
            .count()
    }
}

impl Drop for EditLog {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            let pending = self.pending();
            assert!(
                pending == 0,
                "edit log dropped with {pending} unrestored record(s)"
            );
        }
    }
}
