//! Entity records stored in [`PortGraph`](super::PortGraph).

use crate::geometry::{Point, Rect};
use crate::ids::{EdgeId, GroupId, NodeId, PortId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NodeKind {
    #[default]
    Normal,
    /// One rank-crossing of a long edge: exactly one top and one bottom port.
    Dummy,
    /// The turn of an edge that leaves and re-enters on the same side: two ports, one side.
    TurningDummy,
}

impl NodeKind {
    pub fn is_synthetic(self) -> bool {
        !matches!(self, NodeKind::Normal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PortSide {
    /// Faces the previous rank.
    #[default]
    Top,
    /// Faces the next rank.
    Bottom,
}

impl PortSide {
    pub fn opposite(self) -> Self {
        match self {
            PortSide::Top => PortSide::Bottom,
            PortSide::Bottom => PortSide::Top,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpacerRole {
    /// Brackets a node at one end of a row.
    Frame,
    /// Reserves label width.
    Width,
    /// Holds the slot of a temporarily detached port.
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PortKind {
    #[default]
    Regular,
    Spacer(SpacerRole),
}

impl PortKind {
    pub fn is_spacer(self) -> bool {
        matches!(self, PortKind::Spacer(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeKind {
    #[default]
    Regular,
    /// Pairs synthetic ports of one node across its two rows.
    Structural,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub rank: usize,
    pub top_ports: Vec<PortId>,
    pub bottom_ports: Vec<PortId>,
    pub groups: Vec<GroupId>,
    /// Minimum width required by the node's label text.
    pub label_width: f64,
    /// Width requested by the caller; treated as a lower bound.
    pub requested_width: Option<f64>,
    pub rect: Rect,
}

impl Node {
    pub fn ports(&self, side: PortSide) -> &[PortId] {
        match side {
            PortSide::Top => &self.top_ports,
            PortSide::Bottom => &self.bottom_ports,
        }
    }

    pub(crate) fn ports_mut(&mut self, side: PortSide) -> &mut Vec<PortId> {
        match side {
            PortSide::Top => &mut self.top_ports,
            PortSide::Bottom => &mut self.bottom_ports,
        }
    }

    pub fn all_ports(&self) -> impl Iterator<Item = PortId> + '_ {
        self.top_ports.iter().chain(self.bottom_ports.iter()).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Port {
    pub node: NodeId,
    pub side: PortSide,
    pub kind: PortKind,
    pub group: Option<GroupId>,
    pub edges: Vec<EdgeId>,
    /// Center x, set by coordinate assignment.
    pub x: f64,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: PortId,
    pub target: PortId,
    pub kind: EdgeKind,
    /// Identity of the original edge this segment belongs to.
    pub origin: Option<usize>,
    pub paths: Vec<Vec<Point>>,
}

impl Edge {
    pub fn new(source: PortId, target: PortId, kind: EdgeKind) -> Self {
        Self {
            source,
            target,
            kind,
            origin: None,
            paths: Vec::new(),
        }
    }

    pub fn other_end(&self, port: PortId) -> PortId {
        if self.source == port {
            self.target
        } else {
            self.source
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortGroup {
    pub node: NodeId,
    pub ports: Vec<PortId>,
    pub rect: Rect,
}

/// A fully relinked edge: one orthogonal polyline from a real source port to a real target
/// port, built from one or more per-gap segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub origin: usize,
    pub source: PortId,
    pub target: PortId,
    pub segments: Vec<EdgeId>,
    pub points: Vec<Point>,
}
