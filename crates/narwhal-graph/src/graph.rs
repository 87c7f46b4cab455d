//! The `PortGraph` container.
//!
//! Nodes are never removed. Port and edge slots can be detached and reattached: detaching
//! leaves an empty slot so every other id stays valid, and the returned `Detached*` value carries
//! the list positions needed to put the entity back exactly where it was.

mod entries;

pub use entries::{
    Edge, EdgeKind, Node, NodeKind, Port, PortGroup, PortKind, PortSide, Route, SpacerRole,
};

use crate::geometry::Rect;
use crate::ids::{EdgeId, GroupId, NodeId, PortId};

#[derive(Debug, Clone, Default)]
pub struct PortGraph {
    nodes: Vec<Node>,
    ports: Vec<Option<Port>>,
    edges: Vec<Option<Edge>>,
    groups: Vec<PortGroup>,
    ranks: Vec<Vec<NodeId>>,
    routes: Vec<Route>,
}

/// An edge taken out of the graph together with its positions in the endpoint edge lists.
#[derive(Debug, Clone, PartialEq)]
pub struct DetachedEdge {
    pub edge: Edge,
    pub source_slot: usize,
    pub target_slot: usize,
}

/// A port taken out of its node (and group) together with its list positions.
#[derive(Debug, Clone, PartialEq)]
pub struct DetachedPort {
    pub port: Port,
    pub index: usize,
    pub group_index: Option<usize>,
}

impl PortGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node to the end of `rank`, creating empty ranks as needed.
    pub fn add_node(&mut self, rank: usize, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            kind,
            rank,
            ..Default::default()
        });
        if self.ranks.len() <= rank {
            self.ranks.resize_with(rank + 1, Vec::new);
        }
        self.ranks[rank].push(id);
        id
    }

    /// Appends a regular port to the right end of `node`'s `side`.
    pub fn add_port(&mut self, node: NodeId, side: PortSide) -> PortId {
        let len = self.nodes[node.index()].ports(side).len();
        self.insert_port(node, side, len, PortKind::Regular)
    }

    pub fn insert_port(
        &mut self,
        node: NodeId,
        side: PortSide,
        index: usize,
        kind: PortKind,
    ) -> PortId {
        let id = PortId::new(self.ports.len());
        self.ports.push(Some(Port {
            node,
            side,
            kind,
            ..Default::default()
        }));
        self.nodes[node.index()].ports_mut(side).insert(index, id);
        id
    }

    pub fn add_edge(&mut self, source: PortId, target: PortId) -> EdgeId {
        self.add_edge_with(source, target, EdgeKind::Regular)
    }

    pub fn add_edge_with(&mut self, source: PortId, target: PortId, kind: EdgeKind) -> EdgeId {
        let id = EdgeId::new(self.edges.len());
        self.edges.push(Some(Edge::new(source, target, kind)));
        if let Some(p) = self.port_mut(source) {
            p.edges.push(id);
        }
        if source != target {
            if let Some(p) = self.port_mut(target) {
                p.edges.push(id);
            }
        }
        id
    }

    /// Groups ports of one node. Ports already in another group are moved.
    pub fn add_group(&mut self, node: NodeId, ports: &[PortId]) -> GroupId {
        let id = GroupId::new(self.groups.len());
        let mut members = Vec::with_capacity(ports.len());
        for &p in ports {
            let Some(prev) = self.port(p).map(|port| port.group) else {
                continue;
            };
            if let Some(prev) = prev {
                self.groups[prev.index()].ports.retain(|q| *q != p);
            }
            if let Some(port) = self.port_mut(p) {
                port.group = Some(id);
            }
            members.push(p);
        }
        self.groups.push(PortGroup {
            node,
            ports: members,
            rect: Rect::default(),
        });
        self.nodes[node.index()].groups.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id.index()).and_then(Option::as_ref)
    }

    pub fn port_mut(&mut self, id: PortId) -> Option<&mut Port> {
        self.ports.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(Option::as_ref)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn group(&self, id: GroupId) -> Option<&PortGroup> {
        self.groups.get(id.index())
    }

    pub fn ranks(&self) -> &[Vec<NodeId>] {
        &self.ranks
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of port slots (live or detached); sizes per-port scratch vectors.
    pub fn port_capacity(&self) -> usize {
        self.ports.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i), n))
    }

    pub fn ports(&self) -> impl Iterator<Item = (PortId, &Port)> {
        self.ports
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (PortId::new(i), p)))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (EdgeId::new(i), e)))
    }

    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &PortGroup)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, g)| (GroupId::new(i), g))
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges().map(|(id, _)| id).collect()
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(NodeId, &mut Node),
    {
        for (i, n) in self.nodes.iter_mut().enumerate() {
            f(NodeId::new(i), n);
        }
    }

    pub fn for_each_port_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(PortId, &mut Port),
    {
        for (i, p) in self.ports.iter_mut().enumerate() {
            if let Some(p) = p {
                f(PortId::new(i), p);
            }
        }
    }

    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(EdgeId, &mut Edge),
    {
        for (i, e) in self.edges.iter_mut().enumerate() {
            if let Some(e) = e {
                f(EdgeId::new(i), e);
            }
        }
    }

    pub fn for_each_group_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(GroupId, &mut PortGroup),
    {
        for (i, g) in self.groups.iter_mut().enumerate() {
            f(GroupId::new(i), g);
        }
    }

    /// Position of `port` within its node's side list.
    pub fn port_position(&self, port: PortId) -> Option<usize> {
        let p = self.port(port)?;
        self.nodes[p.node.index()]
            .ports(p.side)
            .iter()
            .position(|q| *q == port)
    }

    pub fn node_of(&self, port: PortId) -> Option<NodeId> {
        self.port(port).map(|p| p.node)
    }

    pub fn rank_of(&self, port: PortId) -> Option<usize> {
        self.node_of(port).map(|n| self.nodes[n.index()].rank)
    }

    /// Removes an edge from its endpoints and empties its slot.
    pub fn detach_edge(&mut self, id: EdgeId) -> Option<DetachedEdge> {
        let edge = self.edges.get_mut(id.index())?.take()?;
        let source_slot = self.unlink_edge(edge.source, id).unwrap_or(0);
        let target_slot = if edge.source == edge.target {
            source_slot
        } else {
            self.unlink_edge(edge.target, id).unwrap_or(0)
        };
        Some(DetachedEdge {
            edge,
            source_slot,
            target_slot,
        })
    }

    /// Puts a detached edge back into its slot. Returns `false` if the slot is occupied.
    pub fn reattach_edge(&mut self, id: EdgeId, detached: DetachedEdge) -> bool {
        let Some(slot) = self.edges.get_mut(id.index()) else {
            return false;
        };
        if slot.is_some() {
            return false;
        }
        let DetachedEdge {
            edge,
            source_slot,
            target_slot,
        } = detached;
        let (source, target) = (edge.source, edge.target);
        *slot = Some(edge);
        if let Some(p) = self.port_mut(source) {
            let at = source_slot.min(p.edges.len());
            p.edges.insert(at, id);
        }
        if source != target {
            if let Some(p) = self.port_mut(target) {
                let at = target_slot.min(p.edges.len());
                p.edges.insert(at, id);
            }
        }
        true
    }

    /// Removes a port from its node side list and group, and empties its slot.
    ///
    /// Incident edges are left untouched; callers detach them first.
    pub fn detach_port(&mut self, id: PortId) -> Option<DetachedPort> {
        let port = self.ports.get_mut(id.index())?.take()?;
        let list = self.nodes[port.node.index()].ports_mut(port.side);
        let index = list.iter().position(|q| *q == id).unwrap_or(list.len());
        if index < list.len() {
            list.remove(index);
        }
        let group_index = port.group.and_then(|g| {
            let members = &mut self.groups[g.index()].ports;
            let at = members.iter().position(|q| *q == id)?;
            members.remove(at);
            Some(at)
        });
        Some(DetachedPort {
            port,
            index,
            group_index,
        })
    }

    /// Puts a detached port back at its recorded positions. Returns `false` if the slot is
    /// occupied.
    pub fn reattach_port(&mut self, id: PortId, detached: DetachedPort) -> bool {
        let Some(slot) = self.ports.get_mut(id.index()) else {
            return false;
        };
        if slot.is_some() {
            return false;
        }
        let DetachedPort {
            port,
            index,
            group_index,
        } = detached;
        let (node, side, group) = (port.node, port.side, port.group);
        *slot = Some(port);
        let list = self.nodes[node.index()].ports_mut(side);
        let at = index.min(list.len());
        list.insert(at, id);
        if let (Some(g), Some(gi)) = (group, group_index) {
            let members = &mut self.groups[g.index()].ports;
            let at = gi.min(members.len());
            members.insert(at, id);
        }
        true
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut Vec<Route> {
        &mut self.routes
    }

    pub fn set_routes(&mut self, routes: Vec<Route>) {
        self.routes = routes;
    }

    fn unlink_edge(&mut self, port: PortId, edge: EdgeId) -> Option<usize> {
        let p = self.port_mut(port)?;
        let at = p.edges.iter().position(|e| *e == edge)?;
        p.edges.remove(at);
        Some(at)
    }
}
