//! Port-graph container used by `narwhal`.
//!
//! Nodes live in ordered ranks and own ordered top/bottom port lists. Edges connect ports. All
//! entities are addressed by arena indices so layout stages can keep per-entity scratch state in
//! plain vectors instead of reference graphs.

pub mod geometry;
pub mod graph;
pub mod ids;

pub use geometry::{Point, Rect};
pub use graph::{
    DetachedEdge, DetachedPort, Edge, EdgeKind, Node, NodeKind, Port, PortGraph, PortGroup,
    PortKind, PortSide, Route, SpacerRole,
};
pub use ids::{EdgeId, GroupId, NodeId, PortId};
