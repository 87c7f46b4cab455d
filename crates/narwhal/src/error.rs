use narwhal_graph::{EdgeId, NodeId, PortId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("configuration option `{option}` has invalid value {value}")]
    InvalidConfig { option: &'static str, value: f64 },

    #[error("node {node} is listed in rank {listed} but records rank {recorded}")]
    InvalidOrdering {
        node: NodeId,
        listed: usize,
        recorded: usize,
    },

    #[error("edge {edge} connects rank {from} to rank {to}; only adjacent ranks can be joined")]
    EdgeSpansRanks { edge: EdgeId, from: usize, to: usize },

    #[error("edge {edge} attaches to port {port} on the side facing away from the other end")]
    PortSideMismatch { edge: EdgeId, port: PortId },

    #[error("edge {edge} references a missing port")]
    MissingPort { edge: EdgeId },

    #[error("node {node} has invalid width {value}")]
    InvalidNodeWidth { node: NodeId, value: f64 },

    #[error("dummy node {node} must have exactly one top and one bottom port")]
    MalformedDummy { node: NodeId },

    #[error("turning dummy {node} must have exactly two ports on one side")]
    MalformedTurningDummy { node: NodeId },
}

pub type Result<T> = std::result::Result<T, Error>;
