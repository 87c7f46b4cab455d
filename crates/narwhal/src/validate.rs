//! Input validation.
//!
//! The layout stages assume a consistent ordering. This is the only place that checks it; past
//! this point an inconsistency is an internal bug and panics.

use crate::error::{Error, Result};
use crate::model::LayoutConfig;
use narwhal_graph::{EdgeKind, NodeKind, PortGraph, PortSide};

pub fn validate(g: &PortGraph, config: &LayoutConfig) -> Result<()> {
    validate_config(config)?;

    for (listed, nodes) in g.ranks().iter().enumerate() {
        for &id in nodes {
            let Some(node) = g.node(id) else {
                continue;
            };
            if node.rank != listed {
                return Err(Error::InvalidOrdering {
                    node: id,
                    listed,
                    recorded: node.rank,
                });
            }
            let widths = std::iter::once(node.label_width).chain(node.requested_width);
            for value in widths {
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::InvalidNodeWidth { node: id, value });
                }
            }
            match node.kind {
                NodeKind::Normal => {}
                NodeKind::Dummy => {
                    if node.top_ports.len() != 1 || node.bottom_ports.len() != 1 {
                        return Err(Error::MalformedDummy { node: id });
                    }
                }
                NodeKind::TurningDummy => {
                    let (top, bottom) = (node.top_ports.len(), node.bottom_ports.len());
                    if !matches!((top, bottom), (2, 0) | (0, 2)) {
                        return Err(Error::MalformedTurningDummy { node: id });
                    }
                }
            }
        }
    }

    for (id, edge) in g.edges() {
        if edge.kind == EdgeKind::Structural {
            continue;
        }
        let (Some(source), Some(target)) = (g.port(edge.source), g.port(edge.target)) else {
            return Err(Error::MissingPort { edge: id });
        };
        if source.node == target.node {
            continue;
        }
        let from = g.node(source.node).map(|n| n.rank).unwrap_or(0);
        let to = g.node(target.node).map(|n| n.rank).unwrap_or(0);
        if from.abs_diff(to) != 1 {
            return Err(Error::EdgeSpansRanks { edge: id, from, to });
        }
        let (upper, lower) = if from < to {
            ((edge.source, source), (edge.target, target))
        } else {
            ((edge.target, target), (edge.source, source))
        };
        if upper.1.side != PortSide::Bottom {
            return Err(Error::PortSideMismatch {
                edge: id,
                port: upper.0,
            });
        }
        if lower.1.side != PortSide::Top {
            return Err(Error::PortSideMismatch {
                edge: id,
                port: lower.0,
            });
        }
    }

    Ok(())
}

fn validate_config(config: &LayoutConfig) -> Result<()> {
    for (option, value) in config.options() {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidConfig { option, value });
        }
    }
    if config.distance_between_layers <= 0.0 {
        return Err(Error::InvalidConfig {
            option: "distanceBetweenLayers",
            value: config.distance_between_layers,
        });
    }
    Ok(())
}
