//! Horizontal positioning of ports.

use crate::layering::PortLayering;
use crate::model::LayoutConfig;
use narwhal_graph::PortGraph;

pub mod bk;

/// Assigns `Port::x` for every port in `layering`.
pub fn assign_x(g: &mut PortGraph, layering: &PortLayering, config: &LayoutConfig) {
    let xs = bk::position_x(g, layering, config);
    for (port, x) in xs {
        if let Some(p) = g.port_mut(port) {
            p.x = x;
        }
    }
}
