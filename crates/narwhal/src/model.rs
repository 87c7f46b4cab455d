//! Layout configuration.
//!
//! The configuration is an immutable value threaded through every stage; nothing reads it from
//! global state.

use serde::{Deserialize, Serialize};

/// Distance between the drawing's left/top border and the nearest port or node.
pub const MARGIN: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub vertex_height: f64,
    pub vertex_minimum_width: f64,
    pub port_width: f64,
    pub port_height: f64,
    pub port_spacing: f64,
    pub edge_distance_horizontal: f64,
    pub edge_distance_vertical: f64,
    pub distance_between_layers: f64,
    pub border_width: f64,
    pub rank_dir: RankDir,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            vertex_height: 40.0,
            vertex_minimum_width: 40.0,
            port_width: 6.0,
            port_height: 4.0,
            port_spacing: 4.0,
            edge_distance_horizontal: 10.0,
            edge_distance_vertical: 10.0,
            distance_between_layers: 30.0,
            border_width: 1.0,
            rank_dir: RankDir::TB,
        }
    }
}

impl LayoutConfig {
    /// Minimum distance between two consecutive ports of a row.
    pub fn delta(&self) -> f64 {
        self.edge_distance_horizontal
            .max(self.port_width + self.port_spacing)
    }

    /// Distance from a port center to the node border on its side.
    pub fn side_clearance(&self) -> f64 {
        self.port_width / 2.0 + self.port_spacing + self.border_width
    }

    /// Separation between a frame spacer and a port of the same node.
    pub fn frame_sep(&self) -> f64 {
        self.delta().max(self.side_clearance())
    }

    /// Vertical distance between a rank's top edge and the next rank's top edge before routing.
    pub fn rank_pitch(&self) -> f64 {
        self.vertex_height + 2.0 * self.port_height + self.distance_between_layers
    }

    /// Named numeric options, for validation and diagnostics.
    pub fn options(&self) -> [(&'static str, f64); 9] {
        [
            ("vertexHeight", self.vertex_height),
            ("vertexMinimumWidth", self.vertex_minimum_width),
            ("portWidth", self.port_width),
            ("portHeight", self.port_height),
            ("portSpacing", self.port_spacing),
            ("edgeDistanceHorizontal", self.edge_distance_horizontal),
            ("edgeDistanceVertical", self.edge_distance_vertical),
            ("distanceBetweenLayers", self.distance_between_layers),
            ("borderWidth", self.border_width),
        ]
    }
}
