//! Port-aware layered layout.
//!
//! Takes a graph whose nodes are already ranked and ordered, with ports on the top and bottom
//! side of each node, and computes:
//!
//! - port x coordinates by four-pass block alignment and compaction, averaged so the drawing is
//!   mirror symmetric;
//! - node, port and group rectangles;
//! - orthogonal edge paths routed through horizontal tracks between ranks.
//!
//! Ranking, ordering and dummy insertion happen upstream.

pub use narwhal_graph as graph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod coordinate_system;
pub mod error;
pub mod finalize;
pub mod layering;
pub mod model;
pub mod pipeline;
pub mod position;
pub mod reserve;
pub mod restore;
pub mod route;
pub mod util;
pub mod validate;

pub use error::{Error, Result};
pub use model::{LayoutConfig, MARGIN, RankDir};
pub use pipeline::{LayoutSummary, layout};
pub use restore::{EditLog, EditRecord, EditTarget};
pub use route::GapSummary;
