pub mod color;
pub mod document;
pub mod error;
pub mod geometry;
pub mod guides;
pub mod id;
pub mod json;
pub mod layout;
pub mod model;
pub mod scene;
pub mod spatial;
pub mod svg;
pub mod viewport;

pub use color::{Color, parse_color};
pub use document::{DUPLICATE_OFFSET, Document, Masters};
pub use error::{EditError, EditResult};
pub use geometry::{Bounds, rotated_aabb, unrotate_point};
pub use guides::{Alignment, EdgeMask, GuideConfig, GuideLine, Measurement, compute_alignment, measure_gaps};
pub use id::NodeId;
pub use layout::apply_constraints;
pub use model::*;
pub use scene::{ElementPatch, SceneGraph, ZDirection};
pub use spatial::{SpatialIndex, WorldBounds};
pub use svg::export_svg;
pub use viewport::{MAX_ZOOM, MIN_ZOOM, Viewport};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
