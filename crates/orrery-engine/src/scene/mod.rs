//! Scene graph.
//!
//! Responsibilities:
//! - hold renderer-agnostic nodes (transform + optional geometry)
//! - compose world matrices through the parent chain
//! - generate CPU geometry that renderers upload as they see fit
//!
//! The graph is mutated by the scene cycle and by timeline value callbacks,
//! both on the render thread; renderers only read it.

mod color;
mod geometry;
mod graph;
mod transform;
mod values;

pub use color::Color;
pub use geometry::{Geometry, Grid, LineData, MeshData, TorusKnot};
pub use graph::{Node, NodeId, Scene};
pub use transform::Transform;
pub use values::ContainerValues;
