//! Geometry data: vertex attributes, buffers, and finalized triangle meshes.

mod buffer;
mod mesh;

pub use buffer::*;
pub use mesh::*;
