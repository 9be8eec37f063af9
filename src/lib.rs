//! Consolidation of importer vertex streams into welded, indexed, material-partitioned meshes,
//! plus generation of smooth normals and tangent-space bases.
//!
//! Asset importers usually emit each vertex attribute with its own index space. A [MeshBuilder]
//! merges those into a single vertex identity per distinct combination of attribute indices,
//! fan-triangulates source polygons, and groups triangles by material. The resulting
//! [Geometry](hedron::Geometry) can then have its normals and tangents filled in by the passes in
//! [derive].
//!
//! ```
//! use meshweld::{derive, hedron::primitive::attribute::AttributeUsage, AttributeStream, MeshBuilder};
//!
//! let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
//! let normals = AttributeStream::placeholder(AttributeUsage::Normal, 3);
//! let mut builder = MeshBuilder::new(positions, None, vec![normals])?;
//! builder.add_polygon(&[0, 1, 2, 3], &[0, 1, 2, 3])?;
//! let mut mesh = builder.complete()?;
//! assert_eq!(mesh.geometry.vertex_count(), 4);
//! assert_eq!(mesh.geometry.triangle_count(), 2);
//! derive::gen_vertex_normals(&mut mesh.geometry)?;
//! # Ok::<(), meshweld::Error>(())
//! ```
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod builder;
pub mod derive;
pub mod error;
pub mod stream;

pub use builder::{CompletedMesh, IndexMapping, MeshBuilder};
pub use error::{ConfigurationError, DataIntegrityError, Error};
pub use stream::{AttributeStream, Mapping, StreamValues};

pub use hedron;
