//! Attributes computed from a finished mesh's topology.
//!
//! Both passes rewrite an existing attribute of a [Geometry](hedron::Geometry) in place, so the
//! mesh must have been built with a slot for it; see
//! [AttributeStream::placeholder](crate::stream::AttributeStream::placeholder). A geometry lacking
//! any attribute a pass needs is left untouched and the pass returns `Ok(None)`.
//!
//! Passes over *different* geometries may run concurrently; passes over the same geometry require
//! `&mut` access and so are serialized by the borrow checker.

use hedron::{primitive::attribute::AttributeUsage, Geometry};

use crate::error::Error;

mod normals;
mod tangents;

pub use normals::*;
pub use tangents::*;

/// Read every value of an `f32` attribute, if the geometry has it.
fn read_f32<const N: usize>(
    geometry: &Geometry,
    usage: AttributeUsage,
) -> Result<Option<Vec<[f32; N]>>, Error> {
    Ok(geometry
        .attribute(usage)
        .map(|view| view.to_vec::<f32, N>())
        .transpose()?)
}
