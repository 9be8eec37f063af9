use hedron::{primitive::attribute::AttributeUsage, Geometry};
use nalgebra::{Point3, Vector3};

use super::read_f32;
use crate::error::Error;

/// Edges shorter than this mark a triangle as degenerate.
pub const DEGENERATE_EDGE_LENGTH: f32 = 1e-5;

/// Outcome of [gen_vertex_normals].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalStats {
    /// Triangles which contributed a face normal
    pub triangles: usize,
    /// Triangles skipped because of a zero-length edge or collinear corners
    pub degenerate: usize,
}

/// Compute smooth per-vertex normals as the unweighted mean of adjacent face normals.
///
/// Vertices touched by no (non-degenerate) triangle receive `+Z`.
///
/// Requires `f32` [Position](AttributeUsage::Position) and [Normal](AttributeUsage::Normal)
/// attributes of width 3; returns `Ok(None)` without changes if either is absent.
#[tracing::instrument(skip_all, fields(vertices = geometry.vertex_count()))]
pub fn gen_vertex_normals(geometry: &mut Geometry) -> Result<Option<NormalStats>, Error> {
    if !geometry.has_attribute(AttributeUsage::Normal) {
        return Ok(None);
    }
    let Some(positions) = read_f32::<3>(geometry, AttributeUsage::Position)? else {
        return Ok(None);
    };
    let positions: Vec<Point3<f32>> = positions.into_iter().map(Point3::from).collect();

    let mut normals = vec![Vector3::z(); positions.len()];
    let mut usage = vec![0.0f32; positions.len()];
    let mut stats = NormalStats::default();

    for tri in geometry.triangles() {
        let [a, b, c] = tri.map(|i| i as usize);
        let e1 = positions[b] - positions[a];
        let e2 = positions[c] - positions[b];
        if e1.norm() < DEGENERATE_EDGE_LENGTH || e2.norm() < DEGENERATE_EDGE_LENGTH {
            stats.degenerate += 1;
            continue;
        }
        let Some(face) = e1.cross(&e2).try_normalize(0.0) else {
            stats.degenerate += 1;
            continue;
        };
        for v in [a, b, c] {
            // running mean; equal to the arithmetic mean of contributing faces in any order
            normals[v] = (normals[v] * usage[v] + face) / (usage[v] + 1.0);
            usage[v] += 1.0;
        }
        stats.triangles += 1;
    }

    if stats.degenerate > 0 {
        tracing::warn!(
            skipped = stats.degenerate,
            "skipped degenerate triangles while generating normals"
        );
    }

    let Some(mut out) = geometry.attribute_mut(AttributeUsage::Normal) else {
        return Ok(None);
    };
    for (i, n) in normals.into_iter().enumerate() {
        let n = n.try_normalize(0.0).unwrap_or_else(Vector3::z);
        out.set(i, [n.x, n.y, n.z])?;
    }

    tracing::debug!(
        triangles = stats.triangles,
        degenerate = stats.degenerate,
        "generated vertex normals"
    );
    Ok(Some(stats))
}
