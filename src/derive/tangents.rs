use hedron::{
    primitive::attribute::{AttributeUsage, Handedness, Tangent},
    Geometry,
};
use nalgebra::{Point2, Point3, Vector3};

use super::read_f32;
use crate::error::{DataIntegrityError, Error};

/// What to do when a computed tangent comes out as NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NanPolicy {
    /// Abort with [DataIntegrityError::NanTangent].
    #[default]
    Fail,
    /// Write the NaN through.
    Tolerate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TangentOptions {
    pub nan_policy: NanPolicy,
}

/// Outcome of [gen_vertex_tangents].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TangentStats {
    pub triangles: usize,
    /// Triangles with zero parametric (UV) area, which contributed nothing
    pub degenerate_uv: usize,
    /// Vertices whose tangent couldn't be orthogonalized against their normal, and received `+Z`
    pub fallback: usize,
}

/// Compute per-vertex tangents from the first texture coordinate set, per Lengyel.
///
/// Tangents are Gram-Schmidt orthogonalized against the geometry's existing normals, so normals
/// must already be present (ex. from [gen_vertex_normals](super::gen_vertex_normals)). The sign
/// records whether the UV mapping is mirrored: a 4-wide tangent attribute receives the handedness
/// as `w` (±1), while a 3-wide one receives the direction multiplied by it.
///
/// Requires `f32` [Position](AttributeUsage::Position), [Normal](AttributeUsage::Normal),
/// [Texcoord(0)](AttributeUsage::Texcoord) and [Tangent](AttributeUsage::Tangent) attributes;
/// returns `Ok(None)` without changes if any is absent.
///
/// # See Also
///
/// * Eric Lengyel, "Computing Tangent Space Basis Vectors for an Arbitrary Mesh"
#[tracing::instrument(skip_all, fields(vertices = geometry.vertex_count()))]
pub fn gen_vertex_tangents(
    geometry: &mut Geometry,
    options: &TangentOptions,
) -> Result<Option<TangentStats>, Error> {
    if !geometry.has_attribute(AttributeUsage::Tangent) {
        return Ok(None);
    }
    let (Some(positions), Some(normals), Some(uvs)) = (
        read_f32::<3>(geometry, AttributeUsage::Position)?,
        read_f32::<3>(geometry, AttributeUsage::Normal)?,
        read_f32::<2>(geometry, AttributeUsage::Texcoord(0))?,
    ) else {
        return Ok(None);
    };
    let positions: Vec<Point3<f32>> = positions.into_iter().map(Point3::from).collect();
    let normals: Vec<Vector3<f32>> = normals.into_iter().map(Vector3::from).collect();
    let uvs: Vec<Point2<f32>> = uvs.into_iter().map(Point2::from).collect();

    let mut tan1 = vec![Vector3::<f32>::zeros(); positions.len()];
    let mut tan2 = vec![Vector3::<f32>::zeros(); positions.len()];
    let mut stats = TangentStats::default();

    for tri in geometry.triangles() {
        let [a, b, c] = tri.map(|i| i as usize);
        let (d1, d2) = (positions[b] - positions[a], positions[c] - positions[a]);
        let (w1, w2) = (uvs[b] - uvs[a], uvs[c] - uvs[a]);
        let (s1, t1, s2, t2) = (w1.x, w1.y, w2.x, w2.y);

        let area = s1 * t2 - s2 * t1;
        let r = if area == 0.0 {
            stats.degenerate_uv += 1;
            0.0
        } else {
            let r = 1.0 / area;
            if r.is_finite() {
                r
            } else {
                stats.degenerate_uv += 1;
                0.0
            }
        };

        let sdir = (d1 * t2 - d2 * t1) * r;
        let tdir = (d2 * s1 - d1 * s2) * r;
        for v in [a, b, c] {
            tan1[v] += sdir;
            tan2[v] += tdir;
        }
        stats.triangles += 1;
    }

    let mut tangents = Vec::with_capacity(normals.len());
    for (i, ((n, t), t2)) in normals.iter().zip(&tan1).zip(&tan2).enumerate() {
        let dir = match (t - n * n.dot(t)).try_normalize(0.0) {
            Some(dir) => dir,
            None => {
                stats.fallback += 1;
                Vector3::z()
            }
        };
        let handedness = if n.cross(t).dot(t2) < 0.0 {
            Handedness::Negative
        } else {
            Handedness::Positive
        };
        if options.nan_policy == NanPolicy::Fail && dir.iter().any(|x| x.is_nan()) {
            return Err(DataIntegrityError::NanTangent { vertex: i }.into());
        }
        tangents.push(Tangent::new(dir, handedness));
    }

    let Some(mut out) = geometry.attribute_mut(AttributeUsage::Tangent) else {
        return Ok(None);
    };
    let wide = out.element_count() == 4;
    for (i, tangent) in tangents.into_iter().enumerate() {
        if wide {
            let g = tangent.to_gltf();
            out.set(i, [g.x, g.y, g.z, g.w])?;
        } else {
            let s = tangent.signed();
            out.set(i, [s.x, s.y, s.z])?;
        }
    }

    if stats.degenerate_uv > 0 {
        tracing::warn!(
            skipped = stats.degenerate_uv,
            "triangles with degenerate texture coordinates contributed no tangent basis"
        );
    }
    tracing::debug!(
        triangles = stats.triangles,
        fallback = stats.fallback,
        "generated vertex tangents"
    );
    Ok(Some(stats))
}
