//! Conversion of Wavefront OBJ models into attribute streams.

use std::path::Path;

use meshweld::{
    derive::{self, NanPolicy, TangentOptions},
    hedron::primitive::attribute::AttributeUsage,
    AttributeStream, CompletedMesh, Mapping, MeshBuilder, StreamValues,
};

#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error(transparent)]
    Load(#[from] tobj::LoadError),
    #[error("index {0} exceeds the range of stream indices")]
    IndexRange(u32),
    #[error("face arities cover {covered} indices; model has {len}")]
    Arity { covered: usize, len: usize },
    #[error(transparent)]
    Mesh(#[from] meshweld::Error),
}

/// Which derived attributes to fill in.
#[derive(Debug, Clone, Copy)]
pub struct DeriveOptions {
    pub normals: bool,
    pub tangents: bool,
    pub nan_policy: NanPolicy,
}

/// Summary of one welded model.
#[derive(Debug, Clone)]
pub struct ModelReport {
    pub name: String,
    pub source_vertices: usize,
    pub polygons: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub groups: usize,
    pub generated_normals: bool,
    pub generated_tangents: bool,
}

/// Load every model of the OBJ file at `path`, keeping position, texcoord and normal indices
/// separate.
pub fn load(path: &Path) -> Result<Vec<tobj::Model>, ObjError> {
    let options = tobj::LoadOptions {
        single_index: false,
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, materials) = tobj::load_obj(path, &options)?;
    if let Err(e) = materials {
        tracing::debug!(path = ?path, error = %e, "couldn't load materials");
    }
    Ok(models)
}

fn to_indexes(indices: &[u32]) -> Result<Vec<i32>, ObjError> {
    indices
        .iter()
        .map(|&i| i32::try_from(i).map_err(|_| ObjError::IndexRange(i)))
        .collect()
}

/// Per-corner stream over a pool with its own index array; `None` if the model has no such data.
fn corner_stream(
    name: &str,
    usage: AttributeUsage,
    element_count: usize,
    values: &[f32],
    indices: &[u32],
) -> Result<Option<AttributeStream>, ObjError> {
    if values.is_empty() || indices.is_empty() {
        return Ok(None);
    }
    Ok(Some(
        AttributeStream::new(
            name,
            usage,
            element_count,
            Mapping::PolygonVertex,
            StreamValues::F32(values.to_vec()),
        )
        .with_indexes(to_indexes(indices)?),
    ))
}

/// Weld a single model and fill in any requested derived attributes.
#[tracing::instrument(skip_all, fields(model = %model.name))]
pub fn weld(
    model: &tobj::Model,
    options: &DeriveOptions,
) -> Result<(CompletedMesh, ModelReport), ObjError> {
    let mesh = &model.mesh;
    let mut streams = Vec::new();

    let has_uvs = match corner_stream(
        "texcoord",
        AttributeUsage::Texcoord(0),
        2,
        &mesh.texcoords,
        &mesh.texcoord_indices,
    )? {
        Some(s) => {
            streams.push(s);
            true
        }
        None => false,
    };
    let has_normals = match corner_stream(
        "normal",
        AttributeUsage::Normal,
        3,
        &mesh.normals,
        &mesh.normal_indices,
    )? {
        Some(s) => {
            streams.push(s);
            true
        }
        None => false,
    };
    if !mesh.vertex_color.is_empty() {
        streams.push(AttributeStream::new(
            "color",
            AttributeUsage::Color(0),
            3,
            Mapping::Vertex,
            StreamValues::F32(mesh.vertex_color.clone()),
        ));
    }

    let generate_normals = options.normals && !has_normals;
    if generate_normals {
        streams.push(AttributeStream::placeholder(AttributeUsage::Normal, 3));
    }
    let generate_tangents = options.tangents && has_uvs && (has_normals || generate_normals);
    if generate_tangents {
        streams.push(AttributeStream::placeholder(AttributeUsage::Tangent, 4));
    }

    let vertex_ids = to_indexes(&mesh.indices)?;
    let mut builder = MeshBuilder::new(mesh.positions.clone(), Some(vertex_ids.clone()), streams)?;
    builder.set_group(mesh.material_id.map_or(0, |m| m as u32));

    // no arities means every face is a triangle
    let arities: Vec<usize> = if mesh.face_arities.is_empty() {
        vec![3; mesh.indices.len() / 3]
    } else {
        mesh.face_arities.iter().map(|&a| a as usize).collect()
    };
    let covered: usize = arities.iter().sum();
    if covered != mesh.indices.len() {
        return Err(ObjError::Arity {
            covered,
            len: mesh.indices.len(),
        });
    }

    let mut start = 0;
    for arity in arities {
        let corners: Vec<usize> = (start..start + arity).collect();
        builder.add_polygon(&corners, &vertex_ids[start..start + arity])?;
        start += arity;
    }
    let polygons = builder.polygon_count();

    let mut completed = builder.complete()?;
    if generate_normals {
        derive::gen_vertex_normals(&mut completed.geometry)?;
    }
    if generate_tangents {
        let tangent_options = TangentOptions {
            nan_policy: options.nan_policy,
        };
        derive::gen_vertex_tangents(&mut completed.geometry, &tangent_options)?;
    }

    let report = ModelReport {
        name: model.name.clone(),
        source_vertices: mesh.positions.len() / 3,
        polygons,
        vertices: completed.geometry.vertex_count(),
        triangles: completed.geometry.triangle_count(),
        groups: completed.geometry.primitives().len(),
        generated_normals: generate_normals,
        generated_tangents: generate_tangents,
    };
    tracing::info!(
        vertices = report.vertices,
        triangles = report.triangles,
        groups = report.groups,
        "welded model"
    );
    Ok((completed, report))
}
