use approx::assert_relative_eq;
use meshweld::{
    derive::{gen_vertex_normals, gen_vertex_tangents, NanPolicy, TangentOptions},
    hedron::{primitive::attribute::AttributeUsage, Geometry},
    AttributeStream, DataIntegrityError, Error, Mapping, MeshBuilder, StreamValues,
};

/// Build a mesh from unindexed positions and per-vertex texcoords, with slots for derived
/// attributes.
fn build(positions: Vec<f32>, uvs: Vec<f32>, polygons: &[&[i32]], tangent_width: usize) -> Geometry {
    let uv = AttributeStream::new(
        "uv",
        AttributeUsage::Texcoord(0),
        2,
        Mapping::Vertex,
        StreamValues::F32(uvs),
    );
    let streams = vec![
        AttributeStream::placeholder(AttributeUsage::Normal, 3),
        uv,
        AttributeStream::placeholder(AttributeUsage::Tangent, tangent_width),
    ];
    let mut builder = MeshBuilder::new(positions, None, streams).unwrap();
    let mut pvi = 0;
    for poly in polygons {
        let corners: Vec<usize> = (pvi..pvi + poly.len()).collect();
        pvi += poly.len();
        builder.add_polygon(&corners, poly).unwrap();
    }
    builder.complete().unwrap().geometry
}

fn normal(geometry: &Geometry, i: usize) -> [f32; 3] {
    geometry
        .attribute(AttributeUsage::Normal)
        .unwrap()
        .get::<f32, 3>(i)
        .unwrap()
}

fn tangent(geometry: &Geometry, i: usize) -> [f32; 4] {
    geometry
        .attribute(AttributeUsage::Tangent)
        .unwrap()
        .get::<f32, 4>(i)
        .unwrap()
}

const TRIANGLE: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

#[test]
fn single_triangle_normal() {
    let mut geometry = build(TRIANGLE.to_vec(), vec![0.0; 6], &[&[0, 1, 2]], 4);
    let stats = gen_vertex_normals(&mut geometry).unwrap().unwrap();
    assert_eq!(stats.triangles, 1);
    assert_eq!(stats.degenerate, 0);
    for i in 0..3 {
        assert_relative_eq!(normal(&geometry, i)[..], [0.0, 0.0, 1.0][..], epsilon = 1e-6);
    }
}

/// A vertex shared by two perpendicular faces receives the normalized mean of both.
#[test]
fn shared_vertex_averages() {
    let positions = vec![
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0, //
    ];
    // one face in the XY plane (+Z), one in the XZ plane (+Y)
    let mut geometry = build(positions, vec![0.0; 8], &[&[0, 1, 2], &[0, 3, 1]], 4);
    gen_vertex_normals(&mut geometry).unwrap();
    let h = std::f32::consts::FRAC_1_SQRT_2;
    assert_relative_eq!(normal(&geometry, 0)[..], [0.0, h, h][..], epsilon = 1e-6);
    assert_relative_eq!(normal(&geometry, 1)[..], [0.0, h, h][..], epsilon = 1e-6);
    assert_relative_eq!(normal(&geometry, 2)[..], [0.0, 0.0, 1.0][..], epsilon = 1e-6);
    assert_relative_eq!(normal(&geometry, 3)[..], [0.0, 1.0, 0.0][..], epsilon = 1e-6);
}

/// A unit quad of four distinct corners, built as two triangles, faces uniformly.
#[test]
fn quad_normals_are_uniform() {
    let positions = vec![
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        1.0, 1.0, 0.0, //
        0.0, 1.0, 0.0, //
    ];
    let mut geometry = build(positions, vec![0.0; 8], &[&[0, 1, 2, 3]], 4);
    assert_eq!(geometry.vertex_count(), 4);
    assert_eq!(geometry.triangle_count(), 2);
    let stats = gen_vertex_normals(&mut geometry).unwrap().unwrap();
    assert_eq!(stats.triangles, 2);
    for i in 0..4 {
        // coplanar faces share a normal, so the mean is exact
        assert_eq!(normal(&geometry, i), [0.0, 0.0, 1.0]);
    }
}

#[test]
fn degenerate_triangles_are_skipped() {
    let positions = vec![
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        2.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, //
    ];
    // collinear, then zero-length edge
    let mut geometry = build(
        positions,
        vec![0.0; 10],
        &[&[0, 1, 2], &[0, 1, 3], &[0, 4, 2]],
        4,
    );
    let stats = gen_vertex_normals(&mut geometry).unwrap().unwrap();
    assert_eq!(stats.triangles, 1);
    assert_eq!(stats.degenerate, 2);
    assert_relative_eq!(normal(&geometry, 1)[..], [0.0, 0.0, 1.0][..], epsilon = 1e-6);
    // touched only by degenerate triangles
    assert_relative_eq!(normal(&geometry, 3)[..], [0.0, 0.0, 1.0][..], epsilon = 1e-6);
}

#[test]
fn missing_slot_is_a_no_op() {
    let mut builder = MeshBuilder::new(TRIANGLE.to_vec(), None, Vec::new()).unwrap();
    builder.add_polygon(&[0, 1, 2], &[0, 1, 2]).unwrap();
    let mut geometry = builder.complete().unwrap().geometry;
    let before = geometry.vertices().clone();
    assert!(gen_vertex_normals(&mut geometry).unwrap().is_none());
    assert!(gen_vertex_tangents(&mut geometry, &TangentOptions::default())
        .unwrap()
        .is_none());
    assert_eq!(geometry.vertices(), &before);
}

#[test]
fn tangent_follows_u() {
    let mut geometry = build(
        TRIANGLE.to_vec(),
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        &[&[0, 1, 2]],
        4,
    );
    gen_vertex_normals(&mut geometry).unwrap();
    let stats = gen_vertex_tangents(&mut geometry, &TangentOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(stats.triangles, 1);
    assert_eq!(stats.degenerate_uv, 0);
    for i in 0..3 {
        assert_relative_eq!(tangent(&geometry, i)[..], [1.0, 0.0, 0.0, 1.0][..], epsilon = 1e-6);
    }
}

/// Mirroring the U axis flips both the tangent and its handedness.
#[test]
fn mirrored_uvs_flip_handedness() {
    let mut geometry = build(
        TRIANGLE.to_vec(),
        vec![0.0, 0.0, -1.0, 0.0, 0.0, 1.0],
        &[&[0, 1, 2]],
        4,
    );
    gen_vertex_normals(&mut geometry).unwrap();
    gen_vertex_tangents(&mut geometry, &TangentOptions::default()).unwrap();
    for i in 0..3 {
        assert_relative_eq!(tangent(&geometry, i)[..], [-1.0, 0.0, 0.0, -1.0][..], epsilon = 1e-6);
    }
}

/// A 3-wide tangent attribute stores the direction with the handedness folded into its sign.
#[test]
fn narrow_tangents_are_signed() {
    let mut geometry = build(
        TRIANGLE.to_vec(),
        vec![0.0, 0.0, -1.0, 0.0, 0.0, 1.0],
        &[&[0, 1, 2]],
        3,
    );
    gen_vertex_normals(&mut geometry).unwrap();
    gen_vertex_tangents(&mut geometry, &TangentOptions::default()).unwrap();
    let t = geometry
        .attribute(AttributeUsage::Tangent)
        .unwrap()
        .get::<f32, 3>(0)
        .unwrap();
    assert_relative_eq!(t[..], [1.0, 0.0, 0.0][..], epsilon = 1e-6);
}

#[test]
fn zero_uv_area_falls_back() {
    let mut geometry = build(TRIANGLE.to_vec(), vec![0.5; 6], &[&[0, 1, 2]], 4);
    gen_vertex_normals(&mut geometry).unwrap();
    let stats = gen_vertex_tangents(&mut geometry, &TangentOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(stats.degenerate_uv, 1);
    assert_eq!(stats.fallback, 3);
    assert_relative_eq!(tangent(&geometry, 0)[..], [0.0, 0.0, 1.0, 1.0][..], epsilon = 1e-6);
}

#[test]
fn nan_policy() {
    let mut positions = TRIANGLE.to_vec();
    positions[3] = f32::NAN;
    let uvs = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0];

    let mut geometry = build(positions.clone(), uvs.clone(), &[&[0, 1, 2]], 4);
    let before = geometry.vertices().clone();
    assert!(matches!(
        gen_vertex_tangents(&mut geometry, &TangentOptions::default()),
        Err(Error::DataIntegrity(DataIntegrityError::NanTangent { vertex: 0 }))
    ));
    assert_eq!(geometry.vertices(), &before);

    let mut geometry = build(positions, uvs, &[&[0, 1, 2]], 4);
    let options = TangentOptions {
        nan_policy: NanPolicy::Tolerate,
    };
    assert!(gen_vertex_tangents(&mut geometry, &options).unwrap().is_some());
    assert!(tangent(&geometry, 0)[..3].iter().any(|x| x.is_nan()));
}
