use hedron::{
    primitive::{
        attribute::{
            layout::VertexLayout, AttributeComponent, AttributeFormat, AttributeType,
            AttributeUsage,
        },
        PrimitiveGroup,
    },
    Geometry, GeometryStorage, HeapStorage,
};

fn layout() -> VertexLayout {
    VertexLayout::new([
        (
            AttributeUsage::Position,
            AttributeFormat::new(AttributeType::Vec3, AttributeComponent::F32),
        ),
        (
            AttributeUsage::Texcoord(0),
            AttributeFormat::new(AttributeType::Vec2, AttributeComponent::F32),
        ),
    ])
    .unwrap()
}

/// Attribute views over a finalized geometry only touch their own slot within each vertex.
#[test]
fn views_are_independent() {
    let layout = layout();
    let buffers = HeapStorage.allocate(&layout, 3, 3).unwrap();
    let mut geom =
        Geometry::new(layout, 3, buffers, vec![PrimitiveGroup::triangles(0, 3, 0)]).unwrap();

    geom.attribute_mut(AttributeUsage::Position)
        .unwrap()
        .copy_from(&[0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], 3)
        .unwrap();
    geom.attribute_mut(AttributeUsage::Texcoord(0))
        .unwrap()
        .set(2, [0.25f32, 0.75])
        .unwrap();

    let pos = geom.attribute(AttributeUsage::Position).unwrap();
    assert_eq!(pos.get::<f32, 3>(2).unwrap(), [0.0, 1.0, 0.0]);
    let uv = geom.attribute(AttributeUsage::Texcoord(0)).unwrap();
    assert_eq!(uv.get::<f32, 2>(0).unwrap(), [0.0, 0.0]);
    assert_eq!(uv.get::<f32, 2>(2).unwrap(), [0.25, 0.75]);
}

/// Geometries can be stored with any narrow index width.
#[test]
fn index_widths() {
    for (vertex_count, comp) in [
        (3, AttributeComponent::U8),
        (1_000, AttributeComponent::U16),
        (100_000, AttributeComponent::U32),
    ] {
        let layout = layout();
        let buffers = HeapStorage.allocate(&layout, vertex_count, 3).unwrap();
        let geom = Geometry::new(
            layout,
            vertex_count,
            buffers,
            vec![PrimitiveGroup::triangles(0, 3, 0)],
        )
        .unwrap();
        assert_eq!(geom.indices().component(), comp);
        assert_eq!(geom.triangle_count(), 1);
    }
}
