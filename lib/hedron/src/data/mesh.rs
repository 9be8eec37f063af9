pub mod primitive;

use crate::{
    primitive::{
        attribute::{
            layout::VertexLayout,
            view::{AttributeView, AttributeViewMut},
            AttributeComponent, AttributeUsage,
        },
        PrimitiveGroup,
    },
    Buffer, IndexBuffer,
};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("vertex buffer of {vertex_count} vertices with stride {stride} exceeds addressable memory")]
    VertexOverflow { vertex_count: usize, stride: usize },
    #[error("storage returned {actual} bytes of vertex data; {expected} expected")]
    VertexSize { expected: usize, actual: usize },
    #[error("storage returned {actual} indices; {expected} expected")]
    IndexSize { expected: usize, actual: usize },
    #[error("index buffer of {component:?} cannot address {vertex_count} vertices")]
    IndexWidth {
        vertex_count: usize,
        component: AttributeComponent,
    },
    #[error("index {index} at position {at} is out of range of {vertex_count} vertices")]
    IndexOutOfRange {
        at: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("primitive groups cover {covered} indices; index buffer holds {len}")]
    GroupCoverage { covered: usize, len: usize },
}

/// Freshly-allocated storage for a [Geometry].
#[derive(Debug, Default)]
pub struct GeometryBuffers {
    pub vertices: Buffer,
    pub indices: IndexBuffer,
}

/// Something which can provide backing memory for [Geometries](Geometry).
pub trait GeometryStorage {
    /// Allocate zero-filled buffers for `vertex_count` vertices laid out per `layout`, and an index
    /// buffer of `index_count` indices wide enough to address every vertex.
    fn allocate(
        &mut self,
        layout: &VertexLayout,
        vertex_count: usize,
        index_count: usize,
    ) -> Result<GeometryBuffers, StorageError>;
}

/// [GeometryStorage] backed by the global allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapStorage;

impl GeometryStorage for HeapStorage {
    fn allocate(
        &mut self,
        layout: &VertexLayout,
        vertex_count: usize,
        index_count: usize,
    ) -> Result<GeometryBuffers, StorageError> {
        let len = layout
            .stride()
            .checked_mul(vertex_count)
            .filter(|&len| len <= isize::MAX as usize)
            .ok_or(StorageError::VertexOverflow {
                vertex_count,
                stride: layout.stride(),
            })?;
        Ok(GeometryBuffers {
            vertices: Buffer::zeroed(len),
            indices: IndexBuffer::for_vertex_count(vertex_count, index_count),
        })
    }
}

/// Finalized triangle geometry: interleaved vertex data, an index buffer, and the material groups
/// partitioning that index buffer.
///
/// Buffer sizes are fixed once constructed; attribute values may be rewritten in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    layout: VertexLayout,
    vertex_count: usize,
    vertices: Buffer,
    indices: IndexBuffer,
    primitives: Vec<PrimitiveGroup>,
}

impl Geometry {
    /// Assemble a geometry from buffers produced by a [GeometryStorage].
    pub fn new(
        layout: VertexLayout,
        vertex_count: usize,
        buffers: GeometryBuffers,
        primitives: Vec<PrimitiveGroup>,
    ) -> Result<Self, StorageError> {
        let expected = layout.stride() * vertex_count;
        if buffers.vertices.len() < expected {
            return Err(StorageError::VertexSize {
                expected,
                actual: buffers.vertices.len(),
            });
        }
        let covered = primitives.iter().map(|p| p.element_count).sum::<usize>();
        if covered != buffers.indices.len() {
            return Err(StorageError::GroupCoverage {
                covered,
                len: buffers.indices.len(),
            });
        }
        if let Some((at, index)) = buffers
            .indices
            .iter()
            .enumerate()
            .find(|&(_, i)| i as usize >= vertex_count)
        {
            return Err(StorageError::IndexOutOfRange {
                at,
                index,
                vertex_count,
            });
        }
        Ok(Self {
            layout,
            vertex_count,
            vertices: buffers.vertices,
            indices: buffers.indices,
            primitives,
        })
    }

    #[inline]
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn vertices(&self) -> &Buffer {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &IndexBuffer {
        &self.indices
    }

    #[inline]
    pub fn primitives(&self) -> &[PrimitiveGroup] {
        &self.primitives
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over every triangle of the index buffer, across all primitive groups.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        (0..self.triangle_count()).map(|t| {
            let i = t * 3;
            // in range by construction of `triangle_count`
            [
                self.indices.get(i).unwrap_or_default(),
                self.indices.get(i + 1).unwrap_or_default(),
                self.indices.get(i + 2).unwrap_or_default(),
            ]
        })
    }

    #[inline]
    pub fn has_attribute(&self, usage: AttributeUsage) -> bool {
        self.layout.contains(usage)
    }

    pub fn attribute(&self, usage: AttributeUsage) -> Option<AttributeView<'_>> {
        let attr = *self.layout.get(usage)?;
        Some(AttributeView::new(
            self.vertices.as_slice(),
            attr,
            self.layout.stride(),
            self.vertex_count,
        ))
    }

    pub fn attribute_mut(&mut self, usage: AttributeUsage) -> Option<AttributeViewMut<'_>> {
        let attr = *self.layout.get(usage)?;
        Some(AttributeViewMut::new(
            self.vertices.as_slice_mut(),
            attr,
            self.layout.stride(),
            self.vertex_count,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::primitive::attribute::{AttributeFormat, AttributeType};

    fn layout() -> VertexLayout {
        VertexLayout::new([(
            AttributeUsage::Position,
            AttributeFormat::new(AttributeType::Vec3, AttributeComponent::F32),
        )])
        .unwrap()
    }

    #[test]
    fn heap_allocation() {
        let layout = layout();
        let buffers = HeapStorage.allocate(&layout, 4, 6).unwrap();
        assert_eq!(buffers.vertices.len(), 48);
        assert_eq!(buffers.indices.len(), 6);
        assert_eq!(buffers.indices.component(), AttributeComponent::U8);
    }

    #[test]
    fn group_coverage_checked() {
        let layout = layout();
        let buffers = HeapStorage.allocate(&layout, 3, 3).unwrap();
        assert!(matches!(
            Geometry::new(layout, 3, buffers, Vec::new()),
            Err(StorageError::GroupCoverage { covered: 0, len: 3 })
        ));
    }

    #[test]
    fn indices_checked() {
        let layout = layout();
        let mut buffers = HeapStorage.allocate(&layout, 3, 3).unwrap();
        buffers.indices.write_all(&[0, 1, 3]);
        assert!(matches!(
            Geometry::new(layout, 3, buffers, vec![PrimitiveGroup::triangles(0, 3, 0)]),
            Err(StorageError::IndexOutOfRange { at: 2, index: 3, .. })
        ));
    }

    #[test]
    fn triangles_span_groups() {
        let layout = layout();
        let mut buffers = HeapStorage.allocate(&layout, 4, 6).unwrap();
        buffers.indices.write_all(&[0, 1, 2, 2, 3, 0]);
        let geom = Geometry::new(
            layout,
            4,
            buffers,
            vec![
                PrimitiveGroup::triangles(0, 3, 0),
                PrimitiveGroup::triangles(3, 3, 1),
            ],
        )
        .unwrap();
        assert_eq!(
            geom.triangles().collect::<Vec<_>>(),
            vec![[0, 1, 2], [2, 3, 0]]
        );
        assert!(geom.attribute(AttributeUsage::Normal).is_none());
    }
}
