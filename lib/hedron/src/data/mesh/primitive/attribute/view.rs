//! Typed access to a single attribute within an interleaved vertex buffer.

use crate::primitive::attribute::{layout::VertexAttribute, AttributeComponent, Component};

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("cannot access attribute as {requested:?} (attribute component is {actual:?})")]
    Component {
        requested: AttributeComponent,
        actual: AttributeComponent,
    },
    #[error("cannot access attribute as {requested} elements (attribute width is {actual})")]
    Width { requested: usize, actual: usize },
    #[error("vertex index out of range: 0..{len} ∌ {index}")]
    OutOfRange { index: usize, len: usize },
    #[error("source slice holds {len} components; {required} required")]
    SourceTooShort { len: usize, required: usize },
}

/// Shared bookkeeping between [AttributeView] and [AttributeViewMut].
#[derive(Debug, Clone, Copy)]
struct Accessor {
    attr: VertexAttribute,
    stride: usize,
    vertex_count: usize,
}

impl Accessor {
    #[inline]
    fn element_count(&self) -> usize {
        self.attr.format.ty.size_elements()
    }

    fn check<T: Component>(&self, width: usize) -> Result<(), ViewError> {
        if T::COMPONENT != self.attr.format.comp {
            return Err(ViewError::Component {
                requested: T::COMPONENT,
                actual: self.attr.format.comp,
            });
        }
        if width != self.element_count() {
            return Err(ViewError::Width {
                requested: width,
                actual: self.element_count(),
            });
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), ViewError> {
        if index >= self.vertex_count {
            Err(ViewError::OutOfRange {
                index,
                len: self.vertex_count,
            })
        } else {
            Ok(())
        }
    }

    /// Byte offset of component `c` of vertex `index`.
    #[inline]
    fn offset(&self, index: usize, c: usize) -> usize {
        index * self.stride + self.attr.offset + c * self.attr.format.comp.size()
    }

    fn read<T: Component, const N: usize>(&self, bytes: &[u8], index: usize) -> [T; N] {
        std::array::from_fn(|c| T::read_ne(&bytes[self.offset(index, c)..]))
    }
}

/// Read-only view of one attribute of a [Geometry](crate::Geometry).
#[derive(Debug, Clone, Copy)]
pub struct AttributeView<'buf> {
    bytes: &'buf [u8],
    acc: Accessor,
}

impl<'buf> AttributeView<'buf> {
    /// # Panics
    ///
    /// * if `bytes` is too short to hold `vertex_count` vertices of size `stride`
    pub fn new(bytes: &'buf [u8], attr: VertexAttribute, stride: usize, vertex_count: usize) -> Self {
        assert!(bytes.len() >= stride * vertex_count);
        Self {
            bytes,
            acc: Accessor {
                attr,
                stride,
                vertex_count,
            },
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.acc.vertex_count
    }

    /// Number of components per vertex.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.acc.element_count()
    }

    #[inline]
    pub fn component(&self) -> AttributeComponent {
        self.acc.attr.format.comp
    }

    /// Read the value of vertex `index`.
    pub fn get<T: Component, const N: usize>(&self, index: usize) -> Result<[T; N], ViewError> {
        self.acc.check::<T>(N)?;
        self.acc.check_index(index)?;
        Ok(self.acc.read(self.bytes, index))
    }

    /// Read every vertex's value, in order.
    pub fn to_vec<T: Component, const N: usize>(&self) -> Result<Vec<[T; N]>, ViewError> {
        self.acc.check::<T>(N)?;
        Ok((0..self.acc.vertex_count)
            .map(|i| self.acc.read(self.bytes, i))
            .collect())
    }
}

/// Mutable view of one attribute of a [Geometry](crate::Geometry).
#[derive(Debug)]
pub struct AttributeViewMut<'buf> {
    bytes: &'buf mut [u8],
    acc: Accessor,
}

impl<'buf> AttributeViewMut<'buf> {
    /// # Panics
    ///
    /// * if `bytes` is too short to hold `vertex_count` vertices of size `stride`
    pub fn new(
        bytes: &'buf mut [u8],
        attr: VertexAttribute,
        stride: usize,
        vertex_count: usize,
    ) -> Self {
        assert!(bytes.len() >= stride * vertex_count);
        Self {
            bytes,
            acc: Accessor {
                attr,
                stride,
                vertex_count,
            },
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.acc.vertex_count
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.acc.element_count()
    }

    #[inline]
    pub fn component(&self) -> AttributeComponent {
        self.acc.attr.format.comp
    }

    pub fn get<T: Component, const N: usize>(&self, index: usize) -> Result<[T; N], ViewError> {
        self.acc.check::<T>(N)?;
        self.acc.check_index(index)?;
        Ok(self.acc.read(self.bytes, index))
    }

    /// Overwrite the value of vertex `index`.
    pub fn set<T: Component, const N: usize>(
        &mut self,
        index: usize,
        value: [T; N],
    ) -> Result<(), ViewError> {
        self.acc.check::<T>(N)?;
        self.acc.check_index(index)?;
        for (c, v) in value.into_iter().enumerate() {
            let at = self.acc.offset(index, c);
            v.write_ne(&mut self.bytes[at..]);
        }
        Ok(())
    }

    /// Copy `count` tightly-packed values from `flat` into the first `count` vertices.
    pub fn copy_from<T: Component>(&mut self, flat: &[T], count: usize) -> Result<(), ViewError> {
        let width = self.acc.element_count();
        if T::COMPONENT != self.acc.attr.format.comp {
            return Err(ViewError::Component {
                requested: T::COMPONENT,
                actual: self.acc.attr.format.comp,
            });
        }
        if count > self.acc.vertex_count {
            return Err(ViewError::OutOfRange {
                index: count,
                len: self.acc.vertex_count,
            });
        }
        if flat.len() < count * width {
            return Err(ViewError::SourceTooShort {
                len: flat.len(),
                required: count * width,
            });
        }
        for (i, element) in flat.chunks_exact(width).take(count).enumerate() {
            for (c, v) in element.iter().enumerate() {
                let at = self.acc.offset(i, c);
                v.write_ne(&mut self.bytes[at..]);
            }
        }
        Ok(())
    }

    /// Reborrow as a read-only view.
    #[inline]
    pub fn as_view(&self) -> AttributeView<'_> {
        AttributeView {
            bytes: &*self.bytes,
            acc: self.acc,
        }
    }
}
