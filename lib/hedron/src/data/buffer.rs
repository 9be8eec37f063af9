use meshweld_common::IndexElement;

use crate::primitive::attribute::AttributeComponent;

/// A data blob which can be sent to the GPU or accessed through
/// [attribute views](crate::primitive::attribute::view::AttributeView)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    pub data: Vec<u8>,
}

impl Buffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A zero-filled buffer of `len` bytes.
    #[inline]
    pub fn zeroed(len: usize) -> Self {
        Self { data: vec![0; len] }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.data.as_slice()
    }

    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        self.data.as_mut_slice()
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

/// Element indices of a [Geometry](crate::Geometry), stored with the narrowest integer width able
/// to address every vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Default for IndexBuffer {
    fn default() -> Self {
        Self::U8(Vec::new())
    }
}

impl IndexBuffer {
    /// A zero-filled buffer of `index_count` indices, wide enough for `vertex_count` vertices.
    pub fn for_vertex_count(vertex_count: usize, index_count: usize) -> Self {
        if u8::fits(vertex_count) {
            Self::U8(vec![0; index_count])
        } else if u16::fits(vertex_count) {
            Self::U16(vec![0; index_count])
        } else {
            Self::U32(vec![0; index_count])
        }
    }

    #[inline]
    pub fn component(&self) -> AttributeComponent {
        match self {
            Self::U8(_) => AttributeComponent::U8,
            Self::U16(_) => AttributeComponent::U16,
            Self::U32(_) => AttributeComponent::U32,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Self::U8(v) => v.get(i).map(|&x| x.into()),
            Self::U16(v) => v.get(i).map(|&x| x.into()),
            Self::U32(v) => v.get(i).copied(),
        }
    }

    /// Overwrite the start of this buffer with `src`, returning the number of indices written.
    ///
    /// Stops at the first index which doesn't fit.
    pub fn write_all(&mut self, src: &[u32]) -> usize {
        fn write_in<T: IndexElement>(dst: &mut [T], src: &[u32]) -> usize {
            let mut written = 0;
            for (slot, &value) in dst.iter_mut().zip(src) {
                match T::from_index(value) {
                    Some(v) => *slot = v,
                    None => break,
                }
                written += 1;
            }
            written
        }
        match self {
            Self::U8(v) => write_in(v, src),
            Self::U16(v) => write_in(v, src),
            Self::U32(v) => write_in(v, src),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}
