//! Interleaved vertex layouts.

use crate::primitive::attribute::{AttributeFormat, AttributeUsage};

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("attribute {0:?} appears more than once in vertex layout")]
    DuplicateUsage(AttributeUsage),
}

/// A single attribute within a [VertexLayout].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    pub usage: AttributeUsage,
    pub format: AttributeFormat,
    /// Byte offset of this attribute from the start of each vertex
    pub offset: usize,
}

/// Describes how vertex attributes are interleaved within a vertex buffer.
///
/// # Invariants
///
/// * each usage appears at most once
/// * `attr.offset % attr.format.alignment() == 0` for every attribute
/// * `stride` is a multiple of the largest attribute alignment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: usize,
}

impl VertexLayout {
    /// Construct a layout from `(usage, format)` descriptors, packing attributes in the order given.
    pub fn new(
        descriptors: impl IntoIterator<Item = (AttributeUsage, AttributeFormat)>,
    ) -> Result<Self, LayoutError> {
        let mut attributes: Vec<VertexAttribute> = Vec::new();
        let mut offset: usize = 0;
        let mut max_align: usize = 1;
        for (usage, format) in descriptors {
            if attributes.iter().any(|a| a.usage == usage) {
                return Err(LayoutError::DuplicateUsage(usage));
            }
            let align = format.alignment();
            max_align = max_align.max(align);
            offset = offset.next_multiple_of(align);
            attributes.push(VertexAttribute {
                usage,
                format,
                offset,
            });
            offset += format.size_bytes();
        }
        Ok(Self {
            attributes,
            stride: offset.next_multiple_of(max_align),
        })
    }

    /// Size of a single vertex, in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    #[inline]
    pub fn get(&self, usage: AttributeUsage) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.usage == usage)
    }

    #[inline]
    pub fn contains(&self, usage: AttributeUsage) -> bool {
        self.get(usage).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
