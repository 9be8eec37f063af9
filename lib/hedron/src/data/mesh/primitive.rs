pub mod attribute;

/// Topology used to interpret a run of indices as primitives.
///
/// Discriminants match the glTF `mode` codes.
#[repr(u8)]
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Triangles = 4,
}

/// A contiguous range of a [Geometry](crate::Geometry)'s index buffer rendered with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveGroup {
    /// The method by which indices are interpreted as topological primitives
    pub mode: Mode,
    /// Offset of the first index of this group within the index buffer
    pub from_element: usize,
    /// Number of indices in this group
    pub element_count: usize,
    /// Material with which this group is rendered
    pub material_index: u32,
}

impl PrimitiveGroup {
    #[inline]
    pub fn triangles(from_element: usize, element_count: usize, material_index: u32) -> Self {
        Self {
            mode: Mode::Triangles,
            from_element,
            element_count,
            material_index,
        }
    }
}
