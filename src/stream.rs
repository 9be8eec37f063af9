//! Per-attribute vertex data, as emitted by asset importers.
//!
//! Interchange formats commonly store each vertex attribute in its own pool with its own index
//! space; ex. an OBJ face corner names a position, a texcoord, and a normal independently. An
//! [AttributeStream] describes one such pool and how a polygon corner selects a value from it.

use hedron::primitive::attribute::{
    view::{AttributeViewMut, ViewError},
    AttributeComponent, AttributeFormat, AttributeType, AttributeUsage,
};

/// Which index space a stream's values are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mapping {
    /// One value per source vertex; selected by the corner's vertex id.
    Vertex,
    /// One value per polygon corner; selected by the corner's polygon-vertex index.
    PolygonVertex,
    /// One value per polygon; selected by the running polygon counter.
    Polygon,
    /// A single value shared by every corner.
    SingleValue,
}

/// Flat, typed value buffer of an [AttributeStream].
#[derive(Debug, Clone, PartialEq)]
pub enum StreamValues {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
}

/// Evaluate `$body` with `$v` bound to the inner vector of `$values`, whatever its type.
macro_rules! with_values {
    ($values:expr, $v:ident => $body:expr) => {
        match $values {
            StreamValues::U8($v) => $body,
            StreamValues::U16($v) => $body,
            StreamValues::U32($v) => $body,
            StreamValues::I8($v) => $body,
            StreamValues::I16($v) => $body,
            StreamValues::I32($v) => $body,
            StreamValues::F32($v) => $body,
        }
    };
}

fn push_element<T: Copy + Default>(dst: &mut Vec<T>, src: &[T], field: Option<usize>, width: usize) {
    match field {
        Some(f) => dst.extend_from_slice(&src[f * width..(f + 1) * width]),
        None => dst.extend(std::iter::repeat(T::default()).take(width)),
    }
}

impl StreamValues {
    #[inline]
    pub fn component(&self) -> AttributeComponent {
        match self {
            StreamValues::U8(_) => AttributeComponent::U8,
            StreamValues::U16(_) => AttributeComponent::U16,
            StreamValues::U32(_) => AttributeComponent::U32,
            StreamValues::I8(_) => AttributeComponent::I8,
            StreamValues::I16(_) => AttributeComponent::I16,
            StreamValues::I32(_) => AttributeComponent::I32,
            StreamValues::F32(_) => AttributeComponent::F32,
        }
    }

    /// Number of components (not elements) stored.
    #[inline]
    pub fn len(&self) -> usize {
        with_values!(self, v => v.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An empty buffer of the same component type, with room for `capacity` components.
    pub fn empty_like(&self, capacity: usize) -> Self {
        match self {
            StreamValues::U8(_) => StreamValues::U8(Vec::with_capacity(capacity)),
            StreamValues::U16(_) => StreamValues::U16(Vec::with_capacity(capacity)),
            StreamValues::U32(_) => StreamValues::U32(Vec::with_capacity(capacity)),
            StreamValues::I8(_) => StreamValues::I8(Vec::with_capacity(capacity)),
            StreamValues::I16(_) => StreamValues::I16(Vec::with_capacity(capacity)),
            StreamValues::I32(_) => StreamValues::I32(Vec::with_capacity(capacity)),
            StreamValues::F32(_) => StreamValues::F32(Vec::with_capacity(capacity)),
        }
    }

    /// Whether element `field` (of `width` components) lies within this buffer.
    #[inline]
    pub fn has_element(&self, field: usize, width: usize) -> bool {
        field
            .checked_add(1)
            .and_then(|end| end.checked_mul(width))
            .is_some_and(|end| end <= self.len())
    }

    /// Read component `i` of an integral buffer, widened to `i64`.
    pub fn integral(&self, i: usize) -> Option<i64> {
        match self {
            StreamValues::U8(v) => v.get(i).map(|&x| x.into()),
            StreamValues::U16(v) => v.get(i).map(|&x| x.into()),
            StreamValues::U32(v) => v.get(i).map(|&x| x.into()),
            StreamValues::I8(v) => v.get(i).map(|&x| x.into()),
            StreamValues::I16(v) => v.get(i).map(|&x| x.into()),
            StreamValues::I32(v) => v.get(i).map(|&x| x.into()),
            StreamValues::F32(_) => None,
        }
    }

    /// Append element `field` of `src` to `self`, or `width` zeroes if `field` is `None`.
    ///
    /// # Panics
    ///
    /// * if `src` is of a different component type than `self`
    /// * if `field` is out of range of `src`; see [has_element](Self::has_element)
    pub(crate) fn push_element_from(&mut self, src: &Self, field: Option<usize>, width: usize) {
        match (self, src) {
            (StreamValues::U8(d), StreamValues::U8(s)) => push_element(d, s, field, width),
            (StreamValues::U16(d), StreamValues::U16(s)) => push_element(d, s, field, width),
            (StreamValues::U32(d), StreamValues::U32(s)) => push_element(d, s, field, width),
            (StreamValues::I8(d), StreamValues::I8(s)) => push_element(d, s, field, width),
            (StreamValues::I16(d), StreamValues::I16(s)) => push_element(d, s, field, width),
            (StreamValues::I32(d), StreamValues::I32(s)) => push_element(d, s, field, width),
            (StreamValues::F32(d), StreamValues::F32(s)) => push_element(d, s, field, width),
            _ => unreachable!("accumulated values must share their stream's component type"),
        }
    }

    /// Copy the first `count` elements into an attribute view.
    pub fn write_to(&self, view: &mut AttributeViewMut<'_>, count: usize) -> Result<(), ViewError> {
        with_values!(self, v => view.copy_from(v, count))
    }
}

/// A named vertex attribute supplied by an importer.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeStream {
    pub name: String,
    pub usage: AttributeUsage,
    /// Components per element; 1 through 4
    pub element_count: usize,
    pub mapping: Mapping,
    pub values: StreamValues,
    /// Optional second level of indirection; a negative entry means "no value".
    pub indexes: Option<Vec<i32>>,
    /// Whether this stream becomes an attribute of the finished geometry.
    pub include_in_mesh: bool,
    /// Whether this stream's (scalar, integral) value selects the active primitive group.
    pub controls_grouping: bool,
}

impl AttributeStream {
    pub fn new(
        name: impl Into<String>,
        usage: AttributeUsage,
        element_count: usize,
        mapping: Mapping,
        values: StreamValues,
    ) -> Self {
        Self {
            name: name.into(),
            usage,
            element_count,
            mapping,
            values,
            indexes: None,
            include_in_mesh: true,
            controls_grouping: false,
        }
    }

    /// A zero-valued stream which reserves a slot in the vertex layout without affecting welding.
    ///
    /// Used to make room for attributes which are computed after the mesh is built, such as
    /// [normals](crate::derive::gen_vertex_normals).
    pub fn placeholder(usage: AttributeUsage, element_count: usize) -> Self {
        Self::new(
            format!("{usage:?}"),
            usage,
            element_count,
            Mapping::SingleValue,
            StreamValues::F32(vec![0.0; element_count]),
        )
    }

    pub fn with_indexes(mut self, indexes: Vec<i32>) -> Self {
        self.indexes = Some(indexes);
        self
    }

    /// Keep this stream out of the finished geometry; ex. for material ids.
    pub fn excluded_from_mesh(mut self) -> Self {
        self.include_in_mesh = false;
        self
    }

    pub fn controlling_grouping(mut self) -> Self {
        self.controls_grouping = true;
        self
    }

    /// The field type this stream occupies in a vertex layout, if its element count is valid.
    pub fn format(&self) -> Option<AttributeFormat> {
        AttributeType::from_elements(self.element_count)
            .map(|ty| AttributeFormat::new(ty, self.values.component()))
    }
}
