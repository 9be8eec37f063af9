use hedron::{
    primitive::attribute::{
        layout::LayoutError, view::ViewError, AttributeComponent, AttributeUsage,
    },
    StorageError,
};

/// Errors in the set of streams given to a [MeshBuilder](crate::MeshBuilder).
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("at most one stream may control grouping; found {0}")]
    MultipleGroupingStreams(usize),
    #[error("grouping stream {name:?} must have exactly one element per value; found {element_count}")]
    GroupingArity { name: String, element_count: usize },
    #[error("grouping stream {name:?} must hold integral values; found {component:?}")]
    GroupingComponent {
        name: String,
        component: AttributeComponent,
    },
    #[error("stream {name:?} has {element_count} elements per value; expected 1 through 4")]
    ElementCount { name: String, element_count: usize },
    #[error("more than one stream in the mesh has usage {0:?}")]
    DuplicateUsage(AttributeUsage),
}

/// Errors in the data fed through a [MeshBuilder](crate::MeshBuilder).
#[derive(Debug, thiserror::Error)]
pub enum DataIntegrityError {
    #[error("polygon has {corners} corners but {vertex_ids} vertex ids")]
    CornerMismatch { corners: usize, vertex_ids: usize },
    #[error("polygon has {0} corners; at least 3 are required")]
    TooFewCorners(usize),
    #[error("vertex key has {actual} entries; builder has {expected} streams")]
    KeyLength { expected: usize, actual: usize },
    #[error("negative source vertex id {0}")]
    NegativeVertexId(i32),
    #[error("stream {name:?} index buffer holds {len} entries; index {index} requested")]
    IndexOutOfRange {
        name: String,
        index: usize,
        len: usize,
    },
    #[error("stream {name:?} holds {len} components; element {field} of width {width} requested")]
    ValuesTooShort {
        name: String,
        field: usize,
        width: usize,
        len: usize,
    },
    #[error("grouping stream {name:?} resolved to invalid group id {value}")]
    InvalidGroup { name: String, value: i64 },
    #[error("vertex count exceeds the range of 32-bit indices")]
    VertexOverflow,
    #[error("tangent of vertex {vertex} is NaN")]
    NanTangent { vertex: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    DataIntegrity(#[from] DataIntegrityError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error("mesh build was aborted by an earlier error")]
    Aborted,
}
