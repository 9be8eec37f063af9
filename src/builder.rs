//! Consolidation of independently-indexed attribute streams into a single indexed mesh.

mod group;
mod identity;
mod mapping;

pub use group::*;
pub use identity::*;
pub use mapping::*;

use hedron::{
    primitive::attribute::{layout::VertexLayout, AttributeUsage},
    Geometry, GeometryStorage, HeapStorage, StorageError,
};

use crate::{
    error::{ConfigurationError, DataIntegrityError, Error},
    stream::{AttributeStream, Mapping, StreamValues},
};

/// The output of [MeshBuilder::complete].
#[derive(Debug, Clone)]
pub struct CompletedMesh {
    pub geometry: Geometry,
    pub index_mapping: IndexMapping,
}

/// Builds a welded, material-partitioned [Geometry] from per-attribute streams, one source polygon
/// at a time.
///
/// # Lifecycle
///
/// Construct once per source mesh, feed it every polygon through [add_polygon](Self::add_polygon)
/// (switching groups with [set_group](Self::set_group) as needed), then consume it with
/// [complete](Self::complete). Any error while adding polygons aborts the build.
#[derive(Debug)]
pub struct MeshBuilder {
    streams: Vec<AttributeStream>,
    /// Per-stream accumulation of welded values, parallel to `streams`
    outputs: Vec<StreamValues>,
    grouping: Option<usize>,
    identity: VertexIdentityMap,
    groups: GroupAccumulator,
    mapping: IndexMapping,
    triangle_count: usize,
    polygon_count: usize,
    aborted: bool,
}

impl MeshBuilder {
    /// Construct a builder over `positions` (xyz triples) and any additional `streams`.
    ///
    /// With `position_indexes`, positions are selected per corner through that array; without, each
    /// corner's source vertex id indexes `positions` directly.
    pub fn new(
        positions: Vec<f32>,
        position_indexes: Option<Vec<i32>>,
        streams: Vec<AttributeStream>,
    ) -> Result<Self, Error> {
        let position = match position_indexes {
            Some(indexes) => AttributeStream::new(
                "position",
                AttributeUsage::Position,
                3,
                Mapping::PolygonVertex,
                StreamValues::F32(positions),
            )
            .with_indexes(indexes),
            None => AttributeStream::new(
                "position",
                AttributeUsage::Position,
                3,
                Mapping::Vertex,
                StreamValues::F32(positions),
            ),
        };

        let mut streams = streams;
        // keep skinning attributes contiguous with position
        if streams.iter().any(|s| matches!(s.usage, AttributeUsage::Joints(_))) {
            streams.push(position);
        } else {
            streams.insert(0, position);
        }
        // stable, so the relative order of each partition is preserved
        streams.sort_by_key(|s| !s.include_in_mesh);

        let grouping = Self::validate(&streams)?;

        let outputs = streams.iter().map(|s| s.values.empty_like(0)).collect();

        tracing::debug!(
            streams = streams.len(),
            grouping = grouping.map(|g| streams[g].name.as_str()),
            "constructed mesh builder"
        );

        Ok(Self {
            streams,
            outputs,
            grouping,
            identity: VertexIdentityMap::new(),
            groups: GroupAccumulator::new(),
            mapping: IndexMapping::new(),
            triangle_count: 0,
            polygon_count: 0,
            aborted: false,
        })
    }

    /// Check stream invariants, returning the position of the grouping stream, if any.
    fn validate(streams: &[AttributeStream]) -> Result<Option<usize>, ConfigurationError> {
        for s in streams {
            if !(1..=4).contains(&s.element_count) {
                return Err(ConfigurationError::ElementCount {
                    name: s.name.clone(),
                    element_count: s.element_count,
                });
            }
        }

        let mesh_streams = streams.iter().filter(|s| s.include_in_mesh);
        for (i, s) in mesh_streams.clone().enumerate() {
            if mesh_streams.clone().skip(i + 1).any(|o| o.usage == s.usage) {
                return Err(ConfigurationError::DuplicateUsage(s.usage));
            }
        }

        let grouping: Vec<usize> = streams
            .iter()
            .enumerate()
            .filter(|(_, s)| s.controls_grouping)
            .map(|(i, _)| i)
            .collect();
        match grouping.as_slice() {
            [] => Ok(None),
            &[g] => {
                let s = &streams[g];
                if s.element_count != 1 {
                    return Err(ConfigurationError::GroupingArity {
                        name: s.name.clone(),
                        element_count: s.element_count,
                    });
                }
                if !s.values.component().is_integral() {
                    return Err(ConfigurationError::GroupingComponent {
                        name: s.name.clone(),
                        component: s.values.component(),
                    });
                }
                Ok(Some(g))
            }
            many => Err(ConfigurationError::MultipleGroupingStreams(many.len())),
        }
    }

    /// The builder's streams, in output order.
    #[inline]
    pub fn streams(&self) -> &[AttributeStream] {
        &self.streams
    }

    /// Number of consolidated vertices so far.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.identity.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Number of source polygons added so far.
    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.polygon_count
    }

    #[inline]
    pub fn active_group(&self) -> u32 {
        self.groups.active()
    }

    /// Direct subsequent triangles to group `id`.
    ///
    /// With a grouping stream, welding a vertex also selects that vertex's group, so a later
    /// corner whose grouping value differs from `id` overrides this choice.
    pub fn set_group(&mut self, id: u32) {
        if self.groups.switch_to(id) {
            tracing::trace!(group = id, "switched primitive group");
        }
    }

    /// Resolve, per stream, the field index selected by a corner.
    ///
    /// `pvi` is the corner's polygon-vertex index and `vertex_id` its source vertex id.
    pub fn stream_indexes_for_pvi(
        &self,
        pvi: usize,
        vertex_id: u32,
    ) -> Result<VertexKey, DataIntegrityError> {
        self.streams
            .iter()
            .map(|s| {
                let base = match s.mapping {
                    Mapping::Vertex => vertex_id as usize,
                    Mapping::PolygonVertex => pvi,
                    Mapping::Polygon => self.polygon_count,
                    Mapping::SingleValue => 0,
                };
                match &s.indexes {
                    Some(indexes) => indexes.get(base).map(|&i| i64::from(i)).ok_or_else(|| {
                        DataIntegrityError::IndexOutOfRange {
                            name: s.name.clone(),
                            index: base,
                            len: indexes.len(),
                        }
                    }),
                    None => Ok(base as i64),
                }
            })
            .collect()
    }

    /// Run `f`, marking the build aborted if it fails.
    fn guarded<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, DataIntegrityError>,
    ) -> Result<T, Error> {
        if self.aborted {
            return Err(Error::Aborted);
        }
        let res = f(self);
        if let Err(e) = &res {
            tracing::debug!(polygon = self.polygon_count, error = %e, "aborting mesh build");
            self.aborted = true;
        }
        res.map_err(Error::from)
    }

    /// Weld a corner, returning its consolidated vertex.
    ///
    /// `key` must hold one entry per stream, as produced by
    /// [stream_indexes_for_pvi](Self::stream_indexes_for_pvi). On first sight of `key`, each
    /// stream's value is fetched and appended to its output.
    ///
    /// An error aborts the build; every later call returns [Error::Aborted].
    pub fn get_vertex_index(&mut self, key: VertexKey) -> Result<Welded, Error> {
        self.guarded(|b| b.weld(key))
    }

    fn weld(&mut self, key: VertexKey) -> Result<Welded, DataIntegrityError> {
        if key.len() != self.streams.len() {
            return Err(DataIntegrityError::KeyLength {
                expected: self.streams.len(),
                actual: key.len(),
            });
        }
        if let Some(welded) = self.identity.get(&key) {
            return Ok(welded);
        }

        // validate everything before touching any output, so a failure leaves them consistent
        let mut group = None;
        for (i, (s, &field)) in self.streams.iter().zip(key.iter()).enumerate() {
            let Ok(field) = usize::try_from(field) else {
                continue; // absent; substituted with zeroes
            };
            if !s.values.has_element(field, s.element_count) {
                return Err(DataIntegrityError::ValuesTooShort {
                    name: s.name.clone(),
                    field,
                    width: s.element_count,
                    len: s.values.len(),
                });
            }
            if Some(i) == self.grouping {
                let value = s.values.integral(field).unwrap_or_default();
                group = Some(u32::try_from(value).map_err(|_| {
                    DataIntegrityError::InvalidGroup {
                        name: s.name.clone(),
                        value,
                    }
                })?);
            }
        }
        if self.grouping.is_some() && group.is_none() {
            // an absent grouping value reads as zero, like any other absent value
            group = Some(0);
        }

        let welded = self
            .identity
            .insert_next(key.clone(), group)
            .ok_or(DataIntegrityError::VertexOverflow)?;
        for ((s, out), &field) in self.streams.iter().zip(&mut self.outputs).zip(key.iter()) {
            out.push_element_from(&s.values, usize::try_from(field).ok(), s.element_count);
        }
        Ok(welded)
    }

    /// Weld the three corners of a triangle and append it to the active group.
    ///
    /// `corners` are the corners' polygon-vertex indices and `vertex_ids` their source vertex ids;
    /// see [add_polygon](Self::add_polygon). An error aborts the build.
    pub fn add_triangle(&mut self, corners: [usize; 3], vertex_ids: [u32; 3]) -> Result<(), Error> {
        self.guarded(|b| b.weld_triangle(corners, vertex_ids))
    }

    fn weld_triangle(
        &mut self,
        corners: [usize; 3],
        vertex_ids: [u32; 3],
    ) -> Result<(), DataIntegrityError> {
        let mut tri = [0u32; 3];
        for ((slot, pvi), vertex_id) in tri.iter_mut().zip(corners).zip(vertex_ids) {
            let key = self.stream_indexes_for_pvi(pvi, vertex_id)?;
            let welded = self.weld(key)?;
            if let Some(group) = welded.group {
                self.set_group(group);
            }
            self.mapping.insert(vertex_id, welded.index);
            *slot = welded.index;
        }
        self.groups.push_triangle(tri);
        self.triangle_count += 1;
        Ok(())
    }

    /// Add one convex, planar source polygon.
    ///
    /// `corners` holds each corner's polygon-vertex index (its slot within per-corner arrays);
    /// `vertex_ids` each corner's source vertex id. Polygons with more than three corners are
    /// fan-triangulated around their first corner.
    ///
    /// An error aborts the build; every later call returns [Error::Aborted].
    pub fn add_polygon(&mut self, corners: &[usize], vertex_ids: &[i32]) -> Result<(), Error> {
        self.guarded(|b| b.weld_polygon(corners, vertex_ids))
    }

    fn weld_polygon(
        &mut self,
        corners: &[usize],
        vertex_ids: &[i32],
    ) -> Result<(), DataIntegrityError> {
        if corners.len() != vertex_ids.len() {
            return Err(DataIntegrityError::CornerMismatch {
                corners: corners.len(),
                vertex_ids: vertex_ids.len(),
            });
        }
        if corners.len() < 3 {
            return Err(DataIntegrityError::TooFewCorners(corners.len()));
        }
        let ids = vertex_ids
            .iter()
            .map(|&id| u32::try_from(id).map_err(|_| DataIntegrityError::NegativeVertexId(id)))
            .collect::<Result<Vec<u32>, _>>()?;

        for i in 2..corners.len() {
            self.weld_triangle(
                [corners[0], corners[i - 1], corners[i]],
                [ids[0], ids[i - 1], ids[i]],
            )?;
        }
        self.polygon_count += 1;
        Ok(())
    }

    /// Finalize the mesh into heap-allocated storage.
    pub fn complete(self) -> Result<CompletedMesh, Error> {
        self.complete_with(&mut HeapStorage)
    }

    /// Finalize the mesh into storage provided by `storage`.
    #[tracing::instrument(skip_all, fields(vertices = self.identity.len(), triangles = self.triangle_count))]
    pub fn complete_with(self, storage: &mut impl GeometryStorage) -> Result<CompletedMesh, Error> {
        if self.aborted {
            return Err(Error::Aborted);
        }
        let vertex_count = self.identity.len();

        let mesh_streams: Vec<(&AttributeStream, &StreamValues)> = self
            .streams
            .iter()
            .zip(&self.outputs)
            .filter(|(s, _)| s.include_in_mesh)
            .collect();
        // formats were checked in `validate`
        let layout = VertexLayout::new(
            mesh_streams
                .iter()
                .filter_map(|(s, _)| s.format().map(|f| (s.usage, f))),
        )?;

        let (indices, primitives) = self.groups.finish();
        let mut buffers = storage.allocate(&layout, vertex_count, indices.len())?;
        if buffers.indices.len() != indices.len() {
            return Err(StorageError::IndexSize {
                expected: indices.len(),
                actual: buffers.indices.len(),
            }
            .into());
        }
        if buffers.indices.write_all(&indices) != indices.len() {
            return Err(StorageError::IndexWidth {
                vertex_count,
                component: buffers.indices.component(),
            }
            .into());
        }

        let mut geometry = Geometry::new(layout, vertex_count, buffers, primitives)?;
        for (s, out) in mesh_streams {
            if let Some(mut view) = geometry.attribute_mut(s.usage) {
                out.write_to(&mut view, vertex_count)?;
            }
        }

        tracing::debug!(
            vertices = vertex_count,
            triangles = self.triangle_count,
            groups = geometry.primitives().len(),
            index_width = ?geometry.indices().component(),
            "completed mesh"
        );

        Ok(CompletedMesh {
            geometry,
            index_mapping: self.mapping,
        })
    }
}
