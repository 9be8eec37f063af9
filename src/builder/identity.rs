//! Vertex welding: mapping per-stream index tuples to consolidated vertex indices.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// The resolved per-stream field indices of one polygon corner, in stream order.
///
/// Negative entries mean "no value". Only used as a deduplication key.
pub type VertexKey = SmallVec<[i64; 8]>;

/// A consolidated vertex, as remembered by a [VertexIdentityMap].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Welded {
    pub index: u32,
    /// The group selected by the grouping stream's value for this vertex, if there is one.
    pub group: Option<u32>,
}

/// Assigns consolidated vertex indices to distinct [VertexKeys](VertexKey) in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct VertexIdentityMap {
    map: FxHashMap<VertexKey, Welded>,
}

impl VertexIdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: &[i64]) -> Option<Welded> {
        self.map.get(key).copied()
    }

    /// Remember `key` as the next consolidated vertex, returning its index.
    ///
    /// The caller must have checked that `key` is absent.
    pub fn insert_next(&mut self, key: VertexKey, group: Option<u32>) -> Option<Welded> {
        let index = u32::try_from(self.map.len()).ok()?;
        let welded = Welded { index, group };
        self.map.insert(key, welded);
        Some(welded)
    }

    /// Number of distinct keys seen.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
