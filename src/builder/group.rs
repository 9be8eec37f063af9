//! Partitioning of emitted triangles into material groups.

use std::collections::BTreeMap;

use hedron::primitive::PrimitiveGroup;

/// Per-group index lists, plus the group currently receiving triangles.
///
/// Group transitions happen either through an explicit [switch_to](Self::switch_to) or when a
/// grouping stream resolves to a new value while welding.
#[derive(Debug, Clone)]
pub struct GroupAccumulator {
    groups: BTreeMap<u32, Vec<u32>>,
    active: u32,
}

impl Default for GroupAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupAccumulator {
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
            active: 0,
        }
    }

    #[inline]
    pub fn active(&self) -> u32 {
        self.active
    }

    /// Make `id` the active group, returning whether it changed.
    pub fn switch_to(&mut self, id: u32) -> bool {
        self.groups.entry(id).or_default();
        let changed = self.active != id;
        self.active = id;
        changed
    }

    pub fn push_triangle(&mut self, tri: [u32; 3]) {
        self.groups
            .entry(self.active)
            .or_default()
            .extend_from_slice(&tri);
    }

    /// Total number of indices accumulated across all groups.
    pub fn index_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Concatenate the non-empty groups in ascending id order, returning the combined indices and
    /// one [PrimitiveGroup] per group.
    pub fn finish(self) -> (Vec<u32>, Vec<PrimitiveGroup>) {
        let mut indices = Vec::with_capacity(self.index_count());
        let mut primitives = Vec::new();
        for (id, group) in self.groups {
            if group.is_empty() {
                continue;
            }
            primitives.push(PrimitiveGroup::triangles(indices.len(), group.len(), id));
            indices.extend(group);
        }
        (indices, primitives)
    }
}
