//! Record of which consolidated vertices each source vertex became.

use smallvec::SmallVec;

/// Source vertex id → consolidated vertex ids.
///
/// A source vertex fans out into several consolidated vertices wherever it lies on a seam (ex. a
/// UV or normal discontinuity). Ids are kept in first-seen order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMapping {
    targets: Vec<SmallVec<[u32; 2]>>,
}

impl IndexMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: u32, consolidated: u32) {
        let source = source as usize;
        if source >= self.targets.len() {
            self.targets.resize_with(source + 1, SmallVec::new);
        }
        let targets = &mut self.targets[source];
        if !targets.contains(&consolidated) {
            targets.push(consolidated);
        }
    }

    /// Consolidated vertices produced from `source`; empty if it was never referenced.
    pub fn get(&self, source: u32) -> &[u32] {
        self.targets
            .get(source as usize)
            .map(SmallVec::as_slice)
            .unwrap_or(&[])
    }

    /// One past the largest source id referenced.
    #[inline]
    pub fn source_count(&self) -> usize {
        self.targets.len()
    }

    /// Iterate over referenced source ids and their consolidated vertices.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u32])> + '_ {
        self.targets
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_empty())
            .map(|(s, t)| (s as u32, t.as_slice()))
    }
}
