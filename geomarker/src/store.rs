//! Canonical storage of the current marker record set.

use crate::marker::MarkerRecord;

/// Identifies one `set_markers` call. Asynchronously composed icons carry the generation they
/// were issued under so that completions of a superseded record set can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u64);

/// Holds the current canonical set of marker records.
///
/// Updates have replace-all semantics: every call to [`replace_all`](MarkerStore::replace_all)
/// discards the previous records and starts a new generation. Records are stored verbatim:
/// order is preserved and duplicate ids are allowed.
#[derive(Debug, Default)]
pub struct MarkerStore {
    records: Vec<MarkerRecord>,
    generation: u64,
}

impl MarkerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored record set, starting a new generation.
    pub fn replace_all(&mut self, records: Vec<MarkerRecord>) -> Generation {
        self.records = records;
        self.generation += 1;
        Generation(self.generation)
    }

    /// Records of the current generation, in the order they were supplied.
    pub fn records(&self) -> &[MarkerRecord] {
        &self.records
    }

    /// The current generation.
    pub fn generation(&self) -> Generation {
        Generation(self.generation)
    }
}
