//! In-process checkpoint store

use super::{decode, encode, CheckpointError, CheckpointStore};
use crate::generation::Generation;
use std::collections::BTreeMap;

/// Checkpoint store that keeps encoded payloads in memory
///
/// Payloads go through the same encode/decode path as the directory store,
/// so tests exercise the real checkpoint format.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    payloads: BTreeMap<usize, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw payload bytes for `size`, bypassing encoding
    pub fn insert_raw(&mut self, size: usize, payload: impl Into<Vec<u8>>) {
        self.payloads.insert(size, payload.into());
    }

    /// Raw payload stored for `size`
    pub fn raw(&self, size: usize) -> Option<&[u8]> {
        self.payloads.get(&size).map(Vec::as_slice)
    }

    /// Drop the checkpoint for `size`
    pub fn remove(&mut self, size: usize) -> bool {
        self.payloads.remove(&size).is_some()
    }

    /// Number of stored checkpoints
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

impl CheckpointStore for MemoryStore {
    fn load(&self, size: usize) -> Result<Option<Generation>, CheckpointError> {
        self.payloads
            .get(&size)
            .map(|bytes| decode(size, bytes))
            .transpose()
    }

    fn save(&mut self, generation: &Generation) -> Result<(), CheckpointError> {
        let payload = encode(generation)?;
        self.payloads.insert(generation.size(), payload);
        Ok(())
    }

    fn sizes(&self) -> Result<Vec<usize>, CheckpointError> {
        Ok(self.payloads.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::expand;

    #[test]
    fn test_absent_is_none() {
        let store = MemoryStore::new();
        assert!(store.load(3).unwrap().is_none());
        assert!(store.sizes().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let propane = expand(&expand(&Generation::base()));
        store.save(&propane).unwrap();

        let loaded = store.load(3).unwrap().unwrap();
        assert_eq!(loaded.fingerprint(), propane.fingerprint());
        assert_eq!(store.sizes().unwrap(), vec![3]);
        assert_eq!(store.raw(3), Some(&b"[[[1],[0,2],[1]]]"[..]));
    }

    #[test]
    fn test_corrupt_is_error() {
        let mut store = MemoryStore::new();
        store.insert_raw(4, "not json");
        assert!(matches!(store.load(4), Err(CheckpointError::Corrupt { size: 4, .. })));
    }
}
