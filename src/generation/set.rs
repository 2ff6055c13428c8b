//! Generation: one representative tree per isomorphism class of a fixed size

use crate::tree::{CanonicalKey, Tree};
use sha2::{Digest, Sha256};
use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;

/// All pairwise non-isomorphic trees of one node count, keyed by canonical form
///
/// Keys are unique, so the number of members is the number of isomers.
/// Iteration follows key order, which is deterministic but carries no meaning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generation {
    size: usize,
    members: BTreeMap<CanonicalKey, Tree>,
}

impl Generation {
    /// Generation of size 1: a lone carbon
    pub fn base() -> Self {
        let tree = Tree::new();
        let mut members = BTreeMap::new();
        members.insert(tree.canonical_form(), tree);
        Generation { size: 1, members }
    }

    /// Empty generation for trees of `size` nodes
    pub fn empty(size: usize) -> Self {
        Generation {
            size,
            members: BTreeMap::new(),
        }
    }

    /// Build a generation from trees, collapsing isomorphic ones
    pub fn from_trees<I>(size: usize, trees: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = Tree>,
    {
        let mut generation = Generation::empty(size);
        for tree in trees {
            generation.insert(tree)?;
        }
        Ok(generation)
    }

    /// Node count shared by every member
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of isomorphism classes
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the generation has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Add a tree; returns `true` if it opened a new isomorphism class
    pub fn insert(&mut self, tree: Tree) -> crate::Result<bool> {
        if tree.size() != self.size {
            return Err(crate::Error::SizeMismatch {
                expected: self.size,
                found: tree.size(),
            });
        }
        let key = tree.canonical_form();
        Ok(self.offer(key, tree))
    }

    /// Record `tree` under `key`, keeping the smaller of two representatives
    ///
    /// The caller guarantees `key` is the canonical form of `tree` and that
    /// the tree has `size()` nodes.
    pub(crate) fn offer(&mut self, key: CanonicalKey, tree: Tree) -> bool {
        match self.members.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(tree);
                true
            }
            Entry::Occupied(mut slot) => {
                if tree < *slot.get() {
                    slot.insert(tree);
                }
                false
            }
        }
    }

    /// Fold another generation of the same size into this one
    pub(crate) fn merge(&mut self, other: Generation) {
        for (key, tree) in other.members {
            self.offer(key, tree);
        }
    }

    /// Check if an isomorphism class is present
    pub fn contains_key(&self, key: &CanonicalKey) -> bool {
        self.members.contains_key(key)
    }

    /// Representative for a key
    pub fn get(&self, key: &CanonicalKey) -> Option<&Tree> {
        self.members.get(key)
    }

    /// Canonical keys in order
    pub fn keys(&self) -> impl Iterator<Item = &CanonicalKey> {
        self.members.keys()
    }

    /// Representatives in key order
    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.members.values()
    }

    /// `(key, representative)` pairs in key order
    pub fn iter(&self) -> btree_map::Iter<'_, CanonicalKey, Tree> {
        self.members.iter()
    }

    /// Adjacency lists of every representative, in key order
    pub fn to_adjacency_lists(&self) -> Vec<Vec<Vec<usize>>> {
        self.trees().map(|tree| tree.adjacency().to_vec()).collect()
    }

    /// SHA-256 over the ordered key set, hex encoded
    ///
    /// Equal fingerprints mean equal sets of isomorphism classes, whichever
    /// labelings were kept as representatives.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.size.to_le_bytes());
        for key in self.keys() {
            hasher.update(key.as_str().as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }
}

impl<'a> IntoIterator for &'a Generation {
    type Item = (&'a CanonicalKey, &'a Tree);
    type IntoIter = btree_map::Iter<'a, CanonicalKey, Tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
