//! Canonical form for unrooted trees
//!
//! Two trees get the same [`CanonicalKey`] iff they are isomorphic. The key is
//! built by rooting the tree at its center(s), encoding each rooted subtree as
//! a bracketed, sorted concatenation of its children's encodings, and taking
//! the smallest encoding across centers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relabeling-invariant key of a tree
///
/// Only ever compared for equality or ordering, never parsed back.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Key of the tree with no nodes
    pub fn empty() -> Self {
        CanonicalKey(String::new())
    }

    /// Key of the single-node tree
    pub fn terminal() -> Self {
        CanonicalKey("()".to_string())
    }

    /// Borrow the encoded form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the encoded form in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if this is the key of the empty tree
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Find the center of a tree by peeling leaves layer by layer
///
/// Returns one node for trees of even diameter and two adjacent nodes for odd
/// diameter. The empty tree has no center; a single node is its own center.
pub fn centers(adjacency: &[Vec<usize>]) -> Vec<usize> {
    let n = adjacency.len();
    match n {
        0 => return Vec::new(),
        1 => return vec![0],
        _ => {}
    }

    let mut degree: Vec<usize> = adjacency.iter().map(Vec::len).collect();
    let mut layer: Vec<usize> = (0..n).filter(|&v| degree[v] <= 1).collect();
    let mut removed = layer.len();

    // The whole layer is removed at once; stop once the peel covers every node.
    while removed < n {
        let mut next = Vec::new();
        for &leaf in &layer {
            for &neighbor in &adjacency[leaf] {
                degree[neighbor] = degree[neighbor].saturating_sub(1);
                if degree[neighbor] == 1 {
                    next.push(neighbor);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        removed += next.len();
        layer = next;
    }

    layer
}

/// Encode the tree rooted at `root`
///
/// A leaf encodes to `()`; an inner node to `(` + sorted child encodings + `)`.
pub fn rooted_encoding(adjacency: &[Vec<usize>], root: usize) -> String {
    encode_subtree(adjacency, root, None)
}

fn encode_subtree(adjacency: &[Vec<usize>], node: usize, parent: Option<usize>) -> String {
    let mut labels: Vec<String> = adjacency[node]
        .iter()
        .filter(|&&child| Some(child) != parent)
        .map(|&child| encode_subtree(adjacency, child, Some(node)))
        .collect();

    // Child order in the adjacency list carries no meaning.
    labels.sort_unstable();

    let mut encoded = String::with_capacity(2 + labels.iter().map(String::len).sum::<usize>());
    encoded.push('(');
    for label in &labels {
        encoded.push_str(label);
    }
    encoded.push(')');
    encoded
}

/// Compute the canonical key of a tree given as a symmetric adjacency list
///
/// The input must satisfy the tree invariants; see [`crate::validate`].
pub fn canonical_form(adjacency: &[Vec<usize>]) -> CanonicalKey {
    match adjacency.len() {
        0 => CanonicalKey::empty(),
        1 => CanonicalKey::terminal(),
        _ => centers(adjacency)
            .into_iter()
            .map(|center| rooted_encoding(adjacency, center))
            .min()
            .map(CanonicalKey)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> Vec<Vec<usize>> {
        (0..n)
            .map(|i| {
                let mut neighbors = Vec::new();
                if i > 0 {
                    neighbors.push(i - 1);
                }
                if i + 1 < n {
                    neighbors.push(i + 1);
                }
                neighbors
            })
            .collect()
    }

    #[test]
    fn test_reserved_keys() {
        assert_eq!(canonical_form(&[]), CanonicalKey::empty());
        assert!(canonical_form(&[]).is_empty());
        assert_eq!(canonical_form(&[vec![]]).as_str(), "()");
    }

    #[test]
    fn test_centers_of_paths() {
        assert_eq!(centers(&[]), Vec::<usize>::new());
        assert_eq!(centers(&[vec![]]), vec![0]);
        assert_eq!(centers(&path(2)), vec![0, 1]);
        assert_eq!(centers(&path(3)), vec![1]);

        let mut four = centers(&path(4));
        four.sort_unstable();
        assert_eq!(four, vec![1, 2]);

        assert_eq!(centers(&path(5)), vec![2]);
    }

    #[test]
    fn test_center_of_star() {
        let star = vec![vec![1, 2, 3, 4], vec![0], vec![0], vec![0], vec![0]];
        assert_eq!(centers(&star), vec![0]);
    }

    #[test]
    fn test_rooted_encoding() {
        assert_eq!(rooted_encoding(&path(3), 1), "(()())");
        assert_eq!(rooted_encoding(&path(3), 0), "((()))");
    }

    #[test]
    fn test_ethane_and_propane() {
        assert_eq!(canonical_form(&path(2)).as_str(), "(())");
        assert_eq!(canonical_form(&path(3)).as_str(), "(()())");
    }

    #[test]
    fn test_butane_isomers_differ() {
        let n_butane = path(4);
        let isobutane = vec![vec![1, 2, 3], vec![0], vec![0], vec![0]];
        assert_ne!(canonical_form(&n_butane), canonical_form(&isobutane));
        assert_eq!(canonical_form(&isobutane).as_str(), "(()()())");
    }

    #[test]
    fn test_relabeled_path_matches() {
        // 2 - 0 - 3 - 1
        let shuffled = vec![vec![2, 3], vec![3], vec![0], vec![0, 1]];
        assert_eq!(canonical_form(&shuffled), canonical_form(&path(4)));
    }

    #[test]
    fn test_neighbor_order_is_irrelevant() {
        let a = vec![vec![1, 2], vec![0, 3], vec![0], vec![1]];
        let b = vec![vec![2, 1], vec![3, 0], vec![0], vec![1]];
        assert_eq!(canonical_form(&a), canonical_form(&b));
    }
}
