//! Unrooted tree data structure and operations

use super::canonical::{self, CanonicalKey};
use super::MAX_DEGREE;
use crate::validate::{check_adjacency, TreeDefect};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;

/// An unrooted tree stored as a symmetric adjacency list
///
/// - Node identity is the index into the adjacency list
/// - `j` is a neighbour of `i` iff `i` is a neighbour of `j`
/// - Connected, acyclic, every node has at most [`MAX_DEGREE`] neighbours
///
/// Trees are immutable: growth operations return a new tree.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<usize>>", into = "Vec<Vec<usize>>")]
pub struct Tree {
    adjacency: Vec<Vec<usize>>,
}

impl Tree {
    /// Create a tree with a single node (methane)
    pub fn new() -> Self {
        Tree {
            adjacency: vec![Vec::new()],
        }
    }

    /// Create a tree from an adjacency list, checking every tree invariant
    pub fn from_adjacency(adjacency: Vec<Vec<usize>>) -> crate::Result<Self> {
        check_adjacency(&adjacency)?;
        Ok(Tree { adjacency })
    }

    /// Get the number of nodes
    pub fn size(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges (always `size() - 1`)
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Get neighbours of a node
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    /// Get the degree of a node
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Largest degree in the tree
    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Borrow the adjacency list
    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    /// Consume the tree, returning its adjacency list
    pub fn into_adjacency(self) -> Vec<Vec<usize>> {
        self.adjacency
    }

    /// Undirected edges as `(a, b)` pairs with `a < b`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, neighbors)| neighbors.iter().filter(move |&&b| a < b).map(move |&b| (a, b)))
    }

    /// Nodes that can take one more neighbour
    pub fn attachment_points(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.size()).filter(|&node| self.degree(node) < MAX_DEGREE)
    }

    /// New tree with an extra leaf bonded to `node`
    ///
    /// The leaf gets index `size()`. Returns `None` if `node` is out of range
    /// or already has [`MAX_DEGREE`] neighbours.
    pub fn with_leaf_at(&self, node: usize) -> Option<Tree> {
        if node >= self.size() || self.degree(node) >= MAX_DEGREE {
            return None;
        }

        let leaf = self.size();
        let mut adjacency = self.adjacency.clone();
        adjacency[node].push(leaf);
        adjacency.push(vec![node]);
        Some(Tree { adjacency })
    }

    /// Every tree obtained by attaching one leaf at a node with headroom
    pub fn graft_all_leaves(&self) -> Vec<Tree> {
        self.attachment_points()
            .filter_map(|node| self.with_leaf_at(node))
            .collect()
    }

    /// Rename node `i` to `permutation[i]`
    ///
    /// Returns `None` if `permutation` is not a permutation of `0..size()`.
    pub fn relabel(&self, permutation: &[usize]) -> Option<Tree> {
        let n = self.size();
        if permutation.len() != n {
            return None;
        }
        let mut seen = vec![false; n];
        for &target in permutation {
            if target >= n || seen[target] {
                return None;
            }
            seen[target] = true;
        }

        let mut adjacency = vec![Vec::new(); n];
        for (old, neighbors) in self.adjacency.iter().enumerate() {
            adjacency[permutation[old]] = neighbors.iter().map(|&j| permutation[j]).collect();
        }
        Some(Tree { adjacency })
    }

    /// Compute the canonical key of this tree
    pub fn canonical_form(&self) -> CanonicalKey {
        canonical::canonical_form(&self.adjacency)
    }

    /// Check if this tree is isomorphic to another
    pub fn is_isomorphic(&self, other: &Tree) -> bool {
        if self.size() != other.size() {
            return false;
        }
        self.canonical_form() == other.canonical_form()
    }

    /// Center node(s) of the tree
    pub fn centers(&self) -> Vec<usize> {
        canonical::centers(&self.adjacency)
    }

    /// Distance (in edges) from `root` to every node
    pub fn distances_from(&self, root: usize) -> Vec<usize> {
        let mut distances = vec![usize::MAX; self.size()];
        let mut queue = VecDeque::new();
        distances[root] = 0;
        queue.push_back(root);

        while let Some(node) = queue.pop_front() {
            for &next in &self.adjacency[node] {
                if distances[next] == usize::MAX {
                    distances[next] = distances[node] + 1;
                    queue.push_back(next);
                }
            }
        }

        distances
    }

    /// Length of the longest path, in edges
    pub fn diameter(&self) -> usize {
        let first = self.distances_from(0);
        let far = first
            .iter()
            .enumerate()
            .max_by_key(|&(_, &d)| d)
            .map(|(node, _)| node)
            .unwrap_or(0);
        self.distances_from(far).into_iter().max().unwrap_or(0)
    }

    /// Count of leaf nodes (terminal methyl groups)
    pub fn leaf_count(&self) -> usize {
        self.adjacency.iter().filter(|neighbors| neighbors.len() <= 1).count()
    }
}

impl TryFrom<Vec<Vec<usize>>> for Tree {
    type Error = TreeDefect;

    fn try_from(adjacency: Vec<Vec<usize>>) -> Result<Self, Self::Error> {
        check_adjacency(&adjacency)?;
        Ok(Tree { adjacency })
    }
}

impl From<Tree> for Vec<Vec<usize>> {
    fn from(tree: Tree) -> Self {
        tree.adjacency
    }
}

/// Total ordering for trees (size, then lexicographic on adjacency lists)
impl Ord for Tree {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.size().cmp(&other.size()) {
            Ordering::Equal => self.adjacency.cmp(&other.adjacency),
            other => other,
        }
    }
}

impl PartialOrd for Tree {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Tree {
    fn fmt_recursive(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: usize,
        parent: Option<usize>,
        indent: usize,
    ) -> fmt::Result {
        for _ in 0..indent {
            write!(f, "  ")?;
        }
        writeln!(f, "● C{}", node)?;

        for &next in &self.adjacency[node] {
            if Some(next) != parent {
                self.fmt_recursive(f, next, Some(node), indent + 1)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tree(size={})", self.size())?;
        match self.centers().first() {
            Some(&root) => self.fmt_recursive(f, root, None, 0),
            None => Ok(()),
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing trees edge by edge
pub struct TreeBuilder {
    adjacency: Vec<Vec<usize>>,
}

impl TreeBuilder {
    /// Create a new builder starting with a single node
    pub fn new() -> Self {
        TreeBuilder {
            adjacency: vec![Vec::new()],
        }
    }

    /// Bond two nodes, growing the node range as needed
    pub fn add_edge(&mut self, a: usize, b: usize) -> &mut Self {
        let needed = a.max(b) + 1;
        if self.adjacency.len() < needed {
            self.adjacency.resize(needed, Vec::new());
        }

        self.adjacency[a].push(b);
        if a != b {
            self.adjacency[b].push(a);
        }
        self
    }

    /// Build the tree, checking every tree invariant
    pub fn build(&self) -> crate::Result<Tree> {
        Tree::from_adjacency(self.adjacency.clone())
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
