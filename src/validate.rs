//! Structural validation of adjacency lists
//!
//! Every tree that crosses a storage boundary passes through
//! [`check_adjacency`] before the algorithms see it. The canonicalizer and the
//! expansion engine assume these invariants and never re-check them.

use crate::tree::{canonical_form, CanonicalKey, MAX_DEGREE};
use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// A violated tree invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeDefect {
    /// Adjacency list with no nodes
    #[error("tree has no nodes")]
    Empty,

    /// Node with more neighbours than a carbon atom can bond to
    #[error("node {node} has {degree} neighbours (max 4)")]
    DegreeExceeded {
        /// Offending node
        node: usize,
        /// Its neighbour count
        degree: usize,
    },

    /// Neighbour index outside the node range
    #[error("node {node} lists neighbour {neighbor}, but the tree has {nodes} nodes")]
    NeighborOutOfRange {
        /// Offending node
        node: usize,
        /// The out-of-range index
        neighbor: usize,
        /// Node count of the tree
        nodes: usize,
    },

    /// Node listed as its own neighbour
    #[error("node {node} is its own neighbour")]
    SelfLoop {
        /// Offending node
        node: usize,
    },

    /// Same neighbour listed twice
    #[error("node {node} lists neighbour {neighbor} more than once")]
    RepeatedNeighbor {
        /// Offending node
        node: usize,
        /// The repeated neighbour
        neighbor: usize,
    },

    /// Edge recorded on one side only
    #[error("node {node} lists {neighbor}, but {neighbor} does not list {node}")]
    Asymmetric {
        /// Node holding the one-sided entry
        node: usize,
        /// Node missing the back reference
        neighbor: usize,
    },

    /// Edge count differs from n - 1
    #[error("tree has {edges} edges, expected {expected}")]
    EdgeCount {
        /// Undirected edges found
        edges: usize,
        /// Edges a tree of this size must have
        expected: usize,
    },

    /// More than one connected component
    #[error("tree is not connected ({components} components)")]
    Disconnected {
        /// Number of components found
        components: usize,
    },
}

/// Check that `adjacency` describes a tree with maximum degree 4
///
/// Checks run in order: per-node shape (range, self loops, repeats, degree),
/// mutual adjacency, edge count, connectivity. The first violation wins.
pub fn check_adjacency(adjacency: &[Vec<usize>]) -> Result<(), TreeDefect> {
    let n = adjacency.len();
    if n == 0 {
        return Err(TreeDefect::Empty);
    }

    for (node, neighbors) in adjacency.iter().enumerate() {
        if neighbors.len() > MAX_DEGREE {
            return Err(TreeDefect::DegreeExceeded { node, degree: neighbors.len() });
        }
        for (i, &neighbor) in neighbors.iter().enumerate() {
            if neighbor >= n {
                return Err(TreeDefect::NeighborOutOfRange { node, neighbor, nodes: n });
            }
            if neighbor == node {
                return Err(TreeDefect::SelfLoop { node });
            }
            if neighbors[..i].contains(&neighbor) {
                return Err(TreeDefect::RepeatedNeighbor { node, neighbor });
            }
        }
    }

    for (node, neighbors) in adjacency.iter().enumerate() {
        for &neighbor in neighbors {
            if !adjacency[neighbor].contains(&node) {
                return Err(TreeDefect::Asymmetric { node, neighbor });
            }
        }
    }

    // Symmetric by now, so every edge is counted exactly twice.
    let edges = adjacency.iter().map(Vec::len).sum::<usize>() / 2;
    if edges != n - 1 {
        return Err(TreeDefect::EdgeCount { edges, expected: n - 1 });
    }

    let components = connected_components(&to_graph(adjacency));
    if components != 1 {
        return Err(TreeDefect::Disconnected { components });
    }

    Ok(())
}

/// Build an undirected petgraph view of a symmetric adjacency list
pub(crate) fn to_graph(adjacency: &[Vec<usize>]) -> UnGraph<(), ()> {
    let mut graph = UnGraph::with_capacity(adjacency.len(), adjacency.len());
    let nodes: Vec<_> = (0..adjacency.len()).map(|_| graph.add_node(())).collect();
    for (a, neighbors) in adjacency.iter().enumerate() {
        for &b in neighbors {
            if a < b {
                graph.add_edge(nodes[a], nodes[b], ());
            }
        }
    }
    graph
}

/// Outcome for one entry of a checkpoint payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    /// Position of the entry in the payload
    pub index: usize,
    /// Node count of the entry
    pub nodes: usize,
    /// `Ok` if the entry is a valid tree
    pub outcome: Result<(), TreeDefect>,
}

/// Per-entry validation of a whole checkpoint payload
#[derive(Debug, Clone, Default)]
pub struct PayloadReport {
    entries: Vec<EntryReport>,
}

impl PayloadReport {
    /// All entry reports, in payload order
    pub fn entries(&self) -> &[EntryReport] {
        &self.entries
    }

    /// Number of entries checked
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the payload had no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that failed
    pub fn failures(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|e| e.outcome.is_err())
    }

    /// True if every entry passed
    pub fn is_valid(&self) -> bool {
        self.failures().next().is_none()
    }

    /// First failing entry, if any
    pub fn first_failure(&self) -> Option<&EntryReport> {
        self.failures().next()
    }
}

/// Validate every adjacency list of a decoded checkpoint payload
pub fn check_payload(trees: &[Vec<Vec<usize>>]) -> PayloadReport {
    let entries = trees
        .iter()
        .enumerate()
        .map(|(index, adjacency)| EntryReport {
            index,
            nodes: adjacency.len(),
            outcome: check_adjacency(adjacency),
        })
        .collect();
    PayloadReport { entries }
}

/// Why a checkpoint file cannot be resumed from
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadFault {
    /// Not a JSON array
    #[error("invalid JSON: {0}")]
    Json(String),

    /// Array with no trees
    #[error("no trees stored")]
    Empty,

    /// Entry is not an array of neighbour index arrays
    #[error("entry {index} is not a valid tree: {reason}")]
    Malformed {
        /// Position of the entry
        index: usize,
        /// Parse failure
        reason: String,
    },

    /// Entry parses but violates a tree invariant
    #[error("entry {index} is not a valid tree: {defect}")]
    Defect {
        /// Position of the entry
        index: usize,
        /// Violated invariant
        defect: TreeDefect,
    },

    /// Entry size disagrees with the file's generation size
    #[error("entry {index} has {nodes} nodes, expected {expected}")]
    WrongSize {
        /// Position of the entry
        index: usize,
        /// Node count found
        nodes: usize,
        /// Size taken from the file name
        expected: usize,
    },

    /// Entry is isomorphic to an earlier one
    #[error("entry {index} is isomorphic to entry {first}")]
    Duplicate {
        /// Position of the duplicate
        index: usize,
        /// Earlier entry with the same canonical key
        first: usize,
    },
}

/// Check a raw checkpoint payload the way a resumed run will load it
///
/// Entries are parsed one at a time, so a wrong-typed neighbour is reported
/// against its entry rather than failing the whole file. `expected_size` is
/// the size taken from the file name, when known. Returns the number of trees.
pub fn check_checkpoint(expected_size: Option<usize>, bytes: &[u8]) -> Result<usize, PayloadFault> {
    let entries: Vec<serde_json::Value> =
        serde_json::from_slice(bytes).map_err(|err| PayloadFault::Json(err.to_string()))?;
    if entries.is_empty() {
        return Err(PayloadFault::Empty);
    }

    let mut seen: BTreeMap<CanonicalKey, usize> = BTreeMap::new();
    for (index, value) in entries.into_iter().enumerate() {
        let adjacency: Vec<Vec<usize>> = serde_json::from_value(value)
            .map_err(|err| PayloadFault::Malformed { index, reason: err.to_string() })?;
        check_adjacency(&adjacency).map_err(|defect| PayloadFault::Defect { index, defect })?;
        if let Some(expected) = expected_size {
            if adjacency.len() != expected {
                return Err(PayloadFault::WrongSize {
                    index,
                    nodes: adjacency.len(),
                    expected,
                });
            }
        }
        match seen.entry(canonical_form(&adjacency)) {
            Entry::Occupied(first) => {
                return Err(PayloadFault::Duplicate { index, first: *first.get() });
            }
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
        }
    }

    Ok(seen.len())
}
