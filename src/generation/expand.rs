//! Expansion: grow every tree by one leaf and collapse isomorphic results

use super::Generation;
use crate::tree::Tree;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How [`expand_with`] spreads its work
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandOptions {
    /// Allow rayon to split source trees across worker threads
    pub parallel: bool,
    /// Generations with at most this many trees are expanded sequentially
    pub parallel_threshold: usize,
}

impl ExpandOptions {
    /// Options that never leave the calling thread
    pub fn sequential() -> Self {
        ExpandOptions {
            parallel: false,
            ..Self::default()
        }
    }
}

impl Default for ExpandOptions {
    fn default() -> Self {
        ExpandOptions {
            parallel: true,
            parallel_threshold: 64,
        }
    }
}

/// Expand a generation of size k into the generation of size k + 1
pub fn expand(generation: &Generation) -> Generation {
    expand_with(generation, &ExpandOptions::default())
}

/// Expand with explicit options
///
/// Every tree contributes one candidate per node with free valence. The
/// candidates are keyed by canonical form; among isomorphic candidates the
/// smallest labeled tree is kept, so the result does not depend on the order
/// in which workers finish.
pub fn expand_with(generation: &Generation, options: &ExpandOptions) -> Generation {
    let next_size = generation.size() + 1;
    let use_parallel = options.parallel && generation.len() > options.parallel_threshold;

    if use_parallel {
        let sources: Vec<&Tree> = generation.trees().collect();
        sources
            .par_iter()
            .fold(
                || Generation::empty(next_size),
                |mut partial, tree| {
                    grow_into(&mut partial, tree);
                    partial
                },
            )
            .reduce(
                || Generation::empty(next_size),
                |mut left, right| {
                    left.merge(right);
                    left
                },
            )
    } else {
        let mut next = Generation::empty(next_size);
        for tree in generation.trees() {
            grow_into(&mut next, tree);
        }
        next
    }
}

fn grow_into(next: &mut Generation, tree: &Tree) {
    for candidate in tree.graft_all_leaves() {
        let key = candidate.canonical_form();
        next.offer(key, candidate);
    }
}
