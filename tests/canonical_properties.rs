//! Property tests for the canonical form

use alkane_isomers::utils::{random_relabel, random_tree};
use alkane_isomers::{canonical_form, Tree};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn tree_from_seed(size: usize, seed: u64) -> Tree {
    let mut rng = StdRng::seed_from_u64(seed);
    random_tree(size, &mut rng).unwrap()
}

proptest! {
    #[test]
    fn relabeling_keeps_key(size in 1usize..=16, seed in any::<u64>(), relabel_seed in any::<u64>()) {
        let tree = tree_from_seed(size, seed);
        let mut rng = StdRng::seed_from_u64(relabel_seed);
        let relabeled = random_relabel(&tree, &mut rng);
        prop_assert_eq!(tree.canonical_form(), relabeled.canonical_form());
    }

    #[test]
    fn neighbor_order_is_irrelevant(size in 2usize..=16, seed in any::<u64>()) {
        let tree = tree_from_seed(size, seed);
        let reversed: Vec<Vec<usize>> = tree
            .adjacency()
            .iter()
            .map(|neighbors| neighbors.iter().rev().copied().collect())
            .collect();
        prop_assert_eq!(canonical_form(&reversed), tree.canonical_form());
    }

    #[test]
    fn center_count_follows_diameter(size in 1usize..=16, seed in any::<u64>()) {
        let tree = tree_from_seed(size, seed);
        let expected = if tree.diameter() % 2 == 0 { 1 } else { 2 };
        prop_assert_eq!(tree.centers().len(), expected);
    }

    #[test]
    fn key_length_tracks_size(size in 1usize..=16, seed in any::<u64>()) {
        // every node contributes exactly one bracket pair
        let tree = tree_from_seed(size, seed);
        prop_assert_eq!(tree.canonical_form().len(), 2 * size);
    }
}
