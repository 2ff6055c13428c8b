//! Unrooted trees with bounded degree and their canonical form

mod canonical;
mod unrooted;

pub use canonical::{canonical_form, centers, rooted_encoding, CanonicalKey};
pub use unrooted::{Tree, TreeBuilder};

/// Maximum number of neighbours of a node (carbon valence)
pub const MAX_DEGREE: usize = 4;
