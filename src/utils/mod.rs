//! Utility functions for alkane-isomers

use crate::tree::Tree;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::ops::Range;
use std::path::Path;

/// Save object to JSON file
pub fn save_json<T: Serialize>(obj: &T, path: impl AsRef<Path>) -> crate::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, obj)?;
    writer.flush()?;
    Ok(())
}

/// Load object from JSON file
pub fn load_json<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> crate::Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Generate a random tree of given size with degree at most 4
///
/// Grows from a single node by attaching each new leaf at a uniformly chosen
/// node that still has free valence. Returns `None` for size 0.
pub fn random_tree<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Option<Tree> {
    if size == 0 {
        return None;
    }

    let mut tree = Tree::new();
    while tree.size() < size {
        let points: Vec<usize> = tree.attachment_points().collect();
        let node = *points.choose(rng)?;
        tree = tree.with_leaf_at(node)?;
    }
    Some(tree)
}

/// Same tree under a uniformly random renaming of its nodes
pub fn random_relabel<R: Rng + ?Sized>(tree: &Tree, rng: &mut R) -> Tree {
    let mut permutation: Vec<usize> = (0..tree.size()).collect();
    permutation.shuffle(rng);
    tree.relabel(&permutation).unwrap_or_else(|| tree.clone())
}

/// Index range of 1-based `page` when `total` items are split into pages
///
/// Returns `None` for a zero page size or a page past the end. Page 1 of an
/// empty list is the empty range.
pub fn page_range(total: usize, page: usize, page_size: usize) -> Option<Range<usize>> {
    if page_size == 0 || page == 0 {
        return None;
    }
    let start = (page - 1).checked_mul(page_size)?;
    if start >= total && !(total == 0 && page == 1) {
        return None;
    }
    Some(start..total.min(start + page_size))
}

/// Number of pages needed for `total` items
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size).max(1)
}

/// Logging setup for binaries
pub mod logging {
    use tracing_subscriber::{fmt, EnvFilter};

    /// Install a fmt subscriber filtered by `RUST_LOG`, falling back to `level`
    pub fn init_logging(level: &str) -> crate::Result<()> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(level)
                .map_err(|e| crate::Error::Config(format!("Invalid log level: {e}")))?,
        };
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|_| crate::Error::Config("Logging already initialized".into()))
    }
}

/// Timing utilities
pub mod timing {
    use std::time::{Duration, Instant};
    use tracing::debug;

    /// Simple timer that reports on drop
    pub struct Timer {
        start: Instant,
        name: String,
    }

    impl Timer {
        /// Start new timer
        pub fn new(name: &str) -> Self {
            Timer {
                start: Instant::now(),
                name: name.to_string(),
            }
        }

        /// Get elapsed time
        pub fn elapsed(&self) -> Duration {
            self.start.elapsed()
        }

        /// Elapsed time formatted as seconds with millisecond precision
        pub fn display(&self) -> String {
            format!("{}: {:.3}s", self.name, self.elapsed().as_secs_f64())
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            debug!(timer = %self.name, elapsed_ms = self.elapsed().as_millis() as u64, "timer finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MAX_DEGREE;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    #[test]
    fn test_random_tree() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(random_tree(0, &mut rng).is_none());
        for size in 1..=12 {
            let tree = random_tree(size, &mut rng).unwrap();
            assert_eq!(tree.size(), size);
            assert!(tree.max_degree() <= MAX_DEGREE);
        }
    }

    #[test]
    fn test_random_relabel_preserves_shape() {
        let mut rng = StdRng::seed_from_u64(11);
        let tree = random_tree(9, &mut rng).unwrap();
        let relabeled = random_relabel(&tree, &mut rng);
        assert_eq!(relabeled.size(), tree.size());
        assert_eq!(relabeled.canonical_form(), tree.canonical_form());
    }

    #[test]
    fn test_json_serialization() {
        let mut rng = StdRng::seed_from_u64(3);
        let tree = random_tree(6, &mut rng).unwrap();
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tree.json");

        save_json(&tree, &path).unwrap();
        let loaded: Tree = load_json(&path).unwrap();

        assert_eq!(tree, loaded);
    }

    #[test]
    fn test_pages() {
        assert_eq!(page_range(10, 1, 4), Some(0..4));
        assert_eq!(page_range(10, 3, 4), Some(8..10));
        assert_eq!(page_range(10, 4, 4), None);
        assert_eq!(page_range(0, 1, 4), Some(0..0));
        assert_eq!(page_range(10, 0, 4), None);
        assert_eq!(page_range(10, 1, 0), None);

        assert_eq!(page_count(10, 4), 3);
        assert_eq!(page_count(8, 4), 2);
        assert_eq!(page_count(0, 4), 1);
    }
}
