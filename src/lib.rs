//! # alkane-isomers: counting CnH2n+2 structural isomers
//!
//! Every structural isomer of an acyclic saturated hydrocarbon is an
//! unlabeled tree whose carbon atoms have at most four neighbours. This
//! library grows those trees one carbon at a time and collapses isomorphic
//! labelings with a canonical form.
//!
//! ## Features
//!
//! - **Canonical form**: center finding plus sorted bracket encoding
//! - **Expansion**: leaf attachment with per-size deduplication, optionally
//!   parallel through rayon
//! - **Checkpoints**: resumable on-disk generations with atomic publish
//! - **Validation**: structural checks for persisted adjacency lists

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Unrooted trees and their canonical form
pub mod tree;

/// Deduplicated generations and the expansion engine
pub mod generation;

/// Persisted generations
pub mod checkpoint;

/// Structural validation of adjacency lists
pub mod validate;

/// Run configuration
pub mod config;

/// Utility functions and helpers
pub mod utils;

// Re-export commonly used types
pub use tree::{canonical_form, CanonicalKey, Tree, TreeBuilder, MAX_DEGREE};
pub use generation::{expand, expand_with, Enumerator, ExpandOptions, Generation, RunReport};
pub use checkpoint::{CheckpointError, CheckpointStore, DirStore, MemoryStore};
pub use validate::TreeDefect;
pub use config::EnumerationConfig;

/// Error types for the library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested carbon count is not a positive integer
    #[error("Invalid target size {0}: n must be >= 1")]
    InvalidTarget(usize),

    /// Tree added to a generation of a different size
    #[error("Size mismatch: expected a tree of {expected} nodes, found {found}")]
    SizeMismatch {
        /// Node count of the generation
        expected: usize,
        /// Node count of the offending tree
        found: usize,
    },

    /// Invalid tree structure
    #[error("Invalid tree: {0}")]
    InvalidTree(#[from] TreeDefect),

    /// Checkpoint storage failure
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error outside the checkpoint store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error outside the checkpoint store
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        checkpoint::{CheckpointStore, DirStore, MemoryStore},
        config::EnumerationConfig,
        generation::{expand, Enumerator, ExpandOptions, Generation},
        tree::{canonical_form, CanonicalKey, Tree, TreeBuilder},
        Error, Result,
    };
}
