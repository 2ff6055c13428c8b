//! Persisted generations, addressed by node count
//!
//! A checkpoint is the JSON payload `[[[neighbours of node 0], ...], ...]`:
//! one adjacency list per tree of the generation. Decoding checks every entry
//! against the tree invariants, so a resumed run never expands from a
//! malformed tree.

mod dir;
mod memory;

pub use dir::DirStore;
pub use memory::MemoryStore;

use crate::generation::Generation;
use crate::tree::Tree;
use crate::validate::TreeDefect;
use std::path::PathBuf;
use thiserror::Error;

const FILE_PREFIX: &str = "size_";
const FILE_SUFFIX: &str = ".json";

/// Storage for completed generations
///
/// `load` distinguishes "nothing stored for this size" (`Ok(None)`) from a
/// stored payload that cannot be trusted (`Err`).
pub trait CheckpointStore {
    /// Fetch the generation stored for `size`
    fn load(&self, size: usize) -> Result<Option<Generation>, CheckpointError>;

    /// Store a completed generation under its size, replacing any previous one
    fn save(&mut self, generation: &Generation) -> Result<(), CheckpointError>;

    /// Sizes with a stored checkpoint, ascending
    fn sizes(&self) -> Result<Vec<usize>, CheckpointError>;
}

/// Failures at the checkpoint boundary
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Filesystem failure
    #[error("checkpoint I/O error at {}: {source}", .path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Payload is not a well-formed list of adjacency lists
    #[error("checkpoint for size {size} is corrupt: {reason}")]
    Corrupt {
        /// Generation size
        size: usize,
        /// What failed to parse
        reason: String,
    },

    /// Payload parses but an entry is not a valid tree
    #[error("checkpoint for size {size}, entry {entry}: {defect}")]
    Integrity {
        /// Generation size
        size: usize,
        /// Index of the bad entry
        entry: usize,
        /// Violated invariant
        defect: TreeDefect,
    },

    /// Entry has the wrong number of nodes for its checkpoint
    #[error("checkpoint for size {size}, entry {entry} has {nodes} nodes")]
    WrongSize {
        /// Generation size
        size: usize,
        /// Index of the bad entry
        entry: usize,
        /// Node count found
        nodes: usize,
    },

    /// Entry is isomorphic to an earlier one
    #[error("checkpoint for size {size}, entry {entry} duplicates an earlier isomer")]
    DuplicateIsomer {
        /// Generation size
        size: usize,
        /// Index of the duplicate
        entry: usize,
    },

    /// Generation could not be serialized
    #[error("failed to encode checkpoint for size {size}: {source}")]
    Encode {
        /// Generation size
        size: usize,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

/// File name of the checkpoint for `size`
pub fn file_name(size: usize) -> String {
    format!("{FILE_PREFIX}{size}{FILE_SUFFIX}")
}

/// Size encoded in a checkpoint file name, if it is one
///
/// Only names that [`file_name`] would produce are accepted, so `size_04.json`
/// is not a checkpoint.
pub fn parse_file_name(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

/// Serialize a generation to the checkpoint payload
pub fn encode(generation: &Generation) -> Result<Vec<u8>, CheckpointError> {
    serde_json::to_vec(&generation.to_adjacency_lists()).map_err(|source| CheckpointError::Encode {
        size: generation.size(),
        source,
    })
}

/// Parse a checkpoint payload without checking tree invariants
pub fn decode_raw(size: usize, bytes: &[u8]) -> Result<Vec<Vec<Vec<usize>>>, CheckpointError> {
    serde_json::from_slice(bytes).map_err(|err| CheckpointError::Corrupt {
        size,
        reason: err.to_string(),
    })
}

/// Parse and check a checkpoint payload for generation `size`
pub fn decode(size: usize, bytes: &[u8]) -> Result<Generation, CheckpointError> {
    let payload = decode_raw(size, bytes)?;
    if payload.is_empty() {
        return Err(CheckpointError::Corrupt {
            size,
            reason: "no trees stored".to_string(),
        });
    }

    let mut generation = Generation::empty(size);
    for (entry, adjacency) in payload.into_iter().enumerate() {
        if adjacency.len() != size {
            return Err(CheckpointError::WrongSize {
                size,
                entry,
                nodes: adjacency.len(),
            });
        }
        let tree = Tree::try_from(adjacency)
            .map_err(|defect| CheckpointError::Integrity { size, entry, defect })?;
        let key = tree.canonical_form();
        if !generation.offer(key, tree) {
            return Err(CheckpointError::DuplicateIsomer { size, entry });
        }
    }

    Ok(generation)
}
