//! Checkpoint store backed by a directory of `size_<n>.json` files

use super::{decode, encode, file_name, parse_file_name, CheckpointError, CheckpointStore};
use crate::generation::Generation;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory of checkpoint files
///
/// Writes go to a temp file in the same directory, are fsynced, and are then
/// renamed over the final name. A crash mid-write leaves at most a stray temp
/// file, which `load` and `sizes` never look at.
#[derive(Clone, Debug)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Store rooted at `dir`; the directory is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirStore { dir: dir.into() }
    }

    /// Directory holding the checkpoints
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the checkpoint for `size`
    pub fn path_for(&self, size: usize) -> PathBuf {
        self.dir.join(file_name(size))
    }
}

impl CheckpointStore for DirStore {
    fn load(&self, size: usize) -> Result<Option<Generation>, CheckpointError> {
        let path = self.path_for(size);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(io_err(&path, source)),
        };
        debug!(path = %path.display(), bytes = bytes.len(), "checkpoint read");
        decode(size, &bytes).map(Some)
    }

    fn save(&mut self, generation: &Generation) -> Result<(), CheckpointError> {
        fs::create_dir_all(&self.dir).map_err(|source| io_err(&self.dir, source))?;

        let payload = encode(generation)?;
        let final_path = self.path_for(generation.size());

        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", file_name(generation.size())))
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(|source| io_err(&self.dir, source))?;
        tmp.write_all(&payload)
            .map_err(|source| io_err(tmp.path(), source))?;
        tmp.as_file()
            .sync_all()
            .map_err(|source| io_err(tmp.path(), source))?;
        tmp.persist(&final_path)
            .map_err(|err| io_err(&final_path, err.error))?;
        fsync_dir(&self.dir)?;

        debug!(
            path = %final_path.display(),
            bytes = payload.len(),
            trees = generation.len(),
            "checkpoint published"
        );
        Ok(())
    }

    fn sizes(&self) -> Result<Vec<usize>, CheckpointError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(io_err(&self.dir, source)),
        };

        let mut sizes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| io_err(&self.dir, source))?;
            if let Some(size) = entry.file_name().to_str().and_then(parse_file_name) {
                sizes.push(size);
            }
        }
        sizes.sort_unstable();
        Ok(sizes)
    }
}

fn io_err(path: &Path, source: std::io::Error) -> CheckpointError {
    CheckpointError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(unix)]
fn fsync_dir(path: &Path) -> Result<(), CheckpointError> {
    let dir = File::open(path).map_err(|source| io_err(path, source))?;
    dir.sync_all().map_err(|source| io_err(path, source))?;
    Ok(())
}

#[cfg(not(unix))]
fn fsync_dir(_path: &Path) -> Result<(), CheckpointError> {
    Ok(())
}
