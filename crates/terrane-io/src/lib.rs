//! Chunk persistence: raw chunk files keyed by lattice coordinate.
#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use terrane_world::ChunkCoord;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write chunk {coord:?} to {path}: {source}")]
    Write {
        coord: ChunkCoord,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create chunk directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Byte-level chunk storage. `load` never fails: a missing or unreadable
/// entry is `None` and the caller regenerates.
pub trait ChunkStore: Send + Sync {
    fn load(&self, coord: ChunkCoord) -> Option<Vec<u8>>;
    fn save(&self, coord: ChunkCoord, bytes: &[u8]) -> Result<(), StoreError>;
}

/// One file per chunk under a directory.
#[derive(Clone, Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StoreError::CreateDir {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn chunk_path(&self, coord: ChunkCoord) -> PathBuf {
        self.root
            .join(format!("chunk_{}_{}_{}.bin", coord.cx, coord.cy, coord.cz))
    }
}

impl ChunkStore for DirStore {
    fn load(&self, coord: ChunkCoord) -> Option<Vec<u8>> {
        let path = self.chunk_path(coord);
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!(target: "store", "no chunk file for {:?}", coord);
                None
            }
            Err(e) => {
                log::warn!(target: "store", "unreadable chunk file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn save(&self, coord: ChunkCoord, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.chunk_path(coord);
        // Readers never observe a partial file.
        let tmp = path.with_extension("tmp");
        let wrap = |source| StoreError::Write {
            coord,
            path: path.clone(),
            source,
        };
        fs::write(&tmp, bytes).map_err(wrap)?;
        fs::rename(&tmp, &path).map_err(wrap)?;
        log::debug!(target: "store", "saved {:?} ({} bytes)", coord, bytes.len());
        Ok(())
    }
}

/// In-memory store for tests and ephemeral worlds.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<ChunkCoord, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A writer that panicked mid-insert leaves the map in a valid state.
    fn files(&self) -> MutexGuard<'_, HashMap<ChunkCoord, Vec<u8>>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.files().contains_key(&coord)
    }

    /// Replaces an entry directly, e.g. to simulate a damaged file.
    pub fn insert_raw(&self, coord: ChunkCoord, bytes: Vec<u8>) {
        self.files().insert(coord, bytes);
    }
}

impl ChunkStore for MemoryStore {
    fn load(&self, coord: ChunkCoord) -> Option<Vec<u8>> {
        self.files().get(&coord).cloned()
    }

    fn save(&self, coord: ChunkCoord, bytes: &[u8]) -> Result<(), StoreError> {
        self.files().insert(coord, bytes.to_vec());
        Ok(())
    }
}

/// Store that keeps nothing; every load misses.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStore;

impl ChunkStore for NullStore {
    fn load(&self, _coord: ChunkCoord) -> Option<Vec<u8>> {
        None
    }

    fn save(&self, _coord: ChunkCoord, _bytes: &[u8]) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn memory_store_keeps_writing_after_a_panicked_holder() {
        let store = Arc::new(MemoryStore::new());
        let c = ChunkCoord::new(0, 1, 0);
        store.save(c, b"before").unwrap();

        let held = Arc::clone(&store);
        let res = std::thread::spawn(move || {
            let _guard = held.files.lock().unwrap();
            panic!("holder panicked");
        })
        .join();
        assert!(res.is_err());
        assert!(store.files.is_poisoned());

        store.save(c, b"after").unwrap();
        assert_eq!(store.load(c).as_deref(), Some(&b"after"[..]));
        assert_eq!(store.len(), 1);
    }
}
