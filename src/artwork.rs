//! Bezel artwork storage.

use crate::{Error, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Resolves a profile's artwork reference to raw encoded bytes.
pub trait ArtworkStore: Send + Sync {
    /// Read the bytes stored at `path`, or fail with [`Error::ArtworkNotFound`].
    fn read(&self, path: &str) -> Result<Vec<u8>>;
}

/// Artwork read from a directory on disk
#[derive(Debug, Clone)]
pub struct DirArtworkStore {
    root: PathBuf,
}

impl DirArtworkStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl ArtworkStore for DirArtworkStore {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.root.join(path);
        std::fs::read(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ArtworkNotFound(full.display().to_string()),
            _ => Error::Io(e),
        })
    }
}

/// Artwork held in memory, keyed by reference
#[derive(Debug, Clone, Default)]
pub struct MemoryArtworkStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryArtworkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(path.into(), bytes);
    }

    pub fn with(mut self, path: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl ArtworkStore for MemoryArtworkStore {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.entries
            .get(path)
            .cloned()
            .ok_or_else(|| Error::ArtworkNotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip_and_miss() {
        let store = MemoryArtworkStore::new().with("a.png", vec![1, 2, 3]);
        assert_eq!(store.read("a.png").unwrap(), vec![1, 2, 3]);
        assert!(matches!(store.read("b.png"), Err(Error::ArtworkNotFound(_))));
    }

    #[test]
    fn dir_store_reads_relative_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("devices")).unwrap();
        std::fs::write(dir.path().join("devices/frame.png"), b"frame").unwrap();

        let store = DirArtworkStore::new(dir.path());
        assert_eq!(store.read("devices/frame.png").unwrap(), b"frame".to_vec());
        match store.read("devices/missing.png") {
            Err(Error::ArtworkNotFound(p)) => assert!(p.ends_with("missing.png")),
            other => panic!("expected ArtworkNotFound, got {:?}", other),
        }
    }
}
