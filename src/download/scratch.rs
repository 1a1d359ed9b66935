//! Scratch directory and RAII-owned temporary assets.
//!
//! Every per-request file (cover art, audio) is a [`TempAsset`] whose `Drop`
//! removes the file. Success, expected failure and unwind all release it,
//! so no pipeline exit path can leak scratch files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::config;

/// The ephemeral directory holding per-request media files.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    /// Opens the configured scratch directory, creating it if absent.
    pub fn from_config() -> io::Result<Self> {
        Self::new(config::SCRATCH_DIR.as_str())
    }

    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reserves a file name inside the scratch directory. Nothing is created
    /// on disk yet; the returned guard removes the file on drop if it exists.
    pub fn asset(&self, file_name: &str) -> TempAsset {
        TempAsset {
            path: self.root.join(file_name),
        }
    }
}

/// Guard owning one temporary file.
#[derive(Debug)]
pub struct TempAsset {
    path: PathBuf,
}

impl TempAsset {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Drop for TempAsset {
    fn drop(&mut self) {
        if self.path.exists() {
            match fs::remove_file(&self.path) {
                Ok(()) => log::debug!("Removed temp asset {}", self.path.display()),
                Err(e) => log::warn!("Failed to remove temp asset {}: {}", self.path.display(), e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::new(dir.path()).unwrap();

        let asset = scratch.asset("song_1700000000.mp3");
        fs::write(asset.path(), b"audio bytes").unwrap();
        assert!(asset.exists());

        let path = asset.path().to_path_buf();
        drop(asset);
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritten_asset_drop_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::new(dir.path()).unwrap();

        // Never written to disk; dropping must not panic or create anything.
        let asset = scratch.asset("never_created.jpg");
        assert!(!asset.exists());
        drop(asset);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_new_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let scratch = ScratchDir::new(&nested).unwrap();
        assert!(scratch.root().is_dir());
    }
}
