//! Filesystem access for a target project
//!
//! The engine only needs four operations on the user's project, all taking
//! project-relative paths. `DiskFs` performs them under a project root; tests
//! substitute their own implementation to observe or fail writes.

use std::io;
use std::path::{Path, PathBuf};

/// Narrow view of the project directory used by the installer and differ
pub trait ProjectFs {
    fn exists(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Replace the whole file with `content`
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// `ProjectFs` backed by the real filesystem under `root`
#[derive(Debug, Clone)]
pub struct DiskFs {
    root: PathBuf,
}

impl DiskFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute location of a project-relative path
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl ProjectFs for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(self.resolve(path))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(self.resolve(path), content)
    }

    /// Invalid UTF-8 is replaced rather than rejected
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = std::fs::read(self.resolve(path))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
