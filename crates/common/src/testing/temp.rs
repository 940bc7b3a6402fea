//! Scratch directory for throwaway databases and workspace files

use std::path::{Path, PathBuf};
use std::{fs, io};

/// Directory under the system temp dir, removed with its contents on drop.
///
/// ```rust,ignore
/// let dir = TempDir::new("qs-doc")?;
/// let files = dir.create_files(&["notes.md", "report.pdf"])?;
/// ```
#[derive(Debug)]
pub struct TempDir {
    root: PathBuf,
}

impl TempDir {
    /// `<tmp>/<prefix>-<uuid>`, created immediately.
    pub fn new(prefix: &str) -> io::Result<Self> {
        let root = std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn create_file(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Empty files, returned as path strings in the order named. This is the
    /// shape workspace file lists are stored in.
    pub fn create_files(&self, names: &[&str]) -> io::Result<Vec<String>> {
        let mut paths = Vec::with_capacity(names.len());
        for name in names {
            paths.push(self.create_file(name, "")?.to_string_lossy().into_owned());
        }
        Ok(paths)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
