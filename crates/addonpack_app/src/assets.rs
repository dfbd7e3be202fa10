//! Bundled asset access.
//!
//! On desktop the pack ships next to the binary as a plain directory; on
//! Android it lives inside the APK and is listed by a generated
//! `files.txt` manifest. Both are exposed through [`AssetSource`] so the
//! installer never cares where the bytes come from.

use std::io;
use std::path::{Path, PathBuf};

/// A read-only collection of named assets. Names use forward slashes
/// regardless of the host platform.
pub trait AssetSource {
    /// Every asset name in the collection.
    fn list(&self) -> &[String];

    /// Loads one asset fully into memory.
    fn load(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Assets read from a directory tree on disk.
pub struct DirAssets {
    root: PathBuf,
    names: Vec<String>,
}

impl DirAssets {
    /// Walks `root` and records every file underneath it, relative to
    /// `root` with forward slashes.
    pub fn open(root: &Path) -> io::Result<Self> {
        let mut names = Vec::new();
        collect_files(root, Path::new(""), &mut names)?;
        names.sort();
        Ok(Self {
            root: root.to_path_buf(),
            names,
        })
    }
}

fn collect_files(root: &Path, rel: &Path, out: &mut Vec<String>) -> io::Result<()> {
    for entry in std::fs::read_dir(root.join(rel))? {
        let entry = entry?;
        let child = rel.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            collect_files(root, &child, out)?;
        } else {
            let name = child
                .to_string_lossy()
                .replace(std::path::MAIN_SEPARATOR, "/");
            out.push(name);
        }
    }
    Ok(())
}

impl AssetSource for DirAssets {
    fn list(&self) -> &[String] {
        &self.names
    }

    fn load(&self, name: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(name))
    }
}

/// An in-memory asset collection, used in tests and tooling.
pub struct MemoryAssets {
    names: Vec<String>,
    entries: Vec<(String, Vec<u8>)>,
}

impl MemoryAssets {
    pub fn new(entries: Vec<(String, Vec<u8>)>) -> Self {
        let names = entries.iter().map(|(name, _)| name.clone()).collect();
        Self { names, entries }
    }
}

impl AssetSource for MemoryAssets {
    fn list(&self) -> &[String] {
        &self.names
    }

    fn load(&self, name: &str) -> io::Result<Vec<u8>> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no asset {name}")))
    }
}
