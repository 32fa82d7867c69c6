use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::warn;

/// Anything that can hand back the raw bytes of a saved page by name.
pub trait PageSource {
    fn read(&self, identifier: &str) -> io::Result<Vec<u8>>;
}

/// Saved pages living as flat files in one directory.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File names directly under the root (no recursion), sorted.
    /// When `pattern` is given only matching names are kept.
    pub fn list(&self, pattern: Option<&Regex>) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list {:?}", self.root))?;

        let mut names = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            // follows symlinks
            if !entry.path().is_file() {
                continue;
            }
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(file = ?raw, "skipping file with non UTF-8 name");
                    continue;
                }
            };
            if pattern.map(|re| re.is_match(&name)).unwrap_or(true) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

impl PageSource for DirSource {
    fn read(&self, identifier: &str) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(identifier))
    }
}

#[cfg(test)]
pub mod memory {
    use super::PageSource;
    use std::collections::HashMap;
    use std::io;

    /// In-memory pages keyed by identifier.
    #[derive(Default)]
    pub struct MemorySource {
        pages: HashMap<String, Vec<u8>>,
    }

    impl MemorySource {
        pub fn with(mut self, id: &str, body: impl Into<Vec<u8>>) -> Self {
            self.pages.insert(id.to_string(), body.into());
            self
        }
    }

    impl PageSource for MemorySource {
        fn read(&self, identifier: &str) -> io::Result<Vec<u8>> {
            self.pages
                .get(identifier)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, identifier.to_string()))
        }
    }
}
