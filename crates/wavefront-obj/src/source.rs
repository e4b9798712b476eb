//! Stream collaborators: where the primary OBJ stream and its `mtllib`
//! references come from.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// Opens named resources as buffered character streams.
pub trait StreamSource {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead + '_>>;

    /// Directory that relative names resolve against, if any.
    fn directory(&self) -> Option<&Path>;
}

/// Opens files, resolving relative names against a base directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    base_path: PathBuf,
}

impl FileSource {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// A source rooted at the directory containing `file`.
    pub fn for_file(file: &Path) -> Self {
        let base = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::new(base)
    }

    /// Resolve a relative name against the base path.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

impl StreamSource for FileSource {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::open(self.resolve(name))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn directory(&self) -> Option<&Path> {
        Some(&self.base_path)
    }
}

/// Named in-memory documents.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(name.into(), text.into());
    }
}

impl StreamSource for MemorySource {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead + '_>> {
        match self.documents.get(name) {
            Some(text) => Ok(Box::new(Cursor::new(text.as_bytes()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no document named '{name}'"),
            )),
        }
    }

    fn directory(&self) -> Option<&Path> {
        None
    }
}
