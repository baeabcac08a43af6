//! OBJ/MTL to binary mesh conversion
//!
//! This crate implements the conversion pipeline: Wavefront OBJ geometry
//! and MTL material text go in, a fixed-layout little-endian mesh buffer
//! comes out. File access sits behind the [`TextSource`] collaborator so
//! the pipeline itself never touches the filesystem.

pub mod mtl;
pub mod obj;
pub mod builder;
pub mod encoder;
pub mod decoder;

pub use obj::{AttributeTables, ObjDocument};

use meshbin_core::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads referenced text files (`mtllib`) on behalf of the parser.
pub trait TextSource {
    /// Return the full contents of `name`, or fail with a fatal error.
    fn load(&self, name: &str) -> Result<String>;
}

/// Text source rooted at a directory, for `mtllib` paths relative to the
/// OBJ file that names them.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl TextSource for DirSource {
    fn load(&self, name: &str) -> Result<String> {
        read_text(&self.root.join(name))
    }
}

/// In-memory text source for tests and embedded assets.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: &str, contents: &str) -> Self {
        self.files.insert(name.to_string(), contents.to_string());
        self
    }
}

impl TextSource for MemorySource {
    fn load(&self, name: &str) -> Result<String> {
        self.files.get(name).cloned().ok_or_else(|| Error::MissingInput {
            path: name.to_string(),
        })
    }
}

/// Convert OBJ text, resolving `mtllib` through `source`, into the binary
/// mesh format.
pub fn convert<S: TextSource>(obj_text: &str, source: &S) -> Result<Vec<u8>> {
    let document = obj::parse_document(obj_text, source)?;
    encoder::encode(&document.surfaces, &document.materials)
}

/// Convert an OBJ file on disk; `mtllib` paths resolve relative to its
/// directory.
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let text = read_text(path)?;
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    convert(&text, &DirSource::new(root))
}

/// Convert `input` and write the resulting buffer to `output`.
///
/// The output file is only created after the whole buffer has been encoded;
/// a failed conversion leaves no partial file behind.
pub fn convert_to_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<()> {
    let bytes = convert_file(input)?;
    fs::write(output, bytes)?;
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => Error::MissingInput {
            path: path.display().to_string(),
        },
        _ => Error::Io(err),
    })
}

#[cfg(test)]
mod tests;
