//! The convenience loader: locate a bundled `timezones.lltz` file on disk
//! and memory-map it.
//!
//! This is the one place in the crate that touches the filesystem; the
//! query runtime itself (`reader.rs`) never performs I/O.

use std::env;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::{Error, Result};
use crate::reader::Reader;

const DATA_FILE_NAME: &str = "timezones.lltz";

/// Keeps the memory mapping alive for as long as the `Reader` borrowing
/// from it is alive.
enum Storage {
    Mmap(Mmap),
}

/// A [`Reader`] bundled with the storage it borrows from, so the whole
/// thing can be handed around and dropped as one unit.
pub struct OwnedReader {
    reader: Reader<'static>,
    _storage: Storage,
}

impl OwnedReader {
    /// See [`Reader::lookup`].
    pub fn lookup(&self, lat: f64, lon: f64) -> Result<Vec<String>> {
        self.reader.lookup(lat, lon)
    }
}

/// Locate a bundled `timezones.lltz` next to the running executable, next
/// to the crate's sources (when built from a checkout), or in the current
/// working directory, in that order, and memory-map it.
pub fn open_default() -> Result<OwnedReader> {
    let path = find_data_file().ok_or(Error::DataFileNotFound)?;
    open_path(&path)
}

/// Open and memory-map a specific LLTZ file.
pub fn open_path(path: &Path) -> Result<OwnedReader> {
    let file = std::fs::File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };

    // `bytes` points into the mapping, which is destroyed when `mmap` is
    // dropped. We bundle `mmap` into the same struct as the `Reader`
    // borrowing from it, so they're always dropped together and the
    // borrow never outlives its backing storage.
    let bytes: &'static [u8] = unsafe { std::slice::from_raw_parts(mmap.as_ptr(), mmap.len()) };
    let reader = Reader::open(bytes)?;

    Ok(OwnedReader { reader, _storage: Storage::Mmap(mmap) })
}

fn find_data_file() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join(DATA_FILE_NAME));
        }
    }
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        candidates.push(Path::new(&manifest_dir).join(DATA_FILE_NAME));
    }
    if let Ok(cwd) = env::current_dir() {
        candidates.push(cwd.join(DATA_FILE_NAME));
    }

    candidates.into_iter().find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let path = Path::new("/nonexistent/path/that/should/not/exist/timezones.lltz");
        assert!(matches!(open_path(path), Err(Error::Io(_))));
    }
}
