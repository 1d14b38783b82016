//! Offline lookup of IANA timezone identifiers for a point on Earth.
//!
//! This is a reader for **LLTZ**, a compact binary spatial index that
//! combines a coarse 1°×1° equirectangular grid, a per-cell adaptive
//! quadtree, and per-leaf lists of relative-coordinate polygons traversed
//! by a ray-casting point-in-polygon test. The index itself is produced
//! offline by a separate builder (out of scope for this crate); this
//! crate only answers queries against an already-built index, entirely
//! offline and allocating nothing beyond the returned result.
//!
//! # Installation
//!
//! ```toml
//! [dependencies]
//! lltz = "0.1"
//! ```
//!
//! # Examples
//!
//! ```no_run
//! // `timezones.lltz` is produced by the offline builder and distributed
//! // alongside the application; this crate doesn't ship one.
//! let bytes = std::fs::read("timezones.lltz").unwrap();
//! let reader = lltz::open(&bytes).unwrap();
//! assert_eq!(reader.lookup(40.7128, -74.0060).unwrap(), vec!["America/New_York"]);
//! ```

mod cursor;
pub mod error;
mod fallback;
mod format;
mod loader;
mod reader;

pub use error::{Error, Result};
pub use loader::{open_default, open_path, OwnedReader};
pub use reader::Reader;

/// Validate the header and string table of `bytes` and build a [`Reader`]
/// over them.
///
/// Fails with [`Error::InvalidHeader`] if the first 8 bytes don't match the
/// `LLTZ1\0\0\0` magic. Everything else is read lazily, failing closed with
/// [`Error::Corrupt`] rather than ever reading past the end of `bytes`.
pub fn open(bytes: &[u8]) -> Result<Reader<'_>> {
    Reader::open(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_rejects_short_buffers() {
        assert!(matches!(open(&[]), Err(Error::InvalidHeader)));
    }
}
