//! Error taxonomy for opening an LLTZ index and querying it.

use thiserror::Error;

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while opening or querying an LLTZ index.
#[derive(Error, Debug)]
pub enum Error {
    /// The first 8 bytes of the buffer don't match the `LLTZ1\0\0\0` magic.
    #[error("invalid LLTZ header")]
    InvalidHeader,

    /// `lat` or `lon` fell outside `[-90, 90]` / `[-180, 180]`.
    #[error("coordinate out of range: lat={lat}, lon={lon}")]
    OutOfRange { lat: f64, lon: f64 },

    /// A read stepped outside the bytes the reader was given, or a
    /// structural invariant (e.g. a terminating quadtree descent) was
    /// violated. Conforming builders never produce this; a reader fails
    /// closed rather than reading past the end of the buffer.
    #[error("corrupt LLTZ data at offset {offset} (wanted {len} bytes)")]
    Corrupt { offset: usize, len: usize },

    /// The convenience loader couldn't find a bundled index file.
    #[error("no LLTZ data file found")]
    DataFileNotFound,

    /// I/O failure while memory-mapping a file for the convenience loader.
    #[error("I/O error loading LLTZ data: {0}")]
    Io(#[from] std::io::Error),
}
