//! Constants and small helpers for the LLTZ binary format.

/// `"LLTZ1\0\0\0"`.
pub const MAGIC: &[u8; 8] = b"LLTZ1\0\0\0";

/// Degrees are quantized into a non-negative integer space at this scale.
pub const SCALE: i64 = 1_000_000;

pub const GRID_LAT_CELLS: usize = 180;
pub const GRID_LON_CELLS: usize = 360;
pub const GRID_SLOT_BYTES: usize = 4;
pub const GRID_BYTES: usize = GRID_LAT_CELLS * GRID_LON_CELLS * GRID_SLOT_BYTES;

/// Header (8) + string-table length prefix (2).
pub const HEADER_LEN: usize = 10;

/// A tag-3 child block is four consecutive `u32` slots.
pub const CHILD_BLOCK_BYTES: usize = 16;

/// Upper bound on quadtree descent depth before a reader treats an
/// unterminated chain as corrupt.
pub const MAX_QUADTREE_DEPTH: u32 = 32;

/// The two tag bits plus 30-bit payload packed into a little-endian `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// No coverage; fall through to the fallback resolver.
    Empty,
    /// The whole region maps to one timezone, given by its string-table index.
    Single(u32),
    /// One or more polygons cover parts of this region, at this byte offset
    /// (relative to `base_offset`).
    Polygon(u32),
    /// Subdivide further; byte offset (relative to `base_offset`) of a
    /// 4-slot child block.
    Quadtree(u32),
}

const TAG_EMPTY: u32 = 0;
const TAG_SINGLE: u32 = 1;
const TAG_POLYGON: u32 = 2;
const TAG_QUADTREE: u32 = 3;
const PAYLOAD_MASK: u32 = (1 << 30) - 1;

impl Slot {
    pub fn decode(word: u32) -> Slot {
        let tag = word >> 30;
        let payload = word & PAYLOAD_MASK;
        match tag {
            TAG_EMPTY => Slot::Empty,
            TAG_SINGLE => Slot::Single(payload),
            TAG_POLYGON => Slot::Polygon(payload),
            TAG_QUADTREE => Slot::Quadtree(payload),
            _ => unreachable!("tag is only ever 2 bits"),
        }
    }
}

/// `base_offset = 10 + L + 259200` where `L` is the string-table byte length.
pub fn base_offset(string_table_len: usize) -> usize {
    HEADER_LEN + string_table_len + GRID_BYTES
}

/// Quadrant selector: bit 0 = east, bit 1 = north.
pub fn quadrant(xq: i64, yq: i64, x_mid: i64, y_mid: i64) -> usize {
    let north = if yq >= y_mid { 2 } else { 0 };
    let east = if xq >= x_mid { 1 } else { 0 };
    north | east
}
