//! Header/string-table validation, grid dispatch, quadtree descent, polygon
//! containment, and the public lookup façade, tying together the whole
//! query runtime over an LLTZ byte range.

use crate::cursor::ByteReader;
use crate::error::{Error, Result};
use crate::fallback;
use crate::format::{self, Slot, GRID_LAT_CELLS, GRID_LON_CELLS, MAGIC, SCALE};

/// A validated, read-only view over an LLTZ index.
///
/// `Reader` borrows its bytes for the lifetime `'a` and never mutates them;
/// a single instance may be shared freely across threads.
pub struct Reader<'a> {
    bytes: ByteReader<'a>,
    strings: Vec<(u32, u32)>,
    grid_offset: usize,
    base_offset: usize,
}

enum Containment {
    Inside,
    OnEdge,
    Outside,
}

impl<'a> Reader<'a> {
    /// Validate the header and string table of `bytes` and build a reader
    /// over them. Fails with [`Error::InvalidHeader`] if the magic bytes
    /// don't match; everything else is deferred to individual reads, which
    /// fail closed with [`Error::Corrupt`] rather than panic.
    pub fn open(bytes: &'a [u8]) -> Result<Reader<'a>> {
        if bytes.len() < format::HEADER_LEN || &bytes[0..8] != MAGIC {
            return Err(Error::InvalidHeader);
        }

        let cur = ByteReader::new(bytes);
        let l = cur.u16(8)? as usize;
        let table = bytes
            .get(10..10 + l)
            .ok_or(Error::Corrupt { offset: 10, len: l })?;

        let mut strings = Vec::new();
        let mut start = 0usize;
        for (i, &b) in table.iter().enumerate() {
            if b == 0 {
                strings.push(((10 + start) as u32, (i - start) as u32));
                start = i + 1;
            }
        }
        if start < table.len() {
            strings.push(((10 + start) as u32, (table.len() - start) as u32));
        }

        let grid_offset = 10 + l;
        let base_offset = format::base_offset(l);

        Ok(Reader {
            bytes: cur,
            strings,
            grid_offset,
            base_offset,
        })
    }

    fn string(&self, idx: u32) -> Result<String> {
        let &(offset, len) = self
            .strings
            .get(idx as usize)
            .ok_or(Error::Corrupt { offset: idx as usize, len: 0 })?;
        let bytes = self.bytes.slice(offset as usize, len as usize)?;
        std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|_| Error::Corrupt { offset: offset as usize, len: len as usize })
    }

    /// Look up the timezone identifiers covering `(lat, lon)`.
    ///
    /// `lat` must lie in `[-90, 90]` and `lon` in `[-180, 180]`, or this
    /// fails with [`Error::OutOfRange`]. The returned list is never empty.
    pub fn lookup(&self, lat: f64, lon: f64) -> Result<Vec<String>> {
        if !lat.is_finite() || !lon.is_finite() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon)
        {
            return Err(Error::OutOfRange { lat, lon });
        }

        let lat_idx = clamp_floor(lat + 90.0, GRID_LAT_CELLS - 1);
        let lon_idx = clamp_floor(lon + 180.0, GRID_LON_CELLS - 1);

        let max_x = (GRID_LON_CELLS as i64) * SCALE;
        let max_y = (GRID_LAT_CELLS as i64) * SCALE;
        let xq = (((lon + 180.0) * SCALE as f64).round() as i64).clamp(0, max_x);
        let yq = (((lat + 90.0) * SCALE as f64).round() as i64).clamp(0, max_y);

        let found = self.grid_lookup(lat_idx, lon_idx, xq, yq)?;
        if found.is_empty() {
            Ok(fallback::resolve(lat, lon))
        } else {
            Ok(found)
        }
    }

    fn grid_slot(&self, lat_idx: usize, lon_idx: usize) -> Result<Slot> {
        let offset = self.grid_offset + (lat_idx * GRID_LON_CELLS + lon_idx) * format::GRID_SLOT_BYTES;
        Ok(Slot::decode(self.bytes.u32(offset)?))
    }

    fn grid_lookup(&self, lat_idx: usize, lon_idx: usize, xq: i64, yq: i64) -> Result<Vec<String>> {
        match self.grid_slot(lat_idx, lon_idx)? {
            Slot::Empty => Ok(vec![]),
            Slot::Single(idx) => Ok(vec![self.string(idx)?]),
            Slot::Polygon(payload) => {
                let cell_origin = (lon_idx as i64 * SCALE, lat_idx as i64 * SCALE);
                self.scan_polygons(cell_origin, self.base_offset + payload as usize, xq, yq)
            }
            Slot::Quadtree(payload) => self.descend(payload, lat_idx, lon_idx, xq, yq),
        }
    }

    /// Quadtree descent: integer-midpoint bisection with the `>= mid`
    /// tie-break, terminating at a tag in `{Empty, Single, Polygon}`.
    fn descend(&self, payload: u32, lat_idx: usize, lon_idx: usize, xq: i64, yq: i64) -> Result<Vec<String>> {
        let mut x_min = lon_idx as i64 * SCALE;
        let mut x_max = x_min + SCALE;
        let mut y_min = lat_idx as i64 * SCALE;
        let mut y_max = y_min + SCALE;

        let mut slot = Slot::Quadtree(payload);
        let mut depth = 0u32;

        loop {
            let payload = match slot {
                Slot::Quadtree(payload) => payload,
                Slot::Empty => return Ok(vec![]),
                Slot::Single(idx) => return Ok(vec![self.string(idx)?]),
                Slot::Polygon(payload) => {
                    return self.scan_polygons((x_min, y_min), self.base_offset + payload as usize, xq, yq)
                }
            };

            depth += 1;
            if depth > format::MAX_QUADTREE_DEPTH {
                return Err(Error::Corrupt {
                    offset: self.base_offset + payload as usize,
                    len: format::CHILD_BLOCK_BYTES,
                });
            }

            let child_block = self.base_offset + payload as usize;
            let x_mid = (x_min + x_max) / 2;
            let y_mid = (y_min + y_max) / 2;
            let q = format::quadrant(xq, yq, x_mid, y_mid);
            let word = self.bytes.u32(child_block + q * 4)?;
            slot = Slot::decode(word);

            if yq >= y_mid {
                y_min = y_mid;
            } else {
                y_max = y_mid;
            }
            if xq >= x_mid {
                x_min = x_mid;
            } else {
                x_max = x_mid;
            }
        }
    }

    /// Polygon-list containment scan.
    fn scan_polygons(&self, cell_origin: (i64, i64), offset: usize, xq: i64, yq: i64) -> Result<Vec<String>> {
        let mut out = Vec::new();
        let count = self.bytes.u8(offset)? as usize;
        let mut cursor = offset + 1;

        for _ in 0..count {
            let tz_index = self.bytes.u16(cursor)? as u32;
            cursor += 2;
            let polygon_count = self.bytes.u8(cursor)? as usize;
            cursor += 1;

            let mut hit = false;
            for _ in 0..polygon_count {
                let size = self.bytes.u16(cursor)? as usize;
                let content_start = cursor + 2;
                let next_offset = content_start + size;

                if !hit && self.polygon_contains(cell_origin, content_start, xq, yq)? {
                    hit = true;
                }

                cursor = next_offset;
            }

            if hit {
                out.push(self.string(tz_index)?);
            }
        }

        Ok(out)
    }

    fn polygon_contains(&self, cell_origin: (i64, i64), content_start: usize, xq: i64, yq: i64) -> Result<bool> {
        let mut p = content_start;
        let rings_count = self.bytes.u8(p)? as usize;
        p += 1;

        let x_min_rel = self.bytes.u16(p)? as i64;
        p += 2;
        let x_max_rel = self.bytes.u16(p)? as i64;
        p += 2;
        let y_min_rel = self.bytes.u16(p)? as i64;
        p += 2;
        let y_max_rel = self.bytes.u16(p)? as i64;
        p += 2;

        let abs_x_min = cell_origin.0 + x_min_rel;
        let abs_x_max = cell_origin.0 + x_max_rel;
        let abs_y_min = cell_origin.1 + y_min_rel;
        let abs_y_max = cell_origin.1 + y_max_rel;

        if xq < abs_x_min || xq > abs_x_max || yq < abs_y_min || yq > abs_y_max {
            return Ok(false);
        }

        let point = (xq - abs_x_min, yq - abs_y_min);

        if rings_count == 0 {
            return Ok(false);
        }

        let n0 = self.bytes.u16(p)? as usize;
        p += 2;
        let (outer, next_p) = self.scan_ring(p, n0, point)?;
        p = next_p;

        match outer {
            Containment::Outside => Ok(false),
            Containment::OnEdge => Ok(true),
            Containment::Inside => {
                let mut covered = true;
                for _ in 1..rings_count {
                    let n = self.bytes.u16(p)? as usize;
                    p += 2;
                    let (hole, next_p) = self.scan_ring(p, n, point)?;
                    p = next_p;
                    match hole {
                        Containment::Outside => {}
                        Containment::Inside => covered = false,
                        Containment::OnEdge => covered = true,
                    }
                }
                Ok(covered)
            }
        }
    }

    /// Ray-cast `point` (already in polygon-relative coordinates) against
    /// the ring of `n` points starting at `offset`. Returns the result and
    /// the byte offset immediately after the ring's point data.
    fn scan_ring(&self, offset: usize, n: usize, point: (i64, i64)) -> Result<(Containment, usize)> {
        if n == 0 {
            return Ok((Containment::Outside, offset));
        }

        let mut pos = offset;
        let first = self.read_point(&mut pos)?;
        let mut prev = first;
        let mut inside = false;
        let mut on_edge = false;

        for _ in 1..n {
            let curr = self.read_point(&mut pos)?;
            edge_test(prev, curr, point, &mut inside, &mut on_edge);
            prev = curr;
        }
        edge_test(prev, first, point, &mut inside, &mut on_edge);

        let containment = if on_edge {
            Containment::OnEdge
        } else if inside {
            Containment::Inside
        } else {
            Containment::Outside
        };
        Ok((containment, pos))
    }

    fn read_point(&self, pos: &mut usize) -> Result<(i64, i64)> {
        let x = self.bytes.u16(*pos)? as i64;
        let y = self.bytes.u16(*pos + 2)? as i64;
        *pos += 4;
        Ok((x, y))
    }
}

/// One edge of the ray-casting test. Uses 64-bit arithmetic for the cross
/// product since `u16` deltas can make it exceed `i32`.
fn edge_test(prev: (i64, i64), curr: (i64, i64), point: (i64, i64), inside: &mut bool, on_edge: &mut bool) {
    let (xp, yp) = prev;
    let (xc, yc) = curr;
    let (x, y) = point;

    let dx = xc - xp;
    let dy = yc - yp;
    let dpx = x - xp;
    let dpy = y - yp;
    let cp = dx * dpy - dy * dpx;

    if cp == 0 {
        let (x_min, x_max) = (xp.min(xc), xp.max(xc));
        let (y_min, y_max) = (yp.min(yc), yp.max(yc));
        if x >= x_min && x <= x_max && y >= y_min && y <= y_max {
            *on_edge = true;
        }
    }

    if (yc > y) != (yp > y) && (yc > yp) == (cp > 0) {
        *inside = !*inside;
    }
}

fn clamp_floor(v: f64, max_idx: usize) -> usize {
    let f = v.floor();
    if f < 0.0 {
        0
    } else if f > max_idx as f64 {
        max_idx
    } else {
        f as usize
    }
}
