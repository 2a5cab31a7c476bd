//! Bounding-box extraction from STL files.
//!
//! Reads the vertex stream only; connectivity and normals are ignored,
//! which keeps the scan cheap even for large meshes.

use std::path::Path;

use log::{debug, warn};

use crate::error::{IoError, Result};

/// Size of the binary STL header.
const BINARY_HEADER_LEN: usize = 80;

/// Size of one binary triangle record: normal, three vertices, and the
/// attribute byte count.
const BINARY_RECORD_LEN: usize = 50;

/// Per-axis `(min, max)` extents of every vertex in an STL file.
///
/// The format is detected automatically: files that begin with the
/// `solid` keyword and contain no NUL bytes in the first 80 bytes are
/// parsed as ASCII, everything else as little-endian binary.
///
/// # Errors
///
/// Returns an error if the file cannot be read, an ASCII `vertex` line
/// does not carry three coordinates, or the file contains no vertices
/// at all.
pub fn stl_bounding_box(
    path: impl AsRef<Path>,
) -> Result<((f64, f64), (f64, f64), (f64, f64))> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(IoError::from)?;
    debug!("scanning {} ({} bytes)", path.display(), bytes.len());
    if is_ascii_stl(&bytes) {
        ascii_bounds(&bytes)
    } else {
        binary_bounds(&bytes)
    }
}

/// ASCII files start with `solid` and carry no NUL bytes up front; a
/// binary file whose header happens to start with `solid` still has
/// NULs in the header padding or the triangle records.
fn is_ascii_stl(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(BINARY_HEADER_LEN)];
    bytes.starts_with(b"solid") && !head.contains(&0)
}

struct Extents {
    min: [f64; 3],
    max: [f64; 3],
    seen: bool,
}

impl Extents {
    fn new() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
            seen: false,
        }
    }

    fn include(&mut self, vertex: [f64; 3]) {
        for ((min, max), value) in self.min.iter_mut().zip(&mut self.max).zip(vertex) {
            *min = min.min(value);
            *max = max.max(value);
        }
        self.seen = true;
    }

    fn finish(self) -> Result<((f64, f64), (f64, f64), (f64, f64))> {
        if !self.seen {
            return Err(IoError::NoVertices.into());
        }
        Ok((
            (self.min[0], self.max[0]),
            (self.min[1], self.max[1]),
            (self.min[2], self.max[2]),
        ))
    }
}

fn ascii_bounds(bytes: &[u8]) -> Result<((f64, f64), (f64, f64), (f64, f64))> {
    let text = String::from_utf8_lossy(bytes);
    let mut extents = Extents::new();
    for (index, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("vertex") {
            continue;
        }
        let mut vertex = [0.0; 3];
        for coordinate in &mut vertex {
            *coordinate = tokens
                .next()
                .and_then(|token| token.parse::<f64>().ok())
                .ok_or(IoError::ParseVertex { line: index + 1 })?;
        }
        extents.include(vertex);
    }
    extents.finish()
}

fn binary_bounds(bytes: &[u8]) -> Result<((f64, f64), (f64, f64), (f64, f64))> {
    let mut extents = Extents::new();
    if bytes.len() < BINARY_HEADER_LEN + 4 {
        return extents.finish();
    }

    let declared = usize::try_from(u32::from_le_bytes(
        bytes[BINARY_HEADER_LEN..BINARY_HEADER_LEN + 4]
            .try_into()
            .unwrap_or([0; 4]),
    ))
    .unwrap_or(usize::MAX);
    let mut body = &bytes[BINARY_HEADER_LEN + 4..];

    let mut read = 0;
    while read < declared {
        if body.len() < BINARY_RECORD_LEN {
            warn!(
                "binary stl truncated: {read} of {declared} triangles present"
            );
            break;
        }
        let record = &body[..BINARY_RECORD_LEN];
        // skip the 12-byte normal, then three 12-byte vertices
        for vertex in 0..3 {
            let base = 12 + vertex * 12;
            let mut coords = [0.0; 3];
            for (axis, coordinate) in coords.iter_mut().enumerate() {
                let offset = base + axis * 4;
                let raw = record[offset..offset + 4]
                    .try_into()
                    .unwrap_or([0; 4]);
                *coordinate = f64::from(f32::from_le_bytes(raw));
            }
            extents.include(coords);
        }
        body = &body[BINARY_RECORD_LEN..];
        read += 1;
    }
    extents.finish()
}
