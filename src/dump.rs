//! Reader for the flat segment dump produced by the database export.
//!
//! Layout, little-endian, no padding:
//! ```text
//! [8 bytes]       segment count N (u64)
//! [N x 20 bytes]  x1, y1, x2, y2, count (f32 each)
//! ```

use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};

const HEADER_LEN: usize = 8;
const RECORD_LEN: usize = 20;

/// One origin/destination pair with the number of routes that used it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub count: f32,
}

impl Segment {
    fn from_record(record: &[u8]) -> Segment {
        let field = |i: usize| {
            let at = i * 4;
            f32::from_le_bytes([record[at], record[at + 1], record[at + 2], record[at + 3]])
        };
        Segment {
            x1: field(0),
            y1: field(1),
            x2: field(2),
            y2: field(3),
            count: field(4),
        }
    }
}

/// Segments in stored order, with the count the header declared.
#[derive(Debug, Clone, PartialEq)]
pub struct Dump {
    pub declared: u64,
    pub segments: Vec<Segment>,
}

/// Read and decode a dump file in one go.
pub fn load_dump(path: &Path) -> Result<Dump> {
    info!("Loading segment dump {:?}...", path);
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes", bytes.len());
    parse_dump(&bytes)
}

/// Decode an in-memory dump. The header count must match the record bytes exactly.
pub fn parse_dump(bytes: &[u8]) -> Result<Dump> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::MissingHeader { len: bytes.len() });
    }
    let (header, body) = bytes.split_at(HEADER_LEN);
    let declared = u64::from_le_bytes([
        header[0], header[1], header[2], header[3], header[4], header[5], header[6], header[7],
    ]);

    let available = (body.len() / RECORD_LEN) as u64;
    let expected_len = usize::try_from(declared)
        .ok()
        .and_then(|n| n.checked_mul(RECORD_LEN))
        .ok_or(Error::Truncated { declared, available })?;

    if body.len() < expected_len {
        return Err(Error::Truncated { declared, available });
    }
    if body.len() > expected_len {
        return Err(Error::TrailingBytes {
            declared,
            extra: body.len() - expected_len,
        });
    }

    let segments: Vec<Segment> = body.chunks_exact(RECORD_LEN).map(Segment::from_record).collect();
    info!("Loaded {} segments", segments.len());

    Ok(Dump { declared, segments })
}

/// Encode segments the way the database export does.
#[cfg(test)]
pub fn encode_dump(segments: &[Segment]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + segments.len() * RECORD_LEN);
    out.extend_from_slice(&(segments.len() as u64).to_le_bytes());
    for s in segments {
        for v in [s.x1, s.y1, s.x2, s.y2, s.count] {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }
    out
}
