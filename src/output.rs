//! Persistence diagram writers.
//!
//! - CSV: `dim,birth,death[,x,y,z]` per pair.
//! - NPY: 2-D float64 array of shape `(p, 6)` with columns
//!   `[dim, birth, death, x, y, z]`.
//! - DIPHA (`.complex`): little-endian binary persistence diagram.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::grid::io::DIPHA_MAGIC;
use crate::types::{LocationMode, PersistencePair};

/// DIPHA file type tag for persistence diagrams.
pub const DIPHA_PERSISTENCE_DIAGRAM: i64 = 2;

/// Write `pairs` to `path`, inferring the format from the extension.
pub fn write_diagram(
    path: &Path,
    pairs: &[PersistencePair],
    location: LocationMode,
) -> Result<(), String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => write_csv(path, pairs, location),
        "npy" => write_npy(path, pairs),
        "complex" => write_dipha(path, pairs),
        other => Err(format!(
            "Unknown output format '{other}' for {} (use csv, npy or complex)",
            path.display()
        )),
    }
}

/// One CSV/console line for a pair.
pub fn csv_line(pair: &PersistencePair, location: LocationMode) -> String {
    if location == LocationMode::None {
        format!("{},{},{}", pair.dim, pair.birth, pair.death)
    } else {
        format!(
            "{},{},{},{},{},{}",
            pair.dim, pair.birth, pair.death, pair.x, pair.y, pair.z
        )
    }
}

fn write_csv(
    path: &Path,
    pairs: &[PersistencePair],
    location: LocationMode,
) -> Result<(), String> {
    let file =
        fs::File::create(path).map_err(|e| format!("Failed to create {}: {e}", path.display()))?;
    let mut out = BufWriter::new(file);
    for pair in pairs {
        writeln!(out, "{}", csv_line(pair, location))
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    }
    out.flush()
        .map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

fn write_npy(path: &Path, pairs: &[PersistencePair]) -> Result<(), String> {
    let mut bytes = npy_header(pairs.len());
    for pair in pairs {
        for value in [
            f64::from(pair.dim),
            pair.birth,
            pair.death,
            f64::from(pair.x),
            f64::from(pair.y),
            f64::from(pair.z),
        ] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }
    fs::write(path, bytes).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

/// NPY version 1.0 header for a `(rows, 6)` float64 array, padded so the
/// payload starts on a 64-byte boundary.
fn npy_header(rows: usize) -> Vec<u8> {
    let dict = format!("{{'descr': '<f8', 'fortran_order': False, 'shape': ({rows}, 6), }}");
    let mut header = dict.into_bytes();
    let pad = (64 - (10 + header.len() + 1) % 64) % 64;
    header.extend(std::iter::repeat(b' ').take(pad));
    header.push(b'\n');

    let mut out = Vec::with_capacity(10 + header.len());
    out.extend_from_slice(b"\x93NUMPY\x01\x00");
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(&header);
    out
}

fn write_dipha(path: &Path, pairs: &[PersistencePair]) -> Result<(), String> {
    let mut bytes = Vec::with_capacity(24 + 24 * pairs.len());
    bytes.extend_from_slice(&DIPHA_MAGIC.to_le_bytes());
    bytes.extend_from_slice(&DIPHA_PERSISTENCE_DIAGRAM.to_le_bytes());
    bytes.extend_from_slice(&(pairs.len() as i64).to_le_bytes());
    for pair in pairs {
        bytes.extend_from_slice(&i64::from(pair.dim).to_le_bytes());
        bytes.extend_from_slice(&pair.birth.to_le_bytes());
        bytes.extend_from_slice(&pair.death.to_le_bytes());
    }
    fs::write(path, bytes).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pairs() -> Vec<PersistencePair> {
        vec![
            PersistencePair::new(0, 1.0, 2.0, 3, 0, 0),
            PersistencePair::new(1, 0.5, f64::INFINITY, 0, 1, 0),
        ]
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("cubical-persistence-out-{name}"))
    }

    #[test]
    fn csv_lines_respect_the_location_mode() {
        let pairs = sample_pairs();
        assert_eq!(csv_line(&pairs[0], LocationMode::Birth), "0,1,2,3,0,0");
        assert_eq!(csv_line(&pairs[0], LocationMode::None), "0,1,2");
        assert_eq!(csv_line(&pairs[1], LocationMode::None), "1,0.5,inf");
    }

    #[test]
    fn npy_payload_has_six_columns() {
        let path = temp_path("diagram.npy");
        write_npy(&path, &sample_pairs()).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..6], b"\x93NUMPY");
        let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        assert_eq!((10 + header_len) % 64, 0);
        let payload = &bytes[10 + header_len..];
        assert_eq!(payload.len(), 2 * 6 * 8);
        let first = f64::from_le_bytes(payload[..8].try_into().unwrap());
        assert_eq!(first, 0.0); // dim of the first pair
        fs::remove_file(&path).ok();
    }

    #[test]
    fn dipha_diagram_carries_the_magic_and_count() {
        let path = temp_path("diagram.complex");
        write_dipha(&path, &sample_pairs()).unwrap();
        let bytes = fs::read(&path).unwrap();
        let magic = i64::from_le_bytes(bytes[..8].try_into().unwrap());
        let kind = i64::from_le_bytes(bytes[8..16].try_into().unwrap());
        let count = i64::from_le_bytes(bytes[16..24].try_into().unwrap());
        assert_eq!(magic, DIPHA_MAGIC);
        assert_eq!(kind, DIPHA_PERSISTENCE_DIAGRAM);
        assert_eq!(count, 2);
        assert_eq!(bytes.len(), 24 + 2 * 24);
        fs::remove_file(&path).ok();
    }
}
