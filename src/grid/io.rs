//! I/O helpers for scalar grids.
//!
//! - `load_grid`: dispatch on the file extension and build a [`DenseGrid`].
//! - Perseus text (`.txt`): dimension count, extents, then one value per
//!   whitespace-separated token, x fastest. A value of `-1` marks an
//!   excluded vertex.
//! - NumPy (`.npy`): C-order `<f8`/`<f4` arrays, axis order (x, y, z).
//! - DIPHA image data (`.complex`): little-endian binary.
//! - Grayscale images (PNG/JPEG/...): decoded to 8-bit gray and used as a
//!   2D grid.

use super::DenseGrid;
use std::fs;
use std::path::Path;

/// Magic number shared by all DIPHA files.
pub const DIPHA_MAGIC: i64 = 8067171840;
/// DIPHA file type tag for image data (grid input).
pub const DIPHA_IMAGE_DATA: i64 = 1;

/// Load a grid from disk, inferring the format from the extension.
pub fn load_grid(path: &Path, threshold: f64) -> Result<DenseGrid, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" => load_perseus(path, threshold),
        "npy" => load_npy(path, threshold),
        "complex" => load_dipha(path, threshold),
        "png" | "jpg" | "jpeg" | "bmp" | "tif" | "tiff" => load_image(path, threshold),
        other => Err(format!(
            "Unknown input format '{other}' for {} (use txt, npy, complex or a grayscale image)",
            path.display()
        )),
    }
}

fn load_perseus(path: &Path, threshold: f64) -> Result<DenseGrid, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let mut tokens = contents.split_whitespace();
    let mut next_number = |what: &str| -> Result<f64, String> {
        let token = tokens
            .next()
            .ok_or_else(|| format!("{}: unexpected end of file reading {what}", path.display()))?;
        token
            .parse::<f64>()
            .map_err(|_| format!("{}: invalid {what} '{token}'", path.display()))
    };

    let dim = next_number("dimension")? as usize;
    if !(1..=3).contains(&dim) {
        return Err(format!("{}: dimension must be 1, 2 or 3", path.display()));
    }
    let mut extents = [1usize; 3];
    for e in extents.iter_mut().take(dim) {
        let size = next_number("extent")?;
        if size < 1.0 {
            return Err(format!("{}: non-positive extent", path.display()));
        }
        *e = size as usize;
    }
    let count = extents[0] * extents[1] * extents[2];
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        let v = next_number("birth value")?;
        // Perseus convention: -1 excludes the vertex from the filtration.
        values.push(if v == -1.0 { f64::INFINITY } else { v });
    }
    DenseGrid::from_values(extents[0], extents[1], extents[2], threshold, values)
}

fn load_npy(path: &Path, threshold: f64) -> Result<DenseGrid, String> {
    let bytes = fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let (shape, raw) = parse_npy(&bytes).map_err(|e| format!("{}: {e}", path.display()))?;
    if shape.is_empty() || shape.len() > 3 {
        return Err(format!(
            "{}: expected a 1D/2D/3D array, got {} axes",
            path.display(),
            shape.len()
        ));
    }
    let (ax, ay, az) = (
        shape[0],
        shape.get(1).copied().unwrap_or(1),
        shape.get(2).copied().unwrap_or(1),
    );
    if ax * ay * az != raw.len() {
        return Err(format!("{}: shape/payload mismatch", path.display()));
    }
    // Rearrange from C order (x slowest) to the grid's x-fastest layout.
    let mut values = vec![0.0; raw.len()];
    for x in 0..ax {
        for y in 0..ay {
            for z in 0..az {
                values[x + ax * (y + ay * z)] = raw[(x * ay + y) * az + z];
            }
        }
    }
    DenseGrid::from_values(ax, ay, az, threshold, values)
}

/// Parse an NPY payload into its shape and f64 data.
fn parse_npy(bytes: &[u8]) -> Result<(Vec<usize>, Vec<f64>), String> {
    if bytes.len() < 10 || &bytes[..6] != b"\x93NUMPY" {
        return Err("not an NPY file".to_string());
    }
    let major = bytes[6];
    let (header_len, data_start) = match major {
        1 => {
            let len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
            (len, 10 + len)
        }
        2 => {
            if bytes.len() < 12 {
                return Err("truncated NPY header".to_string());
            }
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
            (len, 12 + len)
        }
        other => return Err(format!("unsupported NPY version {other}")),
    };
    if bytes.len() < data_start {
        return Err("truncated NPY header".to_string());
    }
    let header = std::str::from_utf8(&bytes[data_start - header_len..data_start])
        .map_err(|_| "NPY header is not UTF-8".to_string())?;

    if dict_value(header, "fortran_order")? != "False" {
        return Err("Fortran-order arrays are not supported".to_string());
    }
    let descr = dict_value(header, "descr")?;
    let descr = descr.trim_matches('\'').trim_matches('"');
    let shape_str = dict_value(header, "shape")?;
    let shape: Vec<usize> = shape_str
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| format!("bad shape entry '{s}'"))
        })
        .collect::<Result<_, _>>()?;

    let payload = &bytes[data_start..];
    let data = match descr {
        "<f8" => payload
            .chunks_exact(8)
            .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
            .collect(),
        "<f4" => payload
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes(c.try_into().unwrap()) as f64)
            .collect(),
        other => return Err(format!("unsupported dtype '{other}' (use <f8 or <f4)")),
    };
    Ok((shape, data))
}

/// Extract the raw value of one key from a Python dict literal.
fn dict_value(header: &str, key: &str) -> Result<String, String> {
    let marker = format!("'{key}':");
    let start = header
        .find(&marker)
        .ok_or_else(|| format!("NPY header is missing '{key}'"))?
        + marker.len();
    let rest = header[start..].trim_start();
    let end = if rest.starts_with('(') {
        rest.find(')').map(|i| i + 1)
    } else {
        rest.find(',').or_else(|| rest.find('}'))
    }
    .ok_or_else(|| format!("malformed NPY header near '{key}'"))?;
    Ok(rest[..end].trim().trim_end_matches(',').to_string())
}

fn load_dipha(path: &Path, threshold: f64) -> Result<DenseGrid, String> {
    let bytes = fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let mut cursor = 0usize;
    let mut read_i64 = |what: &str| -> Result<i64, String> {
        let end = cursor + 8;
        let chunk = bytes
            .get(cursor..end)
            .ok_or_else(|| format!("{}: truncated reading {what}", path.display()))?;
        cursor = end;
        Ok(i64::from_le_bytes(chunk.try_into().unwrap()))
    };

    if read_i64("magic number")? != DIPHA_MAGIC {
        return Err(format!("{}: not a DIPHA file", path.display()));
    }
    if read_i64("file type")? != DIPHA_IMAGE_DATA {
        return Err(format!("{}: not DIPHA image data", path.display()));
    }
    let count = read_i64("value count")?;
    let dim = read_i64("dimension")?;
    if !(1..=3).contains(&dim) {
        return Err(format!("{}: dimension must be 1, 2 or 3", path.display()));
    }
    let mut extents = [1usize; 3];
    for e in extents.iter_mut().take(dim as usize) {
        let size = read_i64("extent")?;
        if size < 1 {
            return Err(format!("{}: non-positive extent", path.display()));
        }
        *e = size as usize;
    }
    if extents[0] * extents[1] * extents[2] != count as usize {
        return Err(format!("{}: extent/count mismatch", path.display()));
    }
    let start = cursor;
    let end = start + 8 * count as usize;
    let payload = bytes
        .get(start..end)
        .ok_or_else(|| format!("{}: truncated payload", path.display()))?;
    let values: Vec<f64> = payload
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
        .collect();
    DenseGrid::from_values(extents[0], extents[1], extents[2], threshold, values)
}

fn load_image(path: &Path, threshold: f64) -> Result<DenseGrid, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let (width, height) = (img.width() as usize, img.height() as usize);
    let mut values = vec![0.0; width * height];
    for (x, y, pixel) in img.enumerate_pixels() {
        values[x as usize + width * y as usize] = f64::from(pixel.0[0]);
    }
    DenseGrid::from_values(width, height, 1, threshold, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("cubical-persistence-io-{name}"))
    }

    #[test]
    fn perseus_text_round_trips() {
        let path = temp_path("grid.txt");
        fs::write(&path, "2\n3\n2\n0 1 2\n3 -1 5\n").unwrap();
        let grid = load_perseus(&path, 10.0).unwrap();
        assert_eq!((grid.ax(), grid.ay(), grid.az()), (3, 2, 1));
        assert_eq!(grid.vertex_birth(2, 0, 0), 2.0);
        // -1 marks exclusion: clamped to the threshold
        assert_eq!(grid.vertex_birth(1, 1, 0), 10.0);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn npy_loader_reads_c_order_f8() {
        let dict = "{'descr': '<f8', 'fortran_order': False, 'shape': (2, 3), }";
        let mut header = dict.as_bytes().to_vec();
        let pad = (64 - (10 + header.len() + 1) % 64) % 64;
        header.extend(std::iter::repeat(b' ').take(pad));
        header.push(b'\n');
        let mut bytes = b"\x93NUMPY\x01\x00".to_vec();
        bytes.extend((header.len() as u16).to_le_bytes());
        bytes.extend(header);
        for v in [0.0f64, 1.0, 2.0, 3.0, 4.0, 5.0] {
            bytes.extend(v.to_le_bytes());
        }

        let path = temp_path("grid.npy");
        fs::File::create(&path)
            .unwrap()
            .write_all(&bytes)
            .unwrap();
        let grid = load_npy(&path, f64::INFINITY).unwrap();
        // axis 0 is x, so the flat C-order value at (x=1, y=2) is 5.0
        assert_eq!((grid.ax(), grid.ay(), grid.az()), (2, 3, 1));
        assert_eq!(grid.vertex_birth(1, 2, 0), 5.0);
        assert_eq!(grid.vertex_birth(0, 1, 0), 1.0);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn dipha_loader_checks_magic() {
        let path = temp_path("grid.complex");
        let mut bytes = Vec::new();
        for header in [DIPHA_MAGIC, DIPHA_IMAGE_DATA, 4, 2, 2, 2] {
            bytes.extend(header.to_le_bytes());
        }
        for v in [0.0f64, 1.0, 2.0, 3.0] {
            bytes.extend(v.to_le_bytes());
        }
        fs::write(&path, &bytes).unwrap();
        let grid = load_dipha(&path, f64::INFINITY).unwrap();
        assert_eq!((grid.ax(), grid.ay(), grid.az()), (2, 2, 1));
        assert_eq!(grid.vertex_birth(1, 1, 0), 3.0);

        bytes[0] ^= 0xff;
        fs::write(&path, &bytes).unwrap();
        assert!(load_dipha(&path, f64::INFINITY).is_err());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(load_grid(Path::new("grid.csv"), f64::INFINITY).is_err());
    }
}
