//! Binary PGM (`P5`) encoding.
//!
//! ```text
//! P5\n
//! <width> <height>\n
//! 255\n
//! <width * height raster bytes>
//! ```
//!
//! Header tokens may be separated by any whitespace and `#` comments run to the
//! end of the line. Exactly one whitespace byte separates maxval from the raster.

use std::fs;
use std::path::Path;

use super::GridIoError;

/// Magic bytes identifying a binary greymap.
const PGM_MAGIC: &[u8] = b"P5";

/// Decoded greymap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgmImage {
    pub width: usize,
    pub height: usize,
    pub max_value: u8,
    pub pixels: Vec<u8>,
}

/// Encode pixels as a binary PGM with maxval 255.
pub fn encode_pgm(width: usize, height: usize, pixels: &[u8]) -> Vec<u8> {
    let header = format!("P5\n{} {}\n255\n", width, height);
    let mut bytes = Vec::with_capacity(header.len() + pixels.len());
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(pixels);
    bytes
}

/// Decode a binary PGM.
pub fn decode_pgm(data: &[u8]) -> Result<PgmImage, GridIoError> {
    let mut header = HeaderReader { data, pos: 0 };

    if header.token()? != PGM_MAGIC {
        return Err(GridIoError::Format("missing P5 magic".into()));
    }
    let width = header.number("width")?;
    let height = header.number("height")?;
    let max_value = header.number("maxval")?;
    if max_value == 0 || max_value > 255 {
        return Err(GridIoError::Format(format!(
            "unsupported maxval {}",
            max_value
        )));
    }

    // Single whitespace byte after maxval
    let start = header.pos + 1;
    let (len, end) = width
        .checked_mul(height)
        .and_then(|len| Some((len, start.checked_add(len)?)))
        .ok_or_else(|| GridIoError::Format("image dimensions overflow".into()))?;
    let raster = data
        .get(start..end)
        .ok_or_else(|| {
            GridIoError::Format(format!(
                "raster truncated: expected {} bytes, found {}",
                len,
                data.len().saturating_sub(start)
            ))
        })?;

    Ok(PgmImage {
        width,
        height,
        max_value: max_value as u8,
        pixels: raster.to_vec(),
    })
}

/// Write pixels to a PGM file.
pub fn write_pgm(path: &Path, width: usize, height: usize, pixels: &[u8]) -> Result<(), GridIoError> {
    fs::write(path, encode_pgm(width, height, pixels)).map_err(|source| GridIoError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and decode a PGM file.
pub fn read_pgm(path: &Path) -> Result<PgmImage, GridIoError> {
    let data = fs::read(path).map_err(|source| GridIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_pgm(&data)
}

struct HeaderReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> HeaderReader<'a> {
    fn token(&mut self) -> Result<&'a [u8], GridIoError> {
        loop {
            while self.pos < self.data.len() && self.data[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.data.get(self.pos) == Some(&b'#') {
                while self.pos < self.data.len() && self.data[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }

        let start = self.pos;
        while self.pos < self.data.len() && !self.data[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(GridIoError::Format("header truncated".into()));
        }
        Ok(&self.data[start..self.pos])
    }

    fn number(&mut self, what: &str) -> Result<usize, GridIoError> {
        let token = self.token()?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                GridIoError::Format(format!(
                    "invalid {}: {:?}",
                    what,
                    String::from_utf8_lossy(token)
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_encode_header() {
        let bytes = encode_pgm(3, 2, &[0, 255, 0, 255, 0, 255]);
        assert!(bytes.starts_with(b"P5\n3 2\n255\n"));
        assert_eq!(bytes.len(), 11 + 6);
    }

    #[test]
    fn test_decode_with_comments() {
        let mut data = b"P5\n# created by hand\n2  2\n255\n".to_vec();
        data.extend_from_slice(&[255, 0, 0, 255]);
        let image = decode_pgm(&data).unwrap();
        assert_eq!((image.width, image.height, image.max_value), (2, 2, 255));
        assert_eq!(image.pixels, vec![255, 0, 0, 255]);
    }

    #[test]
    fn test_decode_rejects_ascii_pgm() {
        let err = decode_pgm(b"P2\n1 1\n255\n0\n").unwrap_err();
        assert!(matches!(err, GridIoError::Format(_)));
    }

    #[test]
    fn test_decode_rejects_truncated_raster() {
        let mut data = encode_pgm(4, 4, &[0; 16]);
        data.truncate(data.len() - 3);
        assert!(matches!(decode_pgm(&data), Err(GridIoError::Format(_))));
    }

    #[test]
    fn test_decode_rejects_overflowing_dimensions() {
        let err = decode_pgm(b"P5\n18446744073709551615 2\n255\n\x00\x00").unwrap_err();
        assert!(matches!(err, GridIoError::Format(msg) if msg.contains("overflow")));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("16x16.pgm");
        let pixels: Vec<u8> = (0..256).map(|i| if i % 3 == 0 { 255 } else { 0 }).collect();

        write_pgm(&path, 16, 16, &pixels).unwrap();
        let image = read_pgm(&path).unwrap();
        assert_eq!((image.width, image.height), (16, 16));
        assert_eq!(image.pixels, pixels);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_pgm(&dir.path().join("missing.pgm")).unwrap_err();
        assert!(matches!(err, GridIoError::Io { .. }));
    }
}
