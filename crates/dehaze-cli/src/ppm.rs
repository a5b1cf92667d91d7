//! Minimal binary PPM (P6) reader/writer.
//!
//! Enough of the NetPBM format for the demo surface: 8-bit RGB, binary
//! raster, `#` comments in the header.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use dehaze_core::Rgb8;

/// A decoded 8-bit RGB image.
pub struct PpmImage {
    /// Pixels in raster order
    pub pixels: Vec<Rgb8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Reads a binary PPM file.
pub fn read_ppm(path: &Path) -> Result<PpmImage> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    parse_ppm(&data).with_context(|| format!("parsing {}", path.display()))
}

fn parse_ppm(data: &[u8]) -> Result<PpmImage> {
    let mut pos = 0usize;

    let magic = next_token(data, &mut pos).context("missing magic number")?;
    if magic != b"P6" {
        bail!("unsupported PPM magic {:?} (only binary P6)", String::from_utf8_lossy(&magic));
    }

    let width: u32 = parse_number(data, &mut pos).context("missing width")?;
    let height: u32 = parse_number(data, &mut pos).context("missing height")?;
    let maxval: u32 = parse_number(data, &mut pos).context("missing maxval")?;
    if maxval != 255 {
        bail!("unsupported maxval {maxval} (only 8-bit)");
    }
    // Exactly one whitespace byte separates the header from the raster.
    pos += 1;

    let expected = width as usize * height as usize * 3;
    let raster = data
        .get(pos..pos + expected)
        .with_context(|| format!("raster truncated: need {expected} bytes"))?;

    let pixels = raster
        .chunks_exact(3)
        .map(|c| Rgb8::new(c[0], c[1], c[2]))
        .collect();

    Ok(PpmImage {
        pixels,
        width,
        height,
    })
}

/// Writes a binary PPM file.
pub fn write_ppm(path: &Path, pixels: &[Rgb8], width: u32, height: u32) -> Result<()> {
    anyhow::ensure!(
        pixels.len() == width as usize * height as usize,
        "pixel buffer does not match {width}x{height}"
    );
    let mut out = Vec::with_capacity(pixels.len() * 3 + 32);
    write!(out, "P6\n{width} {height}\n255\n")?;
    for px in pixels {
        out.extend_from_slice(&px.channels());
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}

/// Returns the next whitespace-delimited header token, skipping comments.
fn next_token(data: &[u8], pos: &mut usize) -> Option<Vec<u8>> {
    while *pos < data.len() {
        match data[*pos] {
            b' ' | b'\t' | b'\r' | b'\n' => *pos += 1,
            b'#' => {
                while *pos < data.len() && data[*pos] != b'\n' {
                    *pos += 1;
                }
            }
            _ => break,
        }
    }
    let start = *pos;
    while *pos < data.len() && !data[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
    (*pos > start).then(|| data[start..*pos].to_vec())
}

fn parse_number(data: &[u8], pos: &mut usize) -> Result<u32> {
    let tok = next_token(data, pos).context("unexpected end of header")?;
    std::str::from_utf8(&tok)?
        .parse()
        .with_context(|| format!("bad number {:?}", String::from_utf8_lossy(&tok)))
}
