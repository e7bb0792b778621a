//! PNG capture of producer pixel buffers.
//!
//! A thin persistence collaborator: one synchronous attempt per call,
//! no retry, no partial-file cleanup. The vertical flip exists only on
//! the 4-channel path, as a caller-visible option for producers that
//! render bottom-up.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageError};

/// Write a tightly packed RGB buffer as a PNG, rows top to bottom as given.
pub fn save_rgb(path: &Path, width: u32, height: u32, pixels: &[u8]) -> Result<(), ImageError> {
    debug_assert_eq!(pixels.len(), width as usize * height as usize * 3);
    encode(path, width, height, pixels, ExtendedColorType::Rgb8)
}

/// Write a tightly packed RGBA buffer as a PNG, optionally reversing
/// row order first.
pub fn save_rgba(
    path: &Path,
    width: u32,
    height: u32,
    pixels: &[u8],
    flip_vertical: bool,
) -> Result<(), ImageError> {
    debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
    if flip_vertical {
        let flipped = flip_rows(pixels, width as usize, 4);
        encode(path, width, height, &flipped, ExtendedColorType::Rgba8)
    } else {
        encode(path, width, height, pixels, ExtendedColorType::Rgba8)
    }
}

fn encode(
    path: &Path,
    width: u32,
    height: u32,
    pixels: &[u8],
    color: ExtendedColorType,
) -> Result<(), ImageError> {
    let file = File::create(path)?;
    PngEncoder::new(BufWriter::new(file)).write_image(pixels, width, height, color)
}

/// Reverse the row order of a packed image buffer.
fn flip_rows(pixels: &[u8], width: usize, bytes_per_pixel: usize) -> Vec<u8> {
    let stride = width * bytes_per_pixel;
    let mut out = Vec::with_capacity(pixels.len());
    for row in pixels.chunks_exact(stride).rev() {
        out.extend_from_slice(row);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2x2 logical image: row 0 = red, green; row 1 = blue, white.
    const RGBA_2X2: [u8; 16] = [
        255, 0, 0, 255, 0, 255, 0, 255, //
        0, 0, 255, 255, 255, 255, 255, 255,
    ];

    #[test]
    fn flip_rows_reverses_row_order() {
        let flipped = flip_rows(&RGBA_2X2, 2, 4);
        assert_eq!(&flipped[..8], &RGBA_2X2[8..]);
        assert_eq!(&flipped[8..], &RGBA_2X2[..8]);
    }

    #[test]
    fn flip_rows_single_row_is_identity() {
        let row = [1u8, 2, 3, 4, 5, 6];
        assert_eq!(flip_rows(&row, 2, 3), row);
    }

    #[test]
    fn rgba_flipped_save_reverses_rows_versus_rgb() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rgba_path = dir.path().join("flipped.png");
        let rgb_path = dir.path().join("plain.png");

        save_rgba(&rgba_path, 2, 2, &RGBA_2X2, true).expect("save rgba");

        // Same logical image as 3-channel data, saved without a flip.
        let rgb: Vec<u8> = RGBA_2X2
            .chunks_exact(4)
            .flat_map(|px| px[..3].iter().copied())
            .collect();
        save_rgb(&rgb_path, 2, 2, &rgb).expect("save rgb");

        let flipped = image::open(&rgba_path).expect("reopen rgba").to_rgba8();
        let plain = image::open(&rgb_path).expect("reopen rgb").to_rgba8();

        // Rows appear in reverse order versus the non-flipped variant.
        assert_eq!(flipped.get_pixel(0, 0), plain.get_pixel(0, 1));
        assert_eq!(flipped.get_pixel(1, 0), plain.get_pixel(1, 1));
        assert_eq!(flipped.get_pixel(0, 1), plain.get_pixel(0, 0));
        assert_eq!(flipped.get_pixel(1, 1), plain.get_pixel(1, 0));
    }

    #[test]
    fn rgba_unflipped_save_round_trips_exactly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("exact.png");
        save_rgba(&path, 2, 2, &RGBA_2X2, false).expect("save");

        let reread = image::open(&path).expect("reopen").to_rgba8();
        assert_eq!(reread.into_raw(), RGBA_2X2.to_vec());
    }

    #[test]
    fn save_failure_reports_error() {
        let missing = Path::new("no-such-dir/frame.png");
        assert!(save_rgb(missing, 2, 2, &[0u8; 12]).is_err());
    }
}
