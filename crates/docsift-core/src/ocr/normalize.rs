//! Image normalization for recognition.
//!
//! Turns a raw page bitmap into a binarized, denoised bitmap of the same
//! dimensions: grayscale, adaptive (tile-based) equalization, median
//! denoise, adaptive-mean or global Otsu threshold, then a small
//! morphological opening and a minimal dilation to reconnect thin glyph
//! strokes broken by thresholding. Deterministic for identical input bytes.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OcrError;

/// Binarization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdStrategy {
    /// Local-mean threshold; preferred for pages with shadows or gradients.
    Adaptive,
    /// Global Otsu threshold; acceptable for clean scans.
    Otsu,
}

/// Image normalizer for the recognition pipeline.
pub struct ImageNormalizer {
    tile_size: u32,
    block_size: u32,
    threshold_bias: i32,
    strategy: ThresholdStrategy,
}

impl ImageNormalizer {
    /// Create a normalizer with default settings.
    pub fn new() -> Self {
        Self {
            tile_size: 64,
            block_size: 11,
            threshold_bias: 2,
            strategy: ThresholdStrategy::Adaptive,
        }
    }

    /// Set the binarization strategy.
    pub fn with_strategy(mut self, strategy: ThresholdStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the local window size for adaptive thresholding.
    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.block_size = block_size.max(3);
        self
    }

    /// Normalize a decoded bitmap.
    pub fn normalize(&self, image: &DynamicImage) -> Result<GrayImage, OcrError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(OcrError::ImageDecode("image is empty".to_string()));
        }

        let gray = image.to_luma8();
        debug!("normalizing {}x{} page", gray.width(), gray.height());

        let equalized = equalize_tiles(&gray, self.tile_size);
        let denoised = median_filter(&equalized);

        let binary = match self.strategy {
            ThresholdStrategy::Adaptive => {
                adaptive_threshold(&denoised, self.block_size, self.threshold_bias)
            }
            ThresholdStrategy::Otsu => {
                let level = otsu_level(&denoised);
                global_threshold(&denoised, level)
            }
        };

        // Opening removes speckle smaller than the glyph strokes; the final
        // cross dilation reconnects strokes the threshold broke apart.
        let opened = dilate_dark(&erode_dark(&binary, &SQUARE_3X3), &SQUARE_3X3);
        Ok(dilate_dark(&opened, &CROSS_3X3))
    }

    /// Load an image file and normalize it.
    pub fn normalize_path(&self, path: &Path) -> Result<GrayImage, OcrError> {
        let image = image::open(path).map_err(|e| OcrError::ImageDecode(e.to_string()))?;
        self.normalize(&image)
    }

    /// Decode raw image bytes (PNG / JPEG / TIFF / BMP) and normalize.
    pub fn normalize_bytes(&self, data: &[u8]) -> Result<GrayImage, OcrError> {
        let image =
            image::load_from_memory(data).map_err(|e| OcrError::ImageDecode(e.to_string()))?;
        self.normalize(&image)
    }
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a normalized bitmap as PNG bytes for the recognizer.
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>, OcrError> {
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(image.clone())
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| OcrError::ImageEncode(e.to_string()))?;
    Ok(buf)
}

// ── Contrast ─────────────────────────────────────────────────────────────

/// Per-tile histogram equalization. Evens out uneven lighting without the
/// global stretch washing out locally faint regions.
fn equalize_tiles(image: &GrayImage, tile_size: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    let tile = tile_size.max(8);
    let mut out = GrayImage::new(width, height);

    let mut ty = 0;
    while ty < height {
        let th = tile.min(height - ty);
        let mut tx = 0;
        while tx < width {
            let tw = tile.min(width - tx);

            let mut hist = [0u32; 256];
            for y in ty..ty + th {
                for x in tx..tx + tw {
                    hist[image.get_pixel(x, y)[0] as usize] += 1;
                }
            }

            let total = (tw * th) as u32;
            let mut lut = [0u8; 256];
            let mut cumulative = 0u32;
            for (value, count) in hist.iter().enumerate() {
                cumulative += count;
                lut[value] = ((cumulative as u64 * 255) / total as u64) as u8;
            }

            for y in ty..ty + th {
                for x in tx..tx + tw {
                    let v = image.get_pixel(x, y)[0];
                    out.put_pixel(x, y, Luma([lut[v as usize]]));
                }
            }

            tx += tile;
        }
        ty += tile;
    }

    out
}

// ── Denoising ────────────────────────────────────────────────────────────

/// 3x3 median filter; edge pixels use a clamped window.
fn median_filter(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut out = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut window = [0u8; 9];
            let mut n = 0;
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    let nx = (x as i32 + dx).clamp(0, width as i32 - 1) as u32;
                    let ny = (y as i32 + dy).clamp(0, height as i32 - 1) as u32;
                    window[n] = image.get_pixel(nx, ny)[0];
                    n += 1;
                }
            }
            window.sort_unstable();
            out.put_pixel(x, y, Luma([window[4]]));
        }
    }

    out
}

// ── Thresholding ─────────────────────────────────────────────────────────

/// Local-mean adaptive threshold over a `block_size` window, computed with
/// a summed-area table so large pages stay tractable.
fn adaptive_threshold(image: &GrayImage, block_size: u32, bias: i32) -> GrayImage {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    let half = (block_size / 2) as i64;

    // integral[y][x] holds the sum of the rectangle [0, x) x [0, y).
    let mut integral = vec![0u64; (w + 1) * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += image.get_pixel(x as u32, y as u32)[0] as u64;
            integral[(y + 1) * (w + 1) + (x + 1)] = integral[y * (w + 1) + (x + 1)] + row_sum;
        }
    }

    let mut out = GrayImage::new(width, height);
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let x0 = (x - half).max(0) as usize;
            let y0 = (y - half).max(0) as usize;
            let x1 = ((x + half + 1).min(w as i64)) as usize;
            let y1 = ((y + half + 1).min(h as i64)) as usize;

            let sum = integral[y1 * (w + 1) + x1] + integral[y0 * (w + 1) + x0]
                - integral[y0 * (w + 1) + x1]
                - integral[y1 * (w + 1) + x0];
            let count = ((x1 - x0) * (y1 - y0)) as u64;
            let mean = (sum / count) as i32;

            let pixel = image.get_pixel(x as u32, y as u32)[0] as i32;
            let value = if pixel > mean - bias { 255 } else { 0 };
            out.put_pixel(x as u32, y as u32, Luma([value]));
        }
    }

    out
}

/// Otsu's method: the threshold maximizing between-class variance.
fn otsu_level(image: &GrayImage) -> u8 {
    let mut hist = [0u64; 256];
    for pixel in image.pixels() {
        hist[pixel[0] as usize] += 1;
    }

    let total: u64 = hist.iter().sum();
    let weighted_sum: u64 = hist
        .iter()
        .enumerate()
        .map(|(v, &count)| v as u64 * count)
        .sum();

    let mut best_level = 0u8;
    let mut best_variance = 0.0f64;
    let mut background = 0u64;
    let mut background_sum = 0u64;

    for level in 0..256usize {
        background += hist[level];
        if background == 0 {
            continue;
        }
        let foreground = total - background;
        if foreground == 0 {
            break;
        }
        background_sum += level as u64 * hist[level];

        let mean_bg = background_sum as f64 / background as f64;
        let mean_fg = (weighted_sum - background_sum) as f64 / foreground as f64;
        let variance =
            background as f64 * foreground as f64 * (mean_bg - mean_fg) * (mean_bg - mean_fg);

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

fn global_threshold(image: &GrayImage, level: u8) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let value = if image.get_pixel(x, y)[0] > level { 255 } else { 0 };
            out.put_pixel(x, y, Luma([value]));
        }
    }
    out
}

// ── Morphology ───────────────────────────────────────────────────────────

const SQUARE_3X3: [(i32, i32); 9] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0), (0, 0), (1, 0),
    (-1, 1), (0, 1), (1, 1),
];

const CROSS_3X3: [(i32, i32); 5] = [(0, -1), (-1, 0), (0, 0), (1, 0), (0, 1)];

/// Erode dark features: each pixel becomes the neighborhood maximum, so
/// isolated dark speckle vanishes.
fn erode_dark(image: &GrayImage, kernel: &[(i32, i32)]) -> GrayImage {
    morph(image, kernel, true)
}

/// Dilate dark features: each pixel becomes the neighborhood minimum,
/// growing dark strokes back.
fn dilate_dark(image: &GrayImage, kernel: &[(i32, i32)]) -> GrayImage {
    morph(image, kernel, false)
}

fn morph(image: &GrayImage, kernel: &[(i32, i32)], take_max: bool) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut out = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut value = if take_max { 0u8 } else { 255u8 };
            for &(dx, dy) in kernel {
                let nx = (x as i32 + dx).clamp(0, width as i32 - 1) as u32;
                let ny = (y as i32 + dy).clamp(0, height as i32 - 1) as u32;
                let p = image.get_pixel(nx, ny)[0];
                value = if take_max { value.max(p) } else { value.min(p) };
            }
            out.put_pixel(x, y, Luma([value]));
        }
    }

    out
}
