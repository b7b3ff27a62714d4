//! PDF page rasterization with backend fallback.
//!
//! The source is validated with `lopdf` first (parse failure or a zero
//! page count is an [`RasterError::InvalidDocument`]), then an ordered list
//! of rendering backends is tried: `pdftoppm` from a set of candidate
//! locations, and finally extraction of page-embedded images for scanned
//! PDFs that wrap one bitmap per page. The first backend to produce pages
//! wins; when all fail the last underlying error is reported.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Document, Object};
use tracing::{debug, info, warn};

use super::{PageOrigin, RawPage, Result};
use crate::error::RasterError;
use crate::models::config::PdfConfig;

/// Renders PDF pages to in-memory bitmaps at a fixed resolution.
pub struct PdfRasterizer {
    dpi: u32,
    max_pages: usize,
}

impl PdfRasterizer {
    pub fn new(config: &PdfConfig) -> Self {
        Self {
            dpi: config.render_dpi.max(150),
            max_pages: config.max_pages.max(1),
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi.max(150);
        self
    }

    /// Rasterize every page of the PDF at `path`, in page order.
    pub fn rasterize(&self, path: &Path) -> Result<Vec<RawPage>> {
        let data = std::fs::read(path)
            .map_err(|e| RasterError::InvalidDocument(format!("cannot read file: {e}")))?;
        let page_count = validate(&data)?;
        debug!(pages = page_count, dpi = self.dpi, "rasterizing PDF");

        let images = self.run_backends(path, &data)?;
        Ok(images
            .into_iter()
            .take(self.max_pages)
            .enumerate()
            .map(|(i, image)| RawPage {
                image,
                index: i as u32 + 1,
                origin: PageOrigin::RasterizedPdf,
            })
            .collect())
    }

    fn run_backends(&self, path: &Path, data: &[u8]) -> Result<Vec<DynamicImage>> {
        let mut last_error = String::from("no rasterization backend available");

        for binary in pdftoppm_candidates() {
            match rasterize_with_pdftoppm(&binary, path, self.dpi) {
                Ok(pages) => {
                    info!(backend = %binary.display(), pages = pages.len(), "rasterized PDF");
                    return Ok(pages);
                }
                Err(e) => {
                    debug!(backend = %binary.display(), error = %e, "backend attempt failed");
                    last_error = e;
                }
            }
        }

        match extract_embedded_images(data) {
            Ok(pages) => {
                info!(pages = pages.len(), "recovered embedded page images");
                Ok(pages)
            }
            Err(e) => {
                let message = format!("{e}; last renderer error: {last_error}");
                warn!(error = %message, "all rasterization backends exhausted");
                Err(RasterError::RasterizationFailed(message))
            }
        }
    }
}

/// Parse the document and confirm it has at least one page.
fn validate(data: &[u8]) -> Result<u32> {
    if data.is_empty() {
        return Err(RasterError::InvalidDocument("file is empty".to_string()));
    }

    let mut doc =
        Document::load_mem(data).map_err(|e| RasterError::InvalidDocument(e.to_string()))?;

    if doc.is_encrypted() && doc.decrypt("").is_err() {
        return Err(RasterError::InvalidDocument("PDF is encrypted".to_string()));
    }

    let pages = doc.get_pages().len();
    if pages == 0 {
        return Err(RasterError::InvalidDocument("PDF has no pages".to_string()));
    }
    Ok(pages as u32)
}

/// Candidate `pdftoppm` locations, tried in order. Mirrors the usual spots
/// a poppler install lands in, plus an explicit override.
fn pdftoppm_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("pdftoppm")];
    if let Ok(dir) = std::env::var("POPPLER_PATH") {
        if !dir.is_empty() {
            candidates.push(Path::new(&dir).join("pdftoppm"));
        }
    }
    for dir in ["/usr/bin", "/usr/local/bin", "/opt/homebrew/bin"] {
        candidates.push(Path::new(dir).join("pdftoppm"));
    }
    candidates
}

fn rasterize_with_pdftoppm(
    binary: &Path,
    pdf_path: &Path,
    dpi: u32,
) -> std::result::Result<Vec<DynamicImage>, String> {
    let dir = tempfile::tempdir().map_err(|e| e.to_string())?;
    let prefix = dir.path().join("page");

    let output = Command::new(binary)
        .arg("-r")
        .arg(dpi.to_string())
        .arg("-png")
        .arg(pdf_path)
        .arg(&prefix)
        .output()
        .map_err(|e| format!("failed to run {}: {e}", binary.display()))?;

    if !output.status.success() {
        return Err(format!(
            "{} exited with {}: {}",
            binary.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    // pdftoppm names outputs page-1.png, page-2.png, ...; sort numerically
    // so page 10 does not land before page 2.
    let mut outputs: Vec<(u32, PathBuf)> = std::fs::read_dir(dir.path())
        .map_err(|e| e.to_string())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|e| e == "png"))
        .filter_map(|p| Some((page_number_of(&p)?, p)))
        .collect();
    outputs.sort_by_key(|(n, _)| *n);

    if outputs.is_empty() {
        return Err("pdftoppm produced no pages".to_string());
    }

    outputs
        .into_iter()
        .map(|(_, p)| image::open(&p).map_err(|e| e.to_string()))
        .collect()
}

fn page_number_of(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    stem.rsplit('-').next()?.parse().ok()
}

// ── Embedded-image fallback ──────────────────────────────────────────────

/// Pull page-embedded image XObjects out of the document, in page order.
/// Scanned PDFs typically carry exactly one full-page bitmap per page.
fn extract_embedded_images(data: &[u8]) -> std::result::Result<Vec<DynamicImage>, String> {
    let mut doc = Document::load_mem(data).map_err(|e| e.to_string())?;
    if doc.is_encrypted() {
        doc.decrypt("").map_err(|_| "PDF is encrypted".to_string())?;
    }

    let mut pages = Vec::new();
    for (_, page_id) in doc.get_pages() {
        let Some(resources) = page_resources(&doc, page_id) else {
            continue;
        };
        let Ok(xobjects) = resources.get(b"XObject") else {
            continue;
        };
        let Ok((_, Object::Dictionary(xobjects))) = doc.dereference(xobjects) else {
            continue;
        };

        for (_, object_ref) in xobjects.iter() {
            if let Ok((_, object)) = doc.dereference(object_ref) {
                if let Some(image) = decode_image_object(&doc, object) {
                    pages.push(image);
                    break; // one bitmap per page
                }
            }
        }
    }

    if pages.is_empty() {
        Err("no embedded page images found".to_string())
    } else {
        Ok(pages)
    }
}

/// Resources dictionary for a page, walking up the page tree for inherited
/// entries.
fn page_resources(doc: &Document, page_id: lopdf::ObjectId) -> Option<lopdf::Dictionary> {
    let mut node_id = page_id;
    loop {
        let Object::Dictionary(dict) = doc.get_object(node_id).ok()? else {
            return None;
        };
        if let Ok(resources) = dict.get(b"Resources") {
            if let Ok((_, Object::Dictionary(resources))) = doc.dereference(resources) {
                return Some(resources.clone());
            }
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => node_id = *parent,
            _ => return None,
        }
    }
}

fn decode_image_object(doc: &Document, object: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = object else {
        return None;
    };
    let dict = &stream.dict;
    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;

    // JPEG-compressed streams decode directly from the raw content.
    if let Ok(filter) = dict.get(b"Filter") {
        let filter_name = match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(list) => list.first().and_then(|o| o.as_name().ok()),
            _ => None,
        };
        match filter_name {
            Some(b"DCTDecode") => {
                return image::load_from_memory_with_format(
                    &stream.content,
                    image::ImageFormat::Jpeg,
                )
                .ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                debug!("unsupported image filter in PDF, skipping object");
                return None;
            }
            _ => {}
        }
    }

    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(list) => list.first().and_then(|o| o.as_name().ok()),
            Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        return None;
    }

    raw_to_image(&data, width, height, color_space)
}

fn raw_to_image(data: &[u8], width: u32, height: u32, color_space: &[u8]) -> Option<DynamicImage> {
    let pixels = (width * height) as usize;
    let mut rgba = Vec::with_capacity(pixels * 4);

    match color_space {
        b"DeviceRGB" | b"RGB" if data.len() >= pixels * 3 => {
            for chunk in data[..pixels * 3].chunks_exact(3) {
                rgba.extend_from_slice(&[chunk[0], chunk[1], chunk[2], 255]);
            }
        }
        b"DeviceGray" | b"G" if data.len() >= pixels => {
            for &gray in &data[..pixels] {
                rgba.extend_from_slice(&[gray, gray, gray, 255]);
            }
        }
        _ => return None,
    }

    ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba).map(DynamicImage::ImageRgba8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn garbage_bytes_are_an_invalid_document() {
        let err = validate(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, RasterError::InvalidDocument(_)));
    }

    #[test]
    fn empty_bytes_are_an_invalid_document() {
        let err = validate(b"").unwrap_err();
        assert!(matches!(err, RasterError::InvalidDocument(_)));
    }

    #[test]
    fn zero_page_pdf_is_an_invalid_document() {
        // A syntactically valid document with an empty page tree.
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();

        let err = validate(&data).unwrap_err();
        assert!(matches!(err, RasterError::InvalidDocument(_)));
    }

    #[test]
    fn candidate_list_starts_with_path_lookup() {
        let candidates = pdftoppm_candidates();
        assert_eq!(candidates[0], PathBuf::from("pdftoppm"));
        assert!(candidates.len() >= 4);
    }

    #[test]
    fn page_numbers_sort_numerically() {
        assert_eq!(page_number_of(Path::new("/tmp/x/page-2.png")), Some(2));
        assert_eq!(page_number_of(Path::new("/tmp/x/page-10.png")), Some(10));
        assert_eq!(page_number_of(Path::new("/tmp/x/cover.png")), None);
    }
}
