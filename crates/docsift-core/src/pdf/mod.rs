//! PDF rasterization module.

mod rasterizer;

pub use rasterizer::PdfRasterizer;

use image::DynamicImage;

/// Where a page bitmap came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrigin {
    /// The input was already a raster image file.
    NativeImage,
    /// The page was rendered from a PDF.
    RasterizedPdf,
}

/// An in-memory page bitmap, owned transiently by one pipeline invocation
/// and discarded after recognition.
#[derive(Debug)]
pub struct RawPage {
    /// Decoded bitmap.
    pub image: DynamicImage,

    /// 1-indexed page number within the source document.
    pub index: u32,

    /// Source of the bitmap.
    pub origin: PageOrigin,
}

/// Result type for rasterization operations.
pub type Result<T> = std::result::Result<T, crate::error::RasterError>;
