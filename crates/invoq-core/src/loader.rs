//! Decoding input bytes into a canonical RGB bitmap.

use image::DynamicImage;
use tracing::warn;

/// Decodes uploaded bytes (raster image or first page of a PDF) to RGB.
///
/// `None` always means "no bitmap available, proceed to fallback" and is
/// never an error: decode failures and missing capabilities are logged and
/// absorbed here.
#[derive(Debug, Default)]
pub struct ImageLoader;

impl ImageLoader {
    pub fn new() -> Self {
        Self
    }

    /// Decode `bytes` into an RGB bitmap, or `None` if that is not possible.
    ///
    /// A content type containing the literal substring `"pdf"` (matched
    /// case-sensitively) selects the PDF path; anything else is decoded as a
    /// raster image.
    pub fn load(&self, bytes: &[u8], content_type: Option<&str>) -> Option<DynamicImage> {
        if content_type.is_some_and(|ct| ct.contains("pdf")) {
            return self.load_pdf(bytes);
        }

        match image::load_from_memory(bytes) {
            Ok(img) => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
            Err(e) => {
                warn!("failed to decode image bytes: {}", e);
                None
            }
        }
    }

    #[cfg(feature = "pdf")]
    fn load_pdf(&self, bytes: &[u8]) -> Option<DynamicImage> {
        match crate::pdf::first_page_image(bytes) {
            Ok(img) => Some(img),
            Err(e) => {
                warn!("failed to rasterize PDF first page: {}", e);
                None
            }
        }
    }

    #[cfg(not(feature = "pdf"))]
    fn load_pdf(&self, _bytes: &[u8]) -> Option<DynamicImage> {
        warn!("built without PDF support, cannot rasterize PDF input");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::new_rgb8(8, 8);
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        bytes
    }

    #[test]
    fn test_decodes_png_to_rgb() {
        let loader = ImageLoader::new();
        let img = loader.load(&png_bytes(), Some("image/png")).unwrap();
        assert_eq!(img.dimensions(), (8, 8));
        assert!(matches!(img, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_corrupt_bytes_yield_none() {
        let loader = ImageLoader::new();
        assert!(loader.load(b"definitely not an image", None).is_none());
    }

    #[test]
    fn test_pdf_content_type_with_corrupt_bytes_yields_none() {
        let loader = ImageLoader::new();
        assert!(
            loader
                .load(b"not a pdf", Some("application/pdf"))
                .is_none()
        );
    }

    #[test]
    fn test_pdf_detection_is_case_sensitive() {
        // "PDF" does not match; the bytes go down the raster path and fail.
        let loader = ImageLoader::new();
        assert!(loader.load(b"%PDF-1.4", Some("application/PDF")).is_none());
    }
}
