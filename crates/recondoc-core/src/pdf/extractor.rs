//! PDF text extraction using pdf-extract with an OCR fallback.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use crate::error::PdfError;
use crate::models::config::{PdfConfig, RecondocConfig};
use crate::models::record::{ExtractedText, ExtractionMethod};

#[cfg(feature = "ocr")]
use crate::ocr::OcrEngine;
#[cfg(feature = "ocr")]
use image::{DynamicImage, ImageBuffer, Rgba};
#[cfg(feature = "ocr")]
use lopdf::{Object, ObjectId};

/// Best-effort text extractor for uploaded documents.
///
/// Runs a layout-aware embedded-text pass first and falls back to OCR over
/// page images when the document carries no usable text. Every stage failure
/// is caught and degrades to whatever text was accumulated so far:
/// [`TextExtractor::extract`] never returns an error, because downstream
/// reconciliation treats empty or absent fields as mismatches rather than
/// crashes.
pub struct TextExtractor {
    config: PdfConfig,
    #[cfg(feature = "ocr")]
    ocr: Option<OcrEngine>,
}

impl TextExtractor {
    /// Create an extractor with default settings and no OCR fallback.
    pub fn new() -> Self {
        Self::with_config(PdfConfig::default())
    }

    /// Create an extractor with explicit PDF settings.
    pub fn with_config(config: PdfConfig) -> Self {
        Self {
            config,
            #[cfg(feature = "ocr")]
            ocr: None,
        }
    }

    /// Attach an OCR engine for the fallback pass.
    #[cfg(feature = "ocr")]
    pub fn with_ocr(mut self, engine: OcrEngine) -> Self {
        self.ocr = Some(engine);
        self
    }

    /// Build an extractor from configuration, loading OCR models when the
    /// configured model directory has them.
    pub fn from_config(config: &RecondocConfig) -> crate::error::Result<Self> {
        #[cfg(feature = "ocr")]
        {
            let ocr = if config.ocr.detection_path().exists() {
                Some(OcrEngine::from_config(&config.ocr)?)
            } else {
                debug!(
                    "no OCR models at {}, fallback disabled",
                    config.ocr.model_dir.display()
                );
                None
            };
            Ok(Self {
                config: config.pdf.clone(),
                ocr,
            })
        }
        #[cfg(not(feature = "ocr"))]
        Ok(Self {
            config: config.pdf.clone(),
        })
    }

    /// Extract text from PDF bytes.
    ///
    /// Returns partial or empty text instead of failing; `method: None`
    /// means the bytes could not be opened as a PDF at all.
    pub fn extract(&self, data: &[u8]) -> ExtractedText {
        let (doc, raw) = match load(data) {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("cannot open PDF: {}", e);
                return ExtractedText::not_attempted();
            }
        };

        let pages = doc.get_pages().len() as u32;

        let embedded = match embedded_text(&raw) {
            Ok(text) => text,
            Err(e) => {
                warn!("embedded text extraction failed: {}", e);
                String::new()
            }
        };

        let chars = embedded.chars().filter(|c| !c.is_whitespace()).count();
        let threshold = self.config.min_text_chars.max(1);
        if chars >= threshold {
            debug!("embedded pass yielded {} chars over {} pages", chars, pages);
            return ExtractedText {
                text: embedded,
                method: Some(ExtractionMethod::Embedded),
                pages,
            };
        }

        #[cfg(feature = "ocr")]
        if let Some(engine) = &self.ocr {
            debug!("embedded pass blank, falling back to OCR");
            let text = self.ocr_pages(&doc, pages, engine);
            if !text.trim().is_empty() {
                return ExtractedText {
                    text,
                    method: Some(ExtractionMethod::Ocr),
                    pages,
                };
            }
        }

        // Nothing better to offer; the embedded pass ran, so this counts
        // as attempted.
        ExtractedText {
            text: embedded,
            method: Some(ExtractionMethod::Embedded),
            pages,
        }
    }

    /// Extract text from a PDF file on disk.
    pub fn extract_path(&self, path: &Path) -> ExtractedText {
        match std::fs::read(path) {
            Ok(data) => self.extract(&data),
            Err(e) => {
                warn!("cannot read {}: {}", path.display(), e);
                ExtractedText::not_attempted()
            }
        }
    }

    /// OCR every page image, in page order, up to the configured cap.
    #[cfg(feature = "ocr")]
    fn ocr_pages(&self, doc: &Document, pages: u32, engine: &OcrEngine) -> String {
        let cap = if self.config.max_pages == 0 {
            pages
        } else {
            pages.min(self.config.max_pages as u32)
        };

        let mut texts = Vec::new();
        let mut images_seen = 0usize;

        for page in 1..=cap {
            let images = match page_images(doc, page) {
                Ok(images) => images,
                Err(e) => {
                    warn!("image extraction failed on page {}: {}", page, e);
                    continue;
                }
            };

            images_seen += images.len();
            for image in &images {
                self.ocr_image(engine, image, page, &mut texts);
            }
        }

        // Some scanned PDFs reference their images outside the page
        // resource dictionaries; scan the whole object table once.
        if images_seen == 0 {
            debug!("no page-level images found, scanning all objects");
            for image in all_images(doc) {
                self.ocr_image(engine, &image, 0, &mut texts);
            }
        }

        texts.join("\n\n")
    }

    #[cfg(feature = "ocr")]
    fn ocr_image(
        &self,
        engine: &OcrEngine,
        image: &DynamicImage,
        page: u32,
        texts: &mut Vec<String>,
    ) {
        match engine.recognize(image) {
            Ok(text) if !text.trim().is_empty() => texts.push(text),
            Ok(_) => debug!("no text recognized on page {}", page),
            Err(e) => warn!("OCR failed on page {}: {}", page, e),
        }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a PDF, decrypting empty-password encryption, and keep raw bytes
/// suitable for pdf-extract.
fn load(data: &[u8]) -> Result<(Document, Vec<u8>), PdfError> {
    let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

    let raw = if doc.is_encrypted() {
        if doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        debug!("decrypted PDF with empty password");

        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted)
            .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
        decrypted
    } else {
        data.to_vec()
    };

    if doc.get_pages().is_empty() {
        return Err(PdfError::NoPages);
    }

    Ok((doc, raw))
}

fn embedded_text(raw: &[u8]) -> Result<String, PdfError> {
    pdf_extract::extract_text_from_mem(raw).map_err(|e| PdfError::TextExtraction(e.to_string()))
}

/// Extract the images referenced by one page's resources.
#[cfg(feature = "ocr")]
fn page_images(doc: &Document, page: u32) -> Result<Vec<DynamicImage>, PdfError> {
    let pages = doc.get_pages();
    let page_id = pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

    let mut images = Vec::new();

    if let Some(resources) = page_resources(doc, *page_id) {
        if let Ok(xobjects) = resources.get(b"XObject") {
            if let Ok((_, Object::Dictionary(xobj_dict))) = doc.dereference(xobjects) {
                for (_name, obj_ref) in xobj_dict.iter() {
                    if let Ok((_, obj)) = doc.dereference(obj_ref) {
                        if let Some(img) = image_from_object(obj) {
                            images.push(img);
                        }
                    }
                }
            }
        }
    }

    debug!("extracted {} images from page {}", images.len(), page);
    Ok(images)
}

/// Scan the whole object table for image XObjects.
#[cfg(feature = "ocr")]
fn all_images(doc: &Document) -> Vec<DynamicImage> {
    let mut images = Vec::new();

    for object in doc.objects.values() {
        if let Some(img) = image_from_object(object) {
            images.push(img);
        }
    }

    debug!("found {} images in document", images.len());
    images
}

/// Resources dictionary for a page, following Parent inheritance.
#[cfg(feature = "ocr")]
fn page_resources(doc: &Document, node_id: ObjectId) -> Option<lopdf::Dictionary> {
    let node = doc.get_object(node_id).ok()?;
    if let Object::Dictionary(dict) = node {
        if let Ok(resources) = dict.get(b"Resources") {
            if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
                return Some(res_dict.clone());
            }
        }

        if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
            return page_resources(doc, *parent_id);
        }
    }
    None
}

#[cfg(feature = "ocr")]
fn image_from_object(obj: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = obj else {
        return None;
    };
    let dict = &stream.dict;

    let subtype = dict.get(b"Subtype").ok()?;
    if subtype.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;

    let data = match stream.decompressed_content() {
        Ok(d) => d,
        Err(_) => stream.content.clone(),
    };

    if let Ok(filter) = dict.get(b"Filter") {
        let filter_name = match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) if !arr.is_empty() => arr.first().and_then(|o| o.as_name().ok()),
            _ => None,
        };

        match filter_name {
            Some(b"DCTDecode") => {
                // JPEG stream content is already compressed image data.
                return image::load_from_memory_with_format(
                    &stream.content,
                    image::ImageFormat::Jpeg,
                )
                .ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                debug!("unsupported image filter in PDF, skipping");
                return None;
            }
            _ => {}
        }
    }

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8) as u8;

    image_from_raw(&data, width, height, color_space, bits)
}

#[cfg(feature = "ocr")]
fn image_from_raw(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
    bits_per_component: u8,
) -> Option<DynamicImage> {
    if bits_per_component != 8 {
        return None;
    }

    let expected_rgb = (width * height * 3) as usize;
    let expected_gray = (width * height) as usize;

    if (color_space == b"DeviceRGB" || color_space == b"RGB") && data.len() >= expected_rgb {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for chunk in data[..expected_rgb].chunks(3) {
            rgba.extend_from_slice(chunk);
            rgba.push(255);
        }
        return ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba)
            .map(DynamicImage::ImageRgba8);
    }

    if (color_space == b"DeviceGray" || color_space == b"G") && data.len() >= expected_gray {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for &gray in &data[..expected_gray] {
            rgba.extend_from_slice(&[gray, gray, gray, 255]);
        }
        return ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba)
            .map(DynamicImage::ImageRgba8);
    }

    None
}
