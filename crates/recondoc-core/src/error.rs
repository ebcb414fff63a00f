//! Error types for the recondoc-core library.

use thiserror::Error;

/// Main error type for the recondoc library.
///
/// Carries the errors that escape the public surface. `PdfError` has no
/// variant here on purpose: extraction degrades instead of failing, so
/// PDF-level problems never leave the extractor.
#[derive(Error, Debug)]
pub enum RecondocError {
    /// OCR processing error.
    #[cfg(feature = "ocr")]
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Purchase order rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to PDF processing.
///
/// These stay internal to the extraction pipeline: `TextExtractor::extract`
/// catches them and degrades to whatever text was accumulated so far.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to extract images from PDF.
    #[error("failed to extract images: {0}")]
    ImageExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to OCR processing.
#[cfg(feature = "ocr")]
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Errors related to purchase order rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to encode the page content stream.
    #[error("failed to encode content stream: {0}")]
    Encode(String),

    /// Failed to serialize the document.
    #[error("failed to write PDF: {0}")]
    Save(String),
}

/// Errors related to configuration loading and pattern overrides.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error reading or writing the config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON.
    #[error("invalid config file: {0}")]
    Format(String),

    /// A pattern override is not a valid regex.
    #[error("invalid {name} pattern: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for the recondoc library.
pub type Result<T> = std::result::Result<T, RecondocError>;
