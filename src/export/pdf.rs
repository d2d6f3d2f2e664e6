//! Single-page PDF composition
//!
//! A certificate is exported as one page holding one raster image. The page
//! is a fixed width (A4 by default) and exactly as tall as the image once it
//! is scaled to that width, so nothing is cropped and the aspect ratio is
//! kept.
//!
//! ## WASM Compatibility
//!
//! The writer only produces bytes; saving is left to a [`SaveSink`] or to
//! the caller via [`PdfExportResult`].
//!
//! [`SaveSink`]: crate::export::sink::SaveSink

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use chrono::Utc;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::export::ExportError;

/// Points per millimetre
pub const PT_PER_MM: f64 = 2.83465;

const PRODUCER: &str = "Inspection Certificate SDK";

/// Page size options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// A4 paper size (210 x 297 mm)
    #[default]
    A4,
    /// US Letter size (8.5 x 11 inches)
    Letter,
}

impl PageSize {
    /// Get page dimensions in millimeters (width, height)
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }

    pub fn width_mm(&self) -> f64 {
        self.dimensions_mm().0
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            _ => Err(format!("Unknown page size: {}. Use 'a4' or 'letter'.", s)),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::A4 => write!(f, "a4"),
            PageSize::Letter => write!(f, "letter"),
        }
    }
}

/// Physical placement of a bitmap on the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub image_width_mm: f64,
    pub image_height_mm: f64,
    pub bitmap_width_px: u32,
    pub bitmap_height_px: u32,
}

impl PageLayout {
    pub fn page_width_pt(&self) -> f64 {
        self.page_width_mm * PT_PER_MM
    }

    pub fn page_height_pt(&self) -> f64 {
        self.page_height_mm * PT_PER_MM
    }
}

/// Result of PDF export operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfExportResult {
    /// PDF content as base64-encoded bytes
    pub pdf_base64: String,
    /// Filename suggestion
    pub filename: String,
    /// Number of pages
    pub page_count: u32,
    /// Document title
    pub title: String,
    pub layout: PageLayout,
}

/// Fit a bitmap to the page width.
///
/// Image height is `bitmap_height * page_width / bitmap_width` and the page
/// takes the same height.
///
/// ```
/// use inspection_cert_sdk::export::{PageSize, compute_layout};
///
/// let layout = compute_layout(1000, 2000, PageSize::A4).unwrap();
/// assert_eq!(layout.page_width_mm, 210.0);
/// assert_eq!(layout.page_height_mm, 420.0);
/// ```
pub fn compute_layout(
    bitmap_width: u32,
    bitmap_height: u32,
    page_size: PageSize,
) -> Result<PageLayout, ExportError> {
    if bitmap_width == 0 || bitmap_height == 0 {
        return Err(ExportError::RasterizeError(format!(
            "Rendered bitmap is empty ({}x{})",
            bitmap_width, bitmap_height
        )));
    }
    let page_width = page_size.width_mm();
    let image_height = f64::from(bitmap_height) * (page_width / f64::from(bitmap_width));
    debug!(
        "Layout {}x{} px -> {:.2}x{:.2} mm",
        bitmap_width, bitmap_height, page_width, image_height
    );
    Ok(PageLayout {
        page_width_mm: page_width,
        page_height_mm: image_height,
        image_width_mm: page_width,
        image_height_mm: image_height,
        bitmap_width_px: bitmap_width,
        bitmap_height_px: bitmap_height,
    })
}

/// Write a PDF 1.4 document with one page showing `image` as laid out.
///
/// Objects: 1 catalog, 2 pages, 3 page, 4 content stream, 5 image, 6 info.
/// Transparent pixels are composited on white.
pub fn compose_pdf(image: &RgbaImage, layout: &PageLayout, title: &str) -> Result<Vec<u8>, ExportError> {
    let width_pt = layout.page_width_pt();
    let height_pt = layout.page_height_pt();
    let image_width_pt = layout.image_width_mm * PT_PER_MM;
    let image_height_pt = layout.image_height_mm * PT_PER_MM;

    let pixels = flate_compress(&flatten_on_white(image))?;

    let mut pdf = Vec::new();

    // PDF Header
    pdf.extend_from_slice(b"%PDF-1.4\n");
    pdf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

    let mut xref_positions: Vec<usize> = Vec::new();

    // Object 1: Catalog
    xref_positions.push(pdf.len());
    pdf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    // Object 2: Pages
    xref_positions.push(pdf.len());
    pdf.extend_from_slice(b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");

    // Object 3: Page
    xref_positions.push(pdf.len());
    let page_obj = format!(
        "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents 4 0 R /Resources << /XObject << /Im1 5 0 R >> >> >>\nendobj\n",
        width_pt, height_pt
    );
    pdf.extend_from_slice(page_obj.as_bytes());

    // Object 4: Content stream, image drawn from the page origin
    xref_positions.push(pdf.len());
    let content_stream = format!(
        "q {:.2} 0 0 {:.2} 0 {:.2} cm /Im1 Do Q",
        image_width_pt,
        image_height_pt,
        height_pt - image_height_pt
    );
    let content_obj = format!(
        "4 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
        content_stream.len(),
        content_stream
    );
    pdf.extend_from_slice(content_obj.as_bytes());

    // Object 5: Image XObject
    xref_positions.push(pdf.len());
    let image_header = format!(
        "5 0 obj\n<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode /Length {} >>\nstream\n",
        image.width(),
        image.height(),
        pixels.len()
    );
    pdf.extend_from_slice(image_header.as_bytes());
    pdf.extend_from_slice(&pixels);
    pdf.extend_from_slice(b"\nendstream\nendobj\n");

    // Object 6: Info dictionary
    let info_obj_id = 6;
    xref_positions.push(pdf.len());
    let timestamp = Utc::now().format("D:%Y%m%d%H%M%S").to_string();
    let info_obj = format!(
        "{} 0 obj\n<< /Title ({}) /Producer ({}) /Creator ({}) /CreationDate ({}) >>\nendobj\n",
        info_obj_id,
        escape_pdf_string(title),
        PRODUCER,
        PRODUCER,
        timestamp
    );
    pdf.extend_from_slice(info_obj.as_bytes());

    // Cross-reference table
    let xref_start = pdf.len();
    pdf.extend_from_slice(b"xref\n");
    pdf.extend_from_slice(format!("0 {}\n", xref_positions.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for pos in &xref_positions {
        pdf.extend_from_slice(format!("{:010} 00000 n \n", pos).as_bytes());
    }

    // Trailer
    pdf.extend_from_slice(b"trailer\n");
    pdf.extend_from_slice(
        format!(
            "<< /Size {} /Root 1 0 R /Info {} 0 R >>\n",
            xref_positions.len() + 1,
            info_obj_id
        )
        .as_bytes(),
    );
    pdf.extend_from_slice(b"startxref\n");
    pdf.extend_from_slice(format!("{}\n", xref_start).as_bytes());
    pdf.extend_from_slice(b"%%EOF\n");

    Ok(pdf)
}

/// RGB bytes with alpha blended onto a white background
fn flatten_on_white(image: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(image.width() as usize * image.height() as usize * 3);
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        for channel in [r, g, b] {
            let blended = (u16::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}

fn flate_compress(data: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Escape a string for use in a PDF literal
fn escape_pdf_string(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '(' => result.push_str("\\("),
            ')' => result.push_str("\\)"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ if c.is_ascii() => result.push(c),
            _ => result.push('?'),
        }
    }
    result
}
