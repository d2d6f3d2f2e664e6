//! Certificate document exporter
//!
//! Rasterizes a render surface and hands the result to a save sink, either
//! as a single-page PDF or as a PNG. One export runs at a time per
//! exporter; a second call while one is running fails with
//! [`ExportError::Busy`].

use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ExportError;
use super::pdf::{PageLayout, PageSize, PdfExportResult, compose_pdf, compute_layout};
use super::raster::{DEFAULT_SCALE_FACTOR, RenderSurface, encode_png};
use super::sink::{SaveSink, SavedFile};

const DEFAULT_TITLE: &str = "Inspection Certificate";

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    #[serde(default)]
    pub page_size: PageSize,

    /// Device pixels per CSS pixel
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f32,

    /// PDF document title
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_scale_factor() -> f32 {
    DEFAULT_SCALE_FACTOR
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            scale_factor: default_scale_factor(),
            title: default_title(),
        }
    }
}

/// PDF bytes with the layout they were composed with
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub layout: PageLayout,
}

/// Clears the in-flight flag when dropped
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Exports rendered certificates
#[derive(Debug, Default)]
pub struct DocumentExporter {
    options: ExportOptions,
    in_flight: AtomicBool,
}

impl DocumentExporter {
    /// Create an exporter with default options (A4, scale 2)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExportOptions) -> Self {
        Self {
            options,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<InFlight<'_>, ExportError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::Busy)?;
        Ok(InFlight(&self.in_flight))
    }

    fn rasterize(&self, surface: &dyn RenderSurface) -> Result<RgbaImage, ExportError> {
        let (width, height) = surface.dimensions();
        let bitmap = surface.rasterize(self.options.scale_factor)?;
        debug!(
            "Rasterized {}x{} surface at scale {} to {}x{}",
            width,
            height,
            self.options.scale_factor,
            bitmap.width(),
            bitmap.height()
        );
        Ok(bitmap)
    }

    fn compose(&self, bitmap: &RgbaImage) -> Result<RenderedPdf, ExportError> {
        let layout = compute_layout(bitmap.width(), bitmap.height(), self.options.page_size)?;
        let bytes = compose_pdf(bitmap, &layout, &self.options.title)?;
        Ok(RenderedPdf { bytes, layout })
    }

    /// Rasterize and compose a PDF without saving it
    pub fn render_pdf(&self, surface: &dyn RenderSurface) -> Result<RenderedPdf, ExportError> {
        let _guard = self.begin()?;
        let bitmap = self.rasterize(surface)?;
        self.compose(&bitmap)
    }

    /// Export `surface` as a single-page PDF saved under `filename`.
    ///
    /// Without a surface nothing is produced and `Ok(None)` is returned.
    pub fn export_to_pdf(
        &self,
        surface: Option<&dyn RenderSurface>,
        filename: &str,
        sink: &dyn SaveSink,
    ) -> Result<Option<SavedFile>, ExportError> {
        let Some(surface) = surface else {
            debug!("No surface to export, skipping {}", filename);
            return Ok(None);
        };
        let _guard = self.begin()?;
        let bitmap = self.rasterize(surface)?;
        let rendered = self.compose(&bitmap)?;
        let saved = sink.save(filename, &rendered.bytes)?;
        info!(
            "Exported PDF {} ({:.1} x {:.1} mm)",
            saved.location, rendered.layout.page_width_mm, rendered.layout.page_height_mm
        );
        Ok(Some(saved))
    }

    /// Export `surface` as a PNG saved under `filename`.
    ///
    /// Without a surface nothing is produced and `Ok(None)` is returned.
    pub fn export_to_image(
        &self,
        surface: Option<&dyn RenderSurface>,
        filename: &str,
        sink: &dyn SaveSink,
    ) -> Result<Option<SavedFile>, ExportError> {
        let Some(surface) = surface else {
            debug!("No surface to export, skipping {}", filename);
            return Ok(None);
        };
        let _guard = self.begin()?;
        let bitmap = self.rasterize(surface)?;
        let png = encode_png(&bitmap)?;
        let saved = sink.save(filename, &png)?;
        info!("Exported image {}", saved.location);
        Ok(Some(saved))
    }

    /// Export as base64 for callers that save the file themselves
    pub fn export_to_base64(
        &self,
        surface: &dyn RenderSurface,
        filename: &str,
    ) -> Result<PdfExportResult, ExportError> {
        let rendered = self.render_pdf(surface)?;
        let pdf_base64 =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &rendered.bytes);
        Ok(PdfExportResult {
            pdf_base64,
            filename: filename.to_string(),
            page_count: 1,
            title: self.options.title.clone(),
            layout: rendered.layout,
        })
    }
}
