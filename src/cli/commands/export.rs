//! Certificate export command handlers

use crate::cli::commands::check_file_overwrite;
use crate::cli::commands::normalize::load_view_model;
use crate::cli::error::CliError;
use crate::export::{BitmapSurface, DirectorySink, DocumentExporter, ExportOptions, SavedFile};
use crate::models::CertificateKind;
use crate::validation::certificate_filename;
use std::path::PathBuf;

/// Output format for `export`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Image,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Image => "png",
        }
    }
}

/// Arguments for `export pdf` and `export image`
#[derive(Debug, Clone)]
pub struct ExportArgs {
    /// Rendered certificate bitmap
    pub image: PathBuf,
    pub kind: CertificateKind,
    /// Certificate number used to name the file
    pub certificate_no: Option<String>,
    /// Call record JSON to take the certificate number from
    pub call: Option<String>,
    pub output_dir: PathBuf,
    /// Explicit output filename; overrides the certificate number
    pub filename: Option<String>,
    pub force: bool,
    pub options: ExportOptions,
}

/// Output filename: explicit name, else certificate number, else the
/// kind's default stem
pub fn resolve_filename(args: &ExportArgs, format: ExportFormat) -> Result<String, CliError> {
    if let Some(name) = &args.filename {
        return Ok(name.clone());
    }
    let certificate_no = match (&args.certificate_no, &args.call) {
        (Some(no), _) => no.clone(),
        (None, Some(call)) => load_view_model(args.kind, call)?
            .get("certificateNo")
            .to_string(),
        (None, None) => String::new(),
    };
    Ok(certificate_filename(
        &certificate_no,
        args.kind.default_file_stem(),
        format.extension(),
    ))
}

fn handle_export(args: &ExportArgs, format: ExportFormat) -> Result<SavedFile, CliError> {
    if !args.image.exists() {
        return Err(CliError::FileNotFound(args.image.clone()));
    }
    let filename = resolve_filename(args, format)?;
    check_file_overwrite(&args.output_dir.join(&filename), args.force)?;

    let surface = BitmapSurface::open(&args.image)?;
    let exporter = DocumentExporter::with_options(args.options.clone());
    let sink = DirectorySink::new(&args.output_dir);

    let saved = match format {
        ExportFormat::Pdf => exporter.export_to_pdf(Some(&surface), &filename, &sink)?,
        ExportFormat::Image => exporter.export_to_image(Some(&surface), &filename, &sink)?,
    };
    let saved = saved.ok_or_else(|| {
        CliError::InvalidArgument(format!("Nothing was exported from {}", args.image.display()))
    })?;
    println!(
        "✅ Exported {} ({} bytes): {}",
        args.kind, saved.bytes_written, saved.location
    );
    Ok(saved)
}

/// Handle `export pdf`
pub fn handle_export_pdf(args: &ExportArgs) -> Result<SavedFile, CliError> {
    handle_export(args, ExportFormat::Pdf)
}

/// Handle `export image`
pub fn handle_export_image(args: &ExportArgs) -> Result<SavedFile, CliError> {
    handle_export(args, ExportFormat::Image)
}
