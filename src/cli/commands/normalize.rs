//! Normalize command handler

use crate::cli::commands::{check_file_overwrite, read_input, write_output};
use crate::cli::error::CliError;
use crate::models::{CallRecord, CertificateKind, CertificateViewModel};
use crate::normalize::normalize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Arguments for `normalize`
#[derive(Debug, Clone)]
pub struct NormalizeArgs {
    pub kind: CertificateKind,
    /// Call record JSON file, or `-` for stdin
    pub input: String,
    /// JSON object of manual field edits applied after normalization
    pub overrides: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub force: bool,
    pub pretty: bool,
}

/// Load and normalize a call record file
pub fn load_view_model(
    kind: CertificateKind,
    input: &str,
) -> Result<CertificateViewModel, CliError> {
    let content = read_input(input)?;
    let call = CallRecord::from_json(&content)
        .map_err(|e| CliError::InvalidArgument(format!("Invalid call record JSON: {}", e)))?;
    Ok(normalize(kind, &call))
}

/// Handle `normalize`; returns the view model that was written
pub fn handle_normalize(args: &NormalizeArgs) -> Result<CertificateViewModel, CliError> {
    let mut model = load_view_model(args.kind, &args.input)?;

    if let Some(path) = &args.overrides {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::FileReadError(path.clone(), e.to_string()))?;
        let edits: BTreeMap<String, String> = serde_json::from_str(&content).map_err(|e| {
            CliError::InvalidArgument(format!(
                "Overrides must be a JSON object of strings: {}",
                e
            ))
        })?;
        let ignored = model.apply_overrides(&edits);
        if !ignored.is_empty() {
            eprintln!("⚠️  Ignored unknown fields: {}", ignored.join(", "));
        }
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&model)?
    } else {
        serde_json::to_string(&model)?
    };

    match &args.output {
        Some(path) => {
            check_file_overwrite(path, args.force)?;
            write_output(path, &json)?;
            println!("✅ Wrote {} certificate data: {}", args.kind, path.display());
        }
        None => println!("{}", json),
    }
    Ok(model)
}
