//! Template command handlers

use crate::cli::commands::{check_file_overwrite, write_output};
use crate::cli::error::CliError;
use crate::export::export_template;
use crate::import::{CsvMode, read_template_file};
use crate::validation::validate_template_name;
use std::path::PathBuf;

/// Arguments for `template build`
#[derive(Debug, Clone)]
pub struct TemplateBuildArgs {
    pub name: String,
    pub sample_size: usize,
    pub value_label: String,
    /// Directory the template is written to
    pub output_dir: PathBuf,
    pub force: bool,
    /// Print the CSV instead of writing a file
    pub stdout: bool,
}

/// Arguments for `template import`
#[derive(Debug, Clone)]
pub struct TemplateImportArgs {
    pub input: PathBuf,
    pub sample_size: usize,
    pub mode: CsvMode,
    /// Print values as a JSON array instead of one per line
    pub json: bool,
}

/// Handle `template build`; returns the written path, if any
pub fn handle_template_build(args: &TemplateBuildArgs) -> Result<Option<PathBuf>, CliError> {
    validate_template_name(&args.name).map_err(|e| CliError::ValidationError(e.to_string()))?;
    let export = export_template(&args.name, args.sample_size, &args.value_label)?;

    if args.stdout {
        println!("{}", export.content);
        return Ok(None);
    }

    let output_path = args.output_dir.join(&export.filename);
    check_file_overwrite(&output_path, args.force)?;
    write_output(&output_path, &export.content)?;
    println!(
        "✅ Wrote template with {} samples: {}",
        export.sample_size,
        output_path.display()
    );
    Ok(Some(output_path))
}

/// Handle `template import`; returns the imported values
pub fn handle_template_import(args: &TemplateImportArgs) -> Result<Vec<String>, CliError> {
    if !args.input.exists() {
        return Err(CliError::FileNotFound(args.input.clone()));
    }
    let imported = read_template_file(&args.input, args.sample_size, args.mode)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&imported.values)?);
    } else {
        for value in &imported.values {
            println!("{}", value);
        }
    }
    eprintln!("{}", imported.summary());
    Ok(imported.values)
}
