//! Production line command handlers

use crate::cli::commands::read_input;
use crate::cli::error::CliError;
use crate::lines::build_line_mapping;
use crate::models::{LineMapping, ProductionLine};
use crate::validation::{LineValidation, validate_line_number, validate_line_range};

/// Arguments for `lines validate`
#[derive(Debug, Clone)]
pub struct LinesValidateArgs {
    /// JSON array of production lines, or `-` for stdin
    pub input: String,
    /// 0-based position of the line being edited
    pub line_index: usize,
    pub candidate: u32,
}

fn load_lines(input: &str) -> Result<Vec<Option<ProductionLine>>, CliError> {
    let content = read_input(input)?;
    serde_json::from_str(&content).map_err(|e| {
        CliError::InvalidArgument(format!("Production lines must be a JSON array: {}", e))
    })
}

/// Handle `lines map`
pub fn handle_lines_map(input: &str) -> Result<LineMapping, CliError> {
    let mapping = build_line_mapping(&load_lines(input)?);
    println!("{}", serde_json::to_string_pretty(&mapping)?);
    Ok(mapping)
}

/// Handle `lines validate`. Prints `{valid, error}` and fails when the
/// number is taken for the call or is not a selectable line number.
pub fn handle_lines_validate(args: &LinesValidateArgs) -> Result<LineValidation, CliError> {
    let lines = load_lines(&args.input)?;
    let result = validate_line_number(&lines, args.line_index, args.candidate)
        .and_then(|()| validate_line_range(args.candidate));
    let validation = LineValidation::from(result.clone());
    println!("{}", serde_json::to_string(&validation)?);
    result.map_err(|e| CliError::ValidationError(e.to_string()))?;
    Ok(validation)
}
