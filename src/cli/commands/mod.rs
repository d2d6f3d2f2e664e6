//! CLI command implementations

pub mod export;
pub mod lines;
pub mod normalize;
pub mod template;

use crate::cli::error::CliError;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Refuse to replace an existing file unless `force` is set
pub fn check_file_overwrite(output_path: &Path, force: bool) -> Result<(), CliError> {
    if output_path.exists() && !force {
        return Err(CliError::InvalidArgument(format!(
            "Output file exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }
    Ok(())
}

/// Write command output to file
pub fn write_output(output_path: &Path, content: &str) -> Result<(), CliError> {
    // Create parent directories if needed
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::FileWriteError(
                output_path.to_path_buf(),
                format!("Failed to create directory: {}", e),
            )
        })?;
    }

    std::fs::write(output_path, content)
        .map_err(|e| CliError::FileWriteError(output_path.to_path_buf(), e.to_string()))
}

/// Read a text input; `-` reads stdin
pub fn read_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::FileReadError(PathBuf::from("-"), e.to_string()))?;
        return Ok(content);
    }
    let path = PathBuf::from(input);
    if !path.exists() {
        return Err(CliError::FileNotFound(path));
    }
    std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
}
