//! CLI binary entry point for inspection-cert

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use inspection_cert_sdk::cli::commands::export::{
    ExportArgs, handle_export_image, handle_export_pdf,
};
#[cfg(feature = "cli")]
use inspection_cert_sdk::cli::commands::lines::{
    LinesValidateArgs, handle_lines_map, handle_lines_validate,
};
#[cfg(feature = "cli")]
use inspection_cert_sdk::cli::commands::normalize::{NormalizeArgs, handle_normalize};
#[cfg(feature = "cli")]
use inspection_cert_sdk::cli::commands::template::{
    TemplateBuildArgs, TemplateImportArgs, handle_template_build, handle_template_import,
};
#[cfg(feature = "cli")]
use inspection_cert_sdk::cli::error::CliError;
#[cfg(feature = "cli")]
use inspection_cert_sdk::cli::logging::{LogConfig, init_logging};
#[cfg(feature = "cli")]
use inspection_cert_sdk::config::CertificateConfig;
#[cfg(feature = "cli")]
use inspection_cert_sdk::export::PageSize;
#[cfg(feature = "cli")]
use inspection_cert_sdk::import::CsvMode;
#[cfg(feature = "cli")]
use inspection_cert_sdk::models::CertificateKind;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "inspection-cert")]
#[command(about = "Normalize, template and export ERC inspection certificates")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Configuration file (default: .inspection-cert.toml in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build and import measurement templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Normalize a call record into certificate data
    Normalize {
        /// Certificate kind
        #[arg(value_enum)]
        kind: KindArg,
        /// Call record JSON file or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
        /// JSON object of manual field edits
        #[arg(long)]
        overrides: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Production line numbering
    Lines {
        #[command(subcommand)]
        command: LinesCommands,
    },
    /// Export a rendered certificate
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum TemplateCommands {
    /// Write a blank measurement template CSV
    Build {
        /// Template name, used for the file name
        #[arg(short, long)]
        name: Option<String>,
        /// Number of sample rows
        #[arg(short, long)]
        sample_size: Option<usize>,
        /// Header of the value column
        #[arg(short = 'l', long)]
        value_label: Option<String>,
        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,
        /// Print the template instead of writing it
        #[arg(long)]
        stdout: bool,
    },
    /// Read measured values from a filled template
    Import {
        /// Filled template CSV
        input: PathBuf,
        /// Number of sample rows expected
        #[arg(short, long)]
        sample_size: Option<usize>,
        /// Column splitting mode
        #[arg(long, value_enum)]
        mode: Option<CsvModeArg>,
        /// Print values as a JSON array
        #[arg(long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum LinesCommands {
    /// Print the call number to line mapping
    Map {
        /// JSON array of production lines or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
    },
    /// Check whether a line number can be assigned
    Validate {
        /// JSON array of production lines or '-' for stdin
        input: String,
        /// 0-based position of the line being edited
        #[arg(long)]
        index: usize,
        /// Line number to assign
        #[arg(long)]
        number: u32,
    },
}

#[cfg(feature = "cli")]
#[derive(clap::Args)]
struct ExportCommandArgs {
    /// Rendered certificate image (PNG, JPEG, ...)
    image: PathBuf,
    /// Certificate kind
    #[arg(short, long, value_enum)]
    kind: KindArg,
    /// Certificate number used for the file name
    #[arg(long, conflicts_with = "call")]
    certificate_no: Option<String>,
    /// Call record JSON to read the certificate number from
    #[arg(long)]
    call: Option<String>,
    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Explicit output file name
    #[arg(long)]
    filename: Option<String>,
    /// Overwrite existing files without prompting
    #[arg(short, long)]
    force: bool,
    /// Device pixels per image pixel
    #[arg(long)]
    scale: Option<f32>,
    /// PDF page width
    #[arg(long, value_enum)]
    page_size: Option<PageSizeArg>,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum ExportCommands {
    /// Export as a single-page PDF
    Pdf(ExportCommandArgs),
    /// Export as a PNG image
    Image(ExportCommandArgs),
}

#[cfg(feature = "cli")]
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    /// Raw material inspection certificate
    RawMaterial,
    /// In-process inspection certificate
    Process,
    /// Final product inspection certificate
    FinalProduct,
}

#[cfg(feature = "cli")]
impl From<KindArg> for CertificateKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::RawMaterial => CertificateKind::RawMaterial,
            KindArg::Process => CertificateKind::Process,
            KindArg::FinalProduct => CertificateKind::FinalProduct,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CsvModeArg {
    /// Split each line on commas
    Naive,
    /// RFC 4180 parsing with quoted fields
    Strict,
}

#[cfg(feature = "cli")]
impl From<CsvModeArg> for CsvMode {
    fn from(mode: CsvModeArg) -> Self {
        match mode {
            CsvModeArg::Naive => CsvMode::Naive,
            CsvModeArg::Strict => CsvMode::Strict,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PageSizeArg {
    A4,
    Letter,
}

#[cfg(feature = "cli")]
impl From<PageSizeArg> for PageSize {
    fn from(size: PageSizeArg) -> Self {
        match size {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
        }
    }
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&Path>) -> Result<CertificateConfig, CliError> {
    let config = match path {
        Some(path) => CertificateConfig::load_from(path)?,
        None => {
            let cwd = std::env::current_dir().map_err(|e| {
                CliError::InvalidArgument(format!("Cannot read working directory: {}", e))
            })?;
            CertificateConfig::load(&cwd)?
        }
    };
    Ok(config)
}

#[cfg(feature = "cli")]
fn export_args(args: ExportCommandArgs, config: &CertificateConfig) -> ExportArgs {
    let kind = CertificateKind::from(args.kind);
    let mut options = config.export_options(kind.title());
    if let Some(scale) = args.scale {
        options.scale_factor = scale;
    }
    if let Some(size) = args.page_size {
        options.page_size = size.into();
    }
    ExportArgs {
        image: args.image,
        kind,
        certificate_no: args.certificate_no,
        call: args.call,
        output_dir: args
            .output_dir
            .unwrap_or_else(|| config.output_dir(Path::new("."))),
        filename: args.filename,
        force: args.force,
        options,
    }
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Template { command } => match command {
            TemplateCommands::Build {
                name,
                sample_size,
                value_label,
                output_dir,
                force,
                stdout,
            } => {
                let args = TemplateBuildArgs {
                    name: name.unwrap_or_else(|| config.template.template_name.clone()),
                    sample_size: sample_size.unwrap_or(config.template.sample_size),
                    value_label: value_label
                        .unwrap_or_else(|| config.template.value_label.clone()),
                    output_dir: output_dir
                        .unwrap_or_else(|| config.output_dir(Path::new("."))),
                    force,
                    stdout,
                };
                handle_template_build(&args).map(|_| ())
            }
            TemplateCommands::Import {
                input,
                sample_size,
                mode,
                json,
            } => {
                let args = TemplateImportArgs {
                    input,
                    sample_size: sample_size.unwrap_or(config.template.sample_size),
                    mode: mode.map(CsvMode::from).unwrap_or(config.template.csv_mode),
                    json,
                };
                handle_template_import(&args).map(|_| ())
            }
        },

        Commands::Normalize {
            kind,
            input,
            overrides,
            output,
            force,
            pretty,
        } => {
            let args = NormalizeArgs {
                kind: kind.into(),
                input,
                overrides,
                output,
                force,
                pretty,
            };
            handle_normalize(&args).map(|_| ())
        }

        Commands::Lines { command } => match command {
            LinesCommands::Map { input } => handle_lines_map(&input).map(|_| ()),
            LinesCommands::Validate {
                input,
                index,
                number,
            } => {
                let args = LinesValidateArgs {
                    input,
                    line_index: index,
                    candidate: number,
                };
                handle_lines_validate(&args).map(|_| ())
            }
        },

        Commands::Export { command } => match command {
            ExportCommands::Pdf(args) => handle_export_pdf(&export_args(args, &config)).map(|_| ()),
            ExportCommands::Image(args) => {
                handle_export_image(&export_args(args, &config)).map(|_| ())
            }
        },
    }
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose));

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
