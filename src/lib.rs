//! Annorect: a headless interaction engine for rectangular image annotations.
//!
//! Annorect keeps a list of tagged rectangles consistent with the overlays
//! drawn on an image while a user creates, moves, resizes, retags, selects
//! and deletes them. Positions are stored as percentages of the surface so
//! they survive resizing; the host supplies the visual surface and,
//! optionally, its own move/resize solver.
//!
//! # Modules
//!
//! - [`model`]: Records, tags, coordinates, the annotation store and normalization
//! - [`engine`]: The interaction state machine and lifecycle callbacks
//! - [`movement`]: The move/resize collaborator interface and default solver
//! - [`surface`]: The visual surface interface and an in-memory surface
//! - [`validation`]: Record-list validation and error reporting
//! - [`script`]: Replayable headless sessions
//! - [`error`]: Error types for annorect operations

pub mod engine;
pub mod error;
pub mod model;
pub mod movement;
pub mod script;
pub mod surface;
pub mod validation;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

pub use engine::{Annotator, Listener, Options};
pub use error::AnnorectError;

use engine::HeadlessAnnotator;
use model::{Bounds, SequentialIds, Size};

/// The annorect CLI application.
#[derive(Parser)]
#[command(name = "annorect")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate a record list for errors and warnings.
    Validate(ValidateArgs),
    /// Normalize a record list to surface percentages.
    Normalize(NormalizeArgs),
    /// Replay a headless session script.
    Replay(ReplayArgs),
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Record list (JSON) to validate.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,

    /// Surface width in pixels, to bounds-check pixel positions.
    #[arg(long, requires = "height")]
    width: Option<f64>,

    /// Surface height in pixels, to bounds-check pixel positions.
    #[arg(long, requires = "width")]
    height: Option<f64>,
}

/// Arguments for the normalize subcommand.
#[derive(clap::Args)]
struct NormalizeArgs {
    /// Record list (JSON); identifiers and tags may be missing.
    input: PathBuf,

    /// Width, in pixels, that pixel positions are measured against.
    #[arg(long)]
    width: f64,

    /// Height, in pixels, that pixel positions are measured against.
    #[arg(long)]
    height: f64,

    /// Write the normalized records here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Prefix for identifiers generated for records that lack one.
    #[arg(long, default_value = script::DEFAULT_ID_PREFIX)]
    id_prefix: String,
}

/// Arguments for the replay subcommand.
#[derive(clap::Args)]
struct ReplayArgs {
    /// Session script (JSON).
    script: PathBuf,

    /// Options patch (JSON) merged over the script's options.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Emit the full outcome (events, render reports, skipped steps)
    /// instead of just the final records.
    #[arg(long)]
    events: bool,

    /// Write the output here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Run the annorect CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), AnnorectError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Normalize(args)) => run_normalize(args),
        Some(Commands::Replay(args)) => run_replay(args),
        None => {
            println!("annorect {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Headless interaction engine for rectangular image annotations.");
            println!();
            println!("Run 'annorect --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), AnnorectError> {
    let records = model::io_json::read_records_json(&args.input)?;

    let opts = validation::ValidateOptions {
        surface: match (args.width, args.height) {
            (Some(width), Some(height)) => Some(checked_size(width, height)?),
            _ => None,
        },
    };
    let report = validation::validate_records(&records, &opts);

    match args.output {
        ReportFormat::Json => write_json(None, &report.to_json_value())?,
        ReportFormat::Text => print!("{}", report),
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(AnnorectError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the normalize subcommand.
///
/// Records go through a batch render on a headless surface of the given
/// size, so the output is exactly what the engine would store.
fn run_normalize(args: NormalizeArgs) -> Result<(), AnnorectError> {
    let size = checked_size(args.width, args.height)?;
    let inputs = model::io_json::read_record_inputs_json(&args.input)?;
    let total = inputs.len();

    let mut annotator: HeadlessAnnotator = Annotator::headless(
        Bounds::new(0.0, 0.0, size.width, size.height),
        Options::default(),
        (),
    )
    .with_id_generator(SequentialIds::new(args.id_prefix));
    let report = annotator.render_all(inputs, None);

    for issue in &report.issues {
        eprintln!("Skipped record {}: {}", issue.index, issue.reason);
    }

    match &args.out {
        Some(path) => {
            model::io_json::write_records_json(path, annotator.records())?;
            eprintln!(
                "Normalized {} of {} record(s) to {}",
                annotator.records().len(),
                total,
                path.display()
            );
        }
        None => write_json(None, annotator.records())?,
    }
    Ok(())
}

/// Execute the replay subcommand.
fn run_replay(args: ReplayArgs) -> Result<(), AnnorectError> {
    let mut script = script::read_script_json(&args.script)?;
    if let Some(path) = &args.options {
        script.options.overlay(&engine::read_options_json(path)?);
    }

    let outcome = script::replay(&script);
    for skipped in &outcome.skipped {
        log::info!("step {} skipped: {}", skipped.index, skipped.reason);
    }

    if args.events {
        write_json(args.out.as_deref(), &outcome)
    } else {
        write_json(args.out.as_deref(), &outcome.records)
    }
}

fn checked_size(width: f64, height: f64) -> Result<Size, AnnorectError> {
    let size = Size::new(width, height);
    if size.is_usable() {
        Ok(size)
    } else {
        Err(AnnorectError::InvalidSurface(format!(
            "{}x{} (both dimensions must be positive)",
            width, height
        )))
    }
}

/// Pretty-prints `value` as JSON to `path`, or to stdout.
fn write_json<T: Serialize + ?Sized>(path: Option<&Path>, value: &T) -> Result<(), AnnorectError> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, value).map_err(AnnorectError::OutputWrite)?;
            writeln!(writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, value).map_err(AnnorectError::OutputWrite)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
