use crate::cli::args::{Cli, Commands, InputFormatArg};
use crate::error::{ProcessingError, Result};
use crate::processors::{ParallelProcessor, PipelineOutput, QualityChecker, RawObservation};
use crate::readers::ObservationReader;
use crate::settings::PipelineConfig;
use crate::utils::constants::STDIN_PATH;
use crate::utils::filename::{generate_default_hourly_filename, generate_default_severity_filename};
use crate::utils::progress::ProgressReporter;
use crate::writers::{ParquetWriter, TableWriter};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `--verbose` forces `debug`; otherwise
/// `RUST_LOG` applies, falling back to `info`.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| ProcessingError::Config(format!("Failed to initialize logging: {}", e)))
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = PipelineConfig::load(cli.config.as_deref())?;
    debug!("Pipeline settings: {:?}", config);

    match cli.command {
        Commands::Analyze {
            input,
            format,
            hourly_output,
            summary_output,
            write,
            compression,
            max_workers,
            quiet,
        } => {
            let mut config = config;
            if let Some(workers) = max_workers {
                config = config.with_max_workers(workers);
            }
            if let Some(compression) = compression {
                config = config.with_compression(&compression);
            }
            config.check()?;

            println!("Analyzing observations...");
            println!("Input file: {}", input.display());
            println!("Workers: {}", config.max_workers);

            let observations = read_observations(&input, format).await?;
            let output = run_pipeline(&config, observations, quiet).await?;

            println!("\n{}", TableWriter::new().render(&output.ranking()));
            println!("{}", QualityChecker::new().generate_summary(&output.quality));

            let hourly_path = hourly_output.or_else(|| write.then(generate_default_hourly_filename));
            let summary_path =
                summary_output.or_else(|| write.then(generate_default_severity_filename));

            if let Some(path) = hourly_path {
                write_hourly(&config, &output, &path)?;
            }
            if let Some(path) = summary_path {
                write_summary(&config, &output, &path)?;
            }

            println!("Analysis complete!");
        }

        Commands::Validate { input, format } => {
            println!("Validating observations...");
            println!("Input file: {}", input.display());

            let observations = read_observations(&input, format).await?;
            let output = run_pipeline(&config, observations, false).await?;

            println!("\n{}", QualityChecker::new().generate_summary(&output.quality));

            let issues = output.quality.out_of_range_readings + output.quality.warnings.len();
            if issues == 0 {
                println!("✅ All data passed validation checks");
            } else {
                println!("⚠️  Found {} validation issues", issues);
            }
        }

        Commands::Info { file } => {
            println!("Analyzing Parquet file: {}", file.display());

            let file_info = ParquetWriter::new().get_file_info(&file)?;
            println!("\n{}", file_info.summary());
        }
    }

    Ok(())
}

async fn read_observations(
    input: &Path,
    format: Option<InputFormatArg>,
) -> Result<Vec<RawObservation>> {
    let reader = match format {
        Some(format) => ObservationReader::with_format(format.into()),
        None => ObservationReader::new(),
    };

    if input == Path::new(STDIN_PATH) {
        reader.read_stream(tokio::io::stdin()).await
    } else {
        reader.read_async(input).await
    }
}

/// The pipeline is CPU-bound, so it runs off the async executor.
async fn run_pipeline(
    config: &PipelineConfig,
    observations: Vec<RawObservation>,
    quiet: bool,
) -> Result<PipelineOutput> {
    let processor = ParallelProcessor::from_config(config);

    tokio::task::spawn_blocking(move || {
        let progress = ProgressReporter::new(0, "Normalizing readings...", quiet);
        processor.process(&observations, Some(&progress))
    })
    .await?
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn configured_writer(config: &PipelineConfig) -> Result<ParquetWriter> {
    Ok(ParquetWriter::new()
        .with_compression(&config.compression)?
        .with_row_group_size(config.row_group_size))
}

fn write_hourly(config: &PipelineConfig, output: &PipelineOutput, path: &Path) -> Result<()> {
    if output.hourly.is_empty() {
        println!("No hourly records to write");
        return Ok(());
    }

    println!("Writing {} hourly records to {}...", output.hourly.len(), path.display());
    ensure_parent(path)?;

    let writer = configured_writer(config)?;
    writer.write_hourly_records(&output.hourly, path)?;

    let file_info = writer.get_file_info(path)?;
    println!("\n{}", file_info.summary());
    Ok(())
}

fn write_summary(config: &PipelineConfig, output: &PipelineOutput, path: &Path) -> Result<()> {
    let rows = output.ranking();
    if rows.is_empty() {
        println!("No severity rows to write");
        return Ok(());
    }

    ensure_parent(path)?;
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        TableWriter::new().write_csv(&rows, path)?;
    } else {
        configured_writer(config)?.write_severity_rows(&rows, path)?;
    }

    println!("Severity ranking written to {}", path.display());
    Ok(())
}
