use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::readers::InputFormat;

#[derive(Parser)]
#[command(name = "climate-aggregator")]
#[command(about = "Hourly climate aggregation and regional severity ranking")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Pipeline settings file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormatArg {
    Json,
    Csv,
}

impl From<InputFormatArg> for InputFormat {
    fn from(arg: InputFormatArg) -> Self {
        match arg {
            InputFormatArg::Json => InputFormat::Json,
            InputFormatArg::Csv => InputFormat::Csv,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and print the severity ranking
    Analyze {
        #[arg(short, long, help = "Observation file (.json or .csv), or - for stdin")]
        input: PathBuf,

        #[arg(
            short,
            long,
            value_enum,
            help = "Input format [default: from extension, JSON for stdin]"
        )]
        format: Option<InputFormatArg>,

        #[arg(
            long,
            help = "Hourly table Parquet path [default: output/climate-hourly-{YYMMDD}.parquet]"
        )]
        hourly_output: Option<PathBuf>,

        #[arg(
            long,
            help = "Severity ranking path, .csv or .parquet [default: output/climate-severity-{YYMMDD}.parquet]"
        )]
        summary_output: Option<PathBuf>,

        #[arg(
            short,
            long,
            default_value = "false",
            help = "Write both outputs, using default paths where none is given"
        )]
        write: bool,

        #[arg(short, long, help = "Parquet compression [default: from settings]")]
        compression: Option<String>,

        #[arg(long, help = "Worker threads [default: from settings]")]
        max_workers: Option<usize>,

        #[arg(short, long, default_value = "false", help = "Hide progress output")]
        quiet: bool,
    },

    /// Normalize and quality-check observations without writing output
    Validate {
        #[arg(short, long, help = "Observation file (.json or .csv), or - for stdin")]
        input: PathBuf,

        #[arg(short, long, value_enum)]
        format: Option<InputFormatArg>,
    },

    /// Display information about a Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "climate-aggregator",
            "--verbose",
            "analyze",
            "--input",
            "obs.csv",
            "--summary-output",
            "ranking.csv",
            "--max-workers",
            "2",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze {
                input,
                summary_output,
                write,
                max_workers,
                format,
                ..
            } => {
                assert_eq!(input, PathBuf::from("obs.csv"));
                assert_eq!(summary_output, Some(PathBuf::from("ranking.csv")));
                assert!(!write);
                assert_eq!(max_workers, Some(2));
                assert_eq!(format, None);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_stdin_input() {
        let cli = Cli::try_parse_from([
            "climate-aggregator",
            "analyze",
            "-i",
            "-",
            "--format",
            "csv",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze { input, format, .. } => {
                assert_eq!(input, PathBuf::from("-"));
                assert_eq!(format, Some(InputFormatArg::Csv));
            }
            _ => panic!("expected analyze"),
        }
    }
}
