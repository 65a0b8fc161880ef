use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_DATASET, ENV_ENRICH, ENV_FORMAT, ENV_OUTPUT_DIR, ENV_PRETTY, ENV_SCRAPER,
};
use crate::utils::encoding::OtlpEncoding;

#[derive(Parser)]
#[command(name = "procmap")]
#[command(version, about = "Remap host-metrics process telemetry", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Dataset written as data_stream.dataset (empty disables)
    #[arg(long, global = true, env = ENV_DATASET)]
    pub dataset: Option<String>,

    /// Instrumentation scope name (last path segment) of the process scraper
    #[arg(long, global = true, env = ENV_SCRAPER)]
    pub scraper: Option<String>,

    /// Copy process identity from resource attributes onto remapped points
    #[arg(long, global = true, env = ENV_ENRICH)]
    pub enrich: Option<bool>,

    /// Output encoding (protobuf or json); defaults to the input's
    #[arg(long, short = 'f', global = true, env = ENV_FORMAT, value_parser = parse_encoding)]
    pub format: Option<OtlpEncoding>,

    /// Pretty-print JSON output
    #[arg(long, global = true, env = ENV_PRETTY)]
    pub pretty: Option<bool>,

    /// Directory for remapped files (defaults to next to each input)
    #[arg(long, short = 'o', global = true, env = ENV_OUTPUT_DIR)]
    pub output_dir: Option<PathBuf>,
}

/// Parse output encoding from CLI/env string
fn parse_encoding(s: &str) -> Result<OtlpEncoding, String> {
    s.parse()
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Remap captured OTLP metrics exports
    Remap {
        /// Captured ExportMetricsServiceRequest files (.json or .pb)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Print the recognized inputs and the output catalog
    Catalog,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub dataset: Option<String>,
    pub scraper: Option<String>,
    pub enrich: Option<bool>,
    pub format: Option<OtlpEncoding>,
    pub pretty: Option<bool>,
    pub output_dir: Option<PathBuf>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        dataset: cli.dataset,
        scraper: cli.scraper,
        enrich: cli.enrich,
        format: cli.format,
        pretty: cli.pretty,
        output_dir: cli.output_dir,
    };
    (config, cli.command)
}
