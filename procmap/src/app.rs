//! Core application

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinSet;

use crate::core::cli::{self, Commands};
use crate::core::config::{AppConfig, OutputConfig};
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::domain::process::{ProcessInput, ProcessOutput};
use crate::domain::remapper::{RemapStats, Remapper};
use crate::utils::encoding::{OtlpEncoding, decode_request, encode_request};
use crate::utils::file::remapped_output_path;

/// Outcome of remapping one capture file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats: RemapStats,
}

pub struct CoreApp {
    pub config: AppConfig,
    remapper: Arc<Remapper>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Commands::Catalog => {
                Self::print_catalog();
                Ok(())
            }
            Commands::Remap { inputs } => {
                let config = AppConfig::load(&cli_config)?;
                Self::new(config).remap_files(inputs).await
            }
        }
    }

    pub fn new(config: AppConfig) -> Self {
        let remapper = Arc::new(Remapper::new(config.remap.clone()));
        Self { config, remapper }
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    fn print_catalog() {
        println!("Inputs:");
        for input in ProcessInput::ALL {
            println!("  {}", input.as_str());
        }
        println!("\nOutputs:");
        for output in ProcessOutput::ALL {
            println!("  {:<40} {}", output.name(), output.kind());
        }
    }

    /// Remap every input concurrently. Fails if any file failed.
    pub async fn remap_files(&self, inputs: Vec<PathBuf>) -> Result<()> {
        if let Some(ref dir) = self.config.output.dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        }

        let total = inputs.len();
        let mut tasks = JoinSet::new();
        for input in inputs {
            let remapper = Arc::clone(&self.remapper);
            let output = self.config.output.clone();
            tasks.spawn_blocking(move || {
                let result = remap_file(&input, &remapper, &output);
                (input, result)
            });
        }

        let mut failed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(report))) => {
                    tracing::info!(
                        input = %report.input.display(),
                        output = %report.output.display(),
                        scopes = report.stats.scopes_remapped,
                        emitted = report.stats.metrics_emitted,
                        "Remapped capture"
                    );
                }
                Ok((input, Err(e))) => {
                    failed += 1;
                    tracing::error!(input = %input.display(), error = %format!("{:#}", e), "Remap failed");
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(error = %e, "Remap task panicked");
                }
            }
        }

        if failed > 0 {
            anyhow::bail!("{} of {} file(s) failed to remap", failed, total);
        }
        Ok(())
    }
}

/// Decode, remap and re-encode one capture file
pub fn remap_file(input: &Path, remapper: &Remapper, output: &OutputConfig) -> Result<FileReport> {
    let input_encoding = OtlpEncoding::from_path(input).with_context(|| {
        format!(
            "Unrecognized capture extension (expected .json or .pb): {}",
            input.display()
        )
    })?;
    let encoding = output.format.unwrap_or(input_encoding);

    let body =
        fs::read(input).with_context(|| format!("Failed to read capture: {}", input.display()))?;
    let mut request = decode_request(&body, input_encoding)
        .with_context(|| format!("Failed to decode capture: {}", input.display()))?;

    let stats = remapper.remap(&mut request);

    let bytes = encode_request(&request, encoding, output.pretty)?;
    let output_path = remapped_output_path(input, output.dir.as_deref(), encoding);
    fs::write(&output_path, bytes)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    Ok(FileReport {
        input: input.to_path_buf(),
        output: output_path,
        stats,
    })
}
