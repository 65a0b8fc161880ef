use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::remapper::{DEFAULT_DATASET, DEFAULT_SCRAPER, RemapConfig};
use crate::utils::encoding::OtlpEncoding;
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Remap configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RemapFileConfig {
    pub dataset: Option<String>,
    pub scraper: Option<String>,
    pub enrich: Option<bool>,
}

/// Output configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct OutputFileConfig {
    pub format: Option<OtlpEncoding>,
    pub pretty: Option<bool>,
    pub dir: Option<String>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub remap: Option<RemapFileConfig>,
    pub output: Option<OutputFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(remap) = other.remap {
            let current = self.remap.get_or_insert_with(RemapFileConfig::default);
            if remap.dataset.is_some() {
                tracing::trace!(dataset = ?remap.dataset, "Merging remap.dataset");
                current.dataset = remap.dataset;
            }
            if remap.scraper.is_some() {
                tracing::trace!(scraper = ?remap.scraper, "Merging remap.scraper");
                current.scraper = remap.scraper;
            }
            if remap.enrich.is_some() {
                current.enrich = remap.enrich;
            }
        }

        if let Some(output) = other.output {
            let current = self.output.get_or_insert_with(OutputFileConfig::default);
            if output.format.is_some() {
                tracing::trace!(format = ?output.format, "Merging output.format");
                current.format = output.format;
            }
            if output.pretty.is_some() {
                current.pretty = output.pretty;
            }
            if output.dir.is_some() {
                current.dir = output.dir;
            }
        }
    }
}

// =============================================================================
// Resolved Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// `None` keeps each input's encoding
    pub format: Option<OtlpEncoding>,
    pub pretty: bool,
    /// `None` writes next to each input
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub remap: RemapConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.procmap/procmap.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.procmap/procmap.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::resolve(file_config, cli);
        config.validate()?;
        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn resolve(file_config: FileConfig, cli: &CliConfig) -> Self {
        let file_remap = file_config.remap.unwrap_or_default();
        let file_output = file_config.output.unwrap_or_default();

        let remap = RemapConfig {
            dataset: cli
                .dataset
                .clone()
                .or(file_remap.dataset)
                .unwrap_or_else(|| DEFAULT_DATASET.to_string()),
            scraper: cli
                .scraper
                .clone()
                .or(file_remap.scraper)
                .unwrap_or_else(|| DEFAULT_SCRAPER.to_string()),
            enrich: cli.enrich.or(file_remap.enrich).unwrap_or(true),
        };

        let output = OutputConfig {
            format: cli.format.or(file_output.format),
            pretty: cli.pretty.or(file_output.pretty).unwrap_or(false),
            dir: cli
                .output_dir
                .as_ref()
                .map(|p| expand_path(&p.to_string_lossy()))
                .or_else(|| file_output.dir.as_deref().map(expand_path)),
        };

        Self { remap, output }
    }

    fn validate(&self) -> Result<()> {
        if self.remap.scraper.trim().is_empty() {
            anyhow::bail!("remap.scraper must not be empty");
        }
        if let Some(ref dir) = self.output.dir
            && dir.is_file()
        {
            anyhow::bail!(
                "Output directory is an existing file: {}",
                dir.display()
            );
        }
        Ok(())
    }
}

/// Get the profile config path (~/.procmap/procmap.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "remap": { "dataset": "process.custom", "scraper": "procscraper", "enrich": false },
            "output": { "format": "protobuf", "pretty": true, "dir": "/tmp/out" }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let remap = config.remap.as_ref().unwrap();
        assert_eq!(remap.dataset, Some("process.custom".to_string()));
        assert_eq!(remap.scraper, Some("procscraper".to_string()));
        assert_eq!(remap.enrich, Some(false));

        let output = config.output.as_ref().unwrap();
        assert_eq!(output.format, Some(OtlpEncoding::Protobuf));
        assert_eq!(output.pretty, Some(true));
        assert_eq!(output.dir, Some("/tmp/out".to_string()));
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.remap.is_none());
        assert!(config.output.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "remap": { "enrich": true }, "unknown_field": 123 }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.remap.as_ref().unwrap().enrich, Some(true));
        assert_eq!(config.extra.get("unknown_field").unwrap(), 123);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = FileConfig {
            remap: Some(RemapFileConfig {
                dataset: Some("base".to_string()),
                scraper: Some("processscraper".to_string()),
                enrich: None,
            }),
            ..Default::default()
        };
        let overlay = FileConfig {
            remap: Some(RemapFileConfig {
                dataset: Some("overlay".to_string()),
                scraper: None,
                enrich: Some(false),
            }),
            output: Some(OutputFileConfig {
                pretty: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        base.merge(overlay);

        let remap = base.remap.unwrap();
        assert_eq!(remap.dataset, Some("overlay".to_string()));
        assert_eq!(remap.scraper, Some("processscraper".to_string()));
        assert_eq!(remap.enrich, Some(false));
        assert_eq!(base.output.unwrap().pretty, Some(true));
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::resolve(FileConfig::default(), &CliConfig::default());
        assert_eq!(config.remap, RemapConfig::default());
        assert_eq!(config.remap.dataset, "system.process");
        assert_eq!(config.remap.scraper, "processscraper");
        assert!(config.remap.enrich);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_app_config_cli_override() {
        let file_config: FileConfig = serde_json::from_str(
            r#"{ "remap": { "dataset": "from-file", "enrich": false }, "output": { "format": "json" } }"#,
        )
        .unwrap();
        let cli = CliConfig {
            dataset: Some("from-cli".to_string()),
            format: Some(OtlpEncoding::Protobuf),
            ..Default::default()
        };
        let config = AppConfig::resolve(file_config, &cli);

        assert_eq!(config.remap.dataset, "from-cli");
        assert!(!config.remap.enrich);
        assert_eq!(config.output.format, Some(OtlpEncoding::Protobuf));
    }

    #[test]
    fn test_app_config_validation_empty_scraper() {
        let config = AppConfig {
            remap: RemapConfig {
                scraper: "  ".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_app_config_validation_output_dir_is_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = AppConfig {
            output: OutputConfig {
                dir: Some(file.path().to_path_buf()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("existing file"));
    }

    #[test]
    fn test_app_config_load_from_cli_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "remap": {{ "dataset": "custom.dataset" }} }}"#).unwrap();

        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.remap.dataset, "custom.dataset");
    }

    #[test]
    fn test_app_config_load_missing_cli_path() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/procmap.json")),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
