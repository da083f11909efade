//! Profiling configuration.
//!
//! Controls the reservoir sampler limits, the input text encoding, and how
//! unparseable lines are handled. Config can come from a YAML file (with
//! `${VAR}` environment expansion) and is typically overridden per-flag by
//! the CLI.

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("expanding environment variables: {0}")]
    EnvExpand(String),

    #[error("parsing yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("sampler size must be greater than zero")]
    ZeroSampleSize,

    #[error("unknown encoding label '{0}'")]
    UnknownEncoding(String),
}

/// Top-level profiling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Reservoir sampler limits.
    pub sampler: SamplerCfg,

    /// Text encoding of the input, as an encoding label (`utf-8`,
    /// `windows-1252`, ...). Governs how lines are decoded for parsing;
    /// the content digest always runs over the raw bytes.
    pub encoding: String,

    /// What to do with a line that fails to decode or parse.
    pub on_parse_error: ParseErrorPolicy,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            sampler: SamplerCfg::default(),
            encoding: default_encoding(),
            on_parse_error: ParseErrorPolicy::default(),
        }
    }
}

/// Per-key reservoir limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerCfg {
    /// Cap on both the duplicate sample and the unique-example list,
    /// per key path.
    pub size: usize,

    /// Sampled strings longer than this many characters are truncated
    /// and annotated before storage.
    pub max_length: usize,
}

impl Default for SamplerCfg {
    fn default() -> Self {
        Self {
            size: default_size(),
            max_length: default_max_length(),
        }
    }
}

/// How to handle a line that fails to decode or parse as JSON.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Abort the whole run; no report is produced (default).
    #[default]
    Fail,
    /// Log a warning and continue with the next line. Skipping changes
    /// `total` and the counters relative to the default behavior; the
    /// digest still covers every line read.
    Skip,
}

fn default_encoding() -> String {
    "utf-8".to_owned()
}

fn default_size() -> usize {
    1024
}

fn default_max_length() -> usize {
    1024
}

impl ProfileConfig {
    /// Check limits and resolve-ability of the encoding label.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampler.size == 0 {
            return Err(ConfigError::ZeroSampleSize);
        }
        self.resolve_encoding()?;
        Ok(())
    }

    /// Resolve the configured encoding label.
    pub fn resolve_encoding(&self) -> Result<&'static Encoding, ConfigError> {
        Encoding::for_label(self.encoding.as_bytes())
            .ok_or_else(|| ConfigError::UnknownEncoding(self.encoding.clone()))
    }
}

/// Load a config from a YAML file, expanding `${VAR}` references from the
/// environment first.
pub fn load_from_path(path: &str) -> Result<ProfileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    let with_env = shellexpand::env(&raw)
        .map_err(|e| ConfigError::EnvExpand(e.to_string()))?;
    let cfg: ProfileConfig = serde_yaml::from_str(&with_env)?;
    cfg.validate()?;
    Ok(cfg)
}
