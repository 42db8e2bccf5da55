//! CLI configuration

use anyhow::{Context, Result};
use clap::ValueEnum;
use pushwire_protocol::EncoderConfig;
use serde::Deserialize;
use std::path::Path;

/// CLI configuration, read from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Encoder settings
    #[serde(default)]
    pub encoder: EncoderConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: CliConfig =
            toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))?;
        config.encoder.validate()?;
        Ok(config)
    }

    /// Load from file, or fall back to defaults when the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load another file and merge it over this configuration
    ///
    /// Only non-default values from the new file overwrite existing ones.
    pub fn load_merge(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let other = Self::load(path)?;
        self.merge(other);
        self.encoder.validate()?;
        Ok(())
    }

    /// Overlay non-default values from `other`
    pub fn merge(&mut self, other: CliConfig) {
        let defaults = EncoderConfig::default();
        if other.encoder.max_frame_size != defaults.max_frame_size {
            self.encoder.max_frame_size = other.encoder.max_frame_size;
        }
        if other.encoder.default_sound != defaults.default_sound {
            self.encoder.default_sound = other.encoder.default_sound;
        }

        if other.output.format != OutputFormat::default() {
            self.output.format = other.output.format;
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Encoding of printed frames
    #[serde(default)]
    pub format: OutputFormat,
}

/// How frame bytes are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Hex,
    Base64,
}
