use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::encoding;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// SAMI ingestion settings
    #[serde(default)]
    pub sami: SamiConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// SAMI ingestion configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SamiConfig {
    // @field: Class marker inserted into cue lines that lack one
    #[serde(default = "default_class_marker")]
    pub class_marker: String,

    // @field: Duration given to the last cue
    #[serde(default = "default_last_cue_duration_ms")]
    pub last_cue_duration_ms: u64,

    // @field: Persist repaired lines back to the source file
    #[serde(default)]
    pub repair_in_place: bool,

    // @field: Top-level domain hint for the encoding detector (e.g. "kr")
    #[serde(default)]
    pub encoding_hint_tld: Option<String>,

    // @field: Encoding label that bypasses detection
    #[serde(default)]
    pub forced_encoding: Option<String>,
}

impl Default for SamiConfig {
    fn default() -> Self {
        Self {
            class_marker: default_class_marker(),
            last_cue_duration_ms: default_last_cue_duration_ms(),
            repair_in_place: false,
            encoding_hint_tld: None,
            forced_encoding: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Extension of the written subtitle files
    #[serde(default = "default_output_extension")]
    pub extension: String,

    /// Overwrite existing output files
    #[serde(default)]
    pub force_overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: default_output_extension(),
            force_overwrite: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_class_marker() -> String {
    "<P Class=KRCC>".to_string()
}

fn default_last_cue_duration_ms() -> u64 {
    1000
}

fn default_output_extension() -> String {
    "srt".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let marker = self.sami.class_marker.trim();
        if !marker.to_ascii_uppercase().starts_with("<P") || !marker.ends_with('>') {
            return Err(anyhow!(
                "Class marker must be a <P ...> tag, got: {}",
                self.sami.class_marker
            ));
        }

        if self.sami.last_cue_duration_ms == 0 {
            return Err(anyhow!("Last cue duration must be greater than zero"));
        }

        if let Some(label) = &self.sami.forced_encoding {
            if encoding::resolve_label(label).is_none() {
                return Err(anyhow!("Unknown forced encoding: {}", label));
            }
        }

        let extension = self.output.extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(anyhow!("Invalid output extension: {:?}", self.output.extension));
        }

        Ok(())
    }
}
