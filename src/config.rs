use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::pdu::PduFormat;

/// What to do when one PDU in a broadcast fails to decode.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecodeFailurePolicy {
    /// Log the bad record and keep going with the rest of the batch
    #[default]
    Skip,
    /// Abandon the whole broadcast
    FailBatch,
}

impl std::fmt::Display for DecodeFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeFailurePolicy::Skip => write!(f, "skip"),
            DecodeFailurePolicy::FailBatch => write!(f, "fail_batch"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub receiver: ReceiverConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReceiverConfig {
    #[serde(default)]
    pub decode_failure: DecodeFailurePolicy,
    /// Used when a broadcast carries no format tag
    #[serde(default)]
    pub default_format: PduFormat,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OutputConfig {
    /// Pretty-print each event instead of one compact line
    #[serde(default)]
    pub pretty: bool,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            decode_failure: DecodeFailurePolicy::default(),
            default_format: PduFormat::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
