//! Application configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::layout::PageLayout;
use crate::render::RenderConfig;
use crate::segment::Segmenter;
use crate::timing::{LeadConfig, Reconciler};

/// Everything the pipeline can be tuned with. Every section is optional in
/// the JSON file; missing values take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub layout: PageLayout,

    /// Duration floor and early-page tolerance.
    pub timing: Reconciler,

    pub lead: LeadConfig,

    pub render: RenderConfig,

    pub paths: PathsConfig,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Scratch directory for audio parts and subtitles.
    pub work_dir: PathBuf,

    /// JSON list of narrations already rendered.
    pub seen_db: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "factshorts=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("rs_tmp"),
            seen_db: PathBuf::from("./config/used_facts.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn segmenter(&self) -> Segmenter {
        Segmenter::new(self.layout.clone())
            .with_reconciler(self.timing)
            .with_lead(self.lead)
    }
}
