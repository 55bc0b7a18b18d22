//! Configuration structures for the receipt pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for tally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// Extraction service configuration.
    pub extraction: ExtractionConfig,

    /// Chart rendering configuration.
    pub chart: ChartConfig,
}

/// Extraction service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,

    /// Vision-capable model name.
    pub model: String,

    /// Sampling seed sent with every request.
    pub seed: i64,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// MIME type declared for every uploaded image.
    pub image_mime: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4.1-mini".to_string(),
            seed: 43,
            api_key_env: "OPENAI_API_KEY".to_string(),
            image_mime: "image/jpeg".to_string(),
        }
    }
}

/// Pie chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Where the PNG is written.
    pub output_path: PathBuf,

    /// Image width in pixels.
    pub width: u32,

    /// Image height in pixels.
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("expenses_by_category.png"),
            width: 1000,
            height: 800,
        }
    }
}

impl TallyConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
