use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Vertical tolerance used by the line segmenter.
///
/// A glyph joins the current line when its vertical center lies within
/// `max(mean_height * k_h, image_height * k_img)` of the line's mean center.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LineTolerance {
    pub k_h: f32,
    pub k_img: f32,
}

impl LineTolerance {
    /// Wide band relative to the page; merges lines on dense pages.
    pub fn loose() -> Self {
        Self {
            k_h: 0.5,
            k_img: 0.2,
        }
    }

    pub fn tolerance(&self, mean_height: f32, image_height: u32) -> f32 {
        (mean_height * self.k_h).max(image_height as f32 * self.k_img)
    }
}

impl Default for LineTolerance {
    fn default() -> Self {
        Self {
            k_h: 0.5,
            k_img: 0.02,
        }
    }
}

/// What to do when a glyph's class code is missing from the class table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnknownClassPolicy {
    /// Keep the partial line and carry on with the next one.
    #[default]
    SkipLine,
    /// Fail the whole document.
    AbortDocument,
}

/// Lifetime of the pending vowel flag set by the extra-vowel class.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlagScope {
    #[default]
    Line,
    Document,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputStyle {
    /// Fragments as produced, with the taling marker.
    #[default]
    Raw,
    /// Taling marker rendered as a precomposed `é`.
    Accented,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    pub interpreter: String,
    pub script: PathBuf,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            script: PathBuf::from("detector/detect.py"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tolerance: LineTolerance,
    pub unknown_class: UnknownClassPolicy,
    pub flag_scope: FlagScope,
    pub output_style: OutputStyle,
    /// JSON class table replacing the built-in one.
    pub class_table: Option<PathBuf>,
    pub detector: DetectorConfig,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).with_context(|| "failed to parse configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&text)
    }
}
