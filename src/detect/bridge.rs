use anyhow::{Context, Result};
use image::ImageReader;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::config::DetectorConfig;
use crate::detect::ingest::RawDetection;
use crate::detect::{DetectedPage, GlyphDetector};

/// Runs an external glyph detector script and parses its JSON output.
///
/// The script is invoked as `<interpreter> <script> --image <path>` and must
/// print a JSON array of `{"class_code": .., "bbox": [x1, y1, x2, y2]}` on
/// stdout.
#[derive(Debug, Clone)]
pub struct DetectorBridge {
    interpreter: String,
    script_path: PathBuf,
}

impl DetectorBridge {
    pub fn new(script_path: PathBuf) -> Self {
        Self {
            interpreter: "python3".to_string(),
            script_path,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.script.clone()).with_interpreter(config.interpreter.clone())
    }

    pub fn with_interpreter(mut self, interpreter: String) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn run(&self, image_path: &Path) -> Result<Vec<RawDetection>> {
        let output = Command::new(&self.interpreter)
            .arg(&self.script_path)
            .arg("--image")
            .arg(image_path)
            .output()
            .with_context(|| {
                format!(
                    "failed to invoke glyph detector {} {}",
                    self.interpreter,
                    self.script_path.display()
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("glyph detector failed: {stderr}");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_detections(&stdout)
    }
}

pub fn parse_detections(json: &str) -> Result<Vec<RawDetection>> {
    serde_json::from_str(json).with_context(|| "failed to parse detector JSON response")
}

impl GlyphDetector for DetectorBridge {
    fn detect(&self, image_path: &Path) -> Result<DetectedPage> {
        if !image_path.is_file() {
            anyhow::bail!("image does not exist: {}", image_path.display());
        }
        let (width, height) = ImageReader::open(image_path)
            .with_context(|| format!("failed to open image {}", image_path.display()))?
            .with_guessed_format()?
            .into_dimensions()
            .with_context(|| format!("failed to read image size of {}", image_path.display()))?;
        if width == 0 || height == 0 {
            anyhow::bail!("image is empty: {}", image_path.display());
        }

        let detections = self.run(image_path)?;
        debug!(
            "detector returned {} glyph(s) for {} ({width}x{height})",
            detections.len(),
            image_path.display()
        );
        Ok(DetectedPage {
            detections,
            width,
            height,
        })
    }
}
