pub mod bridge;
pub mod ingest;

pub use bridge::DetectorBridge;
pub use ingest::{ingest, RawDetection};

use anyhow::Result;
use std::path::Path;

/// Raw detector output for one page image.
#[derive(Debug, Clone)]
pub struct DetectedPage {
    pub detections: Vec<RawDetection>,
    pub width: u32,
    pub height: u32,
}

pub trait GlyphDetector {
    fn detect(&self, image_path: &Path) -> Result<DetectedPage>;
}
