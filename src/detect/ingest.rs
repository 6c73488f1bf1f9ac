use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::geometry::BBox;
use crate::core::model::Glyph;

/// One detection as emitted by the glyph detector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawDetection {
    pub class_code: String,
    pub bbox: [f32; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl RawDetection {
    pub fn new(class_code: impl Into<String>, bbox: [f32; 4]) -> Self {
        Self {
            class_code: class_code.into(),
            bbox,
            confidence: None,
        }
    }
}

/// Normalizes raw detections into glyphs.
///
/// Class codes are trimmed and corners reordered so that `x0 <= x1` and
/// `y0 <= y1`. Detections with an empty code or a non-finite coordinate are
/// dropped with a warning.
pub fn ingest(detections: &[RawDetection]) -> Vec<Glyph> {
    let mut glyphs = Vec::with_capacity(detections.len());
    for (idx, det) in detections.iter().enumerate() {
        let code = det.class_code.trim();
        if code.is_empty() {
            warn!("skipping detection #{idx}: empty class code");
            continue;
        }
        let [xa, ya, xb, yb] = det.bbox;
        let bbox = BBox::from_corners(xa, ya, xb, yb);
        if !bbox.is_finite() {
            warn!("skipping detection #{idx} ('{code}'): non-finite bbox {:?}", det.bbox);
            continue;
        }
        glyphs.push(Glyph::new(code, bbox));
    }
    glyphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn trims_codes_and_orders_corners() {
        let glyphs = ingest(&[RawDetection::new(" ka ", [30.0, 40.0, 10.0, 0.0])]);
        assert_eq!(glyphs, vec![Glyph::new("ka", BBox::new(10.0, 0.0, 30.0, 40.0))]);
    }

    #[test]
    fn drops_unusable_detections() {
        let glyphs = ingest(&[
            RawDetection::new("", [0.0, 0.0, 1.0, 1.0]),
            RawDetection::new("na", [f32::NAN, 0.0, 1.0, 1.0]),
            RawDetection::new("ca", [0.0, 0.0, f32::INFINITY, 1.0]),
            RawDetection::new("ra", [0.0, 0.0, 1.0, 1.0]),
        ]);
        assert_eq!(glyphs.len(), 1);
        assert_eq!(glyphs[0].class_code(), "ra");
    }

    #[test]
    fn parses_detector_json() -> anyhow::Result<()> {
        let raw: Vec<RawDetection> = serde_json::from_str(
            r#"[{"class_code": "ka", "bbox": [1, 2, 3, 4], "confidence": 0.9},
                {"class_code": "suku", "bbox": [1.5, 5, 3, 7]}]"#,
        )?;
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].confidence, Some(0.9));
        assert_eq!(raw[1].confidence, None);
        assert_eq!(ingest(&raw).len(), 2);
        Ok(())
    }
}
