use serde::{Deserialize, Serialize};

use crate::core::geometry::BBox;

/// Writing position of a glyph relative to the base line of a syllable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Above,
    Base,
    Below,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Above => "above",
            Position::Base => "base",
            Position::Below => "below",
        }
    }
}

/// One detected glyph. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Glyph {
    class_code: String,
    bbox: BBox,
}

impl Glyph {
    pub fn new(class_code: impl Into<String>, bbox: BBox) -> Self {
        Self {
            class_code: class_code.into(),
            bbox,
        }
    }

    pub fn class_code(&self) -> &str {
        &self.class_code
    }

    pub fn bbox(&self) -> &BBox {
        &self.bbox
    }

    pub(crate) fn cmp_top_left(&self, other: &Self) -> std::cmp::Ordering {
        self.bbox
            .cmp_top_left(&other.bbox)
            .then_with(|| self.class_code.cmp(&other.class_code))
    }

    pub(crate) fn cmp_left_top(&self, other: &Self) -> std::cmp::Ordering {
        self.bbox
            .cmp_left_top(&other.bbox)
            .then_with(|| self.class_code.cmp(&other.class_code))
    }
}

/// Glyphs grouped into one reading line, before clustering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphLine {
    pub glyphs: Vec<Glyph>,
}

impl GlyphLine {
    pub fn mean_center_y(&self) -> f32 {
        mean(self.glyphs.iter().map(|g| g.bbox().center_y()))
    }

    pub fn mean_height(&self) -> f32 {
        mean(self.glyphs.iter().map(|g| g.bbox().height()))
    }

    pub fn mean_top(&self) -> f32 {
        mean(self.glyphs.iter().map(|g| g.bbox().y0))
    }

    pub fn bbox(&self) -> Option<BBox> {
        union_all(self.glyphs.iter().map(|g| *g.bbox()))
    }
}

/// A base glyph with the diacritics attached to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cluster {
    pub base: Glyph,
    pub above: Vec<Glyph>,
    pub below: Vec<Glyph>,
}

impl Cluster {
    pub fn new(base: Glyph) -> Self {
        Self {
            base,
            above: Vec::new(),
            below: Vec::new(),
        }
    }

    pub fn glyph_count(&self) -> usize {
        1 + self.above.len() + self.below.len()
    }

    pub fn bbox(&self) -> BBox {
        self.above
            .iter()
            .chain(self.below.iter())
            .fold(*self.base.bbox(), |acc, g| acc.union(g.bbox()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Line {
    pub clusters: Vec<Cluster>,
}

impl Line {
    pub fn bbox(&self) -> Option<BBox> {
        union_all(self.clusters.iter().map(Cluster::bbox))
    }

    pub fn glyph_count(&self) -> usize {
        self.clusters.iter().map(Cluster::glyph_count).sum()
    }
}

/// A glyph in reading order, tagged with the role it plays in its cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub glyph: Glyph,
    pub role: Position,
}

impl Token {
    pub fn class_code(&self) -> &str {
        self.glyph.class_code()
    }
}

/// Transliterated text of one line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineText {
    pub line_idx: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
    pub cluster_count: usize,
    /// Set when the line was cut short.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transliteration {
    pub image_height: u32,
    pub lines: Vec<LineText>,
}

impl Transliteration {
    /// The final document: every line followed by a line break.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }

    pub fn is_complete(&self) -> bool {
        self.lines.iter().all(|line| line.error.is_none())
    }
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values.fold((0.0f32, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

fn union_all(mut boxes: impl Iterator<Item = BBox>) -> Option<BBox> {
    let first = boxes.next()?;
    Some(boxes.fold(first, |acc, b| acc.union(&b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line_text(idx: usize, text: &str) -> LineText {
        LineText {
            line_idx: idx,
            text: text.to_string(),
            bbox: None,
            cluster_count: 1,
            error: None,
        }
    }

    #[test]
    fn empty_document_renders_empty_string() {
        let doc = Transliteration {
            image_height: 100,
            lines: vec![],
        };
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn every_line_ends_with_break() {
        let doc = Transliteration {
            image_height: 100,
            lines: vec![line_text(0, "ka"), line_text(1, "ku")],
        };
        assert_eq!(doc.text(), "ka\nku\n");
    }

    #[test]
    fn glyph_line_means() {
        let line = GlyphLine {
            glyphs: vec![
                Glyph::new("ka", BBox::new(0.0, 0.0, 10.0, 10.0)),
                Glyph::new("na", BBox::new(10.0, 10.0, 20.0, 30.0)),
            ],
        };
        assert_eq!(line.mean_center_y(), 12.5);
        assert_eq!(line.mean_height(), 15.0);
        assert_eq!(line.mean_top(), 5.0);
        assert_eq!(line.bbox(), Some(BBox::new(0.0, 0.0, 20.0, 30.0)));
    }
}
