use crate::core::config::LineTolerance;
use crate::core::model::{Glyph, GlyphLine};

/// Partitions glyphs into reading lines, top to bottom.
///
/// Glyphs are visited by ascending top edge. A glyph joins the line being
/// built when its vertical center is within the adaptive tolerance of the
/// line's mean center; otherwise the line is closed and a new one started.
///
/// Closed lines are ordered by the mean top edge of their glyphs, not the
/// mean center. The two keys can disagree when a line mixes tall and short
/// glyphs.
pub fn segment_lines(
    mut glyphs: Vec<Glyph>,
    image_height: u32,
    tolerance: &LineTolerance,
) -> Vec<GlyphLine> {
    glyphs.sort_by(Glyph::cmp_top_left);

    let mut lines: Vec<GlyphLine> = Vec::new();
    let mut current = GlyphLine::default();

    for glyph in glyphs {
        if current.glyphs.is_empty() {
            current.glyphs.push(glyph);
            continue;
        }
        let band = tolerance.tolerance(current.mean_height(), image_height);
        let offset = (glyph.bbox().center_y() - current.mean_center_y()).abs();
        if offset <= band {
            current.glyphs.push(glyph);
        } else {
            lines.push(std::mem::take(&mut current));
            current.glyphs.push(glyph);
        }
    }
    if !current.glyphs.is_empty() {
        lines.push(current);
    }

    lines.sort_by(|a, b| a.mean_top().total_cmp(&b.mean_top()));
    lines
}
