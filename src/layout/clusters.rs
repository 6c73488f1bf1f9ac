use crate::core::model::{Cluster, Glyph, GlyphLine, Line};

/// Groups the glyphs of one line into base+diacritic clusters.
///
/// Glyphs are scanned left to right. Each glyph not yet claimed becomes the
/// base of a new cluster and claims every other unclaimed glyph that
/// overlaps it horizontally and lies wholly above or wholly below its
/// vertical midpoint. A glyph straddling the midpoint stays unclaimed and
/// becomes a base later in the scan, so every glyph ends up in exactly one
/// cluster with exactly one role.
pub fn build_clusters(line: GlyphLine) -> Line {
    let mut glyphs = line.glyphs;
    glyphs.sort_by(Glyph::cmp_left_top);

    let mut pending: Vec<Option<Glyph>> = glyphs.into_iter().map(Some).collect();
    let mut clusters = Vec::new();

    for idx in 0..pending.len() {
        let Some(base) = pending[idx].take() else {
            continue;
        };
        let base_box = *base.bbox();
        let mid = base_box.mid_y();
        let mut cluster = Cluster::new(base);

        for slot in pending.iter_mut().skip(idx + 1) {
            let Some(other) = slot.as_ref() else {
                continue;
            };
            let other_box = other.bbox();
            if !base_box.overlaps_horizontally(other_box) {
                continue;
            }
            if other_box.y1 < mid {
                cluster.above.extend(slot.take());
            } else if other_box.y0 > mid {
                cluster.below.extend(slot.take());
            }
        }

        cluster.above.sort_by(Glyph::cmp_left_top);
        cluster.below.sort_by(Glyph::cmp_left_top);
        clusters.push(cluster);
    }

    Line { clusters }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::BBox;
    use pretty_assertions::assert_eq;

    fn glyph(code: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> Glyph {
        Glyph::new(code, BBox::new(x0, y0, x1, y1))
    }

    fn line(glyphs: Vec<Glyph>) -> GlyphLine {
        GlyphLine { glyphs }
    }

    fn summary(line: &Line) -> Vec<(&str, Vec<&str>, Vec<&str>)> {
        line.clusters
            .iter()
            .map(|c| {
                (
                    c.base.class_code(),
                    c.above.iter().map(Glyph::class_code).collect(),
                    c.below.iter().map(Glyph::class_code).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn attaches_above_and_below_marks() {
        let built = build_clusters(line(vec![
            glyph("suku", 12.0, 62.0, 28.0, 80.0),
            glyph("ka", 10.0, 20.0, 40.0, 60.0),
            glyph("wulu", 15.0, 0.0, 30.0, 15.0),
            glyph("na", 45.0, 20.0, 75.0, 60.0),
        ]));
        assert_eq!(
            summary(&built),
            vec![
                ("ka", vec!["wulu"], vec!["suku"]),
                ("na", vec![], vec![]),
            ]
        );
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let built = build_clusters(line(vec![
            glyph("ka", 0.0, 20.0, 20.0, 60.0),
            glyph("cecak", 20.0, 0.0, 30.0, 10.0),
        ]));
        assert_eq!(built.clusters.len(), 2);
        assert_eq!(built.clusters[1].base.class_code(), "cecak");
    }

    #[test]
    fn straddling_glyph_becomes_its_own_base() {
        let built = build_clusters(line(vec![
            glyph("ka", 0.0, 20.0, 30.0, 60.0),
            glyph("tarung", 25.0, 30.0, 45.0, 55.0),
        ]));
        assert_eq!(summary(&built), vec![("ka", vec![], vec![]), ("tarung", vec![], vec![])]);
    }

    #[test]
    fn diacritics_are_sorted_left_to_right() {
        let built = build_clusters(line(vec![
            glyph("ka", 0.0, 20.0, 60.0, 60.0),
            glyph("layar", 35.0, 0.0, 50.0, 10.0),
            glyph("cecak", 5.0, 2.0, 20.0, 12.0),
            glyph("pas_na", 30.0, 65.0, 55.0, 85.0),
            glyph("suku", 2.0, 66.0, 20.0, 80.0),
        ]));
        assert_eq!(
            summary(&built),
            vec![("ka", vec!["cecak", "layar"], vec!["suku", "pas_na"])]
        );
    }

    #[test]
    fn partition_is_total() {
        let glyphs = vec![
            glyph("ha", 0.0, 20.0, 30.0, 60.0),
            glyph("wulu", 5.0, 0.0, 25.0, 12.0),
            glyph("na", 32.0, 20.0, 62.0, 60.0),
            glyph("pas_ka", 35.0, 62.0, 60.0, 85.0),
            glyph("suku", 40.0, 88.0, 55.0, 99.0),
            glyph("tarung", 28.0, 25.0, 36.0, 55.0),
            glyph("ca", 70.0, 20.0, 100.0, 60.0),
        ];
        let built = build_clusters(line(glyphs.clone()));
        assert_eq!(built.glyph_count(), glyphs.len());

        let mut seen: Vec<&Glyph> = built
            .clusters
            .iter()
            .flat_map(|c| std::iter::once(&c.base).chain(&c.above).chain(&c.below))
            .collect();
        seen.sort_by(|a, b| a.cmp_left_top(b));
        let mut expected: Vec<&Glyph> = glyphs.iter().collect();
        expected.sort_by(|a, b| a.cmp_left_top(b));
        assert_eq!(seen, expected);
    }

    #[test]
    fn input_order_does_not_matter() {
        let glyphs = vec![
            glyph("ka", 0.0, 20.0, 30.0, 60.0),
            glyph("wulu", 5.0, 0.0, 25.0, 12.0),
            glyph("na", 32.0, 20.0, 62.0, 60.0),
        ];
        let mut reversed = glyphs.clone();
        reversed.reverse();
        assert_eq!(build_clusters(line(glyphs)), build_clusters(line(reversed)));
    }
}
