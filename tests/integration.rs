use std::fs;

use anyhow::Result;
use pretty_assertions::assert_eq;

use aksara::core::config::Config;
use aksara::core::model::{Glyph, Position};
use aksara::detect::{ingest, RawDetection};
use aksara::export::{Exporter, JsonExporter};
use aksara::layout::line_tokens;
use aksara::translit::ClassTable;
use aksara::{Pipeline, Transliteration};

const SCENARIO_TABLE: &str = r#"[
    {"class_code": "k", "fragment": "k", "positions": ["base"]},
    {"class_code": "u", "fragment": "u", "positions": ["below"]},
    {"class_code": "e", "fragment": "e", "positions": ["above"], "rule": "vowel_sign"}
]"#;

fn scenario_pipeline() -> Result<Pipeline> {
    Ok(Pipeline::new(
        Config::default(),
        ClassTable::from_json_str(SCENARIO_TABLE)?,
    ))
}

fn det(code: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> RawDetection {
    RawDetection::new(code, [x0, y0, x1, y1])
}

/// A two-line page written with the built-in alphabet.
fn sample_page() -> Vec<RawDetection> {
    vec![
        // ha na ca+wulu ra ka+suku
        det("ha", 10.0, 100.0, 50.0, 140.0),
        det("na", 55.0, 101.0, 95.0, 141.0),
        det("ca", 100.0, 99.0, 140.0, 139.0),
        det("wulu", 110.0, 80.0, 128.0, 92.0),
        det("ra", 145.0, 100.0, 185.0, 140.0),
        det("ka", 190.0, 100.0, 230.0, 140.0),
        det("suku", 195.0, 143.0, 225.0, 155.0),
        // taling ka tarung+cecak , ,
        det("taling", 10.0, 300.0, 30.0, 340.0),
        det("ka", 35.0, 300.0, 75.0, 340.0),
        det("tarung", 80.0, 300.0, 95.0, 340.0),
        det("cecak", 85.0, 282.0, 95.0, 292.0),
        det("pada_lingsa", 100.0, 300.0, 110.0, 340.0),
        det("pada_lingsa", 115.0, 300.0, 125.0, 340.0),
    ]
}

#[test]
fn empty_detections_give_empty_document() -> Result<()> {
    let doc = Pipeline::default().transliterate(&[], 1200)?;
    assert_eq!(doc.text(), "");
    assert!(doc.lines.is_empty());
    Ok(())
}

#[test]
fn bare_consonant_gains_inherent_vowel() -> Result<()> {
    let doc = scenario_pipeline()?.transliterate(&[det("k", 0.0, 0.0, 30.0, 40.0)], 2000)?;
    assert_eq!(doc.text(), "ka\n");
    Ok(())
}

#[test]
fn below_mark_replaces_inherent_vowel() -> Result<()> {
    let doc = scenario_pipeline()?.transliterate(
        &[det("k", 0.0, 0.0, 30.0, 40.0), det("u", 5.0, 42.0, 25.0, 50.0)],
        2000,
    )?;
    assert_eq!(doc.text(), "ku\n");
    Ok(())
}

#[test]
fn above_vowel_sign_replaces_inherent_vowel() -> Result<()> {
    let doc = scenario_pipeline()?.transliterate(
        &[det("k", 0.0, 10.0, 30.0, 50.0), det("e", 5.0, 0.0, 25.0, 8.0)],
        2000,
    )?;
    assert_eq!(doc.text(), "ke\n");
    Ok(())
}

#[test]
fn unknown_class_keeps_partial_line() -> Result<()> {
    let doc = scenario_pipeline()?.transliterate(
        &[
            det("k", 0.0, 0.0, 30.0, 40.0),
            det("q", 40.0, 0.0, 70.0, 40.0),
            det("k", 80.0, 0.0, 110.0, 40.0),
            det("k", 0.0, 200.0, 30.0, 240.0),
        ],
        2000,
    )?;
    assert_eq!(doc.text(), "ka\nka\n");
    assert!(doc.lines[0].error.is_some());
    assert!(doc.lines[1].error.is_none());
    Ok(())
}

#[test]
fn transliterates_sample_page() -> Result<()> {
    let doc = Pipeline::default().transliterate(&sample_page(), 3000)?;
    assert_eq!(doc.text(), "hanaciraku\nkong.\n");
    assert!(doc.is_complete());
    Ok(())
}

#[test]
fn runs_are_byte_identical_and_order_independent() -> Result<()> {
    let pipeline = Pipeline::default();
    let page = sample_page();
    let mut shuffled = page.clone();
    shuffled.reverse();
    shuffled.swap(1, 7);

    let first = pipeline.transliterate(&page, 3000)?;
    let second = pipeline.transliterate(&page, 3000)?;
    let third = pipeline.transliterate(&shuffled, 3000)?;
    assert_eq!(first.text().as_bytes(), second.text().as_bytes());
    assert_eq!(first, third);
    Ok(())
}

#[test]
fn layout_is_a_total_partition() -> Result<()> {
    let pipeline = Pipeline::default();
    let page = sample_page();
    let lines = pipeline.layout(ingest(&page), 3000);

    let mut seen: Vec<Glyph> = Vec::new();
    for line in &lines {
        let tokens = line_tokens(line);
        assert_eq!(tokens.len(), line.glyph_count());
        for cluster in &line.clusters {
            seen.push(cluster.base.clone());
            seen.extend(cluster.above.iter().cloned());
            seen.extend(cluster.below.iter().cloned());
        }
        // one base token per cluster
        let bases = tokens.iter().filter(|t| t.role == Position::Base).count();
        assert_eq!(bases, line.clusters.len());
    }

    let mut expected = ingest(&page);
    let key = |g: &Glyph| (g.class_code().to_string(), g.bbox().x0.to_bits(), g.bbox().y0.to_bits());
    expected.sort_by_key(key);
    seen.sort_by_key(key);
    assert_eq!(seen, expected);

    let tops: Vec<f32> = lines
        .iter()
        .map(|l| l.bbox().map(|b| b.y0).unwrap_or_default())
        .collect();
    assert!(tops.windows(2).all(|w| w[0] < w[1]));
    Ok(())
}

#[test]
fn json_export_round_trips_document() -> Result<()> {
    let doc = Pipeline::default().transliterate(&sample_page(), 3000)?;
    let out = tempfile::tempdir()?;
    JsonExporter::new(out.path().to_path_buf()).export(&doc)?;

    let contents = fs::read_to_string(out.path().join("document.json"))?;
    let parsed: Transliteration = serde_json::from_str(&contents)?;
    assert_eq!(parsed, doc);
    Ok(())
}

#[test]
fn config_file_selects_class_table() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let table_path = dir.path().join("table.json");
    fs::write(&table_path, SCENARIO_TABLE)?;
    let config_path = dir.path().join("aksara.toml");
    fs::write(
        &config_path,
        format!("class_table = {:?}\n", table_path.display().to_string()),
    )?;

    let pipeline = Pipeline::from_config(Config::load(&config_path)?)?;
    assert_eq!(pipeline.table().len(), 3);
    let doc = pipeline.transliterate(&[det("k", 0.0, 0.0, 30.0, 40.0)], 2000)?;
    assert_eq!(doc.text(), "ka\n");
    Ok(())
}
