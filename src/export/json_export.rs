use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::model::Transliteration;
use crate::export::Exporter;

/// `document.json`: the full transliteration plus a summary of the lines
/// that were cut short. Reads back as a [`Transliteration`].
#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct DocumentReport<'a> {
    text: String,
    complete: bool,
    /// Indices of lines whose transliteration stopped early.
    incomplete_lines: Vec<usize>,
    #[serde(flatten)]
    document: &'a Transliteration,
}

impl<'a> DocumentReport<'a> {
    fn new(document: &'a Transliteration) -> Self {
        let incomplete_lines = document
            .lines
            .iter()
            .filter(|line| line.error.is_some())
            .map(|line| line.line_idx)
            .collect::<Vec<_>>();
        Self {
            text: document.text(),
            complete: incomplete_lines.is_empty(),
            incomplete_lines,
            document,
        }
    }
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for JsonExporter {
    fn export(&self, document: &Transliteration) -> Result<()> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("failed to create {}", self.out_dir.display()))?;
        let path = self.out_dir.join("document.json");
        let data = serde_json::to_string_pretty(&DocumentReport::new(document))?;
        fs::write(&path, data).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}
