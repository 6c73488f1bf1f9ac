use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::Transliteration;
use crate::export::Exporter;

/// Writes the plain transliteration, one line of script per text line.
#[derive(Debug, Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for TextExporter {
    fn export(&self, document: &Transliteration) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join("document.txt");
        fs::write(path, document.text())?;
        Ok(())
    }
}
