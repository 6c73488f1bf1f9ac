use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::core::config::{Config, UnknownClassPolicy};
use crate::core::error::TranslitError;
use crate::core::model::{Glyph, Line, LineText, Transliteration};
use crate::detect::{ingest, GlyphDetector, RawDetection};
use crate::export::{Exporter, JsonExporter, TextExporter};
use crate::layout::{build_clusters, line_tokens, segment_lines};
use crate::translit::accent;
use crate::translit::{ClassTable, Engine, TranslitState};

/// One configured transliteration pipeline. Holds the read-only class table
/// and can be shared between runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    table: ClassTable,
}

impl Pipeline {
    pub fn new(config: Config, table: ClassTable) -> Self {
        Self { config, table }
    }

    /// Uses the class table named in the config, or the built-in one.
    pub fn from_config(config: Config) -> Result<Self> {
        let table = match &config.class_table {
            Some(path) => ClassTable::load(path)
                .with_context(|| format!("failed to load class table {}", path.display()))?,
            None => ClassTable::builtin(),
        };
        Ok(Self::new(config, table))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn table(&self) -> &ClassTable {
        &self.table
    }

    /// Segments glyphs into lines and clusters each line.
    pub fn layout(&self, glyphs: Vec<Glyph>, image_height: u32) -> Vec<Line> {
        segment_lines(glyphs, image_height, &self.config.tolerance)
            .into_iter()
            .map(build_clusters)
            .collect()
    }

    pub fn transliterate(
        &self,
        detections: &[RawDetection],
        image_height: u32,
    ) -> Result<Transliteration> {
        let glyphs = ingest(detections);
        let lines = self.layout(glyphs, image_height);
        debug!(
            "{} detection(s) laid out into {} line(s)",
            detections.len(),
            lines.len()
        );

        let engine = Engine::new(&self.table);
        let mut state = TranslitState::new();
        let mut out = Vec::with_capacity(lines.len());

        for (line_idx, line) in lines.iter().enumerate() {
            state = state.next_line(self.config.flag_scope);
            let tokens = line_tokens(line);
            let outcome = engine.run_line(&tokens, &mut state);

            if let Some(err) = &outcome.error {
                self.report(line_idx, err);
                if self.config.unknown_class == UnknownClassPolicy::AbortDocument
                    && matches!(err, TranslitError::UnknownClass { .. })
                {
                    return Err(anyhow::Error::new(err.clone())
                        .context(format!("line {} aborted the document", line_idx + 1)));
                }
            }

            out.push(LineText {
                line_idx,
                text: accent::render(&outcome.text, self.config.output_style),
                bbox: line.bbox(),
                cluster_count: line.clusters.len(),
                error: outcome.error.map(|e| e.to_string()),
            });
        }

        Ok(Transliteration {
            image_height,
            lines: out,
        })
    }

    pub fn transliterate_image(
        &self,
        detector: &dyn GlyphDetector,
        image_path: &Path,
    ) -> Result<Transliteration> {
        let page = detector
            .detect(image_path)
            .with_context(|| format!("glyph detection failed for {}", image_path.display()))?;
        self.transliterate(&page.detections, page.height)
    }

    fn report(&self, line_idx: usize, err: &TranslitError) {
        match err {
            TranslitError::UnknownClass { code } => match self.table.suggest(code) {
                Some(close) => warn!(
                    "line {}: {err} (did you mean '{close}'?); rest of line skipped",
                    line_idx + 1
                ),
                None => warn!("line {}: {err}; rest of line skipped", line_idx + 1),
            },
            TranslitError::EmptyOutput { .. } => {
                warn!("line {}: {err}; rest of line skipped", line_idx + 1)
            }
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Config::default(), ClassTable::builtin())
    }
}

pub fn export_document(document: &Transliteration, output: &Path) -> Result<()> {
    let json_exporter = JsonExporter::new(output.to_path_buf());
    json_exporter.export(document)?;

    let text_exporter = TextExporter::new(output.to_path_buf());
    text_exporter.export(document)?;

    Ok(())
}
