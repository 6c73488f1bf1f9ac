//! Rendering of the internal taling marker for display.
use unicode_normalization::UnicodeNormalization;

use crate::core::config::OutputStyle;
use crate::translit::engine::TALING_MARK;

const COMBINING_ACUTE: char = '\u{0301}';

pub fn render(text: &str, style: OutputStyle) -> String {
    match style {
        OutputStyle::Raw => text.to_string(),
        OutputStyle::Accented => compose_taling(text),
    }
}

/// Rewrites each marker as `e` + combining acute, then composes with NFC so
/// the result carries precomposed `é`.
fn compose_taling(text: &str) -> String {
    let decomposed = text.replace(TALING_MARK, &format!("e{COMBINING_ACUTE}"));
    decomposed.nfc().collect()
}
