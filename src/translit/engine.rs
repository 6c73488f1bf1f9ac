use log::trace;

use crate::core::config::FlagScope;
use crate::core::error::TranslitError;
use crate::core::model::{Position, Token};
use crate::translit::output::OutputBuffer;
use crate::translit::table::{rekan_spelling, ClassEntry, ClassKind, ClassTable, ConjunctMode};

/// Internal marker for the taling vowel.
pub const TALING_MARK: &str = "e`";

const SYLLABLE_FINALS: [char; 6] = ['u', 'A', 'I', 'E', 'U', 'O'];
const PLAIN_VOWELS: [char; 5] = ['a', 'i', 'u', 'e', 'o'];

/// Rewriting state for one line.
#[derive(Debug, Clone, Default)]
pub struct TranslitState<'t> {
    pub output: OutputBuffer,
    pub history: Vec<&'t ClassEntry>,
    pub pending_vowel: bool,
}

impl<'t> TranslitState<'t> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state for the following line. Only the pending vowel flag can
    /// survive, and only in document scope.
    pub fn next_line(&self, scope: FlagScope) -> Self {
        Self {
            pending_vowel: scope == FlagScope::Document && self.pending_vowel,
            ..Self::default()
        }
    }
}

/// Result of running one line through the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LineOutcome {
    pub text: String,
    /// The error that cut the line short; `text` holds what came before it.
    pub error: Option<TranslitError>,
}

#[derive(Debug, Clone, Copy)]
pub struct Engine<'t> {
    table: &'t ClassTable,
}

impl<'t> Engine<'t> {
    pub fn new(table: &'t ClassTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t ClassTable {
        self.table
    }

    /// Consumes a line's tokens. The first error abandons the rest of the line.
    pub fn run_line(&self, tokens: &[Token], state: &mut TranslitState<'t>) -> LineOutcome {
        let error = tokens
            .iter()
            .try_for_each(|token| self.apply(state, token))
            .err();
        LineOutcome {
            text: state.output.concat(),
            error,
        }
    }

    pub fn apply(&self, state: &mut TranslitState<'t>, token: &Token) -> Result<(), TranslitError> {
        let entry = self.table.lookup(token.class_code())?;
        trace!("{} as {}", entry.class_code, token.role.as_str());
        match token.role {
            Position::Base => apply_base(state, entry),
            Position::Above => apply_above(state, entry),
            Position::Below => apply_below(state, entry),
        }
    }
}

fn apply_base<'t>(state: &mut TranslitState<'t>, entry: &'t ClassEntry) -> Result<(), TranslitError> {
    let out = &mut state.output;
    let fragment = entry.fragment.as_str();
    let empty = || TranslitError::empty(&entry.class_code, Position::Base);

    match entry.kind {
        ClassKind::DoublePause => out.append("||"),
        ClassKind::Comma => {
            if out.last() == Some(",") {
                out.replace_last(".").map_err(|_| empty())?;
            } else {
                out.append(",");
            }
        }
        ClassKind::ExtraVowel => {
            state.pending_vowel = true;
            return Ok(());
        }
        ClassKind::OpenVowel => {
            if let Ok(last) = out.last_mut() {
                if let Some(stem) = last.strip_suffix(TALING_MARK) {
                    let stem_len = stem.len();
                    last.truncate(stem_len);
                    last.push('o');
                }
            }
        }
        ClassKind::Aspirate => out.extend_last("h").map_err(|_| empty())?,
        ClassKind::DependentSuffix => out.extend_last(fragment).map_err(|_| empty())?,
        ClassKind::Conjunct { mode } => {
            if out.last_ends_with(TALING_MARK) {
                let last = out.last_mut().map_err(|_| empty())?;
                let at = last.len() - TALING_MARK.len();
                last.insert_str(at, fragment);
            } else if out.last_ends_with("a") {
                let last = out.last_mut().map_err(|_| empty())?;
                last.pop();
                last.push_str(fragment);
                if mode == ConjunctMode::Reappend {
                    last.push('a');
                }
            } else {
                out.append(fragment);
            }
        }
        _ => {
            if fragment.ends_with(SYLLABLE_FINALS) {
                out.append(fragment);
            } else if state.pending_vowel {
                out.append(format!("{fragment}{TALING_MARK}"));
                state.pending_vowel = false;
            } else {
                out.append(format!("{fragment}a"));
            }
        }
    }

    state.history.push(entry);
    Ok(())
}

fn apply_above<'t>(state: &mut TranslitState<'t>, entry: &'t ClassEntry) -> Result<(), TranslitError> {
    let out = &mut state.output;
    let fragment = entry.fragment.as_str();
    let empty = || TranslitError::empty(&entry.class_code, Position::Above);

    match entry.kind {
        ClassKind::Repha => out.extend_last(fragment).map_err(|_| empty())?,
        ClassKind::Rekan | ClassKind::RekanE => {
            let spelling = state
                .history
                .last()
                .and_then(|prev| rekan_spelling(&prev.class_code));
            if let Some(spelling) = spelling {
                out.replace_last(spelling).map_err(|_| empty())?;
            }
        }
        ClassKind::VowelSign => {
            if out.last().is_some_and(|last| last.ends_with(PLAIN_VOWELS)) {
                let last = out.last_mut().map_err(|_| empty())?;
                last.pop();
                last.push_str(fragment);
            } else {
                out.append(fragment);
            }
        }
        ClassKind::Nasal => out.append(fragment),
        _ => {}
    }
    Ok(())
}

fn apply_below<'t>(state: &mut TranslitState<'t>, entry: &'t ClassEntry) -> Result<(), TranslitError> {
    if !entry.allows(Position::Below) {
        return Ok(());
    }
    state.history.push(entry);

    let out = &mut state.output;
    let fragment = entry.fragment.as_str();
    let last = out
        .last_mut()
        .map_err(|_| TranslitError::empty(&entry.class_code, Position::Below))?;

    if let Some(stem) = last.strip_suffix(TALING_MARK) {
        let stem_len = stem.len();
        last.truncate(stem_len);
        out.append(format!("{fragment}{TALING_MARK}"));
    } else {
        last.pop();
        if fragment.ends_with(PLAIN_VOWELS) {
            out.append(fragment);
        } else {
            out.append(format!("{fragment}a"));
        }
    }
    Ok(())
}
