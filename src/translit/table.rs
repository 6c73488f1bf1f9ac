use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::core::error::{TableError, TranslitError};
use crate::core::model::Position;

/// Rule family a class belongs to. Selects how the engine rewrites output
/// when a glyph of this class is consumed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum ClassKind {
    /// Consonant or independent vowel; gains the inherent vowel.
    Letter,
    /// Consonant closed by pangkon, glued onto the previous syllable.
    DependentSuffix,
    DoublePause,
    Comma,
    /// Taling: marks the next letter with the taling vowel.
    ExtraVowel,
    /// Tarung: turns a preceding taling vowel into `o`.
    OpenVowel,
    /// Wignyan.
    Aspirate,
    /// Cakra, pengkal, keret.
    Conjunct { mode: ConjunctMode },
    /// Layar.
    Repha,
    /// Cecak telu, spelling the preceding consonant as a loan sound.
    Rekan,
    /// Cecak telu over pepet.
    RekanE,
    /// Wulu, pepet, wulu melik.
    VowelSign,
    /// Cecak.
    Nasal,
    /// Pasangan and suku.
    Subjoined,
    /// Above mark with no rewriting effect.
    Mark,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConjunctMode {
    /// The fragment replaces the inherent `a` outright.
    Replace,
    /// The fragment replaces the inherent `a`, which is then re-added.
    Reappend,
}

impl ClassKind {
    pub fn name(&self) -> &'static str {
        match self {
            ClassKind::Letter => "letter",
            ClassKind::DependentSuffix => "dependent_suffix",
            ClassKind::DoublePause => "double_pause",
            ClassKind::Comma => "comma",
            ClassKind::ExtraVowel => "extra_vowel",
            ClassKind::OpenVowel => "open_vowel",
            ClassKind::Aspirate => "aspirate",
            ClassKind::Conjunct { .. } => "conjunct",
            ClassKind::Repha => "repha",
            ClassKind::Rekan => "rekan",
            ClassKind::RekanE => "rekan_e",
            ClassKind::VowelSign => "vowel_sign",
            ClassKind::Nasal => "nasal",
            ClassKind::Subjoined => "subjoined",
            ClassKind::Mark => "mark",
        }
    }

    /// Position a class of this kind must be legal in for its rule to fire.
    pub fn home_position(&self) -> Position {
        match self {
            ClassKind::Repha
            | ClassKind::Rekan
            | ClassKind::RekanE
            | ClassKind::VowelSign
            | ClassKind::Nasal
            | ClassKind::Mark => Position::Above,
            ClassKind::Subjoined => Position::Below,
            _ => Position::Base,
        }
    }

    fn infer(code: &str, positions: &[Position]) -> Self {
        if code.starts_with('-') {
            ClassKind::DependentSuffix
        } else if positions.contains(&Position::Base) {
            ClassKind::Letter
        } else if positions.contains(&Position::Below) {
            ClassKind::Subjoined
        } else {
            ClassKind::Mark
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassEntry {
    pub class_code: String,
    pub fragment: String,
    pub positions: Vec<Position>,
    #[serde(flatten)]
    pub kind: ClassKind,
}

impl ClassEntry {
    pub fn new(
        class_code: impl Into<String>,
        fragment: impl Into<String>,
        positions: &[Position],
        kind: ClassKind,
    ) -> Self {
        Self {
            class_code: class_code.into(),
            fragment: fragment.into(),
            positions: positions.to_vec(),
            kind,
        }
    }

    pub fn allows(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }
}

/// Table row as written in JSON; `rule` may be omitted.
#[derive(Debug, Deserialize)]
struct EntrySpec {
    class_code: String,
    fragment: String,
    positions: Vec<Position>,
    /// `rule` and its parameters, decoded strictly once a rule is named.
    #[serde(flatten)]
    rule: serde_json::Map<String, serde_json::Value>,
}

impl EntrySpec {
    fn kind(&self) -> Result<ClassKind, TableError> {
        if !self.rule.contains_key("rule") {
            return Ok(ClassKind::infer(&self.class_code, &self.positions));
        }
        serde_json::from_value(serde_json::Value::Object(self.rule.clone())).map_err(|source| {
            TableError::InvalidRule {
                code: self.class_code.clone(),
                source,
            }
        })
    }
}

/// Read-only class lookup table shared by every pipeline run.
#[derive(Debug, Clone)]
pub struct ClassTable {
    entries: Vec<ClassEntry>,
    index: HashMap<String, usize>,
}

impl ClassTable {
    pub fn from_entries(entries: Vec<ClassEntry>) -> Result<Self, TableError> {
        let mut index = HashMap::with_capacity(entries.len());
        let mut normalized = Vec::with_capacity(entries.len());

        for mut entry in entries {
            if entry.positions.is_empty() {
                return Err(TableError::NoPositions {
                    code: entry.class_code,
                });
            }
            if entry.class_code.starts_with('-') {
                entry.kind = ClassKind::DependentSuffix;
            }
            let home = entry.kind.home_position();
            if !entry.allows(home) {
                return Err(TableError::MissingPosition {
                    code: entry.class_code,
                    kind: entry.kind.name(),
                    position: home.as_str(),
                });
            }
            entry.positions.sort();
            entry.positions.dedup();
            entry.fragment = entry.fragment.nfc().collect();

            if index.contains_key(&entry.class_code) {
                return Err(TableError::Duplicate {
                    code: entry.class_code,
                });
            }
            index.insert(entry.class_code.clone(), normalized.len());
            normalized.push(entry);
        }

        Ok(Self {
            entries: normalized,
            index,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        let rows: Vec<EntrySpec> = serde_json::from_str(json)?;
        let entries = rows
            .into_iter()
            .map(|row| {
                let kind = row.kind()?;
                Ok(ClassEntry {
                    class_code: row.class_code,
                    fragment: row.fragment,
                    positions: row.positions,
                    kind,
                })
            })
            .collect::<Result<Vec<_>, TableError>>()?;
        Self::from_entries(entries)
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn get(&self, code: &str) -> Option<&ClassEntry> {
        self.index.get(code).map(|&idx| &self.entries[idx])
    }

    pub fn lookup(&self, code: &str) -> Result<&ClassEntry, TranslitError> {
        self.get(code).ok_or_else(|| TranslitError::UnknownClass {
            code: code.to_string(),
        })
    }

    /// Closest known class code, for diagnostics.
    pub fn suggest(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .map(|entry| {
                let score = strsim::normalized_levenshtein(code, &entry.class_code);
                (score, entry.class_code.as_str())
            })
            .filter(|(score, _)| *score >= 0.6)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, code)| code)
    }

    pub fn entries(&self) -> &[ClassEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Javanese detector alphabet.
    pub fn builtin() -> Self {
        use ClassKind::*;
        use Position::{Above, Base, Below};

        let mut entries = Vec::new();
        for (code, fragment) in CONSONANTS {
            entries.push(ClassEntry::new(*code, *fragment, &[Base], Letter));
        }
        for (code, fragment) in CONSONANTS {
            entries.push(ClassEntry::new(format!("pas_{code}"), *fragment, &[Below], Subjoined));
        }
        for (code, fragment) in CONSONANTS {
            entries.push(ClassEntry::new(format!("-{code}"), *fragment, &[Base], DependentSuffix));
        }
        for (code, fragment) in SWARA {
            entries.push(ClassEntry::new(*code, *fragment, &[Base], Letter));
        }

        let signs = [
            ClassEntry::new("wulu", "i", &[Above], VowelSign),
            ClassEntry::new("pepet", "e", &[Above], VowelSign),
            ClassEntry::new("wulu_melik", "i", &[Above], VowelSign),
            ClassEntry::new("suku", "u", &[Below], Subjoined),
            ClassEntry::new("taling", "", &[Base], ExtraVowel),
            ClassEntry::new("tarung", "o", &[Base], OpenVowel),
            ClassEntry::new("layar", "r", &[Above], Repha),
            ClassEntry::new("cecak", "ng", &[Above], Nasal),
            ClassEntry::new("wignyan", "h", &[Base], Aspirate),
            ClassEntry::new("cakra", "r", &[Base], Conjunct { mode: ConjunctMode::Reappend }),
            ClassEntry::new("pengkal", "y", &[Base], Conjunct { mode: ConjunctMode::Reappend }),
            ClassEntry::new("keret", "re", &[Base], Conjunct { mode: ConjunctMode::Replace }),
            ClassEntry::new("cecak_telu", "", &[Above], Rekan),
            ClassEntry::new("cecak_telu_pepet", "", &[Above], RekanE),
            ClassEntry::new("pada_lingsa", ",", &[Base], Comma),
            ClassEntry::new("pada_adeg", "||", &[Base], DoublePause),
        ];
        entries.extend(signs);

        let mut index = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            index.insert(entry.class_code.clone(), idx);
        }
        Self { entries, index }
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Aksara nglegena, in hanacaraka order.
const CONSONANTS: &[(&str, &str)] = &[
    ("ha", "h"),
    ("na", "n"),
    ("ca", "c"),
    ("ra", "r"),
    ("ka", "k"),
    ("da", "d"),
    ("ta", "t"),
    ("sa", "s"),
    ("wa", "w"),
    ("la", "l"),
    ("pa", "p"),
    ("dha", "dh"),
    ("ja", "j"),
    ("ya", "y"),
    ("nya", "ny"),
    ("ma", "m"),
    ("ga", "g"),
    ("ba", "b"),
    ("tha", "th"),
    ("nga", "ng"),
];

/// Aksara swara. Uppercase fragments mark a complete syllable.
const SWARA: &[(&str, &str)] = &[
    ("swara_a", "A"),
    ("swara_i", "I"),
    ("swara_u", "U"),
    ("swara_e", "E"),
    ("swara_o", "O"),
];

/// Loan-sound spellings selected by cecak telu, keyed by the base consonant.
/// The spelling replaces the whole syllable.
pub struct RekanSpelling {
    pub base: &'static str,
    pub spelling: &'static str,
}

pub const REKAN_SPELLINGS: [RekanSpelling; 5] = [
    RekanSpelling { base: "ka", spelling: "kha" },
    RekanSpelling { base: "ga", spelling: "gha" },
    RekanSpelling { base: "ja", spelling: "za" },
    RekanSpelling { base: "pa", spelling: "fa" },
    RekanSpelling { base: "dha", spelling: "dza" },
];

pub fn rekan_spelling(base_code: &str) -> Option<&'static str> {
    REKAN_SPELLINGS
        .iter()
        .find(|s| s.base == base_code)
        .map(|s| s.spelling)
}
