//! Core data structures shared by the extraction, linking, validation and
//! serialization stages.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two supported biblical-language dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dictionary {
    /// Semantic Dictionary of Biblical Hebrew
    #[serde(rename = "SDBH")]
    Sdbh,
    /// Semantic Dictionary of Biblical Greek
    #[serde(rename = "SDBG")]
    Sdbg,
}

/// Per-dictionary inclusion rules applied by the lexicon extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryRules {
    /// The default dictionary is the one without version gating.
    pub is_default: bool,
    /// Entries with a lower Version are excluded entirely.
    pub lexical_complete: Option<u32>,
    /// Contextual meanings are skipped for entries with a lower Version.
    pub contextual_complete: u32,
    /// IsBiblicalTerm values that exclude a lexical meaning.
    pub excluded_biblical_term_markers: &'static [&'static str],
}

static SDBH_RULES: DictionaryRules = DictionaryRules {
    is_default: false,
    lexical_complete: Some(3),
    contextual_complete: 5,
    excluded_biblical_term_markers: &[],
};

static SDBG_RULES: DictionaryRules = DictionaryRules {
    is_default: true,
    lexical_complete: None,
    contextual_complete: 0,
    excluded_biblical_term_markers: &["N"],
};

impl Dictionary {
    pub fn tag(&self) -> &'static str {
        match self {
            Dictionary::Sdbh => "SDBH",
            Dictionary::Sdbg => "SDBG",
        }
    }

    pub fn rules(&self) -> &'static DictionaryRules {
        match self {
            Dictionary::Sdbh => &SDBH_RULES,
            Dictionary::Sdbg => &SDBG_RULES,
        }
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid dictionary value: {0}")]
pub struct ParseDictionaryError(String);

impl FromStr for Dictionary {
    type Err = ParseDictionaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sdbh" | "hebrew" => Ok(Dictionary::Sdbh),
            "sdbg" | "greek" => Ok(Dictionary::Sdbg),
            _ => Err(ParseDictionaryError(s.to_string())),
        }
    }
}

/// Lexical meanings (LEX) or contextual meanings (CON).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeaningType {
    Lexical,
    Contextual,
}

impl MeaningType {
    /// Name of the taxonomy built from domain definitions of this type.
    pub fn taxonomy_name(&self) -> &'static str {
        match self {
            MeaningType::Lexical => TAXONOMY_LEX_DOMAINS,
            MeaningType::Contextual => TAXONOMY_CON_DOMAINS,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid meaning type value: {0}")]
pub struct ParseMeaningTypeError(String);

impl FromStr for MeaningType {
    type Err = ParseMeaningTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LEX" | "LEXICAL" => Ok(MeaningType::Lexical),
            "CON" | "CONTEXTUAL" => Ok(MeaningType::Contextual),
            _ => Err(ParseMeaningTypeError(s.to_string())),
        }
    }
}

pub const TAXONOMY_LEX_DOMAINS: &str = "LEXDomains";
pub const TAXONOMY_LEX_CORE_DOMAINS: &str = "LEXCoreDomains";
pub const TAXONOMY_CON_DOMAINS: &str = "CONDomains";

/// Position of a sense in the source hierarchy: base form, lexical meaning,
/// and for contextual senses the contextual meaning. All 1-based.
///
/// `(1, 2, None)` and `(1, 2, Some(1))` are different positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionalIndex {
    pub base_form: u32,
    pub lex_meaning: u32,
    pub con_meaning: Option<u32>,
}

impl PositionalIndex {
    pub fn lexical(base_form: u32, lex_meaning: u32) -> Self {
        PositionalIndex { base_form, lex_meaning, con_meaning: None }
    }

    pub fn contextual(base_form: u32, lex_meaning: u32, con_meaning: u32) -> Self {
        PositionalIndex { base_form, lex_meaning, con_meaning: Some(con_meaning) }
    }

    /// Parse the 6 digit (`BBBLLL`) or 9 digit (`BBBLLLCCC`) form used in
    /// cross-reference descriptors.
    pub fn parse(s: &str) -> Option<Self> {
        if !s.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let group = |i: usize| s[i..i + 3].parse::<u32>().ok();
        match s.len() {
            6 => Some(PositionalIndex::lexical(group(0)?, group(3)?)),
            9 => Some(PositionalIndex::contextual(group(0)?, group(3)?, group(6)?)),
            _ => None,
        }
    }
}

impl fmt::Display for PositionalIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.con_meaning {
            Some(c) => write!(f, "{:03}{:03}{:03}", self.base_form, self.lex_meaning, c),
            None => write!(f, "{:03}{:03}", self.base_form, self.lex_meaning),
        }
    }
}

/// A semantic-domain annotation on a sense. `code` is in normalized dotted form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain {
    pub taxonomy: String,
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sense {
    pub id: String,
    pub index: PositionalIndex,
    pub definition: Option<String>,
    pub glosses: IndexSet<String>,
    pub domains: IndexSet<Domain>,
    /// Canonical references, e.g. `LUK 1:1!1`. Deduplicated by the validator.
    pub occurrences: Vec<String>,
}

impl Sense {
    pub fn new(id: String, index: PositionalIndex) -> Self {
        Sense {
            id,
            index,
            definition: None,
            glosses: IndexSet::new(),
            domains: IndexSet::new(),
            occurrences: Vec::new(),
        }
    }

    pub fn set_definition(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.definition = Some(text.to_string());
        }
    }

    /// Adds a gloss, ignoring empty and repeated values.
    pub fn add_gloss(&mut self, gloss: &str) {
        let gloss = gloss.trim();
        if !gloss.is_empty() {
            self.glosses.insert(gloss.to_string());
        }
    }

    /// A sense with neither definition nor glosses carries no content.
    pub fn is_empty(&self) -> bool {
        self.definition.is_none() && self.glosses.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Source identifier of the lexicon entry.
    pub id: String,
    pub lemma: String,
    pub strong_codes: Vec<String>,
    pub senses: Vec<Sense>,
}

impl Entry {
    pub fn find_sense_mut(&mut self, index: &PositionalIndex) -> Option<&mut Sense> {
        self.senses.iter_mut().find(|s| s.index == *index)
    }
}

/// All entries of one dictionary in one target language, keyed and sorted by lemma.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageLexicon {
    pub language: String,
    pub entries: BTreeMap<String, Entry>,
}

impl LanguageLexicon {
    pub fn new(language: &str) -> Self {
        LanguageLexicon {
            language: language.to_string(),
            entries: BTreeMap::new(),
        }
    }

    /// Returns the entry for `lemma`, creating it on first sight.
    pub fn entry_or_insert(&mut self, source_id: &str, lemma: &str, strong_codes: &[String]) -> &mut Entry {
        self.entries
            .entry(lemma.to_string())
            .or_insert_with(|| Entry {
                id: source_id.to_string(),
                lemma: lemma.to_string(),
                strong_codes: strong_codes.to_vec(),
                senses: Vec::new(),
            })
    }

    pub fn sense_count(&self) -> usize {
        self.entries.values().map(|e| e.senses.len()).sum()
    }
}

/// Per-language lexicons of one dictionary, keyed by language code.
pub type Lexicons = BTreeMap<String, LanguageLexicon>;

/// A node in a domain taxonomy tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubDomain {
    pub code: String,
    pub label: String,
    pub children: Vec<SubDomain>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    pub name: String,
    pub domains: Vec<SubDomain>,
}

impl Taxonomy {
    /// Flattens the tree into `(code, label, parent_code)` rows in pre-order.
    pub fn flatten(&self) -> Vec<(String, String, Option<String>)> {
        let mut rows = Vec::new();
        let mut stack: Vec<(&SubDomain, Option<&str>)> =
            self.domains.iter().rev().map(|d| (d, None)).collect();

        while let Some((node, parent)) = stack.pop() {
            rows.push((node.code.clone(), node.label.clone(), parent.map(|p| p.to_string())));
            for child in node.children.iter().rev() {
                stack.push((child, Some(node.code.as_str())));
            }
        }

        rows
    }
}
