//! Attaches scripture occurrences from cross-reference documents to senses.
//!
//! A link record pairs an encoded location with descriptors of the form
//! `<DICT>:<lemma>:<positional index>[:<label>]`. The join key is the lemma
//! plus the positional index, so one descriptor updates the sense at that
//! position in every language that has the lemma.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::dir_list::book_code_from_filename;
use crate::encoding::read_source_file;
use crate::logger;
use crate::reference::{classify_encoded, is_supported_book, EncodedLocation};
use crate::types::{Dictionary, Lexicons, PositionalIndex};

/// One record of a cross-reference document.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkRecord {
    pub id: String,
    #[serde(rename = "lexicalLinks", default)]
    pub lexical_links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDescriptor {
    pub dictionary_tag: String,
    pub lemma: String,
    pub index: PositionalIndex,
    pub label: Option<String>,
}

impl LinkDescriptor {
    /// Parses `SDBG:λόγος:001002003:word`. Returns None for descriptors with
    /// missing parts or a positional index that is not 6 or 9 digits.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.splitn(4, ':');

        let dictionary_tag = parts.next()?.trim();
        let lemma = parts.next()?.trim();
        let index = PositionalIndex::parse(parts.next()?.trim())?;
        let label = parts.next()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        if dictionary_tag.is_empty() || lemma.is_empty() {
            return None;
        }

        Some(LinkDescriptor {
            dictionary_tag: dictionary_tag.to_string(),
            lemma: lemma.to_string(),
            index,
            label,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub files_read: usize,
    pub files_skipped: usize,
    pub records: usize,
    pub bad_ids: usize,
    pub odd_ids: usize,
    pub invalid_descriptors: usize,
    pub wrong_dictionary: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub occurrences_attached: usize,
}

pub struct CrossRefLinker {
    dictionary: Dictionary,
    pub stats: LinkStats,
}

impl CrossRefLinker {
    pub fn new(dictionary: Dictionary) -> Self {
        CrossRefLinker {
            dictionary,
            stats: LinkStats::default(),
        }
    }

    /// Links one cross-reference document. Documents for books outside the
    /// supported list are skipped and counted.
    pub fn link_file(&mut self, path: &Path, lexicons: &mut Lexicons) -> Result<()> {
        let book = book_code_from_filename(path).unwrap_or_default();
        if !is_supported_book(&book) {
            logger::warn(&format!("Skipping cross-reference file for unsupported book {:?}: {:?}", book, path));
            self.stats.files_skipped += 1;
            return Ok(());
        }

        let content = read_source_file(path)?;
        let records: Vec<LinkRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cross-reference document: {:?}", path))?;

        self.link_records(&records, lexicons);
        self.stats.files_read += 1;

        Ok(())
    }

    pub fn link_records(&mut self, records: &[LinkRecord], lexicons: &mut Lexicons) {
        for record in records {
            self.link_record(record, lexicons);
        }
    }

    fn link_record(&mut self, record: &LinkRecord, lexicons: &mut Lexicons) {
        self.stats.records += 1;

        let reference = match classify_encoded(record.id.trim()) {
            EncodedLocation::Word(reference) => reference,
            EncodedLocation::Apparatus => {
                self.stats.odd_ids += 1;
                return;
            }
            EncodedLocation::Invalid => {
                logger::warn(&format!("Invalid cross-reference location: {:?}", record.id));
                self.stats.bad_ids += 1;
                return;
            }
        };

        for raw in &record.lexical_links {
            let Some(descriptor) = LinkDescriptor::parse(raw) else {
                logger::warn(&format!("Invalid link descriptor at {}: {:?}", reference, raw));
                self.stats.invalid_descriptors += 1;
                continue;
            };

            if descriptor.dictionary_tag != self.dictionary.tag() {
                self.stats.wrong_dictionary += 1;
                continue;
            }

            let attached = attach_occurrence(lexicons, &descriptor, &reference);

            if attached == 0 {
                logger::debug(&format!("Unresolved link at {}: {}", reference, raw));
                self.stats.unresolved += 1;
            } else {
                self.stats.resolved += 1;
                self.stats.occurrences_attached += attached;
            }
        }
    }
}

/// Appends `reference` to every sense at the descriptor's position, across all
/// languages having the lemma. Returns the number of senses updated.
pub fn attach_occurrence(lexicons: &mut Lexicons, descriptor: &LinkDescriptor, reference: &str) -> usize {
    let mut attached = 0;

    for lexicon in lexicons.values_mut() {
        let Some(entry) = lexicon.entries.get_mut(&descriptor.lemma) else {
            continue;
        };

        for sense in entry.senses.iter_mut().filter(|s| s.index == descriptor.index) {
            sense.occurrences.push(reference.to_string());
            attached += 1;
        }
    }

    attached
}
