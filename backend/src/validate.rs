//! Per-language deduplication and validation of extracted lexicons.
//!
//! Steps, in order:
//! 1. condense every sense id
//! 2. merge or drop senses sharing a condensed id within an entry
//! 3. check that entry and sense ids are unique across the language (fatal)
//! 4. prune senses without content, then entries without senses
//! 5. remove duplicate occurrences of each sense

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::identifiers::{condense_sense_id, output_entry_id, output_sense_id};
use crate::logger;
use crate::reference::is_valid_canonical;
use crate::types::{Entry, LanguageLexicon, Sense};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Duplicate entry id {id} in language {language}: {first} and {second}")]
    DuplicateEntryId {
        language: String,
        id: String,
        first: String,
        second: String,
    },
    #[error("Duplicate sense id {id} in language {language}: {first} and {second}")]
    DuplicateSenseId {
        language: String,
        id: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub senses_merged: usize,
    pub duplicates_dropped: usize,
    pub senses_pruned: usize,
    pub entries_pruned: usize,
    pub duplicate_occurrences: usize,
    pub invalid_occurrences: usize,
}

pub fn validate_language(lexicon: &mut LanguageLexicon) -> Result<ValidationReport, ValidationError> {
    let mut report = ValidationReport::default();

    for entry in lexicon.entries.values_mut() {
        for sense in entry.senses.iter_mut() {
            sense.id = condense_sense_id(&sense.id);
        }
        merge_duplicate_senses(entry, &mut report);
    }

    check_unique_ids(lexicon)?;

    prune_empty(lexicon, &mut report);

    for entry in lexicon.entries.values_mut() {
        for sense in entry.senses.iter_mut() {
            dedupe_occurrences(sense, &mut report);
        }
    }

    Ok(report)
}

/// Two duplicates conflict only when both carry a field and the values differ.
fn conflicts(a: &Sense, b: &Sense) -> bool {
    let definitions_differ = matches!((&a.definition, &b.definition), (Some(x), Some(y)) if x != y);
    let glosses_differ = !a.glosses.is_empty() && !b.glosses.is_empty() && a.glosses != b.glosses;
    definitions_differ || glosses_differ
}

/// Fills fields missing from `kept` with those of `other`.
fn merge_fields(kept: &mut Sense, other: &Sense) {
    if kept.definition.is_none() {
        kept.definition = other.definition.clone();
    }
    if kept.glosses.is_empty() {
        kept.glosses = other.glosses.clone();
    }
}

fn union_annotations(kept: &mut Sense, other: Sense) {
    kept.domains.extend(other.domains);
    kept.occurrences.extend(other.occurrences);
}

fn merge_duplicate_senses(entry: &mut Entry, report: &mut ValidationReport) {
    let senses = std::mem::take(&mut entry.senses);
    let mut kept: Vec<Sense> = Vec::with_capacity(senses.len());
    let mut position: HashMap<String, usize> = HashMap::new();

    for sense in senses {
        let Some(&i) = position.get(&sense.id) else {
            position.insert(sense.id.clone(), kept.len());
            kept.push(sense);
            continue;
        };

        let existing = &mut kept[i];

        if !conflicts(existing, &sense) {
            logger::warn(&format!("Merging duplicate sense {} of {}", sense.id, entry.lemma));
            merge_fields(existing, &sense);
            union_annotations(existing, sense);
            report.senses_merged += 1;
        } else {
            logger::warn(&format!(
                "Dropping conflicting duplicate sense {} of {}: {:?} / {:?}",
                sense.id, entry.lemma, existing.definition, sense.definition
            ));
            report.duplicates_dropped += 1;
        }
    }

    entry.senses = kept;
}

/// Checks the ids as they will be written to the normalized output.
fn check_unique_ids(lexicon: &LanguageLexicon) -> Result<(), ValidationError> {
    let mut entry_ids: HashMap<String, &str> = HashMap::new();
    let mut sense_ids: HashMap<String, &str> = HashMap::new();

    for entry in lexicon.entries.values() {
        let id = output_entry_id(&entry.id);
        if let Some(first) = entry_ids.insert(id.clone(), &entry.lemma) {
            return Err(ValidationError::DuplicateEntryId {
                language: lexicon.language.clone(),
                id,
                first: first.to_string(),
                second: entry.lemma.clone(),
            });
        }

        for sense in &entry.senses {
            let id = output_sense_id(&sense.id);
            if let Some(first) = sense_ids.insert(id.clone(), &sense.id) {
                return Err(ValidationError::DuplicateSenseId {
                    language: lexicon.language.clone(),
                    id,
                    first: first.to_string(),
                    second: sense.id.clone(),
                });
            }
        }
    }

    Ok(())
}

fn prune_empty(lexicon: &mut LanguageLexicon, report: &mut ValidationReport) {
    for entry in lexicon.entries.values_mut() {
        let before = entry.senses.len();
        entry.senses.retain(|s| !s.is_empty());
        report.senses_pruned += before - entry.senses.len();
    }

    let before = lexicon.entries.len();
    lexicon.entries.retain(|_, e| !e.senses.is_empty());
    report.entries_pruned += before - lexicon.entries.len();
}

fn dedupe_occurrences(sense: &mut Sense, report: &mut ValidationReport) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicates = 0;
    let mut invalid = 0;

    sense.occurrences.retain(|reference| {
        if !is_valid_canonical(reference) {
            invalid += 1;
            return false;
        }
        if !seen.insert(reference.clone()) {
            duplicates += 1;
            return false;
        }
        true
    });

    if duplicates > 0 {
        logger::warn(&format!("Removed {} duplicate occurrences of sense {}", duplicates, sense.id));
    }
    if invalid > 0 {
        logger::warn(&format!("Removed {} invalid occurrences of sense {}", invalid, sense.id));
    }

    report.duplicate_occurrences += duplicates;
    report.invalid_occurrences += invalid;
}
