//! Loads normalized lexicon documents into the relational schema.
//!
//! Dimension rows (reference texts, languages, taxonomies, corpora, taxonomy
//! domains) are interned: inserted if new, then looked up, with keys cached
//! for the lifetime of the loader. Fact rows are inserted with
//! `INSERT OR IGNORE` against their natural unique keys, so reloading a
//! document leaves the row counts unchanged.
//!
//! Each document is loaded in its own transaction.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Result;
use diesel::prelude::*;

use crate::db::lexicon_models::*;
use crate::db::lexicon_schema::*;
use crate::db::table_row_counts;
use crate::identifiers::parent_domain_code;
use crate::logger::{debug, error, info, warn};
use crate::progress_bar;
use crate::reference::parse_canonical;
use crate::xml_import::{read_normalized_file, DocDomain, DocEntry, NormalizedDocument};

/// Entries per progress step.
pub const ENTRY_BATCH_SIZE: usize = 500;
/// Rows per multi-row occurrence insert.
pub const OCCURRENCE_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub documents_loaded: usize,
    pub documents_failed: usize,
    pub entries: usize,
    pub senses: usize,
    pub occurrences: usize,
    pub occurrences_skipped: usize,
}

impl LoadStats {
    fn add(&mut self, other: &LoadStats) {
        self.entries += other.entries;
        self.senses += other.senses;
        self.occurrences += other.occurrences;
        self.occurrences_skipped += other.occurrences_skipped;
    }
}

/// Keys of interned dimension rows for one loading run.
#[derive(Debug, Clone, Default)]
pub struct KeyCache {
    reference_texts: HashMap<(String, String), i32>,
    languages: HashMap<String, i32>,
    taxonomies: HashMap<(i32, String), i32>,
    corpora: HashMap<String, i32>,
    taxonomy_domains: HashMap<(i32, String), i32>,
}

impl KeyCache {
    pub fn len(&self) -> usize {
        self.reference_texts.len()
            + self.languages.len()
            + self.taxonomies.len()
            + self.corpora.len()
            + self.taxonomy_domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn reference_text_key(&mut self, conn: &mut SqliteConnection, name: &str, version: &str) -> QueryResult<i32> {
        let cache_key = (name.to_string(), version.to_string());
        if let Some(&id) = self.reference_texts.get(&cache_key) {
            return Ok(id);
        }

        diesel::insert_or_ignore_into(lexical_reference_texts::table)
            .values(&NewReferenceText { name, version })
            .execute(conn)?;

        let id = lexical_reference_texts::table
            .filter(lexical_reference_texts::name.eq(name))
            .filter(lexical_reference_texts::version.eq(version))
            .select(lexical_reference_texts::id)
            .first::<i32>(conn)?;

        self.reference_texts.insert(cache_key, id);
        Ok(id)
    }

    pub fn language_key(&mut self, conn: &mut SqliteConnection, code: &str) -> QueryResult<i32> {
        if let Some(&id) = self.languages.get(code) {
            return Ok(id);
        }

        diesel::insert_or_ignore_into(languages::table)
            .values(&NewLanguage { code })
            .execute(conn)?;

        let id = languages::table
            .filter(languages::code.eq(code))
            .select(languages::id)
            .first::<i32>(conn)?;

        self.languages.insert(code.to_string(), id);
        Ok(id)
    }

    pub fn taxonomy_key(&mut self, conn: &mut SqliteConnection, reference_text_id: i32, name: &str) -> QueryResult<i32> {
        let cache_key = (reference_text_id, name.to_string());
        if let Some(&id) = self.taxonomies.get(&cache_key) {
            return Ok(id);
        }

        diesel::insert_or_ignore_into(taxonomies::table)
            .values(&NewTaxonomy { reference_text_id, name })
            .execute(conn)?;

        let id = taxonomies::table
            .filter(taxonomies::reference_text_id.eq(reference_text_id))
            .filter(taxonomies::name.eq(name))
            .select(taxonomies::id)
            .first::<i32>(conn)?;

        self.taxonomies.insert(cache_key, id);
        Ok(id)
    }

    pub fn corpus_key(&mut self, conn: &mut SqliteConnection, name: &str) -> QueryResult<i32> {
        if let Some(&id) = self.corpora.get(name) {
            return Ok(id);
        }

        diesel::insert_or_ignore_into(corpora::table)
            .values(&NewCorpus { name })
            .execute(conn)?;

        let id = corpora::table
            .filter(corpora::name.eq(name))
            .select(corpora::id)
            .first::<i32>(conn)?;

        self.corpora.insert(name.to_string(), id);
        Ok(id)
    }

    /// Key of an existing taxonomy domain, without creating it.
    pub fn find_domain_key(&mut self, conn: &mut SqliteConnection, taxonomy_id: i32, code: &str) -> QueryResult<Option<i32>> {
        let cache_key = (taxonomy_id, code.to_string());
        if let Some(&id) = self.taxonomy_domains.get(&cache_key) {
            return Ok(Some(id));
        }

        let id = taxonomy_domains::table
            .filter(taxonomy_domains::taxonomy_id.eq(taxonomy_id))
            .filter(taxonomy_domains::code.eq(code))
            .select(taxonomy_domains::id)
            .first::<i32>(conn)
            .optional()?;

        if let Some(id) = id {
            self.taxonomy_domains.insert(cache_key, id);
        }
        Ok(id)
    }

    pub fn domain_key(
        &mut self,
        conn: &mut SqliteConnection,
        taxonomy_id: i32,
        code: &str,
        parent_id: Option<i32>,
    ) -> QueryResult<i32> {
        if let Some(id) = self.find_domain_key(conn, taxonomy_id, code)? {
            return Ok(id);
        }

        diesel::insert_or_ignore_into(taxonomy_domains::table)
            .values(&NewTaxonomyDomain { taxonomy_id, parent_id, code })
            .execute(conn)?;

        let id = taxonomy_domains::table
            .filter(taxonomy_domains::taxonomy_id.eq(taxonomy_id))
            .filter(taxonomy_domains::code.eq(code))
            .select(taxonomy_domains::id)
            .first::<i32>(conn)?;

        self.taxonomy_domains.insert((taxonomy_id, code.to_string()), id);
        Ok(id)
    }
}

pub struct LexiconLoader {
    cache: KeyCache,
    pub stats: LoadStats,
    verbose: bool,
}

/// Ids shared by all rows of one document.
#[derive(Clone, Copy)]
struct DocumentKeys {
    reference_text_id: i32,
    language_id: i32,
}

impl LexiconLoader {
    pub fn new(verbose: bool) -> Self {
        LexiconLoader {
            cache: KeyCache::default(),
            stats: LoadStats::default(),
            verbose,
        }
    }

    pub fn cache(&self) -> &KeyCache {
        &self.cache
    }

    pub fn load_file(&mut self, conn: &mut SqliteConnection, path: &Path) -> Result<()> {
        let doc = match read_normalized_file(path) {
            Ok(doc) => doc,
            Err(e) => {
                self.stats.documents_failed += 1;
                return Err(e);
            }
        };
        info(&format!("Loading {:?}: {} entries, {} senses", path, doc.entries.len(), doc.sense_count()));
        self.load_document(conn, &doc)
    }

    /// Loads one document in a single transaction. On failure the transaction
    /// is rolled back and the key cache is restored to its state before the
    /// document, so no cached key refers to a rolled back row.
    pub fn load_document(&mut self, conn: &mut SqliteConnection, doc: &NormalizedDocument) -> Result<()> {
        let snapshot = self.cache.clone();

        let result = conn.transaction::<_, anyhow::Error, _>(|conn| self.insert_document(conn, doc));

        match result {
            Ok(counts) => {
                self.stats.add(&counts);
                self.stats.documents_loaded += 1;
                Ok(())
            }
            Err(e) => {
                self.cache = snapshot;
                self.stats.documents_failed += 1;
                Err(e)
            }
        }
    }

    fn insert_document(&mut self, conn: &mut SqliteConnection, doc: &NormalizedDocument) -> Result<LoadStats> {
        let keys = DocumentKeys {
            reference_text_id: self.cache.reference_text_key(conn, doc.dictionary.tag(), &doc.version)?,
            language_id: self.cache.language_key(conn, &doc.language)?,
        };

        for taxonomy in &doc.taxonomies {
            let taxonomy_id = self.cache.taxonomy_key(conn, keys.reference_text_id, &taxonomy.name)?;

            // Pre-order, so parents are interned before their children
            for (code, label, parent) in taxonomy.flatten() {
                let parent_id = match parent {
                    Some(p) => self.cache.find_domain_key(conn, taxonomy_id, &p)?,
                    None => None,
                };
                let domain_id = self.cache.domain_key(conn, taxonomy_id, &code, parent_id)?;
                insert_domain_label(conn, domain_id, keys.language_id, &label)?;
            }
        }

        let mut counts = LoadStats::default();
        let pb = progress_bar(doc.entries.len() as u64, self.verbose);
        pb.set_message(format!("{}-{}", doc.dictionary, doc.language));

        for batch in doc.entries.chunks(ENTRY_BATCH_SIZE) {
            let mut sense_rows: Vec<NewSenseOccurrence> = Vec::new();
            let mut entry_rows: Vec<NewEntryOccurrence> = Vec::new();

            for entry in batch {
                self.insert_entry(conn, keys, entry, &mut sense_rows, &mut entry_rows, &mut counts)?;
            }

            for chunk in sense_rows.chunks(OCCURRENCE_BATCH_SIZE) {
                diesel::insert_or_ignore_into(sense_occurrences::table)
                    .values(chunk)
                    .execute(conn)?;
            }
            for chunk in entry_rows.chunks(OCCURRENCE_BATCH_SIZE) {
                diesel::insert_or_ignore_into(entry_occurrences::table)
                    .values(chunk)
                    .execute(conn)?;
            }

            counts.occurrences += sense_rows.len();
            pb.inc(batch.len() as u64);
        }

        pb.finish_with_message(format!("{}-{}: {} entries", doc.dictionary, doc.language, counts.entries));

        Ok(counts)
    }

    fn insert_entry<'a>(
        &mut self,
        conn: &mut SqliteConnection,
        keys: DocumentKeys,
        entry: &'a DocEntry,
        sense_rows: &mut Vec<NewSenseOccurrence<'a>>,
        entry_rows: &mut Vec<NewEntryOccurrence<'a>>,
        counts: &mut LoadStats,
    ) -> Result<()> {
        diesel::insert_or_ignore_into(entries::table)
            .values(&NewEntry {
                reference_text_id: keys.reference_text_id,
                language_id: keys.language_id,
                entry_code: &entry.id,
                lemma: &entry.lemma,
            })
            .execute(conn)?;

        let entry_id = entries::table
            .filter(entries::reference_text_id.eq(keys.reference_text_id))
            .filter(entries::language_id.eq(keys.language_id))
            .filter(entries::entry_code.eq(&entry.id))
            .select(entries::id)
            .first::<i32>(conn)?;

        counts.entries += 1;

        let codes: Vec<NewStrongCode> = entry.strong_codes
            .iter()
            .map(|code| NewStrongCode { entry_id, code })
            .collect();
        if !codes.is_empty() {
            diesel::insert_or_ignore_into(strong_codes::table)
                .values(&codes)
                .execute(conn)?;
        }

        let mut entry_domains_seen: BTreeSet<i32> = BTreeSet::new();
        let mut entry_references_seen: HashSet<(i32, &str)> = HashSet::new();

        for sense in &entry.senses {
            diesel::insert_or_ignore_into(senses::table)
                .values(&NewSense {
                    entry_id,
                    sense_code: &sense.id,
                    definition: sense.definition.as_deref(),
                })
                .execute(conn)?;

            let sense_id = senses::table
                .filter(senses::entry_id.eq(entry_id))
                .filter(senses::sense_code.eq(&sense.id))
                .select(senses::id)
                .first::<i32>(conn)?;

            counts.senses += 1;

            let gloss_rows: Vec<NewGloss> = sense.glosses
                .iter()
                .enumerate()
                .map(|(i, gloss)| NewGloss { sense_id, position: i as i32 + 1, gloss })
                .collect();
            if !gloss_rows.is_empty() {
                diesel::insert_or_ignore_into(glosses::table)
                    .values(&gloss_rows)
                    .execute(conn)?;
            }

            for domain in &sense.domains {
                let domain_id = self.annotation_domain_key(conn, keys, domain)?;
                diesel::insert_or_ignore_into(sense_domains::table)
                    .values(&NewSenseDomain { sense_id, domain_id })
                    .execute(conn)?;
                entry_domains_seen.insert(domain_id);
            }

            for occurrence in &sense.occurrences {
                let Ok(canonical) = parse_canonical(&occurrence.reference) else {
                    warn(&format!("Skipping invalid occurrence {:?} of sense {}", occurrence.reference, sense.id));
                    counts.occurrences_skipped += 1;
                    continue;
                };

                let corpus_id = self.cache.corpus_key(conn, &occurrence.corpus)?;

                sense_rows.push(NewSenseOccurrence {
                    sense_id,
                    corpus_id,
                    book: canonical.book as i32,
                    chapter: canonical.chapter as i32,
                    verse: canonical.verse as i32,
                    word: canonical.word as i32,
                    reference: &occurrence.reference,
                });

                if entry_references_seen.insert((corpus_id, occurrence.reference.as_str())) {
                    entry_rows.push(NewEntryOccurrence {
                        entry_id,
                        corpus_id,
                        book: canonical.book as i32,
                        chapter: canonical.chapter as i32,
                        verse: canonical.verse as i32,
                        word: canonical.word as i32,
                        reference: &occurrence.reference,
                    });
                }
            }
        }

        let domain_rows: Vec<NewEntryDomain> = entry_domains_seen
            .into_iter()
            .map(|domain_id| NewEntryDomain { entry_id, domain_id })
            .collect();
        if !domain_rows.is_empty() {
            diesel::insert_or_ignore_into(entry_domains::table)
                .values(&domain_rows)
                .execute(conn)?;
        }

        Ok(())
    }

    /// Interns the taxonomy domain of a sense annotation, linking it to its
    /// parent code when that domain is already known.
    fn annotation_domain_key(&mut self, conn: &mut SqliteConnection, keys: DocumentKeys, domain: &DocDomain) -> Result<i32> {
        let taxonomy_id = self.cache.taxonomy_key(conn, keys.reference_text_id, &domain.taxonomy)?;

        let parent_id = match parent_domain_code(&domain.code) {
            Some(parent) => self.cache.find_domain_key(conn, taxonomy_id, parent)?,
            None => None,
        };

        let domain_id = self.cache.domain_key(conn, taxonomy_id, &domain.code, parent_id)?;
        insert_domain_label(conn, domain_id, keys.language_id, &domain.label)?;

        Ok(domain_id)
    }
}

fn insert_domain_label(conn: &mut SqliteConnection, domain_id: i32, language_id: i32, label: &str) -> QueryResult<()> {
    if label.is_empty() {
        return Ok(());
    }
    diesel::insert_or_ignore_into(taxonomy_domain_labels::table)
        .values(&NewTaxonomyDomainLabel { domain_id, language_id, label })
        .execute(conn)?;
    Ok(())
}

/// Loads each file in turn. A failed document is rolled back and reported,
/// and loading continues with the next one.
pub fn load_files(conn: &mut SqliteConnection, paths: &[PathBuf], verbose: bool) -> LoadStats {
    let mut loader = LexiconLoader::new(verbose);

    for path in paths {
        if let Err(e) = loader.load_file(conn, path) {
            error(&format!("Failed to load {:?}, rolled back: {:#}", path, e));
        }
    }

    info(&format!("{:?}", loader.stats));

    if verbose {
        dump_row_counts(conn);
    }

    loader.stats
}

pub fn dump_row_counts(conn: &mut SqliteConnection) {
    match table_row_counts(conn) {
        Ok(counts) => {
            for (table, count) in counts {
                info(&format!("{:<24} {}", table, count));
            }
        }
        Err(e) => debug(&format!("Row counts unavailable: {}", e)),
    }
}
