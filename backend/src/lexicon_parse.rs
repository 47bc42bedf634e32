//! Extraction of per-language entries and senses from lexicon documents.
//!
//! Source structure, one `Lexicon_Entry` per lemma:
//! - `Lexicon_Entry` (Id, Lemma, Version) → `BaseForms/BaseForm`
//! - `BaseForm` → `LEXMeanings/LEXMeaning` (IsBiblicalTerm)
//! - `LEXMeaning` → `LEXSenses/LEXSense` (LanguageCode) and `CONMeanings/CONMeaning`
//! - `CONMeaning` → `CONSenses/CONSense` (LanguageCode) and `CONReferences/CONReference`
//!
//! Each language-tagged sense becomes a flat `Sense` on that language's
//! `Entry`, remembering its position as a `PositionalIndex`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::encoding::read_source_file;
use crate::identifiers::normalize_domain_codes;
use crate::logger;
use crate::reference::{classify_encoded, EncodedLocation};
use crate::types::*;
use crate::xml_node::{for_each_element, XmlNode};
use crate::SENSE_ID_PREFIX;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub files_read: usize,
    pub files_skipped: usize,
    pub entries_seen: usize,
    pub entries_excluded_version: usize,
    pub lex_meanings_excluded: usize,
    pub missing_ids: usize,
    pub senses_extracted: usize,
    pub references_bad: usize,
    pub references_odd: usize,
    pub domains_malformed: usize,
    pub domains_without_code: usize,
}

pub struct LexiconExtractor {
    dictionary: Dictionary,
    lexicons: Lexicons,
    pub stats: ExtractStats,
}

/// Ids and attributes of the entry being walked, shared by all its senses.
struct EntryContext<'a> {
    id: &'a str,
    lemma: &'a str,
    strong_codes: Vec<String>,
}

impl LexiconExtractor {
    pub fn new(dictionary: Dictionary) -> Self {
        LexiconExtractor {
            dictionary,
            lexicons: Lexicons::new(),
            stats: ExtractStats::default(),
        }
    }

    pub fn dictionary(&self) -> Dictionary {
        self.dictionary
    }

    pub fn lexicons(&self) -> &Lexicons {
        &self.lexicons
    }

    pub fn into_parts(self) -> (Lexicons, ExtractStats) {
        (self.lexicons, self.stats)
    }

    /// Reads and extracts one lexicon document.
    ///
    /// A document that fails to parse contributes nothing; the caller decides
    /// whether to skip it.
    pub fn process_file(&mut self, path: &Path) -> Result<usize> {
        let content = read_source_file(path)?;
        let n = self.process_str(&content)
            .with_context(|| format!("Failed to parse lexicon document: {:?}", path))?;
        self.stats.files_read += 1;
        Ok(n)
    }

    /// Extracts all `Lexicon_Entry` records of a document, returning the record count.
    pub fn process_str(&mut self, content: &str) -> Result<usize> {
        // Parsed in full first: a malformed document contributes nothing
        let mut records = Vec::new();
        for_each_element(content, "Lexicon_Entry", |node| {
            records.push(node);
            Ok(())
        })?;

        for record in &records {
            self.process_entry(record);
        }

        Ok(records.len())
    }

    fn process_entry(&mut self, node: &XmlNode) {
        self.stats.entries_seen += 1;

        let (Some(id), Some(lemma)) = (node.non_empty_attr("Id"), node.non_empty_attr("Lemma")) else {
            logger::warn(&format!(
                "Skipping Lexicon_Entry without Id or Lemma: Id={:?} Lemma={:?}",
                node.attr("Id"), node.attr("Lemma")
            ));
            self.stats.missing_ids += 1;
            return;
        };

        let version: u32 = node.attr("Version")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);

        let rules = self.dictionary.rules();

        if let Some(min_version) = rules.lexical_complete {
            if version < min_version {
                logger::debug(&format!("Excluding {} ({}): version {} < {}", lemma, id, version, min_version));
                self.stats.entries_excluded_version += 1;
                return;
            }
        }

        let include_contextual = version >= rules.contextual_complete;

        let ctx = EntryContext {
            id,
            lemma,
            strong_codes: node.grandchildren("StrongCodes", "Strong")
                .filter_map(|s| s.trimmed_text())
                .map(|s| s.to_string())
                .collect(),
        };

        // Positions count every sibling, so skipped elements don't shift the
        // indexes used by cross-references.
        for (bf_pos, base_form) in node.grandchildren("BaseForms", "BaseForm").enumerate() {
            let Some(base_form_id) = base_form.non_empty_attr("Id") else {
                logger::warn(&format!("Skipping BaseForm without Id in {} ({})", lemma, id));
                self.stats.missing_ids += 1;
                continue;
            };

            for (lm_pos, lex_meaning) in base_form.grandchildren("LEXMeanings", "LEXMeaning").enumerate() {
                let Some(lex_meaning_id) = lex_meaning.non_empty_attr("Id") else {
                    logger::warn(&format!("Skipping LEXMeaning without Id in {} ({})", lemma, id));
                    self.stats.missing_ids += 1;
                    continue;
                };

                if let Some(marker) = lex_meaning.attr("IsBiblicalTerm") {
                    if rules.excluded_biblical_term_markers.contains(&marker.trim()) {
                        self.stats.lex_meanings_excluded += 1;
                        continue;
                    }
                }

                let index = PositionalIndex::lexical(bf_pos as u32 + 1, lm_pos as u32 + 1);
                let sense_id = format!("{}{}-{}-{}", SENSE_ID_PREFIX, id, base_form_id, lex_meaning_id);
                let domains = self.lexical_domains(lex_meaning);

                for sense_node in lex_meaning.grandchildren("LEXSenses", "LEXSense") {
                    self.add_sense(&ctx, sense_node, &sense_id, index, &domains, &[]);
                }

                if !include_contextual {
                    continue;
                }

                for (cm_pos, con_meaning) in lex_meaning.grandchildren("CONMeanings", "CONMeaning").enumerate() {
                    let Some(con_meaning_id) = con_meaning.non_empty_attr("Id") else {
                        logger::warn(&format!("Skipping CONMeaning without Id in {} ({})", lemma, id));
                        self.stats.missing_ids += 1;
                        continue;
                    };

                    let index = PositionalIndex::contextual(index.base_form, index.lex_meaning, cm_pos as u32 + 1);
                    let sense_id = format!("{}-{}", sense_id, con_meaning_id);
                    let domains = self.domains_of(con_meaning, "CONDomains", "CONDomain", TAXONOMY_CON_DOMAINS);
                    let occurrences = self.contextual_references(con_meaning);

                    for sense_node in con_meaning.grandchildren("CONSenses", "CONSense") {
                        self.add_sense(&ctx, sense_node, &sense_id, index, &domains, &occurrences);
                    }
                }
            }
        }
    }

    fn add_sense(
        &mut self,
        ctx: &EntryContext,
        sense_node: &XmlNode,
        sense_id: &str,
        index: PositionalIndex,
        domains: &[Domain],
        occurrences: &[String],
    ) {
        let Some(language) = sense_node.non_empty_attr("LanguageCode") else {
            logger::warn(&format!("Skipping {} without LanguageCode: {}", sense_node.name, sense_id));
            self.stats.missing_ids += 1;
            return;
        };

        let mut sense = Sense::new(sense_id.to_string(), index);

        if let Some(definition) = sense_node.child_text("DefinitionShort")
            .or_else(|| sense_node.child_text("DefinitionLong"))
        {
            sense.set_definition(definition);
        }

        for gloss in sense_node.grandchildren("Glosses", "Gloss") {
            if let Some(text) = gloss.trimmed_text() {
                sense.add_gloss(text);
            }
        }

        sense.domains.extend(domains.iter().cloned());
        sense.occurrences.extend(occurrences.iter().cloned());

        let lexicon = self.lexicons
            .entry(language.to_string())
            .or_insert_with(|| LanguageLexicon::new(language));

        lexicon
            .entry_or_insert(ctx.id, ctx.lemma, &ctx.strong_codes)
            .senses
            .push(sense);

        self.stats.senses_extracted += 1;
    }

    /// Sub-domain breakdown when present, else the flat domain list, plus core domains.
    fn lexical_domains(&mut self, lex_meaning: &XmlNode) -> Vec<Domain> {
        let has_sub_domains = lex_meaning.grandchildren("LEXSubDomains", "LEXSubDomain").next().is_some();

        let mut domains = if has_sub_domains {
            self.domains_of(lex_meaning, "LEXSubDomains", "LEXSubDomain", TAXONOMY_LEX_DOMAINS)
        } else {
            self.domains_of(lex_meaning, "LEXDomains", "LEXDomain", TAXONOMY_LEX_DOMAINS)
        };

        domains.extend(self.domains_of(lex_meaning, "LEXCoreDomains", "LEXCoreDomain", TAXONOMY_LEX_CORE_DOMAINS));
        domains
    }

    fn domains_of(&mut self, node: &XmlNode, wrapper: &str, name: &str, taxonomy: &str) -> Vec<Domain> {
        let mut domains = Vec::new();

        for domain in node.grandchildren(wrapper, name) {
            let label = domain.trimmed_text().unwrap_or("").to_string();
            let normalized = normalize_domain_codes(domain.attr("Code").unwrap_or(""));

            for bad in &normalized.malformed {
                logger::warn(&format!("Malformed {} code {:?} ({})", name, bad, label));
                self.stats.domains_malformed += 1;
            }

            if normalized.codes.is_empty() {
                if normalized.malformed.is_empty() {
                    self.stats.domains_without_code += 1;
                }
                continue;
            }

            for code in normalized.codes {
                domains.push(Domain {
                    taxonomy: taxonomy.to_string(),
                    code,
                    label: label.clone(),
                });
            }
        }

        domains
    }

    fn contextual_references(&mut self, con_meaning: &XmlNode) -> Vec<String> {
        let mut references = Vec::new();

        for reference in con_meaning.grandchildren("CONReferences", "CONReference") {
            let Some(code) = reference.trimmed_text() else {
                continue;
            };
            match classify_encoded(code) {
                EncodedLocation::Word(canonical) => references.push(canonical),
                EncodedLocation::Apparatus => self.stats.references_odd += 1,
                EncodedLocation::Invalid => {
                    logger::warn(&format!("Invalid CONReference: {:?}", code));
                    self.stats.references_bad += 1;
                }
            }
        }

        references
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{SDBG_LEXICON_XML, SDBH_LEXICON_XML};

    fn extract(dictionary: Dictionary, xml: &str) -> (Lexicons, ExtractStats) {
        let mut extractor = LexiconExtractor::new(dictionary);
        extractor.process_str(xml).unwrap();
        extractor.into_parts()
    }

    #[test]
    fn test_entries_per_language() {
        let (lexicons, stats) = extract(Dictionary::Sdbh, SDBH_LEXICON_XML);

        assert_eq!(lexicons.keys().collect::<Vec<_>>(), vec!["en", "fr"]);
        assert_eq!(stats.entries_seen, 4);
        assert_eq!(stats.entries_excluded_version, 1);
        assert_eq!(stats.missing_ids, 1);

        let en = &lexicons["en"];
        assert_eq!(en.entries.len(), 2);

        let entry = &en.entries["אָב"];
        assert_eq!(entry.id, "000001000000000");
        assert_eq!(entry.strong_codes, vec!["H0001"]);
    }

    #[test]
    fn test_lexical_sense() {
        let (lexicons, _) = extract(Dictionary::Sdbh, SDBH_LEXICON_XML);
        let entry = &lexicons["en"].entries["אָב"];
        let sense = &entry.senses[0];

        assert_eq!(sense.id, "sense-000001000000000-000001001000000-000001001001000");
        assert_eq!(sense.index, PositionalIndex::lexical(1, 1));
        assert_eq!(sense.definition.as_deref(), Some("male progenitor"));
        assert_eq!(sense.glosses.len(), 1);

        // sub-domains win over the flat list, core domains are added
        let codes: Vec<_> = sense.domains.iter().map(|d| (d.taxonomy.as_str(), d.code.as_str())).collect();
        assert_eq!(codes, vec![("LEXDomains", "1.1.1"), ("LEXCoreDomains", "23")]);
    }

    #[test]
    fn test_contextual_sense_references() {
        let (lexicons, stats) = extract(Dictionary::Sdbh, SDBH_LEXICON_XML);
        let entry = &lexicons["en"].entries["אָב"];
        let sense = entry.senses.iter()
            .find(|s| s.index == PositionalIndex::contextual(1, 1, 1))
            .unwrap();

        assert_eq!(sense.occurrences, vec!["GEN 2:3!2"]);
        assert_eq!(sense.domains.iter().next().unwrap().code, "2");
        assert_eq!(stats.references_odd, 1);
        assert_eq!(stats.references_bad, 1);

        // only the English contextual sense exists
        let fr = &lexicons["fr"].entries["אָב"];
        assert!(fr.senses.iter().all(|s| s.index.con_meaning.is_none()));
    }

    #[test]
    fn test_contextual_threshold() {
        let (lexicons, _) = extract(Dictionary::Sdbh, SDBH_LEXICON_XML);
        let entry = &lexicons["en"].entries["אֵב"];
        assert_eq!(entry.senses.len(), 1);
        assert!(entry.senses[0].index.con_meaning.is_none());
    }

    #[test]
    fn test_biblical_term_exclusion() {
        let (lexicons, stats) = extract(Dictionary::Sdbg, SDBG_LEXICON_XML);
        let entry = &lexicons["en"].entries["λόγος"];

        assert_eq!(stats.lex_meanings_excluded, 1);
        // second meaning excluded, third keeps its position
        let indexes: Vec<_> = entry.senses.iter().map(|s| s.index).collect();
        assert_eq!(indexes, vec![PositionalIndex::lexical(1, 1), PositionalIndex::lexical(1, 3)]);
    }

    #[test]
    fn test_malformed_document_contributes_nothing() {
        let mut extractor = LexiconExtractor::new(Dictionary::Sdbg);
        let broken = r#"<Lexicon><Lexicon_Entry Id="1" Lemma="a"><BaseForms></Lexicon>"#;
        assert!(extractor.process_str(broken).is_err());
        assert!(extractor.lexicons().is_empty());
    }
}
