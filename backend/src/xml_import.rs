//! Reads normalized lexicon documents back for loading.

use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::encoding::read_source_file;
use crate::types::{Dictionary, SubDomain, Taxonomy};
use crate::xml_node::{for_each_element, read_root, XmlNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocDomain {
    pub taxonomy: String,
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocOccurrence {
    pub corpus: String,
    pub reference: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocSense {
    pub id: String,
    pub definition: Option<String>,
    pub glosses: Vec<String>,
    pub domains: Vec<DocDomain>,
    pub occurrences: Vec<DocOccurrence>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocEntry {
    pub id: String,
    pub lemma: String,
    pub strong_codes: Vec<String>,
    pub senses: Vec<DocSense>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    pub dictionary: Dictionary,
    pub version: String,
    pub language: String,
    pub entries: Vec<DocEntry>,
    pub taxonomies: Vec<Taxonomy>,
}

impl NormalizedDocument {
    pub fn sense_count(&self) -> usize {
        self.entries.iter().map(|e| e.senses.len()).sum()
    }

    pub fn occurrence_count(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|e| &e.senses)
            .map(|s| s.occurrences.len())
            .sum()
    }
}

pub fn read_normalized_file(path: &Path) -> Result<NormalizedDocument> {
    let content = read_source_file(path)?;
    parse_normalized_document(&content)
        .with_context(|| format!("Failed to parse normalized document: {:?}", path))
}

pub fn parse_normalized_document(content: &str) -> Result<NormalizedDocument> {
    let root = read_root(content)?;
    if root.name != "Lexicon" {
        return Err(anyhow!("Expected <Lexicon> root element, found <{}>", root.name));
    }

    let dictionary: Dictionary = root.non_empty_attr("Dictionary")
        .ok_or_else(|| anyhow!("Missing Dictionary attribute"))?
        .parse()?;
    let language = root.non_empty_attr("Language")
        .ok_or_else(|| anyhow!("Missing Language attribute"))?
        .to_string();
    let version = root.attr("Version").unwrap_or("").trim().to_string();

    let mut entries = Vec::new();
    for_each_element(content, "Entry", |node| {
        entries.push(parse_entry(&node)?);
        Ok(())
    })?;

    let mut taxonomies = Vec::new();
    for_each_element(content, "Taxonomy", |node| {
        taxonomies.push(Taxonomy {
            name: node.attr("Name").unwrap_or("").to_string(),
            domains: node.children_named("SubDomain").map(parse_sub_domain).collect(),
        });
        Ok(())
    })?;

    Ok(NormalizedDocument {
        dictionary,
        version,
        language,
        entries,
        taxonomies,
    })
}

fn parse_entry(node: &XmlNode) -> Result<DocEntry> {
    let id = node.non_empty_attr("Id").ok_or_else(|| anyhow!("Entry without Id"))?;
    let lemma = node.non_empty_attr("Lemma").ok_or_else(|| anyhow!("Entry {} without Lemma", id))?;

    let mut senses = Vec::new();
    for sense in node.grandchildren("Senses", "Sense") {
        senses.push(parse_sense(sense).with_context(|| format!("In entry {}", id))?);
    }

    Ok(DocEntry {
        id: id.to_string(),
        lemma: lemma.to_string(),
        strong_codes: node.grandchildren("StrongCodes", "StrongCode")
            .filter_map(|c| c.trimmed_text())
            .map(|c| c.to_string())
            .collect(),
        senses,
    })
}

fn parse_sense(node: &XmlNode) -> Result<DocSense> {
    let id = node.non_empty_attr("Id").ok_or_else(|| anyhow!("Sense without Id"))?;

    let domains = node.grandchildren("Domains", "Domain")
        .filter_map(|d| {
            Some(DocDomain {
                taxonomy: d.non_empty_attr("Taxonomy")?.to_string(),
                code: d.non_empty_attr("Code")?.to_string(),
                label: d.attr("Label").unwrap_or("").to_string(),
            })
        })
        .collect();

    let mut occurrences = Vec::new();
    for corpus in node.grandchildren("Occurrences", "Corpus") {
        let name = corpus.attr("Name").unwrap_or("").trim();
        for occurrence in corpus.children_named("Occurrence") {
            if let Some(reference) = occurrence.trimmed_text() {
                occurrences.push(DocOccurrence {
                    corpus: name.to_string(),
                    reference: reference.to_string(),
                });
            }
        }
    }

    Ok(DocSense {
        id: id.to_string(),
        definition: node.child_text("Definition").map(|d| d.to_string()),
        glosses: node.grandchildren("Glosses", "Gloss")
            .filter_map(|g| g.trimmed_text())
            .map(|g| g.to_string())
            .collect(),
        domains,
        occurrences,
    })
}

fn parse_sub_domain(node: &XmlNode) -> SubDomain {
    SubDomain {
        code: node.attr("Code").unwrap_or("").to_string(),
        label: node.attr("Label").unwrap_or("").to_string(),
        children: node.children_named("SubDomain").map(parse_sub_domain).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Domain, LanguageLexicon, PositionalIndex, Sense};
    use crate::xml_export::{render_language_document, ExportHeader};

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Lexicon Dictionary="SDBG" Version="0.9" Language="en">
  <Entries>
    <Entry Id="003056" Lemma="λόγος">
      <StrongCodes><StrongCode>G3056</StrongCode></StrongCodes>
      <Senses>
        <Sense Id="003056001001000">
          <Definition>that which is said</Definition>
          <Glosses><Gloss>word</Gloss><Gloss>saying</Gloss></Glosses>
          <Domains><Domain Taxonomy="LEXDomains" Code="33.6" Label="Word"/></Domains>
          <Occurrences><Corpus Name="MARBLE"><Occurrence>LUK 1:2!10</Occurrence></Corpus></Occurrences>
        </Sense>
      </Senses>
    </Entry>
  </Entries>
  <Taxonomies>
    <Taxonomy Name="LEXDomains">
      <SubDomain Code="33" Label="Communication"><SubDomain Code="33.6" Label="Word"/></SubDomain>
    </Taxonomy>
  </Taxonomies>
</Lexicon>
"#;

    #[test]
    fn test_parse_document() {
        let doc = parse_normalized_document(DOCUMENT).unwrap();

        assert_eq!(doc.dictionary, Dictionary::Sdbg);
        assert_eq!(doc.version, "0.9");
        assert_eq!(doc.language, "en");
        assert_eq!(doc.entries.len(), 1);

        let entry = &doc.entries[0];
        assert_eq!(entry.id, "003056");
        assert_eq!(entry.strong_codes, vec!["G3056"]);

        let sense = &entry.senses[0];
        assert_eq!(sense.definition.as_deref(), Some("that which is said"));
        assert_eq!(sense.glosses, vec!["word", "saying"]);
        assert_eq!(sense.domains[0].code, "33.6");
        assert_eq!(sense.occurrences, vec![DocOccurrence {
            corpus: "MARBLE".to_string(),
            reference: "LUK 1:2!10".to_string(),
        }]);

        assert_eq!(doc.taxonomies.len(), 1);
        assert_eq!(doc.taxonomies[0].domains[0].children[0].code, "33.6");
    }

    #[test]
    fn test_reads_rendered_document() {
        let mut lexicon = LanguageLexicon::new("fr");
        let mut sense = Sense::new("sense-000001001001000".to_string(), PositionalIndex::lexical(1, 1));
        sense.add_gloss("père & mère");
        sense.domains.insert(Domain {
            taxonomy: "LEXCoreDomains".to_string(),
            code: "23".to_string(),
            label: "Famille".to_string(),
        });
        lexicon.entry_or_insert("000001000000000", "אָב", &[]).senses.push(sense);

        let header = ExportHeader {
            dictionary: Dictionary::Sdbh,
            version: "1.0".to_string(),
            corpus_name: "MARBLE".to_string(),
        };
        let xml = render_language_document(&header, &lexicon, &[]).unwrap();
        let doc = parse_normalized_document(&xml).unwrap();

        assert_eq!(doc.dictionary, Dictionary::Sdbh);
        assert_eq!(doc.entries[0].lemma, "אָב");
        assert_eq!(doc.entries[0].senses[0].glosses, vec!["père & mère"]);
        assert_eq!(doc.entries[0].senses[0].definition, None);
        assert!(doc.taxonomies.is_empty());
    }

    #[test]
    fn test_rejects_other_root() {
        assert!(parse_normalized_document("<Other Dictionary=\"SDBH\" Language=\"en\"/>").is_err());
        assert!(parse_normalized_document("<Lexicon Language=\"en\"></Lexicon>").is_err());
    }
}
