//! Renders a validated language lexicon as a normalized XML document.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::identifiers::{output_entry_id, output_sense_id};
use crate::types::{Dictionary, Entry, LanguageLexicon, Sense, SubDomain, Taxonomy};

/// Document-level values shared by all languages of a run.
#[derive(Debug, Clone)]
pub struct ExportHeader {
    pub dictionary: Dictionary,
    pub version: String,
    pub corpus_name: String,
}

type XmlWriter = Writer<Vec<u8>>;

fn open(writer: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut start = BytesStart::new(name);
    for attr in attrs {
        start.push_attribute(*attr);
    }
    writer.write_event(Event::Start(start))?;
    Ok(())
}

fn close(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn empty(writer: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut start = BytesStart::new(name);
    for attr in attrs {
        start.push_attribute(*attr);
    }
    writer.write_event(Event::Empty(start))?;
    Ok(())
}

fn text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<()> {
    open(writer, name, &[])?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    close(writer, name)
}

/// `<DICT>-<lang>.xml`
pub fn document_file_name(dictionary: Dictionary, language: &str) -> String {
    format!("{}-{}.xml", dictionary.tag(), language)
}

pub fn render_language_document(
    header: &ExportHeader,
    lexicon: &LanguageLexicon,
    taxonomies: &[Taxonomy],
) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    open(&mut writer, "Lexicon", &[
        ("Dictionary", header.dictionary.tag()),
        ("Version", header.version.as_str()),
        ("Language", lexicon.language.as_str()),
    ])?;

    open(&mut writer, "Entries", &[])?;
    // BTreeMap keeps entries sorted by lemma
    for entry in lexicon.entries.values() {
        write_entry(&mut writer, entry, &header.corpus_name)?;
    }
    close(&mut writer, "Entries")?;

    if !taxonomies.is_empty() {
        open(&mut writer, "Taxonomies", &[])?;
        for taxonomy in taxonomies {
            write_taxonomy(&mut writer, taxonomy)?;
        }
        close(&mut writer, "Taxonomies")?;
    }

    close(&mut writer, "Lexicon")?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

fn write_entry(writer: &mut XmlWriter, entry: &Entry, corpus_name: &str) -> Result<()> {
    let id = output_entry_id(&entry.id);
    open(writer, "Entry", &[("Id", id.as_str()), ("Lemma", entry.lemma.as_str())])?;

    if !entry.strong_codes.is_empty() {
        open(writer, "StrongCodes", &[])?;
        for code in &entry.strong_codes {
            text_element(writer, "StrongCode", code)?;
        }
        close(writer, "StrongCodes")?;
    }

    open(writer, "Senses", &[])?;
    for sense in &entry.senses {
        write_sense(writer, sense, corpus_name)?;
    }
    close(writer, "Senses")?;

    close(writer, "Entry")
}

fn write_sense(writer: &mut XmlWriter, sense: &Sense, corpus_name: &str) -> Result<()> {
    let id = output_sense_id(&sense.id);
    open(writer, "Sense", &[("Id", id.as_str())])?;

    if let Some(definition) = &sense.definition {
        text_element(writer, "Definition", definition)?;
    }

    if !sense.glosses.is_empty() {
        open(writer, "Glosses", &[])?;
        for gloss in &sense.glosses {
            text_element(writer, "Gloss", gloss)?;
        }
        close(writer, "Glosses")?;
    }

    if !sense.domains.is_empty() {
        open(writer, "Domains", &[])?;
        for domain in &sense.domains {
            empty(writer, "Domain", &[
                ("Taxonomy", domain.taxonomy.as_str()),
                ("Code", domain.code.as_str()),
                ("Label", domain.label.as_str()),
            ])?;
        }
        close(writer, "Domains")?;
    }

    if !sense.occurrences.is_empty() {
        open(writer, "Occurrences", &[])?;
        open(writer, "Corpus", &[("Name", corpus_name)])?;
        for reference in &sense.occurrences {
            text_element(writer, "Occurrence", reference)?;
        }
        close(writer, "Corpus")?;
        close(writer, "Occurrences")?;
    }

    close(writer, "Sense")
}

enum TreeStep<'a> {
    Enter(&'a SubDomain),
    Leave,
}

fn write_taxonomy(writer: &mut XmlWriter, taxonomy: &Taxonomy) -> Result<()> {
    open(writer, "Taxonomy", &[("Name", taxonomy.name.as_str())])?;

    let mut stack: Vec<TreeStep> = taxonomy.domains.iter().rev().map(TreeStep::Enter).collect();

    while let Some(step) = stack.pop() {
        match step {
            TreeStep::Leave => close(writer, "SubDomain")?,
            TreeStep::Enter(node) => {
                let attrs = [("Code", node.code.as_str()), ("Label", node.label.as_str())];
                if node.children.is_empty() {
                    empty(writer, "SubDomain", &attrs)?;
                } else {
                    open(writer, "SubDomain", &attrs)?;
                    stack.push(TreeStep::Leave);
                    stack.extend(node.children.iter().rev().map(TreeStep::Enter));
                }
            }
        }
    }

    close(writer, "Taxonomy")
}

/// Writes `<DICT>-<lang>.xml` into `output_dir`, returning its path.
pub fn write_language_document(
    output_dir: &Path,
    header: &ExportHeader,
    lexicon: &LanguageLexicon,
    taxonomies: &[Taxonomy],
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let path = output_dir.join(document_file_name(header.dictionary, &lexicon.language));
    let xml = render_language_document(header, lexicon, taxonomies)?;

    fs::write(&path, xml).with_context(|| format!("Failed to write {:?}", path))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Domain, PositionalIndex};

    fn header() -> ExportHeader {
        ExportHeader {
            dictionary: Dictionary::Sdbh,
            version: "1.0".to_string(),
            corpus_name: "MARBLE".to_string(),
        }
    }

    fn sample_lexicon() -> LanguageLexicon {
        let mut lexicon = LanguageLexicon::new("en");
        let mut sense = Sense::new("sense-000001001001000".to_string(), PositionalIndex::lexical(1, 1));
        sense.set_definition("male <progenitor>");
        sense.add_gloss("father");
        sense.domains.insert(Domain {
            taxonomy: "LEXDomains".to_string(),
            code: "1.1.1".to_string(),
            label: "Parent".to_string(),
        });
        sense.occurrences.push("GEN 2:3!2".to_string());

        let entry = lexicon.entry_or_insert("000001000000000", "אָב", &["H0001".to_string()]);
        entry.senses.push(sense);
        lexicon
    }

    #[test]
    fn test_render_entry() {
        let xml = render_language_document(&header(), &sample_lexicon(), &[]).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<Lexicon Dictionary=\"SDBH\" Version=\"1.0\" Language=\"en\">"));
        assert!(xml.contains("<Entry Id=\"000001\" Lemma=\"אָב\">"));
        assert!(xml.contains("<StrongCode>H0001</StrongCode>"));
        assert!(xml.contains("<Sense Id=\"000001001001000\">"));
        assert!(xml.contains("<Definition>male &lt;progenitor&gt;</Definition>"));
        assert!(xml.contains("<Domain Taxonomy=\"LEXDomains\" Code=\"1.1.1\" Label=\"Parent\"/>"));
        assert!(xml.contains("<Corpus Name=\"MARBLE\">"));
        assert!(xml.contains("<Occurrence>GEN 2:3!2</Occurrence>"));
        assert!(!xml.contains("<Taxonomies>"));
    }

    #[test]
    fn test_render_taxonomy() {
        let taxonomy = Taxonomy {
            name: "LEXDomains".to_string(),
            domains: vec![
                SubDomain {
                    code: "1".to_string(),
                    label: "Objects".to_string(),
                    children: vec![SubDomain { code: "1.1".to_string(), label: "Kinship".to_string(), children: vec![] }],
                },
                SubDomain { code: "2".to_string(), label: "Events".to_string(), children: vec![] },
            ],
        };
        let xml = render_language_document(&header(), &sample_lexicon(), &[taxonomy]).unwrap();

        let objects = xml.find("<SubDomain Code=\"1\" Label=\"Objects\">").unwrap();
        let kinship = xml.find("<SubDomain Code=\"1.1\" Label=\"Kinship\"/>").unwrap();
        let closing = xml[kinship..].find("</SubDomain>").unwrap() + kinship;
        let events = xml.find("<SubDomain Code=\"2\" Label=\"Events\"/>").unwrap();
        assert!(objects < kinship && kinship < closing && closing < events);
    }

    #[test]
    fn test_document_file_name() {
        assert_eq!(document_file_name(Dictionary::Sdbg, "fr"), "SDBG-fr.xml");
    }
}
