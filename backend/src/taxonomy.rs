//! Builds per-language domain taxonomy trees from domain-definition documents.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::Path;

use anyhow::{Context, Result};

use crate::encoding::read_source_file;
use crate::identifiers::{normalize_domain_code, parent_domain_code};
use crate::logger;
use crate::types::{Dictionary, MeaningType, SubDomain, Taxonomy};
use crate::xml_node::{for_each_element, read_root, XmlNode};

/// One `SemanticDomain` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    /// Normalized dotted code.
    pub code: String,
    pub level: u32,
    pub has_children: bool,
    /// Label by language code.
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyStats {
    pub files_read: usize,
    pub files_skipped: usize,
    pub domains_read: usize,
    pub domains_malformed: usize,
    pub domains_duplicate: usize,
}

pub struct TaxonomyBuilder {
    dictionary: Dictionary,
    records: BTreeMap<MeaningType, Vec<DomainRecord>>,
    pub stats: TaxonomyStats,
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_lowercase()).as_deref(),
        Some("true") | Some("1") | Some("y") | Some("yes")
    )
}

impl TaxonomyBuilder {
    pub fn new(dictionary: Dictionary) -> Self {
        TaxonomyBuilder {
            dictionary,
            records: BTreeMap::new(),
            stats: TaxonomyStats::default(),
        }
    }

    pub fn process_file(&mut self, path: &Path) -> Result<()> {
        let content = read_source_file(path)?;
        self.process_str(&content)
            .with_context(|| format!("Failed to parse domain document: {:?}", path))
    }

    /// Collects the domain records of one document. Documents describing
    /// another dictionary are skipped.
    pub fn process_str(&mut self, content: &str) -> Result<()> {
        let root = read_root(content)?;

        if let Some(tag) = root.non_empty_attr("Dictionary") {
            if !tag.eq_ignore_ascii_case(self.dictionary.tag()) {
                logger::info(&format!("Skipping domain document for {}", tag));
                self.stats.files_skipped += 1;
                return Ok(());
            }
        }

        let meaning_type: MeaningType = root.non_empty_attr("MeaningType")
            .unwrap_or("LEX")
            .parse()?;

        // Parsed in full first: a malformed document contributes nothing
        let mut parsed = Vec::new();
        for_each_element(content, "SemanticDomain", |node| {
            parsed.push(node);
            Ok(())
        })?;

        let records = self.records.entry(meaning_type).or_default();
        let mut seen: HashSet<String> = records.iter().map(|r| r.code.clone()).collect();

        for node in &parsed {
            let Some(record) = parse_record(node) else {
                logger::warn(&format!("Skipping SemanticDomain with invalid Code or Level: {:?}", node.attr("Code")));
                self.stats.domains_malformed += 1;
                continue;
            };

            if !seen.insert(record.code.clone()) {
                logger::warn(&format!("Duplicate SemanticDomain code: {}", record.code));
                self.stats.domains_duplicate += 1;
                continue;
            }

            records.push(record);
            self.stats.domains_read += 1;
        }

        self.stats.files_read += 1;
        Ok(())
    }

    /// Every language with at least one label.
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.records
            .values()
            .flatten()
            .flat_map(|r| r.labels.keys().cloned())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        languages.sort();
        languages
    }

    pub fn is_empty(&self) -> bool {
        self.records.values().all(|r| r.is_empty())
    }

    /// One taxonomy per meaning type, labelled in `language`.
    pub fn build_for_language(&self, language: &str) -> Vec<Taxonomy> {
        self.records
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(meaning_type, records)| Taxonomy {
                name: meaning_type.taxonomy_name().to_string(),
                domains: build_tree(records, language),
            })
            .collect()
    }
}

fn parse_record(node: &XmlNode) -> Option<DomainRecord> {
    let code = normalize_domain_code(node.attr("Code")?)?;
    let level: u32 = node.attr("Level")?.trim().parse().ok()?;

    let mut labels = HashMap::new();
    for localization in node.grandchildren("SemanticDomainLocalizations", "SemanticDomainLocalization") {
        let (Some(lang), Some(label)) = (localization.non_empty_attr("LanguageCode"), localization.child_text("Label")) else {
            continue;
        };
        labels.insert(lang.to_string(), label.to_string());
    }

    Some(DomainRecord {
        code,
        level,
        has_children: parse_flag(node.attr("HasSubDomains")),
        labels,
    })
}

/// Attaches each record below its parent when the record sits exactly one
/// level deeper. Level-1 records are roots and are always searched for
/// children; below them, a node is searched only when it declares children.
///
/// Works top-down with a queue to select nodes, then assembles the nested
/// tree bottom-up from the deepest level.
pub fn build_tree(records: &[DomainRecord], language: &str) -> Vec<SubDomain> {
    let by_code: HashMap<&str, &DomainRecord> = records.iter().map(|r| (r.code.as_str(), r)).collect();

    let mut by_level: BTreeMap<u32, Vec<&DomainRecord>> = BTreeMap::new();
    for record in records {
        by_level.entry(record.level).or_default().push(record);
    }

    let roots: Vec<&str> = by_level
        .get(&1)
        .map(|rs| rs.iter().map(|r| r.code.as_str()).collect())
        .unwrap_or_default();

    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut attached: Vec<&DomainRecord> = Vec::new();
    let mut queue: VecDeque<&str> = roots.iter().copied().collect();

    while let Some(code) = queue.pop_front() {
        let record = by_code[code];
        attached.push(record);

        if record.level > 1 && !record.has_children {
            continue;
        }

        let Some(candidates) = by_level.get(&(record.level + 1)) else {
            continue;
        };

        for child in candidates.iter().filter(|c| parent_domain_code(&c.code) == Some(code)) {
            children.entry(code).or_default().push(child.code.as_str());
            queue.push_back(child.code.as_str());
        }
    }

    let dropped = records.len() - attached.len();
    if dropped > 0 {
        logger::debug(&format!("{} domain records not reachable from a level 1 domain", dropped));
    }

    attached.sort_by(|a, b| b.level.cmp(&a.level));

    let mut built: HashMap<&str, SubDomain> = HashMap::new();
    for record in attached {
        let node_children = children
            .get(record.code.as_str())
            .map(|codes| codes.iter().filter_map(|c| built.remove(c)).collect())
            .unwrap_or_default();

        built.insert(record.code.as_str(), SubDomain {
            code: record.code.clone(),
            label: record.labels.get(language).cloned().unwrap_or_default(),
            children: node_children,
        });
    }

    roots.iter().filter_map(|c| built.remove(c)).collect()
}
