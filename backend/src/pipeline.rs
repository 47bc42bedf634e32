//! End-to-end build: extract, link, build taxonomies, validate, write the
//! normalized documents and optionally load them into a database.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Result};

use crate::cross_refs::{CrossRefLinker, LinkStats};
use crate::db::loader::{load_files, LoadStats};
use crate::db::{establish_connection, initialize_database};
use crate::dir_list::list_files_with_extension;
use crate::lexicon_parse::{ExtractStats, LexiconExtractor};
use crate::logger::{self, error, info, warn};
use crate::progress_bar;
use crate::taxonomy::{TaxonomyBuilder, TaxonomyStats};
use crate::types::Dictionary;
use crate::validate::{validate_language, ValidationReport};
use crate::xml_export::{write_language_document, ExportHeader};
use crate::DEFAULT_CORPUS_NAME;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub dictionary: Dictionary,
    pub version: String,
    /// Directories searched for lexicon (`*.xml`) and cross-reference (`*.json`) documents.
    pub input_dirs: Vec<PathBuf>,
    pub domains_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub database: Option<PathBuf>,
    pub schema_path: Option<PathBuf>,
    pub corpus_name: String,
    pub verbose: bool,
}

impl PipelineConfig {
    pub fn new(dictionary: Dictionary, version: &str, input_dirs: Vec<PathBuf>, output_dir: PathBuf) -> Self {
        PipelineConfig {
            dictionary,
            version: version.to_string(),
            input_dirs,
            domains_dir: None,
            output_dir,
            database: None,
            schema_path: None,
            corpus_name: DEFAULT_CORPUS_NAME.to_string(),
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub extract: ExtractStats,
    pub link: LinkStats,
    pub taxonomy: TaxonomyStats,
    pub validation: BTreeMap<String, ValidationReport>,
    /// Languages stopped by a fatal validation error.
    pub failed_languages: Vec<String>,
    pub written: Vec<PathBuf>,
    pub load: Option<LoadStats>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed_languages.is_empty()
            && self.load.as_ref().map(|l| l.documents_failed == 0).unwrap_or(true)
    }
}

fn is_under(path: &Path, dir: Option<&PathBuf>) -> bool {
    dir.map(|d| path.starts_with(d)).unwrap_or(false)
}

pub fn run_build(config: &PipelineConfig) -> Result<BuildReport> {
    let start = Instant::now();
    let mut report = BuildReport::default();

    info(&format!("Building {} version {}", config.dictionary, config.version));

    // Lexicon documents
    let lexicon_files: Vec<PathBuf> = list_files_with_extension(&config.input_dirs, "xml")
        .into_iter()
        .filter(|p| !is_under(p, config.domains_dir.as_ref()))
        .collect();

    if lexicon_files.is_empty() {
        return Err(anyhow!("No lexicon documents found in {:?}", config.input_dirs));
    }

    let mut extractor = LexiconExtractor::new(config.dictionary);
    let pb = progress_bar(lexicon_files.len() as u64, config.verbose);
    pb.set_message("Extracting lexicon entries...");

    for path in &lexicon_files {
        if let Err(e) = extractor.process_file(path) {
            warn(&format!("Skipping lexicon document {:?}: {:#}", path, e));
            extractor.stats.files_skipped += 1;
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("Extracted {} senses", extractor.stats.senses_extracted));

    let (mut lexicons, extract_stats) = extractor.into_parts();
    info(&format!("{:?}", extract_stats));
    report.extract = extract_stats;

    // Cross-references
    let link_files = list_files_with_extension(&config.input_dirs, "json");
    let mut linker = CrossRefLinker::new(config.dictionary);
    let pb = progress_bar(link_files.len() as u64, config.verbose);
    pb.set_message("Linking cross-references...");

    for path in &link_files {
        if let Err(e) = linker.link_file(path, &mut lexicons) {
            warn(&format!("Skipping cross-reference document {:?}: {:#}", path, e));
            linker.stats.files_skipped += 1;
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("Attached {} occurrences", linker.stats.occurrences_attached));

    info(&format!("{:?}", linker.stats));
    report.link = linker.stats;

    // Domain taxonomies
    let mut taxonomy_builder = TaxonomyBuilder::new(config.dictionary);
    if let Some(domains_dir) = &config.domains_dir {
        for path in list_files_with_extension(std::slice::from_ref(domains_dir), "xml") {
            if let Err(e) = taxonomy_builder.process_file(&path) {
                warn(&format!("Skipping domain document {:?}: {:#}", path, e));
                taxonomy_builder.stats.files_skipped += 1;
            }
        }
        info(&format!("{:?}", taxonomy_builder.stats));
    }
    report.taxonomy = taxonomy_builder.stats.clone();

    // Validate and write, one language at a time
    let header = ExportHeader {
        dictionary: config.dictionary,
        version: config.version.clone(),
        corpus_name: config.corpus_name.clone(),
    };

    for (language, lexicon) in lexicons.iter_mut() {
        let validation = match validate_language(lexicon) {
            Ok(v) => v,
            Err(e) => {
                error(&format!("Stopping language {}: {}", language, e));
                report.failed_languages.push(language.clone());
                continue;
            }
        };

        info(&format!(
            "{}: {} entries, {} senses, {:?}",
            language, lexicon.entries.len(), lexicon.sense_count(), validation
        ));
        report.validation.insert(language.clone(), validation);

        let taxonomies = taxonomy_builder.build_for_language(language);
        let path = write_language_document(&config.output_dir, &header, lexicon, &taxonomies)?;
        info(&format!("Wrote {:?}", path));
        report.written.push(path);
    }

    // Database
    if let Some(database) = &config.database {
        report.load = Some(run_load(database, config.schema_path.as_deref(), &report.written, config.verbose)?);
    }

    info(&format!("Build finished in {}", logger::format_duration(start.elapsed())));

    Ok(report)
}

/// Loads normalized documents into `database`, applying the schema first
/// when given.
pub fn run_load(database: &Path, schema_path: Option<&Path>, files: &[PathBuf], verbose: bool) -> Result<LoadStats> {
    let start = Instant::now();
    let mut conn = establish_connection(database)?;

    if let Some(schema_path) = schema_path {
        initialize_database(&mut conn, schema_path)?;
    }

    let stats = load_files(&mut conn, files, verbose);

    info(&format!(
        "Loaded {} documents ({} failed) in {}",
        stats.documents_loaded, stats.documents_failed, logger::format_duration(start.elapsed())
    ));

    Ok(stats)
}
