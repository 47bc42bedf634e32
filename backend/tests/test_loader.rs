use std::fs;
use std::path::PathBuf;

use diesel::prelude::*;
use serial_test::serial;

use semdict_backend::db::lexicon_models::{LexiconEntry, LexiconSense};
use semdict_backend::db::loader::{load_files, LexiconLoader};
use semdict_backend::pipeline::{run_build, PipelineConfig};
use semdict_backend::types::Dictionary;
use semdict_backend::xml_import::read_normalized_file;

mod helpers;
use helpers as h;

/// Builds the normalized documents of the test source tree.
fn built_documents(tree: &h::SourceTree) -> Vec<PathBuf> {
    let mut config = PipelineConfig::new(
        Dictionary::Sdbh,
        "1.0",
        vec![tree.input_dir.clone()],
        tree.output_dir.clone(),
    );
    config.domains_dir = Some(tree.domains_dir.clone());
    run_build(&config).expect("Build failed").written
}

#[test]
#[serial]
fn test_load_row_counts() {
    let tree = h::write_source_tree();
    let files = built_documents(&tree);
    let (_, mut conn) = h::fresh_database(tree.root.path(), "a.sqlite3");

    let stats = load_files(&mut conn, &files, false);
    assert_eq!(stats.documents_loaded, 2);

    assert_eq!(h::row_count(&mut conn, "lexical_reference_texts"), 1);
    assert_eq!(h::row_count(&mut conn, "languages"), 2);
    assert_eq!(h::row_count(&mut conn, "corpora"), 1);
    assert_eq!(h::row_count(&mut conn, "entries"), 3);
    assert_eq!(h::row_count(&mut conn, "senses"), 4);
    assert_eq!(h::row_count(&mut conn, "glosses"), 4);
    assert_eq!(h::row_count(&mut conn, "strong_codes"), 2);
    assert_eq!(h::row_count(&mut conn, "sense_occurrences"), 6);
    assert_eq!(h::row_count(&mut conn, "entry_occurrences"), 5);
    assert_eq!(h::row_count(&mut conn, "taxonomies"), 3);
    assert_eq!(h::row_count(&mut conn, "sense_domains"), 6);
    assert_eq!(h::row_count(&mut conn, "entry_domains"), 6);
}

#[test]
#[serial]
fn test_loaded_senses_of_entry() {
    use semdict_backend::db::lexicon_schema::{entries, languages, senses};

    let tree = h::write_source_tree();
    let files = built_documents(&tree);
    let (_, mut conn) = h::fresh_database(tree.root.path(), "senses.sqlite3");
    load_files(&mut conn, &files, false);

    let father: LexiconEntry = entries::table
        .inner_join(languages::table)
        .filter(languages::code.eq("en"))
        .filter(entries::lemma.eq("אָב"))
        .select(LexiconEntry::as_select())
        .first(&mut conn)
        .unwrap();

    let loaded: Vec<LexiconSense> = senses::table
        .filter(senses::entry_id.eq(father.id))
        .select(LexiconSense::as_select())
        .order(senses::sense_code)
        .load(&mut conn)
        .unwrap();

    let codes: Vec<&str> = loaded.iter().map(|s| s.sense_code.as_str()).collect();
    assert_eq!(codes, vec!["000001001001000", "000001001001001"]);
    assert_eq!(loaded[0].definition.as_deref(), Some("male progenitor"));
    assert_eq!(loaded[1].definition, None);
}

#[test]
#[serial]
fn test_load_into_fresh_databases_is_identical() {
    let tree = h::write_source_tree();
    let files = built_documents(&tree);

    let (_, mut first) = h::fresh_database(tree.root.path(), "first.sqlite3");
    let (_, mut second) = h::fresh_database(tree.root.path(), "second.sqlite3");

    load_files(&mut first, &files, false);
    load_files(&mut second, &files, false);

    assert_eq!(h::row_counts(&mut first), h::row_counts(&mut second));
}

#[test]
#[serial]
fn test_reload_keeps_row_counts() {
    let tree = h::write_source_tree();
    let files = built_documents(&tree);
    let (_, mut conn) = h::fresh_database(tree.root.path(), "reload.sqlite3");

    load_files(&mut conn, &files, false);
    let before = h::row_counts(&mut conn);

    let stats = load_files(&mut conn, &files, true);
    assert_eq!(stats.documents_failed, 0);
    assert_eq!(h::row_counts(&mut conn), before);
}

#[test]
#[serial]
fn test_failed_document_is_rolled_back() {
    let tree = h::write_source_tree();
    let files = built_documents(&tree);
    let (_, mut conn) = h::fresh_database(tree.root.path(), "rollback.sqlite3");

    // Every document has glosses, so every load fails part way through
    diesel::sql_query("DROP TABLE glosses;").execute(&mut conn).unwrap();

    let doc = read_normalized_file(&files[0]).unwrap();
    let mut loader = LexiconLoader::new(false);

    assert!(loader.load_document(&mut conn, &doc).is_err());
    assert_eq!(loader.stats.documents_failed, 1);
    assert!(loader.cache().is_empty());

    assert_eq!(h::row_count(&mut conn, "entries"), 0);
    assert_eq!(h::row_count(&mut conn, "languages"), 0);
    assert_eq!(h::row_count(&mut conn, "lexical_reference_texts"), 0);
}

#[test]
#[serial]
fn test_load_continues_after_failed_document() {
    let tree = h::write_source_tree();
    let mut files = built_documents(&tree);

    let broken = tree.output_dir.join("SDBH-xx.xml");
    fs::write(&broken, "<Lexicon Dictionary=\"SDBH\" Language=\"xx\"><Entries><Entry>").unwrap();
    files.insert(0, broken);

    let (_, mut conn) = h::fresh_database(tree.root.path(), "continue.sqlite3");
    let stats = load_files(&mut conn, &files, false);

    assert_eq!(stats.documents_failed, 1);
    assert_eq!(stats.documents_loaded, 2);

    use semdict_backend::db::lexicon_schema::entries;
    let loaded: Vec<LexiconEntry> = entries::table
        .select(LexiconEntry::as_select())
        .order(entries::id)
        .load(&mut conn)
        .unwrap();
    assert_eq!(loaded.len(), 3);
    assert!(loaded.iter().any(|e| e.lemma == "אָב" && e.entry_code == "000001"));
}
