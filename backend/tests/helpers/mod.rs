use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use diesel::SqliteConnection;
use tempfile::TempDir;

use semdict_backend::db::{establish_connection, initialize_database, table_row_count, table_row_counts};

pub const LEXICON_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Lexicon>
  <Lexicon_Entry Id="000001000000000" Lemma="אָב" Version="5">
    <StrongCodes><Strong>H0001</Strong></StrongCodes>
    <BaseForms>
      <BaseForm Id="000001001000000">
        <LEXMeanings>
          <LEXMeaning Id="000001001001000" IsBiblicalTerm="Y">
            <LEXDomains><LEXDomain Code="001001">Kinship</LEXDomain></LEXDomains>
            <LEXSubDomains><LEXSubDomain Code="001001001">Parent</LEXSubDomain></LEXSubDomains>
            <LEXCoreDomains><LEXCoreDomain Code="023">Family</LEXCoreDomain></LEXCoreDomains>
            <LEXSenses>
              <LEXSense LanguageCode="en">
                <DefinitionShort>male progenitor</DefinitionShort>
                <Glosses><Gloss>father</Gloss></Glosses>
              </LEXSense>
              <LEXSense LanguageCode="fr">
                <DefinitionShort>géniteur</DefinitionShort>
                <Glosses><Gloss>père</Gloss></Glosses>
              </LEXSense>
            </LEXSenses>
            <CONMeanings>
              <CONMeaning Id="000001001001001">
                <CONDomains><CONDomain Code="002">Lineage</CONDomain></CONDomains>
                <CONReferences><CONReference>00100200300004</CONReference></CONReferences>
                <CONSenses>
                  <CONSense LanguageCode="en"><Glosses><Gloss>ancestor</Gloss></Glosses></CONSense>
                </CONSenses>
              </CONMeaning>
            </CONMeanings>
          </LEXMeaning>
        </LEXMeanings>
      </BaseForm>
    </BaseForms>
  </Lexicon_Entry>
  <Lexicon_Entry Id="000002000000000" Lemma="אֵב" Version="3">
    <BaseForms>
      <BaseForm Id="000002001000000">
        <LEXMeanings>
          <LEXMeaning Id="000002001001000">
            <LEXDomains><LEXDomain Code="003">Vegetation</LEXDomain></LEXDomains>
            <LEXSenses>
              <LEXSense LanguageCode="en"><Glosses><Gloss>bud</Gloss></Glosses></LEXSense>
            </LEXSenses>
          </LEXMeaning>
        </LEXMeanings>
      </BaseForm>
    </BaseForms>
  </Lexicon_Entry>
  <Lexicon_Entry Id="000003000000000" Lemma="אבד" Version="2">
    <BaseForms>
      <BaseForm Id="000003001000000">
        <LEXMeanings>
          <LEXMeaning Id="000003001001000">
            <LEXSenses><LEXSense LanguageCode="en"><Glosses><Gloss>perish</Gloss></Glosses></LEXSense></LEXSenses>
          </LEXMeaning>
        </LEXMeanings>
      </BaseForm>
    </BaseForms>
  </Lexicon_Entry>
</Lexicon>
"#;

pub const LINKS_JSON: &str = r#"[
  { "id": "00100100100002", "lexicalLinks": ["SDBH:אָב:001001", "SDBH:אָב:001001001:ancestor"] },
  { "id": "00100100100004", "lexicalLinks": ["SDBH:אָב:001001", "SDBH:אָב:001001"] },
  { "id": "00100100100003", "lexicalLinks": ["SDBH:אָב:001001"] },
  { "id": "00100100100006", "lexicalLinks": ["SDBH:אין:001001"] }
]"#;

pub const DOMAINS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SemanticDomains Dictionary="SDBH" MeaningType="LEX">
  <SemanticDomain Code="001" Level="1" HasSubDomains="true">
    <SemanticDomainLocalizations>
      <SemanticDomainLocalization LanguageCode="en"><Label>Objects</Label></SemanticDomainLocalization>
      <SemanticDomainLocalization LanguageCode="fr"><Label>Objets</Label></SemanticDomainLocalization>
    </SemanticDomainLocalizations>
  </SemanticDomain>
  <SemanticDomain Code="001001" Level="2" HasSubDomains="true">
    <SemanticDomainLocalizations>
      <SemanticDomainLocalization LanguageCode="en"><Label>Kinship</Label></SemanticDomainLocalization>
    </SemanticDomainLocalizations>
  </SemanticDomain>
  <SemanticDomain Code="001001001" Level="3" HasSubDomains="false">
    <SemanticDomainLocalizations>
      <SemanticDomainLocalization LanguageCode="en"><Label>Parent</Label></SemanticDomainLocalization>
    </SemanticDomainLocalizations>
  </SemanticDomain>
</SemanticDomains>
"#;

/// Source data laid out in a temporary directory.
pub struct SourceTree {
    // Keeps the directory alive for the duration of the test
    pub root: TempDir,
    pub input_dir: PathBuf,
    pub domains_dir: PathBuf,
    pub output_dir: PathBuf,
}

static LOG_DIR_INIT: Once = Once::new();

/// Keeps test runs from writing to the user's log directory. The logger is
/// created once per test binary, so the directory must outlive every test.
pub fn use_test_log_dir() -> PathBuf {
    let log_dir = std::env::temp_dir().join("semdict-test-logs");
    LOG_DIR_INIT.call_once(|| {
        // SAFETY: set once, before the logger reads it; the tests run with #[serial]
        unsafe {
            std::env::set_var("SEMDICT_LOG_DIR", &log_dir);
        }
    });
    log_dir
}

pub fn write_source_tree() -> SourceTree {
    use_test_log_dir();

    let root = tempfile::tempdir().expect("Can't create temp dir");

    let input_dir = root.path().join("input");
    let domains_dir = root.path().join("domains");
    let output_dir = root.path().join("output");

    fs::create_dir_all(input_dir.join("links")).expect("Can't create input dir");
    fs::create_dir_all(&domains_dir).expect("Can't create domains dir");

    fs::write(input_dir.join("SDBH.xml"), LEXICON_XML).expect("Can't write lexicon");
    fs::write(input_dir.join("links").join("MARBLELinks-GEN.json"), LINKS_JSON).expect("Can't write links");
    // Not a supported book, skipped
    fs::write(input_dir.join("links").join("MARBLELinks-TOB.json"), LINKS_JSON).expect("Can't write links");
    fs::write(domains_dir.join("SDBH-LEX.xml"), DOMAINS_XML).expect("Can't write domains");

    SourceTree { root, input_dir, domains_dir, output_dir }
}

pub fn schema_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../schema/lexicon.sql")
}

#[allow(dead_code)]
pub fn fresh_database(dir: &Path, name: &str) -> (PathBuf, SqliteConnection) {
    let db_path = dir.join(name);
    let mut conn = establish_connection(&db_path).expect("Can't open database");
    initialize_database(&mut conn, &schema_path()).expect("Can't apply schema");
    (db_path, conn)
}

#[allow(dead_code)]
pub fn row_counts(conn: &mut SqliteConnection) -> Vec<(String, i64)> {
    table_row_counts(conn).expect("Can't count rows")
}

#[allow(dead_code)]
pub fn row_count(conn: &mut SqliteConnection, table: &str) -> i64 {
    table_row_count(conn, table).expect("Can't count rows")
}
