use diesel::prelude::*;

use crate::db::lexicon_schema::*;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, PartialEq)]
#[diesel(table_name = entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LexiconEntry {
    pub id: i32,
    pub reference_text_id: i32,
    pub language_id: i32,
    pub entry_code: String,
    pub lemma: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, PartialEq)]
#[diesel(table_name = senses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LexiconSense {
    pub id: i32,
    pub entry_id: i32,
    pub sense_code: String,
    pub definition: Option<String>,
}

// ==========================
// === Insertable Structs ===
// ==========================

#[derive(Insertable, Debug)]
#[diesel(table_name = lexical_reference_texts)]
pub struct NewReferenceText<'a> {
    pub name: &'a str,
    pub version: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = languages)]
pub struct NewLanguage<'a> {
    pub code: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = entries)]
pub struct NewEntry<'a> {
    pub reference_text_id: i32,
    pub language_id: i32,
    pub entry_code: &'a str,
    pub lemma: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = senses)]
pub struct NewSense<'a> {
    pub entry_id: i32,
    pub sense_code: &'a str,
    pub definition: Option<&'a str>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = glosses)]
pub struct NewGloss<'a> {
    pub sense_id: i32,
    pub position: i32,
    pub gloss: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = strong_codes)]
pub struct NewStrongCode<'a> {
    pub entry_id: i32,
    pub code: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = corpora)]
pub struct NewCorpus<'a> {
    pub name: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = taxonomies)]
pub struct NewTaxonomy<'a> {
    pub reference_text_id: i32,
    pub name: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = taxonomy_domains)]
pub struct NewTaxonomyDomain<'a> {
    pub taxonomy_id: i32,
    pub parent_id: Option<i32>,
    pub code: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = taxonomy_domain_labels)]
pub struct NewTaxonomyDomainLabel<'a> {
    pub domain_id: i32,
    pub language_id: i32,
    pub label: &'a str,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = entry_occurrences)]
pub struct NewEntryOccurrence<'a> {
    pub entry_id: i32,
    pub corpus_id: i32,
    pub book: i32,
    pub chapter: i32,
    pub verse: i32,
    pub word: i32,
    pub reference: &'a str,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = sense_occurrences)]
pub struct NewSenseOccurrence<'a> {
    pub sense_id: i32,
    pub corpus_id: i32,
    pub book: i32,
    pub chapter: i32,
    pub verse: i32,
    pub word: i32,
    pub reference: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = entry_domains)]
pub struct NewEntryDomain {
    pub entry_id: i32,
    pub domain_id: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = sense_domains)]
pub struct NewSenseDomain {
    pub sense_id: i32,
    pub domain_id: i32,
}
